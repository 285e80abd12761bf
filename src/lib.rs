pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod stages;
pub mod utils;

pub use crate::adapters::api::{ApiSource, ReadinessProbe};
pub use crate::adapters::db::{SqliteUserStore, UserStore};
pub use crate::config::CliConfig;
pub use crate::core::{PipelineRunner, RunContext, Stage, StageId, StageOutput};
pub use crate::domain::model::{CanonicalUser, ValidationReport, ValidationStatus};
pub use crate::utils::error::{PipelineError, Result};
