pub mod context;
pub mod runner;

pub use context::{RunContext, StageId, StageOutput};
pub use runner::{PipelineRunner, Stage};
