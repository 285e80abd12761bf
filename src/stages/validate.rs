use crate::adapters::db::UserStore;
use crate::core::context::{RunContext, StageId, StageOutput};
use crate::core::runner::Stage;
use crate::domain::model::{ValidationReport, ValidationStatus};
use crate::utils::error::{PipelineError, Result};
use std::sync::Arc;

/// Post-load aggregate checks against the users table.
///
/// Deliberately the one stage with zero fallback: a query failure is
/// logged and re-raised so the report always reflects ground truth.
pub struct ValidationStage {
    store: Arc<dyn UserStore>,
}

impl ValidationStage {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl Stage for ValidationStage {
    fn id(&self) -> StageId {
        StageId::Validation
    }

    async fn run(&self, _ctx: &RunContext) -> Result<StageOutput> {
        let total_users = self.store.count_users().map_err(|e| {
            tracing::error!("❌ Validation count query failed: {}", e);
            PipelineError::Validation(e)
        })?;

        let latest = self.store.latest_user().map_err(|e| {
            tracing::error!("❌ Validation latest-row query failed: {}", e);
            PipelineError::Validation(e)
        })?;

        tracing::info!("🔍 Total users in database: {}", total_users);
        if let Some((id, email)) = &latest {
            tracing::info!("🔍 Latest user: {} (ID: {})", email, id);
        }

        Ok(StageOutput::Report(ValidationReport {
            total_users,
            latest_user: latest.map(|(_, email)| email),
            validation_status: ValidationStatus::Success,
        }))
    }
}
