use crate::core::context::{RunContext, StageId, StageOutput};
use crate::domain::model::ValidationReport;
use crate::utils::error::{PipelineError, Result};
use std::time::Instant;

/// One unit of the linear pipeline: a single input dependency (read from
/// the run context) and a single output (recorded into the context by
/// the runner once the stage completes).
#[async_trait::async_trait]
pub trait Stage: Send + Sync {
    fn id(&self) -> StageId;

    async fn run(&self, ctx: &RunContext) -> Result<StageOutput>;
}

/// Executes stages strictly in order. Each stage starts only after its
/// immediate predecessor has completed and recorded its output; no two
/// stages run concurrently within one run.
#[derive(Default)]
pub struct PipelineRunner {
    stages: Vec<Box<dyn Stage>>,
}

impl PipelineRunner {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    pub fn add_stage(&mut self, stage: Box<dyn Stage>) {
        self.stages.push(stage);
    }

    /// Runs the whole chain and returns the final validation report.
    ///
    /// The first operational fault terminates the run; upstream-absence
    /// handling is each stage's own concern.
    pub async fn execute_all(&self) -> Result<ValidationReport> {
        let execution_id = format!("run_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"));
        let mut ctx = RunContext::new(execution_id);
        tracing::info!("🚀 Starting pipeline run: {}", ctx.execution_id);

        for stage in &self.stages {
            let start_time = Instant::now();
            tracing::info!("▶️ Stage started: {}", stage.id());

            match stage.run(&ctx).await {
                Ok(output) => {
                    tracing::info!(
                        "✅ Stage completed: {} (duration: {:?})",
                        stage.id(),
                        start_time.elapsed()
                    );
                    ctx.record(stage.id(), output);
                }
                Err(e) => {
                    tracing::error!("❌ Stage failed: {}: {}", stage.id(), e);
                    return Err(e);
                }
            }
        }

        ctx.report(StageId::Validation)
            .cloned()
            .ok_or(PipelineError::MissingValidationReport)
    }
}
