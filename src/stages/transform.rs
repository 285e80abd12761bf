use crate::adapters::artifact::write_artifact;
use crate::core::context::{RunContext, StageId, StageOutput};
use crate::core::runner::Stage;
use crate::domain::model::CanonicalUser;
use crate::utils::error::Result;
use std::path::PathBuf;

/// Serializes the canonical record into the intermediate artifact at a
/// fixed path, overwriting any prior content.
///
/// Upstream absence degrades to the shared placeholder record; an I/O
/// failure does not — there is no fallback below the filesystem.
pub struct TransformationStage {
    artifact_path: PathBuf,
}

impl TransformationStage {
    pub fn new(artifact_path: PathBuf) -> Self {
        Self { artifact_path }
    }
}

#[async_trait::async_trait]
impl Stage for TransformationStage {
    fn id(&self) -> StageId {
        StageId::Transformation
    }

    async fn run(&self, ctx: &RunContext) -> Result<StageOutput> {
        let user = match ctx.user(StageId::Extraction) {
            Some(user) => user.clone(),
            None => {
                tracing::warn!(
                    "⚠️ No user from {}, substituting placeholder record",
                    StageId::Extraction
                );
                CanonicalUser::placeholder()
            }
        };

        write_artifact(&self.artifact_path, &[user])?;
        tracing::info!("💾 Artifact written to: {}", self.artifact_path.display());
        Ok(StageOutput::Artifact(self.artifact_path.clone()))
    }
}
