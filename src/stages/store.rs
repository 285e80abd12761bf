use crate::adapters::artifact::{read_artifact, write_artifact};
use crate::adapters::db::UserStore;
use crate::core::context::{RunContext, StageId, StageOutput};
use crate::core::runner::Stage;
use crate::domain::model::CanonicalUser;
use crate::utils::error::Result;
use std::path::PathBuf;
use std::sync::Arc;

/// Loads the intermediate artifact into the users table with
/// conflict-tolerant inserts, making the stage safe to re-run with the
/// same artifact.
///
/// Upstream absence degrades by re-creating the placeholder artifact at
/// the configured path; store faults are fatal.
pub struct PersistenceStage {
    store: Arc<dyn UserStore>,
    artifact_path: PathBuf,
}

impl PersistenceStage {
    pub fn new(store: Arc<dyn UserStore>, artifact_path: PathBuf) -> Self {
        Self {
            store,
            artifact_path,
        }
    }
}

#[async_trait::async_trait]
impl Stage for PersistenceStage {
    fn id(&self) -> StageId {
        StageId::Persistence
    }

    async fn run(&self, ctx: &RunContext) -> Result<StageOutput> {
        let path = match ctx.artifact(StageId::Transformation) {
            Some(path) => path.to_path_buf(),
            None => {
                tracing::warn!(
                    "⚠️ No artifact from {}, re-creating placeholder artifact",
                    StageId::Transformation
                );
                write_artifact(&self.artifact_path, &[CanonicalUser::placeholder()])?;
                self.artifact_path.clone()
            }
        };

        // Exactly one row by construction, but iterate whatever is present.
        let users = read_artifact(&path)?;

        let mut inserted = 0usize;
        let mut skipped = 0usize;
        for user in &users {
            if self.store.insert_user(user)? {
                inserted += 1;
            } else {
                tracing::debug!("↩️ User {} already present, insert skipped", user.id);
                skipped += 1;
            }
        }

        tracing::info!("💾 Stored {} user(s), {} duplicate(s) skipped", inserted, skipped);
        Ok(StageOutput::Confirmation(format!(
            "Stored {} user(s) successfully ({} duplicate(s) skipped)",
            inserted, skipped
        )))
    }
}
