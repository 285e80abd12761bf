use crate::adapters::api::ApiSource;
use crate::core::context::{RunContext, StageId, StageOutput};
use crate::core::runner::Stage;
use crate::domain::model::CanonicalUser;
use crate::utils::error::{PipelineError, Result};

/// Normalizes the raw external payload into a `CanonicalUser`.
///
/// When the poller recorded no payload, this stage performs one direct
/// fetch of its own — without the retry/timeout envelope, a network
/// fault or non-200 on that path is fatal.
pub struct ExtractionStage {
    source: ApiSource,
}

impl ExtractionStage {
    pub fn new(source: ApiSource) -> Self {
        Self { source }
    }
}

#[async_trait::async_trait]
impl Stage for ExtractionStage {
    fn id(&self) -> StageId {
        StageId::Extraction
    }

    async fn run(&self, ctx: &RunContext) -> Result<StageOutput> {
        let payload = match ctx.payload(StageId::ReadinessPoller) {
            Some(payload) => payload.clone(),
            None => {
                tracing::warn!(
                    "⚠️ No payload from {}, fetching directly",
                    StageId::ReadinessPoller
                );
                self.source.fetch_once().await?
            }
        };

        let user = map_user(&payload)?;
        tracing::info!("📥 Extracted user {} <{}>", user.id, user.email);
        Ok(StageOutput::User(user))
    }
}

/// Maps the externally-owned nested schema onto the flat canonical shape.
///
/// A missing or ill-typed required field fails the run with
/// `SchemaMismatch`; there is no field-level fallback.
pub fn map_user(payload: &serde_json::Value) -> Result<CanonicalUser> {
    let id = parse_id(payload.get("id"))?;
    let info = payload
        .get("personalInfo")
        .ok_or_else(|| mismatch("personalInfo"))?;

    Ok(CanonicalUser {
        id,
        firstname: string_field(info, "personalInfo.firstName", "firstName")?,
        lastname: string_field(info, "personalInfo.lastName", "lastName")?,
        email: string_field(info, "personalInfo.email", "email")?,
    })
}

// The external id arrives as a JSON integer or a numeric string;
// both normalize to i64 here, anything else is a schema mismatch.
fn parse_id(value: Option<&serde_json::Value>) -> Result<i64> {
    match value {
        Some(serde_json::Value::Number(n)) => n.as_i64().ok_or_else(|| mismatch("id")),
        Some(serde_json::Value::String(s)) => s.parse().map_err(|_| mismatch("id")),
        _ => Err(mismatch("id")),
    }
}

fn string_field(info: &serde_json::Value, path: &str, key: &str) -> Result<String> {
    info.get(key)
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| mismatch(path))
}

fn mismatch(field: &str) -> PipelineError {
    PipelineError::SchemaMismatch {
        field: field.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_user_well_formed_payload() {
        let payload = serde_json::json!({
            "id": 7,
            "personalInfo": {"firstName": "Ann", "lastName": "Lee", "email": "ann@x.com"}
        });

        let user = map_user(&payload).unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(user.firstname, "Ann");
        assert_eq!(user.lastname, "Lee");
        assert_eq!(user.email, "ann@x.com");
    }

    #[test]
    fn test_map_user_accepts_numeric_string_id() {
        let payload = serde_json::json!({
            "id": "12345",
            "personalInfo": {"firstName": "John", "lastName": "Doe", "email": "john.doe@example.com"}
        });

        assert_eq!(map_user(&payload).unwrap().id, 12345);
    }

    #[test]
    fn test_map_user_accepts_zero_id() {
        let payload = serde_json::json!({
            "id": 0,
            "personalInfo": {"firstName": "Ann", "lastName": "Lee", "email": "ann@x.com"}
        });

        assert_eq!(map_user(&payload).unwrap().id, 0);
    }

    #[test]
    fn test_map_user_missing_nested_object() {
        let payload = serde_json::json!({"id": 7});

        let err = map_user(&payload).unwrap_err();
        match err {
            PipelineError::SchemaMismatch { field } => assert_eq!(field, "personalInfo"),
            other => panic!("expected SchemaMismatch, got {}", other),
        }
    }

    #[test]
    fn test_map_user_missing_email() {
        let payload = serde_json::json!({
            "id": 7,
            "personalInfo": {"firstName": "Ann", "lastName": "Lee"}
        });

        let err = map_user(&payload).unwrap_err();
        match err {
            PipelineError::SchemaMismatch { field } => assert_eq!(field, "personalInfo.email"),
            other => panic!("expected SchemaMismatch, got {}", other),
        }
    }

    #[test]
    fn test_map_user_rejects_non_numeric_id() {
        let payload = serde_json::json!({
            "id": "not-a-number",
            "personalInfo": {"firstName": "Ann", "lastName": "Lee", "email": "ann@x.com"}
        });

        assert!(matches!(
            map_user(&payload).unwrap_err(),
            PipelineError::SchemaMismatch { .. }
        ));
    }
}
