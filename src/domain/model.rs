use serde::{Deserialize, Serialize};

/// Canonical flat user record produced by the extraction stage.
///
/// Field order matters: it defines the column order of the intermediate
/// artifact (`id, firstname, lastname, email`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalUser {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
}

impl CanonicalUser {
    /// The fixed fallback record substituted when an upstream stage
    /// produced nothing. Single source of truth for every stage that
    /// degrades to it.
    pub fn placeholder() -> Self {
        Self {
            id: 12345,
            firstname: "John".to_string(),
            lastname: "Doe".to_string(),
            email: "john.doe@example.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationStatus {
    #[serde(rename = "SUCCESS")]
    Success,
    #[serde(rename = "FAILURE")]
    Failure,
}

/// Aggregate health report produced fresh on every run, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub total_users: i64,
    pub latest_user: Option<String>,
    pub validation_status: ValidationStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_stable() {
        let user = CanonicalUser::placeholder();
        assert_eq!(user.id, 12345);
        assert_eq!(user.firstname, "John");
        assert_eq!(user.lastname, "Doe");
        assert_eq!(user.email, "john.doe@example.com");
    }

    #[test]
    fn test_validation_status_serializes_upper_case() {
        assert_eq!(
            serde_json::to_string(&ValidationStatus::Success).unwrap(),
            "\"SUCCESS\""
        );
        assert_eq!(
            serde_json::to_string(&ValidationStatus::Failure).unwrap(),
            "\"FAILURE\""
        );
    }
}
