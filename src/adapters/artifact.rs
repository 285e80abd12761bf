//! Intermediate artifact I/O: a header-plus-rows CSV at a well-known path.
//!
//! Both the transformation stage and the persistence stage's inline
//! fallback write through here, keeping the format in one place.

use crate::domain::model::CanonicalUser;
use crate::utils::error::Result;
use std::path::Path;

/// Writes `users` to `path` as a header row plus one data row each,
/// truncating any prior content at that path.
pub fn write_artifact(path: &Path, users: &[CanonicalUser]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    for user in users {
        writer.serialize(user)?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads every data row present in an artifact. The writer emits one row
/// per run today, but the reader must not assume cardinality.
pub fn read_artifact(path: &Path) -> Result<Vec<CanonicalUser>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut users = Vec::new();
    for row in reader.deserialize() {
        users.push(row?);
    }
    Ok(users)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip_single_user() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("user_info.csv");

        let user = CanonicalUser {
            id: 7,
            firstname: "Ann".to_string(),
            lastname: "Lee".to_string(),
            email: "ann@x.com".to_string(),
        };
        write_artifact(&path, &[user.clone()]).unwrap();

        let users = read_artifact(&path).unwrap();
        assert_eq!(users, vec![user]);
    }

    #[test]
    fn test_write_truncates_prior_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("user_info.csv");

        write_artifact(&path, &[CanonicalUser::placeholder()]).unwrap();
        let user = CanonicalUser {
            id: 1,
            firstname: "Amy".to_string(),
            lastname: "Wu".to_string(),
            email: "amy@x.com".to_string(),
        };
        write_artifact(&path, &[user.clone()]).unwrap();

        let users = read_artifact(&path).unwrap();
        assert_eq!(users, vec![user]);
    }

    #[test]
    fn test_placeholder_bytes_are_deterministic() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("user_info.csv");

        write_artifact(&path, &[CanonicalUser::placeholder()]).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(
            bytes,
            b"id,firstname,lastname,email\n12345,John,Doe,john.doe@example.com\n"
        );
    }

    #[test]
    fn test_read_missing_artifact_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nope.csv");
        assert!(read_artifact(&path).is_err());
    }
}
