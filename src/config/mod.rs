use crate::utils::error::{PipelineError, Result};
use crate::utils::validation::{validate_path, validate_range, validate_url, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

/// Marc Lamberti's fakeuser dataset, the pipeline's default data source.
const DEFAULT_ENDPOINT: &str =
    "https://raw.githubusercontent.com/marclamberti/datasets/refs/heads/main/fakeuser.json";

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "user-etl")]
#[command(about = "A linear user-processing pipeline: poll, extract, transform, store, validate")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub api_endpoint: String,

    #[arg(long, default_value = "./users.db")]
    pub database_path: String,

    #[arg(long, default_value = "/tmp/user_info.csv")]
    pub artifact_path: String,

    #[arg(long, default_value = "10", help = "Seconds between readiness probes")]
    pub poll_interval_secs: u64,

    #[arg(long, default_value = "300", help = "Total readiness budget in seconds")]
    pub poll_timeout_secs: u64,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api_endpoint", &self.api_endpoint)?;
        validate_path("database_path", &self.database_path)?;
        validate_path("artifact_path", &self.artifact_path)?;
        validate_range("poll_interval_secs", self.poll_interval_secs, 1, 3600)?;
        validate_range("poll_timeout_secs", self.poll_timeout_secs, 1, 86400)?;

        if self.poll_timeout_secs < self.poll_interval_secs {
            return Err(PipelineError::InvalidConfig {
                field: "poll_timeout_secs".to_string(),
                reason: "timeout must be at least one poll interval".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CliConfig::parse_from(["user-etl"]);
        assert!(config.validate().is_ok());
        assert_eq!(config.api_endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.artifact_path, "/tmp/user_info.csv");
        assert_eq!(config.poll_interval_secs, 10);
        assert_eq!(config.poll_timeout_secs, 300);
    }

    #[test]
    fn test_rejects_bad_endpoint() {
        let config = CliConfig::parse_from(["user-etl", "--api-endpoint", "ftp://nope"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_timeout_shorter_than_interval() {
        let config = CliConfig::parse_from([
            "user-etl",
            "--poll-interval-secs",
            "60",
            "--poll-timeout-secs",
            "30",
        ]);
        assert!(config.validate().is_err());
    }
}
