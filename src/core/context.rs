use crate::domain::model::{CanonicalUser, ValidationReport};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Identifies a stage in the linear chain. Doubles as the key under which
/// the stage's output is recorded in the run context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    ReadinessPoller,
    Extraction,
    Transformation,
    Persistence,
    Validation,
}

impl StageId {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageId::ReadinessPoller => "readiness_poller",
            StageId::Extraction => "extraction",
            StageId::Transformation => "transformation",
            StageId::Persistence => "persistence",
            StageId::Validation => "validation",
        }
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output a stage hands to its successors through the run context.
#[derive(Debug, Clone)]
pub enum StageOutput {
    /// Raw external payload obtained by the readiness poller.
    Payload(serde_json::Value),
    /// Canonical record produced by extraction.
    User(CanonicalUser),
    /// Path to the durable intermediate artifact.
    Artifact(PathBuf),
    /// Human-readable confirmation from persistence.
    Confirmation(String),
    /// Aggregate health report from validation.
    Report(ValidationReport),
}

impl StageOutput {
    pub fn kind(&self) -> &'static str {
        match self {
            StageOutput::Payload(_) => "payload",
            StageOutput::User(_) => "user",
            StageOutput::Artifact(_) => "artifact",
            StageOutput::Confirmation(_) => "confirmation",
            StageOutput::Report(_) => "report",
        }
    }
}

/// Per-run key-value store carrying each stage's output to the stages
/// after it. Lives for exactly one run; nothing here survives across runs.
///
/// Absence is explicit: a `None` from any accessor means the upstream
/// stage never recorded an output. A recorded-but-empty or falsy value
/// (id 0, empty string) is still `Some` and never triggers fallback.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub execution_id: String,
    outputs: HashMap<StageId, StageOutput>,
}

impl RunContext {
    pub fn new(execution_id: String) -> Self {
        Self {
            execution_id,
            outputs: HashMap::new(),
        }
    }

    /// Record `output` as the result of `stage`, replacing any earlier one.
    pub fn record(&mut self, stage: StageId, output: StageOutput) {
        self.outputs.insert(stage, output);
    }

    /// Raw upstream lookup. `None` means the stage never recorded an output.
    pub fn fetch_upstream(&self, stage: StageId) -> Option<&StageOutput> {
        self.outputs.get(&stage)
    }

    pub fn payload(&self, stage: StageId) -> Option<&serde_json::Value> {
        match self.fetch_upstream(stage) {
            Some(StageOutput::Payload(value)) => Some(value),
            Some(other) => Self::warn_mismatch(stage, "payload", other),
            None => None,
        }
    }

    pub fn user(&self, stage: StageId) -> Option<&CanonicalUser> {
        match self.fetch_upstream(stage) {
            Some(StageOutput::User(user)) => Some(user),
            Some(other) => Self::warn_mismatch(stage, "user", other),
            None => None,
        }
    }

    pub fn artifact(&self, stage: StageId) -> Option<&Path> {
        match self.fetch_upstream(stage) {
            Some(StageOutput::Artifact(path)) => Some(path),
            Some(other) => Self::warn_mismatch(stage, "artifact", other),
            None => None,
        }
    }

    pub fn confirmation(&self, stage: StageId) -> Option<&str> {
        match self.fetch_upstream(stage) {
            Some(StageOutput::Confirmation(message)) => Some(message),
            Some(other) => Self::warn_mismatch(stage, "confirmation", other),
            None => None,
        }
    }

    pub fn report(&self, stage: StageId) -> Option<&ValidationReport> {
        match self.fetch_upstream(stage) {
            Some(StageOutput::Report(report)) => Some(report),
            Some(other) => Self::warn_mismatch(stage, "report", other),
            None => None,
        }
    }

    // A recorded output of the wrong kind indicates mis-wired stages.
    // It is treated as absence so downstream fallback still applies,
    // but loudly, so the defect is visible in the logs.
    fn warn_mismatch<T>(stage: StageId, expected: &str, got: &StageOutput) -> Option<T> {
        tracing::warn!(
            "⚠️ Stage '{}' recorded a {} output where a {} was expected; treating as absent",
            stage,
            got.kind(),
            expected
        );
        None
    }
}
