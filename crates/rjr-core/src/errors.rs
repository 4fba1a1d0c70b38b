//! Structured error types shared across RJR crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`RjrError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (frame names, counts, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the RJR engine.
///
/// `Topology` and `Analysis` are raised while the frame tree is being set up
/// and are fatal for a job. `Input` is raised per event when the supplied
/// objects cannot satisfy the combinatoric requirements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum RjrError {
    /// Frame tree construction or tree initialization failures.
    #[error("topology error: {0}")]
    Topology(ErrorInfo),
    /// Group and jigsaw completeness failures found by analysis initialization.
    #[error("analysis error: {0}")]
    Analysis(ErrorInfo),
    /// Per-event input that the configured groups cannot accept.
    #[error("input error: {0}")]
    Input(ErrorInfo),
    /// Invalid solver configuration.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Serialization failures.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl RjrError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            RjrError::Topology(info)
            | RjrError::Analysis(info)
            | RjrError::Input(info)
            | RjrError::Config(info)
            | RjrError::Serde(info) => info,
        }
    }

    /// Returns true for the startup-time families that must abort a job.
    pub fn is_fatal_setup(&self) -> bool {
        matches!(self, RjrError::Topology(_) | RjrError::Analysis(_))
    }

    /// Shorthand for a topology error.
    pub fn topology(code: &str, message: impl Into<String>) -> Self {
        RjrError::Topology(ErrorInfo::new(code, message))
    }

    /// Shorthand for an analysis error.
    pub fn analysis(code: &str, message: impl Into<String>) -> Self {
        RjrError::Analysis(ErrorInfo::new(code, message))
    }

    /// Shorthand for an input error.
    pub fn input(code: &str, message: impl Into<String>) -> Self {
        RjrError::Input(ErrorInfo::new(code, message))
    }
}
