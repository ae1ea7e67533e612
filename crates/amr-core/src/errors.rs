//! Structured error types shared across AMR crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`AmrError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (identifiers, sizes, etc.).
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
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the refinement engine.
///
/// A production whose precondition does not hold is *not* an error; matching
/// reports that through `Option`. Errors cover misuse (unknown identifiers,
/// stale match contexts) and I/O around the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum AmrError {
    /// Hypergraph structural errors.
    #[error("graph error: {0}")]
    Graph(ErrorInfo),
    /// Production precondition violations raised by `apply`.
    #[error("production error: {0}")]
    Production(ErrorInfo),
    /// Rewrite driver errors.
    #[error("driver error: {0}")]
    Driver(ErrorInfo),
    /// Configuration parsing and validation errors.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Serialization, schema and file errors.
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

impl AmrError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            AmrError::Graph(info)
            | AmrError::Production(info)
            | AmrError::Driver(info)
            | AmrError::Config(info)
            | AmrError::Serde(info) => info,
        }
    }

    /// Returns the stable error code.
    pub fn code(&self) -> &str {
        &self.info().code
    }

    /// Adds a context entry to the payload regardless of the family.
    pub fn with_context(self, key: impl Into<String>, value: impl ToString) -> Self {
        match self {
            AmrError::Graph(info) => AmrError::Graph(info.with_context(key, value)),
            AmrError::Production(info) => AmrError::Production(info.with_context(key, value)),
            AmrError::Driver(info) => AmrError::Driver(info.with_context(key, value)),
            AmrError::Config(info) => AmrError::Config(info.with_context(key, value)),
            AmrError::Serde(info) => AmrError::Serde(info.with_context(key, value)),
        }
    }

    /// Sets the remediation hint regardless of the family.
    pub fn with_hint(self, hint: impl Into<String>) -> Self {
        match self {
            AmrError::Graph(info) => AmrError::Graph(info.with_hint(hint)),
            AmrError::Production(info) => AmrError::Production(info.with_hint(hint)),
            AmrError::Driver(info) => AmrError::Driver(info.with_hint(hint)),
            AmrError::Config(info) => AmrError::Config(info.with_hint(hint)),
            AmrError::Serde(info) => AmrError::Serde(info.with_hint(hint)),
        }
    }
}
