//! Structured error types shared across JTH crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`JthError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (keys, paths, dimensions, etc.).
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

/// Canonical error type for table lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum JthError {
    /// A variable name, declared type or origin could not be bound.
    #[error("unsupported configuration: {0}")]
    Unsupported(ErrorInfo),
    /// The lookup table could not be loaded from its source.
    #[error("table load error: {0}")]
    TableLoad(ErrorInfo),
    /// Axis count or table dimensionality problems.
    #[error("dimension error: {0}")]
    Dimension(ErrorInfo),
    /// Event context key lookups and insertions.
    #[error("context error: {0}")]
    Context(ErrorInfo),
    /// Auxiliary jet attribute lookups and insertions.
    #[error("attribute error: {0}")]
    Attribute(ErrorInfo),
    /// Misuse of the input state machine.
    #[error("lifecycle error: {0}")]
    Lifecycle(ErrorInfo),
    /// Invalid table construction or bin addressing.
    #[error("table error: {0}")]
    Table(ErrorInfo),
    /// Serialization and configuration decoding errors.
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

impl JthError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            JthError::Unsupported(info)
            | JthError::TableLoad(info)
            | JthError::Dimension(info)
            | JthError::Context(info)
            | JthError::Attribute(info)
            | JthError::Lifecycle(info)
            | JthError::Table(info)
            | JthError::Serde(info) => info,
        }
    }

    /// Shorthand for the stable code of the payload.
    pub fn code(&self) -> &str {
        &self.info().code
    }

    /// Rewrites the payload while keeping the error family.
    pub fn map_info(self, f: impl FnOnce(ErrorInfo) -> ErrorInfo) -> JthError {
        match self {
            JthError::Unsupported(info) => JthError::Unsupported(f(info)),
            JthError::TableLoad(info) => JthError::TableLoad(f(info)),
            JthError::Dimension(info) => JthError::Dimension(f(info)),
            JthError::Context(info) => JthError::Context(f(info)),
            JthError::Attribute(info) => JthError::Attribute(f(info)),
            JthError::Lifecycle(info) => JthError::Lifecycle(f(info)),
            JthError::Table(info) => JthError::Table(f(info)),
            JthError::Serde(info) => JthError::Serde(f(info)),
        }
    }
}
