//! Error types for report generation
//!
//! Faults fall into four groups that decide how a run ends: configuration and
//! environment faults are always fatal, acquisition faults are fatal unless
//! errors are being ignored, and a document that cannot be written stops the run.

use std::time::Duration;
use thiserror::Error;

/// Failure to run a single external command
#[derive(Debug, Error)]
pub enum ExecError {
    /// The command did not finish before its deadline and was killed
    #[error("command timeout of {0:?} exceeded")]
    Timeout(Duration),

    /// The shell could not be started
    #[error("failed to spawn command: {0}")]
    Spawn(#[source] std::io::Error),

    /// Output could not be collected or the process could not be awaited
    #[error("failed to communicate with command: {0}")]
    Io(#[source] std::io::Error),
}

/// Structural problem in the section outline
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("{path}: expected an object")]
    NotAnObject { path: String },

    #[error("{path}: required key \"{key}\" missing")]
    MissingKey { path: String, key: &'static str },

    #[error("{path}: invalid key \"{key}\"")]
    InvalidKey { path: String, key: String },

    #[error("{path}: key \"{key}\" must be {expected}")]
    WrongType {
        path: String,
        key: &'static str,
        expected: &'static str,
    },

    #[error("{path}: key \"host\" requires \"cmd\" or \"nmc\"")]
    OrphanHost { path: String },
}

/// Top-level fault for a report run
#[derive(Debug, Error)]
pub enum ReportError {
    /// Outline or settings missing, malformed, or violating the schema
    #[error("configuration error: {0}")]
    Config(String),

    /// A section's body could not be acquired
    #[error("acquisition failed in section \"{section}\" for {target}: {reason}")]
    Acquisition {
        section: String,
        target: String,
        reason: String,
    },

    /// A precondition of the run does not hold
    #[error("environment error: {0}")]
    Environment(String),

    /// The report document could not be written
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SchemaError> for ReportError {
    fn from(err: SchemaError) -> Self {
        ReportError::Config(err.to_string())
    }
}

impl From<figment::Error> for ReportError {
    fn from(err: figment::Error) -> Self {
        ReportError::Config(err.to_string())
    }
}
