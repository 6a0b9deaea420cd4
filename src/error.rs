//! Unified error types for the migration core
//!
//! This module defines error types that:
//! - Are serializable so a driving process can report them verbatim
//! - Distinguish recoverable field-level failures from fatal merge conflicts
//! - Map internal errors to actionable variants

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Migration error type for parsers, builders and the filter merge engine
///
/// Most variants are recoverable by the caller (skip the entity, omit the
/// field). `ActiveRuleConflict` is the exception: it means the filter merge
/// cannot proceed without clobbering a live rule, and the run must stop.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum MigrateError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Mapping error: {0}")]
    Mapping(String),

    #[error("Active rule conflict: {0}")]
    ActiveRuleConflict(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(String),
}

// Implement From for common error types

impl From<std::io::Error> for MigrateError {
    fn from(err: std::io::Error) -> Self {
        MigrateError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for MigrateError {
    fn from(err: toml::de::Error) -> Self {
        MigrateError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for MigrateError {
    fn from(err: serde_json::Error) -> Self {
        MigrateError::Parse(err.to_string())
    }
}

impl From<quick_xml::Error> for MigrateError {
    fn from(err: quick_xml::Error) -> Self {
        MigrateError::Parse(err.to_string())
    }
}

/// Result type alias using MigrateError
pub type Result<T> = std::result::Result<T, MigrateError>;
