//! Error types for vocab-core.
//!
//! Entry parsing deliberately has no error path (malformed syntax degrades
//! to best effort), so the only failures originating here are configuration
//! ones.

use thiserror::Error;

/// Invalid list or training configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("unknown training mode: '{0}'")]
    UnknownMode(String),
}
