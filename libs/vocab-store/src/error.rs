//! Store error types.

use thiserror::Error;
use vocab_core::ConfigError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("list not found: {0}")]
    ListNotFound(i64),

    #[error("training not found: {0}")]
    TrainingNotFound(i64),

    #[error("training item not found: {0}")]
    ItemNotFound(i64),

    #[error("list with name '{0}' already exists")]
    DuplicateListName(String),

    #[error("training with name '{0}' already exists")]
    DuplicateTrainingName(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
