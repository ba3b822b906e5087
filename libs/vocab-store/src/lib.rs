//! SQLite persistence layer for the vocabulary trainer.
//!
//! Owns the schema, list/word CRUD, training creation with item
//! materialization, and the transactional engine entry points used by a
//! presentation layer.

pub mod error;
pub mod schema;
pub mod store;

pub use error::{Result, StoreError};
pub use store::{AnswerResult, ListSummary, NewWord, SqliteStore, TrainingStats, WordUpdate};
