//! Core training engine for the vocabulary trainer.
//!
//! Provides:
//! - Parser for the raw vocabulary entry syntax (meanings, gender
//!   variants, annotation)
//! - Answer normalization (case, accent, punctuation, article stripping)
//! - Answer evaluation with mastery tracking
//! - Question scheduling with anti-repetition windows
//!
//! All operations here are pure; persistence is the store's concern.

pub mod error;
pub mod evaluate;
pub mod normalize;
pub mod parser;
pub mod schedule;
pub mod types;

pub use error::ConfigError;
pub use evaluate::{evaluate, Evaluation};
pub use normalize::{normalize, strip_accents, strip_leading_article, NormalizeOptions};
pub use parser::{parse, ParsedWord};
pub use schedule::{next_question, next_question_with_rng, Stage};
pub use types::{
    Direction, Question, Training, TrainingConfig, TrainingItem, TrainingMode, VocabList,
    WordEntry,
};
