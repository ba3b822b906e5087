//! Core types for the vocabulary trainer.

use serde::{Deserialize, Serialize};

/// Direction of a single question: which side is shown and which is asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Show side 1, ask for side 2.
    AtoB,
    /// Show side 2, ask for side 1.
    BtoA,
}

impl Direction {
    /// Get the direction as its stored string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AtoB => "1->2",
            Self::BtoA => "2->1",
        }
    }

    /// Parse from stored string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "1->2" => Some(Self::AtoB),
            "2->1" => Some(Self::BtoA),
            _ => None,
        }
    }
}

/// Training mode: single direction or both directions per word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingMode {
    AtoB,
    BtoA,
    Both,
}

impl Default for TrainingMode {
    fn default() -> Self {
        Self::Both
    }
}

impl TrainingMode {
    /// Get the mode as its stored string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AtoB => "1->2",
            Self::BtoA => "2->1",
            Self::Both => "1<->2",
        }
    }

    /// Parse from stored string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "1->2" => Some(Self::AtoB),
            "2->1" => Some(Self::BtoA),
            "1<->2" => Some(Self::Both),
            _ => None,
        }
    }

    /// Directions materialized for one word under this mode.
    pub fn directions(&self) -> &'static [Direction] {
        match self {
            Self::AtoB => &[Direction::AtoB],
            Self::BtoA => &[Direction::BtoA],
            Self::Both => &[Direction::AtoB, Direction::BtoA],
        }
    }
}

/// A word list pairing two languages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabList {
    pub id: i64,
    pub name: String,
    /// Display label of the first language, also keys the article table.
    pub lang1: String,
    pub lang2: String,
}

/// One vocabulary entry of a list. Both sides hold raw entry syntax
/// (meanings separated by `|`, gender variants by `/`, annotation in
/// parentheses).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordEntry {
    pub id: i64,
    pub list_id: i64,
    pub word1: String,
    pub word2: String,
}

impl WordEntry {
    /// An entry with a blank side counts as deleted and is skipped when
    /// materializing training items.
    pub fn is_blank(&self) -> bool {
        self.word1.trim().is_empty() || self.word2.trim().is_empty()
    }
}

/// Settings for a new training. Ids and the turn counter are assigned by
/// the store on creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub name: String,
    pub mode: TrainingMode,
    pub required_correct: u32,
    pub consecutive_required: bool,
    pub min_distance: u32,
    pub ignore_case: bool,
    pub ignore_accent: bool,
    pub ignore_punctuation: bool,
    pub ignore_article_lang1: bool,
    pub ignore_article_lang2: bool,
    pub require_only_one_meaning: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            mode: TrainingMode::Both,
            required_correct: 1,
            consecutive_required: true,
            min_distance: 20,
            ignore_case: true,
            ignore_accent: true,
            ignore_punctuation: true,
            ignore_article_lang1: false,
            ignore_article_lang2: true,
            require_only_one_meaning: true,
        }
    }
}

impl TrainingConfig {
    /// Check fields that the type system cannot enforce.
    pub fn validate(&self) -> Result<(), crate::error::ConfigError> {
        if self.name.trim().is_empty() {
            return Err(crate::error::ConfigError::EmptyField("name"));
        }
        Ok(())
    }
}

/// A configured quiz session over the words of one or more lists.
///
/// Immutable after creation except `turn_counter`, which only answer
/// evaluation advances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Training {
    pub id: i64,
    pub name: String,
    pub mode: TrainingMode,
    /// Global turn counter, one increment per evaluated answer.
    pub turn_counter: u32,
    /// Correct answers needed until an item counts as mastered.
    pub required_correct: u32,
    /// Reset an item's counter on a wrong answer.
    pub consecutive_required: bool,
    /// Minimum number of other turns before the same word is asked again.
    pub min_distance: u32,
    pub ignore_case: bool,
    pub ignore_accent: bool,
    pub ignore_punctuation: bool,
    pub ignore_article_lang1: bool,
    pub ignore_article_lang2: bool,
    /// Accept a single meaning when the entry lists several.
    pub require_only_one_meaning: bool,
}

/// One directional quiz instance for one word within a training.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingItem {
    pub id: i64,
    pub training_id: i64,
    pub word_id: i64,
    pub direction: Direction,
    /// 1-based global turn indices at which this item was presented,
    /// append-only.
    pub history: Vec<u32>,
    pub correct_count: u32,
}

impl TrainingItem {
    pub fn is_mastered(&self, required_correct: u32) -> bool {
        self.correct_count >= required_correct
    }

    /// Turn index of the most recent presentation, if any.
    pub fn last_asked(&self) -> Option<u32> {
        self.history.last().copied()
    }
}

/// A training item joined with its word text and list language labels,
/// ready to be scheduled and displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub item: TrainingItem,
    pub word1: String,
    pub word2: String,
    pub lang1: String,
    pub lang2: String,
}

impl Question {
    /// Raw entry text of the shown side.
    pub fn prompt_text(&self) -> &str {
        match self.item.direction {
            Direction::AtoB => &self.word1,
            Direction::BtoA => &self.word2,
        }
    }

    /// Raw entry text of the side the learner has to supply.
    pub fn answer_text(&self) -> &str {
        match self.item.direction {
            Direction::AtoB => &self.word2,
            Direction::BtoA => &self.word1,
        }
    }

    /// Language label of the side the learner has to supply.
    pub fn answer_lang(&self) -> &str {
        match self.item.direction {
            Direction::AtoB => &self.lang2,
            Direction::BtoA => &self.lang1,
        }
    }

    /// Whether the ignore-article flag of the answer side is set.
    pub fn answer_article_ignored(&self, training: &Training) -> bool {
        match self.item.direction {
            Direction::AtoB => training.ignore_article_lang2,
            Direction::BtoA => training.ignore_article_lang1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_round_trips_through_stored_strings() {
        for mode in [TrainingMode::AtoB, TrainingMode::BtoA, TrainingMode::Both] {
            assert_eq!(TrainingMode::from_str(mode.as_str()), Some(mode));
        }
        assert_eq!(TrainingMode::from_str("2<->1"), None);
    }

    #[test]
    fn both_mode_expands_to_two_directions() {
        assert_eq!(TrainingMode::Both.directions().len(), 2);
        assert_eq!(TrainingMode::AtoB.directions(), &[Direction::AtoB]);
    }

    #[test]
    fn blank_word_detection() {
        let word = WordEntry {
            id: 1,
            list_id: 1,
            word1: "casa".into(),
            word2: "  ".into(),
        };
        assert!(word.is_blank());
    }
}
