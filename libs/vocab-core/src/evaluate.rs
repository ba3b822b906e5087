//! Answer evaluation and mastery tracking.
//!
//! Pure over its inputs: the caller receives the updated item and turn
//! counter and is responsible for committing both atomically.

use crate::normalize::{normalize, strip_leading_article, NormalizeOptions};
use crate::parser::parse;
use crate::types::{Question, Training, TrainingItem};

/// Outcome of evaluating one submitted answer.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub is_correct: bool,
    /// Item with updated history and correct counter.
    pub item: TrainingItem,
    /// The training's turn counter after this answer.
    pub turn_counter: u32,
}

/// Evaluate a submitted answer against the correct side of the question.
pub fn evaluate(training: &Training, question: &Question, answer: &str) -> Evaluation {
    let options = NormalizeOptions::from(training);
    let strip_articles = question.answer_article_ignored(training);
    let answer_lang = question.answer_lang();

    let candidates: Vec<String> = split_candidates(answer)
        .iter()
        .map(|candidate| normalize(candidate, &options))
        .collect();

    let correct = parse(question.answer_text());
    let num_satisfied = correct
        .meanings
        .iter()
        .filter(|variants| {
            variants.iter().all(|variant| {
                let mut variant = variant.as_str();
                if strip_articles {
                    variant = strip_leading_article(variant, answer_lang);
                }
                candidates.contains(&normalize(variant, &options))
            })
        })
        .count();

    let is_correct = num_satisfied == correct.meanings.len()
        || (num_satisfied > 0 && training.require_only_one_meaning);

    let mut item = question.item.clone();
    if training.consecutive_required && item.correct_count > 0 && !is_correct {
        // One wrong answer erases the streak.
        item.correct_count = 0;
    }
    if is_correct {
        item.correct_count += 1;
    }

    let turn_counter = training.turn_counter + 1;
    item.history.push(turn_counter);

    Evaluation {
        is_correct,
        item,
        turn_counter,
    }
}

/// Split a submitted answer into candidate tokens: one per comma, plus the
/// whole trimmed answer to cover correct forms that contain a comma.
fn split_candidates(answer: &str) -> Vec<String> {
    let mut candidates: Vec<String> = answer.split(',').map(str::to_string).collect();
    candidates.push(answer.trim().to_string());
    candidates
        .iter()
        .map(|candidate| candidate.trim().to_string())
        .filter(|candidate| !candidate.is_empty())
        .collect()
}
