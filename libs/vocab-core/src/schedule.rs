//! Question selection for a training.
//!
//! Selection runs an ordered list of stages over a randomized view of the
//! item pool; the first stage with an eligible candidate wins. The
//! same-word recency window is global: both directions of one word share
//! the window, so asking one direction blocks the other for
//! `min_distance` turns.

use crate::types::{Question, Training};
use rand::seq::SliceRandom;
use rand::Rng;

/// Selection stages, evaluated in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Unmastered items whose last presentation lies at least
    /// `min_distance` turns back.
    OverdueRepeat,
    /// Unmastered items that were never presented.
    Introduce,
    /// Any unmastered item, ignoring distance constraints. Guarantees
    /// progress when the window blocks everything else.
    Fallback,
}

const STAGES: [Stage; 3] = [Stage::OverdueRepeat, Stage::Introduce, Stage::Fallback];

impl Stage {
    fn admits(&self, training: &Training, question: &Question, recency: &RecencyIndex) -> bool {
        let item = &question.item;
        if item.is_mastered(training.required_correct) {
            return false;
        }
        match self {
            Stage::OverdueRepeat => {
                let Some(last) = item.last_asked() else {
                    return false;
                };
                last + training.min_distance <= training.turn_counter
                    && !recency.word_within_window(item.word_id, training.min_distance)
            }
            Stage::Introduce => {
                item.history.is_empty()
                    && !recency.word_within_window(item.word_id, training.min_distance)
            }
            Stage::Fallback => true,
        }
    }
}

/// Global presentation order rebuilt from all item histories. Turn indices
/// are globally unique, so every history entry contributes one entry.
struct RecencyIndex {
    /// (turn, word id), ascending by turn.
    entries: Vec<(u32, i64)>,
}

impl RecencyIndex {
    fn build(pool: &[Question]) -> Self {
        let mut entries: Vec<(u32, i64)> = pool
            .iter()
            .flat_map(|question| {
                question
                    .item
                    .history
                    .iter()
                    .map(|&turn| (turn, question.item.word_id))
            })
            .collect();
        entries.sort_unstable_by_key(|&(turn, _)| turn);
        Self { entries }
    }

    /// Whether the word appears among the `window` most recent turns.
    fn word_within_window(&self, word_id: i64, window: u32) -> bool {
        let mut seen = 0;
        for &(_, entry_word) in self.entries.iter().rev() {
            if seen == window {
                break;
            }
            if entry_word == word_id {
                return true;
            }
            seen += 1;
        }
        false
    }
}

/// Pick the next question to present, or `None` when every item has
/// reached mastery.
pub fn next_question<'a>(training: &Training, pool: &'a [Question]) -> Option<&'a Question> {
    next_question_with_rng(training, pool, &mut rand::thread_rng())
}

/// Like [`next_question`] with an injected random source, for
/// deterministic selection among equally eligible candidates.
pub fn next_question_with_rng<'a, R: Rng + ?Sized>(
    training: &Training,
    pool: &'a [Question],
    rng: &mut R,
) -> Option<&'a Question> {
    let recency = RecencyIndex::build(pool);

    let mut order: Vec<usize> = (0..pool.len()).collect();
    order.shuffle(rng);

    for stage in STAGES {
        for &index in &order {
            let question = &pool[index];
            if stage.admits(training, question, &recency) {
                return Some(question);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Direction, TrainingItem, TrainingMode};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn training(turn_counter: u32, required_correct: u32, min_distance: u32) -> Training {
        Training {
            id: 1,
            name: "Test".into(),
            mode: TrainingMode::Both,
            turn_counter,
            required_correct,
            consecutive_required: false,
            min_distance,
            ignore_case: false,
            ignore_accent: false,
            ignore_punctuation: false,
            ignore_article_lang1: false,
            ignore_article_lang2: false,
            require_only_one_meaning: false,
        }
    }

    fn question(
        id: i64,
        word_id: i64,
        direction: Direction,
        history: Vec<u32>,
        correct_count: u32,
    ) -> Question {
        Question {
            item: TrainingItem {
                id,
                training_id: 1,
                word_id,
                direction,
                history,
                correct_count,
            },
            word1: format!("w{}a", word_id),
            word2: format!("w{}b", word_id),
            lang1: "en".into(),
            lang2: "es".into(),
        }
    }

    fn pick(training: &Training, pool: &[Question]) -> Option<i64> {
        let mut rng = StdRng::seed_from_u64(7);
        next_question_with_rng(training, pool, &mut rng).map(|q| q.item.id)
    }

    #[test]
    fn empty_pool_yields_none() {
        assert_eq!(pick(&training(0, 1, 0), &[]), None);
    }

    #[test]
    fn mastered_items_are_never_selected() {
        let pool = vec![
            question(1, 1, Direction::AtoB, vec![1], 2),
            question(2, 2, Direction::AtoB, vec![2], 1),
        ];
        let training = training(2, 2, 0);
        // Only item 2 is unmastered.
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked = next_question_with_rng(&training, &pool, &mut rng).unwrap();
            assert_eq!(picked.item.id, 2);
        }
    }

    #[test]
    fn none_only_when_everything_is_mastered() {
        let pool = vec![
            question(1, 1, Direction::AtoB, vec![1], 2),
            question(2, 2, Direction::AtoB, vec![2], 2),
        ];
        assert_eq!(pick(&training(2, 2, 0), &pool), None);
    }

    #[test]
    fn overdue_repeat_beats_unseen() {
        let pool = vec![
            question(1, 1, Direction::AtoB, vec![1], 0),
            question(2, 2, Direction::AtoB, vec![2, 3], 2),
            question(3, 3, Direction::AtoB, vec![], 0),
        ];
        // Item 1 was asked at turn 1; at turn 3 with distance 2 it is due
        // again and stage 1 takes it before the unseen item.
        let training = training(3, 2, 2);
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked = next_question_with_rng(&training, &pool, &mut rng).unwrap();
            assert_eq!(picked.item.id, 1);
        }
    }

    #[test]
    fn item_within_window_is_not_repeated() {
        let pool = vec![
            question(1, 1, Direction::AtoB, vec![5], 0),
            question(2, 2, Direction::AtoB, vec![], 0),
        ];
        // Item 1 was just asked at turn 5; with distance 2 only the unseen
        // item is eligible at turn 5.
        let training = training(5, 3, 2);
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked = next_question_with_rng(&training, &pool, &mut rng).unwrap();
            assert_eq!(picked.item.id, 2);
        }
    }

    #[test]
    fn sibling_direction_shares_the_window() {
        // Word 1 was just asked in one direction; its other direction is
        // unseen but blocked by the shared word window, so word 2 wins.
        let pool = vec![
            question(1, 1, Direction::AtoB, vec![5], 0),
            question(2, 1, Direction::BtoA, vec![], 0),
            question(3, 2, Direction::AtoB, vec![], 0),
        ];
        let training = training(5, 3, 2);
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked = next_question_with_rng(&training, &pool, &mut rng).unwrap();
            assert_eq!(picked.item.id, 3);
        }
    }

    #[test]
    fn fallback_surfaces_blocked_items() {
        // Both directions of the only word are inside the window; the
        // fallback stage still returns one of them.
        let pool = vec![
            question(1, 1, Direction::AtoB, vec![5], 0),
            question(2, 1, Direction::BtoA, vec![], 0),
        ];
        let training = training(5, 3, 2);
        assert!(pick(&training, &pool).is_some());
    }

    #[test]
    fn distance_window_counts_other_turns() {
        // Item 1 asked at turn 3; turns 4 and 5 went to other words. With
        // distance 2 the window holds turns 4 and 5, so item 1 is due.
        let pool = vec![
            question(1, 1, Direction::AtoB, vec![3], 0),
            question(2, 2, Direction::AtoB, vec![4], 1),
            question(3, 3, Direction::AtoB, vec![5], 1),
        ];
        let training = training(5, 1, 2);
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked = next_question_with_rng(&training, &pool, &mut rng).unwrap();
            assert_eq!(picked.item.id, 1);
        }
    }

    #[test]
    fn zero_distance_allows_immediate_repeat() {
        let pool = vec![question(1, 1, Direction::AtoB, vec![5], 0)];
        let training = training(5, 3, 0);
        assert_eq!(pick(&training, &pool), Some(1));
    }
}
