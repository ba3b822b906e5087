//! SQLite-backed persistence for lists, words and trainings.
//!
//! The engine entry points `next_question` and `evaluate_answer` live
//! here: they load the joined item pool, delegate to vocab-core and commit
//! the resulting state in one transaction.

use crate::error::{Result, StoreError};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use vocab_core::error::ConfigError;
use vocab_core::types::{
    Direction, Question, Training, TrainingConfig, TrainingItem, TrainingMode, VocabList,
    WordEntry,
};

/// A new word entry to insert.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewWord {
    pub word1: String,
    pub word2: String,
}

impl NewWord {
    fn is_blank(&self) -> bool {
        self.word1.trim().is_empty() || self.word2.trim().is_empty()
    }
}

/// An update to an existing word. Blanking either side deletes the word
/// and every training item referencing it.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct WordUpdate {
    pub id: i64,
    pub word1: String,
    pub word2: String,
}

/// List with its word count.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ListSummary {
    pub id: i64,
    pub name: String,
    pub lang1: String,
    pub lang2: String,
    pub word_count: usize,
}

/// Progress counters of a training.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TrainingStats {
    /// Distinct words in the training.
    pub num_words: usize,
    /// Items times required correct answers.
    pub num_questions: usize,
    /// Sum of all item correct counters.
    pub num_correct: i64,
    /// Turns spent minus correct answers.
    pub num_wrong: i64,
}

/// Result of evaluating a submitted answer.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AnswerResult {
    pub is_correct: bool,
    /// The question with its updated item state.
    pub question: Question,
}

/// SQLite store for the vocabulary trainer.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open database at path, creating the schema if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(crate::schema::SCHEMA)?;
        Ok(())
    }

    /// Create a new list.
    pub fn add_list(&mut self, name: &str, lang1: &str, lang2: &str) -> Result<i64> {
        let tx = self.conn.transaction()?;
        let list_id = insert_list(&tx, name, lang1, lang2)?;
        tx.commit()?;
        tracing::info!("Created list {}: {}", list_id, name.trim());
        Ok(list_id)
    }

    /// Create a new list together with its words.
    pub fn add_list_with_words(
        &mut self,
        name: &str,
        lang1: &str,
        lang2: &str,
        words: &[NewWord],
    ) -> Result<i64> {
        let tx = self.conn.transaction()?;
        let list_id = insert_list(&tx, name, lang1, lang2)?;
        insert_words(&tx, list_id, words)?;
        tx.commit()?;
        tracing::info!("Created list {} with {} words", list_id, words.len());
        Ok(list_id)
    }

    /// Rename a list or change its language labels.
    pub fn update_list(&mut self, id: i64, name: &str, lang1: &str, lang2: &str) -> Result<()> {
        let tx = self.conn.transaction()?;
        update_list_row(&tx, id, name, lang1, lang2)?;
        tx.commit()?;
        Ok(())
    }

    /// Update a list and its words in one transaction. Updates with a
    /// blank side delete the word; `new_words` are appended.
    pub fn update_list_with_words(
        &mut self,
        id: i64,
        name: &str,
        lang1: &str,
        lang2: &str,
        updates: &[WordUpdate],
        new_words: &[NewWord],
    ) -> Result<()> {
        let tx = self.conn.transaction()?;
        fetch_list(&tx, id)?;
        update_list_row(&tx, id, name, lang1, lang2)?;
        apply_word_updates(&tx, updates)?;
        insert_words(&tx, id, new_words)?;
        tx.commit()?;
        Ok(())
    }

    /// Delete a list, its words and their training items.
    pub fn delete_list(&mut self, list_id: i64) -> Result<()> {
        let tx = self.conn.transaction()?;
        fetch_list(&tx, list_id)?;
        delete_list_words(&tx, list_id)?;
        tx.execute("DELETE FROM lists WHERE id = ?1", params![list_id])?;
        tx.commit()?;
        tracing::info!("Deleted list {}", list_id);
        Ok(())
    }

    /// Get a single list.
    pub fn get_list(&self, list_id: i64) -> Result<VocabList> {
        fetch_list(&self.conn, list_id)
    }

    /// Get all lists ordered by name, with word counts.
    pub fn get_lists(&self) -> Result<Vec<ListSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT l.id, l.name, l.lang1, l.lang2,
                (SELECT COUNT(*) FROM words w WHERE w.list_id = l.id) AS word_count
            FROM lists l
            ORDER BY l.name",
        )?;
        let lists = stmt
            .query_map([], |row| {
                Ok(ListSummary {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    lang1: row.get(2)?,
                    lang2: row.get(3)?,
                    word_count: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(lists)
    }

    /// Add words to a list. Entries with a blank side are skipped.
    pub fn add_words(&mut self, list_id: i64, words: &[NewWord]) -> Result<()> {
        let tx = self.conn.transaction()?;
        fetch_list(&tx, list_id)?;
        insert_words(&tx, list_id, words)?;
        tx.commit()?;
        Ok(())
    }

    /// Update existing words. Blanking a side deletes the word and its
    /// training items.
    pub fn update_words(&mut self, updates: &[WordUpdate]) -> Result<()> {
        let tx = self.conn.transaction()?;
        apply_word_updates(&tx, updates)?;
        tx.commit()?;
        Ok(())
    }

    /// Get all words of a list in insertion order.
    pub fn get_words(&self, list_id: i64) -> Result<Vec<WordEntry>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, list_id, word1, word2 FROM words WHERE list_id = ?1 ORDER BY id")?;
        let words = stmt
            .query_map(params![list_id], |row| {
                Ok(WordEntry {
                    id: row.get(0)?,
                    list_id: row.get(1)?,
                    word1: row.get(2)?,
                    word2: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(words)
    }

    /// Delete all words of a list and their training items.
    pub fn delete_words(&mut self, list_id: i64) -> Result<()> {
        let tx = self.conn.transaction()?;
        delete_list_words(&tx, list_id)?;
        tx.commit()?;
        Ok(())
    }

    /// Create a training and materialize its items from the current words
    /// of the given lists, atomically. Words added to a list later are not
    /// picked up by existing trainings.
    pub fn add_training(&mut self, config: &TrainingConfig, list_ids: &[i64]) -> Result<i64> {
        config.validate()?;
        let name = config.name.trim();

        let tx = self.conn.transaction()?;
        let existing: Option<i64> = tx
            .query_row(
                "SELECT id FROM trainings WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;
        if existing.is_some() {
            return Err(StoreError::DuplicateTrainingName(name.to_string()));
        }

        tx.execute(
            "INSERT INTO trainings (name, mode, required_correct, consecutive_required,
                min_distance, ignore_case, ignore_accent, ignore_punctuation,
                ignore_article_lang1, ignore_article_lang2, require_only_one_meaning, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                name,
                config.mode.as_str(),
                config.required_correct,
                config.consecutive_required,
                config.min_distance,
                config.ignore_case,
                config.ignore_accent,
                config.ignore_punctuation,
                config.ignore_article_lang1,
                config.ignore_article_lang2,
                config.require_only_one_meaning,
                Utc::now().to_rfc3339(),
            ],
        )?;
        let training_id = tx.last_insert_rowid();

        let mut num_items = 0usize;
        for &list_id in list_ids {
            fetch_list(&tx, list_id)?;
            let mut stmt =
                tx.prepare("SELECT id, word1, word2 FROM words WHERE list_id = ?1 ORDER BY id")?;
            let words = stmt
                .query_map(params![list_id], |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            for (word_id, word1, word2) in words {
                if word1.trim().is_empty() || word2.trim().is_empty() {
                    continue;
                }
                for direction in config.mode.directions() {
                    tx.execute(
                        "INSERT INTO training_items (training_id, word_id, direction)
                         VALUES (?1, ?2, ?3)",
                        params![training_id, word_id, direction.as_str()],
                    )?;
                    num_items += 1;
                }
            }
        }
        tx.commit()?;
        tracing::info!(
            "Created training {} '{}' with {} items",
            training_id,
            name,
            num_items
        );
        Ok(training_id)
    }

    /// Get a single training.
    pub fn get_training(&self, training_id: i64) -> Result<Training> {
        fetch_training(&self.conn, training_id)
    }

    /// Get all trainings ordered by name.
    pub fn get_trainings(&self) -> Result<Vec<Training>> {
        let mut stmt = self.conn.prepare("SELECT id FROM trainings ORDER BY name")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, i64>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        ids.into_iter()
            .map(|id| fetch_training(&self.conn, id))
            .collect()
    }

    /// Progress counters of a training.
    pub fn get_training_stats(&self, training_id: i64) -> Result<TrainingStats> {
        let training = fetch_training(&self.conn, training_id)?;
        let (num_words, num_items, num_correct) = self.conn.query_row(
            "SELECT
                COUNT(DISTINCT word_id),
                COUNT(*),
                COALESCE(SUM(correct_count), 0)
            FROM training_items
            WHERE training_id = ?1",
            params![training_id],
            |row| {
                Ok((
                    row.get::<_, usize>(0)?,
                    row.get::<_, usize>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            },
        )?;
        Ok(TrainingStats {
            num_words,
            num_questions: num_items * training.required_correct as usize,
            num_correct,
            num_wrong: i64::from(training.turn_counter) - num_correct,
        })
    }

    /// Delete a training and its items.
    pub fn delete_training(&mut self, training_id: i64) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM training_items WHERE training_id = ?1",
            params![training_id],
        )?;
        tx.execute("DELETE FROM trainings WHERE id = ?1", params![training_id])?;
        tx.commit()?;
        tracing::info!("Deleted training {}", training_id);
        Ok(())
    }

    /// Get the full item pool of a training, joined with word text and
    /// language labels.
    pub fn get_questions(&self, training_id: i64) -> Result<Vec<Question>> {
        fetch_training(&self.conn, training_id)?;
        fetch_questions(&self.conn, training_id)
    }

    /// Pick the next question to present, or `None` when the training is
    /// complete.
    pub fn next_question(&self, training_id: i64) -> Result<Option<Question>> {
        let training = fetch_training(&self.conn, training_id)?;
        let pool = fetch_questions(&self.conn, training_id)?;
        Ok(vocab_core::next_question(&training, &pool).cloned())
    }

    /// Evaluate a submitted answer. Persists the item's history and
    /// counter and advances the training's turn counter as one atomic
    /// write.
    pub fn evaluate_answer(
        &mut self,
        training_id: i64,
        item_id: i64,
        answer: &str,
    ) -> Result<AnswerResult> {
        let tx = self.conn.transaction()?;
        let training = fetch_training(&tx, training_id)?;
        let mut question = fetch_question(&tx, item_id)?;

        let evaluation = vocab_core::evaluate(&training, &question, answer);

        tx.execute(
            "UPDATE training_items SET history = ?1, correct_count = ?2 WHERE id = ?3",
            params![
                encode_history(&evaluation.item.history),
                evaluation.item.correct_count,
                item_id
            ],
        )?;
        tx.execute(
            "UPDATE trainings SET turn_counter = turn_counter + 1 WHERE id = ?1",
            params![training_id],
        )?;
        tx.commit()?;

        tracing::debug!(
            "Evaluated item {} of training {}: correct={} turn={}",
            item_id,
            training_id,
            evaluation.is_correct,
            evaluation.turn_counter
        );
        question.item = evaluation.item;
        Ok(AnswerResult {
            is_correct: evaluation.is_correct,
            question,
        })
    }
}

fn insert_list(conn: &Connection, name: &str, lang1: &str, lang2: &str) -> Result<i64> {
    let name = name.trim();
    let lang1 = lang1.trim();
    let lang2 = lang2.trim();
    if name.is_empty() {
        return Err(ConfigError::EmptyField("name").into());
    }
    if lang1.is_empty() {
        return Err(ConfigError::EmptyField("lang1").into());
    }
    if lang2.is_empty() {
        return Err(ConfigError::EmptyField("lang2").into());
    }

    let existing: Option<i64> = conn
        .query_row("SELECT id FROM lists WHERE name = ?1", params![name], |row| {
            row.get(0)
        })
        .optional()?;
    if existing.is_some() {
        return Err(StoreError::DuplicateListName(name.to_string()));
    }

    conn.execute(
        "INSERT INTO lists (name, lang1, lang2, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![name, lang1, lang2, Utc::now().to_rfc3339()],
    )?;
    Ok(conn.last_insert_rowid())
}

fn update_list_row(conn: &Connection, id: i64, name: &str, lang1: &str, lang2: &str) -> Result<()> {
    let name = name.trim();
    let lang1 = lang1.trim();
    let lang2 = lang2.trim();
    if name.is_empty() {
        return Err(ConfigError::EmptyField("name").into());
    }
    if lang1.is_empty() {
        return Err(ConfigError::EmptyField("lang1").into());
    }
    if lang2.is_empty() {
        return Err(ConfigError::EmptyField("lang2").into());
    }

    let existing: Option<i64> = conn
        .query_row("SELECT id FROM lists WHERE name = ?1", params![name], |row| {
            row.get(0)
        })
        .optional()?;
    if let Some(other) = existing {
        if other != id {
            return Err(StoreError::DuplicateListName(name.to_string()));
        }
    }

    let changed = conn.execute(
        "UPDATE lists SET name = ?1, lang1 = ?2, lang2 = ?3 WHERE id = ?4",
        params![name, lang1, lang2, id],
    )?;
    if changed == 0 {
        return Err(StoreError::ListNotFound(id));
    }
    Ok(())
}

fn insert_words(conn: &Connection, list_id: i64, words: &[NewWord]) -> Result<()> {
    let mut stmt =
        conn.prepare("INSERT INTO words (list_id, word1, word2) VALUES (?1, ?2, ?3)")?;
    for word in words {
        if word.is_blank() {
            continue;
        }
        stmt.execute(params![list_id, word.word1, word.word2])?;
    }
    Ok(())
}

fn apply_word_updates(conn: &Connection, updates: &[WordUpdate]) -> Result<()> {
    for update in updates {
        if update.word1.trim().is_empty() || update.word2.trim().is_empty() {
            conn.execute(
                "DELETE FROM training_items WHERE word_id = ?1",
                params![update.id],
            )?;
            conn.execute("DELETE FROM words WHERE id = ?1", params![update.id])?;
        } else {
            conn.execute(
                "UPDATE words SET word1 = ?1, word2 = ?2 WHERE id = ?3",
                params![update.word1, update.word2, update.id],
            )?;
        }
    }
    Ok(())
}

fn delete_list_words(conn: &Connection, list_id: i64) -> Result<()> {
    conn.execute(
        "DELETE FROM training_items WHERE word_id IN
            (SELECT id FROM words WHERE list_id = ?1)",
        params![list_id],
    )?;
    conn.execute("DELETE FROM words WHERE list_id = ?1", params![list_id])?;
    Ok(())
}

fn fetch_list(conn: &Connection, list_id: i64) -> Result<VocabList> {
    conn.query_row(
        "SELECT id, name, lang1, lang2 FROM lists WHERE id = ?1",
        params![list_id],
        |row| {
            Ok(VocabList {
                id: row.get(0)?,
                name: row.get(1)?,
                lang1: row.get(2)?,
                lang2: row.get(3)?,
            })
        },
    )
    .optional()?
    .ok_or(StoreError::ListNotFound(list_id))
}

fn fetch_training(conn: &Connection, training_id: i64) -> Result<Training> {
    let row = conn
        .query_row(
            "SELECT id, name, mode, turn_counter, required_correct, consecutive_required,
                min_distance, ignore_case, ignore_accent, ignore_punctuation,
                ignore_article_lang1, ignore_article_lang2, require_only_one_meaning
            FROM trainings WHERE id = ?1",
            params![training_id],
            |row| {
                Ok((
                    Training {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        mode: TrainingMode::Both,
                        turn_counter: row.get(3)?,
                        required_correct: row.get(4)?,
                        consecutive_required: row.get(5)?,
                        min_distance: row.get(6)?,
                        ignore_case: row.get(7)?,
                        ignore_accent: row.get(8)?,
                        ignore_punctuation: row.get(9)?,
                        ignore_article_lang1: row.get(10)?,
                        ignore_article_lang2: row.get(11)?,
                        require_only_one_meaning: row.get(12)?,
                    },
                    row.get::<_, String>(2)?,
                ))
            },
        )
        .optional()?;
    let (training, mode) = row.ok_or(StoreError::TrainingNotFound(training_id))?;
    let mode = TrainingMode::from_str(&mode).ok_or(ConfigError::UnknownMode(mode))?;
    Ok(Training { mode, ..training })
}

const QUESTION_SELECT: &str = "SELECT
        i.id, i.training_id, i.word_id, i.direction, i.history, i.correct_count,
        w.word1, w.word2, l.lang1, l.lang2
    FROM training_items i
    INNER JOIN words w ON w.id = i.word_id
    INNER JOIN lists l ON l.id = w.list_id";

type QuestionRow = (i64, i64, i64, String, String, u32, String, String, String, String);

fn question_row(row: &rusqlite::Row) -> rusqlite::Result<QuestionRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
        row.get(9)?,
    ))
}

fn question_from_row(row: QuestionRow) -> Result<Question> {
    let (id, training_id, word_id, direction, history, correct_count, word1, word2, lang1, lang2) =
        row;
    let direction = Direction::from_str(&direction).ok_or(ConfigError::UnknownMode(direction))?;
    Ok(Question {
        item: TrainingItem {
            id,
            training_id,
            word_id,
            direction,
            history: decode_history(&history),
            correct_count,
        },
        word1,
        word2,
        lang1,
        lang2,
    })
}

fn fetch_questions(conn: &Connection, training_id: i64) -> Result<Vec<Question>> {
    let sql = format!("{} WHERE i.training_id = ?1 ORDER BY i.id", QUESTION_SELECT);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![training_id], question_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    rows.into_iter().map(question_from_row).collect()
}

fn fetch_question(conn: &Connection, item_id: i64) -> Result<Question> {
    let sql = format!("{} WHERE i.id = ?1", QUESTION_SELECT);
    let row = conn
        .query_row(&sql, params![item_id], question_row)
        .optional()?
        .ok_or(StoreError::ItemNotFound(item_id))?;
    question_from_row(row)
}

fn encode_history(history: &[u32]) -> String {
    history
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn decode_history(raw: &str) -> Vec<u32> {
    raw.split(',')
        .filter_map(|part| part.trim().parse().ok())
        .collect()
}
