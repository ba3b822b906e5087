//! SQLite schema definitions.

/// Complete schema for the vocabulary database.
pub const SCHEMA: &str = r#"
-- Word lists pairing two languages
CREATE TABLE IF NOT EXISTS lists (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    lang1 TEXT NOT NULL,
    lang2 TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- Vocabulary entries, raw entry syntax per side
CREATE TABLE IF NOT EXISTS words (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    list_id INTEGER NOT NULL REFERENCES lists(id),
    word1 TEXT NOT NULL,
    word2 TEXT NOT NULL
);

-- Training definitions; turn_counter advances once per evaluated answer
CREATE TABLE IF NOT EXISTS trainings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    mode TEXT NOT NULL,
    turn_counter INTEGER NOT NULL DEFAULT 0,
    required_correct INTEGER NOT NULL,
    consecutive_required INTEGER NOT NULL,
    min_distance INTEGER NOT NULL,
    ignore_case INTEGER NOT NULL,
    ignore_accent INTEGER NOT NULL,
    ignore_punctuation INTEGER NOT NULL,
    ignore_article_lang1 INTEGER NOT NULL,
    ignore_article_lang2 INTEGER NOT NULL,
    require_only_one_meaning INTEGER NOT NULL,
    created_at TEXT NOT NULL
);

-- One directional question per word per training; history holds the
-- comma-joined global turn indices at which the item was presented
CREATE TABLE IF NOT EXISTS training_items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    training_id INTEGER NOT NULL REFERENCES trainings(id),
    word_id INTEGER NOT NULL REFERENCES words(id),
    direction TEXT NOT NULL,
    history TEXT NOT NULL DEFAULT '',
    correct_count INTEGER NOT NULL DEFAULT 0
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_words_list ON words(list_id);
CREATE INDEX IF NOT EXISTS idx_items_training ON training_items(training_id);
CREATE INDEX IF NOT EXISTS idx_items_word ON training_items(word_id);
"#;
