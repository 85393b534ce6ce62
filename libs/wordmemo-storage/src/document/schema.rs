//! SQLite schema for the document store.

/// Current schema version. Creation runs only when the stored version is lower.
pub const SCHEMA_VERSION: i32 = 1;

/// Version tracking table, created before the version is read.
pub const SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);
"#;

/// Complete schema for the document database.
pub const SCHEMA: &str = r#"
-- Named word banks (raw text, one row per tag)
CREATE TABLE IF NOT EXISTS word_banks (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    content TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Finished exams, append only
CREATE TABLE IF NOT EXISTS exam_records (
    id TEXT PRIMARY KEY,
    tag TEXT NOT NULL,
    timestamp TEXT NOT NULL,
    correct INTEGER NOT NULL,
    wrong INTEGER NOT NULL,
    accuracy INTEGER NOT NULL
);

-- Missed words with their miss counts
CREATE TABLE IF NOT EXISTS mistakes (
    id TEXT PRIMARY KEY,
    term TEXT NOT NULL,
    phonetic TEXT NOT NULL DEFAULT '',
    definition TEXT NOT NULL,
    mistake_count INTEGER NOT NULL DEFAULT 1
);

-- Generic key-value partition, values are JSON text
CREATE TABLE IF NOT EXISTS settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Indexes
CREATE UNIQUE INDEX IF NOT EXISTS idx_word_banks_name ON word_banks(name);
CREATE INDEX IF NOT EXISTS idx_exam_records_timestamp ON exam_records(timestamp);
CREATE UNIQUE INDEX IF NOT EXISTS idx_mistakes_word ON mistakes(term, definition);
"#;
