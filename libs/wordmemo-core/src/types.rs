//! Core types for the vocabulary drill.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reserved tag that accumulates every missed record.
pub const MISTAKES_TAG: &str = "mistakes";

/// Tag that receives a plain word-bank save when no tag is selected.
pub const DEFAULT_TAG: &str = "default";

/// Storage keys used by the application.
pub mod keys {
    pub const WORD_BANK: &str = "wordBank";
    pub const TAGGED_WORD_BANKS: &str = "taggedWordBanks";
    pub const STATS: &str = "stats";
    pub const MISTAKES: &str = "mistakes";
    pub const EXAM_RECORDS: &str = "examRecords";
}

/// One vocabulary entry.
///
/// Field names on the wire match the JSON that earlier sessions stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRecord {
    #[serde(rename = "english")]
    pub term: String,
    #[serde(default)]
    pub phonetic: String,
    #[serde(rename = "explanation")]
    pub definition: String,
    #[serde(rename = "wrongCount", default)]
    pub mistake_count: u32,
}

impl WordRecord {
    pub fn new(
        term: impl Into<String>,
        phonetic: impl Into<String>,
        definition: impl Into<String>,
    ) -> Self {
        Self {
            term: term.into(),
            phonetic: phonetic.into(),
            definition: definition.into(),
            mistake_count: 0,
        }
    }

    /// Two records are the same word when term and definition match.
    pub fn same_word(&self, other: &WordRecord) -> bool {
        self.term == other.term && self.definition == other.definition
    }
}

/// Named word banks keyed by tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaggedWordBankSet(BTreeMap<String, Vec<WordRecord>>);

impl TaggedWordBankSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, tag: &str) -> Option<&[WordRecord]> {
        self.0.get(tag).map(Vec::as_slice)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains_key(tag)
    }

    /// Replace the records stored under `tag`.
    pub fn insert(&mut self, tag: impl Into<String>, records: Vec<WordRecord>) {
        self.0.insert(tag.into(), records);
    }

    pub fn remove(&mut self, tag: &str) -> Option<Vec<WordRecord>> {
        self.0.remove(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[WordRecord])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Running answer counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub correct: u32,
    pub wrong: u32,
}

impl Stats {
    pub fn total(&self) -> u32 {
        self.correct + self.wrong
    }

    /// Percentage of correct answers, rounded to the nearest whole number.
    pub fn accuracy(&self) -> u32 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        (f64::from(self.correct) * 100.0 / f64::from(total)).round() as u32
    }
}

/// Result of one finished exam. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamRecord {
    pub tag: String,
    pub timestamp: String,
    pub correct: u32,
    pub wrong: u32,
    pub accuracy: u32,
}

impl ExamRecord {
    pub fn new(tag: impl Into<String>, stats: Stats, finished_at: DateTime<Utc>) -> Self {
        Self {
            tag: tag.into(),
            timestamp: finished_at.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            correct: stats.correct,
            wrong: stats.wrong,
            accuracy: stats.accuracy(),
        }
    }
}

/// Quiz direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizMode {
    /// Show the definition, expect the term. Graded strictly.
    TermRecall,
    /// Show the term, expect the definition. Graded leniently.
    DefinitionRecall,
}

impl Default for QuizMode {
    fn default() -> Self {
        Self::TermRecall
    }
}

impl QuizMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TermRecall => "term",
            Self::DefinitionRecall => "definition",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "term" | "term_recall" => Some(Self::TermRecall),
            "definition" | "definition_recall" => Some(Self::DefinitionRecall),
            _ => None,
        }
    }
}
