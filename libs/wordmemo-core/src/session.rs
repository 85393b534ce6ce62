//! Quiz sessions and the state they read and update.
//!
//! [`SessionContext`] holds everything the application persists. A
//! [`QuizSession`] borrows it mutably for the length of one exam, so all
//! bookkeeping (stats, mistakes, exam log) happens on an explicit value.

use crate::error::{Result, SessionError};
use crate::grading::{grade, GradeResult};
use crate::parser::{parse, render};
use crate::types::{
    keys, ExamRecord, QuizMode, Stats, TaggedWordBankSet, WordRecord, DEFAULT_TAG, MISTAKES_TAG,
};
use chrono::{DateTime, Utc};
use rand::Rng;

/// Persistent application state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionContext {
    /// Raw text of the last saved word bank.
    pub word_bank_text: String,
    /// Parsed form of `word_bank_text`.
    pub word_bank: Vec<WordRecord>,
    pub tagged: TaggedWordBankSet,
    pub stats: Stats,
    /// Every missed record, deduplicated by term and definition.
    pub mistakes: Vec<WordRecord>,
    pub exam_records: Vec<ExamRecord>,
    /// Tag currently loaded for editing, if any.
    pub current_tag: Option<String>,
}

impl SessionContext {
    /// Fresh context whose default tag holds the parsed `text`.
    pub fn with_word_bank(text: &str) -> Self {
        let word_bank = parse(text);
        let mut tagged = TaggedWordBankSet::new();
        tagged.insert(MISTAKES_TAG, Vec::new());
        tagged.insert(DEFAULT_TAG, word_bank.clone());

        Self {
            word_bank_text: text.to_string(),
            word_bank,
            tagged,
            ..Self::default()
        }
    }

    /// The tag an exam uses when none is given.
    pub fn active_tag(&self) -> &str {
        self.current_tag.as_deref().unwrap_or(DEFAULT_TAG)
    }

    /// Replace the word bank and store it under the current tag.
    ///
    /// Edits made while the mistakes tag is selected go to the default tag.
    /// Resets the running stats.
    pub fn save_word_bank(&mut self, text: &str) -> Result<Vec<&'static str>> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyWordBank);
        }

        self.word_bank = parse(text);
        self.word_bank_text = text.to_string();

        let target = match self.current_tag.as_deref() {
            Some(tag) if tag != MISTAKES_TAG => tag.to_string(),
            _ => DEFAULT_TAG.to_string(),
        };
        self.tagged.insert(target, self.word_bank.clone());
        self.stats = Stats::default();

        Ok(vec![keys::WORD_BANK, keys::TAGGED_WORD_BANKS, keys::STATS])
    }

    /// Create a new tag from word bank text.
    pub fn add_tag(&mut self, name: &str, text: &str) -> Result<Vec<&'static str>> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyTagName);
        }
        if name == MISTAKES_TAG {
            return Err(SessionError::ReservedTag(name.to_string()));
        }
        if self.tagged.contains(name) {
            return Err(SessionError::DuplicateTag(name.to_string()));
        }
        if text.trim().is_empty() {
            return Err(SessionError::EmptyWordBank);
        }

        self.tagged.insert(name, parse(text));
        Ok(vec![keys::TAGGED_WORD_BANKS])
    }

    pub fn remove_tag(&mut self, name: &str) -> Result<Vec<&'static str>> {
        if name == MISTAKES_TAG {
            return Err(SessionError::ReservedTag(name.to_string()));
        }
        if self.tagged.remove(name).is_none() {
            return Err(SessionError::UnknownTag(name.to_string()));
        }
        if self.current_tag.as_deref() == Some(name) {
            self.current_tag = None;
        }
        Ok(vec![keys::TAGGED_WORD_BANKS])
    }

    /// Select a tag for editing and return its records in text form.
    pub fn select_tag(&mut self, name: &str) -> Result<String> {
        let records = self
            .tagged
            .get(name)
            .ok_or_else(|| SessionError::UnknownTag(name.to_string()))?;
        let text = render(records);
        self.current_tag = Some(name.to_string());
        Ok(text)
    }

    /// Count a miss for `record` in the mistakes collection.
    ///
    /// A repeat miss increments the stored count instead of adding a duplicate.
    pub fn record_miss(&mut self, record: &WordRecord) {
        match self.mistakes.iter_mut().find(|m| m.same_word(record)) {
            Some(existing) => existing.mistake_count += 1,
            None => self.mistakes.push(WordRecord {
                mistake_count: 1,
                ..record.clone()
            }),
        }
        self.tagged.insert(MISTAKES_TAG, self.mistakes.clone());
    }

    /// Empty the mistakes collection. The mistakes tag stays, with no records.
    pub fn clear_mistakes(&mut self) -> Vec<&'static str> {
        self.mistakes.clear();
        if self.tagged.contains(MISTAKES_TAG) {
            self.tagged.insert(MISTAKES_TAG, Vec::new());
        }
        vec![keys::MISTAKES, keys::TAGGED_WORD_BANKS]
    }

    /// Exam log, newest first.
    pub fn exam_history(&self) -> Vec<&ExamRecord> {
        let mut records: Vec<&ExamRecord> = self.exam_records.iter().collect();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records
    }

    fn deck_for(&self, tag: &str) -> Result<Vec<WordRecord>> {
        let records = if tag == MISTAKES_TAG {
            self.mistakes.as_slice()
        } else {
            self.tagged
                .get(tag)
                .ok_or_else(|| SessionError::UnknownTag(tag.to_string()))?
        };

        if records.is_empty() {
            return Err(SessionError::EmptyTag(tag.to_string()));
        }
        Ok(records.to_vec())
    }
}

/// A question handed to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    /// Text shown to the user.
    pub prompt: String,
    /// Answer the grader compares against.
    pub expected: String,
    pub record: WordRecord,
}

/// What happened after an answer was graded.
#[derive(Debug, Clone)]
pub struct AnswerOutcome {
    pub grade: GradeResult,
    pub expected: String,
    /// Storage keys whose values changed.
    pub changed_keys: Vec<&'static str>,
}

impl AnswerOutcome {
    pub fn is_correct(&self) -> bool {
        self.grade.is_correct
    }
}

/// One exam over a copy of a tag's records.
pub struct QuizSession<'a> {
    context: &'a mut SessionContext,
    tag: String,
    mode: QuizMode,
    deck: Vec<WordRecord>,
    used: Vec<usize>,
    current: Option<usize>,
}

impl<'a> QuizSession<'a> {
    /// Start an exam over `tag`. The records are copied; the stats reset.
    pub fn start(context: &'a mut SessionContext, tag: &str, mode: QuizMode) -> Result<Self> {
        let deck = context.deck_for(tag)?;
        context.stats = Stats::default();
        if tag != MISTAKES_TAG {
            context.current_tag = Some(tag.to_string());
        }

        Ok(Self {
            context,
            tag: tag.to_string(),
            mode,
            deck,
            used: Vec::new(),
            current: None,
        })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    /// Switch direction. Any pending question is discarded.
    pub fn set_mode(&mut self, mode: QuizMode) {
        self.mode = mode;
        self.current = None;
    }

    pub fn stats(&self) -> Stats {
        self.context.stats
    }

    /// Questions asked so far and the deck size.
    pub fn progress(&self) -> (usize, usize) {
        (self.used.len(), self.deck.len())
    }

    /// Pick a random unused record. Returns `None` once every record was asked.
    pub fn next_question<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Question> {
        let available: Vec<usize> = (0..self.deck.len())
            .filter(|i| !self.used.contains(i))
            .collect();
        if available.is_empty() {
            self.current = None;
            return None;
        }

        let index = available[rng.random_range(0..available.len())];
        self.used.push(index);
        self.current = Some(index);

        let record = &self.deck[index];
        let (prompt, expected) = match self.mode {
            QuizMode::TermRecall => (record.definition.clone(), record.term.clone()),
            QuizMode::DefinitionRecall => {
                let shown = format!("{} {}", record.term, record.phonetic);
                (shown.trim().to_string(), record.definition.clone())
            }
        };

        Some(Question {
            prompt,
            expected,
            record: record.clone(),
        })
    }

    /// Grade an answer to the pending question and update the bookkeeping.
    pub fn answer(&mut self, candidate: &str) -> Result<AnswerOutcome> {
        let index = self.current.ok_or(SessionError::NoActiveQuestion)?;
        if candidate.trim().is_empty() {
            return Err(SessionError::EmptyAnswer);
        }
        self.current = None;

        let record = &self.deck[index];
        let expected = match self.mode {
            QuizMode::TermRecall => record.term.clone(),
            QuizMode::DefinitionRecall => record.definition.clone(),
        };
        let grade = grade(self.mode, candidate, &expected);

        let mut changed_keys = vec![keys::STATS];
        if grade.is_correct {
            self.context.stats.correct += 1;
        } else {
            self.context.stats.wrong += 1;
            self.context.record_miss(record);
            changed_keys.push(keys::MISTAKES);
            changed_keys.push(keys::TAGGED_WORD_BANKS);
        }

        Ok(AnswerOutcome {
            grade,
            expected,
            changed_keys,
        })
    }

    /// End the exam. Appends and returns an exam record if anything was answered.
    pub fn finish(self, finished_at: DateTime<Utc>) -> Option<ExamRecord> {
        let stats = self.context.stats;
        if stats.total() == 0 {
            return None;
        }

        let record = ExamRecord::new(self.tag, stats, finished_at);
        self.context.exam_records.push(record.clone());
        Some(record)
    }
}
