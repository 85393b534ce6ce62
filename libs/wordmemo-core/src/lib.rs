//! Core vocabulary drill library.
//!
//! Provides:
//! - Word bank parser (term line + definition line pairs)
//! - Answer grading (strict and lenient, Levenshtein similarity)
//! - Quiz sessions with mistake and exam bookkeeping
//! - Shared types (WordRecord, TaggedWordBankSet, ExamRecord, etc.)

pub mod error;
pub mod grading;
pub mod parser;
pub mod session;
pub mod types;

pub use error::{Result, SessionError};
pub use grading::{
    grade, is_correct, levenshtein_distance, normalized_similarity, GradeResult, MatchKind,
};
pub use parser::{parse, render, DEFAULT_WORD_BANK};
pub use session::{AnswerOutcome, Question, QuizSession, SessionContext};
pub use types::{
    keys, ExamRecord, QuizMode, Stats, TaggedWordBankSet, WordRecord, DEFAULT_TAG, MISTAKES_TAG,
};
