//! Error types for wordmemo-core.

use thiserror::Error;

/// Result type alias using SessionError.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors raised by quiz sessions and word bank edits.
///
/// Parsing never fails; malformed entries are dropped instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("unknown tag: {0}")]
    UnknownTag(String),

    #[error("tag {0} has no words")]
    EmptyTag(String),

    #[error("tag already exists: {0}")]
    DuplicateTag(String),

    #[error("tag {0} is reserved")]
    ReservedTag(String),

    #[error("tag name is empty")]
    EmptyTagName,

    #[error("word bank is empty")]
    EmptyWordBank,

    #[error("no question is waiting for an answer")]
    NoActiveQuestion,

    #[error("answer is empty")]
    EmptyAnswer,
}
