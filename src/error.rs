//! Error taxonomy.
//!
//! Only two hard failures exist: the validator gate and the zero-blocks
//! parse failure. Everything downstream degrades into warnings instead,
//! because one malformed line should not forfeit the rest of the statement.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("text is too short to be a statement — make sure you copied the entire document")]
    TooShort,
    #[error("text exceeds the maximum supported input length")]
    TooLong,
    #[error("doesn't look like statement content — make sure you copied the entire document")]
    NotAStatement,
    #[error("input looks like markup rather than plain statement text")]
    LooksLikeMarkup,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatementError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationFailure),
    /// Validation passed but no transaction blocks were found, which usually
    /// means the copy was truncated.
    #[error("no transactions found: {0}")]
    Parse(String),
}
