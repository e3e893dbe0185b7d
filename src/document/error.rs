//! Error types for document operations.

use thiserror::Error;

/// Errors returned by [`Document`](super::Document) operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// Markup could not be parsed in strict mode.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A flat offset lies beyond the end of the visible text.
    #[error("offset {offset} is out of range (text length {len})")]
    OffsetOutOfRange { offset: usize, len: usize },

    /// A color was not six hex digits.
    #[error("invalid color {0:?}: expected six hex digits")]
    InvalidColor(String),
}

/// Markup that does not follow the supported tag vocabulary.
///
/// Offsets are char offsets into the markup, counting each line-break tag
/// as a single character.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("closing tag {tag} at {offset} has no matching opening tag")]
    UnmatchedClose { tag: &'static str, offset: usize },

    #[error("opening tag {tag} at {offset} is never closed")]
    Unclosed { tag: &'static str, offset: usize },

    #[error("malformed tag at {offset}")]
    MalformedTag { offset: usize },
}

pub type Result<T> = std::result::Result<T, DocumentError>;
