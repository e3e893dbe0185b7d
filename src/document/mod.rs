//! Segment-list rich text documents.
//!
//! This module handles:
//! - Parsing restricted HTML-like markup into text and marker segments
//! - Mapping flat (tag-free) offsets onto segments
//! - Inserting, deleting and styling text over flat offsets
//! - Normalizing the segment list and writing it back out as markup

mod edit;
mod error;
mod normalize;
mod offset;
mod parser;
mod render;
mod serialize;
mod span;
mod types;

pub use error::{DocumentError, ParseError, Result};
pub use offset::Location;
pub use parser::{ParseMode, parse};
pub use render::{InlineColor, InlineSpan, InlineStyle};
pub use serialize::LINE_BREAK_TAG;
pub use types::{Format, HexColor, Marker, Segment, Style};

/// A rich text document held as an ordered list of text and marker segments.
///
/// Every public mutation leaves the list normalized: no adjacent text
/// segments, no empty text, no redundant or nested same-style markers, and
/// every open marker paired with a later close.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    segments: Vec<Segment>,
}

impl Document {
    /// Create an empty document.
    pub const fn empty() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Wrap a raw segment list without normalizing it.
    pub(crate) const fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Replace the contents with parsed markup, rejecting malformed tags.
    ///
    /// An empty string resets the document. On error the document is left
    /// as it was.
    pub fn load(&mut self, markup: &str) -> Result<()> {
        self.load_with(markup, ParseMode::Strict)
    }

    /// Replace the contents with parsed markup using the given mode.
    pub fn load_with(&mut self, markup: &str, mode: ParseMode) -> Result<()> {
        let parsed = Self::parse_with(markup, mode)?;
        tracing::debug!(
            target: "markspan::document",
            segments = parsed.segments.len(),
            chars = parsed.len(),
            "loaded markup"
        );
        *self = parsed;
        Ok(())
    }

    /// Remove all segments.
    pub fn clear(&mut self) {
        self.segments.clear();
    }

    /// The segment list.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether the document has no segments at all.
    pub const fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Length of the visible text in chars. Markers do not count.
    pub fn len(&self) -> usize {
        self.segments.iter().map(Segment::flat_len).sum()
    }
}
