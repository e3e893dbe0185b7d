//! Markup and plain-text output.

use super::Document;
use super::types::Segment;

/// Line-break tag written in place of `\n`.
pub const LINE_BREAK_TAG: &str = "<br/>";

impl Document {
    /// Concatenate all segments into a markup string, encoding newlines as
    /// line-break tags.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Marker(marker) => out.push_str(&marker.tag()),
            }
        }
        out.replace('\n', LINE_BREAK_TAG)
    }

    /// Normalize, then serialize.
    pub fn markup(&mut self) -> String {
        self.normalize();
        self.serialize()
    }

    /// The visible text with all markup removed.
    pub fn flatten_text(&self) -> String {
        self.segments.iter().filter_map(Segment::as_text).collect()
    }
}
