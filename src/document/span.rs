//! Wrapping flat ranges in markup.

use super::Document;
use super::error::Result;
use super::types::{Format, Segment, char_slice};

impl Document {
    /// Wrap the flat range `start..end` in an open/close marker pair.
    ///
    /// An empty range does nothing. A reversed range is treated as the same
    /// range written forwards. Text segments are split at the range
    /// boundaries and every text segment inside the range gets its own pair;
    /// normalization afterwards merges neighbouring pairs into one.
    pub fn apply_span(&mut self, start: usize, end: usize, format: &Format) -> Result<()> {
        if start == end {
            return Ok(());
        }
        let (start, end) = if start < end { (start, end) } else { (end, start) };
        let from = self.locate_or_err(start)?;
        let to = self.locate_or_err(end)?;
        tracing::debug!(
            target: "markspan::span",
            start,
            end,
            style = ?format.style(),
            "apply span"
        );

        if from.segment == to.segment {
            self.wrap_segment(from.segment, from.offset, to.offset, format);
        } else {
            // Back to front so earlier indices stay valid.
            self.wrap_segment(to.segment, 0, to.offset, format);
            for idx in (from.segment + 1..to.segment).rev() {
                let len = self.segments[idx].flat_len();
                if self.segments[idx].is_text() {
                    self.wrap_segment(idx, 0, len, format);
                }
            }
            let len = self.segments[from.segment].flat_len();
            self.wrap_segment(from.segment, from.offset, len, format);
        }

        self.normalize();
        Ok(())
    }

    /// Replace the text segment at `idx` with `before, open, middle, close, after`,
    /// omitting empty `before`/`after` parts.
    fn wrap_segment(&mut self, idx: usize, start: usize, end: usize, format: &Format) {
        let Some(text) = self.segments[idx].as_text() else {
            return;
        };
        if start == end {
            return;
        }
        let len = text.chars().count();
        let mut parts = Vec::with_capacity(5);
        if start > 0 {
            parts.push(Segment::text(char_slice(text, 0, start)));
        }
        parts.push(Segment::open(format.clone()));
        parts.push(Segment::text(char_slice(text, start, end)));
        parts.push(Segment::close(format.style()));
        if end < len {
            parts.push(Segment::text(char_slice(text, end, len)));
        }
        self.segments.splice(idx..=idx, parts);
    }
}
