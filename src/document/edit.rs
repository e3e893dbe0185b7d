//! Text insertion and deletion over flat offsets.

use super::Document;
use super::error::{DocumentError, Result};
use super::types::{Marker, Segment, Style, byte_index};

impl Document {
    /// Insert `text` at a flat offset.
    ///
    /// Text typed at the very end of a run that is followed by closing tags
    /// goes after those tags, so it does not silently pick up their styling.
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<()> {
        if self.segments.is_empty() {
            if offset != 0 {
                return Err(DocumentError::OffsetOutOfRange { offset, len: 0 });
            }
            if !text.is_empty() {
                self.segments.push(Segment::text(text));
            }
            tracing::debug!(target: "markspan::edit", chars = self.len(), "seeded document");
            return Ok(());
        }
        if offset == 0 && !self.segments.iter().any(Segment::is_text) {
            self.segments.push(Segment::text(text));
            self.normalize();
            return Ok(());
        }

        let at = self.locate_or_err(offset)?;
        if text.is_empty() {
            return Ok(());
        }
        tracing::debug!(
            target: "markspan::edit",
            offset,
            chars = text.chars().count(),
            segment = at.segment,
            "insert"
        );

        let at_end = at.offset == self.segments[at.segment].flat_len();
        let before_close = self
            .segments
            .get(at.segment + 1)
            .and_then(Segment::as_marker)
            .is_some_and(Marker::is_close);

        if at_end && before_close {
            let target = self.segments[at.segment + 1..]
                .iter()
                .position(|segment| {
                    segment.is_text() || segment.as_marker().is_some_and(Marker::is_open)
                })
                .map_or(self.segments.len(), |pos| at.segment + 1 + pos);
            self.segments.insert(target, Segment::text(text));
        } else if let Segment::Text(current) = &mut self.segments[at.segment] {
            let split = byte_index(current, at.offset);
            current.insert_str(split, text);
        }

        self.normalize();
        Ok(())
    }

    /// Delete the flat range `start..end`.
    ///
    /// Does nothing when `start >= end`. Markup markers inside the range are
    /// only removed as complete open/close pairs; a marker whose partner lies
    /// outside the range is kept.
    pub fn delete(&mut self, start: usize, end: usize) -> Result<()> {
        if start >= end {
            return Ok(());
        }
        let from = self.locate_or_err(start)?;
        let to = self.locate_or_err(end)?;
        tracing::debug!(
            target: "markspan::edit",
            start,
            end,
            first_segment = from.segment,
            last_segment = to.segment,
            "delete"
        );

        if from.segment == to.segment {
            if let Segment::Text(text) = &mut self.segments[from.segment] {
                let range = byte_index(text, from.offset)..byte_index(text, to.offset);
                text.replace_range(range, "");
            }
        } else {
            if let Segment::Text(text) = &mut self.segments[from.segment] {
                text.truncate(byte_index(text, from.offset));
            }
            if let Segment::Text(text) = &mut self.segments[to.segment] {
                text.replace_range(..byte_index(text, to.offset), "");
            }
            self.remove_between(from.segment + 1, to.segment);
        }

        self.normalize();
        Ok(())
    }

    /// Replace `removed` chars at `start` with `inserted`.
    ///
    /// This is the shape of a host text-change notification. Both bounds are
    /// checked before anything is modified.
    pub fn replace(&mut self, start: usize, removed: usize, inserted: &str) -> Result<()> {
        let len = self.len();
        let end = start
            .checked_add(removed)
            .filter(|end| *end <= len)
            .ok_or(DocumentError::OffsetOutOfRange {
                offset: start.saturating_add(removed),
                len,
            })?;
        self.delete(start, end)?;
        self.insert(start, inserted)
    }

    /// Remove the segments in `lo..hi`: all text, and markers that form
    /// complete pairs inside the range.
    fn remove_between(&mut self, lo: usize, hi: usize) {
        if lo >= hi {
            return;
        }
        let mut remove = vec![false; hi - lo];
        let mut open: Vec<(Style, usize)> = Vec::new();

        for (idx, segment) in self.segments[lo..hi].iter().enumerate() {
            match segment {
                Segment::Text(_) => remove[idx] = true,
                Segment::Marker(Marker::Open(format)) => open.push((format.style(), idx)),
                Segment::Marker(Marker::Close(style)) => {
                    if let Some(pos) = open.iter().rposition(|(s, _)| s == style) {
                        let (_, open_idx) = open.remove(pos);
                        remove[open_idx] = true;
                        remove[idx] = true;
                    }
                }
            }
        }

        let tail = self.segments.split_off(lo);
        let span = hi - lo;
        self.segments.extend(
            tail.into_iter()
                .enumerate()
                .filter(|(idx, _)| *idx >= span || !remove[*idx])
                .map(|(_, segment)| segment),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Format;

    fn doc(markup: &str) -> Document {
        Document::parse(markup).unwrap()
    }

    // --- Insertion ---

    #[test]
    fn test_insert_into_empty_document_seeds_text() {
        let mut d = Document::empty();
        d.insert(0, "hello").unwrap();
        assert_eq!(d.segments(), &[Segment::text("hello")]);
    }

    #[test]
    fn test_insert_into_empty_document_past_zero_fails() {
        let mut d = Document::empty();
        assert_eq!(
            d.insert(3, "x"),
            Err(DocumentError::OffsetOutOfRange { offset: 3, len: 0 })
        );
        assert!(d.is_empty());
    }

    #[test]
    fn test_insert_in_middle_of_text() {
        let mut d = doc("hllo");
        d.insert(1, "e").unwrap();
        assert_eq!(d.serialize(), "hello");
    }

    #[test]
    fn test_insert_inside_styled_run() {
        let mut d = doc("<b>Hllo</b>");
        d.insert(1, "e").unwrap();
        assert_eq!(d.serialize(), "<b>Hello</b>");
    }

    #[test]
    fn test_insert_at_end_of_run_lands_after_closing_tags() {
        let mut d = doc("<i><b>Hello</b></i>");
        d.insert(5, "!").unwrap();
        assert_eq!(d.serialize(), "<i><b>Hello</b></i>!");
    }

    #[test]
    fn test_insert_at_end_of_run_joins_following_text() {
        let mut d = doc("<b>Hi</b> there");
        d.insert(2, "!").unwrap();
        assert_eq!(d.serialize(), "<b>Hi</b>! there");
    }

    #[test]
    fn test_insert_at_end_of_run_stops_before_next_open_tag() {
        let mut d = doc("<b>Hi</b><u>yo</u>");
        d.insert(2, "-").unwrap();
        assert_eq!(d.serialize(), "<b>Hi</b>-<u>yo</u>");
    }

    #[test]
    fn test_insert_multibyte_offsets() {
        let mut d = doc("café<b>é</b>");
        d.insert(4, "!").unwrap();
        assert_eq!(d.flatten_text(), "café!é");
    }

    #[test]
    fn test_insert_out_of_range_leaves_document_untouched() {
        let mut d = doc("<b>abc</b>");
        let before = d.clone();
        assert_eq!(
            d.insert(4, "x"),
            Err(DocumentError::OffsetOutOfRange { offset: 4, len: 3 })
        );
        assert_eq!(d, before);
    }

    // --- Deletion ---

    #[test]
    fn test_delete_empty_range_is_noop() {
        let mut d = doc("abc");
        d.delete(2, 2).unwrap();
        d.delete(2, 1).unwrap();
        assert_eq!(d.serialize(), "abc");
    }

    #[test]
    fn test_delete_within_one_segment() {
        let mut d = doc("abcdef");
        d.delete(1, 4).unwrap();
        assert_eq!(d.flatten_text(), "aef");
    }

    #[test]
    fn test_delete_across_segments_keeps_orphan_close() {
        let mut d = doc("<b>ab</b>cd");
        d.delete(1, 3).unwrap();
        assert_eq!(d.serialize(), "<b>a</b>d");
    }

    #[test]
    fn test_delete_across_segments_keeps_orphan_open() {
        let mut d = doc("a<b>bc</b>d");
        d.delete(0, 2).unwrap();
        assert_eq!(d.serialize(), "<b>c</b>d");
    }

    #[test]
    fn test_delete_removes_complete_pairs_and_inner_text() {
        let mut d = doc("a<b>b</b>c<i>d</i>e");
        d.delete(0, 4).unwrap();
        assert_eq!(d.serialize(), "e");
    }

    #[test]
    fn test_delete_whole_styled_run_drops_its_tags() {
        let mut d = doc("x<u>yz</u>");
        d.delete(1, 3).unwrap();
        assert_eq!(d.serialize(), "x");
    }

    #[test]
    fn test_delete_everything_leaves_empty_document() {
        let mut d = doc("<b>Hi</b>");
        d.delete(0, 2).unwrap();
        assert!(d.is_empty());
        d.insert(0, "new").unwrap();
        assert_eq!(d.serialize(), "new");
    }

    #[test]
    fn test_delete_out_of_range_leaves_document_untouched() {
        let mut d = doc("a<b>b</b>");
        let before = d.clone();
        assert!(d.delete(1, 5).is_err());
        assert_eq!(d, before);
    }

    // --- Replacement ---

    #[test]
    fn test_replace_deletes_then_inserts() {
        let mut d = doc("<b>bold</b> text");
        d.replace(5, 4, "word").unwrap();
        assert_eq!(d.serialize(), "<b>bold</b> word");
    }

    #[test]
    fn test_replace_checks_bounds_first() {
        let mut d = doc("abc");
        assert_eq!(
            d.replace(2, 5, "x"),
            Err(DocumentError::OffsetOutOfRange { offset: 7, len: 3 })
        );
        assert_eq!(d.serialize(), "abc");
    }

    #[test]
    fn test_insert_into_markers_only_document() {
        let mut d = Document::from_segments(vec![
            Segment::open(Format::Bold),
            Segment::close(Style::Bold),
        ]);
        d.insert(0, "x").unwrap();
        assert_eq!(d.serialize(), "x");
    }
}
