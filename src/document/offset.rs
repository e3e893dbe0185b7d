//! Flat offset to segment mapping.

use super::Document;
use super::error::{DocumentError, Result};

/// Where a flat offset lands: a text segment and a char offset inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub segment: usize,
    pub offset: usize,
}

impl Document {
    /// Map a flat offset onto a text segment.
    ///
    /// Markers are skipped. An offset equal to the end of a text segment
    /// resolves to that segment rather than the start of the next one.
    /// Returns `None` when the offset lies past the end of the text.
    pub fn locate(&self, offset: usize) -> Option<Location> {
        let mut remaining = offset;
        for (idx, segment) in self.segments.iter().enumerate() {
            let Some(text) = segment.as_text() else {
                continue;
            };
            let len = text.chars().count();
            if remaining > len {
                remaining -= len;
            } else {
                return Some(Location {
                    segment: idx,
                    offset: remaining,
                });
            }
        }
        None
    }

    /// Like [`locate`](Self::locate) but reports a missing location as an error.
    pub(crate) fn locate_or_err(&self, offset: usize) -> Result<Location> {
        self.locate(offset).ok_or_else(|| DocumentError::OffsetOutOfRange {
            offset,
            len: self.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Format, Segment, Style};

    fn doc() -> Document {
        // "ab" <b> "cd" </b> "ef"
        Document::from_segments(vec![
            Segment::text("ab"),
            Segment::open(Format::Bold),
            Segment::text("cd"),
            Segment::close(Style::Bold),
            Segment::text("ef"),
        ])
    }

    #[test]
    fn test_locate_inside_segment() {
        assert_eq!(doc().locate(1), Some(Location { segment: 0, offset: 1 }));
        assert_eq!(doc().locate(3), Some(Location { segment: 2, offset: 1 }));
    }

    #[test]
    fn test_locate_segment_boundary_resolves_left() {
        assert_eq!(doc().locate(2), Some(Location { segment: 0, offset: 2 }));
        assert_eq!(doc().locate(4), Some(Location { segment: 2, offset: 2 }));
    }

    #[test]
    fn test_locate_zero_and_end() {
        assert_eq!(doc().locate(0), Some(Location { segment: 0, offset: 0 }));
        assert_eq!(doc().locate(6), Some(Location { segment: 4, offset: 2 }));
    }

    #[test]
    fn test_locate_past_end_is_none() {
        assert_eq!(doc().locate(7), None);
        assert_eq!(
            doc().locate_or_err(9),
            Err(DocumentError::OffsetOutOfRange { offset: 9, len: 6 })
        );
    }

    #[test]
    fn test_locate_skips_leading_markers() {
        let doc = Document::from_segments(vec![
            Segment::open(Format::Italic),
            Segment::text("xy"),
            Segment::close(Style::Italic),
        ]);
        assert_eq!(doc.locate(0), Some(Location { segment: 1, offset: 0 }));
    }

    #[test]
    fn test_locate_counts_chars_not_bytes() {
        let doc = Document::from_segments(vec![Segment::text("héé"), Segment::text("z")]);
        assert_eq!(doc.locate(3), Some(Location { segment: 0, offset: 3 }));
        assert_eq!(doc.locate(4), Some(Location { segment: 1, offset: 1 }));
    }

    #[test]
    fn test_locate_in_empty_document() {
        assert_eq!(Document::empty().locate(0), None);
    }
}
