//! Segment list clean-up.
//!
//! Local rules run to a fixed point first:
//! - adjacent text segments are merged,
//! - a close marker directly followed by an open marker of the same style
//!   (and, for color, the same color) is removed,
//! - empty text segments are removed,
//! - an open marker directly followed by its close is removed.
//!
//! Then nested markers of the same style are collapsed one pair at a time,
//! going back to the local rules after each collapse.

use std::iter;

use super::Document;
use super::types::{Format, HexColor, Marker, Segment, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    MergeText,
    CancelBoundary,
    DropEmptyText,
    DropEmptySpan,
}

/// An open marker found inside a run of the same style.
#[derive(Debug)]
struct Nested {
    outer: usize,
    inner: usize,
    /// Open markers of other styles between `outer` and `inner` that are
    /// still open at `inner`, outermost first.
    between: Vec<usize>,
}

impl Document {
    /// Bring the segment list back to its normal form.
    ///
    /// Running this twice leaves the list unchanged the second time.
    pub fn normalize(&mut self) {
        loop {
            self.apply_local_rules();
            let Some(nested) = self.find_nested() else {
                break;
            };
            self.resolve_nested(&nested);
        }
    }

    fn apply_local_rules(&mut self) {
        let mut idx = 0;
        while idx < self.segments.len() {
            match self.local_rule_at(idx) {
                Some(rule) => {
                    tracing::trace!(target: "markspan::normalize", ?rule, idx, "rule fired");
                    self.apply_rule(idx, rule);
                    // Only neighbours of `idx` can be affected.
                    idx = idx.saturating_sub(1);
                }
                None => idx += 1,
            }
        }
    }

    fn local_rule_at(&self, idx: usize) -> Option<Rule> {
        let current = &self.segments[idx];
        if current.as_text().is_some_and(str::is_empty) {
            return Some(Rule::DropEmptyText);
        }
        match (current, self.segments.get(idx + 1)?) {
            (Segment::Text(_), Segment::Text(_)) => Some(Rule::MergeText),
            (Segment::Marker(Marker::Close(style)), Segment::Marker(Marker::Open(format)))
                if *style == format.style() && self.continues_run(idx, format) =>
            {
                Some(Rule::CancelBoundary)
            }
            (Segment::Marker(Marker::Open(format)), Segment::Marker(Marker::Close(style)))
                if format.style() == *style =>
            {
                Some(Rule::DropEmptySpan)
            }
            _ => None,
        }
    }

    fn apply_rule(&mut self, idx: usize, rule: Rule) {
        match rule {
            Rule::MergeText => {
                let tail = self.segments.remove(idx + 1);
                if let (Segment::Text(head), Segment::Text(tail)) = (&mut self.segments[idx], tail) {
                    head.push_str(&tail);
                }
            }
            Rule::CancelBoundary | Rule::DropEmptySpan => {
                self.segments.drain(idx..idx + 2);
            }
            Rule::DropEmptyText => {
                self.segments.remove(idx);
            }
        }
    }

    /// Whether the open marker after the close at `close_idx` continues the
    /// same run. Colors only continue a run of the identical color.
    fn continues_run(&self, close_idx: usize, next: &Format) -> bool {
        let Format::Color(next_color) = next else {
            return true;
        };
        self.color_closed_at(close_idx)
            .is_some_and(|color| color.same_color(next_color))
    }

    /// The color of the open marker paired with the color close at `close_idx`.
    fn color_closed_at(&self, close_idx: usize) -> Option<&HexColor> {
        let mut depth = 0usize;
        for segment in self.segments[..close_idx].iter().rev() {
            match segment.as_marker() {
                Some(Marker::Close(Style::Color)) => depth += 1,
                Some(marker @ Marker::Open(Format::Color(_))) => {
                    if depth == 0 {
                        return marker.color();
                    }
                    depth -= 1;
                }
                _ => {}
            }
        }
        None
    }

    fn find_nested(&self) -> Option<Nested> {
        let mut open: Vec<(Style, usize)> = Vec::new();
        for (idx, segment) in self.segments.iter().enumerate() {
            match segment.as_marker() {
                Some(Marker::Open(format)) => {
                    let style = format.style();
                    if let Some(pos) = open.iter().rposition(|(s, _)| *s == style) {
                        return Some(Nested {
                            outer: open[pos].1,
                            inner: idx,
                            between: open[pos + 1..].iter().map(|(_, i)| *i).collect(),
                        });
                    }
                    open.push((style, idx));
                }
                Some(Marker::Close(style)) => {
                    if let Some(pos) = open.iter().rposition(|(s, _)| s == style) {
                        open.remove(pos);
                    }
                }
                None => {}
            }
        }
        None
    }

    /// Index of the close marker paired with the open marker at `open_idx`.
    fn matching_close(&self, open_idx: usize) -> Option<usize> {
        let style = self.segments[open_idx].as_marker()?.style();
        let mut depth = 0usize;
        for (offset, segment) in self.segments[open_idx + 1..].iter().enumerate() {
            match segment.as_marker() {
                Some(marker) if marker.style() == style && marker.is_open() => depth += 1,
                Some(marker) if marker.style() == style => {
                    if depth == 0 {
                        return Some(open_idx + 1 + offset);
                    }
                    depth -= 1;
                }
                _ => {}
            }
        }
        None
    }

    fn resolve_nested(&mut self, nested: &Nested) {
        let Some(close) = self.matching_close(nested.inner) else {
            // Unpaired open inside a run of its own style adds nothing.
            self.segments.remove(nested.inner);
            return;
        };
        let outer = self.segments[nested.outer].as_marker().and_then(Marker::color).cloned();
        let inner = self.segments[nested.inner].as_marker().and_then(Marker::color).cloned();

        match (outer, inner) {
            (Some(outer), Some(inner)) if !outer.same_color(&inner) => {
                tracing::trace!(
                    target: "markspan::normalize",
                    outer = nested.outer,
                    inner = nested.inner,
                    "splitting nested color run"
                );
                self.split_color_run(nested, close, outer);
            }
            _ => {
                tracing::trace!(
                    target: "markspan::normalize",
                    inner = nested.inner,
                    close,
                    "collapsing nested pair"
                );
                self.segments.remove(close);
                self.segments.remove(nested.inner);
            }
        }
    }

    /// Close the outer color before the inner color run and reopen it after,
    /// closing and reopening any formats opened in between so nothing crosses.
    fn split_color_run(&mut self, nested: &Nested, close: usize, outer: HexColor) {
        let between: Vec<Format> = nested
            .between
            .iter()
            .filter_map(|&idx| match self.segments[idx].as_marker() {
                Some(Marker::Open(format)) => Some(format.clone()),
                _ => None,
            })
            .collect();
        let close_between = || between.iter().rev().map(|f| Segment::close(f.style()));
        let reopen_between = || between.iter().map(|f| Segment::open(f.clone()));

        let after: Vec<Segment> = close_between()
            .chain(iter::once(Segment::open(Format::Color(outer))))
            .chain(reopen_between())
            .collect();
        let before: Vec<Segment> = close_between()
            .chain(iter::once(Segment::close(Style::Color)))
            .chain(reopen_between())
            .collect();

        self.segments.splice(close + 1..close + 1, after);
        self.segments.splice(nested.inner..nested.inner, before);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ParseMode;

    fn normalized(markup: &str) -> String {
        let mut doc = Document::parse_with(markup, ParseMode::Lenient).unwrap();
        doc.normalize();
        doc.serialize()
    }

    #[test]
    fn test_merges_adjacent_text() {
        let mut doc = Document::from_segments(vec![
            Segment::text("ab"),
            Segment::text("cd"),
            Segment::text("ef"),
        ]);
        doc.normalize();
        assert_eq!(doc.segments(), &[Segment::text("abcdef")]);
    }

    #[test]
    fn test_drops_empty_text() {
        let mut doc = Document::from_segments(vec![
            Segment::text(""),
            Segment::open(Format::Bold),
            Segment::text("x"),
            Segment::close(Style::Bold),
            Segment::text(""),
        ]);
        doc.normalize();
        assert_eq!(doc.segments().len(), 3);
    }

    #[test]
    fn test_cancels_close_then_open_of_same_style() {
        assert_eq!(normalized("<b>Hi</b><b>There</b>"), "<b>HiThere</b>");
    }

    #[test]
    fn test_keeps_close_then_open_of_other_style() {
        assert_eq!(normalized("<b>Hi</b><i>There</i>"), "<b>Hi</b><i>There</i>");
    }

    #[test]
    fn test_cancels_color_boundary_only_for_same_color() {
        assert_eq!(
            normalized(r##"<font color="#ff0000">a</font><font color="#FF0000">b</font>"##),
            r##"<font color="#ff0000">ab</font>"##
        );
        let differing = r##"<font color="#ff0000">a</font><font color="#00ff00">b</font>"##;
        assert_eq!(normalized(differing), differing);
    }

    #[test]
    fn test_drops_empty_span() {
        assert_eq!(normalized("a<u></u>b"), "ab");
        assert_eq!(normalized("<b><i></i></b>"), "");
    }

    #[test]
    fn test_collapses_nested_same_style() {
        assert_eq!(normalized("<b><b>Hi</b></b>"), "<b>Hi</b>");
    }

    #[test]
    fn test_collapses_three_deep_nesting() {
        assert_eq!(normalized("<b><b><b>x</b></b></b>"), "<b>x</b>");
    }

    #[test]
    fn test_collapses_nesting_with_text_around() {
        assert_eq!(normalized("<b>a<b>b</b>c</b>"), "<b>abc</b>");
    }

    #[test]
    fn test_collapses_nesting_through_other_styles() {
        assert_eq!(
            normalized("<b>a<i>b<b>c</b>d</i>e</b>"),
            "<b>a<i>bcd</i>e</b>"
        );
    }

    #[test]
    fn test_collapse_never_crosses_other_styles() {
        assert_eq!(
            normalized("<b>a<b>b<i>c<b>d</b>e</i>f</b>g</b>"),
            "<b>ab<i>cde</i>fg</b>"
        );
    }

    #[test]
    fn test_nested_same_color_collapses() {
        assert_eq!(
            normalized(r##"<font color="#123456"><font color="#123456">x</font></font>"##),
            r##"<font color="#123456">x</font>"##
        );
    }

    #[test]
    fn test_nested_different_color_is_split() {
        assert_eq!(
            normalized(r##"<font color="#aa0000">a<font color="#00bb00">b</font>c</font>"##),
            r##"<font color="#aa0000">a</font><font color="#00bb00">b</font><font color="#aa0000">c</font>"##
        );
    }

    #[test]
    fn test_nested_color_split_reopens_other_styles() {
        assert_eq!(
            normalized(r##"<font color="#aa0000"><i><font color="#00bb00">x</font></i>y</font>"##),
            r##"<i><font color="#00bb00">x</font></i><font color="#aa0000">y</font>"##
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let mut doc = Document::parse_with(
            "<b><b>a</b></b><b>b</b><u></u>c<i>d<i>e</i></i>",
            ParseMode::Lenient,
        )
        .unwrap();
        doc.normalize();
        let once = doc.clone();
        doc.normalize();
        assert_eq!(doc, once);
    }
}
