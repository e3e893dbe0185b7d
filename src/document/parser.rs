//! Markup parsing into a segment list.
//!
//! The input is seeded as a single text segment. Each text segment is then
//! split around the first occurrence of a supported tag, trying the tag
//! patterns in a fixed priority order, until no text segment contains a tag.

use std::sync::LazyLock;

use regex::Regex;

use super::error::ParseError;
use super::types::{Format, HexColor, Marker, Segment, Style};
use super::Document;

/// Accepted spellings of the line-break tag. Output always uses `<br/>`.
static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<br\s*/?>").expect("line break pattern is valid"));

/// Tag patterns in match priority order.
static TAG_PATTERNS: LazyLock<Vec<(Regex, TagKind)>> = LazyLock::new(|| {
    [
        (r"<b>", TagKind::Open(Style::Bold)),
        (r"</b>", TagKind::Close(Style::Bold)),
        (r"<u>", TagKind::Open(Style::Underline)),
        (r"</u>", TagKind::Close(Style::Underline)),
        (r"<i>", TagKind::Open(Style::Italic)),
        (r"</i>", TagKind::Close(Style::Italic)),
        (
            r##"<font color="#([0-9A-Fa-f]{6})">"##,
            TagKind::Open(Style::Color),
        ),
        (r"</font>", TagKind::Close(Style::Color)),
    ]
    .into_iter()
    .map(|(pattern, kind)| (Regex::new(pattern).expect("tag pattern is valid"), kind))
    .collect()
});

#[derive(Debug, Clone, Copy)]
enum TagKind {
    Open(Style),
    Close(Style),
}

/// How the parser treats markup outside the supported vocabulary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// Reject unbalanced, crossing or malformed tags.
    #[default]
    Strict,
    /// Leave unknown text as plain text and repair marker balance.
    Lenient,
}

/// A segment together with the char offset where it started in the input.
#[derive(Debug)]
struct Piece {
    segment: Segment,
    offset: usize,
}

impl Document {
    /// Parse markup into a normalized document, rejecting malformed tags.
    ///
    /// # Example
    ///
    /// ```
    /// use markspan::document::Document;
    ///
    /// let doc = Document::parse("Hello <b>World</b>").unwrap();
    /// assert_eq!(doc.flatten_text(), "Hello World");
    /// ```
    pub fn parse(markup: &str) -> super::Result<Self> {
        Self::parse_with(markup, ParseMode::Strict)
    }

    /// Parse markup into a normalized document using the given mode.
    pub fn parse_with(markup: &str, mode: ParseMode) -> super::Result<Self> {
        let mut doc = Self::from_segments(parse(markup, mode)?);
        doc.normalize();
        Ok(doc)
    }
}

/// Parse markup into a raw (not yet normalized) segment list.
pub fn parse(markup: &str, mode: ParseMode) -> Result<Vec<Segment>, ParseError> {
    if markup.is_empty() {
        return Ok(Vec::new());
    }
    let source = LINE_BREAK.replace_all(markup, "\n");
    let mut pieces = vec![Piece {
        segment: Segment::Text(source.into_owned()),
        offset: 0,
    }];

    let mut idx = 0;
    while idx < pieces.len() {
        let Segment::Text(text) = &pieces[idx].segment else {
            idx += 1;
            continue;
        };
        match split_first_tag(text, pieces[idx].offset) {
            // Re-examine the `before` piece now sitting at `idx`.
            Some(parts) => {
                pieces.splice(idx..=idx, parts);
            }
            None => idx += 1,
        }
    }

    tracing::trace!(
        target: "markspan::parser",
        pieces = pieces.len(),
        "split markup into segments"
    );
    balance(pieces, mode)
}

/// Split `text` around the first occurrence of the highest-priority tag it
/// contains, returning `(before, marker, after)`.
fn split_first_tag(text: &str, offset: usize) -> Option<[Piece; 3]> {
    TAG_PATTERNS.iter().find_map(|(pattern, kind)| {
        let caps = pattern.captures(text)?;
        let whole = caps.get(0)?;
        let marker = match *kind {
            TagKind::Open(Style::Bold) => Marker::Open(Format::Bold),
            TagKind::Open(Style::Underline) => Marker::Open(Format::Underline),
            TagKind::Open(Style::Italic) => Marker::Open(Format::Italic),
            TagKind::Open(Style::Color) => {
                let color = HexColor::parse(caps.get(1)?.as_str()).ok()?;
                Marker::Open(Format::Color(color))
            }
            TagKind::Close(style) => Marker::Close(style),
        };
        let before = &text[..whole.start()];
        let after = &text[whole.end()..];
        let marker_offset = offset + before.chars().count();
        Some([
            Piece {
                segment: Segment::text(before),
                offset,
            },
            Piece {
                segment: Segment::Marker(marker),
                offset: marker_offset,
            },
            Piece {
                segment: Segment::text(after),
                offset: marker_offset + whole.as_str().chars().count(),
            },
        ])
    })
}

/// Check (strict) or repair (lenient) marker pairing.
fn balance(pieces: Vec<Piece>, mode: ParseMode) -> Result<Vec<Segment>, ParseError> {
    let mut out = Vec::with_capacity(pieces.len());
    let mut open: Vec<(Format, usize)> = Vec::new();

    for piece in pieces {
        match piece.segment {
            Segment::Text(text) => {
                if mode == ParseMode::Strict
                    && let Some(pos) = text.find("<font")
                {
                    return Err(ParseError::MalformedTag {
                        offset: piece.offset + text[..pos].chars().count(),
                    });
                }
                out.push(Segment::Text(text));
            }
            Segment::Marker(Marker::Open(format)) => {
                open.push((format.clone(), piece.offset));
                out.push(Segment::open(format));
            }
            Segment::Marker(Marker::Close(style)) => {
                let depth = open.iter().rposition(|(format, _)| format.style() == style);
                match (depth, mode) {
                    (Some(pos), _) if pos + 1 == open.len() => {
                        open.pop();
                        out.push(Segment::close(style));
                    }
                    (Some(pos), ParseMode::Lenient) => {
                        // Close the crossing formats, close this one, reopen them.
                        let crossing = open.split_off(pos + 1);
                        open.pop();
                        out.extend(crossing.iter().rev().map(|(f, _)| Segment::close(f.style())));
                        out.push(Segment::close(style));
                        out.extend(crossing.iter().map(|(f, _)| Segment::open(f.clone())));
                        open.extend(crossing);
                    }
                    (None, ParseMode::Lenient) => {
                        tracing::debug!(
                            target: "markspan::parser",
                            tag = style.close_tag(),
                            offset = piece.offset,
                            "dropping unmatched closing tag"
                        );
                    }
                    (_, ParseMode::Strict) => {
                        return Err(ParseError::UnmatchedClose {
                            tag: style.close_tag(),
                            offset: piece.offset,
                        });
                    }
                }
            }
        }
    }

    if let Some((format, offset)) = open.last() {
        if mode == ParseMode::Strict {
            return Err(ParseError::Unclosed {
                tag: format.style().open_tag_name(),
                offset: *offset,
            });
        }
        out.extend(open.iter().rev().map(|(f, _)| Segment::close(f.style())));
    }

    Ok(out)
}
