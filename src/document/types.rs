//! Core segment types.

use std::fmt;

use super::error::{DocumentError, Result};

/// The markup style of a marker, without any payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    Bold,
    Underline,
    Italic,
    Color,
}

impl Style {
    /// Tag string written for a closing marker of this style.
    pub const fn close_tag(self) -> &'static str {
        match self {
            Self::Bold => "</b>",
            Self::Underline => "</u>",
            Self::Italic => "</i>",
            Self::Color => "</font>",
        }
    }

    /// Short tag name used in error messages.
    pub const fn open_tag_name(self) -> &'static str {
        match self {
            Self::Bold => "<b>",
            Self::Underline => "<u>",
            Self::Italic => "<i>",
            Self::Color => "<font>",
        }
    }
}

/// A foreground color written as six hex digits (`RRGGBB`, no `#`).
///
/// The digits keep the case they were given in so markup round-trips as is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HexColor(String);

impl HexColor {
    /// Parse a color from six hex digits. A leading `#` is accepted.
    pub fn parse(value: &str) -> Result<Self> {
        let digits = value.strip_prefix('#').unwrap_or(value);
        if digits.len() == 6 && digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            Ok(Self(digits.to_string()))
        } else {
            Err(DocumentError::InvalidColor(value.to_string()))
        }
    }

    /// The six hex digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The color as an `(r, g, b)` triple.
    pub fn rgb(&self) -> (u8, u8, u8) {
        let channel = |i: usize| u8::from_str_radix(&self.0[i..i + 2], 16).unwrap_or(0);
        (channel(0), channel(2), channel(4))
    }

    /// Compare two colors ignoring the case of the hex digits.
    pub fn same_color(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What an opening marker applies. Only color carries a payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Format {
    Bold,
    Underline,
    Italic,
    Color(HexColor),
}

impl Format {
    pub const fn style(&self) -> Style {
        match self {
            Self::Bold => Style::Bold,
            Self::Underline => Style::Underline,
            Self::Italic => Style::Italic,
            Self::Color(_) => Style::Color,
        }
    }
}

/// A zero-width opening or closing boundary of one markup style.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Marker {
    Open(Format),
    Close(Style),
}

impl Marker {
    pub const fn style(&self) -> Style {
        match self {
            Self::Open(format) => format.style(),
            Self::Close(style) => *style,
        }
    }

    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }

    pub const fn is_close(&self) -> bool {
        matches!(self, Self::Close(_))
    }

    /// The tag string this marker serializes to.
    pub fn tag(&self) -> String {
        match self {
            Self::Open(Format::Bold) => "<b>".to_string(),
            Self::Open(Format::Underline) => "<u>".to_string(),
            Self::Open(Format::Italic) => "<i>".to_string(),
            Self::Open(Format::Color(color)) => format!("<font color=\"#{color}\">"),
            Self::Close(style) => style.close_tag().to_string(),
        }
    }

    /// The color of an opening color marker.
    pub const fn color(&self) -> Option<&HexColor> {
        match self {
            Self::Open(Format::Color(color)) => Some(color),
            _ => None,
        }
    }
}

/// One entry of the document's ordered segment list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Marker(Marker),
}

impl Segment {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub const fn open(format: Format) -> Self {
        Self::Marker(Marker::Open(format))
    }

    pub const fn close(style: Style) -> Self {
        Self::Marker(Marker::Close(style))
    }

    /// Text content, if this is a text segment.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Marker(_) => None,
        }
    }

    pub const fn as_marker(&self) -> Option<&Marker> {
        match self {
            Self::Marker(marker) => Some(marker),
            Self::Text(_) => None,
        }
    }

    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Width in the flat offset space: char count for text, zero for markers.
    pub fn flat_len(&self) -> usize {
        match self {
            Self::Text(text) => text.chars().count(),
            Self::Marker(_) => 0,
        }
    }
}

/// Byte index of the `char_idx`-th char of `s`, clamped to `s.len()`.
pub(crate) fn byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

/// Substring of `s` between two char offsets.
pub(crate) fn char_slice(s: &str, start: usize, end: usize) -> &str {
    &s[byte_index(s, start)..byte_index(s, end)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color_accepts_six_digits() {
        let color = HexColor::parse("FF8800").unwrap();
        assert_eq!(color.as_str(), "FF8800");
        assert_eq!(color.rgb(), (0xFF, 0x88, 0x00));
    }

    #[test]
    fn test_hex_color_strips_leading_hash() {
        let color = HexColor::parse("#00aa11").unwrap();
        assert_eq!(color.as_str(), "00aa11");
    }

    #[test]
    fn test_hex_color_rejects_bad_input() {
        assert!(HexColor::parse("12345").is_err());
        assert!(HexColor::parse("1234567").is_err());
        assert!(HexColor::parse("12345g").is_err());
        assert_eq!(
            HexColor::parse("red"),
            Err(DocumentError::InvalidColor("red".to_string()))
        );
    }

    #[test]
    fn test_same_color_ignores_case() {
        let a = HexColor::parse("abcdef").unwrap();
        let b = HexColor::parse("ABCDEF").unwrap();
        assert!(a.same_color(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_marker_tags() {
        assert_eq!(Marker::Open(Format::Bold).tag(), "<b>");
        assert_eq!(Marker::Close(Style::Underline).tag(), "</u>");
        let color = HexColor::parse("112233").unwrap();
        assert_eq!(
            Marker::Open(Format::Color(color)).tag(),
            "<font color=\"#112233\">"
        );
        assert_eq!(Marker::Close(Style::Color).tag(), "</font>");
    }

    #[test]
    fn test_marker_has_zero_flat_width() {
        assert_eq!(Segment::open(Format::Italic).flat_len(), 0);
        assert_eq!(Segment::text("héllo").flat_len(), 5);
    }

    #[test]
    fn test_char_slice_handles_multibyte() {
        assert_eq!(char_slice("café au lait", 2, 6), "fé a");
        assert_eq!(char_slice("abc", 1, 10), "bc");
    }
}
