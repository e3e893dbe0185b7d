//! Display-time styled runs.

use serde::Serialize;

use super::Document;
use super::types::{Format, HexColor, Marker, Segment, Style};

/// Inline style flags for a text run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InlineStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fg: Option<InlineColor>,
}

/// RGB color for inline styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InlineColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl From<&HexColor> for InlineColor {
    fn from(color: &HexColor) -> Self {
        let (r, g, b) = color.rgb();
        Self { r, g, b }
    }
}

/// A styled inline span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineSpan {
    text: String,
    style: InlineStyle,
}

impl InlineSpan {
    pub const fn new(text: String, style: InlineStyle) -> Self {
        Self { text, style }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn style(&self) -> InlineStyle {
        self.style
    }
}

/// Open markers at the current point of a left-to-right walk.
#[derive(Debug, Default)]
struct ActiveFormats {
    bold: usize,
    italic: usize,
    underline: usize,
    colors: Vec<InlineColor>,
}

impl ActiveFormats {
    fn apply(&mut self, marker: &Marker) {
        match marker {
            Marker::Open(Format::Bold) => self.bold += 1,
            Marker::Open(Format::Italic) => self.italic += 1,
            Marker::Open(Format::Underline) => self.underline += 1,
            Marker::Open(Format::Color(color)) => self.colors.push(color.into()),
            Marker::Close(Style::Bold) => self.bold = self.bold.saturating_sub(1),
            Marker::Close(Style::Italic) => self.italic = self.italic.saturating_sub(1),
            Marker::Close(Style::Underline) => {
                self.underline = self.underline.saturating_sub(1);
            }
            Marker::Close(Style::Color) => {
                self.colors.pop();
            }
        }
    }

    fn style(&self) -> InlineStyle {
        InlineStyle {
            bold: self.bold > 0,
            italic: self.italic > 0,
            underline: self.underline > 0,
            fg: self.colors.last().copied(),
        }
    }
}

impl Document {
    /// The text as styled runs for display, one run per stretch of
    /// identically styled text.
    pub fn runs(&self) -> Vec<InlineSpan> {
        let mut active = ActiveFormats::default();
        let mut runs: Vec<InlineSpan> = Vec::new();
        for segment in &self.segments {
            match segment {
                Segment::Marker(marker) => active.apply(marker),
                Segment::Text(text) if text.is_empty() => {}
                Segment::Text(text) => {
                    let style = active.style();
                    match runs.last_mut() {
                        Some(last) if last.style == style => last.text.push_str(text),
                        _ => runs.push(InlineSpan::new(text.clone(), style)),
                    }
                }
            }
        }
        runs
    }
}
