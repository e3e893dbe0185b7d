//! Edit commands given on the command line.
//!
//! One command per token:
//! - `insert:OFFSET:TEXT` (`\n` in TEXT becomes a line break)
//! - `delete:START:END`
//! - `span:START:END:STYLE` where STYLE is `bold`, `underline`, `italic`
//!   (or `b`, `u`, `i`) or `color=RRGGBB`

use std::str::FromStr;

use thiserror::Error;

use crate::document::{DocumentError, Format, HexColor};
use crate::editor::EditorBuffer;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("unknown edit command {0:?}")]
    UnknownCommand(String),

    #[error("edit command {command:?} is missing its {field} field")]
    MissingField {
        command: String,
        field: &'static str,
    },

    #[error("invalid {field} {value:?} in edit command")]
    InvalidNumber { field: &'static str, value: String },

    #[error("unknown style {0:?}")]
    UnknownStyle(String),

    #[error(transparent)]
    Color(DocumentError),
}

/// A single scripted edit in flat offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    Insert { offset: usize, text: String },
    Delete { start: usize, end: usize },
    Span { start: usize, end: usize, format: Format },
}

impl EditCommand {
    /// Run the command against a buffer as if the host had made the edit.
    pub fn apply(&self, buffer: &mut EditorBuffer) -> crate::document::Result<()> {
        tracing::debug!(target: "markspan::script", command = ?self, "applying edit");
        match self {
            Self::Insert { offset, text } => {
                buffer.on_change(*offset, 0, text)?;
            }
            Self::Delete { start, end } => {
                buffer.on_change(*start, end.saturating_sub(*start), "")?;
            }
            Self::Span { start, end, format } => buffer.apply_span(*start, *end, format)?,
        }
        Ok(())
    }
}

impl FromStr for EditCommand {
    type Err = ScriptError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let (name, rest) = token.split_once(':').unwrap_or((token, ""));
        let missing = |field| ScriptError::MissingField {
            command: token.to_string(),
            field,
        };
        match name {
            "insert" => {
                let (offset, text) = rest.split_once(':').ok_or_else(|| missing("text"))?;
                Ok(Self::Insert {
                    offset: parse_offset("offset", offset)?,
                    text: text.replace("\\n", "\n"),
                })
            }
            "delete" => {
                let (start, end) = rest.split_once(':').ok_or_else(|| missing("end"))?;
                Ok(Self::Delete {
                    start: parse_offset("start", start)?,
                    end: parse_offset("end", end)?,
                })
            }
            "span" => {
                let mut fields = rest.splitn(3, ':');
                let start = fields.next().filter(|s| !s.is_empty());
                let start = start.ok_or_else(|| missing("start"))?;
                let end = fields.next().ok_or_else(|| missing("end"))?;
                let style = fields.next().ok_or_else(|| missing("style"))?;
                Ok(Self::Span {
                    start: parse_offset("start", start)?,
                    end: parse_offset("end", end)?,
                    format: parse_format(style)?,
                })
            }
            _ => Err(ScriptError::UnknownCommand(token.to_string())),
        }
    }
}

fn parse_offset(field: &'static str, value: &str) -> Result<usize, ScriptError> {
    value.trim().parse().map_err(|_| ScriptError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

fn parse_format(style: &str) -> Result<Format, ScriptError> {
    match style {
        "bold" | "b" => Ok(Format::Bold),
        "underline" | "u" => Ok(Format::Underline),
        "italic" | "i" => Ok(Format::Italic),
        _ => match style.strip_prefix("color=") {
            Some(hex) => HexColor::parse(hex)
                .map(Format::Color)
                .map_err(ScriptError::Color),
            None => Err(ScriptError::UnknownStyle(style.to_string())),
        },
    }
}
