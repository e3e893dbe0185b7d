use ropey::Rope;

use crate::document::{Document, DocumentError, Format, InlineSpan, ParseMode, Result};
use crate::perf;

/// What the host needs to redraw after a change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderUpdate {
    /// Normalized markup.
    pub markup: String,
    /// Styled runs of the visible text.
    pub runs: Vec<InlineSpan>,
}

/// A rich text document paired with a rope mirror of the host's visible text.
///
/// The host reports its own edits through [`on_change`](Self::on_change) in
/// flat, tag-free offsets. Change tracking is switched off while the buffer
/// replaces its contents wholesale, so the host echoing that replacement
/// back is ignored.
pub struct EditorBuffer {
    document: Document,
    rope: Rope,
    tracking: bool,
    dirty: bool,
}

impl EditorBuffer {
    /// Create a buffer from markup, rejecting malformed tags.
    pub fn from_markup(markup: &str) -> Result<Self> {
        let mut buffer = Self::empty();
        buffer.load(Some(markup))?;
        Ok(buffer)
    }

    /// Create an empty buffer with tracking on.
    pub fn empty() -> Self {
        Self {
            document: Document::empty(),
            rope: Rope::new(),
            tracking: true,
            dirty: false,
        }
    }

    /// Replace the contents with markup. `None` or an empty string resets.
    pub fn load(&mut self, markup: Option<&str>) -> Result<()> {
        self.load_with(markup, ParseMode::Strict)
    }

    /// Replace the contents with markup parsed in the given mode.
    ///
    /// On a parse error the buffer keeps its previous contents.
    pub fn load_with(&mut self, markup: Option<&str>, mode: ParseMode) -> Result<()> {
        let _scope = perf::scope("editor.load");
        self.tracking = false;
        let result = self
            .document
            .load_with(markup.unwrap_or_default(), mode);
        if result.is_ok() {
            self.rope = Rope::from_str(&self.document.flatten_text());
            self.dirty = true;
            perf::log_event(
                "editor.load",
                format!("{} chars, {} segments", self.rope.len_chars(), self.document.segments().len()),
            );
        }
        self.tracking = true;
        result
    }

    /// Apply a host text change: `removed` chars at `start` replaced by
    /// `inserted`.
    ///
    /// Returns `Ok(false)` without touching anything while tracking is off.
    /// Offsets are checked against the host text before anything changes.
    pub fn on_change(&mut self, start: usize, removed: usize, inserted: &str) -> Result<bool> {
        if !self.tracking {
            tracing::debug!(target: "markspan::editor", start, removed, "change ignored, tracking off");
            return Ok(false);
        }
        let len = self.rope.len_chars();
        let end = start
            .checked_add(removed)
            .filter(|end| *end <= len)
            .ok_or(DocumentError::OffsetOutOfRange {
                offset: start.saturating_add(removed),
                len,
            })?;

        let _scope = perf::scope("editor.on_change");
        self.document.replace(start, removed, inserted)?;
        self.rope.remove(start..end);
        self.rope.insert(start, inserted);
        self.dirty = true;
        perf::log_event(
            "editor.on_change",
            format!("start={start} removed={removed} inserted={}", inserted.chars().count()),
        );
        Ok(true)
    }

    /// Style the flat range `start..end`.
    pub fn apply_span(&mut self, start: usize, end: usize, format: &Format) -> Result<()> {
        let _scope = perf::scope("editor.apply_span");
        self.document.apply_span(start, end, format)?;
        if start != end {
            self.dirty = true;
        }
        perf::log_event(
            "editor.apply_span",
            format!("{start}..{end} {:?}", format.style()),
        );
        Ok(())
    }

    /// Switch change tracking on or off.
    pub const fn set_tracking(&mut self, tracking: bool) {
        self.tracking = tracking;
    }

    /// Whether host changes are currently applied.
    pub const fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// The normalized markup of the document.
    pub fn markup(&mut self) -> String {
        self.document.markup()
    }

    /// The visible text as the host sees it.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Length of the visible text in chars.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// The underlying document.
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// Whether a render update is waiting.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Take the pending render update, if the contents changed since the
    /// last one was taken.
    pub fn take_update(&mut self) -> Option<RenderUpdate> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        Some(RenderUpdate {
            markup: self.document.markup(),
            runs: self.document.runs(),
        })
    }

    /// Whether the rope mirror and the document agree on the visible text.
    pub fn is_consistent(&self) -> bool {
        let flat = self.document.flatten_text();
        self.rope.len_chars() == flat.chars().count() && self.rope == flat.as_str()
    }
}

impl Default for EditorBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field(
                "rope",
                &format_args!("Rope({} chars)", self.rope.len_chars()),
            )
            .field("segments", &self.document.segments().len())
            .field("tracking", &self.tracking)
            .field("dirty", &self.dirty)
            .finish()
    }
}
