// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. document::DocumentError)
    clippy::module_name_repetitions
)]

//! # Markspan
//!
//! A rich text model for editors that show styled text but report edits in
//! plain, tag-free offsets.
//!
//! Markspan keeps a document as a flat list of text and marker segments:
//! - Restricted markup in (`<b>`, `<u>`, `<i>`, `<font color>`, `<br/>`)
//! - Inserts, deletes and styled spans over flat offsets
//! - A normalizer that keeps the list minimal and well nested
//! - Normalized markup and styled runs out
//!
//! ## Modules
//!
//! - [`document`]: Segment model, parsing, editing, normalizing, serializing
//! - [`editor`]: Host-facing buffer with change tracking and render updates
//! - [`script`]: Edit commands for the command line
//! - [`config`]: Saved default flags
//! - [`perf`]: Timing and edit debug log

pub mod config;
pub mod document;
pub mod editor;
pub mod perf;
pub mod script;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::document::{Document, DocumentError, Format, HexColor, ParseMode, Segment};
    pub use crate::editor::{EditorBuffer, RenderUpdate};
    pub use crate::script::EditCommand;
}
