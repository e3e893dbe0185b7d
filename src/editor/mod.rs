//! Host-facing editor shell.
//!
//! Wraps a segment [`Document`](crate::document::Document) with a
//! rope-backed mirror of the host's visible text, change tracking and
//! pending render updates.

mod buffer;

pub use buffer::{EditorBuffer, RenderUpdate};
