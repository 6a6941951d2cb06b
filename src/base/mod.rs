//! Foundation types shared by every layer of arbor.
//!
//! - [`Position`], [`Span`] - line/column locations attached to nodes and issues
//! - [`LineIndex`] - byte offset to line/column conversion
//! - [`Source`] - the origin of a whole tree, used to ground node identifiers
//!
//! This module has NO dependencies on other arbor modules.

mod line_index;
mod position;
mod source;

pub use line_index::LineIndex;
pub use position::{Position, Span};
pub use source::Source;

// Re-export text-size types for convenience
pub use text_size::{self, TextRange, TextSize};
