//! Shared primitives for the jsym crates: name matching, text ranges, text
//! edits and whole-file replacement.

#![forbid(unsafe_code)]

pub mod edit;
pub mod fs;
pub mod names;
pub mod text;

pub use edit::{apply_text_edits, normalize_text_edits, EditError, TextEdit};
pub use names::{is_match, package_name, simple_name};
pub use text::{LineCol, LineIndex, TextRange, TextSize};
