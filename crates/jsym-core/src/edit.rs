//! Text edits over a single source snapshot.

use std::fmt;

use crate::text::{TextRange, TextSize};

/// Replace `range` with `replacement`; an empty range is an insertion.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TextEdit {
    pub range: TextRange,
    pub replacement: String,
}

impl TextEdit {
    pub fn new(range: TextRange, replacement: impl Into<String>) -> Self {
        Self {
            range,
            replacement: replacement.into(),
        }
    }

    pub fn insert(offset: TextSize, text: impl Into<String>) -> Self {
        Self::new(TextRange::empty(offset), text)
    }

    pub fn delete(range: TextRange) -> Self {
        Self::new(range, String::new())
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum EditError {
    RangeOutOfBounds { range: TextRange, text_len: TextSize },
    InvalidUtf8Boundary { offset: TextSize },
    OverlappingEdits { first: TextRange, second: TextRange },
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditError::RangeOutOfBounds { range, text_len } => write!(
                f,
                "edit range {range:?} exceeds text length {text_len:?}"
            ),
            EditError::InvalidUtf8Boundary { offset } => {
                write!(f, "offset {offset:?} splits a UTF-8 character")
            }
            EditError::OverlappingEdits { first, second } => {
                write!(f, "edit {first:?} overlaps edit {second:?}")
            }
        }
    }
}

impl std::error::Error for EditError {}

/// Apply `edits` to `text`.
///
/// Edits may be given in any order; they are validated against the original
/// text and applied back to front.
pub fn apply_text_edits(text: &str, edits: &[TextEdit]) -> Result<String, EditError> {
    let mut edits = edits.to_vec();
    normalize_text_edits(text, &mut edits)?;

    let mut out = text.to_string();
    for edit in edits.iter().rev() {
        let start = usize::from(edit.range.start());
        let end = usize::from(edit.range.end());
        out.replace_range(start..end, &edit.replacement);
    }
    Ok(out)
}

/// Sort `edits` by position, reject out-of-bounds or overlapping edits and
/// merge edits that touch.
pub fn normalize_text_edits(text: &str, edits: &mut Vec<TextEdit>) -> Result<(), EditError> {
    edits.sort_by_key(|edit| (edit.range.start(), edit.range.end()));

    let text_len = TextSize::of(text);
    for edit in edits.iter() {
        if edit.range.end() > text_len {
            return Err(EditError::RangeOutOfBounds {
                range: edit.range,
                text_len,
            });
        }
        for offset in [edit.range.start(), edit.range.end()] {
            if !text.is_char_boundary(usize::from(offset)) {
                return Err(EditError::InvalidUtf8Boundary { offset });
            }
        }
    }

    for pair in edits.windows(2) {
        let (first, second) = (&pair[0], &pair[1]);
        let same_point_inserts = first.range.is_empty()
            && second.range.is_empty()
            && first.range.start() == second.range.start();
        if first.range.end() > second.range.start() || same_point_inserts {
            return Err(EditError::OverlappingEdits {
                first: first.range,
                second: second.range,
            });
        }
    }

    let mut merged: Vec<TextEdit> = Vec::with_capacity(edits.len());
    for edit in edits.drain(..) {
        match merged.last_mut() {
            Some(last) if last.range.end() == edit.range.start() => {
                last.range = last.range.cover(edit.range);
                last.replacement.push_str(&edit.replacement);
            }
            _ => merged.push(edit),
        }
    }
    *edits = merged;
    Ok(())
}
