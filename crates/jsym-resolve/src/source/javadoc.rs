//! Rewriting a method's documentation comment in its backing file.

use jsym_core::{apply_text_edits, LineCol, LineIndex, TextEdit, TextRange, TextSize};
use jsym_syntax::{Javadoc, NodeId, SyntaxTree};
use jsym_types::{Error, Result};

/// Insert or replace the doc comment of `method` and write the file back.
///
/// Positions known to the tree are mapped to the file by line and column, so
/// a file that only changed below the method (or by earlier calls here)
/// still lines up. Returns `false` when the tree has no backing file.
pub(crate) fn set_javadoc(tree: &SyntaxTree, method: NodeId, javadoc: &Javadoc) -> Result<bool> {
    let Some(path) = tree.path() else {
        return Ok(false);
    };
    let Some(decl) = tree.as_method(method) else {
        return Err(Error::InvalidInput(format!(
            "node {} is not a method",
            method.index()
        )));
    };

    let text = std::fs::read_to_string(path)
        .map_err(|err| Error::environment(format!("reading {}", path.display()), err))?;
    let file_index = LineIndex::new(&text);
    let to_file = |offset: TextSize| -> Result<TextSize> {
        let LineCol { line, col } = tree.line_index().line_col(offset);
        file_index.offset(LineCol { line, col }).ok_or_else(|| {
            Error::InvalidInput(format!(
                "{} no longer has line {} column {}",
                path.display(),
                line + 1,
                col + 1
            ))
        })
    };

    let method_start = to_file(tree.range(method).start())?;
    let indent = file_index.indentation(&text, method_start).to_string();
    let comment = javadoc.to_comment(&indent);
    let insertion = || TextEdit::insert(method_start, format!("{comment}\n{indent}"));

    let edit = match (tree.attached_doc(method), &decl.doc) {
        (Some(previous), parsed) => {
            let begin = match parsed {
                Some(doc) => to_file(doc.range.start())?,
                None => method_start,
            };
            match rendered_extent(&text, &file_index, begin, &previous.to_comment(&indent)) {
                Some(end) => TextEdit::new(TextRange::new(begin, end), comment.clone()),
                None => {
                    tracing::warn!(
                        target = "jsym.resolve",
                        path = %path.display(),
                        method = %decl.name,
                        "could not locate the previous doc comment; inserting a new one"
                    );
                    insertion()
                }
            }
        }
        (None, Some(doc)) => TextEdit::new(
            TextRange::new(to_file(doc.range.start())?, to_file(doc.range.end())?),
            comment.clone(),
        ),
        (None, None) => insertion(),
    };

    let updated = apply_text_edits(&text, &[edit])
        .map_err(|err| Error::environment(format!("editing {}", path.display()), err))?;
    jsym_core::fs::replace_file(path, updated.as_bytes())
        .map_err(|err| Error::environment(format!("writing {}", path.display()), err))?;
    tracing::debug!(
        target = "jsym.resolve",
        path = %path.display(),
        method = %decl.name,
        "doc comment written"
    );

    tree.attach_doc(method, javadoc.clone());
    Ok(true)
}

/// End of a comment rendered as `rendered` starting at `begin`, found by
/// counting its lines. `None` when the text there is not that comment.
fn rendered_extent(
    text: &str,
    index: &LineIndex,
    begin: TextSize,
    rendered: &str,
) -> Option<TextSize> {
    let first_line = index.line_col(begin).line;
    let line_count = u32::try_from(rendered.lines().count()).ok()?;
    let last_line = first_line.checked_add(line_count.checked_sub(1)?)?;
    let end = index.line_end(last_line)?;
    let found = text.get(usize::from(begin)..usize::from(end))?;
    (found.trim_end() == rendered.trim_end()).then_some(end)
}
