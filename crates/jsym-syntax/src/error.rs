use std::path::PathBuf;

use jsym_core::LineCol;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("{line}:{col}: {message}", line = .position.line + 1, col = .position.col + 1)]
    Syntax {
        message: String,
        offset: u32,
        position: LineCol,
    },
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JavadocError {
    #[error("inline tag must be enclosed in `{{@` and `}}`: {0:?}")]
    MalformedInlineTag(String),
}
