//! Java syntax for symbol resolution: a lexer, a recursive-descent parser
//! over the declaration-heavy subset of the language, an arena-backed
//! [`SyntaxTree`], and a Javadoc model that can be rendered back to source.
//!
//! Lambdas, method references and `switch` bodies are recognized only far
//! enough to be skipped; they appear in the tree as [`Expr::Unsupported`]
//! and [`Stmt::Other`].

#![forbid(unsafe_code)]

mod ast;
mod error;
mod javadoc;
mod lexer;
mod parser;
mod tree;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

pub use ast::*;
pub use error::{JavadocError, ParseError};
pub use javadoc::{
    BlockTag, BlockTagKind, Description, DescriptionElement, InlineTag, InlineTagKind, Javadoc,
};
pub use lexer::DocComment;
pub use tree::SyntaxTree;

/// Parse a compilation unit that has no backing file.
pub fn parse(text: &str) -> Result<SyntaxTree, ParseError> {
    parser::parse(text, None)
}

/// A parser instance that can be shared between solvers.
///
/// Parses are serialized through an internal lock, and every successful or
/// failed parse is counted so callers can observe how much work caching
/// saved them.
#[derive(Debug, Default)]
pub struct JavaParser {
    lock: Mutex<()>,
    parses: AtomicUsize,
}

impl JavaParser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(&self, text: &str) -> Result<SyntaxTree, ParseError> {
        self.parse_with_path(text, None)
    }

    /// Parse `text`, recording `path` as the tree's storage location.
    pub fn parse_with_path(
        &self,
        text: &str,
        path: Option<PathBuf>,
    ) -> Result<SyntaxTree, ParseError> {
        let _guard = self.lock.lock();
        self.parses.fetch_add(1, Ordering::Relaxed);
        let result = parser::parse(text, path);
        if let Err(err) = &result {
            tracing::debug!(target = "jsym.syntax", error = %err, "parse failed");
        }
        result
    }

    pub fn parse_file(&self, path: &Path) -> Result<SyntaxTree, ParseError> {
        let text = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse_with_path(&text, Some(path.to_path_buf()))
    }

    /// Number of parses this instance has run.
    #[must_use]
    pub fn parse_count(&self) -> usize {
        self.parses.load(Ordering::Relaxed)
    }
}
