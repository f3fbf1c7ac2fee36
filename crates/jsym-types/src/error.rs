pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures of a resolution query.
///
/// A name that simply cannot be found is not an error; it is reported as
/// [`SymbolReference::Unsolved`](crate::SymbolReference::Unsolved).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("expected {expected}, found `{found}`")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },
    /// A name that must resolve (a supertype, a required type) did not.
    #[error("unsolved symbol `{name}` in {context}")]
    UnsolvedSymbol { name: String, context: String },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unsupported operation: {0}")]
    Unsupported(String),
    #[error("unsupported annotation expression kind: {0}")]
    UnsupportedAnnotationExprKind(String),
    #[error("ambiguous method call `{name}`, candidates: {}", .candidates.join(", "))]
    MethodAmbiguity {
        name: String,
        candidates: Vec<String>,
    },
    /// I/O, archive, class-file or parse failure, wrapped with the entry or
    /// path that failed.
    #[error("{context}: {source}")]
    Environment {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    pub fn unsolved(name: impl Into<String>, context: impl Into<String>) -> Self {
        Error::UnsolvedSymbol {
            name: name.into(),
            context: context.into(),
        }
    }

    pub fn environment(
        context: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::Environment {
            context: context.into(),
            source: source.into(),
        }
    }
}
