use crate::declarations::ValueDeclaration;
use crate::error::Result;
use crate::ty::ResolvedType;

/// Outcome of a resolution query: the declaration found, or nothing.
#[derive(Debug, Clone)]
pub enum SymbolReference<T> {
    Solved(T),
    Unsolved,
}

impl<T> SymbolReference<T> {
    pub fn solved(declaration: T) -> Self {
        SymbolReference::Solved(declaration)
    }

    pub fn unsolved() -> Self {
        SymbolReference::Unsolved
    }

    #[must_use]
    pub fn is_solved(&self) -> bool {
        matches!(self, SymbolReference::Solved(_))
    }

    #[must_use]
    pub fn declaration(&self) -> Option<&T> {
        match self {
            SymbolReference::Solved(declaration) => Some(declaration),
            SymbolReference::Unsolved => None,
        }
    }

    pub fn into_declaration(self) -> Option<T> {
        match self {
            SymbolReference::Solved(declaration) => Some(declaration),
            SymbolReference::Unsolved => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SymbolReference<U> {
        match self {
            SymbolReference::Solved(declaration) => SymbolReference::Solved(f(declaration)),
            SymbolReference::Unsolved => SymbolReference::Unsolved,
        }
    }
}

impl<T> Default for SymbolReference<T> {
    fn default() -> Self {
        SymbolReference::Unsolved
    }
}

impl<T> From<Option<T>> for SymbolReference<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(declaration) => SymbolReference::Solved(declaration),
            None => SymbolReference::Unsolved,
        }
    }
}

/// A symbol used as a value: its name and type.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    pub name: String,
    pub ty: ResolvedType,
}

impl Value {
    pub fn from_declaration(declaration: &ValueDeclaration) -> Result<Self> {
        Ok(Self {
            name: declaration.name(),
            ty: declaration.ty()?,
        })
    }
}
