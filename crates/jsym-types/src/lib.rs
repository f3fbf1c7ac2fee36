//! The resolved Java type model and the declaration surface every backend
//! (source, class file, runtime registry) implements.
//!
//! Types are immutable values ([`ResolvedType`]) that can be compared,
//! substituted and tested for assignability. Declarations are trait objects
//! created on demand by a [`TypeSolver`] backend; solvers cache whatever
//! backing data they like but never the declarations themselves.

#![forbid(unsafe_code)]

mod declarations;
mod error;
mod solver;
mod symbol;
mod ty;

pub use declarations::*;
pub use error::{Error, Result};
pub use solver::{TypeSolver, TypeSolverBackend};
pub use symbol::{SymbolReference, Value};
pub use ty::{
    BoundKind, PrimitiveType, ReferenceType, ResolvedType, TypeKind, Wildcard, JAVA_LANG_OBJECT,
};
