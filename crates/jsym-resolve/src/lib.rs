//! Symbol resolution for Java.
//!
//! Declarations come from three backends that share one capability surface
//! (see [`jsym_types`]):
//!
//! - [`source`]: parsed `.java` files,
//! - [`bytecode`]: compiled `.class` files,
//! - [`reflection`]: a registry of runtime class mirrors.
//!
//! A [`Context`] resolves names in one lexical scope and defers to the
//! enclosing one; the compilation unit at the top consults imports and the
//! configured [`TypeSolver`](jsym_types::TypeSolver) chain built from
//! [`solver`]. [`SymbolSolver`] bundles the common queries.

#![forbid(unsafe_code)]

mod annotations;
pub mod bytecode;
mod context;
mod convert;
mod expr;
mod facade;
pub mod method_resolution;
pub mod reflection;
pub mod solver;
pub mod source;

pub use context::Context;
pub use facade::SymbolSolver;
pub use method_resolution::{find_most_applicable, solve_method_in_type};
