//! Type solvers: backends that map qualified names to type declarations,
//! chained under a [`CombinedTypeSolver`].
//!
//! Caches hold parsed trees, class stubs and lookup outcomes, never
//! declarations: a declaration is rebuilt for every answer so it resolves
//! through the root of whichever tree asked.

mod class;
mod combined;
mod memory;
mod reflection;
mod source;

use std::borrow::Borrow;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::Arc;

use jsym_config::{ResolverConfig, SolverEntry};
use jsym_syntax::JavaParser;
use jsym_types::{Error, Result, TypeSolver};
use lru::LruCache;
use parking_lot::Mutex;

pub use class::ClassArchiveTypeSolver;
pub use combined::CombinedTypeSolver;
pub use memory::MemoryTypeSolver;
pub use reflection::ReflectionTypeSolver;
pub use source::SourceArchiveTypeSolver;

use crate::reflection::RuntimeRegistry;

/// Capacity of each solver cache unless configured otherwise.
pub const DEFAULT_CACHE_SIZE_LIMIT: usize = 1024;

/// Build the solver chain described by `config`, in entry order.
///
/// Source entries share one parser. Entries naming a path that does not
/// exist are rejected.
pub fn from_config(config: &ResolverConfig) -> Result<TypeSolver> {
    let limit = config.solver.cache_size_limit;
    let parser = Arc::new(JavaParser::new());
    let mut children = Vec::with_capacity(config.solver.entries.len());
    for entry in &config.solver.entries {
        if let Some(path) = entry.path() {
            if !path.exists() {
                return Err(Error::InvalidInput(format!(
                    "solver entry path {} does not exist",
                    path.display()
                )));
            }
        }
        let child = match entry {
            SolverEntry::Reflection { jre_only } => TypeSolver::new(ReflectionTypeSolver::new(
                RuntimeRegistry::platform(),
                *jre_only,
            )),
            SolverEntry::SourceArchive { path } | SolverEntry::SourceDir { path } => TypeSolver::new(
                SourceArchiveTypeSolver::with_parser(path.clone(), parser.clone(), limit),
            ),
            SolverEntry::ClassArchive { path } => {
                TypeSolver::new(ClassArchiveTypeSolver::with_cache_size_limit(path.clone(), limit))
            }
            SolverEntry::Memory => MemoryTypeSolver::new().solver(),
        };
        tracing::debug!(target = "jsym.solver", solver = %child.label(), "configured type solver");
        children.push(child);
    }
    CombinedTypeSolver::build(children, config.solver.error_policy)
}

/// An LRU map behind a lock. The lock is held only for the lookup or the
/// insertion, so two threads may compute the same missing entry.
pub(crate) struct Cache<K: Hash + Eq, V> {
    entries: Mutex<LruCache<K, V>>,
}

impl<K: Hash + Eq, V: Clone> Cache<K, V> {
    /// `limit == 0` leaves the cache unbounded.
    pub(crate) fn new(limit: usize) -> Self {
        let lru = match NonZeroUsize::new(limit) {
            Some(capacity) => LruCache::new(capacity),
            None => LruCache::unbounded(),
        };
        Self {
            entries: Mutex::new(lru),
        }
    }

    pub(crate) fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.lock().get(key).cloned()
    }

    pub(crate) fn insert(&self, key: K, value: V) {
        self.entries.lock().put(key, value);
    }
}
