use std::fmt;
use std::sync::{Arc, Weak};

use once_cell::sync::OnceCell;

use crate::declarations::TypeDeclRef;
use crate::error::{Error, Result};
use crate::symbol::SymbolReference;

/// One backend of the type-solver tree.
pub trait TypeSolverBackend: fmt::Debug + Send + Sync {
    /// Short label for logs and error context.
    fn label(&self) -> String;

    /// Look `name` up in this backend only. Declarations created for the
    /// answer resolve their own references through `root`.
    fn try_to_solve_type(
        &self,
        name: &str,
        root: &TypeSolver,
    ) -> Result<SymbolReference<TypeDeclRef>>;
}

struct SolverNode {
    backend: Box<dyn TypeSolverBackend>,
    parent: OnceCell<Weak<SolverNode>>,
}

/// Shared handle to a node of the type-solver tree.
///
/// Each node has at most one parent, assigned once. Queries made through any
/// node hand the tree's root to the backend, so declarations found by a
/// child still resolve their supertypes across the whole chain.
#[derive(Clone)]
pub struct TypeSolver(Arc<SolverNode>);

impl TypeSolver {
    pub fn new(backend: impl TypeSolverBackend + 'static) -> Self {
        Self(Arc::new(SolverNode {
            backend: Box::new(backend),
            parent: OnceCell::new(),
        }))
    }

    #[must_use]
    pub fn label(&self) -> String {
        self.0.backend.label()
    }

    #[must_use]
    pub fn parent(&self) -> Option<TypeSolver> {
        self.0.parent.get().and_then(Weak::upgrade).map(TypeSolver)
    }

    /// Attach this solver under `parent`. Self-parenting, cycles and
    /// re-parenting are rejected.
    pub fn set_parent(&self, parent: &TypeSolver) -> Result<()> {
        if self.ptr_eq(parent) {
            return Err(Error::InvalidInput(format!(
                "type solver `{}` cannot be its own parent",
                self.label()
            )));
        }
        let mut ancestor = parent.parent();
        while let Some(node) = ancestor {
            if node.ptr_eq(self) {
                return Err(Error::InvalidInput(format!(
                    "making `{}` the parent of `{}` would create a cycle",
                    parent.label(),
                    self.label()
                )));
            }
            ancestor = node.parent();
        }
        self.0
            .parent
            .set(Arc::downgrade(&parent.0))
            .map_err(|_| {
                Error::InvalidInput(format!(
                    "type solver `{}` already has a parent",
                    self.label()
                ))
            })?;
        tracing::trace!(
            target = "jsym.solver",
            child = %self.label(),
            parent = %parent.label(),
            "linked type solver"
        );
        Ok(())
    }

    #[must_use]
    pub fn root(&self) -> TypeSolver {
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    pub fn try_to_solve_type(&self, name: &str) -> Result<SymbolReference<TypeDeclRef>> {
        let root = self.root();
        self.0.backend.try_to_solve_type(name, &root)
    }

    /// Like [`TypeSolver::try_to_solve_type`], but absence is an error.
    pub fn solve_type(&self, name: &str) -> Result<TypeDeclRef> {
        self.try_to_solve_type(name)?
            .into_declaration()
            .ok_or_else(|| Error::unsolved(name, format!("type solver `{}`", self.label())))
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &TypeSolver) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for TypeSolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeSolver({})", self.label())
    }
}
