use std::sync::Arc;

use jsym_types::{Result, SymbolReference, TypeDeclRef, TypeSolver, TypeSolverBackend};

use crate::reflection::{ReflectionTypeDeclaration, RuntimeRegistry};

/// Answers from a [`RuntimeRegistry`].
#[derive(Debug)]
pub struct ReflectionTypeSolver {
    registry: Arc<RuntimeRegistry>,
    jre_only: bool,
}

impl ReflectionTypeSolver {
    /// With `jre_only`, only `java.` and `javax.` names are answered.
    #[must_use]
    pub fn new(registry: Arc<RuntimeRegistry>, jre_only: bool) -> Self {
        Self { registry, jre_only }
    }

    /// The platform registry with the `jre_only` filter on.
    #[must_use]
    pub fn platform() -> Self {
        Self::new(RuntimeRegistry::platform(), true)
    }
}

impl TypeSolverBackend for ReflectionTypeSolver {
    fn label(&self) -> String {
        if self.jre_only {
            "reflection(jre)".to_string()
        } else {
            "reflection".to_string()
        }
    }

    fn try_to_solve_type(
        &self,
        name: &str,
        root: &TypeSolver,
    ) -> Result<SymbolReference<TypeDeclRef>> {
        if self.jre_only && !(name.starts_with("java.") || name.starts_with("javax.")) {
            return Ok(SymbolReference::unsolved());
        }
        Ok(self
            .registry
            .get(name)
            .map(|mirror| Arc::new(ReflectionTypeDeclaration::new(mirror, root.clone())) as TypeDeclRef)
            .into())
    }
}
