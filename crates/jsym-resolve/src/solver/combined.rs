use jsym_config::ErrorPolicy;
use jsym_types::{Result, SymbolReference, TypeDeclRef, TypeSolver, TypeSolverBackend};

/// Asks its children in order; the first solved answer wins.
#[derive(Debug)]
pub struct CombinedTypeSolver {
    children: Vec<TypeSolver>,
    policy: ErrorPolicy,
}

impl CombinedTypeSolver {
    /// Create the combined node and make it the parent of every child.
    /// Fails when a child already has a parent.
    pub fn build(children: Vec<TypeSolver>, policy: ErrorPolicy) -> Result<TypeSolver> {
        let solver = TypeSolver::new(CombinedTypeSolver {
            children: children.clone(),
            policy,
        });
        for child in &children {
            child.set_parent(&solver)?;
        }
        Ok(solver)
    }
}

impl TypeSolverBackend for CombinedTypeSolver {
    fn label(&self) -> String {
        let labels: Vec<String> = self.children.iter().map(TypeSolver::label).collect();
        format!("combined[{}]", labels.join(", "))
    }

    fn try_to_solve_type(
        &self,
        name: &str,
        _root: &TypeSolver,
    ) -> Result<SymbolReference<TypeDeclRef>> {
        for child in &self.children {
            match child.try_to_solve_type(name) {
                Ok(found) if found.is_solved() => return Ok(found),
                Ok(_) => {}
                Err(err) => match self.policy {
                    ErrorPolicy::Propagate => return Err(err),
                    ErrorPolicy::SkipFailing => {
                        tracing::warn!(
                            target = "jsym.solver",
                            solver = %child.label(),
                            name,
                            error = %err,
                            "type solver failed; skipping it"
                        );
                    }
                },
            }
        }
        Ok(SymbolReference::unsolved())
    }
}
