//! Source worlds backed by the memory solver over the platform registry.

use std::sync::Arc;

use jsym_config::ErrorPolicy;
use jsym_resolve::solver::{CombinedTypeSolver, MemoryTypeSolver, ReflectionTypeSolver};
use jsym_resolve::SymbolSolver;
use jsym_syntax::{NodeId, SyntaxTree};
use jsym_types::TypeSolver;

pub struct World {
    pub trees: Vec<Arc<SyntaxTree>>,
    pub memory: MemoryTypeSolver,
    pub solver: TypeSolver,
}

impl World {
    pub fn symbols(&self) -> SymbolSolver {
        SymbolSolver::new(self.solver.clone())
    }

    pub fn tree(&self, index: usize) -> &Arc<SyntaxTree> {
        &self.trees[index]
    }
}

/// Parse `sources` and register their types ahead of the platform classes.
pub fn world(sources: &[&str]) -> World {
    let memory = MemoryTypeSolver::new();
    let trees: Vec<Arc<SyntaxTree>> = sources
        .iter()
        .map(|text| Arc::new(jsym_syntax::parse(text).unwrap()))
        .collect();
    for tree in &trees {
        memory.add_source(tree.clone());
    }
    let solver = CombinedTypeSolver::build(
        vec![memory.solver(), TypeSolver::new(ReflectionTypeSolver::platform())],
        ErrorPolicy::Propagate,
    )
    .unwrap();
    World {
        trees,
        memory,
        solver,
    }
}

/// The outermost expression whose source text is exactly `text`.
pub fn expr(tree: &SyntaxTree, text: &str) -> NodeId {
    tree.descendants(tree.root())
        .into_iter()
        .find(|&node| tree.as_expr(node).is_some() && tree.source_of(node) == text)
        .unwrap_or_else(|| panic!("no expression `{text}`"))
}

pub fn method_named(tree: &SyntaxTree, name: &str) -> NodeId {
    tree.descendants(tree.root())
        .into_iter()
        .find(|&node| tree.as_method(node).is_some_and(|m| m.name == name))
        .unwrap_or_else(|| panic!("no method `{name}`"))
}

pub fn type_named(tree: &SyntaxTree, path: &str) -> NodeId {
    tree.find_type(path)
        .unwrap_or_else(|| panic!("no type `{path}`"))
}
