use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use jsym_classfile::ClassStub;
use jsym_syntax::{NodeId, SyntaxTree};
use jsym_types::{Result, SymbolReference, TypeDeclRef, TypeSolver, TypeSolverBackend};
use parking_lot::RwLock;

use crate::bytecode::ClassDeclaration;
use crate::reflection::{ClassMirror, ReflectionTypeDeclaration};
use crate::source::SourceTypeDeclaration;

#[derive(Clone)]
enum Entry {
    /// Returned as registered.
    Declaration(TypeDeclRef),
    Source(Arc<SyntaxTree>, NodeId),
    Class(Arc<ClassStub>),
    Mirror(Arc<ClassMirror>),
}

/// A solver over types registered by hand.
///
/// The handle is cheap to clone; every clone sees the same registrations,
/// including the one wrapped by [`MemoryTypeSolver::solver`].
#[derive(Clone, Default)]
pub struct MemoryTypeSolver {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl MemoryTypeSolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A type-solver node backed by this registry.
    #[must_use]
    pub fn solver(&self) -> TypeSolver {
        TypeSolver::new(self.clone())
    }

    /// Register a ready-made declaration under its qualified name.
    pub fn add_declaration(&self, decl: TypeDeclRef) {
        let name = decl.qualified_name();
        self.entries.write().insert(name, Entry::Declaration(decl));
    }

    /// Register every type declared in `tree`, nested ones included.
    pub fn add_source(&self, tree: Arc<SyntaxTree>) {
        let mut entries = self.entries.write();
        for node in tree.all_types() {
            entries.insert(tree.qualified_name(node), Entry::Source(tree.clone(), node));
        }
    }

    pub fn add_class(&self, stub: ClassStub) {
        let name = stub.qualified_name();
        self.entries.write().insert(name, Entry::Class(Arc::new(stub)));
    }

    pub fn add_mirror(&self, mirror: ClassMirror) {
        let name = mirror.qualified_name();
        self.entries.write().insert(name, Entry::Mirror(Arc::new(mirror)));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl fmt::Debug for MemoryTypeSolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self.entries.read().keys().cloned().collect();
        names.sort();
        f.debug_struct("MemoryTypeSolver").field("types", &names).finish()
    }
}

impl TypeSolverBackend for MemoryTypeSolver {
    fn label(&self) -> String {
        "memory".to_string()
    }

    fn try_to_solve_type(
        &self,
        name: &str,
        root: &TypeSolver,
    ) -> Result<SymbolReference<TypeDeclRef>> {
        let Some(entry) = self.entries.read().get(name).cloned() else {
            return Ok(SymbolReference::unsolved());
        };
        let decl: TypeDeclRef = match entry {
            Entry::Declaration(decl) => decl,
            Entry::Source(tree, node) => Arc::new(SourceTypeDeclaration::at(&tree, node, root)),
            Entry::Class(stub) => Arc::new(ClassDeclaration::new(stub, root.clone())),
            Entry::Mirror(mirror) => Arc::new(ReflectionTypeDeclaration::new(mirror, root.clone())),
        };
        Ok(SymbolReference::solved(decl))
    }
}
