use std::sync::Arc;

use jsym_syntax::{Expr, NodeId, SyntaxTree};
use jsym_types::{
    Declaration, Error, FieldRef, MethodRef, ResolvedType, Result, SymbolReference, TypeDeclRef,
    TypeSolver, Value, ValueDeclaration,
};

use crate::context::Context;
use crate::{expr, source};

/// Resolution queries over syntax trees, answered through one type solver.
#[derive(Debug, Clone)]
pub struct SymbolSolver {
    solver: TypeSolver,
}

impl SymbolSolver {
    #[must_use]
    pub fn new(solver: TypeSolver) -> Self {
        Self { solver }
    }

    #[must_use]
    pub fn type_solver(&self) -> &TypeSolver {
        &self.solver
    }

    /// The innermost scope containing `node`.
    #[must_use]
    pub fn context(&self, tree: &Arc<SyntaxTree>, node: NodeId) -> Context {
        Context::new(tree.clone(), node, self.solver.clone())
    }

    /// Resolve the simple name `name` as seen from `node`.
    pub fn solve_symbol_at(
        &self,
        tree: &Arc<SyntaxTree>,
        node: NodeId,
        name: &str,
    ) -> Result<SymbolReference<ValueDeclaration>> {
        self.context(tree, node).solve_symbol(name)
    }

    pub fn solve_symbol_as_value_at(
        &self,
        tree: &Arc<SyntaxTree>,
        node: NodeId,
        name: &str,
    ) -> Result<Option<Value>> {
        self.context(tree, node).solve_symbol_as_value(name)
    }

    /// Resolve the possibly qualified type name `name` as seen from `node`.
    pub fn solve_type_at(
        &self,
        tree: &Arc<SyntaxTree>,
        node: NodeId,
        name: &str,
    ) -> Result<SymbolReference<TypeDeclRef>> {
        self.context(tree, node).solve_type(name)
    }

    /// The method invoked by the call expression at `node`, with argument
    /// types computed from the call's arguments.
    pub fn solve_method_call(
        &self,
        tree: &Arc<SyntaxTree>,
        node: NodeId,
    ) -> Result<SymbolReference<MethodRef>> {
        expr::solve_call(tree, node, &self.solver)
    }

    /// The field named by a `this.name` expression at `node`, looked up in
    /// the enclosing type and its supertypes.
    pub fn solve_this_field(
        &self,
        tree: &Arc<SyntaxTree>,
        node: NodeId,
    ) -> Result<SymbolReference<FieldRef>> {
        let Some(Expr::FieldAccess { target, name }) = tree.as_expr(node) else {
            return Err(Error::InvalidInput(format!(
                "`{}` is not a field access",
                tree.source_of(node)
            )));
        };
        if !matches!(tree.as_expr(*target), Some(Expr::This)) {
            return Err(Error::InvalidInput(format!(
                "`{}` does not access a field of `this`",
                tree.source_of(node)
            )));
        }
        let Some(owner) = tree.enclosing_type(node) else {
            return Err(Error::InvalidInput(format!(
                "`{}` is not inside a type declaration",
                tree.source_of(node)
            )));
        };
        let decl = source::type_declaration(tree, owner, &self.solver)?;
        Ok(decl.field(name)?.into())
    }

    /// Static type of the expression at `node`.
    pub fn type_of_expression(&self, tree: &Arc<SyntaxTree>, node: NodeId) -> Result<ResolvedType> {
        expr::type_of(tree, node, &self.solver)
    }

    /// The type declared at `node`.
    pub fn type_declaration(&self, tree: &Arc<SyntaxTree>, node: NodeId) -> Result<TypeDeclRef> {
        source::type_declaration(tree, node, &self.solver)
    }

    /// The declaration `node` introduces, if it introduces one.
    #[must_use]
    pub fn declaration_at(&self, tree: &Arc<SyntaxTree>, node: NodeId) -> Option<Declaration> {
        source::declaration_at(tree, node, &self.solver)
    }
}
