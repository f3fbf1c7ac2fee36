//! Lexical scopes of a source tree.
//!
//! A [`Context`] is one scope (compilation unit, type body, method, block,
//! loop header, `try` resources or catch clause). Every lookup first checks
//! what the scope itself declares and then defers to the enclosing scope; the
//! compilation unit at the top consults imports and the type solver.

use std::fmt;
use std::sync::Arc;

use jsym_syntax::{Import, NodeId, NodeKind, Stmt, SyntaxTree};
use jsym_types::{
    Accessibility, Error, MethodRef, ReferenceTypeDeclaration, ResolvedType, Result,
    SymbolReference, TypeDeclRef, TypeParamRef, TypeSolver, Value, ValueDeclaration,
    JAVA_LANG_OBJECT,
};

use crate::method_resolution::{find_most_applicable, solve_method_in_type};
use crate::source::{
    SourceLocalVariable, SourceParameter, SourceTypeDeclaration, SourceTypeParameter,
};

#[derive(Clone, Copy)]
enum Scope<'a> {
    CompilationUnit,
    Type,
    Method,
    Block(&'a [NodeId]),
    For(&'a [NodeId]),
    ForEach { var: NodeId, body: NodeId },
    Try { resources: &'a [NodeId], body: NodeId },
    Catch { param: NodeId, body: NodeId },
}

fn scope_of(tree: &SyntaxTree, node: NodeId) -> Option<Scope<'_>> {
    Some(match tree.kind(node) {
        NodeKind::CompilationUnit(_) => Scope::CompilationUnit,
        NodeKind::Type(_) => Scope::Type,
        NodeKind::Method(_) => Scope::Method,
        NodeKind::Block(block) => Scope::Block(&block.stmts),
        NodeKind::CatchClause(clause) => Scope::Catch {
            param: clause.param,
            body: clause.body,
        },
        NodeKind::Stmt(Stmt::For { init, .. }) => Scope::For(init),
        NodeKind::Stmt(Stmt::ForEach { var, body, .. }) => Scope::ForEach {
            var: *var,
            body: *body,
        },
        NodeKind::Stmt(Stmt::Try {
            resources, body, ..
        }) => Scope::Try {
            resources,
            body: *body,
        },
        _ => return None,
    })
}

/// Nodes of `list` that come before `from`; all of them when `from` is not
/// in the list or unknown.
fn before<'a>(list: &'a [NodeId], from: Option<NodeId>) -> &'a [NodeId] {
    match from.and_then(|from| list.iter().position(|&n| n == from)) {
        Some(end) => &list[..end],
        None => list,
    }
}

/// A scope in a source tree, plus the child of the scope node the lookup
/// arrives from (which decides what local declarations are already visible).
#[derive(Clone)]
pub struct Context {
    tree: Arc<SyntaxTree>,
    node: NodeId,
    from: Option<NodeId>,
    solver: TypeSolver,
    inherited_members: bool,
}

impl Context {
    /// The scope `node` opens, or the innermost one enclosing it.
    #[must_use]
    pub fn new(tree: Arc<SyntaxTree>, node: NodeId, solver: TypeSolver) -> Self {
        if scope_of(&tree, node).is_some() {
            return Self {
                tree,
                node,
                from: None,
                solver,
                inherited_members: true,
            };
        }
        let root = tree.root();
        Self::enclosing(tree.clone(), node, solver.clone()).unwrap_or(Self {
            tree,
            node: root,
            from: None,
            solver,
            inherited_members: true,
        })
    }

    /// The innermost scope strictly enclosing `node`.
    #[must_use]
    pub fn enclosing(tree: Arc<SyntaxTree>, node: NodeId, solver: TypeSolver) -> Option<Self> {
        let mut child = node;
        let mut current = tree.parent(node);
        while let Some(id) = current {
            if scope_of(&tree, id).is_some() {
                return Some(Self {
                    tree,
                    node: id,
                    from: Some(child),
                    solver,
                    inherited_members: true,
                });
            }
            child = id;
            current = tree.parent(id);
        }
        None
    }

    /// The scope supertypes and type-parameter bounds of `type_node` are
    /// written in. Member types inherited by the type (or any enclosing type)
    /// are not visible there, so resolving them never needs the supertypes
    /// being resolved.
    #[must_use]
    pub fn supertypes(tree: Arc<SyntaxTree>, type_node: NodeId, solver: TypeSolver) -> Self {
        Self {
            inherited_members: false,
            ..Self::new(tree, type_node, solver)
        }
    }

    #[must_use]
    pub fn parent(&self) -> Option<Context> {
        let mut parent = Self::enclosing(self.tree.clone(), self.node, self.solver.clone())?;
        parent.inherited_members = self.inherited_members;
        Some(parent)
    }

    #[must_use]
    pub fn tree(&self) -> &Arc<SyntaxTree> {
        &self.tree
    }

    /// The scope node.
    #[must_use]
    pub fn node(&self) -> NodeId {
        self.node
    }

    #[must_use]
    pub fn solver(&self) -> &TypeSolver {
        &self.solver
    }

    fn scope(&self) -> Scope<'_> {
        scope_of(&self.tree, self.node).unwrap_or(Scope::CompilationUnit)
    }

    fn type_declaration(&self) -> Option<SourceTypeDeclaration> {
        self.tree
            .as_type(self.node)
            .map(|_| SourceTypeDeclaration::at(&self.tree, self.node, &self.solver))
    }

    /// Human-readable location, for error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        let file = self
            .tree
            .path()
            .map_or_else(|| "<memory>".to_string(), |p| p.display().to_string());
        match self.tree.kind(self.node) {
            NodeKind::Type(_) => format!("type {} ({file})", self.tree.qualified_name(self.node)),
            NodeKind::Method(method) => {
                let owner = self
                    .tree
                    .enclosing_type(self.node)
                    .map(|ty| self.tree.qualified_name(ty))
                    .unwrap_or_default();
                format!("method {owner}.{} ({file})", method.name)
            }
            NodeKind::CompilationUnit(_) => format!("compilation unit {file}"),
            _ => {
                let pos = self.tree.line_index().line_col(self.tree.range(self.node).start());
                format!("{file}:{}:{}", pos.line + 1, pos.col + 1)
            }
        }
    }

    /// Resolve a simple name used as a value: local variable, parameter,
    /// field or enum constant.
    pub fn solve_symbol(&self, name: &str) -> Result<SymbolReference<ValueDeclaration>> {
        if let Some(found) = self.solve_symbol_here(name)? {
            return Ok(SymbolReference::solved(found));
        }
        match self.parent() {
            Some(parent) => parent.solve_symbol(name),
            None => Ok(SymbolReference::unsolved()),
        }
    }

    /// Like [`Context::solve_symbol`], with the declaration's type.
    pub fn solve_symbol_as_value(&self, name: &str) -> Result<Option<Value>> {
        match self.solve_symbol(name)?.into_declaration() {
            Some(declaration) => Value::from_declaration(&declaration).map(Some),
            None => Ok(None),
        }
    }

    fn local(&self, node: NodeId, name: &str) -> Option<ValueDeclaration> {
        match self.tree.kind(node) {
            NodeKind::LocalVar(local) if local.name == name => Some(ValueDeclaration::LocalVariable(
                Arc::new(SourceLocalVariable::at(&self.tree, node, &self.solver)),
            )),
            NodeKind::Parameter(param) if param.name == name => Some(ValueDeclaration::Parameter(
                Arc::new(SourceParameter::at(&self.tree, node, &self.solver)),
            )),
            _ => None,
        }
    }

    fn solve_symbol_here(&self, name: &str) -> Result<Option<ValueDeclaration>> {
        let from = self.from;
        Ok(match self.scope() {
            Scope::Block(stmts) | Scope::For(stmts) => before(stmts, from)
                .iter()
                .rev()
                .find_map(|&stmt| self.local(stmt, name)),
            Scope::ForEach { var, body } => {
                if from == Some(body) {
                    self.local(var, name)
                } else {
                    None
                }
            }
            Scope::Try { resources, body } => {
                let visible: &[NodeId] = if from == Some(body) {
                    resources
                } else if from.is_some_and(|f| resources.contains(&f)) {
                    before(resources, from)
                } else {
                    &[]
                };
                visible.iter().rev().find_map(|&r| self.local(r, name))
            }
            Scope::Catch { param, body } => {
                if from == Some(body) {
                    self.local(param, name)
                } else {
                    None
                }
            }
            Scope::Method => self
                .tree
                .as_method(self.node)
                .into_iter()
                .flat_map(|m| m.params.iter().copied())
                .find_map(|p| self.local(p, name)),
            Scope::Type => self.field_or_constant(name)?,
            Scope::CompilationUnit => self.static_import_value(name)?,
        })
    }

    fn field_or_constant(&self, name: &str) -> Result<Option<ValueDeclaration>> {
        let Some(decl) = self.type_declaration() else {
            return Ok(None);
        };
        if let Some(field) = decl.declared_fields()?.into_iter().find(|f| f.name() == name) {
            return Ok(Some(ValueDeclaration::Field(field)));
        }
        if let Some(constant) = decl.enum_constants()?.into_iter().find(|c| c.name() == name) {
            return Ok(Some(ValueDeclaration::EnumConstant(constant)));
        }
        if !self.inherited_members {
            return Ok(None);
        }
        let decl: TypeDeclRef = Arc::new(decl);
        for ancestor in decl.ancestor_declarations()? {
            let inherited = ancestor
                .declared_fields()?
                .into_iter()
                .find(|f| f.name() == name && f.accessibility() != Accessibility::Private);
            if let Some(field) = inherited {
                return Ok(Some(ValueDeclaration::Field(field)));
            }
            if let Some(constant) = ancestor.enum_constant(name)? {
                return Ok(Some(ValueDeclaration::EnumConstant(constant)));
            }
        }
        Ok(None)
    }

    fn imports(&self) -> impl Iterator<Item = &Import> + '_ {
        self.tree.compilation_unit().imports.iter()
    }

    /// A static field or enum constant named `name` in `owner`.
    fn static_value_in(owner: &TypeDeclRef, name: &str) -> Result<Option<ValueDeclaration>> {
        if let Some(field) = owner.field(name)?.filter(|f| f.is_static()) {
            return Ok(Some(ValueDeclaration::Field(field)));
        }
        Ok(owner.enum_constant(name)?.map(ValueDeclaration::EnumConstant))
    }

    fn static_import_value(&self, name: &str) -> Result<Option<ValueDeclaration>> {
        for import in self.imports().filter(|i| i.is_static && !i.is_on_demand) {
            let Some((owner, member)) = import.name.rsplit_once('.') else {
                continue;
            };
            if member != name {
                continue;
            }
            if let Some(owner) = self.solver.try_to_solve_type(owner)?.into_declaration() {
                if let Some(found) = Self::static_value_in(&owner, name)? {
                    return Ok(Some(found));
                }
            }
        }
        for import in self.imports().filter(|i| i.is_static && i.is_on_demand) {
            if let Some(owner) = self.solver.try_to_solve_type(&import.name)?.into_declaration() {
                if let Some(found) = Self::static_value_in(&owner, name)? {
                    return Ok(Some(found));
                }
            }
        }
        Ok(None)
    }

    /// A type variable named `name` declared by this or an enclosing method
    /// or type.
    pub fn solve_generic_type(&self, name: &str) -> Result<Option<ResolvedType>> {
        let params = match self.tree.kind(self.node) {
            NodeKind::Type(decl) => Some(&decl.type_params),
            NodeKind::Method(decl) => Some(&decl.type_params),
            _ => None,
        };
        if let Some(index) = params.and_then(|ps| ps.iter().position(|p| p.name == name)) {
            let param: TypeParamRef = Arc::new(SourceTypeParameter::new(
                &self.tree,
                self.node,
                index,
                &self.solver,
            ));
            return Ok(Some(ResolvedType::type_variable(param)));
        }
        match self.parent() {
            Some(parent) => parent.solve_generic_type(name),
            None => Ok(None),
        }
    }

    /// Resolve a simple or dotted type name as written in this scope.
    pub fn solve_type(&self, name: &str) -> Result<SymbolReference<TypeDeclRef>> {
        let (first, rest) = match name.split_once('.') {
            Some((first, rest)) => (first, Some(rest)),
            None => (name, None),
        };
        let found = match self.scope() {
            Scope::Type => self.member_type(first)?,
            Scope::Block(stmts) => before(stmts, self.from).iter().find_map(|&stmt| {
                match self.tree.kind(stmt) {
                    NodeKind::Stmt(Stmt::LocalType(ty))
                        if self.tree.as_type(*ty).is_some_and(|t| t.name == first) =>
                    {
                        Some(Arc::new(SourceTypeDeclaration::at(&self.tree, *ty, &self.solver))
                            as TypeDeclRef)
                    }
                    _ => None,
                }
            }),
            Scope::CompilationUnit => return self.solve_type_in_unit(name),
            _ => None,
        };
        if let Some(found) = found {
            if let Some(found) = descend(found, rest)? {
                return Ok(SymbolReference::solved(found));
            }
        }
        match self.parent() {
            Some(parent) => parent.solve_type(name),
            None => Ok(SymbolReference::unsolved()),
        }
    }

    /// This type, one of its member types, or (outside supertype clauses) a
    /// member type it inherits.
    fn member_type(&self, name: &str) -> Result<Option<TypeDeclRef>> {
        let Some(decl) = self.tree.as_type(self.node) else {
            return Ok(None);
        };
        if decl.name == name {
            return Ok(Some(Arc::new(SourceTypeDeclaration::at(
                &self.tree,
                self.node,
                &self.solver,
            ))));
        }
        if let Some(member) = self
            .tree
            .member_types(self.node)
            .find(|&m| self.tree.as_type(m).is_some_and(|t| t.name == name))
        {
            return Ok(Some(Arc::new(SourceTypeDeclaration::at(
                &self.tree,
                member,
                &self.solver,
            ))));
        }
        if !self.inherited_members {
            return Ok(None);
        }
        let this: TypeDeclRef = Arc::new(SourceTypeDeclaration::at(&self.tree, self.node, &self.solver));
        for ancestor in this.ancestor_declarations()? {
            if let Some(inner) = ancestor.internal_type(name)? {
                return Ok(Some(inner));
            }
        }
        Ok(None)
    }

    fn solve_type_in_unit(&self, name: &str) -> Result<SymbolReference<TypeDeclRef>> {
        let Some((first, rest)) = name.split_once('.') else {
            return Ok(self.solve_simple_type_in_unit(name)?.into());
        };
        if let Some(outer) = self.solve_simple_type_in_unit(first)? {
            if let Some(found) = descend(outer, Some(rest))? {
                return Ok(SymbolReference::solved(found));
            }
        }
        self.solver.try_to_solve_type(name)
    }

    /// Simple names at the top of a file: declared types, single-type
    /// imports, the same package, on-demand imports, `java.lang`, and finally
    /// the default package.
    fn solve_simple_type_in_unit(&self, name: &str) -> Result<Option<TypeDeclRef>> {
        if let Some(node) = self.tree.find_type(name) {
            return Ok(Some(Arc::new(SourceTypeDeclaration::at(&self.tree, node, &self.solver))));
        }

        for import in self.imports().filter(|i| !i.is_on_demand) {
            let Some((owner, simple)) = import.name.rsplit_once('.') else {
                continue;
            };
            if simple != name {
                continue;
            }
            let found = if import.is_static {
                match self.solver.try_to_solve_type(owner)?.into_declaration() {
                    Some(owner) => owner.internal_type(name)?,
                    None => None,
                }
            } else {
                self.solver.try_to_solve_type(&import.name)?.into_declaration()
            };
            if found.is_some() {
                return Ok(found);
            }
        }

        let package = self.tree.package_name();
        if !package.is_empty() {
            if let Some(found) = self
                .solver
                .try_to_solve_type(&format!("{package}.{name}"))?
                .into_declaration()
            {
                return Ok(Some(found));
            }
        }

        for import in self.imports().filter(|i| i.is_on_demand) {
            let found = if import.is_static {
                match self.solver.try_to_solve_type(&import.name)?.into_declaration() {
                    Some(owner) => owner.internal_type(name)?,
                    None => None,
                }
            } else {
                self.solver
                    .try_to_solve_type(&format!("{}.{name}", import.name))?
                    .into_declaration()
            };
            if found.is_some() {
                return Ok(found);
            }
        }

        if let Some(found) = self
            .solver
            .try_to_solve_type(&format!("java.lang.{name}"))?
            .into_declaration()
        {
            return Ok(Some(found));
        }
        if package.is_empty() {
            return Ok(None);
        }
        Ok(self.solver.try_to_solve_type(name)?.into_declaration())
    }

    /// Resolve an unqualified call `name(args)` made in this scope.
    pub fn solve_method(
        &self,
        name: &str,
        args: &[ResolvedType],
    ) -> Result<SymbolReference<MethodRef>> {
        let candidates = match self.scope() {
            Scope::Type => self.method_candidates(name, args)?,
            Scope::CompilationUnit => self.static_import_methods(name)?,
            _ => Vec::new(),
        };
        if !candidates.is_empty() {
            return find_most_applicable(candidates, name, args);
        }
        match self.parent() {
            Some(parent) => parent.solve_method(name, args),
            None => Ok(SymbolReference::unsolved()),
        }
    }

    /// Declared methods named `name`, then the best match in the
    /// superclass, and default methods of implemented interfaces. An
    /// interface takes every matching method of the interfaces it extends.
    fn method_candidates(&self, name: &str, args: &[ResolvedType]) -> Result<Vec<MethodRef>> {
        let Some(decl) = self.type_declaration() else {
            return Ok(Vec::new());
        };
        let is_interface = decl.is_interface();
        let is_object = decl.qualified_name() == JAVA_LANG_OBJECT;
        let mut candidates: Vec<MethodRef> = decl
            .declared_methods()?
            .into_iter()
            .filter(|m| m.name() == name)
            .collect();

        let ancestors = decl.ancestors()?;
        let has_superclass = ancestors.iter().any(|a| {
            a.as_reference()
                .is_ok_and(|r| !r.declaration().is_interface())
        });
        for ancestor in &ancestors {
            let ancestor = ancestor.as_reference()?.declaration();
            let Some(method) = solve_method_in_type(ancestor, name, args)?.into_declaration() else {
                continue;
            };
            if is_interface || !ancestor.is_interface() || method.is_default() {
                candidates.push(method);
            }
        }
        if !has_superclass && !is_object {
            let object = self.solver.solve_type(JAVA_LANG_OBJECT).map_err(|_| {
                Error::unsolved(JAVA_LANG_OBJECT, self.describe())
            })?;
            if let Some(method) = solve_method_in_type(&object, name, args)?.into_declaration() {
                candidates.push(method);
            }
        }
        Ok(candidates)
    }

    fn static_import_methods(&self, name: &str) -> Result<Vec<MethodRef>> {
        let mut candidates = Vec::new();
        for import in self.imports().filter(|i| i.is_static) {
            let owner = if import.is_on_demand {
                import.name.as_str()
            } else {
                match import.name.rsplit_once('.') {
                    Some((owner, member)) if member == name => owner,
                    _ => continue,
                }
            };
            let Some(owner) = self.solver.try_to_solve_type(owner)?.into_declaration() else {
                continue;
            };
            candidates.extend(
                owner
                    .all_methods()?
                    .into_iter()
                    .filter(|m| m.name() == name && m.is_static()),
            );
        }
        Ok(candidates)
    }
}

/// Follow the remaining segments of a dotted name through member types.
fn descend(mut current: TypeDeclRef, rest: Option<&str>) -> Result<Option<TypeDeclRef>> {
    let Some(rest) = rest else {
        return Ok(Some(current));
    };
    for segment in rest.split('.') {
        match current.internal_type(segment)? {
            Some(inner) => current = inner,
            None => return Ok(None),
        }
    }
    Ok(Some(current))
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("scope", &self.describe())
            .field("from", &self.from.map(NodeId::index))
            .finish()
    }
}
