//! Declarations backed by parsed source.
//!
//! Every declaration is a `(tree, node)` pair plus the solver it resolves
//! names through. They are cheap to create and hold no resolved state.

mod javadoc;

use std::fmt;
use std::sync::Arc;

use jsym_syntax::{
    Annotation, Javadoc, Modifier, Modifiers, NodeId, NodeKind, Stmt, SyntaxTree, TypeDecl,
    TypeDeclKind,
};
use jsym_types::{
    Accessibility, Annotated, AnnotationMemberDeclaration, AnnotationRef, AnnotationValue,
    Declaration, EnumConstantDeclaration, EnumConstantRef, Error, FieldDeclaration, FieldRef,
    LocalVariableDeclaration, MethodDeclaration, MethodRef, ParamRef, ParameterDeclaration,
    ReferenceTypeDeclaration, ResolvedAnnotationExpr, ResolvedType, Result, TypeDeclRef,
    TypeDeclarationKind, TypeKind, TypeParamRef, TypeParameterDeclaration, TypeSolver,
    JAVA_LANG_OBJECT,
};

use crate::annotations::{decode_args, decode_value, NameLookup};
use crate::context::Context;
use crate::convert::{is_var, resolve_type_ref};

/// The declaration a node introduces, if any. Members whose enclosing type
/// cannot be found (which a well-formed tree never has) yield `None`.
pub fn declaration_at(tree: &Arc<SyntaxTree>, node: NodeId, solver: &TypeSolver) -> Option<Declaration> {
    let owner = || tree.enclosing_type(node);
    let decl = match tree.kind(node) {
        NodeKind::Type(_) => Declaration::Type(Arc::new(SourceTypeDeclaration::at(tree, node, solver))),
        NodeKind::Field(_) => Declaration::Field(Arc::new(SourceField::at(tree, node, owner()?, solver))),
        NodeKind::Method(_) => {
            Declaration::Method(Arc::new(SourceMethod::at(tree, node, owner()?, solver)))
        }
        NodeKind::Parameter(_) => {
            Declaration::Parameter(Arc::new(SourceParameter::at(tree, node, solver)))
        }
        NodeKind::LocalVar(_) => {
            Declaration::LocalVariable(Arc::new(SourceLocalVariable::at(tree, node, solver)))
        }
        NodeKind::EnumConstant(_) => Declaration::EnumConstant(Arc::new(SourceEnumConstant::at(
            tree,
            node,
            owner()?,
            solver,
        ))),
        NodeKind::AnnotationMember(_) => Declaration::AnnotationMember(Arc::new(
            SourceAnnotationMember::at(tree, node, owner()?, solver),
        )),
        _ => return None,
    };
    Some(decl)
}

/// Type declaration at `node`, or invalid input when `node` is not one.
pub fn type_declaration(
    tree: &Arc<SyntaxTree>,
    node: NodeId,
    solver: &TypeSolver,
) -> Result<TypeDeclRef> {
    if tree.as_type(node).is_none() {
        return Err(Error::InvalidInput(format!(
            "node {} is not a type declaration",
            node.index()
        )));
    }
    Ok(Arc::new(SourceTypeDeclaration::at(tree, node, solver)))
}

pub(crate) fn modifiers_of(tree: &SyntaxTree, node: NodeId) -> Option<&Modifiers> {
    match tree.kind(node) {
        NodeKind::Type(decl) => Some(&decl.modifiers),
        NodeKind::Field(decl) => Some(&decl.modifiers),
        NodeKind::Method(decl) => Some(&decl.modifiers),
        NodeKind::Parameter(decl) => Some(&decl.modifiers),
        NodeKind::EnumConstant(decl) => Some(&decl.modifiers),
        NodeKind::AnnotationMember(decl) => Some(&decl.modifiers),
        NodeKind::LocalVar(decl) => Some(&decl.modifiers),
        _ => None,
    }
}

fn annotations_of(tree: &Arc<SyntaxTree>, node: NodeId, solver: &TypeSolver) -> Vec<AnnotationRef> {
    let count = modifiers_of(tree, node).map_or(0, |m| m.annotations.len());
    (0..count)
        .map(|index| {
            Arc::new(SourceAnnotationExpr {
                tree: tree.clone(),
                site: AnnotationSite::Modifier { owner: node, index },
                solver: solver.clone(),
            }) as AnnotationRef
        })
        .collect()
}

/// Whether `node` is a member of an interface or annotation type.
fn in_interface(tree: &SyntaxTree, node: NodeId) -> bool {
    tree.parent(node)
        .and_then(|parent| tree.as_type(parent))
        .is_some_and(|ty| matches!(ty.kind, TypeDeclKind::Interface | TypeDeclKind::Annotation))
}

fn accessibility(tree: &SyntaxTree, node: NodeId, modifiers: &Modifiers) -> Accessibility {
    if modifiers.has(Modifier::Public) {
        Accessibility::Public
    } else if modifiers.has(Modifier::Protected) {
        Accessibility::Protected
    } else if modifiers.has(Modifier::Private) {
        Accessibility::Private
    } else if in_interface(tree, node) {
        Accessibility::Public
    } else {
        Accessibility::PackagePrivate
    }
}

fn kind(kind: TypeDeclKind) -> TypeDeclarationKind {
    match kind {
        TypeDeclKind::Class => TypeDeclarationKind::Class,
        TypeDeclKind::Interface => TypeDeclarationKind::Interface,
        TypeDeclKind::Enum => TypeDeclarationKind::Enum,
        TypeDeclKind::Annotation => TypeDeclarationKind::Annotation,
    }
}

macro_rules! node_accessor {
    ($fn_name:ident, $variant:ident, $ty:ty) => {
        fn $fn_name(&self) -> &$ty {
            match self.tree.kind(self.node) {
                NodeKind::$variant(decl) => decl,
                _ => unreachable!(concat!(
                    "source declaration over a node that is not a ",
                    stringify!($variant)
                )),
            }
        }
    };
}

pub struct SourceTypeDeclaration {
    tree: Arc<SyntaxTree>,
    node: NodeId,
    solver: TypeSolver,
}

impl SourceTypeDeclaration {
    pub(crate) fn at(tree: &Arc<SyntaxTree>, node: NodeId, solver: &TypeSolver) -> Self {
        Self {
            tree: tree.clone(),
            node,
            solver: solver.clone(),
        }
    }

    #[must_use]
    pub fn tree(&self) -> &Arc<SyntaxTree> {
        &self.tree
    }

    #[must_use]
    pub fn node(&self) -> NodeId {
        self.node
    }

    node_accessor!(decl, Type, TypeDecl);

    fn members(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.decl().members.iter().copied()
    }

    fn implicit_supertype(&self, name: &str, self_arg: bool) -> Result<Option<ResolvedType>> {
        if self.qualified_name() == name {
            return Ok(None);
        }
        let Some(decl) = self.solver.try_to_solve_type(name)?.into_declaration() else {
            return Ok(None);
        };
        let args = if self_arg {
            vec![ResolvedType::reference(
                Arc::new(Self::at(&self.tree, self.node, &self.solver)),
                Vec::new(),
            )]
        } else {
            Vec::new()
        };
        Ok(Some(ResolvedType::reference(decl, args)))
    }
}

impl fmt::Debug for SourceTypeDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceTypeDeclaration({})", self.qualified_name())
    }
}

impl Annotated for SourceTypeDeclaration {
    fn annotations(&self) -> Result<Vec<AnnotationRef>> {
        Ok(annotations_of(&self.tree, self.node, &self.solver))
    }
}

impl ReferenceTypeDeclaration for SourceTypeDeclaration {
    fn name(&self) -> String {
        self.decl().name.clone()
    }

    fn package_name(&self) -> String {
        self.tree.package_name().to_string()
    }

    fn class_name(&self) -> String {
        let qualified = self.tree.qualified_name(self.node);
        match self.tree.package_name() {
            "" => qualified,
            package => qualified
                .strip_prefix(package)
                .and_then(|rest| rest.strip_prefix('.'))
                .map(str::to_string)
                .unwrap_or(qualified.clone()),
        }
    }

    fn qualified_name(&self) -> String {
        self.tree.qualified_name(self.node)
    }

    fn kind(&self) -> TypeDeclarationKind {
        kind(self.decl().kind)
    }

    fn accessibility(&self) -> Accessibility {
        accessibility(&self.tree, self.node, &self.decl().modifiers)
    }

    fn type_parameters(&self) -> Result<Vec<TypeParamRef>> {
        Ok((0..self.decl().type_params.len())
            .map(|index| {
                Arc::new(SourceTypeParameter {
                    tree: self.tree.clone(),
                    owner: self.node,
                    index,
                    solver: self.solver.clone(),
                }) as TypeParamRef
            })
            .collect())
    }

    fn ancestors(&self) -> Result<Vec<ResolvedType>> {
        let decl = self.decl();
        let ctx = Context::supertypes(self.tree.clone(), self.node, self.solver.clone());
        let mut out = Vec::new();
        match decl.kind {
            TypeDeclKind::Class => {
                if decl.extends.len() > 1 {
                    return Err(Error::InvalidInput(format!(
                        "class `{}` declares {} superclasses",
                        self.qualified_name(),
                        decl.extends.len()
                    )));
                }
                match decl.extends.first() {
                    Some(superclass) => out.push(resolve_type_ref(&ctx, superclass)?),
                    None => out.extend(self.implicit_supertype(JAVA_LANG_OBJECT, false)?),
                }
                for interface in &decl.implements {
                    out.push(resolve_type_ref(&ctx, interface)?);
                }
            }
            TypeDeclKind::Interface => {
                for interface in &decl.extends {
                    out.push(resolve_type_ref(&ctx, interface)?);
                }
            }
            TypeDeclKind::Enum => {
                match self.implicit_supertype("java.lang.Enum", true)? {
                    Some(base) => out.push(base),
                    None => out.extend(self.implicit_supertype(JAVA_LANG_OBJECT, false)?),
                }
                for interface in &decl.implements {
                    out.push(resolve_type_ref(&ctx, interface)?);
                }
            }
            TypeDeclKind::Annotation => {
                out.extend(self.implicit_supertype("java.lang.annotation.Annotation", false)?);
            }
        }
        Ok(out)
    }

    fn declared_fields(&self) -> Result<Vec<FieldRef>> {
        Ok(self
            .members()
            .filter(|&m| matches!(self.tree.kind(m), NodeKind::Field(_)))
            .map(|m| Arc::new(SourceField::at(&self.tree, m, self.node, &self.solver)) as FieldRef)
            .collect())
    }

    fn declared_methods(&self) -> Result<Vec<MethodRef>> {
        Ok(self
            .members()
            .filter(|&m| self.tree.as_method(m).is_some_and(|method| !method.is_constructor))
            .map(|m| Arc::new(SourceMethod::at(&self.tree, m, self.node, &self.solver)) as MethodRef)
            .collect())
    }

    fn constructors(&self) -> Result<Vec<MethodRef>> {
        Ok(self
            .members()
            .filter(|&m| self.tree.as_method(m).is_some_and(|method| method.is_constructor))
            .map(|m| Arc::new(SourceMethod::at(&self.tree, m, self.node, &self.solver)) as MethodRef)
            .collect())
    }

    fn internal_types(&self) -> Result<Vec<TypeDeclRef>> {
        Ok(self
            .tree
            .member_types(self.node)
            .map(|m| Arc::new(SourceTypeDeclaration::at(&self.tree, m, &self.solver)) as TypeDeclRef)
            .collect())
    }

    fn enum_constants(&self) -> Result<Vec<EnumConstantRef>> {
        Ok(self
            .members()
            .filter(|&m| matches!(self.tree.kind(m), NodeKind::EnumConstant(_)))
            .map(|m| {
                Arc::new(SourceEnumConstant::at(&self.tree, m, self.node, &self.solver))
                    as EnumConstantRef
            })
            .collect())
    }

    fn annotation_members(&self) -> Result<Vec<jsym_types::AnnotationMemberRef>> {
        Ok(self
            .members()
            .filter(|&m| matches!(self.tree.kind(m), NodeKind::AnnotationMember(_)))
            .map(|m| {
                Arc::new(SourceAnnotationMember::at(&self.tree, m, self.node, &self.solver))
                    as jsym_types::AnnotationMemberRef
            })
            .collect())
    }

    fn type_solver(&self) -> TypeSolver {
        self.solver.clone()
    }
}

/// A type parameter of a source type or method.
pub struct SourceTypeParameter {
    tree: Arc<SyntaxTree>,
    /// The declaring type or method node.
    owner: NodeId,
    index: usize,
    solver: TypeSolver,
}

impl SourceTypeParameter {
    pub(crate) fn new(tree: &Arc<SyntaxTree>, owner: NodeId, index: usize, solver: &TypeSolver) -> Self {
        Self {
            tree: tree.clone(),
            owner,
            index,
            solver: solver.clone(),
        }
    }

    fn param(&self) -> Option<&jsym_syntax::TypeParam> {
        let params = match self.tree.kind(self.owner) {
            NodeKind::Type(decl) => &decl.type_params,
            NodeKind::Method(decl) => &decl.type_params,
            _ => return None,
        };
        params.get(self.index)
    }
}

impl fmt::Debug for SourceTypeParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceTypeParameter({})", self.qualified_name())
    }
}

impl TypeParameterDeclaration for SourceTypeParameter {
    fn name(&self) -> String {
        self.param().map(|p| p.name.clone()).unwrap_or_default()
    }

    fn container_qualified_name(&self) -> String {
        match self.tree.kind(self.owner) {
            NodeKind::Method(method) => {
                let owner = self
                    .tree
                    .enclosing_type(self.owner)
                    .map(|ty| self.tree.qualified_name(ty))
                    .unwrap_or_default();
                let params: Vec<String> = method
                    .params
                    .iter()
                    .filter_map(|&p| self.tree.as_parameter(p))
                    .map(|p| {
                        let ty = self.tree.text()[p.ty.range].to_string();
                        if p.is_varargs {
                            format!("{ty}...")
                        } else {
                            ty
                        }
                    })
                    .collect();
                format!("{owner}.{}({})", method.name, params.join(", "))
            }
            _ => self.tree.qualified_name(self.owner),
        }
    }

    fn declared_on_type(&self) -> bool {
        matches!(self.tree.kind(self.owner), NodeKind::Type(_))
    }

    fn bounds(&self) -> Result<Vec<ResolvedType>> {
        let Some(param) = self.param() else {
            return Ok(Vec::new());
        };
        let ctx = if self.declared_on_type() {
            Context::supertypes(self.tree.clone(), self.owner, self.solver.clone())
        } else {
            Context::new(self.tree.clone(), self.owner, self.solver.clone())
        };
        param
            .bounds
            .iter()
            .map(|bound| resolve_type_ref(&ctx, bound))
            .collect()
    }
}

pub struct SourceField {
    tree: Arc<SyntaxTree>,
    node: NodeId,
    owner: NodeId,
    solver: TypeSolver,
}

impl SourceField {
    pub(crate) fn at(tree: &Arc<SyntaxTree>, node: NodeId, owner: NodeId, solver: &TypeSolver) -> Self {
        Self {
            tree: tree.clone(),
            node,
            owner,
            solver: solver.clone(),
        }
    }

    node_accessor!(decl, Field, jsym_syntax::FieldDecl);
}

impl fmt::Debug for SourceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceField({}.{})", self.tree.qualified_name(self.owner), self.decl().name)
    }
}

impl Annotated for SourceField {
    fn annotations(&self) -> Result<Vec<AnnotationRef>> {
        Ok(annotations_of(&self.tree, self.node, &self.solver))
    }
}

impl FieldDeclaration for SourceField {
    fn name(&self) -> String {
        self.decl().name.clone()
    }

    fn ty(&self) -> Result<ResolvedType> {
        let ctx = Context::new(self.tree.clone(), self.node, self.solver.clone());
        resolve_type_ref(&ctx, &self.decl().ty)
    }

    fn is_static(&self) -> bool {
        self.decl().modifiers.has(Modifier::Static) || in_interface(&self.tree, self.node)
    }

    fn is_volatile(&self) -> bool {
        self.decl().modifiers.has(Modifier::Volatile)
    }

    fn is_transient(&self) -> bool {
        self.decl().modifiers.has(Modifier::Transient)
    }

    fn accessibility(&self) -> Accessibility {
        accessibility(&self.tree, self.node, &self.decl().modifiers)
    }

    fn declaring_type(&self) -> TypeDeclRef {
        Arc::new(SourceTypeDeclaration::at(&self.tree, self.owner, &self.solver))
    }
}

/// A method, constructor or catch-clause parameter.
pub struct SourceParameter {
    tree: Arc<SyntaxTree>,
    node: NodeId,
    solver: TypeSolver,
}

impl SourceParameter {
    pub(crate) fn at(tree: &Arc<SyntaxTree>, node: NodeId, solver: &TypeSolver) -> Self {
        Self {
            tree: tree.clone(),
            node,
            solver: solver.clone(),
        }
    }

    node_accessor!(decl, Parameter, jsym_syntax::ParameterDecl);
}

impl fmt::Debug for SourceParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceParameter({})", self.decl().name)
    }
}

impl Annotated for SourceParameter {
    fn annotations(&self) -> Result<Vec<AnnotationRef>> {
        Ok(annotations_of(&self.tree, self.node, &self.solver))
    }
}

impl ParameterDeclaration for SourceParameter {
    fn name(&self) -> String {
        self.decl().name.clone()
    }

    fn ty(&self) -> Result<ResolvedType> {
        let ctx = Context::new(self.tree.clone(), self.node, self.solver.clone());
        let ty = resolve_type_ref(&ctx, &self.decl().ty)?;
        Ok(if self.decl().is_varargs {
            ResolvedType::array(ty)
        } else {
            ty
        })
    }

    fn is_varargs(&self) -> bool {
        self.decl().is_varargs
    }
}

/// A local variable, including for-each variables and try resources.
pub struct SourceLocalVariable {
    tree: Arc<SyntaxTree>,
    node: NodeId,
    solver: TypeSolver,
}

impl SourceLocalVariable {
    pub(crate) fn at(tree: &Arc<SyntaxTree>, node: NodeId, solver: &TypeSolver) -> Self {
        Self {
            tree: tree.clone(),
            node,
            solver: solver.clone(),
        }
    }

    node_accessor!(decl, LocalVar, jsym_syntax::LocalVarDecl);

    /// `var` takes the initializer's type, or the element type of the
    /// iterable in an enhanced `for`.
    fn inferred_type(&self) -> Result<ResolvedType> {
        if let Some(init) = self.decl().init {
            return crate::expr::type_of(&self.tree, init, &self.solver);
        }
        let iterable = self.tree.parent(self.node).and_then(|parent| match self.tree.kind(parent) {
            NodeKind::Stmt(Stmt::ForEach { var, iterable, .. }) if *var == self.node => {
                Some(*iterable)
            }
            _ => None,
        });
        match iterable {
            Some(iterable) => {
                let iterable = crate::expr::type_of(&self.tree, iterable, &self.solver)?;
                element_type(&iterable, &self.solver)
            }
            None => Err(Error::Unsupported(format!(
                "cannot infer the type of `var {}` without an initializer",
                self.decl().name
            ))),
        }
    }
}

/// Element type of an array or `Iterable` as iterated by an enhanced `for`.
pub(crate) fn element_type(iterable: &ResolvedType, solver: &TypeSolver) -> Result<ResolvedType> {
    let object = || Ok(ResolvedType::reference(solver.solve_type(JAVA_LANG_OBJECT)?, Vec::new()));
    match iterable.kind() {
        TypeKind::Array(component) => Ok(component.clone()),
        TypeKind::Reference(reference) => {
            let view = if reference.qualified_name() == "java.lang.Iterable" {
                Some(iterable.clone())
            } else {
                reference
                    .all_ancestors()?
                    .into_iter()
                    .find(|a| a.as_reference().is_ok_and(|r| r.qualified_name() == "java.lang.Iterable"))
            };
            let Some(view) = view else {
                return Err(Error::TypeMismatch {
                    expected: "array or java.lang.Iterable",
                    found: iterable.describe(),
                });
            };
            match view.as_reference()?.type_args().first().map(ResolvedType::kind) {
                Some(TypeKind::Wildcard(w)) if w.is_extends() => {
                    Ok(w.bound_type().cloned().unwrap_or_else(ResolvedType::unbounded))
                }
                Some(TypeKind::Wildcard(_)) | None => object(),
                Some(_) => Ok(view.as_reference()?.type_args()[0].clone()),
            }
        }
        _ => Err(Error::TypeMismatch {
            expected: "array or java.lang.Iterable",
            found: iterable.describe(),
        }),
    }
}

impl fmt::Debug for SourceLocalVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceLocalVariable({})", self.decl().name)
    }
}

impl Annotated for SourceLocalVariable {
    fn annotations(&self) -> Result<Vec<AnnotationRef>> {
        Ok(annotations_of(&self.tree, self.node, &self.solver))
    }
}

impl LocalVariableDeclaration for SourceLocalVariable {
    fn name(&self) -> String {
        self.decl().name.clone()
    }

    fn ty(&self) -> Result<ResolvedType> {
        let decl = self.decl();
        if is_var(&decl.ty) {
            return self.inferred_type();
        }
        let ctx = Context::new(self.tree.clone(), self.node, self.solver.clone());
        resolve_type_ref(&ctx, &decl.ty)
    }
}

/// A method or constructor.
pub struct SourceMethod {
    tree: Arc<SyntaxTree>,
    node: NodeId,
    owner: NodeId,
    solver: TypeSolver,
}

impl SourceMethod {
    pub(crate) fn at(tree: &Arc<SyntaxTree>, node: NodeId, owner: NodeId, solver: &TypeSolver) -> Self {
        Self {
            tree: tree.clone(),
            node,
            owner,
            solver: solver.clone(),
        }
    }

    #[must_use]
    pub fn tree(&self) -> &Arc<SyntaxTree> {
        &self.tree
    }

    #[must_use]
    pub fn node(&self) -> NodeId {
        self.node
    }

    node_accessor!(decl, Method, jsym_syntax::MethodDecl);
}

impl fmt::Debug for SourceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceMethod({}.{})", self.tree.qualified_name(self.owner), self.decl().name)
    }
}

impl Annotated for SourceMethod {
    fn annotations(&self) -> Result<Vec<AnnotationRef>> {
        Ok(annotations_of(&self.tree, self.node, &self.solver))
    }
}

impl MethodDeclaration for SourceMethod {
    fn name(&self) -> String {
        self.decl().name.clone()
    }

    fn declaring_type(&self) -> TypeDeclRef {
        Arc::new(SourceTypeDeclaration::at(&self.tree, self.owner, &self.solver))
    }

    fn return_type(&self) -> Result<ResolvedType> {
        match &self.decl().return_type {
            Some(ty) => {
                let ctx = Context::new(self.tree.clone(), self.node, self.solver.clone());
                resolve_type_ref(&ctx, ty)
            }
            None => Ok(ResolvedType::void()),
        }
    }

    fn params(&self) -> Result<Vec<ParamRef>> {
        Ok(self
            .decl()
            .params
            .iter()
            .map(|&p| Arc::new(SourceParameter::at(&self.tree, p, &self.solver)) as ParamRef)
            .collect())
    }

    fn type_parameters(&self) -> Result<Vec<TypeParamRef>> {
        Ok((0..self.decl().type_params.len())
            .map(|index| {
                Arc::new(SourceTypeParameter::new(&self.tree, self.node, index, &self.solver))
                    as TypeParamRef
            })
            .collect())
    }

    fn is_constructor(&self) -> bool {
        self.decl().is_constructor
    }

    fn is_static(&self) -> bool {
        self.decl().modifiers.has(Modifier::Static)
    }

    fn is_abstract(&self) -> bool {
        let decl = self.decl();
        let modifiers = &decl.modifiers;
        modifiers.has(Modifier::Abstract)
            || (in_interface(&self.tree, self.node)
                && decl.body.is_none()
                && !modifiers.has(Modifier::Static)
                && !modifiers.has(Modifier::Default)
                && !modifiers.has(Modifier::Private))
    }

    fn is_default(&self) -> bool {
        self.decl().modifiers.has(Modifier::Default)
    }

    fn accessibility(&self) -> Accessibility {
        accessibility(&self.tree, self.node, &self.decl().modifiers)
    }

    fn specified_exceptions(&self) -> Result<Vec<ResolvedType>> {
        let ctx = Context::new(self.tree.clone(), self.node, self.solver.clone());
        self.decl()
            .throws
            .iter()
            .map(|ty| resolve_type_ref(&ctx, ty))
            .collect()
    }

    fn set_javadoc(&self, javadoc: &Javadoc) -> Result<bool> {
        javadoc::set_javadoc(&self.tree, self.node, javadoc)
    }
}

pub struct SourceEnumConstant {
    tree: Arc<SyntaxTree>,
    node: NodeId,
    owner: NodeId,
    solver: TypeSolver,
}

impl SourceEnumConstant {
    pub(crate) fn at(tree: &Arc<SyntaxTree>, node: NodeId, owner: NodeId, solver: &TypeSolver) -> Self {
        Self {
            tree: tree.clone(),
            node,
            owner,
            solver: solver.clone(),
        }
    }

    node_accessor!(decl, EnumConstant, jsym_syntax::EnumConstantDecl);
}

impl fmt::Debug for SourceEnumConstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceEnumConstant({}.{})", self.tree.qualified_name(self.owner), self.decl().name)
    }
}

impl Annotated for SourceEnumConstant {
    fn annotations(&self) -> Result<Vec<AnnotationRef>> {
        Ok(annotations_of(&self.tree, self.node, &self.solver))
    }
}

impl EnumConstantDeclaration for SourceEnumConstant {
    fn name(&self) -> String {
        self.decl().name.clone()
    }

    fn declaring_type(&self) -> TypeDeclRef {
        Arc::new(SourceTypeDeclaration::at(&self.tree, self.owner, &self.solver))
    }
}

pub struct SourceAnnotationMember {
    tree: Arc<SyntaxTree>,
    node: NodeId,
    owner: NodeId,
    solver: TypeSolver,
}

impl SourceAnnotationMember {
    pub(crate) fn at(tree: &Arc<SyntaxTree>, node: NodeId, owner: NodeId, solver: &TypeSolver) -> Self {
        Self {
            tree: tree.clone(),
            node,
            owner,
            solver: solver.clone(),
        }
    }

    node_accessor!(decl, AnnotationMember, jsym_syntax::AnnotationMemberDecl);
}

impl fmt::Debug for SourceAnnotationMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceAnnotationMember({}.{})", self.tree.qualified_name(self.owner), self.decl().name)
    }
}

impl Annotated for SourceAnnotationMember {
    fn annotations(&self) -> Result<Vec<AnnotationRef>> {
        Ok(annotations_of(&self.tree, self.node, &self.solver))
    }
}

impl AnnotationMemberDeclaration for SourceAnnotationMember {
    fn name(&self) -> String {
        self.decl().name.clone()
    }

    fn ty(&self) -> Result<ResolvedType> {
        let ctx = Context::new(self.tree.clone(), self.node, self.solver.clone());
        resolve_type_ref(&ctx, &self.decl().ty)
    }

    fn default_value(&self) -> Result<Option<AnnotationValue>> {
        let Some(default) = self.decl().default else {
            return Ok(None);
        };
        let ctx = Context::new(self.tree.clone(), default, self.solver.clone());
        decode_value(&self.tree, default, &ctx).map(Some)
    }

    fn declaring_type(&self) -> TypeDeclRef {
        Arc::new(SourceTypeDeclaration::at(&self.tree, self.owner, &self.solver))
    }
}

/// Where an annotation use sits in the tree.
#[derive(Debug, Clone, Copy)]
enum AnnotationSite {
    /// The `index`th annotation in the modifiers of `owner`.
    Modifier { owner: NodeId, index: usize },
    /// A nested annotation expression.
    Expr(NodeId),
}

/// An annotation use in source, `@Foo(...)`.
pub struct SourceAnnotationExpr {
    tree: Arc<SyntaxTree>,
    site: AnnotationSite,
    solver: TypeSolver,
}

impl SourceAnnotationExpr {
    /// The annotation expression at `node`, if it is one.
    #[must_use]
    pub fn at_expr(tree: &Arc<SyntaxTree>, node: NodeId, solver: &TypeSolver) -> Option<Self> {
        matches!(tree.as_expr(node), Some(jsym_syntax::Expr::Annotation(_))).then(|| Self {
            tree: tree.clone(),
            site: AnnotationSite::Expr(node),
            solver: solver.clone(),
        })
    }

    fn annotation(&self) -> &Annotation {
        match self.site {
            AnnotationSite::Modifier { owner, index } => modifiers_of(&self.tree, owner)
                .and_then(|m| m.annotations.get(index))
                .unwrap_or_else(|| unreachable!("annotation site outside its owner's modifiers")),
            AnnotationSite::Expr(node) => match self.tree.as_expr(node) {
                Some(jsym_syntax::Expr::Annotation(annotation)) => annotation,
                _ => unreachable!("annotation site over a non-annotation expression"),
            },
        }
    }

    fn context(&self) -> Context {
        let node = match self.site {
            AnnotationSite::Modifier { owner, .. } => owner,
            AnnotationSite::Expr(node) => node,
        };
        Context::new(self.tree.clone(), node, self.solver.clone())
    }
}

impl fmt::Debug for SourceAnnotationExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceAnnotationExpr(@{})", self.annotation().name)
    }
}

impl ResolvedAnnotationExpr for SourceAnnotationExpr {
    fn name(&self) -> String {
        self.annotation().name.clone()
    }

    fn qualified_name(&self) -> String {
        match self.declaration() {
            Ok(Some(decl)) => decl.qualified_name(),
            _ => self.name(),
        }
    }

    fn declaration(&self) -> Result<Option<TypeDeclRef>> {
        Ok(self
            .context()
            .solve_type(&self.annotation().name)?
            .into_declaration())
    }

    fn values(&self) -> Result<Vec<(String, AnnotationValue)>> {
        decode_args(&self.tree, &self.annotation().args, &self.context())
    }

    /// Only the requested member is decoded.
    fn value(&self, name: &str) -> Result<Option<AnnotationValue>> {
        let node = match &self.annotation().args {
            jsym_syntax::AnnotationArgs::Marker => None,
            jsym_syntax::AnnotationArgs::SingleMember(value) => (name == "value").then_some(*value),
            jsym_syntax::AnnotationArgs::Normal(pairs) => pairs
                .iter()
                .find(|(member, _)| member == name)
                .map(|(_, value)| *value),
        };
        node.map(|node| decode_value(&self.tree, node, &self.context()))
            .transpose()
    }
}

impl NameLookup for Context {
    fn class_literal_name(&self, ty: &jsym_syntax::TypeRef) -> Result<String> {
        match resolve_type_ref(self, ty) {
            Ok(resolved) => Ok(resolved.erase_arguments().describe()),
            Err(Error::UnsolvedSymbol { .. }) => Ok(self.tree().text()[ty.range].trim().to_string()),
            Err(err) => Err(err),
        }
    }

    fn annotation_type_name(&self, name: &str) -> Result<String> {
        Ok(self
            .solve_type(name)?
            .into_declaration()
            .map_or_else(|| name.to_string(), |decl| decl.qualified_name()))
    }

    fn enum_constant(&self, tree: &SyntaxTree, node: NodeId) -> Result<Option<(String, String)>> {
        use jsym_syntax::Expr;
        match tree.as_expr(node) {
            Some(Expr::Name(name)) => Ok(match self.solve_symbol(name)?.into_declaration() {
                Some(jsym_types::ValueDeclaration::EnumConstant(constant)) => {
                    Some((constant.declaring_type().qualified_name(), constant.name()))
                }
                _ => None,
            }),
            Some(Expr::FieldAccess { target, name }) => {
                let Some(type_name) = crate::expr::dotted_name(tree, *target) else {
                    return Ok(None);
                };
                let Some(decl) = self.solve_type(&type_name)?.into_declaration() else {
                    return Ok(None);
                };
                Ok(decl
                    .enum_constant(name)?
                    .map(|constant| (decl.qualified_name(), constant.name())))
            }
            _ => Ok(None),
        }
    }
}
