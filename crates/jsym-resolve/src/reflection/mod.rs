//! Declarations backed by runtime class mirrors.
//!
//! A [`ClassMirror`] is the introspection handle of one loaded class: its
//! modifiers as class-file access flags, generic supertypes, members and
//! annotations. Mirrors live in a [`RuntimeRegistry`]; the platform registry
//! carries the core `java.*` types and is built once per process.

mod loader;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use jsym_classfile::access::{
    ACC_ABSTRACT, ACC_ENUM, ACC_PRIVATE, ACC_PROTECTED, ACC_PUBLIC, ACC_STATIC, ACC_TRANSIENT,
    ACC_VARARGS, ACC_VOLATILE,
};
use jsym_types::{
    Accessibility, Annotated, AnnotationMemberDeclaration, AnnotationMemberRef, AnnotationRef,
    AnnotationValue, BoundKind, EnumConstantDeclaration, EnumConstantRef, Error,
    FieldDeclaration, FieldRef, MethodDeclaration, MethodRef, ParamRef, ParameterDeclaration,
    PrimitiveType, ReferenceTypeDeclaration, ResolvedAnnotationExpr, ResolvedType, Result,
    TypeDeclRef, TypeDeclarationKind, TypeParamRef, TypeParameterDeclaration, TypeSolver,
    JAVA_LANG_OBJECT,
};
use once_cell::sync::Lazy;

/// A type as a mirror reports it. Class names are qualified source names.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeMirror {
    Primitive(PrimitiveType),
    Class { name: String, args: Vec<TypeMirror> },
    Variable(String),
    Wildcard(Option<(BoundKind, Box<TypeMirror>)>),
    Array(Box<TypeMirror>),
    Void,
}

impl TypeMirror {
    #[must_use]
    pub fn class(name: impl Into<String>) -> Self {
        TypeMirror::Class {
            name: name.into(),
            args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeParamMirror {
    pub name: String,
    pub bounds: Vec<TypeMirror>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationMirror {
    pub type_name: String,
    pub values: Vec<(String, AnnotationValue)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldMirror {
    pub name: String,
    pub ty: TypeMirror,
    pub modifiers: u16,
    pub annotations: Vec<AnnotationMirror>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamMirror {
    /// Present only when the class was compiled with parameter names.
    pub name: Option<String>,
    pub ty: TypeMirror,
    pub annotations: Vec<AnnotationMirror>,
}

/// A method or constructor. Constructors carry the simple class name.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodMirror {
    pub name: String,
    pub modifiers: u16,
    pub type_params: Vec<TypeParamMirror>,
    pub params: Vec<ParamMirror>,
    pub return_type: TypeMirror,
    /// Declared `throws` types.
    pub exceptions: Vec<TypeMirror>,
    pub annotations: Vec<AnnotationMirror>,
    /// Default of an annotation type element.
    pub default_value: Option<AnnotationValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassMirror {
    pub package: String,
    /// Name relative to the package, `Outer.Inner` for member classes.
    pub class_name: String,
    pub kind: TypeDeclarationKind,
    pub modifiers: u16,
    pub type_params: Vec<TypeParamMirror>,
    pub superclass: Option<TypeMirror>,
    pub interfaces: Vec<TypeMirror>,
    /// Fields in declaration order; enum constants carry `ACC_ENUM`.
    pub fields: Vec<FieldMirror>,
    pub methods: Vec<MethodMirror>,
    pub constructors: Vec<MethodMirror>,
    pub annotations: Vec<AnnotationMirror>,
    /// Qualified names of member classes.
    pub member_classes: Vec<String>,
}

impl ClassMirror {
    /// A public class with no members extending nothing.
    #[must_use]
    pub fn new(package: impl Into<String>, class_name: impl Into<String>, kind: TypeDeclarationKind) -> Self {
        Self {
            package: package.into(),
            class_name: class_name.into(),
            kind,
            modifiers: ACC_PUBLIC,
            type_params: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            annotations: Vec::new(),
            member_classes: Vec::new(),
        }
    }

    #[must_use]
    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.class_name.clone()
        } else {
            format!("{}.{}", self.package, self.class_name)
        }
    }

    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.class_name.rsplit('.').next().unwrap_or(&self.class_name)
    }
}

static PLATFORM_STUBS: &[(&str, &str)] = &[
    ("java_lang.java", include_str!("platform/java_lang.java")),
    (
        "java_lang_annotation.java",
        include_str!("platform/java_lang_annotation.java"),
    ),
    ("java_io.java", include_str!("platform/java_io.java")),
    ("java_util.java", include_str!("platform/java_util.java")),
];

static PLATFORM: Lazy<Arc<RuntimeRegistry>> = Lazy::new(|| {
    let mut registry = RuntimeRegistry::new();
    for (name, text) in PLATFORM_STUBS {
        if let Err(err) = registry.load_java_source(text) {
            tracing::error!(target = "jsym.resolve", stub = name, error = %err, "failed to load platform classes");
        }
    }
    tracing::debug!(target = "jsym.resolve", classes = registry.len(), "platform registry loaded");
    Arc::new(registry)
});

/// The classes visible to the resolving process, by qualified name.
#[derive(Debug, Clone, Default)]
pub struct RuntimeRegistry {
    classes: HashMap<String, Arc<ClassMirror>>,
}

impl RuntimeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The core `java.lang`, `java.lang.annotation`, `java.io` and
    /// `java.util` classes.
    #[must_use]
    pub fn platform() -> Arc<RuntimeRegistry> {
        PLATFORM.clone()
    }

    pub fn insert(&mut self, mirror: ClassMirror) {
        self.classes.insert(mirror.qualified_name(), Arc::new(mirror));
    }

    #[must_use]
    pub fn get(&self, qualified_name: &str) -> Option<Arc<ClassMirror>> {
        self.classes.get(qualified_name).cloned()
    }

    #[must_use]
    pub fn contains(&self, qualified_name: &str) -> bool {
        self.classes.contains_key(qualified_name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Register every type declared in a Java compilation unit, read the
    /// way reflection would report the compiled class.
    ///
    /// Simple names resolve against the unit's own types, its imports, then
    /// `java.lang` classes already registered, and fall back to the unit's
    /// package.
    pub fn load_java_source(&mut self, text: &str) -> Result<()> {
        let tree = jsym_syntax::parse(text)
            .map_err(|err| Error::environment("parsing runtime class stubs", err))?;
        let mirrors = loader::mirrors(&tree, self)?;
        for mirror in mirrors {
            self.insert(mirror);
        }
        Ok(())
    }
}

fn accessibility(flags: u16) -> Accessibility {
    if flags & ACC_PUBLIC != 0 {
        Accessibility::Public
    } else if flags & ACC_PROTECTED != 0 {
        Accessibility::Protected
    } else if flags & ACC_PRIVATE != 0 {
        Accessibility::Private
    } else {
        Accessibility::PackagePrivate
    }
}

fn annotation_refs(annotations: &[AnnotationMirror], solver: &TypeSolver) -> Vec<AnnotationRef> {
    annotations
        .iter()
        .map(|mirror| {
            Arc::new(ReflectionAnnotationExpr {
                mirror: mirror.clone(),
                solver: solver.clone(),
            }) as AnnotationRef
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Member {
    Method(usize),
    Constructor(usize),
}

/// A class, interface, enum or annotation type known through its mirror.
#[derive(Clone)]
pub struct ReflectionTypeDeclaration {
    mirror: Arc<ClassMirror>,
    solver: TypeSolver,
}

impl ReflectionTypeDeclaration {
    #[must_use]
    pub fn new(mirror: Arc<ClassMirror>, solver: TypeSolver) -> Self {
        Self { mirror, solver }
    }

    #[must_use]
    pub fn mirror(&self) -> &Arc<ClassMirror> {
        &self.mirror
    }

    fn method(&self, member: Member) -> &MethodMirror {
        match member {
            Member::Method(index) => &self.mirror.methods[index],
            Member::Constructor(index) => &self.mirror.constructors[index],
        }
    }

    fn type_param(&self, member: Option<Member>, index: usize) -> TypeParamRef {
        Arc::new(ReflectionTypeParameter {
            class: self.clone(),
            member,
            index,
        })
    }

    fn resolve(&self, ty: &TypeMirror, member: Option<Member>) -> Result<ResolvedType> {
        match ty {
            TypeMirror::Primitive(p) => Ok(ResolvedType::primitive(*p)),
            TypeMirror::Void => Ok(ResolvedType::void()),
            TypeMirror::Array(component) => Ok(ResolvedType::array(self.resolve(component, member)?)),
            TypeMirror::Wildcard(None) => Ok(ResolvedType::unbounded()),
            TypeMirror::Wildcard(Some((kind, bound))) => {
                Ok(ResolvedType::wildcard(*kind, self.resolve(bound, member)?))
            }
            TypeMirror::Class { name, args } => {
                let decl = self
                    .solver
                    .try_to_solve_type(name)?
                    .into_declaration()
                    .ok_or_else(|| {
                        Error::unsolved(name.clone(), format!("runtime class {}", self.mirror.qualified_name()))
                    })?;
                let args = args
                    .iter()
                    .map(|arg| self.resolve(arg, member))
                    .collect::<Result<Vec<_>>>()?;
                Ok(ResolvedType::reference(decl, args))
            }
            TypeMirror::Variable(name) => self.type_variable(name, member),
        }
    }

    /// Method type parameters shadow those of the class.
    fn type_variable(&self, name: &str, member: Option<Member>) -> Result<ResolvedType> {
        if let Some(member) = member {
            if let Some(index) = self.method(member).type_params.iter().position(|p| p.name == name) {
                return Ok(ResolvedType::type_variable(self.type_param(Some(member), index)));
            }
        }
        match self.mirror.type_params.iter().position(|p| p.name == name) {
            Some(index) => Ok(ResolvedType::type_variable(self.type_param(None, index))),
            None => Err(Error::unsolved(
                name,
                format!("type variables of runtime class {}", self.mirror.qualified_name()),
            )),
        }
    }
}

impl fmt::Debug for ReflectionTypeDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReflectionTypeDeclaration({})", self.mirror.qualified_name())
    }
}

impl Annotated for ReflectionTypeDeclaration {
    fn annotations(&self) -> Result<Vec<AnnotationRef>> {
        Ok(annotation_refs(&self.mirror.annotations, &self.solver))
    }
}

impl ReferenceTypeDeclaration for ReflectionTypeDeclaration {
    fn name(&self) -> String {
        self.mirror.simple_name().to_string()
    }

    fn package_name(&self) -> String {
        self.mirror.package.clone()
    }

    fn class_name(&self) -> String {
        self.mirror.class_name.clone()
    }

    fn qualified_name(&self) -> String {
        self.mirror.qualified_name()
    }

    fn kind(&self) -> TypeDeclarationKind {
        self.mirror.kind
    }

    fn accessibility(&self) -> Accessibility {
        accessibility(self.mirror.modifiers)
    }

    fn type_parameters(&self) -> Result<Vec<TypeParamRef>> {
        Ok((0..self.mirror.type_params.len())
            .map(|index| self.type_param(None, index))
            .collect())
    }

    fn ancestors(&self) -> Result<Vec<ResolvedType>> {
        if self.mirror.qualified_name() == JAVA_LANG_OBJECT {
            return Ok(Vec::new());
        }
        let mut out = Vec::new();
        if let Some(superclass) = &self.mirror.superclass {
            out.push(self.resolve(superclass, None)?);
        }
        for interface in &self.mirror.interfaces {
            out.push(self.resolve(interface, None)?);
        }
        Ok(out)
    }

    fn declared_fields(&self) -> Result<Vec<FieldRef>> {
        Ok(self
            .mirror
            .fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.modifiers & ACC_ENUM == 0)
            .map(|(index, _)| {
                Arc::new(ReflectionField {
                    class: self.clone(),
                    index,
                }) as FieldRef
            })
            .collect())
    }

    fn declared_methods(&self) -> Result<Vec<MethodRef>> {
        Ok((0..self.mirror.methods.len())
            .map(|index| {
                Arc::new(ReflectionMethod {
                    class: self.clone(),
                    member: Member::Method(index),
                }) as MethodRef
            })
            .collect())
    }

    fn constructors(&self) -> Result<Vec<MethodRef>> {
        Ok((0..self.mirror.constructors.len())
            .map(|index| {
                Arc::new(ReflectionMethod {
                    class: self.clone(),
                    member: Member::Constructor(index),
                }) as MethodRef
            })
            .collect())
    }

    fn internal_types(&self) -> Result<Vec<TypeDeclRef>> {
        let mut out = Vec::new();
        for name in &self.mirror.member_classes {
            if let Some(decl) = self.solver.try_to_solve_type(name)?.into_declaration() {
                out.push(decl);
            }
        }
        Ok(out)
    }

    fn enum_constants(&self) -> Result<Vec<EnumConstantRef>> {
        let mut out = Vec::new();
        for (index, field) in self.mirror.fields.iter().enumerate() {
            if field.modifiers & ACC_ENUM != 0 {
                out.push(Arc::new(ReflectionEnumConstant::new(self.clone(), index)?) as EnumConstantRef);
            }
        }
        Ok(out)
    }

    fn annotation_members(&self) -> Result<Vec<AnnotationMemberRef>> {
        if self.mirror.kind != TypeDeclarationKind::Annotation {
            return Ok(Vec::new());
        }
        Ok(self
            .mirror
            .methods
            .iter()
            .enumerate()
            .filter(|(_, m)| m.modifiers & ACC_STATIC == 0)
            .map(|(index, _)| {
                Arc::new(ReflectionAnnotationMember {
                    class: self.clone(),
                    index,
                }) as AnnotationMemberRef
            })
            .collect())
    }

    fn type_solver(&self) -> TypeSolver {
        self.solver.clone()
    }
}

pub struct ReflectionTypeParameter {
    class: ReflectionTypeDeclaration,
    member: Option<Member>,
    index: usize,
}

impl ReflectionTypeParameter {
    fn mirror(&self) -> &TypeParamMirror {
        match self.member {
            Some(member) => &self.class.method(member).type_params[self.index],
            None => &self.class.mirror.type_params[self.index],
        }
    }
}

impl fmt::Debug for ReflectionTypeParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReflectionTypeParameter({})", self.qualified_name())
    }
}

impl TypeParameterDeclaration for ReflectionTypeParameter {
    fn name(&self) -> String {
        self.mirror().name.clone()
    }

    fn container_qualified_name(&self) -> String {
        match self.member {
            Some(member) => {
                let method = ReflectionMethod {
                    class: self.class.clone(),
                    member,
                };
                method
                    .qualified_signature()
                    .unwrap_or_else(|_| method.qualified_name())
            }
            None => self.class.mirror.qualified_name(),
        }
    }

    fn declared_on_type(&self) -> bool {
        self.member.is_none()
    }

    fn bounds(&self) -> Result<Vec<ResolvedType>> {
        self.mirror()
            .bounds
            .iter()
            .map(|bound| self.class.resolve(bound, self.member))
            .collect()
    }
}

pub struct ReflectionField {
    class: ReflectionTypeDeclaration,
    index: usize,
}

impl ReflectionField {
    fn mirror(&self) -> &FieldMirror {
        &self.class.mirror.fields[self.index]
    }
}

impl fmt::Debug for ReflectionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReflectionField({}.{})", self.class.mirror.qualified_name(), self.mirror().name)
    }
}

impl Annotated for ReflectionField {
    fn annotations(&self) -> Result<Vec<AnnotationRef>> {
        Ok(annotation_refs(&self.mirror().annotations, &self.class.solver))
    }
}

impl FieldDeclaration for ReflectionField {
    fn name(&self) -> String {
        self.mirror().name.clone()
    }

    fn ty(&self) -> Result<ResolvedType> {
        self.class.resolve(&self.mirror().ty, None)
    }

    fn is_static(&self) -> bool {
        self.mirror().modifiers & ACC_STATIC != 0
    }

    fn is_volatile(&self) -> bool {
        self.mirror().modifiers & ACC_VOLATILE != 0
    }

    fn is_transient(&self) -> bool {
        self.mirror().modifiers & ACC_TRANSIENT != 0
    }

    fn accessibility(&self) -> Accessibility {
        accessibility(self.mirror().modifiers)
    }

    fn declaring_type(&self) -> TypeDeclRef {
        Arc::new(self.class.clone())
    }
}

/// A method or constructor known through its mirror.
pub struct ReflectionMethod {
    class: ReflectionTypeDeclaration,
    member: Member,
}

impl ReflectionMethod {
    fn mirror(&self) -> &MethodMirror {
        self.class.method(self.member)
    }
}

impl fmt::Debug for ReflectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReflectionMethod({}.{})", self.class.mirror.qualified_name(), self.mirror().name)
    }
}

impl Annotated for ReflectionMethod {
    fn annotations(&self) -> Result<Vec<AnnotationRef>> {
        Ok(annotation_refs(&self.mirror().annotations, &self.class.solver))
    }
}

impl MethodDeclaration for ReflectionMethod {
    fn name(&self) -> String {
        self.mirror().name.clone()
    }

    fn declaring_type(&self) -> TypeDeclRef {
        Arc::new(self.class.clone())
    }

    fn return_type(&self) -> Result<ResolvedType> {
        self.class.resolve(&self.mirror().return_type, Some(self.member))
    }

    fn params(&self) -> Result<Vec<ParamRef>> {
        let count = self.mirror().params.len();
        Ok((0..count)
            .map(|index| {
                Arc::new(ReflectionParameter {
                    class: self.class.clone(),
                    member: self.member,
                    index,
                }) as ParamRef
            })
            .collect())
    }

    fn type_parameters(&self) -> Result<Vec<TypeParamRef>> {
        Ok((0..self.mirror().type_params.len())
            .map(|index| self.class.type_param(Some(self.member), index))
            .collect())
    }

    fn is_constructor(&self) -> bool {
        matches!(self.member, Member::Constructor(_))
    }

    fn is_static(&self) -> bool {
        self.mirror().modifiers & ACC_STATIC != 0
    }

    fn is_abstract(&self) -> bool {
        self.mirror().modifiers & ACC_ABSTRACT != 0
    }

    fn is_default(&self) -> bool {
        let flags = self.mirror().modifiers;
        self.class.mirror.kind == TypeDeclarationKind::Interface
            && flags & (ACC_ABSTRACT | ACC_STATIC | ACC_PRIVATE) == 0
    }

    fn accessibility(&self) -> Accessibility {
        accessibility(self.mirror().modifiers)
    }

    fn specified_exceptions(&self) -> Result<Vec<ResolvedType>> {
        self.mirror()
            .exceptions
            .iter()
            .map(|ty| self.class.resolve(ty, Some(self.member)))
            .collect()
    }
}

pub struct ReflectionParameter {
    class: ReflectionTypeDeclaration,
    member: Member,
    index: usize,
}

impl ReflectionParameter {
    fn mirror(&self) -> &ParamMirror {
        &self.class.method(self.member).params[self.index]
    }
}

impl fmt::Debug for ReflectionParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReflectionParameter({})", self.name())
    }
}

impl Annotated for ReflectionParameter {
    fn annotations(&self) -> Result<Vec<AnnotationRef>> {
        Ok(annotation_refs(&self.mirror().annotations, &self.class.solver))
    }
}

impl ParameterDeclaration for ReflectionParameter {
    fn name(&self) -> String {
        self.mirror()
            .name
            .clone()
            .unwrap_or_else(|| format!("arg{}", self.index))
    }

    fn ty(&self) -> Result<ResolvedType> {
        self.class.resolve(&self.mirror().ty, Some(self.member))
    }

    fn is_varargs(&self) -> bool {
        let method = self.class.method(self.member);
        self.index + 1 == method.params.len() && method.modifiers & ACC_VARARGS != 0
    }

    fn has_name(&self) -> bool {
        self.mirror().name.is_some()
    }
}

pub struct ReflectionEnumConstant {
    class: ReflectionTypeDeclaration,
    index: usize,
}

impl ReflectionEnumConstant {
    /// Wrap field `index` of `class`, which must be an enum constant.
    pub fn new(class: ReflectionTypeDeclaration, index: usize) -> Result<Self> {
        let Some(field) = class.mirror.fields.get(index) else {
            return Err(Error::InvalidInput(format!(
                "{} has no field #{index}",
                class.mirror.qualified_name()
            )));
        };
        if field.modifiers & ACC_ENUM == 0 {
            return Err(Error::InvalidInput(format!(
                "{}.{} is not an enum constant",
                class.mirror.qualified_name(),
                field.name
            )));
        }
        Ok(Self { class, index })
    }
}

impl fmt::Debug for ReflectionEnumConstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReflectionEnumConstant({}.{})", self.class.mirror.qualified_name(), self.name())
    }
}

impl Annotated for ReflectionEnumConstant {
    fn annotations(&self) -> Result<Vec<AnnotationRef>> {
        Ok(annotation_refs(&self.class.mirror.fields[self.index].annotations, &self.class.solver))
    }
}

impl EnumConstantDeclaration for ReflectionEnumConstant {
    fn name(&self) -> String {
        self.class.mirror.fields[self.index].name.clone()
    }

    fn declaring_type(&self) -> TypeDeclRef {
        Arc::new(self.class.clone())
    }
}

pub struct ReflectionAnnotationMember {
    class: ReflectionTypeDeclaration,
    index: usize,
}

impl ReflectionAnnotationMember {
    fn method(&self) -> ReflectionMethod {
        ReflectionMethod {
            class: self.class.clone(),
            member: Member::Method(self.index),
        }
    }
}

impl fmt::Debug for ReflectionAnnotationMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReflectionAnnotationMember({}.{})", self.class.mirror.qualified_name(), self.name())
    }
}

impl Annotated for ReflectionAnnotationMember {
    fn annotations(&self) -> Result<Vec<AnnotationRef>> {
        self.method().annotations()
    }
}

impl AnnotationMemberDeclaration for ReflectionAnnotationMember {
    fn name(&self) -> String {
        self.class.mirror.methods[self.index].name.clone()
    }

    fn ty(&self) -> Result<ResolvedType> {
        self.method().return_type()
    }

    fn default_value(&self) -> Result<Option<AnnotationValue>> {
        Ok(self.class.mirror.methods[self.index].default_value.clone())
    }

    fn declaring_type(&self) -> TypeDeclRef {
        Arc::new(self.class.clone())
    }
}

pub struct ReflectionAnnotationExpr {
    mirror: AnnotationMirror,
    solver: TypeSolver,
}

impl fmt::Debug for ReflectionAnnotationExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReflectionAnnotationExpr(@{})", self.mirror.type_name)
    }
}

impl ResolvedAnnotationExpr for ReflectionAnnotationExpr {
    fn name(&self) -> String {
        let name = &self.mirror.type_name;
        name.rsplit('.').next().unwrap_or(name).to_string()
    }

    fn qualified_name(&self) -> String {
        self.mirror.type_name.clone()
    }

    fn declaration(&self) -> Result<Option<TypeDeclRef>> {
        Ok(self
            .solver
            .try_to_solve_type(&self.mirror.type_name)?
            .into_declaration())
    }

    fn values(&self) -> Result<Vec<(String, AnnotationValue)>> {
        Ok(self.mirror.values.clone())
    }
}
