//! The declaration capability surface shared by every backend.
//!
//! Declarations are cheap views over a backend object (a syntax node, a
//! class-file member, a runtime mirror). They are recreated per query and
//! never cached by the solvers.

use std::fmt;
use std::sync::Arc;

use jsym_core::is_match;
use jsym_syntax::Javadoc;

use crate::error::Result;
use crate::solver::TypeSolver;
use crate::ty::{collect_ancestors, ResolvedType};

pub type TypeDeclRef = Arc<dyn ReferenceTypeDeclaration>;
pub type TypeParamRef = Arc<dyn TypeParameterDeclaration>;
pub type FieldRef = Arc<dyn FieldDeclaration>;
pub type ParamRef = Arc<dyn ParameterDeclaration>;
pub type LocalVarRef = Arc<dyn LocalVariableDeclaration>;
pub type MethodRef = Arc<dyn MethodDeclaration>;
pub type EnumConstantRef = Arc<dyn EnumConstantDeclaration>;
pub type AnnotationMemberRef = Arc<dyn AnnotationMemberDeclaration>;
pub type AnnotationRef = Arc<dyn ResolvedAnnotationExpr>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accessibility {
    Public,
    Protected,
    PackagePrivate,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeDeclarationKind {
    Class,
    Interface,
    Enum,
    Annotation,
}

/// Anything that can carry annotations.
pub trait Annotated {
    fn annotations(&self) -> Result<Vec<AnnotationRef>>;

    /// Annotation by qualified or simple name; see [`find_annotation`].
    fn annotation(&self, name: &str) -> Result<Option<AnnotationRef>> {
        Ok(find_annotation(self.annotations()?, name))
    }

    fn has_annotation(&self, name: &str) -> Result<bool> {
        Ok(self.annotation(name)?.is_some())
    }
}

/// Exact qualified-name match first, then the general name-match rule.
pub fn find_annotation(annotations: Vec<AnnotationRef>, name: &str) -> Option<AnnotationRef> {
    if let Some(exact) = annotations.iter().find(|a| a.qualified_name() == name) {
        return Some(exact.clone());
    }
    annotations
        .into_iter()
        .find(|a| is_match(&a.qualified_name(), name))
}

pub trait ReferenceTypeDeclaration: Annotated + fmt::Debug + Send + Sync {
    /// Simple name.
    fn name(&self) -> String;

    fn package_name(&self) -> String;

    /// Name inside the package: `Outer.Inner`.
    fn class_name(&self) -> String;

    fn qualified_name(&self) -> String {
        match self.package_name().as_str() {
            "" => self.class_name(),
            package => format!("{package}.{}", self.class_name()),
        }
    }

    fn kind(&self) -> TypeDeclarationKind;

    fn accessibility(&self) -> Accessibility;

    fn type_parameters(&self) -> Result<Vec<TypeParamRef>>;

    /// Direct supertypes, superclass first, in terms of this declaration's
    /// own type variables. Classes without an explicit superclass report
    /// `java.lang.Object`; `java.lang.Object` itself reports nothing.
    fn ancestors(&self) -> Result<Vec<ResolvedType>>;

    fn declared_fields(&self) -> Result<Vec<FieldRef>>;

    fn declared_methods(&self) -> Result<Vec<MethodRef>>;

    fn constructors(&self) -> Result<Vec<MethodRef>>;

    /// Member types declared directly in this type.
    fn internal_types(&self) -> Result<Vec<TypeDeclRef>>;

    fn enum_constants(&self) -> Result<Vec<EnumConstantRef>> {
        Ok(Vec::new())
    }

    fn annotation_members(&self) -> Result<Vec<AnnotationMemberRef>> {
        Ok(Vec::new())
    }

    /// The solver this declaration resolves its own references through.
    fn type_solver(&self) -> TypeSolver;

    fn is_class(&self) -> bool {
        self.kind() == TypeDeclarationKind::Class
    }

    fn is_interface(&self) -> bool {
        self.kind() == TypeDeclarationKind::Interface
    }

    fn is_enum(&self) -> bool {
        self.kind() == TypeDeclarationKind::Enum
    }

    fn is_annotation(&self) -> bool {
        self.kind() == TypeDeclarationKind::Annotation
    }

    /// For annotation types: whether the annotation is `@Inherited`.
    fn is_inheritable(&self) -> Result<bool> {
        Ok(self.is_annotation() && self.has_annotation("java.lang.annotation.Inherited")?)
    }
}

impl dyn ReferenceTypeDeclaration {
    /// Every supertype with type arguments substituted along each edge.
    pub fn all_ancestors(&self) -> Result<Vec<ResolvedType>> {
        collect_ancestors(self.ancestors()?)
    }

    /// Supertype declarations, nearest first.
    pub fn ancestor_declarations(&self) -> Result<Vec<TypeDeclRef>> {
        Ok(self
            .all_ancestors()?
            .iter()
            .filter_map(|ty| ty.as_reference().ok().map(|r| r.declaration().clone()))
            .collect())
    }

    /// Field by name, declared here or inherited.
    pub fn field(&self, name: &str) -> Result<Option<FieldRef>> {
        if let Some(field) = self.declared_fields()?.into_iter().find(|f| f.name() == name) {
            return Ok(Some(field));
        }
        for ancestor in self.ancestor_declarations()? {
            if let Some(field) = ancestor
                .declared_fields()?
                .into_iter()
                .find(|f| f.name() == name)
            {
                return Ok(Some(field));
            }
        }
        Ok(None)
    }

    pub fn has_field(&self, name: &str) -> Result<bool> {
        Ok(self.field(name)?.is_some())
    }

    /// Declared and inherited fields; hidden fields are not removed.
    pub fn all_fields(&self) -> Result<Vec<FieldRef>> {
        let mut fields = self.declared_fields()?;
        for ancestor in self.ancestor_declarations()? {
            fields.extend(ancestor.declared_fields()?);
        }
        Ok(fields)
    }

    /// Declared and inherited methods, skipping inherited ones a nearer type
    /// already declares with the same signature.
    pub fn all_methods(&self) -> Result<Vec<MethodRef>> {
        let mut methods = self.declared_methods()?;
        let mut signatures = methods
            .iter()
            .map(|m| m.signature())
            .collect::<Result<Vec<_>>>()?;
        for ancestor in self.ancestor_declarations()? {
            for method in ancestor.declared_methods()? {
                let signature = method.signature()?;
                if !signatures.contains(&signature) {
                    signatures.push(signature);
                    methods.push(method);
                }
            }
        }
        Ok(methods)
    }

    pub fn internal_type(&self, name: &str) -> Result<Option<TypeDeclRef>> {
        Ok(self.internal_types()?.into_iter().find(|t| t.name() == name))
    }

    pub fn enum_constant(&self, name: &str) -> Result<Option<EnumConstantRef>> {
        Ok(self.enum_constants()?.into_iter().find(|c| c.name() == name))
    }

    /// Whether `other` is this type or one of its supertypes.
    pub fn can_be_assigned_to(&self, other: &dyn ReferenceTypeDeclaration) -> Result<bool> {
        let target = other.qualified_name();
        if self.qualified_name() == target || target == crate::ty::JAVA_LANG_OBJECT {
            return Ok(true);
        }
        Ok(self
            .ancestor_declarations()?
            .iter()
            .any(|a| a.qualified_name() == target))
    }
}

pub trait TypeParameterDeclaration: fmt::Debug + Send + Sync {
    fn name(&self) -> String;

    /// Qualified name of the declaring type, or of the declaring method
    /// including its signature.
    fn container_qualified_name(&self) -> String;

    fn declared_on_type(&self) -> bool;

    /// `extends` bounds; empty means `java.lang.Object`.
    fn bounds(&self) -> Result<Vec<ResolvedType>>;

    fn qualified_name(&self) -> String {
        format!("{}.{}", self.container_qualified_name(), self.name())
    }
}

pub trait FieldDeclaration: Annotated + fmt::Debug + Send + Sync {
    fn name(&self) -> String;
    fn ty(&self) -> Result<ResolvedType>;
    fn is_static(&self) -> bool;
    fn is_volatile(&self) -> bool;
    fn is_transient(&self) -> bool;
    fn accessibility(&self) -> Accessibility;
    fn declaring_type(&self) -> TypeDeclRef;
}

pub trait ParameterDeclaration: Annotated + fmt::Debug + Send + Sync {
    fn name(&self) -> String;

    /// Declared type; a varargs parameter reports its array type.
    fn ty(&self) -> Result<ResolvedType>;

    fn is_varargs(&self) -> bool;

    /// Whether the name comes from the declaration rather than a positional
    /// fallback (`arg0`, `arg1`, ...).
    fn has_name(&self) -> bool {
        true
    }
}

pub trait LocalVariableDeclaration: Annotated + fmt::Debug + Send + Sync {
    fn name(&self) -> String;
    fn ty(&self) -> Result<ResolvedType>;
}

/// Methods and constructors.
pub trait MethodDeclaration: Annotated + fmt::Debug + Send + Sync {
    fn name(&self) -> String;

    fn declaring_type(&self) -> TypeDeclRef;

    /// `void` for constructors.
    fn return_type(&self) -> Result<ResolvedType>;

    fn params(&self) -> Result<Vec<ParamRef>>;

    fn type_parameters(&self) -> Result<Vec<TypeParamRef>>;

    fn is_constructor(&self) -> bool {
        false
    }

    fn is_static(&self) -> bool;

    fn is_abstract(&self) -> bool;

    /// An interface method with a body.
    fn is_default(&self) -> bool;

    fn accessibility(&self) -> Accessibility;

    /// Types listed in the `throws` clause, in declaration order.
    fn specified_exceptions(&self) -> Result<Vec<ResolvedType>>;

    fn has_varargs(&self) -> Result<bool> {
        Ok(self.params()?.last().is_some_and(|p| p.is_varargs()))
    }

    /// `name(T1, T2)` with described parameter types.
    fn signature(&self) -> Result<String> {
        let params = self
            .params()?
            .iter()
            .map(|p| p.ty().map(|ty| ty.describe()))
            .collect::<Result<Vec<_>>>()?;
        Ok(format!("{}({})", self.name(), params.join(", ")))
    }

    fn qualified_name(&self) -> String {
        format!("{}.{}", self.declaring_type().qualified_name(), self.name())
    }

    fn qualified_signature(&self) -> Result<String> {
        Ok(format!(
            "{}.{}",
            self.declaring_type().qualified_name(),
            self.signature()?
        ))
    }

    /// Insert or replace this method's documentation comment in its backing
    /// file. Returns `false` when the declaration has nothing to rewrite.
    fn set_javadoc(&self, javadoc: &Javadoc) -> Result<bool> {
        let _ = javadoc;
        Ok(false)
    }
}

pub trait EnumConstantDeclaration: Annotated + fmt::Debug + Send + Sync {
    fn name(&self) -> String;

    fn declaring_type(&self) -> TypeDeclRef;

    fn ty(&self) -> Result<ResolvedType> {
        Ok(ResolvedType::reference(self.declaring_type(), Vec::new()))
    }
}

pub trait AnnotationMemberDeclaration: Annotated + fmt::Debug + Send + Sync {
    fn name(&self) -> String;
    fn ty(&self) -> Result<ResolvedType>;
    fn default_value(&self) -> Result<Option<AnnotationValue>>;
    fn declaring_type(&self) -> TypeDeclRef;
}

/// An annotation use site, `@Foo(...)`.
pub trait ResolvedAnnotationExpr: fmt::Debug + Send + Sync {
    /// Name as written.
    fn name(&self) -> String;

    /// Resolved qualified name; the written name when it does not resolve.
    fn qualified_name(&self) -> String;

    /// The annotation type, if it resolves.
    fn declaration(&self) -> Result<Option<TypeDeclRef>>;

    /// Explicitly given members, in order. Defaults are not included.
    fn values(&self) -> Result<Vec<(String, AnnotationValue)>>;

    fn value(&self, name: &str) -> Result<Option<AnnotationValue>> {
        Ok(self
            .values()?
            .into_iter()
            .find(|(member, _)| member == name)
            .map(|(_, value)| value))
    }
}

/// A decoded annotation member value.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    Boolean(bool),
    Char(char),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    /// String literals and text blocks.
    String(String),
    Null,
    /// A class literal, by qualified name when known.
    Class(String),
    Enum {
        type_name: String,
        constant: String,
    },
    Annotation {
        type_name: String,
        values: Vec<(String, AnnotationValue)>,
    },
    Array(Vec<AnnotationValue>),
}

impl AnnotationValue {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnnotationValue::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AnnotationValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AnnotationValue::Byte(v) => Some(i64::from(*v)),
            AnnotationValue::Short(v) => Some(i64::from(*v)),
            AnnotationValue::Int(v) => Some(i64::from(*v)),
            AnnotationValue::Long(v) => Some(*v),
            AnnotationValue::Char(c) => Some(i64::from(u32::from(*c))),
            _ => None,
        }
    }
}

/// A symbol usable as a value.
#[derive(Debug, Clone)]
pub enum ValueDeclaration {
    Field(FieldRef),
    Parameter(ParamRef),
    LocalVariable(LocalVarRef),
    EnumConstant(EnumConstantRef),
}

impl ValueDeclaration {
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            ValueDeclaration::Field(d) => d.name(),
            ValueDeclaration::Parameter(d) => d.name(),
            ValueDeclaration::LocalVariable(d) => d.name(),
            ValueDeclaration::EnumConstant(d) => d.name(),
        }
    }

    pub fn ty(&self) -> Result<ResolvedType> {
        match self {
            ValueDeclaration::Field(d) => d.ty(),
            ValueDeclaration::Parameter(d) => d.ty(),
            ValueDeclaration::LocalVariable(d) => d.ty(),
            ValueDeclaration::EnumConstant(d) => d.ty(),
        }
    }

    #[must_use]
    pub fn as_field(&self) -> Option<&FieldRef> {
        match self {
            ValueDeclaration::Field(d) => Some(d),
            _ => None,
        }
    }
}

/// Any resolved declaration.
#[derive(Debug, Clone)]
pub enum Declaration {
    Field(FieldRef),
    Parameter(ParamRef),
    LocalVariable(LocalVarRef),
    Method(MethodRef),
    Type(TypeDeclRef),
    EnumConstant(EnumConstantRef),
    AnnotationMember(AnnotationMemberRef),
    AnnotationExpr(AnnotationRef),
}

impl Declaration {
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Declaration::Field(d) => d.name(),
            Declaration::Parameter(d) => d.name(),
            Declaration::LocalVariable(d) => d.name(),
            Declaration::Method(d) => d.name(),
            Declaration::Type(d) => d.name(),
            Declaration::EnumConstant(d) => d.name(),
            Declaration::AnnotationMember(d) => d.name(),
            Declaration::AnnotationExpr(d) => d.name(),
        }
    }

    /// The type owning this declaration, for members.
    #[must_use]
    pub fn declaring_type(&self) -> Option<TypeDeclRef> {
        match self {
            Declaration::Field(d) => Some(d.declaring_type()),
            Declaration::Method(d) => Some(d.declaring_type()),
            Declaration::EnumConstant(d) => Some(d.declaring_type()),
            Declaration::AnnotationMember(d) => Some(d.declaring_type()),
            Declaration::Parameter(_)
            | Declaration::LocalVariable(_)
            | Declaration::Type(_)
            | Declaration::AnnotationExpr(_) => None,
        }
    }

    pub fn annotations(&self) -> Result<Vec<AnnotationRef>> {
        match self {
            Declaration::Field(d) => d.annotations(),
            Declaration::Parameter(d) => d.annotations(),
            Declaration::LocalVariable(d) => d.annotations(),
            Declaration::Method(d) => d.annotations(),
            Declaration::Type(d) => d.annotations(),
            Declaration::EnumConstant(d) => d.annotations(),
            Declaration::AnnotationMember(d) => d.annotations(),
            Declaration::AnnotationExpr(_) => Ok(Vec::new()),
        }
    }

    pub fn has_annotation(&self, name: &str) -> Result<bool> {
        Ok(find_annotation(self.annotations()?, name).is_some())
    }

    #[must_use]
    pub fn is_field(&self) -> bool {
        matches!(self, Declaration::Field(_))
    }

    #[must_use]
    pub fn is_method(&self) -> bool {
        matches!(self, Declaration::Method(_))
    }

    #[must_use]
    pub fn is_type(&self) -> bool {
        matches!(self, Declaration::Type(_))
    }
}

impl From<ValueDeclaration> for Declaration {
    fn from(value: ValueDeclaration) -> Self {
        match value {
            ValueDeclaration::Field(d) => Declaration::Field(d),
            ValueDeclaration::Parameter(d) => Declaration::Parameter(d),
            ValueDeclaration::LocalVariable(d) => Declaration::LocalVariable(d),
            ValueDeclaration::EnumConstant(d) => Declaration::EnumConstant(d),
        }
    }
}
