//! The resolved-type algebra: primitives, references, type variables,
//! wildcards, arrays, `void` and the null type.

use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::declarations::{TypeDeclRef, TypeParamRef, TypeParameterDeclaration};
use crate::error::{Error, Result};
use crate::symbol::SymbolReference;

pub const JAVA_LANG_OBJECT: &str = "java.lang.Object";

static UNBOUNDED: Lazy<ResolvedType> =
    Lazy::new(|| ResolvedType::new(TypeKind::Wildcard(Wildcard { bound: None })));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 8] = [
        PrimitiveType::Boolean,
        PrimitiveType::Byte,
        PrimitiveType::Char,
        PrimitiveType::Short,
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Float,
        PrimitiveType::Double,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Char => "char",
            PrimitiveType::Short => "short",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    #[must_use]
    pub fn box_type_name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "java.lang.Boolean",
            PrimitiveType::Byte => "java.lang.Byte",
            PrimitiveType::Char => "java.lang.Character",
            PrimitiveType::Short => "java.lang.Short",
            PrimitiveType::Int => "java.lang.Integer",
            PrimitiveType::Long => "java.lang.Long",
            PrimitiveType::Float => "java.lang.Float",
            PrimitiveType::Double => "java.lang.Double",
        }
    }

    #[must_use]
    pub fn from_box_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.box_type_name() == name)
    }

    #[must_use]
    pub fn is_numeric(self) -> bool {
        !matches!(self, PrimitiveType::Boolean)
    }

    /// Identity or widening primitive conversion from `other` to `self`.
    #[must_use]
    pub fn is_assignable_by(self, other: PrimitiveType) -> bool {
        use PrimitiveType::*;
        if self == other {
            return true;
        }
        match other {
            Byte => matches!(self, Short | Int | Long | Float | Double),
            Short | Char => matches!(self, Int | Long | Float | Double),
            Int => matches!(self, Long | Float | Double),
            Long => matches!(self, Float | Double),
            Float => self == Double,
            Double | Boolean => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundKind {
    Extends,
    Super,
}

/// `?`, `? extends T` or `? super T`.
#[derive(Debug, Clone, PartialEq)]
pub struct Wildcard {
    pub bound: Option<(BoundKind, ResolvedType)>,
}

impl Wildcard {
    #[must_use]
    pub fn is_bounded(&self) -> bool {
        self.bound.is_some()
    }

    #[must_use]
    pub fn is_extends(&self) -> bool {
        matches!(self.bound, Some((BoundKind::Extends, _)))
    }

    #[must_use]
    pub fn is_super(&self) -> bool {
        matches!(self.bound, Some((BoundKind::Super, _)))
    }

    #[must_use]
    pub fn bound_type(&self) -> Option<&ResolvedType> {
        self.bound.as_ref().map(|(_, ty)| ty)
    }
}

/// A class, interface, enum or annotation type with its type arguments.
/// No type arguments on a generic declaration means the raw type.
#[derive(Clone)]
pub struct ReferenceType {
    decl: TypeDeclRef,
    type_args: Vec<ResolvedType>,
}

impl ReferenceType {
    #[must_use]
    pub fn declaration(&self) -> &TypeDeclRef {
        &self.decl
    }

    #[must_use]
    pub fn qualified_name(&self) -> String {
        self.decl.qualified_name()
    }

    #[must_use]
    pub fn type_args(&self) -> &[ResolvedType] {
        &self.type_args
    }

    /// A generic declaration used without type arguments.
    pub fn is_raw(&self) -> Result<bool> {
        Ok(self.type_args.is_empty() && !self.decl.type_parameters()?.is_empty())
    }

    /// Type parameters of the declaration paired with this type's arguments.
    /// Empty for raw and non-generic types.
    pub fn type_parameters_map(&self) -> Result<Vec<(TypeParamRef, ResolvedType)>> {
        if self.type_args.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .decl
            .type_parameters()?
            .into_iter()
            .zip(self.type_args.iter().cloned())
            .collect())
    }

    pub fn type_param_value(&self, name: &str) -> Result<Option<ResolvedType>> {
        Ok(self
            .type_parameters_map()?
            .into_iter()
            .find(|(tp, _)| tp.name() == name)
            .map(|(_, ty)| ty))
    }

    fn bindings(&self) -> Result<Vec<(String, ResolvedType)>> {
        Ok(self
            .type_parameters_map()?
            .into_iter()
            .map(|(tp, ty)| (tp.name(), ty))
            .collect())
    }

    /// Replace the declaration's type variables in `ty` with this type's
    /// arguments.
    pub fn use_this_type_parameters_on(&self, ty: &ResolvedType) -> Result<ResolvedType> {
        Ok(ty.substitute(&self.bindings()?))
    }

    /// Direct supertypes with this type's arguments substituted in. A raw
    /// type has raw supertypes.
    pub fn direct_ancestors(&self) -> Result<Vec<ResolvedType>> {
        let declared = self.decl.ancestors()?;
        if self.is_raw()? {
            return Ok(declared.iter().map(ResolvedType::erase_arguments).collect());
        }
        let bindings = self.bindings()?;
        Ok(declared.iter().map(|ty| ty.substitute(&bindings)).collect())
    }

    /// Every supertype, nearest first, each substituted along the path that
    /// reached it.
    pub fn all_ancestors(&self) -> Result<Vec<ResolvedType>> {
        collect_ancestors(self.direct_ancestors()?)
    }
}

/// Breadth-first closure over supertypes, keeping the first parameterization
/// seen for each declaration.
pub(crate) fn collect_ancestors(initial: Vec<ResolvedType>) -> Result<Vec<ResolvedType>> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    let mut queue: VecDeque<ResolvedType> = initial.into();
    while let Some(ty) = queue.pop_front() {
        let TypeKind::Reference(reference) = ty.kind() else {
            continue;
        };
        if !seen.insert(reference.qualified_name()) {
            continue;
        }
        let direct = reference.direct_ancestors().inspect_err(|err| {
            tracing::debug!(
                target = "jsym.resolve",
                ty = %reference.qualified_name(),
                error = %err,
                "resolving supertypes failed"
            );
        })?;
        queue.extend(direct);
        out.push(ty);
    }
    Ok(out)
}

pub enum TypeKind {
    Primitive(PrimitiveType),
    Reference(ReferenceType),
    TypeVariable(TypeParamRef),
    Wildcard(Wildcard),
    Array(ResolvedType),
    Void,
    Null,
}

/// An immutable, cheaply cloned type value.
///
/// Clones share one allocation; [`ResolvedType::ptr_eq`] tells whether two
/// values are the same instance, which substitution preserves whenever it
/// changes nothing.
#[derive(Clone)]
pub struct ResolvedType(Arc<TypeKind>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conversion {
    /// Identity and widening only.
    Strict,
    /// Also boxing and unboxing.
    Loose,
}

impl ResolvedType {
    fn new(kind: TypeKind) -> Self {
        Self(Arc::new(kind))
    }

    #[must_use]
    pub fn primitive(primitive: PrimitiveType) -> Self {
        Self::new(TypeKind::Primitive(primitive))
    }

    #[must_use]
    pub fn reference(decl: TypeDeclRef, type_args: Vec<ResolvedType>) -> Self {
        Self::new(TypeKind::Reference(ReferenceType { decl, type_args }))
    }

    /// The declaration applied to its own type variables (`List<E>` for `List`).
    pub fn declared(decl: TypeDeclRef) -> Result<Self> {
        let args = decl
            .type_parameters()?
            .into_iter()
            .map(ResolvedType::type_variable)
            .collect();
        Ok(Self::reference(decl, args))
    }

    #[must_use]
    pub fn type_variable(param: TypeParamRef) -> Self {
        Self::new(TypeKind::TypeVariable(param))
    }

    /// The shared `?` instance.
    #[must_use]
    pub fn unbounded() -> Self {
        UNBOUNDED.clone()
    }

    #[must_use]
    pub fn extends_bound(bound: ResolvedType) -> Self {
        Self::wildcard(BoundKind::Extends, bound)
    }

    #[must_use]
    pub fn super_bound(bound: ResolvedType) -> Self {
        Self::wildcard(BoundKind::Super, bound)
    }

    #[must_use]
    pub fn wildcard(kind: BoundKind, bound: ResolvedType) -> Self {
        Self::new(TypeKind::Wildcard(Wildcard {
            bound: Some((kind, bound)),
        }))
    }

    #[must_use]
    pub fn array(component: ResolvedType) -> Self {
        Self::new(TypeKind::Array(component))
    }

    #[must_use]
    pub fn void() -> Self {
        Self::new(TypeKind::Void)
    }

    #[must_use]
    pub fn null() -> Self {
        Self::new(TypeKind::Null)
    }

    #[must_use]
    pub fn kind(&self) -> &TypeKind {
        &self.0
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &ResolvedType) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(self.kind(), TypeKind::Primitive(_))
    }

    /// References, arrays and type variables.
    #[must_use]
    pub fn is_reference_type(&self) -> bool {
        matches!(
            self.kind(),
            TypeKind::Reference(_) | TypeKind::Array(_) | TypeKind::TypeVariable(_)
        )
    }

    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self.kind(), TypeKind::Array(_))
    }

    #[must_use]
    pub fn is_type_variable(&self) -> bool {
        matches!(self.kind(), TypeKind::TypeVariable(_))
    }

    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        matches!(self.kind(), TypeKind::Wildcard(_))
    }

    #[must_use]
    pub fn is_void(&self) -> bool {
        matches!(self.kind(), TypeKind::Void)
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self.kind(), TypeKind::Null)
    }

    #[must_use]
    pub fn is_java_lang_object(&self) -> bool {
        matches!(self.kind(), TypeKind::Reference(r) if r.qualified_name() == JAVA_LANG_OBJECT)
    }

    fn mismatch(&self, expected: &'static str) -> Error {
        Error::TypeMismatch {
            expected,
            found: self.describe(),
        }
    }

    pub fn as_primitive(&self) -> Result<PrimitiveType> {
        match self.kind() {
            TypeKind::Primitive(p) => Ok(*p),
            _ => Err(self.mismatch("primitive type")),
        }
    }

    pub fn as_reference(&self) -> Result<&ReferenceType> {
        match self.kind() {
            TypeKind::Reference(r) => Ok(r),
            _ => Err(self.mismatch("reference type")),
        }
    }

    pub fn as_type_variable(&self) -> Result<&TypeParamRef> {
        match self.kind() {
            TypeKind::TypeVariable(tp) => Ok(tp),
            _ => Err(self.mismatch("type variable")),
        }
    }

    pub fn as_wildcard(&self) -> Result<&Wildcard> {
        match self.kind() {
            TypeKind::Wildcard(w) => Ok(w),
            _ => Err(self.mismatch("wildcard")),
        }
    }

    /// Component type of an array.
    pub fn as_array(&self) -> Result<&ResolvedType> {
        match self.kind() {
            TypeKind::Array(component) => Ok(component),
            _ => Err(self.mismatch("array type")),
        }
    }

    /// Canonical source-like rendering: `java.util.List<? extends T>`, `int[]`.
    #[must_use]
    pub fn describe(&self) -> String {
        match self.kind() {
            TypeKind::Primitive(p) => p.name().to_string(),
            TypeKind::Reference(r) => {
                let mut out = r.qualified_name();
                if !r.type_args.is_empty() {
                    let args: Vec<_> = r.type_args.iter().map(ResolvedType::describe).collect();
                    out.push('<');
                    out.push_str(&args.join(", "));
                    out.push('>');
                }
                out
            }
            TypeKind::TypeVariable(tp) => tp.name(),
            TypeKind::Wildcard(w) => match &w.bound {
                None => "?".to_string(),
                Some((BoundKind::Extends, bound)) => format!("? extends {}", bound.describe()),
                Some((BoundKind::Super, bound)) => format!("? super {}", bound.describe()),
            },
            TypeKind::Array(component) => format!("{}[]", component.describe()),
            TypeKind::Void => "void".to_string(),
            TypeKind::Null => "null".to_string(),
        }
    }

    /// Number of array dimensions.
    #[must_use]
    pub fn array_level(&self) -> usize {
        match self.kind() {
            TypeKind::Array(component) => 1 + component.array_level(),
            _ => 0,
        }
    }

    /// The same reference type without type arguments; other types unchanged.
    #[must_use]
    pub fn erase_arguments(&self) -> ResolvedType {
        match self.kind() {
            TypeKind::Reference(r) if !r.type_args.is_empty() => {
                ResolvedType::reference(r.decl.clone(), Vec::new())
            }
            _ => self.clone(),
        }
    }

    /// Replace every occurrence of the type variable named like `param`.
    /// Returns this very instance when nothing inside refers to it.
    #[must_use]
    pub fn replace_type_variables(
        &self,
        param: &dyn TypeParameterDeclaration,
        replacement: &ResolvedType,
    ) -> ResolvedType {
        let name = param.name();
        self.substitute_with(&|candidate| (candidate.name() == name).then(|| replacement.clone()))
    }

    /// Simultaneous substitution of type variables by name.
    #[must_use]
    pub fn substitute(&self, bindings: &[(String, ResolvedType)]) -> ResolvedType {
        if bindings.is_empty() {
            return self.clone();
        }
        self.substitute_with(&|candidate| {
            let name = candidate.name();
            bindings
                .iter()
                .find(|(bound, _)| *bound == name)
                .map(|(_, ty)| ty.clone())
        })
    }

    fn substitute_with(
        &self,
        lookup: &dyn Fn(&dyn TypeParameterDeclaration) -> Option<ResolvedType>,
    ) -> ResolvedType {
        match self.kind() {
            TypeKind::TypeVariable(tp) => lookup(tp.as_ref()).unwrap_or_else(|| self.clone()),
            TypeKind::Reference(r) => {
                let args: Vec<_> = r.type_args.iter().map(|a| a.substitute_with(lookup)).collect();
                if args.iter().zip(&r.type_args).all(|(new, old)| new.ptr_eq(old)) {
                    self.clone()
                } else {
                    ResolvedType::reference(r.decl.clone(), args)
                }
            }
            TypeKind::Wildcard(Wildcard {
                bound: Some((kind, bound)),
            }) => {
                let replaced = bound.substitute_with(lookup);
                if replaced.ptr_eq(bound) {
                    self.clone()
                } else {
                    ResolvedType::wildcard(*kind, replaced)
                }
            }
            TypeKind::Array(component) => {
                let replaced = component.substitute_with(lookup);
                if replaced.ptr_eq(component) {
                    self.clone()
                } else {
                    ResolvedType::array(replaced)
                }
            }
            _ => self.clone(),
        }
    }

    /// Whether any type variable named `name` occurs inside this type.
    #[must_use]
    pub fn mentions_type_variable(&self, name: &str) -> bool {
        match self.kind() {
            TypeKind::TypeVariable(tp) => tp.name() == name,
            TypeKind::Reference(r) => r.type_args.iter().any(|a| a.mentions_type_variable(name)),
            TypeKind::Wildcard(w) => w
                .bound_type()
                .is_some_and(|b| b.mentions_type_variable(name)),
            TypeKind::Array(component) => component.mentions_type_variable(name),
            _ => false,
        }
    }

    /// Whether a value of type `other` can be assigned to this type,
    /// allowing boxing and unboxing.
    pub fn is_assignable_by(&self, other: &ResolvedType) -> Result<bool> {
        self.assignable(other, Conversion::Loose)
    }

    /// Like [`ResolvedType::is_assignable_by`] without boxing or unboxing.
    pub fn is_strictly_assignable_by(&self, other: &ResolvedType) -> Result<bool> {
        self.assignable(other, Conversion::Strict)
    }

    fn assignable(&self, other: &ResolvedType, conversion: Conversion) -> Result<bool> {
        match (self.kind(), other.kind()) {
            (TypeKind::Void | TypeKind::Null, _) => Ok(false),
            (TypeKind::Primitive(p), TypeKind::Primitive(q)) => Ok(p.is_assignable_by(*q)),
            (TypeKind::Primitive(p), TypeKind::Reference(r)) => Ok(conversion == Conversion::Loose
                && PrimitiveType::from_box_type_name(&r.qualified_name())
                    .is_some_and(|unboxed| p.is_assignable_by(unboxed))),
            (TypeKind::Primitive(_), _) => Ok(false),
            // As a target, a wildcard only accepts what its lower bound does.
            (TypeKind::Wildcard(w), _) => match &w.bound {
                Some((BoundKind::Super, lower)) => {
                    Ok(lower.assignable(other, conversion)? || other.assignable(lower, conversion)?)
                }
                _ => Ok(false),
            },
            (TypeKind::TypeVariable(tp), TypeKind::TypeVariable(other_tp)) => {
                Ok(tp.name() == other_tp.name())
            }
            (TypeKind::TypeVariable(_), TypeKind::Void) => Ok(false),
            (TypeKind::TypeVariable(_), _) => Ok(true),
            (TypeKind::Array(_), TypeKind::Null) => Ok(true),
            (TypeKind::Array(component), TypeKind::Array(other_component)) => {
                if component.is_primitive() || other_component.is_primitive() {
                    Ok(component == other_component)
                } else {
                    component.assignable(other_component, Conversion::Strict)
                }
            }
            (TypeKind::Array(_), TypeKind::Wildcard(w)) => match &w.bound {
                Some((BoundKind::Extends, upper)) => self.assignable(upper, conversion),
                _ => Ok(false),
            },
            (TypeKind::Array(_), _) => Ok(false),
            (TypeKind::Reference(target), _) => self.reference_assignable(target, other, conversion),
        }
    }

    fn reference_assignable(
        &self,
        target: &ReferenceType,
        other: &ResolvedType,
        conversion: Conversion,
    ) -> Result<bool> {
        let target_name = target.qualified_name();
        let is_object = target_name == JAVA_LANG_OBJECT;
        match other.kind() {
            TypeKind::Null => Ok(true),
            TypeKind::Void => Ok(false),
            TypeKind::Primitive(p) => {
                if conversion == Conversion::Strict {
                    return Ok(false);
                }
                let boxed_name = p.box_type_name();
                if target_name == boxed_name || is_object {
                    return Ok(true);
                }
                match target.decl.type_solver().try_to_solve_type(boxed_name)? {
                    SymbolReference::Solved(boxed) => self.assignable(
                        &ResolvedType::reference(boxed, Vec::new()),
                        Conversion::Strict,
                    ),
                    SymbolReference::Unsolved => Ok(false),
                }
            }
            TypeKind::Wildcard(w) => match &w.bound {
                None => Ok(true),
                Some((BoundKind::Extends, upper)) => self.assignable(upper, conversion),
                Some((BoundKind::Super, _)) => Ok(is_object),
            },
            TypeKind::TypeVariable(tp) => {
                if is_object {
                    return Ok(true);
                }
                for bound in tp.bounds()? {
                    if self.assignable(&bound, conversion)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            TypeKind::Array(_) => Ok(is_object
                || target_name == "java.lang.Cloneable"
                || target_name == "java.io.Serializable"),
            TypeKind::Reference(value) => {
                if is_object {
                    return Ok(true);
                }
                if value.qualified_name() == target_name {
                    return type_args_contained(target, value);
                }
                for ancestor in value.all_ancestors()? {
                    if let TypeKind::Reference(candidate) = ancestor.kind() {
                        if candidate.qualified_name() == target_name
                            && type_args_contained(target, candidate)?
                        {
                            return Ok(true);
                        }
                    }
                }
                Ok(false)
            }
        }
    }
}

/// Type arguments of `value` fit those of `target` (same declaration).
/// Raw on either side always fits.
fn type_args_contained(target: &ReferenceType, value: &ReferenceType) -> Result<bool> {
    if target.type_args.is_empty() || value.type_args.is_empty() {
        return Ok(true);
    }
    if target.type_args.len() != value.type_args.len() {
        return Ok(false);
    }
    for (t, v) in target.type_args.iter().zip(&value.type_args) {
        if !type_arg_contains(t, v)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Containment of one type argument: invariant unless `target` is a wildcard.
fn type_arg_contains(target: &ResolvedType, value: &ResolvedType) -> Result<bool> {
    if target == value {
        return Ok(true);
    }
    match target.kind() {
        TypeKind::Wildcard(w) => match &w.bound {
            None => Ok(true),
            Some((BoundKind::Extends, upper)) => match value.kind() {
                TypeKind::Wildcard(Wildcard {
                    bound: Some((BoundKind::Extends, value_upper)),
                }) => upper.is_strictly_assignable_by(value_upper),
                TypeKind::Wildcard(_) => Ok(upper.is_java_lang_object()),
                _ => upper.is_strictly_assignable_by(value),
            },
            Some((BoundKind::Super, lower)) => match value.kind() {
                TypeKind::Wildcard(Wildcard {
                    bound: Some((BoundKind::Super, value_lower)),
                }) => value_lower.is_strictly_assignable_by(lower),
                TypeKind::Wildcard(_) => Ok(false),
                _ => value.is_strictly_assignable_by(lower),
            },
        },
        TypeKind::TypeVariable(_) => target.is_strictly_assignable_by(value),
        _ => Ok(false),
    }
}

impl PartialEq for ResolvedType {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        match (self.kind(), other.kind()) {
            (TypeKind::Primitive(a), TypeKind::Primitive(b)) => a == b,
            (TypeKind::Reference(a), TypeKind::Reference(b)) => {
                a.qualified_name() == b.qualified_name() && a.type_args == b.type_args
            }
            (TypeKind::TypeVariable(a), TypeKind::TypeVariable(b)) => {
                a.qualified_name() == b.qualified_name()
            }
            (TypeKind::Wildcard(a), TypeKind::Wildcard(b)) => a == b,
            (TypeKind::Array(a), TypeKind::Array(b)) => a == b,
            (TypeKind::Void, TypeKind::Void) | (TypeKind::Null, TypeKind::Null) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl fmt::Debug for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResolvedType({})", self.describe())
    }
}

impl fmt::Debug for ReferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReferenceType")
            .field("name", &self.qualified_name())
            .field("type_args", &self.type_args)
            .finish()
    }
}

impl fmt::Debug for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Primitive(p) => write!(f, "Primitive({p:?})"),
            TypeKind::Reference(r) => fmt::Debug::fmt(r, f),
            TypeKind::TypeVariable(tp) => write!(f, "TypeVariable({})", tp.qualified_name()),
            TypeKind::Wildcard(w) => fmt::Debug::fmt(w, f),
            TypeKind::Array(component) => write!(f, "Array({component:?})"),
            TypeKind::Void => f.write_str("Void"),
            TypeKind::Null => f.write_str("Null"),
        }
    }
}
