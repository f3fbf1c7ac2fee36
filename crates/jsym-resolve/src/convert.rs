//! Source type references to resolved types.

use jsym_syntax::{PrimitiveKind, TypeRef, TypeRefKind, WildcardBound};
use jsym_types::{Error, PrimitiveType, ResolvedType, Result, TypeDeclRef};

use crate::context::Context;

pub(crate) fn primitive(kind: PrimitiveKind) -> PrimitiveType {
    match kind {
        PrimitiveKind::Boolean => PrimitiveType::Boolean,
        PrimitiveKind::Byte => PrimitiveType::Byte,
        PrimitiveKind::Char => PrimitiveType::Char,
        PrimitiveKind::Short => PrimitiveType::Short,
        PrimitiveKind::Int => PrimitiveType::Int,
        PrimitiveKind::Long => PrimitiveType::Long,
        PrimitiveKind::Float => PrimitiveType::Float,
        PrimitiveKind::Double => PrimitiveType::Double,
    }
}

/// Resolve `ty` as written in the scope of `ctx`. Class names that do not
/// resolve are an [`Error::UnsolvedSymbol`].
pub(crate) fn resolve_type_ref(ctx: &Context, ty: &TypeRef) -> Result<ResolvedType> {
    match &ty.kind {
        TypeRefKind::Primitive(kind) => Ok(ResolvedType::primitive(primitive(*kind))),
        TypeRefKind::Array(component) => {
            Ok(ResolvedType::array(resolve_type_ref(ctx, component)?))
        }
        TypeRefKind::Wildcard(None) => Ok(ResolvedType::unbounded()),
        TypeRefKind::Wildcard(Some((bound, inner))) => {
            let inner = resolve_type_ref(ctx, inner)?;
            Ok(match bound {
                WildcardBound::Extends => ResolvedType::extends_bound(inner),
                WildcardBound::Super => ResolvedType::super_bound(inner),
            })
        }
        TypeRefKind::Class(segments) => {
            if let [segment] = segments.as_slice() {
                if segment.args.is_empty() {
                    if segment.name == "void" {
                        return Ok(ResolvedType::void());
                    }
                    if let Some(variable) = ctx.solve_generic_type(&segment.name)? {
                        return Ok(variable);
                    }
                }
            }
            let decl = resolve_class_name(ctx, ty)?;
            let args = ty
                .type_args()
                .iter()
                .map(|arg| resolve_type_ref(ctx, arg))
                .collect::<Result<Vec<_>>>()?;
            Ok(ResolvedType::reference(decl, args))
        }
    }
}

/// The declaration named by a class type reference; absence is an error.
pub(crate) fn resolve_class_name(ctx: &Context, ty: &TypeRef) -> Result<TypeDeclRef> {
    let Some(name) = ty.class_name() else {
        return Err(Error::InvalidInput(format!(
            "`{}` is not a class type",
            ctx.tree().text()[ty.range].trim()
        )));
    };
    ctx.solve_type(&name)?
        .into_declaration()
        .ok_or_else(|| Error::unsolved(name, ctx.describe()))
}

/// `var` in a local variable declaration.
pub(crate) fn is_var(ty: &TypeRef) -> bool {
    matches!(&ty.kind, TypeRefKind::Class(segments)
        if segments.len() == 1 && segments[0].name == "var" && segments[0].args.is_empty())
}
