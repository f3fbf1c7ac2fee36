//! Overload resolution.
//!
//! Candidates are checked in three phases, the first with any applicable
//! candidate deciding the call:
//!
//! 1. strict: same arity, no boxing or unboxing,
//! 2. loose: same arity, boxing and unboxing allowed,
//! 3. varargs: the trailing array parameter expands to the remaining
//!    arguments.
//!
//! Method type parameters are inferred from the arguments before the check.
//! Among the applicable candidates the most specific one wins.

use jsym_types::{
    Error, MethodRef, ResolvedType, Result, SymbolReference, TypeDeclRef, TypeKind,
    JAVA_LANG_OBJECT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Strict,
    Loose,
    Varargs,
}

/// An applicable candidate with its declared parameter types, expanded to
/// one per argument.
struct Applicable {
    method: MethodRef,
    formals: Vec<ResolvedType>,
}

/// Pick the method a call `name(args)` invokes among `candidates`.
///
/// Candidates with another name are ignored. Ambiguity between candidates
/// with different signatures is an [`Error::MethodAmbiguity`].
pub fn find_most_applicable(
    candidates: Vec<MethodRef>,
    name: &str,
    args: &[ResolvedType],
) -> Result<SymbolReference<MethodRef>> {
    let candidates: Vec<MethodRef> = candidates.into_iter().filter(|m| m.name() == name).collect();
    if candidates.is_empty() {
        return Ok(SymbolReference::unsolved());
    }
    for phase in [Phase::Strict, Phase::Loose, Phase::Varargs] {
        let mut applicable = Vec::new();
        for method in &candidates {
            if let Some(formals) = applicable_formals(method, args, phase)? {
                applicable.push(Applicable {
                    method: method.clone(),
                    formals,
                });
            }
        }
        if !applicable.is_empty() {
            tracing::trace!(
                target = "jsym.resolve",
                name,
                ?phase,
                count = applicable.len(),
                "applicable candidates"
            );
            return most_specific(applicable, name).map(SymbolReference::solved);
        }
    }
    Ok(SymbolReference::unsolved())
}

/// Resolve `name(args)` against the methods `decl` declares or inherits.
/// Interfaces also see the methods of `java.lang.Object`.
pub fn solve_method_in_type(
    decl: &TypeDeclRef,
    name: &str,
    args: &[ResolvedType],
) -> Result<SymbolReference<MethodRef>> {
    let mut candidates: Vec<MethodRef> = decl
        .all_methods()?
        .into_iter()
        .filter(|m| m.name() == name)
        .collect();
    if decl.is_interface() {
        if let Some(object) = decl.type_solver().try_to_solve_type(JAVA_LANG_OBJECT)?.into_declaration() {
            let signatures = candidates
                .iter()
                .map(|m| m.signature())
                .collect::<Result<Vec<_>>>()?;
            for method in object.declared_methods()? {
                if method.name() == name && !signatures.contains(&method.signature()?) {
                    candidates.push(method);
                }
            }
        }
    }
    find_most_applicable(candidates, name, args)
}

/// Declared parameter types of `method` matched against `args` in `phase`,
/// or `None` when the method is not applicable.
fn applicable_formals(
    method: &MethodRef,
    args: &[ResolvedType],
    phase: Phase,
) -> Result<Option<Vec<ResolvedType>>> {
    let mut formals = method
        .params()?
        .iter()
        .map(|p| p.ty())
        .collect::<Result<Vec<_>>>()?;
    match phase {
        Phase::Strict | Phase::Loose => {
            if formals.len() != args.len() {
                return Ok(None);
            }
        }
        Phase::Varargs => {
            if !method.has_varargs()? {
                return Ok(None);
            }
            let Some(last) = formals.pop() else {
                return Ok(None);
            };
            if args.len() < formals.len() {
                return Ok(None);
            }
            let component = last.as_array()?.clone();
            formals.resize(args.len(), component);
        }
    }

    // Candidates are compared on the instantiated formals.
    let bindings = infer_bindings(method, &formals, args)?;
    let formals: Vec<ResolvedType> = formals.iter().map(|f| f.substitute(&bindings)).collect();
    for (formal, arg) in formals.iter().zip(args) {
        let fits = match phase {
            Phase::Strict => formal.is_strictly_assignable_by(arg)?,
            Phase::Loose | Phase::Varargs => formal.is_assignable_by(arg)?,
        };
        if !fits {
            return Ok(None);
        }
    }
    Ok(Some(formals))
}

/// Bindings for the method's own type parameters read off the argument
/// types, first occurrence wins. Primitive arguments bind their box type.
pub(crate) fn infer_method_bindings(
    method: &MethodRef,
    args: &[ResolvedType],
) -> Result<Vec<(String, ResolvedType)>> {
    let mut formals = method
        .params()?
        .iter()
        .map(|p| p.ty())
        .collect::<Result<Vec<_>>>()?;
    if method.has_varargs()? && args.len() != formals.len() {
        if let Some(last) = formals.pop() {
            formals.resize(args.len().max(formals.len()), last.as_array()?.clone());
        }
    }
    infer_bindings(method, &formals, args)
}

fn infer_bindings(
    method: &MethodRef,
    formals: &[ResolvedType],
    args: &[ResolvedType],
) -> Result<Vec<(String, ResolvedType)>> {
    let names: Vec<String> = method
        .type_parameters()?
        .iter()
        .map(|tp| tp.name())
        .collect();
    let mut bindings = Vec::new();
    if names.is_empty() {
        return Ok(bindings);
    }
    let solver = method.declaring_type().type_solver();
    let boxed = |ty: &ResolvedType| -> Result<Option<ResolvedType>> {
        match ty.kind() {
            TypeKind::Primitive(p) => Ok(solver
                .try_to_solve_type(p.box_type_name())?
                .into_declaration()
                .map(|decl| ResolvedType::reference(decl, Vec::new()))),
            TypeKind::Null | TypeKind::Void => Ok(None),
            _ => Ok(Some(ty.clone())),
        }
    };
    for (formal, arg) in formals.iter().zip(args) {
        unify(formal, arg, &names, &mut bindings, &boxed)?;
    }
    Ok(bindings)
}

fn unify(
    formal: &ResolvedType,
    actual: &ResolvedType,
    names: &[String],
    bindings: &mut Vec<(String, ResolvedType)>,
    boxed: &dyn Fn(&ResolvedType) -> Result<Option<ResolvedType>>,
) -> Result<()> {
    match formal.kind() {
        TypeKind::TypeVariable(tp) => {
            let name = tp.name();
            if names.contains(&name) && !bindings.iter().any(|(bound, _)| *bound == name) {
                if let Some(actual) = boxed(actual)? {
                    bindings.push((name, actual));
                }
            }
        }
        TypeKind::Array(component) => {
            if let TypeKind::Array(actual_component) = actual.kind() {
                unify(component, actual_component, names, bindings, boxed)?;
            }
        }
        TypeKind::Wildcard(w) => {
            if let Some(bound) = w.bound_type() {
                let actual = match actual.kind() {
                    TypeKind::Wildcard(actual_w) => match actual_w.bound_type() {
                        Some(actual_bound) => actual_bound.clone(),
                        None => return Ok(()),
                    },
                    _ => actual.clone(),
                };
                unify(bound, &actual, names, bindings, boxed)?;
            }
        }
        TypeKind::Reference(reference) if !reference.type_args().is_empty() => {
            let Some(view) = supertype_view(actual, &reference.qualified_name())? else {
                return Ok(());
            };
            let view = view.as_reference()?;
            for (formal_arg, actual_arg) in reference.type_args().iter().zip(view.type_args()) {
                unify(formal_arg, actual_arg, names, bindings, boxed)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// `ty` seen as its supertype named `qualified_name`, with type arguments
/// substituted along the way.
pub(crate) fn supertype_view(ty: &ResolvedType, qualified_name: &str) -> Result<Option<ResolvedType>> {
    let TypeKind::Reference(reference) = ty.kind() else {
        return Ok(None);
    };
    if reference.qualified_name() == qualified_name {
        return Ok(Some(ty.clone()));
    }
    Ok(reference.all_ancestors()?.into_iter().find(|ancestor| {
        ancestor
            .as_reference()
            .is_ok_and(|r| r.qualified_name() == qualified_name)
    }))
}

fn most_specific(mut applicable: Vec<Applicable>, name: &str) -> Result<MethodRef> {
    if applicable.len() == 1 {
        return Ok(applicable.remove(0).method);
    }

    let mut maximal = Vec::new();
    for (i, candidate) in applicable.iter().enumerate() {
        let mut dominated = false;
        for (j, other) in applicable.iter().enumerate() {
            if i != j
                && more_specific(&other.formals, &candidate.formals)?
                && !more_specific(&candidate.formals, &other.formals)?
            {
                dominated = true;
                break;
            }
        }
        if !dominated {
            maximal.push(i);
        }
    }
    if let [only] = maximal.as_slice() {
        return Ok(applicable.swap_remove(*only).method);
    }

    let signatures = maximal
        .iter()
        .map(|&i| applicable[i].method.signature())
        .collect::<Result<Vec<_>>>()?;
    if signatures.windows(2).all(|pair| pair[0] == pair[1]) {
        // Overrides seen through several supertypes: prefer a body.
        let pick = maximal
            .iter()
            .copied()
            .find(|&i| !applicable[i].method.is_abstract())
            .unwrap_or(maximal[0]);
        return Ok(applicable.swap_remove(pick).method);
    }

    Err(Error::MethodAmbiguity {
        name: name.to_string(),
        candidates: maximal
            .iter()
            .map(|&i| applicable[i].method.qualified_signature())
            .collect::<Result<Vec<_>>>()?,
    })
}

/// Whether every parameter in `a` is a subtype of its counterpart in `b`.
fn more_specific(a: &[ResolvedType], b: &[ResolvedType]) -> Result<bool> {
    for (a, b) in a.iter().zip(b) {
        if !b.is_strictly_assignable_by(a)? {
            return Ok(false);
        }
    }
    Ok(true)
}
