//! Static types of expressions and the methods calls resolve to.

use std::sync::Arc;

use jsym_syntax::{BinaryOp, Expr, Literal, NodeId, SyntaxTree, TypeRef, UnaryOp};
use jsym_types::{
    Error, MethodRef, PrimitiveType, ResolvedType, Result,
    SymbolReference, TypeDeclRef, TypeKind, TypeSolver, JAVA_LANG_OBJECT,
};

use crate::context::Context;
use crate::convert::resolve_type_ref;
use crate::method_resolution::{
    find_most_applicable, infer_method_bindings, solve_method_in_type, supertype_view,
};
use crate::source::SourceTypeDeclaration;

const JAVA_LANG_STRING: &str = "java.lang.String";

/// Static type of the expression at `node`.
pub(crate) fn type_of(
    tree: &Arc<SyntaxTree>,
    node: NodeId,
    solver: &TypeSolver,
) -> Result<ResolvedType> {
    Typer { tree, solver }.type_of(node)
}

/// The method a call expression invokes.
pub(crate) fn solve_call(
    tree: &Arc<SyntaxTree>,
    node: NodeId,
    solver: &TypeSolver,
) -> Result<SymbolReference<MethodRef>> {
    Typer { tree, solver }.solve_call(node)
}

/// `a.b.c` for a chain of names and field accesses.
pub(crate) fn dotted_name(tree: &SyntaxTree, node: NodeId) -> Option<String> {
    match tree.as_expr(node)? {
        Expr::Name(name) => Some(name.clone()),
        Expr::FieldAccess { target, name } => {
            Some(format!("{}.{name}", dotted_name(tree, *target)?))
        }
        _ => None,
    }
}

struct Typer<'a> {
    tree: &'a Arc<SyntaxTree>,
    solver: &'a TypeSolver,
}

impl Typer<'_> {
    fn context(&self, node: NodeId) -> Context {
        Context::new(self.tree.clone(), node, self.solver.clone())
    }

    fn named(&self, name: &str) -> Result<ResolvedType> {
        Ok(ResolvedType::reference(self.solver.solve_type(name)?, Vec::new()))
    }

    fn resolve(&self, node: NodeId, ty: &TypeRef) -> Result<ResolvedType> {
        resolve_type_ref(&self.context(node), ty)
    }

    fn expr(&self, node: NodeId) -> Result<&Expr> {
        self.tree.as_expr(node).ok_or_else(|| {
            Error::InvalidInput(format!("node {} is not an expression", node.index()))
        })
    }

    fn type_of(&self, node: NodeId) -> Result<ResolvedType> {
        let ty = match self.expr(node)? {
            Expr::Literal(literal) => self.literal(literal)?,
            Expr::Name(name) => {
                let ctx = self.context(node);
                match ctx.solve_symbol(name)?.into_declaration() {
                    Some(value) => value.ty()?,
                    None => return Err(Error::unsolved(name, ctx.describe())),
                }
            }
            Expr::FieldAccess { target, name } => self.field_access(node, *target, name)?,
            Expr::MethodCall { target, name, args } => self.call_type(node, *target, name, args)?,
            Expr::New { ty, .. } | Expr::Cast { ty, .. } => self.resolve(node, ty)?,
            Expr::NewArray { element, dims, .. } => {
                let mut ty = self.resolve(node, element)?;
                for _ in 0..*dims {
                    ty = ResolvedType::array(ty);
                }
                ty
            }
            Expr::This => ResolvedType::declared(self.enclosing_type(node)?)?,
            Expr::Super => self.superclass_type(node)?,
            Expr::ClassLiteral(ty) => self.class_literal(node, ty)?,
            Expr::Unary { op, operand } => {
                let operand = self.type_of(*operand)?;
                match op {
                    UnaryOp::Not => ResolvedType::primitive(PrimitiveType::Boolean),
                    UnaryOp::Plus | UnaryOp::Minus | UnaryOp::BitNot => {
                        ResolvedType::primitive(unary_promotion(&operand)?)
                    }
                    UnaryOp::PreIncrement
                    | UnaryOp::PreDecrement
                    | UnaryOp::PostIncrement
                    | UnaryOp::PostDecrement => operand,
                }
            }
            Expr::Binary { op, lhs, rhs } => {
                let lhs = self.type_of(*lhs)?;
                let rhs = self.type_of(*rhs)?;
                self.binary(*op, &lhs, &rhs)?
            }
            Expr::Assign { target, .. } => self.type_of(*target)?,
            Expr::Conditional { then, otherwise, .. } => {
                let then = self.type_of(*then)?;
                let otherwise = self.type_of(*otherwise)?;
                conditional(then, otherwise)?
            }
            Expr::ArrayAccess { array, .. } => self.type_of(*array)?.as_array()?.clone(),
            Expr::InstanceOf { .. } => ResolvedType::primitive(PrimitiveType::Boolean),
            Expr::ArrayInit(_) | Expr::Annotation(_) | Expr::Unsupported => {
                return Err(Error::Unsupported(format!(
                    "typing `{}`",
                    self.tree.source_of(node)
                )))
            }
        };
        Ok(ty)
    }

    fn literal(&self, literal: &Literal) -> Result<ResolvedType> {
        let primitive = match literal {
            Literal::Boolean(_) => PrimitiveType::Boolean,
            Literal::Char(_) => PrimitiveType::Char,
            Literal::Int(_) => PrimitiveType::Int,
            Literal::Long(_) => PrimitiveType::Long,
            Literal::Float(_) => PrimitiveType::Float,
            Literal::Double(_) => PrimitiveType::Double,
            Literal::String(_) | Literal::TextBlock(_) => return self.named(JAVA_LANG_STRING),
            Literal::Null => return Ok(ResolvedType::null()),
        };
        Ok(ResolvedType::primitive(primitive))
    }

    fn enclosing_type(&self, node: NodeId) -> Result<TypeDeclRef> {
        let ty = self.tree.enclosing_type(node).ok_or_else(|| {
            Error::InvalidInput(format!(
                "`{}` is not inside a type declaration",
                self.tree.source_of(node)
            ))
        })?;
        Ok(Arc::new(SourceTypeDeclaration::at(self.tree, ty, self.solver)))
    }

    /// The superclass of the enclosing type as seen from it.
    fn superclass_type(&self, node: NodeId) -> Result<ResolvedType> {
        let this = self.enclosing_type(node)?;
        let superclass = this.ancestors()?.into_iter().find(|a| {
            a.as_reference()
                .is_ok_and(|r| !r.declaration().is_interface())
        });
        match superclass {
            Some(superclass) => Ok(superclass),
            None => self.named(JAVA_LANG_OBJECT),
        }
    }

    fn class_literal(&self, node: NodeId, ty: &TypeRef) -> Result<ResolvedType> {
        let ty = self.resolve(node, ty)?;
        let arg = match ty.kind() {
            TypeKind::Primitive(p) => Some(self.named(p.box_type_name())?),
            TypeKind::Void => self
                .solver
                .try_to_solve_type("java.lang.Void")?
                .into_declaration()
                .map(|decl| ResolvedType::reference(decl, Vec::new())),
            _ => Some(ty),
        };
        let class = self.solver.solve_type("java.lang.Class")?;
        Ok(ResolvedType::reference(class, arg.into_iter().collect()))
    }

    /// The type a dotted name at `node` spells, unless its first segment is
    /// a value in scope.
    fn type_name_at(&self, node: NodeId) -> Result<Option<TypeDeclRef>> {
        let Some(name) = dotted_name(self.tree, node) else {
            return Ok(None);
        };
        let ctx = self.context(node);
        let first = name.split('.').next().unwrap_or(&name);
        if ctx.solve_symbol(first)?.is_solved() {
            return Ok(None);
        }
        Ok(ctx.solve_type(&name)?.into_declaration())
    }

    fn field_access(&self, node: NodeId, target: NodeId, name: &str) -> Result<ResolvedType> {
        if let Some(owner) = self.type_name_at(target)? {
            if let Some(field) = owner.field(name)? {
                return field.ty();
            }
            if let Some(constant) = owner.enum_constant(name)? {
                return constant.ty();
            }
            return Err(Error::unsolved(
                format!("{}.{name}", owner.qualified_name()),
                self.context(node).describe(),
            ));
        }

        let receiver = self.type_of(target)?;
        if receiver.is_array() && name == "length" {
            return Ok(ResolvedType::primitive(PrimitiveType::Int));
        }
        let owner = self.receiver_declaration(&receiver)?;
        let Some(field) = owner.field(name)? else {
            return Err(Error::unsolved(
                format!("{}.{name}", owner.qualified_name()),
                self.context(node).describe(),
            ));
        };
        let ty = field.ty()?;
        member_type_on(&receiver, &field.declaring_type(), &ty)
    }

    fn call_type(
        &self,
        node: NodeId,
        target: Option<NodeId>,
        name: &str,
        args: &[NodeId],
    ) -> Result<ResolvedType> {
        let Some(method) = self.solve_call(node)?.into_declaration() else {
            return Err(Error::unsolved(name, self.context(node).describe()));
        };
        let arg_types = self.arg_types(args)?;
        let mut ty = method.return_type()?;
        if let Some(target) = target {
            if self.type_name_at(target)?.is_none() && !self.is_super(target) {
                let receiver = self.type_of(target)?;
                ty = member_type_on(&receiver, &method.declaring_type(), &ty)?;
            }
        }
        Ok(ty.substitute(&infer_method_bindings(&method, &arg_types)?))
    }

    fn is_super(&self, node: NodeId) -> bool {
        matches!(self.tree.as_expr(node), Some(Expr::Super))
    }

    fn arg_types(&self, args: &[NodeId]) -> Result<Vec<ResolvedType>> {
        args.iter().map(|&arg| self.type_of(arg)).collect()
    }

    fn solve_call(&self, node: NodeId) -> Result<SymbolReference<MethodRef>> {
        let Expr::MethodCall { target, name, args } = self.expr(node)? else {
            return Err(Error::InvalidInput(format!(
                "`{}` is not a method call",
                self.tree.source_of(node)
            )));
        };
        let arg_types = self.arg_types(args)?;
        let Some(target) = *target else {
            return match name.as_str() {
                "this" => {
                    let this = self.enclosing_type(node)?;
                    find_most_applicable(this.constructors()?, &this.name(), &arg_types)
                }
                "super" => {
                    let superclass = self.superclass_type(node)?;
                    let decl = superclass.as_reference()?.declaration().clone();
                    find_most_applicable(decl.constructors()?, &decl.name(), &arg_types)
                }
                _ => self.context(node).solve_method(name, &arg_types),
            };
        };

        let owner = match self.expr(target)? {
            Expr::This => self.enclosing_type(target)?,
            Expr::Super => {
                let superclass = self.superclass_type(target)?;
                superclass.as_reference()?.declaration().clone()
            }
            _ => match self.type_name_at(target)? {
                Some(owner) => owner,
                None => self.receiver_declaration(&self.type_of(target)?)?,
            },
        };
        solve_method_in_type(&owner, name, &arg_types)
    }

    /// Declaration whose members a value of type `receiver` exposes.
    fn receiver_declaration(&self, receiver: &ResolvedType) -> Result<TypeDeclRef> {
        match receiver.kind() {
            TypeKind::Reference(reference) => Ok(reference.declaration().clone()),
            TypeKind::TypeVariable(param) => match param.bounds()?.first() {
                Some(bound) => self.receiver_declaration(bound),
                None => self.solver.solve_type(JAVA_LANG_OBJECT),
            },
            TypeKind::Wildcard(wildcard) if wildcard.is_extends() => match wildcard.bound_type() {
                Some(bound) => self.receiver_declaration(bound),
                None => self.solver.solve_type(JAVA_LANG_OBJECT),
            },
            TypeKind::Wildcard(_) | TypeKind::Array(_) => self.solver.solve_type(JAVA_LANG_OBJECT),
            _ => Err(Error::TypeMismatch {
                expected: "reference type",
                found: receiver.describe(),
            }),
        }
    }

    fn binary(&self, op: BinaryOp, lhs: &ResolvedType, rhs: &ResolvedType) -> Result<ResolvedType> {
        let boolean = ResolvedType::primitive(PrimitiveType::Boolean);
        Ok(match op {
            BinaryOp::Or
            | BinaryOp::And
            | BinaryOp::Eq
            | BinaryOp::Ne
            | BinaryOp::Lt
            | BinaryOp::Gt
            | BinaryOp::Le
            | BinaryOp::Ge => boolean,
            BinaryOp::Add if is_string(lhs) || is_string(rhs) => self.named(JAVA_LANG_STRING)?,
            BinaryOp::Shl | BinaryOp::Shr | BinaryOp::UShr => {
                ResolvedType::primitive(unary_promotion(lhs)?)
            }
            BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor
                if unboxed(lhs) == Some(PrimitiveType::Boolean) =>
            {
                boolean
            }
            _ => ResolvedType::primitive(binary_promotion(lhs, rhs)?),
        })
    }
}

/// `ty`, declared as a member of `owner`, seen through `receiver`.
fn member_type_on(
    receiver: &ResolvedType,
    owner: &TypeDeclRef,
    ty: &ResolvedType,
) -> Result<ResolvedType> {
    match supertype_view(receiver, &owner.qualified_name())? {
        Some(view) => {
            let view = view.as_reference()?;
            if view.is_raw()? {
                Ok(ty.erase_arguments())
            } else {
                view.use_this_type_parameters_on(ty)
            }
        }
        None => Ok(ty.clone()),
    }
}

fn is_string(ty: &ResolvedType) -> bool {
    ty.as_reference()
        .is_ok_and(|r| r.qualified_name() == JAVA_LANG_STRING)
}

fn unboxed(ty: &ResolvedType) -> Option<PrimitiveType> {
    match ty.kind() {
        TypeKind::Primitive(p) => Some(*p),
        TypeKind::Reference(r) => PrimitiveType::from_box_type_name(&r.qualified_name()),
        _ => None,
    }
}

fn numeric(ty: &ResolvedType) -> Result<PrimitiveType> {
    unboxed(ty)
        .filter(|p| p.is_numeric())
        .ok_or_else(|| Error::TypeMismatch {
            expected: "numeric type",
            found: ty.describe(),
        })
}

fn unary_promotion(ty: &ResolvedType) -> Result<PrimitiveType> {
    Ok(match numeric(ty)? {
        PrimitiveType::Byte | PrimitiveType::Short | PrimitiveType::Char => PrimitiveType::Int,
        other => other,
    })
}

fn binary_promotion(lhs: &ResolvedType, rhs: &ResolvedType) -> Result<PrimitiveType> {
    let (lhs, rhs) = (numeric(lhs)?, numeric(rhs)?);
    Ok(
        if lhs == PrimitiveType::Double || rhs == PrimitiveType::Double {
            PrimitiveType::Double
        } else if lhs == PrimitiveType::Float || rhs == PrimitiveType::Float {
            PrimitiveType::Float
        } else if lhs == PrimitiveType::Long || rhs == PrimitiveType::Long {
            PrimitiveType::Long
        } else {
            PrimitiveType::Int
        },
    )
}

fn conditional(then: ResolvedType, otherwise: ResolvedType) -> Result<ResolvedType> {
    if then == otherwise || otherwise.is_null() {
        return Ok(then);
    }
    if then.is_null() {
        return Ok(otherwise);
    }
    if let (Some(a), Some(b)) = (unboxed(&then), unboxed(&otherwise)) {
        if a.is_numeric() && b.is_numeric() {
            return binary_promotion(&then, &otherwise).map(ResolvedType::primitive);
        }
    }
    if then.is_assignable_by(&otherwise)? {
        Ok(then)
    } else {
        Ok(otherwise)
    }
}
