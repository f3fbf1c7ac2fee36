//! Annotation value decoding, one function per value shape.

use jsym_classfile::{ConstValue, ElementValue};
use jsym_syntax::{
    Annotation, AnnotationArgs, Expr, Literal, NodeId, SyntaxTree, TypeRef, UnaryOp,
};
use jsym_types::{AnnotationValue, Error, Result};

/// Name lookups needed while decoding source annotation values.
pub(crate) trait NameLookup {
    /// Qualified name for a class literal's type.
    fn class_literal_name(&self, ty: &TypeRef) -> Result<String>;

    /// Qualified name of an annotation type as written at the use site.
    fn annotation_type_name(&self, name: &str) -> Result<String>;

    /// `(enum type, constant)` for a name or field access naming an enum
    /// constant.
    fn enum_constant(&self, tree: &SyntaxTree, node: NodeId) -> Result<Option<(String, String)>>;
}

/// Decode the value expression at `node`.
pub(crate) fn decode_value(
    tree: &SyntaxTree,
    node: NodeId,
    lookup: &dyn NameLookup,
) -> Result<AnnotationValue> {
    let Some(expr) = tree.as_expr(node) else {
        return Err(Error::UnsupportedAnnotationExprKind(
            "non-expression node".to_string(),
        ));
    };
    match expr {
        Expr::Literal(literal) => Ok(decode_literal(literal)),
        Expr::ClassLiteral(ty) => Ok(AnnotationValue::Class(lookup.class_literal_name(ty)?)),
        Expr::ArrayInit(values) => values
            .iter()
            .map(|&value| decode_value(tree, value, lookup))
            .collect::<Result<Vec<_>>>()
            .map(AnnotationValue::Array),
        Expr::Annotation(annotation) => decode_annotation(tree, annotation, lookup),
        Expr::Name(_) | Expr::FieldAccess { .. } => match lookup.enum_constant(tree, node)? {
            Some((type_name, constant)) => Ok(AnnotationValue::Enum {
                type_name,
                constant,
            }),
            None => Err(Error::UnsupportedAnnotationExprKind(format!(
                "reference `{}`",
                tree.source_of(node)
            ))),
        },
        Expr::Unary { op, operand } => {
            let value = decode_value(tree, *operand, lookup)?;
            match (op, value) {
                (
                    UnaryOp::Plus,
                    value @ (AnnotationValue::Int(_)
                    | AnnotationValue::Long(_)
                    | AnnotationValue::Float(_)
                    | AnnotationValue::Double(_)),
                ) => Ok(value),
                (UnaryOp::Minus, AnnotationValue::Int(v)) => {
                    Ok(AnnotationValue::Int(v.wrapping_neg()))
                }
                (UnaryOp::Minus, AnnotationValue::Long(v)) => {
                    Ok(AnnotationValue::Long(v.wrapping_neg()))
                }
                (UnaryOp::Minus, AnnotationValue::Float(v)) => Ok(AnnotationValue::Float(-v)),
                (UnaryOp::Minus, AnnotationValue::Double(v)) => Ok(AnnotationValue::Double(-v)),
                _ => Err(Error::UnsupportedAnnotationExprKind(format!(
                    "unary expression `{}`",
                    tree.source_of(node)
                ))),
            }
        }
        other => Err(Error::UnsupportedAnnotationExprKind(expr_kind(other).to_string())),
    }
}

/// Member values of an annotation use, in source order. `@Foo(x)` is the
/// single member `value`.
pub(crate) fn decode_args(
    tree: &SyntaxTree,
    args: &AnnotationArgs,
    lookup: &dyn NameLookup,
) -> Result<Vec<(String, AnnotationValue)>> {
    match args {
        AnnotationArgs::Marker => Ok(Vec::new()),
        AnnotationArgs::SingleMember(value) => {
            Ok(vec![("value".to_string(), decode_value(tree, *value, lookup)?)])
        }
        AnnotationArgs::Normal(pairs) => pairs
            .iter()
            .map(|(name, value)| Ok((name.clone(), decode_value(tree, *value, lookup)?)))
            .collect(),
    }
}

fn decode_annotation(
    tree: &SyntaxTree,
    annotation: &Annotation,
    lookup: &dyn NameLookup,
) -> Result<AnnotationValue> {
    Ok(AnnotationValue::Annotation {
        type_name: lookup.annotation_type_name(&annotation.name)?,
        values: decode_args(tree, &annotation.args, lookup)?,
    })
}

fn decode_literal(literal: &Literal) -> AnnotationValue {
    match literal {
        Literal::Boolean(v) => AnnotationValue::Boolean(*v),
        Literal::Char(v) => AnnotationValue::Char(*v),
        Literal::Int(v) => AnnotationValue::Int(*v),
        Literal::Long(v) => AnnotationValue::Long(*v),
        Literal::Float(v) => AnnotationValue::Float(*v),
        Literal::Double(v) => AnnotationValue::Double(*v),
        Literal::String(v) | Literal::TextBlock(v) => AnnotationValue::String(v.clone()),
        Literal::Null => AnnotationValue::Null,
    }
}

fn expr_kind(expr: &Expr) -> &'static str {
    match expr {
        Expr::Literal(_) => "literal",
        Expr::Name(_) => "name",
        Expr::FieldAccess { .. } => "field access",
        Expr::MethodCall { .. } => "method call",
        Expr::New { .. } => "object creation",
        Expr::NewArray { .. } => "array creation",
        Expr::This => "this",
        Expr::Super => "super",
        Expr::ClassLiteral(_) => "class literal",
        Expr::ArrayInit(_) => "array initializer",
        Expr::Annotation(_) => "annotation",
        Expr::Unary { .. } => "unary expression",
        Expr::Binary { .. } => "binary expression",
        Expr::Assign { .. } => "assignment",
        Expr::Conditional { .. } => "conditional expression",
        Expr::Cast { .. } => "cast",
        Expr::ArrayAccess { .. } => "array access",
        Expr::InstanceOf { .. } => "instanceof",
        Expr::Unsupported => "lambda, method reference or switch expression",
    }
}

/// Decode a class-file element value.
pub(crate) fn decode_element(value: &ElementValue) -> AnnotationValue {
    match value {
        ElementValue::Const(constant) => match constant {
            ConstValue::Byte(v) => AnnotationValue::Byte(*v),
            ConstValue::Char(v) => AnnotationValue::Char(*v),
            ConstValue::Short(v) => AnnotationValue::Short(*v),
            ConstValue::Int(v) => AnnotationValue::Int(*v),
            ConstValue::Long(v) => AnnotationValue::Long(*v),
            ConstValue::Float(v) => AnnotationValue::Float(*v),
            ConstValue::Double(v) => AnnotationValue::Double(*v),
            ConstValue::Boolean(v) => AnnotationValue::Boolean(*v),
            ConstValue::String(v) => AnnotationValue::String(v.clone()),
        },
        ElementValue::Enum {
            type_descriptor,
            const_name,
        } => AnnotationValue::Enum {
            type_name: descriptor_source_name(type_descriptor),
            constant: const_name.clone(),
        },
        ElementValue::Class(descriptor) => AnnotationValue::Class(descriptor_source_name(descriptor)),
        ElementValue::Annotation(annotation) => AnnotationValue::Annotation {
            type_name: annotation.type_name(),
            values: annotation
                .elements
                .iter()
                .map(|(name, value)| (name.clone(), decode_element(value)))
                .collect(),
        },
        ElementValue::Array(values) => {
            AnnotationValue::Array(values.iter().map(decode_element).collect())
        }
    }
}

/// Source spelling of a field or return descriptor: `I` is `int`,
/// `[Ljava/util/Map$Entry;` is `java.util.Map.Entry[]`.
pub(crate) fn descriptor_source_name(descriptor: &str) -> String {
    if let Some(component) = descriptor.strip_prefix('[') {
        return format!("{}[]", descriptor_source_name(component));
    }
    if let Some(internal) = descriptor
        .strip_prefix('L')
        .and_then(|rest| rest.strip_suffix(';'))
    {
        return internal.replace(['/', '$'], ".");
    }
    let mut chars = descriptor.chars();
    match (chars.next(), chars.next()) {
        (Some('V'), None) => "void".to_string(),
        (Some(c), None) => jsym_classfile::BaseType::from_descriptor_char(c)
            .map(|base| base.keyword().to_string())
            .unwrap_or_else(|| descriptor.to_string()),
        _ => descriptor.to_string(),
    }
}
