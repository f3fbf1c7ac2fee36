//! Class mirrors read from Java source, the way reflection reports the
//! compiled classes: implicit modifiers made explicit, enum constants as
//! flagged fields, default constructors and enum helpers present.

use jsym_classfile::access::{
    ACC_ABSTRACT, ACC_ANNOTATION, ACC_ENUM, ACC_FINAL, ACC_INTERFACE, ACC_NATIVE, ACC_PRIVATE,
    ACC_PROTECTED, ACC_PUBLIC, ACC_STATIC, ACC_TRANSIENT, ACC_VARARGS, ACC_VOLATILE,
};
use jsym_syntax::{
    Annotation, Expr, Modifier, Modifiers, NodeId, NodeKind, SyntaxTree, TypeDeclKind, TypeParam,
    TypeRef, TypeRefKind, WildcardBound,
};
use jsym_types::{BoundKind, Error, PrimitiveType, Result, TypeDeclarationKind, JAVA_LANG_OBJECT};

use super::{
    AnnotationMirror, ClassMirror, FieldMirror, MethodMirror, ParamMirror, RuntimeRegistry,
    TypeMirror, TypeParamMirror,
};
use crate::annotations::{decode_args, decode_value, NameLookup};
use crate::convert::primitive;
use crate::expr::dotted_name;

const JAVA_LANG_ENUM: &str = "java.lang.Enum";
const JAVA_LANG_ANNOTATION: &str = "java.lang.annotation.Annotation";

/// Mirrors for every type in `tree`, outermost first. `known` answers
/// whether a `java.lang` class exists for names the unit does not import.
pub(super) fn mirrors(tree: &SyntaxTree, known: &RuntimeRegistry) -> Result<Vec<ClassMirror>> {
    let reader = StubReader { tree, known };
    tree.all_types()
        .into_iter()
        .map(|node| reader.class(node))
        .collect()
}

fn keyword_flags(modifiers: &Modifiers) -> u16 {
    modifiers
        .keywords
        .iter()
        .map(|keyword| match keyword {
            Modifier::Public => ACC_PUBLIC,
            Modifier::Protected => ACC_PROTECTED,
            Modifier::Private => ACC_PRIVATE,
            Modifier::Static => ACC_STATIC,
            Modifier::Abstract => ACC_ABSTRACT,
            Modifier::Final => ACC_FINAL,
            Modifier::Native => ACC_NATIVE,
            _ => 0,
        })
        .fold(0, |acc, flag| acc | flag)
}

struct StubReader<'a> {
    tree: &'a SyntaxTree,
    known: &'a RuntimeRegistry,
}

impl StubReader<'_> {
    fn class(&self, node: NodeId) -> Result<ClassMirror> {
        let Some(decl) = self.tree.as_type(node) else {
            return Err(Error::InvalidInput(format!(
                "node {} is not a type declaration",
                node.index()
            )));
        };
        let qualified = self.tree.qualified_name(node);
        let package = self.tree.package_name().to_string();
        let class_name = if package.is_empty() {
            qualified.clone()
        } else {
            qualified[package.len() + 1..].to_string()
        };
        let scope = Scope {
            reader: self,
            owner: node,
            vars: decl.type_params.iter().map(|p| p.name.clone()).collect(),
        };

        let outer = self.tree.enclosing_type(node).and_then(|o| self.tree.as_type(o));
        let mut modifiers = keyword_flags(&decl.modifiers);
        if outer.is_some_and(|o| matches!(o.kind, TypeDeclKind::Interface | TypeDeclKind::Annotation)) {
            modifiers |= ACC_PUBLIC | ACC_STATIC;
        }
        if outer.is_some() && decl.kind != TypeDeclKind::Class {
            modifiers |= ACC_STATIC;
        }
        let kind = match decl.kind {
            TypeDeclKind::Class => TypeDeclarationKind::Class,
            TypeDeclKind::Interface => {
                modifiers |= ACC_INTERFACE | ACC_ABSTRACT;
                TypeDeclarationKind::Interface
            }
            TypeDeclKind::Enum => {
                modifiers |= ACC_ENUM | ACC_FINAL;
                TypeDeclarationKind::Enum
            }
            TypeDeclKind::Annotation => {
                modifiers |= ACC_INTERFACE | ACC_ABSTRACT | ACC_ANNOTATION;
                TypeDeclarationKind::Annotation
            }
        };

        let mut mirror = ClassMirror::new(package, class_name, kind);
        mirror.modifiers = modifiers;
        mirror.type_params = scope.type_params(&decl.type_params);
        mirror.annotations = scope.annotations(&decl.modifiers.annotations)?;
        match decl.kind {
            TypeDeclKind::Class => {
                mirror.superclass = match decl.extends.first() {
                    Some(superclass) => Some(scope.ty(superclass)),
                    None if qualified == JAVA_LANG_OBJECT => None,
                    None => Some(TypeMirror::class(JAVA_LANG_OBJECT)),
                };
                mirror.interfaces = decl.implements.iter().map(|t| scope.ty(t)).collect();
            }
            TypeDeclKind::Enum => {
                mirror.superclass = Some(TypeMirror::Class {
                    name: JAVA_LANG_ENUM.to_string(),
                    args: vec![TypeMirror::class(qualified.clone())],
                });
                mirror.interfaces = decl.implements.iter().map(|t| scope.ty(t)).collect();
            }
            TypeDeclKind::Interface => {
                mirror.interfaces = decl.extends.iter().map(|t| scope.ty(t)).collect();
            }
            TypeDeclKind::Annotation => {
                mirror.interfaces = vec![TypeMirror::class(JAVA_LANG_ANNOTATION)];
            }
        }

        let in_interface = matches!(decl.kind, TypeDeclKind::Interface | TypeDeclKind::Annotation);
        for &member in &decl.members {
            match self.tree.kind(member) {
                NodeKind::Field(field) => {
                    let mut flags = keyword_flags(&field.modifiers);
                    if field.modifiers.has(Modifier::Volatile) {
                        flags |= ACC_VOLATILE;
                    }
                    if field.modifiers.has(Modifier::Transient) {
                        flags |= ACC_TRANSIENT;
                    }
                    if in_interface {
                        flags |= ACC_PUBLIC | ACC_STATIC | ACC_FINAL;
                    }
                    mirror.fields.push(FieldMirror {
                        name: field.name.clone(),
                        ty: scope.ty(&field.ty),
                        modifiers: flags,
                        annotations: scope.annotations(&field.modifiers.annotations)?,
                    });
                }
                NodeKind::EnumConstant(constant) => mirror.fields.push(FieldMirror {
                    name: constant.name.clone(),
                    ty: TypeMirror::class(qualified.clone()),
                    modifiers: ACC_PUBLIC | ACC_STATIC | ACC_FINAL | ACC_ENUM,
                    annotations: scope.annotations(&constant.modifiers.annotations)?,
                }),
                NodeKind::Method(_) => {
                    let method = scope.method(member, in_interface)?;
                    if self.tree.as_method(member).is_some_and(|m| m.is_constructor) {
                        mirror.constructors.push(method);
                    } else {
                        mirror.methods.push(method);
                    }
                }
                NodeKind::AnnotationMember(element) => mirror.methods.push(MethodMirror {
                    name: element.name.clone(),
                    modifiers: ACC_PUBLIC | ACC_ABSTRACT,
                    type_params: Vec::new(),
                    params: Vec::new(),
                    return_type: scope.ty(&element.ty),
                    exceptions: Vec::new(),
                    annotations: scope.annotations(&element.modifiers.annotations)?,
                    default_value: element
                        .default
                        .map(|value| decode_value(self.tree, value, &scope))
                        .transpose()?,
                }),
                NodeKind::Type(_) => mirror.member_classes.push(self.tree.qualified_name(member)),
                _ => {}
            }
        }

        let simple = decl.name.clone();
        match decl.kind {
            TypeDeclKind::Class if mirror.constructors.is_empty() => {
                mirror.constructors.push(MethodMirror {
                    name: simple,
                    modifiers: modifiers & (ACC_PUBLIC | ACC_PROTECTED | ACC_PRIVATE),
                    type_params: Vec::new(),
                    params: Vec::new(),
                    return_type: TypeMirror::Void,
                    exceptions: Vec::new(),
                    annotations: Vec::new(),
                    default_value: None,
                });
            }
            TypeDeclKind::Enum => {
                let this = TypeMirror::class(qualified.clone());
                mirror.methods.push(MethodMirror {
                    name: "values".to_string(),
                    modifiers: ACC_PUBLIC | ACC_STATIC,
                    type_params: Vec::new(),
                    params: Vec::new(),
                    return_type: TypeMirror::Array(Box::new(this.clone())),
                    exceptions: Vec::new(),
                    annotations: Vec::new(),
                    default_value: None,
                });
                mirror.methods.push(MethodMirror {
                    name: "valueOf".to_string(),
                    modifiers: ACC_PUBLIC | ACC_STATIC,
                    type_params: Vec::new(),
                    params: vec![ParamMirror {
                        name: Some("name".to_string()),
                        ty: TypeMirror::class("java.lang.String"),
                        annotations: Vec::new(),
                    }],
                    return_type: this,
                    exceptions: Vec::new(),
                    annotations: Vec::new(),
                    default_value: None,
                });
            }
            _ => {}
        }
        Ok(mirror)
    }

    /// Qualified name for the simple name `name` seen from `owner`, or `None`
    /// when it looks like a package prefix.
    fn simple_name(&self, owner: NodeId, name: &str) -> Option<String> {
        let tree = self.tree;
        for ty in std::iter::once(owner).chain(tree.ancestors(owner)) {
            let Some(decl) = tree.as_type(ty) else {
                continue;
            };
            if decl.name == name {
                return Some(tree.qualified_name(ty));
            }
            if let Some(member) = tree
                .member_types(ty)
                .find(|&m| tree.as_type(m).is_some_and(|t| t.name == name))
            {
                return Some(tree.qualified_name(member));
            }
        }
        let unit = tree.compilation_unit();
        if let Some(top) = unit
            .types
            .iter()
            .find(|&&t| tree.as_type(t).is_some_and(|t| t.name == name))
        {
            return Some(tree.qualified_name(*top));
        }
        for import in unit.imports.iter().filter(|i| !i.is_static) {
            if import.is_on_demand {
                let candidate = format!("{}.{name}", import.name);
                if self.known.contains(&candidate) {
                    return Some(candidate);
                }
            } else if import.name.rsplit('.').next() == Some(name) {
                return Some(import.name.clone());
            }
        }
        let lang = format!("java.lang.{name}");
        if self.known.contains(&lang) {
            return Some(lang);
        }
        if name.starts_with(|c: char| c.is_ascii_lowercase()) {
            return None;
        }
        Some(match tree.package_name() {
            "" => name.to_string(),
            package => format!("{package}.{name}"),
        })
    }
}

/// Name resolution inside one type, with the type variables in scope.
struct Scope<'r, 'a> {
    reader: &'r StubReader<'a>,
    owner: NodeId,
    vars: Vec<String>,
}

impl Scope<'_, '_> {
    fn class_name(&self, dotted: &str) -> String {
        let (first, rest) = match dotted.split_once('.') {
            Some((first, rest)) => (first, Some(rest)),
            None => (dotted, None),
        };
        match (self.reader.simple_name(self.owner, first), rest) {
            (Some(head), Some(rest)) => format!("{head}.{rest}"),
            (Some(head), None) => head,
            (None, _) => dotted.to_string(),
        }
    }

    fn ty(&self, ty: &TypeRef) -> TypeMirror {
        match &ty.kind {
            TypeRefKind::Primitive(kind) => TypeMirror::Primitive(primitive(*kind)),
            TypeRefKind::Array(component) => TypeMirror::Array(Box::new(self.ty(component))),
            TypeRefKind::Wildcard(None) => TypeMirror::Wildcard(None),
            TypeRefKind::Wildcard(Some((bound, inner))) => {
                let kind = match bound {
                    WildcardBound::Extends => BoundKind::Extends,
                    WildcardBound::Super => BoundKind::Super,
                };
                TypeMirror::Wildcard(Some((kind, Box::new(self.ty(inner)))))
            }
            TypeRefKind::Class(segments) => {
                if let [segment] = segments.as_slice() {
                    if segment.args.is_empty() {
                        if segment.name == "void" {
                            return TypeMirror::Void;
                        }
                        if self.vars.contains(&segment.name) {
                            return TypeMirror::Variable(segment.name.clone());
                        }
                    }
                }
                let name = ty.class_name().unwrap_or_default();
                TypeMirror::Class {
                    name: self.class_name(&name),
                    args: ty.type_args().iter().map(|arg| self.ty(arg)).collect(),
                }
            }
        }
    }

    fn type_params(&self, params: &[TypeParam]) -> Vec<TypeParamMirror> {
        params
            .iter()
            .map(|param| TypeParamMirror {
                name: param.name.clone(),
                bounds: param.bounds.iter().map(|b| self.ty(b)).collect(),
            })
            .collect()
    }

    fn annotations(&self, annotations: &[Annotation]) -> Result<Vec<AnnotationMirror>> {
        annotations
            .iter()
            .map(|annotation| {
                Ok(AnnotationMirror {
                    type_name: self.class_name(&annotation.name),
                    values: decode_args(self.reader.tree, &annotation.args, self)?,
                })
            })
            .collect()
    }

    fn method(&self, node: NodeId, in_interface: bool) -> Result<MethodMirror> {
        let tree = self.reader.tree;
        let Some(decl) = tree.as_method(node) else {
            return Err(Error::InvalidInput(format!("node {} is not a method", node.index())));
        };
        let mut vars = self.vars.clone();
        vars.extend(decl.type_params.iter().map(|p| p.name.clone()));
        let scope = Scope {
            reader: self.reader,
            owner: self.owner,
            vars,
        };

        let mut flags = keyword_flags(&decl.modifiers);
        if in_interface && !decl.modifiers.has(Modifier::Private) {
            flags |= ACC_PUBLIC;
            if decl.body.is_none()
                && !decl.modifiers.has(Modifier::Static)
                && !decl.modifiers.has(Modifier::Default)
            {
                flags |= ACC_ABSTRACT;
            }
        }

        let mut params = Vec::with_capacity(decl.params.len());
        for &param in &decl.params {
            let Some(param) = tree.as_parameter(param) else {
                continue;
            };
            let ty = scope.ty(&param.ty);
            if param.is_varargs {
                flags |= ACC_VARARGS;
            }
            params.push(ParamMirror {
                name: Some(param.name.clone()),
                ty: if param.is_varargs {
                    TypeMirror::Array(Box::new(ty))
                } else {
                    ty
                },
                annotations: scope.annotations(&param.modifiers.annotations)?,
            });
        }

        Ok(MethodMirror {
            name: decl.name.clone(),
            modifiers: flags,
            type_params: scope.type_params(&decl.type_params),
            params,
            return_type: decl
                .return_type
                .as_ref()
                .map_or(TypeMirror::Void, |ty| scope.ty(ty)),
            exceptions: decl.throws.iter().map(|ty| scope.ty(ty)).collect(),
            annotations: scope.annotations(&decl.modifiers.annotations)?,
            default_value: None,
        })
    }
}

impl NameLookup for Scope<'_, '_> {
    fn class_literal_name(&self, ty: &TypeRef) -> Result<String> {
        Ok(match &ty.kind {
            TypeRefKind::Primitive(kind) => primitive_keyword(primitive(*kind)).to_string(),
            _ => match ty.class_name() {
                Some(name) => self.class_name(&name),
                None => self.reader.tree.text()[ty.range].trim().to_string(),
            },
        })
    }

    fn annotation_type_name(&self, name: &str) -> Result<String> {
        Ok(self.class_name(name))
    }

    fn enum_constant(&self, tree: &SyntaxTree, node: NodeId) -> Result<Option<(String, String)>> {
        let Some(Expr::FieldAccess { target, name }) = tree.as_expr(node) else {
            return Ok(None);
        };
        Ok(dotted_name(tree, *target).map(|ty| (self.class_name(&ty), name.clone())))
    }
}

fn primitive_keyword(ty: PrimitiveType) -> &'static str {
    match ty {
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
