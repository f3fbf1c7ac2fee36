//! Declarations backed by compiled class files.
//!
//! Each declaration holds the parsed [`ClassStub`] of its class and an index
//! into it. Generic signatures win over descriptors when both are present;
//! class names inside either are resolved through the type solver.

use std::fmt;
use std::sync::Arc;

use jsym_classfile::access::{
    ACC_ABSTRACT, ACC_BRIDGE, ACC_ENUM, ACC_PRIVATE, ACC_PROTECTED, ACC_PUBLIC, ACC_STATIC,
    ACC_SYNTHETIC, ACC_TRANSIENT, ACC_VARARGS, ACC_VOLATILE,
};
use jsym_classfile::{
    Annotation, BaseType, ClassStub, ClassTypeSignature, FieldStub, FieldType,
    FieldTypeSignature, MethodStub, ReturnType, TypeArgument, TypeParameter, TypeSignature,
};
use jsym_types::{
    Accessibility, Annotated, AnnotationMemberDeclaration, AnnotationMemberRef, AnnotationRef,
    AnnotationValue, EnumConstantDeclaration, EnumConstantRef, Error, FieldDeclaration, FieldRef,
    MethodDeclaration, MethodRef, ParamRef, ParameterDeclaration, PrimitiveType,
    ReferenceTypeDeclaration, ResolvedAnnotationExpr, ResolvedType, Result, TypeDeclRef,
    TypeDeclarationKind, TypeParamRef, TypeParameterDeclaration, TypeSolver, JAVA_LANG_OBJECT,
};

use crate::annotations::decode_element;

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

fn primitive(base: BaseType) -> PrimitiveType {
    match base {
        BaseType::Byte => PrimitiveType::Byte,
        BaseType::Char => PrimitiveType::Char,
        BaseType::Double => PrimitiveType::Double,
        BaseType::Float => PrimitiveType::Float,
        BaseType::Int => PrimitiveType::Int,
        BaseType::Long => PrimitiveType::Long,
        BaseType::Short => PrimitiveType::Short,
        BaseType::Boolean => PrimitiveType::Boolean,
    }
}

fn annotation_refs(annotations: &[Annotation], solver: &TypeSolver) -> Vec<AnnotationRef> {
    annotations
        .iter()
        .map(|a| {
            Arc::new(BytecodeAnnotationExpr {
                annotation: a.clone(),
                solver: solver.clone(),
            }) as AnnotationRef
        })
        .collect()
}

/// Translates signatures and descriptors of one class, optionally inside one
/// of its methods (for method type variables).
struct TypeReader<'a> {
    class: &'a ClassDeclaration,
    method: Option<usize>,
}

impl TypeReader<'_> {
    fn class_named(&self, internal_name: &str) -> Result<TypeDeclRef> {
        let name = internal_name.replace(['/', '$'], ".");
        self.class
            .solver
            .try_to_solve_type(&name)?
            .into_declaration()
            .ok_or_else(|| Error::unsolved(name, format!("class file {}", self.class.stub.qualified_name())))
    }

    fn descriptor(&self, ty: &FieldType) -> Result<ResolvedType> {
        Ok(match ty {
            FieldType::Base(base) => ResolvedType::primitive(primitive(*base)),
            FieldType::Object(internal) => ResolvedType::reference(self.class_named(internal)?, Vec::new()),
            FieldType::Array(component) => ResolvedType::array(self.descriptor(component)?),
        })
    }

    fn signature(&self, ty: &TypeSignature) -> Result<ResolvedType> {
        match ty {
            TypeSignature::Base(base) => Ok(ResolvedType::primitive(primitive(*base))),
            TypeSignature::Field(field) => self.field_signature(field),
        }
    }

    fn field_signature(&self, ty: &FieldTypeSignature) -> Result<ResolvedType> {
        match ty {
            FieldTypeSignature::Class(class) => self.class_signature(class),
            FieldTypeSignature::Array(component) => Ok(ResolvedType::array(self.signature(component)?)),
            FieldTypeSignature::TypeVariable(name) => self.type_variable(name),
        }
    }

    fn class_signature(&self, class: &ClassTypeSignature) -> Result<ResolvedType> {
        let decl = self.class_named(&class.internal_name())?;
        let args = class
            .type_arguments()
            .iter()
            .map(|arg| {
                Ok(match arg {
                    TypeArgument::Any => ResolvedType::unbounded(),
                    TypeArgument::Exact(ty) => self.field_signature(ty)?,
                    TypeArgument::Extends(ty) => ResolvedType::extends_bound(self.field_signature(ty)?),
                    TypeArgument::Super(ty) => ResolvedType::super_bound(self.field_signature(ty)?),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(ResolvedType::reference(decl, args))
    }

    /// Method type parameters shadow those of the class.
    fn type_variable(&self, name: &str) -> Result<ResolvedType> {
        let stub = &self.class.stub;
        if let Some(method) = self.method {
            let params = stub.methods[method]
                .signature
                .as_ref()
                .map_or(&[][..], |s| s.type_params.as_slice());
            if let Some(index) = params.iter().position(|p| p.name == name) {
                return Ok(ResolvedType::type_variable(self.class.type_param(Some(method), index)));
            }
        }
        let params = stub
            .signature
            .as_ref()
            .map_or(&[][..], |s| s.type_params.as_slice());
        match params.iter().position(|p| p.name == name) {
            Some(index) => Ok(ResolvedType::type_variable(self.class.type_param(None, index))),
            None => Err(Error::unsolved(
                name,
                format!("type variables of class file {}", stub.qualified_name()),
            )),
        }
    }
}

/// A class, interface, enum or annotation type read from a class file.
#[derive(Clone)]
pub struct ClassDeclaration {
    stub: Arc<ClassStub>,
    solver: TypeSolver,
}

impl ClassDeclaration {
    #[must_use]
    pub fn new(stub: Arc<ClassStub>, solver: TypeSolver) -> Self {
        Self { stub, solver }
    }

    #[must_use]
    pub fn stub(&self) -> &Arc<ClassStub> {
        &self.stub
    }

    fn reader(&self, method: Option<usize>) -> TypeReader<'_> {
        TypeReader { class: self, method }
    }

    fn type_param(&self, method: Option<usize>, index: usize) -> TypeParamRef {
        Arc::new(BytecodeTypeParameter {
            class: self.clone(),
            method,
            index,
        })
    }

    fn inner_class_entry(&self) -> Option<&jsym_classfile::InnerClassInfo> {
        self.stub
            .inner_classes
            .iter()
            .find(|info| info.inner_class == self.stub.internal_name)
    }

    fn is_member_method(method: &MethodStub) -> bool {
        method.access_flags & (ACC_SYNTHETIC | ACC_BRIDGE) == 0 && !method.name.starts_with('<')
    }

    fn is_member_field(field: &FieldStub) -> bool {
        field.access_flags & (ACC_SYNTHETIC | ACC_ENUM) == 0
    }
}

impl fmt::Debug for ClassDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassDeclaration({})", self.stub.qualified_name())
    }
}

impl Annotated for ClassDeclaration {
    fn annotations(&self) -> Result<Vec<AnnotationRef>> {
        Ok(annotation_refs(&self.stub.annotations, &self.solver))
    }
}

impl ReferenceTypeDeclaration for ClassDeclaration {
    fn name(&self) -> String {
        if let Some(name) = self.inner_class_entry().and_then(|info| info.inner_name.clone()) {
            return name;
        }
        let internal = &self.stub.internal_name;
        let simple = internal.rsplit('/').next().unwrap_or(internal);
        simple.rsplit('$').next().unwrap_or(simple).to_string()
    }

    fn package_name(&self) -> String {
        match self.stub.internal_name.rsplit_once('/') {
            Some((package, _)) => package.replace('/', "."),
            None => String::new(),
        }
    }

    fn class_name(&self) -> String {
        let internal = &self.stub.internal_name;
        let nested = internal.rsplit_once('/').map_or(internal.as_str(), |(_, name)| name);
        nested.replace('$', ".")
    }

    fn qualified_name(&self) -> String {
        self.stub.qualified_name()
    }

    fn kind(&self) -> TypeDeclarationKind {
        if self.stub.is_annotation() {
            TypeDeclarationKind::Annotation
        } else if self.stub.is_interface() {
            TypeDeclarationKind::Interface
        } else if self.stub.is_enum() {
            TypeDeclarationKind::Enum
        } else {
            TypeDeclarationKind::Class
        }
    }

    fn accessibility(&self) -> Accessibility {
        let flags = self
            .inner_class_entry()
            .map_or(self.stub.access_flags, |info| info.access_flags);
        accessibility(flags)
    }

    fn type_parameters(&self) -> Result<Vec<TypeParamRef>> {
        let count = self.stub.signature.as_ref().map_or(0, |s| s.type_params.len());
        Ok((0..count).map(|index| self.type_param(None, index)).collect())
    }

    fn ancestors(&self) -> Result<Vec<ResolvedType>> {
        if self.qualified_name() == JAVA_LANG_OBJECT {
            return Ok(Vec::new());
        }
        let reader = self.reader(None);
        let is_interface = self.stub.is_interface();
        let mut out = Vec::new();
        match &self.stub.signature {
            Some(signature) => {
                if !is_interface {
                    out.push(reader.class_signature(&signature.super_class)?);
                }
                for interface in &signature.interfaces {
                    out.push(reader.class_signature(interface)?);
                }
            }
            None => {
                if !is_interface {
                    if let Some(superclass) = &self.stub.super_class {
                        out.push(ResolvedType::reference(reader.class_named(superclass)?, Vec::new()));
                    }
                }
                for interface in &self.stub.interfaces {
                    out.push(ResolvedType::reference(reader.class_named(interface)?, Vec::new()));
                }
            }
        }
        Ok(out)
    }

    fn declared_fields(&self) -> Result<Vec<FieldRef>> {
        Ok(self
            .stub
            .fields
            .iter()
            .enumerate()
            .filter(|(_, f)| Self::is_member_field(f))
            .map(|(index, _)| Arc::new(BytecodeField::from((self.clone(), index))) as FieldRef)
            .collect())
    }

    fn declared_methods(&self) -> Result<Vec<MethodRef>> {
        Ok(self
            .stub
            .methods
            .iter()
            .enumerate()
            .filter(|(_, m)| Self::is_member_method(m))
            .map(|(index, _)| Arc::new(BytecodeMethod::from((self.clone(), index))) as MethodRef)
            .collect())
    }

    fn constructors(&self) -> Result<Vec<MethodRef>> {
        Ok(self
            .stub
            .methods
            .iter()
            .enumerate()
            .filter(|(_, m)| m.name == "<init>" && m.access_flags & ACC_SYNTHETIC == 0)
            .map(|(index, _)| Arc::new(BytecodeMethod::from((self.clone(), index))) as MethodRef)
            .collect())
    }

    fn internal_types(&self) -> Result<Vec<TypeDeclRef>> {
        let mut out = Vec::new();
        for info in &self.stub.inner_classes {
            if info.outer_class.as_deref() != Some(self.stub.internal_name.as_str())
                || info.inner_name.is_none()
            {
                continue;
            }
            let name = info.inner_class.replace(['/', '$'], ".");
            if let Some(inner) = self.solver.try_to_solve_type(&name)?.into_declaration() {
                out.push(inner);
            }
        }
        Ok(out)
    }

    fn enum_constants(&self) -> Result<Vec<EnumConstantRef>> {
        Ok(self
            .stub
            .fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.access_flags & ACC_ENUM != 0)
            .map(|(index, _)| {
                Arc::new(BytecodeEnumConstant {
                    class: self.clone(),
                    index,
                }) as EnumConstantRef
            })
            .collect())
    }

    fn annotation_members(&self) -> Result<Vec<AnnotationMemberRef>> {
        if !self.stub.is_annotation() {
            return Ok(Vec::new());
        }
        Ok(self
            .stub
            .methods
            .iter()
            .enumerate()
            .filter(|(_, m)| Self::is_member_method(m) && m.access_flags & ACC_STATIC == 0)
            .map(|(index, _)| {
                Arc::new(BytecodeAnnotationMember {
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

pub struct BytecodeTypeParameter {
    class: ClassDeclaration,
    method: Option<usize>,
    index: usize,
}

impl BytecodeTypeParameter {
    fn param(&self) -> Option<&TypeParameter> {
        let stub = &self.class.stub;
        let params = match self.method {
            Some(method) => stub.methods[method].signature.as_ref().map(|s| &s.type_params),
            None => stub.signature.as_ref().map(|s| &s.type_params),
        };
        params?.get(self.index)
    }
}

impl fmt::Debug for BytecodeTypeParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BytecodeTypeParameter({})", self.qualified_name())
    }
}

impl TypeParameterDeclaration for BytecodeTypeParameter {
    fn name(&self) -> String {
        self.param().map(|p| p.name.clone()).unwrap_or_default()
    }

    fn container_qualified_name(&self) -> String {
        match self.method {
            Some(method) => BytecodeMethod::from((self.class.clone(), method))
                .qualified_signature()
                .unwrap_or_else(|_| {
                    format!(
                        "{}.{}",
                        self.class.qualified_name(),
                        self.class.stub.methods[method].name
                    )
                }),
            None => self.class.qualified_name(),
        }
    }

    fn declared_on_type(&self) -> bool {
        self.method.is_none()
    }

    fn bounds(&self) -> Result<Vec<ResolvedType>> {
        let Some(param) = self.param() else {
            return Ok(Vec::new());
        };
        let reader = self.class.reader(self.method);
        param.bounds().map(|b| reader.field_signature(b)).collect()
    }
}

pub struct BytecodeField {
    class: ClassDeclaration,
    index: usize,
}

impl From<(ClassDeclaration, usize)> for BytecodeField {
    fn from((class, index): (ClassDeclaration, usize)) -> Self {
        Self { class, index }
    }
}

impl BytecodeField {
    fn stub(&self) -> &FieldStub {
        &self.class.stub.fields[self.index]
    }
}

impl fmt::Debug for BytecodeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BytecodeField({}.{})", self.class.qualified_name(), self.stub().name)
    }
}

impl Annotated for BytecodeField {
    fn annotations(&self) -> Result<Vec<AnnotationRef>> {
        Ok(annotation_refs(&self.stub().annotations, &self.class.solver))
    }
}

impl FieldDeclaration for BytecodeField {
    fn name(&self) -> String {
        self.stub().name.clone()
    }

    fn ty(&self) -> Result<ResolvedType> {
        let reader = self.class.reader(None);
        match &self.stub().signature {
            Some(signature) => reader.field_signature(signature),
            None => reader.descriptor(&self.stub().parsed_descriptor),
        }
    }

    fn is_static(&self) -> bool {
        self.stub().access_flags & ACC_STATIC != 0
    }

    fn is_volatile(&self) -> bool {
        self.stub().access_flags & ACC_VOLATILE != 0
    }

    fn is_transient(&self) -> bool {
        self.stub().access_flags & ACC_TRANSIENT != 0
    }

    fn accessibility(&self) -> Accessibility {
        accessibility(self.stub().access_flags)
    }

    fn declaring_type(&self) -> TypeDeclRef {
        Arc::new(self.class.clone())
    }
}

/// A method or constructor read from a class file.
pub struct BytecodeMethod {
    class: ClassDeclaration,
    index: usize,
}

impl From<(ClassDeclaration, usize)> for BytecodeMethod {
    fn from((class, index): (ClassDeclaration, usize)) -> Self {
        Self { class, index }
    }
}

impl BytecodeMethod {
    fn stub(&self) -> &MethodStub {
        &self.class.stub.methods[self.index]
    }

    /// Parameter types; the signature is used only when it lists every
    /// descriptor parameter (it omits synthetic ones such as an inner class's
    /// outer instance).
    fn param_types(&self) -> Result<Vec<ResolvedType>> {
        let stub = self.stub();
        let reader = self.class.reader(Some(self.index));
        match &stub.signature {
            Some(signature) if signature.params.len() == stub.parsed_descriptor.params.len() => {
                signature.params.iter().map(|p| reader.signature(p)).collect()
            }
            _ => stub
                .parsed_descriptor
                .params
                .iter()
                .map(|p| reader.descriptor(p))
                .collect(),
        }
    }
}

impl fmt::Debug for BytecodeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BytecodeMethod({}.{}{})", self.class.qualified_name(), self.stub().name, self.stub().descriptor)
    }
}

impl Annotated for BytecodeMethod {
    fn annotations(&self) -> Result<Vec<AnnotationRef>> {
        Ok(annotation_refs(&self.stub().annotations, &self.class.solver))
    }
}

impl MethodDeclaration for BytecodeMethod {
    fn name(&self) -> String {
        if self.is_constructor() {
            self.class.name()
        } else {
            self.stub().name.clone()
        }
    }

    fn declaring_type(&self) -> TypeDeclRef {
        Arc::new(self.class.clone())
    }

    fn return_type(&self) -> Result<ResolvedType> {
        let stub = self.stub();
        let reader = self.class.reader(Some(self.index));
        match &stub.signature {
            Some(signature) => match &signature.return_type {
                Some(ty) => reader.signature(ty),
                None => Ok(ResolvedType::void()),
            },
            None => match &stub.parsed_descriptor.return_type {
                ReturnType::Void => Ok(ResolvedType::void()),
                ReturnType::Type(ty) => reader.descriptor(ty),
            },
        }
    }

    fn params(&self) -> Result<Vec<ParamRef>> {
        let types = self.param_types()?;
        let count = types.len();
        Ok(types
            .into_iter()
            .enumerate()
            .map(|(index, ty)| {
                Arc::new(BytecodeParameter {
                    class: self.class.clone(),
                    method: self.index,
                    index,
                    ty,
                    is_last: index + 1 == count,
                }) as ParamRef
            })
            .collect())
    }

    fn type_parameters(&self) -> Result<Vec<TypeParamRef>> {
        let count = self.stub().signature.as_ref().map_or(0, |s| s.type_params.len());
        Ok((0..count)
            .map(|index| self.class.type_param(Some(self.index), index))
            .collect())
    }

    fn is_constructor(&self) -> bool {
        self.stub().name == "<init>"
    }

    fn is_static(&self) -> bool {
        self.stub().access_flags & ACC_STATIC != 0
    }

    fn is_abstract(&self) -> bool {
        self.stub().access_flags & ACC_ABSTRACT != 0
    }

    fn is_default(&self) -> bool {
        let flags = self.stub().access_flags;
        self.class.stub.is_interface() && flags & (ACC_ABSTRACT | ACC_STATIC | ACC_PRIVATE) == 0
    }

    fn accessibility(&self) -> Accessibility {
        accessibility(self.stub().access_flags)
    }

    /// The signature's `throws` list when it has one (it may name type
    /// variables), else the `Exceptions` attribute.
    fn specified_exceptions(&self) -> Result<Vec<ResolvedType>> {
        let stub = self.stub();
        let reader = self.class.reader(Some(self.index));
        match &stub.signature {
            Some(signature) if !signature.throws.is_empty() => signature
                .throws
                .iter()
                .map(|ty| reader.field_signature(ty))
                .collect(),
            _ => stub
                .exceptions
                .iter()
                .map(|name| Ok(ResolvedType::reference(reader.class_named(name)?, Vec::new())))
                .collect(),
        }
    }
}

pub struct BytecodeParameter {
    class: ClassDeclaration,
    method: usize,
    index: usize,
    ty: ResolvedType,
    is_last: bool,
}

impl BytecodeParameter {
    fn stub(&self) -> Option<&jsym_classfile::ParameterStub> {
        self.class.stub.methods[self.method].parameters.get(self.index)
    }
}

impl fmt::Debug for BytecodeParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BytecodeParameter({})", self.name())
    }
}

impl Annotated for BytecodeParameter {
    fn annotations(&self) -> Result<Vec<AnnotationRef>> {
        Ok(self
            .stub()
            .map(|p| annotation_refs(&p.annotations, &self.class.solver))
            .unwrap_or_default())
    }
}

impl ParameterDeclaration for BytecodeParameter {
    fn name(&self) -> String {
        self.stub()
            .and_then(|p| p.name.clone())
            .unwrap_or_else(|| format!("arg{}", self.index))
    }

    fn ty(&self) -> Result<ResolvedType> {
        Ok(self.ty.clone())
    }

    fn is_varargs(&self) -> bool {
        self.is_last && self.class.stub.methods[self.method].access_flags & ACC_VARARGS != 0
    }

    fn has_name(&self) -> bool {
        self.stub().is_some_and(|p| p.name.is_some())
    }
}

pub struct BytecodeEnumConstant {
    class: ClassDeclaration,
    index: usize,
}

impl fmt::Debug for BytecodeEnumConstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BytecodeEnumConstant({}.{})", self.class.qualified_name(), self.name())
    }
}

impl Annotated for BytecodeEnumConstant {
    fn annotations(&self) -> Result<Vec<AnnotationRef>> {
        Ok(annotation_refs(&self.class.stub.fields[self.index].annotations, &self.class.solver))
    }
}

impl EnumConstantDeclaration for BytecodeEnumConstant {
    fn name(&self) -> String {
        self.class.stub.fields[self.index].name.clone()
    }

    fn declaring_type(&self) -> TypeDeclRef {
        Arc::new(self.class.clone())
    }
}

pub struct BytecodeAnnotationMember {
    class: ClassDeclaration,
    index: usize,
}

impl BytecodeAnnotationMember {
    fn method(&self) -> BytecodeMethod {
        BytecodeMethod::from((self.class.clone(), self.index))
    }
}

impl fmt::Debug for BytecodeAnnotationMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BytecodeAnnotationMember({}.{})", self.class.qualified_name(), self.name())
    }
}

impl Annotated for BytecodeAnnotationMember {
    fn annotations(&self) -> Result<Vec<AnnotationRef>> {
        self.method().annotations()
    }
}

impl AnnotationMemberDeclaration for BytecodeAnnotationMember {
    fn name(&self) -> String {
        self.class.stub.methods[self.index].name.clone()
    }

    fn ty(&self) -> Result<ResolvedType> {
        self.method().return_type()
    }

    fn default_value(&self) -> Result<Option<AnnotationValue>> {
        Ok(self.class.stub.methods[self.index]
            .annotation_default
            .as_ref()
            .map(decode_element))
    }

    fn declaring_type(&self) -> TypeDeclRef {
        Arc::new(self.class.clone())
    }
}

/// An annotation recorded in a class file.
pub struct BytecodeAnnotationExpr {
    annotation: Annotation,
    solver: TypeSolver,
}

impl fmt::Debug for BytecodeAnnotationExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BytecodeAnnotationExpr(@{})", self.annotation.type_name())
    }
}

impl ResolvedAnnotationExpr for BytecodeAnnotationExpr {
    /// Class files only know the binary name.
    fn name(&self) -> String {
        self.annotation.type_name()
    }

    fn qualified_name(&self) -> String {
        self.annotation.type_name()
    }

    fn declaration(&self) -> Result<Option<TypeDeclRef>> {
        Ok(self
            .solver
            .try_to_solve_type(&self.annotation.type_name())?
            .into_declaration())
    }

    fn values(&self) -> Result<Vec<(String, AnnotationValue)>> {
        Ok(self
            .annotation
            .elements
            .iter()
            .map(|(name, value)| (name.clone(), decode_element(value)))
            .collect())
    }
}
