use crate::access::{ACC_ANNOTATION, ACC_ENUM, ACC_INTERFACE};
use crate::annotation::{Annotation, ElementValue};
use crate::classfile::{ClassFile, ClassMember, InnerClassInfo};
use crate::descriptor::{parse_field_descriptor, parse_method_descriptor, FieldType, MethodDescriptor};
use crate::error::Result;
use crate::signature::{
    parse_class_signature, parse_field_signature, parse_method_signature, ClassSignature,
    FieldTypeSignature, MethodSignature,
};

/// Decoded view of a class file: descriptors and signatures parsed,
/// visible and invisible annotations merged.
#[derive(Debug, Clone)]
pub struct ClassStub {
    pub internal_name: String,
    pub access_flags: u16,
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
    pub signature: Option<ClassSignature>,
    pub annotations: Vec<Annotation>,
    pub inner_classes: Vec<InnerClassInfo>,
    pub fields: Vec<FieldStub>,
    pub methods: Vec<MethodStub>,
}

#[derive(Debug, Clone)]
pub struct FieldStub {
    pub access_flags: u16,
    pub name: String,
    pub descriptor: String,
    pub parsed_descriptor: FieldType,
    pub signature: Option<FieldTypeSignature>,
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone)]
pub struct MethodStub {
    pub access_flags: u16,
    pub name: String,
    pub descriptor: String,
    pub parsed_descriptor: MethodDescriptor,
    pub signature: Option<MethodSignature>,
    pub annotations: Vec<Annotation>,
    pub parameters: Vec<ParameterStub>,
    pub annotation_default: Option<ElementValue>,
    /// `throws` clause as internal names, from the `Exceptions` attribute.
    pub exceptions: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ParameterStub {
    /// From `MethodParameters`, when the class was compiled with it.
    pub name: Option<String>,
    pub annotations: Vec<Annotation>,
}

impl ClassStub {
    pub fn from_classfile(class: &ClassFile) -> Result<Self> {
        let signature = class
            .signature
            .as_deref()
            .map(parse_class_signature)
            .transpose()?;

        let fields = class
            .fields
            .iter()
            .map(|f| {
                Ok(FieldStub {
                    access_flags: f.access_flags,
                    name: f.name.clone(),
                    descriptor: f.descriptor.clone(),
                    parsed_descriptor: parse_field_descriptor(&f.descriptor)?,
                    signature: f.signature.as_deref().map(parse_field_signature).transpose()?,
                    annotations: merged(&f.runtime_visible_annotations, &f.runtime_invisible_annotations),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let methods = class
            .methods
            .iter()
            .map(|m| {
                let parsed_descriptor = parse_method_descriptor(&m.descriptor)?;
                let parameters = parameters(m, parsed_descriptor.params.len());
                Ok(MethodStub {
                    access_flags: m.access_flags,
                    name: m.name.clone(),
                    descriptor: m.descriptor.clone(),
                    parsed_descriptor,
                    signature: m.signature.as_deref().map(parse_method_signature).transpose()?,
                    annotations: merged(&m.runtime_visible_annotations, &m.runtime_invisible_annotations),
                    parameters,
                    annotation_default: m.annotation_default.clone(),
                    exceptions: m.exceptions.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ClassStub {
            internal_name: class.this_class.clone(),
            access_flags: class.access_flags,
            super_class: class.super_class.clone(),
            interfaces: class.interfaces.clone(),
            signature,
            annotations: merged(
                &class.runtime_visible_annotations,
                &class.runtime_invisible_annotations,
            ),
            inner_classes: class.inner_classes.clone(),
            fields,
            methods,
        })
    }

    /// Source-level qualified name (`$` separators become `.`).
    pub fn qualified_name(&self) -> String {
        self.internal_name.replace(['/', '$'], ".")
    }

    pub fn is_interface(&self) -> bool {
        self.access_flags & ACC_INTERFACE != 0
    }

    pub fn is_annotation(&self) -> bool {
        self.access_flags & ACC_ANNOTATION != 0
    }

    pub fn is_enum(&self) -> bool {
        self.access_flags & ACC_ENUM != 0
    }
}

impl ClassFile {
    pub fn stub(&self) -> Result<ClassStub> {
        ClassStub::from_classfile(self)
    }
}

fn merged(visible: &[Annotation], invisible: &[Annotation]) -> Vec<Annotation> {
    visible.iter().chain(invisible).cloned().collect()
}

fn parameters(method: &ClassMember, count: usize) -> Vec<ParameterStub> {
    (0..count)
        .map(|i| {
            let name = method.parameters.get(i).and_then(|p| p.name.clone());
            let mut annotations = Vec::new();
            for table in [
                &method.runtime_visible_parameter_annotations,
                &method.runtime_invisible_parameter_annotations,
            ] {
                if let Some(anns) = table.get(i) {
                    annotations.extend(anns.iter().cloned());
                }
            }
            ParameterStub { name, annotations }
        })
        .collect()
}
