use crate::annotation::{Annotation, ElementValue};
use crate::constant_pool::ConstantPool;
use crate::error::{Error, Result};
use crate::reader::Reader;

const MAGIC: u32 = 0xCAFE_BABE;

#[derive(Debug, Clone, Default)]
pub struct ClassFile {
    pub minor_version: u16,
    pub major_version: u16,
    pub access_flags: u16,
    /// Internal name, e.g. `com/example/Outer$Inner`.
    pub this_class: String,
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
    pub fields: Vec<ClassMember>,
    pub methods: Vec<ClassMember>,
    pub signature: Option<String>,
    pub runtime_visible_annotations: Vec<Annotation>,
    pub runtime_invisible_annotations: Vec<Annotation>,
    pub inner_classes: Vec<InnerClassInfo>,
}

#[derive(Debug, Clone, Default)]
pub struct ClassMember {
    pub access_flags: u16,
    pub name: String,
    pub descriptor: String,
    pub signature: Option<String>,
    pub runtime_visible_annotations: Vec<Annotation>,
    pub runtime_invisible_annotations: Vec<Annotation>,
    /// `MethodParameters`; empty when the attribute is absent.
    pub parameters: Vec<MethodParameter>,
    pub runtime_visible_parameter_annotations: Vec<Vec<Annotation>>,
    pub runtime_invisible_parameter_annotations: Vec<Vec<Annotation>>,
    /// `AnnotationDefault` of an annotation type element.
    pub annotation_default: Option<ElementValue>,
    /// Internal names from the `Exceptions` attribute.
    pub exceptions: Vec<String>,
}

impl ClassMember {
    pub fn new(access_flags: u16, name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self {
            access_flags,
            name: name.into(),
            descriptor: descriptor.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodParameter {
    pub name: Option<String>,
    pub access_flags: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnerClassInfo {
    pub inner_class: String,
    pub outer_class: Option<String>,
    pub inner_name: Option<String>,
    pub access_flags: u16,
}

impl ClassFile {
    /// An empty Java 8 class file for `this_class`.
    pub fn new(access_flags: u16, this_class: impl Into<String>, super_class: Option<&str>) -> Self {
        Self {
            major_version: 52,
            access_flags,
            this_class: this_class.into(),
            super_class: super_class.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes);
        let magic = reader.read_u4()?;
        if magic != MAGIC {
            return Err(Error::InvalidMagic(magic));
        }

        let minor_version = reader.read_u2()?;
        let major_version = reader.read_u2()?;
        let cp = ConstantPool::parse(&mut reader)?;

        let access_flags = reader.read_u2()?;
        let this_class = cp.get_class_name(reader.read_u2()?)?;
        let super_class = match reader.read_u2()? {
            0 => None,
            index => Some(cp.get_class_name(index)?),
        };

        let interfaces_count = reader.read_u2()? as usize;
        let mut interfaces = Vec::with_capacity(interfaces_count);
        for _ in 0..interfaces_count {
            interfaces.push(cp.get_class_name(reader.read_u2()?)?);
        }

        let fields = parse_members(&mut reader, &cp)?;
        let methods = parse_members(&mut reader, &cp)?;
        let attrs = parse_attributes(&mut reader, &cp)?;
        reader.ensure_empty()?;

        Ok(Self {
            minor_version,
            major_version,
            access_flags,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            signature: attrs.signature,
            runtime_visible_annotations: attrs.runtime_visible_annotations,
            runtime_invisible_annotations: attrs.runtime_invisible_annotations,
            inner_classes: attrs.inner_classes,
        })
    }

    /// Serialize into class file bytes (no `Code` attributes are emitted).
    pub fn to_bytes(&self) -> Vec<u8> {
        crate::writer::write_class(self)
    }
}

fn parse_members(reader: &mut Reader<'_>, cp: &ConstantPool) -> Result<Vec<ClassMember>> {
    let count = reader.read_u2()? as usize;
    let mut members = Vec::with_capacity(count);
    for _ in 0..count {
        let access_flags = reader.read_u2()?;
        let name = cp.get_utf8(reader.read_u2()?)?.to_string();
        let descriptor = cp.get_utf8(reader.read_u2()?)?.to_string();
        let attrs = parse_attributes(reader, cp)?;
        members.push(ClassMember {
            access_flags,
            name,
            descriptor,
            signature: attrs.signature,
            runtime_visible_annotations: attrs.runtime_visible_annotations,
            runtime_invisible_annotations: attrs.runtime_invisible_annotations,
            parameters: attrs.parameters,
            runtime_visible_parameter_annotations: attrs.runtime_visible_parameter_annotations,
            runtime_invisible_parameter_annotations: attrs.runtime_invisible_parameter_annotations,
            annotation_default: attrs.annotation_default,
            exceptions: attrs.exceptions,
        });
    }
    Ok(members)
}

#[derive(Default)]
struct ParsedAttributes {
    signature: Option<String>,
    runtime_visible_annotations: Vec<Annotation>,
    runtime_invisible_annotations: Vec<Annotation>,
    inner_classes: Vec<InnerClassInfo>,
    parameters: Vec<MethodParameter>,
    runtime_visible_parameter_annotations: Vec<Vec<Annotation>>,
    runtime_invisible_parameter_annotations: Vec<Vec<Annotation>>,
    annotation_default: Option<ElementValue>,
    exceptions: Vec<String>,
}

fn parse_attributes(reader: &mut Reader<'_>, cp: &ConstantPool) -> Result<ParsedAttributes> {
    let count = reader.read_u2()? as usize;
    let mut parsed = ParsedAttributes::default();
    for _ in 0..count {
        let name = cp.get_utf8(reader.read_u2()?)?;
        let length = reader.read_u4()? as usize;
        let mut sub = Reader::new(reader.read_bytes(length)?);

        match name {
            "Signature" => {
                parsed.signature = Some(cp.get_utf8(sub.read_u2()?)?.to_string());
            }
            "RuntimeVisibleAnnotations" => {
                parsed.runtime_visible_annotations =
                    parse_annotations(&mut sub, cp, "RuntimeVisibleAnnotations")?;
            }
            "RuntimeInvisibleAnnotations" => {
                parsed.runtime_invisible_annotations =
                    parse_annotations(&mut sub, cp, "RuntimeInvisibleAnnotations")?;
            }
            "RuntimeVisibleParameterAnnotations" => {
                parsed.runtime_visible_parameter_annotations =
                    parse_parameter_annotations(&mut sub, cp, "RuntimeVisibleParameterAnnotations")?;
            }
            "RuntimeInvisibleParameterAnnotations" => {
                parsed.runtime_invisible_parameter_annotations = parse_parameter_annotations(
                    &mut sub,
                    cp,
                    "RuntimeInvisibleParameterAnnotations",
                )?;
            }
            "MethodParameters" => {
                let count = sub.read_u1()? as usize;
                for _ in 0..count {
                    let name = match sub.read_u2()? {
                        0 => None,
                        index => Some(cp.get_utf8(index)?.to_string()),
                    };
                    let access_flags = sub.read_u2()?;
                    parsed.parameters.push(MethodParameter { name, access_flags });
                }
            }
            "AnnotationDefault" => {
                parsed.annotation_default =
                    Some(ElementValue::parse(&mut sub, cp, "AnnotationDefault")?);
            }
            "Exceptions" => {
                let count = sub.read_u2()? as usize;
                for _ in 0..count {
                    parsed.exceptions.push(cp.get_class_name(sub.read_u2()?)?);
                }
            }
            "InnerClasses" => {
                let count = sub.read_u2()? as usize;
                for _ in 0..count {
                    let inner_class = cp.get_class_name(sub.read_u2()?)?;
                    let outer_class = match sub.read_u2()? {
                        0 => None,
                        index => Some(cp.get_class_name(index)?),
                    };
                    let inner_name = match sub.read_u2()? {
                        0 => None,
                        index => Some(cp.get_utf8(index)?.to_string()),
                    };
                    let access_flags = sub.read_u2()?;
                    parsed.inner_classes.push(InnerClassInfo {
                        inner_class,
                        outer_class,
                        inner_name,
                        access_flags,
                    });
                }
            }
            // Code, LineNumberTable and the rest carry nothing resolution needs.
            _ => continue,
        }
        sub.ensure_empty()?;
    }
    Ok(parsed)
}

fn parse_annotations(
    reader: &mut Reader<'_>,
    cp: &ConstantPool,
    attribute: &'static str,
) -> Result<Vec<Annotation>> {
    let count = reader.read_u2()? as usize;
    let mut annotations = Vec::with_capacity(count);
    for _ in 0..count {
        annotations.push(Annotation::parse(reader, cp, attribute)?);
    }
    Ok(annotations)
}

fn parse_parameter_annotations(
    reader: &mut Reader<'_>,
    cp: &ConstantPool,
    attribute: &'static str,
) -> Result<Vec<Vec<Annotation>>> {
    let count = reader.read_u1()? as usize;
    (0..count)
        .map(|_| parse_annotations(reader, cp, attribute))
        .collect()
}
