use crate::constant_pool::{ConstantPool, CpInfo};
use crate::error::{Error, Result};
use crate::reader::Reader;

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Field descriptor of the annotation type, e.g. `Ljava/lang/Deprecated;`.
    pub type_descriptor: String,
    pub type_internal_name: Option<String>,
    pub elements: Vec<(String, ElementValue)>,
}

impl Annotation {
    pub fn new(type_descriptor: impl Into<String>, elements: Vec<(String, ElementValue)>) -> Self {
        let type_descriptor = type_descriptor.into();
        let type_internal_name = descriptor_to_internal_name(&type_descriptor);
        Self {
            type_descriptor,
            type_internal_name,
            elements,
        }
    }

    /// Source-level qualified name, e.g. `java.lang.Deprecated`.
    pub fn type_name(&self) -> String {
        match &self.type_internal_name {
            Some(internal) => internal.replace(['/', '$'], "."),
            None => self.type_descriptor.clone(),
        }
    }

    pub fn element(&self, name: &str) -> Option<&ElementValue> {
        self.elements
            .iter()
            .find(|(element, _)| element == name)
            .map(|(_, value)| value)
    }

    pub(crate) fn parse(
        reader: &mut Reader<'_>,
        cp: &ConstantPool,
        attribute: &'static str,
    ) -> Result<Self> {
        let type_descriptor = cp.get_utf8(reader.read_u2()?)?.to_string();
        let pairs = reader.read_u2()? as usize;
        let mut elements = Vec::with_capacity(pairs);
        for _ in 0..pairs {
            let name = cp.get_utf8(reader.read_u2()?)?.to_string();
            let value = ElementValue::parse(reader, cp, attribute)?;
            elements.push((name, value));
        }
        Ok(Self::new(type_descriptor, elements))
    }

    pub(crate) fn write(&self, out: &mut Vec<u8>, cp: &mut ConstantPool) {
        out.extend_from_slice(&cp.utf8(&self.type_descriptor).to_be_bytes());
        out.extend_from_slice(&(self.elements.len() as u16).to_be_bytes());
        for (name, value) in &self.elements {
            out.extend_from_slice(&cp.utf8(name).to_be_bytes());
            value.write(out, cp);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementValue {
    Const(ConstValue),
    Enum {
        type_descriptor: String,
        const_name: String,
    },
    /// Return descriptor of a class literal, e.g. `Ljava/lang/String;` or `V`.
    Class(String),
    Annotation(Box<Annotation>),
    Array(Vec<ElementValue>),
}

impl ElementValue {
    pub(crate) fn parse(
        reader: &mut Reader<'_>,
        cp: &ConstantPool,
        attribute: &'static str,
    ) -> Result<Self> {
        let tag = reader.read_u1()? as char;
        let value = match tag {
            'B' | 'C' | 'I' | 'S' | 'Z' => {
                let index = reader.read_u2()?;
                let value = match cp.get(index)? {
                    CpInfo::Integer(v) => *v,
                    other => return Err(mismatch(index, "Integer", other)),
                };
                ElementValue::Const(match tag {
                    'B' => ConstValue::Byte(value as i8),
                    'C' => ConstValue::Char(
                        char::from_u32(value as u32).ok_or(Error::MalformedAttribute(attribute))?,
                    ),
                    'S' => ConstValue::Short(value as i16),
                    'Z' => ConstValue::Boolean(value != 0),
                    _ => ConstValue::Int(value),
                })
            }
            'D' => {
                let index = reader.read_u2()?;
                match cp.get(index)? {
                    CpInfo::Double(v) => ElementValue::Const(ConstValue::Double(*v)),
                    other => return Err(mismatch(index, "Double", other)),
                }
            }
            'F' => {
                let index = reader.read_u2()?;
                match cp.get(index)? {
                    CpInfo::Float(v) => ElementValue::Const(ConstValue::Float(*v)),
                    other => return Err(mismatch(index, "Float", other)),
                }
            }
            'J' => {
                let index = reader.read_u2()?;
                match cp.get(index)? {
                    CpInfo::Long(v) => ElementValue::Const(ConstValue::Long(*v)),
                    other => return Err(mismatch(index, "Long", other)),
                }
            }
            's' => ElementValue::Const(ConstValue::String(
                cp.get_string_constant(reader.read_u2()?)?,
            )),
            'e' => {
                let type_descriptor = cp.get_utf8(reader.read_u2()?)?.to_string();
                let const_name = cp.get_utf8(reader.read_u2()?)?.to_string();
                ElementValue::Enum {
                    type_descriptor,
                    const_name,
                }
            }
            'c' => ElementValue::Class(cp.get_utf8(reader.read_u2()?)?.to_string()),
            '@' => ElementValue::Annotation(Box::new(Annotation::parse(reader, cp, attribute)?)),
            '[' => {
                let count = reader.read_u2()? as usize;
                let mut values = Vec::with_capacity(count);
                for _ in 0..count {
                    values.push(ElementValue::parse(reader, cp, attribute)?);
                }
                ElementValue::Array(values)
            }
            _ => return Err(Error::MalformedAttribute(attribute)),
        };
        Ok(value)
    }

    pub(crate) fn write(&self, out: &mut Vec<u8>, cp: &mut ConstantPool) {
        let put = |out: &mut Vec<u8>, tag: char, index: u16| {
            out.push(tag as u8);
            out.extend_from_slice(&index.to_be_bytes());
        };
        match self {
            ElementValue::Const(value) => {
                let (tag, info) = match value {
                    ConstValue::Byte(v) => ('B', CpInfo::Integer(i32::from(*v))),
                    ConstValue::Char(v) => ('C', CpInfo::Integer(*v as i32)),
                    ConstValue::Short(v) => ('S', CpInfo::Integer(i32::from(*v))),
                    ConstValue::Boolean(v) => ('Z', CpInfo::Integer(i32::from(*v))),
                    ConstValue::Int(v) => ('I', CpInfo::Integer(*v)),
                    ConstValue::Long(v) => ('J', CpInfo::Long(*v)),
                    ConstValue::Float(v) => ('F', CpInfo::Float(*v)),
                    ConstValue::Double(v) => ('D', CpInfo::Double(*v)),
                    ConstValue::String(v) => ('s', CpInfo::Utf8(v.clone())),
                };
                let index = cp.intern(info);
                put(out, tag, index);
            }
            ElementValue::Enum {
                type_descriptor,
                const_name,
            } => {
                let type_index = cp.utf8(type_descriptor);
                put(out, 'e', type_index);
                out.extend_from_slice(&cp.utf8(const_name).to_be_bytes());
            }
            ElementValue::Class(descriptor) => {
                let index = cp.utf8(descriptor);
                put(out, 'c', index);
            }
            ElementValue::Annotation(annotation) => {
                out.push(b'@');
                annotation.write(out, cp);
            }
            ElementValue::Array(values) => {
                put(out, '[', values.len() as u16);
                for value in values {
                    value.write(out, cp);
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    Byte(i8),
    Char(char),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    String(String),
}

fn mismatch(index: u16, expected: &'static str, found: &CpInfo) -> Error {
    Error::ConstantPoolTypeMismatch {
        index,
        expected,
        found: found.kind(),
    }
}

pub fn descriptor_to_internal_name(desc: &str) -> Option<String> {
    desc.strip_prefix('L')
        .and_then(|rest| rest.strip_suffix(';'))
        .map(str::to_string)
}
