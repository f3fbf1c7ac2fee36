use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
}

impl BaseType {
    pub fn from_descriptor_char(c: char) -> Option<Self> {
        Some(match c {
            'B' => BaseType::Byte,
            'C' => BaseType::Char,
            'D' => BaseType::Double,
            'F' => BaseType::Float,
            'I' => BaseType::Int,
            'J' => BaseType::Long,
            'S' => BaseType::Short,
            'Z' => BaseType::Boolean,
            _ => return None,
        })
    }

    /// Java source keyword for this type.
    pub fn keyword(self) -> &'static str {
        match self {
            BaseType::Byte => "byte",
            BaseType::Char => "char",
            BaseType::Double => "double",
            BaseType::Float => "float",
            BaseType::Int => "int",
            BaseType::Long => "long",
            BaseType::Short => "short",
            BaseType::Boolean => "boolean",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Base(BaseType),
    /// Internal name, e.g. `java/lang/String`.
    Object(String),
    Array(Box<FieldType>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnType {
    Void,
    Type(FieldType),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub params: Vec<FieldType>,
    pub return_type: ReturnType,
}

pub fn parse_field_descriptor(desc: &str) -> Result<FieldType> {
    match parse_field_type(desc) {
        Some((ty, "")) => Ok(ty),
        _ => Err(Error::InvalidDescriptor(desc.to_string())),
    }
}

pub fn parse_method_descriptor(desc: &str) -> Result<MethodDescriptor> {
    let invalid = || Error::InvalidDescriptor(desc.to_string());

    let mut rest = desc.strip_prefix('(').ok_or_else(invalid)?;
    let mut params = Vec::new();
    while !rest.starts_with(')') {
        let (param, tail) = parse_field_type(rest).ok_or_else(invalid)?;
        params.push(param);
        rest = tail;
    }
    let rest = &rest[1..];

    let return_type = if rest == "V" {
        ReturnType::Void
    } else {
        match parse_field_type(rest) {
            Some((ty, "")) => ReturnType::Type(ty),
            _ => return Err(invalid()),
        }
    };

    Ok(MethodDescriptor {
        params,
        return_type,
    })
}

fn parse_field_type(input: &str) -> Option<(FieldType, &str)> {
    let first = input.chars().next()?;
    if let Some(base) = BaseType::from_descriptor_char(first) {
        return Some((FieldType::Base(base), &input[1..]));
    }
    match first {
        'L' => {
            let end = input.find(';')?;
            Some((FieldType::Object(input[1..end].to_string()), &input[end + 1..]))
        }
        '[' => {
            let (component, rest) = parse_field_type(&input[1..])?;
            Some((FieldType::Array(Box::new(component)), rest))
        }
        _ => None,
    }
}
