//! Generic signature attribute grammar (JVMS 4.7.9.1).

use crate::descriptor::BaseType;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSignature {
    pub type_params: Vec<TypeParameter>,
    pub super_class: ClassTypeSignature,
    pub interfaces: Vec<ClassTypeSignature>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub type_params: Vec<TypeParameter>,
    pub params: Vec<TypeSignature>,
    /// `None` for `void`.
    pub return_type: Option<TypeSignature>,
    pub throws: Vec<FieldTypeSignature>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParameter {
    pub name: String,
    pub class_bound: Option<FieldTypeSignature>,
    pub interface_bounds: Vec<FieldTypeSignature>,
}

impl TypeParameter {
    pub fn bounds(&self) -> impl Iterator<Item = &FieldTypeSignature> {
        self.class_bound.iter().chain(self.interface_bounds.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSignature {
    Base(BaseType),
    Field(FieldTypeSignature),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldTypeSignature {
    Class(ClassTypeSignature),
    Array(Box<TypeSignature>),
    TypeVariable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassTypeSignature {
    /// Package in internal form (`java/util`), empty for the default package.
    pub package: String,
    /// Outermost class first; nested classes follow.
    pub segments: Vec<SimpleClassTypeSignature>,
}

impl ClassTypeSignature {
    /// Internal binary name, e.g. `java/util/Map$Entry`.
    pub fn internal_name(&self) -> String {
        let nested = self
            .segments
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join("$");
        if self.package.is_empty() {
            nested
        } else {
            format!("{}/{nested}", self.package)
        }
    }

    /// Type arguments applied to the innermost class.
    pub fn type_arguments(&self) -> &[TypeArgument] {
        self.segments
            .last()
            .map(|s| s.type_args.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleClassTypeSignature {
    pub name: String,
    pub type_args: Vec<TypeArgument>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeArgument {
    /// `*`
    Any,
    Exact(FieldTypeSignature),
    Extends(FieldTypeSignature),
    Super(FieldTypeSignature),
}

pub fn parse_class_signature(sig: &str) -> Result<ClassSignature> {
    let mut p = SigParser::new(sig);
    let type_params = p.type_params()?;
    let super_class = p.class_type()?;
    let mut interfaces = Vec::new();
    while !p.at_end() {
        interfaces.push(p.class_type()?);
    }
    Ok(ClassSignature {
        type_params,
        super_class,
        interfaces,
    })
}

pub fn parse_field_signature(sig: &str) -> Result<FieldTypeSignature> {
    let mut p = SigParser::new(sig);
    let ty = p.field_type()?;
    p.finish()?;
    Ok(ty)
}

pub fn parse_method_signature(sig: &str) -> Result<MethodSignature> {
    let mut p = SigParser::new(sig);
    let type_params = p.type_params()?;
    p.expect('(')?;
    let mut params = Vec::new();
    while !p.eat(')') {
        params.push(p.type_sig()?);
    }
    let return_type = if p.eat('V') {
        None
    } else {
        Some(p.type_sig()?)
    };
    let mut throws = Vec::new();
    while p.eat('^') {
        throws.push(p.field_type()?);
    }
    p.finish()?;
    Ok(MethodSignature {
        type_params,
        params,
        return_type,
        throws,
    })
}

struct SigParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> SigParser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn error(&self) -> Error {
        Error::InvalidSignature(self.input.to_string())
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> Result<()> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.error())
        }
    }

    fn finish(&self) -> Result<()> {
        if self.at_end() {
            Ok(())
        } else {
            Err(self.error())
        }
    }

    fn identifier(&mut self) -> Result<&'a str> {
        let rest = &self.input[self.pos..];
        let len = rest
            .find(|c| matches!(c, '.' | ';' | '[' | '/' | '<' | '>' | ':'))
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(self.error());
        }
        self.pos += len;
        Ok(&rest[..len])
    }

    fn type_params(&mut self) -> Result<Vec<TypeParameter>> {
        let mut params = Vec::new();
        if !self.eat('<') {
            return Ok(params);
        }
        while !self.eat('>') {
            let name = self.identifier()?.to_string();
            self.expect(':')?;
            let class_bound = match self.peek() {
                Some(':') | None => None,
                Some(_) => Some(self.field_type()?),
            };
            let mut interface_bounds = Vec::new();
            while self.eat(':') {
                interface_bounds.push(self.field_type()?);
            }
            params.push(TypeParameter {
                name,
                class_bound,
                interface_bounds,
            });
        }
        if params.is_empty() {
            return Err(self.error());
        }
        Ok(params)
    }

    fn type_sig(&mut self) -> Result<TypeSignature> {
        if let Some(base) = self.peek().and_then(BaseType::from_descriptor_char) {
            self.pos += 1;
            return Ok(TypeSignature::Base(base));
        }
        Ok(TypeSignature::Field(self.field_type()?))
    }

    fn field_type(&mut self) -> Result<FieldTypeSignature> {
        match self.peek() {
            Some('L') => Ok(FieldTypeSignature::Class(self.class_type()?)),
            Some('[') => {
                self.pos += 1;
                Ok(FieldTypeSignature::Array(Box::new(self.type_sig()?)))
            }
            Some('T') => {
                self.pos += 1;
                let name = self.identifier()?.to_string();
                self.expect(';')?;
                Ok(FieldTypeSignature::TypeVariable(name))
            }
            _ => Err(self.error()),
        }
    }

    fn class_type(&mut self) -> Result<ClassTypeSignature> {
        self.expect('L')?;
        let mut package = Vec::new();
        let mut name = self.identifier()?;
        while self.eat('/') {
            package.push(name);
            name = self.identifier()?;
        }

        let mut segments = Vec::new();
        loop {
            let type_args = self.type_args()?;
            segments.push(SimpleClassTypeSignature {
                name: name.to_string(),
                type_args,
            });
            if self.eat(';') {
                break;
            }
            self.expect('.')?;
            name = self.identifier()?;
        }

        Ok(ClassTypeSignature {
            package: package.join("/"),
            segments,
        })
    }

    fn type_args(&mut self) -> Result<Vec<TypeArgument>> {
        let mut args = Vec::new();
        if !self.eat('<') {
            return Ok(args);
        }
        while !self.eat('>') {
            let arg = if self.eat('*') {
                TypeArgument::Any
            } else if self.eat('+') {
                TypeArgument::Extends(self.field_type()?)
            } else if self.eat('-') {
                TypeArgument::Super(self.field_type()?)
            } else {
                TypeArgument::Exact(self.field_type()?)
            };
            args.push(arg);
        }
        if args.is_empty() {
            return Err(self.error());
        }
        Ok(args)
    }
}
