#![forbid(unsafe_code)]

pub mod access;
mod annotation;
mod classfile;
mod constant_pool;
mod descriptor;
mod error;
mod reader;
mod signature;
mod stub;
mod writer;

pub use crate::annotation::{descriptor_to_internal_name, Annotation, ConstValue, ElementValue};
pub use crate::classfile::{ClassFile, ClassMember, InnerClassInfo, MethodParameter};
pub use crate::descriptor::{parse_field_descriptor, parse_method_descriptor};
pub use crate::descriptor::{BaseType, FieldType, MethodDescriptor, ReturnType};
pub use crate::error::{Error, Result};
pub use crate::signature::{
    parse_class_signature, parse_field_signature, parse_method_signature, ClassSignature,
    ClassTypeSignature, FieldTypeSignature, MethodSignature, SimpleClassTypeSignature,
    TypeArgument, TypeParameter, TypeSignature,
};
pub use crate::stub::{ClassStub, FieldStub, MethodStub, ParameterStub};
