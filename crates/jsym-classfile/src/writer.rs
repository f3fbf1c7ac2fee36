use crate::annotation::Annotation;
use crate::classfile::{ClassFile, ClassMember};
use crate::constant_pool::ConstantPool;

pub(crate) fn write_class(class: &ClassFile) -> Vec<u8> {
    let mut cp = ConstantPool::default();
    let mut body = Vec::new();

    put_u2(&mut body, class.access_flags);
    put_u2(&mut body, cp.class(&class.this_class));
    let super_index = class.super_class.as_deref().map_or(0, |name| cp.class(name));
    put_u2(&mut body, super_index);
    put_u2(&mut body, class.interfaces.len() as u16);
    for interface in &class.interfaces {
        put_u2(&mut body, cp.class(interface));
    }

    for members in [&class.fields, &class.methods] {
        put_u2(&mut body, members.len() as u16);
        for member in members {
            write_member(&mut body, &mut cp, member);
        }
    }

    let mut attrs = Attributes::default();
    if let Some(signature) = &class.signature {
        attrs.signature(&mut cp, signature);
    }
    attrs.annotations(&mut cp, "RuntimeVisibleAnnotations", &class.runtime_visible_annotations);
    attrs.annotations(
        &mut cp,
        "RuntimeInvisibleAnnotations",
        &class.runtime_invisible_annotations,
    );
    if !class.inner_classes.is_empty() {
        let mut info = Vec::new();
        put_u2(&mut info, class.inner_classes.len() as u16);
        for inner in &class.inner_classes {
            put_u2(&mut info, cp.class(&inner.inner_class));
            put_u2(
                &mut info,
                inner.outer_class.as_deref().map_or(0, |name| cp.class(name)),
            );
            put_u2(
                &mut info,
                inner.inner_name.as_deref().map_or(0, |name| cp.utf8(name)),
            );
            put_u2(&mut info, inner.access_flags);
        }
        attrs.push(&mut cp, "InnerClasses", info);
    }
    attrs.write(&mut body);

    let mut out = Vec::with_capacity(body.len() + 256);
    out.extend_from_slice(&0xCAFE_BABE_u32.to_be_bytes());
    put_u2(&mut out, class.minor_version);
    put_u2(&mut out, class.major_version);
    cp.write(&mut out);
    out.extend_from_slice(&body);
    out
}

fn write_member(out: &mut Vec<u8>, cp: &mut ConstantPool, member: &ClassMember) {
    put_u2(out, member.access_flags);
    put_u2(out, cp.utf8(&member.name));
    put_u2(out, cp.utf8(&member.descriptor));

    let mut attrs = Attributes::default();
    if let Some(signature) = &member.signature {
        attrs.signature(cp, signature);
    }
    attrs.annotations(cp, "RuntimeVisibleAnnotations", &member.runtime_visible_annotations);
    attrs.annotations(
        cp,
        "RuntimeInvisibleAnnotations",
        &member.runtime_invisible_annotations,
    );
    attrs.parameter_annotations(
        cp,
        "RuntimeVisibleParameterAnnotations",
        &member.runtime_visible_parameter_annotations,
    );
    attrs.parameter_annotations(
        cp,
        "RuntimeInvisibleParameterAnnotations",
        &member.runtime_invisible_parameter_annotations,
    );
    if !member.parameters.is_empty() {
        let mut info = vec![member.parameters.len() as u8];
        for param in &member.parameters {
            put_u2(&mut info, param.name.as_deref().map_or(0, |name| cp.utf8(name)));
            put_u2(&mut info, param.access_flags);
        }
        attrs.push(cp, "MethodParameters", info);
    }
    if let Some(default) = &member.annotation_default {
        let mut info = Vec::new();
        default.write(&mut info, cp);
        attrs.push(cp, "AnnotationDefault", info);
    }
    if !member.exceptions.is_empty() {
        let mut info = Vec::new();
        put_u2(&mut info, member.exceptions.len() as u16);
        for exception in &member.exceptions {
            put_u2(&mut info, cp.class(exception));
        }
        attrs.push(cp, "Exceptions", info);
    }
    attrs.write(out);
}

#[derive(Default)]
struct Attributes {
    entries: Vec<(u16, Vec<u8>)>,
}

impl Attributes {
    fn push(&mut self, cp: &mut ConstantPool, name: &str, info: Vec<u8>) {
        self.entries.push((cp.utf8(name), info));
    }

    fn signature(&mut self, cp: &mut ConstantPool, signature: &str) {
        let index = cp.utf8(signature);
        self.push(cp, "Signature", index.to_be_bytes().to_vec());
    }

    fn annotations(&mut self, cp: &mut ConstantPool, name: &str, annotations: &[Annotation]) {
        if annotations.is_empty() {
            return;
        }
        let mut info = Vec::new();
        put_u2(&mut info, annotations.len() as u16);
        for annotation in annotations {
            annotation.write(&mut info, cp);
        }
        self.push(cp, name, info);
    }

    fn parameter_annotations(
        &mut self,
        cp: &mut ConstantPool,
        name: &str,
        params: &[Vec<Annotation>],
    ) {
        if params.is_empty() {
            return;
        }
        let mut info = vec![params.len() as u8];
        for annotations in params {
            put_u2(&mut info, annotations.len() as u16);
            for annotation in annotations {
                annotation.write(&mut info, cp);
            }
        }
        self.push(cp, name, info);
    }

    fn write(self, out: &mut Vec<u8>) {
        put_u2(out, self.entries.len() as u16);
        for (name, info) in self.entries {
            put_u2(out, name);
            out.extend_from_slice(&(info.len() as u32).to_be_bytes());
            out.extend_from_slice(&info);
        }
    }
}

fn put_u2(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}
