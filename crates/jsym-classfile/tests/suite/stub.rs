use jsym_classfile::access::{ACC_ENUM, ACC_FINAL, ACC_PUBLIC, ACC_STATIC, ACC_SUPER};
use jsym_classfile::{
    Annotation, ClassFile, ClassMember, FieldType, FieldTypeSignature, MethodParameter,
};
use pretty_assertions::assert_eq;

#[test]
fn stub_merges_visible_and_invisible_annotations() {
    let mut class = ClassFile::new(ACC_PUBLIC | ACC_SUPER, "a/b/Outer$Inner", Some("java/lang/Object"));
    class
        .runtime_visible_annotations
        .push(Annotation::new("La/Visible;", Vec::new()));
    class
        .runtime_invisible_annotations
        .push(Annotation::new("La/Hidden;", Vec::new()));

    let stub = ClassFile::parse(&class.to_bytes()).unwrap().stub().unwrap();

    assert_eq!(stub.qualified_name(), "a.b.Outer.Inner");
    let names: Vec<_> = stub.annotations.iter().map(Annotation::type_name).collect();
    assert_eq!(names, vec!["a.Visible".to_string(), "a.Hidden".to_string()]);
}

#[test]
fn stub_parses_descriptors_signatures_and_parameters() {
    let mut class = ClassFile::new(
        ACC_PUBLIC | ACC_FINAL | ACC_SUPER | ACC_ENUM,
        "a/Color",
        Some("java/lang/Enum"),
    );
    class.signature = Some("Ljava/lang/Enum<La/Color;>;".to_string());
    class.fields.push(ClassMember::new(
        ACC_PUBLIC | ACC_STATIC | ACC_FINAL | ACC_ENUM,
        "RED",
        "La/Color;",
    ));

    let mut mix = ClassMember::new(ACC_PUBLIC, "mix", "(La/Color;[I)La/Color;");
    mix.parameters = vec![MethodParameter {
        name: Some("other".to_string()),
        access_flags: 0,
    }];
    mix.runtime_invisible_parameter_annotations =
        vec![Vec::new(), vec![Annotation::new("La/Weights;", Vec::new())]];
    class.methods.push(mix);

    let stub = ClassFile::parse(&class.to_bytes()).unwrap().stub().unwrap();
    assert!(stub.is_enum());
    assert!(!stub.is_interface());

    let sig = stub.signature.as_ref().unwrap();
    assert_eq!(sig.super_class.internal_name(), "java/lang/Enum");
    assert!(matches!(
        sig.super_class.type_arguments(),
        [jsym_classfile::TypeArgument::Exact(FieldTypeSignature::Class(_))]
    ));

    assert_eq!(
        stub.fields[0].parsed_descriptor,
        FieldType::Object("a/Color".to_string())
    );

    let mix = &stub.methods[0];
    assert_eq!(mix.parameters.len(), 2);
    assert_eq!(mix.parameters[0].name.as_deref(), Some("other"));
    assert_eq!(mix.parameters[1].name, None);
    assert!(mix.parameters[0].annotations.is_empty());
    assert_eq!(mix.parameters[1].annotations[0].type_name(), "a.Weights");
    assert!(mix.signature.is_none());
}
