use jsym_types::{AnnotationValue, TypeSolver};
use pretty_assertions::assert_eq;

use super::fixture::world;

const SOURCES: &[&str] = &[
    r#"
    package p;

    import java.lang.annotation.ElementType;
    import java.lang.annotation.Inherited;
    import java.lang.annotation.Retention;
    import java.lang.annotation.RetentionPolicy;

    @Inherited
    @Retention(RetentionPolicy.RUNTIME)
    public @interface Foo {
        String value();
        String other() default "fallback";
        int[] sizes() default {1, 2};
        ElementType target() default ElementType.TYPE;
    }
    "#,
    r#"
    package p;

    @Foo("v")
    @Deprecated
    class Annotated {}

    @Foo(value = "w", sizes = {3}, target = java.lang.annotation.ElementType.FIELD)
    class Full {}
    "#,
];

fn solve(solver: &TypeSolver, name: &str) -> jsym_types::TypeDeclRef {
    solver.solve_type(name).unwrap()
}

#[test]
fn single_member_values_belong_to_value() {
    let world = world(SOURCES);
    let annotated = solve(&world.solver, "p.Annotated");

    let foo = annotated.annotation("p.Foo").unwrap().unwrap();
    assert_eq!(foo.qualified_name(), "p.Foo");
    assert_eq!(foo.value("value").unwrap(), Some(AnnotationValue::String("v".into())));
    assert_eq!(foo.value("other").unwrap(), None);

    assert!(annotated.has_annotation("Foo").unwrap());
    assert!(annotated.has_annotation("java.lang.Deprecated").unwrap());
    assert!(!annotated.has_annotation("p.Missing").unwrap());
}

#[test]
fn named_members_decode_arrays_and_enums() {
    let world = world(SOURCES);
    let full = solve(&world.solver, "p.Full");
    let foo = full.annotation("Foo").unwrap().unwrap();

    let values = foo.values().unwrap();
    assert_eq!(
        values,
        vec![
            ("value".to_string(), AnnotationValue::String("w".into())),
            ("sizes".to_string(), AnnotationValue::Array(vec![AnnotationValue::Int(3)])),
            (
                "target".to_string(),
                AnnotationValue::Enum {
                    type_name: "java.lang.annotation.ElementType".into(),
                    constant: "FIELD".into(),
                }
            ),
        ]
    );
}

#[test]
fn annotation_members_expose_defaults() {
    let world = world(SOURCES);
    let foo = solve(&world.solver, "p.Foo");
    assert!(foo.is_annotation());
    assert!(foo.is_inheritable().unwrap());

    let members = foo.annotation_members().unwrap();
    let names: Vec<String> = members.iter().map(|m| m.name()).collect();
    assert_eq!(names, vec!["value", "other", "sizes", "target"]);

    assert_eq!(members[0].default_value().unwrap(), None);
    assert_eq!(
        members[1].default_value().unwrap(),
        Some(AnnotationValue::String("fallback".into()))
    );
    assert_eq!(
        members[2].default_value().unwrap(),
        Some(AnnotationValue::Array(vec![AnnotationValue::Int(1), AnnotationValue::Int(2)]))
    );
    assert_eq!(members[1].ty().unwrap().describe(), "java.lang.String");
    assert_eq!(members[2].ty().unwrap().describe(), "int[]");
}

#[test]
fn runtime_annotations_carry_their_meta_annotations() {
    let world = world(&[]);
    let override_type = solve(&world.solver, "java.lang.Override");
    assert!(override_type.is_annotation());
    assert!(!override_type.is_inheritable().unwrap());

    let functional = solve(&world.solver, "java.lang.FunctionalInterface");
    let retention = functional
        .annotation("java.lang.annotation.Retention")
        .unwrap()
        .unwrap();
    assert_eq!(
        retention.value("value").unwrap(),
        Some(AnnotationValue::Enum {
            type_name: "java.lang.annotation.RetentionPolicy".into(),
            constant: "RUNTIME".into(),
        })
    );
}
