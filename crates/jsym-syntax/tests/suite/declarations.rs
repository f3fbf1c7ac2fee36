use jsym_syntax::{
    parse, AnnotationArgs, Expr, Literal, Modifier, NodeKind, PrimitiveKind, TypeDeclKind,
    TypeRefKind,
};
use pretty_assertions::assert_eq;

use super::assert_parent_links;

const SOURCE: &str = r#"
package com.example;

import java.util.List;
import java.util.*;
import static java.lang.Math.max;

/** A box. */
public class Box<T extends Comparable<T>> extends Base implements Iterable<T>, java.io.Serializable {
    private final List<T> items = new java.util.ArrayList<>(), spare;
    int[] counts[];

    public Box() {}

    /** Adds an item. */
    @Deprecated
    public <R> R add(T item, String... tags) throws java.io.IOException { return null; }

    static class Inner {}

    enum Color { RED, GREEN("g") { }, ; int x; }
}

@interface Marker {
    String value() default "x";
    int[] ids() default {1, 2};
}
"#;

#[test]
fn package_and_imports() {
    let tree = parse(SOURCE).unwrap();
    assert_eq!(tree.package_name(), "com.example");

    let imports: Vec<_> = tree
        .compilation_unit()
        .imports
        .iter()
        .map(|i| (i.name.as_str(), i.is_static, i.is_on_demand))
        .collect();
    assert_eq!(
        imports,
        vec![
            ("java.util.List", false, false),
            ("java.util", false, true),
            ("java.lang.Math.max", true, false),
        ]
    );
}

#[test]
fn class_header() {
    let tree = parse(SOURCE).unwrap();
    let id = tree.find_type("Box").unwrap();
    let ty = tree.as_type(id).unwrap();

    assert_eq!(ty.kind, TypeDeclKind::Class);
    assert!(ty.modifiers.has(Modifier::Public));
    assert_eq!(ty.type_params[0].name, "T");
    assert_eq!(
        ty.type_params[0].bounds[0].class_name().as_deref(),
        Some("Comparable")
    );
    assert_eq!(ty.extends[0].class_name().as_deref(), Some("Base"));
    let implements: Vec<_> = ty.implements.iter().filter_map(|t| t.class_name()).collect();
    assert_eq!(implements, vec!["Iterable", "java.io.Serializable"]);
    assert_eq!(ty.doc.as_ref().map(|d| d.text.as_str()), Some("/** A box. */"));
}

#[test]
fn fields_split_per_declarator() {
    let tree = parse(SOURCE).unwrap();
    let id = tree.find_type("Box").unwrap();
    let fields: Vec<_> = tree
        .as_type(id)
        .unwrap()
        .members
        .iter()
        .filter_map(|&m| tree.as_field(m))
        .collect();

    let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["items", "spare", "counts"]);
    assert!(fields[0].init.is_some());
    assert!(fields[1].init.is_none());
    assert!(fields[1].modifiers.has(Modifier::Final));

    let TypeRefKind::Array(inner) = &fields[2].ty.kind else {
        panic!("expected array type, got {:?}", fields[2].ty);
    };
    let TypeRefKind::Array(element) = &inner.kind else {
        panic!("expected two dimensions");
    };
    assert_eq!(element.kind, TypeRefKind::Primitive(PrimitiveKind::Int));
}

#[test]
fn methods_and_constructors() {
    let tree = parse(SOURCE).unwrap();
    let id = tree.find_type("Box").unwrap();
    let methods: Vec<_> = tree
        .as_type(id)
        .unwrap()
        .members
        .iter()
        .filter_map(|&m| tree.as_method(m))
        .collect();
    assert_eq!(methods.len(), 2);

    let ctor = methods[0];
    assert!(ctor.is_constructor);
    assert_eq!(ctor.name, "Box");
    assert!(ctor.return_type.is_none());

    let add = methods[1];
    assert!(!add.is_constructor);
    assert_eq!(add.type_params[0].name, "R");
    assert_eq!(add.return_type.as_ref().and_then(|t| t.class_name()).as_deref(), Some("R"));
    assert_eq!(tree.text()[add.name_range].to_string(), "add");
    assert_eq!(add.modifiers.annotations[0].name, "Deprecated");
    assert!(add.doc.as_ref().unwrap().text.contains("Adds an item."));
    assert_eq!(
        add.throws[0].class_name().as_deref(),
        Some("java.io.IOException")
    );

    let params: Vec<_> = add.params.iter().map(|&p| tree.as_parameter(p).unwrap()).collect();
    assert_eq!(params[0].name, "item");
    assert!(!params[0].is_varargs);
    assert_eq!(params[1].name, "tags");
    assert!(params[1].is_varargs);
    assert_eq!(params[1].ty.class_name().as_deref(), Some("String"));
}

#[test]
fn nested_types_and_enum_constants() {
    let tree = parse(SOURCE).unwrap();
    let inner = tree.find_type("Box.Inner").unwrap();
    assert_eq!(tree.qualified_name(inner), "com.example.Box.Inner");
    assert!(tree.as_type(inner).unwrap().modifiers.has(Modifier::Static));

    let color = tree.find_type("Box.Color").unwrap();
    let decl = tree.as_type(color).unwrap();
    assert_eq!(decl.kind, TypeDeclKind::Enum);
    let constants: Vec<_> = decl
        .members
        .iter()
        .filter_map(|&m| match tree.kind(m) {
            NodeKind::EnumConstant(c) => Some((c.name.as_str(), c.args.len(), c.has_body)),
            _ => None,
        })
        .collect();
    assert_eq!(constants, vec![("RED", 0, false), ("GREEN", 1, true)]);
    assert!(decl.members.iter().any(|&m| tree.as_field(m).is_some_and(|f| f.name == "x")));

    let all: Vec<_> = tree
        .all_types()
        .into_iter()
        .map(|id| tree.as_type(id).unwrap().name.clone())
        .collect();
    assert_eq!(all, vec!["Box", "Marker", "Inner", "Color"]);
}

#[test]
fn annotation_type_members_with_defaults() {
    let tree = parse(SOURCE).unwrap();
    let id = tree.find_type("Marker").unwrap();
    let decl = tree.as_type(id).unwrap();
    assert_eq!(decl.kind, TypeDeclKind::Annotation);

    let members: Vec<_> = decl
        .members
        .iter()
        .filter_map(|&m| match tree.kind(m) {
            NodeKind::AnnotationMember(member) => Some(member),
            _ => None,
        })
        .collect();
    assert_eq!(members.len(), 2);
    assert_eq!(members[0].name, "value");
    let default = members[0].default.unwrap();
    assert!(matches!(
        tree.as_expr(default),
        Some(Expr::Literal(Literal::String(s))) if s == "x"
    ));
    let ids = members[1].default.unwrap();
    assert!(matches!(tree.as_expr(ids), Some(Expr::ArrayInit(values)) if values.len() == 2));
}

#[test]
fn annotation_arguments() {
    let tree = parse(
        r#"
        @SuppressWarnings("unchecked")
        @Target({ElementType.TYPE, ElementType.METHOD})
        @Config(name = "x", nested = @Inner, count = 1 + 2)
        @java.lang.Deprecated
        class A {}
        "#,
    )
    .unwrap();
    let decl = tree.as_type(tree.compilation_unit().types[0]).unwrap();
    let annotations = &decl.modifiers.annotations;
    assert_eq!(annotations.len(), 4);

    let AnnotationArgs::SingleMember(value) = &annotations[0].args else {
        panic!("expected single member");
    };
    assert_eq!(tree.source_of(*value), "\"unchecked\"");

    let AnnotationArgs::SingleMember(targets) = &annotations[1].args else {
        panic!("expected single member");
    };
    assert!(matches!(tree.as_expr(*targets), Some(Expr::ArrayInit(v)) if v.len() == 2));

    let AnnotationArgs::Normal(pairs) = &annotations[2].args else {
        panic!("expected key/value pairs");
    };
    let keys: Vec<_> = pairs.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["name", "nested", "count"]);
    assert!(matches!(tree.as_expr(pairs[1].1), Some(Expr::Annotation(a)) if a.name == "Inner"));

    assert!(matches!(annotations[3].args, AnnotationArgs::Marker));
    assert_eq!(annotations[3].name, "java.lang.Deprecated");

    assert_parent_links(&tree);
}

#[test]
fn every_node_is_linked_to_its_parent() {
    let tree = parse(SOURCE).unwrap();
    assert_parent_links(&tree);
}
