use jsym_types::{PrimitiveType, ReferenceTypeDeclaration, ResolvedType};
use pretty_assertions::assert_eq;

use super::fixture::{ty, var, world, FakeParam};

#[test]
fn describes_wildcards_and_generics() {
    let solver = world();
    let number = ty(&solver, "java.lang.Number", Vec::new());
    let list = ty(
        &solver,
        "java.util.List",
        vec![ResolvedType::extends_bound(number.clone())],
    );
    assert_eq!(list.describe(), "java.util.List<? extends java.lang.Number>");
    assert_eq!(
        ResolvedType::super_bound(var("java.util.List", "E")).describe(),
        "? super E"
    );
    assert_eq!(
        ResolvedType::array(ResolvedType::array(number)).describe(),
        "java.lang.Number[][]"
    );
}

#[test]
fn replaces_a_type_variable_everywhere() {
    let solver = world();
    let e = var("java.util.List", "E");
    let string = ty(&solver, "java.lang.String", Vec::new());
    let nested = ty(
        &solver,
        "java.util.List",
        vec![ResolvedType::super_bound(ResolvedType::array(e.clone()))],
    );
    let param = FakeParam {
        name: "E".to_string(),
        container: "java.util.List".to_string(),
    };

    let replaced = nested.replace_type_variables(&param, &string);

    assert_eq!(
        replaced.describe(),
        "java.util.List<? super java.lang.String[]>"
    );
    assert!(!replaced.mentions_type_variable("E"));
    assert!(nested.mentions_type_variable("E"));
}

#[test]
fn replacement_without_occurrences_returns_the_same_instance() {
    let solver = world();
    let param = FakeParam {
        name: "T".to_string(),
        container: "pkg.Box".to_string(),
    };
    let string = ty(&solver, "java.lang.String", Vec::new());
    let candidates = vec![
        ResolvedType::primitive(PrimitiveType::Int),
        ResolvedType::void(),
        ResolvedType::null(),
        ResolvedType::unbounded(),
        ResolvedType::extends_bound(string.clone()),
        ResolvedType::array(string.clone()),
        ty(&solver, "java.util.List", vec![var("java.util.List", "E")]),
        var("pkg.Box", "U"),
        string.clone(),
    ];
    for candidate in candidates {
        let replaced = candidate.replace_type_variables(&param, &string);
        assert!(replaced.ptr_eq(&candidate), "{candidate} was rebuilt");
    }
}

#[test]
fn substitution_is_simultaneous() {
    let solver = world();
    let a = var("pkg.Pair", "A");
    let b = var("pkg.Pair", "B");
    let pair = ty(&solver, "pkg.Pair", vec![a.clone(), b.clone()]);

    let swapped = pair.substitute(&[("A".to_string(), b), ("B".to_string(), a)]);

    assert_eq!(swapped.describe(), "pkg.Pair<B, A>");
}

#[test]
fn raw_types_and_type_parameter_maps() {
    let solver = world();
    let string = ty(&solver, "java.lang.String", Vec::new());
    let raw = ty(&solver, "java.util.List", Vec::new());
    let list = ty(&solver, "java.util.List", vec![string.clone()]);

    assert!(raw.as_reference().unwrap().is_raw().unwrap());
    assert!(!list.as_reference().unwrap().is_raw().unwrap());
    assert!(!string.as_reference().unwrap().is_raw().unwrap());
    assert!(raw.as_reference().unwrap().type_parameters_map().unwrap().is_empty());
    assert_eq!(
        list.as_reference().unwrap().type_param_value("E").unwrap(),
        Some(string)
    );
}

#[test]
fn ancestors_are_substituted_along_each_edge() {
    let solver = world();
    let string = ty(&solver, "java.lang.String", Vec::new());
    let integer = ty(&solver, "java.lang.Integer", Vec::new());
    let swapped = ty(&solver, "pkg.Swapped", vec![string.clone(), integer.clone()]);

    let ancestors: Vec<_> = swapped
        .as_reference()
        .unwrap()
        .all_ancestors()
        .unwrap()
        .iter()
        .map(ResolvedType::describe)
        .collect();

    assert_eq!(
        ancestors,
        vec![
            "pkg.Pair<java.lang.Integer, java.lang.String>".to_string(),
            "java.lang.Object".to_string(),
        ]
    );

    let string_list = ty(&solver, "pkg.StringList", Vec::new());
    let ancestors: Vec<_> = string_list
        .as_reference()
        .unwrap()
        .all_ancestors()
        .unwrap()
        .iter()
        .map(ResolvedType::describe)
        .collect();
    assert_eq!(
        ancestors,
        vec![
            "java.util.List<java.lang.String>".to_string(),
            "java.util.Collection<java.lang.String>".to_string(),
        ]
    );
}

#[test]
fn raw_types_have_raw_ancestors() {
    let solver = world();
    let raw = ty(&solver, "pkg.Swapped", Vec::new());
    let direct = raw.as_reference().unwrap().direct_ancestors().unwrap();
    assert_eq!(direct.len(), 1);
    assert_eq!(direct[0].describe(), "pkg.Pair");
}

#[test]
fn declared_types_use_their_own_variables() {
    let solver = world();
    let pair = solver.solve_type("pkg.Pair").unwrap();
    let declared = ResolvedType::declared(pair.clone()).unwrap();
    assert_eq!(declared.describe(), "pkg.Pair<A, B>");
    assert_eq!(
        declared,
        ty(&solver, "pkg.Pair", vec![var("pkg.Pair", "A"), var("pkg.Pair", "B")])
    );
    assert_ne!(
        declared,
        ty(&solver, "pkg.Pair", vec![var("pkg.Other", "A"), var("pkg.Pair", "B")])
    );
    assert_eq!(pair.qualified_name(), "pkg.Pair");
}
