use jsym_types::{Annotated, PrimitiveType, ReferenceTypeDeclaration, ResolvedType};

use super::fixture::{ty, var, world};

#[test]
fn wildcard_type_arguments() {
    let solver = world();
    let number = ty(&solver, "java.lang.Number", Vec::new());
    let integer = ty(&solver, "java.lang.Integer", Vec::new());
    let string = ty(&solver, "java.lang.String", Vec::new());
    let collection = |arg| ty(&solver, "java.util.Collection", vec![arg]);
    let list = |arg| ty(&solver, "java.util.List", vec![arg]);

    let of_extends_number = collection(ResolvedType::extends_bound(number.clone()));
    assert!(of_extends_number.is_assignable_by(&list(integer.clone())).unwrap());
    assert!(of_extends_number.is_assignable_by(&list(number.clone())).unwrap());
    assert!(!of_extends_number.is_assignable_by(&list(string.clone())).unwrap());

    let of_super_integer = collection(ResolvedType::super_bound(integer.clone()));
    assert!(of_super_integer.is_assignable_by(&list(number.clone())).unwrap());
    assert!(of_super_integer.is_assignable_by(&list(integer.clone())).unwrap());
    assert!(!of_super_integer.is_assignable_by(&list(string.clone())).unwrap());

    let of_any = collection(ResolvedType::unbounded());
    assert!(of_any.is_assignable_by(&list(string.clone())).unwrap());
    assert!(of_any
        .is_assignable_by(&list(ResolvedType::extends_bound(number.clone())))
        .unwrap());
}

#[test]
fn type_arguments_are_invariant() {
    let solver = world();
    let number = ty(&solver, "java.lang.Number", Vec::new());
    let integer = ty(&solver, "java.lang.Integer", Vec::new());
    let numbers = ty(&solver, "java.util.Collection", vec![number]);
    let integers = ty(&solver, "java.util.List", vec![integer.clone()]);
    assert!(!numbers.is_assignable_by(&integers).unwrap());

    let set = ty(&solver, "java.util.Set", vec![integer.clone()]);
    let list = ty(&solver, "java.util.List", vec![integer]);
    assert!(!list.is_assignable_by(&set).unwrap());
}

#[test]
fn raw_types_fit_either_way() {
    let solver = world();
    let string = ty(&solver, "java.lang.String", Vec::new());
    let raw = ty(&solver, "java.util.List", Vec::new());
    let strings = ty(&solver, "java.util.List", vec![string]);
    assert!(raw.is_assignable_by(&strings).unwrap());
    assert!(strings.is_assignable_by(&raw).unwrap());
}

#[test]
fn inherited_parameterizations() {
    let solver = world();
    let string = ty(&solver, "java.lang.String", Vec::new());
    let integer = ty(&solver, "java.lang.Integer", Vec::new());
    let string_list = ty(&solver, "pkg.StringList", Vec::new());

    assert!(ty(&solver, "java.util.List", vec![string.clone()])
        .is_assignable_by(&string_list)
        .unwrap());
    assert!(ty(&solver, "java.util.Collection", vec![string.clone()])
        .is_assignable_by(&string_list)
        .unwrap());
    assert!(!ty(&solver, "java.util.List", vec![integer.clone()])
        .is_assignable_by(&string_list)
        .unwrap());

    let comparable = ty(&solver, "java.lang.Comparable", vec![integer.clone()]);
    assert!(comparable.is_assignable_by(&integer).unwrap());
    assert!(!comparable.is_assignable_by(&string).unwrap());
}

#[test]
fn boxing_only_under_loose_conversion() {
    let solver = world();
    let int = ResolvedType::primitive(PrimitiveType::Int);
    let long = ResolvedType::primitive(PrimitiveType::Long);
    let integer = ty(&solver, "java.lang.Integer", Vec::new());
    let number = ty(&solver, "java.lang.Number", Vec::new());
    let object = ty(&solver, "java.lang.Object", Vec::new());
    let string = ty(&solver, "java.lang.String", Vec::new());

    assert!(integer.is_assignable_by(&int).unwrap());
    assert!(!integer.is_strictly_assignable_by(&int).unwrap());
    assert!(int.is_assignable_by(&integer).unwrap());
    assert!(!int.is_strictly_assignable_by(&integer).unwrap());
    assert!(long.is_assignable_by(&integer).unwrap());
    assert!(number.is_assignable_by(&int).unwrap());
    assert!(object.is_assignable_by(&int).unwrap());
    assert!(!string.is_assignable_by(&int).unwrap());
    assert!(!integer.is_assignable_by(&long).unwrap());
}

#[test]
fn references_accept_null_and_reject_void() {
    let solver = world();
    let string = ty(&solver, "java.lang.String", Vec::new());
    assert!(string.is_assignable_by(&ResolvedType::null()).unwrap());
    assert!(!string.is_assignable_by(&ResolvedType::void()).unwrap());
}

#[test]
fn wildcards_as_values() {
    let solver = world();
    let object = ty(&solver, "java.lang.Object", Vec::new());
    let number = ty(&solver, "java.lang.Number", Vec::new());
    let integer = ty(&solver, "java.lang.Integer", Vec::new());

    assert!(number
        .is_assignable_by(&ResolvedType::extends_bound(integer.clone()))
        .unwrap());
    assert!(!integer
        .is_assignable_by(&ResolvedType::extends_bound(number.clone()))
        .unwrap());
    assert!(object
        .is_assignable_by(&ResolvedType::super_bound(integer.clone()))
        .unwrap());
    assert!(!number
        .is_assignable_by(&ResolvedType::super_bound(integer.clone()))
        .unwrap());
    assert!(number.is_assignable_by(&ResolvedType::unbounded()).unwrap());
}

#[test]
fn every_reference_accepts_an_unbounded_wildcard() {
    let solver = world();
    let unbounded = ResolvedType::unbounded();
    for name in ["java.lang.Object", "java.lang.String", "java.lang.Integer"] {
        let target = ty(&solver, name, Vec::new());
        assert!(target.is_assignable_by(&unbounded).unwrap(), "{name}");
        assert!(target.is_strictly_assignable_by(&unbounded).unwrap(), "{name}");
    }
    let strings = ResolvedType::array(ty(&solver, "java.lang.String", Vec::new()));
    assert!(!strings.is_assignable_by(&unbounded).unwrap());
}

#[test]
fn wildcards_as_targets() {
    let solver = world();
    let number = ty(&solver, "java.lang.Number", Vec::new());
    let integer = ty(&solver, "java.lang.Integer", Vec::new());

    assert!(ResolvedType::super_bound(integer.clone())
        .is_assignable_by(&integer)
        .unwrap());
    assert!(!ResolvedType::extends_bound(number.clone())
        .is_assignable_by(&integer)
        .unwrap());
    assert!(!ResolvedType::unbounded().is_assignable_by(&integer).unwrap());
}

#[test]
fn arrays_and_type_variables() {
    let solver = world();
    let object = ty(&solver, "java.lang.Object", Vec::new());
    let number = ty(&solver, "java.lang.Number", Vec::new());
    let integer = ty(&solver, "java.lang.Integer", Vec::new());

    let numbers = ResolvedType::array(number.clone());
    let integers = ResolvedType::array(integer.clone());
    assert!(numbers.is_assignable_by(&integers).unwrap());
    assert!(!integers.is_assignable_by(&numbers).unwrap());
    assert!(object.is_assignable_by(&integers).unwrap());

    let t = var("pkg.Box", "T");
    assert!(t.is_assignable_by(&var("pkg.Box", "T")).unwrap());
    assert!(!t.is_assignable_by(&var("pkg.Box", "U")).unwrap());
    assert!(t.is_assignable_by(&integer).unwrap());
    assert!(object.is_assignable_by(&t).unwrap());
    assert!(!number.is_assignable_by(&t).unwrap());
}

#[test]
fn annotations_match_by_simple_name() {
    let solver = world();
    let marker = solver.solve_type("pkg.Marker").unwrap();
    assert!(marker.is_annotation());
    assert!(marker.has_annotation("Inherited").unwrap());
    assert!(marker.has_annotation("java.lang.annotation.Inherited").unwrap());
    assert!(!marker.has_annotation("other.Inherited").unwrap());
    assert!(marker.is_inheritable().unwrap());

    let pair = solver.solve_type("pkg.Pair").unwrap();
    assert!(!pair.is_inheritable().unwrap());
    let integer = solver.solve_type("java.lang.Integer").unwrap();
    assert!(!integer.can_be_assigned_to(pair.as_ref()).unwrap());
    let number = solver.solve_type("java.lang.Number").unwrap();
    assert!(integer.can_be_assigned_to(number.as_ref()).unwrap());
}
