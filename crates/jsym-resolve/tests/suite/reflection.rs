use std::sync::Arc;

use jsym_resolve::reflection::{
    ClassMirror, ReflectionEnumConstant, ReflectionTypeDeclaration, RuntimeRegistry,
};
use jsym_resolve::solver::ReflectionTypeSolver;
use jsym_types::{Error, TypeDeclarationKind, TypeSolver};
use pretty_assertions::assert_eq;

use super::fixture::world;

fn platform() -> TypeSolver {
    TypeSolver::new(ReflectionTypeSolver::platform())
}

#[test]
fn generic_ancestors_are_substituted() {
    let solver = platform();
    let list = solver.solve_type("java.util.ArrayList").unwrap();
    assert_eq!(list.kind(), TypeDeclarationKind::Class);
    let params: Vec<String> = list.type_parameters().unwrap().iter().map(|p| p.name()).collect();
    assert_eq!(params, vec!["E"]);

    let ancestors: Vec<String> = list.all_ancestors().unwrap().iter().map(|a| a.describe()).collect();
    assert!(ancestors.contains(&"java.util.List<E>".to_string()), "{ancestors:?}");
    assert!(ancestors.contains(&"java.util.Collection<E>".to_string()), "{ancestors:?}");
    assert!(ancestors.contains(&"java.lang.Object".to_string()), "{ancestors:?}");
}

#[test]
fn methods_expose_params_and_varargs() {
    let solver = platform();
    let string = solver.solve_type("java.lang.String").unwrap();
    let format = string
        .declared_methods()
        .unwrap()
        .into_iter()
        .find(|m| m.name() == "format")
        .unwrap();
    assert!(format.is_static());
    assert!(format.has_varargs().unwrap());
    let params = format.params().unwrap();
    assert_eq!(params[1].ty().unwrap().describe(), "java.lang.Object[]");

    let length = string
        .declared_methods()
        .unwrap()
        .into_iter()
        .find(|m| m.name() == "length")
        .unwrap();
    assert_eq!(length.signature().unwrap(), "length()");
    assert_eq!(length.return_type().unwrap().describe(), "int");
}

#[test]
fn enum_constants_are_not_fields() {
    let solver = platform();
    let policy = solver.solve_type("java.lang.annotation.RetentionPolicy").unwrap();
    assert!(policy.is_enum());
    let constants: Vec<String> = policy.enum_constants().unwrap().iter().map(|c| c.name()).collect();
    assert_eq!(constants, vec!["SOURCE", "CLASS", "RUNTIME"]);
    assert!(policy.declared_fields().unwrap().iter().all(|f| f.name() != "RUNTIME"));

    let values = policy
        .declared_methods()
        .unwrap()
        .into_iter()
        .find(|m| m.name() == "values")
        .unwrap();
    assert_eq!(values.return_type().unwrap().describe(), "java.lang.annotation.RetentionPolicy[]");
}

#[test]
fn enum_constant_wrappers_reject_plain_fields() {
    let mut registry = RuntimeRegistry::new();
    registry
        .load_java_source("package p; public enum Mode { ON; public static int COUNT = 1; }")
        .unwrap();
    let registry = Arc::new(registry);
    let solver = TypeSolver::new(ReflectionTypeSolver::new(registry.clone(), false));
    let mode = registry.get("p.Mode").unwrap();
    let on = mode.fields.iter().position(|f| f.name == "ON").unwrap();
    let count = mode.fields.iter().position(|f| f.name == "COUNT").unwrap();

    let decl = ReflectionTypeDeclaration::new(mode.clone(), solver.clone());
    let constant = ReflectionEnumConstant::new(decl.clone(), on).unwrap();
    assert_eq!(jsym_types::EnumConstantDeclaration::name(&constant), "ON");
    assert!(matches!(
        ReflectionEnumConstant::new(decl, count),
        Err(Error::InvalidInput(_))
    ));
}

#[test]
fn jre_only_hides_other_packages() {
    let mut registry = RuntimeRegistry::new();
    registry.insert(ClassMirror::new("com.acme", "Widget", TypeDeclarationKind::Class));
    registry.insert(ClassMirror::new("java.acme", "Widget", TypeDeclarationKind::Class));
    let registry = Arc::new(registry);

    let jre = TypeSolver::new(ReflectionTypeSolver::new(registry.clone(), true));
    assert!(!jre.try_to_solve_type("com.acme.Widget").unwrap().is_solved());
    assert!(jre.try_to_solve_type("java.acme.Widget").unwrap().is_solved());

    let all = TypeSolver::new(ReflectionTypeSolver::new(registry, false));
    assert!(all.try_to_solve_type("com.acme.Widget").unwrap().is_solved());
}

#[test]
fn nested_platform_types_resolve() {
    let solver = platform();
    let entry = solver.solve_type("java.util.Map.Entry").unwrap();
    assert_eq!(entry.name(), "Entry");
    assert_eq!(entry.class_name(), "Map.Entry");
    assert!(entry.is_interface());

    let map = solver.solve_type("java.util.Map").unwrap();
    assert!(map.internal_type("Entry").unwrap().is_some());
}

#[test]
fn source_types_extend_platform_types() {
    let world = world(&[r#"
        package p;
        import java.util.ArrayList;
        class Names extends ArrayList<String> {}
    "#]);
    let names = world.solver.solve_type("p.Names").unwrap();
    let get = jsym_resolve::solve_method_in_type(&names, "get", &[jsym_types::ResolvedType::primitive(
        jsym_types::PrimitiveType::Int,
    )])
    .unwrap()
    .into_declaration()
    .unwrap();
    assert_eq!(get.declaring_type().qualified_name(), "java.util.ArrayList");
    assert_eq!(get.return_type().unwrap().describe(), "E");

    let ancestors: Vec<String> = names.all_ancestors().unwrap().iter().map(|a| a.describe()).collect();
    assert!(ancestors.contains(&"java.util.List<java.lang.String>".to_string()), "{ancestors:?}");
}
