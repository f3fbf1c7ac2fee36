use jsym_types::{Error, ReferenceTypeDeclaration, TypeSolver};
use pretty_assertions::assert_eq;

use super::fixture::{world, FakeBackend};

fn empty(label: &'static str) -> TypeSolver {
    TypeSolver::new(FakeBackend::new(label, Vec::new()))
}

#[test]
fn unsolved_types_are_errors_only_through_solve_type() {
    let solver = world();
    assert!(!solver.try_to_solve_type("pkg.Missing").unwrap().is_solved());
    match solver.solve_type("pkg.Missing") {
        Err(Error::UnsolvedSymbol { name, context }) => {
            assert_eq!(name, "pkg.Missing");
            assert_eq!(context, "type solver `world`");
        }
        other => panic!("expected UnsolvedSymbol, got {other:?}"),
    }
}

#[test]
fn parents_are_assigned_once() {
    let child = empty("child");
    let parent = empty("parent");
    let other = empty("other");

    child.set_parent(&parent).unwrap();
    assert!(child.parent().unwrap().ptr_eq(&parent));
    assert!(child.root().ptr_eq(&parent));
    assert!(parent.root().ptr_eq(&parent));

    assert!(matches!(child.set_parent(&other), Err(Error::InvalidInput(_))));
}

#[test]
fn self_parent_and_cycles_are_rejected() {
    let a = empty("a");
    let b = empty("b");
    assert!(matches!(a.set_parent(&a), Err(Error::InvalidInput(_))));

    b.set_parent(&a).unwrap();
    let err = a.set_parent(&b).unwrap_err();
    assert!(err.to_string().contains("cycle"), "{err}");
}

#[test]
fn declarations_resolve_through_the_root() {
    let root = world();
    let child = empty("child");
    child.set_parent(&root).unwrap();

    // A node only consults its own backend; chaining is a backend concern.
    assert!(!child.try_to_solve_type("java.lang.String").unwrap().is_solved());

    let string = root.solve_type("java.lang.String").unwrap();
    assert!(string.type_solver().ptr_eq(&root));
    assert_eq!(string.qualified_name(), "java.lang.String");
    assert_eq!(string.package_name(), "java.lang");
}

#[test]
fn dropped_parents_detach() {
    let child = empty("child");
    {
        let parent = empty("parent");
        child.set_parent(&parent).unwrap();
    }
    assert!(child.parent().is_none());
    assert!(child.root().ptr_eq(&child));
}
