use std::sync::Arc;

use jsym_resolve::reflection::RuntimeRegistry;
use jsym_resolve::solver::ReflectionTypeSolver;
use jsym_types::{MethodDeclaration, TypeSolver};
use pretty_assertions::assert_eq;

use super::fixture::world;

const MEMBERS: &str = r#"
package p;

import java.io.IOException;

class Members {
    volatile int state;
    transient String cache;
    int plain;

    void read() throws IOException, InterruptedException {}
    <X extends Exception> void fill() throws X {}
    void quiet() {}
}
"#;

fn exceptions(method: &dyn MethodDeclaration) -> Vec<String> {
    method
        .specified_exceptions()
        .unwrap()
        .iter()
        .map(|ty| ty.describe())
        .collect()
}

#[test]
fn source_fields_report_volatile_and_transient() {
    let world = world(&[MEMBERS]);
    let members = world.solver.solve_type("p.Members").unwrap();

    let state = members.field("state").unwrap().unwrap();
    assert!(state.is_volatile());
    assert!(!state.is_transient());

    let cache = members.field("cache").unwrap().unwrap();
    assert!(cache.is_transient());
    assert!(!cache.is_volatile());

    let plain = members.field("plain").unwrap().unwrap();
    assert!(!plain.is_volatile() && !plain.is_transient());
}

#[test]
fn source_methods_list_their_throws_clause() {
    let world = world(&[MEMBERS]);
    let members = world.solver.solve_type("p.Members").unwrap();
    let method = |name: &str| {
        members
            .declared_methods()
            .unwrap()
            .into_iter()
            .find(|m| m.name() == name)
            .unwrap()
    };

    assert_eq!(
        exceptions(&*method("read")),
        vec!["java.io.IOException", "java.lang.InterruptedException"]
    );
    assert_eq!(exceptions(&*method("fill")), vec!["X"]);
    assert!(exceptions(&*method("quiet")).is_empty());
}

#[test]
fn mirrors_carry_modifiers_and_throws() {
    let solver = TypeSolver::new(ReflectionTypeSolver::platform());
    let closeable = solver.solve_type("java.io.Closeable").unwrap();
    let close = closeable
        .declared_methods()
        .unwrap()
        .into_iter()
        .find(|m| m.name() == "close")
        .unwrap();
    assert_eq!(exceptions(&*close), vec!["java.io.IOException"]);

    let mut registry = RuntimeRegistry::new();
    registry
        .load_java_source("package p; public class Counter { volatile int hits; transient int scratch; }")
        .unwrap();
    let solver = TypeSolver::new(ReflectionTypeSolver::new(Arc::new(registry), false));
    let counter = solver.solve_type("p.Counter").unwrap();
    assert!(counter.field("hits").unwrap().unwrap().is_volatile());
    assert!(counter.field("scratch").unwrap().unwrap().is_transient());
    assert!(!counter.field("hits").unwrap().unwrap().is_transient());
}
