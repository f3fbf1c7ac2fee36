use jsym_types::Error;
use pretty_assertions::assert_eq;

use super::fixture::{expr, world};

const CALLS: &str = r#"
package p;

class Calls {
    void f(Object o) {}
    void f(String s) {}

    void g(int... xs) {}
    void g(int a, long b) {}

    void h(long x) {}
    void h(Integer x) {}

    void amb(String a, Object b) {}
    void amb(Object a, String b) {}

    <T> T id(T value) { return value; }

    void run() {
        f("s");
        f(1);
        g(1, 2);
        g(1, 2, 3);
        g();
        h(1);
        amb("a", "b");
        id("x").length();
        nothing(1);
    }
}
"#;

fn signature_of(call: &str) -> String {
    let world = world(&[CALLS]);
    let tree = world.tree(0);
    let method = world
        .symbols()
        .solve_method_call(tree, expr(tree, call))
        .unwrap()
        .into_declaration()
        .unwrap_or_else(|| panic!("`{call}` did not resolve"));
    method.qualified_signature().unwrap()
}

#[test]
fn most_specific_candidate_wins_in_the_strict_phase() {
    assert_eq!(signature_of("f(\"s\")"), "p.Calls.f(java.lang.String)");
}

#[test]
fn boxing_is_only_tried_when_nothing_applies_strictly() {
    assert_eq!(signature_of("f(1)"), "p.Calls.f(java.lang.Object)");
    assert_eq!(signature_of("h(1)"), "p.Calls.h(long)");
}

#[test]
fn varargs_expansion_comes_last() {
    assert_eq!(signature_of("g(1, 2)"), "p.Calls.g(int, long)");
    assert_eq!(signature_of("g(1, 2, 3)"), "p.Calls.g(int[])");
    assert_eq!(signature_of("g()"), "p.Calls.g(int[])");
}

#[test]
fn unrelated_candidates_are_ambiguous() {
    let world = world(&[CALLS]);
    let tree = world.tree(0);
    let err = world
        .symbols()
        .solve_method_call(tree, expr(tree, "amb(\"a\", \"b\")"))
        .unwrap_err();
    let Error::MethodAmbiguity { name, mut candidates } = err else {
        panic!("expected an ambiguity, got {err:?}");
    };
    candidates.sort();
    assert_eq!(name, "amb");
    assert_eq!(candidates.len(), 2);
}

#[test]
fn unknown_methods_are_unsolved() {
    let world = world(&[CALLS]);
    let tree = world.tree(0);
    let found = world
        .symbols()
        .solve_method_call(tree, expr(tree, "nothing(1)"))
        .unwrap();
    assert!(!found.is_solved());
}

#[test]
fn generic_methods_bind_their_type_parameters() {
    let world = world(&[CALLS]);
    let tree = world.tree(0);
    let symbols = world.symbols();

    let ty = symbols.type_of_expression(tree, expr(tree, "id(\"x\")")).unwrap();
    assert_eq!(ty.describe(), "java.lang.String");

    let length = symbols
        .solve_method_call(tree, expr(tree, "id(\"x\").length()"))
        .unwrap()
        .into_declaration()
        .unwrap();
    assert_eq!(length.declaring_type().qualified_name(), "java.lang.String");
}

#[test]
fn static_on_demand_imports_contribute_methods() {
    let world = world(&[r#"
        import static java.lang.Math.*;

        class Maths {
            long m() { return max(1, 2L); }
        }
    "#]);
    let tree = world.tree(0);
    let method = world
        .symbols()
        .solve_method_call(tree, expr(tree, "max(1, 2L)"))
        .unwrap()
        .into_declaration()
        .unwrap();
    assert_eq!(method.qualified_signature().unwrap(), "java.lang.Math.max(long, long)");
    assert!(method.is_static());
}

#[test]
fn interfaces_see_object_methods() {
    let world = world(&[r#"
        import java.util.List;

        class UsesList {
            boolean m(List<String> list) { return list.equals(list); }
        }
    "#]);
    let tree = world.tree(0);
    let method = world
        .symbols()
        .solve_method_call(tree, expr(tree, "list.equals(list)"))
        .unwrap()
        .into_declaration()
        .unwrap();
    assert_eq!(method.name(), "equals");
}

#[test]
fn generic_candidates_compete_with_their_inferred_types() {
    let world = world(&[r#"
        package p;

        class G {
            <T extends Number> void k(T t) {}
            void k(Object o) {}

            void run(Integer i) {
                k(i);
            }
        }
    "#]);
    let tree = world.tree(0);
    let method = world
        .symbols()
        .solve_method_call(tree, expr(tree, "k(i)"))
        .unwrap()
        .into_declaration()
        .unwrap();
    assert_eq!(method.qualified_signature().unwrap(), "p.G.k(T)");
}

const NESTED: &str = r#"
package p;

class Outer {
    void m(int x) {}
    void n(int x) {}

    class Inner {
        void m(String s) {}

        void run() {
            m(1);
            n(1);
        }
    }
}
"#;

#[test]
fn inner_candidates_shadow_the_enclosing_type() {
    let world = world(&[NESTED]);
    let tree = world.tree(0);
    let found = world
        .symbols()
        .solve_method_call(tree, expr(tree, "m(1)"))
        .unwrap();
    assert!(!found.is_solved());
}

#[test]
fn enclosing_type_is_searched_when_no_candidate_is_declared() {
    let world = world(&[NESTED]);
    let tree = world.tree(0);
    let method = world
        .symbols()
        .solve_method_call(tree, expr(tree, "n(1)"))
        .unwrap()
        .into_declaration()
        .unwrap();
    assert_eq!(method.qualified_signature().unwrap(), "p.Outer.n(int)");
}
