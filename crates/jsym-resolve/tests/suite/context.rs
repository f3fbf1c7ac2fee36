use jsym_types::ValueDeclaration;
use pretty_assertions::assert_eq;

use super::fixture::{expr, method_named, type_named, world};

const SCOPES: &str = r#"
package p;

import java.util.List;

class Base {
    protected int shared;
    private int hidden;
}

class Scopes extends Base {
    int f;
    List<String> items;

    void m(String s) {
        int before = 1;
        use(before, s, f, shared, hidden, later);
        int later = 2;
        for (String item : items) {
            touch(item);
        }
        touch(item);
    }

    <U> U generic(U value) {
        return value;
    }
}
"#;

#[test]
fn locals_parameters_and_fields() {
    let world = world(&[SCOPES]);
    let tree = world.tree(0);
    let symbols = world.symbols();
    let call = expr(tree, "use(before, s, f, shared, hidden, later)");

    let before = symbols.solve_symbol_at(tree, call, "before").unwrap();
    assert!(matches!(before.declaration(), Some(ValueDeclaration::LocalVariable(_))));

    let s = symbols.solve_symbol_at(tree, call, "s").unwrap();
    assert!(matches!(s.declaration(), Some(ValueDeclaration::Parameter(_))));

    let f = symbols.solve_symbol_as_value_at(tree, call, "f").unwrap().unwrap();
    assert_eq!(f.name, "f");
    assert_eq!(f.ty.describe(), "int");
}

#[test]
fn locals_declared_after_the_use_are_not_visible() {
    let world = world(&[SCOPES]);
    let tree = world.tree(0);
    let call = expr(tree, "use(before, s, f, shared, hidden, later)");
    let later = world.symbols().solve_symbol_at(tree, call, "later").unwrap();
    assert!(!later.is_solved());
}

#[test]
fn foreach_variables_are_scoped_to_the_body() {
    let world = world(&[SCOPES]);
    let tree = world.tree(0);
    let symbols = world.symbols();

    let inside = expr(tree, "touch(item)");
    let item = symbols.solve_symbol_as_value_at(tree, inside, "item").unwrap().unwrap();
    assert_eq!(item.ty.describe(), "java.lang.String");

    let calls: Vec<_> = tree
        .descendants(tree.root())
        .into_iter()
        .filter(|&n| tree.as_expr(n).is_some() && tree.source_of(n) == "touch(item)")
        .collect();
    assert_eq!(calls.len(), 2);
    assert!(!symbols.solve_symbol_at(tree, calls[1], "item").unwrap().is_solved());
}

#[test]
fn inherited_fields_respect_visibility() {
    let world = world(&[SCOPES]);
    let tree = world.tree(0);
    let symbols = world.symbols();
    let call = expr(tree, "use(before, s, f, shared, hidden, later)");

    let shared = symbols.solve_symbol_at(tree, call, "shared").unwrap();
    let field = shared.declaration().and_then(ValueDeclaration::as_field).unwrap();
    assert_eq!(field.declaring_type().qualified_name(), "p.Base");

    assert!(!symbols.solve_symbol_at(tree, call, "hidden").unwrap().is_solved());
}

#[test]
fn this_field_access_resolves_declared_fields_only() {
    let world = world(&[r#"
        class A {
            private int x;
            void m() {
                this.x = 1;
                this.y = 2;
            }
        }
    "#]);
    let tree = world.tree(0);
    let symbols = world.symbols();

    let x = symbols.solve_this_field(tree, expr(tree, "this.x")).unwrap();
    assert_eq!(x.declaration().map(|f| f.name()).as_deref(), Some("x"));
    assert!(!symbols.solve_this_field(tree, expr(tree, "this.y")).unwrap().is_solved());

    let not_a_field = symbols.solve_this_field(tree, expr(tree, "1"));
    assert!(matches!(not_a_field, Err(jsym_types::Error::InvalidInput(_))));
}

#[test]
fn types_resolve_through_imports_and_java_lang() {
    let world = world(&[SCOPES]);
    let tree = world.tree(0);
    let symbols = world.symbols();
    let method = method_named(tree, "m");

    let list = symbols.solve_type_at(tree, method, "List").unwrap();
    assert_eq!(list.declaration().unwrap().qualified_name(), "java.util.List");

    let string = symbols.solve_type_at(tree, method, "String").unwrap();
    assert_eq!(string.declaration().unwrap().qualified_name(), "java.lang.String");

    let base = symbols.solve_type_at(tree, method, "Base").unwrap();
    assert_eq!(base.declaration().unwrap().qualified_name(), "p.Base");

    assert!(!symbols.solve_type_at(tree, method, "Missing").unwrap().is_solved());
}

#[test]
fn method_type_parameters_shadow_nothing_outside() {
    let world = world(&[SCOPES]);
    let tree = world.tree(0);
    let symbols = world.symbols();

    let generic = method_named(tree, "generic");
    let u = symbols.context(tree, generic).solve_generic_type("U").unwrap().unwrap();
    assert!(u.is_type_variable());
    assert_eq!(u.describe(), "U");

    let scopes = type_named(tree, "Scopes");
    assert!(symbols.context(tree, scopes).solve_generic_type("U").unwrap().is_none());
}

#[test]
fn enum_constants_and_static_imports() {
    let world = world(&[
        r#"
        package p;
        public enum Color {
            RED, GREEN;
            Color flip() { return RED; }
        }
        "#,
        r#"
        package q;
        import static p.Color.GREEN;
        class User {
            Object pick() { return GREEN; }
        }
        "#,
    ]);
    let symbols = world.symbols();

    let color = world.tree(0);
    let red = symbols.solve_symbol_at(color, expr(color, "RED"), "RED").unwrap();
    let Some(ValueDeclaration::EnumConstant(red)) = red.declaration() else {
        panic!("expected an enum constant, got {red:?}");
    };
    assert_eq!(red.declaring_type().qualified_name(), "p.Color");
    assert_eq!(red.ty().unwrap().describe(), "p.Color");

    let user = world.tree(1);
    let green = symbols.solve_symbol_at(user, expr(user, "GREEN"), "GREEN").unwrap();
    assert!(matches!(green.declaration(), Some(ValueDeclaration::EnumConstant(c)) if c.name() == "GREEN"));
}

#[test]
fn broken_supertypes_fail_only_the_query() {
    let world = world(&[r#"
        package p;
        class Twice extends Object, String {}
        class Lost extends Nowhere {}
        class Fine {}
    "#]);
    let solver = &world.solver;

    let twice = solver.solve_type("p.Twice").unwrap();
    assert!(matches!(twice.ancestors(), Err(jsym_types::Error::InvalidInput(_))));

    let lost = solver.solve_type("p.Lost").unwrap();
    match lost.ancestors() {
        Err(jsym_types::Error::UnsolvedSymbol { name, .. }) => assert_eq!(name, "Nowhere"),
        other => panic!("expected an unsolved supertype, got {other:?}"),
    }

    let fine = solver.solve_type("p.Fine").unwrap();
    let ancestors: Vec<String> = fine.ancestors().unwrap().iter().map(|a| a.describe()).collect();
    assert_eq!(ancestors, vec!["java.lang.Object"]);
}
