use pretty_assertions::assert_eq;

use super::fixture::{expr, world};

const TYPED: &str = r#"
package p;

import java.util.ArrayList;
import java.util.List;
import java.util.Map;

class Typed {
    List<String> names = new ArrayList<>();
    Map<String, List<Integer>> index;
    int[] counts;

    void run() {
        long a = 1 + 2L;
        Object b = names.get(0).length();
        Object c = "x" + 1;
        Object d = this;
        Object e = names.size() > 0 ? 1 : 2;
        Object f = String.class;
        Object g = index.get("k");
        Object h = counts[0];
        Object i = (CharSequence) "s";
        Object j = !true;
        Object k = 'a' + 'b';
        Object l = new int[3][];
    }
}
"#;

fn type_of(text: &str) -> String {
    let world = world(&[TYPED]);
    let tree = world.tree(0);
    world
        .symbols()
        .type_of_expression(tree, expr(tree, text))
        .unwrap_or_else(|err| panic!("typing `{text}`: {err}"))
        .describe()
}

#[test]
fn binary_numeric_promotion() {
    assert_eq!(type_of("1 + 2L"), "long");
    assert_eq!(type_of("'a' + 'b'"), "int");
    assert_eq!(type_of("\"x\" + 1"), "java.lang.String");
    assert_eq!(type_of("names.size() > 0"), "boolean");
    assert_eq!(type_of("!true"), "boolean");
}

#[test]
fn member_types_are_substituted() {
    assert_eq!(type_of("names"), "java.util.List<java.lang.String>");
    assert_eq!(type_of("names.get(0)"), "java.lang.String");
    assert_eq!(type_of("names.get(0).length()"), "int");
    assert_eq!(type_of("index.get(\"k\")"), "java.util.List<java.lang.Integer>");
}

#[test]
fn literals_this_and_class_literals() {
    assert_eq!(type_of("this"), "p.Typed");
    assert_eq!(type_of("String.class"), "java.lang.Class<java.lang.String>");
    assert_eq!(type_of("(CharSequence) \"s\""), "java.lang.CharSequence");
}

#[test]
fn arrays_and_conditionals() {
    assert_eq!(type_of("counts[0]"), "int");
    assert_eq!(type_of("new int[3][]"), "int[][]");
    assert_eq!(type_of("names.size() > 0 ? 1 : 2"), "int");
}

#[test]
fn unknown_names_are_errors() {
    let world = world(&["class A { Object f = missing; }"]);
    let tree = world.tree(0);
    let err = world
        .symbols()
        .type_of_expression(tree, expr(tree, "missing"))
        .unwrap_err();
    assert!(matches!(err, jsym_types::Error::UnsolvedSymbol { ref name, .. } if name == "missing"));
}
