use jsym_syntax::{parse, BinaryOp, Expr, NodeKind, Stmt};
use pretty_assertions::assert_eq;

use super::assert_parent_links;

const SOURCE: &str = r#"
class S {
    void m(int p) {
        int a = 1, b;
        final String s = "x";
        for (int i = 0; i < a; i++) { int inner = i; }
        for (String t : list) { }
        try (Reader r = open()) { } catch (IOException | RuntimeException e) { } finally { }
        if (a > b) b = a >> 1; else b >>>= 2;
        label: while (true) { break label; }
        switch (a) { case 1: break; default: }
        Runnable run = () -> { };
        class Local {}
        List<Map<String, Integer>> nested = null;
    }
}
"#;

fn method_body(tree: &jsym_syntax::SyntaxTree) -> jsym_syntax::NodeId {
    let ty = tree.find_type("S").unwrap();
    let method = tree.as_type(ty).unwrap().members[0];
    tree.as_method(method).unwrap().body.unwrap()
}

#[test]
fn local_variables_in_source_order() {
    let tree = parse(SOURCE).unwrap();
    let locals: Vec<_> = tree
        .descendants(method_body(&tree))
        .into_iter()
        .filter_map(|id| match tree.kind(id) {
            NodeKind::LocalVar(local) => Some(local.name.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(
        locals,
        vec!["a", "b", "s", "i", "inner", "t", "r", "run", "nested"]
    );
}

#[test]
fn statement_shapes() {
    let tree = parse(SOURCE).unwrap();
    let body = method_body(&tree);
    let NodeKind::Block(block) = tree.kind(body) else {
        panic!("method body is a block");
    };

    let stmts: Vec<_> = block
        .stmts
        .iter()
        .map(|&id| match tree.kind(id) {
            NodeKind::LocalVar(_) => "local",
            NodeKind::Stmt(Stmt::For { .. }) => "for",
            NodeKind::Stmt(Stmt::ForEach { .. }) => "foreach",
            NodeKind::Stmt(Stmt::Try { .. }) => "try",
            NodeKind::Stmt(Stmt::If { .. }) => "if",
            NodeKind::Stmt(Stmt::While { .. }) => "while",
            NodeKind::Stmt(Stmt::Other) => "other",
            NodeKind::Stmt(Stmt::LocalType(_)) => "class",
            other => panic!("unexpected statement {other:?}"),
        })
        .collect();
    assert_eq!(
        stmts,
        vec![
            "local", "local", "local", "for", "foreach", "try", "if", "while", "other", "local",
            "class", "local"
        ]
    );
}

#[test]
fn catch_clause_parameter() {
    let tree = parse(SOURCE).unwrap();
    let clause = tree
        .descendants(tree.root())
        .into_iter()
        .find_map(|id| match tree.kind(id) {
            NodeKind::CatchClause(clause) => Some(clause.clone()),
            _ => None,
        })
        .unwrap();
    let param = tree.as_parameter(clause.param).unwrap();
    assert_eq!(param.name, "e");
    assert_eq!(param.ty.class_name().as_deref(), Some("IOException"));
}

#[test]
fn shifts_and_comparisons_from_split_angle_tokens() {
    let tree = parse(SOURCE).unwrap();
    let ops: Vec<_> = tree
        .descendants(tree.root())
        .into_iter()
        .filter_map(|id| match tree.as_expr(id) {
            Some(Expr::Binary { op, .. }) => Some(*op),
            _ => None,
        })
        .collect();
    assert_eq!(ops, vec![BinaryOp::Lt, BinaryOp::Gt, BinaryOp::Shr]);

    let assigns = tree
        .descendants(tree.root())
        .into_iter()
        .filter(|&id| matches!(tree.as_expr(id), Some(Expr::Assign { .. })))
        .count();
    assert_eq!(assigns, 2);
}

#[test]
fn lambdas_are_kept_as_unsupported_expressions() {
    let tree = parse(SOURCE).unwrap();
    let run = tree
        .descendants(tree.root())
        .into_iter()
        .find_map(|id| match tree.kind(id) {
            NodeKind::LocalVar(local) if local.name == "run" => local.init,
            _ => None,
        })
        .unwrap();
    assert!(matches!(tree.as_expr(run), Some(Expr::Unsupported)));
    assert_eq!(tree.source_of(run), "() -> { }");
}

#[test]
fn nested_generic_local_type() {
    let tree = parse(SOURCE).unwrap();
    let nested = tree
        .descendants(tree.root())
        .into_iter()
        .find_map(|id| match tree.kind(id) {
            NodeKind::LocalVar(local) if local.name == "nested" => Some(local.ty.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(nested.class_name().as_deref(), Some("List"));
    let map = &nested.type_args()[0];
    assert_eq!(map.class_name().as_deref(), Some("Map"));
    assert_eq!(map.type_args().len(), 2);
}

#[test]
fn every_node_is_linked_to_its_parent() {
    let tree = parse(SOURCE).unwrap();
    assert_parent_links(&tree);
}
