use jsym_resolve::solver::SourceArchiveTypeSolver;
use jsym_syntax::{BlockTag, BlockTagKind, Javadoc};
use jsym_types::TypeSolver;
use pretty_assertions::assert_eq;

use super::fixture::world;

fn method(solver: &TypeSolver, type_name: &str, name: &str) -> jsym_types::MethodRef {
    solver
        .solve_type(type_name)
        .unwrap()
        .declared_methods()
        .unwrap()
        .into_iter()
        .find(|m| m.name() == name)
        .unwrap()
}

#[test]
fn inserts_and_then_replaces_doc_comments() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("p/Greeter.java");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(
        &path,
        "package p;\n\nclass Greeter {\n    String greet(String name) {\n        return name;\n    }\n}\n",
    )
    .unwrap();
    let solver = TypeSolver::new(SourceArchiveTypeSolver::new(dir.path()));
    let greet = method(&solver, "p.Greeter", "greet");

    let doc = Javadoc::new("Says hello.").with_tag(BlockTag::new(
        BlockTagKind::Param,
        Some("name"),
        "who to greet",
    ));
    assert!(greet.set_javadoc(&doc).unwrap());
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "package p;\n\nclass Greeter {\n    /**\n     * Says hello.\n     *\n     * @param name who to greet\n     */\n    String greet(String name) {\n        return name;\n    }\n}\n"
    );

    assert!(greet.set_javadoc(&Javadoc::new("Greets.")).unwrap());
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "package p;\n\nclass Greeter {\n    /**\n     * Greets.\n     */\n    String greet(String name) {\n        return name;\n    }\n}\n"
    );
}

#[test]
fn existing_comments_are_replaced_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("A.java");
    std::fs::write(
        &path,
        "class A {\n    /** Old. */\n    void m() {}\n\n    void n() {}\n}\n",
    )
    .unwrap();
    let solver = TypeSolver::new(SourceArchiveTypeSolver::new(dir.path()));

    assert!(method(&solver, "A", "m").set_javadoc(&Javadoc::new("New.")).unwrap());
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "class A {\n    /**\n     * New.\n     */\n    void m() {}\n\n    void n() {}\n}\n"
    );
}

#[test]
fn trees_without_a_file_are_left_alone() {
    let world = world(&["class A { void m() {} }"]);
    let m = method(&world.solver, "A", "m");
    assert!(!m.set_javadoc(&Javadoc::new("Nothing to write.")).unwrap());
}
