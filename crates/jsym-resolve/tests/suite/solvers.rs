use jsym_config::{ErrorPolicy, ResolverConfig};
use jsym_resolve::reflection::ClassMirror;
use jsym_resolve::solver::{
    from_config, ClassArchiveTypeSolver, CombinedTypeSolver, MemoryTypeSolver,
    ReflectionTypeSolver,
};
use jsym_types::{Error, TypeDeclarationKind, TypeSolver};
use pretty_assertions::assert_eq;

fn corrupt_classes() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Bad.class"), b"\0\0\0\0").unwrap();
    dir
}

fn fallback() -> TypeSolver {
    let memory = MemoryTypeSolver::new();
    memory.add_mirror(ClassMirror::new("", "Bad", TypeDeclarationKind::Class));
    memory.solver()
}

#[test]
fn first_solved_child_wins() {
    let first = MemoryTypeSolver::new();
    first.add_mirror(ClassMirror::new("java.lang", "String", TypeDeclarationKind::Interface));
    let solver = CombinedTypeSolver::build(
        vec![first.solver(), TypeSolver::new(ReflectionTypeSolver::platform())],
        ErrorPolicy::Propagate,
    )
    .unwrap();

    assert!(solver.solve_type("java.lang.String").unwrap().is_interface());
    assert!(solver.solve_type("java.lang.Integer").unwrap().is_class());
    assert_eq!(solver.label(), "combined[memory, reflection(jre)]");
}

#[test]
fn failures_propagate_unless_skipped() {
    let dir = corrupt_classes();

    let strict = CombinedTypeSolver::build(
        vec![TypeSolver::new(ClassArchiveTypeSolver::new(dir.path())), fallback()],
        ErrorPolicy::Propagate,
    )
    .unwrap();
    assert!(matches!(strict.try_to_solve_type("Bad"), Err(Error::Environment { .. })));

    let lenient = CombinedTypeSolver::build(
        vec![TypeSolver::new(ClassArchiveTypeSolver::new(dir.path())), fallback()],
        ErrorPolicy::SkipFailing,
    )
    .unwrap();
    let bad = lenient.solve_type("Bad").unwrap();
    assert_eq!(bad.qualified_name(), "Bad");
}

#[test]
fn children_cannot_join_two_chains() {
    let child = MemoryTypeSolver::new().solver();
    let _first = CombinedTypeSolver::build(vec![child.clone()], ErrorPolicy::Propagate).unwrap();
    let second = CombinedTypeSolver::build(vec![child], ErrorPolicy::Propagate);
    assert!(matches!(second, Err(Error::InvalidInput(_))));
}

#[test]
fn memory_registrations_are_shared_between_handles() {
    let memory = MemoryTypeSolver::new();
    let solver = memory.solver();
    assert!(memory.is_empty());
    assert!(!solver.try_to_solve_type("p.Late").unwrap().is_solved());

    memory.add_source(std::sync::Arc::new(
        jsym_syntax::parse("package p; class Late { class Nested {} }").unwrap(),
    ));
    assert_eq!(memory.len(), 2);
    assert!(solver.try_to_solve_type("p.Late.Nested").unwrap().is_solved());
}

#[test]
fn config_builds_the_chain_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let sources = dir.path().join("src");
    std::fs::create_dir_all(sources.join("p")).unwrap();
    std::fs::write(sources.join("p/Local.java"), "package p; public class Local {}").unwrap();

    let config = ResolverConfig::from_toml_str(&format!(
        r#"
[solver]
cache_size_limit = 16

[[solver.entries]]
kind = "source-dir"
path = "{}"

[[solver.entries]]
kind = "reflection"
jre_only = true
"#,
        sources.display().to_string().replace('\\', "/")
    ))
    .unwrap();

    let solver = from_config(&config).unwrap();
    assert!(solver.label().starts_with("combined[source("));
    assert!(solver.try_to_solve_type("p.Local").unwrap().is_solved());
    assert!(solver.try_to_solve_type("java.util.List").unwrap().is_solved());
}

#[test]
fn config_rejects_missing_paths() {
    let dir = tempfile::tempdir().unwrap();
    let config = ResolverConfig::from_toml_str(&format!(
        "[[solver.entries]]\nkind = \"class-archive\"\npath = \"{}\"\n",
        dir.path().join("missing.jar").display().to_string().replace('\\', "/")
    ))
    .unwrap();
    assert!(matches!(from_config(&config), Err(Error::InvalidInput(_))));
}
