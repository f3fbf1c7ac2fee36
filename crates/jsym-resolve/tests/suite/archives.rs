use std::io::Write;
use std::path::Path;

use jsym_classfile::access::{ACC_PUBLIC, ACC_STATIC, ACC_SUPER, ACC_TRANSIENT, ACC_VOLATILE};
use jsym_classfile::{ClassFile, ClassMember, InnerClassInfo};
use jsym_config::ErrorPolicy;
use jsym_resolve::solver::{
    ClassArchiveTypeSolver, CombinedTypeSolver, ReflectionTypeSolver, SourceArchiveTypeSolver,
};
use jsym_types::TypeSolver;
use pretty_assertions::assert_eq;
use zip::write::SimpleFileOptions;

fn write_jar(path: &Path, entries: &[(&str, &[u8])]) {
    let mut jar = zip::ZipWriter::new(std::fs::File::create(path).unwrap());
    let options = SimpleFileOptions::default();
    for (name, contents) in entries {
        jar.start_file(*name, options).unwrap();
        jar.write_all(contents).unwrap();
    }
    jar.finish().unwrap();
}

const SOURCES: &[(&str, &[u8])] = &[
    (
        "a/b/C.java",
        b"package a.b;\npublic class C {\n    public static class Inner { public int v; }\n}\n",
    ),
    (
        "a/b/Helper.java",
        b"package a.b;\npublic class Helper {}\nclass Hidden { Helper helper; }\n",
    ),
    ("a/b/Broken.java", b"package a.b; class {{{"),
    ("a/Other.java", b"package a; class Other {}\n"),
];

#[test]
fn nested_types_resolve_through_file_prefixes() {
    let dir = tempfile::tempdir().unwrap();
    let jar = dir.path().join("lib-sources.jar");
    write_jar(&jar, SOURCES);

    let backend = SourceArchiveTypeSolver::new(&jar);
    let parser = backend.parser().clone();
    let solver = TypeSolver::new(backend);

    let inner = solver.solve_type("a.b.C.Inner").unwrap();
    assert_eq!(inner.qualified_name(), "a.b.C.Inner");
    assert_eq!(inner.class_name(), "C.Inner");
    let fields: Vec<String> = inner.declared_fields().unwrap().iter().map(|f| f.name()).collect();
    assert_eq!(fields, vec!["v"]);

    let parsed = parser.parse_count();
    assert!(solver.try_to_solve_type("a.b.C.Inner").unwrap().is_solved());
    assert_eq!(parser.parse_count(), parsed, "repeat queries are served from the cache");
}

#[test]
fn one_source_solver_serves_many_threads() {
    const THREADS: usize = 8;
    const NAMES: &[&str] = &["a.b.C", "a.b.C.Inner", "a.b.Helper", "a.b.Hidden", "a.Other"];
    // C, Helper, Broken and Other; widening for Hidden reads all of `a/b`.
    const FILES: usize = 4;

    let dir = tempfile::tempdir().unwrap();
    let jar = dir.path().join("lib-sources.jar");
    write_jar(&jar, SOURCES);
    let backend = SourceArchiveTypeSolver::new(&jar);
    let parser = backend.parser().clone();
    let solver = TypeSolver::new(backend);

    let run_all = || {
        std::thread::scope(|scope| {
            for thread in 0..THREADS {
                let solver = &solver;
                scope.spawn(move || {
                    // Every thread asks for every name, starting at a different one.
                    for offset in 0..NAMES.len() {
                        let name = NAMES[(thread + offset) % NAMES.len()];
                        let found = solver.solve_type(name).unwrap();
                        assert_eq!(found.qualified_name(), name);
                    }
                });
            }
        });
    };

    run_all();
    let parsed = parser.parse_count();
    assert!(parsed >= FILES, "{parsed} parses");
    assert!(parsed <= FILES * THREADS, "{parsed} parses");

    run_all();
    assert_eq!(parser.parse_count(), parsed, "every file is cached after the first round");
}

#[test]
fn package_private_types_are_found_in_sibling_files() {
    let dir = tempfile::tempdir().unwrap();
    let jar = dir.path().join("lib-sources.jar");
    write_jar(&jar, SOURCES);
    let solver = TypeSolver::new(SourceArchiveTypeSolver::new(&jar));

    let hidden = solver.solve_type("a.b.Hidden").unwrap();
    assert_eq!(hidden.qualified_name(), "a.b.Hidden");

    assert!(!solver.try_to_solve_type("a.b.Missing").unwrap().is_solved());
    // `Other` is in package `a`, not `a.b`.
    assert!(!solver.try_to_solve_type("a.b.Other").unwrap().is_solved());
    assert!(solver.try_to_solve_type("a.Other").unwrap().is_solved());
}

#[test]
fn source_directories_work_like_archives() {
    let dir = tempfile::tempdir().unwrap();
    for (name, contents) in SOURCES {
        let path = dir.path().join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, contents).unwrap();
    }
    let solver = TypeSolver::new(SourceArchiveTypeSolver::new(dir.path()));

    let c = solver.solve_type("a.b.C").unwrap();
    assert_eq!(c.internal_types().unwrap().len(), 1);
    assert!(solver.try_to_solve_type("a.b.Hidden").unwrap().is_solved());
}

#[test]
fn source_declarations_resolve_supertypes_through_the_root() {
    let dir = tempfile::tempdir().unwrap();
    let jar = dir.path().join("lib-sources.jar");
    write_jar(
        &jar,
        &[(
            "a/Names.java",
            b"package a;\nimport java.util.ArrayList;\npublic class Names extends ArrayList<String> {}\n",
        )],
    );
    let solver = CombinedTypeSolver::build(
        vec![
            TypeSolver::new(SourceArchiveTypeSolver::new(&jar)),
            TypeSolver::new(ReflectionTypeSolver::platform()),
        ],
        ErrorPolicy::Propagate,
    )
    .unwrap();

    let names = solver.solve_type("a.Names").unwrap();
    assert!(names.type_solver().ptr_eq(&solver));
    let ancestors: Vec<String> = names.ancestors().unwrap().iter().map(|a| a.describe()).collect();
    assert_eq!(ancestors, vec!["java.util.ArrayList<java.lang.String>"]);
}

fn class_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();

    let mut outer = ClassFile::new(ACC_PUBLIC | ACC_SUPER, "a/b/Outer", Some("java/lang/Object"));
    outer.methods.push(ClassMember::new(ACC_PUBLIC, "size", "()I"));
    outer.inner_classes.push(InnerClassInfo {
        inner_class: "a/b/Outer$Inner".to_string(),
        outer_class: Some("a/b/Outer".to_string()),
        inner_name: Some("Inner".to_string()),
        access_flags: ACC_PUBLIC | ACC_STATIC,
    });

    let mut inner = ClassFile::new(
        ACC_PUBLIC | ACC_SUPER,
        "a/b/Outer$Inner",
        Some("java/lang/Object"),
    );
    inner.fields.push(ClassMember::new(ACC_PUBLIC, "name", "Ljava/lang/String;"));
    inner.inner_classes = outer.inner_classes.clone();

    let package = dir.path().join("a/b");
    std::fs::create_dir_all(&package).unwrap();
    std::fs::write(package.join("Outer.class"), outer.to_bytes()).unwrap();
    std::fs::write(package.join("Outer$Inner.class"), inner.to_bytes()).unwrap();
    dir
}

#[test]
fn class_files_resolve_nested_binary_names() {
    let dir = class_dir();
    let solver = CombinedTypeSolver::build(
        vec![
            TypeSolver::new(ClassArchiveTypeSolver::new(dir.path())),
            TypeSolver::new(ReflectionTypeSolver::platform()),
        ],
        ErrorPolicy::Propagate,
    )
    .unwrap();

    let outer = solver.solve_type("a.b.Outer").unwrap();
    let methods: Vec<String> = outer
        .declared_methods()
        .unwrap()
        .iter()
        .map(|m| m.signature().unwrap())
        .collect();
    assert_eq!(methods, vec!["size()"]);

    let inner = solver.solve_type("a.b.Outer.Inner").unwrap();
    assert_eq!(inner.qualified_name(), "a.b.Outer.Inner");
    let name = inner.field("name").unwrap().unwrap();
    assert_eq!(name.ty().unwrap().describe(), "java.lang.String");
    assert!(inner.all_ancestors().unwrap().iter().any(|a| a.is_java_lang_object()));

    assert!(!solver.try_to_solve_type("a.b.Outer.Missing").unwrap().is_solved());
}

#[test]
fn class_jars_are_read_like_directories() {
    let dir = class_dir();
    let jar = dir.path().join("lib.jar");
    let outer = std::fs::read(dir.path().join("a/b/Outer.class")).unwrap();
    write_jar(&jar, &[("a/b/Outer.class", &outer)]);

    let solver = TypeSolver::new(ClassArchiveTypeSolver::new(&jar));
    assert!(solver.try_to_solve_type("a.b.Outer").unwrap().is_solved());
    assert!(!solver.try_to_solve_type("a.b.Outer.Inner").unwrap().is_solved());
}

#[test]
fn class_members_report_modifiers_and_exceptions() {
    let dir = tempfile::tempdir().unwrap();
    let mut class = ClassFile::new(ACC_PUBLIC | ACC_SUPER, "a/Stream", Some("java/lang/Object"));
    class.fields.push(ClassMember::new(ACC_VOLATILE, "state", "I"));
    class.fields.push(ClassMember::new(ACC_TRANSIENT, "cache", "Ljava/lang/String;"));
    let mut read = ClassMember::new(ACC_PUBLIC, "read", "()I");
    read.exceptions = vec!["java/io/IOException".to_string()];
    class.methods.push(read);
    let mut fill = ClassMember::new(ACC_PUBLIC, "fill", "()V");
    fill.signature = Some("<X:Ljava/lang/Exception;>()V^TX;".to_string());
    fill.exceptions = vec!["java/lang/Exception".to_string()];
    class.methods.push(fill);
    std::fs::create_dir_all(dir.path().join("a")).unwrap();
    std::fs::write(dir.path().join("a/Stream.class"), class.to_bytes()).unwrap();

    let solver = CombinedTypeSolver::build(
        vec![
            TypeSolver::new(ClassArchiveTypeSolver::new(dir.path())),
            TypeSolver::new(ReflectionTypeSolver::platform()),
        ],
        ErrorPolicy::Propagate,
    )
    .unwrap();
    let stream = solver.solve_type("a.Stream").unwrap();

    let state = stream.field("state").unwrap().unwrap();
    assert!(state.is_volatile() && !state.is_transient());
    let cache = stream.field("cache").unwrap().unwrap();
    assert!(cache.is_transient() && !cache.is_volatile());

    let exceptions = |name: &str| -> Vec<String> {
        stream
            .declared_methods()
            .unwrap()
            .into_iter()
            .find(|m| m.name() == name)
            .unwrap()
            .specified_exceptions()
            .unwrap()
            .iter()
            .map(|ty| ty.describe())
            .collect()
    };
    assert_eq!(exceptions("read"), vec!["java.io.IOException"]);
    assert_eq!(exceptions("fill"), vec!["X"]);
}

#[test]
fn corrupt_class_files_are_environment_errors() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Bad.class"), b"not a class file").unwrap();
    let solver = TypeSolver::new(ClassArchiveTypeSolver::new(dir.path()));
    assert!(matches!(
        solver.try_to_solve_type("Bad"),
        Err(jsym_types::Error::Environment { .. })
    ));
}
