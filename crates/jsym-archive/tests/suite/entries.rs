use std::io::Write;
use std::path::Path;

use jsym_archive::Archive;
use pretty_assertions::assert_eq;
use zip::write::SimpleFileOptions;

fn write_jar(path: &Path, entries: &[(&str, &str)]) {
    let mut jar = zip::ZipWriter::new(std::fs::File::create(path).unwrap());
    let options = SimpleFileOptions::default();
    for (name, contents) in entries {
        jar.start_file(*name, options).unwrap();
        jar.write_all(contents.as_bytes()).unwrap();
    }
    jar.finish().unwrap();
}

const ENTRIES: &[(&str, &str)] = &[
    ("a/b/C.java", "class C {}"),
    ("a/b/D.java", "class D {}"),
    ("a/b/deep/E.java", "class E {}"),
    ("a/F.java", "class F {}"),
];

#[test]
fn jar_reads_and_lists_direct_children() {
    let dir = tempfile::tempdir().unwrap();
    let jar = dir.path().join("src.jar");
    write_jar(&jar, ENTRIES);
    let archive = Archive::new(&jar);

    assert_eq!(
        archive.read_to_string("a/b/C.java").unwrap().as_deref(),
        Some("class C {}")
    );
    assert_eq!(archive.read("a/b/Missing.java").unwrap(), None);
    assert!(archive.contains("a/F.java").unwrap());
    assert!(!archive.contains("a/G.java").unwrap());
    assert_eq!(
        archive.child_entries("a/b").unwrap(),
        vec!["a/b/C.java".to_string(), "a/b/D.java".to_string()]
    );
}

#[test]
fn directory_behaves_like_jar() {
    let dir = tempfile::tempdir().unwrap();
    for (name, contents) in ENTRIES {
        let path = dir.path().join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }
    let archive = Archive::new(dir.path());

    assert_eq!(
        archive.read_to_string("a/b/D.java").unwrap().as_deref(),
        Some("class D {}")
    );
    assert_eq!(archive.read("a/b").unwrap(), None);
    assert_eq!(
        archive.child_entries("a/b/").unwrap(),
        vec!["a/b/C.java".to_string(), "a/b/D.java".to_string()]
    );
    assert_eq!(archive.child_entries("nowhere").unwrap(), Vec::<String>::new());
}

#[test]
fn corrupt_archive_errors_name_the_archive() {
    let dir = tempfile::tempdir().unwrap();
    let jar = dir.path().join("broken.jar");
    std::fs::write(&jar, b"definitely not a zip").unwrap();

    let err = Archive::new(&jar).read("a/b/C.java").unwrap_err();
    assert!(format!("{err:#}").contains("broken.jar"), "{err:#}");
}
