use jsym_core::fs::{replace_file, staging_path};
use pretty_assertions::assert_eq;

#[test]
fn replaces_contents_and_leaves_no_staging_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("A.java");
    std::fs::write(&path, "class A {}\n").unwrap();

    replace_file(&path, b"/** A. */\nclass A {}\n").unwrap();

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "/** A. */\nclass A {}\n"
    );
    assert!(!staging_path(&path).exists());
}

#[test]
fn creates_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("B.java");

    replace_file(&path, b"class B {}").unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "class B {}");
}

#[test]
fn staging_path_is_a_sibling() {
    let path = std::path::Path::new("/src/a/C.java");
    assert_eq!(staging_path(path), std::path::PathBuf::from("/src/a/C.java.new"));
}
