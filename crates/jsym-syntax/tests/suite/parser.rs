use jsym_syntax::{parse, BlockTagKind, JavaParser, Javadoc, ParseError};
use pretty_assertions::assert_eq;

#[test]
fn syntax_errors_carry_position() {
    let err = parse("class A {\n  int x = ;\n}").unwrap_err();
    let ParseError::Syntax {
        message,
        offset,
        position,
    } = &err
    else {
        panic!("expected syntax error, got {err:?}");
    };
    assert_eq!(*offset, 20);
    assert_eq!((position.line, position.col), (1, 10));
    assert!(message.starts_with("expected expression"), "{message}");
    assert!(err.to_string().starts_with("2:11: "), "{err}");
}

#[test]
fn unterminated_comment_is_a_syntax_error() {
    assert!(matches!(
        parse("class A {} /* open"),
        Err(ParseError::Syntax { .. })
    ));
}

#[test]
fn parser_counts_parses() {
    let parser = JavaParser::new();
    assert_eq!(parser.parse_count(), 0);
    parser.parse("class A {}").unwrap();
    parser.parse("class {").unwrap_err();
    assert_eq!(parser.parse_count(), 2);
}

#[test]
fn parse_file_records_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("A.java");
    std::fs::write(&path, "package p; class A {}").unwrap();

    let parser = JavaParser::new();
    let tree = parser.parse_file(&path).unwrap();
    assert_eq!(tree.path(), Some(path.as_path()));
    assert_eq!(tree.package_name(), "p");

    let missing = parser.parse_file(&dir.path().join("Missing.java")).unwrap_err();
    assert!(matches!(missing, ParseError::Io { .. }));
}

#[test]
fn doc_comments_parse_and_attach() {
    let tree = parse(
        "class A {\n    /**\n     * Sums.\n     * @param a first\n     */\n    int sum(int a) { return a; }\n    void bare() {}\n}",
    )
    .unwrap();
    let ty = tree.find_type("A").unwrap();
    let members = tree.as_type(ty).unwrap().members.clone();

    let sum = tree.as_method(members[0]).unwrap();
    let doc = Javadoc::parse(&sum.doc.as_ref().unwrap().text);
    assert_eq!(doc.description.to_string(), "Sums.");
    assert_eq!(doc.block_tags[0].kind, BlockTagKind::Param);
    assert_eq!(doc.block_tags[0].name.as_deref(), Some("a"));

    assert!(tree.as_method(members[1]).unwrap().doc.is_none());
    assert_eq!(tree.attached_doc(members[1]), None);
    tree.attach_doc(members[1], Javadoc::new("Does nothing."));
    assert_eq!(tree.attached_doc(members[1]), Some(Javadoc::new("Does nothing.")));
}
