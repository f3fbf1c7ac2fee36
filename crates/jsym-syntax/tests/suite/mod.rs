mod declarations;
mod parser;
mod statements;

use jsym_syntax::{NodeId, NodeKind, SyntaxTree};

/// Every node reachable from the root points back at the node that lists it.
pub(crate) fn assert_parent_links(tree: &SyntaxTree) {
    for id in tree.descendants(tree.root()) {
        if id == tree.root() {
            assert_eq!(tree.parent(id), None);
            continue;
        }
        let parent = tree.parent(id).expect("non-root node has a parent");
        assert!(
            tree.kind(parent).children().contains(&id),
            "{id:?} not listed by its parent {parent:?}"
        );
    }
}

/// Initializer expression of the named field of the first top-level type.
pub(crate) fn field_init(tree: &SyntaxTree, name: &str) -> NodeId {
    let ty = tree.compilation_unit().types[0];
    tree.as_type(ty)
        .unwrap()
        .members
        .iter()
        .find_map(|&m| match tree.kind(m) {
            NodeKind::Field(field) if field.name == name => field.init,
            _ => None,
        })
        .unwrap_or_else(|| panic!("no initialized field {name}"))
}
