use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use jsym_core::{LineIndex, TextRange};
use parking_lot::Mutex;

use crate::ast::*;
use crate::javadoc::Javadoc;

/// A parsed compilation unit: an arena of nodes over one source snapshot.
#[derive(Debug)]
pub struct SyntaxTree {
    text: Arc<str>,
    path: Option<PathBuf>,
    nodes: Vec<NodeData>,
    root: NodeId,
    line_index: LineIndex,
    /// Documentation attached after parsing; such docs have no source range.
    attached_docs: Mutex<HashMap<NodeId, Javadoc>>,
}

impl SyntaxTree {
    pub(crate) fn new(
        text: Arc<str>,
        path: Option<PathBuf>,
        nodes: Vec<NodeData>,
        root: NodeId,
    ) -> Self {
        let line_index = LineIndex::new(&text);
        Self {
            text,
            path,
            nodes,
            root,
            line_index,
            attached_docs: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The file this tree was parsed from, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[must_use]
    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    #[must_use]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    #[must_use]
    pub fn range(&self, id: NodeId) -> TextRange {
        self.node(id).range
    }

    #[must_use]
    pub fn source_of(&self, id: NodeId) -> &str {
        &self.text[self.range(id)]
    }

    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&n| self.parent(n))
    }

    /// `id` and everything below it, in pre-order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            out.push(node);
            let children = self.kind(node).children();
            stack.extend(children.into_iter().rev());
        }
        out
    }

    #[must_use]
    pub fn compilation_unit(&self) -> &CompilationUnit {
        match self.kind(self.root) {
            NodeKind::CompilationUnit(cu) => cu,
            _ => unreachable!("tree root is always a compilation unit"),
        }
    }

    #[must_use]
    pub fn package_name(&self) -> &str {
        self.compilation_unit().package.as_deref().unwrap_or("")
    }

    #[must_use]
    pub fn as_type(&self, id: NodeId) -> Option<&TypeDecl> {
        match self.kind(id) {
            NodeKind::Type(ty) => Some(ty),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_method(&self, id: NodeId) -> Option<&MethodDecl> {
        match self.kind(id) {
            NodeKind::Method(method) => Some(method),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_field(&self, id: NodeId) -> Option<&FieldDecl> {
        match self.kind(id) {
            NodeKind::Field(field) => Some(field),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_parameter(&self, id: NodeId) -> Option<&ParameterDecl> {
        match self.kind(id) {
            NodeKind::Parameter(param) => Some(param),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_expr(&self, id: NodeId) -> Option<&Expr> {
        match self.kind(id) {
            NodeKind::Expr(expr) => Some(expr),
            _ => None,
        }
    }

    /// Find a member or top-level type by a dotted path of simple names
    /// (`Outer.Inner`). Local classes are not reachable this way.
    #[must_use]
    pub fn find_type(&self, path: &str) -> Option<NodeId> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self
            .compilation_unit()
            .types
            .iter()
            .copied()
            .find(|&id| self.as_type(id).is_some_and(|t| t.name == first))?;
        for segment in segments {
            current = self.member_types(current).find(|&id| {
                self.as_type(id).is_some_and(|t| t.name == segment)
            })?;
        }
        Some(current)
    }

    /// Types declared directly in the body of `ty`.
    pub fn member_types(&self, ty: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.as_type(ty)
            .map(|t| t.members.as_slice())
            .unwrap_or_default()
            .iter()
            .copied()
            .filter(|&m| self.as_type(m).is_some())
    }

    /// All top-level and member types, outermost first.
    pub fn all_types(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut queue: Vec<NodeId> = self.compilation_unit().types.clone();
        while !queue.is_empty() {
            let next: Vec<NodeId> = queue
                .iter()
                .flat_map(|&id| self.member_types(id).collect::<Vec<_>>())
                .collect();
            out.append(&mut queue);
            queue = next;
        }
        out
    }

    /// Nearest enclosing type declaration of `id` (not `id` itself).
    #[must_use]
    pub fn enclosing_type(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors(id).find(|&n| self.as_type(n).is_some())
    }

    /// Qualified name of a type declaration: package, enclosing types, name.
    /// Local types only get their enclosing types' names.
    #[must_use]
    pub fn qualified_name(&self, ty: NodeId) -> String {
        let mut names: Vec<&str> = std::iter::once(ty)
            .chain(self.ancestors(ty))
            .filter_map(|n| self.as_type(n).map(|t| t.name.as_str()))
            .collect();
        names.reverse();
        let nested = names.join(".");
        match self.package_name() {
            "" => nested,
            package => format!("{package}.{nested}"),
        }
    }

    /// Attach a documentation comment to a declaration after parsing.
    pub fn attach_doc(&self, id: NodeId, doc: Javadoc) {
        self.attached_docs.lock().insert(id, doc);
    }

    #[must_use]
    pub fn attached_doc(&self, id: NodeId) -> Option<Javadoc> {
        self.attached_docs.lock().get(&id).cloned()
    }
}
