use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use jsym_archive::{parent_path, Archive};
use jsym_syntax::{JavaParser, NodeId, SyntaxTree};
use jsym_types::{Error, Result, SymbolReference, TypeDeclRef, TypeSolver, TypeSolverBackend};

use super::{Cache, DEFAULT_CACHE_SIZE_LIMIT};
use crate::source::SourceTypeDeclaration;

type Found = Option<(Arc<SyntaxTree>, NodeId)>;

/// Answers from `.java` files in a zip, a jar or a source directory.
///
/// For `a.b.C.D` the files `a/b/C/D.java`, `a/b/C.java`, `a/b.java` and
/// `a.java` are tried in turn, each searched for the type path that starts
/// at the file's own name (`C.D` in `a/b/C.java`). When that file is missing
/// or lacks the type, every file of its directory is searched too, which
/// finds package-private top-level types.
pub struct SourceArchiveTypeSolver {
    archive: Archive,
    parser: Arc<JavaParser>,
    /// Entry name to its parsed tree; `None` for missing or unparsable files.
    files: Cache<String, Option<Arc<SyntaxTree>>>,
    /// Directory to the trees of the `.java` files directly inside it.
    dirs: Cache<String, Arc<Vec<Arc<SyntaxTree>>>>,
    /// Query name to where the type was found.
    found: Cache<String, Found>,
}

impl SourceArchiveTypeSolver {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_parser(path, Arc::new(JavaParser::new()), DEFAULT_CACHE_SIZE_LIMIT)
    }

    /// Share `parser` with other solvers; `cache_size_limit == 0` leaves the
    /// caches unbounded.
    #[must_use]
    pub fn with_parser(path: impl Into<PathBuf>, parser: Arc<JavaParser>, cache_size_limit: usize) -> Self {
        Self {
            archive: Archive::new(path),
            parser,
            files: Cache::new(cache_size_limit),
            dirs: Cache::new(cache_size_limit),
            found: Cache::new(cache_size_limit),
        }
    }

    #[must_use]
    pub fn parser(&self) -> &Arc<JavaParser> {
        &self.parser
    }

    fn search(&self, name: &str) -> Result<Found> {
        let segments: Vec<&str> = name.split('.').collect();
        for len in (1..=segments.len()).rev() {
            let entry = format!("{}.java", segments[..len].join("/"));
            let type_path = segments[len - 1..].join(".");
            if let Some(tree) = self.file(&entry)? {
                tracing::debug!(target = "jsym.solver", name, entry = %entry, "probing source file");
                if let Some(node) = declared_type(&tree, &type_path, name) {
                    return Ok(Some((tree, node)));
                }
            }

            let dir = parent_path(&entry);
            if dir.is_empty() {
                continue;
            }
            tracing::debug!(target = "jsym.solver", name, dir, "widening search to directory");
            for tree in self.directory(dir)?.iter() {
                if let Some(node) = declared_type(tree, &type_path, name) {
                    return Ok(Some((tree.clone(), node)));
                }
            }
        }
        Ok(None)
    }

    fn file(&self, entry: &str) -> Result<Option<Arc<SyntaxTree>>> {
        if let Some(cached) = self.files.get(entry) {
            return Ok(cached);
        }
        let text = self.archive.read_to_string(entry).map_err(|err| {
            Error::environment(
                format!("reading {entry} from {}", self.archive.path().display()),
                err,
            )
        })?;
        let tree = match text {
            None => None,
            Some(text) => {
                let storage = self
                    .archive
                    .path()
                    .is_dir()
                    .then(|| self.archive.path().join(entry));
                match self.parser.parse_with_path(&text, storage) {
                    Ok(tree) => Some(Arc::new(tree)),
                    Err(err) => {
                        tracing::debug!(
                            target = "jsym.solver",
                            archive = %self.archive.path().display(),
                            entry,
                            error = %err,
                            "skipping unparsable source file"
                        );
                        None
                    }
                }
            }
        };
        self.files.insert(entry.to_string(), tree.clone());
        Ok(tree)
    }

    fn directory(&self, dir: &str) -> Result<Arc<Vec<Arc<SyntaxTree>>>> {
        if let Some(cached) = self.dirs.get(dir) {
            return Ok(cached);
        }
        let entries = self.archive.child_entries(dir).map_err(|err| {
            Error::environment(
                format!("listing {dir} in {}", self.archive.path().display()),
                err,
            )
        })?;
        let mut trees = Vec::new();
        for entry in entries.iter().filter(|e| e.ends_with(".java")) {
            if let Some(tree) = self.file(entry)? {
                trees.push(tree);
            }
        }
        let trees = Arc::new(trees);
        self.dirs.insert(dir.to_string(), trees.clone());
        Ok(trees)
    }
}

/// The type at `type_path` in `tree`, provided the file's package makes it
/// `qualified_name`.
fn declared_type(tree: &SyntaxTree, type_path: &str, qualified_name: &str) -> Option<NodeId> {
    tree.find_type(type_path)
        .filter(|&node| tree.qualified_name(node) == qualified_name)
}

impl fmt::Debug for SourceArchiveTypeSolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceArchiveTypeSolver")
            .field("path", &self.archive.path())
            .finish_non_exhaustive()
    }
}

impl TypeSolverBackend for SourceArchiveTypeSolver {
    fn label(&self) -> String {
        format!("source({})", self.archive.path().display())
    }

    fn try_to_solve_type(
        &self,
        name: &str,
        root: &TypeSolver,
    ) -> Result<SymbolReference<TypeDeclRef>> {
        let found = match self.found.get(name) {
            Some(found) => {
                tracing::debug!(target = "jsym.solver", name, hit = found.is_some(), "type cache hit");
                found
            }
            None => {
                let found = self.search(name)?;
                self.found.insert(name.to_string(), found.clone());
                found
            }
        };
        Ok(found
            .map(|(tree, node)| Arc::new(SourceTypeDeclaration::at(&tree, node, root)) as TypeDeclRef)
            .into())
    }
}
