use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use jsym_archive::Archive;
use jsym_classfile::{ClassFile, ClassStub};
use jsym_types::{Error, Result, SymbolReference, TypeDeclRef, TypeSolver, TypeSolverBackend};

use super::{Cache, DEFAULT_CACHE_SIZE_LIMIT};
use crate::bytecode::ClassDeclaration;

/// Answers from `.class` files in a jar or a class directory.
///
/// Nested classes live in `Outer$Inner.class`, so `a.b.C.D` is looked up as
/// `a/b/C/D.class`, then `a/b/C$D.class`, then `a/b$C$D.class`, and so on.
pub struct ClassArchiveTypeSolver {
    archive: Archive,
    /// Query name to the class it names.
    stubs: Cache<String, Option<Arc<ClassStub>>>,
}

impl ClassArchiveTypeSolver {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_cache_size_limit(path, DEFAULT_CACHE_SIZE_LIMIT)
    }

    #[must_use]
    pub fn with_cache_size_limit(path: impl Into<PathBuf>, cache_size_limit: usize) -> Self {
        Self {
            archive: Archive::new(path),
            stubs: Cache::new(cache_size_limit),
        }
    }

    fn search(&self, name: &str) -> Result<Option<Arc<ClassStub>>> {
        let segments: Vec<&str> = name.split('.').collect();
        for package_len in (0..segments.len()).rev() {
            let class = segments[package_len..].join("$");
            let entry = if package_len == 0 {
                format!("{class}.class")
            } else {
                format!("{}/{class}.class", segments[..package_len].join("/"))
            };
            let bytes = self.archive.read(&entry).map_err(|err| {
                Error::environment(
                    format!("reading {entry} from {}", self.archive.path().display()),
                    err,
                )
            })?;
            let Some(bytes) = bytes else {
                continue;
            };
            tracing::debug!(target = "jsym.solver", name, entry = %entry, "reading class file");
            let stub = ClassFile::parse(&bytes)
                .and_then(|class| class.stub())
                .map_err(|err| {
                    Error::environment(
                        format!("parsing {entry} from {}", self.archive.path().display()),
                        err,
                    )
                })?;
            if stub.qualified_name() == name {
                return Ok(Some(Arc::new(stub)));
            }
        }
        Ok(None)
    }
}

impl fmt::Debug for ClassArchiveTypeSolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassArchiveTypeSolver")
            .field("path", &self.archive.path())
            .finish_non_exhaustive()
    }
}

impl TypeSolverBackend for ClassArchiveTypeSolver {
    fn label(&self) -> String {
        format!("classes({})", self.archive.path().display())
    }

    fn try_to_solve_type(
        &self,
        name: &str,
        root: &TypeSolver,
    ) -> Result<SymbolReference<TypeDeclRef>> {
        let stub = match self.stubs.get(name) {
            Some(stub) => stub,
            None => {
                let stub = self.search(name)?;
                self.stubs.insert(name.to_string(), stub.clone());
                stub
            }
        };
        Ok(stub
            .map(|stub| Arc::new(ClassDeclaration::new(stub, root.clone())) as TypeDeclRef)
            .into())
    }
}
