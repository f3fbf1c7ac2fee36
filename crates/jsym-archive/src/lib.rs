//! Read access to source/class archives: zip or jar files and exploded
//! directories, addressed by `/`-separated entry names.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use parking_lot::Mutex;
use zip::ZipArchive;

#[derive(Debug)]
pub struct Archive {
    path: PathBuf,
    kind: ArchiveKind,
}

#[derive(Debug)]
enum ArchiveKind {
    Directory,
    Zip {
        /// Opened lazily; `ZipArchive` needs `&mut` to read entries.
        zip: Mutex<Option<ZipArchive<File>>>,
    },
}

impl Archive {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let kind = if path.is_dir() {
            ArchiveKind::Directory
        } else {
            ArchiveKind::Zip {
                zip: Mutex::new(None),
            }
        };
        Self { path, kind }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read an entry. Returns `Ok(None)` when it does not exist.
    pub fn read(&self, name: &str) -> anyhow::Result<Option<Vec<u8>>> {
        match &self.kind {
            ArchiveKind::Directory => {
                let candidate = self.path.join(name);
                if !candidate.is_file() {
                    return Ok(None);
                }
                let mut buf = Vec::new();
                File::open(&candidate)
                    .with_context(|| format!("failed to open {}", candidate.display()))?
                    .read_to_end(&mut buf)
                    .with_context(|| format!("failed to read {}", candidate.display()))?;
                Ok(Some(buf))
            }
            ArchiveKind::Zip { .. } => self.with_zip(|zip| match zip.by_name(name) {
                Ok(mut entry) => {
                    let mut buf = Vec::new();
                    entry.read_to_end(&mut buf).with_context(|| {
                        format!("failed to read {name} from {}", self.path.display())
                    })?;
                    Ok(Some(buf))
                }
                Err(zip::result::ZipError::FileNotFound) => Ok(None),
                Err(err) => Err(err).with_context(|| {
                    format!("failed to read {name} from zip {}", self.path.display())
                }),
            }),
        }
    }

    pub fn read_to_string(&self, name: &str) -> anyhow::Result<Option<String>> {
        let Some(bytes) = self.read(name)? else {
            return Ok(None);
        };
        let text = String::from_utf8(bytes)
            .with_context(|| format!("{name} in {} is not UTF-8", self.path.display()))?;
        Ok(Some(text))
    }

    pub fn contains(&self, name: &str) -> anyhow::Result<bool> {
        match &self.kind {
            ArchiveKind::Directory => Ok(self.path.join(name).is_file()),
            ArchiveKind::Zip { .. } => {
                self.with_zip(|zip| Ok(zip.index_for_name(name).is_some()))
            }
        }
    }

    /// File entries directly inside `dir` (no recursion), sorted by name.
    ///
    /// `dir` is an entry prefix such as `a/b`; `""` lists the root.
    pub fn child_entries(&self, dir: &str) -> anyhow::Result<Vec<String>> {
        let dir = dir.trim_end_matches('/');
        let mut children = match &self.kind {
            ArchiveKind::Directory => {
                let root = self.path.join(dir);
                if !root.is_dir() {
                    return Ok(Vec::new());
                }
                let mut children = Vec::new();
                for entry in walkdir::WalkDir::new(&root).min_depth(1).max_depth(1) {
                    let entry = entry
                        .with_context(|| format!("failed to list {}", root.display()))?;
                    if entry.file_type().is_file() {
                        let file_name = entry.file_name().to_string_lossy();
                        children.push(join_entry(dir, &file_name));
                    }
                }
                children
            }
            ArchiveKind::Zip { .. } => self.with_zip(|zip| {
                Ok(zip
                    .file_names()
                    .filter(|name| !name.ends_with('/') && parent_path(name) == dir)
                    .map(str::to_string)
                    .collect())
            })?,
        };
        children.sort();
        tracing::debug!(
            target = "jsym.archive",
            archive = %self.path.display(),
            dir,
            count = children.len(),
            "listed archive directory"
        );
        Ok(children)
    }

    fn with_zip<T>(
        &self,
        f: impl FnOnce(&mut ZipArchive<File>) -> anyhow::Result<T>,
    ) -> anyhow::Result<T> {
        let ArchiveKind::Zip { zip } = &self.kind else {
            anyhow::bail!("{} is not a zip archive", self.path.display());
        };
        let mut guard = zip.lock();
        if guard.is_none() {
            let file = File::open(&self.path)
                .with_context(|| format!("failed to open archive {}", self.path.display()))?;
            let archive = ZipArchive::new(file)
                .with_context(|| format!("failed to read zip {}", self.path.display()))?;
            *guard = Some(archive);
        }
        match guard.as_mut() {
            Some(archive) => f(archive),
            None => anyhow::bail!("zip {} is not open", self.path.display()),
        }
    }
}

/// Directory part of an entry name: `a/b/C.java` -> `a/b`, `C.java` -> ``.
#[must_use]
pub fn parent_path(name: &str) -> &str {
    let name = name.trim_end_matches('/');
    match name.rfind('/') {
        Some(idx) => &name[..idx],
        None => "",
    }
}

fn join_entry(dir: &str, file_name: &str) -> String {
    if dir.is_empty() {
        file_name.to_string()
    } else {
        format!("{dir}/{file_name}")
    }
}
