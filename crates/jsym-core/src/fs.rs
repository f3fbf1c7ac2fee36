//! Whole-file replacement.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Sibling path used while a replacement is being written.
#[must_use]
pub fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".new");
    path.with_file_name(name)
}

/// Replace the contents of `path` with `contents`.
///
/// The new contents are written and synced to `<path>.new` first, which is
/// then renamed over `path`. Readers never observe a half-written file, but
/// two concurrent callers on the same path race; callers serialize per path.
pub fn replace_file(path: &Path, contents: &[u8]) -> io::Result<()> {
    if path.file_name().is_none() {
        return Err(io::Error::other(format!(
            "{} does not name a file",
            path.display()
        )));
    }
    let staging = staging_path(path);

    let written = (|| -> io::Result<()> {
        let mut file = fs::File::create(&staging)?;
        file.write_all(contents)?;
        file.sync_all()
    })();
    if let Err(err) = written {
        remove_best_effort(&staging);
        return Err(err);
    }

    if let Err(err) = rename_over(&staging, path) {
        remove_best_effort(&staging);
        return Err(err);
    }
    Ok(())
}

fn rename_over(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        // `rename` does not overwrite on every platform.
        Err(err) if to.exists() => {
            fs::remove_file(to).map_err(|_| err)?;
            fs::rename(from, to)
        }
        Err(err) => Err(err),
    }
}

fn remove_best_effort(path: &Path) {
    if let Err(err) = fs::remove_file(path) {
        if err.kind() != io::ErrorKind::NotFound {
            tracing::debug!(
                target = "jsym.fs",
                path = %path.display(),
                error = %err,
                "failed to remove staging file"
            );
        }
    }
}
