use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::RewriteError;

pub(crate) fn io_err(path: &Path, source: io::Error) -> RewriteError {
    RewriteError::Io {
        path: path.to_path_buf(),
        source,
    }
}

pub(crate) fn read_file(path: &Path) -> Result<String, RewriteError> {
    fs::read_to_string(path).map_err(|source| io_err(path, source))
}

pub(crate) fn write_file(path: &Path, contents: &str) -> Result<(), RewriteError> {
    fs::write(path, contents).map_err(|source| io_err(path, source))
}

/// Recursively collect every file under `root`.
///
/// Directories that vanish mid-walk are treated as empty. Symbolic links
/// are neither followed nor carried over; the walk fails on the first one.
pub(crate) fn collect_files(root: &Path) -> Result<Vec<PathBuf>, RewriteError> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
            Err(err) => return Err(io_err(&dir, err)),
        };

        for entry in entries {
            let entry = entry.map_err(|source| io_err(&dir, source))?;
            let file_type = entry.file_type().map_err(|source| io_err(&dir, source))?;
            let path = entry.path();

            if file_type.is_symlink() {
                return Err(RewriteError::UnsupportedLink { path });
            }
            if file_type.is_dir() {
                pending.push(path);
            } else if file_type.is_file() {
                files.push(path);
            }
        }
    }

    Ok(files)
}
