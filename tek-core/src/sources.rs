use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::CoreError;

pub const SOURCE_EXTENSION: &str = "tek";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// The root passed to [`load_sources`] joined with the file's location
    /// below it.
    pub path: PathBuf,
    pub contents: String,
}

/// Load `root` itself when it is a file, or every `.tek` file below it.
///
/// Files come back sorted by path.
pub fn load_sources(root: impl AsRef<Path>) -> Result<Vec<SourceFile>, CoreError> {
    let root = root.as_ref();
    if !root.exists() {
        return Err(CoreError::MissingSource(root.to_path_buf()));
    }

    if root.is_file() {
        return Ok(vec![SourceFile {
            path: root.to_path_buf(),
            contents: fs::read_to_string(root)?,
        }]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION) {
            files.push(SourceFile {
                path: path.to_path_buf(),
                contents: fs::read_to_string(path)?,
            });
        }
    }
    files.sort_by(|a, b| a.path.cmp(&b.path));

    debug!(root = %root.display(), files = files.len(), "loaded sources");
    Ok(files)
}
