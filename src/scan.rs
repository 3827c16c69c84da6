//! Source discovery.
//!
//! Walks the source tree and collects every markdown file. Entries are visited
//! in file-name order within each directory, so the result is deterministic
//! for a given tree and matches what a reader sees in a sorted listing:
//!
//! ```text
//! pages-md/
//! ├── 20240101-hello.md     → 1
//! ├── about/
//! │   └── index.md          → 2
//! ├── index.md              → 3
//! └── notes.txt             (not markdown, skipped)
//! ```
//!
//! The order matters downstream: it is the page rendering order and therefore
//! the order of entries on the listing page.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Extension identifying markdown sources.
pub const MARKDOWN_EXTENSION: &str = "md";

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Cannot walk source tree: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Source root is not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// A markdown file found under the source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// Path as discovered (starts with the source root).
    pub path: PathBuf,
    /// Path relative to the source root.
    pub relative: PathBuf,
}

impl SourceDocument {
    /// Read the document as text. Invalid UTF-8 sequences become U+FFFD
    /// instead of failing the build.
    pub fn read(&self) -> io::Result<String> {
        let bytes = fs::read(&self.path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Relative path with `/` separators on every platform.
    pub fn relative_slashed(&self) -> String {
        slashed(&self.relative)
    }
}

/// Join path components with `/`.
pub fn slashed(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Collect every markdown file below `root`, in traversal order.
pub fn scan(root: &Path) -> Result<Vec<SourceDocument>, ScanError> {
    let mut documents = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.depth() == 0 && !entry.file_type().is_dir() {
            return Err(ScanError::NotADirectory(root.to_path_buf()));
        }
        if entry.file_type().is_file() && is_markdown(entry.path()) {
            let path = entry.into_path();
            let relative = path
                .strip_prefix(root)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| path.clone());
            documents.push(SourceDocument { path, relative });
        }
    }

    Ok(documents)
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case(MARKDOWN_EXTENSION))
        .unwrap_or(false)
}
