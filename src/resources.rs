//! Resource mirroring.
//!
//! Copies the resource directory into the destination under its own name, so
//! `res/css/site.css` ends up at `html/res/css/site.css` and templates can
//! reference it as `{{ RelRoot }}/res/css/site.css`. Directories are recreated
//! even when empty; regular files are copied byte for byte, overwriting what
//! is there.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("Cannot walk resource tree: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("IO error on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("Resource path has no directory name: {0}")]
    Unnamed(PathBuf),
}

/// What [`copy_resources`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReport {
    /// Mirror root inside the destination.
    pub target: PathBuf,
    /// Directories created, relative to the mirror root.
    pub directories: Vec<PathBuf>,
    /// Files copied, relative to the mirror root.
    pub files: Vec<PathBuf>,
}

/// Mirror `resource_root` into `destination/<resource dir name>`.
pub fn copy_resources(resource_root: &Path, destination: &Path) -> Result<CopyReport, ResourceError> {
    let name = resource_root
        .file_name()
        .ok_or_else(|| ResourceError::Unnamed(resource_root.to_path_buf()))?;
    let target = destination.join(name);
    let mut report = CopyReport {
        target: target.clone(),
        ..CopyReport::default()
    };

    for entry in WalkDir::new(resource_root).sort_by_file_name() {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(resource_root)
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let dst = target.join(&relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dst).map_err(|source| ResourceError::Io {
                path: dst.clone(),
                source,
            })?;
            if entry.depth() > 0 {
                report.directories.push(relative);
            }
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &dst).map_err(|source| ResourceError::Io {
                path: dst.clone(),
                source,
            })?;
            report.files.push(relative);
        }
    }

    Ok(report)
}
