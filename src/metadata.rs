//! Post metadata sidecar files.
//!
//! A document may carry structured, non-content fields in a JSON file next to
//! it with the same stem:
//!
//! ```text
//! pages-md/
//! ├── 20240101-hello.md
//! └── 20240101-hello.meta.json
//! ```
//!
//! ```json
//! { "posted": "2024-01-01T09:30:00Z", "edited": ["2024-01-03T18:00:00+01:00"] }
//! ```
//!
//! The sidecar is optional. A missing file is the ordinary "no metadata"
//! state; a file that exists but does not decode is an authoring mistake and
//! fails the build. Unknown keys and a missing `posted` decode fine.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Suffix replacing the document's extension to locate its sidecar.
pub const SIDECAR_SUFFIX: &str = "meta.json";

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("IO error reading {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("Malformed metadata in {path}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Dates attached to a post.
///
/// Keys other than `posted` and `edited` are ignored, so sidecars can carry
/// fields this generator does not use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostMetadata {
    /// Absent when the sidecar only records edits or other fields.
    #[serde(default)]
    pub posted: Option<DateTime<FixedOffset>>,
    /// Edit timestamps in the order they were recorded.
    #[serde(default)]
    pub edited: Vec<DateTime<FixedOffset>>,
}

impl PostMetadata {
    /// Human-readable posting date, e.g. `Mon, 01 Jan 2024`.
    pub fn posted_display(&self) -> Option<String> {
        self.posted
            .map(|posted| posted.format("%a, %d %b %Y").to_string())
    }

    /// Machine-readable posting date for `datetime` attributes.
    pub fn posted_machine(&self) -> Option<String> {
        self.posted.map(|posted| posted.to_rfc3339())
    }

    /// Most recent edit, if any.
    pub fn last_edited(&self) -> Option<&DateTime<FixedOffset>> {
        self.edited.iter().max()
    }
}

/// Sidecar path for a document: `a/b/post.md` → `a/b/post.meta.json`.
pub fn sidecar_path(document: &Path) -> PathBuf {
    document.with_extension(SIDECAR_SUFFIX)
}

/// Read the sidecar metadata for a document.
///
/// Returns `Ok(None)` when no sidecar exists.
pub fn read_post_metadata(document: &Path) -> Result<Option<PostMetadata>, MetadataError> {
    let path = sidecar_path(document);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(MetadataError::Io { path, source }),
    };
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| MetadataError::Malformed { path, source })
}
