//! Shared types passed between the page pass, the listing builder and the
//! CLI output.

use crate::metadata::PostMetadata;
use std::path::PathBuf;

/// A rendered post, kept until the listing page is written.
#[derive(Debug, Clone, PartialEq)]
pub struct PostRecord {
    /// First level-1 heading, or empty.
    pub title: String,
    /// First paragraph, or empty.
    pub summary: String,
    /// Site-relative URL of the rendered page, `/`-separated, no leading slash.
    pub url: String,
    pub metadata: Option<PostMetadata>,
}

/// One page written during the page pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    /// Source path relative to the source root.
    pub source: PathBuf,
    /// Output path relative to the destination root.
    pub output: PathBuf,
    /// `RelRoot` value the page was rendered with.
    pub rel_root: String,
    pub is_post: bool,
}

/// Everything the page pass did, in processing order.
#[derive(Debug, Clone, Default)]
pub struct RenderReport {
    pub pages: Vec<RenderedPage>,
    pub posts: Vec<PostRecord>,
    /// Listing page path, when at least one post was found.
    pub listing: Option<PathBuf>,
}
