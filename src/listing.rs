//! The post listing page.
//!
//! Posts collected during the page pass become one synthesized markdown
//! document, rendered through the same markdown engine and page template as
//! every other page:
//!
//! ```text
//! 0. [Hello](<20240101-hello.html>) (<time datetime="2024-01-01T09:30:00+00:00">Mon, 01 Jan 2024</time>)
//!     - World
//! 1. [Second post](<blog/20240202-second.html>)
//!     - Summary of the second post
//! ```
//!
//! Entries appear in the order posts were rendered, which is scan order. The
//! date is shown next to the link but never used to reorder the list.

use crate::markdown::{self, MarkdownError};
use crate::metadata::PostMetadata;
use crate::types::PostRecord;
use maud::{Markup, html};
use std::fmt::Write;

/// File name of the listing page at the destination root.
pub const LISTING_FILENAME: &str = "posts.html";

/// Inline `<time>` element for a post's posting date, wrapped in parentheses.
///
/// `None` when the sidecar has no `posted` date.
pub fn date_fragment(metadata: &PostMetadata) -> Option<Markup> {
    let machine = metadata.posted_machine()?;
    let display = metadata.posted_display()?;
    Some(html! {
        "(" time datetime=(machine) { (display) } ")"
    })
}

/// Markdown source of the listing, one numbered entry per post.
pub fn listing_markdown(posts: &[PostRecord]) -> String {
    let mut out = String::new();
    for (idx, post) in posts.iter().enumerate() {
        let _ = write!(out, "{idx}. [{}](<{}>)", post.title, post.url);
        if let Some(fragment) = post.metadata.as_ref().and_then(date_fragment) {
            let _ = write!(out, " {}", fragment.into_string());
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "    - {}", post.summary);
    }
    out
}

/// Listing page body HTML. `None` when there are no posts.
pub fn listing_body(posts: &[PostRecord]) -> Result<Option<String>, MarkdownError> {
    if posts.is_empty() {
        return Ok(None);
    }
    let source = listing_markdown(posts);
    let document = markdown::parse(&source)?;
    Ok(Some(markdown::render(&document)))
}
