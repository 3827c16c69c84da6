//! CLI output formatting for all build steps.
//!
//! # Information-First Display
//!
//! Every entity leads with its positional index and identity (source path or
//! post title); secondary facts such as output paths, dates and summaries
//! follow as indented context lines. The output reads as an inventory of the
//! site, not a log of file operations.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Documents
//! 001 20240101-hello.md (post)
//! 002 about/index.md
//! 003 index.md
//!
//! 3 documents, 1 post
//! ```
//!
//! ## Pages
//!
//! ```text
//! 001 20240101-hello.md → 20240101-hello.html (post)
//! 002 about/index.md → about/index.html
//! 003 index.md → index.html
//!
//! Posts
//! 001 Hello
//!     URL: 20240101-hello.html
//!     Posted: Mon, 01 Jan 2024
//!     World
//!
//! Generated 3 pages, 1 post, listing posts.html
//! ```
//!
//! ## Resources
//!
//! ```text
//! res → html/res
//!     css/site.css
//!     logo.svg
//! Copied 2 files, 1 directory
//! ```
//!
//! # Architecture
//!
//! Each step has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::avatar::AvatarOutcome;
use crate::generate::is_post;
use crate::metadata::PostMetadata;
use crate::resources::CopyReport;
use crate::scan::{SourceDocument, slashed};
use crate::types::RenderReport;
use regex::Regex;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 page`, `2 pages`.
fn count(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {plural}")
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_summary(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn post_marker(is_post: bool) -> &'static str {
    if is_post { " (post)" } else { "" }
}

// ============================================================================
// Check output
// ============================================================================

/// Format the discovered documents, marking posts.
pub fn format_check_output(documents: &[SourceDocument], post_matcher: &Regex) -> Vec<String> {
    let mut lines = vec!["Documents".to_string()];
    let mut posts = 0;
    for (i, document) in documents.iter().enumerate() {
        let matched = is_post(post_matcher, document);
        if matched {
            posts += 1;
        }
        lines.push(format!(
            "{} {}{}",
            format_index(i + 1),
            document.relative_slashed(),
            post_marker(matched)
        ));
    }
    lines.push(String::new());
    lines.push(format!(
        "{}, {}",
        count(documents.len(), "document", "documents"),
        count(posts, "post", "posts")
    ));
    lines
}

/// Print check output to stdout.
pub fn print_check_output(documents: &[SourceDocument], post_matcher: &Regex) {
    for line in format_check_output(documents, post_matcher) {
        println!("{}", line);
    }
}

// ============================================================================
// Page output
// ============================================================================

/// Format the page pass: every rendered page, then the posts found.
pub fn format_render_output(report: &RenderReport) -> Vec<String> {
    let mut lines = Vec::new();

    for (i, page) in report.pages.iter().enumerate() {
        lines.push(format!(
            "{} {} \u{2192} {}{}",
            format_index(i + 1),
            slashed(&page.source),
            slashed(&page.output),
            post_marker(page.is_post)
        ));
    }

    if !report.posts.is_empty() {
        lines.push(String::new());
        lines.push("Posts".to_string());
        for (i, post) in report.posts.iter().enumerate() {
            let title = if post.title.is_empty() {
                "(untitled)"
            } else {
                post.title.as_str()
            };
            lines.push(format!("{} {}", format_index(i + 1), title));
            lines.push(format!("{}URL: {}", indent(1), post.url));
            if let Some(posted) = post.metadata.as_ref().and_then(PostMetadata::posted_display) {
                lines.push(format!("{}Posted: {}", indent(1), posted));
            }
            let summary = truncate_summary(post.summary.trim(), 60);
            if !summary.is_empty() {
                lines.push(format!("{}{}", indent(1), summary));
            }
        }
    }

    lines.push(String::new());
    let listing = report
        .listing
        .as_deref()
        .and_then(Path::file_name)
        .map(|name| format!(", listing {}", name.to_string_lossy()))
        .unwrap_or_default();
    lines.push(format!(
        "Generated {}, {}{}",
        count(report.pages.len(), "page", "pages"),
        count(report.posts.len(), "post", "posts"),
        listing
    ));
    lines
}

/// Print page pass output to stdout.
pub fn print_render_output(report: &RenderReport) {
    for line in format_render_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Resource output
// ============================================================================

/// Format what the resource mirror copied.
pub fn format_copy_output(source: &Path, report: &CopyReport) -> Vec<String> {
    let mut lines = vec![format!(
        "{} \u{2192} {}",
        source.display(),
        report.target.display()
    )];
    for file in &report.files {
        lines.push(format!("{}{}", indent(1), slashed(file)));
    }
    lines.push(format!(
        "Copied {}, {}",
        count(report.files.len(), "file", "files"),
        count(report.directories.len(), "directory", "directories")
    ));
    lines
}

/// Print resource mirror output to stdout.
pub fn print_copy_output(source: &Path, report: &CopyReport) {
    for line in format_copy_output(source, report) {
        println!("{}", line);
    }
}

// ============================================================================
// Avatar output
// ============================================================================

pub fn format_avatar_outcome(outcome: &AvatarOutcome) -> Vec<String> {
    match outcome {
        AvatarOutcome::NotConfigured => {
            vec!["No Gravatar username or email configured, skipped".to_string()]
        }
        AvatarOutcome::AlreadyPresent(path) => {
            vec![format!("{}: already present", path.display())]
        }
        AvatarOutcome::Downloaded { path, url } => vec![
            format!("{}: downloaded", path.display()),
            format!("{}Source: {}", indent(1), url),
        ],
    }
}

/// Print avatar outcome to stdout.
pub fn print_avatar_outcome(outcome: &AvatarOutcome) {
    for line in format_avatar_outcome(outcome) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
