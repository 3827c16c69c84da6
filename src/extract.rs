//! Title and summary extraction for posts.
//!
//! A single pre-order walk over the document tree:
//!
//! - **Title**: literal text of the first level-1 heading.
//! - **Summary**: literal text of the first paragraph anywhere in the document.
//!   The text of a tight list item counts as a paragraph.
//!
//! The walk stops at the first paragraph. Nothing after it is visited, so a
//! heading that only appears after the first paragraph never becomes the
//! title:
//!
//! ```text
//! # Hello          ← title "Hello"
//! World            ← summary "World", walk stops here
//! # Later          ← never seen
//! ```
//!
//! ```text
//! Intro first      ← summary "Intro first", walk stops here
//! # Hello          ← never seen, title stays empty
//! ```
//!
//! Listing pages depend on this exact behaviour; keep it.

use crate::markdown::{Document, Node};
use pulldown_cmark::HeadingLevel;
use std::ops::ControlFlow;

/// Title and summary pulled from a post's document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostSummary {
    /// Empty when no level-1 heading precedes the first paragraph.
    pub title: String,
    /// Empty when the document has no paragraph.
    pub summary: String,
}

/// Extract title and summary from a parsed document.
pub fn extract_post(document: &Document<'_>) -> PostSummary {
    let mut extractor = Extractor::default();
    extractor.run(document);
    extractor.found
}

#[derive(Default)]
struct Extractor {
    found: PostSummary,
    visited: usize,
}

impl Extractor {
    fn run(&mut self, document: &Document<'_>) {
        let _ = document.walk(&mut |node: &Node<'_>| self.visit(node));
    }

    fn visit(&mut self, node: &Node<'_>) -> ControlFlow<()> {
        self.visited += 1;
        if node.heading_level() == Some(HeadingLevel::H1) && self.found.title.is_empty() {
            self.found.title = node.literal_text();
        } else if let Some(text) = node.paragraph_text() {
            self.found.summary = text;
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    }
}
