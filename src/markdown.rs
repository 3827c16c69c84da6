//! Markdown parsing into a document tree and rendering back to HTML.
//!
//! pulldown-cmark produces a flat stream of `Start`/`End` events. This module
//! folds that stream into an owned tree so callers can walk block structure
//! (headings, paragraphs, lists) and stop early, then renders the same tree
//! back to HTML by re-emitting the events in order.
//!
//! ```text
//! parse(&str) ──► Document ──► render() ──► HTML
//!                    │
//!                    └──► walk(visitor) ──► ControlFlow::Break stops the walk
//! ```
//!
//! Headings without an explicit `{#id}` get an anchor derived from their text
//! so every heading is linkable.

use pulldown_cmark::{CowStr, Event, HeadingLevel, Options, Parser, Tag, html};
use std::collections::HashMap;
use std::ops::ControlFlow;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarkdownError {
    #[error("Unbalanced markdown events: end tag without a matching start")]
    UnexpectedEnd,
    #[error("Unbalanced markdown events: {0} unclosed tag(s) at end of input")]
    Unclosed(usize),
}

/// A node of the parsed document.
#[derive(Debug, Clone)]
pub enum Node<'a> {
    /// A container tag (paragraph, heading, list, emphasis, ...) and its children.
    Element { tag: Tag<'a>, children: Vec<Node<'a>> },
    /// Anything without children: text, inline code, raw HTML, breaks, rules.
    Leaf(Event<'a>),
}

impl<'a> Node<'a> {
    /// Concatenated literal text of this node and its descendants.
    pub fn literal_text(&self) -> String {
        let mut out = String::new();
        self.push_literal_text(&mut out);
        out
    }

    fn push_literal_text(&self, out: &mut String) {
        match self {
            Node::Element { children, .. } => {
                for child in children {
                    child.push_literal_text(out);
                }
            }
            Node::Leaf(Event::Text(text) | Event::Code(text)) => out.push_str(text),
            Node::Leaf(Event::SoftBreak | Event::HardBreak) => out.push(' '),
            Node::Leaf(_) => {}
        }
    }

    /// Heading level if this node is a heading.
    pub fn heading_level(&self) -> Option<HeadingLevel> {
        match self {
            Node::Element {
                tag: Tag::Heading { level, .. },
                ..
            } => Some(*level),
            _ => None,
        }
    }

    pub fn is_paragraph(&self) -> bool {
        matches!(
            self,
            Node::Element {
                tag: Tag::Paragraph,
                ..
            }
        )
    }

    /// Text of the paragraph this node stands for, if it is one.
    ///
    /// Items of a tight list hold their inline content directly instead of
    /// wrapping it in a `Paragraph`. The inline run at the start of such an
    /// item counts as the item's paragraph, as it would in a loose list.
    pub fn paragraph_text(&self) -> Option<String> {
        match self {
            Node::Element {
                tag: Tag::Paragraph,
                ..
            } => Some(self.literal_text()),
            Node::Element {
                tag: Tag::Item,
                children,
            } => {
                let run = children.iter().take_while(|c| c.is_inline()).count();
                let leading = &children[..run];
                if leading.iter().any(Node::has_text) {
                    Some(literal_text(leading))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Whether this node is inline content (text, emphasis, links, ...).
    pub fn is_inline(&self) -> bool {
        match self {
            Node::Element { tag, .. } => matches!(
                tag,
                Tag::Emphasis
                    | Tag::Strong
                    | Tag::Strikethrough
                    | Tag::Superscript
                    | Tag::Subscript
                    | Tag::Link { .. }
                    | Tag::Image { .. }
            ),
            Node::Leaf(event) => !matches!(event, Event::Rule | Event::Html(_)),
        }
    }

    fn has_text(&self) -> bool {
        !self.literal_text().trim().is_empty()
    }

    fn push_events(&self, out: &mut Vec<Event<'a>>) {
        match self {
            Node::Element { tag, children } => {
                out.push(Event::Start(tag.clone()));
                for child in children {
                    child.push_events(out);
                }
                out.push(Event::End(tag.to_end()));
            }
            Node::Leaf(event) => out.push(event.clone()),
        }
    }
}

/// Concatenated literal text of a sequence of sibling nodes.
pub fn literal_text(nodes: &[Node<'_>]) -> String {
    let mut out = String::new();
    for node in nodes {
        node.push_literal_text(&mut out);
    }
    out
}

/// A parsed markdown document, borrowing from its source text.
#[derive(Debug, Clone, Default)]
pub struct Document<'a> {
    pub children: Vec<Node<'a>>,
}

impl<'a> Document<'a> {
    /// Depth-first, pre-order walk over every node.
    ///
    /// The visitor sees a node before its children. Returning
    /// `ControlFlow::Break` ends the walk at once; no further node is visited.
    pub fn walk<B>(&self, visit: &mut impl FnMut(&Node<'a>) -> ControlFlow<B>) -> ControlFlow<B> {
        walk_nodes(&self.children, visit)
    }

    /// The document as a balanced event stream.
    pub fn events(&self) -> Vec<Event<'a>> {
        let mut out = Vec::new();
        for node in &self.children {
            node.push_events(&mut out);
        }
        out
    }
}

fn walk_nodes<'a, B>(
    nodes: &[Node<'a>],
    visit: &mut impl FnMut(&Node<'a>) -> ControlFlow<B>,
) -> ControlFlow<B> {
    for node in nodes {
        visit(node)?;
        if let Node::Element { children, .. } = node {
            walk_nodes(children, visit)?;
        }
    }
    ControlFlow::Continue(())
}

/// Extensions enabled for every document.
pub fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// Parse markdown into a document tree.
pub fn parse(source: &str) -> Result<Document<'_>, MarkdownError> {
    let mut stack: Vec<(Tag<'_>, Vec<Node<'_>>)> = Vec::new();
    let mut root: Vec<Node<'_>> = Vec::new();
    let mut anchors = Anchors::default();

    for event in Parser::new_ext(source, options()) {
        match event {
            Event::Start(tag) => stack.push((tag, Vec::new())),
            Event::End(_) => {
                let (tag, children) = stack.pop().ok_or(MarkdownError::UnexpectedEnd)?;
                let tag = anchors.assign(tag, &children);
                let node = Node::Element { tag, children };
                match stack.last_mut() {
                    Some((_, siblings)) => siblings.push(node),
                    None => root.push(node),
                }
            }
            leaf => match stack.last_mut() {
                Some((_, siblings)) => siblings.push(Node::Leaf(leaf)),
                None => root.push(Node::Leaf(leaf)),
            },
        }
    }

    if !stack.is_empty() {
        return Err(MarkdownError::Unclosed(stack.len()));
    }
    Ok(Document { children: root })
}

/// Render a document tree to HTML.
pub fn render(document: &Document<'_>) -> String {
    let mut out = String::new();
    html::push_html(&mut out, document.events().into_iter());
    out
}

/// Hands out unique heading anchors within one document.
#[derive(Default)]
struct Anchors {
    seen: HashMap<String, usize>,
}

impl Anchors {
    fn assign<'a>(&mut self, tag: Tag<'a>, children: &[Node<'a>]) -> Tag<'a> {
        match tag {
            Tag::Heading {
                level,
                id: None,
                classes,
                attrs,
            } => {
                let base = heading_anchor(&literal_text(children));
                let id = if base.is_empty() {
                    None
                } else {
                    Some(CowStr::from(self.unique(base)))
                };
                Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                }
            }
            other => other,
        }
    }

    fn unique(&mut self, base: String) -> String {
        let count = self.seen.entry(base.clone()).or_insert(0);
        let id = if *count == 0 {
            base
        } else {
            format!("{base}-{count}")
        };
        *count += 1;
        id
    }
}

/// Turn heading text into an anchor: lowercase alphanumerics, every other run
/// of characters collapsed to a single `-`, no leading or trailing dashes.
pub fn heading_anchor(text: &str) -> String {
    let mut anchor = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !anchor.is_empty() {
                anchor.push('-');
            }
            pending_dash = false;
            anchor.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    anchor
}
