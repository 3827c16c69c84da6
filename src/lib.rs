//! # meinstatic
//!
//! A small static site generator for a personal site with a blog. Markdown
//! files become HTML pages wrapped in one page template; files whose path
//! matches a post pattern are also collected into a listing page.
//!
//! # Architecture: One Pass Per Build
//!
//! ```text
//! config.toml ─► SiteConfig
//!                   │
//! pages-md/ ──► scan ──► for each document, in path order:
//!                   │       read sidecar metadata
//!                   │       parse markdown ─► render ─► template ─► html/<rel>.html
//!                   │       post? extract title + summary
//!                   └─► listing ─► html/posts.html
//!
//! res/ ──► copy ─► html/res/
//! Gravatar ─► html/images/avatar.jpg   (once; kept if present)
//! ```
//!
//! Every page is regenerated on every run. The first error aborts the build.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `config.toml` loading, stock defaults, validation, path resolution |
//! | [`scan`] | Finds `*.md` documents under the source root in stable order |
//! | [`metadata`] | Reads the optional `<stem>.meta.json` sidecar of a post |
//! | [`markdown`] | Markdown tree: parse, walk, render, heading anchors |
//! | [`extract`] | Title and summary of a post from its markdown tree |
//! | [`template`] | Liquid page template with `SiteName`, `Body`, `RelRoot` |
//! | [`generate`] | The page pass: renders every document, then the listing |
//! | [`listing`] | Builds the `posts.html` body from collected posts |
//! | [`resources`] | Mirrors the resource directory into the destination |
//! | [`avatar`] | Downloads the Gravatar profile picture |
//! | [`types`] | Records shared between the page pass and output |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Template at Runtime
//!
//! The page template is a file the site owner edits, so it is parsed at run
//! time with `liquid` instead of compiled in. Markup the generator itself
//! produces (the listing date, the stock template) is written with `maud`.
//!
//! ## Listing Order
//!
//! Posts are listed in the order the scanner found them, which is path order.
//! Date-prefixed file names (`20240101-hello.md`) therefore list oldest
//! first. Sidecar dates are displayed but never used for sorting.

pub mod avatar;
pub mod config;
pub mod extract;
pub mod generate;
pub mod listing;
pub mod markdown;
pub mod metadata;
pub mod output;
pub mod resources;
pub mod scan;
pub mod template;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
