//! Page rendering: the document pipeline.
//!
//! For each source document, in scan order:
//!
//! ```text
//! metadata sidecar ─┐
//! markdown ─► parse ─┼─► render HTML ─► page template ─► <dst>/<rel>.html
//!                    └─► (post?) extract title/summary ─► post list
//! ```
//!
//! After the last document, the post list becomes `posts.html` at the
//! destination root (see [`crate::listing`]).
//!
//! ## Output Paths
//!
//! The destination mirrors the source tree. `RelRoot` is recomputed for every
//! page since nesting depth varies:
//!
//! ```text
//! pages-md/index.md            → html/index.html            RelRoot "."
//! pages-md/blog/20240101-a.md  → html/blog/20240101-a.html  RelRoot ".."
//! pages-md/a/b/c.md            → html/a/b/c.html            RelRoot "../.."
//! ```
//!
//! Every page is regenerated on every run; existing files are overwritten.
//! Any failure aborts the whole build.

use crate::config::{ConfigError, SiteConfig};
use crate::extract::extract_post;
use crate::listing::{self, LISTING_FILENAME};
use crate::markdown::{self, MarkdownError};
use crate::metadata::{self, MetadataError};
use crate::scan::{self, ScanError, SourceDocument, slashed};
use crate::template::{PageTemplate, TemplateContext, TemplateError};
use crate::types::{PostRecord, RenderReport, RenderedPage};
use regex::Regex;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Extension of generated pages.
pub const HTML_EXTENSION: &str = "html";

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),
    #[error("Markdown error in {path}: {source}")]
    Markdown {
        path: PathBuf,
        source: MarkdownError,
    },
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
    #[error("IO error on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> GenerateError + '_ {
    move |source| GenerateError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Render every page and, if posts were found, the listing page.
pub fn generate(config: &SiteConfig) -> Result<RenderReport, GenerateError> {
    let post_matcher = config.post_matcher()?;
    let template = PageTemplate::load(&config.page_template_file)?;
    let documents = scan::scan(&config.source_path)?;

    let dst = &config.destination_path;
    fs::create_dir_all(dst).map_err(io_error(dst))?;

    let renderer = PageRenderer {
        site_name: &config.site_name,
        destination: dst,
        template: &template,
        post_matcher: &post_matcher,
    };

    let mut report = RenderReport::default();
    for document in &documents {
        let (page, post) = renderer.render_document(document)?;
        report.pages.push(page);
        if let Some(post) = post {
            report.posts.push(post);
        }
    }

    report.listing = renderer.write_listing(&report.posts)?;
    Ok(report)
}

struct PageRenderer<'a> {
    site_name: &'a str,
    destination: &'a Path,
    template: &'a PageTemplate,
    post_matcher: &'a Regex,
}

impl PageRenderer<'_> {
    fn render_document(
        &self,
        document: &SourceDocument,
    ) -> Result<(RenderedPage, Option<PostRecord>), GenerateError> {
        let metadata = metadata::read_post_metadata(&document.path)?;
        let source = document.read().map_err(io_error(&document.path))?;
        let parsed = markdown::parse(&source).map_err(|source| GenerateError::Markdown {
            path: document.path.clone(),
            source,
        })?;
        let body = markdown::render(&parsed);

        let relative_output = output_relative_path(&document.relative);
        let output = self.destination.join(&relative_output);
        let parent = output.parent().unwrap_or(self.destination);
        fs::create_dir_all(parent).map_err(io_error(parent))?;
        let rel_root = rel_root(&relative_output);

        self.write_page(&output, &body, &rel_root)?;

        let post = if is_post(self.post_matcher, document) {
            let summary = extract_post(&parsed);
            Some(PostRecord {
                title: summary.title,
                summary: summary.summary,
                url: slashed(&relative_output),
                metadata,
            })
        } else {
            None
        };

        let page = RenderedPage {
            source: document.relative.clone(),
            output: relative_output,
            rel_root,
            is_post: post.is_some(),
        };
        Ok((page, post))
    }

    fn write_listing(&self, posts: &[PostRecord]) -> Result<Option<PathBuf>, GenerateError> {
        let body = listing::listing_body(posts).map_err(|source| GenerateError::Markdown {
            path: PathBuf::from(LISTING_FILENAME),
            source,
        })?;
        let Some(body) = body else {
            return Ok(None);
        };
        let output = self.destination.join(LISTING_FILENAME);
        self.write_page(&output, &body, ".")?;
        Ok(Some(output))
    }

    fn write_page(&self, output: &Path, body: &str, rel_root: &str) -> Result<(), GenerateError> {
        let html = self.template.render(&TemplateContext {
            site_name: self.site_name,
            body,
            rel_root,
        })?;
        fs::write(output, html).map_err(io_error(output))
    }
}

/// Whether a document is a post. Matched against the source-relative path.
pub fn is_post(matcher: &Regex, document: &SourceDocument) -> bool {
    matcher.is_match(&document.relative_slashed())
}

/// Output path relative to the destination root: `a/b/c.md` → `a/b/c.html`.
pub fn output_relative_path(source_relative: &Path) -> PathBuf {
    source_relative.with_extension(HTML_EXTENSION)
}

/// Relative path from a page's directory back to the destination root.
///
/// `index.html` → `.`, `a/page.html` → `..`, `a/b/page.html` → `../..`.
pub fn rel_root(output_relative: &Path) -> String {
    let depth = output_relative
        .parent()
        .map(|p| {
            p.components()
                .filter(|c| matches!(c, Component::Normal(_)))
                .count()
        })
        .unwrap_or(0);
    if depth == 0 {
        ".".to_string()
    } else {
        vec![".."; depth].join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    #[test]
    fn output_path_swaps_extension() {
        assert_eq!(
            output_relative_path(Path::new("a/b/c.md")),
            PathBuf::from("a/b/c.html")
        );
        assert_eq!(
            output_relative_path(Path::new("v1.2-notes.md")),
            PathBuf::from("v1.2-notes.html")
        );
    }

    #[test]
    fn rel_root_by_depth() {
        assert_eq!(rel_root(Path::new("index.html")), ".");
        assert_eq!(rel_root(Path::new("a/page.html")), "..");
        assert_eq!(rel_root(Path::new("a/b/c.html")), "../..");
    }

    #[test]
    fn post_match_uses_source_relative_path() {
        let re = Regex::new("^[0-9]{8}-").unwrap();
        let doc = SourceDocument {
            path: PathBuf::from("/somewhere/20240101-site/pages/about.md"),
            relative: PathBuf::from("about.md"),
        };
        assert!(!is_post(&re, &doc));

        let post = SourceDocument {
            path: PathBuf::from("/somewhere/pages/20240101-hello.md"),
            relative: PathBuf::from("20240101-hello.md"),
        };
        assert!(is_post(&re, &post));
    }

    #[test]
    fn generate_fixture_site() {
        let tmp = setup_fixtures();
        let config = fixture_config(tmp.path());
        let report = generate(&config).unwrap();

        assert_eq!(
            page_outputs(&report),
            vec![
                "20240101-hello.html",
                "20240315-second.html",
                "about/index.html",
                "index.html",
                "notes/deep/page.html",
            ]
        );
        assert_eq!(post_titles(&report), vec!["Hello", "Second post"]);
        assert_eq!(
            report.listing.as_deref(),
            Some(config.destination_path.join("posts.html").as_path())
        );
    }

    #[test]
    fn pages_are_wrapped_in_template() {
        let tmp = setup_fixtures();
        let config = fixture_config(tmp.path());
        generate(&config).unwrap();

        let index = read_output(&config, "index.html");
        assert!(index.contains("<title>Fixture Site</title>"));
        assert!(index.contains(r#"<h1 id="home">Home</h1>"#));
        assert!(index.contains(r#"href="./res/style.css""#));

        let deep = read_output(&config, "notes/deep/page.html");
        assert!(deep.contains(r#"href="../../res/style.css""#));
    }

    #[test]
    fn post_records_carry_url_and_metadata() {
        let tmp = setup_fixtures();
        let config = fixture_config(tmp.path());
        let report = generate(&config).unwrap();

        let hello = find_post(&report, "Hello");
        assert_eq!(hello.url, "20240101-hello.html");
        assert_eq!(hello.summary, "World");
        assert!(hello.metadata.is_some());

        let second = find_post(&report, "Second post");
        assert!(second.metadata.is_none());
    }

    #[test]
    fn nested_post_url_has_no_leading_separator() {
        let tmp = TempDir::new().unwrap();
        let config = minimal_site(tmp.path(), "[0-9]{8}-");
        fs::create_dir_all(config.source_path.join("blog/2024")).unwrap();
        fs::write(
            config.source_path.join("blog/2024/20240202-deep.md"),
            "# Deep\n\nDown here.\n",
        )
        .unwrap();

        let report = generate(&config).unwrap();
        assert_eq!(report.posts[0].url, "blog/2024/20240202-deep.html");
        assert_eq!(report.pages[0].rel_root, "../..");
    }

    #[test]
    fn no_posts_means_no_listing() {
        let tmp = TempDir::new().unwrap();
        let config = minimal_site(tmp.path(), "^never$");
        fs::write(config.source_path.join("index.md"), "# Home\n\nHi\n").unwrap();

        let report = generate(&config).unwrap();
        assert!(report.listing.is_none());
        assert!(!config.destination_path.join("posts.html").exists());
    }

    #[test]
    fn listing_rendered_at_root() {
        let tmp = setup_fixtures();
        let config = fixture_config(tmp.path());
        generate(&config).unwrap();

        let listing = read_output(&config, "posts.html");
        assert!(listing.contains(r#"href="./res/style.css""#));
        let hello = listing.find("20240101-hello.html").unwrap();
        let second = listing.find("20240315-second.html").unwrap();
        assert!(hello < second);
    }

    #[test]
    fn overwrites_existing_output() {
        let tmp = TempDir::new().unwrap();
        let config = minimal_site(tmp.path(), "^never$");
        fs::write(config.source_path.join("index.md"), "# New\n").unwrap();
        fs::create_dir_all(&config.destination_path).unwrap();
        fs::write(config.destination_path.join("index.html"), "stale").unwrap();

        generate(&config).unwrap();
        let index = read_output(&config, "index.html");
        assert!(index.contains("New"));
        assert!(!index.contains("stale"));
    }

    #[test]
    fn malformed_metadata_aborts() {
        let tmp = TempDir::new().unwrap();
        let config = minimal_site(tmp.path(), "[0-9]{8}-");
        fs::write(config.source_path.join("20240101-a.md"), "# A\n").unwrap();
        fs::write(config.source_path.join("20240101-a.meta.json"), "oops").unwrap();

        let result = generate(&config);
        assert!(matches!(result, Err(GenerateError::Metadata(_))));
    }

    #[test]
    fn bad_pattern_fails_before_writing() {
        let tmp = TempDir::new().unwrap();
        let mut config = minimal_site(tmp.path(), "[0-9]{8}-");
        config.post_pattern = "(".to_string();
        fs::write(config.source_path.join("index.md"), "# Home\n").unwrap();

        let result = generate(&config);
        assert!(matches!(result, Err(GenerateError::Config(_))));
        assert!(!config.destination_path.exists());
    }

    #[test]
    fn missing_source_root_aborts() {
        let tmp = TempDir::new().unwrap();
        let config = minimal_site(tmp.path(), "x");
        fs::remove_dir_all(&config.source_path).unwrap();

        assert!(matches!(generate(&config), Err(GenerateError::Scan(_))));
    }
}
