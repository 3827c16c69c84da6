//! Shared test utilities for the meinstatic test suite.
//!
//! Provides fixture setup, lookup helpers and bulk extractors over the
//! pipeline's report types.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let config = fixture_config(tmp.path());
//! let report = generate(&config).unwrap();
//!
//! let hello = find_post(&report, "Hello");
//! assert_eq!(hello.url, "20240101-hello.html");
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::config::{self, SiteConfig};
use crate::types::{PostRecord, RenderReport};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Load the fixture's `config.toml` with paths resolved into the temp dir.
pub fn fixture_config(root: &Path) -> SiteConfig {
    config::load_config(root).unwrap()
}

/// A bare site under `root`: empty source dir, a one-line template, no
/// resources. The destination is not created.
pub fn minimal_site(root: &Path, post_pattern: &str) -> SiteConfig {
    let config = SiteConfig {
        site_name: "Test".to_string(),
        post_pattern: post_pattern.to_string(),
        ..SiteConfig::default()
    }
    .resolve_paths(root);

    fs::create_dir_all(&config.source_path).unwrap();
    fs::create_dir_all(config.page_template_file.parent().unwrap()).unwrap();
    fs::write(
        &config.page_template_file,
        "<title>{{ SiteName }}</title><link href=\"{{ RelRoot }}/res/style.css\">{{ Body }}",
    )
    .unwrap();
    config
}

/// Read a generated file by its destination-relative path.
pub fn read_output(config: &SiteConfig, relative: &str) -> String {
    let path = config.destination_path.join(relative);
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("cannot read output {}: {e}", path.display()))
}

// =========================================================================
// Report lookups: panic with a clear message on miss
// =========================================================================

/// Find a post by title. Panics if not found.
pub fn find_post<'a>(report: &'a RenderReport, title: &str) -> &'a PostRecord {
    report
        .posts
        .iter()
        .find(|p| p.title == title)
        .unwrap_or_else(|| {
            let titles = post_titles(report);
            panic!("post '{title}' not found. Available: {titles:?}")
        })
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// All post titles in listing order.
pub fn post_titles(report: &RenderReport) -> Vec<&str> {
    report.posts.iter().map(|p| p.title.as_str()).collect()
}

/// All page outputs in render order, `/`-separated.
pub fn page_outputs(report: &RenderReport) -> Vec<String> {
    report
        .pages
        .iter()
        .map(|p| crate::scan::slashed(&p.output))
        .collect()
}
