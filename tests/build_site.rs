//! End-to-end builds through the public library API.
//!
//! Each test builds a site in its own temp directory: either a copy of
//! `fixtures/site/` or a tree written inline.

use meinstatic::avatar::{self, AvatarError, AvatarOutcome, Fetcher};
use meinstatic::config::{self, SiteConfig};
use meinstatic::generate::generate;
use meinstatic::resources::copy_resources;
use std::cell::Cell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

// ===========================================================================
// Helpers
// ===========================================================================

fn copy_dir(src: &Path, dst: &Path) {
    for entry in WalkDir::new(src) {
        let entry = entry.unwrap();
        let target = dst.join(entry.path().strip_prefix(src).unwrap());
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).unwrap();
        } else {
            fs::copy(entry.path(), &target).unwrap();
        }
    }
}

fn fixture_site() -> (TempDir, SiteConfig) {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir(&fixtures, tmp.path());
    let config = config::load_config(tmp.path()).unwrap();
    (tmp, config)
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Every file under `root`, keyed by its relative path.
fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    WalkDir::new(root)
        .into_iter()
        .map(Result::unwrap)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let relative = e.path().strip_prefix(root).unwrap().to_path_buf();
            (relative, fs::read(e.path()).unwrap())
        })
        .collect()
}

/// Fails the test if it is ever asked to fetch anything.
struct OfflineFetcher {
    calls: Cell<usize>,
}

impl Fetcher for OfflineFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, AvatarError> {
        self.calls.set(self.calls.get() + 1);
        panic!("unexpected fetch of {url}");
    }
}

// ===========================================================================
// Scenarios
// ===========================================================================

#[test]
fn home_page_and_single_post() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(&root.join("src/index.md"), "# Home\n\nWelcome\n");
    write(&root.join("src/20240101-hello.md"), "# Hello\n\nWorld\n");
    write(&root.join("tpl.html"), "<main>{{ Body }}</main>");
    write(
        &root.join("config.toml"),
        r#"
source_path = "src"
destination_path = "out"
page_template_file = "tpl.html"
post_pattern = "^[0-9]{8}-"
"#,
    );

    let config = config::load_config(root).unwrap();
    let report = generate(&config).unwrap();

    assert!(root.join("out/index.html").is_file());
    assert!(root.join("out/20240101-hello.html").is_file());

    assert_eq!(report.posts.len(), 1);
    assert_eq!(report.posts[0].title, "Hello");
    assert_eq!(report.posts[0].summary, "World");
    assert_eq!(report.posts[0].url, "20240101-hello.html");

    let listing = fs::read_to_string(root.join("out/posts.html")).unwrap();
    assert_eq!(listing.matches("<li>").count(), 2, "one entry plus its summary");
    assert!(listing.contains(r#"<a href="20240101-hello.html">Hello</a>"#));
    assert!(listing.contains("<li>World</li>"));
    assert!(!listing.contains("<time"));
}

#[test]
fn post_without_sidecar_has_no_date() {
    let (_tmp, config) = fixture_site();
    generate(&config).unwrap();

    let listing = fs::read_to_string(config.destination_path.join("posts.html")).unwrap();
    let hello = listing.find("20240101-hello.html").unwrap();
    let second = listing.find("20240315-second.html").unwrap();

    assert!(listing[hello..second].contains(r#"<time datetime="2024-01-01T09:30:00+00:00">"#));
    assert!(!listing[second..].contains("<time"));
}

#[test]
fn title_lost_when_paragraph_comes_first() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(&root.join("pages-md/20240101-late.md"), "Intro first.\n\n# Late title\n");
    write(&root.join("templates/template.html"), "{{ Body }}");

    let config = config::load_config(root).unwrap();
    let report = generate(&config).unwrap();

    assert_eq!(report.posts[0].title, "");
    assert_eq!(report.posts[0].summary, "Intro first.");
}

#[test]
fn leading_bullet_list_is_the_summary() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(
        &root.join("pages-md/20240101-list.md"),
        "- intro bullet\n- another\n\n# Late\n\nBody\n",
    );
    write(&root.join("templates/template.html"), "{{ Body }}");

    let config = config::load_config(root).unwrap();
    let report = generate(&config).unwrap();

    assert_eq!(report.posts[0].title, "");
    assert_eq!(report.posts[0].summary, "intro bullet");
}

#[test]
fn sidecar_with_extra_keys_and_no_date_still_builds() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(&root.join("pages-md/20240101-draft.md"), "# Draft\n\nSoon\n");
    write(
        &root.join("pages-md/20240101-draft.meta.json"),
        r#"{ "author": "me", "tags": ["wip"] }"#,
    );
    write(&root.join("templates/template.html"), "{{ Body }}");

    let config = config::load_config(root).unwrap();
    let report = generate(&config).unwrap();

    assert_eq!(report.posts[0].title, "Draft");
    let listing = fs::read_to_string(config.destination_path.join("posts.html")).unwrap();
    assert!(listing.contains("20240101-draft.html"));
    assert!(!listing.contains("<time"));
}

// ===========================================================================
// Properties
// ===========================================================================

#[test]
fn rebuild_is_byte_identical() {
    let (_tmp, config) = fixture_site();

    generate(&config).unwrap();
    let first = snapshot(&config.destination_path);
    generate(&config).unwrap();
    let second = snapshot(&config.destination_path);

    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn rel_root_resolves_to_destination_at_every_depth() {
    let (_tmp, config) = fixture_site();
    let report = generate(&config).unwrap();
    copy_resources(&config.resource_path, &config.destination_path).unwrap();

    let stylesheet = config
        .destination_path
        .join("res/style.css")
        .canonicalize()
        .unwrap();

    for page in &report.pages {
        let page_dir = config
            .destination_path
            .join(&page.output)
            .parent()
            .unwrap()
            .to_path_buf();
        let resolved = page_dir
            .join(&page.rel_root)
            .join("res/style.css")
            .canonicalize()
            .unwrap();
        assert_eq!(resolved, stylesheet, "page {}", page.output.display());
    }
}

#[test]
fn output_tree_mirrors_source_tree() {
    let (_tmp, config) = fixture_site();
    generate(&config).unwrap();

    for page in [
        "index.html",
        "about/index.html",
        "notes/deep/page.html",
        "20240101-hello.html",
        "20240315-second.html",
        "posts.html",
    ] {
        assert!(
            config.destination_path.join(page).is_file(),
            "missing {page}"
        );
    }
    assert!(!config.destination_path.join("20240101-hello.meta.json").exists());
}

// ===========================================================================
// Full build
// ===========================================================================

#[test]
fn full_build_keeps_existing_avatar() {
    let (_tmp, mut config) = fixture_site();
    config.avatar.gravatar_username = "someone".to_string();
    let avatar_path = config.avatar_path();
    write(&avatar_path, "already here");

    generate(&config).unwrap();
    let copied = copy_resources(&config.resource_path, &config.destination_path).unwrap();
    let fetcher = OfflineFetcher { calls: Cell::new(0) };
    let outcome = avatar::fetch_avatar(&config.avatar, &avatar_path, &fetcher).unwrap();

    assert_eq!(outcome, AvatarOutcome::AlreadyPresent(avatar_path.clone()));
    assert_eq!(fetcher.calls.get(), 0);
    assert_eq!(fs::read_to_string(&avatar_path).unwrap(), "already here");

    assert_eq!(
        copied.files,
        vec![PathBuf::from("fonts/serif.woff2"), PathBuf::from("style.css")]
    );
    assert!(config.destination_path.join("res/fonts/serif.woff2").is_file());
    assert!(config.destination_path.join("index.html").is_file());
}

#[test]
fn missing_config_file_uses_defaults() {
    let tmp = TempDir::new().unwrap();
    let config = config::load_config(tmp.path()).unwrap();

    assert_eq!(config.site_name, "");
    assert_eq!(config.source_path, tmp.path().join("pages-md"));
    assert_eq!(config.destination_path, tmp.path().join("html"));
    assert_eq!(config.post_pattern, "[0-9]{8}-.*");
    assert_eq!(config.avatar_path(), tmp.path().join("html/images/avatar.jpg"));
}
