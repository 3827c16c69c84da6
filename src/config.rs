//! Site configuration module.
//!
//! Handles loading, validating, and resolving `config.toml`. Stock defaults
//! are overridden by whatever keys the user's file sets; everything else
//! keeps its default.
//!
//! ## Config File Location
//!
//! `config.toml` lives in the config directory (`--config-dir`, default `.`).
//! Relative paths inside it are resolved against that directory, so a site
//! can be built from anywhere:
//!
//! ```text
//! mysite/
//! ├── config.toml
//! ├── pages-md/                  # source_path
//! │   ├── index.md
//! │   ├── 20240101-hello.md      # matches post_pattern → listed in posts.html
//! │   └── 20240101-hello.meta.json
//! ├── templates/template.html    # page_template_file
//! └── res/                       # resource_path → html/res/
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! site_name = ""
//! source_path = "pages-md"
//! destination_path = "html"
//! page_template_file = "templates/template.html"
//! resource_path = "res"
//! post_pattern = "[0-9]{8}-.*"   # matched against the source-relative path
//!
//! [avatar]
//! gravatar_username = ""
//! gravatar_email = ""
//! size = 160
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the config file inside the config directory.
pub const CONFIG_FILENAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Inserted verbatim into every page as `{{ SiteName }}`.
    pub site_name: String,
    /// Root of the markdown source tree.
    pub source_path: PathBuf,
    /// Root of the generated HTML tree.
    pub destination_path: PathBuf,
    /// Liquid page template used for every page, including the listing.
    pub page_template_file: PathBuf,
    /// Directory mirrored verbatim into the destination.
    pub resource_path: PathBuf,
    /// Regular expression deciding which documents are posts.
    pub post_pattern: String,
    /// Profile picture settings.
    pub avatar: AvatarConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_name: String::new(),
            source_path: PathBuf::from("pages-md"),
            destination_path: PathBuf::from("html"),
            page_template_file: PathBuf::from("templates/template.html"),
            resource_path: PathBuf::from("res"),
            post_pattern: "[0-9]{8}-.*".to_string(),
            avatar: AvatarConfig::default(),
        }
    }
}

/// Gravatar lookup settings for the profile picture.
///
/// The username wins over the email when both are set. With neither set the
/// avatar step does nothing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AvatarConfig {
    pub gravatar_username: String,
    pub gravatar_email: String,
    /// Requested edge length in pixels.
    pub size: u32,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            gravatar_username: String::new(),
            gravatar_email: String::new(),
            size: 160,
        }
    }
}

impl SiteConfig {
    /// Validate config values are usable before any file is written.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.post_matcher()?;
        if self.avatar.size == 0 || self.avatar.size > 2048 {
            return Err(ConfigError::Validation(
                "avatar.size must be 1-2048".into(),
            ));
        }
        if self.source_path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "source_path must not be empty".into(),
            ));
        }
        if self.destination_path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "destination_path must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Compile the post detection pattern.
    pub fn post_matcher(&self) -> Result<Regex, ConfigError> {
        Regex::new(&self.post_pattern).map_err(|e| {
            ConfigError::Validation(format!("post_pattern is not a valid regex: {e}"))
        })
    }

    /// Anchor every relative path at `base`. Absolute paths are left alone.
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        let anchor = |p: PathBuf| if p.is_absolute() { p } else { base.join(p) };
        self.source_path = anchor(self.source_path);
        self.destination_path = anchor(self.destination_path);
        self.page_template_file = anchor(self.page_template_file);
        self.resource_path = anchor(self.resource_path);
        self
    }

    /// Where the profile picture lands inside the destination tree.
    pub fn avatar_path(&self) -> PathBuf {
        self.destination_path.join("images").join("avatar.jpg")
    }
}

// =============================================================================
// Config loading and validation
// =============================================================================

/// Parse `config.toml` text and validate it.
///
/// Both config structs are `#[serde(default)]`, so keys the file leaves out,
/// including single keys inside `[avatar]`, keep their stock values.
pub fn parse_config(content: &str) -> Result<SiteConfig, ConfigError> {
    let config: SiteConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load the site config from `dir`.
///
/// Missing file means stock defaults. The returned config has every path
/// resolved against `dir`.
pub fn load_config(dir: &Path) -> Result<SiteConfig, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    let config = if config_path.exists() {
        parse_config(&fs::read_to_string(&config_path)?)?
    } else {
        SiteConfig::default()
    };
    Ok(config.resolve_paths(dir))
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# meinstatic configuration
# ========================
# All settings are optional. Values shown below are the defaults.
# Relative paths are resolved against the directory holding this file.
# Unknown keys will cause an error.

# Inserted verbatim into every page as {{ SiteName }}.
site_name = ""

# Markdown sources. Every *.md below this directory becomes a page.
source_path = "pages-md"

# Generated site. Pages mirror the source tree: a/b.md -> a/b.html.
destination_path = "html"

# Liquid template wrapped around every page.
# Available variables: {{ SiteName }}, {{ Body }}, {{ RelRoot }}.
page_template_file = "templates/template.html"

# Copied as-is into <destination_path>/<directory name>.
resource_path = "res"

# Documents whose path (relative to source_path) matches this regex are
# posts and get listed in posts.html.
post_pattern = "[0-9]{8}-.*"

# ---------------------------------------------------------------------------
# Profile picture, stored at <destination_path>/images/avatar.jpg
# ---------------------------------------------------------------------------
[avatar]
# Gravatar username; takes precedence over the email.
gravatar_username = ""

# Gravatar email; hashed before lookup.
gravatar_email = ""

# Requested image size in pixels.
size = 160
"##
}
