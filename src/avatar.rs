//! Profile picture download from Gravatar.
//!
//! Runs once per build, independent of page rendering. The picture is stored
//! at `<destination>/images/avatar.jpg` and never re-downloaded while that
//! file exists; delete it to refresh.
//!
//! Lookup:
//!
//! 1. Identity is `gravatar_username`, or the SHA-256 hex digest of the
//!    trimmed, lowercased `gravatar_email`. Neither set → nothing to do.
//! 2. `GET https://www.gravatar.com/<identity>.json` → profile JSON.
//! 3. First photo of the first entry, requested at `?s=<size>`.
//!
//! Network access goes through [`Fetcher`] so the lookup logic is testable
//! without a network.

use crate::config::AvatarConfig;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const PROFILE_BASE_URL: &str = "https://www.gravatar.com";

#[derive(Error, Debug)]
pub enum AvatarError {
    #[error("HTTP error fetching {url}: {source}")]
    Http { url: String, source: reqwest::Error },
    #[error("Invalid Gravatar profile: {0}")]
    Profile(#[from] serde_json::Error),
    #[error("Gravatar profile for {0} has no photo")]
    NoPhoto(String),
    #[error("IO error on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
}

/// Fetches a URL's body.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, AvatarError>;
}

/// [`Fetcher`] backed by a blocking HTTP client.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, AvatarError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("meinstatic/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| AvatarError::Http {
                url: PROFILE_BASE_URL.to_string(),
                source,
            })?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, AvatarError> {
        let http = |source| AvatarError::Http {
            url: url.to_string(),
            source,
        };
        let response = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(http)?;
        let bytes = response.bytes().map_err(http)?;
        Ok(bytes.to_vec())
    }
}

/// Outcome of [`fetch_avatar`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvatarOutcome {
    /// Neither username nor email configured.
    NotConfigured,
    /// The file was already there; nothing fetched.
    AlreadyPresent(PathBuf),
    /// Downloaded from the given image URL.
    Downloaded { path: PathBuf, url: String },
}

#[derive(Debug, Deserialize)]
struct Profile {
    #[serde(default)]
    entry: Vec<ProfileEntry>,
}

#[derive(Debug, Deserialize)]
struct ProfileEntry {
    #[serde(default)]
    photos: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    value: String,
}

/// Gravatar identity for the configured username or email.
pub fn gravatar_id(config: &AvatarConfig) -> Option<String> {
    let username = config.gravatar_username.trim();
    if !username.is_empty() {
        return Some(username.to_string());
    }
    let email = config.gravatar_email.trim().to_lowercase();
    if email.is_empty() {
        return None;
    }
    let digest = Sha256::digest(email.as_bytes());
    Some(digest.iter().map(|b| format!("{b:02x}")).collect())
}

/// Profile JSON URL for an identity.
pub fn profile_url(id: &str) -> String {
    format!(
        "{PROFILE_BASE_URL}/{}.json",
        utf8_percent_encode(id, NON_ALPHANUMERIC)
    )
}

/// Download the profile picture to `target` unless it already exists.
///
/// The parent directory is created in every case, so the destination layout
/// does not depend on whether an avatar is configured.
pub fn fetch_avatar(
    config: &AvatarConfig,
    target: &Path,
    fetcher: &dyn Fetcher,
) -> Result<AvatarOutcome, AvatarError> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|source| AvatarError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    if target.exists() {
        return Ok(AvatarOutcome::AlreadyPresent(target.to_path_buf()));
    }
    let Some(id) = gravatar_id(config) else {
        return Ok(AvatarOutcome::NotConfigured);
    };

    let profile: Profile = serde_json::from_slice(&fetcher.fetch(&profile_url(&id))?)?;
    let photo = profile
        .entry
        .into_iter()
        .next()
        .and_then(|e| e.photos.into_iter().next())
        .ok_or_else(|| AvatarError::NoPhoto(id.clone()))?;
    let image_url = format!("{}?s={}", photo.value, config.size);
    let image = fetcher.fetch(&image_url)?;
    fs::write(target, image).map_err(|source| AvatarError::Io {
        path: target.to_path_buf(),
        source,
    })?;

    Ok(AvatarOutcome::Downloaded {
        path: target.to_path_buf(),
        url: image_url,
    })
}
