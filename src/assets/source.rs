use std::{path::Path, time::Duration};

use anyhow::Context as _;

use crate::{
    config::UrlRewrite,
    foundation::error::{DraftError, DraftResult},
};

/// Maps a caller-given URL to one this process can fetch.
pub trait UrlResolver: Send + Sync {
    /// Resolve `url`; must be infallible (unresolvable URLs fail at fetch time).
    fn resolve(&self, url: &str) -> String;
}

#[derive(Clone, Debug, Default)]
/// Rewrites the first matching prefix; with no rules it is the identity.
pub struct PrefixResolver {
    rules: Vec<UrlRewrite>,
}

impl PrefixResolver {
    pub fn new(rules: Vec<UrlRewrite>) -> Self {
        Self { rules }
    }
}

impl UrlResolver for PrefixResolver {
    fn resolve(&self, url: &str) -> String {
        for rule in &self.rules {
            if let Some(rest) = url.strip_prefix(rule.from.as_str()) {
                return format!("{}{rest}", rule.to);
            }
        }
        url.to_string()
    }
}

/// Writes the bytes behind a URL to a local file.
pub trait AssetSource: Send + Sync {
    /// Fetch `url` into `dest`, replacing any existing file.
    fn fetch(&self, url: &str, dest: &Path) -> DraftResult<()>;
}

/// HTTP(S) downloads through a blocking client with a per-request timeout.
///
/// Local paths (optionally `file://`) are copied only after
/// [`HttpSource::allow_local_files`]; otherwise they are rejected.
pub struct HttpSource {
    client: reqwest::blocking::Client,
    allow_local: bool,
}

impl HttpSource {
    pub fn new(timeout: Duration) -> DraftResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("capdraft/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to create HTTP client")?;
        Ok(Self {
            client,
            allow_local: false,
        })
    }

    pub fn allow_local_files(mut self, allow: bool) -> Self {
        self.allow_local = allow;
        self
    }
}

fn is_http(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

impl AssetSource for HttpSource {
    fn fetch(&self, url: &str, dest: &Path) -> DraftResult<()> {
        if !is_http(url) {
            if !self.allow_local {
                return Err(DraftError::fetch(format!(
                    "'{url}' is not an http(s) url and local files are disabled"
                )));
            }
            let src = url.strip_prefix("file://").unwrap_or(url);
            std::fs::copy(src, dest)
                .map_err(|e| DraftError::fetch(format!("copy '{src}': {e}")))?;
            return Ok(());
        }

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| DraftError::fetch(format!("GET {url}: {e}")))?;
        if !response.status().is_success() {
            return Err(DraftError::fetch(format!(
                "GET {url} returned status {}",
                response.status()
            )));
        }
        let bytes = response
            .bytes()
            .map_err(|e| DraftError::fetch(format!("read body of {url}: {e}")))?;
        std::fs::write(dest, &bytes)
            .with_context(|| format!("write '{}'", dest.display()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
