use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::{
    core::Canvas,
    error::{DraftError, DraftResult},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Engine-wide settings shared by every job.
///
/// Every field has a default, so a config file only needs the keys it overrides.
pub struct BuildConfig {
    /// Directory under which each job creates its private working directory.
    pub temp_root: PathBuf,
    /// Canvas used when the first image cannot be probed.
    pub default_canvas: Canvas,
    /// Download pool and retry settings.
    pub fetch: FetchConfig,
    /// Tuning parameter handed to the keyframe injector.
    pub keyframe_strength: f64,
    /// `chrono` format string prefixed to every draft name.
    pub name_prefix_format: String,
    /// File written next to the draft folder explaining where to copy it.
    pub notice_file_name: String,
    /// Prefix rewrites applied to every asset URL before fetching.
    pub url_rewrites: Vec<UrlRewrite>,
    /// Accept local paths and `file://` URLs as asset sources. Off by default.
    pub allow_local_files: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            temp_root: std::env::temp_dir().join("capdraft"),
            default_canvas: Canvas::default(),
            fetch: FetchConfig::default(),
            keyframe_strength: 1.3,
            name_prefix_format: "%m月%d日%H时%M分".to_string(),
            notice_file_name: "README_COPY_DRAFT.txt".to_string(),
            url_rewrites: Vec::new(),
            allow_local_files: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Bounded worker pool and per-asset retry policy for the fetch phase.
pub struct FetchConfig {
    /// Concurrent download workers.
    pub workers: usize,
    /// Attempts per asset, including the first.
    pub attempts: u32,
    /// Pause between attempts.
    pub retry_delay_ms: u64,
    /// Upper bound for a single attempt.
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            workers: 8,
            attempts: 3,
            retry_delay_ms: 1000,
            timeout_secs: 30,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Replace a leading `from` with `to` (e.g. CDN host to origin bucket).
pub struct UrlRewrite {
    /// Prefix to match.
    pub from: String,
    /// Replacement prefix.
    pub to: String,
}

impl BuildConfig {
    /// Load a JSON config file; absent keys keep their defaults.
    pub fn from_path(path: &Path) -> DraftResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_str(&text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject settings that would make a build impossible.
    pub fn validate(&self) -> DraftResult<()> {
        if self.fetch.workers == 0 {
            return Err(DraftError::validation("fetch.workers must be >= 1"));
        }
        if self.fetch.attempts == 0 {
            return Err(DraftError::validation("fetch.attempts must be >= 1"));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(DraftError::validation("fetch.timeout_secs must be >= 1"));
        }
        if self.default_canvas.width == 0 || self.default_canvas.height == 0 {
            return Err(DraftError::validation(
                "default_canvas width/height must be non-zero",
            ));
        }
        if self.name_prefix_format.trim().is_empty() {
            return Err(DraftError::validation("name_prefix_format must not be empty"));
        }
        if chrono::format::StrftimeItems::new(&self.name_prefix_format)
            .any(|item| matches!(item, chrono::format::Item::Error))
        {
            return Err(DraftError::validation(format!(
                "name_prefix_format '{}' is not a valid strftime pattern",
                self.name_prefix_format
            )));
        }
        if !self.keyframe_strength.is_finite() {
            return Err(DraftError::validation("keyframe_strength must be finite"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
