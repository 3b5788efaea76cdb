use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;

use crate::foundation::error::{DraftError, DraftResult};

/// Content type of packaged drafts.
pub const ZIP_CONTENT_TYPE: &str = "application/zip";

/// Final destination of a packaged archive.
pub trait UploadSink: Send + Sync {
    /// Store the file at `path` and return a locator the caller can hand out.
    fn upload(&self, path: &Path, content_type: &str) -> DraftResult<String>;
}

/// Copies archives into a local directory; the locator is the copied path.
///
/// An existing file with the same name is never replaced.
#[derive(Clone, Debug)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl UploadSink for DirectorySink {
    fn upload(&self, path: &Path, _content_type: &str) -> DraftResult<String> {
        let file_name = path
            .file_name()
            .ok_or_else(|| DraftError::packaging(format!("'{}' has no file name", path.display())))?;
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output dir '{}'", self.dir.display()))?;
        let dest = self.dir.join(file_name);
        let mut src =
            std::fs::File::open(path).with_context(|| format!("open '{}'", path.display()))?;
        let mut out = match std::fs::File::options().write(true).create_new(true).open(&dest) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(DraftError::packaging(format!(
                    "'{}' already exists",
                    dest.display()
                )));
            }
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("create '{}'", dest.display()))
                    .into());
            }
        };
        std::io::copy(&mut src, &mut out)
            .with_context(|| format!("copy archive to '{}'", dest.display()))?;
        Ok(dest.display().to_string())
    }
}

/// Uploads with `PUT <base_url>/<file name>`; the locator is that URL.
pub struct HttpPutSink {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpPutSink {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> DraftResult<Self> {
        let base_url = base_url.into();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(DraftError::validation(format!(
                "upload url must be http(s): '{base_url}'"
            )));
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("capdraft/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to create HTTP client")?;
        Ok(Self { client, base_url })
    }

    fn target(&self, file_name: &str) -> String {
        format!("{}/{file_name}", self.base_url.trim_end_matches('/'))
    }
}

impl UploadSink for HttpPutSink {
    #[tracing::instrument(skip(self))]
    fn upload(&self, path: &Path, content_type: &str) -> DraftResult<String> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| DraftError::packaging(format!("'{}' has no file name", path.display())))?;
        let url = self.target(&file_name);
        let body = std::fs::read(path).with_context(|| format!("read '{}'", path.display()))?;

        let response = self
            .client
            .put(&url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .map_err(|e| DraftError::packaging(format!("PUT {url}: {e}")))?;
        if !response.status().is_success() {
            return Err(DraftError::packaging(format!(
                "PUT {url} returned status {}",
                response.status()
            )));
        }
        tracing::info!(%url, "archive uploaded");
        Ok(url)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/package/sink.rs"]
mod tests;
