/// Convenience result type used across capdraft.
pub type DraftResult<T> = Result<T, DraftError>;

/// Top-level error taxonomy used by the draft assembly APIs.
///
/// `Fetch` and `Probe` errors are normally degraded where they occur (a missing
/// asset, a zero duration); `Build` and `Packaging` errors are fatal to a job.
#[derive(thiserror::Error, Debug)]
pub enum DraftError {
    /// Invalid caller-provided request or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A remote or local asset could not be fetched.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Duration or pixel dimensions of a local file could not be read.
    #[error("probe error: {0}")]
    Probe(String),

    /// Unexpected condition while assembling the draft documents.
    #[error("build error: {0}")]
    Build(String),

    /// Archive construction or upload failed.
    #[error("packaging error: {0}")]
    Packaging(String),

    /// Errors when serializing or deserializing draft documents.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DraftError {
    /// Build a [`DraftError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`DraftError::Fetch`] value.
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Build a [`DraftError::Probe`] value.
    pub fn probe(msg: impl Into<String>) -> Self {
        Self::Probe(msg.into())
    }

    /// Build a [`DraftError::Build`] value.
    pub fn build(msg: impl Into<String>) -> Self {
        Self::Build(msg.into())
    }

    /// Build a [`DraftError::Packaging`] value.
    pub fn packaging(msg: impl Into<String>) -> Self {
        Self::Packaging(msg.into())
    }

    /// Build a [`DraftError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for DraftError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
