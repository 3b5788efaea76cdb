use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{DraftError, DraftResult};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// One caption item: a still image shown while its narration plays, with subtitle text.
pub struct Unit {
    /// Image URL (or local path).
    pub image_url: String,
    /// Narration audio URL (or local path).
    pub audio_url: String,
    /// Subtitle text, split into sentences on the timeline.
    #[serde(alias = "content_split", default)]
    pub text: String,
}

impl Unit {
    /// Convenience constructor.
    pub fn new(
        image_url: impl Into<String>,
        audio_url: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            image_url: image_url.into(),
            audio_url: audio_url.into(),
            text: text.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A single draft build job.
pub struct DraftRequest {
    /// Caller's job identifier, used only for logging.
    #[serde(alias = "chapter_id", deserialize_with = "de_stringish")]
    pub job_id: String,
    /// Display name of the draft (whitespace is removed, a timestamp is prefixed).
    #[serde(default)]
    pub draft_name: String,
    /// Draft folder of the editor on the user's machine.
    #[serde(alias = "user_path")]
    pub dest_root: String,
    /// Ordered caption units; index is timeline order.
    #[serde(alias = "caps")]
    pub units: Vec<Unit>,
    /// Run the keyframe injector before packaging.
    #[serde(
        alias = "enable_key_frame",
        default,
        deserialize_with = "de_flag"
    )]
    pub enable_keyframes: bool,
}

impl DraftRequest {
    /// Load a request from a JSON file.
    pub fn from_path(path: &Path) -> DraftResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read request '{}'", path.display()))?;
        Self::from_json(&text)
    }

    /// Parse and validate a request from JSON text.
    pub fn from_json(text: &str) -> DraftResult<Self> {
        let req: Self = serde_json::from_str(text)?;
        req.validate()?;
        Ok(req)
    }

    /// A request must carry at least one unit.
    pub fn validate(&self) -> DraftResult<()> {
        if self.units.is_empty() {
            return Err(DraftError::validation("request has no units"));
        }
        Ok(())
    }
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum Stringish {
    Str(String),
    Int(i64),
}

fn de_stringish<'de, D>(d: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match <Stringish as serde::Deserialize>::deserialize(d)? {
        Stringish::Str(s) => s,
        Stringish::Int(n) => n.to_string(),
    })
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(i64),
}

fn de_flag<'de, D>(d: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match <Flag as serde::Deserialize>::deserialize(d)? {
        Flag::Bool(b) => b,
        Flag::Int(n) => n == 1,
    })
}

#[cfg(test)]
#[path = "../tests/unit/request.rs"]
mod tests;
