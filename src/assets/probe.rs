use std::path::Path;

use crate::foundation::{
    core::MICROS_PER_SEC,
    error::{DraftError, DraftResult},
};

/// Padding added to every probed audio duration, in microseconds.
///
/// Keeps the last frame of narration from being clipped when the editor rounds
/// durations to its frame grid.
pub const DURATION_PAD_US: u64 = 33_333;

/// Reads the two properties the timeline needs from local media files.
pub trait MediaProbe: Send + Sync {
    /// Audio duration in seconds.
    fn audio_duration_secs(&self, path: &Path) -> DraftResult<f64>;
    /// Image `(width, height)` in pixels.
    fn image_dimensions(&self, path: &Path) -> DraftResult<(u32, u32)>;
}

/// Audio through the system `ffprobe`, images through the `image` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct FfprobeProbe;

impl MediaProbe for FfprobeProbe {
    fn audio_duration_secs(&self, path: &Path) -> DraftResult<f64> {
        #[derive(serde::Deserialize)]
        struct ProbeFormat {
            duration: Option<String>,
        }
        #[derive(serde::Deserialize)]
        struct ProbeOut {
            format: ProbeFormat,
        }

        let out = std::process::Command::new("ffprobe")
            .args(["-v", "error", "-print_format", "json", "-show_format"])
            .arg(path)
            .output()
            .map_err(|e| DraftError::probe(format!("failed to run ffprobe: {e}")))?;
        if !out.status.success() {
            return Err(DraftError::probe(format!(
                "ffprobe failed for '{}': {}",
                path.display(),
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }

        let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
            .map_err(|e| DraftError::probe(format!("ffprobe json parse failed: {e}")))?;
        let raw = parsed
            .format
            .duration
            .ok_or_else(|| DraftError::probe("missing duration from ffprobe"))?;
        raw.trim()
            .parse::<f64>()
            .map_err(|e| DraftError::probe(format!("bad ffprobe duration '{raw}': {e}")))
    }

    fn image_dimensions(&self, path: &Path) -> DraftResult<(u32, u32)> {
        // Files are named by slot (`<i>.jpg`), not by format, so sniff the content.
        image::ImageReader::open(path)
            .and_then(|r| r.with_guessed_format())
            .map_err(|e| DraftError::probe(format!("open image '{}': {e}", path.display())))?
            .into_dimensions()
            .map_err(|e| DraftError::probe(format!("decode image '{}': {e}", path.display())))
    }
}

/// Convert a probed duration to timeline microseconds, padding included.
pub fn duration_to_micros(secs: f64) -> u64 {
    if !secs.is_finite() || secs < 0.0 {
        return 0;
    }
    (secs * MICROS_PER_SEC as f64 + DURATION_PAD_US as f64) as u64
}

#[cfg(test)]
#[path = "../../tests/unit/assets/probe.rs"]
mod tests;
