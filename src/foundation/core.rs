use std::time::{SystemTime, UNIX_EPOCH};

/// Microseconds per second; every timeline value in a draft is in microseconds.
pub const MICROS_PER_SEC: u64 = 1_000_000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
/// Half-open placement `[start, start + duration)` on the timeline, in microseconds.
pub struct TimeRange {
    /// Duration in microseconds.
    pub duration: u64,
    /// Start offset in microseconds.
    pub start: u64,
}

impl TimeRange {
    /// Construct a range from `start` and `duration`.
    pub fn new(start: u64, duration: u64) -> Self {
        Self { duration, start }
    }

    /// Exclusive end of the range.
    pub fn end(self) -> u64 {
        self.start.saturating_add(self.duration)
    }

    /// Whether the range has zero length.
    pub fn is_empty(self) -> bool {
        self.duration == 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Output canvas dimensions in pixels.
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 960,
        }
    }
}

/// Fresh identifier for a draft entity (material, segment, track, document).
pub fn new_entity_id() -> String {
    uuid::Uuid::new_v4().to_string().to_uppercase()
}

/// Fresh identifier for a meta asset record; the editor stores these lowercase.
pub fn new_asset_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Current wall-clock time in whole seconds since the Unix epoch.
pub fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Current wall-clock time in microseconds since the Unix epoch.
pub fn now_micros() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as i64)
        .unwrap_or(0)
}

/// Creation time of a file in whole seconds, falling back to now.
pub fn file_created_secs(path: &std::path::Path) -> i64 {
    std::fs::metadata(path)
        .and_then(|m| m.created().or_else(|_| m.modified()))
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs() as i64)
        .unwrap_or_else(now_secs)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
