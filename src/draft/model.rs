//! Typed view of the two draft documents.
//!
//! The editor's schema is large and owned by the editor. Each node here names
//! only the fields this crate reads or writes; everything else is captured in
//! a flattened `extra` map and written back unchanged. Typed fields must never
//! also appear in `extra`.

use crate::foundation::core::TimeRange;

/// Opaque fields carried through untouched.
pub type Extra = serde_json::Map<String, serde_json::Value>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Kind of a track; the editor keeps one of each per draft here.
pub enum TrackKind {
    /// Still images.
    #[default]
    Video,
    /// Narration.
    Audio,
    /// Subtitles.
    Text,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Placement of one material on a track.
pub struct Segment {
    /// Segment id.
    pub id: String,
    /// Id of the primary material this segment shows.
    pub material_id: String,
    /// Placement on the timeline.
    pub target_timerange: TimeRange,
    /// Range read from the source; `null` for text.
    pub source_timerange: Option<TimeRange>,
    /// Ids of auxiliary materials (speed, canvas, animation, ...).
    pub extra_material_refs: Vec<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Ordered segments of a single kind.
pub struct Track {
    /// Track id.
    pub id: String,
    /// Track kind.
    #[serde(rename = "type")]
    pub kind: TrackKind,
    /// Segments in timeline order.
    pub segments: Vec<Segment>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Narration clip imported from the material folder.
pub struct AudioMaterial {
    pub id: String,
    /// Duration in microseconds.
    pub duration: u64,
    /// File name inside the material folder.
    pub name: String,
    /// Absolute path on the user's machine.
    pub path: String,
    /// Id of the matching meta asset.
    pub local_material_id: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Still image imported from the material folder (the editor calls it a video of type photo).
pub struct VideoMaterial {
    pub id: String,
    /// Duration in microseconds.
    pub duration: u64,
    pub width: u32,
    pub height: u32,
    /// File name inside the material folder.
    pub material_name: String,
    /// Absolute path on the user's machine.
    pub path: String,
    /// Id of the matching meta asset.
    pub local_material_id: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// One subtitle sentence.
pub struct TextMaterial {
    pub id: String,
    /// Rich-text payload: a JSON document serialized into a string.
    pub content: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Schema-required supporting entity with no unit-specific payload.
pub struct AuxMaterial {
    pub id: String,
    /// Editor type tag (`speed`, `beats`, `canvas_color`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Material lists of the content document, grouped by kind.
pub struct Materials {
    pub audios: Vec<AudioMaterial>,
    pub beats: Vec<AuxMaterial>,
    pub canvases: Vec<AuxMaterial>,
    pub material_animations: Vec<AuxMaterial>,
    pub sound_channel_mappings: Vec<AuxMaterial>,
    pub speeds: Vec<AuxMaterial>,
    pub texts: Vec<TextMaterial>,
    pub videos: Vec<VideoMaterial>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Materials {
    /// Empty every list this crate populates, keeping unknown collections.
    pub fn clear_populated(&mut self) {
        self.audios.clear();
        self.beats.clear();
        self.canvases.clear();
        self.material_animations.clear();
        self.sound_channel_mappings.clear();
        self.speeds.clear();
        self.texts.clear();
        self.videos.clear();
    }

    /// Replace every populated list with the ones from `other`.
    pub fn replace_populated(&mut self, other: Materials) {
        self.audios = other.audios;
        self.beats = other.beats;
        self.canvases = other.canvases;
        self.material_animations = other.material_animations;
        self.sound_channel_mappings = other.sound_channel_mappings;
        self.speeds = other.speeds;
        self.texts = other.texts;
        self.videos = other.videos;
    }

    /// Ids of every populated material.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        let aux = self
            .beats
            .iter()
            .chain(&self.canvases)
            .chain(&self.material_animations)
            .chain(&self.sound_channel_mappings)
            .chain(&self.speeds)
            .map(|m| m.id.as_str());
        self.audios
            .iter()
            .map(|m| m.id.as_str())
            .chain(self.videos.iter().map(|m| m.id.as_str()))
            .chain(self.texts.iter().map(|m| m.id.as_str()))
            .chain(aux)
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Canvas block of the content document.
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Platform the draft claims it was last saved on.
pub struct Platform {
    pub os: String,
    pub os_version: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// `draft_content.json`: canvas, materials and tracks.
pub struct ContentDocument {
    pub id: String,
    pub canvas_config: CanvasConfig,
    /// Total timeline duration in microseconds.
    pub duration: u64,
    pub materials: Materials,
    pub tracks: Vec<Track>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_platform: Option<Platform>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Meta asset type tag for narration files.
pub const META_MUSIC: &str = "music";
/// Meta asset type tag for still images.
pub const META_PHOTO: &str = "photo";

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Import record of one file in the material folder.
pub struct MetaAsset {
    pub id: String,
    /// Duration in microseconds (matches the material).
    pub duration: u64,
    /// Path relative to the draft folder, e.g. `./material/0.mp3`.
    #[serde(rename = "file_Path")]
    pub file_path: String,
    /// File name.
    pub extra_info: String,
    pub width: u32,
    pub height: u32,
    /// File creation time, seconds.
    pub create_time: i64,
    /// `music` or `photo` (the editor's spelling of the key).
    pub metetype: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// One group of import records in the meta document.
pub struct DraftMaterialGroup {
    #[serde(rename = "type")]
    pub kind: i64,
    pub value: Vec<MetaAsset>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// `draft_meta_info.json`: identity, paths, timestamps and import records.
pub struct MetaDocument {
    pub draft_id: String,
    pub draft_name: String,
    pub draft_fold_path: String,
    pub draft_root_path: String,
    pub draft_removable_storage_device: String,
    /// Creation time, microseconds.
    pub tm_draft_create: i64,
    /// Modification time, microseconds.
    pub tm_draft_modified: i64,
    /// Total duration, microseconds.
    pub tm_duration: u64,
    pub draft_materials: Vec<DraftMaterialGroup>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl MetaDocument {
    /// Group that receives imported file records, created when the template has none.
    pub fn imported_group_mut(&mut self) -> &mut DraftMaterialGroup {
        if self.draft_materials.is_empty() {
            self.draft_materials.push(DraftMaterialGroup::default());
        }
        &mut self.draft_materials[0]
    }

    /// Records of imported files.
    pub fn imported(&self) -> &[MetaAsset] {
        self.draft_materials
            .first()
            .map(|g| g.value.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/draft/model.rs"]
mod tests;
