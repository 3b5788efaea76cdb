use std::path::PathBuf;

use crate::{
    assets::{
        fetch::{AssetKind, FetchOutcome},
        probe::{MediaProbe, duration_to_micros},
    },
    draft::{
        entities,
        model::{Materials, MetaAsset, Track, TrackKind},
    },
    foundation::{
        core::{Canvas, TimeRange, file_created_secs, new_asset_id, new_entity_id},
        error::{DraftError, DraftResult},
        paths::{UserPath, material_rel_path},
    },
    request::Unit,
    timeline::split::{distribute, split_sentences},
};

#[derive(Clone, Debug)]
/// Where a build reads fetched files from and how it refers to them in the documents.
pub struct BuildLayout {
    /// Local folder holding `<i>.jpg` / `<i>.mp3`.
    pub material_dir: PathBuf,
    /// The same folder as seen from the user's machine.
    pub user_material_dir: UserPath,
    /// Project canvas; images that cannot be probed take these dimensions.
    pub canvas: Canvas,
}

#[derive(Clone, Debug, Default)]
/// Output of one build pass, ready to be written into the project documents.
pub struct Timeline {
    /// Video, audio and text tracks, in that order.
    pub tracks: Vec<Track>,
    pub materials: Materials,
    /// Bookkeeping records for every audio and photo file.
    pub meta_assets: Vec<MetaAsset>,
    /// Sum of unit durations in microseconds.
    pub total_duration: u64,
}

impl Timeline {
    /// Track of the given kind.
    pub fn track(&self, kind: TrackKind) -> Option<&Track> {
        self.tracks.iter().find(|t| t.kind == kind)
    }
}

/// Sequential, order-preserving assembly of materials, segments and tracks.
///
/// A single clock advances by each unit's narration length; audio and video
/// segments of a unit share that slot and its subtitles subdivide it.
pub struct TimelineBuilder<'a> {
    probe: &'a dyn MediaProbe,
    layout: BuildLayout,
}

struct Tracks {
    video: Track,
    audio: Track,
    text: Track,
}

impl<'a> TimelineBuilder<'a> {
    pub fn new(probe: &'a dyn MediaProbe, layout: BuildLayout) -> Self {
        Self { probe, layout }
    }

    /// Build the timeline for `units` given the per-unit fetch results.
    ///
    /// Missing or unreadable media degrade per unit (zero duration, canvas
    /// dimensions); only an internal failure such as text serialization aborts.
    #[tracing::instrument(skip_all, fields(units = units.len()))]
    pub fn build(&self, units: &[Unit], fetch: &[FetchOutcome]) -> DraftResult<Timeline> {
        if fetch.len() != units.len() {
            return Err(DraftError::build(format!(
                "fetch results for {} units, expected {}",
                fetch.len(),
                units.len()
            )));
        }

        let mut tracks = Tracks {
            video: entities::track(&new_entity_id(), TrackKind::Video),
            audio: entities::track(&new_entity_id(), TrackKind::Audio),
            text: entities::track(&new_entity_id(), TrackKind::Text),
        };
        let mut materials = Materials::default();
        let mut meta_assets = Vec::with_capacity(units.len() * 2);
        let mut clock = 0u64;

        for (index, (unit, outcome)) in units.iter().zip(fetch).enumerate() {
            let duration = self.unit_duration(index, outcome.audio_ok);
            let slot = TimeRange::new(clock, duration);
            self.push_unit(
                index,
                unit,
                *outcome,
                slot,
                &mut tracks,
                &mut materials,
                &mut meta_assets,
            )?;
            clock += duration;
        }

        tracing::info!(total_duration = clock, "timeline built");
        Ok(Timeline {
            tracks: vec![tracks.video, tracks.audio, tracks.text],
            materials,
            meta_assets,
            total_duration: clock,
        })
    }

    fn unit_duration(&self, index: usize, audio_ok: bool) -> u64 {
        if !audio_ok {
            tracing::warn!(index, "audio missing, unit gets zero duration");
            return 0;
        }
        let path = self.layout.material_dir.join(AssetKind::Audio.file_name(index));
        match self.probe.audio_duration_secs(&path) {
            Ok(secs) => duration_to_micros(secs),
            Err(e) => {
                tracing::warn!(index, error = %e, "audio probe failed, unit gets zero duration");
                0
            }
        }
    }

    fn image_dimensions(&self, index: usize, image_ok: bool) -> (u32, u32) {
        let fallback = (self.layout.canvas.width, self.layout.canvas.height);
        if !image_ok {
            tracing::warn!(index, "image missing, using canvas dimensions");
            return fallback;
        }
        let path = self.layout.material_dir.join(AssetKind::Image.file_name(index));
        self.probe.image_dimensions(&path).unwrap_or_else(|e| {
            tracing::warn!(index, error = %e, "image probe failed, using canvas dimensions");
            fallback
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn push_unit(
        &self,
        index: usize,
        unit: &Unit,
        outcome: FetchOutcome,
        slot: TimeRange,
        tracks: &mut Tracks,
        materials: &mut Materials,
        meta_assets: &mut Vec<MetaAsset>,
    ) -> DraftResult<()> {
        let duration = slot.duration;

        // Audio side.
        let audio_file = AssetKind::Audio.file_name(index);
        let audio_meta_id = new_asset_id();
        let audio_id = new_entity_id();
        let speed_id = new_entity_id();
        let beat_id = new_entity_id();
        let mapping_id = new_entity_id();
        materials.audios.push(entities::audio_material(
            &audio_id,
            duration,
            &audio_file,
            self.layout.user_material_dir.join(&audio_file).as_str(),
            &audio_meta_id,
        ));
        materials.speeds.push(entities::speed(&speed_id));
        materials.beats.push(entities::beat(&beat_id));
        materials
            .sound_channel_mappings
            .push(entities::sound_channel_mapping(&mapping_id));
        meta_assets.push(entities::music_meta(
            &audio_meta_id,
            duration,
            &audio_file,
            &material_rel_path(&audio_file),
            file_created_secs(&self.layout.material_dir.join(&audio_file)),
        ));
        tracks.audio.segments.push(entities::audio_segment(
            &new_entity_id(),
            &audio_id,
            slot,
            vec![mapping_id, speed_id.clone(), beat_id],
        ));

        // Picture side.
        let image_file = AssetKind::Image.file_name(index);
        let (width, height) = self.image_dimensions(index, outcome.image_ok);
        let photo_meta_id = new_asset_id();
        let photo_id = new_entity_id();
        let canvas_id = new_entity_id();
        let animation_id = new_entity_id();
        materials.videos.push(entities::photo_material(
            &photo_id,
            duration,
            &image_file,
            self.layout.user_material_dir.join(&image_file).as_str(),
            width,
            height,
            &photo_meta_id,
        ));
        materials.canvases.push(entities::canvas(&canvas_id));
        materials
            .material_animations
            .push(entities::animation(&animation_id));
        meta_assets.push(entities::photo_meta(
            &photo_meta_id,
            duration,
            &image_file,
            &material_rel_path(&image_file),
            file_created_secs(&self.layout.material_dir.join(&image_file)),
            (width, height),
        ));
        tracks.video.segments.push(entities::video_segment(
            &new_entity_id(),
            &photo_id,
            slot,
            vec![canvas_id, speed_id, animation_id.clone()],
        ));

        // Subtitles.
        let sentences = split_sentences(&unit.text);
        let ranges = distribute(slot.start, duration, &sentences);
        for (sentence, range) in sentences.iter().zip(ranges) {
            let text_id = new_entity_id();
            let material = entities::text_material(&text_id, sentence).map_err(|e| {
                DraftError::build(format!("unit {index}: text material failed: {e}"))
            })?;
            materials.texts.push(material);
            tracks.text.segments.push(entities::text_segment(
                &new_entity_id(),
                &text_id,
                range,
                vec![animation_id.clone()],
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/builder.rs"]
mod tests;
