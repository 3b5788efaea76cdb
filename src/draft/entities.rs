//! Constructors for every entity the timeline creates.
//!
//! The editor requires a fixed set of fields on each node; the values below are
//! what it writes itself for a freshly imported still, narration clip or plain
//! subtitle. Only ids, paths, durations and dimensions vary per unit.

use serde_json::{Value, json};

use crate::{
    draft::model::{
        AudioMaterial, AuxMaterial, Extra, META_MUSIC, META_PHOTO, MetaAsset, Segment,
        TextMaterial, Track, TrackKind, VideoMaterial,
    },
    foundation::{
        core::{TimeRange, now_micros, now_secs},
        error::{DraftError, DraftResult},
    },
};

fn extra(v: Value) -> Extra {
    match v {
        Value::Object(map) => map,
        _ => Extra::new(),
    }
}

fn aux(id: &str, kind: &str, fields: Value) -> AuxMaterial {
    AuxMaterial {
        id: id.to_string(),
        kind: kind.to_string(),
        extra: extra(fields),
    }
}

pub fn speed(id: &str) -> AuxMaterial {
    aux(
        id,
        "speed",
        json!({ "curve_speed": null, "mode": 0, "speed": 1.0 }),
    )
}

pub fn beat(id: &str) -> AuxMaterial {
    aux(
        id,
        "beats",
        json!({
            "ai_beats": {
                "beat_speed_infos": [],
                "beats_path": "",
                "beats_url": "",
                "melody_path": "",
                "melody_percents": [0.0],
                "melody_url": ""
            },
            "enable_ai_beats": false,
            "gear": 404,
            "gear_count": 0,
            "mode": 404,
            "user_beats": [],
            "user_delete_ai_beats": null
        }),
    )
}

pub fn sound_channel_mapping(id: &str) -> AuxMaterial {
    aux(
        id,
        "none",
        json!({ "audio_channel_mapping": 0, "is_config_open": false }),
    )
}

pub fn canvas(id: &str) -> AuxMaterial {
    aux(
        id,
        "canvas_color",
        json!({
            "album_image": "",
            "blur": 0.0,
            "color": "",
            "image": "",
            "image_id": "",
            "image_name": "",
            "source_platform": 0,
            "team_id": ""
        }),
    )
}

pub fn animation(id: &str) -> AuxMaterial {
    aux(id, "sticker_animation", json!({ "animations": [] }))
}

pub fn audio_material(
    id: &str,
    duration: u64,
    file_name: &str,
    user_path: &str,
    meta_id: &str,
) -> AudioMaterial {
    AudioMaterial {
        id: id.to_string(),
        duration,
        name: file_name.to_string(),
        path: user_path.to_string(),
        local_material_id: meta_id.to_string(),
        extra: extra(json!({
            "app_id": 0,
            "category_id": "",
            "category_name": "local",
            "check_flag": 1,
            "effect_id": "",
            "formula_id": "",
            "intensifies_path": "",
            "music_id": "",
            "request_id": "",
            "resource_id": "",
            "source_platform": 0,
            "team_id": "",
            "text_id": "",
            "tone_category_id": "",
            "tone_category_name": "",
            "tone_effect_id": "",
            "tone_effect_name": "",
            "tone_speaker": "",
            "tone_type": "",
            "type": "extract_music",
            "video_id": "",
            "wave_points": []
        })),
    }
}

pub fn photo_material(
    id: &str,
    duration: u64,
    file_name: &str,
    user_path: &str,
    width: u32,
    height: u32,
    meta_id: &str,
) -> VideoMaterial {
    VideoMaterial {
        id: id.to_string(),
        duration,
        width,
        height,
        material_name: file_name.to_string(),
        path: user_path.to_string(),
        local_material_id: meta_id.to_string(),
        extra: extra(json!({
            "audio_fade": null,
            "cartoon_path": "",
            "category_id": "",
            "category_name": "",
            "check_flag": 63487,
            "crop": {
                "lower_left_x": 0.0,
                "lower_left_y": 1.0,
                "lower_right_x": 1.0,
                "lower_right_y": 1.0,
                "upper_left_x": 0.0,
                "upper_left_y": 0.0,
                "upper_right_x": 1.0,
                "upper_right_y": 0.0
            },
            "crop_ratio": "free",
            "crop_scale": 1.0,
            "extra_type_option": 0,
            "formula_id": "",
            "freeze": null,
            "gameplay": null,
            "has_audio": false,
            "intensifies_audio_path": "",
            "intensifies_path": "",
            "is_ai_generate_content": false,
            "is_unified_beauty_mode": false,
            "local_id": "",
            "material_id": "",
            "material_url": "",
            "matting": {
                "flag": 0,
                "has_use_quick_brush": false,
                "has_use_quick_eraser": false,
                "interactiveTime": [],
                "path": "",
                "strokes": []
            },
            "media_path": "",
            "object_locked": null,
            "origin_material_id": "",
            "picture_from": "none",
            "picture_set_category_id": "",
            "picture_set_category_name": "",
            "request_id": "",
            "reverse_intensifies_path": "",
            "reverse_path": "",
            "source_platform": 0,
            "stable": null,
            "team_id": "",
            "type": "photo",
            "video_algorithm": {
                "algorithms": [],
                "deflicker": null,
                "motion_blur_config": null,
                "noise_reduction": null,
                "path": "",
                "time_range": null
            }
        })),
    }
}

/// Subtitle fill color (RGB in `0..=1`), yellow.
const TEXT_FILL_RGB: [f64; 3] = [1.0, 0.870588, 0.0];
/// Subtitle font size in editor units.
const TEXT_SIZE: u32 = 7;

/// Rich-text payload for one sentence: yellow fill, black stroke, whole-string range.
pub fn text_content(sentence: &str) -> DraftResult<String> {
    let len = sentence.chars().count();
    let doc = json!({
        "text": sentence,
        "styles": [{
            "strokes": [{ "content": { "solid": { "color": [0, 0, 0] } }, "width": 0.08 }],
            "size": TEXT_SIZE,
            "fill": { "content": { "solid": { "color": TEXT_FILL_RGB } } },
            "range": [0, len]
        }]
    });
    serde_json::to_string(&doc)
        .map_err(|e| DraftError::build(format!("serialize text content: {e}")))
}

pub fn text_material(id: &str, sentence: &str) -> DraftResult<TextMaterial> {
    Ok(TextMaterial {
        id: id.to_string(),
        content: text_content(sentence)?,
        extra: extra(json!({
            "add_type": 0,
            "alignment": 1,
            "background_alpha": 1,
            "background_color": "",
            "background_height": 0.14,
            "background_horizontal_offset": 0,
            "background_round_radius": 0,
            "background_style": 0,
            "background_vertical_offset": 0,
            "background_width": 0.14,
            "bold_width": 0,
            "border_color": "#000000",
            "border_width": 0.08,
            "check_flag": 15,
            "combo_info": { "text_templates": [] },
            "fixed_height": -1,
            "fixed_width": 600,
            "font_category_id": "",
            "font_category_name": "",
            "font_id": "",
            "font_name": "",
            "font_path": "",
            "font_resource_id": "",
            "font_size": TEXT_SIZE,
            "font_source_platform": 0,
            "font_team_id": "",
            "font_title": "none",
            "font_url": "",
            "fonts": [],
            "force_apply_line_max_width": false,
            "global_alpha": 1,
            "group_id": "",
            "has_shadow": false,
            "initial_scale": 1,
            "is_rich_text": false,
            "italic_degree": 0,
            "ktv_color": "",
            "language": "",
            "layer_weight": 1,
            "letter_spacing": 0,
            "line_spacing": 0.02,
            "name": "",
            "preset_category": "",
            "preset_category_id": "",
            "preset_has_set_alignment": false,
            "preset_id": "",
            "preset_index": 0,
            "preset_name": "",
            "recognize_type": 0,
            "relevance_segment": [],
            "shadow_alpha": 0.8,
            "shadow_angle": -45,
            "shadow_color": "#000000",
            "shadow_distance": 8,
            "shadow_point": { "x": 1.0182337649086284, "y": -1.0182337649086284 },
            "shadow_smoothing": 1,
            "shape_clip_x": false,
            "shape_clip_y": false,
            "style_name": "黄字黑边",
            "sub_type": 0,
            "text_alpha": 1,
            "text_color": "#ffde00",
            "text_preset_resource_id": "",
            "text_size": 30,
            "text_to_audio_ids": [],
            "tts_auto_update": false,
            "type": "text",
            "typesetting": 0,
            "underline": false,
            "underline_offset": 0.22,
            "underline_width": 0.05,
            "use_effect_default_color": true,
            "words": { "end_time": [], "start_time": [], "text": [] }
        })),
    })
}

fn segment_common() -> Value {
    json!({
        "cartoon": false,
        "common_keyframes": [],
        "enable_color_curves": true,
        "enable_color_wheels": true,
        "enable_smart_color_adjust": false,
        "group_id": "",
        "intensifies_audio": false,
        "is_placeholder": false,
        "is_tone_modify": false,
        "keyframe_refs": [],
        "last_nonzero_volume": 1.0,
        "render_index": 0,
        "reverse": false,
        "speed": 1.0,
        "template_id": "",
        "template_scene": "default",
        "track_attribute": 0,
        "track_render_index": 0,
        "visible": true,
        "volume": 1.0
    })
}

fn segment(
    id: &str,
    material_id: &str,
    target: TimeRange,
    source: Option<TimeRange>,
    refs: Vec<String>,
    fields: Value,
) -> Segment {
    let mut all = extra(segment_common());
    all.extend(extra(fields));
    Segment {
        id: id.to_string(),
        material_id: material_id.to_string(),
        target_timerange: target,
        source_timerange: source,
        extra_material_refs: refs,
        extra: all,
    }
}

pub fn audio_segment(id: &str, material_id: &str, target: TimeRange, refs: Vec<String>) -> Segment {
    segment(
        id,
        material_id,
        target,
        Some(TimeRange::new(0, target.duration)),
        refs,
        json!({
            "clip": null,
            "enable_adjust": true,
            "enable_lut": true,
            "hdr_settings": null,
            "uniform_scale": null
        }),
    )
}

pub fn video_segment(id: &str, material_id: &str, target: TimeRange, refs: Vec<String>) -> Segment {
    segment(
        id,
        material_id,
        target,
        Some(TimeRange::new(0, target.duration)),
        refs,
        json!({
            "clip": {
                "alpha": 1.0,
                "flip": { "horizontal": false, "vertical": false },
                "rotation": 0.0,
                "scale": { "x": 1, "y": 1 },
                "transform": { "x": 0.0, "y": 0.0 }
            },
            "enable_adjust": true,
            "enable_lut": true,
            "hdr_settings": { "intensity": 1.0, "mode": 1, "nits": 1000 },
            "uniform_scale": { "on": true, "value": 1.0 }
        }),
    )
}

pub fn text_segment(id: &str, material_id: &str, target: TimeRange, refs: Vec<String>) -> Segment {
    segment(
        id,
        material_id,
        target,
        None,
        refs,
        json!({
            "clip": {
                "alpha": 1,
                "flip": { "horizontal": false, "vertical": false },
                "rotation": 0,
                "scale": { "x": 1, "y": 1 },
                "transform": { "x": 0, "y": -0.7 }
            },
            "enable_adjust": false,
            "enable_lut": false,
            "hdr_settings": null,
            "uniform_scale": { "on": true, "value": 1 }
        }),
    )
}

pub fn track(id: &str, kind: TrackKind) -> Track {
    Track {
        id: id.to_string(),
        kind,
        segments: Vec::new(),
        extra: extra(json!({ "attribute": 0, "flag": 0 })),
    }
}

#[allow(clippy::too_many_arguments)]
fn meta_asset(
    id: &str,
    kind: &str,
    duration: u64,
    file_name: &str,
    rel_path: &str,
    create_time: i64,
    (width, height): (u32, u32),
    roughcut: Value,
) -> MetaAsset {
    MetaAsset {
        id: id.to_string(),
        duration,
        file_path: rel_path.to_string(),
        extra_info: file_name.to_string(),
        width,
        height,
        create_time,
        metetype: kind.to_string(),
        extra: extra(json!({
            "import_time": now_secs(),
            "import_time_ms": now_micros(),
            "item_source": 1,
            "md5": "",
            "roughcut_time_range": roughcut,
            "sub_time_range": { "duration": -1, "start": -1 },
            "type": 0
        })),
    }
}

pub fn music_meta(
    id: &str,
    duration: u64,
    file_name: &str,
    rel_path: &str,
    create_time: i64,
) -> MetaAsset {
    meta_asset(
        id,
        META_MUSIC,
        duration,
        file_name,
        rel_path,
        create_time,
        (0, 0),
        json!({ "duration": duration, "start": 0 }),
    )
}

pub fn photo_meta(
    id: &str,
    duration: u64,
    file_name: &str,
    rel_path: &str,
    create_time: i64,
    dims: (u32, u32),
) -> MetaAsset {
    meta_asset(
        id,
        META_PHOTO,
        duration,
        file_name,
        rel_path,
        create_time,
        dims,
        json!({ "duration": -1, "start": -1 }),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/draft/entities.rs"]
mod tests;
