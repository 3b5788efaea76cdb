use std::sync::Mutex;

use super::*;
use crate::{
    assets::source::PrefixResolver,
    draft::model::{Materials, Track, TrackKind},
    request::Unit,
};

/// Writes a marker file for every fetch and remembers the destinations.
#[derive(Default)]
struct RecordingSource {
    fail: bool,
    dests: Mutex<Vec<PathBuf>>,
}

impl AssetSource for RecordingSource {
    fn fetch(&self, url: &str, dest: &Path) -> DraftResult<()> {
        self.dests.lock().unwrap().push(dest.to_path_buf());
        if self.fail {
            return Err(DraftError::fetch(format!("offline: {url}")));
        }
        std::fs::write(dest, b"img").unwrap();
        Ok(())
    }
}

struct FixedProbe(Option<(u32, u32)>);

impl MediaProbe for FixedProbe {
    fn audio_duration_secs(&self, _path: &Path) -> DraftResult<f64> {
        Ok(1.0)
    }

    fn image_dimensions(&self, _path: &Path) -> DraftResult<(u32, u32)> {
        self.0.ok_or_else(|| DraftError::probe("not an image"))
    }
}

fn request(dest_root: &str) -> DraftRequest {
    DraftRequest {
        job_id: "42".to_string(),
        draft_name: "My Draft".to_string(),
        dest_root: dest_root.to_string(),
        units: vec![Unit::new("http://cdn/0.jpg", "http://cdn/0.mp3", "hi")],
        enable_keyframes: false,
    }
}

fn config(temp_root: &Path) -> BuildConfig {
    BuildConfig {
        temp_root: temp_root.to_path_buf(),
        ..BuildConfig::default()
    }
}

fn init(temp_root: &Path, dest_root: &str, source: &RecordingSource, dims: Option<(u32, u32)>) -> Project {
    Project::initialize(
        &DraftTemplate::builtin().unwrap(),
        &request(dest_root),
        &config(temp_root),
        source,
        &PrefixResolver::default(),
        &FixedProbe(dims),
    )
    .unwrap()
}

#[test]
fn initialize_prepares_folders_and_notice() {
    let tmp = tempfile::tempdir().unwrap();
    let source = RecordingSource::default();
    let project = init(tmp.path(), "/Users/me/Drafts", &source, Some((1080, 1920)));

    assert!(project.work_root().starts_with(tmp.path()));
    assert!(project.material_dir().is_dir());
    assert!(project.draft_name.ends_with("_MyDraft"));
    assert_eq!(project.draft_dir().file_name().unwrap().to_str().unwrap(), project.draft_name);

    let notice = std::fs::read_to_string(project.work_root().join("README_COPY_DRAFT.txt")).unwrap();
    assert!(notice.contains("/Users/me/Drafts"));
}

#[test]
fn first_image_sizes_canvas_and_is_removed() {
    let tmp = tempfile::tempdir().unwrap();
    let source = RecordingSource::default();
    let project = init(tmp.path(), "/Users/me/Drafts", &source, Some((1080, 1920)));

    assert_eq!(project.canvas, Canvas { width: 1080, height: 1920 });
    assert_eq!(project.content.canvas_config.width, 1080);
    assert_eq!(project.content.canvas_config.height, 1920);
    let dests = source.dests.lock().unwrap();
    assert_eq!(dests.len(), 1);
    assert!(!dests[0].exists());
}

#[test]
fn unavailable_first_image_falls_back_to_default_canvas() {
    let tmp = tempfile::tempdir().unwrap();
    let offline = RecordingSource {
        fail: true,
        ..RecordingSource::default()
    };
    let project = init(tmp.path(), "/d", &offline, Some((10, 10)));
    assert_eq!(project.canvas, Canvas { width: 1280, height: 960 });

    let online = RecordingSource::default();
    let project = init(tmp.path(), "/d", &online, None);
    assert_eq!(project.canvas, Canvas { width: 1280, height: 960 });
}

#[test]
fn posix_destination_marks_mac_platform() {
    let tmp = tempfile::tempdir().unwrap();
    let source = RecordingSource::default();
    let project = init(tmp.path(), "/Users/me/Drafts", &source, None);
    let platform = project.content.last_modified_platform.as_ref().unwrap();
    assert_eq!(platform.os, "mac");
    assert_eq!(platform.os_version, "12.3.1");
    assert!(platform.extra.contains_key("app_id"));
    assert_eq!(
        project.meta.draft_fold_path,
        format!("/Users/me/Drafts/{}", project.draft_name)
    );
}

#[test]
fn windows_destination_keeps_platform_and_backslashes() {
    let tmp = tempfile::tempdir().unwrap();
    let source = RecordingSource::default();
    let project = init(tmp.path(), "C:\\Users\\me\\Drafts", &source, None);
    assert_eq!(
        project.content.last_modified_platform.as_ref().unwrap().os,
        "windows"
    );
    assert_eq!(
        project.user_material_dir.as_str(),
        format!("C:\\Users\\me\\Drafts\\{}\\material", project.draft_name)
    );
    assert_eq!(project.meta.draft_root_path, "C:\\Users\\me\\Drafts");
}

#[test]
fn identities_and_collections_are_reset() {
    let tmp = tempfile::tempdir().unwrap();
    let source = RecordingSource::default();
    let a = init(tmp.path(), "/d", &source, None);
    let b = init(tmp.path(), "/d", &source, None);

    assert_ne!(a.content.id, b.content.id);
    assert_ne!(a.meta.draft_id, b.meta.draft_id);
    assert_ne!(a.work_root(), b.work_root());
    assert_eq!(a.content.materials.ids().count(), 0);
    assert!(a.content.tracks.is_empty());
    assert!(a.meta.imported().is_empty());
    assert!(a.meta.tm_draft_create > 0);
    assert_eq!(a.meta.tm_draft_create, a.meta.tm_draft_modified);
    assert_eq!(a.meta.draft_removable_storage_device, "");
}

#[test]
fn apply_timeline_fills_both_documents() {
    let tmp = tempfile::tempdir().unwrap();
    let source = RecordingSource::default();
    let mut project = init(tmp.path(), "/d", &source, None);

    let timeline = Timeline {
        tracks: vec![Track {
            id: "T".to_string(),
            kind: TrackKind::Video,
            ..Track::default()
        }],
        materials: Materials::default(),
        meta_assets: vec![crate::draft::entities::music_meta("m", 5, "0.mp3", "./material/0.mp3", 1)],
        total_duration: 5,
    };
    project.apply_timeline(timeline);

    assert_eq!(project.content.duration, 5);
    assert_eq!(project.meta.tm_duration, 5);
    assert_eq!(project.content.tracks.len(), 1);
    assert_eq!(project.meta.imported().len(), 1);
}

#[test]
fn dropping_the_project_removes_the_work_dir() {
    let tmp = tempfile::tempdir().unwrap();
    let source = RecordingSource::default();
    let project = init(tmp.path(), "/d", &source, None);
    let root = project.work_root().to_path_buf();
    assert!(root.exists());
    drop(project);
    assert!(!root.exists());
}

#[test]
fn display_name_handles_blank_and_separators() {
    let blank = display_name("   ", "%Y").unwrap();
    assert!(!blank.contains('_'));
    let named = display_name("a b/c", "%Y").unwrap();
    assert!(named.ends_with("_ab_c"));
    assert!(display_name("x", "%Q%").is_err());
}

#[test]
fn archive_names_differ_for_same_draft_name() {
    let tmp = tempfile::tempdir().unwrap();
    let source = RecordingSource::default();
    let a = init(tmp.path(), "/d", &source, None);
    let b = init(tmp.path(), "/d", &source, None);
    assert_eq!(a.draft_name, b.draft_name);
    assert_ne!(a.archive_name(), b.archive_name());

    let dir_name = a.work_root().file_name().unwrap().to_string_lossy().into_owned();
    assert_eq!(a.archive_name(), format!("{}_{dir_name}.zip", a.draft_name));
}
