use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use super::*;
use crate::{foundation::error::DraftError, request::Unit};

struct LocalSource;

impl AssetSource for LocalSource {
    fn fetch(&self, url: &str, dest: &Path) -> DraftResult<()> {
        std::fs::write(dest, url.as_bytes()).unwrap();
        Ok(())
    }
}

struct OneSecondProbe;

impl MediaProbe for OneSecondProbe {
    fn audio_duration_secs(&self, _path: &Path) -> DraftResult<f64> {
        Ok(1.0)
    }

    fn image_dimensions(&self, _path: &Path) -> DraftResult<(u32, u32)> {
        Ok((640, 480))
    }
}

struct NullSink(bool);

impl UploadSink for NullSink {
    fn upload(&self, path: &Path, _content_type: &str) -> DraftResult<String> {
        if self.0 {
            Ok(path.display().to_string())
        } else {
            Err(DraftError::packaging("rejected"))
        }
    }
}

#[derive(Default)]
struct RecordingInjector {
    calls: Mutex<Vec<(PathBuf, f64)>>,
}

impl KeyframeInjector for std::sync::Arc<RecordingInjector> {
    fn inject(&self, content_path: &Path, strength: f64) -> DraftResult<()> {
        assert!(content_path.exists());
        self.calls
            .lock()
            .unwrap()
            .push((content_path.to_path_buf(), strength));
        Ok(())
    }
}

fn engine(temp_root: &Path, sink_ok: bool) -> DraftEngine {
    let config = BuildConfig {
        temp_root: temp_root.to_path_buf(),
        ..BuildConfig::default()
    };
    DraftEngine::new(
        config,
        DraftTemplate::builtin().unwrap(),
        Box::new(NullSink(sink_ok)),
    )
    .unwrap()
    .with_source(Box::new(LocalSource))
    .with_probe(Box::new(OneSecondProbe))
}

fn request(keyframes: bool) -> DraftRequest {
    DraftRequest {
        job_id: "7".to_string(),
        draft_name: "demo".to_string(),
        dest_root: "/drafts".to_string(),
        units: vec![Unit::new("i", "a", "one,two")],
        enable_keyframes: keyframes,
    }
}

#[test]
fn job_outcome_accessors() {
    assert_eq!(JobOutcome::Uploaded("x".into()).locator(), Some("x"));
    assert!(JobOutcome::Failed.locator().is_none());
    assert!(!JobOutcome::Failed.is_uploaded());
}

#[test]
fn keyframes_run_only_when_requested() {
    let tmp = tempfile::tempdir().unwrap();
    let injector = std::sync::Arc::new(RecordingInjector::default());
    let engine = engine(tmp.path(), true).with_keyframe_injector(Box::new(injector.clone()));

    assert!(engine.run(&request(false)).is_uploaded());
    assert!(injector.calls.lock().unwrap().is_empty());

    assert!(engine.run(&request(true)).is_uploaded());
    let calls = injector.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].0.ends_with("draft_content.json"));
    assert!((calls[0].1 - 1.3).abs() < 1e-12);
}

#[test]
fn missing_injector_is_not_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    assert!(engine(tmp.path(), true).run(&request(true)).is_uploaded());
}

#[test]
fn failures_become_failed_outcomes_and_leave_nothing_behind() {
    let tmp = tempfile::tempdir().unwrap();
    let engine = engine(tmp.path(), false);
    assert_eq!(engine.run(&request(false)), JobOutcome::Failed);

    let mut empty = request(false);
    empty.units.clear();
    assert_eq!(engine.run(&empty), JobOutcome::Failed);

    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
}

#[test]
fn batch_outcomes_are_independent() {
    let tmp = tempfile::tempdir().unwrap();
    let engine = engine(tmp.path(), true);
    let mut bad = request(false);
    bad.units.clear();
    let outcomes = engine.run_batch(&[request(false), bad, request(false)]);
    assert!(outcomes[0].is_uploaded());
    assert_eq!(outcomes[1], JobOutcome::Failed);
    assert!(outcomes[2].is_uploaded());
}
