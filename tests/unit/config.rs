use super::*;

#[test]
fn defaults_match_reference_constants() {
    let cfg = BuildConfig::default();
    assert_eq!(cfg.fetch.workers, 8);
    assert_eq!(cfg.fetch.attempts, 3);
    assert_eq!(cfg.fetch.retry_delay_ms, 1000);
    assert_eq!(cfg.default_canvas, Canvas { width: 1280, height: 960 });
    assert!((cfg.keyframe_strength - 1.3).abs() < 1e-12);
    cfg.validate().unwrap();
}

#[test]
fn partial_json_keeps_defaults() {
    let cfg: BuildConfig =
        serde_json::from_str(r#"{ "fetch": { "workers": 2 }, "keyframe_strength": 2.0 }"#)
            .unwrap();
    assert_eq!(cfg.fetch.workers, 2);
    assert_eq!(cfg.fetch.attempts, 3);
    assert!((cfg.keyframe_strength - 2.0).abs() < 1e-12);
    assert_eq!(cfg.default_canvas.width, 1280);
}

#[test]
fn validation_rejects_zero_workers_and_attempts() {
    let mut cfg = BuildConfig::default();
    cfg.fetch.workers = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = BuildConfig::default();
    cfg.fetch.attempts = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = BuildConfig::default();
    cfg.default_canvas.height = 0;
    assert!(cfg.validate().is_err());
}

#[test]
fn from_path_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cfg.json");
    std::fs::write(
        &path,
        r#"{ "url_rewrites": [ { "from": "https://cdn.example.com/", "to": "https://origin.example.com/" } ] }"#,
    )
    .unwrap();
    let cfg = BuildConfig::from_path(&path).unwrap();
    assert_eq!(cfg.url_rewrites.len(), 1);
    assert_eq!(cfg.url_rewrites[0].to, "https://origin.example.com/");
}

#[test]
fn validation_rejects_bad_name_prefix_format() {
    let cfg = BuildConfig {
        name_prefix_format: "%Q%".to_string(),
        ..BuildConfig::default()
    };
    assert!(matches!(cfg.validate(), Err(DraftError::Validation(_))));
}

#[test]
fn validation_rejects_empty_name_prefix_format() {
    for format in ["", "  "] {
        let cfg = BuildConfig {
            name_prefix_format: format.to_string(),
            ..BuildConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(DraftError::Validation(_))));
    }
}

#[test]
fn local_files_are_disabled_by_default() {
    assert!(!BuildConfig::default().allow_local_files);
    let cfg: BuildConfig = serde_json::from_str(r#"{ "allow_local_files": true }"#).unwrap();
    assert!(cfg.allow_local_files);
}
