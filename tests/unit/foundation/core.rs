use super::*;

#[test]
fn time_range_end_and_empty() {
    let r = TimeRange::new(2_000_000, 1_500_000);
    assert_eq!(r.end(), 3_500_000);
    assert!(!r.is_empty());
    assert!(TimeRange::new(7, 0).is_empty());
}

#[test]
fn time_range_serializes_with_editor_field_names() {
    let v = serde_json::to_value(TimeRange::new(10, 20)).unwrap();
    assert_eq!(v, serde_json::json!({ "duration": 20, "start": 10 }));
}

#[test]
fn entity_ids_are_uppercase_and_unique() {
    let a = new_entity_id();
    let b = new_entity_id();
    assert_ne!(a, b);
    assert_eq!(a, a.to_uppercase());
    assert_eq!(a.len(), 36);

    let asset = new_asset_id();
    assert_eq!(asset, asset.to_lowercase());
}

#[test]
fn missing_file_creation_time_falls_back_to_now() {
    let before = now_secs();
    let t = file_created_secs(std::path::Path::new("/definitely/not/here.mp3"));
    assert!(t >= before);
}
