use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        DraftError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(DraftError::fetch("x").to_string().contains("fetch error:"));
    assert!(DraftError::probe("x").to_string().contains("probe error:"));
    assert!(DraftError::build("x").to_string().contains("build error:"));
    assert!(
        DraftError::packaging("x")
            .to_string()
            .contains("packaging error:")
    );
    assert!(
        DraftError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = DraftError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn serde_json_errors_map_to_serde_variant() {
    let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err = DraftError::from(parse);
    assert!(matches!(err, DraftError::Serde(_)));
}
