use super::*;

#[test]
fn prefix_resolver_rewrites_first_match_only() {
    let r = PrefixResolver::new(vec![
        UrlRewrite {
            from: "https://cdn.example.com/".to_string(),
            to: "https://origin.example.com/media/".to_string(),
        },
        UrlRewrite {
            from: "https://cdn.".to_string(),
            to: "https://never.".to_string(),
        },
    ]);
    assert_eq!(
        r.resolve("https://cdn.example.com/a/0.jpg"),
        "https://origin.example.com/media/a/0.jpg"
    );
    assert_eq!(r.resolve("https://other.net/x"), "https://other.net/x");
}

#[test]
fn default_resolver_is_identity() {
    assert_eq!(PrefixResolver::default().resolve("a/b.mp3"), "a/b.mp3");
}

#[test]
fn local_paths_and_file_urls_are_copied() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src.bin");
    std::fs::write(&src, b"abc").unwrap();
    let source = HttpSource::new(Duration::from_secs(1))
        .unwrap()
        .allow_local_files(true);

    let dest = dir.path().join("a.bin");
    source.fetch(src.to_str().unwrap(), &dest).unwrap();
    assert_eq!(std::fs::read(&dest).unwrap(), b"abc");

    let dest = dir.path().join("b.bin");
    let url = format!("file://{}", src.display());
    source.fetch(&url, &dest).unwrap();
    assert_eq!(std::fs::read(&dest).unwrap(), b"abc");
}

#[test]
fn missing_local_file_is_a_fetch_error() {
    let dir = tempfile::tempdir().unwrap();
    let source = HttpSource::new(Duration::from_secs(1))
        .unwrap()
        .allow_local_files(true);
    let err = source
        .fetch("/no/such/file.jpg", &dir.path().join("x"))
        .unwrap_err();
    assert!(matches!(err, DraftError::Fetch(_)));
}

#[test]
fn local_paths_are_refused_unless_enabled() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("secret.txt");
    std::fs::write(&src, b"s").unwrap();
    let source = HttpSource::new(Duration::from_secs(1)).unwrap();

    for url in [src.display().to_string(), format!("file://{}", src.display())] {
        let dest = dir.path().join("copy.txt");
        let err = source.fetch(&url, &dest).unwrap_err();
        assert!(matches!(err, DraftError::Fetch(_)));
        assert!(!dest.exists());
    }
}
