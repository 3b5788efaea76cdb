use std::io::Read as _;

use super::*;

fn names(archive: &Path) -> Vec<String> {
    let mut zip = zip::ZipArchive::new(File::open(archive).unwrap()).unwrap();
    (0..zip.len())
        .map(|i| zip.by_index(i).unwrap().name().to_string())
        .collect()
}

#[test]
fn archives_tree_with_directories_and_skips_itself() {
    let root = tempfile::tempdir().unwrap();
    let draft = root.path().join("草稿");
    std::fs::create_dir_all(draft.join("material")).unwrap();
    std::fs::write(root.path().join("notice.txt"), "hi").unwrap();
    std::fs::write(draft.join("draft_content.json"), "{}").unwrap();
    std::fs::write(draft.join("material/0.jpg"), [1u8, 2, 3]).unwrap();

    let archive = root.path().join("草稿.zip");
    let count = archive_dir(root.path(), &archive).unwrap();
    assert_eq!(count, 5);

    let mut got = names(&archive);
    got.sort();
    assert_eq!(
        got,
        vec![
            "notice.txt",
            "草稿/",
            "草稿/draft_content.json",
            "草稿/material/",
            "草稿/material/0.jpg",
        ]
    );

    let mut zip = zip::ZipArchive::new(File::open(&archive).unwrap()).unwrap();
    let mut bytes = Vec::new();
    zip.by_name("草稿/material/0.jpg")
        .unwrap()
        .read_to_end(&mut bytes)
        .unwrap();
    assert_eq!(bytes, vec![1, 2, 3]);
}

#[test]
fn empty_root_gives_empty_archive() {
    let root = tempfile::tempdir().unwrap();
    let archive = root.path().join("a.zip");
    assert_eq!(archive_dir(root.path(), &archive).unwrap(), 0);
    assert!(names(&archive).is_empty());
}
