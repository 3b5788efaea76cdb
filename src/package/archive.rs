use std::{
    fs::File,
    io::{BufWriter, Write as _},
    path::{Component, Path},
};

use anyhow::Context as _;
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

use crate::foundation::error::{DraftError, DraftResult};

/// Zip every directory and file under `root` into `archive_path`.
///
/// Entry names are relative to `root` and `/`-separated. `archive_path` may
/// live inside `root`; it is never added to itself. Returns the entry count.
pub fn archive_dir(root: &Path, archive_path: &Path) -> DraftResult<usize> {
    let file = File::create(archive_path)
        .with_context(|| format!("create archive '{}'", archive_path.display()))?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);

    let mut entries = 0;
    for entry in walkdir::WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.context("walk work dir")?;
        let path = entry.path();
        if path == archive_path {
            continue;
        }
        let name = entry_name(root, path)?;
        if entry.file_type().is_dir() {
            zip.add_directory(name, options.unix_permissions(0o755))
                .map_err(|e| DraftError::packaging(format!("add directory: {e}")))?;
        } else {
            zip.start_file(name, options)
                .map_err(|e| DraftError::packaging(format!("start entry: {e}")))?;
            let mut src =
                File::open(path).with_context(|| format!("open '{}'", path.display()))?;
            std::io::copy(&mut src, &mut zip)
                .with_context(|| format!("compress '{}'", path.display()))?;
        }
        entries += 1;
    }

    let mut out = zip
        .finish()
        .map_err(|e| DraftError::packaging(format!("finish archive: {e}")))?;
    out.flush().context("flush archive")?;
    Ok(entries)
}

fn entry_name(root: &Path, path: &Path) -> DraftResult<String> {
    let rel = path
        .strip_prefix(root)
        .map_err(|_| DraftError::packaging(format!("'{}' is outside the work dir", path.display())))?;
    let parts: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    Ok(parts.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/package/archive.rs"]
mod tests;
