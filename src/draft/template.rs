use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    draft::model::{ContentDocument, MetaDocument},
    foundation::error::{DraftError, DraftResult},
};

/// File name of the content document inside a draft folder.
pub const CONTENT_FILE: &str = "draft_content.json";
/// File name of the meta document inside a draft folder.
pub const META_FILE: &str = "draft_meta_info.json";

const BUILTIN_CONTENT: &str = include_str!("../../templates/draft_content.json");
const BUILTIN_META: &str = include_str!("../../templates/draft_meta_info.json");

#[derive(Clone, Debug)]
/// Immutable starting point for every draft: the two documents plus any
/// companion files (cover image, settings) that ship with a directory template.
///
/// Jobs clone the documents; the template itself is never mutated.
pub struct DraftTemplate {
    content: ContentDocument,
    meta: MetaDocument,
    dir: Option<PathBuf>,
}

impl DraftTemplate {
    /// Template compiled into the binary (documents only, no companion files).
    pub fn builtin() -> DraftResult<Self> {
        Ok(Self {
            content: serde_json::from_str(BUILTIN_CONTENT)?,
            meta: serde_json::from_str(BUILTIN_META)?,
            dir: None,
        })
    }

    /// Load a template directory containing both documents.
    pub fn load(dir: &Path) -> DraftResult<Self> {
        let read = |name: &str| -> DraftResult<String> {
            let path = dir.join(name);
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("read template '{}'", path.display()))?;
            Ok(text)
        };
        let content = serde_json::from_str(&read(CONTENT_FILE)?)
            .map_err(|e| DraftError::serde(format!("{CONTENT_FILE}: {e}")))?;
        let meta = serde_json::from_str(&read(META_FILE)?)
            .map_err(|e| DraftError::serde(format!("{META_FILE}: {e}")))?;
        Ok(Self {
            content,
            meta,
            dir: Some(dir.to_path_buf()),
        })
    }

    /// Fresh copy of the content document.
    pub fn content(&self) -> ContentDocument {
        self.content.clone()
    }

    /// Fresh copy of the meta document.
    pub fn meta(&self) -> MetaDocument {
        self.meta.clone()
    }

    /// Source directory, when loaded from disk.
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Copy companion files into `dest`, preserving layout. The two documents
    /// are skipped; they are written from the built project.
    pub fn copy_companions(&self, dest: &Path) -> DraftResult<usize> {
        let Some(src) = self.dir.as_deref() else {
            return Ok(0);
        };
        let mut copied = 0;
        for entry in walkdir::WalkDir::new(src).min_depth(1) {
            let entry = entry.context("walk template directory")?;
            let rel = entry
                .path()
                .strip_prefix(src)
                .context("template entry outside template root")?;
            if rel == Path::new(CONTENT_FILE) || rel == Path::new(META_FILE) {
                continue;
            }
            let target = dest.join(rel);
            if entry.file_type().is_dir() {
                std::fs::create_dir_all(&target)
                    .with_context(|| format!("create '{}'", target.display()))?;
            } else {
                if let Some(parent) = target.parent() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("create '{}'", parent.display()))?;
                }
                std::fs::copy(entry.path(), &target)
                    .with_context(|| format!("copy '{}'", entry.path().display()))?;
                copied += 1;
            }
        }
        Ok(copied)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/draft/template.rs"]
mod tests;
