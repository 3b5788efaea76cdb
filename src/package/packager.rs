use std::{
    fs::File,
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::{
    draft::{
        project::Project,
        template::{CONTENT_FILE, META_FILE},
    },
    foundation::error::DraftResult,
    package::{
        archive::archive_dir,
        sink::{UploadSink, ZIP_CONTENT_TYPE},
    },
};

/// Post-processes a written content document in place (random keyframes).
///
/// Only the call seam lives here; implementations are supplied by the host.
pub trait KeyframeInjector: Send + Sync {
    fn inject(&self, content_path: &Path, strength: f64) -> DraftResult<()>;
}

/// Serialize both documents into the draft folder. Returns the content path.
pub fn write_documents(project: &Project) -> DraftResult<PathBuf> {
    let dir = project.draft_dir();
    let content_path = dir.join(CONTENT_FILE);
    write_json(&content_path, &project.content)?;
    write_json(&dir.join(META_FILE), &project.meta)?;
    Ok(content_path)
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> DraftResult<()> {
    let file = File::create(path).with_context(|| format!("create '{}'", path.display()))?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer(&mut out, value)?;
    out.flush()
        .with_context(|| format!("write '{}'", path.display()))?;
    Ok(())
}

/// Archives a finished project and hands it to an [`UploadSink`].
pub struct Packager<'a> {
    sink: &'a dyn UploadSink,
}

impl<'a> Packager<'a> {
    pub fn new(sink: &'a dyn UploadSink) -> Self {
        Self { sink }
    }

    /// Zip the work dir into `<work_root>/<archive name>`, upload it and
    /// return the sink's locator.
    ///
    /// Takes the project by value: its work dir is removed when this returns,
    /// on success and on failure alike.
    #[tracing::instrument(skip_all, fields(draft = %project.draft_name))]
    pub fn finalize(&self, project: Project) -> DraftResult<String> {
        let archive = project.work_root().join(project.archive_name());
        let entries = archive_dir(project.work_root(), &archive)?;
        tracing::info!(entries, archive = %archive.display(), "draft archived");
        self.sink.upload(&archive, ZIP_CONTENT_TYPE)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/package/packager.rs"]
mod tests;
