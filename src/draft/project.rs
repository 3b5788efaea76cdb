//! Per-job project state and its working directory.
//!
//! A [`Project`] is created by [`Project::initialize`] from an immutable
//! [`DraftTemplate`], filled once by [`Project::apply_timeline`] and consumed by
//! the packager. Its working directory is owned by a [`WorkDir`] guard and
//! removed when the project is dropped, whatever the outcome of the job.

use std::{
    fmt::Write as _,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::{
    assets::{
        probe::MediaProbe,
        source::{AssetSource, UrlResolver},
    },
    config::BuildConfig,
    draft::{
        model::{ContentDocument, MetaDocument, Platform},
        template::DraftTemplate,
    },
    foundation::{
        core::{Canvas, new_entity_id, now_micros},
        error::{DraftError, DraftResult},
        paths::{UserPath, compact_name},
    },
    request::DraftRequest,
    timeline::builder::{BuildLayout, Timeline},
};

/// Name of the material folder inside a draft.
pub const MATERIAL_DIR: &str = "material";

const POSIX_OS: &str = "mac";
const POSIX_OS_VERSION: &str = "12.3.1";

/// Private build directory `<temp_root>/<uuid>`, deleted on drop.
#[derive(Debug)]
pub struct WorkDir {
    id: String,
    root: PathBuf,
}

impl WorkDir {
    /// Create a fresh, uniquely named directory under `temp_root`.
    pub fn create(temp_root: &Path) -> DraftResult<Self> {
        let id = new_entity_id();
        let root = temp_root.join(&id);
        std::fs::create_dir_all(&root)
            .with_context(|| format!("create work dir '{}'", root.display()))?;
        Ok(Self { id, root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Unique per build; also the directory name.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Drop for WorkDir {
    fn drop(&mut self) {
        match std::fs::remove_dir_all(&self.root) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %self.root.display(), error = %e, "failed to remove work dir");
            }
            _ => {}
        }
    }
}

struct TempFileGuard(Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

/// One draft under construction.
#[derive(Debug)]
pub struct Project {
    pub content: ContentDocument,
    pub meta: MetaDocument,
    /// Display name, also the draft folder name.
    pub draft_name: String,
    /// Fixed once from the first image.
    pub canvas: Canvas,
    /// Draft folder on the user's machine.
    pub user_draft_dir: UserPath,
    /// Material folder on the user's machine.
    pub user_material_dir: UserPath,
    work: WorkDir,
}

impl Project {
    /// Prepare the working directory and the two documents for `request`.
    ///
    /// The first unit's image is fetched once to size the canvas; any failure
    /// there falls back to `config.default_canvas`. Errors creating directories
    /// or copying template files are returned (the work dir is already gone).
    pub fn initialize(
        template: &DraftTemplate,
        request: &DraftRequest,
        config: &BuildConfig,
        source: &dyn AssetSource,
        resolver: &dyn UrlResolver,
        probe: &dyn MediaProbe,
    ) -> DraftResult<Self> {
        let draft_name = display_name(&request.draft_name, &config.name_prefix_format)?;
        let work = WorkDir::create(&config.temp_root)?;

        let draft_dir = work.path().join(&draft_name);
        let material_dir = draft_dir.join(MATERIAL_DIR);
        std::fs::create_dir_all(&material_dir)
            .with_context(|| format!("create '{}'", material_dir.display()))?;

        let dest_root = UserPath::new(request.dest_root.clone());
        write_notice(&work.path().join(&config.notice_file_name), &dest_root)?;
        let companions = template.copy_companions(&draft_dir)?;
        if companions > 0 {
            tracing::debug!(companions, "copied template companion files");
        }

        let canvas = request
            .units
            .first()
            .and_then(|unit| {
                probe_first_image(&unit.image_url, &draft_dir, source, resolver, probe)
            })
            .unwrap_or(config.default_canvas);
        tracing::info!(width = canvas.width, height = canvas.height, "draft canvas");

        let user_draft_dir = dest_root.join(&draft_name);
        let user_material_dir = user_draft_dir.join(MATERIAL_DIR);

        let mut content = template.content();
        content.id = new_entity_id();
        content.canvas_config.width = canvas.width;
        content.canvas_config.height = canvas.height;
        content.materials.clear_populated();
        content.tracks.clear();
        content.duration = 0;
        if dest_root.is_posix() {
            let platform = content
                .last_modified_platform
                .get_or_insert_with(Platform::default);
            platform.os = POSIX_OS.to_string();
            platform.os_version = POSIX_OS_VERSION.to_string();
        }

        let now = now_micros();
        let mut meta = template.meta();
        meta.draft_id = new_entity_id();
        meta.draft_name = draft_name.clone();
        meta.draft_fold_path = user_draft_dir.to_string();
        meta.draft_root_path = dest_root.to_string();
        meta.draft_removable_storage_device.clear();
        meta.tm_draft_create = now;
        meta.tm_draft_modified = now;
        meta.tm_duration = 0;
        meta.imported_group_mut().value.clear();

        Ok(Self {
            content,
            meta,
            draft_name,
            canvas,
            user_draft_dir,
            user_material_dir,
            work,
        })
    }

    /// `<temp_root>/<uuid>`; everything in it ends up in the archive.
    pub fn work_root(&self) -> &Path {
        self.work.path()
    }

    /// `<draft_name>_<work dir id>.zip`, unique per build.
    pub fn archive_name(&self) -> String {
        format!("{}_{}.zip", self.draft_name, self.work.id())
    }

    /// Local draft folder.
    pub fn draft_dir(&self) -> PathBuf {
        self.work.path().join(&self.draft_name)
    }

    /// Local material folder, target of the fetch phase.
    pub fn material_dir(&self) -> PathBuf {
        self.draft_dir().join(MATERIAL_DIR)
    }

    /// Inputs the timeline builder needs from this project.
    pub fn layout(&self) -> BuildLayout {
        BuildLayout {
            material_dir: self.material_dir(),
            user_material_dir: self.user_material_dir.clone(),
            canvas: self.canvas,
        }
    }

    /// Install a built timeline into both documents.
    pub fn apply_timeline(&mut self, timeline: Timeline) {
        self.content.tracks = timeline.tracks;
        self.content.materials.replace_populated(timeline.materials);
        self.content.duration = timeline.total_duration;
        self.meta.tm_duration = timeline.total_duration;
        self.meta.imported_group_mut().value = timeline.meta_assets;
    }
}

/// Timestamp prefix, `_`, then the caller's name without whitespace.
fn display_name(requested: &str, prefix_format: &str) -> DraftResult<String> {
    let mut name = String::new();
    write!(name, "{}", chrono::Local::now().format(prefix_format)).map_err(|_| {
        DraftError::validation(format!("invalid name prefix format '{prefix_format}'"))
    })?;
    let compact: String = compact_name(requested)
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    if !compact.is_empty() {
        name.push('_');
        name.push_str(&compact);
    }
    Ok(name)
}

fn write_notice(path: &Path, dest_root: &UserPath) -> DraftResult<()> {
    let text = format!(
        "请将旁边的文件夹（以片段命名的文件夹），复制到剪映草稿文件夹中，请勿修改内部任何结构。\n\
         Copy the folder next to this file into the editor's draft folder without changing anything inside it.\n\
         Draft folder: {dest_root}\n"
    );
    std::fs::write(path, text).with_context(|| format!("write '{}'", path.display()))?;
    Ok(())
}

fn probe_first_image(
    url: &str,
    draft_dir: &Path,
    source: &dyn AssetSource,
    resolver: &dyn UrlResolver,
    probe: &dyn MediaProbe,
) -> Option<Canvas> {
    let tmp = draft_dir.join("first_image.tmp");
    let _guard = TempFileGuard(Some(tmp.clone()));

    let dims = source
        .fetch(&resolver.resolve(url), &tmp)
        .and_then(|()| probe.image_dimensions(&tmp));
    match dims {
        Ok((width, height)) if width > 0 && height > 0 => Some(Canvas { width, height }),
        Ok((width, height)) => {
            tracing::warn!(width, height, "first image has no area, using default canvas");
            None
        }
        Err(e) => {
            tracing::warn!(url, error = %e, "first image unavailable, using default canvas");
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/draft/project.rs"]
mod tests;
