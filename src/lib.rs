//! capdraft assembles caption units into drafts for a non-linear video editor.
//!
//! A caption unit is a still image, its narration audio and subtitle text. A
//! job turns an ordered list of units into the editor's two project documents
//! (`draft_content.json`, `draft_meta_info.json`) plus the media files, zips the
//! result and hands the archive to an upload sink.
//!
//! # Pipeline overview
//!
//! 1. **Bootstrap**: clone the template documents, size the canvas from the first
//!    image, assign fresh identities ([`Project::initialize`]).
//! 2. **Fetch**: download every image and audio on a bounded pool with retry
//!    ([`MaterialFetcher`]). Failures are recorded per unit, never escalated.
//! 3. **Build**: one sequential pass over the units lays out video, audio and
//!    text tracks on a single clock ([`TimelineBuilder`]).
//! 4. **Package**: write the documents, optionally inject keyframes, archive the
//!    working directory and upload it ([`Packager`]).
//!
//! [`DraftEngine`] runs the whole thing and reports a [`JobOutcome`]; it never
//! returns an error to the caller and always removes its working directory.
#![forbid(unsafe_code)]
#![recursion_limit = "256"]

mod assets;
mod config;
mod draft;
mod foundation;
mod package;
mod pipeline;
mod request;
mod timeline;

pub use assets::fetch::{AssetKind, FetchOutcome, MaterialFetcher, RetryPolicy, fetch_with_retry};
pub use assets::probe::{DURATION_PAD_US, FfprobeProbe, MediaProbe, duration_to_micros};
pub use assets::source::{AssetSource, HttpSource, PrefixResolver, UrlResolver};
pub use config::{BuildConfig, FetchConfig, UrlRewrite};
pub use draft::model::{
    AudioMaterial, AuxMaterial, CanvasConfig, ContentDocument, DraftMaterialGroup, Extra,
    Materials, MetaAsset, MetaDocument, Platform, Segment, TextMaterial, Track, TrackKind,
    VideoMaterial,
};
pub use draft::project::{MATERIAL_DIR, Project, WorkDir};
pub use draft::template::{CONTENT_FILE, DraftTemplate, META_FILE};
pub use foundation::core::{Canvas, MICROS_PER_SEC, TimeRange};
pub use foundation::error::{DraftError, DraftResult};
pub use foundation::paths::UserPath;
pub use package::archive::archive_dir;
pub use package::packager::{KeyframeInjector, Packager, write_documents};
pub use package::sink::{DirectorySink, HttpPutSink, UploadSink, ZIP_CONTENT_TYPE};
pub use pipeline::{DraftEngine, JobOutcome};
pub use request::{DraftRequest, Unit};
pub use timeline::builder::{BuildLayout, Timeline, TimelineBuilder};
pub use timeline::split::{SENTENCE_DELIMITERS, distribute, split_sentences};
