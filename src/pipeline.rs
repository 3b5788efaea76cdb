use std::time::{Duration, Instant};

use crate::{
    assets::{
        fetch::MaterialFetcher,
        probe::{FfprobeProbe, MediaProbe},
        source::{AssetSource, HttpSource, PrefixResolver, UrlResolver},
    },
    config::BuildConfig,
    draft::{project::Project, template::DraftTemplate},
    foundation::error::DraftResult,
    package::{
        packager::{KeyframeInjector, Packager, write_documents},
        sink::UploadSink,
    },
    request::DraftRequest,
    timeline::builder::TimelineBuilder,
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// Result of one job. Failures are logged, never returned as errors.
pub enum JobOutcome {
    /// Locator returned by the upload sink.
    Uploaded(String),
    Failed,
}

impl JobOutcome {
    pub fn locator(&self) -> Option<&str> {
        match self {
            Self::Uploaded(locator) => Some(locator),
            Self::Failed => None,
        }
    }

    pub fn is_uploaded(&self) -> bool {
        matches!(self, Self::Uploaded(_))
    }
}

/// Runs draft jobs end to end: bootstrap, fetch, build, write, package.
///
/// Collaborators default to HTTP fetching, prefix URL rewriting from the
/// config and `ffprobe`; each can be replaced with the `with_*` methods.
pub struct DraftEngine {
    config: BuildConfig,
    template: DraftTemplate,
    sink: Box<dyn UploadSink>,
    source: Box<dyn AssetSource>,
    resolver: Box<dyn UrlResolver>,
    probe: Box<dyn MediaProbe>,
    keyframes: Option<Box<dyn KeyframeInjector>>,
}

impl DraftEngine {
    pub fn new(
        config: BuildConfig,
        template: DraftTemplate,
        sink: Box<dyn UploadSink>,
    ) -> DraftResult<Self> {
        config.validate()?;
        let source = HttpSource::new(Duration::from_secs(config.fetch.timeout_secs))?
            .allow_local_files(config.allow_local_files);
        let resolver = PrefixResolver::new(config.url_rewrites.clone());
        Ok(Self {
            config,
            template,
            sink,
            source: Box::new(source),
            resolver: Box::new(resolver),
            probe: Box::new(FfprobeProbe),
            keyframes: None,
        })
    }

    pub fn with_source(mut self, source: Box<dyn AssetSource>) -> Self {
        self.source = source;
        self
    }

    pub fn with_resolver(mut self, resolver: Box<dyn UrlResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_probe(mut self, probe: Box<dyn MediaProbe>) -> Self {
        self.probe = probe;
        self
    }

    pub fn with_keyframe_injector(mut self, injector: Box<dyn KeyframeInjector>) -> Self {
        self.keyframes = Some(injector);
        self
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Run one job. Any error is logged and reported as [`JobOutcome::Failed`];
    /// the job's working directory is removed either way.
    #[tracing::instrument(skip_all, fields(job_id = %request.job_id, units = request.units.len()))]
    pub fn run(&self, request: &DraftRequest) -> JobOutcome {
        let started = Instant::now();
        match self.try_run(request) {
            Ok(locator) => {
                tracing::info!(
                    %locator,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "draft job finished"
                );
                JobOutcome::Uploaded(locator)
            }
            Err(e) => {
                tracing::error!(error = %e, "draft job failed");
                JobOutcome::Failed
            }
        }
    }

    /// Run jobs one after another; each outcome is independent of the others.
    pub fn run_batch(&self, requests: &[DraftRequest]) -> Vec<JobOutcome> {
        let outcomes: Vec<JobOutcome> = requests.iter().map(|r| self.run(r)).collect();
        let failed = outcomes.iter().filter(|o| !o.is_uploaded()).count();
        tracing::info!(jobs = outcomes.len(), failed, "batch finished");
        outcomes
    }

    /// Same as [`Self::run`] but returns the error instead of logging it.
    pub fn try_run(&self, request: &DraftRequest) -> DraftResult<String> {
        request.validate()?;
        let mut project = Project::initialize(
            &self.template,
            request,
            &self.config,
            self.source.as_ref(),
            self.resolver.as_ref(),
            self.probe.as_ref(),
        )?;
        tracing::info!(draft = %project.draft_name, "project initialized");

        let fetcher = MaterialFetcher::from_config(
            self.source.as_ref(),
            self.resolver.as_ref(),
            &self.config.fetch,
        );
        let fetched = fetcher.fetch_all(&request.units, &project.material_dir())?;

        let timeline = TimelineBuilder::new(self.probe.as_ref(), project.layout())
            .build(&request.units, &fetched)?;
        project.apply_timeline(timeline);

        let content_path = write_documents(&project)?;
        if request.enable_keyframes {
            match &self.keyframes {
                Some(injector) => {
                    injector.inject(&content_path, self.config.keyframe_strength)?;
                    tracing::info!("keyframes injected");
                }
                None => tracing::warn!("keyframes requested but no injector is configured"),
            }
        }

        Packager::new(self.sink.as_ref()).finalize(project)
    }
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
