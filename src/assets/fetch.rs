use std::{
    path::Path,
    time::{Duration, Instant},
};

use rayon::prelude::*;

use crate::{
    assets::source::{AssetSource, UrlResolver},
    config::FetchConfig,
    foundation::error::{DraftError, DraftResult},
    request::Unit,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// The two downloadable files of a unit.
pub enum AssetKind {
    Image,
    Audio,
}

impl AssetKind {
    /// File name of this asset inside the material folder.
    pub fn file_name(self, index: usize) -> String {
        match self {
            Self::Image => format!("{index}.jpg"),
            Self::Audio => format!("{index}.mp3"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Per-unit download result, read only after the fetch barrier.
pub struct FetchOutcome {
    pub image_ok: bool,
    pub audio_ok: bool,
}

impl FetchOutcome {
    /// Both files are present.
    pub fn is_complete(self) -> bool {
        self.image_ok && self.audio_ok
    }

    /// Outcome for a unit whose files are already in place.
    pub fn complete() -> Self {
        Self {
            image_ok: true,
            audio_ok: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Attempts per asset and the pause between them.
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl From<&FetchConfig> for RetryPolicy {
    fn from(cfg: &FetchConfig) -> Self {
        Self {
            attempts: cfg.attempts.max(1),
            delay: Duration::from_millis(cfg.retry_delay_ms),
        }
    }
}

/// Download `url` into `dest`, retrying per `policy`.
///
/// Returns `false` once attempts are exhausted; failures never escalate.
pub fn fetch_with_retry(
    source: &dyn AssetSource,
    url: &str,
    dest: &Path,
    policy: RetryPolicy,
) -> bool {
    let attempts = policy.attempts.max(1);
    for attempt in 1..=attempts {
        match source.fetch(url, dest) {
            Ok(()) => return true,
            Err(e) => {
                let _ = std::fs::remove_file(dest);
                tracing::warn!(url, attempt, attempts, error = %e, "download failed");
                if attempt < attempts {
                    std::thread::sleep(policy.delay);
                }
            }
        }
    }
    tracing::error!(url, attempts, "download abandoned after retries");
    false
}

/// Fan-out/fan-in download of every unit's image and audio on a bounded pool.
pub struct MaterialFetcher<'a> {
    source: &'a dyn AssetSource,
    resolver: &'a dyn UrlResolver,
    workers: usize,
    retry: RetryPolicy,
}

impl<'a> MaterialFetcher<'a> {
    pub fn new(
        source: &'a dyn AssetSource,
        resolver: &'a dyn UrlResolver,
        workers: usize,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            source,
            resolver,
            workers,
            retry,
        }
    }

    /// Fetcher configured from [`FetchConfig`].
    pub fn from_config(
        source: &'a dyn AssetSource,
        resolver: &'a dyn UrlResolver,
        cfg: &FetchConfig,
    ) -> Self {
        Self::new(source, resolver, cfg.workers, RetryPolicy::from(cfg))
    }

    /// Download all units into `material_dir` as `<i>.jpg` / `<i>.mp3`.
    ///
    /// Image and audio are independent tasks. The call returns after every task
    /// has succeeded or exhausted its retries; results are indexed by unit,
    /// whatever the completion order. Only pool construction can fail.
    #[tracing::instrument(skip_all, fields(units = units.len(), workers = self.workers))]
    pub fn fetch_all(&self, units: &[Unit], material_dir: &Path) -> DraftResult<Vec<FetchOutcome>> {
        let started = Instant::now();
        let tasks: Vec<(usize, AssetKind, &str)> = units
            .iter()
            .enumerate()
            .flat_map(|(i, u)| {
                [
                    (i, AssetKind::Image, u.image_url.as_str()),
                    (i, AssetKind::Audio, u.audio_url.as_str()),
                ]
            })
            .collect();

        let pool = build_thread_pool(self.workers)?;
        let finished: Vec<(usize, AssetKind, bool)> = pool.install(|| {
            tasks
                .par_iter()
                .map(|&(index, kind, url)| {
                    let dest = material_dir.join(kind.file_name(index));
                    (index, kind, self.fetch_one(url, &dest))
                })
                .collect()
        });

        let mut outcomes = vec![FetchOutcome::default(); units.len()];
        for (index, kind, ok) in finished {
            match kind {
                AssetKind::Image => outcomes[index].image_ok = ok,
                AssetKind::Audio => outcomes[index].audio_ok = ok,
            }
        }

        let failed: Vec<usize> = outcomes
            .iter()
            .enumerate()
            .filter(|(_, o)| !o.is_complete())
            .map(|(i, _)| i)
            .collect();
        if !failed.is_empty() {
            tracing::warn!(?failed, "units with missing assets");
        }
        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "material download finished"
        );
        Ok(outcomes)
    }

    /// Resolve and download a single asset with retry.
    pub fn fetch_one(&self, url: &str, dest: &Path) -> bool {
        let resolved = self.resolver.resolve(url);
        fetch_with_retry(self.source, &resolved, dest, self.retry)
    }
}

fn build_thread_pool(workers: usize) -> DraftResult<rayon::ThreadPool> {
    if workers == 0 {
        return Err(DraftError::validation("fetch workers must be >= 1"));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("capdraft-fetch-{i}"))
        .build()
        .map_err(|e| DraftError::fetch(format!("failed to build fetch thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fetch.rs"]
mod tests;
