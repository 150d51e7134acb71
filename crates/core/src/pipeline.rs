use crate::config::CullerConfig;
use crate::models::{Classification, FileOutcome, ScanReport, UnknownReason};
use crate::normalizer;
use crate::scanner::{Disposition, Scanner};
use anyhow::Context;
use providers::noop::NoopProvider;
use providers::tmdb::{TmdbConfig, TmdbProvider};
use providers::{LookupError, Rating, RatingProvider};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Maps a lookup result onto keep, delete or unknown.
///
/// A 0.0 rating is never trusted, so it lands in unknown along with misses
/// and failures.
pub fn classify(result: &Result<Rating, LookupError>, threshold: f64) -> Classification {
    match result {
        Ok(rating) if rating.is_unrated() => Classification::Unknown {
            reason: UnknownReason::Unrated,
        },
        Ok(rating) if rating.value() < threshold => Classification::Delete { rating: *rating },
        Ok(rating) => Classification::Keep { rating: *rating },
        Err(LookupError::NotFound) => Classification::Unknown {
            reason: UnknownReason::NotFound,
        },
        Err(e) => Classification::Unknown {
            reason: UnknownReason::LookupFailed {
                error: e.to_string(),
            },
        },
    }
}

/// Normalizes, looks up and classifies a single video file.
pub async fn process_file(
    path: &Path,
    cfg: &CullerConfig,
    provider: &dyn RatingProvider,
) -> FileOutcome {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let Some(normalized) = normalizer::normalize(&filename, &cfg.noise) else {
        warn!(file = %filename, "no title left after cleaning filename");
        return FileOutcome {
            path: path.to_path_buf(),
            normalized: None,
            classification: Classification::Unknown {
                reason: UnknownReason::Unparsable,
            },
        };
    };

    debug!(
        file = %filename,
        query = %normalized.query,
        year = normalized.year.as_deref().unwrap_or(""),
        "looking up rating"
    );
    let result = provider
        .lookup(&normalized.query, normalized.year.as_deref())
        .await;
    let classification = classify(&result, cfg.threshold);

    match &classification {
        Classification::Keep { rating } | Classification::Delete { rating } => {
            info!(title = %normalized.title, %rating, "rating found");
        }
        Classification::Unknown {
            reason: UnknownReason::Unrated,
        } => {
            info!(title = %normalized.title, "service reports 0.0; treating as unrated");
        }
        Classification::Unknown {
            reason: UnknownReason::LookupFailed { error },
        } => {
            warn!(file = %filename, query = %normalized.query, %error, "rating lookup failed");
        }
        Classification::Unknown { .. } => {
            info!(file = %filename, query = %normalized.query, "no match found");
        }
    }

    FileOutcome {
        path: path.to_path_buf(),
        normalized: Some(normalized),
        classification,
    }
}

/// Walks `root` and classifies every qualifying video, one file at a time.
///
/// `on_file` sees each outcome as soon as it is decided. The returned report
/// holds the tallies and, in discovery order, every delete-candidate.
pub async fn run_scan<F>(
    root: &Path,
    cfg: &CullerConfig,
    provider: &dyn RatingProvider,
    mut on_file: F,
) -> anyhow::Result<ScanReport>
where
    F: FnMut(&FileOutcome),
{
    let scanner = Scanner::from_config(cfg).context("build scanner")?;
    let entries = scanner
        .walk(root)
        .with_context(|| format!("scan {}", root.display()))?;

    info!(root = %root.display(), threshold = cfg.threshold, "starting scan");
    let mut report = ScanReport::new(root.to_path_buf(), cfg.threshold);
    for (path, disposition) in entries {
        report.files_seen += 1;
        match disposition {
            Disposition::WrongExtension => {
                report.skipped_extension += 1;
                continue;
            }
            Disposition::Extra => {
                debug!(path = %path.display(), "skipping sample/trailer");
                report.skipped_extras += 1;
                continue;
            }
            Disposition::Video => {}
        }

        let outcome = process_file(&path, cfg, provider).await;
        report.record(&outcome);
        on_file(&outcome);
    }
    info!(
        videos = report.videos,
        candidates = report.candidates.len(),
        "scan complete"
    );
    Ok(report)
}

/// Picks TMDb when an API key is configured, otherwise a provider that never
/// finds anything.
pub fn build_provider(cfg: &CullerConfig) -> Arc<dyn RatingProvider> {
    match &cfg.tmdb_api_key {
        Some(key) => Arc::new(TmdbProvider::new(TmdbConfig {
            api_key: key.clone(),
            base_url: cfg.tmdb_base_url.clone(),
        })),
        None => {
            warn!("no TMDb API key configured; every file will be reported as unknown");
            Arc::new(NoopProvider)
        }
    }
}
