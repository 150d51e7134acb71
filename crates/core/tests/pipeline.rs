use culler_core::config::{AppConfig, CullerConfig};
use culler_core::models::{Classification, DeletionCandidate, UnknownReason};
use culler_core::pipeline;
use providers::{LookupError, Rating, RatingProvider};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use tempfile::tempdir;

/// Answers from a fixed table keyed by query title and records every call.
#[derive(Default)]
struct FakeProvider {
    ratings: HashMap<String, f64>,
    failing: Vec<String>,
    calls: Mutex<Vec<(String, Option<String>)>>,
}

impl FakeProvider {
    fn with(mut self, query: &str, rating: f64) -> Self {
        self.ratings.insert(query.to_string(), rating);
        self
    }

    fn failing(mut self, query: &str) -> Self {
        self.failing.push(query.to_string());
        self
    }

    fn queries(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(q, _)| q.clone())
            .collect()
    }
}

#[async_trait::async_trait]
impl RatingProvider for FakeProvider {
    async fn lookup(&self, title: &str, year: Option<&str>) -> Result<Rating, LookupError> {
        self.calls
            .lock()
            .unwrap()
            .push((title.to_string(), year.map(str::to_string)));
        if self.failing.iter().any(|f| f == title) {
            return Err(LookupError::RequestFailed("connection reset".into()));
        }
        self.ratings
            .get(title)
            .map(|r| Rating(*r))
            .ok_or(LookupError::NotFound)
    }
}

fn config(threshold: f64) -> CullerConfig {
    CullerConfig::try_from(AppConfig {
        threshold,
        ..AppConfig::default()
    })
    .unwrap()
}

fn touch(root: &Path, rel: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"not really a video").unwrap();
}

#[tokio::test]
async fn classifies_a_library() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    touch(root, "Movie.Title.2012.1080p.BluRay.x264-GROUP.mkv");
    touch(root, "Great/Great.Film.(1999).720p.mp4");
    touch(root, "Great/Great.Film.Sample.mp4");
    touch(root, "Unrated.Indie.2021.WEBRip.avi");
    touch(root, "Nobody.Knows.This.mov");
    touch(root, "Flaky.Server.2005.mkv");
    touch(root, "Movie.Title.2012.1080p.BluRay.x264-GROUP.srt");
    touch(root, "extras/Movie.Title.Trailer.mkv");

    let provider = FakeProvider::default()
        .with("Movie Title", 4.2)
        .with("Great Film", 8.3)
        .with("Unrated Indie", 0.0)
        .failing("Flaky Server");

    let mut outcomes = Vec::new();
    let report = pipeline::run_scan(root, &config(6.0), &provider, |o| {
        outcomes.push(o.clone())
    })
    .await
    .unwrap();

    assert_eq!(report.files_seen, 8);
    assert_eq!(report.skipped_extension, 1);
    assert_eq!(report.skipped_extras, 2);
    assert_eq!(report.videos, 5);
    assert_eq!(report.kept, 1);
    assert_eq!(report.unknown, 3);
    assert_eq!(report.unrated, 1);
    assert_eq!(outcomes.len(), 5);

    assert_eq!(
        report.candidates,
        vec![DeletionCandidate {
            path: root.join("Movie.Title.2012.1080p.BluRay.x264-GROUP.mkv"),
            title: "Movie Title 2012".to_string(),
            rating: Rating(4.2),
        }]
    );

    let queries = provider.queries();
    assert!(!queries.iter().any(|q| q.to_lowercase().contains("sample")));
    assert!(!queries.iter().any(|q| q.to_lowercase().contains("trailer")));
    assert_eq!(queries.len(), 5);

    let calls = provider.calls.lock().unwrap().clone();
    assert!(calls.contains(&("Movie Title".to_string(), Some("2012".to_string()))));
    assert!(calls.contains(&("Nobody Knows This".to_string(), None)));

    let flaky = outcomes
        .iter()
        .find(|o| o.path.ends_with("Flaky.Server.2005.mkv"))
        .unwrap();
    assert!(matches!(
        flaky.classification,
        Classification::Unknown {
            reason: UnknownReason::LookupFailed { .. }
        }
    ));
}

#[tokio::test]
async fn zero_rating_is_neither_kept_nor_deleted() {
    let temp = tempdir().unwrap();
    touch(temp.path(), "Brand.New.2024.mkv");
    let provider = FakeProvider::default().with("Brand New", 0.0);

    let report = pipeline::run_scan(temp.path(), &config(10.0), &provider, |_| {})
        .await
        .unwrap();

    assert!(report.candidates.is_empty());
    assert_eq!(report.kept, 0);
    assert_eq!(report.unrated, 1);
}

#[tokio::test]
async fn no_candidates_when_everything_rates_well() {
    let temp = tempdir().unwrap();
    touch(temp.path(), "Heat.1995.mkv");
    touch(temp.path(), "Alien.1979.mp4");
    let provider = FakeProvider::default()
        .with("Heat", 8.3)
        .with("Alien", 8.2);

    let report = pipeline::run_scan(temp.path(), &config(5.0), &provider, |_| {})
        .await
        .unwrap();

    assert!(report.candidates.is_empty());
    assert_eq!(report.kept, 2);
}

#[tokio::test]
async fn scan_leaves_files_alone() {
    let temp = tempdir().unwrap();
    touch(temp.path(), "Bad.Movie.2003.mkv");
    let provider = FakeProvider::default().with("Bad Movie", 1.5);

    let report = pipeline::run_scan(temp.path(), &config(5.0), &provider, |_| {})
        .await
        .unwrap();

    assert_eq!(report.candidates.len(), 1);
    assert!(temp.path().join("Bad.Movie.2003.mkv").exists());
}

#[tokio::test]
async fn missing_root_fails_before_any_lookup() {
    let temp = tempdir().unwrap();
    let provider = FakeProvider::default();

    let err = pipeline::run_scan(&temp.path().join("missing"), &config(5.0), &provider, |_| {})
        .await
        .unwrap_err();

    assert!(err.to_string().contains("scan"));
    assert!(provider.queries().is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn symlinked_dir_outside_root_is_not_scanned() {
    use std::os::unix::fs::symlink;

    let temp = tempdir().unwrap();
    let root = temp.path().join("library");
    touch(&root, "Own.Film.2010.mkv");
    touch(&temp.path().join("elsewhere"), "Keep.Me.2001.mkv");
    symlink(temp.path().join("elsewhere"), root.join("linked")).unwrap();
    let provider = FakeProvider::default()
        .with("Own Film", 7.0)
        .with("Keep Me", 1.0);

    let report = pipeline::run_scan(&root, &config(5.0), &provider, |_| {})
        .await
        .unwrap();

    assert!(report.candidates.is_empty());
    assert_eq!(report.videos, 1);
    assert_eq!(provider.queries(), vec!["Own Film".to_string()]);
    assert!(temp.path().join("elsewhere/Keep.Me.2001.mkv").exists());
}
