use providers::Rating;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Title pieces derived from a single filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedTitle {
    /// Cleaned title, year included, used for reporting.
    pub title: String,
    /// Title with the year removed, sent to the metadata service.
    pub query: String,
    pub year: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnknownReason {
    /// Nothing usable was left of the filename after cleaning.
    Unparsable,
    NotFound,
    LookupFailed { error: String },
    /// The service reported 0.0, its marker for "no votes yet".
    Unrated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Classification {
    Keep { rating: Rating },
    Delete { rating: Rating },
    Unknown { reason: UnknownReason },
}

/// Result of pushing one video file through normalize, lookup and classify.
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub normalized: Option<NormalizedTitle>,
    pub classification: Classification,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletionCandidate {
    pub path: PathBuf,
    pub title: String,
    pub rating: Rating,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    pub root: PathBuf,
    pub threshold: f64,
    pub files_seen: usize,
    pub videos: usize,
    pub skipped_extension: usize,
    pub skipped_extras: usize,
    pub kept: usize,
    pub unknown: usize,
    pub unrated: usize,
    pub candidates: Vec<DeletionCandidate>,
}

impl ScanReport {
    pub fn new(root: PathBuf, threshold: f64) -> Self {
        Self {
            root,
            threshold,
            ..Self::default()
        }
    }

    pub fn record(&mut self, outcome: &FileOutcome) {
        self.videos += 1;
        match &outcome.classification {
            Classification::Keep { .. } => self.kept += 1,
            Classification::Delete { rating } => self.candidates.push(DeletionCandidate {
                path: outcome.path.clone(),
                title: outcome
                    .normalized
                    .as_ref()
                    .map(|n| n.title.clone())
                    .unwrap_or_default(),
                rating: *rating,
            }),
            Classification::Unknown { reason } => {
                self.unknown += 1;
                if *reason == UnknownReason::Unrated {
                    self.unrated += 1;
                }
            }
        }
    }
}
