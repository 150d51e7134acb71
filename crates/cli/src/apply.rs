use crate::fs_apply;
use culler_core::models::DeletionCandidate;
use providers::Rating;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{error, info};

pub const NONE_FOUND: &str = "No movies found below the rating threshold.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionStatus {
    WouldDelete,
    Deleted,
    Failed,
}

#[derive(Debug, Serialize)]
pub struct DeletionOutcome {
    pub path: PathBuf,
    pub title: String,
    pub rating: Rating,
    pub status: DeletionStatus,
    pub error: Option<String>,
}

/// Deletes every candidate, or only describes the deletion when `dry_run`.
///
/// Each file is handled on its own; a failure is recorded and the loop moves
/// on to the next candidate.
pub fn apply_deletions(candidates: &[DeletionCandidate], dry_run: bool) -> Vec<DeletionOutcome> {
    let mut outcomes = Vec::with_capacity(candidates.len());
    let mut deleted = 0usize;
    let mut failed = 0usize;

    for candidate in candidates {
        let (status, error) = if dry_run {
            (DeletionStatus::WouldDelete, None)
        } else {
            match fs_apply::remove_file(&candidate.path) {
                Ok(()) => {
                    info!(path = %candidate.path.display(), "deleted");
                    deleted += 1;
                    (DeletionStatus::Deleted, None)
                }
                Err(e) => {
                    error!(path = %candidate.path.display(), error = %format!("{e:#}"), "delete failed");
                    failed += 1;
                    (DeletionStatus::Failed, Some(format!("{e:#}")))
                }
            }
        };
        outcomes.push(DeletionOutcome {
            path: candidate.path.clone(),
            title: candidate.title.clone(),
            rating: candidate.rating,
            status,
            error,
        });
    }

    if dry_run {
        info!(candidates = outcomes.len(), "dry run; nothing deleted");
    } else {
        info!(deleted, failed, "deletion pass finished");
    }
    outcomes
}

/// Applies (or previews) the deletions and writes one line per candidate to
/// `out`. With no candidates only [`NONE_FOUND`] is written.
pub fn report_and_apply<W: Write>(
    candidates: &[DeletionCandidate],
    dry_run: bool,
    out: &mut W,
) -> io::Result<Vec<DeletionOutcome>> {
    if candidates.is_empty() {
        writeln!(out, "{NONE_FOUND}")?;
        return Ok(Vec::new());
    }
    let outcomes = apply_deletions(candidates, dry_run);
    for outcome in &outcomes {
        writeln!(out, "{}", outcome_line(outcome))?;
    }
    Ok(outcomes)
}

pub fn outcome_line(outcome: &DeletionOutcome) -> String {
    match outcome.status {
        DeletionStatus::WouldDelete => format!(
            "[Dry Run] Would delete: {} ({}) - {}",
            outcome.title,
            outcome.rating,
            outcome.path.display()
        ),
        DeletionStatus::Deleted => format!("Deleted: {}", outcome.path.display()),
        DeletionStatus::Failed => format!(
            "Failed to delete {}: {}",
            outcome.path.display(),
            outcome.error.as_deref().unwrap_or("unknown error")
        ),
    }
}
