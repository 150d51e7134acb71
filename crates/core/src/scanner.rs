//! Walks the scan root and sorts every file into video, wrong extension or extra.

use crate::config::CullerConfig;
use crate::normalizer;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("scan root does not exist: {0}")]
    RootNotFound(PathBuf),
    #[error("scan root is not a directory: {0}")]
    RootNotDirectory(PathBuf),
    #[error("invalid exclude pattern: {0}")]
    Exclude(#[from] globset::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Video,
    WrongExtension,
    /// Sample clips and trailers that ship alongside a release.
    Extra,
}

#[derive(Debug, Clone)]
pub struct Scanner {
    extensions: BTreeSet<String>,
    excludes: GlobSet,
}

impl Scanner {
    pub fn new(extensions: BTreeSet<String>, excludes: &[String]) -> Result<Self, ScanError> {
        Ok(Self {
            extensions,
            excludes: build_globset(excludes)?,
        })
    }

    pub fn from_config(cfg: &CullerConfig) -> Result<Self, ScanError> {
        Self::new(cfg.extensions.clone(), &cfg.exclude)
    }

    pub fn disposition(&self, path: &Path) -> Disposition {
        let is_video = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.contains(&e.to_lowercase()))
            .unwrap_or(false);
        if !is_video {
            return Disposition::WrongExtension;
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        if normalizer::is_extra(&name) {
            Disposition::Extra
        } else {
            Disposition::Video
        }
    }

    /// Lazily yields every regular file under `root` in file-name order.
    /// Excluded paths are pruned, directories included. Symlinks to files are
    /// yielded as the link itself; symlinked directories are never entered,
    /// so nothing outside `root` becomes a candidate.
    pub fn walk<'a>(
        &'a self,
        root: &Path,
    ) -> Result<impl Iterator<Item = (PathBuf, Disposition)> + 'a, ScanError> {
        if !root.exists() {
            return Err(ScanError::RootNotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(ScanError::RootNotDirectory(root.to_path_buf()));
        }

        let iter = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |e| !self.excludes.is_match(e.path()))
            .filter_map(|entry| match entry {
                Ok(e) => Some(e),
                Err(err) => {
                    debug!(error = %err, "skipping unreadable entry");
                    None
                }
            })
            .filter(|e| {
                e.file_type().is_file() || (e.path_is_symlink() && e.path().is_file())
            })
            .map(move |e| {
                let path = e.into_path();
                let disposition = self.disposition(&path);
                (path, disposition)
            });
        Ok(iter)
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet, globset::Error> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        builder.add(Glob::new(pat)?);
    }
    builder.build()
}
