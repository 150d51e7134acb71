//! Provider abstractions for movie rating lookups.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod noop;
pub mod tmdb;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("no matching title")]
    NotFound,
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Average audience rating reported by the metadata service, on a 0-10 scale.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rating(pub f64);

impl Rating {
    pub fn value(self) -> f64 {
        self.0
    }

    /// The service answers 0.0 for titles nobody has voted on yet.
    pub fn is_unrated(self) -> bool {
        self.0 == 0.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Unrounded; whole numbers keep one decimal place.
        if self.0.fract() == 0.0 {
            write!(f, "{:.1}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[async_trait::async_trait]
pub trait RatingProvider: Send + Sync {
    /// Looks up the best match for `title`, narrowed by release `year` when given.
    async fn lookup(&self, title: &str, year: Option<&str>) -> Result<Rating, LookupError>;
}
