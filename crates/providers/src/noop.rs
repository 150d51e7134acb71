use crate::{LookupError, Rating, RatingProvider};

/// Provider used when no API key is configured; every lookup misses.
#[derive(Debug, Default)]
pub struct NoopProvider;

#[async_trait::async_trait]
impl RatingProvider for NoopProvider {
    async fn lookup(&self, _title: &str, _year: Option<&str>) -> Result<Rating, LookupError> {
        Err(LookupError::NotFound)
    }
}
