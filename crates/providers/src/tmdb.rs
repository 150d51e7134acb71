use crate::{LookupError, Rating, RatingProvider};
use bytes::Bytes;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

#[derive(Clone)]
pub struct TmdbConfig {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Clone)]
pub struct TmdbProvider {
    client: Client,
    cfg: Arc<TmdbConfig>,
}

impl TmdbProvider {
    pub fn new(cfg: TmdbConfig) -> Self {
        Self {
            client: Client::new(),
            cfg: Arc::new(cfg),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.cfg.base_url.trim_end_matches('/'), path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: String,
        params: &[(&str, &str)],
    ) -> Result<T, LookupError> {
        let resp = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| LookupError::RequestFailed(e.to_string()))?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.bytes().await.unwrap_or(Bytes::from_static(b""));
            return Err(LookupError::RequestFailed(format!(
                "status {}: {}",
                status,
                String::from_utf8_lossy(&body)
            )));
        }
        let body = resp
            .bytes()
            .await
            .map_err(|e| LookupError::RequestFailed(e.to_string()))?;
        serde_json::from_slice(&body).map_err(|e| LookupError::Malformed(e.to_string()))
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    id: u64,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Deserialize)]
struct MovieDetails {
    #[serde(default)]
    vote_average: Option<f64>,
}

#[async_trait::async_trait]
impl RatingProvider for TmdbProvider {
    async fn lookup(&self, title: &str, year: Option<&str>) -> Result<Rating, LookupError> {
        let mut params = vec![("api_key", self.cfg.api_key.as_str()), ("query", title)];
        if let Some(year) = year {
            params.push(("year", year));
        }
        let search: SearchResponse = self
            .get_json(self.endpoint("search/movie"), &params)
            .await?;

        // Results come back ordered by relevance; the first is the best match.
        let hit = search.results.into_iter().next().ok_or(LookupError::NotFound)?;
        debug!(
            id = hit.id,
            matched = hit.title.as_deref().unwrap_or(""),
            "tmdb search hit"
        );

        let details: MovieDetails = self
            .get_json(
                self.endpoint(&format!("movie/{}", hit.id)),
                &[("api_key", self.cfg.api_key.as_str())],
            )
            .await?;
        Ok(Rating(details.vote_average.unwrap_or(0.0)))
    }
}
