use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

pub const DEFAULT_THRESHOLD: f64 = 5.0;
pub const DEFAULT_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi", "mov"];

/// Release-name noise stripped from titles, applied top to bottom after the
/// `.`/`_`/`-` separators have become spaces, so `H.264` arrives as `h 264`
/// and `AAC2.0` as `aac2 0`. The empty-parentheses entry runs last to sweep up
/// what the tag patterns leave behind. This is a heuristic list, not an
/// exhaustive one.
pub const DEFAULT_NOISE_PATTERNS: &[&str] = &[
    r"\[[^\]]*\]",
    r"\b(?:2160p|1080p|720p|576p|480p|4k|uhd)\b",
    r"\b(?:[xh] ?26[45]|hevc|avc|xvid|divx|10bit)\b",
    r"\b(?:blu ?ray|brrip|bdrip|dvdrip|hdrip|webrip|web ?dl|hdtv|remux)\b",
    r"\b(?:aac|e?ac3|ddp?|dts|truehd|atmos)(?: ?[257] ?[01])?\b",
    r"\b(?:yify|yts|klaxxon|vomit|newmyvideolinks|myvideolinks|rarbg)\b",
    r"\(\s*\)",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("threshold must be a rating between 0 and 10, got {0}")]
    Threshold(f64),
    #[error("no video extensions configured")]
    NoExtensions,
    #[error("invalid noise pattern {pattern:?}: {source}")]
    NoisePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Settings as read from defaults and the environment, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub tmdb_api_key: Option<String>,
    pub tmdb_base_url: String,
    pub threshold: f64,
    pub extensions: Vec<String>,
    pub noise_patterns: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// Validated, immutable settings shared by the scanner, normalizer and lookup.
#[derive(Debug, Clone)]
pub struct CullerConfig {
    pub tmdb_api_key: Option<String>,
    pub tmdb_base_url: String,
    pub threshold: f64,
    pub extensions: BTreeSet<String>,
    pub noise: Vec<Regex>,
    pub exclude: Vec<String>,
}

impl Default for CullerConfig {
    fn default() -> Self {
        // The built-in patterns are known to compile.
        Self::try_from(AppConfig::default()).expect("built-in configuration is valid")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tmdb_api_key: None,
            tmdb_base_url: providers::tmdb::DEFAULT_BASE_URL.to_string(),
            threshold: DEFAULT_THRESHOLD,
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            noise_patterns: DEFAULT_NOISE_PATTERNS.iter().map(|s| s.to_string()).collect(),
            exclude: Vec::new(),
        }
    }
}

impl TryFrom<AppConfig> for CullerConfig {
    type Error = ConfigError;

    fn try_from(raw: AppConfig) -> Result<Self, Self::Error> {
        if !raw.threshold.is_finite() || !(0.0..=10.0).contains(&raw.threshold) {
            return Err(ConfigError::Threshold(raw.threshold));
        }

        let extensions: BTreeSet<String> = raw
            .extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        if extensions.is_empty() {
            return Err(ConfigError::NoExtensions);
        }

        let noise = raw
            .noise_patterns
            .iter()
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| ConfigError::NoisePattern {
                        pattern: pattern.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            tmdb_api_key: raw.tmdb_api_key.filter(|k| !k.trim().is_empty()),
            tmdb_base_url: raw.tmdb_base_url,
            threshold: raw.threshold,
            extensions,
            noise,
            exclude: raw.exclude,
        })
    }
}

/// Builds settings from compiled defaults overlaid with `CULLER_*` variables.
/// `TMDB_API_KEY` is accepted as a fallback for the API key.
pub fn load() -> anyhow::Result<AppConfig> {
    let mut cfg = load_with_env(None)?;
    if cfg.tmdb_api_key.is_none() {
        cfg.tmdb_api_key = std::env::var("TMDB_API_KEY").ok();
    }
    Ok(cfg)
}

/// Same as [`load`] but reads overrides from `env` instead of the process
/// environment when given. No fallback variables are consulted.
pub fn load_with_env(env: Option<HashMap<String, String>>) -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();
    let settings = config::Config::builder()
        .set_default("tmdb_base_url", defaults.tmdb_base_url)?
        .set_default("threshold", defaults.threshold)?
        .set_default("extensions", defaults.extensions)?
        .set_default("noise_patterns", defaults.noise_patterns)?
        .add_source(config::Environment::with_prefix("CULLER").source(env))
        .build()?;
    Ok(settings.try_deserialize()?)
}
