//! Configuration handling for the pipeline.
//!
//! Values come from environment variables (a `.env` file is loaded by the
//! binary before this runs) and fall back to the defaults the pipeline was
//! tuned with. Command-line flags override individual values through the
//! `with_*` methods.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

use crate::classifier::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::filters::GenreRules;
use crate::filters::basic::DEFAULT_MIN_SCORE;

/// Environment variable names.
pub const ENV_MIN_SCORE: &str = "MIN_SCORE";
pub const ENV_REQUEST_DELAY_MS: &str = "REQUEST_DELAY_MS";
pub const ENV_CHECKPOINT_INTERVAL: &str = "CHECKPOINT_INTERVAL";
pub const ENV_CLASSIFY_DELAY_MS: &str = "CLASSIFY_DELAY_MS";
pub const ENV_CLASSIFY_CHECKPOINT_INTERVAL: &str = "CLASSIFY_CHECKPOINT_INTERVAL";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_OPENAI_MODEL: &str = "OPENAI_MODEL";
pub const ENV_REQUIRED_GENRES: &str = "REQUIRED_GENRES";
pub const ENV_REQUIRED_THEMES: &str = "REQUIRED_THEMES";
pub const ENV_EXCLUDED_GENRES: &str = "EXCLUDED_GENRES";
pub const ENV_EXCLUDED_THEMES: &str = "EXCLUDED_THEMES";

const DEFAULT_REQUEST_DELAY_MS: u64 = 2000;
const DEFAULT_CHECKPOINT_INTERVAL: usize = 50;
const DEFAULT_CLASSIFY_DELAY_MS: u64 = 500;
const DEFAULT_CLASSIFY_CHECKPOINT_INTERVAL: usize = 10;

/// Pipeline runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    min_score: f64,
    request_delay: Duration,
    checkpoint_interval: usize,
    classify_delay: Duration,
    classify_checkpoint_interval: usize,
    openai_api_key: Option<String>,
    openai_base_url: String,
    openai_model: String,
    genre_rules: GenreRules,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_MIN_SCORE,
            request_delay: Duration::from_millis(DEFAULT_REQUEST_DELAY_MS),
            checkpoint_interval: DEFAULT_CHECKPOINT_INTERVAL,
            classify_delay: Duration::from_millis(DEFAULT_CLASSIFY_DELAY_MS),
            classify_checkpoint_interval: DEFAULT_CLASSIFY_CHECKPOINT_INTERVAL,
            openai_api_key: None,
            openai_base_url: DEFAULT_BASE_URL.to_string(),
            openai_model: DEFAULT_MODEL.to_string(),
            genre_rules: GenreRules::default(),
        }
    }
}

impl Config {
    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = GenreRules::default();

        let min_score =
            check_min_score(ENV_MIN_SCORE, parse_var(ENV_MIN_SCORE, DEFAULT_MIN_SCORE)?)?;

        Ok(Self {
            min_score,
            request_delay: Duration::from_millis(parse_var(
                ENV_REQUEST_DELAY_MS,
                DEFAULT_REQUEST_DELAY_MS,
            )?),
            checkpoint_interval: parse_var(ENV_CHECKPOINT_INTERVAL, DEFAULT_CHECKPOINT_INTERVAL)?,
            classify_delay: Duration::from_millis(parse_var(
                ENV_CLASSIFY_DELAY_MS,
                DEFAULT_CLASSIFY_DELAY_MS,
            )?),
            classify_checkpoint_interval: parse_var(
                ENV_CLASSIFY_CHECKPOINT_INTERVAL,
                DEFAULT_CLASSIFY_CHECKPOINT_INTERVAL,
            )?,
            openai_api_key: env::var(ENV_OPENAI_API_KEY)
                .ok()
                .filter(|key| !key.trim().is_empty()),
            openai_base_url: env::var(ENV_OPENAI_BASE_URL)
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            openai_model: env::var(ENV_OPENAI_MODEL).unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            genre_rules: GenreRules {
                required_genres: list_var(ENV_REQUIRED_GENRES, defaults.required_genres),
                required_themes: list_var(ENV_REQUIRED_THEMES, defaults.required_themes),
                excluded_genres: list_var(ENV_EXCLUDED_GENRES, defaults.excluded_genres),
                excluded_themes: list_var(ENV_EXCLUDED_THEMES, defaults.excluded_themes),
            },
        })
    }

    /// Minimum viewer score kept by the basic filter.
    pub fn min_score(&self) -> f64 {
        self.min_score
    }
    /// Pause between two page downloads.
    pub fn request_delay(&self) -> Duration {
        self.request_delay
    }
    /// Successful pages between two scrape snapshots.
    pub fn checkpoint_interval(&self) -> usize {
        self.checkpoint_interval
    }
    pub fn classify_delay(&self) -> Duration {
        self.classify_delay
    }
    pub fn classify_checkpoint_interval(&self) -> usize {
        self.classify_checkpoint_interval
    }
    pub fn openai_api_key(&self) -> Option<&str> {
        self.openai_api_key.as_deref()
    }
    pub fn openai_base_url(&self) -> &str {
        &self.openai_base_url
    }
    pub fn openai_model(&self) -> &str {
        &self.openai_model
    }
    pub fn genre_rules(&self) -> &GenreRules {
        &self.genre_rules
    }

    pub fn with_min_score(mut self, min_score: f64) -> Result<Self, ConfigError> {
        self.min_score = check_min_score("min_score", min_score)?;
        Ok(self)
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn with_checkpoint_interval(mut self, interval: usize) -> Self {
        self.checkpoint_interval = interval;
        self
    }

    pub fn with_classify_delay(mut self, delay: Duration) -> Self {
        self.classify_delay = delay;
        self
    }
}

fn check_min_score(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: "must be a finite number".to_string(),
        })
    }
}

fn parse_var<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            field: name,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

/// Comma-separated labels; an empty value means an empty list.
fn list_var(name: &str, default: Vec<String>) -> Vec<String> {
    match env::var(name) {
        Ok(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(str::to_string)
            .collect(),
        Err(_) => default,
    }
}

/// Errors that can occur while building a configuration.
#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}
