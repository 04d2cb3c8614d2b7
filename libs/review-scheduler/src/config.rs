//! Scheduler configuration.
//!
//! Defaults can be overridden from the environment:
//! - `SRS_DATA_FILE`: path of the JSON state document
//! - `SRS_ALGORITHM`: scheduling algorithm (`sm2`)
//! - `SRS_REVIEW_SHARE`: fraction of a study queue reserved for review cards
//! - `SRS_QUEUE_LIMIT`: default study queue size

use crate::algorithm::sm2::Sm2;
use crate::algorithm::SpacedRepetitionAlgorithm;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

pub const DATA_FILE_VAR: &str = "SRS_DATA_FILE";
pub const ALGORITHM_VAR: &str = "SRS_ALGORITHM";
pub const REVIEW_SHARE_VAR: &str = "SRS_REVIEW_SHARE";
pub const QUEUE_LIMIT_VAR: &str = "SRS_QUEUE_LIMIT";

/// Algorithm options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Sm2,
}

impl Default for Algorithm {
    fn default() -> Self {
        Self::Sm2
    }
}

impl Algorithm {
    /// Get the algorithm name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sm2 => "sm2",
        }
    }

    /// Parse from string.
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "sm2" => Some(Self::Sm2),
            _ => None,
        }
    }

    /// Instantiate with default parameters.
    pub fn build(&self) -> Box<dyn SpacedRepetitionAlgorithm> {
        match self {
            Self::Sm2 => Box::new(Sm2::default()),
        }
    }
}

/// Scheduler settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    pub data_file: PathBuf,
    pub algorithm: Algorithm,
    /// Share of a study queue filled with review cards before new cards.
    pub review_share: f64,
    pub default_queue_limit: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("data").join("srs_data.json"),
            algorithm: Algorithm::default(),
            review_share: 0.7,
            default_queue_limit: 20,
        }
    }
}

impl SchedulerConfig {
    /// Defaults with overrides from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults with overrides from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(DATA_FILE_VAR).filter(|p| !p.trim().is_empty()) {
            config.data_file = PathBuf::from(path);
        }

        if let Some(name) = lookup(ALGORITHM_VAR) {
            config.algorithm = Algorithm::from_name(name.trim())
                .ok_or_else(|| ConfigError::UnknownAlgorithm(name.clone()))?;
        }

        if let Some(share) = parse_var::<f64>(&lookup, REVIEW_SHARE_VAR)? {
            if !(0.0..=1.0).contains(&share) {
                return Err(invalid(REVIEW_SHARE_VAR, &share.to_string()));
            }
            config.review_share = share;
        }

        if let Some(limit) = parse_var::<usize>(&lookup, QUEUE_LIMIT_VAR)? {
            config.default_queue_limit = limit;
        }

        Ok(config)
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| invalid(key, &raw)),
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}
