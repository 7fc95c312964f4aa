//! Dispatch configuration.
//!
//! Read from TOML text, a TOML file, or `MULTIDISPATCH_*` environment
//! variables. Every field has a default, so an empty document is valid.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::RandomSampler;

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value '{value}' for {name}")]
    InvalidVar { name: String, value: String },
}

/// Settings shared by every dispatch tree of a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchConfig {
    /// Memoize resolutions by argument kinds
    pub cache: bool,
    /// Check at most this many elements of a container during dispatch
    pub sample_limit: Option<usize>,
    /// Seed for sampled container checks
    pub sample_seed: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            cache: true,
            sample_limit: None,
            sample_seed: 0,
        }
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidVar {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidVar {
        name: name.to_string(),
        value: value.to_string(),
    })
}

/// A zero limit would check no elements at all
fn check_sample_limit(name: &str, limit: usize) -> Result<usize, ConfigError> {
    if limit == 0 {
        return Err(ConfigError::InvalidVar {
            name: name.to_string(),
            value: limit.to_string(),
        });
    }
    Ok(limit)
}

impl DispatchConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        if let Some(limit) = config.sample_limit {
            check_sample_limit("sample_limit", limit)?;
        }
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Defaults overridden by `MULTIDISPATCH_CACHE`,
    /// `MULTIDISPATCH_SAMPLE_LIMIT` and `MULTIDISPATCH_SAMPLE_SEED`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Like [`DispatchConfig::from_env`] with a custom variable lookup
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(value) = lookup("MULTIDISPATCH_CACHE") {
            config.cache = parse_bool("MULTIDISPATCH_CACHE", &value)?;
        }
        if let Some(value) = lookup("MULTIDISPATCH_SAMPLE_LIMIT") {
            let limit = parse_number("MULTIDISPATCH_SAMPLE_LIMIT", &value)?;
            config.sample_limit = Some(check_sample_limit("MULTIDISPATCH_SAMPLE_LIMIT", limit)?);
        }
        if let Some(value) = lookup("MULTIDISPATCH_SAMPLE_SEED") {
            config.sample_seed = parse_number("MULTIDISPATCH_SAMPLE_SEED", &value)?;
        }
        Ok(config)
    }

    /// Sampler for dispatch-time container checks, if sampling is on
    pub fn sampler(&self) -> Option<RandomSampler> {
        self.sample_limit
            .map(|limit| RandomSampler::new(limit, self.sample_seed))
    }
}
