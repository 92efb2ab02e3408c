use crate::calendar::HolidayCalendar;
use crate::workload::DEFAULT_HOURS_PER_PERSON;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const ENDPOINT_ENV: &str = "WBS_HUB_ENDPOINT";

/// Value shipped in the sample config; treated as "not configured".
pub const PLACEHOLDER_ENDPOINT: &str = "https://hook.us1.make.com/SEU_ENDPOINT_AQUI";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid YAML in {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("template '{0}' is defined more than once")]
    DuplicateTemplate(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    pub make_endpoint: String,
    /// Seconds.
    pub request_timeout: u64,
    /// Seconds to wait between two webhook posts.
    pub request_delay: f64,
    pub hours_per_person: f64,
    pub database_path: PathBuf,
    pub templates_dir: PathBuf,
    pub holidays: Vec<NaiveDate>,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            make_endpoint: PLACEHOLDER_ENDPOINT.to_string(),
            request_timeout: 30,
            request_delay: 1.0,
            hours_per_person: DEFAULT_HOURS_PER_PERSON,
            database_path: PathBuf::from("db/planejamentos.db"),
            templates_dir: PathBuf::from("templates"),
            holidays: Vec::new(),
        }
    }
}

impl HubConfig {
    pub fn from_yaml_str(input: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(input)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&raw).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.request_delay.is_finite() || self.request_delay < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "request_delay must be a non-negative number of seconds (got {})",
                self.request_delay
            )));
        }
        if !self.hours_per_person.is_finite() || self.hours_per_person <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "hours_per_person must be positive (got {})",
                self.hours_per_person
            )));
        }
        Ok(())
    }

    /// Applies `WBS_HUB_ENDPOINT` when set and non-empty.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            if !endpoint.trim().is_empty() {
                self.make_endpoint = endpoint.trim().to_string();
            }
        }
        self
    }

    pub fn endpoint_configured(&self) -> bool {
        let endpoint = self.make_endpoint.trim();
        !endpoint.is_empty() && endpoint != PLACEHOLDER_ENDPOINT
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Fails on a negative, NaN or overflowing `request_delay`, which a config
    /// built through `from_yaml_str` has not been validated against.
    pub fn delay(&self) -> Result<Duration, ConfigError> {
        Duration::try_from_secs_f64(self.request_delay).map_err(|e| {
            ConfigError::Invalid(format!(
                "request_delay must be a non-negative number of seconds (got {}): {e}",
                self.request_delay
            ))
        })
    }

    pub fn holiday_calendar(&self) -> HolidayCalendar {
        self.holidays.iter().copied().collect()
    }
}
