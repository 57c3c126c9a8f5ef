use std::time::Duration;

use thiserror::Error;

use crate::data::loader::{DataSource, FetchOptions};

pub const DEFAULT_DATA_URL: &str = "https://raw.githubusercontent.com/Aung-Soe/Dash-Python-Apps/main\
/Electricity_Prices_by_US_State/electricity.csv";

pub const DATA_ENV: &str = "ELECTRICITY_DATA";
pub const TIMEOUT_ENV: &str = "ELECTRICITY_FETCH_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("ELECTRICITY_FETCH_TIMEOUT_SECS must be a positive number of seconds, got '{0}'")]
    InvalidTimeout(String),
}

/// Startup settings, read once from the environment.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub source: DataSource,
    pub fetch: FetchOptions,
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key → value lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let source = lookup(DATA_ENV)
            .filter(|s| !s.trim().is_empty())
            .map(|s| DataSource::parse(&s))
            .unwrap_or_else(|| DataSource::Url(DEFAULT_DATA_URL.to_string()));

        let timeout_secs = match lookup(TIMEOUT_ENV) {
            None => DEFAULT_TIMEOUT_SECS,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
        };

        Ok(DashboardConfig {
            source,
            fetch: FetchOptions {
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<DashboardConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DashboardConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.source, DataSource::Url(DEFAULT_DATA_URL.to_string()));
        assert!(DEFAULT_DATA_URL.ends_with("/Electricity_Prices_by_US_State/electricity.csv"));
        assert_eq!(cfg.fetch.timeout, Duration::from_secs(30));
    }

    #[test]
    fn local_file_and_timeout() {
        let cfg = config(&[(DATA_ENV, "prices.parquet"), (TIMEOUT_ENV, "5")]).unwrap();
        assert_eq!(cfg.source, DataSource::File(PathBuf::from("prices.parquet")));
        assert_eq!(cfg.fetch.timeout, Duration::from_secs(5));
    }

    #[test]
    fn blank_source_falls_back_to_default() {
        let cfg = config(&[(DATA_ENV, "  ")]).unwrap();
        assert_eq!(cfg.source, DataSource::Url(DEFAULT_DATA_URL.to_string()));
    }

    #[test]
    fn invalid_timeout() {
        assert_eq!(
            config(&[(TIMEOUT_ENV, "0")]).unwrap_err(),
            ConfigError::InvalidTimeout("0".into())
        );
        assert!(config(&[(TIMEOUT_ENV, "soon")]).is_err());
    }
}
