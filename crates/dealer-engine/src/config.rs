//! Configuration for the engine.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::EngineError;

/// Default fetch coalescing window in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Default storage key for persisted snapshots.
pub const DEFAULT_STORAGE_KEY: &str = "dealer-store";

/// Default seed for synthetic data.
const DEFAULT_SEED: u64 = 42;

/// Settings the store itself needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Quiet period before a burst of fetches for one kind executes.
    pub debounce: Duration,
    /// Key under which the snapshot document is stored.
    pub storage_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

/// Full engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Fetch coalescing window.
    pub debounce: Duration,
    /// Seed for the synthetic data generator.
    pub seed: u64,
    /// Simulated source latency.
    pub latency: Duration,
    /// Snapshot storage key.
    pub storage_key: String,
    /// SQLite URL for snapshots. `None` disables persistence.
    pub database_url: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            seed: DEFAULT_SEED,
            latency: Duration::ZERO,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            database_url: None,
        }
    }
}

impl EngineConfig {
    /// Create configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `DEALER_DEBOUNCE_MS` - Fetch coalescing window (default: 300)
    /// - `DEALER_SEED` - Synthetic data seed (default: 42)
    /// - `DEALER_LATENCY_MS` - Simulated source latency (default: 0)
    /// - `DEALER_STORAGE_KEY` - Snapshot storage key (default: dealer-store)
    /// - `DEALER_DATABASE_URL` - SQLite URL for snapshots (default: unset, no persistence)
    pub fn from_env() -> Result<Self, EngineError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, EngineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let debounce = parse_var(&lookup, "DEALER_DEBOUNCE_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.debounce);

        let seed = parse_var(&lookup, "DEALER_SEED")?.unwrap_or(defaults.seed);

        let latency = parse_var(&lookup, "DEALER_LATENCY_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.latency);

        let storage_key = lookup("DEALER_STORAGE_KEY")
            .filter(|key| !key.trim().is_empty())
            .unwrap_or(defaults.storage_key);

        let database_url = lookup("DEALER_DATABASE_URL").filter(|url| !url.trim().is_empty());

        Ok(Self {
            debounce,
            seed,
            latency,
            storage_key,
            database_url,
        })
    }

    /// The subset of settings the store consumes.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            debounce: self.debounce,
            storage_key: self.storage_key.clone(),
        }
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>, EngineError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| EngineError::Configuration(format!("{} must be a whole number, got {:?}", key, raw))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.debounce, Duration::from_millis(300));
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = EngineConfig::from_lookup(lookup(&[
            ("DEALER_DEBOUNCE_MS", "50"),
            ("DEALER_SEED", "7"),
            ("DEALER_LATENCY_MS", "120"),
            ("DEALER_STORAGE_KEY", "tenant-9"),
            ("DEALER_DATABASE_URL", "sqlite:dealer.db?mode=rwc"),
        ]))
        .unwrap();

        assert_eq!(config.debounce, Duration::from_millis(50));
        assert_eq!(config.seed, 7);
        assert_eq!(config.latency, Duration::from_millis(120));
        assert_eq!(config.store_config().storage_key, "tenant-9");
        assert_eq!(config.database_url.as_deref(), Some("sqlite:dealer.db?mode=rwc"));
    }

    #[test]
    fn test_invalid_number() {
        let result = EngineConfig::from_lookup(lookup(&[("DEALER_DEBOUNCE_MS", "soon")]));
        assert!(matches!(result, Err(EngineError::Configuration(_))));
    }
}
