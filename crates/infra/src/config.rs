//! Configuration loading and representation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use shelfwise_core::{DEFAULT_PAGE_SIZE, PageRequest};

pub const PAGE_SIZE_VAR: &str = "SHELFWISE_PAGE_SIZE";
pub const MAX_PAGE_SIZE_VAR: &str = "SHELFWISE_MAX_PAGE_SIZE";
pub const LOW_STOCK_GRAMS_VAR: &str = "SHELFWISE_LOW_STOCK_GRAMS";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: '{value}' ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Tunables for the catalog and order services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreConfig {
    pub default_page_size: usize,
    pub max_page_size: usize,
    /// Products at or below this many grams (and above zero) count as low stock.
    pub low_stock_threshold_grams: u64,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: 100,
            low_stock_threshold_grams: 5000,
        }
    }
}

impl CoreConfig {
    /// Read from the process environment; unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`CoreConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let max_page_size = parse(&lookup, MAX_PAGE_SIZE_VAR)?.unwrap_or(defaults.max_page_size);
        if max_page_size == 0 {
            return Err(invalid(MAX_PAGE_SIZE_VAR, "0", "must be at least 1"));
        }

        let default_page_size = parse(&lookup, PAGE_SIZE_VAR)?
            .unwrap_or(defaults.default_page_size)
            .clamp(1, max_page_size);

        let low_stock_threshold_grams =
            parse(&lookup, LOW_STOCK_GRAMS_VAR)?.unwrap_or(defaults.low_stock_threshold_grams);

        Ok(Self {
            default_page_size,
            max_page_size,
            low_stock_threshold_grams,
        })
    }

    /// First page at the configured default size.
    pub fn first_page(&self) -> PageRequest {
        PageRequest::new(0, self.default_page_size)
    }

    /// Resolve the page a service should serve: an unset size becomes
    /// `default_page_size`, and any size is kept within `1..=max_page_size`.
    pub fn clamp_page(&self, page: PageRequest) -> PageRequest {
        page.or_size(self.default_page_size).clamped(self.max_page_size)
    }
}

fn parse<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: core::str::FromStr,
    T::Err: core::fmt::Display,
{
    match lookup(var) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| invalid(var, &raw, &e.to_string())),
    }
}

fn invalid(var: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn unset_variables_use_defaults() {
        assert_eq!(CoreConfig::from_lookup(lookup(&[])).unwrap(), CoreConfig::default());
    }

    #[test]
    fn reads_and_clamps_values() {
        let cfg = CoreConfig::from_lookup(lookup(&[
            (PAGE_SIZE_VAR, "500"),
            (MAX_PAGE_SIZE_VAR, "50"),
            (LOW_STOCK_GRAMS_VAR, " 2500 "),
        ]))
        .unwrap();
        assert_eq!(cfg.default_page_size, 50);
        assert_eq!(cfg.max_page_size, 50);
        assert_eq!(cfg.low_stock_threshold_grams, 2500);
        assert_eq!(cfg.clamp_page(PageRequest::new(3, 1000)).size(), 50);
    }

    #[test]
    fn configured_default_fills_an_unset_page_size() {
        let cfg = CoreConfig::from_lookup(lookup(&[(PAGE_SIZE_VAR, "3")])).unwrap();
        assert_eq!(cfg.first_page(), PageRequest::new(0, 3));
        assert_eq!(cfg.clamp_page(PageRequest::default()), PageRequest::new(0, 3));
        assert_eq!(cfg.clamp_page(PageRequest::new(1, 20)), PageRequest::new(1, 20));
    }

    #[test]
    fn unparsable_value_is_an_error() {
        let err = CoreConfig::from_lookup(lookup(&[(LOW_STOCK_GRAMS_VAR, "lots")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: LOW_STOCK_GRAMS_VAR, .. }));

        let err = CoreConfig::from_lookup(lookup(&[(MAX_PAGE_SIZE_VAR, "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: MAX_PAGE_SIZE_VAR, .. }));
    }
}
