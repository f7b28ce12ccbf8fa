//! Query defaults for the request dispatcher.

#![warn(missing_docs)]

use serde::de::Error;
use serde::{Deserialize, Serialize};

/// Search configuration.
///
/// Fields omitted from a JSON document take their defaults: 10 km, 10 results and no cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// Radius used when a search request carries no `maxDistance`, in kilometers
    #[serde(default = "SearchConfig::default_max_distance_km")]
    pub default_max_distance_km: f64,

    /// Result count used when a search request carries no `maxResults`
    #[serde(default = "SearchConfig::default_max_results")]
    pub default_max_results: usize,

    /// Upper bound applied to the requested result count
    #[serde(default)]
    pub max_results_limit: Option<usize>,
}

impl SearchConfig {
    const fn default_max_distance_km() -> f64 {
        10.0
    }

    const fn default_max_results() -> usize {
        10
    }

    /// Set the radius used when a request omits `maxDistance`.
    pub fn with_default_max_distance_km(mut self, max_distance_km: f64) -> Self {
        self.default_max_distance_km = max_distance_km;
        self
    }

    /// Set the result count used when a request omits `maxResults`.
    pub fn with_default_max_results(mut self, max_results: usize) -> Self {
        self.default_max_results = max_results;
        self
    }

    /// Cap every requested result count at `limit`.
    pub fn with_max_results_limit(mut self, limit: usize) -> Self {
        self.max_results_limit = Some(limit);
        self
    }

    /// Check that the defaults describe a valid query and the cap is non-zero.
    pub fn validate(&self) -> Result<(), String> {
        if self.default_max_distance_km.is_nan() || self.default_max_distance_km < 0.0 {
            return Err("Default max distance must be a non-negative number".to_string());
        }

        if self.default_max_results == 0 {
            return Err("Default max results must be greater than zero".to_string());
        }

        if self.max_results_limit == Some(0) {
            return Err("Max results limit must be greater than zero".to_string());
        }

        Ok(())
    }

    /// Parse a JSON document and validate it.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: SearchConfig = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(serde_json::Error::custom(e));
        }
        Ok(config)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Apply the configured cap to a requested result count.
    pub fn clamp_max_results(&self, max_results: usize) -> usize {
        match self.max_results_limit {
            Some(limit) => max_results.min(limit),
            None => max_results,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_max_distance_km: Self::default_max_distance_km(),
            default_max_results: Self::default_max_results(),
            max_results_limit: None,
        }
    }
}
