//! Normalizer and provider configuration.
//!
//! Callers usually build a config in code with the `with_*` builders; the
//! shell application can also ship it as JSON, where every field is optional
//! and falls back to its default.

use h3o::Resolution;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::polyline::DEFAULT_PRECISION;

/// Resolution 9 (~240m cells) matches city-scale dispatch.
const DEFAULT_CELL_RESOLUTION: u8 = 9;
const DEFAULT_CACHE_CAPACITY: usize = 20_000;
/// Beyond this, `10^precision` scaled coordinates exceed what 7 groups encode.
const MAX_POLYLINE_PRECISION: u32 = 7;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("polyline precision {0} is outside 1..=7")]
    InvalidPrecision(u32),
    #[error("H3 resolution {0} is outside 0..=15")]
    InvalidResolution(u8),
    #[error("cache capacity must be greater than zero")]
    ZeroCacheCapacity,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Decimal digits encoded in step and overview polylines.
    pub polyline_precision: u32,
    /// Which alternative route `normalize_directions` picks.
    pub route_index: usize,
    /// Use the overview polyline when no step contributes a coordinate.
    pub overview_fallback: bool,
    /// H3 resolution for cache keys and path cell traces.
    pub cell_resolution: u8,
    /// Entries kept by `CachedRouteProvider`.
    pub cache_capacity: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            polyline_precision: DEFAULT_PRECISION,
            route_index: 0,
            overview_fallback: true,
            cell_resolution: DEFAULT_CELL_RESOLUTION,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl NormalizerConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_POLYLINE_PRECISION).contains(&self.polyline_precision) {
            return Err(ConfigError::InvalidPrecision(self.polyline_precision));
        }
        if self.cache_capacity == 0 {
            return Err(ConfigError::ZeroCacheCapacity);
        }
        self.resolution().map(|_| ())
    }

    pub fn resolution(&self) -> Result<Resolution, ConfigError> {
        Resolution::try_from(self.cell_resolution)
            .map_err(|_| ConfigError::InvalidResolution(self.cell_resolution))
    }

    /// Largest coordinate difference two decoded points can have while still
    /// encoding to the same integers.
    pub(crate) fn coordinate_tolerance(&self) -> f64 {
        0.5 / 10_f64.powi(self.polyline_precision as i32)
    }

    pub fn with_polyline_precision(mut self, precision: u32) -> Self {
        self.polyline_precision = precision;
        self
    }

    pub fn with_route_index(mut self, index: usize) -> Self {
        self.route_index = index;
        self
    }

    pub fn with_overview_fallback(mut self, enabled: bool) -> Self {
        self.overview_fallback = enabled;
        self
    }

    pub fn with_cell_resolution(mut self, resolution: u8) -> Self {
        self.cell_resolution = resolution;
        self
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }
}
