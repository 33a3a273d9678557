//! Route providers for dispatch: trait abstraction over "give me a route
//! between two points".
//!
//! - **`DirectionsRouteProvider`**: fetches a Directions body through a
//!   [`PayloadFetcher`], then decodes and normalizes it.
//! - **`CachedRouteProvider`**: LRU wrapper keyed by the H3 cells of both
//!   endpoints, so requests from nearby pickups share one lookup.
//! - **`GoogleMapsFetcher`** (feature `http`): blocking HTTP fetcher for
//!   Google-compatible endpoints.
//!
//! Fetching is the only I/O here; decode and normalize stay pure.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use h3o::{CellIndex, Resolution};
use lru::LruCache;
use tracing::{debug, instrument};

use crate::config::{ConfigError, NormalizerConfig};
use crate::coordinate::Coordinate;
use crate::decode::{decode_directions, decode_distance_matrix};
use crate::error::{FetchError, RouteError};
use crate::normalize::{
    normalize_directions, normalize_distance_matrix, MatrixShape, NormalizedMatrix,
    NormalizedRoute,
};

#[cfg(feature = "http")]
pub mod google;

/// Supplies raw response bodies. Implemented by the application shell (or
/// `GoogleMapsFetcher`); must be shareable across threads.
pub trait PayloadFetcher: Send + Sync {
    fn fetch_directions(&self, from: Coordinate, to: Coordinate) -> Result<Vec<u8>, FetchError>;

    fn fetch_distance_matrix(
        &self,
        origins: &[Coordinate],
        destinations: &[Coordinate],
    ) -> Result<Vec<u8>, FetchError>;
}

impl<T: PayloadFetcher> PayloadFetcher for Arc<T> {
    fn fetch_directions(&self, from: Coordinate, to: Coordinate) -> Result<Vec<u8>, FetchError> {
        (**self).fetch_directions(from, to)
    }

    fn fetch_distance_matrix(
        &self,
        origins: &[Coordinate],
        destinations: &[Coordinate],
    ) -> Result<Vec<u8>, FetchError> {
        (**self).fetch_distance_matrix(origins, destinations)
    }
}

/// Trait for routing backends used by dispatch.
pub trait RouteProvider: Send + Sync {
    fn route(&self, from: Coordinate, to: Coordinate) -> Result<NormalizedRoute, RouteError>;
}

/// Decode and normalize a Directions body in one call.
pub fn route_from_json(
    bytes: &[u8],
    config: &NormalizerConfig,
) -> Result<NormalizedRoute, RouteError> {
    let result = decode_directions(bytes)?;
    Ok(normalize_directions(&result, config)?)
}

/// Decode and normalize a Distance Matrix body in one call.
pub fn matrix_from_json(
    bytes: &[u8],
    shape: Option<MatrixShape>,
) -> Result<NormalizedMatrix, RouteError> {
    let result = decode_distance_matrix(bytes)?;
    Ok(normalize_distance_matrix(&result, shape)?)
}

/// Fetch → decode → normalize.
pub struct DirectionsRouteProvider<F> {
    fetcher: F,
    config: NormalizerConfig,
}

impl<F: PayloadFetcher> DirectionsRouteProvider<F> {
    pub fn new(fetcher: F, config: NormalizerConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Pairwise ETAs, validated against the number of points requested.
    #[instrument(skip_all, fields(origins = origins.len(), destinations = destinations.len()))]
    pub fn matrix(
        &self,
        origins: &[Coordinate],
        destinations: &[Coordinate],
    ) -> Result<NormalizedMatrix, RouteError> {
        let bytes = self.fetcher.fetch_distance_matrix(origins, destinations)?;
        matrix_from_json(
            &bytes,
            Some(MatrixShape::new(origins.len(), destinations.len())),
        )
    }
}

impl<F: PayloadFetcher> RouteProvider for DirectionsRouteProvider<F> {
    #[instrument(skip_all)]
    fn route(&self, from: Coordinate, to: Coordinate) -> Result<NormalizedRoute, RouteError> {
        let bytes = self.fetcher.fetch_directions(from, to)?;
        route_from_json(&bytes, &self.config)
    }
}

/// LRU-cached wrapper around any [`RouteProvider`].
///
/// Cache key is `(from_cell, to_cell)` at the configured resolution
/// (directional). Failures are never cached. Endpoints that cannot be
/// projected to a cell bypass the cache.
pub struct CachedRouteProvider {
    inner: Box<dyn RouteProvider>,
    cache: Mutex<LruCache<(CellIndex, CellIndex), NormalizedRoute>>,
    resolution: Resolution,
}

impl CachedRouteProvider {
    pub fn new(
        inner: Box<dyn RouteProvider>,
        config: &NormalizerConfig,
    ) -> Result<Self, ConfigError> {
        let capacity =
            NonZeroUsize::new(config.cache_capacity).ok_or(ConfigError::ZeroCacheCapacity)?;
        Ok(Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
            resolution: config.resolution()?,
        })
    }

    /// Number of cached routes. A poisoned cache counts as empty.
    pub fn len(&self) -> usize {
        self.cache.lock().map(|cache| cache.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn key(&self, from: Coordinate, to: Coordinate) -> Option<(CellIndex, CellIndex)> {
        Some((from.to_cell(self.resolution)?, to.to_cell(self.resolution)?))
    }
}

impl RouteProvider for CachedRouteProvider {
    fn route(&self, from: Coordinate, to: Coordinate) -> Result<NormalizedRoute, RouteError> {
        let key = self.key(from, to);

        // Fast path: cache hit
        if let Some(key) = key {
            if let Ok(mut cache) = self.cache.lock() {
                if let Some(cached) = cache.get(&key) {
                    debug!("route cache hit");
                    return Ok(cached.clone());
                }
            }
        }

        let route = self.inner.route(from, to)?;

        if let Some(key) = key {
            if let Ok(mut cache) = self.cache.lock() {
                cache.put(key, route.clone());
            }
        }
        Ok(route)
    }
}
