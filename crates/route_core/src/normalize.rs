//! Route normalizer: typed Directions / Distance Matrix records → the flat
//! route and ETA models consumed by navigation and dispatch.
//!
//! Failures of a single leg or matrix element are soft: they are excluded from
//! totals and reported next to the successful parts. Structural problems
//! (no legs, a malformed polyline, a matrix that does not match its request)
//! abort normalization.

use thiserror::Error;

use crate::config::NormalizerConfig;
use crate::model::{DirectionsResult, DistanceMatrixResult, Route};
use crate::polyline::PolylineError;

mod instructions;
mod matrix;
mod route;

pub use instructions::strip_instruction_markup;
pub use matrix::{ElementStatusError, MatrixShape, NormalizedMatrix, NormalizedMatrixCell};
pub use route::{LegIssue, NormalizedRoute};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// Zero routes, or a route with zero legs, on an `OK` response.
    #[error("route has no legs")]
    EmptyRoute,
    #[error("route index {index} out of range ({available} routes)")]
    RouteIndexOutOfRange { index: usize, available: usize },
    #[error("malformed polyline at `{path}`: {source}")]
    MalformedPolyline {
        path: String,
        #[source]
        source: PolylineError,
    },
    /// Counted legs cover some distance but produced fewer than two points.
    #[error("route covers {distance_meters} m but its path has {points} point(s)")]
    DegeneratePath { points: usize, distance_meters: u64 },
    #[error("distance matrix has no rows")]
    EmptyMatrix,
    #[error("distance matrix has {found} rows, expected {expected}")]
    RowCountMismatch { expected: usize, found: usize },
    #[error("distance matrix row {row} has {found} elements, expected {expected}")]
    ElementCountMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("OK element ({origin}, {destination}) has no distance or duration")]
    MissingElementValues { origin: usize, destination: usize },
}

impl NormalizeError {
    fn within_route(self, route_index: usize) -> Self {
        match self {
            Self::MalformedPolyline { path, source } => Self::MalformedPolyline {
                path: format!("routes[{route_index}].{path}"),
                source,
            },
            other => other,
        }
    }
}

/// Normalize the route selected by `config.route_index`.
pub fn normalize_directions(
    result: &DirectionsResult,
    config: &NormalizerConfig,
) -> Result<NormalizedRoute, NormalizeError> {
    if result.routes.is_empty() {
        return Err(NormalizeError::EmptyRoute);
    }
    let index = config.route_index;
    let route = result
        .routes
        .get(index)
        .ok_or(NormalizeError::RouteIndexOutOfRange {
            index,
            available: result.routes.len(),
        })?;
    route::normalize_route(route, config).map_err(|err| err.within_route(index))
}

/// Normalize every alternative route, in API order.
pub fn normalize_alternatives(
    result: &DirectionsResult,
    config: &NormalizerConfig,
) -> Result<Vec<NormalizedRoute>, NormalizeError> {
    if result.routes.is_empty() {
        return Err(NormalizeError::EmptyRoute);
    }
    result
        .routes
        .iter()
        .enumerate()
        .map(|(idx, route)| {
            route::normalize_route(route, config).map_err(|err| err.within_route(idx))
        })
        .collect()
}

/// Normalize a single route. Polyline error paths are relative to the route.
pub fn normalize_route(
    route: &Route,
    config: &NormalizerConfig,
) -> Result<NormalizedRoute, NormalizeError> {
    route::normalize_route(route, config)
}

/// Normalize a distance matrix, checking it against the request's `shape`
/// when the caller has it.
pub fn normalize_distance_matrix(
    result: &DistanceMatrixResult,
    shape: Option<MatrixShape>,
) -> Result<NormalizedMatrix, NormalizeError> {
    matrix::normalize_distance_matrix(result, shape)
}
