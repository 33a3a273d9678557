use h3o::{CellIndex, Resolution};
use serde::Serialize;
use tracing::warn;

use super::instructions::strip_instruction_markup;
use super::NormalizeError;
use crate::config::NormalizerConfig;
use crate::coordinate::{path_cells, path_length_km, Coordinate};
use crate::model::Route;
use crate::polyline::Polyline;
use crate::status::ApiStatus;

/// A leg left out of the totals because the API reported it as failed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LegIssue {
    pub leg_index: usize,
    pub status: ApiStatus,
}

/// One route flattened for navigation and dispatch.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NormalizedRoute {
    pub total_distance_meters: u64,
    pub total_duration_seconds: u64,
    /// Present only when every counted leg reports traffic-aware duration.
    pub total_duration_in_traffic_seconds: Option<u64>,
    pub path: Vec<Coordinate>,
    pub instructions: Vec<String>,
    pub summary: String,
    pub warnings: Vec<String>,
    pub leg_issues: Vec<LegIssue>,
}

impl NormalizedRoute {
    /// True when no leg was excluded.
    pub fn is_complete(&self) -> bool {
        self.leg_issues.is_empty()
    }

    /// Best ETA for dispatch: traffic-aware when available.
    pub fn eta_seconds(&self) -> u64 {
        self.total_duration_in_traffic_seconds
            .unwrap_or(self.total_duration_seconds)
    }

    pub fn path_length_km(&self) -> f64 {
        path_length_km(&self.path)
    }

    /// H3 cells along the path, consecutive duplicates removed.
    pub fn cells(&self, resolution: Resolution) -> Vec<CellIndex> {
        path_cells(&self.path, resolution)
    }
}

pub(super) fn normalize_route(
    route: &Route,
    config: &NormalizerConfig,
) -> Result<NormalizedRoute, NormalizeError> {
    if route.legs.is_empty() {
        return Err(NormalizeError::EmptyRoute);
    }

    let tolerance = config.coordinate_tolerance();
    let mut total_distance_meters: u64 = 0;
    let mut total_duration_seconds: u64 = 0;
    let mut traffic_seconds: Option<u64> = Some(0);
    let mut counted_legs = 0_usize;
    let mut path: Vec<Coordinate> = Vec::new();
    let mut instructions = Vec::new();
    let mut leg_issues = Vec::new();

    for (leg_idx, leg) in route.legs.iter().enumerate() {
        if !leg.status.is_ok() {
            warn!(leg = leg_idx, status = %leg.status, "excluding failed leg from route totals");
            leg_issues.push(LegIssue {
                leg_index: leg_idx,
                status: leg.status.clone(),
            });
            continue;
        }

        counted_legs += 1;
        total_distance_meters = total_distance_meters.saturating_add(leg.distance.value);
        total_duration_seconds = total_duration_seconds.saturating_add(leg.duration.value);
        traffic_seconds = match (traffic_seconds, &leg.duration_in_traffic) {
            (Some(sum), Some(in_traffic)) => Some(sum.saturating_add(in_traffic.value)),
            _ => None,
        };

        for (step_idx, step) in leg.steps.iter().enumerate() {
            let points = Polyline::with_precision(&step.polyline, config.polyline_precision)
                .decode()
                .map_err(|source| NormalizeError::MalformedPolyline {
                    path: format!("legs[{leg_idx}].steps[{step_idx}].polyline.points"),
                    source,
                })?;
            append_path(&mut path, points, tolerance);
            instructions.extend(strip_instruction_markup(&step.html_instructions));
        }
    }

    // The overview covers failed legs as well; only use it when none failed.
    if path.is_empty() && config.overview_fallback && leg_issues.is_empty() {
        path = Polyline::with_precision(&route.overview_polyline, config.polyline_precision)
            .decode()
            .map_err(|source| NormalizeError::MalformedPolyline {
                path: "overview_polyline.points".to_string(),
                source,
            })?;
    }

    if total_distance_meters > 0 && path.len() < 2 {
        return Err(NormalizeError::DegeneratePath {
            points: path.len(),
            distance_meters: total_distance_meters,
        });
    }

    Ok(NormalizedRoute {
        total_distance_meters,
        total_duration_seconds,
        total_duration_in_traffic_seconds: traffic_seconds.filter(|_| counted_legs > 0),
        path,
        instructions,
        summary: route.summary.clone(),
        warnings: route.warnings.clone(),
        leg_issues,
    })
}

/// Append `points`, skipping the first one when it repeats the current end.
fn append_path(path: &mut Vec<Coordinate>, points: Vec<Coordinate>, tolerance: f64) {
    let repeats_end = match (path.last(), points.first()) {
        (Some(last), Some(first)) => last.approx_eq(first, tolerance),
        _ => false,
    };
    path.extend(points.into_iter().skip(usize::from(repeats_end)));
}
