//! Geographic coordinates and their H3 projections.
//!
//! Coordinates are plain WGS84 degrees as returned by the mapping API. Dispatch
//! logic works on H3 cells, so this module also provides the conversions from
//! a coordinate (or a whole path) to cells at a given resolution.

use h3o::{CellIndex, LatLng, Resolution};
use serde::{Deserialize, Serialize};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 latitude/longitude pair in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// True when both components differ by at most `tolerance` degrees.
    pub fn approx_eq(&self, other: &Coordinate, tolerance: f64) -> bool {
        (self.lat - other.lat).abs() <= tolerance && (self.lng - other.lng).abs() <= tolerance
    }

    /// Convert to an h3o coordinate. Returns `None` for non-finite values.
    pub fn to_lat_lng(&self) -> Option<LatLng> {
        LatLng::new(self.lat, self.lng).ok()
    }

    /// The H3 cell containing this coordinate at `resolution`.
    pub fn to_cell(&self, resolution: Resolution) -> Option<CellIndex> {
        self.to_lat_lng().map(|ll| ll.to_cell(resolution))
    }

    /// Great-circle distance in kilometres.
    pub fn haversine_km(&self, other: &Coordinate) -> f64 {
        let (lat1, lon1) = (self.lat.to_radians(), self.lng.to_radians());
        let (lat2, lon2) = (other.lat.to_radians(), other.lng.to_radians());
        let sin_dlat = ((lat2 - lat1) * 0.5).sin();
        let sin_dlon = ((lon2 - lon1) * 0.5).sin();
        let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
        let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
        EARTH_RADIUS_KM * c
    }
}

impl From<LatLng> for Coordinate {
    fn from(ll: LatLng) -> Self {
        Self::new(ll.lat(), ll.lng())
    }
}

/// Length of a coordinate path in kilometres.
pub fn path_length_km(path: &[Coordinate]) -> f64 {
    path.windows(2).map(|w| w[0].haversine_km(&w[1])).sum()
}

/// H3 cells visited by `path` at `resolution`, with consecutive duplicates removed.
///
/// Coordinates that cannot be projected (non-finite) are skipped.
pub fn path_cells(path: &[Coordinate], resolution: Resolution) -> Vec<CellIndex> {
    let mut cells: Vec<CellIndex> = Vec::with_capacity(path.len());
    for cell in path.iter().filter_map(|c| c.to_cell(resolution)) {
        if cells.last() != Some(&cell) {
            cells.push(cell);
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_matches_known_distance() {
        // Berlin Hbf to Alexanderplatz, roughly 3 km.
        let hbf = Coordinate::new(52.5251, 13.3694);
        let alex = Coordinate::new(52.5219, 13.4132);
        let km = hbf.haversine_km(&alex);
        assert!((km - 2.99).abs() < 0.1, "got {km}");
    }

    #[test]
    fn path_cells_dedupes_consecutive_cells() {
        let a = Coordinate::new(52.5200, 13.4050);
        let far = Coordinate::new(52.6000, 13.5000);
        let path = vec![a, a, far, far, a];
        let cells = path_cells(&path, Resolution::Nine);
        assert_eq!(cells.len(), 3);
        assert_eq!(cells[0], cells[2]);
    }

    #[test]
    fn non_finite_coordinate_has_no_cell() {
        let bad = Coordinate::new(f64::NAN, 13.0);
        assert!(bad.to_cell(Resolution::Nine).is_none());
    }

    #[test]
    fn path_length_of_single_point_is_zero() {
        assert_eq!(path_length_km(&[Coordinate::new(1.0, 1.0)]), 0.0);
    }
}
