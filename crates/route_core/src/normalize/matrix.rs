use std::collections::BTreeMap;

use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;
use tracing::warn;

use super::NormalizeError;
use crate::model::DistanceMatrixResult;
use crate::status::ApiStatus;

/// Origin and destination counts of the request that produced a matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixShape {
    pub origins: usize,
    pub destinations: usize,
}

impl MatrixShape {
    pub fn new(origins: usize, destinations: usize) -> Self {
        Self {
            origins,
            destinations,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NormalizedMatrixCell {
    pub status: ApiStatus,
    pub distance_meters: u64,
    pub duration_seconds: u64,
    pub duration_in_traffic_seconds: Option<u64>,
}

impl NormalizedMatrixCell {
    /// Traffic-aware duration when the API supplied one.
    pub fn eta_seconds(&self) -> u64 {
        self.duration_in_traffic_seconds
            .unwrap_or(self.duration_seconds)
    }
}

/// A single origin/destination pair the API could not serve. Collected
/// alongside the successful cells rather than failing the whole matrix.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Error)]
#[error("no result from origin {origin} to destination {destination}: {status}")]
pub struct ElementStatusError {
    pub origin: usize,
    pub destination: usize,
    pub status: ApiStatus,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NormalizedMatrix {
    pub origins: usize,
    pub destinations: usize,
    #[serde(serialize_with = "serialize_cells")]
    pub cells: BTreeMap<(usize, usize), NormalizedMatrixCell>,
    pub errors: Vec<ElementStatusError>,
}

impl NormalizedMatrix {
    pub fn shape(&self) -> MatrixShape {
        MatrixShape::new(self.origins, self.destinations)
    }

    pub fn cell(&self, origin: usize, destination: usize) -> Option<&NormalizedMatrixCell> {
        self.cells.get(&(origin, destination))
    }

    pub fn error(&self, origin: usize, destination: usize) -> Option<&ElementStatusError> {
        self.errors
            .iter()
            .find(|err| err.origin == origin && err.destination == destination)
    }

    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    /// The origin reaching `destination` fastest, ties going to the lower index.
    pub fn nearest_origin(&self, destination: usize) -> Option<(usize, &NormalizedMatrixCell)> {
        self.cells
            .iter()
            .filter(|((_, dest), _)| *dest == destination)
            .min_by_key(|((origin, _), cell)| (cell.eta_seconds(), *origin))
            .map(|((origin, _), cell)| (*origin, cell))
    }
}

pub(super) fn normalize_distance_matrix(
    result: &DistanceMatrixResult,
    shape: Option<MatrixShape>,
) -> Result<NormalizedMatrix, NormalizeError> {
    if result.rows.is_empty() {
        return Err(NormalizeError::EmptyMatrix);
    }

    let expected = shape.unwrap_or_else(|| infer_shape(result));
    if result.rows.len() != expected.origins {
        return Err(NormalizeError::RowCountMismatch {
            expected: expected.origins,
            found: result.rows.len(),
        });
    }

    let mut cells = BTreeMap::new();
    let mut errors = Vec::new();

    for (origin, row) in result.rows.iter().enumerate() {
        if row.elements.len() != expected.destinations {
            return Err(NormalizeError::ElementCountMismatch {
                row: origin,
                expected: expected.destinations,
                found: row.elements.len(),
            });
        }

        for (destination, element) in row.elements.iter().enumerate() {
            if !element.status.is_ok() {
                warn!(origin, destination, status = %element.status, "matrix element failed");
                errors.push(ElementStatusError {
                    origin,
                    destination,
                    status: element.status.clone(),
                });
                continue;
            }

            let (Some(distance), Some(duration)) = (&element.distance, &element.duration) else {
                return Err(NormalizeError::MissingElementValues {
                    origin,
                    destination,
                });
            };
            cells.insert(
                (origin, destination),
                NormalizedMatrixCell {
                    status: ApiStatus::Ok,
                    distance_meters: distance.value,
                    duration_seconds: duration.value,
                    duration_in_traffic_seconds: element
                        .duration_in_traffic
                        .as_ref()
                        .map(|d| d.value),
                },
            );
        }
    }

    Ok(NormalizedMatrix {
        origins: expected.origins,
        destinations: expected.destinations,
        cells,
        errors,
    })
}

/// Without request context, trust the echoed address lists, then the first row.
fn infer_shape(result: &DistanceMatrixResult) -> MatrixShape {
    let origins = if result.origin_addresses.is_empty() {
        result.rows.len()
    } else {
        result.origin_addresses.len()
    };
    let destinations = if result.destination_addresses.is_empty() {
        result.rows.first().map_or(0, |row| row.elements.len())
    } else {
        result.destination_addresses.len()
    };
    MatrixShape::new(origins, destinations)
}

#[derive(Serialize)]
struct CellEntry<'a> {
    origin: usize,
    destination: usize,
    #[serde(flatten)]
    cell: &'a NormalizedMatrixCell,
}

fn serialize_cells<S: Serializer>(
    cells: &BTreeMap<(usize, usize), NormalizedMatrixCell>,
    ser: S,
) -> Result<S::Ok, S::Error> {
    let mut seq = ser.serialize_seq(Some(cells.len()))?;
    for (&(origin, destination), cell) in cells {
        seq.serialize_element(&CellEntry {
            origin,
            destination,
            cell,
        })?;
    }
    seq.end()
}
