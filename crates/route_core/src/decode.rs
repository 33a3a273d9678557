//! Response decoder: raw Directions / Distance Matrix bodies → typed records.
//!
//! The top-level `status` is checked before anything else. A non-`OK` status
//! short-circuits into [`DecodeError::ApiStatus`] and the `routes` / `rows`
//! payload is never read, so an error body with a missing or garbled payload
//! still yields the API's own status and message.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::model::{DirectionsResult, DistanceMatrixResult};
use crate::status::ApiStatus;

mod error;
mod parser;
#[cfg(test)]
mod tests;
mod wire;

pub use error::DecodeError;

use wire::{StatusEnvelope, WireDirections, WireDistanceMatrix};

/// Which API produced a response body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    Directions,
    DistanceMatrix,
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Directions => f.write_str("directions"),
            Self::DistanceMatrix => f.write_str("distance matrix"),
        }
    }
}

/// Output of [`decode`], tagged by kind.
#[derive(Clone, Debug, PartialEq)]
pub enum DecodedResponse {
    Directions(DirectionsResult),
    DistanceMatrix(DistanceMatrixResult),
}

impl DecodedResponse {
    pub fn kind(&self) -> ResponseKind {
        match self {
            Self::Directions(_) => ResponseKind::Directions,
            Self::DistanceMatrix(_) => ResponseKind::DistanceMatrix,
        }
    }
}

/// Decode `bytes` as a response of the declared `kind`.
pub fn decode(bytes: &[u8], kind: ResponseKind) -> Result<DecodedResponse, DecodeError> {
    match kind {
        ResponseKind::Directions => decode_directions(bytes).map(DecodedResponse::Directions),
        ResponseKind::DistanceMatrix => {
            decode_distance_matrix(bytes).map(DecodedResponse::DistanceMatrix)
        }
    }
}

pub fn decode_directions(bytes: &[u8]) -> Result<DirectionsResult, DecodeError> {
    let kind = ResponseKind::Directions;
    let value = parse_object(bytes)?;
    let error_message = check_status(&value, kind)?;

    let wire: WireDirections = deserialize_wire(&value, kind)?;
    let result = parser::parse_directions(wire, error_message)?;

    debug!(routes = result.routes.len(), "decoded directions response");
    Ok(result)
}

pub fn decode_distance_matrix(bytes: &[u8]) -> Result<DistanceMatrixResult, DecodeError> {
    let kind = ResponseKind::DistanceMatrix;
    let value = parse_object(bytes)?;
    let error_message = check_status(&value, kind)?;

    let wire: WireDistanceMatrix = deserialize_wire(&value, kind)?;
    let result = parser::parse_distance_matrix(wire, error_message)?;

    debug!(
        rows = result.rows.len(),
        "decoded distance matrix response"
    );
    Ok(result)
}

fn parse_object(bytes: &[u8]) -> Result<Value, DecodeError> {
    let value: Value = serde_json::from_slice(bytes).map_err(DecodeError::InvalidJson)?;
    if !value.is_object() {
        return Err(DecodeError::NotAnObject);
    }
    Ok(value)
}

/// Deserialize a wire shape, keeping the JSON path of a type mismatch.
fn deserialize_wire<'de, T: Deserialize<'de>>(
    value: &'de Value,
    kind: ResponseKind,
) -> Result<T, DecodeError> {
    serde_path_to_error::deserialize(value).map_err(|err| DecodeError::InvalidField {
        kind,
        path: err.path().to_string(),
        source: err.into_inner(),
    })
}

/// Returns the `error_message` of an `OK` response.
fn check_status(value: &Value, kind: ResponseKind) -> Result<Option<String>, DecodeError> {
    let envelope: StatusEnvelope = deserialize_wire(value, kind)?;
    let status = envelope
        .status
        .as_deref()
        .map(ApiStatus::parse)
        .ok_or_else(|| DecodeError::missing("status"))?;

    if !status.is_ok() {
        debug!(%kind, %status, "API returned non-OK status");
        return Err(DecodeError::ApiStatus {
            status,
            message: envelope.error_message,
        });
    }
    Ok(envelope.error_message)
}
