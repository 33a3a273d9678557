//! Typed records produced by the response decoder.
//!
//! These mirror the Directions and Distance Matrix payloads one-to-one, but
//! with required fields resolved and statuses parsed. They are constructed
//! once per response and never mutated.

use serde::Serialize;

use crate::coordinate::Coordinate;
use crate::status::ApiStatus;

/// A display label paired with its numeric value (metres or seconds).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TextValue {
    pub text: String,
    pub value: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DirectionsResult {
    pub status: ApiStatus,
    pub error_message: Option<String>,
    pub routes: Vec<Route>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Route {
    pub summary: String,
    pub legs: Vec<Leg>,
    /// Encoded polyline approximating the whole route.
    pub overview_polyline: String,
    pub warnings: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Leg {
    /// Per-leg status. The Directions API omits it, which means OK.
    pub status: ApiStatus,
    pub distance: TextValue,
    pub duration: TextValue,
    pub duration_in_traffic: Option<TextValue>,
    pub start_address: String,
    pub end_address: String,
    pub start_location: Option<Coordinate>,
    pub end_location: Option<Coordinate>,
    pub steps: Vec<Step>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Step {
    pub distance: TextValue,
    pub duration: TextValue,
    /// Instruction text with HTML markup, as sent by the API.
    pub html_instructions: String,
    /// Encoded polyline for this step.
    pub polyline: String,
    pub start_location: Coordinate,
    pub end_location: Coordinate,
    pub travel_mode: Option<String>,
    pub maneuver: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DistanceMatrixResult {
    pub status: ApiStatus,
    pub error_message: Option<String>,
    pub origin_addresses: Vec<String>,
    pub destination_addresses: Vec<String>,
    pub rows: Vec<Row>,
}

/// One origin's results; `elements[i]` belongs to destination `i`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Row {
    pub elements: Vec<Element>,
}

/// Distance and duration are present whenever `status` is OK.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Element {
    pub status: ApiStatus,
    pub distance: Option<TextValue>,
    pub duration: Option<TextValue>,
    pub duration_in_traffic: Option<TextValue>,
}
