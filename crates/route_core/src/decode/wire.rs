//! Wire shapes of the Directions and Distance Matrix JSON bodies.
//!
//! Every field is optional here; required-ness is decided in the parser so a
//! missing field can be reported with its full JSON path. Unknown fields are
//! ignored.

use serde::Deserialize;

#[derive(Deserialize)]
pub(super) struct StatusEnvelope {
    pub(super) status: Option<String>,
    pub(super) error_message: Option<String>,
}

#[derive(Deserialize)]
pub(super) struct WireDirections {
    pub(super) routes: Option<Vec<WireRoute>>,
}

#[derive(Deserialize)]
pub(super) struct WireRoute {
    pub(super) summary: Option<String>,
    pub(super) legs: Option<Vec<WireLeg>>,
    pub(super) overview_polyline: Option<WirePolyline>,
    pub(super) warnings: Option<Vec<String>>,
}

#[derive(Deserialize)]
pub(super) struct WireLeg {
    pub(super) status: Option<String>,
    pub(super) distance: Option<WireTextValue>,
    pub(super) duration: Option<WireTextValue>,
    pub(super) duration_in_traffic: Option<WireTextValue>,
    pub(super) start_address: Option<String>,
    pub(super) end_address: Option<String>,
    pub(super) start_location: Option<WireLatLng>,
    pub(super) end_location: Option<WireLatLng>,
    pub(super) steps: Option<Vec<WireStep>>,
}

#[derive(Deserialize)]
pub(super) struct WireStep {
    pub(super) distance: Option<WireTextValue>,
    pub(super) duration: Option<WireTextValue>,
    pub(super) html_instructions: Option<String>,
    pub(super) polyline: Option<WirePolyline>,
    pub(super) start_location: Option<WireLatLng>,
    pub(super) end_location: Option<WireLatLng>,
    pub(super) travel_mode: Option<String>,
    pub(super) maneuver: Option<String>,
}

#[derive(Deserialize)]
pub(super) struct WireTextValue {
    pub(super) text: Option<String>,
    pub(super) value: Option<u64>,
}

#[derive(Deserialize)]
pub(super) struct WireLatLng {
    pub(super) lat: Option<f64>,
    pub(super) lng: Option<f64>,
}

#[derive(Deserialize)]
pub(super) struct WirePolyline {
    pub(super) points: Option<String>,
}

#[derive(Deserialize)]
pub(super) struct WireDistanceMatrix {
    pub(super) origin_addresses: Option<Vec<String>>,
    pub(super) destination_addresses: Option<Vec<String>>,
    pub(super) rows: Option<Vec<WireRow>>,
}

#[derive(Deserialize)]
pub(super) struct WireRow {
    pub(super) elements: Option<Vec<WireElement>>,
}

#[derive(Deserialize)]
pub(super) struct WireElement {
    pub(super) status: Option<String>,
    pub(super) distance: Option<WireTextValue>,
    pub(super) duration: Option<WireTextValue>,
    pub(super) duration_in_traffic: Option<WireTextValue>,
}
