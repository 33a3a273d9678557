//! Fixture builders shared by unit tests, integration tests and benchmarks.
//!
//! Builders produce both typed records and the raw JSON the API would send,
//! with polylines encoded from real coordinates so decoding is exercised.

use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::{json, Value};

use crate::coordinate::Coordinate;
use crate::error::FetchError;
use crate::model::{DirectionsResult, Leg, Route, Step, TextValue};
use crate::polyline::encode_polyline;
use crate::provider::PayloadFetcher;
use crate::status::ApiStatus;

/// Berlin Hauptbahnhof.
pub const TEST_ORIGIN: Coordinate = Coordinate::new(52.52508, 13.36941);
/// Alexanderplatz.
pub const TEST_DESTINATION: Coordinate = Coordinate::new(52.52192, 13.41321);

/// Assumed 30 km/h average city speed for fixture durations.
const FIXTURE_SPEED_M_PER_S: f64 = 30.0 / 3.6;

/// A short drive from [`TEST_ORIGIN`] to [`TEST_DESTINATION`].
pub fn test_path() -> Vec<Coordinate> {
    vec![
        TEST_ORIGIN,
        Coordinate::new(52.52366, 13.37921),
        Coordinate::new(52.52193, 13.38853),
        Coordinate::new(52.52014, 13.40140),
        TEST_DESTINATION,
    ]
}

pub fn text_value(text: &str, value: u64) -> TextValue {
    TextValue {
        text: text.to_string(),
        value,
    }
}

fn distance_m(from: Coordinate, to: Coordinate) -> u64 {
    (from.haversine_km(&to) * 1000.0).round() as u64
}

fn duration_s(meters: u64) -> u64 {
    (meters as f64 / FIXTURE_SPEED_M_PER_S).round() as u64
}

/// A straight step between two points.
pub fn step(from: Coordinate, to: Coordinate, html_instructions: &str) -> Step {
    let meters = distance_m(from, to);
    Step {
        distance: text_value(&format!("{meters} m"), meters),
        duration: text_value(&format!("{} s", duration_s(meters)), duration_s(meters)),
        html_instructions: html_instructions.to_string(),
        polyline: encode_polyline(&[from, to]),
        start_location: from,
        end_location: to,
        travel_mode: Some("DRIVING".to_string()),
        maneuver: None,
    }
}

/// A leg visiting `points` in order, one step per consecutive pair.
/// Leg totals are the sums of the step values.
pub fn leg(points: &[Coordinate]) -> Leg {
    let steps: Vec<Step> = points
        .windows(2)
        .enumerate()
        .map(|(idx, w)| step(w[0], w[1], &format!("Continue <b>segment {idx}</b>")))
        .collect();
    let meters: u64 = steps.iter().map(|s| s.distance.value).sum();
    let seconds: u64 = steps.iter().map(|s| s.duration.value).sum();

    Leg {
        status: ApiStatus::Ok,
        distance: text_value(&format!("{meters} m"), meters),
        duration: text_value(&format!("{seconds} s"), seconds),
        duration_in_traffic: None,
        start_address: String::new(),
        end_address: String::new(),
        start_location: points.first().copied(),
        end_location: points.last().copied(),
        steps,
    }
}

pub fn route(legs: Vec<Leg>) -> Route {
    let overview: Vec<Coordinate> = legs
        .iter()
        .flat_map(|leg| leg.steps.iter())
        .flat_map(|step| [step.start_location, step.end_location])
        .collect();
    Route {
        summary: "Test route".to_string(),
        legs,
        overview_polyline: encode_polyline(&overview),
        warnings: Vec::new(),
    }
}

pub fn directions(routes: Vec<Route>) -> DirectionsResult {
    DirectionsResult {
        status: ApiStatus::Ok,
        error_message: None,
        routes,
    }
}

fn text_value_json(value: &TextValue) -> Value {
    json!({ "text": value.text, "value": value.value })
}

fn lat_lng_json(coordinate: Coordinate) -> Value {
    json!({ "lat": coordinate.lat, "lng": coordinate.lng })
}

fn leg_json(leg: &Leg) -> Value {
    let steps: Vec<Value> = leg
        .steps
        .iter()
        .map(|step| {
            json!({
                "distance": text_value_json(&step.distance),
                "duration": text_value_json(&step.duration),
                "html_instructions": step.html_instructions,
                "polyline": { "points": step.polyline },
                "start_location": lat_lng_json(step.start_location),
                "end_location": lat_lng_json(step.end_location),
                "travel_mode": step.travel_mode,
            })
        })
        .collect();
    json!({
        "distance": text_value_json(&leg.distance),
        "duration": text_value_json(&leg.duration),
        "start_address": leg.start_address,
        "end_address": leg.end_address,
        "steps": steps,
    })
}

/// Raw Directions JSON for a single route with one leg per entry in `legs`.
pub fn directions_json(legs: &[&[Coordinate]]) -> Vec<u8> {
    let legs: Vec<Leg> = legs.iter().map(|points| leg(points)).collect();
    let route = route(legs);
    let payload = json!({
        "status": "OK",
        "geocoded_waypoints": [{ "geocoder_status": "OK" }],
        "routes": [{
            "summary": route.summary,
            "legs": route.legs.iter().map(leg_json).collect::<Vec<_>>(),
            "overview_polyline": { "points": route.overview_polyline },
            "warnings": [],
            "copyrights": "Map data ©2024",
        }],
    });
    payload.to_string().into_bytes()
}

/// Raw Directions JSON for an error response.
pub fn directions_error_json(status: &str, message: Option<&str>) -> Vec<u8> {
    let mut payload = json!({ "status": status, "routes": [] });
    if let Some(message) = message {
        payload["error_message"] = json!(message);
    }
    payload.to_string().into_bytes()
}

/// Raw Distance Matrix JSON. `None` entries become `NOT_FOUND` elements;
/// `Some((meters, seconds))` entries are OK.
pub fn matrix_json(rows: &[Vec<Option<(u64, u64)>>]) -> Vec<u8> {
    let destinations = rows.first().map_or(0, Vec::len);
    let rows: Vec<Value> = rows
        .iter()
        .map(|row| {
            let elements: Vec<Value> = row
                .iter()
                .map(|cell| match cell {
                    Some((meters, seconds)) => json!({
                        "status": "OK",
                        "distance": { "text": format!("{meters} m"), "value": meters },
                        "duration": { "text": format!("{seconds} s"), "value": seconds },
                    }),
                    None => json!({ "status": "NOT_FOUND" }),
                })
                .collect();
            json!({ "elements": elements })
        })
        .collect();
    let payload = json!({
        "status": "OK",
        "origin_addresses": (0..rows.len()).map(|i| format!("Origin {i}")).collect::<Vec<_>>(),
        "destination_addresses": (0..destinations).map(|i| format!("Destination {i}")).collect::<Vec<_>>(),
        "rows": rows,
    });
    payload.to_string().into_bytes()
}

/// Fetcher that serves canned bodies and counts how often it was asked.
pub struct StaticFetcher {
    directions: Vec<u8>,
    matrix: Vec<u8>,
    calls: AtomicUsize,
}

impl StaticFetcher {
    pub fn new(directions: Vec<u8>, matrix: Vec<u8>) -> Self {
        Self {
            directions,
            matrix,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PayloadFetcher for StaticFetcher {
    fn fetch_directions(&self, _from: Coordinate, _to: Coordinate) -> Result<Vec<u8>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.directions.clone())
    }

    fn fetch_distance_matrix(
        &self,
        _origins: &[Coordinate],
        _destinations: &[Coordinate],
    ) -> Result<Vec<u8>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.matrix.clone())
    }
}
