use serde_json::{json, Value};

use super::{decode, decode_directions, decode_distance_matrix, DecodeError, ResponseKind};
use crate::coordinate::Coordinate;
use crate::status::ApiStatus;

fn bytes(value: Value) -> Vec<u8> {
    serde_json::to_vec(&value).expect("serializable fixture")
}

fn step(polyline: &str) -> Value {
    json!({
        "distance": { "text": "0.2 km", "value": 200 },
        "duration": { "text": "1 min", "value": 45 },
        "html_instructions": "Head <b>north</b>",
        "polyline": { "points": polyline },
        "start_location": { "lat": 38.5, "lng": -120.2 },
        "end_location": { "lat": 40.7, "lng": -120.95 },
        "travel_mode": "DRIVING"
    })
}

fn directions(legs: Value) -> Value {
    json!({
        "status": "OK",
        "geocoded_waypoints": [],
        "routes": [{
            "summary": "I-5 N",
            "legs": legs,
            "overview_polyline": { "points": "_p~iF~ps|U" },
            "warnings": [],
            "copyrights": "Map data"
        }]
    })
}

fn missing_path(err: DecodeError) -> String {
    match err {
        DecodeError::MissingField { path } => path,
        other => panic!("expected MissingField, got {other:?}"),
    }
}

#[test]
fn decodes_directions_with_legs_and_steps() {
    let payload = directions(json!([{
        "distance": { "text": "1.2 km", "value": 1200 },
        "duration": { "text": "4 mins", "value": 240 },
        "start_address": "A St",
        "end_address": "B Ave",
        "start_location": { "lat": 38.5, "lng": -120.2 },
        "steps": [step("_p~iF~ps|U")]
    }]));

    let result = decode_directions(&bytes(payload)).expect("decodes");
    assert_eq!(result.status, ApiStatus::Ok);
    assert_eq!(result.routes.len(), 1);

    let route = &result.routes[0];
    assert_eq!(route.summary, "I-5 N");
    assert_eq!(route.overview_polyline, "_p~iF~ps|U");

    let leg = &route.legs[0];
    assert_eq!(leg.status, ApiStatus::Ok);
    assert_eq!(leg.distance.value, 1200);
    assert_eq!(leg.duration.text, "4 mins");
    assert_eq!(leg.start_location, Some(Coordinate::new(38.5, -120.2)));
    assert_eq!(leg.end_location, None);
    assert_eq!(leg.steps[0].travel_mode.as_deref(), Some("DRIVING"));
    assert_eq!(leg.steps[0].html_instructions, "Head <b>north</b>");
}

#[test]
fn non_ok_status_skips_payload() {
    let payload = json!({
        "status": "ZERO_RESULTS",
        "routes": "not an array"
    });

    let err = decode_directions(&bytes(payload)).expect_err("must fail");
    assert!(matches!(
        err,
        DecodeError::ApiStatus { status: ApiStatus::ZeroResults, message: None }
    ));
}

#[test]
fn non_ok_status_carries_error_message() {
    let payload = json!({
        "status": "REQUEST_DENIED",
        "error_message": "The provided API key is invalid."
    });

    match decode_distance_matrix(&bytes(payload)) {
        Err(DecodeError::ApiStatus { status, message }) => {
            assert_eq!(status, ApiStatus::RequestDenied);
            assert_eq!(message.as_deref(), Some("The provided API key is invalid."));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn missing_status_is_reported() {
    let err = decode_directions(&bytes(json!({ "routes": [] }))).expect_err("must fail");
    assert_eq!(missing_path(err), "status");
}

#[test]
fn missing_routes_is_reported() {
    let err = decode_directions(&bytes(json!({ "status": "OK" }))).expect_err("must fail");
    assert_eq!(missing_path(err), "routes");
}

#[test]
fn half_present_text_value_names_missing_half() {
    let payload = directions(json!([{
        "distance": { "text": "1.2 km" },
        "duration": { "text": "4 mins", "value": 240 },
        "steps": []
    }]));

    let err = decode_directions(&bytes(payload)).expect_err("must fail");
    assert_eq!(missing_path(err), "routes[0].legs[0].distance.value");
}

#[test]
fn missing_step_polyline_reports_full_path() {
    let mut broken = step("_p~iF~ps|U");
    broken
        .as_object_mut()
        .expect("object fixture")
        .remove("polyline");

    let payload = directions(json!([{
        "distance": { "text": "1.2 km", "value": 1200 },
        "duration": { "text": "4 mins", "value": 240 },
        "steps": [step("_p~iF~ps|U"), broken]
    }]));

    let err = decode_directions(&bytes(payload)).expect_err("must fail");
    assert_eq!(missing_path(err), "routes[0].legs[0].steps[1].polyline.points");
}

#[test]
fn rejects_invalid_json_and_non_objects() {
    assert!(matches!(
        decode_directions(b"{\"status\":"),
        Err(DecodeError::InvalidJson(_))
    ));
    assert!(matches!(
        decode_directions(b"[\"OK\"]"),
        Err(DecodeError::NotAnObject)
    ));
}

#[test]
fn wrong_field_type_reports_its_path() {
    let payload = directions(json!([{
        "distance": { "text": "1.2 km", "value": "far" },
        "duration": { "text": "4 mins", "value": 240 }
    }]));

    match decode_directions(&bytes(payload)) {
        Err(DecodeError::InvalidField { kind, path, .. }) => {
            assert_eq!(kind, ResponseKind::Directions);
            assert_eq!(path, "routes[0].legs[0].distance.value");
        }
        other => panic!("expected InvalidField, got {other:?}"),
    }
}

#[test]
fn wrong_container_type_reports_its_path() {
    let payload = json!({
        "status": "OK",
        "rows": [{ "elements": [] }, { "elements": 7 }]
    });

    match decode_distance_matrix(&bytes(payload)) {
        Err(DecodeError::InvalidField { kind, path, .. }) => {
            assert_eq!(kind, ResponseKind::DistanceMatrix);
            assert_eq!(path, "rows[1].elements");
        }
        other => panic!("expected InvalidField, got {other:?}"),
    }
}

#[test]
fn matrix_element_failures_are_not_fatal() {
    let payload = json!({
        "status": "OK",
        "origin_addresses": ["Origin"],
        "destination_addresses": ["D1", "D2"],
        "rows": [{
            "elements": [
                {
                    "status": "OK",
                    "distance": { "text": "5 km", "value": 5000 },
                    "duration": { "text": "9 mins", "value": 540 }
                },
                { "status": "NOT_FOUND" }
            ]
        }]
    });

    let result = decode_distance_matrix(&bytes(payload)).expect("decodes");
    assert_eq!(result.destination_addresses.len(), 2);
    let elements = &result.rows[0].elements;
    assert_eq!(elements[0].distance.as_ref().map(|d| d.value), Some(5000));
    assert_eq!(elements[1].status, ApiStatus::NotFound);
    assert!(elements[1].distance.is_none());
}

#[test]
fn failed_element_with_partial_values_does_not_sink_the_matrix() {
    let payload = json!({
        "status": "OK",
        "rows": [{
            "elements": [
                {
                    "status": "OK",
                    "distance": { "text": "5 km", "value": 5000 },
                    "duration": { "text": "9 mins", "value": 540 }
                },
                { "status": "ZERO_RESULTS", "distance": { "text": "n/a" } }
            ]
        }]
    });

    let result = decode_distance_matrix(&bytes(payload)).expect("decodes");
    let elements = &result.rows[0].elements;
    assert_eq!(elements[0].duration.as_ref().map(|d| d.value), Some(540));
    assert_eq!(elements[1].status, ApiStatus::ZeroResults);
    assert!(elements[1].distance.is_none());
}

#[test]
fn ok_matrix_element_requires_duration() {
    let payload = json!({
        "status": "OK",
        "rows": [{
            "elements": [{
                "status": "OK",
                "distance": { "text": "5 km", "value": 5000 }
            }]
        }]
    });

    let err = decode_distance_matrix(&bytes(payload)).expect_err("must fail");
    assert_eq!(missing_path(err), "rows[0].elements[0].duration");
}

#[test]
fn decode_dispatches_on_kind() {
    let payload = bytes(json!({ "status": "OK", "rows": [] }));
    let decoded = decode(&payload, ResponseKind::DistanceMatrix).expect("decodes");
    assert_eq!(decoded.kind(), ResponseKind::DistanceMatrix);
}
