mod support;

use h3o::Resolution;
use route_core::decode::decode_directions;
use route_core::normalize::normalize_directions;
use route_core::provider::route_from_json;
use route_core::test_helpers::{directions_error_json, directions_json, test_path};
use route_core::{
    decode, ApiStatus, DecodeError, DecodedResponse, NormalizeError, NormalizerConfig,
    PolylineError, ResponseKind, RouteError,
};

use support::init_tracing;

#[test]
fn raw_payload_normalizes_end_to_end() {
    init_tracing();
    let path = test_path();
    let payload = directions_json(&[&path[..3], &path[2..]]);

    let route = route_from_json(&payload, &NormalizerConfig::default()).expect("route");

    assert_eq!(route.path.len(), path.len());
    for (got, want) in route.path.iter().zip(&path) {
        assert!(got.approx_eq(want, 1e-5));
    }
    assert_eq!(route.instructions.len(), 4);
    assert_eq!(route.summary, "Test route");
    assert!(route.is_complete());
    assert!(route.path_length_km() > 2.5 && route.path_length_km() < 4.0);
}

#[test]
fn total_distance_equals_sum_of_leg_values() {
    init_tracing();
    let path = test_path();
    let payload = directions_json(&[&path[..2], &path[1..4], &path[3..]]);

    let decoded = decode_directions(&payload).expect("decodes");
    let leg_sum: u64 = decoded.routes[0].legs.iter().map(|leg| leg.distance.value).sum();
    let duration_sum: u64 = decoded.routes[0].legs.iter().map(|leg| leg.duration.value).sum();

    let route = normalize_directions(&decoded, &NormalizerConfig::default()).expect("route");
    assert_eq!(route.total_distance_meters, leg_sum);
    assert_eq!(route.total_duration_seconds, duration_sum);
}

#[test]
fn zero_results_never_reaches_normalizer() {
    init_tracing();
    let payload = br#"{"status": "ZERO_RESULTS", "routes": {"legs": "garbage"}}"#;

    match route_from_json(payload, &NormalizerConfig::default()) {
        Err(RouteError::Decode(DecodeError::ApiStatus { status, message })) => {
            assert_eq!(status, ApiStatus::ZeroResults);
            assert_eq!(message, None);
        }
        other => panic!("expected ApiStatus error, got {other:?}"),
    }
}

#[test]
fn api_error_message_is_surfaced() {
    init_tracing();
    let payload = directions_error_json("OVER_QUERY_LIMIT", Some("You have exceeded your rate-limit."));

    let err = route_from_json(&payload, &NormalizerConfig::default()).expect_err("fails");
    assert!(err.is_retryable());
    assert!(err.to_string().contains("exceeded your rate-limit"));
}

#[test]
fn truncated_step_polyline_fails_whole_route() {
    init_tracing();
    let payload = br#"{
        "status": "OK",
        "routes": [{
            "legs": [{
                "distance": {"text": "1 km", "value": 1000},
                "duration": {"text": "2 mins", "value": 120},
                "steps": [{
                    "distance": {"text": "1 km", "value": 1000},
                    "duration": {"text": "2 mins", "value": 120},
                    "html_instructions": "Go",
                    "polyline": {"points": "_p~iF~ps|U_ulLnnqC_mqNvxq`"},
                    "start_location": {"lat": 38.5, "lng": -120.2},
                    "end_location": {"lat": 43.252, "lng": -126.453}
                }]
            }]
        }]
    }"#;

    match route_from_json(payload, &NormalizerConfig::default()) {
        Err(RouteError::Normalize(NormalizeError::MalformedPolyline { path, source })) => {
            assert_eq!(path, "routes[0].legs[0].steps[0].polyline.points");
            assert!(matches!(source, PolylineError::Truncated { .. }));
        }
        other => panic!("expected MalformedPolyline, got {other:?}"),
    }
}

#[test]
fn unknown_fields_are_ignored() {
    init_tracing();
    let payload = br#"{
        "status": "OK",
        "available_travel_modes": ["DRIVING"],
        "routes": [{
            "bounds": {"northeast": {"lat": 1, "lng": 1}},
            "legs": [{
                "distance": {"text": "1 km", "value": 1000},
                "duration": {"text": "2 mins", "value": 120},
                "via_waypoint": [],
                "steps": []
            }],
            "overview_polyline": {"points": "_p~iF~ps|U_ulLnnqC"}
        }]
    }"#;

    let route = route_from_json(payload, &NormalizerConfig::default()).expect("route");
    assert_eq!(route.total_distance_meters, 1000);
    // No steps: the overview polyline stands in for the path.
    assert_eq!(route.path.len(), 2);
}

#[test]
fn decode_by_kind_feeds_normalizer() {
    init_tracing();
    let path = test_path();
    let payload = directions_json(&[&path[..]]);

    let DecodedResponse::Directions(result) =
        decode(&payload, ResponseKind::Directions).expect("decodes")
    else {
        panic!("expected directions");
    };
    let route = normalize_directions(&result, &NormalizerConfig::default()).expect("route");

    let cells = route.cells(Resolution::Nine);
    assert!(cells.len() >= 2);
    assert_ne!(cells.first(), cells.last());
}

#[test]
fn stepless_leg_without_overview_is_degenerate() {
    init_tracing();
    let payload = br#"{
        "status": "OK",
        "routes": [{
            "legs": [{
                "distance": {"text": "5 km", "value": 5000},
                "duration": {"text": "9 mins", "value": 540},
                "steps": []
            }]
        }]
    }"#;

    assert!(matches!(
        route_from_json(payload, &NormalizerConfig::default()),
        Err(RouteError::Normalize(NormalizeError::DegeneratePath {
            points: 0,
            distance_meters: 5000
        }))
    ));
}
