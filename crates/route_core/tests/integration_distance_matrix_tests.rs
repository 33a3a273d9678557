mod support;

use route_core::decode::decode_distance_matrix;
use route_core::normalize::normalize_distance_matrix;
use route_core::provider::matrix_from_json;
use route_core::test_helpers::matrix_json;
use route_core::{ApiStatus, DecodeError, MatrixShape, NormalizeError, RouteError};

use support::init_tracing;

#[test]
fn one_origin_two_destinations_with_not_found() {
    init_tracing();
    let payload = matrix_json(&[vec![Some((4200, 600)), None]]);

    let matrix = matrix_from_json(&payload, Some(MatrixShape::new(1, 2))).expect("matrix");

    assert_eq!(matrix.cells.len(), 1);
    let cell = matrix.cell(0, 0).expect("ok cell");
    assert_eq!(cell.distance_meters, 4200);
    assert_eq!(cell.duration_seconds, 600);

    assert_eq!(matrix.errors.len(), 1);
    assert_eq!(matrix.errors[0].destination, 1);
    assert_eq!(matrix.errors[0].status, ApiStatus::NotFound);
    assert!(!matrix.is_complete());
}

#[test]
fn shape_defaults_to_echoed_addresses() {
    init_tracing();
    let payload = matrix_json(&[
        vec![Some((100, 10)), Some((200, 20)), None],
        vec![None, Some((300, 30)), Some((400, 40))],
    ]);

    let decoded = decode_distance_matrix(&payload).expect("decodes");
    assert_eq!(decoded.origin_addresses.len(), 2);
    assert_eq!(decoded.destination_addresses.len(), 3);

    let matrix = normalize_distance_matrix(&decoded, None).expect("matrix");
    assert_eq!(matrix.shape(), MatrixShape::new(2, 3));
    assert_eq!(matrix.cells.len(), 4);
    assert_eq!(matrix.errors.len(), 2);
    assert_eq!(matrix.nearest_origin(1).map(|(origin, _)| origin), Some(0));
}

#[test]
fn request_shape_mismatch_is_fatal() {
    init_tracing();
    let payload = matrix_json(&[vec![Some((100, 10))]]);

    match matrix_from_json(&payload, Some(MatrixShape::new(1, 2))) {
        Err(RouteError::Normalize(NormalizeError::ElementCountMismatch {
            row,
            expected,
            found,
        })) => {
            assert_eq!((row, expected, found), (0, 2, 1));
        }
        other => panic!("expected ElementCountMismatch, got {other:?}"),
    }
}

#[test]
fn top_level_failure_short_circuits() {
    init_tracing();
    let payload = br#"{"status": "MAX_ELEMENTS_EXCEEDED", "error_message": "Too many elements"}"#;

    match matrix_from_json(payload, None) {
        Err(RouteError::Decode(DecodeError::ApiStatus { status, message })) => {
            assert_eq!(status, ApiStatus::MaxElementsExceeded);
            assert_eq!(message.as_deref(), Some("Too many elements"));
        }
        other => panic!("expected ApiStatus error, got {other:?}"),
    }
}

#[test]
fn ok_response_without_rows_is_empty() {
    init_tracing();
    let payload = br#"{"status": "OK", "rows": []}"#;
    assert!(matches!(
        matrix_from_json(payload, None),
        Err(RouteError::Normalize(NormalizeError::EmptyMatrix))
    ));
}
