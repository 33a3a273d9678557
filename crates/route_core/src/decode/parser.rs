use super::error::DecodeError;
use super::wire::{
    WireDirections, WireDistanceMatrix, WireElement, WireLatLng, WireLeg, WireRoute, WireRow,
    WireStep, WireTextValue,
};
use crate::coordinate::Coordinate;
use crate::model::{
    DirectionsResult, DistanceMatrixResult, Element, Leg, Route, Row, Step, TextValue,
};
use crate::status::ApiStatus;

pub(super) fn parse_directions(
    wire: WireDirections,
    error_message: Option<String>,
) -> Result<DirectionsResult, DecodeError> {
    let routes = wire
        .routes
        .ok_or_else(|| DecodeError::missing("routes"))?
        .into_iter()
        .enumerate()
        .map(|(idx, route)| parse_route(route, &format!("routes[{idx}]")))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DirectionsResult {
        status: ApiStatus::Ok,
        error_message,
        routes,
    })
}

fn parse_route(wire: WireRoute, path: &str) -> Result<Route, DecodeError> {
    let legs = wire
        .legs
        .ok_or_else(|| DecodeError::missing(format!("{path}.legs")))?
        .into_iter()
        .enumerate()
        .map(|(idx, leg)| parse_leg(leg, &format!("{path}.legs[{idx}]")))
        .collect::<Result<Vec<_>, _>>()?;

    let overview_polyline = match wire.overview_polyline {
        Some(polyline) => polyline
            .points
            .ok_or_else(|| DecodeError::missing(format!("{path}.overview_polyline.points")))?,
        None => String::new(),
    };

    Ok(Route {
        summary: wire.summary.unwrap_or_default(),
        legs,
        overview_polyline,
        warnings: wire.warnings.unwrap_or_default(),
    })
}

fn parse_leg(wire: WireLeg, path: &str) -> Result<Leg, DecodeError> {
    let steps = wire
        .steps
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(idx, step)| parse_step(step, &format!("{path}.steps[{idx}]")))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Leg {
        status: wire
            .status
            .as_deref()
            .map(ApiStatus::parse)
            .unwrap_or(ApiStatus::Ok),
        distance: required_text_value(wire.distance, &format!("{path}.distance"))?,
        duration: required_text_value(wire.duration, &format!("{path}.duration"))?,
        duration_in_traffic: optional_text_value(
            wire.duration_in_traffic,
            &format!("{path}.duration_in_traffic"),
        )?,
        start_address: wire.start_address.unwrap_or_default(),
        end_address: wire.end_address.unwrap_or_default(),
        start_location: optional_lat_lng(wire.start_location, &format!("{path}.start_location"))?,
        end_location: optional_lat_lng(wire.end_location, &format!("{path}.end_location"))?,
        steps,
    })
}

fn parse_step(wire: WireStep, path: &str) -> Result<Step, DecodeError> {
    let polyline = wire
        .polyline
        .and_then(|polyline| polyline.points)
        .ok_or_else(|| DecodeError::missing(format!("{path}.polyline.points")))?;

    Ok(Step {
        distance: required_text_value(wire.distance, &format!("{path}.distance"))?,
        duration: required_text_value(wire.duration, &format!("{path}.duration"))?,
        html_instructions: wire.html_instructions.unwrap_or_default(),
        polyline,
        start_location: required_lat_lng(wire.start_location, &format!("{path}.start_location"))?,
        end_location: required_lat_lng(wire.end_location, &format!("{path}.end_location"))?,
        travel_mode: wire.travel_mode,
        maneuver: wire.maneuver,
    })
}

pub(super) fn parse_distance_matrix(
    wire: WireDistanceMatrix,
    error_message: Option<String>,
) -> Result<DistanceMatrixResult, DecodeError> {
    let rows = wire
        .rows
        .ok_or_else(|| DecodeError::missing("rows"))?
        .into_iter()
        .enumerate()
        .map(|(idx, row)| parse_row(row, &format!("rows[{idx}]")))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DistanceMatrixResult {
        status: ApiStatus::Ok,
        error_message,
        origin_addresses: wire.origin_addresses.unwrap_or_default(),
        destination_addresses: wire.destination_addresses.unwrap_or_default(),
        rows,
    })
}

fn parse_row(wire: WireRow, path: &str) -> Result<Row, DecodeError> {
    let elements = wire
        .elements
        .ok_or_else(|| DecodeError::missing(format!("{path}.elements")))?
        .into_iter()
        .enumerate()
        .map(|(idx, element)| parse_element(element, &format!("{path}.elements[{idx}]")))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Row { elements })
}

fn parse_element(wire: WireElement, path: &str) -> Result<Element, DecodeError> {
    let status = wire
        .status
        .as_deref()
        .map(ApiStatus::parse)
        .ok_or_else(|| DecodeError::missing(format!("{path}.status")))?;

    // Only OK elements must carry both values. Whatever a failed element
    // sends along is kept when complete and dropped otherwise.
    if !status.is_ok() {
        return Ok(Element {
            status,
            distance: complete_text_value(wire.distance),
            duration: complete_text_value(wire.duration),
            duration_in_traffic: complete_text_value(wire.duration_in_traffic),
        });
    }

    Ok(Element {
        status,
        distance: Some(required_text_value(wire.distance, &format!("{path}.distance"))?),
        duration: Some(required_text_value(wire.duration, &format!("{path}.duration"))?),
        duration_in_traffic: optional_text_value(
            wire.duration_in_traffic,
            &format!("{path}.duration_in_traffic"),
        )?,
    })
}

fn required_text_value(
    wire: Option<WireTextValue>,
    path: &str,
) -> Result<TextValue, DecodeError> {
    let wire = wire.ok_or_else(|| DecodeError::missing(path))?;
    text_value(wire, path)
}

/// An absent pair is fine; a half-present one is not.
fn optional_text_value(
    wire: Option<WireTextValue>,
    path: &str,
) -> Result<Option<TextValue>, DecodeError> {
    wire.map(|wire| text_value(wire, path)).transpose()
}

fn complete_text_value(wire: Option<WireTextValue>) -> Option<TextValue> {
    let wire = wire?;
    Some(TextValue {
        text: wire.text?,
        value: wire.value?,
    })
}

fn text_value(wire: WireTextValue, path: &str) -> Result<TextValue, DecodeError> {
    let text = wire
        .text
        .ok_or_else(|| DecodeError::missing(format!("{path}.text")))?;
    let value = wire
        .value
        .ok_or_else(|| DecodeError::missing(format!("{path}.value")))?;
    Ok(TextValue { text, value })
}

fn required_lat_lng(wire: Option<WireLatLng>, path: &str) -> Result<Coordinate, DecodeError> {
    let wire = wire.ok_or_else(|| DecodeError::missing(path))?;
    lat_lng(wire, path)
}

fn optional_lat_lng(
    wire: Option<WireLatLng>,
    path: &str,
) -> Result<Option<Coordinate>, DecodeError> {
    wire.map(|wire| lat_lng(wire, path)).transpose()
}

fn lat_lng(wire: WireLatLng, path: &str) -> Result<Coordinate, DecodeError> {
    let lat = wire
        .lat
        .ok_or_else(|| DecodeError::missing(format!("{path}.lat")))?;
    let lng = wire
        .lng
        .ok_or_else(|| DecodeError::missing(format!("{path}.lng")))?;
    Ok(Coordinate::new(lat, lng))
}
