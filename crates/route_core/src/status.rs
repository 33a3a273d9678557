use std::fmt;

use serde::{Serialize, Serializer};

/// Status codes used by the Directions and Distance Matrix APIs, both at the
/// top level and per element.
///
/// Codes this crate does not know about are kept verbatim in [`ApiStatus::Other`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ApiStatus {
    Ok,
    NotFound,
    ZeroResults,
    MaxWaypointsExceeded,
    MaxRouteLengthExceeded,
    MaxElementsExceeded,
    MaxDimensionsExceeded,
    InvalidRequest,
    OverDailyLimit,
    OverQueryLimit,
    RequestDenied,
    UnknownError,
    Other(String),
}

impl ApiStatus {
    pub fn parse(code: &str) -> Self {
        match code {
            "OK" => Self::Ok,
            "NOT_FOUND" => Self::NotFound,
            "ZERO_RESULTS" => Self::ZeroResults,
            "MAX_WAYPOINTS_EXCEEDED" => Self::MaxWaypointsExceeded,
            "MAX_ROUTE_LENGTH_EXCEEDED" => Self::MaxRouteLengthExceeded,
            "MAX_ELEMENTS_EXCEEDED" => Self::MaxElementsExceeded,
            "MAX_DIMENSIONS_EXCEEDED" => Self::MaxDimensionsExceeded,
            "INVALID_REQUEST" => Self::InvalidRequest,
            "OVER_DAILY_LIMIT" => Self::OverDailyLimit,
            "OVER_QUERY_LIMIT" => Self::OverQueryLimit,
            "REQUEST_DENIED" => Self::RequestDenied,
            "UNKNOWN_ERROR" => Self::UnknownError,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Ok => "OK",
            Self::NotFound => "NOT_FOUND",
            Self::ZeroResults => "ZERO_RESULTS",
            Self::MaxWaypointsExceeded => "MAX_WAYPOINTS_EXCEEDED",
            Self::MaxRouteLengthExceeded => "MAX_ROUTE_LENGTH_EXCEEDED",
            Self::MaxElementsExceeded => "MAX_ELEMENTS_EXCEEDED",
            Self::MaxDimensionsExceeded => "MAX_DIMENSIONS_EXCEEDED",
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::OverDailyLimit => "OVER_DAILY_LIMIT",
            Self::OverQueryLimit => "OVER_QUERY_LIMIT",
            Self::RequestDenied => "REQUEST_DENIED",
            Self::UnknownError => "UNKNOWN_ERROR",
            Self::Other(code) => code,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Server-side conditions where the same request may succeed later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::OverQueryLimit | Self::UnknownError)
    }
}

impl fmt::Display for ApiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ApiStatus {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_round_trip_through_as_str() {
        for code in ["OK", "NOT_FOUND", "ZERO_RESULTS", "OVER_QUERY_LIMIT"] {
            assert_eq!(ApiStatus::parse(code).as_str(), code);
        }
    }

    #[test]
    fn unknown_code_is_preserved() {
        let status = ApiStatus::parse("SOMETHING_NEW");
        assert_eq!(status, ApiStatus::Other("SOMETHING_NEW".to_string()));
        assert_eq!(status.to_string(), "SOMETHING_NEW");
        assert!(!status.is_ok());
    }
}
