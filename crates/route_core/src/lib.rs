//! Route and ETA reconciliation for the ride-hailing client.
//!
//! Turns raw Directions / Distance Matrix response bodies into normalized
//! route and ETA models:
//!
//! - [`decode`]: JSON bytes → typed records, status checked first
//! - [`polyline`]: encoded polyline codec
//! - [`normalize`]: typed records → [`NormalizedRoute`] / [`NormalizedMatrix`]
//! - [`provider`]: fetch + decode + normalize for dispatch, with an H3-keyed cache

pub mod config;
pub mod coordinate;
pub mod decode;
pub mod error;
pub mod model;
pub mod normalize;
pub mod polyline;
pub mod provider;
pub mod status;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use config::{ConfigError, NormalizerConfig};
pub use coordinate::Coordinate;
pub use decode::{decode, DecodeError, DecodedResponse, ResponseKind};
pub use error::{FetchError, RouteError};
pub use normalize::{
    ElementStatusError, MatrixShape, NormalizeError, NormalizedMatrix, NormalizedMatrixCell,
    NormalizedRoute,
};
pub use polyline::{decode_polyline, encode_polyline, PolylineError};
pub use status::ApiStatus;
