//! Encoded polyline codec.
//!
//! Google's polyline format stores a path as signed deltas between successive
//! coordinates. Each component is scaled by `10^precision`, zig-zag encoded
//! (invert-if-negative after a left shift) and split into 5-bit groups, low
//! group first. Every group except the last carries the `0x20` continuation
//! bit, and each group is offset by 63 so the result is printable ASCII.
//!
//! Decoding is all-or-nothing at the [`decode_polyline`] level; the streaming
//! [`PolylineIter`] yields the failing position and then stops.

use std::iter::FusedIterator;

use thiserror::Error;

use crate::coordinate::Coordinate;

/// Precision used by the Directions API (1e-5 degrees).
pub const DEFAULT_PRECISION: u32 = 5;

const MIN_BYTE: u8 = 63;
const MAX_BYTE: u8 = 126;
const CONTINUATION_BIT: i64 = 0x20;
const GROUP_MASK: i64 = 0x1f;
/// 7 groups = 35 bits, enough for precision 6 longitudes with headroom.
const MAX_GROUPS: u32 = 7;

/// Reasons an encoded polyline cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolylineError {
    /// Input ended inside a component or between latitude and longitude.
    #[error("polyline truncated at byte {offset}")]
    Truncated { offset: usize },
    #[error("invalid polyline byte 0x{byte:02x} at offset {offset}")]
    InvalidByte { byte: u8, offset: usize },
    #[error("polyline component too long at byte {offset}")]
    Overflow { offset: usize },
}

/// A borrowed encoded polyline.
///
/// Cheap to copy; every call to [`Polyline::iter`] restarts decoding from the
/// first byte.
#[derive(Clone, Copy, Debug)]
pub struct Polyline<'a> {
    encoded: &'a str,
    factor: f64,
}

impl<'a> Polyline<'a> {
    pub fn new(encoded: &'a str) -> Self {
        Self::with_precision(encoded, DEFAULT_PRECISION)
    }

    pub fn with_precision(encoded: &'a str, precision: u32) -> Self {
        Self {
            encoded,
            factor: precision_factor(precision),
        }
    }

    pub fn as_str(&self) -> &'a str {
        self.encoded
    }

    pub fn is_empty(&self) -> bool {
        self.encoded.is_empty()
    }

    pub fn iter(&self) -> PolylineIter<'a> {
        PolylineIter {
            bytes: self.encoded.as_bytes(),
            pos: 0,
            lat: 0,
            lng: 0,
            factor: self.factor,
            failed: false,
        }
    }

    /// Decode every coordinate, or fail without returning a partial path.
    pub fn decode(&self) -> Result<Vec<Coordinate>, PolylineError> {
        self.iter().collect()
    }
}

impl<'a> IntoIterator for &Polyline<'a> {
    type Item = Result<Coordinate, PolylineError>;
    type IntoIter = PolylineIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Streaming decoder over an encoded polyline.
#[derive(Clone, Debug)]
pub struct PolylineIter<'a> {
    bytes: &'a [u8],
    pos: usize,
    lat: i64,
    lng: i64,
    factor: f64,
    failed: bool,
}

impl PolylineIter<'_> {
    fn next_component(&mut self) -> Result<i64, PolylineError> {
        let mut value: i64 = 0;
        for group in 0..MAX_GROUPS {
            let offset = self.pos;
            let byte = *self
                .bytes
                .get(offset)
                .ok_or(PolylineError::Truncated { offset })?;
            if !(MIN_BYTE..=MAX_BYTE).contains(&byte) {
                return Err(PolylineError::InvalidByte { byte, offset });
            }
            self.pos += 1;

            let chunk = i64::from(byte - MIN_BYTE);
            value |= (chunk & GROUP_MASK) << (5 * group);
            if chunk & CONTINUATION_BIT == 0 {
                return Ok(if value & 1 != 0 {
                    !(value >> 1)
                } else {
                    value >> 1
                });
            }
        }
        Err(PolylineError::Overflow { offset: self.pos })
    }
}

impl Iterator for PolylineIter<'_> {
    type Item = Result<Coordinate, PolylineError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.bytes.len() {
            return None;
        }

        let deltas = self
            .next_component()
            .and_then(|d_lat| self.next_component().map(|d_lng| (d_lat, d_lng)));

        match deltas {
            Ok((d_lat, d_lng)) => {
                self.lat += d_lat;
                self.lng += d_lng;
                Some(Ok(Coordinate::new(
                    self.lat as f64 / self.factor,
                    self.lng as f64 / self.factor,
                )))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

impl FusedIterator for PolylineIter<'_> {}

/// Decode `encoded` at the default precision.
pub fn decode_polyline(encoded: &str) -> Result<Vec<Coordinate>, PolylineError> {
    Polyline::new(encoded).decode()
}

/// Encode `path` at the default precision.
pub fn encode_polyline(path: &[Coordinate]) -> String {
    encode_polyline_with_precision(path, DEFAULT_PRECISION)
}

pub fn encode_polyline_with_precision(path: &[Coordinate], precision: u32) -> String {
    let factor = precision_factor(precision);
    let mut out = String::with_capacity(path.len() * 12);
    let (mut prev_lat, mut prev_lng) = (0_i64, 0_i64);

    for coordinate in path {
        let lat = (coordinate.lat * factor).round() as i64;
        let lng = (coordinate.lng * factor).round() as i64;
        encode_component(lat - prev_lat, &mut out);
        encode_component(lng - prev_lng, &mut out);
        prev_lat = lat;
        prev_lng = lng;
    }
    out
}

fn encode_component(delta: i64, out: &mut String) {
    let mut value = if delta < 0 { !(delta << 1) } else { delta << 1 };
    while value >= CONTINUATION_BIT {
        out.push(char::from(
            ((CONTINUATION_BIT | (value & GROUP_MASK)) + i64::from(MIN_BYTE)) as u8,
        ));
        value >>= 5;
    }
    out.push(char::from((value + i64::from(MIN_BYTE)) as u8));
}

fn precision_factor(precision: u32) -> f64 {
    10_f64.powi(precision as i32)
}
