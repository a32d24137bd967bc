//! # Encoded Polyline Codec
//!
//! Decoder (and inverse encoder) for the compact polyline format used by
//! fitness and mapping APIs for activity summaries.
//!
//! ## Format
//!
//! Each vertex is stored as a latitude delta followed by a longitude delta
//! from the previous vertex, both scaled by 1e5 and rounded to integers.
//! A delta is zig-zag folded into an unsigned value, split into 5-bit chunks
//! (least significant first), flagged with `0x20` on every chunk except the
//! last, and offset by 63 into the printable range `'?'..='~'`.
//!
//! Reference: [Encoded Polyline Algorithm Format][format]
//!
//! [format]: https://developers.google.com/maps/documentation/utilities/polylinealgorithm
//!
//! ## Why not the `polyline` crate
//!
//! `polyline::decode_polyline` returns a `geo::LineString` and reports
//! failures as a plain string. Callers here need the byte position of the
//! fault as a typed [`PolylineError`], `None` for an empty path, and
//! [`GeoPoint`]s without a conversion pass. The crate stays a
//! dev-dependency: the integration tests decode and encode the same inputs
//! with both codecs and require identical results.
//!
//! ## Example
//!
//! ```rust
//! use activity_geometry::polyline;
//!
//! let points = polyline::decode("_p~iF~ps|U_ulLnnqC").unwrap().unwrap();
//! assert_eq!(points.len(), 2);
//! assert_eq!(points[0].latitude, 38.5);
//! assert_eq!(points[1].longitude, -120.95);
//! ```

use thiserror::Error;

use crate::GeoPoint;

/// Scale between stored integers and degrees.
const PRECISION: f64 = 1e5;

/// Offset added to every chunk to make it printable.
const CHAR_OFFSET: u8 = 63;

/// Continuation flag on a chunk.
const CONTINUATION_BIT: i64 = 0x20;

/// Value bits of a chunk.
const CHUNK_MASK: i64 = 0x1f;

/// 7 chunks hold 35 bits, more than any valid coordinate delta needs.
const MAX_CHUNKS: u32 = 7;

/// Reasons an encoded polyline is rejected.
///
/// `position` is the byte offset at which decoding stopped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolylineError {
    #[error("invalid character {byte:#04x} at byte {position}")]
    InvalidCharacter { position: usize, byte: u8 },

    #[error("value truncated at byte {position}")]
    Truncated { position: usize },

    #[error("latitude without longitude at byte {position}")]
    MissingLongitude { position: usize },

    #[error("value starting at byte {position} exceeds {} chunks", MAX_CHUNKS)]
    Overflow { position: usize },
}

/// Decode an encoded polyline into GPS points.
///
/// Returns `Ok(None)` for an empty string: there is no path, and the caller is
/// expected to fall back to shape mode. Every decoded point has elevation 0.
///
/// Malformed input fails on the first bad byte; no partial path is returned.
///
/// # Example
///
/// ```rust
/// use activity_geometry::polyline::{decode, PolylineError};
///
/// assert_eq!(decode("").unwrap(), None);
/// assert!(matches!(decode("_p~iF"), Err(PolylineError::MissingLongitude { .. })));
/// ```
pub fn decode(encoded: &str) -> Result<Option<Vec<GeoPoint>>, PolylineError> {
    if encoded.is_empty() {
        return Ok(None);
    }

    let bytes = encoded.as_bytes();
    let mut position = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;
    // Every vertex needs at least 2 bytes
    let mut points = Vec::with_capacity(bytes.len() / 2);

    while position < bytes.len() {
        lat += decode_value(bytes, &mut position)?;

        if position >= bytes.len() {
            return Err(PolylineError::MissingLongitude { position });
        }
        lng += decode_value(bytes, &mut position)?;

        points.push(GeoPoint::new(lat as f64 / PRECISION, lng as f64 / PRECISION));
    }

    Ok(Some(points))
}

/// Read one zig-zag encoded value, advancing `position` past it.
fn decode_value(bytes: &[u8], position: &mut usize) -> Result<i64, PolylineError> {
    let start = *position;
    let mut result: i64 = 0;
    let mut shift = 0;
    let mut chunks = 0;

    loop {
        let byte = *bytes
            .get(*position)
            .ok_or(PolylineError::Truncated { position: *position })?;

        if !(CHAR_OFFSET..=b'~').contains(&byte) {
            return Err(PolylineError::InvalidCharacter {
                position: *position,
                byte,
            });
        }

        chunks += 1;
        if chunks > MAX_CHUNKS {
            return Err(PolylineError::Overflow { position: start });
        }

        let chunk = (byte - CHAR_OFFSET) as i64;
        result |= (chunk & CHUNK_MASK) << shift;
        shift += 5;
        *position += 1;

        if chunk & CONTINUATION_BIT == 0 {
            break;
        }
    }

    Ok(if result & 1 == 1 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

/// Encode GPS points into a polyline string.
///
/// Coordinates are rounded to 5 decimal places; elevation is not encoded.
/// Points already on the 1e-5 grid survive `decode(encode(points))` exactly.
pub fn encode(points: &[GeoPoint]) -> String {
    let mut encoded = String::with_capacity(points.len() * 8);
    let mut prev_lat: i64 = 0;
    let mut prev_lng: i64 = 0;

    for point in points {
        let lat = (point.latitude * PRECISION).round() as i64;
        let lng = (point.longitude * PRECISION).round() as i64;
        encode_value(lat - prev_lat, &mut encoded);
        encode_value(lng - prev_lng, &mut encoded);
        prev_lat = lat;
        prev_lng = lng;
    }

    encoded
}

fn encode_value(delta: i64, out: &mut String) {
    let mut value = if delta < 0 { !(delta << 1) } else { delta << 1 };

    while value >= CONTINUATION_BIT {
        out.push(char::from(
            ((CONTINUATION_BIT | (value & CHUNK_MASK)) as u8) + CHAR_OFFSET,
        ));
        value >>= 5;
    }
    out.push(char::from(value as u8 + CHAR_OFFSET));
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    #[test]
    fn test_decode_reference_fixture() {
        let points = decode(REFERENCE).unwrap().unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0], GeoPoint::new(38.5, -120.2));
        assert_eq!(points[1], GeoPoint::new(40.7, -120.95));
        assert_eq!(points[2], GeoPoint::new(43.252, -126.453));
        assert!(points.iter().all(|p| p.elevation == 0.0));
    }

    #[test]
    fn test_decode_two_point_prefix() {
        let points = decode("_p~iF~ps|U_ulLnnqC").unwrap().unwrap();
        assert_eq!(
            points,
            vec![GeoPoint::new(38.5, -120.2), GeoPoint::new(40.7, -120.95)]
        );
    }

    #[test]
    fn test_decode_empty_is_no_path() {
        assert_eq!(decode("").unwrap(), None);
    }

    #[test]
    fn test_decode_zero_delta() {
        // '?' is a single zero chunk
        let points = decode("????").unwrap().unwrap();
        assert_eq!(points, vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 0.0)]);
    }

    #[test]
    fn test_decode_truncated_value() {
        // Drop the final '@': the last chunk still carries the continuation bit
        let truncated = &REFERENCE[..REFERENCE.len() - 1];
        assert_eq!(
            decode(truncated),
            Err(PolylineError::Truncated {
                position: truncated.len()
            })
        );
    }

    #[test]
    fn test_decode_missing_longitude() {
        assert_eq!(
            decode("_p~iF"),
            Err(PolylineError::MissingLongitude { position: 5 })
        );
    }

    #[test]
    fn test_decode_invalid_characters() {
        assert_eq!(
            decode("_p~i F"),
            Err(PolylineError::InvalidCharacter {
                position: 4,
                byte: b' '
            })
        );
        assert!(matches!(
            decode("_p~iF~ps|U\u{e9}"),
            Err(PolylineError::InvalidCharacter { position: 10, .. })
        ));
    }

    #[test]
    fn test_decode_overflow() {
        // '~' is 63 + 63: continuation set on every chunk
        assert_eq!(
            decode("~~~~~~~~~~"),
            Err(PolylineError::Overflow { position: 0 })
        );
    }

    #[test]
    fn test_encode_reference_fixture() {
        let points = vec![
            GeoPoint::new(38.5, -120.2),
            GeoPoint::new(40.7, -120.95),
            GeoPoint::new(43.252, -126.453),
        ];
        assert_eq!(encode(&points), REFERENCE);
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(encode(&[]), "");
    }

    #[test]
    fn test_round_trip_negative_and_small_deltas() {
        let points = vec![
            GeoPoint::new(-33.86785, 151.20732),
            GeoPoint::new(-33.86786, 151.20731),
            GeoPoint::new(-33.86786, 151.20731),
            GeoPoint::new(0.00001, -0.00001),
        ];
        assert_eq!(decode(&encode(&points)).unwrap().unwrap(), points);
    }
}
