//! Unified error handling for the activity-geometry library.
//!
//! Only [`VizError::InvalidActivity`] is meant to reach an end user. Decode and
//! normalization failures are recovered by the pipeline, which falls back to
//! shape mode.

use thiserror::Error;

use crate::polyline::PolylineError;

/// Unified error type for activity-geometry operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VizError {
    /// The encoded path could not be decoded
    #[error("malformed polyline: {0}")]
    Decode(#[from] PolylineError),

    /// Too few points to build a route
    #[error("route has {point_count} points, minimum {minimum_required} required")]
    InsufficientData {
        point_count: usize,
        minimum_required: usize,
    },

    /// A vertex lies outside WGS84 latitude/longitude ranges
    #[error("point {index} at ({latitude}, {longitude}) is not a valid coordinate")]
    InvalidCoordinate {
        index: usize,
        latitude: f64,
        longitude: f64,
    },

    /// All points share one coordinate, so there is nothing to scale
    #[error("all {point_count} route points are identical")]
    DegeneratePath { point_count: usize },

    /// The activity record itself is structurally invalid
    #[error("invalid activity record: {message}")]
    InvalidActivity { message: String },
}

impl VizError {
    /// Whether the pipeline should recover from this error by switching to shape mode.
    pub fn is_route_fallback(&self) -> bool {
        !matches!(self, VizError::InvalidActivity { .. })
    }
}

/// Result type alias for activity-geometry operations.
pub type Result<T> = std::result::Result<T, VizError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VizError::InsufficientData {
            point_count: 1,
            minimum_required: 2,
        };
        assert!(err.to_string().contains("1 points"));
        assert!(err.to_string().contains("minimum 2"));
    }

    #[test]
    fn test_decode_error_converts() {
        let err: VizError = PolylineError::Truncated { position: 4 }.into();
        assert!(matches!(err, VizError::Decode(_)));
        assert!(err.to_string().contains("byte 4"));
    }

    #[test]
    fn test_route_fallback_classification() {
        assert!(VizError::DegeneratePath { point_count: 3 }.is_route_fallback());
        assert!(VizError::InvalidCoordinate {
            index: 2,
            latitude: 91.0,
            longitude: 0.0
        }
        .is_route_fallback());
        let decode = VizError::Decode(PolylineError::MissingLongitude { position: 0 });
        assert!(decode.is_route_fallback());
        assert!(!VizError::InvalidActivity {
            message: "bad".to_string()
        }
        .is_route_fallback());
    }
}
