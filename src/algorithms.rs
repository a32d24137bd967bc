//! # Algorithm Toolbox
//!
//! Direct access to each stage of the pipeline. Use these when a host wants
//! one piece (say, only decoding or only the profile) without building a
//! whole [`GeometryBundle`].
//!
//! ## Stages
//!
//! - **Polyline Codec**: decode and encode the 1e5-precision format
//! - **Normalization**: fit GPS points into `[-1, 1]` with synthetic terrain fallback
//! - **Extrema Detection**: windowed local peaks and valleys
//! - **Elevation Profile**: 2D line for the sidebar
//! - **Geometry Policy**: size, color, shape and camera rules
//!
//! ## Geographic Utilities
//!
//! - **Haversine Distance**: Great-circle distance between GPS points
//! - **Polyline Length**: Total distance along a path
//! - **Bounds Computation**: Bounding box for GPS tracks
//!
//! # Example
//!
//! ```rust
//! use activity_geometry::algorithms::{
//!     build_profile, decode_polyline, haversine_distance, normalize,
//! };
//!
//! let points = decode_polyline("_p~iF~ps|U_ulLnnqC").unwrap().unwrap();
//! println!("First leg: {:.0} km", haversine_distance(&points[0], &points[1]) / 1000.0);
//!
//! let route = normalize(&points, None).unwrap();
//! let profile = build_profile(route.points()).unwrap();
//! assert_eq!(profile.len(), 2);
//! ```

// =============================================================================
// Core Types (re-exported from lib)
// =============================================================================

pub use crate::{
    ActivityRecord, ActivityType, Bounds, GeoPoint, GeometryBundle, NormalizedPoint,
    VisualizationConfig,
};

// =============================================================================
// Geographic Utilities
// =============================================================================

pub use crate::geo_utils::{compute_bounds, haversine_distance, polyline_length};

// =============================================================================
// Polyline Codec
// =============================================================================

pub use crate::polyline::{
    decode as decode_polyline, encode as encode_polyline, PolylineError,
};

// =============================================================================
// Normalization
// =============================================================================

pub use crate::normalize::{
    normalize, resolve_elevations, synthetic_elevation, ElevationSource, NormalizedRoute,
    MIN_ROUTE_POINTS,
};

// =============================================================================
// Extrema Detection
// =============================================================================

pub use crate::extrema::{
    find_extrema, find_extrema_limited, find_extrema_set, ExtremaSet, ExtremumKind,
    DEFAULT_WINDOW_SIZE, MAX_EXTREMA,
};

// =============================================================================
// Elevation Profile
// =============================================================================

pub use crate::profile::{build_profile, build_profile_with_height, ProfilePoint};

// =============================================================================
// Geometry Policy
// =============================================================================

pub use crate::geometry::{
    activity_color, activity_segments, activity_size, build_geometry, camera_distance,
    elevation_is_significant, shape_for,
};

/// Extrema of a decoded route, using the default window and cap.
///
/// Convenience for hosts that only draw markers: decodes, normalizes and
/// scans in one call. Returns `None` when the path cannot be turned into a
/// route.
///
/// # Example
/// ```
/// use activity_geometry::algorithms::extrema_for_polyline;
///
/// let extrema = extrema_for_polyline("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
/// // Three points never fill a 10-sample window
/// assert!(extrema.is_empty());
/// ```
pub fn extrema_for_polyline(encoded: &str) -> Option<ExtremaSet> {
    let points = decode_polyline(encoded).ok()??;
    let route = normalize(&points, None).ok()?;
    Some(find_extrema_set(
        route.points(),
        DEFAULT_WINDOW_SIZE,
        MAX_EXTREMA,
    ))
}
