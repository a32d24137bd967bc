//! # Activity Geometry
//!
//! Turns a GPS activity record into a renderable 3D description.
//!
//! This library provides:
//! - Encoded polyline decoding
//! - Normalization of GPS coordinates into a bounded local space
//! - Synthetic terrain when an activity has no usable elevation
//! - Peak/valley detection for annotation markers
//! - Tube, marker and elevation-profile parameters for a renderer
//! - Shape-mode fallback for activities without a path
//!
//! The crate never talks to a renderer directly. A host implements
//! [`RenderAdapter`] (or reads the JSON form of [`GeometryBundle`]) and turns
//! the returned data into meshes.
//!
//! ## Features
//!
//! - **`parallel`** - Enable parallel batch processing with rayon
//! - **`ffi`** - Enable FFI bindings for mobile platforms (iOS/Android)
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use activity_geometry::{
//!     visualize_activity, ActivityRecord, ActivityType, GeometryKind, VisualizationConfig,
//! };
//!
//! let activity = ActivityRecord::builder("Morning Run", ActivityType::Run)
//!     .distance(10_000.0)
//!     .moving_time(3_000)
//!     .encoded_path("_p~iF~ps|U_ulLnnqC_mqNvxq`@")
//!     .build();
//!
//! let bundle = visualize_activity(&activity, &VisualizationConfig::default()).unwrap();
//! assert_eq!(bundle.kind(), GeometryKind::Route);
//! println!("Camera at z = {}", bundle.camera_distance);
//! ```

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{Result, VizError};

// Activity input records
pub mod activity;
pub use activity::{ActivityRecord, ActivityRecordBuilder, ActivitySummary, ActivityType};

// Encoded polyline codec
pub mod polyline;
pub use polyline::PolylineError;

// Geographic utilities (bounds, distance)
pub mod geo_utils;

// Coordinate normalization and synthetic terrain
pub mod normalize;
pub use normalize::{normalize, ElevationSource, NormalizedRoute};

// Local peak/valley detection
pub mod extrema;
pub use extrema::{find_extrema, find_extrema_set, ExtremaSet, ExtremumKind};

// Elevation profile for the sidebar
pub mod profile;
pub use profile::{build_profile, ProfilePoint};

// Geometry bundle construction
pub mod geometry;
pub use geometry::{
    build_geometry, Color, GeometryBundle, GeometryKind, GeometryPayload, MaterialHint, Marker,
    MarkerRole, Primitive, RouteGeometry, ShapeParams, TubeParams,
};

// End-to-end pipeline
pub mod pipeline;
pub use pipeline::{prepare_route, visualize_activity, visualize_batch, PreparedRoute};
#[cfg(feature = "parallel")]
pub use pipeline::visualize_batch_parallel;

// Renderer slot management
pub mod visualizer;
pub use visualizer::{RenderAdapter, Visualizer};

// Algorithm toolbox - modular access to all algorithms
pub mod algorithms;

// FFI bindings for mobile platforms (iOS/Android)
#[cfg(feature = "ffi")]
pub mod ffi;

#[cfg(feature = "ffi")]
uniffi::setup_scaffolding!();

/// Initialize logging for Android (only used in FFI)
#[cfg(all(feature = "ffi", target_os = "android"))]
pub(crate) fn init_logging() {
    use android_logger::Config;
    use log::LevelFilter;

    android_logger::init_once(
        Config::default()
            .with_max_level(LevelFilter::Debug)
            .with_tag("ActivityGeometryRust"),
    );
}

#[cfg(all(feature = "ffi", not(target_os = "android")))]
pub(crate) fn init_logging() {
    // No-op on non-Android platforms
}

// ============================================================================
// Core Types
// ============================================================================

/// A GPS coordinate with latitude, longitude and elevation.
///
/// # Example
/// ```
/// use activity_geometry::GeoPoint;
/// let point = GeoPoint::new(38.5, -120.2).with_elevation(1200.0);
/// assert_eq!(point.elevation, 1200.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Meters. Decoded points start at 0.
    #[serde(default)]
    pub elevation: f64,
}

impl GeoPoint {
    /// Create a new GPS point at elevation 0.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation: 0.0,
        }
    }

    /// Return a copy of this point at the given elevation.
    pub fn with_elevation(self, elevation: f64) -> Self {
        Self { elevation, ..self }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// Bounding box for a route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Create bounds from GPS points.
    pub fn from_points(points: &[GeoPoint]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        Some(geo_utils::compute_bounds(points))
    }

    /// Get the center point of the bounds.
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }

    /// Latitude extent in degrees.
    pub fn lat_range(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Longitude extent in degrees.
    pub fn lng_range(&self) -> f64 {
        self.max_lng - self.min_lng
    }
}

/// A route vertex in local scene coordinates.
///
/// `x` grows eastward and `y` northward; the longer bounding-box side spans
/// `[-1, 1]`. `elevation` keeps the source meters (recorded or synthetic).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct NormalizedPoint {
    pub x: f64,
    pub y: f64,
    pub elevation: f64,
    /// Elevation rescaled to [0, 1]; 0 everywhere on a flat route
    pub normalized_elevation: f64,
}

/// Configuration for geometry construction.
///
/// Defaults reproduce the reference visual output; changing them changes what
/// is drawn, not the correctness of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[serde(default)]
pub struct VisualizationConfig {
    /// Half-width of the neighborhood an extremum must dominate.
    /// Default: 10 samples
    pub extrema_window: u32,

    /// Maximum markers per extremum kind.
    /// Default: 5
    pub max_extrema: u32,

    /// Elevation range a route needs before extrema are annotated.
    /// Default: 50.0 meters
    pub significant_elevation_range: f64,

    /// Divisor turning meters into scene z units.
    /// Default: 100.0
    pub elevation_scale: f64,

    /// Tube radius is `size / tube_radius_divisor`.
    /// Default: 15.0
    pub tube_radius_divisor: f64,

    /// Tubular subdivisions per route point.
    /// Default: 3
    pub tubular_segments_per_point: u32,

    /// Cap on tubular subdivisions.
    /// Default: 300
    pub max_tubular_segments: u32,

    /// Radial subdivisions of the tube.
    /// Default: 8
    pub radial_segments: u32,

    /// Radius of extrema markers.
    /// Default: 0.05
    pub marker_radius: f64,

    /// Radius of start/end markers.
    /// Default: 0.08
    pub endpoint_marker_radius: f64,

    /// Height of the sidebar profile at normalized elevation 1.
    /// Default: 0.5
    pub profile_height: f64,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            extrema_window: 10,
            max_extrema: 5,
            significant_elevation_range: 50.0,
            elevation_scale: 100.0,
            tube_radius_divisor: 15.0,
            tubular_segments_per_point: 3,
            max_tubular_segments: 300,
            radial_segments: 8,
            marker_radius: 0.05,
            endpoint_marker_radius: 0.08,
            profile_height: 0.5,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
