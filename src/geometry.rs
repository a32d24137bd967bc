//! # Geometry Mapper
//!
//! Turns a normalized route (or its absence) plus activity metadata into a
//! [`GeometryBundle`]: plain data a renderer adapter can turn into meshes.
//!
//! ## Modes
//!
//! | Mode | When | Output |
//! |------|------|--------|
//! | Route | a normalized route with ≥2 points | tube along the path, markers, profile |
//! | Shape | no usable path | one primitive keyed by activity type |
//!
//! ## Presentation Policy
//!
//! | Type | Primitive | Color |
//! |------|-----------|-------|
//! | Run | torus | OrangeRed `#ff4500` |
//! | Ride | icosahedron | DodgerBlue `#1e90ff` |
//! | Swim | torus knot | DeepSkyBlue `#00bfff` |
//! | other | dodecahedron | MediumPurple `#9370db` |
//!
//! Size is `clamp(km / 10, 0.5, 3)` in both modes and the camera sits at
//! `size * 2 + 3`. Shape complexity is `clamp(floor(minutes / 5), 3, 16)`.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::activity::{ActivityRecord, ActivitySummary, ActivityType};
use crate::extrema::{find_extrema_set, ExtremaSet};
use crate::normalize::{ElevationSource, NormalizedRoute};
use crate::profile::{build_profile_with_height, ProfilePoint};
use crate::{NormalizedPoint, VisualizationConfig};

/// Smallest and largest scene size of an activity.
const MIN_SIZE: f64 = 0.5;
const MAX_SIZE: f64 = 3.0;
/// Kilometers per unit of scene size.
const KM_PER_SIZE_UNIT: f64 = 10.0;

/// Bounds of the shape complexity.
const MIN_SEGMENTS: u32 = 3;
const MAX_SEGMENTS: u32 = 16;
/// Minutes of moving time per segment.
const MINUTES_PER_SEGMENT: f64 = 5.0;

/// Camera distance before any activity is shown.
const PLACEHOLDER_CAMERA_DISTANCE: f64 = 5.0;

// ============================================================================
// Colors and Materials
// ============================================================================

/// A 24-bit RGB color, serialized as its integer value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const ORANGE_RED: Color = Color(0xff4500);
    pub const DODGER_BLUE: Color = Color(0x1e90ff);
    pub const DEEP_SKY_BLUE: Color = Color(0x00bfff);
    pub const MEDIUM_PURPLE: Color = Color(0x9370db);
    pub const BRAND_ORANGE: Color = Color(0xfc4c02);
    pub const RED: Color = Color(0xff0000);
    pub const BLUE: Color = Color(0x0000ff);
    pub const LIME_GREEN: Color = Color(0x32cd32);
    pub const GOLD: Color = Color(0xffd700);

    /// CSS-style hex string, e.g. `#ff4500`.
    pub fn to_hex(self) -> String {
        format!("#{:06x}", self.0 & 0xff_ffff)
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        ((self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8)
    }
}

/// Surface hints for a physically based material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialHint {
    pub color: Color,
    pub roughness: f64,
    pub metalness: f64,
    /// Glow in the base color; markers only
    pub emissive_intensity: Option<f64>,
}

impl MaterialHint {
    fn solid(color: Color, roughness: f64, metalness: f64) -> Self {
        Self {
            color,
            roughness,
            metalness,
            emissive_intensity: None,
        }
    }

    fn glowing(color: Color, emissive_intensity: f64) -> Self {
        Self {
            color,
            roughness: 1.0,
            metalness: 0.0,
            emissive_intensity: Some(emissive_intensity),
        }
    }
}

// ============================================================================
// Bundle Types
// ============================================================================

/// A parametric solid, with parameters in the renderer's usual order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Primitive {
    Torus {
        radius: f64,
        tube: f64,
        radial_segments: u32,
        tubular_segments: u32,
    },
    Icosahedron {
        radius: f64,
        detail: u32,
    },
    TorusKnot {
        radius: f64,
        tube: f64,
        tubular_segments: u32,
        radial_segments: u32,
    },
    Dodecahedron {
        radius: f64,
        detail: u32,
    },
    Box {
        width: f64,
        height: f64,
        depth: f64,
    },
}

/// Shape-mode output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeParams {
    pub primitive: Primitive,
    pub size: f64,
    pub segments: u32,
    pub color: Color,
    pub material: MaterialHint,
}

/// Tube swept along the route curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TubeParams {
    pub radius: f64,
    pub tubular_segments: u32,
    pub radial_segments: u32,
    pub closed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerRole {
    Start,
    End,
    High,
    Low,
}

/// A sphere placed on a route vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub role: MarkerRole,
    /// Index into the route path
    pub index: usize,
    pub position: [f64; 3],
    pub radius: f64,
    pub material: MaterialHint,
}

/// Route-mode output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteGeometry {
    pub path: Vec<NormalizedPoint>,
    /// Control points of the smooth curve: `(x, y, elevation / scale)`
    pub curve: Vec<[f64; 3]>,
    pub tube: TubeParams,
    pub material: MaterialHint,
    pub size: f64,
    /// Present only when the elevation range is significant
    pub extrema: Option<ExtremaSet>,
    pub markers: Vec<Marker>,
    pub profile: Option<Vec<ProfilePoint>>,
    pub elevation_source: ElevationSource,
}

/// Which of the two modes a bundle is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryKind {
    Route,
    Shape,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "geometry")]
pub enum GeometryPayload {
    Route(RouteGeometry),
    Shape(ShapeParams),
}

/// Everything a renderer needs to draw one activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryBundle {
    pub payload: GeometryPayload,
    /// Distance of the camera from the origin along +z
    pub camera_distance: f64,
    /// `None` only for the placeholder
    pub summary: Option<ActivitySummary>,
}

impl GeometryBundle {
    pub fn kind(&self) -> GeometryKind {
        match self.payload {
            GeometryPayload::Route(_) => GeometryKind::Route,
            GeometryPayload::Shape(_) => GeometryKind::Shape,
        }
    }

    pub fn route(&self) -> Option<&RouteGeometry> {
        match &self.payload {
            GeometryPayload::Route(route) => Some(route),
            GeometryPayload::Shape(_) => None,
        }
    }

    pub fn shape(&self) -> Option<&ShapeParams> {
        match &self.payload {
            GeometryPayload::Shape(shape) => Some(shape),
            GeometryPayload::Route(_) => None,
        }
    }

    pub fn extrema(&self) -> Option<&ExtremaSet> {
        self.route().and_then(|r| r.extrema.as_ref())
    }

    pub fn profile(&self) -> Option<&[ProfilePoint]> {
        self.route().and_then(|r| r.profile.as_deref())
    }

    /// The idle-state cube shown before any activity is selected.
    pub fn placeholder() -> Self {
        let color = Color::BRAND_ORANGE;
        Self {
            payload: GeometryPayload::Shape(ShapeParams {
                primitive: Primitive::Box {
                    width: 1.0,
                    height: 1.0,
                    depth: 1.0,
                },
                size: 1.0,
                segments: 1,
                color,
                material: MaterialHint::solid(color, 0.5, 0.2),
            }),
            camera_distance: PLACEHOLDER_CAMERA_DISTANCE,
            summary: None,
        }
    }

    /// Record the measured length of the decoded path in the summary.
    pub fn with_path_length(mut self, path_length_km: f64) -> Self {
        if let Some(summary) = self.summary.as_mut() {
            summary.path_length_km = Some(path_length_km);
        }
        self
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

// ============================================================================
// Policy Functions
// ============================================================================

/// Scene size from distance in meters: `clamp(km / 10, 0.5, 3)`.
pub fn activity_size(distance_m: f64) -> f64 {
    (distance_m / 1000.0 / KM_PER_SIZE_UNIT).clamp(MIN_SIZE, MAX_SIZE)
}

/// Shape complexity from moving time in seconds: `clamp(floor(min / 5), 3, 16)`.
pub fn activity_segments(moving_time_s: u32) -> u32 {
    let minutes = moving_time_s as f64 / 60.0;
    ((minutes / MINUTES_PER_SEGMENT).floor() as u32).clamp(MIN_SEGMENTS, MAX_SEGMENTS)
}

pub fn activity_color(activity_type: ActivityType) -> Color {
    match activity_type {
        ActivityType::Run => Color::ORANGE_RED,
        ActivityType::Ride => Color::DODGER_BLUE,
        ActivityType::Swim => Color::DEEP_SKY_BLUE,
        ActivityType::Other => Color::MEDIUM_PURPLE,
    }
}

fn shape_material(activity_type: ActivityType) -> MaterialHint {
    let color = activity_color(activity_type);
    match activity_type {
        ActivityType::Run => MaterialHint::solid(color, 0.5, 0.2),
        ActivityType::Ride => MaterialHint::solid(color, 0.3, 0.5),
        ActivityType::Swim => MaterialHint::solid(color, 0.1, 0.8),
        ActivityType::Other => MaterialHint::solid(color, 0.4, 0.3),
    }
}

/// The primitive for an activity type at a given size and complexity.
pub fn shape_for(activity_type: ActivityType, size: f64, segments: u32) -> Primitive {
    match activity_type {
        ActivityType::Run => Primitive::Torus {
            radius: size,
            tube: size / 3.0,
            radial_segments: segments,
            tubular_segments: segments * 2,
        },
        ActivityType::Ride => Primitive::Icosahedron {
            radius: size,
            detail: segments / 4,
        },
        ActivityType::Swim => Primitive::TorusKnot {
            radius: size,
            tube: size / 4.0,
            tubular_segments: segments * 2,
            radial_segments: segments,
        },
        ActivityType::Other => Primitive::Dodecahedron {
            radius: size,
            detail: segments / 4,
        },
    }
}

pub fn camera_distance(size: f64) -> f64 {
    size * 2.0 + 3.0
}

/// Whether the elevation range is large enough to annotate.
pub fn elevation_is_significant(points: &[NormalizedPoint], threshold_m: f64) -> bool {
    if points.len() < 2 {
        return false;
    }
    let (min, max) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), p| {
            (min.min(p.elevation), max.max(p.elevation))
        });
    max - min > threshold_m
}

fn tubular_segments(point_count: usize, config: &VisualizationConfig) -> u32 {
    let wanted = point_count.saturating_mul(config.tubular_segments_per_point as usize);
    wanted.min(config.max_tubular_segments as usize) as u32
}

// ============================================================================
// Construction
// ============================================================================

/// Build the geometry for an activity.
///
/// With a route of at least 2 points the bundle is in route mode; otherwise it
/// falls back to shape mode. Never fails: fallback is policy, not an error.
pub fn build_geometry(
    activity: &ActivityRecord,
    route: Option<&NormalizedRoute>,
    config: &VisualizationConfig,
) -> GeometryBundle {
    match route {
        Some(route) if route.len() >= 2 => build_route(activity, route, config),
        _ => build_shape(activity),
    }
}

fn build_shape(activity: &ActivityRecord) -> GeometryBundle {
    let size = activity_size(activity.distance);
    let segments = activity_segments(activity.moving_time);
    let primitive = shape_for(activity.activity_type, size, segments);

    info!(
        "[ActivityGeometry] Shape mode for '{}' ({}): size {:.2}, {} segments",
        activity.name, activity.activity_type, size, segments
    );

    GeometryBundle {
        payload: GeometryPayload::Shape(ShapeParams {
            primitive,
            size,
            segments,
            color: activity_color(activity.activity_type),
            material: shape_material(activity.activity_type),
        }),
        camera_distance: camera_distance(size),
        summary: Some(activity.summary(None)),
    }
}

fn build_route(
    activity: &ActivityRecord,
    route: &NormalizedRoute,
    config: &VisualizationConfig,
) -> GeometryBundle {
    let points = route.points();
    let size = activity_size(activity.distance);
    let color = activity_color(activity.activity_type);

    let curve: Vec<[f64; 3]> = points
        .iter()
        .map(|p| [p.x, p.y, p.elevation / config.elevation_scale])
        .collect();

    let tube = TubeParams {
        radius: size / config.tube_radius_divisor,
        tubular_segments: tubular_segments(points.len(), config),
        radial_segments: config.radial_segments,
        closed: false,
    };

    let extrema = if elevation_is_significant(points, config.significant_elevation_range) {
        Some(find_extrema_set(
            points,
            config.extrema_window as usize,
            config.max_extrema as usize,
        ))
    } else {
        debug!(
            "[ActivityGeometry] Elevation range {:.1}m below {:.0}m, no extrema markers",
            route.elevation_range(),
            config.significant_elevation_range
        );
        None
    };

    let markers = build_markers(&curve, extrema.as_ref(), config);
    let profile = build_profile_with_height(points, config.profile_height);

    info!(
        "[ActivityGeometry] Route mode for '{}': {} points, {} tube segments, {} markers",
        activity.name,
        points.len(),
        tube.tubular_segments,
        markers.len()
    );

    GeometryBundle {
        payload: GeometryPayload::Route(RouteGeometry {
            path: points.to_vec(),
            curve,
            tube,
            material: MaterialHint::solid(color, 0.3, 0.7),
            size,
            extrema,
            markers,
            profile,
            elevation_source: route.elevation_source,
        }),
        camera_distance: camera_distance(size),
        summary: Some(activity.summary(None)),
    }
}

fn build_markers(
    curve: &[[f64; 3]],
    extrema: Option<&ExtremaSet>,
    config: &VisualizationConfig,
) -> Vec<Marker> {
    let marker = |role: MarkerRole, index: usize, color: Color, radius: f64| Marker {
        role,
        index,
        position: curve[index],
        radius,
        material: MaterialHint::glowing(color, 0.5),
    };

    let mut markers = Vec::with_capacity(2 + extrema.map_or(0, ExtremaSet::len));
    if !curve.is_empty() {
        let last = curve.len() - 1;
        markers.push(marker(
            MarkerRole::Start,
            0,
            Color::LIME_GREEN,
            config.endpoint_marker_radius,
        ));
        markers.push(marker(MarkerRole::End, last, Color::GOLD, config.endpoint_marker_radius));
    }

    if let Some(set) = extrema {
        markers.extend(
            set.maxima
                .iter()
                .map(|&i| marker(MarkerRole::High, i, Color::RED, config.marker_radius)),
        );
        markers.extend(
            set.minima
                .iter()
                .map(|&i| marker(MarkerRole::Low, i, Color::BLUE, config.marker_radius)),
        );
    }

    markers
}
