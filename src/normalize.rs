//! Coordinate normalization.
//!
//! Projects GPS points into a local, equirectangular-style scene space: the
//! bounding-box center goes to the origin and the longer side spans `[-1, 1]`.
//! No geodesic correction is applied.
//!
//! When a route has no usable elevation, a synthetic terrain is generated so
//! the rendered tube still has visible relief. Synthetic elevation is a pure
//! function of position and sequence index. It is not altitude data and is
//! flagged as [`ElevationSource::Synthetic`].

use std::f64::consts::PI;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Result, VizError};
use crate::{Bounds, GeoPoint, NormalizedPoint};

/// Minimum number of points for a route.
pub const MIN_ROUTE_POINTS: usize = 2;

/// Meters of synthetic height per unit of normalized distance from center.
const SYNTHETIC_RADIAL_GAIN: f64 = 100.0;
/// Amplitude of the index-driven undulation in meters.
const SYNTHETIC_WAVE_AMPLITUDE: f64 = 30.0;
/// Half-periods of the undulation over the whole route.
const SYNTHETIC_WAVE_FREQUENCY: f64 = 8.0;

/// Where the elevations of a normalized route came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElevationSource {
    /// Supplied samples or the points' own elevations
    Recorded,
    /// Generated terrain; not altitude-accurate
    Synthetic,
}

/// A route in scene coordinates, one point per input point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRoute {
    pub points: Vec<NormalizedPoint>,
    pub elevation_source: ElevationSource,
    /// Geographic bounds of the input
    pub bounds: Bounds,
    pub min_elevation: f64,
    pub max_elevation: f64,
}

impl NormalizedRoute {
    pub fn points(&self) -> &[NormalizedPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Elevation span in meters.
    pub fn elevation_range(&self) -> f64 {
        self.max_elevation - self.min_elevation
    }
}

/// Normalize GPS points into scene coordinates.
///
/// `elevations`, when given, must line up index-for-index with `points`;
/// otherwise the points' own elevations are used. Flat or unusable elevation is
/// replaced by synthetic terrain (see [`synthetic_elevation`]).
///
/// # Errors
///
/// - [`VizError::InsufficientData`] for fewer than 2 points
/// - [`VizError::DegeneratePath`] when every point has the same coordinates
/// - [`VizError::InvalidCoordinate`] for the first point outside WGS84 ranges
///
/// # Example
///
/// ```rust
/// use activity_geometry::{normalize, ElevationSource, GeoPoint};
///
/// let points = vec![
///     GeoPoint::new(46.0, 7.0),
///     GeoPoint::new(46.5, 7.5),
///     GeoPoint::new(47.0, 8.0),
/// ];
/// let route = normalize(&points, Some(&[400.0, 900.0, 1400.0])).unwrap();
///
/// assert_eq!(route.elevation_source, ElevationSource::Recorded);
/// assert_eq!(route.points[0].x, -1.0);
/// assert_eq!(route.points[1].normalized_elevation, 0.5);
/// ```
pub fn normalize(points: &[GeoPoint], elevations: Option<&[f64]>) -> Result<NormalizedRoute> {
    if points.len() < MIN_ROUTE_POINTS {
        return Err(VizError::InsufficientData {
            point_count: points.len(),
            minimum_required: MIN_ROUTE_POINTS,
        });
    }

    if let Some((index, p)) = points.iter().enumerate().find(|(_, p)| !p.is_valid()) {
        return Err(VizError::InvalidCoordinate {
            index,
            latitude: p.latitude,
            longitude: p.longitude,
        });
    }

    let bounds = crate::geo_utils::compute_bounds(points);
    let lat_range = bounds.lat_range();
    let lng_range = bounds.lng_range();
    if lat_range == 0.0 && lng_range == 0.0 {
        return Err(VizError::DegeneratePath {
            point_count: points.len(),
        });
    }

    let (elevations, elevation_source) = resolve_elevations(points, elevations, &bounds);
    let (min_elevation, max_elevation) = elevation_extent(&elevations);
    let elevation_range = max_elevation - min_elevation;
    let elevation_divisor = if elevation_range == 0.0 {
        1.0
    } else {
        elevation_range
    };

    let center = bounds.center();
    let scale = 2.0 / lat_range.max(lng_range);

    let normalized: Vec<NormalizedPoint> = points
        .iter()
        .zip(&elevations)
        .map(|(p, &elevation)| NormalizedPoint {
            x: (p.longitude - center.longitude) * scale,
            y: (p.latitude - center.latitude) * scale,
            elevation,
            normalized_elevation: (elevation - min_elevation) / elevation_divisor,
        })
        .collect();

    debug!(
        "[ActivityGeometry] Normalized {} points ({:?} elevation {:.1}..{:.1}m, scale {:.3})",
        normalized.len(),
        elevation_source,
        min_elevation,
        max_elevation,
        scale
    );

    Ok(NormalizedRoute {
        points: normalized,
        elevation_source,
        bounds,
        min_elevation,
        max_elevation,
    })
}

/// Pick the elevation series for a route.
///
/// Recorded elevation wins when it is aligned, finite and not flat; anything
/// else falls through to synthetic terrain.
pub fn resolve_elevations(
    points: &[GeoPoint],
    elevations: Option<&[f64]>,
    bounds: &Bounds,
) -> (Vec<f64>, ElevationSource) {
    match recorded_elevations(points, elevations) {
        Some(recorded) if !is_flat(&recorded) => (recorded, ElevationSource::Recorded),
        _ => {
            let count = points.len();
            let synthetic = points
                .iter()
                .enumerate()
                .map(|(i, p)| synthetic_elevation(p, i, count, bounds))
                .collect();
            (synthetic, ElevationSource::Synthetic)
        }
    }
}

/// Recorded elevation for each point, or `None` when there is none usable.
fn recorded_elevations(points: &[GeoPoint], elevations: Option<&[f64]>) -> Option<Vec<f64>> {
    let series: Vec<f64> = match elevations {
        Some(samples) if samples.len() == points.len() => samples.to_vec(),
        Some(samples) => {
            warn!(
                "[ActivityGeometry] Ignoring {} elevation samples for {} points",
                samples.len(),
                points.len()
            );
            return None;
        }
        None => points.iter().map(|p| p.elevation).collect(),
    };

    if series.iter().all(|e| e.is_finite()) {
        Some(series)
    } else {
        warn!("[ActivityGeometry] Ignoring elevation series with non-finite samples");
        None
    }
}

fn is_flat(elevations: &[f64]) -> bool {
    let (min, max) = elevation_extent(elevations);
    min == max
}

fn elevation_extent(elevations: &[f64]) -> (f64, f64) {
    elevations
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &e| {
            (min.min(e), max.max(e))
        })
}

/// Synthetic terrain height in meters for the point at `index` of `count`.
///
/// `dist * 100 + sin(index / count * π * 8) * 30`, where `dist` is the distance
/// from the bounds center with each axis divided by its own range. An axis
/// with zero range contributes nothing.
pub fn synthetic_elevation(point: &GeoPoint, index: usize, count: usize, bounds: &Bounds) -> f64 {
    let center = bounds.center();
    let lat_term = axis_ratio(point.latitude - center.latitude, bounds.lat_range());
    let lng_term = axis_ratio(point.longitude - center.longitude, bounds.lng_range());
    let dist_from_center = (lat_term * lat_term + lng_term * lng_term).sqrt();

    let variation = (index as f64 / count as f64 * PI * SYNTHETIC_WAVE_FREQUENCY).sin();

    dist_from_center * SYNTHETIC_RADIAL_GAIN + variation * SYNTHETIC_WAVE_AMPLITUDE
}

fn axis_ratio(offset: f64, range: f64) -> f64 {
    if range == 0.0 {
        0.0
    } else {
        offset / range
    }
}
