//! End-to-end visualization: record in, geometry bundle out.
//!
//! Decode and normalization failures never reach the caller. They are logged
//! and the activity is shown in shape mode. Only a structurally invalid record
//! is reported as an error.

use log::{debug, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::activity::ActivityRecord;
use crate::error::Result;
use crate::geo_utils::polyline_length;
use crate::geometry::{build_geometry, GeometryBundle};
use crate::normalize::{normalize, NormalizedRoute};
use crate::polyline;
use crate::VisualizationConfig;

/// A decoded and normalized route, ready for the geometry mapper.
#[derive(Debug, Clone)]
pub struct PreparedRoute {
    pub route: NormalizedRoute,
    /// Haversine length of the decoded path
    pub path_length_m: f64,
}

/// Decode and normalize the activity's path.
///
/// `Ok(None)` means the activity carries no path at all.
pub fn prepare_route(activity: &ActivityRecord) -> Result<Option<PreparedRoute>> {
    let encoded = match activity.encoded_path.as_deref() {
        Some(encoded) if activity.has_path() => encoded,
        _ => return Ok(None),
    };
    let Some(points) = polyline::decode(encoded)? else {
        return Ok(None);
    };

    let route = normalize(&points, activity.elevation_samples.as_deref())?;
    Ok(Some(PreparedRoute {
        route,
        path_length_m: polyline_length(&points),
    }))
}

/// Build the geometry bundle for one activity.
///
/// # Errors
///
/// [`VizError::InvalidActivity`](crate::VizError::InvalidActivity) when the
/// record fails validation. Nothing else is surfaced.
///
/// # Example
/// ```
/// use activity_geometry::{
///     visualize_activity, ActivityRecord, ActivityType, GeometryKind, VisualizationConfig,
/// };
///
/// // Malformed path: falls back to shape mode instead of failing
/// let activity = ActivityRecord::builder("Broken", ActivityType::Swim)
///     .distance(1_500.0)
///     .moving_time(1_800)
///     .encoded_path("_p~iF")
///     .build();
///
/// let bundle = visualize_activity(&activity, &VisualizationConfig::default()).unwrap();
/// assert_eq!(bundle.kind(), GeometryKind::Shape);
/// ```
pub fn visualize_activity(
    activity: &ActivityRecord,
    config: &VisualizationConfig,
) -> Result<GeometryBundle> {
    activity.validate()?;

    match prepare_route(activity) {
        Ok(Some(prepared)) => {
            Ok(build_geometry(activity, Some(&prepared.route), config)
                .with_path_length(prepared.path_length_m / 1000.0))
        }
        Ok(None) => {
            debug!(
                "[ActivityGeometry] '{}' has no path data, using shape mode",
                activity.name
            );
            Ok(build_geometry(activity, None, config))
        }
        Err(e) if e.is_route_fallback() => {
            warn!(
                "[ActivityGeometry] Route for '{}' unusable ({}), falling back to shape mode",
                activity.name, e
            );
            Ok(build_geometry(activity, None, config))
        }
        Err(e) => Err(e),
    }
}

/// Visualize several activities, one result per input.
pub fn visualize_batch(
    activities: &[ActivityRecord],
    config: &VisualizationConfig,
) -> Vec<Result<GeometryBundle>> {
    activities
        .iter()
        .map(|activity| visualize_activity(activity, config))
        .collect()
}

/// Parallel version of [`visualize_batch`]. Output order matches input order.
#[cfg(feature = "parallel")]
pub fn visualize_batch_parallel(
    activities: &[ActivityRecord],
    config: &VisualizationConfig,
) -> Vec<Result<GeometryBundle>> {
    activities
        .par_iter()
        .map(|activity| visualize_activity(activity, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActivityType, ElevationSource, GeoPoint, GeometryKind, VizError};

    const REFERENCE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    fn run(encoded: Option<&str>) -> ActivityRecord {
        let builder = ActivityRecord::builder("Run", ActivityType::Run)
            .distance(10_000.0)
            .moving_time(3_000);
        match encoded {
            Some(e) => builder.encoded_path(e).build(),
            None => builder.build(),
        }
    }

    #[test]
    fn test_prepare_route_without_path() {
        assert!(prepare_route(&run(None)).unwrap().is_none());
        assert!(prepare_route(&run(Some(""))).unwrap().is_none());
    }

    #[test]
    fn test_prepare_route_reports_errors() {
        assert!(matches!(
            prepare_route(&run(Some("_p~iF"))),
            Err(VizError::Decode(_))
        ));
        // A single vertex is not a route
        assert!(matches!(
            prepare_route(&run(Some("_p~iF~ps|U"))),
            Err(VizError::InsufficientData { point_count: 1, .. })
        ));
    }

    #[test]
    fn test_prepare_route_measures_path() {
        let prepared = prepare_route(&run(Some(REFERENCE))).unwrap().unwrap();
        assert_eq!(prepared.route.len(), 3);
        assert_eq!(prepared.route.elevation_source, ElevationSource::Synthetic);
        // Roughly 250 km + 535 km between the three fixture vertices
        assert!(prepared.path_length_m > 700_000.0 && prepared.path_length_m < 900_000.0);
    }

    #[test]
    fn test_visualize_route_records_path_length() {
        let bundle =
            visualize_activity(&run(Some(REFERENCE)), &VisualizationConfig::default()).unwrap();
        assert_eq!(bundle.kind(), GeometryKind::Route);
        assert!(bundle.summary.unwrap().path_length_km.unwrap() > 700.0);
    }

    #[test]
    fn test_visualize_falls_back_on_degenerate_path() {
        let bundle =
            visualize_activity(&run(Some("????????")), &VisualizationConfig::default()).unwrap();
        assert_eq!(bundle.kind(), GeometryKind::Shape);
    }

    #[test]
    fn test_out_of_range_vertices_fall_back() {
        // Encodes fine, but 95° is not a latitude
        let encoded = polyline::encode(&[GeoPoint::new(95.0, 10.0), GeoPoint::new(96.0, 11.0)]);
        assert!(matches!(
            prepare_route(&run(Some(&encoded))),
            Err(VizError::InvalidCoordinate { index: 0, .. })
        ));
        let bundle = visualize_activity(&run(Some(&encoded)), &VisualizationConfig::default());
        assert_eq!(bundle.unwrap().kind(), GeometryKind::Shape);
    }

    #[test]
    fn test_visualize_rejects_invalid_record() {
        let mut activity = run(Some(REFERENCE));
        activity.distance = f64::NAN;
        assert!(matches!(
            visualize_activity(&activity, &VisualizationConfig::default()),
            Err(VizError::InvalidActivity { .. })
        ));
    }

    #[test]
    fn test_visualize_batch_keeps_order() {
        let activities = vec![run(Some(REFERENCE)), run(None), run(Some("!"))];
        let results = visualize_batch(&activities, &VisualizationConfig::default());
        let kinds: Vec<GeometryKind> = results.into_iter().map(|r| r.unwrap().kind()).collect();
        assert_eq!(kinds, vec![GeometryKind::Route, GeometryKind::Shape, GeometryKind::Shape]);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_batch_matches_sequential() {
        let activities = vec![run(Some(REFERENCE)), run(None), run(Some("_p~iF"))];
        let config = VisualizationConfig::default();
        let sequential = visualize_batch(&activities, &config);
        let parallel = visualize_batch_parallel(&activities, &config);
        assert_eq!(sequential, parallel);
    }
}
