//! Elevation profile for the sidebar.

use serde::{Deserialize, Serialize};

use crate::NormalizedPoint;

/// Height of the profile at normalized elevation 1.
pub const DEFAULT_PROFILE_HEIGHT: f64 = 0.5;

/// One vertex of the profile line; `x` runs along the route, `z` is height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct ProfilePoint {
    pub x: f64,
    pub z: f64,
}

/// Map route points onto a profile with `x` in `[-1, 1]` and
/// `z = normalized_elevation * 0.5`.
///
/// Position along the route is by sample index, not distance. Returns `None`
/// for fewer than 2 points.
pub fn build_profile(points: &[NormalizedPoint]) -> Option<Vec<ProfilePoint>> {
    build_profile_with_height(points, DEFAULT_PROFILE_HEIGHT)
}

/// [`build_profile`] with a custom height.
pub fn build_profile_with_height(
    points: &[NormalizedPoint],
    height: f64,
) -> Option<Vec<ProfilePoint>> {
    if points.len() < 2 {
        return None;
    }

    let last = (points.len() - 1) as f64;
    Some(
        points
            .iter()
            .enumerate()
            .map(|(i, p)| ProfilePoint {
                x: -1.0 + 2.0 * i as f64 / last,
                z: p.normalized_elevation * height,
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(normalized_elevation: f64) -> NormalizedPoint {
        NormalizedPoint {
            x: 0.0,
            y: 0.0,
            elevation: normalized_elevation * 100.0,
            normalized_elevation,
        }
    }

    #[test]
    fn test_profile_spans_unit_x() {
        let points = vec![point(0.0), point(1.0), point(0.5)];
        let profile = build_profile(&points).unwrap();
        assert_eq!(
            profile,
            vec![
                ProfilePoint { x: -1.0, z: 0.0 },
                ProfilePoint { x: 0.0, z: 0.5 },
                ProfilePoint { x: 1.0, z: 0.25 },
            ]
        );
    }

    #[test]
    fn test_profile_needs_two_points() {
        assert!(build_profile(&[]).is_none());
        assert!(build_profile(&[point(0.3)]).is_none());
    }

    #[test]
    fn test_profile_custom_height() {
        let points = vec![point(0.0), point(1.0)];
        let profile = build_profile_with_height(&points, 2.0).unwrap();
        assert_eq!(profile[1].z, 2.0);
    }
}
