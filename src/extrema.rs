//! Local peak and valley detection on a normalized elevation series.
//!
//! A single forward pass over the candidates: a sample is an extremum when no
//! other sample inside a symmetric window beats it. Equal neighbors do not
//! disqualify, so a plateau yields one extremum at its first qualifying index.
//! After a hit the scan jumps past the window, which keeps markers apart.

use serde::{Deserialize, Serialize};

use crate::NormalizedPoint;

/// Half-width of the comparison window.
pub const DEFAULT_WINDOW_SIZE: usize = 10;

/// Maximum extrema returned per kind.
pub const MAX_EXTREMA: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtremumKind {
    Max,
    Min,
}

impl ExtremumKind {
    /// Whether `other` beats `candidate`. Ties never do.
    #[inline]
    fn beats(self, other: f64, candidate: f64) -> bool {
        match self {
            ExtremumKind::Max => other > candidate,
            ExtremumKind::Min => other < candidate,
        }
    }
}

/// High and low points chosen for annotation, as indices into the route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtremaSet {
    pub maxima: Vec<usize>,
    pub minima: Vec<usize>,
}

impl ExtremaSet {
    pub fn is_empty(&self) -> bool {
        self.maxima.is_empty() && self.minima.is_empty()
    }

    pub fn len(&self) -> usize {
        self.maxima.len() + self.minima.len()
    }
}

/// Find local maxima or minima, keeping at most [`MAX_EXTREMA`].
///
/// Candidates are the indices in `[window_size, n - window_size)`. When more
/// than five are found, the five with the largest elevation change from their
/// predecessor are returned, largest first; otherwise indices come back in path
/// order.
///
/// # Example
///
/// ```rust
/// use activity_geometry::{find_extrema, ExtremumKind, NormalizedPoint};
///
/// let points: Vec<NormalizedPoint> = (0..30)
///     .map(|i| {
///         let elevation = -((i as f64 - 15.0).powi(2));
///         NormalizedPoint { x: 0.0, y: 0.0, elevation, normalized_elevation: 0.0 }
///     })
///     .collect();
///
/// assert_eq!(find_extrema(&points, ExtremumKind::Max, 10), vec![15]);
/// assert!(find_extrema(&points, ExtremumKind::Min, 10).is_empty());
/// ```
pub fn find_extrema(
    points: &[NormalizedPoint],
    kind: ExtremumKind,
    window_size: usize,
) -> Vec<usize> {
    find_extrema_limited(points, kind, window_size, MAX_EXTREMA)
}

/// [`find_extrema`] with a caller-chosen cap.
pub fn find_extrema_limited(
    points: &[NormalizedPoint],
    kind: ExtremumKind,
    window_size: usize,
    limit: usize,
) -> Vec<usize> {
    let end = points.len().saturating_sub(window_size);
    let mut found = Vec::new();

    let mut i = window_size;
    while i < end {
        let candidate = points[i].elevation;
        let beaten = (i - window_size..=i + window_size)
            .filter(|&j| j != i)
            .any(|j| kind.beats(points[j].elevation, candidate));

        if !beaten {
            found.push(i);
            i += window_size;
        }
        i += 1;
    }

    if found.len() <= limit {
        return found;
    }

    let mut ranked: Vec<(usize, f64)> = found
        .into_iter()
        .map(|i| (i, step_change(points, i)))
        .collect();
    // Stable: equal changes keep path order
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(limit);
    ranked.into_iter().map(|(i, _)| i).collect()
}

/// Find both maxima and minima.
pub fn find_extrema_set(
    points: &[NormalizedPoint],
    window_size: usize,
    limit: usize,
) -> ExtremaSet {
    ExtremaSet {
        maxima: find_extrema_limited(points, ExtremumKind::Max, window_size, limit),
        minima: find_extrema_limited(points, ExtremumKind::Min, window_size, limit),
    }
}

/// Absolute elevation change from the previous sample.
fn step_change(points: &[NormalizedPoint], index: usize) -> f64 {
    match index.checked_sub(1) {
        Some(prev) => (points[index].elevation - points[prev].elevation).abs(),
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(elevations: &[f64]) -> Vec<NormalizedPoint> {
        elevations
            .iter()
            .enumerate()
            .map(|(i, &elevation)| NormalizedPoint {
                x: i as f64,
                y: 0.0,
                elevation,
                normalized_elevation: 0.0,
            })
            .collect()
    }

    /// Peaks every 6 samples on a gently rising baseline.
    fn sawtooth_peaks(count: usize) -> Vec<f64> {
        (0..count)
            .map(|i| {
                if i % 6 == 3 {
                    100.0 + i as f64
                } else {
                    0.01 * i as f64
                }
            })
            .collect()
    }

    #[test]
    fn test_single_peak() {
        let elevations: Vec<f64> = (0..30).map(|i| -((i as f64 - 15.0).powi(2))).collect();
        let points = series(&elevations);
        assert_eq!(find_extrema(&points, ExtremumKind::Max, 10), vec![15]);
        assert!(find_extrema(&points, ExtremumKind::Min, 10).is_empty());
    }

    #[test]
    fn test_single_valley() {
        let elevations: Vec<f64> = (0..30).map(|i| (i as f64 - 12.0).powi(2)).collect();
        let points = series(&elevations);
        assert_eq!(find_extrema(&points, ExtremumKind::Min, 10), vec![12]);
    }

    #[test]
    fn test_edges_are_never_candidates() {
        // Global max at index 2 is inside the leading window
        let mut elevations = vec![0.0; 30];
        elevations[2] = 500.0;
        let points = series(&elevations);
        let maxima = find_extrema(&points, ExtremumKind::Max, 10);
        assert!(!maxima.contains(&2));
    }

    #[test]
    fn test_plateau_ties_do_not_disqualify() {
        let points = series(&vec![50.0; 30]);
        // First candidate qualifies, then the scan skips past index 20
        assert_eq!(find_extrema(&points, ExtremumKind::Max, 10), vec![10]);
        assert_eq!(find_extrema(&points, ExtremumKind::Min, 10), vec![10]);
    }

    #[test]
    fn test_too_short_for_window() {
        let points = series(&[1.0, 5.0, 2.0]);
        assert!(find_extrema(&points, ExtremumKind::Max, 10).is_empty());
        assert!(find_extrema(&[], ExtremumKind::Min, 10).is_empty());
    }

    #[test]
    fn test_caps_to_largest_step_changes() {
        let points = series(&sawtooth_peaks(60));
        // Ten peaks at 3, 9, ..., 57; the step into each grows with the index
        let all = find_extrema_limited(&points, ExtremumKind::Max, 2, usize::MAX);
        assert_eq!(all, vec![3, 9, 15, 21, 27, 33, 39, 45, 51, 57]);

        let capped = find_extrema(&points, ExtremumKind::Max, 2);
        assert_eq!(capped, vec![57, 51, 45, 39, 33]);
    }

    #[test]
    fn test_window_zero_marks_every_sample() {
        let points = series(&[3.0, 1.0, 2.0]);
        let maxima = find_extrema_limited(&points, ExtremumKind::Max, 0, 10);
        assert_eq!(maxima, vec![0, 1, 2]);
    }

    #[test]
    fn test_indices_respect_bounds_and_spacing() {
        let elevations: Vec<f64> = (0..400)
            .map(|i| (i as f64 * 0.21).sin() * 40.0 + (i as f64 * 0.05).cos() * 25.0)
            .collect();
        let points = series(&elevations);
        let window = DEFAULT_WINDOW_SIZE;

        for kind in [ExtremumKind::Max, ExtremumKind::Min] {
            let found = find_extrema(&points, kind, window);
            assert!(!found.is_empty());
            assert!(found.len() <= MAX_EXTREMA);
            for &i in &found {
                assert!(i >= window && i < points.len() - window);
            }
            for (a, &i) in found.iter().enumerate() {
                for &j in &found[a + 1..] {
                    assert!(i.abs_diff(j) >= window);
                }
            }
        }
    }

    #[test]
    fn test_find_extrema_set() {
        // A hill centered on 12 and a hollow centered on 28
        let elevations: Vec<f64> = (0..41)
            .map(|i| {
                let x = i as f64;
                80.0 * (-((x - 12.0) / 3.0).powi(2)).exp()
                    - 60.0 * (-((x - 28.0) / 3.0).powi(2)).exp()
            })
            .collect();
        let set = find_extrema_set(&series(&elevations), 10, MAX_EXTREMA);
        assert_eq!(set.maxima, vec![12]);
        assert_eq!(set.minima, vec![28]);
        assert_eq!(set.len(), 2);
        assert!(!set.is_empty());
    }
}
