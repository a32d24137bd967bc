//! FFI bindings for mobile platforms (iOS/Android).
//!
//! This module provides the UniFFI bindings that expose Rust functionality
//! to Kotlin and Swift. All FFI functions are prefixed with `ffi_` to avoid
//! naming conflicts with the internal API.
//!
//! Bundles cross the boundary as JSON: the payload is a tagged union that maps
//! poorly onto UniFFI records, and hosts already hand it to a JS or native
//! scene builder.

use log::{debug, info, warn};
use serde::Serialize;

use crate::{
    init_logging, normalize, polyline, visualize_activity, ActivityRecord, GeoPoint,
    GeometryBundle, ProfilePoint, VisualizationConfig,
};

#[cfg(feature = "parallel")]
use crate::visualize_batch_parallel;

// ============================================================================
// Configuration
// ============================================================================

/// Get default visualization configuration.
#[uniffi::export]
pub fn ffi_default_config() -> VisualizationConfig {
    init_logging();
    VisualizationConfig::default()
}

// ============================================================================
// Visualization
// ============================================================================

#[derive(Serialize)]
struct FfiError {
    error: String,
}

fn error_json(message: String) -> String {
    serde_json::to_string(&FfiError { error: message })
        .unwrap_or_else(|_| String::from(r#"{"error":"serialization failed"}"#))
}

fn bundle_json(bundle: &GeometryBundle) -> String {
    bundle
        .to_json()
        .unwrap_or_else(|e| error_json(format!("Failed to serialize bundle: {}", e)))
}

/// Build the geometry bundle for one activity given as JSON.
///
/// Returns the bundle JSON, or `{"error": "..."}` when the record cannot be
/// parsed or fails validation.
#[uniffi::export]
pub fn ffi_visualize_activity_json(activity_json: String, config: VisualizationConfig) -> String {
    init_logging();
    debug!(
        "[ActivityGeometryRust] ffi_visualize_activity_json called ({} bytes)",
        activity_json.len()
    );

    let result = ActivityRecord::from_json(&activity_json)
        .and_then(|activity| visualize_activity(&activity, &config));

    match result {
        Ok(bundle) => {
            info!(
                "[ActivityGeometryRust] Built {:?} bundle (camera at {:.2})",
                bundle.kind(),
                bundle.camera_distance
            );
            bundle_json(&bundle)
        }
        Err(e) => {
            warn!("[ActivityGeometryRust] Visualization failed: {}", e);
            error_json(e.to_string())
        }
    }
}

/// Build bundles for a JSON array of activities.
///
/// Returns one JSON document per input element, in input order. A malformed
/// array yields a single error document.
#[uniffi::export]
pub fn ffi_visualize_batch_json(
    activities_json: String,
    config: VisualizationConfig,
) -> Vec<String> {
    init_logging();

    let activities: Vec<ActivityRecord> = match serde_json::from_str(&activities_json) {
        Ok(activities) => activities,
        Err(e) => {
            warn!("[ActivityGeometryRust] Failed to parse activity batch: {}", e);
            return vec![error_json(format!("Invalid activity batch: {}", e))];
        }
    };

    info!(
        "[ActivityGeometryRust] ffi_visualize_batch_json called with {} activities",
        activities.len()
    );

    #[cfg(feature = "parallel")]
    let results = visualize_batch_parallel(&activities, &config);
    #[cfg(not(feature = "parallel"))]
    let results = crate::visualize_batch(&activities, &config);

    results
        .into_iter()
        .map(|result| match result {
            Ok(bundle) => bundle_json(&bundle),
            Err(e) => error_json(e.to_string()),
        })
        .collect()
}

/// Idle-state placeholder bundle as JSON.
#[uniffi::export]
pub fn ffi_placeholder_json() -> String {
    init_logging();
    bundle_json(&GeometryBundle::placeholder())
}

// ============================================================================
// Polyline and Profile
// ============================================================================

/// Decode an encoded polyline. Malformed input yields an empty list.
#[uniffi::export]
pub fn ffi_decode_polyline(encoded: String) -> Vec<GeoPoint> {
    init_logging();
    match polyline::decode(&encoded) {
        Ok(Some(points)) => {
            debug!(
                "[ActivityGeometryRust] Decoded {} points from {} chars",
                points.len(),
                encoded.len()
            );
            points
        }
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!("[ActivityGeometryRust] Failed to decode polyline: {}", e);
            Vec::new()
        }
    }
}

/// Encode GPS points as a polyline.
#[uniffi::export]
pub fn ffi_encode_polyline(points: Vec<GeoPoint>) -> String {
    init_logging();
    polyline::encode(&points)
}

/// Elevation profile for a route given as flat points plus optional samples.
///
/// An empty `elevations` list means "no recorded elevation". Returns an empty
/// list when the route cannot be normalized.
#[uniffi::export]
pub fn ffi_elevation_profile(
    points: Vec<GeoPoint>,
    elevations: Vec<f64>,
    config: VisualizationConfig,
) -> Vec<ProfilePoint> {
    init_logging();
    let samples = (!elevations.is_empty()).then_some(elevations.as_slice());

    match normalize(&points, samples) {
        Ok(route) => {
            crate::profile::build_profile_with_height(route.points(), config.profile_height)
                .unwrap_or_default()
        }
        Err(e) => {
            warn!("[ActivityGeometryRust] Cannot build profile: {}", e);
            Vec::new()
        }
    }
}
