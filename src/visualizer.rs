//! # Visualizer
//!
//! Owns the renderer-side resources of the one activity currently on screen.
//!
//! A [`Visualizer`] holds at most one bundle together with the handle its
//! [`RenderAdapter`] returned for it. Showing another activity releases the
//! old handle before the new bundle is composed and uploaded, so repeated
//! "visualize" actions never accumulate buffers. Dropping the visualizer
//! releases whatever is still held.
//!
//! ## Example
//!
//! ```rust
//! use activity_geometry::{
//!     ActivityRecord, ActivityType, GeometryBundle, RenderAdapter, Visualizer,
//! };
//!
//! #[derive(Default)]
//! struct CountingAdapter {
//!     live: usize,
//! }
//!
//! impl RenderAdapter for CountingAdapter {
//!     type Handle = ();
//!
//!     fn upload(&mut self, _bundle: &GeometryBundle) {
//!         self.live += 1;
//!     }
//!
//!     fn release(&mut self, _handle: ()) {
//!         self.live -= 1;
//!     }
//! }
//!
//! let mut visualizer = Visualizer::new(CountingAdapter::default());
//! let ride = ActivityRecord::builder("Commute", ActivityType::Ride).distance(8_000.0).build();
//!
//! visualizer.visualize(&ride).unwrap();
//! visualizer.visualize(&ride).unwrap();
//! assert_eq!(visualizer.adapter().live, 1);
//! ```

use log::{debug, info};

use crate::activity::ActivityRecord;
use crate::error::Result;
use crate::geometry::GeometryBundle;
use crate::pipeline::visualize_activity;
use crate::VisualizationConfig;

/// Bridge to a rendering engine.
///
/// `upload` turns a bundle into engine resources (meshes, materials, camera
/// placement) and returns a handle to them. `release` frees exactly those
/// resources. Each handle is released exactly once.
pub trait RenderAdapter {
    type Handle;

    fn upload(&mut self, bundle: &GeometryBundle) -> Self::Handle;

    fn release(&mut self, handle: Self::Handle);
}

struct ActiveGeometry<H> {
    bundle: GeometryBundle,
    handle: H,
}

/// Single-slot owner of the displayed geometry.
pub struct Visualizer<A: RenderAdapter> {
    adapter: A,
    config: VisualizationConfig,
    current: Option<ActiveGeometry<A::Handle>>,
}

impl<A: RenderAdapter> Visualizer<A> {
    /// Create a visualizer with default configuration and nothing shown.
    pub fn new(adapter: A) -> Self {
        Self::with_config(adapter, VisualizationConfig::default())
    }

    pub fn with_config(adapter: A, config: VisualizationConfig) -> Self {
        Self {
            adapter,
            config,
            current: None,
        }
    }

    /// Show an activity, replacing whatever was on screen.
    ///
    /// The previous geometry is released first. If the record is invalid the
    /// error is returned and the slot stays empty.
    pub fn visualize(&mut self, activity: &ActivityRecord) -> Result<&GeometryBundle> {
        self.clear();
        let bundle = visualize_activity(activity, &self.config)?;
        Ok(self.install(bundle))
    }

    /// Show the idle-state placeholder.
    pub fn show_placeholder(&mut self) -> &GeometryBundle {
        self.clear();
        self.install(GeometryBundle::placeholder())
    }

    /// Release the current geometry, if any.
    pub fn clear(&mut self) {
        if let Some(active) = self.current.take() {
            debug!(
                "[Visualizer] Releasing {:?} geometry",
                active.bundle.kind()
            );
            self.adapter.release(active.handle);
        }
    }

    /// The bundle on screen.
    pub fn current(&self) -> Option<&GeometryBundle> {
        self.current.as_ref().map(|active| &active.bundle)
    }

    pub fn is_showing(&self) -> bool {
        self.current.is_some()
    }

    pub fn config(&self) -> &VisualizationConfig {
        &self.config
    }

    /// Change the configuration for subsequent activities.
    pub fn set_config(&mut self, config: VisualizationConfig) {
        self.config = config;
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    fn install(&mut self, bundle: GeometryBundle) -> &GeometryBundle {
        let handle = self.adapter.upload(&bundle);
        info!(
            "[Visualizer] Showing {:?} geometry (camera at {:.2})",
            bundle.kind(),
            bundle.camera_distance
        );
        &self.current.insert(ActiveGeometry { bundle, handle }).bundle
    }
}

impl<A: RenderAdapter> Drop for Visualizer<A> {
    fn drop(&mut self) {
        self.clear();
    }
}
