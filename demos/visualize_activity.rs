//! Visualize an activity from the command line.
//!
//! ```text
//! cargo run --example visualize_activity                 # built-in sample ride
//! cargo run --example visualize_activity -- ride.json    # activity JSON file
//! RUST_LOG=debug cargo run --example visualize_activity
//! ```
//!
//! Prints a text rendering of what a 3D renderer would receive, followed by
//! the bundle JSON.

use std::env;
use std::fs;

use chrono::Utc;

use activity_geometry::{
    ActivityRecord, ActivityType, GeometryBundle, GeometryPayload, RenderAdapter, Visualizer,
};

const SAMPLE_PATH: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

/// Stand-in renderer that describes the scene instead of drawing it.
#[derive(Default)]
struct ConsoleRenderer {
    next_handle: u32,
}

impl RenderAdapter for ConsoleRenderer {
    type Handle = u32;

    fn upload(&mut self, bundle: &GeometryBundle) -> u32 {
        self.next_handle += 1;
        println!("== scene #{} ==", self.next_handle);

        if let Some(summary) = &bundle.summary {
            println!(
                "{} ({}) {} km, {} min",
                summary.activity_name,
                summary.activity_type,
                summary.distance_label(),
                summary.duration_minutes
            );
        }

        match &bundle.payload {
            GeometryPayload::Route(route) => {
                println!(
                    "tube: {} vertices, radius {:.3}, {}x{} segments, {:?} elevation",
                    route.curve.len(),
                    route.tube.radius,
                    route.tube.tubular_segments,
                    route.tube.radial_segments,
                    route.elevation_source
                );
                for marker in &route.markers {
                    println!(
                        "  {:?} marker at #{} ({:.2}, {:.2}, {:.2})",
                        marker.role,
                        marker.index,
                        marker.position[0],
                        marker.position[1],
                        marker.position[2]
                    );
                }
                if let Some(profile) = &route.profile {
                    println!("  profile: {} points", profile.len());
                }
            }
            GeometryPayload::Shape(shape) => {
                println!(
                    "shape: {:?}, size {:.2}, color {}",
                    shape.primitive,
                    shape.size,
                    shape.color.to_hex()
                );
            }
        }
        println!("camera: z = {:.2}", bundle.camera_distance);
        self.next_handle
    }

    fn release(&mut self, handle: u32) {
        println!("== released scene #{} ==", handle);
    }
}

fn load_activity() -> Result<ActivityRecord, Box<dyn std::error::Error>> {
    match env::args().nth(1) {
        Some(path) => {
            let json = fs::read_to_string(&path)?;
            Ok(ActivityRecord::from_json(&json)?)
        }
        None => Ok(ActivityRecord::builder("Sample Ride", ActivityType::Ride)
            .distance(24_600.0)
            .moving_time(3_420)
            .encoded_path(SAMPLE_PATH)
            .start_date(Utc::now())
            .build()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let activity = load_activity()?;
    let mut visualizer = Visualizer::new(ConsoleRenderer::default());

    visualizer.show_placeholder();
    let bundle = visualizer.visualize(&activity)?;
    println!("{}", serde_json::to_string_pretty(bundle)?);

    Ok(())
}
