//! Manhattan-world vanishing point detection from image line segments.
//!
//! Every segment is lifted to the great circle of camera-space directions it
//! can belong to. Two dominant directions are then found by 2-line RANSAC on
//! those great circles, the third is their cross product, and every line is
//! reassigned to the direction it agrees with best.
//!
//! ## Quickstart
//!
//! ```no_run
//! use vp_detect::{build_debug_overlay, LineSetFile, VpDetector, VpDetectorParams};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let lines = LineSetFile::load_json("corridor_lines.json")?;
//! let detector = VpDetector::new(VpDetectorParams {
//!     seed: Some(42),
//!     ..VpDetectorParams::default()
//! });
//! let camera = detector.camera_for_image(lines.image_width, lines.image_height)?;
//! let result = detector.find_vps(&lines.segments, &camera)?;
//! for (k, vp) in result.vps_2d.iter().enumerate() {
//!     match vp {
//!         Some(p) => println!("vp{k}: ({:.1}, {:.1})", p.x, p.y),
//!         None => println!("vp{k}: at infinity"),
//!     }
//! }
//! let overlay = build_debug_overlay(&lines.segments, &result);
//! println!("markers: {}", overlay.markers.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `vp_detect::core`: camera model, segments, great circles, logging setup.
//! - [`VpDetector`] / [`find_vanishing_points`]: the estimator.
//! - [`build_debug_overlay`]: colour-coded draw description of a result.
//! - `vp_detect::io`: line-set inputs, JSON config and reports.
//! - `vp_detect::render` (feature `image`): rasterize an overlay to a file.

pub use vp_detect_core as core;

mod detector;
mod error;
mod orthogonal;
mod overlay;
mod params;
mod refine;
mod result;
mod sampler;

pub mod io;
#[cfg(feature = "image")]
pub mod render;

pub use detector::{find_vanishing_points, VpDetector};
pub use error::{SearchStage, VpDetectError};
pub use io::{collect_line_files, LineSetFile, VpDetectConfig, VpDetectReport, VpIoError};
pub use overlay::{
    build_debug_overlay, color_for, DebugOverlay, OverlayLine, Rgb, VpMarker, CLUSTER_COLORS,
    UNASSIGNED_COLOR,
};
pub use params::VpDetectorParams;
pub use result::{SearchStats, VanishingDirection, VpDiagnostics, VpResult};

pub use vp_detect_core::{CameraModel, LineSegment};
