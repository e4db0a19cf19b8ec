//! Core geometry for Manhattan-world vanishing point detection.
//!
//! This crate is intentionally small and purely geometric. It knows about a
//! pinhole camera, 2D line segments and their great circles on the sphere of
//! camera-space directions. It does *not* sample, score or cluster; that is
//! the job of the `vp-detect` crate.
//!
//! ```
//! use vp_detect_core::{map_segments, CameraModel, LineSegment};
//!
//! let camera = CameraModel::for_image(640, 480, 1500.0, None).unwrap();
//! let segments = [LineSegment::from_coords(10.0, 20.0, 300.0, 40.0)];
//! let circles = map_segments(&camera, &segments, 30.0);
//! assert_eq!(circles.len(), 1);
//! ```

mod camera;
mod great_circle;
mod logger;
mod segment;
pub mod sphere;

pub use camera::{image_center, CameraModel, PROJECTION_EPS};
pub use great_circle::{map_segments, GreatCircle};
pub use segment::LineSegment;

#[cfg(feature = "tracing")]
pub use logger::{init_tracing, tracing_filter};

pub use logger::{init_with_level, level_from_env};
