//! Segment → great-circle mapping.
//!
//! Under the pinhole model every 3D line that images onto a segment lies in
//! the plane spanned by the camera rays through the segment endpoints. The
//! unit normal of that plane identifies a great circle on the sphere of
//! directions, and any vanishing direction that the segment can belong to
//! lies on it.

use log::debug;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::sphere::normalized_cross;
use crate::{CameraModel, LineSegment};

/// Interpretation plane of one input segment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GreatCircle {
    /// Index of the segment in the caller's input slice.
    pub line_index: usize,
    /// Unit normal of the interpretation plane.
    pub normal: Vector3<f64>,
}

impl GreatCircle {
    /// Great circle of a single segment, or `None` when both endpoints lift to
    /// (nearly) the same ray.
    pub fn from_segment(
        camera: &CameraModel,
        line_index: usize,
        segment: &LineSegment,
    ) -> Option<Self> {
        let r1 = camera.ray_for(segment.p1);
        let r2 = camera.ray_for(segment.p2);
        let normal = normalized_cross(&r1, &r2)?;
        Some(Self { line_index, normal })
    }
}

/// Map segments to great circles, keeping input order.
///
/// Segments shorter than `length_thresh` pixels are skipped, as are
/// segments whose endpoint rays are degenerate. Neither case is an error.
pub fn map_segments(
    camera: &CameraModel,
    segments: &[LineSegment],
    length_thresh: f64,
) -> Vec<GreatCircle> {
    let mut short = 0usize;
    let mut degenerate = 0usize;
    let mut out = Vec::with_capacity(segments.len());
    for (i, seg) in segments.iter().enumerate() {
        if seg.length() < length_thresh {
            short += 1;
            continue;
        }
        match GreatCircle::from_segment(camera, i, seg) {
            Some(gc) => out.push(gc),
            None => degenerate += 1,
        }
    }
    debug!(
        "great circles: {} of {} segments kept (short={short}, degenerate={degenerate})",
        out.len(),
        segments.len()
    );
    out
}
