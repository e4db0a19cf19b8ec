#![allow(dead_code)]

use nalgebra::{Point2, Vector3};
use vp_detect::{CameraModel, LineSegment};

pub const FOCAL: f64 = 1500.0;

/// Route library `log` output through the test harness.
pub fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn camera() -> CameraModel {
    CameraModel::new(FOCAL, Point2::origin()).expect("camera")
}

fn project(p: Vector3<f64>) -> Point2<f64> {
    Point2::new(FOCAL * p.x / p.z, FOCAL * p.y / p.z)
}

fn segment(start: Vector3<f64>, dir: Vector3<f64>, len: f64) -> LineSegment {
    LineSegment::new(project(start), project(start + dir * len))
}

/// Image segments of `count` 3D lines parallel to the x axis.
pub fn x_bundle(count: usize) -> Vec<LineSegment> {
    (0..count)
        .map(|k| {
            let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
            let k = k as f64;
            let start = Vector3::new(-1.0 + 0.1 * k, sign * (1.0 + 0.2 * k), 5.0 + 0.4 * k);
            segment(start, Vector3::x(), 2.0)
        })
        .collect()
}

/// Image segments of `count` 3D lines parallel to the y axis.
pub fn y_bundle(count: usize) -> Vec<LineSegment> {
    (0..count)
        .map(|k| {
            let sign = if k % 2 == 0 { -1.0 } else { 1.0 };
            let k = k as f64;
            let start = Vector3::new(sign * (1.0 + 0.2 * k), -1.0 + 0.1 * k, 5.5 + 0.3 * k);
            segment(start, Vector3::y(), 2.0)
        })
        .collect()
}

/// Image segments of `count` 3D lines parallel to the optical axis.
pub fn z_bundle(count: usize) -> Vec<LineSegment> {
    (0..count)
        .map(|k| {
            let theta = 0.3 + 0.6 * k as f64;
            let start = Vector3::new(2.0 * theta.cos(), 2.0 * theta.sin(), 4.0 + 0.2 * k as f64);
            segment(start, Vector3::z(), 3.0)
        })
        .collect()
}

/// Ten lines per axis direction, bundles in x, y, z order.
pub fn manhattan_scene() -> Vec<LineSegment> {
    let mut lines = x_bundle(10);
    lines.extend(y_bundle(10));
    lines.extend(z_bundle(10));
    lines
}

/// Smallest angle between `d` and the nearest axis of `truth` (sign ignored).
pub fn angle_to_nearest(d: &Vector3<f64>, truth: &[Vector3<f64>]) -> f64 {
    truth
        .iter()
        .map(|t| d.dot(t).abs().min(1.0).acos())
        .fold(f64::INFINITY, f64::min)
}
