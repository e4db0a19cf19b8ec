//! Pinhole camera model used to move between pixels and camera-space rays.
//!
//! The model carries a single focal length (square pixels, no skew) and a
//! principal point. Camera space is right-handed with `z` along the optical
//! axis, so a pixel `(x, y)` maps to the ray `(x - cx, y - cy, f)`.

use nalgebra::{Point2, Vector3};
use serde::{Deserialize, Serialize};

/// Below this `|dz|` a unit direction is treated as parallel to the image plane.
pub const PROJECTION_EPS: f64 = 1e-9;

/// Intrinsics of an ideal pinhole camera.
///
/// Deserialization goes through [`CameraModel::new`], so a camera read from
/// JSON satisfies the same checks as one built in code.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CameraRepr")]
pub struct CameraModel {
    focal_length: f64,
    principal_point: Point2<f64>,
}

#[derive(Deserialize)]
struct CameraRepr {
    focal_length: f64,
    principal_point: Point2<f64>,
}

impl TryFrom<CameraRepr> for CameraModel {
    type Error = String;

    fn try_from(repr: CameraRepr) -> Result<Self, Self::Error> {
        Self::new(repr.focal_length, repr.principal_point).ok_or_else(|| {
            format!(
                "invalid camera: focal_length={}, principal_point=({}, {})",
                repr.focal_length, repr.principal_point.x, repr.principal_point.y
            )
        })
    }
}

impl CameraModel {
    /// Build a camera model. Returns `None` unless `focal_length` is finite and
    /// strictly positive and the principal point is finite.
    pub fn new(focal_length: f64, principal_point: Point2<f64>) -> Option<Self> {
        if !(focal_length.is_finite() && focal_length > 0.0) {
            return None;
        }
        if !(principal_point.x.is_finite() && principal_point.y.is_finite()) {
            return None;
        }
        Some(Self {
            focal_length,
            principal_point,
        })
    }

    /// Camera for one image: uses `principal_point` when given, otherwise the
    /// centre of a `width × height` image.
    pub fn for_image(
        width: u32,
        height: u32,
        focal_length: f64,
        principal_point: Option<[f64; 2]>,
    ) -> Option<Self> {
        let pp = match principal_point {
            Some([x, y]) => Point2::new(x, y),
            None => image_center(width, height),
        };
        Self::new(focal_length, pp)
    }

    #[inline]
    pub fn focal_length(&self) -> f64 {
        self.focal_length
    }

    #[inline]
    pub fn principal_point(&self) -> Point2<f64> {
        self.principal_point
    }

    /// Unit camera ray through `pixel`.
    #[inline]
    pub fn ray_for(&self, pixel: Point2<f64>) -> Vector3<f64> {
        Vector3::new(
            pixel.x - self.principal_point.x,
            pixel.y - self.principal_point.y,
            self.focal_length,
        )
        .normalize()
    }

    /// Pixel where `direction` vanishes, or `None` when the direction is
    /// parallel to the image plane (a vanishing point at infinity).
    ///
    /// `direction` does not need to be unit length, but the epsilon test is
    /// applied to its normalized `z` component.
    pub fn project(&self, direction: &Vector3<f64>) -> Option<Point2<f64>> {
        let norm = direction.norm();
        if !norm.is_finite() || norm == 0.0 {
            return None;
        }
        let d = direction / norm;
        if d.z.abs() < PROJECTION_EPS {
            return None;
        }
        Some(Point2::new(
            self.principal_point.x + self.focal_length * d.x / d.z,
            self.principal_point.y + self.focal_length * d.y / d.z,
        ))
    }
}

/// Geometric centre of a `width × height` image in pixel coordinates.
pub fn image_center(width: u32, height: u32) -> Point2<f64> {
    Point2::new(width as f64 / 2.0, height as f64 / 2.0)
}
