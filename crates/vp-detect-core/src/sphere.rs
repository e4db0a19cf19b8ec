//! Helpers on the unit sphere of camera-space directions.
//!
//! Directions are unsigned throughout: `d` and `-d` describe the same
//! vanishing direction, and a great circle is identified with its normal up
//! to sign.

use nalgebra::Vector3;

/// Cross products with a norm below this are treated as undefined.
pub const CROSS_EPS: f64 = 1e-12;

/// Normalized `a × b`, or `None` when `a` and `b` are (anti)parallel.
#[inline]
pub fn normalized_cross(a: &Vector3<f64>, b: &Vector3<f64>) -> Option<Vector3<f64>> {
    let c = a.cross(b);
    let n = c.norm();
    if n < CROSS_EPS || !n.is_finite() {
        return None;
    }
    Some(c / n)
}

/// Angle in `[0, π/2]` by which `direction` misses the great circle with
/// `normal`, i.e. the deviation of the two vectors from being orthogonal.
///
/// Both inputs must be unit length.
#[inline]
pub fn orthogonality_deviation(normal: &Vector3<f64>, direction: &Vector3<f64>) -> f64 {
    normal.dot(direction).abs().min(1.0).asin()
}

/// Unsigned angle in `[0, π/2]` between two unit directions.
#[inline]
pub fn direction_angle(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    a.dot(b).abs().min(1.0).acos()
}

/// Component of `v` orthogonal to the unit vector `axis`, normalized.
/// Returns `None` when `v` is (nearly) parallel to `axis`.
#[inline]
pub fn orthogonalize(v: &Vector3<f64>, axis: &Vector3<f64>) -> Option<Vector3<f64>> {
    let r = v - axis * axis.dot(v);
    let n = r.norm();
    if n < CROSS_EPS || !n.is_finite() {
        return None;
    }
    Some(r / n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn cross_of_parallel_vectors_is_undefined() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        assert!(normalized_cross(&a, &(a * 2.0)).is_none());
        assert!(normalized_cross(&a, &(-a)).is_none());
        let c = normalized_cross(&Vector3::x(), &Vector3::y()).expect("defined");
        assert_relative_eq!(c, Vector3::z());
    }

    #[test]
    fn deviation_is_zero_on_the_circle_and_right_angle_at_the_pole() {
        let n = Vector3::z();
        assert_relative_eq!(orthogonality_deviation(&n, &Vector3::x()), 0.0);
        assert_relative_eq!(orthogonality_deviation(&n, &Vector3::z()), FRAC_PI_2);
        assert_relative_eq!(orthogonality_deviation(&n, &(-Vector3::z())), FRAC_PI_2);

        let tilted = Vector3::new(1.0, 0.0, 0.1f64.tan()).normalize();
        assert_relative_eq!(orthogonality_deviation(&n, &tilted), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn direction_angle_is_unsigned() {
        let a = Vector3::new(1.0, 1.0, 0.0).normalize();
        assert_relative_eq!(direction_angle(&a, &(-a)), 0.0);
        assert_relative_eq!(direction_angle(&Vector3::x(), &Vector3::y()), FRAC_PI_2);
    }

    #[test]
    fn orthogonalize_removes_axis_component() {
        let axis = Vector3::z();
        let v = Vector3::new(3.0, 0.0, 5.0);
        let o = orthogonalize(&v, &axis).expect("defined");
        assert_relative_eq!(o, Vector3::x());
        assert!(orthogonalize(&axis, &axis).is_none());
    }
}
