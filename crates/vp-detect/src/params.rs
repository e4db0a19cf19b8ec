use serde::{Deserialize, Serialize};

use crate::error::VpDetectError;

/// Configuration of the vanishing point detector.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct VpDetectorParams {
    /// Minimal segment length (pixels) for a line to take part.
    pub length_thresh: f64,

    /// Focal length in pixels.
    pub focal_length: f64,

    /// Principal point `[x, y]` in pixels; the image centre when `None`.
    pub principal_point: Option<[f64; 2]>,

    /// Max deviation from orthogonality (radians) between a great-circle
    /// normal and a direction for the line to count as an inlier.
    pub angle_tol: f64,

    /// Seed for the sampler. `None` draws a fresh seed from the OS per run.
    pub seed: Option<u64>,

    /// Scored sampling rounds per direction.
    pub iterations: usize,

    /// Total draws allowed per direction, as a multiple of `iterations`.
    /// Degenerate draws count against this, not against `iterations`.
    pub max_draws_factor: usize,

    /// Refinement passes after the triad is complete (0 disables refinement).
    pub refine_iterations: usize,
}

impl Default for VpDetectorParams {
    fn default() -> Self {
        Self {
            length_thresh: 30.0,
            focal_length: 1500.0,
            principal_point: None,
            angle_tol: 2f64.to_radians(),
            seed: None,
            iterations: 500,
            max_draws_factor: 10,
            refine_iterations: 0,
        }
    }
}

impl VpDetectorParams {
    /// Check the numeric ranges the detector relies on.
    pub fn validate(&self) -> Result<(), VpDetectError> {
        if !(self.focal_length.is_finite() && self.focal_length > 0.0) {
            return Err(VpDetectError::InvalidParams(format!(
                "focal_length must be finite and > 0, got {}",
                self.focal_length
            )));
        }
        if !(self.angle_tol > 0.0 && self.angle_tol < std::f64::consts::FRAC_PI_2) {
            return Err(VpDetectError::InvalidParams(format!(
                "angle_tol must be in (0, pi/2) radians, got {}",
                self.angle_tol
            )));
        }
        if !self.length_thresh.is_finite() || self.length_thresh < 0.0 {
            return Err(VpDetectError::InvalidParams(format!(
                "length_thresh must be finite and >= 0, got {}",
                self.length_thresh
            )));
        }
        if let Some([x, y]) = self.principal_point {
            if !(x.is_finite() && y.is_finite()) {
                return Err(VpDetectError::InvalidParams(
                    "principal_point must be finite".to_string(),
                ));
            }
        }
        if self.iterations == 0 {
            return Err(VpDetectError::InvalidParams(
                "iterations must be > 0".to_string(),
            ));
        }
        if self.max_draws_factor == 0 {
            return Err(VpDetectError::InvalidParams(
                "max_draws_factor must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Upper bound on sample draws per direction.
    pub fn max_draws(&self) -> usize {
        self.iterations.saturating_mul(self.max_draws_factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(VpDetectorParams::default().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_values() {
        let bad = [
            VpDetectorParams {
                focal_length: 0.0,
                ..Default::default()
            },
            VpDetectorParams {
                angle_tol: 0.0,
                ..Default::default()
            },
            VpDetectorParams {
                angle_tol: 2.0,
                ..Default::default()
            },
            VpDetectorParams {
                iterations: 0,
                ..Default::default()
            },
            VpDetectorParams {
                principal_point: Some([f64::NAN, 0.0]),
                ..Default::default()
            },
        ];
        for p in &bad {
            assert!(matches!(
                p.validate(),
                Err(VpDetectError::InvalidParams(_))
            ));
        }
    }

    #[test]
    fn partial_json_fills_defaults() {
        let p: VpDetectorParams =
            serde_json::from_str(r#"{"focal_length": 800.0, "seed": 7}"#).expect("params");
        assert_eq!(p.focal_length, 800.0);
        assert_eq!(p.seed, Some(7));
        assert_eq!(p.length_thresh, VpDetectorParams::default().length_thresh);
    }
}
