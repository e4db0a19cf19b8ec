//! Vanishing point detector: great circles → two sampled directions →
//! orthogonal triad → line assignment → image projections.

use log::{debug, warn};
use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use vp_detect_core::{map_segments, CameraModel, GreatCircle, LineSegment};

use crate::error::{SearchStage, VpDetectError};
use crate::orthogonal::{assign_lines, cluster_members, complete_triad};
use crate::params::VpDetectorParams;
use crate::refine::refine_triad;
use crate::result::{SearchStats, VanishingDirection, VpDiagnostics, VpResult};
use crate::sampler::{search_direction, InlierTest, SearchBudget, SearchOutcome};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Manhattan-world vanishing point detector.
#[derive(Clone, Debug)]
pub struct VpDetector {
    params: VpDetectorParams,
}

impl VpDetector {
    pub fn new(params: VpDetectorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &VpDetectorParams {
        &self.params
    }

    /// Camera for a `width × height` image from the configured focal length
    /// and principal point (image centre when unset).
    pub fn camera_for_image(&self, width: u32, height: u32) -> Result<CameraModel, VpDetectError> {
        CameraModel::for_image(
            width,
            height,
            self.params.focal_length,
            self.params.principal_point,
        )
        .ok_or_else(|| {
            VpDetectError::InvalidParams(format!(
                "cannot build camera (focal_length={}, principal_point={:?})",
                self.params.focal_length, self.params.principal_point
            ))
        })
    }

    /// Estimate the three vanishing points of `lines` as seen by `camera`.
    ///
    /// Uses a generator seeded from `params.seed`, or from the OS when no seed
    /// is configured.
    pub fn find_vps(
        &self,
        lines: &[LineSegment],
        camera: &CameraModel,
    ) -> Result<VpResult, VpDetectError> {
        let mut rng = match self.params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        self.find_vps_with_rng(lines, camera, &mut rng)
    }

    /// Same as [`find_vps`](Self::find_vps) with a caller-owned generator.
    /// `params.seed` is ignored.
    ///
    /// Geometry comes from `camera` alone. `params.focal_length` and
    /// `params.principal_point` only feed [`camera_for_image`](Self::camera_for_image);
    /// they are still validated here but never override `camera`.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, lines, camera, rng), fields(lines = lines.len()))
    )]
    pub fn find_vps_with_rng<R: Rng + ?Sized>(
        &self,
        lines: &[LineSegment],
        camera: &CameraModel,
        rng: &mut R,
    ) -> Result<VpResult, VpDetectError> {
        self.params.validate()?;
        let params = &self.params;

        let circles = map_segments(camera, lines, params.length_thresh);
        let test = InlierTest::new(params.angle_tol);
        let budget = SearchBudget {
            rounds: params.iterations,
            max_draws: params.max_draws(),
        };

        let first = search_direction(&circles, &test, budget, SearchStage::First, rng)
            .inspect_err(|e| warn!("vp: {e}"))?;

        let residual = residual_pool(&circles, &first.inliers);
        debug!(
            "vp: {} of {} great circles left after the first direction",
            residual.len(),
            circles.len()
        );
        let second = search_direction(&residual, &test, budget, SearchStage::Second, rng)
            .inspect_err(|e| warn!("vp: {e}"))?;

        let Some(triad) = complete_triad(&first.direction, &second.direction) else {
            warn!("vp: second direction is parallel to the first");
            return Err(VpDetectError::DegenerateInput {
                stage: SearchStage::Second,
                draws: second.draws,
            });
        };

        let mut labels = assign_lines(&circles, &triad, &test);
        let mut triad = triad;
        let mut refine_passes = 0;
        if params.refine_iterations > 0 {
            (triad, labels, refine_passes) =
                refine_triad(&circles, triad, labels, &test, params.refine_iterations);
        }

        let vps_2d = triad.map(|d| camera.project(&d));
        let members = cluster_members(&circles, &labels);

        let mut assignments = vec![None; lines.len()];
        for (gc, label) in circles.iter().zip(&labels) {
            assignments[gc.line_index] = *label;
        }
        let unassigned = labels.iter().filter(|l| l.is_none()).count();

        let diagnostics = VpDiagnostics {
            input_lines: lines.len(),
            usable_lines: circles.len(),
            search: [
                search_stats(&first, circles.len()),
                search_stats(&second, residual.len()),
            ],
            refine_passes,
            unassigned,
        };
        debug!(
            "vp: clusters {}/{}/{}, unassigned {unassigned}",
            members[0].len(),
            members[1].len(),
            members[2].len()
        );

        let [m0, m1, m2] = members;
        Ok(VpResult {
            directions: [
                vanishing_direction(triad[0], m0),
                vanishing_direction(triad[1], m1),
                vanishing_direction(triad[2], m2),
            ],
            vps_2d,
            assignments,
            camera: *camera,
            diagnostics,
        })
    }
}

/// One-shot detection with explicit tolerance and seed; other parameters
/// take their defaults.
pub fn find_vanishing_points(
    lines: &[LineSegment],
    camera: &CameraModel,
    angle_tol: f64,
    seed: Option<u64>,
) -> Result<VpResult, VpDetectError> {
    let detector = VpDetector::new(VpDetectorParams {
        angle_tol,
        seed,
        focal_length: camera.focal_length(),
        principal_point: Some([camera.principal_point().x, camera.principal_point().y]),
        ..VpDetectorParams::default()
    });
    detector.find_vps(lines, camera)
}

fn residual_pool(circles: &[GreatCircle], claimed: &[usize]) -> Vec<GreatCircle> {
    let mut taken = vec![false; circles.len()];
    for &i in claimed {
        taken[i] = true;
    }
    circles
        .iter()
        .zip(taken)
        .filter(|(_, t)| !t)
        .map(|(gc, _)| *gc)
        .collect()
}

fn search_stats(outcome: &SearchOutcome, pool: usize) -> SearchStats {
    SearchStats {
        pool,
        rounds: outcome.rounds,
        draws: outcome.draws,
        found_at: outcome.found_at,
        support: outcome.inliers.len(),
    }
}

fn vanishing_direction(direction: Vector3<f64>, members: Vec<usize>) -> VanishingDirection {
    VanishingDirection {
        direction,
        score: members.len(),
        members,
    }
}
