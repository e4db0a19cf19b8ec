//! 2-line RANSAC on the sphere of directions.
//!
//! A candidate vanishing direction is the intersection of two great circles,
//! `normalize(n_a × n_b)`. It is scored by how many great circles of the
//! pool pass within `angle_tol` of it, i.e. how many normals are orthogonal
//! to it up to `sin(angle_tol)`.
//!
//! Notes
//! - Only non-degenerate draws count as scoring rounds. Draws whose normals
//!   are (anti)parallel are skipped but still count against the draw cap, so
//!   a pool with no usable pair terminates with `DegenerateInput`.
//! - Ties keep the candidate found first. This is deterministic for a given
//!   seed and pool order.

use log::debug;
use nalgebra::Vector3;
use rand::Rng;
use vp_detect_core::sphere::normalized_cross;
use vp_detect_core::GreatCircle;

use crate::error::{SearchStage, VpDetectError};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Angular inlier test shared by the sampler and the resolver.
#[derive(Clone, Copy, Debug)]
pub(crate) struct InlierTest {
    sin_tol: f64,
}

impl InlierTest {
    pub(crate) fn new(angle_tol: f64) -> Self {
        Self {
            sin_tol: angle_tol.sin(),
        }
    }

    /// True when `direction` lies within tolerance of the great circle `normal`.
    #[inline]
    pub(crate) fn accepts(&self, normal: &Vector3<f64>, direction: &Vector3<f64>) -> bool {
        normal.dot(direction).abs() <= self.sin_tol
    }

    fn count(&self, pool: &[GreatCircle], direction: &Vector3<f64>) -> usize {
        pool.iter()
            .filter(|gc| self.accepts(&gc.normal, direction))
            .count()
    }

    fn collect(&self, pool: &[GreatCircle], direction: &Vector3<f64>) -> Vec<usize> {
        pool.iter()
            .enumerate()
            .filter(|(_, gc)| self.accepts(&gc.normal, direction))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Budget of one direction search.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SearchBudget {
    /// Scored rounds to run.
    pub rounds: usize,
    /// Cap on draws, degenerate ones included.
    pub max_draws: usize,
}

/// Winning direction of one search.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SearchOutcome {
    pub direction: Vector3<f64>,
    /// Positions in the searched pool of the winner's inliers.
    pub inliers: Vec<usize>,
    /// Scored rounds actually run.
    pub rounds: usize,
    /// Total draws, including degenerate ones.
    pub draws: usize,
    /// Round (1-based) in which the winner was found.
    pub found_at: usize,
}

#[derive(Clone, Debug)]
struct Candidate {
    direction: Vector3<f64>,
    score: usize,
    round: usize,
}

/// Running best record of a search.
#[derive(Debug, Default)]
struct BestCandidate {
    best: Option<Candidate>,
}

impl BestCandidate {
    /// Replace the record only on a strictly higher score.
    fn offer(&mut self, candidate: Candidate) -> bool {
        let better = match &self.best {
            None => true,
            Some(b) => candidate.score > b.score,
        };
        if better {
            self.best = Some(candidate);
        }
        better
    }
}

/// Draw two distinct indices uniformly from `0..n` (`n >= 2`).
#[inline]
fn sample_pair<R: Rng + ?Sized>(rng: &mut R, n: usize) -> (usize, usize) {
    let a = rng.random_range(0..n);
    let mut b = rng.random_range(0..n - 1);
    if b >= a {
        b += 1;
    }
    (a, b)
}

/// Find the best supported direction among `pool`.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(pool, test, rng), fields(pool = pool.len()))
)]
pub(crate) fn search_direction<R: Rng + ?Sized>(
    pool: &[GreatCircle],
    test: &InlierTest,
    budget: SearchBudget,
    stage: SearchStage,
    rng: &mut R,
) -> Result<SearchOutcome, VpDetectError> {
    let n = pool.len();
    if n < 2 {
        debug!("{stage} direction: pool of {n} great circles is too small");
        return Err(VpDetectError::InsufficientLines {
            stage,
            available: n,
        });
    }

    let mut best = BestCandidate::default();
    let mut rounds = 0usize;
    let mut draws = 0usize;

    while rounds < budget.rounds && draws < budget.max_draws {
        draws += 1;
        let (a, b) = sample_pair(rng, n);
        let Some(direction) = normalized_cross(&pool[a].normal, &pool[b].normal) else {
            continue;
        };
        rounds += 1;

        let score = test.count(pool, &direction);
        best.offer(Candidate {
            direction,
            score,
            round: rounds,
        });
    }

    let Some(winner) = best.best else {
        debug!("{stage} direction: all {draws} draws were degenerate (pool={n})");
        return Err(VpDetectError::DegenerateInput { stage, draws });
    };

    let inliers = test.collect(pool, &winner.direction);
    debug!(
        "{stage} direction: support {}/{n} found in round {} of {rounds} ({} degenerate draws)",
        inliers.len(),
        winner.round,
        draws - rounds
    );

    Ok(SearchOutcome {
        direction: winner.direction,
        inliers,
        rounds,
        draws,
        found_at: winner.round,
    })
}
