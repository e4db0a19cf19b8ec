//! Optional re-estimation of the triad from its assigned lines.
//!
//! Each pass re-fits directions 0 and 1 as the least-squares direction
//! orthogonal to their members' normals (smallest eigenvector of `Σ n nᵀ`),
//! re-completes the triad and reassigns every line. Passes stop early once
//! the assignment is stable.

use log::debug;
use nalgebra::{Matrix3, SymmetricEigen, Vector3};
use vp_detect_core::GreatCircle;

use crate::orthogonal::{assign_lines, complete_triad};
use crate::sampler::InlierTest;

/// Least-squares direction on all great circles of `cluster`.
///
/// Keeps the sign of `previous` so directions do not flip between passes.
/// Returns `None` for fewer than two members.
pub(crate) fn refit_direction(
    circles: &[GreatCircle],
    labels: &[Option<usize>],
    cluster: usize,
    previous: &Vector3<f64>,
) -> Option<Vector3<f64>> {
    let mut scatter = Matrix3::<f64>::zeros();
    let mut count = 0usize;
    for (gc, label) in circles.iter().zip(labels) {
        if *label == Some(cluster) {
            scatter += gc.normal * gc.normal.transpose();
            count += 1;
        }
    }
    if count < 2 {
        return None;
    }

    let eig = SymmetricEigen::new(scatter);
    let (idx, _) = eig
        .eigenvalues
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(b.1))?;
    let v: Vector3<f64> = eig.eigenvectors.column(idx).into_owned();
    let n = v.norm();
    if !n.is_finite() || n == 0.0 {
        return None;
    }
    let v = v / n;
    Some(if v.dot(previous) < 0.0 { -v } else { v })
}

/// Refined triad and labels plus the number of passes run.
pub(crate) fn refine_triad(
    circles: &[GreatCircle],
    triad: [Vector3<f64>; 3],
    labels: Vec<Option<usize>>,
    test: &InlierTest,
    max_passes: usize,
) -> ([Vector3<f64>; 3], Vec<Option<usize>>, usize) {
    let mut triad = triad;
    let mut labels = labels;
    let mut passes = 0usize;

    while passes < max_passes {
        let d0 = refit_direction(circles, &labels, 0, &triad[0]).unwrap_or(triad[0]);
        let d1 = refit_direction(circles, &labels, 1, &triad[1]).unwrap_or(triad[1]);
        let Some(next) = complete_triad(&d0, &d1) else {
            debug!("refine: re-fit directions collapsed, keeping pass {passes}");
            break;
        };
        let next_labels = assign_lines(circles, &next, test);
        passes += 1;
        triad = next;
        let stable = next_labels == labels;
        labels = next_labels;
        if stable {
            break;
        }
    }

    debug!("refine: {passes} pass(es)");
    (triad, labels, passes)
}
