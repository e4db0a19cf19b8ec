//! Completion of the Manhattan triad and final line assignment.

use nalgebra::Vector3;
use vp_detect_core::sphere::{normalized_cross, orthogonality_deviation, orthogonalize};
use vp_detect_core::GreatCircle;

use crate::sampler::InlierTest;

/// Orthonormal triad from two sampled directions.
///
/// `d1` is projected onto the plane orthogonal to `d0` and the third
/// direction is `normalize(d0 × d1)`. The projection does not change the
/// third direction. Returns `None` when `d0` and `d1` are (nearly) parallel.
pub(crate) fn complete_triad(d0: &Vector3<f64>, d1: &Vector3<f64>) -> Option<[Vector3<f64>; 3]> {
    let d0 = d0.normalize();
    let d1 = orthogonalize(d1, &d0)?;
    let d2 = normalized_cross(&d0, &d1)?;
    Some([d0, d1, d2])
}

/// Assign each great circle to the direction it deviates least from.
///
/// Ties go to the lower direction index. Circles that pass the inlier test
/// for none of the directions stay unassigned. The output is parallel to
/// `circles`.
pub(crate) fn assign_lines(
    circles: &[GreatCircle],
    triad: &[Vector3<f64>; 3],
    test: &InlierTest,
) -> Vec<Option<usize>> {
    circles
        .iter()
        .map(|gc| {
            let mut best = 0usize;
            let mut best_dev = orthogonality_deviation(&gc.normal, &triad[0]);
            for (k, d) in triad.iter().enumerate().skip(1) {
                let dev = orthogonality_deviation(&gc.normal, d);
                if dev < best_dev {
                    best = k;
                    best_dev = dev;
                }
            }
            test.accepts(&gc.normal, &triad[best]).then_some(best)
        })
        .collect()
}

/// Input line indices per cluster, ascending.
pub(crate) fn cluster_members(
    circles: &[GreatCircle],
    labels: &[Option<usize>],
) -> [Vec<usize>; 3] {
    let mut members: [Vec<usize>; 3] = Default::default();
    for (gc, label) in circles.iter().zip(labels) {
        if let Some(k) = label {
            members[*k].push(gc.line_index);
        }
    }
    members
}
