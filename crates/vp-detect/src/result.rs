use nalgebra::{Point2, Vector3};
use serde::{Deserialize, Serialize};
use vp_detect_core::CameraModel;

/// One of the three Manhattan directions with its line cluster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VanishingDirection {
    /// Unit direction in camera space. The sign is not meaningful.
    pub direction: Vector3<f64>,
    /// Input line indices assigned to this direction, ascending.
    pub members: Vec<usize>,
    /// Inlier count (`members.len()`).
    pub score: usize,
}

/// Bookkeeping of one sampled direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Great circles available to the search.
    pub pool: usize,
    /// Scored rounds.
    pub rounds: usize,
    /// Draws including degenerate pairs.
    pub draws: usize,
    /// Round that produced the winner.
    pub found_at: usize,
    /// Inliers of the winner within its pool.
    pub support: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VpDiagnostics {
    pub input_lines: usize,
    /// Lines that survived the length filter and mapped to a great circle.
    pub usable_lines: usize,
    pub search: [SearchStats; 2],
    /// Refinement passes that were run.
    pub refine_passes: usize,
    /// Usable lines left unassigned after the final reassignment.
    pub unassigned: usize,
}

/// Output of one `find_vps` run.
///
/// `directions[k]` and `vps_2d[k]` describe the same vanishing point. The
/// order is the order of discovery (direction 2 is derived), not a fixed
/// semantic axis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VpResult {
    pub directions: [VanishingDirection; 3],
    /// Image positions of the vanishing points; `None` when the direction is
    /// parallel to the image plane.
    pub vps_2d: [Option<Point2<f64>>; 3],
    /// Cluster index per input line (same length as the input slice).
    pub assignments: Vec<Option<usize>>,
    /// Camera the run used.
    pub camera: CameraModel,
    pub diagnostics: VpDiagnostics,
}

impl VpResult {
    /// The three unit directions in result order.
    pub fn directions_3d(&self) -> [Vector3<f64>; 3] {
        [
            self.directions[0].direction,
            self.directions[1].direction,
            self.directions[2].direction,
        ]
    }

    /// Cluster of input line `line_index`, if any.
    pub fn cluster_of(&self, line_index: usize) -> Option<usize> {
        self.assignments.get(line_index).copied().flatten()
    }
}
