//! Drawable description of a detection: coloured segments per cluster and
//! one marker per defined vanishing point. Nothing here touches pixels.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use vp_detect_core::LineSegment;

use crate::result::VpResult;

pub type Rgb = [u8; 3];

/// Colours of clusters 0, 1 and 2.
pub const CLUSTER_COLORS: [Rgb; 3] = [[230, 25, 25], [25, 190, 60], [30, 80, 230]];

/// Colour of lines that belong to no cluster.
pub const UNASSIGNED_COLOR: Rgb = [150, 150, 150];

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverlayLine {
    pub segment: LineSegment,
    pub cluster: Option<usize>,
    pub color: Rgb,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VpMarker {
    /// Index of the vanishing point in the result.
    pub vp_index: usize,
    pub position: Point2<f64>,
    pub color: Rgb,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DebugOverlay {
    pub lines: Vec<OverlayLine>,
    /// Markers of vanishing points with a defined image position only.
    pub markers: Vec<VpMarker>,
}

impl DebugOverlay {
    /// Line counts per cluster; the last entry counts unassigned lines.
    pub fn cluster_counts(&self) -> [usize; 4] {
        let mut counts = [0usize; 4];
        for l in &self.lines {
            counts[l.cluster.unwrap_or(3)] += 1;
        }
        counts
    }
}

#[inline]
pub fn color_for(cluster: Option<usize>) -> Rgb {
    match cluster {
        Some(k) if k < CLUSTER_COLORS.len() => CLUSTER_COLORS[k],
        _ => UNASSIGNED_COLOR,
    }
}

/// Build the overlay for `lines` (the same slice that was passed to the
/// detector) and its result.
pub fn build_debug_overlay(lines: &[LineSegment], result: &VpResult) -> DebugOverlay {
    let lines = lines
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            let cluster = result.cluster_of(i);
            OverlayLine {
                segment: *segment,
                cluster,
                color: color_for(cluster),
            }
        })
        .collect();

    let markers = result
        .vps_2d
        .iter()
        .enumerate()
        .filter_map(|(k, vp)| {
            let p = (*vp)?;
            (p.x.is_finite() && p.y.is_finite()).then_some(VpMarker {
                vp_index: k,
                position: p,
                color: CLUSTER_COLORS[k],
            })
        })
        .collect();

    DebugOverlay { lines, markers }
}
