mod common;

use nalgebra::Point2;
use vp_detect::{
    build_debug_overlay, VpDetector, VpDetectorParams, CLUSTER_COLORS, UNASSIGNED_COLOR,
};

use common::{camera, manhattan_scene};

fn detect() -> (Vec<vp_detect::LineSegment>, vp_detect::VpResult) {
    common::init_logs();
    let lines = manhattan_scene();
    let det = VpDetector::new(VpDetectorParams {
        angle_tol: 1f64.to_radians(),
        focal_length: common::FOCAL,
        principal_point: Some([0.0, 0.0]),
        seed: Some(17),
        ..VpDetectorParams::default()
    });
    let res = det.find_vps(&lines, &camera()).expect("detection");
    (lines, res)
}

#[test]
fn vanishing_points_at_infinity_get_no_marker() {
    let (lines, res) = detect();
    let overlay = build_debug_overlay(&lines, &res);

    assert_eq!(overlay.markers.len(), 1);
    let marker = overlay.markers[0];
    assert!(res.vps_2d[marker.vp_index].is_some());
    assert!((marker.position - Point2::origin()).norm() < 1e-6);
    for m in &overlay.markers {
        assert!(m.position.x.is_finite() && m.position.y.is_finite());
    }
}

#[test]
fn every_line_is_drawn_in_its_cluster_colour() {
    let (lines, res) = detect();
    let overlay = build_debug_overlay(&lines, &res);
    assert_eq!(overlay.lines.len(), lines.len());
    assert_eq!(overlay.cluster_counts(), [10, 10, 10, 0]);
    for (i, line) in overlay.lines.iter().enumerate() {
        assert_eq!(line.segment, lines[i]);
        assert_eq!(line.cluster, res.cluster_of(i));
        let expected = match line.cluster {
            Some(k) => CLUSTER_COLORS[k],
            None => UNASSIGNED_COLOR,
        };
        assert_eq!(line.color, expected);
    }
}

#[test]
fn overlay_serializes_to_json() {
    let (lines, res) = detect();
    let overlay = build_debug_overlay(&lines, &res);
    let json = serde_json::to_string(&overlay).expect("serialize");
    let back: vp_detect::DebugOverlay = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back.markers.len(), overlay.markers.len());
    assert_eq!(back.cluster_counts(), overlay.cluster_counts());
}

#[cfg(feature = "image")]
#[test]
fn rendered_overlay_is_written_to_disk() {
    use vp_detect::render::{background, save_overlay, RenderStyle};

    let (lines, res) = detect();
    let overlay = build_debug_overlay(&lines, &res);
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("overlay.png");

    let canvas = background(None, 320, 240);
    save_overlay(&out, canvas, &overlay, &RenderStyle::default()).expect("save");

    let img = image::open(&out).expect("reload").to_rgb8();
    assert_eq!(img.dimensions(), (320, 240));
    // the marker sits on the principal point at the image origin
    assert_eq!(img.get_pixel(0, 0).0, CLUSTER_COLORS[overlay.markers[0].vp_index]);
}
