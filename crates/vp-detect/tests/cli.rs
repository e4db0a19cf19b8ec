#![cfg(feature = "cli")]

mod common;

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use vp_detect::{LineSegment, LineSetFile, VpDetectConfig, VpDetectReport, VpDetectorParams};

fn write_lines(path: &Path, segments: Vec<LineSegment>) {
    LineSetFile {
        image_width: 640,
        image_height: 480,
        image_path: None,
        segments,
    }
    .write_json(path)
    .expect("write line set");
}

fn vp_detect() -> Command {
    let mut cmd = Command::cargo_bin("vp-detect").expect("binary");
    cmd.args(["--log-level", "warn"]);
    cmd
}

#[test]
fn single_file_prints_and_reports() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("scene.json");
    let report = dir.path().join("report.json");
    write_lines(&input, common::manhattan_scene());

    vp_detect()
        .arg("-i")
        .arg(&input)
        .args(["-p", "0", "0", "-a", "0.0174533", "-s", "3", "-o"])
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("seed: 3"))
        .stdout(predicate::str::contains("focal length: 1500"))
        .stdout(predicate::str::contains("angle tolerance: 0.0174533 rad"))
        .stdout(predicate::str::contains("input path is a directory").not())
        .stdout(predicate::str::contains("principal point: (0.00, 0.00)"))
        .stdout(predicate::str::contains("at infinity"))
        .stdout(predicate::str::contains("vp2 3d"));

    let r = VpDetectReport::load_json(&report).expect("report");
    assert!(r.error.is_none());
    assert_eq!(r.num_lines, 30);
    assert_eq!(r.principal_point, [0.0, 0.0]);
    let vps_2d = r.vps_2d.expect("vps");
    assert_eq!(vps_2d.iter().filter(|p| p.is_some()).count(), 1);
    assert_eq!(r.assignments.expect("assignments").len(), 30);
}

#[test]
fn batch_continues_past_a_failing_input() {
    let dir = tempfile::tempdir().expect("tempdir");
    let inputs = dir.path().join("lines");
    std::fs::create_dir(&inputs).expect("mkdir");
    write_lines(&inputs.join("a_good.json"), common::manhattan_scene());
    write_lines(&inputs.join("b_parallel.json"), common::x_bundle(8));
    let reports = dir.path().join("reports");

    vp_detect()
        .arg("-i")
        .arg(&inputs)
        .args(["-p", "0", "0", "-a", "0.0174533", "-s", "1", "-o"])
        .arg(&reports)
        .assert()
        .failure()
        .stdout(predicate::str::contains("input path is a directory"))
        .stdout(predicate::str::contains("line length threshold: 30"))
        .stdout(predicate::str::contains("a_good.json"))
        .stderr(predicate::str::contains("1 of 2 input(s) failed"));

    let good = VpDetectReport::load_json(reports.join("a_good.json")).expect("good");
    assert!(good.error.is_none());
    assert!(good.vps_3d.is_some());

    let bad = VpDetectReport::load_json(reports.join("b_parallel.json")).expect("bad");
    assert!(bad.vps_3d.is_none());
    assert!(bad
        .error
        .as_deref()
        .is_some_and(|e| e.contains("second direction")));
}

#[test]
fn config_file_supplies_params_and_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("scene.json");
    write_lines(&input, common::manhattan_scene());
    let report = dir.path().join("from_config.json");

    let cfg = VpDetectConfig {
        params: VpDetectorParams {
            principal_point: Some([0.0, 0.0]),
            angle_tol: 1f64.to_radians(),
            seed: Some(8),
            ..VpDetectorParams::default()
        },
        output_path: Some(report.to_string_lossy().into_owned()),
        debug_path: None,
    };
    let cfg_path = dir.path().join("config.json");
    cfg.write_json(&cfg_path).expect("write config");

    vp_detect()
        .arg("-i")
        .arg(&input)
        .arg("-c")
        .arg(&cfg_path)
        .assert()
        .success();

    let r = VpDetectReport::load_json(&report).expect("report");
    assert_eq!(r.diagnostics.expect("diagnostics").usable_lines, 30);
}

#[test]
fn invalid_focal_length_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("scene.json");
    write_lines(&input, common::manhattan_scene());

    vp_detect()
        .arg("-i")
        .arg(&input)
        .args(["-f", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid parameters"));
}

#[test]
fn empty_input_directory_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    vp_detect()
        .arg("-i")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no line-set files"));
}

#[cfg(feature = "image")]
#[test]
fn debug_path_without_extension_is_a_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("scene.json");
    write_lines(&input, common::manhattan_scene());
    let debug_dir = dir.path().join("debug");

    vp_detect()
        .arg("-i")
        .arg(&input)
        .args(["-p", "0", "0", "-a", "0.0174533", "-s", "2", "--debug-path"])
        .arg(&debug_dir)
        .assert()
        .success();

    let png = debug_dir.join("scene.png");
    let img = image::open(&png).expect("debug image").to_rgb8();
    assert_eq!(img.dimensions(), (640, 480));
}
