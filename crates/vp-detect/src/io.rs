//! JSON inputs, configuration and run reports.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use vp_detect_core::{CameraModel, LineSegment};

use crate::error::VpDetectError;
use crate::params::VpDetectorParams;
use crate::result::{VpDiagnostics, VpResult};

#[derive(thiserror::Error, Debug)]
pub enum VpIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[cfg(feature = "image")]
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error("no line-set files found in {0}")]
    EmptyInput(PathBuf),
}

/// Segments detected on one image, as written by an external line detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSetFile {
    pub image_width: u32,
    pub image_height: u32,
    /// Source image, used as the debug render background when present.
    #[serde(default)]
    pub image_path: Option<String>,
    pub segments: Vec<LineSegment>,
}

impl LineSetFile {
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, VpIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), VpIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Line-set files named by `input`: the file itself, or every `*.json` file
/// directly inside a directory, sorted by name.
pub fn collect_line_files(input: &Path) -> Result<Vec<PathBuf>, VpIoError> {
    if !input.is_dir() {
        return Ok(vec![input.to_path_buf()]);
    }
    let mut files: Vec<PathBuf> = fs::read_dir(input)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|e| e == "json"))
        .collect();
    files.sort();
    if files.is_empty() {
        return Err(VpIoError::EmptyInput(input.to_path_buf()));
    }
    Ok(files)
}

/// Detection settings plus output locations, loaded from JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VpDetectConfig {
    #[serde(default)]
    pub params: VpDetectorParams,
    /// Report path (file, or directory in batch mode).
    #[serde(default)]
    pub output_path: Option<String>,
    /// Debug render path (file, or directory when it has no extension).
    #[serde(default)]
    pub debug_path: Option<String>,
}

impl VpDetectConfig {
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, VpIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), VpIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Per-input record of one detection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VpDetectReport {
    pub input_path: String,
    #[serde(default)]
    pub image_path: Option<String>,
    pub image_size: [u32; 2],
    pub focal_length: f64,
    pub principal_point: [f64; 2],
    pub num_lines: usize,
    /// Unit directions in camera space, in result order.
    #[serde(default)]
    pub vps_3d: Option<[[f64; 3]; 3]>,
    /// Image positions; `null` entries are vanishing points at infinity.
    #[serde(default)]
    pub vps_2d: Option<[Option<[f64; 2]>; 3]>,
    #[serde(default)]
    pub assignments: Option<Vec<Option<usize>>>,
    #[serde(default)]
    pub diagnostics: Option<VpDiagnostics>,
    #[serde(default)]
    pub error: Option<String>,
}

impl VpDetectReport {
    pub fn new(input_path: &Path, lines: &LineSetFile, camera: &CameraModel) -> Self {
        let pp = camera.principal_point();
        Self {
            input_path: input_path.to_string_lossy().into_owned(),
            image_path: lines.image_path.clone(),
            image_size: [lines.image_width, lines.image_height],
            focal_length: camera.focal_length(),
            principal_point: [pp.x, pp.y],
            num_lines: lines.segments.len(),
            vps_3d: None,
            vps_2d: None,
            assignments: None,
            diagnostics: None,
            error: None,
        }
    }

    pub fn set_result(&mut self, res: &VpResult) {
        self.vps_3d = Some(res.directions_3d().map(|d| [d.x, d.y, d.z]));
        self.vps_2d = Some(res.vps_2d.map(|p| p.map(|p| [p.x, p.y])));
        self.assignments = Some(res.assignments.clone());
        self.diagnostics = Some(res.diagnostics.clone());
        self.error = None;
    }

    pub fn set_error(&mut self, err: &VpDetectError) {
        self.error = Some(err.to_string());
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, VpIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), VpIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
