//! Rasterization of a [`DebugOverlay`] onto an RGB image.

use std::path::Path;

use image::{Rgb, RgbImage};
use nalgebra::Point2;

use crate::io::VpIoError;
use crate::overlay::DebugOverlay;

/// Drawing settings.
#[derive(Clone, Copy, Debug)]
pub struct RenderStyle {
    /// Line thickness in pixels.
    pub line_width: u32,
    /// Radius of vanishing point markers in pixels.
    pub marker_radius: u32,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            line_width: 2,
            marker_radius: 6,
        }
    }
}

/// Background for the render: the image at `path` when it loads, otherwise a
/// black `width × height` canvas.
pub fn background(path: Option<&Path>, width: u32, height: u32) -> RgbImage {
    if let Some(p) = path {
        match image::open(p) {
            Ok(img) => return img.to_rgb8(),
            Err(e) => log::warn!("render: cannot load {}: {e}", p.display()),
        }
    }
    RgbImage::new(width.max(1), height.max(1))
}

/// Draw all lines and markers of `overlay` onto `canvas`. Anything outside
/// the canvas is clipped.
pub fn draw_overlay(canvas: &mut RgbImage, overlay: &DebugOverlay, style: &RenderStyle) {
    for line in &overlay.lines {
        draw_segment(
            canvas,
            line.segment.p1,
            line.segment.p2,
            Rgb(line.color),
            style.line_width,
        );
    }
    for marker in &overlay.markers {
        draw_disc(canvas, marker.position, style.marker_radius, Rgb(marker.color));
    }
}

/// Render `overlay` over `canvas` and save it; the format follows the file
/// extension.
pub fn save_overlay(
    path: impl AsRef<Path>,
    mut canvas: RgbImage,
    overlay: &DebugOverlay,
    style: &RenderStyle,
) -> Result<(), VpIoError> {
    draw_overlay(&mut canvas, overlay, style);
    canvas.save(path)?;
    Ok(())
}

fn stamp(canvas: &mut RgbImage, x: f64, y: f64, width: u32, color: Rgb<u8>) {
    let half = (width.max(1) as i64 - 1) / 2;
    let cx = x.round() as i64;
    let cy = y.round() as i64;
    let (w, h) = (canvas.width() as i64, canvas.height() as i64);
    for py in (cy - half)..=(cy - half + width.max(1) as i64 - 1) {
        for px in (cx - half)..=(cx - half + width.max(1) as i64 - 1) {
            if px >= 0 && py >= 0 && px < w && py < h {
                canvas.put_pixel(px as u32, py as u32, color);
            }
        }
    }
}

fn draw_segment(
    canvas: &mut RgbImage,
    p1: Point2<f64>,
    p2: Point2<f64>,
    color: Rgb<u8>,
    width: u32,
) {
    if !(p1.x.is_finite() && p1.y.is_finite() && p2.x.is_finite() && p2.y.is_finite()) {
        return;
    }
    let Some((a, b)) = clip_to_canvas(p1, p2, canvas.width() as f64, canvas.height() as f64) else {
        return;
    };
    let d = b - a;
    let steps = (d.x.abs().max(d.y.abs()) * 2.0).ceil().max(1.0) as usize;
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        let p = a + d * t;
        stamp(canvas, p.x, p.y, width, color);
    }
}

fn draw_disc(canvas: &mut RgbImage, center: Point2<f64>, radius: u32, color: Rgb<u8>) {
    let r = radius as i64;
    let rf = radius as f64;
    let cx = center.x.round();
    let cy = center.y.round();
    let (w, h) = (canvas.width() as f64, canvas.height() as f64);
    if cx + rf < 0.0 || cy + rf < 0.0 || cx - rf >= w || cy - rf >= h {
        return;
    }
    let (cx, cy) = (cx as i64, cy as i64);
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy <= r * r {
                let (px, py) = (cx + dx, cy + dy);
                if px >= 0 && py >= 0 && (px as f64) < w && (py as f64) < h {
                    canvas.put_pixel(px as u32, py as u32, color);
                }
            }
        }
    }
}

/// Liang–Barsky clipping of a segment to `[0, w) × [0, h)`.
fn clip_to_canvas(
    p1: Point2<f64>,
    p2: Point2<f64>,
    w: f64,
    h: f64,
) -> Option<(Point2<f64>, Point2<f64>)> {
    let d = p2 - p1;
    let (mut t0, mut t1) = (0.0f64, 1.0f64);
    let edges = [
        (-d.x, p1.x),
        (d.x, w - 1.0 - p1.x),
        (-d.y, p1.y),
        (d.y, h - 1.0 - p1.y),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }
    Some((p1 + d * t0, p1 + d * t1))
}
