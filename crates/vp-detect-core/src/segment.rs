use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// A detected straight line segment in pixel coordinates.
///
/// Serializes as `{"p1": [x, y], "p2": [x, y]}` and also deserializes from a
/// flat `[x1, y1, x2, y2]` array, which is what most line detectors emit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "SegmentRepr")]
pub struct LineSegment {
    pub p1: Point2<f64>,
    pub p2: Point2<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SegmentRepr {
    Flat([f64; 4]),
    Points { p1: Point2<f64>, p2: Point2<f64> },
}

impl From<SegmentRepr> for LineSegment {
    fn from(repr: SegmentRepr) -> Self {
        match repr {
            SegmentRepr::Flat([x1, y1, x2, y2]) => Self::from_coords(x1, y1, x2, y2),
            SegmentRepr::Points { p1, p2 } => Self { p1, p2 },
        }
    }
}

impl LineSegment {
    pub fn new(p1: Point2<f64>, p2: Point2<f64>) -> Self {
        Self { p1, p2 }
    }

    pub fn from_coords(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(Point2::new(x1, y1), Point2::new(x2, y2))
    }

    #[inline]
    pub fn length(&self) -> f64 {
        (self.p2 - self.p1).norm()
    }

    #[inline]
    pub fn midpoint(&self) -> Point2<f64> {
        nalgebra::center(&self.p1, &self.p2)
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.p1.x, self.p1.y, self.p2.x, self.p2.y]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_and_midpoint() {
        let s = LineSegment::from_coords(0.0, 0.0, 3.0, 4.0);
        assert_eq!(s.length(), 5.0);
        assert_eq!(s.midpoint(), Point2::new(1.5, 2.0));
    }

    #[test]
    fn deserializes_flat_and_point_forms() {
        let flat: LineSegment = serde_json::from_str("[1.0, 2.0, 3.0, 4.0]").expect("flat");
        let pts: LineSegment =
            serde_json::from_str(r#"{"p1": [1.0, 2.0], "p2": [3.0, 4.0]}"#).expect("points");
        assert_eq!(flat, pts);
        assert_eq!(flat.to_array(), [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn serialized_form_reads_back() {
        let s = LineSegment::from_coords(-1.5, 2.0, 10.0, 0.25);
        let json = serde_json::to_string(&s).expect("serialize");
        let back: LineSegment = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(s, back);
    }
}
