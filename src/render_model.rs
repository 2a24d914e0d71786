//! Render model – the intermediate representation between layout computation
//! and the emitters. This is the "frozen" structure that encodes exactly what
//! goes on the canvas, in absolute canvas units with a top-left origin.

use serde::{Deserialize, Serialize};

use crate::config::{PhaseId, PhaseKind};
use crate::error::DiagramError;

/// A fully resolved diagram, ready for any emitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderModel {
    pub width: f64,
    pub height: f64,
    /// Vertical space consumed by the title/subtitle stack (0 without header).
    pub header_height: f64,
    pub drawable: Region,
    pub title: Option<TextItem>,
    pub subtitle: Option<TextItem>,
    pub style: StyleValues,
    /// Discover, Define, Develop, Deliver.
    pub phases: [PhaseRecord; 4],
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// The area left for the diamonds once margins and header are removed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

/// A header line anchored at its horizontal centre and text baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextItem {
    pub text: String,
    pub anchor: Point,
    pub font_size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleValues {
    pub stroke_width: f64,
    pub stroke_color: String,
    pub text_color: String,
    pub label_size: f64,
    pub title_size: f64,
    pub subtitle_size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseRecord {
    pub id: PhaseId,
    pub kind: PhaseKind,
    pub label: String,
    pub fill: String,
    pub triangle: Triangle,
    /// Centre of the label, horizontally and vertically.
    pub label_anchor: Point,
}

/// Three ordered vertices of a closed triangular path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle(pub [Point; 3]);

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Region {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Vertical midline, the diamonds' centreline.
    pub fn center_y(&self) -> f64 {
        self.top + self.height() / 2.0
    }
}

impl Triangle {
    pub fn vertices(&self) -> &[Point; 3] {
        &self.0
    }

    pub fn min_x(&self) -> f64 {
        self.0.iter().map(|p| p.x).fold(f64::INFINITY, f64::min)
    }

    pub fn max_x(&self) -> f64 {
        self.0.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max)
    }

    /// Unsigned area via the shoelace formula.
    pub fn area(&self) -> f64 {
        let [a, b, c] = self.0;
        ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)).abs() / 2.0
    }
}

impl RenderModel {
    pub fn phase(&self, id: PhaseId) -> &PhaseRecord {
        &self.phases[id as usize]
    }

    /// Serialise to JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Deserialise from JSON.
    pub fn from_json(json: &str) -> Result<Self, DiagramError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_extent_and_area() {
        let t = Triangle([
            Point::new(0.0, 5.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ]);
        assert_eq!(t.min_x(), 0.0);
        assert_eq!(t.max_x(), 10.0);
        assert!((t.area() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn region_midline() {
        let r = Region {
            left: 50.0,
            right: 750.0,
            top: 145.0,
            bottom: 550.0,
        };
        assert_eq!(r.width(), 700.0);
        assert_eq!(r.center_y(), 347.5);
    }
}
