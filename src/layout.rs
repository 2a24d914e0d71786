//! Layout engine – turns a [`DiagramConfig`] into a fully positioned
//! [`RenderModel`].
//!
//! The engine is a pure function: no I/O, no shared state, and identical
//! inputs always produce identical (bit-for-bit) coordinates.

use crate::config::{DiagramConfig, PhaseId};
use crate::error::DiagramError;
use crate::render_model::*;

/// Header lines advance by this multiple of their font size.
pub const LINE_SPACING: f64 = 1.5;

/// Fixed space between the header stack and the diamonds.
pub const HEADER_GAP: f64 = 20.0;

// ---------------------------------------------------------------------------
// Intermediate results
// ---------------------------------------------------------------------------

/// Resolved title/subtitle stack.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderStack {
    pub title: Option<TextItem>,
    pub subtitle: Option<TextItem>,
    /// Total vertical space consumed, including [`HEADER_GAP`].
    pub height: f64,
}

/// The six x-coordinates that split the drawable width into four phases and
/// the gap band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Partition {
    /// Width of one diamond.
    pub diamond_width: f64,
    /// Width of one phase (half a diamond).
    pub phase_width: f64,
    pub x: [f64; 6],
}

impl Partition {
    /// Horizontal space between the first and second diamond.
    pub fn gap_band(&self) -> f64 {
        self.x[3] - self.x[2]
    }
}

/// Lay out the header lines starting at the top margin.
pub fn stack_header(config: &DiagramConfig) -> HeaderStack {
    let header = &config.header;
    let center_x = config.canvas.width / 2.0;
    let mut y = config.canvas.margin;
    let mut height = 0.0;

    let title = header.title_text().map(|text| {
        let item = TextItem {
            text: text.to_string(),
            anchor: Point::new(center_x, y + header.title_size),
            font_size: header.title_size,
        };
        height += header.title_size * LINE_SPACING;
        y += header.title_size * LINE_SPACING;
        item
    });

    let subtitle = header.subtitle_text().map(|text| {
        let item = TextItem {
            text: text.to_string(),
            anchor: Point::new(center_x, y + header.subtitle_size),
            font_size: header.subtitle_size,
        };
        height += header.subtitle_size * LINE_SPACING;
        item
    });

    if title.is_some() || subtitle.is_some() {
        height += HEADER_GAP;
    }

    HeaderStack {
        title,
        subtitle,
        height,
    }
}

/// Split the drawable width into the six phase boundaries.
pub fn partition(drawable: &Region, gap: f64) -> Result<Partition, DiagramError> {
    let available = drawable.width();
    if available <= gap {
        return Err(DiagramError::invalid(
            "gap",
            format!("gap {gap} leaves no room for the diamonds in a drawable width of {available}"),
        ));
    }

    let d = (available - gap) / 2.0;
    let p = d / 2.0;

    let x0 = drawable.left;
    let x1 = x0 + p;
    let x2 = x0 + d;
    let x3 = x2 + gap;
    let x4 = x3 + p;
    let x5 = x3 + d;

    // x5 is derived, never assigned; it has to land on the right edge.
    let tolerance = 1e-9 * drawable.right.abs().max(1.0);
    if (x5 - drawable.right).abs() > tolerance {
        return Err(DiagramError::Unexpected(format!(
            "phase partition ends at {x5}, drawable region ends at {}",
            drawable.right
        )));
    }

    Ok(Partition {
        diamond_width: d,
        phase_width: p,
        x: [x0, x1, x2, x3, x4, x5],
    })
}

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Compute the complete render model for `config`.
pub fn compute_layout(config: &DiagramConfig) -> Result<RenderModel, DiagramError> {
    validate_numbers(config)?;

    let canvas = &config.canvas;
    if 2.0 * canvas.margin >= canvas.width {
        return Err(DiagramError::invalid(
            "margin",
            format!(
                "margin {} leaves no drawable width on a canvas {} wide",
                canvas.margin, canvas.width
            ),
        ));
    }

    let header = stack_header(config);
    let top = canvas.margin + header.height;
    let bottom = canvas.height - canvas.margin;
    if top >= bottom {
        return Err(DiagramError::invalid(
            "height",
            format!(
                "height {} leaves no drawable area below a header of {} and margins of {}",
                canvas.height, header.height, canvas.margin
            ),
        ));
    }

    let drawable = Region {
        left: canvas.margin,
        right: canvas.width - canvas.margin,
        top,
        bottom,
    };
    let parts = partition(&drawable, canvas.gap)?;
    let cy = drawable.center_y();

    log::debug!(
        "layout: header={} region=[{}, {}]x[{}, {}] cy={} x={:?}",
        header.height,
        drawable.left,
        drawable.right,
        drawable.top,
        drawable.bottom,
        cy,
        parts.x
    );

    let [x0, x1, x2, x3, x4, x5] = parts.x;
    let half = parts.phase_width * 0.5;
    let geometry: [(Triangle, f64); 4] = [
        (
            Triangle([Point::new(x0, cy), Point::new(x1, top), Point::new(x1, bottom)]),
            x0 + half,
        ),
        (
            Triangle([Point::new(x1, top), Point::new(x2, cy), Point::new(x1, bottom)]),
            x1 + half,
        ),
        (
            Triangle([Point::new(x3, cy), Point::new(x4, top), Point::new(x4, bottom)]),
            x3 + half,
        ),
        (
            Triangle([Point::new(x4, top), Point::new(x5, cy), Point::new(x4, bottom)]),
            x4 + half,
        ),
    ];

    let phases = PhaseId::ALL.map(|id| {
        let (triangle, label_x) = geometry[id as usize];
        let phase = config.phase(id);
        PhaseRecord {
            id,
            kind: id.kind(),
            label: phase.label.clone(),
            fill: phase.fill.clone(),
            triangle,
            label_anchor: Point::new(label_x, cy),
        }
    });

    Ok(RenderModel {
        width: canvas.width,
        height: canvas.height,
        header_height: header.height,
        drawable,
        title: header.title,
        subtitle: header.subtitle,
        style: StyleValues {
            stroke_width: config.style.stroke_width,
            stroke_color: config.style.stroke_color.clone(),
            text_color: config.style.text_color.clone(),
            label_size: config.style.label_size,
            title_size: config.header.title_size,
            subtitle_size: config.header.subtitle_size,
        },
        phases,
    })
}

fn validate_numbers(config: &DiagramConfig) -> Result<(), DiagramError> {
    let canvas = &config.canvas;
    let checks: [(&'static str, f64, bool); 8] = [
        ("width", canvas.width, true),
        ("height", canvas.height, true),
        ("margin", canvas.margin, false),
        ("gap", canvas.gap, false),
        ("title-size", config.header.title_size, false),
        ("subtitle-size", config.header.subtitle_size, false),
        ("label-size", config.style.label_size, false),
        ("stroke-width", config.style.stroke_width, false),
    ];

    for (field, value, strictly_positive) in checks {
        if !value.is_finite() {
            return Err(DiagramError::invalid(field, format!("{value} is not a finite number")));
        }
        if strictly_positive && value <= 0.0 {
            return Err(DiagramError::invalid(field, format!("{value} must be positive")));
        }
        if value < 0.0 {
            return Err(DiagramError::invalid(field, format!("{value} must not be negative")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HeaderConfig;

    fn bare(width: f64, height: f64, margin: f64, gap: f64) -> DiagramConfig {
        let mut cfg = DiagramConfig::default();
        cfg.canvas.width = width;
        cfg.canvas.height = height;
        cfg.canvas.margin = margin;
        cfg.canvas.gap = gap;
        cfg.header = HeaderConfig {
            title: None,
            subtitle: None,
            ..HeaderConfig::default()
        };
        cfg
    }

    #[test]
    fn header_stack_defaults() {
        let stack = stack_header(&DiagramConfig::default());
        assert_eq!(stack.height, 95.0);
        assert_eq!(stack.title.unwrap().anchor, Point::new(400.0, 82.0));
        assert_eq!(stack.subtitle.unwrap().anchor, Point::new(400.0, 116.0));
    }

    #[test]
    fn subtitle_only_starts_at_margin() {
        let mut cfg = DiagramConfig::default();
        cfg.header.title = None;
        let stack = stack_header(&cfg);
        assert!(stack.title.is_none());
        assert_eq!(stack.subtitle.unwrap().anchor.y, 50.0 + 18.0);
        assert_eq!(stack.height, 18.0 * 1.5 + 20.0);
    }

    #[test]
    fn no_header_consumes_nothing() {
        let stack = stack_header(&bare(800.0, 600.0, 50.0, 20.0));
        assert_eq!(stack.height, 0.0);
    }

    #[test]
    fn partition_default() {
        let region = Region {
            left: 50.0,
            right: 750.0,
            top: 145.0,
            bottom: 550.0,
        };
        let p = partition(&region, 20.0).unwrap();
        assert_eq!(p.diamond_width, 340.0);
        assert_eq!(p.phase_width, 170.0);
        assert_eq!(p.x, [50.0, 220.0, 390.0, 410.0, 580.0, 750.0]);
        assert_eq!(p.gap_band(), 20.0);
    }

    #[test]
    fn zero_margin_zero_gap_fills_canvas() {
        let model = compute_layout(&bare(640.0, 480.0, 0.0, 0.0)).unwrap();
        assert_eq!(model.header_height, 0.0);
        assert_eq!(model.drawable.top, 0.0);
        assert_eq!(model.drawable.bottom, 480.0);
        assert_eq!(model.phases[0].triangle.min_x(), 0.0);
        assert_eq!(model.phases[3].triangle.max_x(), 640.0);
    }

    #[test]
    fn margin_too_wide_fails() {
        let err = compute_layout(&bare(100.0, 600.0, 60.0, 20.0)).unwrap_err();
        assert!(matches!(err, DiagramError::InvalidDimension { field: "margin", .. }));
    }

    #[test]
    fn header_taller_than_canvas_fails() {
        let mut cfg = DiagramConfig::default();
        cfg.canvas.height = 190.0;
        let err = compute_layout(&cfg).unwrap_err();
        assert!(matches!(err, DiagramError::InvalidDimension { field: "height", .. }));
    }

    #[test]
    fn gap_swallowing_width_fails() {
        let err = compute_layout(&bare(300.0, 300.0, 50.0, 200.0)).unwrap_err();
        assert!(matches!(err, DiagramError::InvalidDimension { field: "gap", .. }));
    }

    #[test]
    fn non_finite_and_negative_rejected() {
        let err = compute_layout(&bare(f64::NAN, 600.0, 50.0, 20.0)).unwrap_err();
        assert!(err.is_invalid_dimension());

        let err = compute_layout(&bare(800.0, 600.0, -1.0, 20.0)).unwrap_err();
        assert!(matches!(err, DiagramError::InvalidDimension { field: "margin", .. }));

        let err = compute_layout(&bare(800.0, 0.0, 0.0, 0.0)).unwrap_err();
        assert!(matches!(err, DiagramError::InvalidDimension { field: "height", .. }));
    }

    #[test]
    fn label_anchors_sit_on_centreline() {
        let model = compute_layout(&DiagramConfig::default()).unwrap();
        let xs: Vec<f64> = model.phases.iter().map(|p| p.label_anchor.x).collect();
        assert_eq!(xs, vec![135.0, 305.0, 495.0, 665.0]);
        assert!(model.phases.iter().all(|p| p.label_anchor.y == 347.5));
    }
}
