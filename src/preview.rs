//! Preview emitter – draws a [`RenderModel`] onto a [`Surface`].
//!
//! The emitter turns the model into a short list of [`DrawCommand`]s using the
//! model's coordinates unchanged, then hands them to the surface. Two surfaces
//! ship with the crate:
//!
//! - [`DisplayList`] – records the commands in memory (serialisable to JSON).
//! - [`PdfSurface`] – paints them onto a single printpdf page sized to the
//!   canvas, one canvas unit per PDF point.

use printpdf as pdf;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::render_model::*;

/// Where the text anchor sits vertically relative to the glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Baseline {
    /// Anchor y is the text baseline (header lines).
    Alphabetic,
    /// Anchor y is the vertical centre of the text (phase labels).
    Middle,
}

/// One drawing primitive. Text is always horizontally centred on its anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Triangle {
        vertices: [Point; 3],
        fill: String,
        stroke: String,
        stroke_width: f64,
    },
    Text {
        text: String,
        anchor: Point,
        font_size: f64,
        bold: bool,
        color: String,
        baseline: Baseline,
    },
}

/// A drawing target for the preview emitter.
pub trait Surface {
    /// Called once before any command with the canvas size.
    fn begin(&mut self, width: f64, height: f64);
    fn draw(&mut self, command: DrawCommand);
}

/// The commands that make up the preview, in paint order: header lines
/// first, then each phase's triangle followed by its label.
pub fn preview_commands(model: &RenderModel) -> Vec<DrawCommand> {
    let style = &model.style;
    let mut cmds = Vec::with_capacity(10);

    let header = [(&model.title, true), (&model.subtitle, false)];
    for (item, bold) in header {
        if let Some(item) = item {
            cmds.push(DrawCommand::Text {
                text: item.text.clone(),
                anchor: item.anchor,
                font_size: item.font_size,
                bold,
                color: style.text_color.clone(),
                baseline: Baseline::Alphabetic,
            });
        }
    }

    for phase in &model.phases {
        cmds.push(DrawCommand::Triangle {
            vertices: *phase.triangle.vertices(),
            fill: phase.fill.clone(),
            stroke: style.stroke_color.clone(),
            stroke_width: style.stroke_width,
        });
        cmds.push(DrawCommand::Text {
            text: phase.label.clone(),
            anchor: phase.label_anchor,
            font_size: style.label_size,
            bold: false,
            color: style.text_color.clone(),
            baseline: Baseline::Middle,
        });
    }

    cmds
}

/// Draw the model onto `surface`.
pub fn render_preview<S: Surface + ?Sized>(model: &RenderModel, surface: &mut S) {
    surface.begin(model.width, model.height);
    for cmd in preview_commands(model) {
        surface.draw(cmd);
    }
}

/// Draw the model onto a fresh [`PdfSurface`] and return the PDF bytes. The
/// document title is the diagram title, if any.
pub fn render_preview_pdf(model: &RenderModel) -> Vec<u8> {
    let title = model
        .title
        .as_ref()
        .map(|t| t.text.clone())
        .unwrap_or_else(|| "Double Diamond".to_string());
    let mut surface = PdfSurface::new(title);
    render_preview(model, &mut surface);
    surface.finish()
}

// ---------------------------------------------------------------------------
// In-memory surface
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayList {
    pub width: f64,
    pub height: f64,
    pub commands: Vec<DrawCommand>,
}

impl Surface for DisplayList {
    fn begin(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.commands.clear();
    }

    fn draw(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

impl DisplayList {
    pub fn of(model: &RenderModel) -> Self {
        let mut list = Self::default();
        render_preview(model, &mut list);
        list
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// PDF surface
// ---------------------------------------------------------------------------

const PT_TO_MM: f32 = 0.352778;

/// Paints commands into a single-page PDF via printpdf.
pub struct PdfSurface {
    title: String,
    width: f32,
    height: f32,
    ops: Vec<pdf::Op>,
}

impl PdfSurface {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            width: 0.0,
            height: 0.0,
            ops: Vec::new(),
        }
    }

    /// Number of PDF operations queued so far.
    pub fn op_count(&self) -> usize {
        self.ops.len()
    }

    /// Assemble the page and return the PDF bytes.
    pub fn finish(self) -> Vec<u8> {
        let mut doc = pdf::PdfDocument::new(&self.title);
        let page = pdf::PdfPage::new(
            pdf::Mm(self.width * PT_TO_MM),
            pdf::Mm(self.height * PT_TO_MM),
            self.ops,
        );
        doc.with_pages(vec![page]);
        doc.save(&pdf::PdfSaveOptions::default(), &mut Vec::new())
    }

    /// Canvas y grows downwards; PDF y grows upwards from the bottom edge.
    fn to_pdf(&self, p: Point) -> pdf::Point {
        pdf::Point {
            x: pdf::Pt(p.x as f32),
            y: pdf::Pt(self.height - p.y as f32),
        }
    }

    fn draw_triangle(&mut self, vertices: &[Point; 3], fill: &str, stroke: &str, width: f64) {
        self.ops.push(pdf::Op::SetFillColor {
            col: pdf_color(Color::parse_or_black(fill)),
        });
        self.ops.push(pdf::Op::SetOutlineColor {
            col: pdf_color(Color::parse_or_black(stroke)),
        });
        self.ops.push(pdf::Op::SetOutlineThickness {
            pt: pdf::Pt(width as f32),
        });

        let points = vertices
            .iter()
            .map(|v| pdf::LinePoint {
                p: self.to_pdf(*v),
                bezier: false,
            })
            .collect();
        let mode = if width > 0.0 {
            pdf::PaintMode::FillStroke
        } else {
            pdf::PaintMode::Fill
        };
        self.ops.push(pdf::Op::DrawPolygon {
            polygon: pdf::Polygon {
                rings: vec![pdf::PolygonRing { points }],
                mode,
                winding_order: pdf::WindingOrder::NonZero,
            },
        });
    }

    fn draw_text(
        &mut self,
        text: &str,
        anchor: Point,
        font_size: f64,
        bold: bool,
        color: &str,
        baseline: Baseline,
    ) {
        if text.is_empty() {
            return;
        }
        let font = if bold {
            pdf::BuiltinFont::HelveticaBold
        } else {
            pdf::BuiltinFont::Helvetica
        };
        let size = font_size as f32;
        let left = anchor.x as f32 - measure_text_width(text, size, bold) / 2.0;
        // Cap height of Helvetica is roughly 0.7 em.
        let baseline_y = match baseline {
            Baseline::Alphabetic => anchor.y as f32,
            Baseline::Middle => anchor.y as f32 + size * 0.35,
        };

        self.ops.push(pdf::Op::StartTextSection);
        self.ops.push(pdf::Op::SetTextCursor {
            pos: pdf::Point {
                x: pdf::Pt(left),
                y: pdf::Pt(self.height - baseline_y),
            },
        });
        self.ops.push(pdf::Op::SetFontSizeBuiltinFont {
            size: pdf::Pt(size),
            font,
        });
        self.ops.push(pdf::Op::SetFillColor {
            col: pdf_color(Color::parse_or_black(color)),
        });
        self.ops.push(pdf::Op::WriteTextBuiltinFont {
            items: vec![pdf::TextItem::Text(to_winansi(text))],
            font,
        });
        self.ops.push(pdf::Op::EndTextSection);
    }
}

impl Surface for PdfSurface {
    fn begin(&mut self, width: f64, height: f64) {
        self.width = width as f32;
        self.height = height as f32;
        self.ops.clear();
    }

    fn draw(&mut self, command: DrawCommand) {
        match command {
            DrawCommand::Triangle {
                vertices,
                fill,
                stroke,
                stroke_width,
            } => self.draw_triangle(&vertices, &fill, &stroke, stroke_width),
            DrawCommand::Text {
                text,
                anchor,
                font_size,
                bold,
                color,
                baseline,
            } => self.draw_text(&text, anchor, font_size, bold, &color, baseline),
        }
    }
}

fn pdf_color(c: Color) -> pdf::Color {
    pdf::Color::Rgb(pdf::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
        icc_profile: None,
    })
}

/// Heuristic advance width for Helvetica: half an em per character, bold
/// about 10 % wider.
fn measure_text_width(text: &str, font_size: f32, bold: bool) -> f32 {
    let avg = if bold { 0.55 } else { 0.5 };
    text.chars().count() as f32 * font_size * avg
}

/// WinAnsiEncoding byte for `c`: Latin-1 plus the typographic characters
/// Windows-1252 places in 0x80..=0x9F. Anything else becomes `?`.
fn winansi_byte(c: char) -> u8 {
    match c {
        '\u{20AC}' => 0x80, // €
        '\u{201A}' => 0x82,
        '\u{0192}' => 0x83, // ƒ
        '\u{201E}' => 0x84,
        '\u{2026}' => 0x85, // …
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02C6}' => 0x88,
        '\u{2030}' => 0x89, // ‰
        '\u{0160}' => 0x8A,
        '\u{2039}' => 0x8B,
        '\u{0152}' => 0x8C, // Œ
        '\u{017D}' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95, // •
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02DC}' => 0x98,
        '\u{2122}' => 0x99, // ™
        '\u{0161}' => 0x9A,
        '\u{203A}' => 0x9B,
        '\u{0153}' => 0x9C, // œ
        '\u{017E}' => 0x9E,
        '\u{0178}' => 0x9F, // Ÿ
        '\u{00A0}' => b' ',
        c if (c as u32) < 0x80 && !c.is_ascii_control() => c as u8,
        c if (0xA0..0x100).contains(&(c as u32)) => c as u8,
        _ => b'?',
    }
}

/// Re-encode `s` for a builtin font.
fn to_winansi(s: &str) -> String {
    let bytes: Vec<u8> = s.chars().map(winansi_byte).collect();
    // SAFETY: deliberately not UTF-8 above 0x7F. printpdf copies builtin-font
    // text bytes into the content stream, where the font's WinAnsiEncoding
    // decodes them.
    unsafe { String::from_utf8_unchecked(bytes) }
}
