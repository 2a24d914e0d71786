//! SVG emitter – serialises a [`RenderModel`] into a standalone SVG document.
//!
//! Output is byte-stable: the same model always yields the same bytes (no
//! timestamps, no generated ids), and coordinates are written with Rust's
//! shortest round-trip float formatting, so `50.0` becomes `50` and `347.5`
//! stays `347.5`.

use std::io::Write;

use crate::error::DiagramError;
use crate::render_model::*;

const FONT_FAMILY: &str = "Arial, sans-serif";

/// Render the model to an SVG string.
pub fn render_svg(model: &RenderModel) -> String {
    let mut svg = String::new();
    let (w, h) = (model.width, model.height);

    svg.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"#);
    svg.push('\n');
    svg.push_str(&format!(
        "<svg width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" xmlns=\"http://www.w3.org/2000/svg\">\n"
    ));

    write_style(&mut svg, &model.style);

    if let Some(title) = &model.title {
        write_text(&mut svg, title.anchor, "title", &title.text);
    }
    if let Some(subtitle) = &model.subtitle {
        write_text(&mut svg, subtitle.anchor, "subtitle", &subtitle.text);
    }

    for phase in &model.phases {
        svg.push_str(&format!(
            "    <path d=\"{}\" fill=\"{}\" />\n",
            path_data(&phase.triangle),
            escape_xml(&phase.fill)
        ));
        write_text(&mut svg, phase.label_anchor, "phase-text", &phase.label);
    }

    svg.push_str("</svg>\n");
    svg
}

/// Render the model and write it to `out`.
pub fn write_svg<W: Write>(model: &RenderModel, mut out: W) -> Result<(), DiagramError> {
    out.write_all(render_svg(model).as_bytes())?;
    out.flush()?;
    Ok(())
}

/// `M x0,y0 L x1,y1 L x2,y2 Z`
pub fn path_data(triangle: &Triangle) -> String {
    let [a, b, c] = triangle.vertices();
    format!(
        "M {},{} L {},{} L {},{} Z",
        a.x, a.y, b.x, b.y, c.x, c.y
    )
}

fn write_style(svg: &mut String, style: &StyleValues) {
    let text = escape_xml(&style.text_color);
    let stroke = escape_xml(&style.stroke_color);

    svg.push_str("    <style>\n");
    svg.push_str(&format!(
        "        .phase-text {{ font-family: {FONT_FAMILY}; font-size: {}px; fill: {text}; text-anchor: middle; dominant-baseline: middle; }}\n",
        style.label_size
    ));
    svg.push_str(&format!(
        "        .title {{ font-family: {FONT_FAMILY}; font-size: {}px; font-weight: bold; fill: {text}; text-anchor: middle; }}\n",
        style.title_size
    ));
    svg.push_str(&format!(
        "        .subtitle {{ font-family: {FONT_FAMILY}; font-size: {}px; fill: {text}; text-anchor: middle; }}\n",
        style.subtitle_size
    ));
    svg.push_str(&format!(
        "        path {{ stroke: {stroke}; stroke-width: {}; stroke-linejoin: round; }}\n",
        style.stroke_width
    ));
    svg.push_str("    </style>\n");
}

fn write_text(svg: &mut String, at: Point, class: &str, text: &str) {
    svg.push_str(&format!(
        "    <text x=\"{}\" y=\"{}\" class=\"{class}\">{}</text>\n",
        at.x,
        at.y,
        escape_xml(text)
    ));
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_is_closed_triangle() {
        let t = Triangle([
            Point::new(50.0, 347.5),
            Point::new(220.0, 145.0),
            Point::new(220.0, 550.0),
        ]);
        assert_eq!(path_data(&t), "M 50,347.5 L 220,145 L 220,550 Z");
    }

    #[test]
    fn fractional_coordinates_are_not_rounded() {
        let t = Triangle([
            Point::new(0.25, 1.0 / 3.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 2.0),
        ]);
        assert_eq!(
            path_data(&t),
            "M 0.25,0.3333333333333333 L 1,0 L 1,2 Z"
        );
    }

    #[test]
    fn text_is_escaped() {
        assert_eq!(escape_xml(r#"R&D <"fast">"#), "R&amp;D &lt;&quot;fast&quot;&gt;");
        let mut out = String::new();
        write_text(&mut out, Point::new(1.0, 2.0), "title", "A & B");
        assert_eq!(out, "    <text x=\"1\" y=\"2\" class=\"title\">A &amp; B</text>\n");
    }
}
