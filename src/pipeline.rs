//! Pipeline – ties together layout and emission into a single function call.

use std::path::Path;

use crate::config::DiagramConfig;
use crate::error::DiagramError;
use crate::layout::compute_layout;
use crate::preview::render_preview_pdf;
use crate::render_model::RenderModel;
use crate::svg::render_svg;

/// Output medium for [`generate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Standalone SVG document (default).
    #[default]
    Svg,
    /// Single-page PDF preview.
    Pdf,
}

impl ExportFormat {
    /// Pick a format from a file extension (`.svg` / `.pdf`, case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "svg" => Some(Self::Svg),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }
}

/// Configuration → SVG text.
///
/// Returns `(svg, render_model)`.
pub fn generate_svg(config: &DiagramConfig) -> Result<(String, RenderModel), DiagramError> {
    let model = compute_layout(config)?;
    let svg = render_svg(&model);
    log::info!("Rendered SVG ({} bytes)", svg.len());
    Ok((svg, model))
}

/// Configuration → PDF preview bytes.
pub fn generate_preview_pdf(
    config: &DiagramConfig,
) -> Result<(Vec<u8>, RenderModel), DiagramError> {
    let model = compute_layout(config)?;
    let bytes = render_preview_pdf(&model);
    if bytes.is_empty() {
        return Err(DiagramError::Unexpected("PDF writer produced no output".into()));
    }
    log::info!("Rendered PDF preview ({} bytes)", bytes.len());
    Ok((bytes, model))
}

/// Configuration → bytes in the requested format.
pub fn generate(
    config: &DiagramConfig,
    format: ExportFormat,
) -> Result<(Vec<u8>, RenderModel), DiagramError> {
    match format {
        ExportFormat::Svg => generate_svg(config).map(|(svg, model)| (svg.into_bytes(), model)),
        ExportFormat::Pdf => generate_preview_pdf(config),
    }
}
