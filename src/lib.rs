//! # diamond-forge – parametric double diamond diagrams
//!
//! This crate turns a small configuration (canvas, header text, style and
//! four phases) into a standalone vector image. The stages are:
//!
//! 1. **Configure** – build or edit a [`DiagramConfig`] ([`config`], [`presets`])
//! 2. **Layout** – resolve every coordinate into a [`RenderModel`] ([`layout`])
//! 3. **Emit** – write SVG ([`svg`]) or draw a preview onto a surface ([`preview`])
//!
//! [`pipeline`] chains the stages; a C-compatible FFI surface is exposed via
//! the [`ffi`] module.

pub mod color;
pub mod config;
pub mod error;
pub mod ffi;
pub mod layout;
pub mod pipeline;
pub mod presets;
pub mod preview;
pub mod render_model;
pub mod svg;

// Re-exports for convenience
pub use config::{DiagramConfig, DiagramDraft};
pub use error::DiagramError;
pub use layout::compute_layout;
pub use pipeline::{generate, generate_preview_pdf, generate_svg, ExportFormat};
pub use render_model::RenderModel;
