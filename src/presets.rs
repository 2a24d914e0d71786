//! Named starting configurations.
//!
//! Each preset is a complete [`DiagramConfig`]; front ends apply user edits on
//! top of one through a [`DiagramDraft`](crate::config::DiagramDraft).

use crate::config::{DiagramConfig, HeaderConfig, PhaseConfig, PhaseId, StyleConfig};

/// Preset names accepted by [`preset`].
pub const PRESET_NAMES: [&str; 3] = ["classic", "monochrome", "plain"];

/// The factory defaults: titled, gold/blue/green/pink phases.
pub fn classic() -> DiagramConfig {
    DiagramConfig::default()
}

/// Greyscale fills with a heavier outline, for print.
pub fn monochrome() -> DiagramConfig {
    let fills = ["#F2F2F2", "#D9D9D9", "#BFBFBF", "#A6A6A6"];
    DiagramConfig {
        style: StyleConfig {
            stroke_width: 3.0,
            stroke_color: "#000000".to_string(),
            ..StyleConfig::default()
        },
        phases: PhaseId::ALL.map(|id| PhaseConfig::new(id.default_label(), fills[id as usize])),
        ..DiagramConfig::default()
    }
}

/// No header; the diamonds use the whole canvas inside the margins.
pub fn plain() -> DiagramConfig {
    DiagramConfig {
        header: HeaderConfig {
            title: None,
            subtitle: None,
            ..HeaderConfig::default()
        },
        ..DiagramConfig::default()
    }
}

/// Look up a preset by name.
pub fn preset(name: &str) -> Option<DiagramConfig> {
    match name {
        "classic" => Some(classic()),
        "monochrome" => Some(monochrome()),
        "plain" => Some(plain()),
        _ => None,
    }
}
