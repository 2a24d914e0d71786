//! Diagram configuration – the immutable input to the layout engine – and the
//! editable draft that front ends fill in before calling [`DiagramDraft::compute`].

use serde::{Deserialize, Serialize};

use crate::error::DiagramError;

/// The four phases, in their fixed left-to-right order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseId {
    Discover,
    Define,
    Develop,
    Deliver,
}

/// Whether a phase opens out from a point or closes back into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseKind {
    Diverge,
    Converge,
}

impl PhaseId {
    pub const ALL: [PhaseId; 4] = [
        PhaseId::Discover,
        PhaseId::Define,
        PhaseId::Develop,
        PhaseId::Deliver,
    ];

    pub fn kind(self) -> PhaseKind {
        match self {
            PhaseId::Discover | PhaseId::Develop => PhaseKind::Diverge,
            PhaseId::Define | PhaseId::Deliver => PhaseKind::Converge,
        }
    }

    pub fn default_label(self) -> &'static str {
        match self {
            PhaseId::Discover => "Discover",
            PhaseId::Define => "Define",
            PhaseId::Develop => "Develop",
            PhaseId::Deliver => "Deliver",
        }
    }

    pub fn default_fill(self) -> &'static str {
        match self {
            PhaseId::Discover => "#FFD700", // gold
            PhaseId::Define => "#ADD8E6",   // light blue
            PhaseId::Develop => "#90EE90",  // light green
            PhaseId::Deliver => "#FFB6C1",  // light pink
        }
    }
}

/// A complete diagram configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    pub canvas: CanvasConfig,
    pub header: HeaderConfig,
    pub style: StyleConfig,
    /// Discover, Define, Develop, Deliver – always in that order.
    pub phases: [PhaseConfig; 4],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    /// Horizontal space between the two diamonds.
    pub gap: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub title_size: f64,
    pub subtitle_size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub stroke_width: f64,
    pub stroke_color: String,
    pub text_color: String,
    /// Font size of the phase labels.
    pub label_size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseConfig {
    pub label: String,
    pub fill: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            margin: 50.0,
            gap: 20.0,
        }
    }
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            title: Some("Double Diamond Design Model".to_string()),
            subtitle: Some("Design Council Framework".to_string()),
            title_size: 32.0,
            subtitle_size: 18.0,
        }
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            stroke_width: 2.0,
            stroke_color: "#333333".to_string(),
            text_color: "#000000".to_string(),
            label_size: 20.0,
        }
    }
}

impl PhaseConfig {
    pub fn new(label: impl Into<String>, fill: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            fill: fill.into(),
        }
    }

    pub fn default_for(id: PhaseId) -> Self {
        Self::new(id.default_label(), id.default_fill())
    }
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasConfig::default(),
            header: HeaderConfig::default(),
            style: StyleConfig::default(),
            phases: PhaseId::ALL.map(PhaseConfig::default_for),
        }
    }
}

impl HeaderConfig {
    /// The title, if it would actually be drawn. Empty strings count as absent.
    pub fn title_text(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }

    pub fn subtitle_text(&self) -> Option<&str> {
        self.subtitle.as_deref().filter(|t| !t.is_empty())
    }
}

impl DiagramConfig {
    pub fn phase(&self, id: PhaseId) -> &PhaseConfig {
        &self.phases[id as usize]
    }

    /// Serialise to JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Deserialise from JSON. Missing sections fall back to the defaults.
    pub fn from_json(json: &str) -> Result<Self, DiagramError> {
        Ok(serde_json::from_str(json)?)
    }
}

// ---------------------------------------------------------------------------
// Draft form state
// ---------------------------------------------------------------------------

/// Field names accepted by [`DiagramDraft::set`], in form order.
pub const DRAFT_FIELDS: [&str; 20] = [
    "width",
    "height",
    "margin",
    "gap",
    "title",
    "subtitle",
    "title-size",
    "subtitle-size",
    "label-size",
    "stroke-width",
    "stroke-color",
    "text-color",
    "p1-label",
    "p1-color",
    "p2-label",
    "p2-color",
    "p3-label",
    "p3-color",
    "p4-label",
    "p4-color",
];

/// Editable form state. Every field is kept as the text the user typed;
/// nothing is interpreted until [`compute`](Self::compute) is called.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiagramDraft {
    pub width: String,
    pub height: String,
    pub margin: String,
    pub gap: String,
    pub title: String,
    pub subtitle: String,
    pub title_size: String,
    pub subtitle_size: String,
    pub label_size: String,
    pub stroke_width: String,
    pub stroke_color: String,
    pub text_color: String,
    pub phase_labels: [String; 4],
    pub phase_fills: [String; 4],
}

impl From<&DiagramConfig> for DiagramDraft {
    fn from(cfg: &DiagramConfig) -> Self {
        Self {
            width: cfg.canvas.width.to_string(),
            height: cfg.canvas.height.to_string(),
            margin: cfg.canvas.margin.to_string(),
            gap: cfg.canvas.gap.to_string(),
            title: cfg.header.title.clone().unwrap_or_default(),
            subtitle: cfg.header.subtitle.clone().unwrap_or_default(),
            title_size: cfg.header.title_size.to_string(),
            subtitle_size: cfg.header.subtitle_size.to_string(),
            label_size: cfg.style.label_size.to_string(),
            stroke_width: cfg.style.stroke_width.to_string(),
            stroke_color: cfg.style.stroke_color.clone(),
            text_color: cfg.style.text_color.clone(),
            phase_labels: cfg.phases.clone().map(|p| p.label),
            phase_fills: cfg.phases.clone().map(|p| p.fill),
        }
    }
}

impl DiagramDraft {
    /// Update one field by its form name. Returns `false` for an unknown name.
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> bool {
        match self.slot(field) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        let s = match field {
            "width" => &self.width,
            "height" => &self.height,
            "margin" => &self.margin,
            "gap" => &self.gap,
            "title" => &self.title,
            "subtitle" => &self.subtitle,
            "title-size" => &self.title_size,
            "subtitle-size" => &self.subtitle_size,
            "label-size" => &self.label_size,
            "stroke-width" => &self.stroke_width,
            "stroke-color" => &self.stroke_color,
            "text-color" => &self.text_color,
            other => {
                let (idx, is_label) = phase_field(other)?;
                if is_label {
                    &self.phase_labels[idx]
                } else {
                    &self.phase_fills[idx]
                }
            }
        };
        Some(s.as_str())
    }

    fn slot(&mut self, field: &str) -> Option<&mut String> {
        let s = match field {
            "width" => &mut self.width,
            "height" => &mut self.height,
            "margin" => &mut self.margin,
            "gap" => &mut self.gap,
            "title" => &mut self.title,
            "subtitle" => &mut self.subtitle,
            "title-size" => &mut self.title_size,
            "subtitle-size" => &mut self.subtitle_size,
            "label-size" => &mut self.label_size,
            "stroke-width" => &mut self.stroke_width,
            "stroke-color" => &mut self.stroke_color,
            "text-color" => &mut self.text_color,
            other => {
                let (idx, is_label) = phase_field(other)?;
                if is_label {
                    &mut self.phase_labels[idx]
                } else {
                    &mut self.phase_fills[idx]
                }
            }
        };
        Some(s)
    }

    /// Freeze the draft into an immutable [`DiagramConfig`].
    ///
    /// Only fails when a numeric field does not parse as a number; geometric
    /// validity is checked later by the layout engine.
    pub fn compute(&self) -> Result<DiagramConfig, DiagramError> {
        let optional = |s: &str| (!s.is_empty()).then(|| s.to_string());

        let mut phases = PhaseId::ALL.map(PhaseConfig::default_for);
        for (i, phase) in phases.iter_mut().enumerate() {
            phase.label = self.phase_labels[i].clone();
            phase.fill = self.phase_fills[i].clone();
        }

        Ok(DiagramConfig {
            canvas: CanvasConfig {
                width: parse_number("width", &self.width)?,
                height: parse_number("height", &self.height)?,
                margin: parse_number("margin", &self.margin)?,
                gap: parse_number("gap", &self.gap)?,
            },
            header: HeaderConfig {
                title: optional(&self.title),
                subtitle: optional(&self.subtitle),
                title_size: parse_number("title-size", &self.title_size)?,
                subtitle_size: parse_number("subtitle-size", &self.subtitle_size)?,
            },
            style: StyleConfig {
                stroke_width: parse_number("stroke-width", &self.stroke_width)?,
                stroke_color: self.stroke_color.clone(),
                text_color: self.text_color.clone(),
                label_size: parse_number("label-size", &self.label_size)?,
            },
            phases,
        })
    }
}

/// `p3-color` → `(2, false)`.
fn phase_field(name: &str) -> Option<(usize, bool)> {
    let rest = name.strip_prefix('p')?;
    let (num, attr) = rest.split_once('-')?;
    let idx = match num {
        "1" => 0,
        "2" => 1,
        "3" => 2,
        "4" => 3,
        _ => return None,
    };
    match attr {
        "label" => Some((idx, true)),
        "color" => Some((idx, false)),
        _ => None,
    }
}

fn parse_number(field: &'static str, raw: &str) -> Result<f64, DiagramError> {
    let s = raw.trim().trim_end_matches("px");
    s.parse::<f64>()
        .map_err(|_| DiagramError::invalid(field, format!("{raw:?} is not a number")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_factory_settings() {
        let cfg = DiagramConfig::default();
        assert_eq!(cfg.canvas.width, 800.0);
        assert_eq!(cfg.header.title_text(), Some("Double Diamond Design Model"));
        assert_eq!(cfg.phase(PhaseId::Develop).fill, "#90EE90");
        assert_eq!(cfg.phase(PhaseId::Deliver).label, "Deliver");
    }

    #[test]
    fn phase_kinds_alternate() {
        let kinds: Vec<_> = PhaseId::ALL.iter().map(|p| p.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                PhaseKind::Diverge,
                PhaseKind::Converge,
                PhaseKind::Diverge,
                PhaseKind::Converge
            ]
        );
    }

    #[test]
    fn empty_title_counts_as_absent() {
        let header = HeaderConfig {
            title: Some(String::new()),
            ..HeaderConfig::default()
        };
        assert_eq!(header.title_text(), None);
    }

    #[test]
    fn partial_json_uses_defaults() {
        let cfg = DiagramConfig::from_json(r#"{"canvas": {"width": 1000}}"#).unwrap();
        assert_eq!(cfg.canvas.width, 1000.0);
        assert_eq!(cfg.canvas.height, 600.0);
        assert_eq!(cfg.phases, DiagramConfig::default().phases);
    }

    #[test]
    fn draft_round_trips_defaults() {
        let cfg = DiagramConfig::default();
        let draft = DiagramDraft::from(&cfg);
        assert_eq!(draft.compute().unwrap(), cfg);
    }

    #[test]
    fn draft_set_and_compute() {
        let mut draft = DiagramDraft::from(&DiagramConfig::default());
        assert!(draft.set("gap", "35.5"));
        assert!(draft.set("p3-label", "Prototype"));
        assert!(draft.set("subtitle", ""));
        assert!(!draft.set("p5-label", "nope"));
        assert_eq!(draft.get("p3-label"), Some("Prototype"));

        let cfg = draft.compute().unwrap();
        assert_eq!(cfg.canvas.gap, 35.5);
        assert_eq!(cfg.phase(PhaseId::Develop).label, "Prototype");
        assert_eq!(cfg.header.subtitle, None);
    }

    #[test]
    fn draft_rejects_non_numeric() {
        let mut draft = DiagramDraft::from(&DiagramConfig::default());
        draft.set("height", "tall");
        let err = draft.compute().unwrap_err();
        assert!(matches!(
            err,
            DiagramError::InvalidDimension { field: "height", .. }
        ));
    }

    #[test]
    fn every_draft_field_is_addressable() {
        let draft = DiagramDraft::from(&DiagramConfig::default());
        for field in DRAFT_FIELDS {
            assert!(draft.get(field).is_some(), "missing field {field}");
        }
    }
}
