//! Error type shared by the layout engine, the emitters and the front ends.

use thiserror::Error;

/// Every failure the crate can report.
///
/// `InvalidDimension` means the configuration itself is unusable and must be
/// corrected by the caller. Anything else is `Unexpected`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagramError {
    #[error("invalid dimension `{field}`: {reason}")]
    InvalidDimension { field: &'static str, reason: String },

    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

impl DiagramError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidDimension {
            field,
            reason: reason.into(),
        }
    }

    pub fn is_invalid_dimension(&self) -> bool {
        matches!(self, Self::InvalidDimension { .. })
    }

    /// Process exit code used by the `diamond` binary.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidDimension { .. } => 2,
            Self::Unexpected(_) => 1,
        }
    }
}

impl From<std::io::Error> for DiagramError {
    fn from(e: std::io::Error) -> Self {
        Self::Unexpected(e.to_string())
    }
}

impl From<serde_json::Error> for DiagramError {
    fn from(e: serde_json::Error) -> Self {
        Self::Unexpected(format!("JSON error: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_distinguish_kinds() {
        assert_eq!(DiagramError::invalid("width", "must be positive").exit_code(), 2);
        assert_eq!(DiagramError::Unexpected("boom".into()).exit_code(), 1);
    }

    #[test]
    fn message_names_field() {
        let e = DiagramError::invalid("margin", "leaves no drawable width");
        assert_eq!(
            e.to_string(),
            "invalid dimension `margin`: leaves no drawable width"
        );
    }
}
