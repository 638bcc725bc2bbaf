//! Stored representation of a module's assessment.
//!
//! The `modules.assessment_type` column predates structured breakdowns and may
//! still hold free text. Rows are decoded once when loaded.

use super::error::AssessmentError;
use super::normalize::{normalize, AssessmentComponent, AssessmentInput};

/// Assessment as persisted for a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredAssessment {
    /// Free text written before breakdowns existed (e.g. "Written Exam").
    LegacyText(String),
    /// Normalized components summing to 100.
    Breakdown(Vec<AssessmentComponent>),
}

impl StoredAssessment {
    /// Decode the raw column value.
    ///
    /// Blank values decode to `None`. Anything that is not a JSON array of
    /// components is kept as legacy text.
    #[must_use]
    pub fn decode(raw: Option<&str>) -> Option<Self> {
        let raw = raw?.trim();
        if raw.is_empty() {
            return None;
        }
        match serde_json::from_str::<Vec<AssessmentComponent>>(raw) {
            Ok(components) if !components.is_empty() => Some(Self::Breakdown(components)),
            _ => Some(Self::LegacyText(raw.to_string())),
        }
    }

    /// Build the value to store from a client request.
    ///
    /// A structured breakdown takes precedence over the free-text field. Free
    /// text that itself parses as a component list is normalized as well.
    pub fn from_request(
        breakdown: Option<&[AssessmentInput]>,
        legacy: Option<&str>,
    ) -> Result<Option<Self>, AssessmentError> {
        if let Some(items) = breakdown {
            return normalize(items).map(|c| Some(Self::Breakdown(c)));
        }

        let Some(text) = legacy.map(str::trim).filter(|t| !t.is_empty()) else {
            return Ok(None);
        };

        match serde_json::from_str::<Vec<AssessmentInput>>(text) {
            Ok(items) => normalize(&items).map(|c| Some(Self::Breakdown(c))),
            Err(_) => Ok(Some(Self::LegacyText(text.to_string()))),
        }
    }

    /// Serialize for the `assessment_type` column.
    #[must_use]
    pub fn encode(&self) -> String {
        match self {
            Self::LegacyText(text) => text.clone(),
            Self::Breakdown(components) => {
                serde_json::to_string(components).unwrap_or_else(|_| "[]".to_string())
            }
        }
    }

    #[must_use]
    pub fn legacy_text(&self) -> Option<&str> {
        match self {
            Self::LegacyText(text) => Some(text),
            Self::Breakdown(_) => None,
        }
    }

    #[must_use]
    pub fn breakdown(&self) -> Option<&[AssessmentComponent]> {
        match self {
            Self::LegacyText(_) => None,
            Self::Breakdown(components) => Some(components),
        }
    }
}
