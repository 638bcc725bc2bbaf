//! Module Type Definitions

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::api::patch::{apply, apply_nullable, double_option};
use crate::assessment::{AssessmentComponent, AssessmentError, AssessmentInput, StoredAssessment};
use crate::permissions::Resource;
use crate::specializations::Specialization;

pub(crate) const MODULE_COLUMNS: &str =
    "module_code, name, ects, room_type, assessment_type, semester, category, program_id";

// ============================================================================
// Module Entity
// ============================================================================

/// A `modules` row as stored.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ModuleRow {
    pub module_code: String,
    pub name: String,
    pub ects: i32,
    pub room_type: String,
    /// JSON breakdown or legacy free text; see [`StoredAssessment`].
    pub assessment_type: Option<String>,
    pub semester: i32,
    pub category: Option<String>,
    pub program_id: Option<Uuid>,
}

impl ModuleRow {
    pub const fn resource(&self) -> Resource {
        Resource::ProgramOwned {
            program_id: self.program_id,
        }
    }
}

/// Module as returned to clients.
///
/// Exactly one of `assessment_type` (legacy text) and `assessment_breakdown`
/// is set when the module has an assessment.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ModuleResponse {
    pub module_code: String,
    pub name: String,
    pub ects: i32,
    pub room_type: String,
    pub assessment_type: Option<String>,
    pub assessment_breakdown: Option<Vec<AssessmentComponent>>,
    pub semester: i32,
    pub category: Option<String>,
    pub program_id: Option<Uuid>,
    pub specializations: Vec<Specialization>,
}

impl ModuleResponse {
    #[must_use]
    pub fn new(row: ModuleRow, specializations: Vec<Specialization>) -> Self {
        let (assessment_type, assessment_breakdown) =
            match StoredAssessment::decode(row.assessment_type.as_deref()) {
                Some(StoredAssessment::LegacyText(text)) => (Some(text), None),
                Some(StoredAssessment::Breakdown(components)) => (None, Some(components)),
                None => (None, None),
            };

        Self {
            module_code: row.module_code,
            name: row.name,
            ects: row.ects,
            room_type: row.room_type,
            assessment_type,
            assessment_breakdown,
            semester: row.semester,
            category: row.category,
            program_id: row.program_id,
            specializations,
        }
    }
}

/// Specialization joined with the module it is linked to.
#[derive(Debug, FromRow)]
pub(crate) struct LinkedSpecialization {
    pub module_code: String,
    #[sqlx(flatten)]
    pub specialization: Specialization,
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateModuleRequest {
    #[validate(length(min = 1, max = 50, message = "Module code must be 1-50 characters"))]
    pub module_code: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(range(min = 0, max = 300))]
    pub ects: i32,
    #[validate(length(min = 1, max = 100))]
    pub room_type: String,
    /// Legacy free text, or a JSON-encoded breakdown.
    pub assessment_type: Option<String>,
    /// Structured breakdown; missing weights are filled in.
    pub assessment_breakdown: Option<Vec<AssessmentInput>>,
    #[validate(range(min = 1, max = 20))]
    pub semester: i32,
    pub category: Option<String>,
    pub program_id: Option<Uuid>,
    #[serde(default)]
    pub specialization_ids: Vec<Uuid>,
}

impl CreateModuleRequest {
    /// Build the row to insert, normalizing the assessment.
    pub fn to_row(&self) -> Result<ModuleRow, AssessmentError> {
        let assessment = StoredAssessment::from_request(
            self.assessment_breakdown.as_deref(),
            self.assessment_type.as_deref(),
        )?;

        Ok(ModuleRow {
            module_code: self.module_code.trim().to_string(),
            name: self.name.trim().to_string(),
            ects: self.ects,
            room_type: self.room_type.clone(),
            assessment_type: assessment.map(|a| a.encode()),
            semester: self.semester,
            category: self.category.clone(),
            program_id: self.program_id,
        })
    }
}

#[allow(clippy::option_option)]
#[derive(Debug, Default, Deserialize, Validate, utoipa::ToSchema)]
pub struct UpdateModuleRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(range(min = 0, max = 300))]
    pub ects: Option<i32>,
    #[validate(length(min = 1, max = 100))]
    pub room_type: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub assessment_type: Option<Option<String>>,
    pub assessment_breakdown: Option<Vec<AssessmentInput>>,
    #[validate(range(min = 1, max = 20))]
    pub semester: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub category: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub program_id: Option<Option<Uuid>>,
    /// Replaces the linked specializations when present.
    pub specialization_ids: Option<Vec<Uuid>>,
}

impl UpdateModuleRequest {
    /// Apply the patch. Specialization links are handled separately.
    pub fn apply_to(self, row: &mut ModuleRow) -> Result<(), AssessmentError> {
        if self.assessment_breakdown.is_some() || self.assessment_type.is_some() {
            let legacy = self.assessment_type.flatten();
            let stored = StoredAssessment::from_request(
                self.assessment_breakdown.as_deref(),
                legacy.as_deref(),
            )?;
            row.assessment_type = stored.map(|a| a.encode());
        }

        apply(&mut row.name, self.name);
        apply(&mut row.ects, self.ects);
        apply(&mut row.room_type, self.room_type);
        apply(&mut row.semester, self.semester);
        apply_nullable(&mut row.category, self.category);
        apply_nullable(&mut row.program_id, self.program_id);
        Ok(())
    }
}
