//! Study Program Type Definitions

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::api::patch::{apply, apply_nullable, double_option};
use crate::lecturers::Lecturer;
use crate::permissions::Resource;

pub(crate) const PROGRAM_COLUMNS: &str = "id, name, acronym, status, start_date, total_ects, \
     location, level, degree_type, head_of_program_id";

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, utoipa::ToSchema)]
pub struct StudyProgram {
    pub id: Uuid,
    pub name: String,
    pub acronym: String,
    pub status: bool,
    pub start_date: String,
    pub total_ects: i32,
    pub location: Option<String>,
    pub level: String,
    pub degree_type: Option<String>,
    pub head_of_program_id: Option<Uuid>,
}

impl StudyProgram {
    pub const fn resource(&self) -> Resource {
        Resource::Program {
            head_of_program_id: self.head_of_program_id,
        }
    }
}

/// Program with its head lecturer embedded.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct StudyProgramResponse {
    #[serde(flatten)]
    pub program: StudyProgram,
    pub head_lecturer: Option<Lecturer>,
}

// ============================================================================
// Request Types
// ============================================================================

const fn default_status() -> bool {
    true
}

fn default_level() -> String {
    "Bachelor".to_string()
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateProgramRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 20, message = "Acronym must be 1-20 characters"))]
    pub acronym: String,
    #[serde(default = "default_status")]
    pub status: bool,
    #[validate(length(min = 1, max = 50))]
    pub start_date: String,
    #[validate(range(min = 0, max = 1000))]
    pub total_ects: i32,
    pub location: Option<String>,
    #[serde(default = "default_level")]
    #[validate(length(min = 1, max = 50))]
    pub level: String,
    pub degree_type: Option<String>,
    pub head_of_program_id: Option<Uuid>,
}

#[allow(clippy::option_option)]
#[derive(Debug, Default, Deserialize, Validate, utoipa::ToSchema)]
pub struct UpdateProgramRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 20, message = "Acronym must be 1-20 characters"))]
    pub acronym: Option<String>,
    pub status: Option<bool>,
    #[validate(length(min = 1, max = 50))]
    pub start_date: Option<String>,
    #[validate(range(min = 0, max = 1000))]
    pub total_ects: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub location: Option<Option<String>>,
    #[validate(length(min = 1, max = 50))]
    pub level: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub degree_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub head_of_program_id: Option<Option<Uuid>>,
}

impl UpdateProgramRequest {
    pub fn apply_to(self, program: &mut StudyProgram) {
        apply(&mut program.name, self.name);
        apply(&mut program.acronym, self.acronym);
        apply(&mut program.status, self.status);
        apply(&mut program.start_date, self.start_date);
        apply(&mut program.total_ects, self.total_ects);
        apply_nullable(&mut program.location, self.location);
        apply(&mut program.level, self.level);
        apply_nullable(&mut program.degree_type, self.degree_type);
        apply_nullable(&mut program.head_of_program_id, self.head_of_program_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_defaults() {
        let req: CreateProgramRequest = serde_json::from_str(
            r#"{"name": "Computer Science", "acronym": "CS", "start_date": "2025-10-01", "total_ects": 180}"#,
        )
        .unwrap();
        assert!(req.status);
        assert_eq!(req.level, "Bachelor");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_clearing_head_changes_resource() {
        let head = Uuid::now_v7();
        let mut program = StudyProgram {
            id: Uuid::now_v7(),
            name: "CS".into(),
            acronym: "CS".into(),
            status: true,
            start_date: "2025".into(),
            total_ects: 180,
            location: None,
            level: "Bachelor".into(),
            degree_type: None,
            head_of_program_id: Some(head),
        };
        let patch: UpdateProgramRequest =
            serde_json::from_str(r#"{"head_of_program_id": null}"#).unwrap();
        patch.apply_to(&mut program);
        assert_eq!(
            program.resource(),
            Resource::Program {
                head_of_program_id: None
            }
        );
    }
}
