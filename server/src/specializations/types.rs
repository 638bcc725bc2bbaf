//! Specialization Type Definitions

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::api::patch::{apply, apply_nullable, double_option};
use crate::permissions::Resource;

pub(crate) const SPECIALIZATION_COLUMNS: &str =
    "id, name, acronym, start_date, program_id, status, study_program";

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, utoipa::ToSchema)]
pub struct Specialization {
    pub id: Uuid,
    pub name: String,
    pub acronym: String,
    pub start_date: String,
    pub program_id: Option<Uuid>,
    pub status: bool,
    /// Free-text program label kept from older imports.
    pub study_program: Option<String>,
}

impl Specialization {
    pub const fn resource(&self) -> Resource {
        Resource::ProgramOwned {
            program_id: self.program_id,
        }
    }
}

const fn default_status() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateSpecializationRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 20))]
    pub acronym: String,
    #[validate(length(min = 1, max = 50))]
    pub start_date: String,
    pub program_id: Option<Uuid>,
    #[serde(default = "default_status")]
    pub status: bool,
    pub study_program: Option<String>,
}

#[allow(clippy::option_option)]
#[derive(Debug, Default, Deserialize, Validate, utoipa::ToSchema)]
pub struct UpdateSpecializationRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub acronym: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub program_id: Option<Option<Uuid>>,
    pub status: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub study_program: Option<Option<String>>,
}

impl UpdateSpecializationRequest {
    pub fn apply_to(self, spec: &mut Specialization) {
        apply(&mut spec.name, self.name);
        apply(&mut spec.acronym, self.acronym);
        apply(&mut spec.start_date, self.start_date);
        apply_nullable(&mut spec.program_id, self.program_id);
        apply(&mut spec.status, self.status);
        apply_nullable(&mut spec.study_program, self.study_program);
    }
}
