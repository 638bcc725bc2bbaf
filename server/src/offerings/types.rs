//! Offered Module Type Definitions

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// An offering joined with its module and lecturer names.
///
/// `module_name` falls back to "Unknown Module" and `lecturer_name` to
/// "Unassigned".
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, utoipa::ToSchema)]
pub struct OfferedModuleView {
    pub id: Uuid,
    pub module_code: String,
    pub module_name: String,
    pub lecturer_id: Option<Uuid>,
    pub lecturer_name: String,
    pub semester: String,
    pub status: String,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct OfferingParams {
    /// Only offerings of this semester (e.g. "Winter 2024").
    pub semester: Option<String>,
}

fn default_status() -> String {
    "Confirmed".to_string()
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateOfferingRequest {
    #[validate(length(min = 1, max = 50))]
    pub module_code: String,
    pub lecturer_id: Option<Uuid>,
    #[validate(length(min = 1, max = 50))]
    pub semester: String,
    #[serde(default = "default_status")]
    #[validate(length(min = 1, max = 50))]
    pub status: String,
}
