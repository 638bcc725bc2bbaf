//! Group Type Definitions

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::api::patch::{apply, apply_nullable, double_option};
use crate::permissions::Resource;

pub(crate) const GROUP_COLUMNS: &str = "id, name, size, description, email, program, parent_group";

/// A student cohort.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, utoipa::ToSchema)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub size: i32,
    pub description: Option<String>,
    pub email: Option<String>,
    /// Program name, acronym or id as free text.
    pub program: Option<String>,
    pub parent_group: Option<String>,
}

impl Group {
    pub fn resource(&self) -> Resource {
        Resource::Group {
            program: self.program.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateGroupRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(range(min = 0))]
    pub size: i32,
    pub description: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub program: Option<String>,
    pub parent_group: Option<String>,
}

#[allow(clippy::option_option)]
#[derive(Debug, Default, Deserialize, Validate, utoipa::ToSchema)]
pub struct UpdateGroupRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(range(min = 0))]
    pub size: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub program: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub parent_group: Option<Option<String>>,
}

impl UpdateGroupRequest {
    pub fn apply_to(self, group: &mut Group) {
        apply(&mut group.name, self.name);
        apply(&mut group.size, self.size);
        apply_nullable(&mut group.description, self.description);
        apply_nullable(&mut group.email, self.email);
        apply_nullable(&mut group.program, self.program);
        apply_nullable(&mut group.parent_group, self.parent_group);
    }
}
