//! Constraint Type Definitions

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::api::patch::{apply, apply_nullable, double_option};
use crate::permissions::{ConstraintScope, Resource, UnknownVariant};

pub(crate) const CONSTRAINT_COLUMNS: &str =
    "id, constraint_type_id, hardness, weight, scope, target_id, config, is_enabled, notes";

/// Entry of the read-only constraint type catalog.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, utoipa::ToSchema)]
pub struct ConstraintType {
    pub id: Uuid,
    pub name: String,
}

/// Whether the scheduler must honor a constraint or may trade it off.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, utoipa::ToSchema,
)]
#[sqlx(type_name = "constraint_hardness", rename_all = "lowercase")]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Hardness {
    Hard,
    Soft,
}

impl Hardness {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Hard => "hard",
            Self::Soft => "soft",
        }
    }
}

impl FromStr for Hardness {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Hard, Self::Soft]
            .into_iter()
            .find(|h| h.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

impl TryFrom<String> for Hardness {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A scheduling rule. Stored for a future solver; nothing evaluates it here.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, utoipa::ToSchema)]
pub struct SchedulerConstraint {
    pub id: Uuid,
    pub constraint_type_id: Uuid,
    pub hardness: Hardness,
    pub weight: i32,
    pub scope: ConstraintScope,
    pub target_id: Option<Uuid>,
    #[schema(value_type = Object)]
    pub config: serde_json::Value,
    pub is_enabled: bool,
    pub notes: Option<String>,
}

impl SchedulerConstraint {
    pub const fn resource(&self) -> Resource {
        Resource::Constraint {
            scope: self.scope,
            target_id: self.target_id,
        }
    }
}

const fn default_weight() -> i32 {
    10
}

const fn default_enabled() -> bool {
    true
}

fn empty_config() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateConstraintRequest {
    pub constraint_type_id: Uuid,
    pub hardness: Hardness,
    #[serde(default = "default_weight")]
    #[validate(range(min = 0))]
    pub weight: i32,
    pub scope: ConstraintScope,
    pub target_id: Option<Uuid>,
    #[serde(default = "empty_config")]
    #[schema(value_type = Object)]
    pub config: serde_json::Value,
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
    pub notes: Option<String>,
}

impl CreateConstraintRequest {
    pub const fn resource(&self) -> Resource {
        Resource::Constraint {
            scope: self.scope,
            target_id: self.target_id,
        }
    }
}

#[allow(clippy::option_option)]
#[derive(Debug, Default, Deserialize, Validate, utoipa::ToSchema)]
pub struct UpdateConstraintRequest {
    pub constraint_type_id: Option<Uuid>,
    pub hardness: Option<Hardness>,
    #[validate(range(min = 0))]
    pub weight: Option<i32>,
    pub scope: Option<ConstraintScope>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub target_id: Option<Option<Uuid>>,
    #[schema(value_type = Option<Object>)]
    pub config: Option<serde_json::Value>,
    pub is_enabled: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
}

impl UpdateConstraintRequest {
    pub fn apply_to(self, constraint: &mut SchedulerConstraint) {
        apply(&mut constraint.constraint_type_id, self.constraint_type_id);
        apply(&mut constraint.hardness, self.hardness);
        apply(&mut constraint.weight, self.weight);
        apply(&mut constraint.scope, self.scope);
        apply_nullable(&mut constraint.target_id, self.target_id);
        apply(&mut constraint.config, self.config);
        apply(&mut constraint.is_enabled, self.is_enabled);
        apply_nullable(&mut constraint.notes, self.notes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_defaults() {
        let req: CreateConstraintRequest = serde_json::from_str(&format!(
            r#"{{"constraint_type_id": "{}", "hardness": "Soft", "scope": "global"}}"#,
            Uuid::now_v7()
        ))
        .unwrap();

        assert_eq!(req.hardness, Hardness::Soft);
        assert_eq!(req.weight, 10);
        assert!(req.is_enabled);
        assert_eq!(req.config, serde_json::json!({}));
        assert_eq!(
            req.resource(),
            Resource::Constraint {
                scope: ConstraintScope::Global,
                target_id: None
            }
        );
    }

    #[test]
    fn test_unknown_hardness_is_rejected() {
        let result = serde_json::from_str::<CreateConstraintRequest>(&format!(
            r#"{{"constraint_type_id": "{}", "hardness": "medium", "scope": "global"}}"#,
            Uuid::now_v7()
        ));
        assert!(result.is_err());
    }

    #[test]
    fn test_retarget_changes_resource() {
        let program = Uuid::now_v7();
        let mut constraint = SchedulerConstraint {
            id: Uuid::now_v7(),
            constraint_type_id: Uuid::now_v7(),
            hardness: Hardness::Hard,
            weight: 10,
            scope: ConstraintScope::Program,
            target_id: Some(program),
            config: serde_json::json!({"max_hours": 6}),
            is_enabled: true,
            notes: None,
        };
        let patch: UpdateConstraintRequest =
            serde_json::from_str(r#"{"scope": "global", "target_id": null}"#).unwrap();
        patch.apply_to(&mut constraint);

        assert_eq!(
            constraint.resource(),
            Resource::Constraint {
                scope: ConstraintScope::Global,
                target_id: None
            }
        );
        assert_eq!(constraint.config["max_hours"], 6);
    }
}
