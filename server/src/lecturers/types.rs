//! Lecturer Type Definitions

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::api::patch::{apply, apply_nullable, double_option};

pub(crate) const LECTURER_COLUMNS: &str = "id, first_name, last_name, title, employment_type, \
     personal_email, mdh_email, phone, location, teaching_load";

// ============================================================================
// Lecturer Entity
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, utoipa::ToSchema)]
pub struct Lecturer {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: Option<String>,
    pub title: String,
    pub employment_type: String,
    pub personal_email: Option<String>,
    pub mdh_email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub teaching_load: Option<String>,
}

impl Lecturer {
    /// "First Last", or just the first name.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.last_name.as_deref().map(str::trim) {
            Some(last) if !last.is_empty() => format!("{} {last}", self.first_name),
            _ => self.first_name.clone(),
        }
    }
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateLecturerRequest {
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: String,
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub title: String,
    #[validate(length(min = 1, max = 50))]
    pub employment_type: String,
    #[validate(email)]
    pub personal_email: Option<String>,
    #[validate(email)]
    pub mdh_email: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    pub location: Option<String>,
    pub teaching_load: Option<String>,
}

/// Partial lecturer update.
///
/// Nullable fields use double-option deserialization: absent leaves the value
/// unchanged, `null` clears it.
#[allow(clippy::option_option)]
#[derive(Debug, Default, Deserialize, Validate, utoipa::ToSchema)]
pub struct UpdateLecturerRequest {
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub last_name: Option<Option<String>>,
    #[validate(length(min = 1, max = 50))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub employment_type: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(email)]
    #[schema(value_type = Option<String>)]
    pub personal_email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(email)]
    #[schema(value_type = Option<String>)]
    pub mdh_email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[validate(length(max = 50))]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub teaching_load: Option<Option<String>>,
}

impl UpdateLecturerRequest {
    /// Discard every field not named in `allowed`. Returns the names of the
    /// fields that were set and discarded.
    pub fn retain_fields(&mut self, allowed: &[&str]) -> Vec<&'static str> {
        let mut dropped = Vec::new();

        macro_rules! retain {
            ($($field:ident),* $(,)?) => {
                $(
                    if !allowed.contains(&stringify!($field)) && self.$field.take().is_some() {
                        dropped.push(stringify!($field));
                    }
                )*
            };
        }

        retain!(
            first_name,
            last_name,
            title,
            employment_type,
            personal_email,
            mdh_email,
            phone,
            location,
            teaching_load,
        );

        dropped
    }

    pub fn apply_to(self, lecturer: &mut Lecturer) {
        apply(&mut lecturer.first_name, self.first_name);
        apply_nullable(&mut lecturer.last_name, self.last_name);
        apply(&mut lecturer.title, self.title);
        apply(&mut lecturer.employment_type, self.employment_type);
        apply_nullable(&mut lecturer.personal_email, self.personal_email);
        apply_nullable(&mut lecturer.mdh_email, self.mdh_email);
        apply_nullable(&mut lecturer.phone, self.phone);
        apply_nullable(&mut lecturer.location, self.location);
        apply_nullable(&mut lecturer.teaching_load, self.teaching_load);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::SELF_EDITABLE_LECTURER_FIELDS;

    fn lecturer() -> Lecturer {
        Lecturer {
            id: Uuid::now_v7(),
            first_name: "Ada".into(),
            last_name: Some("Lovelace".into()),
            title: "Dr.".into(),
            employment_type: "Full time".into(),
            personal_email: None,
            mdh_email: Some("ada@uni.example".into()),
            phone: None,
            location: Some("Berlin".into()),
            teaching_load: None,
        }
    }

    #[test]
    fn test_self_edit_drops_fields_outside_allow_list() {
        let mut patch: UpdateLecturerRequest = serde_json::from_str(
            r#"{"first_name": "Eve", "title": "Prof.", "phone": "+49 30 1234", "personal_email": "ada@home.example"}"#,
        )
        .unwrap();

        let mut dropped = patch.retain_fields(SELF_EDITABLE_LECTURER_FIELDS);
        dropped.sort_unstable();
        assert_eq!(dropped, vec!["first_name", "title"]);

        let mut row = lecturer();
        patch.apply_to(&mut row);
        assert_eq!(row.first_name, "Ada");
        assert_eq!(row.title, "Dr.");
        assert_eq!(row.phone.as_deref(), Some("+49 30 1234"));
        assert_eq!(row.personal_email.as_deref(), Some("ada@home.example"));
    }

    #[test]
    fn test_self_edit_dropping_null_clear_of_protected_field() {
        let mut patch: UpdateLecturerRequest =
            serde_json::from_str(r#"{"mdh_email": null}"#).unwrap();
        assert_eq!(patch.retain_fields(SELF_EDITABLE_LECTURER_FIELDS), vec!["mdh_email"]);

        let mut row = lecturer();
        patch.apply_to(&mut row);
        assert_eq!(row.mdh_email.as_deref(), Some("ada@uni.example"));
    }

    #[test]
    fn test_allowed_fields_only_reports_nothing_dropped() {
        let mut patch: UpdateLecturerRequest = serde_json::from_str(r#"{"phone": null}"#).unwrap();
        assert!(patch.retain_fields(SELF_EDITABLE_LECTURER_FIELDS).is_empty());

        let mut row = lecturer();
        row.phone = Some("old".into());
        patch.apply_to(&mut row);
        assert_eq!(row.phone, None);
    }

    #[test]
    fn test_full_update_applies_everything() {
        let patch: UpdateLecturerRequest =
            serde_json::from_str(r#"{"first_name": "Grace", "last_name": null, "location": "Bonn"}"#)
                .unwrap();
        let mut row = lecturer();
        patch.apply_to(&mut row);
        assert_eq!(row.first_name, "Grace");
        assert_eq!(row.last_name, None);
        assert_eq!(row.location.as_deref(), Some("Bonn"));
        assert_eq!(row.title, "Dr.");
    }

    #[test]
    fn test_display_name() {
        let mut row = lecturer();
        assert_eq!(row.display_name(), "Ada Lovelace");
        row.last_name = None;
        assert_eq!(row.display_name(), "Ada");
    }
}
