//! Permission-related types stored in the database.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// User role.
///
/// Admin and PM share the top tier. HoSP authority is limited to programs they
/// head; lecturers act only on their own profile and availability.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, utoipa::ToSchema,
)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Role {
    Admin,
    Pm,
    Hosp,
    Lecturer,
    Student,
}

impl Role {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Pm => "pm",
            Self::Hosp => "hosp",
            Self::Lecturer => "lecturer",
            Self::Student => "student",
        }
    }

    /// Admin or PM.
    #[must_use]
    pub const fn is_administrative(&self) -> bool {
        matches!(self, Self::Admin | Self::Pm)
    }

    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Admin,
            Self::Pm,
            Self::Hosp,
            Self::Lecturer,
            Self::Student,
        ]
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|r| r.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

impl TryFrom<String> for Role {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// What a scheduler constraint applies to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, utoipa::ToSchema,
)]
#[sqlx(type_name = "constraint_scope", rename_all = "lowercase")]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ConstraintScope {
    Global,
    Program,
    Lecturer,
    Group,
    Module,
    Room,
}

impl ConstraintScope {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Program => "program",
            Self::Lecturer => "lecturer",
            Self::Group => "group",
            Self::Module => "module",
            Self::Room => "room",
        }
    }

    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Global,
            Self::Program,
            Self::Lecturer,
            Self::Group,
            Self::Module,
            Self::Room,
        ]
    }
}

impl FromStr for ConstraintScope {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|scope| scope.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

impl TryFrom<String> for ConstraintScope {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Text that does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variant: {0}")]
pub struct UnknownVariant(pub String);
