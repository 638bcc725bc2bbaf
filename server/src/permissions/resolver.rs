//! Permission resolution logic.
//!
//! Decides whether a principal may perform an action on a resource. Pure: the
//! caller loads the resource's program affiliation and, for HoSP principals,
//! the programs they head.
//!
//! Resolution order:
//! 1. Admin/PM: everything
//! 2. `HoSP`: resources owned by a program they head
//! 3. Lecturer: their own profile and availability
//! 4. Student: shared reads only
//!
//! Anything not explicitly allowed is denied.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;

use super::models::{ConstraintScope, Role};

/// Lecturer profile fields a lecturer may change on their own record.
pub const SELF_EDITABLE_LECTURER_FIELDS: &[&str] = &["personal_email", "phone"];

/// The authenticated actor as seen by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub role: Role,
    pub lecturer_id: Option<Uuid>,
}

impl Principal {
    #[must_use]
    pub const fn new(user_id: Uuid, role: Role, lecturer_id: Option<Uuid>) -> Self {
        Self {
            user_id,
            role,
            lecturer_id,
        }
    }

    /// The linked lecturer, or `NotLinked`.
    pub const fn require_lecturer_link(&self) -> Result<Uuid, PermissionError> {
        match self.lecturer_id {
            Some(id) => Ok(id),
            None => Err(PermissionError::NotLinked),
        }
    }
}

/// What the principal is trying to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
}

impl Action {
    #[must_use]
    pub const fn is_write(&self) -> bool {
        !matches!(self, Self::Read)
    }
}

/// A resource resolved to the scope it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    /// Shared reference data only administrators edit (rooms, lecturer
    /// records, constraint types).
    Catalog,
    /// A study program.
    Program { head_of_program_id: Option<Uuid> },
    /// A row owned by a program: module, specialization, offering or
    /// calendar entry.
    ProgramOwned { program_id: Option<Uuid> },
    /// A student group, tied to a program by a free-text label.
    Group { program: Option<String> },
    /// A scheduler constraint.
    Constraint {
        scope: ConstraintScope,
        target_id: Option<Uuid>,
    },
    /// A lecturer's own profile.
    LecturerProfile { lecturer_id: Uuid },
    /// A lecturer's availability.
    Availability { lecturer_id: Uuid },
}

impl Resource {
    /// Readable by every authenticated user.
    const fn is_shared(&self) -> bool {
        matches!(
            self,
            Self::Catalog
                | Self::Program { .. }
                | Self::ProgramOwned { .. }
                | Self::Group { .. }
                | Self::Constraint { .. }
        )
    }
}

/// A program headed by the principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainProgram {
    pub id: Uuid,
    pub name: String,
    pub acronym: String,
}

/// Programs a `HoSP` principal heads. Empty for every other role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramDomain {
    programs: Vec<DomainProgram>,
}

impl ProgramDomain {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn new(programs: Vec<DomainProgram>) -> Self {
        Self { programs }
    }

    #[must_use]
    pub fn contains(&self, program_id: Uuid) -> bool {
        self.programs.iter().any(|p| p.id == program_id)
    }

    /// Whether a free-text program label names one of the programs, by name,
    /// acronym or id (case-insensitive).
    #[must_use]
    pub fn matches_label(&self, label: &str) -> bool {
        let wanted = label.trim().to_lowercase();
        if wanted.is_empty() {
            return false;
        }
        self.programs.iter().any(|p| {
            p.name.trim().to_lowercase() == wanted
                || p.acronym.trim().to_lowercase() == wanted
                || p.id.to_string() == wanted
        })
    }

    pub fn program_ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.programs.iter().map(|p| p.id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}

/// Decide whether `principal` may perform `action` on `resource`.
pub fn authorize(
    principal: &Principal,
    action: Action,
    resource: &Resource,
    domain: &ProgramDomain,
) -> Result<(), PermissionError> {
    match principal.role {
        Role::Admin | Role::Pm => Ok(()),
        Role::Hosp => authorize_hosp(principal, action, resource, domain),
        Role::Lecturer => authorize_lecturer(principal, action, resource),
        Role::Student => {
            if action == Action::Read && resource.is_shared() {
                Ok(())
            } else {
                Err(PermissionError::Forbidden)
            }
        }
    }
}

/// Authorize an update against the row as it is and as it will be.
///
/// A principal who may edit `before` but not `after` is trying to move the
/// resource out of their scope; that is reported as `CannotRelocate`.
pub fn authorize_update(
    principal: &Principal,
    before: &Resource,
    after: &Resource,
    domain: &ProgramDomain,
) -> Result<(), PermissionError> {
    authorize(principal, Action::Update, before, domain)?;
    authorize(principal, Action::Update, after, domain).map_err(|e| match e {
        PermissionError::OutOfScope => PermissionError::CannotRelocate,
        other => other,
    })
}

/// Keep the items the principal may read.
///
/// Items out of the principal's scope are skipped. Any other denial (role
/// cannot read this kind of resource at all, missing lecturer link) fails
/// the whole listing.
pub fn filter_readable<T>(
    principal: &Principal,
    items: Vec<T>,
    domain: &ProgramDomain,
    resource_of: impl Fn(&T) -> Resource,
) -> Result<Vec<T>, PermissionError> {
    let mut visible = Vec::with_capacity(items.len());
    for item in items {
        match authorize(principal, Action::Read, &resource_of(&item), domain) {
            Ok(()) => visible.push(item),
            Err(PermissionError::OutOfScope) => {}
            Err(e) => return Err(e),
        }
    }
    Ok(visible)
}

fn authorize_hosp(
    principal: &Principal,
    action: Action,
    resource: &Resource,
    domain: &ProgramDomain,
) -> Result<(), PermissionError> {
    if action == Action::Read {
        return match resource {
            Resource::Availability { .. } => Err(PermissionError::Forbidden),
            _ => Ok(()),
        };
    }

    let lecturer_id = principal.require_lecturer_link()?;

    let in_scope = match resource {
        Resource::Program { head_of_program_id } => {
            if action != Action::Update {
                return Err(PermissionError::Forbidden);
            }
            *head_of_program_id == Some(lecturer_id)
        }
        Resource::ProgramOwned { program_id } => program_id.is_some_and(|id| domain.contains(id)),
        Resource::Group { program } => program
            .as_deref()
            .is_some_and(|label| domain.matches_label(label)),
        Resource::Constraint { scope, target_id } => {
            *scope == ConstraintScope::Program && target_id.is_some_and(|id| domain.contains(id))
        }
        Resource::Catalog | Resource::LecturerProfile { .. } | Resource::Availability { .. } => {
            return Err(PermissionError::Forbidden);
        }
    };

    if in_scope {
        Ok(())
    } else {
        Err(PermissionError::OutOfScope)
    }
}

fn authorize_lecturer(
    principal: &Principal,
    action: Action,
    resource: &Resource,
) -> Result<(), PermissionError> {
    if action == Action::Read && resource.is_shared() {
        return Ok(());
    }

    let own = match resource {
        Resource::LecturerProfile { lecturer_id } => {
            if !matches!(action, Action::Read | Action::Update) {
                return Err(PermissionError::Forbidden);
            }
            *lecturer_id
        }
        Resource::Availability { lecturer_id } => *lecturer_id,
        _ => return Err(PermissionError::Forbidden),
    };

    if principal.require_lecturer_link()? == own {
        Ok(())
    } else {
        Err(PermissionError::OutOfScope)
    }
}

/// Permission check errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PermissionError {
    /// Role requires a lecturer profile link that the user lacks.
    #[error("User is not linked to a lecturer profile")]
    NotLinked,

    /// Resource belongs to a program (or lecturer) outside the user's scope.
    #[error("Unauthorized for this program")]
    OutOfScope,

    /// Update would move the resource outside the user's scope.
    #[error("Cannot move resource out of your program scope")]
    CannotRelocate,

    /// Role may not perform this action at all.
    #[error("Not allowed")]
    Forbidden,
}

impl PermissionError {
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotLinked => "NOT_LINKED",
            Self::OutOfScope => "OUT_OF_SCOPE",
            Self::CannotRelocate => "CANNOT_RELOCATE",
            Self::Forbidden => "FORBIDDEN",
        }
    }
}

impl IntoResponse for PermissionError {
    fn into_response(self) -> Response {
        tracing::warn!(code = self.code(), "Authorization denied");
        (
            StatusCode::FORBIDDEN,
            Json(serde_json::json!({ "error": self.code(), "message": self.to_string() })),
        )
            .into_response()
    }
}
