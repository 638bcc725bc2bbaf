//! Role-based authorization.
//!
//! Three tiers:
//! - Admin / PM: unrestricted
//! - `HoSP`: programs they head and everything those programs own
//! - Lecturer: their own profile and availability
//!
//! Students only read shared data.

pub mod models;
pub mod queries;
pub mod resolver;

pub use models::{ConstraintScope, Role, UnknownVariant};
pub use queries::load_program_domain;
pub use resolver::{
    authorize, authorize_update, filter_readable, Action, DomainProgram, PermissionError,
    Principal, ProgramDomain, Resource, SELF_EDITABLE_LECTURER_FIELDS,
};
