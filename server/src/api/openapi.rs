//! OpenAPI Document
//!
//! Served by Swagger UI at `/swagger-ui`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::assessment::{AssessmentComponent, AssessmentInput};
use crate::auth::handlers::{LoginRequest, LoginResponse, MeResponse};
use crate::auth::ErrorResponse;
use crate::permissions::{ConstraintScope, Role};
use crate::{
    availabilities, constraints, groups, lecturers, modules, offerings, programs, rooms,
    schedule, specializations,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Studyplan API",
        description = "Study program scheduling metadata"
    ),
    tags(
        (name = "auth", description = "Login and current user"),
        (name = "study-programs", description = "Study programs and their heads"),
        (name = "lecturers", description = "Lecturer records and self-service profile"),
        (name = "modules", description = "Modules with assessment breakdowns"),
        (name = "specializations", description = "Program specializations"),
        (name = "groups", description = "Student groups"),
        (name = "rooms", description = "Room catalog"),
        (name = "availabilities", description = "Lecturer availability"),
        (name = "constraints", description = "Scheduler constraints and their types"),
        (name = "offered-modules", description = "Modules offered per semester"),
        (name = "schedule", description = "Calendar entries"),
        (name = "health", description = "Liveness")
    ),
    paths(
        crate::auth::handlers::login,
        crate::auth::handlers::me,
        programs::handlers::list_programs,
        programs::handlers::create_program,
        programs::handlers::update_program,
        programs::handlers::delete_program,
        lecturers::handlers::list_lecturers,
        lecturers::handlers::get_my_profile,
        lecturers::handlers::update_my_profile,
        lecturers::handlers::create_lecturer,
        lecturers::handlers::update_lecturer,
        lecturers::handlers::delete_lecturer,
        modules::handlers::list_modules,
        modules::handlers::get_module,
        modules::handlers::create_module,
        modules::handlers::update_module,
        modules::handlers::delete_module,
        specializations::handlers::list_specializations,
        specializations::handlers::create_specialization,
        specializations::handlers::update_specialization,
        specializations::handlers::delete_specialization,
        groups::handlers::list_groups,
        groups::handlers::create_group,
        groups::handlers::update_group,
        groups::handlers::delete_group,
        rooms::handlers::list_rooms,
        rooms::handlers::create_room,
        rooms::handlers::update_room,
        rooms::handlers::delete_room,
        availabilities::handlers::list_availabilities,
        availabilities::handlers::upsert_availability,
        availabilities::handlers::delete_availability,
        constraints::handlers::list_constraint_types,
        constraints::handlers::list_constraints,
        constraints::handlers::create_constraint,
        constraints::handlers::update_constraint,
        constraints::handlers::delete_constraint,
        offerings::handlers::list_offerings,
        offerings::handlers::create_offering,
        offerings::handlers::delete_offering,
        schedule::handlers::list_schedule,
        schedule::handlers::create_schedule_entry,
        schedule::handlers::delete_schedule_entry,
        super::health_check,
    ),
    components(
        schemas(
            ErrorResponse, LoginRequest, LoginResponse, MeResponse, Role, ConstraintScope,
            AssessmentInput, AssessmentComponent,
            programs::types::StudyProgram, programs::types::StudyProgramResponse,
            programs::types::CreateProgramRequest, programs::types::UpdateProgramRequest,
            lecturers::types::Lecturer, lecturers::types::CreateLecturerRequest,
            lecturers::types::UpdateLecturerRequest,
            modules::types::ModuleResponse, modules::types::CreateModuleRequest,
            modules::types::UpdateModuleRequest,
            specializations::types::Specialization,
            specializations::types::CreateSpecializationRequest,
            specializations::types::UpdateSpecializationRequest,
            groups::types::Group, groups::types::CreateGroupRequest,
            groups::types::UpdateGroupRequest,
            rooms::types::Room, rooms::types::CreateRoomRequest, rooms::types::UpdateRoomRequest,
            availabilities::types::LecturerAvailability,
            availabilities::types::UpsertAvailabilityRequest,
            constraints::types::ConstraintType, constraints::types::Hardness,
            constraints::types::SchedulerConstraint,
            constraints::types::CreateConstraintRequest,
            constraints::types::UpdateConstraintRequest,
            offerings::types::OfferedModuleView, offerings::types::CreateOfferingRequest,
            schedule::types::ScheduleEntryView, schedule::types::CreateScheduleEntryRequest,
            super::HealthResponse,
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Registers the bearer token scheme referenced by `security(("bearer_auth" = []))`.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_resource_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/auth/login",
            "/api/study-programs",
            "/api/modules/{module_code}",
            "/api/availabilities/update",
            "/api/scheduler-constraints/{id}",
            "/api/schedule",
            "/health",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
