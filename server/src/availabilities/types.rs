//! Availability Type Definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::permissions::Resource;

pub(crate) const AVAILABILITY_COLUMNS: &str = "id, lecturer_id, schedule_data, updated_at";

/// When a lecturer can teach. `schedule_data` is stored as given.
#[derive(Debug, Clone, FromRow, Serialize, utoipa::ToSchema)]
pub struct LecturerAvailability {
    pub id: Uuid,
    pub lecturer_id: Uuid,
    #[schema(value_type = Object)]
    pub schedule_data: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

impl LecturerAvailability {
    pub const fn resource(&self) -> Resource {
        Resource::Availability {
            lecturer_id: self.lecturer_id,
        }
    }
}

/// Body of `POST /api/availabilities/update`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpsertAvailabilityRequest {
    pub lecturer_id: Uuid,
    #[schema(value_type = Object)]
    pub schedule_data: serde_json::Value,
}
