//! Calendar Entry Type Definitions

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// A calendar entry joined with module, lecturer and room names.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, utoipa::ToSchema)]
pub struct ScheduleEntryView {
    pub id: Uuid,
    pub offered_module_id: Uuid,
    pub module_name: String,
    pub lecturer_name: String,
    pub room_id: Option<Uuid>,
    pub room_name: String,
    pub day_of_week: String,
    pub start_time: String,
    pub end_time: String,
    pub semester: String,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ScheduleParams {
    /// Semester to show (e.g. "Winter 2024").
    pub semester: String,
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateScheduleEntryRequest {
    pub offered_module_id: Uuid,
    pub room_id: Option<Uuid>,
    /// English weekday name, e.g. "Monday".
    pub day_of_week: String,
    /// "HH:MM"
    pub start_time: String,
    /// "HH:MM", after `start_time`.
    pub end_time: String,
    #[validate(length(min = 1, max = 50))]
    pub semester: String,
}

impl CreateScheduleEntryRequest {
    /// Check the weekday and time slot. Returns the weekday in canonical
    /// capitalization.
    pub fn check_slot(&self) -> Result<&'static str, String> {
        let day = WEEKDAYS
            .iter()
            .copied()
            .find(|d| d.eq_ignore_ascii_case(self.day_of_week.trim()))
            .ok_or_else(|| format!("Unknown day of week: {}", self.day_of_week))?;

        let start = parse_time(&self.start_time)?;
        let end = parse_time(&self.end_time)?;
        if end <= start {
            return Err("end_time must be after start_time".to_string());
        }
        Ok(day)
    }
}

fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").map_err(|_| format!("Invalid time: {raw}"))
}
