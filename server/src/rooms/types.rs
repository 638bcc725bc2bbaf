//! Room Type Definitions

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::api::patch::{apply, apply_nullable, double_option};

pub(crate) const ROOM_COLUMNS: &str = "id, name, capacity, type, status, equipment, location";

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, utoipa::ToSchema)]
pub struct Room {
    pub id: Uuid,
    pub name: String,
    pub capacity: i32,
    /// Matched against `modules.room_type`.
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub room_type: String,
    pub status: bool,
    pub equipment: Option<String>,
    pub location: Option<String>,
}

const fn default_status() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateRoomRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(range(min = 0))]
    pub capacity: i32,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 100))]
    pub room_type: String,
    #[serde(default = "default_status")]
    pub status: bool,
    pub equipment: Option<String>,
    pub location: Option<String>,
}

#[allow(clippy::option_option)]
#[derive(Debug, Default, Deserialize, Validate, utoipa::ToSchema)]
pub struct UpdateRoomRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(range(min = 0))]
    pub capacity: Option<i32>,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 100))]
    pub room_type: Option<String>,
    pub status: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub equipment: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub location: Option<Option<String>>,
}

impl UpdateRoomRequest {
    pub fn apply_to(self, room: &mut Room) {
        apply(&mut room.name, self.name);
        apply(&mut room.capacity, self.capacity);
        apply(&mut room.room_type, self.room_type);
        apply(&mut room.status, self.status);
        apply_nullable(&mut room.equipment, self.equipment);
        apply_nullable(&mut room.location, self.location);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_field_uses_wire_name() {
        let req: CreateRoomRequest =
            serde_json::from_str(r#"{"name": "A101", "capacity": 40, "type": "Lab"}"#).unwrap();
        assert_eq!(req.room_type, "Lab");
        assert!(req.status);
    }

    #[test]
    fn test_patch_can_close_room_and_clear_equipment() {
        let mut room = Room {
            id: Uuid::now_v7(),
            name: "A101".into(),
            capacity: 40,
            room_type: "Lab".into(),
            status: true,
            equipment: Some("Projector".into()),
            location: None,
        };
        let patch: UpdateRoomRequest =
            serde_json::from_str(r#"{"status": false, "equipment": null}"#).unwrap();
        patch.apply_to(&mut room);

        assert!(!room.status);
        assert_eq!(room.equipment, None);
        assert_eq!(room.name, "A101");

        let json = serde_json::to_value(&room).unwrap();
        assert_eq!(json["type"], "Lab");
    }
}
