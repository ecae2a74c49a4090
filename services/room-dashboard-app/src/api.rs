//! Client-side API types
//!
//! These mirror the JSON served by `/api/rooms` and are shared between SSR
//! and client-side hydration.

use serde::{Deserialize, Serialize};

/// One reading as returned inside a room group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingResponse {
    pub room_id: String,
    pub datapoint: String,
    #[serde(default)]
    pub health_status: String,
    #[serde(default)]
    pub is_occupied: bool,
}

impl ReadingResponse {
    pub fn occupancy_label(&self) -> &'static str {
        if self.is_occupied {
            "Occupied"
        } else {
            "Vacant"
        }
    }
}

/// A room and its readings as returned by /api/rooms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomGroupResponse {
    pub room_id: String,
    pub readings: Vec<ReadingResponse>,
}
