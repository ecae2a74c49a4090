//! Room grouping projection over the view model

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::reading::Reading;
use crate::state::ViewModel;

/// All readings currently known for one room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomGroup {
    pub room_id: String,
    pub readings: Vec<Reading>,
}

/// Group the store by room, preserving store order.
///
/// Rooms appear in the order of their first reading. Recomputed on every
/// render; nothing is cached between calls.
pub fn group_by_room(store: &ViewModel) -> Vec<RoomGroup> {
    let mut groups: Vec<RoomGroup> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for reading in store.iter() {
        let position = *positions
            .entry(reading.room_id.as_str())
            .or_insert_with(|| {
                groups.push(RoomGroup {
                    room_id: reading.room_id.clone(),
                    readings: Vec::new(),
                });
                groups.len() - 1
            });
        groups[position].readings.push(reading.clone());
    }

    groups
}
