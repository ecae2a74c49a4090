//! BDD step definitions for the view-model feature

use cucumber::{given, then, when};

use room_dashboard::grouping::group_by_room;
use room_dashboard::session::{apply_update, Update};
use room_dashboard::state::ViewModel;
use room_dashboard::{HealthStatus, Reading, ReadingKey};

use super::parse_occupancy;
use crate::world::DashboardWorld;

fn reading(room: &str, datapoint: &str, status: &str, occupancy: &str) -> Reading {
    Reading::new(
        room,
        datapoint,
        HealthStatus::from(status),
        parse_occupancy(occupancy),
    )
}

#[given("an empty view model")]
fn empty_view_model(world: &mut DashboardWorld) {
    world.store = ViewModel::new();
}

#[given(expr = "a snapshot with a reading for room {string} datapoint {string} status {string} {word}")]
fn snapshot_with_reading(
    world: &mut DashboardWorld,
    room: String,
    datapoint: String,
    status: String,
    occupancy: String,
) {
    let row = reading(&room, &datapoint, &status, &occupancy);
    apply_update(&mut world.store, Update::Snapshot(vec![row]));
}

#[when(expr = "a snapshot arrives with a reading for room {string} datapoint {string} status {string} {word}")]
fn snapshot_arrives(
    world: &mut DashboardWorld,
    room: String,
    datapoint: String,
    status: String,
    occupancy: String,
) {
    snapshot_with_reading(world, room, datapoint, status, occupancy);
}

#[when(expr = "a change arrives for room {string} datapoint {string} status {string} {word}")]
fn change_arrives(
    world: &mut DashboardWorld,
    room: String,
    datapoint: String,
    status: String,
    occupancy: String,
) {
    let row = reading(&room, &datapoint, &status, &occupancy);
    apply_update(&mut world.store, Update::Change(row));
}

#[then(expr = "the store has {int} entry/entries")]
fn store_has_entries(world: &mut DashboardWorld, count: usize) {
    assert_eq!(world.store.len(), count);
}

#[then(expr = "the store has an entry keyed {string}")]
fn store_has_key(world: &mut DashboardWorld, key: String) {
    let found = world.store.iter().any(|r| r.key().to_string() == key);
    assert!(found, "No entry keyed '{}' in {:?}", key, world.store);
}

#[then(expr = "the entry keyed {string} has status {string}")]
fn entry_has_status(world: &mut DashboardWorld, key: String, status: String) {
    let (room, datapoint) = key.split_once('-').expect("key must be room-datapoint");
    let reading = world
        .store
        .get(&ReadingKey::new(room, datapoint))
        .expect("entry not found");
    assert_eq!(reading.health_status, HealthStatus::from(status.as_str()));
}

#[then(expr = "room {string} has {int} reading/readings")]
fn room_has_readings(world: &mut DashboardWorld, room: String, count: usize) {
    let groups = group_by_room(&world.store);
    let group = groups
        .iter()
        .find(|g| g.room_id == room)
        .expect("room not found");
    assert_eq!(group.readings.len(), count);
}

#[then(expr = "there is/are {int} room/rooms")]
fn room_count(world: &mut DashboardWorld, count: usize) {
    assert_eq!(group_by_room(&world.store).len(), count);
}
