//! BDD step definitions for the session lifecycle feature

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cucumber::{given, then, when};
use serde_json::json;
use tokio::sync::{mpsc, Mutex};

use room_dashboard::realtime::{ChangeEvent, ChangeKind, ChangeSource, ChangeStream};
use room_dashboard::snapshot::SnapshotSource;
use room_dashboard::{DashboardError, DashboardSession, HealthStatus, Reading, ReadingKey};

use super::parse_occupancy;
use crate::world::{DashboardWorld, MountedSession};

struct TestSnapshot {
    rows: Option<Vec<Reading>>,
}

#[async_trait]
impl SnapshotSource for TestSnapshot {
    async fn fetch(&self) -> room_dashboard::Result<Vec<Reading>> {
        self.rows
            .clone()
            .ok_or_else(|| DashboardError::Http("snapshot unavailable".to_string()))
    }
}

struct TestStream {
    events: mpsc::UnboundedReceiver<ChangeEvent>,
    closes: Arc<AtomicUsize>,
}

#[async_trait]
impl ChangeStream for TestStream {
    async fn next_event(&mut self) -> Option<ChangeEvent> {
        self.events.recv().await
    }

    async fn close(&mut self) -> room_dashboard::Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct TestSource {
    stream: Mutex<Option<TestStream>>,
}

#[async_trait]
impl ChangeSource for TestSource {
    async fn subscribe(&self) -> room_dashboard::Result<Box<dyn ChangeStream>> {
        self.stream
            .lock()
            .await
            .take()
            .map(|s| Box::new(s) as Box<dyn ChangeStream>)
            .ok_or_else(|| DashboardError::Realtime("already subscribed".to_string()))
    }
}

async fn wait_for_revision(mounted: &MountedSession) {
    let mut revisions = mounted.session.revisions();
    let target = mounted.expected_revision;
    tokio::time::timeout(Duration::from_secs(5), revisions.wait_for(|r| *r >= target))
        .await
        .expect("timed out waiting for the update queue")
        .expect("update queue closed");
}

fn mounted(world: &mut DashboardWorld) -> &mut MountedSession {
    world.mounted.as_mut().expect("dashboard not mounted")
}

#[given(expr = "the backend snapshot returns a reading for room {string} datapoint {string} status {string} {word}")]
fn snapshot_returns(
    world: &mut DashboardWorld,
    room: String,
    datapoint: String,
    status: String,
    occupancy: String,
) {
    world.snapshot_rows = Some(vec![Reading::new(
        room,
        datapoint,
        HealthStatus::from(status.as_str()),
        parse_occupancy(&occupancy),
    )]);
    world.snapshot_fails = false;
}

#[given("the backend snapshot fails")]
fn snapshot_fails(world: &mut DashboardWorld) {
    world.snapshot_rows = None;
    world.snapshot_fails = true;
}

#[when("the dashboard is mounted")]
async fn mount(world: &mut DashboardWorld) {
    let (tx, rx) = mpsc::unbounded_channel();
    let snapshot = Arc::new(TestSnapshot {
        rows: if world.snapshot_fails {
            None
        } else {
            Some(world.snapshot_rows.clone().unwrap_or_default())
        },
    });
    let source = Arc::new(TestSource {
        stream: Mutex::new(Some(TestStream {
            events: rx,
            closes: Arc::clone(&world.closes),
        })),
    });

    let session = DashboardSession::mount(snapshot, source).await;
    world.mounted = Some(MountedSession {
        session,
        events: tx,
        expected_revision: 0,
    });
}

#[when("the snapshot has been applied")]
async fn snapshot_applied(world: &mut DashboardWorld) {
    let mounted = mounted(world);
    mounted.expected_revision += 1;
    wait_for_revision(mounted).await;
}

#[when(expr = "the stream delivers a change for room {string} datapoint {string} status {string} {word}")]
async fn stream_delivers_change(
    world: &mut DashboardWorld,
    room: String,
    datapoint: String,
    status: String,
    occupancy: String,
) {
    let mounted = mounted(world);
    let event = ChangeEvent::new(
        ChangeKind::Update,
        Some(json!({
            "room_id": room,
            "datapoint": datapoint,
            "health_status": status,
            "is_occupied": parse_occupancy(&occupancy)
        })),
    );
    mounted.events.send(event).expect("stream closed");
    mounted.expected_revision += 1;
    wait_for_revision(mounted).await;
}

#[when("the stream delivers a delete")]
fn stream_delivers_delete(world: &mut DashboardWorld) {
    let mounted = mounted(world);
    mounted
        .events
        .send(ChangeEvent::new(ChangeKind::Delete, None))
        .expect("stream closed");
}

#[when("the dashboard is unmounted")]
async fn unmount(world: &mut DashboardWorld) {
    let mounted = world.mounted.take().expect("dashboard not mounted");
    mounted.session.unmount().await;
}

#[then(expr = "the live store has {int} entry/entries")]
async fn live_store_entries(world: &mut DashboardWorld, count: usize) {
    let store = mounted(world).session.store();
    assert_eq!(store.read().await.len(), count);
}

#[then(expr = "the live entry keyed {string} has status {string}")]
async fn live_entry_status(world: &mut DashboardWorld, key: String, status: String) {
    let (room, datapoint) = key.split_once('-').expect("key must be room-datapoint");
    let store = mounted(world).session.store();
    let store = store.read().await;
    let reading = store
        .get(&ReadingKey::new(room, datapoint))
        .expect("entry not found");
    assert_eq!(reading.health_status, HealthStatus::from(status.as_str()));
}

#[then(expr = "the subscription was released {int} time/times")]
fn released_times(world: &mut DashboardWorld, count: usize) {
    assert_eq!(world.closes.load(Ordering::SeqCst), count);
}
