//! BDD test world for the room dashboard

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use cucumber::World;
use room_dashboard::realtime::ChangeEvent;
use room_dashboard::state::ViewModel;
use room_dashboard::{DashboardSession, Reading};
use tokio::sync::mpsc;

/// A mounted session plus the handles the steps drive it with
pub struct MountedSession {
    pub session: DashboardSession,
    pub events: mpsc::UnboundedSender<ChangeEvent>,
    pub expected_revision: u64,
}

impl std::fmt::Debug for MountedSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MountedSession")
            .field("expected_revision", &self.expected_revision)
            .finish()
    }
}

#[derive(Debug, Default, World)]
pub struct DashboardWorld {
    // View-model testing
    pub store: ViewModel,

    // Rendering testing
    pub reading: Option<Reading>,
    pub card_html: Option<String>,
    pub color: Option<String>,

    // Session testing
    pub snapshot_rows: Option<Vec<Reading>>,
    pub snapshot_fails: bool,
    pub mounted: Option<MountedSession>,
    pub closes: Arc<AtomicUsize>,
}
