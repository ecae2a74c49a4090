//! Room Dashboard - live hotel room sensor and occupancy view
//!
//! Loads every reading once, follows row changes over the Realtime stream,
//! and serves the merged view grouped by room.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod grouping;
pub mod io;
pub mod reading;
pub mod realtime;
pub mod render;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod status;

pub use config::{load_config, Config};
pub use error::{DashboardError, Result};
pub use reading::{HealthStatus, Reading, ReadingKey};
pub use session::DashboardSession;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::io::ReqwestHttpClient;
use crate::realtime::{ChangeSource, RealtimeClient};
use crate::snapshot::{SnapshotLoader, SnapshotSource};

/// Run the room dashboard with the given configuration
pub async fn run(config: Config) -> Result<()> {
    let http: Arc<dyn io::HttpClient> = Arc::new(ReqwestHttpClient::new());
    let cancel = CancellationToken::new();

    let snapshot: Arc<dyn SnapshotSource> =
        Arc::new(SnapshotLoader::new(&config.supabase, Arc::clone(&http)));
    let changes: Arc<dyn ChangeSource> = Arc::new(RealtimeClient::new(&config.supabase));

    let session = DashboardSession::mount(snapshot, changes).await;

    // Setup shutdown handler
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        cancel_for_signal.cancel();
    });

    // Start dashboard if enabled
    if config.dashboard.enabled {
        let dashboard_port = config.dashboard.port;
        let router = dashboard::build_router(
            session.store(),
            config.dashboard.refresh_interval_seconds,
        );
        let cancel_for_dashboard = cancel.clone();

        tokio::spawn(async move {
            let addr = SocketAddr::from(([0, 0, 0, 0], dashboard_port));
            tracing::info!("Dashboard listening on http://{}", addr);

            let listener = match tokio::net::TcpListener::bind(addr).await {
                Ok(l) => l,
                Err(e) => {
                    tracing::error!(
                        "Failed to bind dashboard to port {}: {}. Continuing without dashboard.",
                        dashboard_port,
                        e
                    );
                    return;
                }
            };

            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    cancel_for_dashboard.cancelled().await;
                })
                .await
                .ok();

            tracing::debug!("Dashboard stopped");
        });
    }

    tracing::info!("Room dashboard started");

    cancel.cancelled().await;

    session.unmount().await;
    tracing::info!("Room dashboard stopped");

    Ok(())
}
