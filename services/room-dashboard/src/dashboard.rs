//! Web dashboard with HTML page and JSON API endpoints

use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::Router;

use crate::grouping::group_by_room;
use crate::render::render_page;
use crate::state::StoreHandle;

/// Dashboard application state
#[derive(Clone)]
pub struct DashboardState {
    pub store: StoreHandle,
    pub refresh_interval_seconds: u64,
}

/// Build the dashboard axum router
pub fn build_router(store: StoreHandle, refresh_interval_seconds: u64) -> Router {
    let dashboard_state = DashboardState {
        store,
        refresh_interval_seconds,
    };

    Router::new()
        .route("/", get(index_handler))
        .route("/api/rooms", get(rooms_handler))
        .route("/api/readings", get(readings_handler))
        .route("/health", get(health_handler))
        .with_state(dashboard_state)
}

async fn index_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    let store = dashboard.store.read().await;
    let groups = group_by_room(&store);
    Html(render_page(&groups, dashboard.refresh_interval_seconds))
}

async fn rooms_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    let store = dashboard.store.read().await;
    axum::Json(group_by_room(&store))
}

async fn readings_handler(State(dashboard): State<DashboardState>) -> impl IntoResponse {
    let store = dashboard.store.read().await;

    let readings: Vec<serde_json::Value> = store
        .iter()
        .map(|r| {
            serde_json::json!({
                "key": r.key().to_string(),
                "reading": r,
            })
        })
        .collect();

    axum::Json(readings)
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}
