//! Health status presentation rules

use crate::reading::HealthStatus;

/// Color for statuses outside the fixed table
pub const DEFAULT_STATUS_COLOR: &str = "gray";

/// Datapoints that get a gauge graphic on their card
pub const GAUGE_DATAPOINTS: [&str; 3] = ["temperature", "humidity", "co2"];

/// Map a health status to its display color. Never fails.
pub fn status_color(status: &HealthStatus) -> &'static str {
    match status {
        HealthStatus::Healthy => "green",
        HealthStatus::Warning => "orange",
        HealthStatus::Critical => "red",
        HealthStatus::Other(_) => DEFAULT_STATUS_COLOR,
    }
}

/// Same mapping for a raw status string
pub fn color_for_status(status: &str) -> &'static str {
    status_color(&HealthStatus::from(status))
}

pub fn has_gauge(datapoint: &str) -> bool {
    GAUGE_DATAPOINTS.contains(&datapoint)
}
