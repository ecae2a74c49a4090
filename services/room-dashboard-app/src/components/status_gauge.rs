//! Half-donut gauge for the metered datapoints

use crate::components::status_label::status_color;
use leptos::prelude::*;

/// Datapoints that get a gauge under their card
pub const GAUGE_DATAPOINTS: [&str; 3] = ["temperature", "humidity", "co2"];

pub fn has_gauge(datapoint: &str) -> bool {
    GAUGE_DATAPOINTS.contains(&datapoint)
}

/// Caption shown above the gauge
pub fn gauge_label(datapoint: &str, status: &str) -> String {
    format!("{}: {}", datapoint, status)
}

/// A single-segment gauge filled with the status color
#[component]
pub fn StatusGauge(datapoint: String, status: String) -> impl IntoView {
    let color = status_color(&status);
    let label = gauge_label(&datapoint, &status);
    let aria_label = label.clone();

    view! {
        <svg class="gauge" width="150" height="90" viewBox="0 0 150 90" role="img" aria-label=aria_label>
            <path
                d="M 15 85 A 60 60 0 0 1 135 85 L 115 85 A 40 40 0 0 0 35 85 Z"
                fill=color
            />
            <text x="75" y="12" text-anchor="middle" font-size="11">{label}</text>
        </svg>
    }
}
