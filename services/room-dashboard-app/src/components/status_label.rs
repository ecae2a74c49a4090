//! Status label component

use leptos::prelude::*;

/// Color used for statuses outside the known set
pub const DEFAULT_COLOR: &str = "gray";

/// Display color for a health status string
pub fn status_color(status: &str) -> &'static str {
    match status {
        "healthy" => "green",
        "warning" => "orange",
        "critical" => "red",
        _ => DEFAULT_COLOR,
    }
}

/// The health status in bold, colored by severity
#[component]
pub fn StatusLabel(status: String) -> impl IntoView {
    let style = format!("color: {};", status_color(&status));

    view! {
        <strong style=style>{status}</strong>
    }
}
