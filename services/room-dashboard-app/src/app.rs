//! Main App component

use crate::components::room_grid::RoomGrid;
use leptos::prelude::*;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    view! {
        <main style="font-family: system-ui, sans-serif; padding: 20px;">
            <h1>"Hotel Room Dashboard"</h1>
            <RoomGrid />
        </main>
    }
}
