//! Card for a single room reading

use crate::api::ReadingResponse;
use crate::components::status_gauge::{has_gauge, StatusGauge};
use crate::components::status_label::{status_color, StatusLabel};
use leptos::prelude::*;

/// Status, occupancy and datapoint of one reading, bordered in the status color
#[component]
pub fn RoomCard(room_id: String, reading: ReadingResponse) -> impl IntoView {
    let style = format!(
        "border: 2px solid {}; border-radius: 8px; padding: 16px; \
         margin-bottom: 16px; width: 300px; background: #f9f9f9;",
        status_color(&reading.health_status)
    );
    let occupancy = reading.occupancy_label();
    let gauge = has_gauge(&reading.datapoint).then(|| {
        view! {
            <StatusGauge
                datapoint=reading.datapoint.clone()
                status=reading.health_status.clone()
            />
        }
    });

    view! {
        <div class="room-card" style=style>
            <h3>{room_id}</h3>
            <p>"Status: " <StatusLabel status=reading.health_status.clone() /></p>
            <p>"Occupancy: " <strong>{occupancy}</strong></p>
            <p>"Datapoint: " {reading.datapoint.clone()}</p>
            {gauge}
        </div>
    }
}
