//! Server-side HTML rendering of room cards

use crate::grouping::RoomGroup;
use crate::reading::Reading;
use crate::status::{has_gauge, status_color, GAUGE_DATAPOINTS};

/// Escape text for use in HTML content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Half-donut gauge with a single segment in the status color
pub fn render_gauge(reading: &Reading) -> String {
    let color = status_color(&reading.health_status);
    let label = escape_html(&format!(
        "{}: {}",
        reading.datapoint, reading.health_status
    ));
    format!(
        r#"<svg class="gauge" width="150" height="90" viewBox="0 0 150 90" role="img" aria-label="{label}">
                <path d="M 15 85 A 60 60 0 0 1 135 85 L 115 85 A 40 40 0 0 0 35 85 Z" fill="{color}" />
                <text x="75" y="12" text-anchor="middle" font-size="11">{label}</text>
            </svg>"#,
        label = label,
        color = color,
    )
}

/// One reading as a status-colored card
pub fn render_card(room_id: &str, reading: &Reading) -> String {
    let color = status_color(&reading.health_status);
    let gauge = if has_gauge(&reading.datapoint) {
        render_gauge(reading)
    } else {
        String::new()
    };
    format!(
        r#"<div class="room-card" style="border: 2px solid {color}; border-radius: 8px; padding: 16px; margin-bottom: 16px; width: 300px; background: #f9f9f9;">
            <h3>{room}</h3>
            <p>Status: <strong style="color: {color};">{status}</strong></p>
            <p>Occupancy: <strong>{occupancy}</strong></p>
            <p>Datapoint: {datapoint}</p>
            {gauge}
        </div>"#,
        color = color,
        room = escape_html(room_id),
        status = escape_html(reading.health_status.as_str()),
        occupancy = reading.occupancy_label(),
        datapoint = escape_html(&reading.datapoint),
        gauge = gauge,
    )
}

/// A room heading followed by its cards
pub fn render_room(group: &RoomGroup) -> String {
    let cards: String = group
        .readings
        .iter()
        .map(|r| render_card(&group.room_id, r))
        .collect();
    format!(
        r#"<div class="room">
        <h2>{}</h2>
        {}
    </div>"#,
        escape_html(&group.room_id),
        cards
    )
}

/// Full dashboard page; the embedded script re-renders from `/api/rooms`
pub fn render_page(groups: &[RoomGroup], refresh_interval_seconds: u64) -> String {
    let rooms: String = groups.iter().map(render_room).collect();
    let gauge_datapoints = GAUGE_DATAPOINTS
        .iter()
        .map(|d| format!("'{}'", d))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Hotel Room Dashboard</title>
    <script>
        const STATUS_COLORS = {{ healthy: 'green', warning: 'orange', critical: 'red' }};
        const METERS = [{gauge_datapoints}];
        function esc(s) {{
            return String(s ?? '').replace(/[&<>"']/g, c => ({{
                '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;', "'": '&#39;'
            }})[c]);
        }}
        function card(roomId, r) {{
            const color = STATUS_COLORS[r.health_status] || 'gray';
            const label = esc(`${{r.datapoint}}: ${{r.health_status}}`);
            const gauge = METERS.includes(r.datapoint) ? `<svg class="gauge" width="150" height="90" viewBox="0 0 150 90" role="img" aria-label="${{label}}">
                <path d="M 15 85 A 60 60 0 0 1 135 85 L 115 85 A 40 40 0 0 0 35 85 Z" fill="${{color}}" />
                <text x="75" y="12" text-anchor="middle" font-size="11">${{label}}</text>
            </svg>` : '';
            return `<div class="room-card" style="border: 2px solid ${{color}}; border-radius: 8px; padding: 16px; margin-bottom: 16px; width: 300px; background: #f9f9f9;">
                <h3>${{esc(roomId)}}</h3>
                <p>Status: <strong style="color: ${{color}};">${{esc(r.health_status)}}</strong></p>
                <p>Occupancy: <strong>${{r.is_occupied ? 'Occupied' : 'Vacant'}}</strong></p>
                <p>Datapoint: ${{esc(r.datapoint)}}</p>
                ${{gauge}}
            </div>`;
        }}
        function refreshData() {{
            fetch('/api/rooms')
                .then(r => r.json())
                .then(groups => {{
                    document.getElementById('rooms').innerHTML = groups.map(g =>
                        `<div class="room"><h2>${{esc(g.room_id)}}</h2>${{g.readings.map(r => card(g.room_id, r)).join('')}}</div>`
                    ).join('');
                }});
        }}
        setInterval(refreshData, {refresh_ms});
    </script>
</head>
<body style="font-family: system-ui, sans-serif; padding: 20px;">
    <h1>Hotel Room Dashboard</h1>
    <div id="rooms" style="display: flex; flex-wrap: wrap; gap: 20px;">{rooms}</div>
</body>
</html>"#,
        gauge_datapoints = gauge_datapoints,
        refresh_ms = refresh_interval_seconds.max(1).saturating_mul(1000),
        rooms = rooms,
    )
}
