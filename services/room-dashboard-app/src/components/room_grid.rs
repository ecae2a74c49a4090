//! Grid of rooms, each with its reading cards

use crate::api::RoomGroupResponse;
use crate::components::room_card::RoomCard;
use leptos::prelude::*;
use std::time::Duration;

/// Fetches /api/rooms and lays out one section per room, re-fetching every
/// `refresh_interval_seconds`
#[component]
pub fn RoomGrid(#[prop(default = 5)] refresh_interval_seconds: u64) -> impl IntoView {
    let (tick, set_tick) = signal(0u64);
    let rooms = Resource::new(
        move || tick.get(),
        |_| async move { fetch_rooms().await.unwrap_or_default() },
    );

    // Effects only run in the browser
    Effect::new(move |_| {
        set_interval(
            move || set_tick.update(|t| *t += 1),
            refresh_period(refresh_interval_seconds),
        );
    });

    view! {
        <Suspense fallback=move || view! { <p>"Loading rooms..."</p> }>
            {move || {
                rooms.get().map(|data| {
                    if data.is_empty() {
                        view! { <p>"No readings yet."</p> }.into_any()
                    } else {
                        view! {
                            <div id="rooms" style="display: flex; flex-wrap: wrap; gap: 20px;">
                                {data.into_iter().map(|room| {
                                    let room_id = room.room_id.clone();
                                    view! {
                                        <div class="room">
                                            <h2>{room.room_id}</h2>
                                            {room.readings.into_iter().map(|reading| {
                                                view! { <RoomCard room_id=room_id.clone() reading=reading /> }
                                            }).collect::<Vec<_>>()}
                                        </div>
                                    }
                                }).collect::<Vec<_>>()}
                            </div>
                        }.into_any()
                    }
                })
            }}
        </Suspense>
    }
}

fn refresh_period(seconds: u64) -> Duration {
    Duration::from_secs(seconds.max(1))
}

async fn fetch_rooms() -> Result<Vec<RoomGroupResponse>, String> {
    // SSR renders the fallback; the hydrated client fetches the JSON API
    #[cfg(feature = "hydrate")]
    {
        let window = web_sys::window().ok_or("no window")?;
        let origin = window.location().origin().map_err(|e| format!("{:?}", e))?;
        let url = format!("{}/api/rooms", origin);

        let resp = gloo_net::http::Request::get(&url)
            .send()
            .await
            .map_err(|e| format!("{}", e))?;

        resp.json().await.map_err(|e| format!("{}", e))
    }

    #[cfg(not(feature = "hydrate"))]
    {
        Ok(vec![])
    }
}
