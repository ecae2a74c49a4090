//! BDD step definitions for the card rendering feature

use cucumber::{given, then, when};

use room_dashboard::render::render_card;
use room_dashboard::status::color_for_status;
use room_dashboard::{HealthStatus, Reading};

use super::parse_occupancy;
use crate::world::DashboardWorld;

#[when(expr = "the color for status {string} is looked up")]
fn look_up_color(world: &mut DashboardWorld, status: String) {
    world.color = Some(color_for_status(&status).to_string());
}

#[then(expr = "the color is {string}")]
fn color_is(world: &mut DashboardWorld, expected: String) {
    assert_eq!(world.color.as_deref(), Some(expected.as_str()));
}

#[given(expr = "a reading for room {string} datapoint {string} status {string} {word}")]
fn a_reading(
    world: &mut DashboardWorld,
    room: String,
    datapoint: String,
    status: String,
    occupancy: String,
) {
    world.reading = Some(Reading::new(
        room,
        datapoint,
        HealthStatus::from(status.as_str()),
        parse_occupancy(&occupancy),
    ));
}

#[when("the card is rendered")]
fn render(world: &mut DashboardWorld) {
    let reading = world.reading.as_ref().expect("reading not set");
    world.card_html = Some(render_card(&reading.room_id, reading));
}

fn card(world: &DashboardWorld) -> &str {
    world.card_html.as_deref().expect("card not rendered")
}

#[then(expr = "the card shows {string}")]
fn card_shows(world: &mut DashboardWorld, expected: String) {
    let html = card(world);
    assert!(
        html.contains(&expected),
        "Expected card to contain '{}'.\nCard:\n{}",
        expected,
        html
    );
}

#[then(expr = "the card has a gauge labeled {string}")]
fn card_has_gauge(world: &mut DashboardWorld, label: String) {
    let html = card(world);
    assert!(html.contains("<svg class=\"gauge\""), "no gauge in:\n{}", html);
    assert!(html.contains(&format!(">{}</text>", label)), "{}", html);
}

#[then("the card has no gauge")]
fn card_has_no_gauge(world: &mut DashboardWorld) {
    assert!(!card(world).contains("<svg"));
}

#[then(expr = "the card is colored {string}")]
fn card_colored(world: &mut DashboardWorld, color: String) {
    let html = card(world);
    assert!(html.contains(&format!("border: 2px solid {}", color)), "{}", html);
    assert!(html.contains(&format!("color: {};", color)), "{}", html);
}
