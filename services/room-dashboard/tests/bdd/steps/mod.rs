//! BDD step definitions for the room dashboard

pub mod rendering_steps;
pub mod session_steps;
pub mod view_model_steps;

/// Parse an "occupied"/"vacant" step word
pub fn parse_occupancy(word: &str) -> bool {
    match word {
        "occupied" => true,
        "vacant" => false,
        other => panic!("Unknown occupancy: {}", other),
    }
}
