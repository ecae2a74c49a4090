pub mod room_card;
pub mod room_grid;
pub mod status_gauge;
pub mod status_label;
