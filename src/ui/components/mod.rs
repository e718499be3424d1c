pub mod dashboard;
pub mod keyboard_diagram;
pub mod progress_bar;
pub mod word_card;
