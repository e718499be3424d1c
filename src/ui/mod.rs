pub mod components;
pub mod layout;
pub mod line_input;
pub mod screens;
pub mod theme;
