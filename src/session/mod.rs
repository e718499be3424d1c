pub mod feedback;
pub mod game;
pub mod input;
