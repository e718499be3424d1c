pub mod fallback;
pub mod model;
pub mod repository;
pub mod supplier;
