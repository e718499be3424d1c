pub mod display;
pub mod layout;
pub mod zhuyin;
