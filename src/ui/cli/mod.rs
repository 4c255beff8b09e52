pub mod actions;
pub mod args;
pub mod drivers;
pub mod render;
pub mod wizard;
