pub mod render;
pub mod viewer;
