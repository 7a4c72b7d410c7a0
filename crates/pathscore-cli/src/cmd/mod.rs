pub mod components;
pub mod score;
pub mod size;
