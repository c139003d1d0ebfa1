//! The seam between placement logic and the compositor it runs inside.

pub mod geometry;
pub mod memory;
pub mod settings;
pub mod window_system;
