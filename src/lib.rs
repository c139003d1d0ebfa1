pub mod actor;
pub mod common;
pub mod extension;
pub mod layout_engine;
pub mod model;
pub mod sys;
