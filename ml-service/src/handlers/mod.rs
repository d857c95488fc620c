//! HTTP handlers

pub mod health;
pub mod detect;
pub mod train;
pub mod model;
