//! HTTP route handlers

pub mod events;
pub mod games;
pub mod moves;
pub mod status;
