//! Shared constants for the measuring engine.
//!
//! Kept in a separate crate so render tweaks and unit tables can change
//! without touching the session logic.

pub mod messages;
pub mod render_settings;
pub mod tracking;
pub mod units;
