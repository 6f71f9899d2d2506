//! World tracking and surface raycasting.
//!
//! The tracker sits behind the `TrackingProvider` trait so the session only
//! ever sees "nearest surface point along a ray". Desktop and web builds use
//! `SimulatedTracking`, which detects configured planes over time.

/// Session lifecycle: start, per-frame advance, pause and resume on focus changes.
pub mod lifecycle;

/// Tracking provider trait, raycast queries and status reporting.
pub mod provider;

/// Crosshair ray and world point resolution.
pub mod raycast;

/// Plane-based tracker with warm-up and plane confirmation timing.
pub mod simulated;
