//! Handheld device camera for the measuring view.
//!
//! Simulates moving a phone through the room with keyboard and mouse,
//! with smooth interpolation towards the target pose.

/// Device pose resource and controller system.
pub mod device_camera;
