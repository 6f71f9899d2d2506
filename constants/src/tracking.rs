/// Seconds after a (re)start before any surface becomes available to raycasts.
pub const DEFAULT_WARMUP_SECS: f32 = 1.5;

/// Seconds an estimated plane stays estimated before its geometry is confirmed.
pub const DEFAULT_CONFIRM_SECS: f32 = 3.0;

/// Rays closer than this to parallel with a plane never hit it.
pub const MIN_RAY_PLANE_DENOMINATOR: f32 = 1.0e-6;

/// |normal.y| above this counts as a horizontal plane.
pub const HORIZONTAL_NORMAL_THRESHOLD: f32 = 0.9;

/// Rays are not followed past this distance (meters).
pub const MAX_RAYCAST_DISTANCE: f32 = 50.0;
