use bevy::prelude::*;
use constants::messages::{TRACKING_FAILED, TRACKING_INTERRUPTED, TRACKING_INTERRUPTION_ENDED};
use constants::tracking::HORIZONTAL_NORMAL_THRESHOLD;
use std::fmt;

/// Which surface geometry a raycast may hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaycastTarget {
    /// Planes whose extent is still a guess as well as confirmed ones.
    EstimatedPlane,
    /// Confirmed plane geometry only.
    ExistingPlaneGeometry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneAlignment {
    Horizontal,
    Vertical,
    Any,
}

impl PlaneAlignment {
    /// Classify a plane from its normal. Never returns `Any`.
    pub fn of_normal(normal: Vec3) -> Self {
        if normal.normalize_or_zero().y.abs() >= HORIZONTAL_NORMAL_THRESHOLD {
            Self::Horizontal
        } else {
            Self::Vertical
        }
    }

    pub fn accepts(self, plane: PlaneAlignment) -> bool {
        self == PlaneAlignment::Any || self == plane
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastQuery {
    pub origin: Vec3,
    pub direction: Dir3,
    pub target: RaycastTarget,
    pub alignment: PlaneAlignment,
}

impl RaycastQuery {
    /// Query that accepts any surface the provider knows about, estimated or not.
    pub fn permissive(ray: Ray3d) -> Self {
        Self {
            origin: ray.origin,
            direction: ray.direction,
            target: RaycastTarget::EstimatedPlane,
            alignment: PlaneAlignment::Any,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastResult {
    pub world_point: Vec3,
    /// Distance along the ray, in meters.
    pub distance: f32,
    pub plane_index: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub reset_tracking: bool,
    pub remove_existing_anchors: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrackingState {
    #[default]
    Stopped,
    Initializing,
    Normal,
    Paused,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackingError {
    #[error("tracking session is not running")]
    SessionNotRunning,
    #[error("not enough surfaces to track")]
    InsufficientFeatures,
    #[error("invalid tracking configuration: {0}")]
    Configuration(String),
}

/// Status reported by the tracking provider, shown as-is to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackingStatus {
    Failed(TrackingError),
    Interrupted,
    InterruptionEnded,
}

impl fmt::Display for TrackingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(_) => f.write_str(TRACKING_FAILED),
            Self::Interrupted => f.write_str(TRACKING_INTERRUPTED),
            Self::InterruptionEnded => f.write_str(TRACKING_INTERRUPTION_ENDED),
        }
    }
}

/// Event fired whenever the provider's status changes.
#[derive(Event, Debug, Clone)]
pub struct TrackingStatusEvent {
    pub status: TrackingStatus,
}

/// The world tracker the measuring session depends on.
///
/// Implementations own their recovery; callers only run, pause, advance
/// once per frame and ask for raycasts.
pub trait TrackingProvider: Send + Sync + 'static {
    fn run(&mut self, options: RunOptions) -> Result<(), TrackingError>;

    fn pause(&mut self);

    /// Per-frame tick with the frame's delta time in seconds.
    fn advance(&mut self, dt: f32);

    fn state(&self) -> TrackingState;

    /// All intersections for the query, nearest first.
    fn raycast(&self, query: &RaycastQuery) -> Vec<RaycastResult>;
}

/// Resource holding the active tracking provider.
#[derive(Resource)]
pub struct TrackingSession(pub Box<dyn TrackingProvider>);

impl TrackingSession {
    pub fn new(provider: impl TrackingProvider) -> Self {
        Self(Box::new(provider))
    }
}

impl std::ops::Deref for TrackingSession {
    type Target = dyn TrackingProvider;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl std::ops::DerefMut for TrackingSession {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.0.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alignment_from_normal() {
        assert_eq!(PlaneAlignment::of_normal(Vec3::Y), PlaneAlignment::Horizontal);
        assert_eq!(PlaneAlignment::of_normal(-Vec3::Y * 3.0), PlaneAlignment::Horizontal);
        assert_eq!(PlaneAlignment::of_normal(Vec3::Z), PlaneAlignment::Vertical);
        assert!(PlaneAlignment::Any.accepts(PlaneAlignment::Vertical));
        assert!(!PlaneAlignment::Horizontal.accepts(PlaneAlignment::Vertical));
    }

    #[test]
    fn status_strings_are_short() {
        assert_eq!(TrackingStatus::Interrupted.to_string(), "Interrupted");
        assert_eq!(TrackingStatus::InterruptionEnded.to_string(), "Interruption ended");
        assert_eq!(
            TrackingStatus::Failed(TrackingError::InsufficientFeatures).to_string(),
            "Error occurred"
        );
    }
}
