use super::provider::{
    PlaneAlignment, RaycastQuery, RaycastResult, RaycastTarget, RunOptions, TrackingError,
    TrackingProvider, TrackingState,
};
use crate::engine::loading::settings::{PlaneSettings, TrackingSettings};
use bevy::prelude::*;
use constants::tracking::{MAX_RAYCAST_DISTANCE, MIN_RAY_PLANE_DENOMINATOR};

/// Rectangular surface known to the simulated tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatedPlane {
    pub center: Vec3,
    pub normal: Dir3,
    pub half_extents: Vec2,
    /// Seconds after warm-up before this plane is found.
    pub appears_after: f32,
}

impl EstimatedPlane {
    pub fn new(center: Vec3, normal: Dir3, half_extents: Vec2) -> Self {
        Self {
            center,
            normal,
            half_extents,
            appears_after: 0.0,
        }
    }

    pub fn alignment(&self) -> PlaneAlignment {
        PlaneAlignment::of_normal(*self.normal)
    }

    /// Distance along the ray to the plane's rectangle, if the ray crosses it.
    pub fn intersect(&self, origin: Vec3, direction: Dir3) -> Option<f32> {
        let denom = self.normal.dot(*direction);
        if denom.abs() < MIN_RAY_PLANE_DENOMINATOR {
            return None;
        }
        let t = self.normal.dot(self.center - origin) / denom;
        if t <= 0.0 || t > MAX_RAYCAST_DISTANCE {
            return None;
        }

        let offset = origin + *direction * t - self.center;
        let (u, v) = self.normal.any_orthonormal_pair();
        if offset.dot(u).abs() > self.half_extents.x || offset.dot(v).abs() > self.half_extents.y {
            return None;
        }
        Some(t)
    }
}

impl TryFrom<&PlaneSettings> for EstimatedPlane {
    type Error = TrackingError;

    fn try_from(settings: &PlaneSettings) -> Result<Self, Self::Error> {
        let normal = Dir3::new(Vec3::from_array(settings.normal)).map_err(|_| {
            TrackingError::Configuration(format!("invalid plane normal {:?}", settings.normal))
        })?;
        let half_extents = Vec2::from_array(settings.half_extents);
        if half_extents.min_element() <= 0.0 {
            return Err(TrackingError::Configuration(format!(
                "plane extents must be positive, got {:?}",
                settings.half_extents
            )));
        }
        Ok(Self {
            center: Vec3::from_array(settings.center),
            normal,
            half_extents,
            appears_after: settings.appears_after_secs.max(0.0),
        })
    }
}

/// Tracker that finds a fixed set of planes over time.
///
/// After `run` nothing is hit for `warmup` seconds; each plane then turns up
/// as estimated geometry once its own delay has passed, and is confirmed
/// `confirm` seconds later.
#[derive(Debug, Clone)]
pub struct SimulatedTracking {
    planes: Vec<EstimatedPlane>,
    warmup: f32,
    confirm: f32,
    elapsed: f32,
    state: TrackingState,
}

impl SimulatedTracking {
    pub fn new(planes: Vec<EstimatedPlane>, warmup: f32, confirm: f32) -> Self {
        Self {
            planes,
            warmup: warmup.max(0.0),
            confirm: confirm.max(0.0),
            elapsed: 0.0,
            state: TrackingState::Stopped,
        }
    }

    pub fn from_settings(settings: &TrackingSettings) -> Result<Self, TrackingError> {
        let planes = settings
            .planes
            .iter()
            .map(EstimatedPlane::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(planes, settings.warmup_secs, settings.confirm_secs))
    }

    pub fn planes(&self) -> &[EstimatedPlane] {
        &self.planes
    }

    fn plane_age(&self, plane: &EstimatedPlane) -> Option<f32> {
        let age = self.elapsed - self.warmup - plane.appears_after;
        (age >= 0.0).then_some(age)
    }

    fn plane_visible(&self, plane: &EstimatedPlane, target: RaycastTarget) -> bool {
        let Some(age) = self.plane_age(plane) else {
            return false;
        };
        match target {
            RaycastTarget::EstimatedPlane => true,
            RaycastTarget::ExistingPlaneGeometry => age >= self.confirm,
        }
    }
}

impl TrackingProvider for SimulatedTracking {
    fn run(&mut self, options: RunOptions) -> Result<(), TrackingError> {
        if self.planes.is_empty() {
            self.state = TrackingState::Stopped;
            return Err(TrackingError::InsufficientFeatures);
        }
        if options.reset_tracking || self.state == TrackingState::Stopped {
            self.elapsed = 0.0;
        }
        // Anchors belong to the measuring session; the tracker keeps none.
        self.state = if self.elapsed >= self.warmup {
            TrackingState::Normal
        } else {
            TrackingState::Initializing
        };
        Ok(())
    }

    fn pause(&mut self) {
        if self.state != TrackingState::Stopped {
            self.state = TrackingState::Paused;
        }
    }

    fn advance(&mut self, dt: f32) {
        if !matches!(self.state, TrackingState::Initializing | TrackingState::Normal) {
            return;
        }
        self.elapsed += dt.max(0.0);
        if self.elapsed >= self.warmup {
            self.state = TrackingState::Normal;
        }
    }

    fn state(&self) -> TrackingState {
        self.state
    }

    fn raycast(&self, query: &RaycastQuery) -> Vec<RaycastResult> {
        if !matches!(self.state, TrackingState::Initializing | TrackingState::Normal) {
            return Vec::new();
        }

        let mut results: Vec<RaycastResult> = self
            .planes
            .iter()
            .enumerate()
            .filter(|(_, plane)| query.alignment.accepts(plane.alignment()))
            .filter(|(_, plane)| self.plane_visible(plane, query.target))
            .filter_map(|(plane_index, plane)| {
                let distance = plane.intersect(query.origin, query.direction)?;
                Some(RaycastResult {
                    world_point: query.origin + *query.direction * distance,
                    distance,
                    plane_index,
                })
            })
            .collect();

        results.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        results
    }
}
