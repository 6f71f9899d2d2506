use super::provider::{RaycastQuery, TrackingProvider};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

/// Ray through the screen-centre crosshair, refreshed every frame from the camera.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct CrosshairRay {
    pub ray: Option<Ray3d>,
}

/// First (nearest) surface hit along `ray`, accepting estimated planes of any
/// alignment. `None` just means no surface under the ray yet.
pub fn raycast_world_point(ray: Ray3d, provider: &dyn TrackingProvider) -> Option<Vec3> {
    provider
        .raycast(&RaycastQuery::permissive(ray))
        .first()
        .map(|result| result.world_point)
}

/// Resolve a viewport point to a world point through the camera and tracker.
pub fn world_point_at(
    screen_point: Vec2,
    camera: &Camera,
    camera_transform: &GlobalTransform,
    provider: &dyn TrackingProvider,
) -> Option<Vec3> {
    let ray = screen_ray(screen_point, camera, camera_transform)?;
    raycast_world_point(ray, provider)
}

/// Ray from the camera through a viewport point.
pub fn screen_ray(
    screen_point: Vec2,
    camera: &Camera,
    camera_transform: &GlobalTransform,
) -> Option<Ray3d> {
    camera.viewport_to_world(camera_transform, screen_point).ok()
}

/// Keep `CrosshairRay` pointing through the middle of the primary window.
pub fn update_crosshair_ray(
    mut crosshair: ResMut<CrosshairRay>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&GlobalTransform, &Camera), With<Camera3d>>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let Ok((camera_transform, camera)) = cameras.single() else {
        return;
    };

    let centre = window.size() * 0.5;
    crosshair.ray = screen_ray(centre, camera, camera_transform);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tracking::provider::{RunOptions, TrackingProvider};
    use crate::engine::tracking::simulated::{EstimatedPlane, SimulatedTracking};

    #[test]
    fn takes_nearest_result() {
        let floor = EstimatedPlane::new(Vec3::ZERO, Dir3::Y, Vec2::splat(5.0));
        let shelf = EstimatedPlane::new(Vec3::new(0.0, 0.5, 0.0), Dir3::Y, Vec2::splat(1.0));
        let mut tracking = SimulatedTracking::new(vec![floor, shelf], 0.0, 0.0);
        tracking.run(RunOptions::default()).unwrap();

        let ray = Ray3d::new(Vec3::new(0.2, 1.5, 0.1), Dir3::NEG_Y);
        assert_eq!(
            raycast_world_point(ray, &tracking),
            Some(Vec3::new(0.2, 0.5, 0.1))
        );
    }

    #[test]
    fn no_hit_before_tracking_runs() {
        let floor = EstimatedPlane::new(Vec3::ZERO, Dir3::Y, Vec2::splat(5.0));
        let tracking = SimulatedTracking::new(vec![floor], 0.0, 0.0);
        let ray = Ray3d::new(Vec3::Y, Dir3::NEG_Y);
        assert_eq!(raycast_world_point(ray, &tracking), None);
    }
}
