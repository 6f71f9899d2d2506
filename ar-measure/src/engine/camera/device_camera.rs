use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll, MouseScrollUnit};
use bevy::math::EulerRot;
use bevy::prelude::*;

/// Pose of the simulated handheld device the camera is attached to.
///
/// On desktop and web the user "moves the phone" with WASD/QE and looks
/// around with the right mouse button.
#[derive(Resource, Debug, Clone)]
pub struct DeviceCamera {
    pub position: Vec3,
    pub pitch: f32,
    pub yaw: f32,
    pub move_speed: f32,
    pub look_sensitivity: Vec2,
}

impl DeviceCamera {
    /// Hand height, looking slightly down at the floor in front.
    pub fn handheld() -> Self {
        Self {
            position: Vec3::new(0.0, 1.4, 1.5),
            pitch: -0.6,
            yaw: 0.0,
            move_speed: 1.2,
            look_sensitivity: Vec2::new(0.0035, 0.0030),
        }
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position).with_rotation(self.rotation())
    }

    /// Apply a look delta in pixels. Pitch stops short of straight up/down.
    pub fn look(&mut self, delta: Vec2) {
        self.yaw -= delta.x * self.look_sensitivity.x;
        self.pitch = (self.pitch - delta.y * self.look_sensitivity.y).clamp(-1.55, 1.55);
    }

    /// Move relative to the view: x right, y world up, z backwards.
    pub fn translate_local(&mut self, input: Vec3, distance: f32) {
        if input == Vec3::ZERO {
            return;
        }
        let rotation = self.rotation();
        let right = rotation * Vec3::X;
        let forward = rotation * Vec3::Z;
        let world_delta = right * input.x + Vec3::Y * input.y + forward * input.z;
        self.position += world_delta.normalize() * distance;
    }
}

impl Default for DeviceCamera {
    fn default() -> Self {
        Self::handheld()
    }
}

pub fn camera_controller(
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
    mut device: ResMut<DeviceCamera>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    mouse_scroll: Res<AccumulatedMouseScroll>,
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
) {
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    // Mouse motion with right click (look around)
    if mouse_button.pressed(MouseButton::Right) && mouse_motion.delta != Vec2::ZERO {
        device.look(mouse_motion.delta);
    }

    // Mouse wheel dollies along the view direction
    let scroll = match mouse_scroll.unit {
        MouseScrollUnit::Line => mouse_scroll.delta.y * 0.25,
        MouseScrollUnit::Pixel => mouse_scroll.delta.y * 0.01,
    };
    if scroll.abs() > f32::EPSILON {
        device.translate_local(Vec3::NEG_Z, scroll);
    }

    // Keyboard movement input
    let mut move_input = Vec3::ZERO;
    if keyboard.pressed(KeyCode::KeyW) { move_input.z -= 1.0; }
    if keyboard.pressed(KeyCode::KeyS) { move_input.z += 1.0; }
    if keyboard.pressed(KeyCode::KeyD) { move_input.x += 1.0; }
    if keyboard.pressed(KeyCode::KeyA) { move_input.x -= 1.0; }
    if keyboard.pressed(KeyCode::KeyE) { move_input.y += 1.0; } // Up
    if keyboard.pressed(KeyCode::KeyQ) { move_input.y -= 1.0; } // Down

    // Shift = faster, ctrl = slower
    let mut speed = device.move_speed;
    if keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]) { speed *= 3.0; }
    if keyboard.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]) { speed *= 0.25; }
    device.translate_local(move_input, speed * time.delta_secs());

    let target = device.transform();
    let lerp_speed = (12.0 * time.delta_secs()).min(1.0);
    camera_transform.translation = camera_transform.translation.lerp(target.translation, lerp_speed);
    camera_transform.rotation = camera_transform.rotation.slerp(target.rotation, lerp_speed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn pitch_is_clamped() {
        let mut device = DeviceCamera::handheld();
        device.look(Vec2::new(0.0, -10_000.0));
        assert_relative_eq!(device.pitch, 1.55);
        device.look(Vec2::new(0.0, 10_000.0));
        assert_relative_eq!(device.pitch, -1.55);
    }

    #[test]
    fn forward_follows_yaw() {
        let mut device = DeviceCamera {
            pitch: 0.0,
            ..DeviceCamera::handheld()
        };
        let start = device.position;
        device.translate_local(Vec3::NEG_Z, 1.0);
        assert_relative_eq!(device.position.z, start.z - 1.0, epsilon = 1e-5);

        device.yaw = std::f32::consts::FRAC_PI_2;
        let start = device.position;
        device.translate_local(Vec3::NEG_Z, 1.0);
        assert_relative_eq!(device.position.x, start.x - 1.0, epsilon = 1e-5);
        assert_relative_eq!(device.position.z, start.z, epsilon = 1e-5);
    }
}
