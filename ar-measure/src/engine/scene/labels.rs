use bevy::prelude::*;
use bevy::ui::ComputedNode;
use constants::render_settings::LABEL_VERTICAL_OFFSET;

use super::surface::LineLabel;

/// Pin each distance label over its segment midpoint on screen.
/// Labels whose anchor is behind the camera are hidden.
pub fn project_line_labels(
    cameras: Query<(&GlobalTransform, &Camera), With<Camera3d>>,
    mut labels: Query<(&LineLabel, &ComputedNode, &mut Node, &mut Visibility)>,
) {
    let Ok((camera_transform, camera)) = cameras.single() else {
        return;
    };

    for (label, computed, mut node, mut visibility) in &mut labels {
        let anchor = label.anchor + Vec3::Y * LABEL_VERTICAL_OFFSET;
        match camera.world_to_viewport(camera_transform, anchor) {
            Ok(position) => {
                let half_size = computed.size() * computed.inverse_scale_factor() * 0.5;
                node.left = Val::Px(position.x - half_size.x);
                node.top = Val::Px(position.y - half_size.y);
                *visibility = Visibility::Inherited;
            }
            Err(_) => {
                *visibility = Visibility::Hidden;
            }
        }
    }
}
