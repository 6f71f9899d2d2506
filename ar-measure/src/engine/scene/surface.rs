use bevy::prelude::*;
use constants::render_settings::{
    DRAW_LINE_WIDTH, DRAW_VERTEX_SIZE, LABEL_BACKGROUND, LABEL_FONT_SIZE, LINE_COLOUR,
    LINE_EMISSIVE, VERTEX_COLOUR,
};

/// Non-owning handle to the scene nodes drawn for one line.
///
/// The scene owns the entities; whoever holds the handle is responsible for
/// detaching it exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttachmentHandle {
    pub segment: Entity,
    pub label: Entity,
}

/// Boundary between the measurement model and whatever draws it.
pub trait SceneSurface {
    /// Attach a segment between two world points with a text label at its midpoint.
    fn attach(&mut self, start: Vec3, end: Vec3, label: &str) -> AttachmentHandle;

    /// Move an attached segment and replace its label text.
    fn reposition(&mut self, handle: AttachmentHandle, start: Vec3, end: Vec3, label: &str);

    /// Remove the segment and label from the scene.
    fn detach(&mut self, handle: AttachmentHandle);
}

/// World-space endpoints of a drawn segment. Children are laid out from this.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct SegmentGeometry {
    pub start: Vec3,
    pub end: Vec3,
}

impl SegmentGeometry {
    pub fn midpoint(&self) -> Vec3 {
        (self.start + self.end) * 0.5
    }

    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// Transform for a unit cuboid stretched along X to span the segment.
    pub fn bar_transform(&self) -> Transform {
        let dir = self.end - self.start;
        let length = dir.length();
        let rotation = if length > f32::EPSILON {
            Quat::from_rotation_arc(Vec3::X, dir / length)
        } else {
            Quat::IDENTITY
        };
        Transform::from_translation(self.midpoint())
            .with_rotation(rotation)
            .with_scale(Vec3::new(length, 1.0, 1.0))
    }
}

#[derive(Component)]
pub struct SegmentBar;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentCap {
    Start,
    End,
}

/// Screen-space label that follows a world-space anchor point.
#[derive(Component, Debug, Clone, Copy)]
pub struct LineLabel {
    pub anchor: Vec3,
}

/// Shared meshes and materials for every drawn line.
#[derive(Resource, Clone)]
pub struct LineRenderAssets {
    pub bar_mesh: Handle<Mesh>,
    pub cap_mesh: Handle<Mesh>,
    pub line_material: Handle<StandardMaterial>,
    pub cap_material: Handle<StandardMaterial>,
}

impl FromWorld for LineRenderAssets {
    fn from_world(world: &mut World) -> Self {
        let mut meshes = world.resource_mut::<Assets<Mesh>>();
        let bar_mesh = meshes.add(Cuboid::new(1.0, DRAW_LINE_WIDTH, DRAW_LINE_WIDTH));
        let cap_mesh = meshes.add(Sphere::new(DRAW_VERTEX_SIZE));

        let mut materials = world.resource_mut::<Assets<StandardMaterial>>();
        let line_material = materials.add(StandardMaterial {
            base_color: LINE_COLOUR,
            emissive: LINE_EMISSIVE,
            unlit: true,
            ..default()
        });
        let cap_material = materials.add(StandardMaterial {
            base_color: VERTEX_COLOUR,
            unlit: true,
            ..default()
        });

        Self {
            bar_mesh,
            cap_mesh,
            line_material,
            cap_material,
        }
    }
}

/// `SceneSurface` backed by Bevy commands. Changes apply when the command queue flushes.
pub struct CommandsSurface<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    assets: &'a LineRenderAssets,
}

impl<'a, 'w, 's> CommandsSurface<'a, 'w, 's> {
    pub fn new(commands: &'a mut Commands<'w, 's>, assets: &'a LineRenderAssets) -> Self {
        Self { commands, assets }
    }
}

impl SceneSurface for CommandsSurface<'_, '_, '_> {
    fn attach(&mut self, start: Vec3, end: Vec3, label: &str) -> AttachmentHandle {
        let geometry = SegmentGeometry { start, end };
        let assets = self.assets.clone();

        let segment = self
            .commands
            .spawn((geometry, Transform::IDENTITY, Visibility::default()))
            .with_children(|parent| {
                parent.spawn((
                    Mesh3d(assets.bar_mesh.clone()),
                    MeshMaterial3d(assets.line_material.clone()),
                    geometry.bar_transform(),
                    SegmentBar,
                ));
                for (cap, position) in [(SegmentCap::Start, start), (SegmentCap::End, end)] {
                    parent.spawn((
                        Mesh3d(assets.cap_mesh.clone()),
                        MeshMaterial3d(assets.cap_material.clone()),
                        Transform::from_translation(position),
                        cap,
                    ));
                }
            })
            .id();

        let label = self
            .commands
            .spawn((
                Text::new(label),
                TextFont {
                    font_size: LABEL_FONT_SIZE,
                    ..default()
                },
                TextColor(Color::WHITE),
                BackgroundColor(LABEL_BACKGROUND),
                Node {
                    position_type: PositionType::Absolute,
                    padding: UiRect::axes(Val::Px(6.0), Val::Px(2.0)),
                    ..default()
                },
                Visibility::Hidden,
                LineLabel {
                    anchor: geometry.midpoint(),
                },
            ))
            .id();

        AttachmentHandle { segment, label }
    }

    fn reposition(&mut self, handle: AttachmentHandle, start: Vec3, end: Vec3, label: &str) {
        let geometry = SegmentGeometry { start, end };
        if let Ok(mut entity) = self.commands.get_entity(handle.segment) {
            entity.insert(geometry);
        }
        if let Ok(mut entity) = self.commands.get_entity(handle.label) {
            entity.insert((
                Text::new(label),
                LineLabel {
                    anchor: geometry.midpoint(),
                },
            ));
        }
    }

    fn detach(&mut self, handle: AttachmentHandle) {
        for entity in [handle.segment, handle.label] {
            if let Ok(mut entity) = self.commands.get_entity(entity) {
                entity.try_despawn();
            }
        }
    }
}

/// Lay out bar and end caps from the parent's geometry after it changes.
pub fn sync_segment_geometry(
    segments: Query<(&SegmentGeometry, &Children), Changed<SegmentGeometry>>,
    mut bars: Query<&mut Transform, (With<SegmentBar>, Without<SegmentCap>)>,
    mut caps: Query<(&mut Transform, &SegmentCap), Without<SegmentBar>>,
) {
    for (geometry, children) in &segments {
        for &child in &**children {
            if let Ok(mut transform) = bars.get_mut(child) {
                *transform = geometry.bar_transform();
            } else if let Ok((mut transform, cap)) = caps.get_mut(child) {
                transform.translation = match cap {
                    SegmentCap::Start => geometry.start,
                    SegmentCap::End => geometry.end,
                };
            }
        }
    }
}
