//! Distance measurement between two surface points.
//!
//! Touch-down starts a measurement, the crosshair hit extends it every frame
//! and touch-up stores it. Stored lines stay in the scene until reset.

/// Line entity: endpoints, length, label and its scene attachment.
pub mod line;

/// Session state machine that owns the in-progress and finished lines.
pub mod session;

/// Display units and label formatting.
pub mod unit;

use self::line::LineSnapshot;
use self::session::{MeasurementSession, TickOutcome};
use self::unit::DistanceUnit;
use crate::engine::scene::surface::{CommandsSurface, LineRenderAssets, sync_segment_geometry};
use crate::engine::tracking::provider::{TrackingSession, TrackingStatusEvent};
use crate::engine::tracking::raycast::{CrosshairRay, raycast_world_point};
use crate::tools::actions::{ResetMeasurementsEvent, UnitSelectionEvent};
use bevy::prelude::*;

/// Ordered stages of a measuring frame.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasureSystems {
    /// Raw pointer and keyboard input turned into measure events.
    Input,
    /// Tracker tick and crosshair ray.
    Tracking,
    /// Session mutation.
    Session,
    /// Scene node layout.
    Render,
}

/// Touch (or primary mouse button) transitions that drive the session.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureTouchEvent {
    Down,
    Up,
}

/// Outgoing notifications about session changes.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum MeasurementEvent {
    Started(LineSnapshot),
    Updated(LineSnapshot),
    Completed(LineSnapshot),
    Cleared { count: usize },
    UnitChanged { unit: DistanceUnit },
}

pub struct MeasureToolPlugin;

impl Plugin for MeasureToolPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MeasurementSession>()
            .init_resource::<LineRenderAssets>()
            .init_resource::<CrosshairRay>()
            .add_event::<MeasureTouchEvent>()
            .add_event::<MeasurementEvent>()
            .add_event::<UnitSelectionEvent>()
            .add_event::<ResetMeasurementsEvent>()
            .add_event::<TrackingStatusEvent>()
            .configure_sets(
                Update,
                (
                    MeasureSystems::Input,
                    MeasureSystems::Tracking,
                    MeasureSystems::Session,
                    MeasureSystems::Render,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    apply_tracking_status,
                    handle_unit_selection,
                    handle_touch_events,
                    measure_tick_system,
                    handle_reset_requests,
                )
                    .chain()
                    .in_set(MeasureSystems::Session),
            )
            .add_systems(Update, sync_segment_geometry.in_set(MeasureSystems::Render));
    }
}

fn apply_tracking_status(
    mut events: EventReader<TrackingStatusEvent>,
    mut session: ResMut<MeasurementSession>,
) {
    for event in events.read() {
        session.report_status(&event.status);
    }
}

fn handle_unit_selection(
    mut events: EventReader<UnitSelectionEvent>,
    mut session: ResMut<MeasurementSession>,
    mut notifications: EventWriter<MeasurementEvent>,
) {
    for event in events.read() {
        if session.set_unit(event.unit) {
            info!("Unit {} selected via {:?}", event.unit.as_str(), event.source);
            notifications.write(MeasurementEvent::UnitChanged { unit: event.unit });
        }
    }
}

fn handle_touch_events(
    mut events: EventReader<MeasureTouchEvent>,
    mut session: ResMut<MeasurementSession>,
    mut notifications: EventWriter<MeasurementEvent>,
) {
    for event in events.read() {
        match event {
            MeasureTouchEvent::Down => session.touch_down(),
            MeasureTouchEvent::Up => {
                if let Some(snapshot) = session.touch_up() {
                    notifications.write(MeasurementEvent::Completed(snapshot));
                }
            }
        }
    }
}

/// Raycast through the crosshair and feed the hit to the session.
pub fn measure_tick_system(
    mut commands: Commands,
    render_assets: Res<LineRenderAssets>,
    crosshair: Res<CrosshairRay>,
    tracking: Option<Res<TrackingSession>>,
    mut session: ResMut<MeasurementSession>,
    mut notifications: EventWriter<MeasurementEvent>,
) {
    let hit = match (crosshair.ray, tracking.as_deref()) {
        (Some(ray), Some(tracking)) => raycast_world_point(ray, &**tracking),
        _ => None,
    };

    let mut surface = CommandsSurface::new(&mut commands, &render_assets);
    match session.tick(hit, &mut surface) {
        TickOutcome::Started(snapshot) => {
            notifications.write(MeasurementEvent::Started(snapshot));
        }
        TickOutcome::Updated(snapshot) => {
            notifications.write(MeasurementEvent::Updated(snapshot));
        }
        TickOutcome::NoHit | TickOutcome::Tracking => {}
    }
}

fn handle_reset_requests(
    mut events: EventReader<ResetMeasurementsEvent>,
    mut commands: Commands,
    render_assets: Res<LineRenderAssets>,
    mut session: ResMut<MeasurementSession>,
    mut notifications: EventWriter<MeasurementEvent>,
) {
    for event in events.read() {
        let mut surface = CommandsSurface::new(&mut commands, &render_assets);
        let count = session.reset(&mut surface);
        if count > 0 {
            info!("Reset via {:?}", event.source);
            notifications.write(MeasurementEvent::Cleared { count });
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::engine::scene::surface::{AttachmentHandle, SceneSurface};
    use bevy::prelude::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum SurfaceCall {
        Attach { start: Vec3, end: Vec3, label: String },
        Reposition { start: Vec3, end: Vec3, label: String },
        Detach(AttachmentHandle),
    }

    /// Surface that records every call instead of drawing.
    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub calls: Vec<SurfaceCall>,
        next: u32,
    }

    impl RecordingSurface {
        pub fn attached(&self) -> usize {
            self.calls
                .iter()
                .filter(|call| matches!(call, SurfaceCall::Attach { .. }))
                .count()
        }

        pub fn detached(&self) -> usize {
            self.detached_handles().len()
        }

        pub fn detached_handles(&self) -> Vec<AttachmentHandle> {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    SurfaceCall::Detach(handle) => Some(*handle),
                    _ => None,
                })
                .collect()
        }
    }

    impl SceneSurface for RecordingSurface {
        fn attach(&mut self, start: Vec3, end: Vec3, label: &str) -> AttachmentHandle {
            let handle = AttachmentHandle {
                segment: Entity::from_raw(self.next),
                label: Entity::from_raw(self.next + 1),
            };
            self.next += 2;
            self.calls.push(SurfaceCall::Attach {
                start,
                end,
                label: label.to_string(),
            });
            handle
        }

        fn reposition(&mut self, _handle: AttachmentHandle, start: Vec3, end: Vec3, label: &str) {
            self.calls.push(SurfaceCall::Reposition {
                start,
                end,
                label: label.to_string(),
            });
        }

        fn detach(&mut self, handle: AttachmentHandle) {
            self.calls.push(SurfaceCall::Detach(handle));
        }
    }
}
