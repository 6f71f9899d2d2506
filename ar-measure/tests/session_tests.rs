//! Integration tests for the measuring session running inside a Bevy app.
//!
//! Drives touch events and the crosshair ray by hand and checks the lines,
//! scene entities and notifications that come out.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use ar_measure::engine::scene::surface::{LineLabel, SegmentGeometry};
use ar_measure::engine::tracking::provider::{RunOptions, TrackingProvider, TrackingSession};
use ar_measure::engine::tracking::raycast::CrosshairRay;
use ar_measure::engine::tracking::simulated::{EstimatedPlane, SimulatedTracking};
use ar_measure::tools::actions::{ActionSource, ResetMeasurementsEvent, UnitSelectionEvent};
use ar_measure::tools::measure::session::{MeasurementSession, SessionState};
use ar_measure::tools::measure::unit::DistanceUnit;
use ar_measure::tools::measure::{MeasureToolPlugin, MeasureTouchEvent, MeasurementEvent};
use approx::assert_relative_eq;
use bevy::ecs::event::Events;
use bevy::prelude::*;

/// Create a minimal Bevy app for testing (no rendering).
fn test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    // Asset plugin is required for mesh/material handling
    app.add_plugins(bevy::asset::AssetPlugin::default());
    app.init_resource::<Assets<Mesh>>();
    app.init_resource::<Assets<StandardMaterial>>();
    app.add_plugins(MeasureToolPlugin);

    let floor = EstimatedPlane::new(Vec3::ZERO, Dir3::Y, Vec2::splat(5.0));
    let mut tracking = SimulatedTracking::new(vec![floor], 0.0, 0.0);
    tracking
        .run(RunOptions {
            reset_tracking: true,
            remove_existing_anchors: true,
        })
        .unwrap();
    app.insert_resource(TrackingSession::new(tracking));
    app.insert_resource(MeasurementSession::new(DistanceUnit::Centimeter));
    app.update();
    app
}

/// Point the crosshair straight down at `target` on the floor.
fn aim_at(app: &mut App, target: Vec3) {
    app.world_mut().resource_mut::<CrosshairRay>().ray =
        Some(Ray3d::new(target + Vec3::Y, Dir3::NEG_Y));
}

fn touch(app: &mut App, event: MeasureTouchEvent) {
    app.world_mut().send_event(event);
}

fn session(app: &App) -> &MeasurementSession {
    app.world().resource::<MeasurementSession>()
}

fn count<C: Component>(app: &mut App) -> usize {
    app.world_mut()
        .query_filtered::<Entity, With<C>>()
        .iter(app.world())
        .count()
}

fn measurement_events(app: &App) -> Vec<MeasurementEvent> {
    let events = app.world().resource::<Events<MeasurementEvent>>();
    events.iter_current_update_events().cloned().collect()
}

/// Drag from `from` to `to` and release.
fn measure(app: &mut App, from: Vec3, to: Vec3) {
    aim_at(app, from);
    touch(app, MeasureTouchEvent::Down);
    app.update();
    aim_at(app, to);
    app.update();
    touch(app, MeasureTouchEvent::Up);
    app.update();
}

#[test]
fn drag_produces_one_labelled_line() {
    let mut app = test_app();

    measure(&mut app, Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0));

    let session = session(&app);
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(session.lines().len(), 1);
    let line = &session.lines()[0];
    assert_relative_eq!(line.distance(), 1.0, epsilon = 1e-5);
    assert_eq!(line.label(), "100.00 cm");

    assert_eq!(count::<SegmentGeometry>(&mut app), 1);
    assert_eq!(count::<LineLabel>(&mut app), 1);
}

#[test]
fn segment_follows_crosshair_while_dragging() {
    let mut app = test_app();

    aim_at(&mut app, Vec3::ZERO);
    touch(&mut app, MeasureTouchEvent::Down);
    app.update();
    assert!(matches!(
        measurement_events(&app).as_slice(),
        [MeasurementEvent::Started(_)]
    ));

    aim_at(&mut app, Vec3::new(0.0, 0.0, -2.0));
    app.update();

    let geometry = *app
        .world_mut()
        .query::<&SegmentGeometry>()
        .single(app.world())
        .unwrap();
    assert_relative_eq!(geometry.end.z, -2.0, epsilon = 1e-5);
    assert!(matches!(
        measurement_events(&app).as_slice(),
        [MeasurementEvent::Updated(snapshot)] if snapshot.label == "200.00 cm"
    ));
}

#[test]
fn release_publishes_completed_line() {
    let mut app = test_app();

    measure(&mut app, Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));

    let events = measurement_events(&app);
    let completed: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            MeasurementEvent::Completed(snapshot) => Some(snapshot),
            _ => None,
        })
        .collect();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].label, "100.00 cm");
}

#[test]
fn no_surface_means_no_line() {
    let mut app = test_app();

    // Aim at the sky.
    app.world_mut().resource_mut::<CrosshairRay>().ray =
        Some(Ray3d::new(Vec3::Y, Dir3::Y));
    touch(&mut app, MeasureTouchEvent::Down);
    app.update();
    touch(&mut app, MeasureTouchEvent::Up);
    app.update();

    assert!(!session(&app).has_lines());
    assert_eq!(count::<SegmentGeometry>(&mut app), 0);
}

#[test]
fn reset_removes_every_line_from_the_scene() {
    let mut app = test_app();
    measure(&mut app, Vec3::ZERO, Vec3::X);
    measure(&mut app, Vec3::Z, Vec3::new(1.0, 0.0, 1.0));
    assert_eq!(count::<SegmentGeometry>(&mut app), 2);

    app.world_mut().send_event(ResetMeasurementsEvent {
        source: ActionSource::Keyboard,
    });
    app.update();

    assert!(!session(&app).has_lines());
    assert_eq!(count::<SegmentGeometry>(&mut app), 0);
    assert_eq!(count::<LineLabel>(&mut app), 0);
    assert!(
        measurement_events(&app)
            .iter()
            .any(|event| matches!(event, MeasurementEvent::Cleared { count: 2 }))
    );
}

#[test]
fn unit_change_applies_to_next_line() {
    let mut app = test_app();
    measure(&mut app, Vec3::ZERO, Vec3::X);

    app.world_mut().send_event(UnitSelectionEvent {
        unit: DistanceUnit::Inch,
        source: ActionSource::Rpc,
    });
    app.update();
    measure(&mut app, Vec3::ZERO, Vec3::X);

    let session = session(&app);
    assert_eq!(session.unit(), DistanceUnit::Inch);
    assert_eq!(session.lines()[0].label(), "100.00 cm");
    assert_eq!(session.lines()[1].label(), "39.37 in");
}

#[test]
fn paused_tracker_reports_no_hits() {
    let mut app = test_app();
    app.world_mut().resource_mut::<TrackingSession>().pause();

    measure(&mut app, Vec3::ZERO, Vec3::X);

    assert!(!session(&app).has_lines());
}
