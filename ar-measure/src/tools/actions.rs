use bevy::prelude::*;

use crate::engine::scene::overlay::{ResetButton, UnitButton, UnitOption};
use crate::tools::measure::MeasureTouchEvent;
use crate::tools::measure::session::MeasurementSession;
use crate::tools::measure::unit::DistanceUnit;

/// Source of a user action, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionSource {
    Rpc,
    Keyboard,
    Ui,
}

/// Event fired when a distance unit is picked in the sheet, by shortcut or via RPC.
#[derive(Event, Debug, Clone, Copy)]
pub struct UnitSelectionEvent {
    pub unit: DistanceUnit,
    pub source: ActionSource,
}

/// Event fired when the user asks to clear all stored measurements.
#[derive(Event, Debug, Clone, Copy)]
pub struct ResetMeasurementsEvent {
    pub source: ActionSource,
}

/// Whether the unit selection sheet is showing.
#[derive(Resource, Debug, Default)]
pub struct UnitSheetState {
    pub open: bool,
}

/// Turn touches and the primary mouse button into measure events.
///
/// Presses that land on a button, or arrive while the unit sheet is open,
/// are left to the UI.
pub fn touch_input_system(
    touches: Option<Res<Touches>>,
    mouse: Option<Res<ButtonInput<MouseButton>>>,
    buttons: Query<&Interaction, With<Button>>,
    sheet: Res<UnitSheetState>,
    session: Res<MeasurementSession>,
    mut touch_events: EventWriter<MeasureTouchEvent>,
) {
    let pressed = touches.as_ref().is_some_and(|t| t.any_just_pressed())
        || mouse
            .as_ref()
            .is_some_and(|m| m.just_pressed(MouseButton::Left));
    let released = touches
        .as_ref()
        .is_some_and(|t| t.any_just_released() || t.any_just_canceled())
        || mouse
            .as_ref()
            .is_some_and(|m| m.just_released(MouseButton::Left));

    let over_ui = sheet.open
        || buttons
            .iter()
            .any(|interaction| *interaction != Interaction::None);

    let touch_began = pressed && !over_ui;
    if touch_began {
        touch_events.write(MeasureTouchEvent::Down);
    }
    // A tap can press and release within one frame, before the session has seen Down.
    if released && (touch_began || session.is_measuring()) {
        touch_events.write(MeasureTouchEvent::Up);
    }
}

/// Reset and unit buttons, and the options inside the unit sheet.
pub fn handle_overlay_buttons(
    reset_buttons: Query<&Interaction, (Changed<Interaction>, With<ResetButton>)>,
    unit_buttons: Query<&Interaction, (Changed<Interaction>, With<UnitButton>)>,
    unit_options: Query<(&Interaction, &UnitOption), Changed<Interaction>>,
    mut sheet: ResMut<UnitSheetState>,
    mut unit_events: EventWriter<UnitSelectionEvent>,
    mut reset_events: EventWriter<ResetMeasurementsEvent>,
) {
    if reset_buttons.iter().any(|i| *i == Interaction::Pressed) {
        reset_events.write(ResetMeasurementsEvent {
            source: ActionSource::Ui,
        });
    }

    if unit_buttons.iter().any(|i| *i == Interaction::Pressed) {
        sheet.open = !sheet.open;
    }

    for (interaction, option) in &unit_options {
        if *interaction != Interaction::Pressed {
            continue;
        }
        // Cancel carries no unit and only closes the sheet.
        if let Some(unit) = option.0 {
            unit_events.write(UnitSelectionEvent {
                unit,
                source: ActionSource::Ui,
            });
        }
        sheet.open = false;
    }
}

/// System handling keyboard shortcuts for units, reset and the sheet (native builds only).
#[cfg(not(target_arch = "wasm32"))]
pub fn handle_keyboard_shortcuts(
    keyboard: Option<Res<ButtonInput<KeyCode>>>,
    mut sheet: ResMut<UnitSheetState>,
    mut unit_events: EventWriter<UnitSelectionEvent>,
    mut reset_events: EventWriter<ResetMeasurementsEvent>,
) {
    let Some(keyboard) = keyboard else {
        return;
    };

    for (key, unit) in [
        (KeyCode::Digit1, DistanceUnit::Centimeter),
        (KeyCode::Digit2, DistanceUnit::Inch),
        (KeyCode::Digit3, DistanceUnit::Meter),
    ] {
        if keyboard.just_pressed(key) {
            unit_events.write(UnitSelectionEvent {
                unit,
                source: ActionSource::Keyboard,
            });
        }
    }

    if keyboard.just_pressed(KeyCode::KeyR) {
        reset_events.write(ResetMeasurementsEvent {
            source: ActionSource::Keyboard,
        });
    }
    if keyboard.just_pressed(KeyCode::KeyU) {
        sheet.open = !sheet.open;
    }
    if keyboard.just_pressed(KeyCode::Escape) {
        sheet.open = false;
    }
}

/// Placeholder system for WASM builds where keyboard shortcuts are disabled.
#[cfg(target_arch = "wasm32")]
pub fn handle_keyboard_shortcuts() {
    // No keyboard shortcuts in WASM builds - units and reset come through RPC or the overlay.
}
