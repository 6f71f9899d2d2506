use bevy::prelude::*;
use constants::messages::{
    CANCEL_TITLE, DETECTING_WORLD, RESET_BUTTON_TITLE, UNIT_BUTTON_TITLE, UNIT_SHEET_MESSAGE,
    UNIT_SHEET_TITLE,
};
use constants::render_settings::{
    BUTTON_SIZE, CROSSHAIR_BORDER, CROSSHAIR_IDLE_COLOUR, CROSSHAIR_MEASURING_COLOUR,
    CROSSHAIR_SIZE, MESSAGE_FONT_SIZE, OVERLAY_BACKGROUND, OVERLAY_MARGIN,
};

use crate::tools::actions::UnitSheetState;
use crate::tools::measure::session::MeasurementSession;
use crate::tools::measure::unit::DistanceUnit;

#[derive(Component)]
pub struct Crosshair;

#[derive(Component)]
pub struct LoadingIndicator;

#[derive(Component)]
pub struct MessageText;

#[derive(Component)]
pub struct ResetButton;

#[derive(Component)]
pub struct UnitButton;

#[derive(Component)]
pub struct UnitSheet;

/// One row in the unit sheet; `None` is Cancel.
#[derive(Component, Debug, Clone, Copy)]
pub struct UnitOption(pub Option<DistanceUnit>);

fn overlay_text(text: &str, font_size: f32) -> impl Bundle {
    (
        Text::new(text),
        TextFont {
            font_size,
            ..default()
        },
        TextColor(Color::WHITE),
        TextLayout::new_with_justify(JustifyText::Center),
    )
}

fn sheet_row(parent: &mut ChildSpawnerCommands, title: &str, option: UnitOption) {
    parent
        .spawn((
            Button,
            Node {
                width: Val::Percent(100.0),
                padding: UiRect::all(Val::Px(10.0)),
                justify_content: JustifyContent::Center,
                ..default()
            },
            BackgroundColor(OVERLAY_BACKGROUND),
            option,
        ))
        .with_children(|row| {
            row.spawn(overlay_text(title, MESSAGE_FONT_SIZE + 2.0));
        });
}

/// Spawn the HUD: crosshair, loading text, message area, buttons and unit sheet.
pub fn spawn_overlay(commands: &mut Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            // Centre target
            parent.spawn((
                Node {
                    position_type: PositionType::Absolute,
                    left: Val::Percent(50.0),
                    top: Val::Percent(50.0),
                    width: Val::Px(CROSSHAIR_SIZE),
                    height: Val::Px(CROSSHAIR_SIZE),
                    margin: UiRect {
                        left: Val::Px(-CROSSHAIR_SIZE * 0.5),
                        top: Val::Px(-CROSSHAIR_SIZE * 0.5),
                        ..default()
                    },
                    border: UiRect::all(Val::Px(CROSSHAIR_BORDER)),
                    ..default()
                },
                BorderColor(CROSSHAIR_IDLE_COLOUR),
                BorderRadius::MAX,
                Crosshair,
            ));

            // Loading
            parent.spawn((
                overlay_text("Searching…", MESSAGE_FONT_SIZE),
                Node {
                    position_type: PositionType::Absolute,
                    left: Val::Percent(50.0),
                    top: Val::Percent(50.0),
                    margin: UiRect::top(Val::Px(CROSSHAIR_SIZE)),
                    ..default()
                },
                LoadingIndicator,
            ));

            // Message label
            parent.spawn((
                overlay_text(DETECTING_WORLD, MESSAGE_FONT_SIZE),
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(OVERLAY_MARGIN),
                    left: Val::Px(OVERLAY_MARGIN),
                    right: Val::Px(OVERLAY_MARGIN),
                    padding: UiRect::all(Val::Px(6.0)),
                    ..default()
                },
                BackgroundColor(OVERLAY_BACKGROUND),
                MessageText,
            ));

            // Reset button
            parent
                .spawn((
                    Button,
                    Node {
                        position_type: PositionType::Absolute,
                        bottom: Val::Px(OVERLAY_MARGIN),
                        right: Val::Px(OVERLAY_MARGIN),
                        min_width: Val::Px(BUTTON_SIZE),
                        height: Val::Px(BUTTON_SIZE),
                        padding: UiRect::horizontal(Val::Px(12.0)),
                        justify_content: JustifyContent::Center,
                        align_items: AlignItems::Center,
                        ..default()
                    },
                    BackgroundColor(OVERLAY_BACKGROUND),
                    BorderRadius::all(Val::Px(8.0)),
                    Visibility::Hidden,
                    ResetButton,
                ))
                .with_children(|button| {
                    button.spawn(overlay_text(RESET_BUTTON_TITLE, MESSAGE_FONT_SIZE));
                });

            // Unit button
            parent
                .spawn((
                    Button,
                    Node {
                        position_type: PositionType::Absolute,
                        bottom: Val::Px(OVERLAY_MARGIN),
                        left: Val::Px(OVERLAY_MARGIN),
                        height: Val::Px(BUTTON_SIZE),
                        padding: UiRect::horizontal(Val::Px(12.0)),
                        justify_content: JustifyContent::Center,
                        align_items: AlignItems::Center,
                        ..default()
                    },
                    BackgroundColor(OVERLAY_BACKGROUND),
                    BorderRadius::all(Val::Px(8.0)),
                    UnitButton,
                ))
                .with_children(|button| {
                    button.spawn(overlay_text(UNIT_BUTTON_TITLE, MESSAGE_FONT_SIZE));
                });

            // Unit sheet
            parent
                .spawn((
                    Node {
                        position_type: PositionType::Absolute,
                        bottom: Val::Px(OVERLAY_MARGIN * 2.0 + BUTTON_SIZE),
                        left: Val::Px(OVERLAY_MARGIN),
                        width: Val::Px(260.0),
                        flex_direction: FlexDirection::Column,
                        row_gap: Val::Px(2.0),
                        ..default()
                    },
                    Visibility::Hidden,
                    UnitSheet,
                ))
                .with_children(|sheet| {
                    sheet.spawn(overlay_text(UNIT_SHEET_TITLE, MESSAGE_FONT_SIZE + 2.0));
                    sheet.spawn(overlay_text(UNIT_SHEET_MESSAGE, MESSAGE_FONT_SIZE));
                    for unit in DistanceUnit::ALL {
                        sheet_row(sheet, unit.title(), UnitOption(Some(unit)));
                    }
                    sheet_row(sheet, CANCEL_TITLE, UnitOption(None));
                });
        });
}

fn visible_if(show: bool) -> Visibility {
    if show {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    }
}

/// Reflect session state in the HUD.
pub fn sync_overlay(
    session: Res<MeasurementSession>,
    sheet_state: Res<UnitSheetState>,
    mut messages: Query<&mut Text, With<MessageText>>,
    mut crosshairs: Query<&mut BorderColor, With<Crosshair>>,
    mut loading: Query<
        &mut Visibility,
        (With<LoadingIndicator>, Without<ResetButton>, Without<UnitSheet>),
    >,
    mut reset_buttons: Query<
        &mut Visibility,
        (With<ResetButton>, Without<LoadingIndicator>, Without<UnitSheet>),
    >,
    mut sheets: Query<
        &mut Visibility,
        (With<UnitSheet>, Without<LoadingIndicator>, Without<ResetButton>),
    >,
) {
    if session.is_changed() {
        for mut text in &mut messages {
            if text.0 != session.message() {
                text.0 = session.message().to_string();
            }
        }
        let colour = if session.is_measuring() {
            CROSSHAIR_MEASURING_COLOUR
        } else {
            CROSSHAIR_IDLE_COLOUR
        };
        for mut border in &mut crosshairs {
            border.0 = colour;
        }
        for mut visibility in &mut loading {
            *visibility = visible_if(session.is_searching());
        }
        for mut visibility in &mut reset_buttons {
            *visibility = visible_if(session.has_lines());
        }
    }

    if sheet_state.is_changed() {
        for mut visibility in &mut sheets {
            *visibility = visible_if(sheet_state.open);
        }
    }
}
