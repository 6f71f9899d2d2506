use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::engine::loading::settings::MeasureSettings;
use crate::engine::tracking::provider::{TrackingSession, TrackingStatus, TrackingStatusEvent};
use crate::engine::tracking::simulated::SimulatedTracking;
use crate::tools::measure::session::MeasurementSession;

pub const SETTINGS_PATH: &str = "measure_settings.json";

#[derive(Resource, Default)]
pub struct SettingsLoader {
    handle: Option<Handle<MeasureSettings>>,
    pub applied: bool,
}

// Start the loading process
pub fn start_loading(mut settings_loader: ResMut<SettingsLoader>, asset_server: Res<AssetServer>) {
    info!("Loading settings from: {}", SETTINGS_PATH);
    settings_loader.handle = Some(asset_server.load(SETTINGS_PATH));
}

/// Apply loaded settings, or defaults when the file can't be read.
pub fn load_settings_system(
    mut settings_loader: ResMut<SettingsLoader>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    settings_assets: Res<Assets<MeasureSettings>>,
    mut status_events: EventWriter<TrackingStatusEvent>,
) {
    if settings_loader.applied {
        return;
    }
    let Some(handle) = settings_loader.handle.clone() else {
        return;
    };

    let settings = if let Some(settings) = settings_assets.get(&handle) {
        info!("✓ Settings loaded");
        settings.clone()
    } else if let Some(LoadState::Failed(err)) = asset_server.get_load_state(&handle) {
        warn!("Failed to load {}: {}; using defaults", SETTINGS_PATH, err);
        MeasureSettings::default()
    } else {
        return;
    };

    if let Some(status) = apply_settings(&mut commands, &settings) {
        status_events.write(TrackingStatusEvent { status });
    }
    commands.insert_resource(settings);
    settings_loader.applied = true;
}

/// Insert the session and tracker described by `settings`.
/// Returns a failure status when the tracker can't be built.
pub fn apply_settings(commands: &mut Commands, settings: &MeasureSettings) -> Option<TrackingStatus> {
    commands.insert_resource(MeasurementSession::new(settings.default_unit));

    match SimulatedTracking::from_settings(&settings.tracking) {
        Ok(tracking) => {
            info!(
                "Simulated tracking with {} plane(s), warm-up {:.1}s",
                tracking.planes().len(),
                settings.tracking.warmup_secs
            );
            commands.insert_resource(TrackingSession::new(tracking));
            None
        }
        Err(err) => {
            error!("Tracking configuration rejected: {}", err);
            commands.insert_resource(TrackingSession::new(SimulatedTracking::new(
                Vec::new(),
                0.0,
                0.0,
            )));
            Some(TrackingStatus::Failed(err))
        }
    }
}
