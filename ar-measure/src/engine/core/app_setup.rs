use bevy::asset::AssetMetaCheck;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;
// Crate engine modules
use crate::engine::camera::device_camera::{DeviceCamera, camera_controller};
use crate::engine::core::app_state::{AppState, transition_to_running};
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::settings::MeasureSettings;
use crate::engine::loading::settings_loader::{SettingsLoader, load_settings_system, start_loading};
use crate::engine::scene::labels::project_line_labels;
use crate::engine::scene::overlay::{spawn_overlay, sync_overlay};
use crate::engine::tracking::lifecycle::{advance_tracking, handle_window_focus, start_tracking};
use crate::engine::tracking::raycast::update_crosshair_ray;
// Crate tools modules
use crate::tools::actions::{
    UnitSheetState, handle_keyboard_shortcuts, handle_overlay_buttons, touch_input_system,
};
use crate::tools::measure::{MeasureSystems, MeasureToolPlugin};
// Web RPC
use crate::rpc::web_rpc::WebRpcPlugin;

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        // Registers MeasureSettings as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<MeasureSettings>::new(&["json"]))
        .add_plugins(MeasureToolPlugin)
        .add_plugins(WebRpcPlugin);

    // Initialise resources early
    app.init_resource::<SettingsLoader>()
        .init_resource::<UnitSheetState>()
        .init_resource::<DeviceCamera>();

    // Measuring only runs once the session and tracker exist
    for set in [
        MeasureSystems::Input,
        MeasureSystems::Tracking,
        MeasureSystems::Session,
        MeasureSystems::Render,
    ] {
        app.configure_sets(Update, set.run_if(in_state(AppState::Running)));
    }

    // State-based system scheduling
    app.add_systems(Startup, (setup, start_loading).chain())
        .add_systems(
            Update,
            (load_settings_system, transition_to_running)
                .chain()
                .run_if(in_state(AppState::Loading)),
        )
        .add_systems(
            OnEnter(AppState::Running),
            (start_tracking, spawn_reference_planes),
        );

    app.add_systems(
        Update,
        (
            touch_input_system,
            handle_overlay_buttons,
            handle_keyboard_shortcuts, // Native shortcuts or no-op for WASM
        )
            .in_set(MeasureSystems::Input),
    )
    .add_systems(
        Update,
        (
            camera_controller,
            handle_window_focus,
            advance_tracking,
            update_crosshair_ray,
        )
            .chain()
            .in_set(MeasureSystems::Tracking),
    )
    .add_systems(
        Update,
        (sync_overlay, project_line_labels).in_set(MeasureSystems::Render),
    );

    app
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}

fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            shadows_enabled: false,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));
}

fn spawn_device_camera(commands: &mut Commands, device: &DeviceCamera) {
    commands.spawn((Camera3d::default(), device.transform()));
}

// Startup system that only handles basic initialisation
fn setup(mut commands: Commands, device: Res<DeviceCamera>) {
    info!("=== AR MEASURE ===");
    spawn_lighting(&mut commands);
    spawn_device_camera(&mut commands, &device);
    spawn_overlay(&mut commands);
}

/// Draw the configured room surfaces so there is something to measure against.
fn spawn_reference_planes(
    mut commands: Commands,
    settings: Option<Res<MeasureSettings>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Some(settings) = settings else {
        return;
    };

    let material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.55, 0.55, 0.5),
        perceptual_roughness: 0.9,
        ..default()
    });

    for plane in &settings.tracking.planes {
        let normal = Vec3::from_array(plane.normal);
        if normal.length_squared() <= f32::EPSILON {
            continue;
        }
        commands.spawn((
            Mesh3d(meshes.add(Plane3d::new(
                normal,
                Vec2::from_array(plane.half_extents),
            ))),
            MeshMaterial3d(material.clone()),
            Transform::from_translation(Vec3::from_array(plane.center)),
        ));
    }
}
