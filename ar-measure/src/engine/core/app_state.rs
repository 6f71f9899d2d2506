use bevy::prelude::*;

use crate::engine::loading::settings_loader::SettingsLoader;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    Running,
}

// Leave Loading once settings have been applied (loaded or defaulted)
pub fn transition_to_running(
    settings_loader: Res<SettingsLoader>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if settings_loader.applied {
        info!("→ Settings applied, transitioning to Running state");
        next_state.set(AppState::Running);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;

    #[test]
    fn waits_for_settings() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .init_state::<AppState>()
            .init_resource::<SettingsLoader>()
            .add_systems(
                Update,
                transition_to_running.run_if(in_state(AppState::Loading)),
            );

        app.update();
        app.update();
        assert_eq!(
            *app.world().resource::<State<AppState>>().get(),
            AppState::Loading
        );

        app.world_mut().resource_mut::<SettingsLoader>().applied = true;
        app.update();
        app.update();
        assert_eq!(
            *app.world().resource::<State<AppState>>().get(),
            AppState::Running
        );
    }
}
