use super::provider::{RunOptions, TrackingSession, TrackingStatus, TrackingStatusEvent};
use bevy::prelude::*;
use bevy::window::WindowFocused;

/// Start tracking from scratch once the tracker exists.
pub fn start_tracking(
    mut tracking: ResMut<TrackingSession>,
    mut status_events: EventWriter<TrackingStatusEvent>,
) {
    let options = RunOptions {
        reset_tracking: true,
        remove_existing_anchors: true,
    };
    match tracking.run(options) {
        Ok(()) => info!("Tracking started ({:?})", tracking.state()),
        Err(err) => {
            error!("Tracking failed to start: {}", err);
            status_events.write(TrackingStatusEvent {
                status: TrackingStatus::Failed(err),
            });
        }
    }
}

/// Per-frame tracker tick.
pub fn advance_tracking(mut tracking: ResMut<TrackingSession>, time: Res<Time>) {
    tracking.advance(time.delta_secs());
}

/// Pause tracking while the window is in the background and resume on return.
pub fn handle_window_focus(
    mut focus_events: EventReader<WindowFocused>,
    mut tracking: ResMut<TrackingSession>,
    mut status_events: EventWriter<TrackingStatusEvent>,
    mut interrupted: Local<bool>,
) {
    for event in focus_events.read() {
        // Focus also arrives at startup; only a prior loss counts as an interruption.
        if event.focused != *interrupted {
            continue;
        }
        *interrupted = !event.focused;

        let status = if event.focused {
            if let Err(err) = tracking.run(RunOptions::default()) {
                error!("Tracking failed to resume: {}", err);
                status_events.write(TrackingStatusEvent {
                    status: TrackingStatus::Failed(err),
                });
                continue;
            }
            TrackingStatus::InterruptionEnded
        } else {
            tracking.pause();
            TrackingStatus::Interrupted
        };

        info!("Tracking status: {}", status);
        status_events.write(TrackingStatusEvent { status });
    }
}
