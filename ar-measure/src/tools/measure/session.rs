use super::line::{Line, LineSnapshot};
use super::unit::DistanceUnit;
use crate::engine::scene::surface::SceneSurface;
use crate::engine::tracking::provider::TrackingStatus;
use bevy::prelude::*;
use constants::messages::{DETECTING_WORLD, HOLD_AND_MOVE};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    Measuring,
}

/// What a render tick did to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// No surface under the crosshair this tick.
    NoHit,
    /// A surface was hit but no measurement is in progress.
    Tracking,
    /// First hit after touch-down created a new line.
    Started(LineSnapshot),
    /// The in-progress line followed the crosshair.
    Updated(LineSnapshot),
}

/// Measuring session: the in-progress line, finished lines and display state.
///
/// Touch-down enters `Measuring`; the first crosshair hit after that creates
/// a line and every hit extends it; touch-up stores it. At most one line is
/// in progress at a time.
#[derive(Resource, Debug)]
pub struct MeasurementSession {
    state: SessionState,
    start: Option<Vec3>,
    current: Option<Line>,
    lines: Vec<Line>,
    unit: DistanceUnit,
    next_id: u32,
    message: String,
    searching: bool,
}

impl Default for MeasurementSession {
    fn default() -> Self {
        Self::new(DistanceUnit::default())
    }
}

impl MeasurementSession {
    pub fn new(unit: DistanceUnit) -> Self {
        Self {
            state: SessionState::Idle,
            start: None,
            current: None,
            lines: Vec::new(),
            unit,
            next_id: 0,
            message: DETECTING_WORLD.to_string(),
            searching: true,
        }
    }

    pub fn touch_down(&mut self) {
        // A second touch-down without a touch-up keeps what was measured so far.
        if let Some(line) = self.current.take() {
            warn!("Touch began with line {} still in progress, finalising it", line.id());
            self.lines.push(line);
        }
        self.start = None;
        self.state = SessionState::Measuring;
    }

    pub fn tick(&mut self, hit: Option<Vec3>, surface: &mut impl SceneSurface) -> TickOutcome {
        let Some(hit) = hit else {
            return TickOutcome::NoHit;
        };

        if self.lines.is_empty() && self.current.is_none() {
            self.message = HOLD_AND_MOVE.to_string();
        }
        self.searching = false;

        if self.state != SessionState::Measuring {
            return TickOutcome::Tracking;
        }

        if self.start.is_some() {
            if let Some(line) = self.current.as_mut() {
                line.update(hit, surface);
                debug!("Line {} now {}", line.id(), line.label());
                return TickOutcome::Updated(line.snapshot());
            }
        }

        self.start = Some(hit);
        let mut line = Line::create(self.next_id, hit, self.unit, surface);
        self.next_id += 1;
        line.update(hit, surface);
        info!("Measurement {} started at {:?}", line.id(), hit);
        let snapshot = line.snapshot();
        self.current = Some(line);
        TickOutcome::Started(snapshot)
    }

    /// Leave `Measuring`, storing the in-progress line if one was created.
    pub fn touch_up(&mut self) -> Option<LineSnapshot> {
        self.state = SessionState::Idle;
        let line = self.current.take()?;
        let snapshot = line.snapshot();
        info!("Measurement {} finalised: {}", line.id(), snapshot.label);
        self.lines.push(line);
        Some(snapshot)
    }

    /// Detach every stored line and empty the collection.
    pub fn reset(&mut self, surface: &mut impl SceneSurface) -> usize {
        let count = self.lines.len();
        for mut line in self.lines.drain(..) {
            line.remove(surface);
        }
        if count > 0 {
            info!("Cleared {} measurement(s)", count);
        }
        count
    }

    /// Change the unit for lines created from now on. Returns whether it changed.
    pub fn set_unit(&mut self, unit: DistanceUnit) -> bool {
        if self.unit == unit {
            return false;
        }
        info!("Distance unit changed: {} -> {}", self.unit, unit);
        self.unit = unit;
        true
    }

    /// Reflect the tracking provider's latest status in the message area.
    pub fn report_status(&mut self, status: &TrackingStatus) {
        self.message = status.to_string();
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_measuring(&self) -> bool {
        self.state == SessionState::Measuring
    }

    pub fn unit(&self) -> DistanceUnit {
        self.unit
    }

    pub fn current(&self) -> Option<&Line> {
        self.current.as_ref()
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn has_lines(&self) -> bool {
        !self.lines.is_empty()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    pub fn snapshots(&self) -> Vec<LineSnapshot> {
        self.lines.iter().map(Line::snapshot).collect()
    }
}
