use super::unit::{DistanceUnit, format_distance};
use crate::engine::scene::surface::{AttachmentHandle, SceneSurface};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// A measured segment and the scene nodes that draw it.
///
/// `start` is fixed at creation; only `end` follows the crosshair. The unit is
/// captured when the line is created so later unit changes leave it alone.
#[derive(Debug)]
pub struct Line {
    id: u32,
    start: Vec3,
    end: Vec3,
    unit: DistanceUnit,
    attachment: Option<AttachmentHandle>,
}

impl Line {
    /// Create a zero-length line at `start` and attach it to the scene.
    pub fn create(
        id: u32,
        start: Vec3,
        unit: DistanceUnit,
        surface: &mut impl SceneSurface,
    ) -> Self {
        let label = format_distance(0.0, unit);
        let attachment = surface.attach(start, start, &label);
        Self {
            id,
            start,
            end: start,
            unit,
            attachment: Some(attachment),
        }
    }

    /// Move the end point and refresh the drawn segment and label.
    /// A removed line is terminated and ignores further updates.
    pub fn update(&mut self, to: Vec3, surface: &mut impl SceneSurface) {
        let Some(handle) = self.attachment else {
            return;
        };
        self.end = to;
        surface.reposition(handle, self.start, self.end, &self.label());
    }

    /// Detach from the scene. Only the first call reaches the surface.
    pub fn remove(&mut self, surface: &mut impl SceneSurface) {
        if let Some(handle) = self.attachment.take() {
            surface.detach(handle);
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn start(&self) -> Vec3 {
        self.start
    }

    pub fn end(&self) -> Vec3 {
        self.end
    }

    pub fn unit(&self) -> DistanceUnit {
        self.unit
    }

    /// Euclidean length in meters.
    pub fn distance(&self) -> f32 {
        self.start.distance(self.end)
    }

    pub fn label(&self) -> String {
        format_distance(self.distance(), self.unit)
    }

    pub fn attachment(&self) -> Option<AttachmentHandle> {
        self.attachment
    }

    pub fn is_attached(&self) -> bool {
        self.attachment.is_some()
    }

    pub fn snapshot(&self) -> LineSnapshot {
        LineSnapshot {
            id: self.id,
            start: self.start.to_array(),
            end: self.end.to_array(),
            distance: self.distance(),
            unit: self.unit,
            label: self.label(),
        }
    }
}

/// Plain copy of a line's state for notifications and queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSnapshot {
    pub id: u32,
    pub start: [f32; 3],
    pub end: [f32; 3],
    pub distance: f32,
    pub unit: DistanceUnit,
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::measure::testing::{RecordingSurface, SurfaceCall};
    use approx::assert_relative_eq;

    #[test]
    fn create_is_zero_length() {
        let mut surface = RecordingSurface::default();
        let line = Line::create(0, Vec3::new(0.3, 0.0, -1.0), DistanceUnit::Inch, &mut surface);

        assert_eq!(line.start(), line.end());
        assert_eq!(line.distance(), 0.0);
        assert_eq!(line.label(), "0.00 in");
        assert_eq!(surface.attached(), 1);
        assert!(matches!(&surface.calls[0], SurfaceCall::Attach { label, .. } if label == "0.00 in"));
    }

    #[test]
    fn update_moves_end_and_relabels() {
        let mut surface = RecordingSurface::default();
        let mut line = Line::create(0, Vec3::ZERO, DistanceUnit::Centimeter, &mut surface);
        line.update(Vec3::new(0.0, 0.0, 0.5), &mut surface);

        assert_eq!(line.start(), Vec3::ZERO);
        assert_relative_eq!(line.distance(), 0.5);
        assert_eq!(line.label(), "50.00 cm");
        assert_eq!(
            surface.calls.last(),
            Some(&SurfaceCall::Reposition {
                start: Vec3::ZERO,
                end: Vec3::new(0.0, 0.0, 0.5),
                label: "50.00 cm".to_string(),
            })
        );
    }

    #[test]
    fn repeated_update_is_stable() {
        let mut surface = RecordingSurface::default();
        let mut line = Line::create(0, Vec3::ZERO, DistanceUnit::Meter, &mut surface);
        let target = Vec3::new(0.2, 0.1, -0.7);

        line.update(target, &mut surface);
        let (distance, label) = (line.distance(), line.label());
        for _ in 0..5 {
            line.update(target, &mut surface);
            assert_eq!(line.distance(), distance);
            assert_eq!(line.label(), label);
        }
    }

    #[test]
    fn remove_detaches_once() {
        let mut surface = RecordingSurface::default();
        let mut line = Line::create(0, Vec3::ZERO, DistanceUnit::Meter, &mut surface);

        line.remove(&mut surface);
        line.remove(&mut surface);
        line.update(Vec3::X, &mut surface);

        assert_eq!(surface.detached(), 1);
        assert!(!line.is_attached());
        assert_eq!(line.end(), Vec3::ZERO);
        assert_eq!(line.distance(), 0.0);
        assert!(!surface
            .calls
            .iter()
            .any(|call| matches!(call, SurfaceCall::Reposition { .. })));
    }

    #[test]
    fn snapshot_carries_label_in_line_unit() {
        let mut surface = RecordingSurface::default();
        let mut line = Line::create(7, Vec3::ZERO, DistanceUnit::Inch, &mut surface);
        line.update(Vec3::X, &mut surface);

        let snapshot = line.snapshot();
        assert_eq!(snapshot.id, 7);
        assert_eq!(snapshot.end, [1.0, 0.0, 0.0]);
        assert_eq!(snapshot.label, "39.37 in");
    }
}
