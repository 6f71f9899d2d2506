use bevy::prelude::*;

/// Cross-section of the line segment cuboid, in meters.
pub const DRAW_LINE_WIDTH: f32 = 0.004;

/// Radius of the sphere drawn at each end of a line.
pub const DRAW_VERTEX_SIZE: f32 = 0.006;

pub const LINE_COLOUR: Color = Color::srgb(1.0, 1.0, 1.0);
pub const LINE_EMISSIVE: LinearRgba = LinearRgba::new(1.0, 1.0, 1.0, 1.0);
pub const VERTEX_COLOUR: Color = Color::srgb(1.0, 0.84, 0.0);

/// Labels float slightly above the segment midpoint so they don't sit on the surface.
pub const LABEL_VERTICAL_OFFSET: f32 = 0.02;
pub const LABEL_FONT_SIZE: f32 = 16.0;
pub const LABEL_BACKGROUND: Color = Color::srgba(0.0, 0.0, 0.0, 0.6);

pub const CROSSHAIR_SIZE: f32 = 30.0;
pub const CROSSHAIR_BORDER: f32 = 2.0;
pub const CROSSHAIR_IDLE_COLOUR: Color = Color::srgb(1.0, 1.0, 1.0);
pub const CROSSHAIR_MEASURING_COLOUR: Color = Color::srgb(0.2, 0.9, 0.3);

pub const MESSAGE_FONT_SIZE: f32 = 14.0;
pub const OVERLAY_BACKGROUND: Color = Color::srgba(0.0, 0.0, 0.0, 0.5);
pub const OVERLAY_MARGIN: f32 = 20.0;
pub const BUTTON_SIZE: f32 = 44.0;
