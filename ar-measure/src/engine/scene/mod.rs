//! Scene presentation for measurements and the HUD.

/// Screen-space placement of distance labels.
pub mod labels;

/// Crosshair, message area, buttons and the unit sheet.
pub mod overlay;

/// Scene surface seam: segment and label entities for each line.
///
/// Lines hold a non-owning handle; detaching despawns the entities once.
pub mod surface;
