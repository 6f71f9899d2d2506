//! Interactive measuring tools.
//!
//! ## Input Flow
//!
//! ```text
//! Touch / left mouse ──> MeasureTouchEvent ──> MeasurementSession
//! Keyboard / overlay / RPC ──> UnitSelectionEvent, ResetMeasurementsEvent
//! ```
//!
//! Every session change is published as a `MeasurementEvent`, which the RPC
//! layer forwards to the host page.

/// Input mapping: touches, overlay buttons and keyboard shortcuts.
pub mod actions;

/// Distance measurement session, lines and units.
pub mod measure;
