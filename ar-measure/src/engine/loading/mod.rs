//! Settings loading and session initialisation.
//!
//! Reads the JSON settings asset and builds the session and tracker from it,
//! falling back to defaults when the file is missing or malformed.

/// Settings asset: default unit and simulated tracking configuration.
pub mod settings;

/// Settings loading state and the systems that apply the loaded asset.
pub mod settings_loader;
