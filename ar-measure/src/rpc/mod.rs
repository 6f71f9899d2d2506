//! JSON-RPC 2.0 communication layer for the embedding web page.
//!
//! Implements bidirectional messaging between the Bevy app and its host page
//! via iframe postMessage, supporting both request-response and notification patterns.
//!
//! ## Message Flow
//!
//! ```text
//! Host page (parent window)  <──postMessage──>  Bevy (iframe)
//!        │                                        │
//!        ├─ Request (with ID) ──────────────────> │
//!        │                                        ├─ Process request
//!        │ <───────────────── Response (with ID) ─┤
//!        │                                        │
//!        │ <────────── Notification (no ID) ─────┤
//! ```
//!
//! ## Error Handling
//!
//! Standard JSON-RPC 2.0 error codes:
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error
//!
//! ## Methods
//!
//! - `set_unit`: Select the display unit (`{"unit": "inch"}`)
//! - `reset_measurements`: Remove every stored line
//! - `get_measurements`: Finished lines with distances and labels
//! - `get_unit`: Current display unit
//!
//! ## Notifications
//!
//! - `measure_started`, `measure_updated`, `measure_completed`, `measure_clear`
//! - `unit_changed`
//! - `tracking_status`: Tracker failure and interruption messages

/// JSON-RPC 2.0 bidirectional communication system for the host page.
///
/// Handles request-response patterns, notifications, and WASM message listeners.
pub mod web_rpc;
