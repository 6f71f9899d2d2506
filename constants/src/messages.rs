/// Shown from startup until the first surface is hit.
pub const DETECTING_WORLD: &str = "Detecting the world…";

/// Shown once surfaces are found but nothing has been measured yet.
pub const HOLD_AND_MOVE: &str = "Hold screen & move your phone…";

pub const TRACKING_FAILED: &str = "Error occurred";
pub const TRACKING_INTERRUPTED: &str = "Interrupted";
pub const TRACKING_INTERRUPTION_ENDED: &str = "Interruption ended";

pub const UNIT_SHEET_TITLE: &str = "Settings";
pub const UNIT_SHEET_MESSAGE: &str = "Select distance unit";
pub const UNIT_BUTTON_TITLE: &str = "Unit";
pub const RESET_BUTTON_TITLE: &str = "Reset";
pub const CANCEL_TITLE: &str = "Cancel";
