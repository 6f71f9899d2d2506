/// Scale factors from meters, the world coordinate unit.
pub const CENTIMETERS_PER_METER: f32 = 100.0;
pub const INCHES_PER_METER: f32 = 39.3701;
pub const METERS_PER_METER: f32 = 1.0;

pub const CENTIMETER_SUFFIX: &str = "cm";
pub const INCH_SUFFIX: &str = "in";
pub const METER_SUFFIX: &str = "m";

/// Decimal places used for every distance label.
pub const DISTANCE_DECIMAL_PLACES: usize = 2;
