use constants::units::{
    CENTIMETER_SUFFIX, CENTIMETERS_PER_METER, DISTANCE_DECIMAL_PLACES, INCH_SUFFIX,
    INCHES_PER_METER, METER_SUFFIX, METERS_PER_METER,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display unit for distance labels. World distances are always meters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Centimeter,
    Inch,
    Meter,
}

impl DistanceUnit {
    pub const ALL: [DistanceUnit; 3] = [Self::Centimeter, Self::Inch, Self::Meter];

    /// Multiplier applied to a distance in meters.
    pub fn factor(self) -> f32 {
        match self {
            Self::Centimeter => CENTIMETERS_PER_METER,
            Self::Inch => INCHES_PER_METER,
            Self::Meter => METERS_PER_METER,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Self::Centimeter => CENTIMETER_SUFFIX,
            Self::Inch => INCH_SUFFIX,
            Self::Meter => METER_SUFFIX,
        }
    }

    /// Title used in the unit selection sheet.
    pub fn title(self) -> &'static str {
        match self {
            Self::Centimeter => "Centimeter",
            Self::Inch => "Inch",
            Self::Meter => "Meter",
        }
    }

    /// Convert string identifier to unit for RPC compatibility.
    /// Accepts both names and suffixes.
    pub fn from_string(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "centimeter" | "centimeters" | "cm" => Some(Self::Centimeter),
            "inch" | "inches" | "in" => Some(Self::Inch),
            "meter" | "meters" | "m" => Some(Self::Meter),
            _ => None,
        }
    }

    /// Identifier used on the wire and in settings files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Centimeter => "centimeter",
            Self::Inch => "inch",
            Self::Meter => "meter",
        }
    }

    pub fn convert(self, meters: f32) -> f32 {
        meters * self.factor()
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Format a world distance for display, e.g. `"100.00 cm"`.
pub fn format_distance(meters: f32, unit: DistanceUnit) -> String {
    format!(
        "{:.*} {}",
        DISTANCE_DECIMAL_PLACES,
        unit.convert(meters),
        unit.suffix()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_meter_in_every_unit() {
        assert_eq!(format_distance(1.0, DistanceUnit::Centimeter), "100.00 cm");
        assert_eq!(format_distance(1.0, DistanceUnit::Inch), "39.37 in");
        assert_eq!(format_distance(1.0, DistanceUnit::Meter), "1.00 m");
    }

    #[test]
    fn zero_distance_has_fixed_precision() {
        for unit in DistanceUnit::ALL {
            assert_eq!(format_distance(0.0, unit), format!("0.00 {}", unit.suffix()));
        }
    }

    #[test]
    fn conversion_is_monotonic() {
        for unit in DistanceUnit::ALL {
            let mut previous = f32::MIN;
            for step in 0..500 {
                let value = unit.convert(step as f32 * 0.013);
                assert!(value >= previous, "{unit:?} decreased at step {step}");
                previous = value;
            }
        }
    }

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(format_distance(0.12345, DistanceUnit::Meter), "0.12 m");
        assert_eq!(format_distance(0.256, DistanceUnit::Centimeter), "25.60 cm");
        assert_eq!(format_distance(0.0254, DistanceUnit::Inch), "1.00 in");
    }

    #[test]
    fn parses_names_and_suffixes() {
        assert_eq!(DistanceUnit::from_string("Inch"), Some(DistanceUnit::Inch));
        assert_eq!(DistanceUnit::from_string(" cm "), Some(DistanceUnit::Centimeter));
        assert_eq!(DistanceUnit::from_string("M"), Some(DistanceUnit::Meter));
        assert_eq!(DistanceUnit::from_string("furlong"), None);
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&DistanceUnit::Inch).unwrap();
        assert_eq!(json, "\"inch\"");
        let unit: DistanceUnit = serde_json::from_str("\"meter\"").unwrap();
        assert_eq!(unit, DistanceUnit::Meter);
    }
}
