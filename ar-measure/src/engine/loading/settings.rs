use crate::tools::measure::unit::DistanceUnit;
use bevy::prelude::*;
use constants::tracking::{DEFAULT_CONFIRM_SECS, DEFAULT_WARMUP_SECS};
use serde::{Deserialize, Serialize};

/// Runtime settings loaded from `measure_settings.json`.
#[derive(Asset, TypePath, Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasureSettings {
    #[serde(default)]
    pub default_unit: DistanceUnit,
    #[serde(default)]
    pub tracking: TrackingSettings,
}

/// Simulated tracker configuration: timings and the planes it will find.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingSettings {
    #[serde(default = "default_warmup")]
    pub warmup_secs: f32,
    #[serde(default = "default_confirm")]
    pub confirm_secs: f32,
    #[serde(default)]
    pub planes: Vec<PlaneSettings>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaneSettings {
    pub center: [f32; 3],
    pub normal: [f32; 3],
    pub half_extents: [f32; 2],
    #[serde(default)]
    pub appears_after_secs: f32,
}

fn default_warmup() -> f32 {
    DEFAULT_WARMUP_SECS
}

fn default_confirm() -> f32 {
    DEFAULT_CONFIRM_SECS
}

impl Default for TrackingSettings {
    /// A single floor plane around the origin.
    fn default() -> Self {
        Self {
            warmup_secs: DEFAULT_WARMUP_SECS,
            confirm_secs: DEFAULT_CONFIRM_SECS,
            planes: vec![PlaneSettings {
                center: [0.0, 0.0, 0.0],
                normal: [0.0, 1.0, 0.0],
                half_extents: [5.0, 5.0],
                appears_after_secs: 0.0,
            }],
        }
    }
}
