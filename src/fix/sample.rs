use serde::Serialize;

use super::types::{Coordinate, FixType, Timestamp};

/// One normalized navigation epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FixSample {
    pub satellites: u8,
    pub latitude: Coordinate,
    pub longitude: Coordinate,
    pub altitude_m: f64,
    pub speed_kmh: f32,
    pub hdop: f32,
    pub pdop: f32,
    pub fix_type: FixType,
    pub fix_ok: bool,
    pub timestamp: Timestamp,
}

impl FixSample {
    pub fn latitude_deg(&self) -> f64 {
        self.latitude.degrees()
    }

    pub fn longitude_deg(&self) -> f64 {
        self.longitude.degrees()
    }
}

/// Estimator output for one epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Smoothed {
    pub latitude: f64,
    pub longitude: f64,
    pub speed_kmh: f64,
}

impl Smoothed {
    /// Unfiltered values of `sample`, used before the estimator is seeded.
    pub fn passthrough(sample: &FixSample) -> Self {
        Self {
            latitude: sample.latitude_deg(),
            longitude: sample.longitude_deg(),
            speed_kmh: sample.speed_kmh as f64,
        }
    }
}
