use chrono::{DateTime, Datelike, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};

use crate::fix::{Coordinate, FixSample, FixType, Timestamp};

/// Navigation epoch as the receiver driver reports it, in native units.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RawEpoch {
    pub siv: u8,
    /// 1e-7 degrees
    pub lat: i32,
    /// 1e-7 degrees
    pub lng: i32,
    /// millimetres above MSL
    pub alt_mm: i32,
    /// mm/s
    pub ground_speed_mm_s: i32,
    /// DOP x 100
    pub hdop: u16,
    /// DOP x 100
    pub pdop: u16,
    pub fix_type: u8,
    pub fix_ok: bool,
    pub date_valid: bool,
    pub time_valid: bool,
    /// Seconds since the Unix epoch, UTC.
    pub unix_epoch: i64,
    pub millisecond: u16,
}

impl RawEpoch {
    /// Normalizes units and derives the local timestamp by adding a fixed
    /// offset to the UTC epoch.
    pub fn to_sample(&self, offset: FixedOffset) -> FixSample {
        FixSample {
            satellites: self.siv,
            latitude: Coordinate(self.lat),
            longitude: Coordinate(self.lng),
            altitude_m: self.alt_mm as f64 * 0.001,
            speed_kmh: self.ground_speed_mm_s as f32 * 0.0036,
            hdop: self.hdop as f32 * 0.01,
            pdop: self.pdop as f32 * 0.01,
            fix_type: FixType::from_code(self.fix_type),
            fix_ok: self.fix_ok,
            timestamp: self.local_timestamp(offset),
        }
    }

    fn local_timestamp(&self, offset: FixedOffset) -> Timestamp {
        let Some(utc) = DateTime::from_timestamp(self.unix_epoch, 0) else {
            return Timestamp::default();
        };
        let local = utc.with_timezone(&offset);
        Timestamp {
            year: u16::try_from(local.year()).unwrap_or(0),
            month: local.month() as u8,
            day: local.day() as u8,
            hour: local.hour() as u8,
            minute: local.minute() as u8,
            second: local.second() as u8,
            millisecond: self.millisecond,
            date_valid: self.date_valid,
            time_valid: self.time_valid,
        }
    }
}

pub fn utc_offset(hours: i32) -> Option<FixedOffset> {
    FixedOffset::east_opt(hours.checked_mul(3600)?)
}
