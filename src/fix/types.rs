use serde::Serialize;

/// Scale of the receiver's integer coordinates (1e-7 degree units).
pub const COORDINATE_SCALE: f64 = 1e-7;

/// Latitude or longitude kept as the receiver's scaled integer.
///
/// The degree value is only derived for output so no precision is lost on
/// hardware with 32-bit floating point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Coordinate(pub i32);

impl Coordinate {
    #[cfg(test)]
    pub fn from_degrees(degrees: f64) -> Self {
        Coordinate((degrees / COORDINATE_SCALE).round() as i32)
    }

    pub fn degrees(&self) -> f64 {
        self.0 as f64 * COORDINATE_SCALE
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    strum_macros::Display,
    strum_macros::FromRepr,
)]
#[repr(u8)]
pub enum FixType {
    #[default]
    #[strum(serialize = "no fix")]
    NoFix = 0,
    #[strum(serialize = "dead reckoning")]
    DeadReckoning = 1,
    #[strum(serialize = "2D")]
    Fix2D = 2,
    #[strum(serialize = "3D")]
    Fix3D = 3,
    #[strum(serialize = "GNSS")]
    GnssOnly = 4,
    #[strum(serialize = "time only")]
    TimeOnly = 5,
}

impl FixType {
    /// Unknown receiver codes are reported as [FixType::NoFix].
    pub fn from_code(code: u8) -> Self {
        FixType::from_repr(code).unwrap_or_default()
    }
}

/// Calendar timestamp reported alongside a fix, in local (offset) time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Timestamp {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub millisecond: u16,
    pub date_valid: bool,
    pub time_valid: bool,
}

impl Timestamp {
    /// Both validity flags are set and the calendar fields are not the
    /// receiver's zeroed defaults.
    ///
    /// Only year, month and day are checked. A seconds field of zero is a
    /// legitimate time (a session may start on the minute) and is accepted.
    pub fn is_established(&self) -> bool {
        self.date_valid && self.time_valid && self.year != 0 && self.month != 0 && self.day != 0
    }

    /// `YYYY/MM/DD`
    pub fn date_field(&self) -> String {
        format!("{:04}/{:02}/{:02}", self.year, self.month, self.day)
    }

    /// `HH:MM:SS`
    pub fn time_field(&self) -> String {
        format!("{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }

    /// `YYYYMMDD_HHMMSS`, used to name session files.
    pub fn file_stamp(&self) -> String {
        format!(
            "{:04}{:02}{:02}_{:02}{:02}{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}
