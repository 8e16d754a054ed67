use crate::fix::{FixSample, Smoothed};

pub const HEADER: &str = "date,time,lat,lng,alt,spd,siv,hdop";

/// One CSV row. Numbers use Rust's formatter, which always writes `.` as the
/// decimal separator.
pub fn format_row(sample: &FixSample, lat: f64, lng: f64, speed_kmh: f64) -> String {
    format!(
        "{},{},{:.7},{:.7},{:.1},{:.1},{},{:.2}",
        sample.timestamp.date_field(),
        sample.timestamp.time_field(),
        lat,
        lng,
        sample.altitude_m,
        speed_kmh,
        sample.satellites,
        sample.hdop,
    )
}

pub fn raw_row(sample: &FixSample) -> String {
    format_row(
        sample,
        sample.latitude_deg(),
        sample.longitude_deg(),
        sample.speed_kmh as f64,
    )
}

/// Filtered position and speed; altitude, satellites and DOP stay raw.
pub fn filtered_row(sample: &FixSample, filtered: &Smoothed) -> String {
    format_row(
        sample,
        filtered.latitude,
        filtered.longitude,
        filtered.speed_kmh,
    )
}
