/// Process and measurement noise for one filter channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseParams {
    pub process: f64,
    pub measurement: f64,
}

/// Multiplier shared by every channel: fewer satellites, noisier fix.
/// Zero satellites is treated as one.
pub fn satellite_noise_scale(satellites: u8) -> f64 {
    let satellites = satellites.max(1) as f64;
    (2.0 / satellites).clamp(0.01, 2.0) * 10.0
}

/// Latitude/longitude noise. Faster motion raises the process noise so the
/// filter follows the track instead of over-smoothing it.
pub fn position_noise(satellites: u8, hdop: f32, speed_kmh: f32) -> NoiseParams {
    let scale = satellite_noise_scale(satellites);
    NoiseParams {
        process: (speed_kmh as f64 * 0.1).clamp(0.01, 10.0) * scale,
        measurement: hdop as f64 * 2.0 * scale,
    }
}

pub fn speed_noise(satellites: u8, pdop: f32) -> NoiseParams {
    let scale = satellite_noise_scale(satellites);
    NoiseParams {
        process: pdop as f64 * 0.1 * scale,
        measurement: pdop as f64 * 1.0 * scale,
    }
}
