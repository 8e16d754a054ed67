use log::trace;

use super::filter::ScalarKalmanFilter;
use super::noise::{position_noise, speed_noise};
use crate::config::GainCoupling;
use crate::fix::{FixSample, Smoothed};

#[derive(Debug, Clone, PartialEq)]
struct Channels {
    latitude: ScalarKalmanFilter,
    longitude: ScalarKalmanFilter,
    speed: ScalarKalmanFilter,
}

/// Three independent scalar filters smoothing latitude, longitude and speed.
///
/// Noise is re-tuned from every sample's satellite count and DOP before the
/// update runs.
#[derive(Debug, Clone)]
pub struct PositionVelocityEstimator {
    coupling: GainCoupling,
    channels: Option<Channels>,
    updates: u64,
}

impl PositionVelocityEstimator {
    pub fn new(coupling: GainCoupling) -> Self {
        Self {
            coupling,
            channels: None,
            updates: 0,
        }
    }

    pub fn is_seeded(&self) -> bool {
        self.channels.is_some()
    }

    /// Latest smoothed output, once seeded.
    pub fn smoothed(&self) -> Option<Smoothed> {
        self.channels.as_ref().map(|c| Smoothed {
            latitude: c.latitude.estimate,
            longitude: c.longitude.estimate,
            speed_kmh: c.speed.estimate,
        })
    }

    pub fn updates(&self) -> u64 {
        self.updates
    }

    /// Forgets all filter memory. The next update seeds again.
    pub fn reset(&mut self) {
        self.channels = None;
    }

    /// Feeds one sample. The first call seeds every channel with the raw
    /// measurement; later calls run a full predict/correct cycle.
    pub fn update(&mut self, sample: &FixSample) -> Smoothed {
        let lat = sample.latitude_deg();
        let lng = sample.longitude_deg();
        let speed = sample.speed_kmh as f64;

        let Some(channels) = self.channels.as_mut() else {
            self.channels = Some(Channels {
                latitude: ScalarKalmanFilter::seeded(lat),
                longitude: ScalarKalmanFilter::seeded(lng),
                speed: ScalarKalmanFilter::seeded(speed),
            });
            self.updates += 1;
            return Smoothed {
                latitude: lat,
                longitude: lng,
                speed_kmh: speed,
            };
        };

        let position = position_noise(sample.satellites, sample.hdop, sample.speed_kmh);
        channels.latitude.tune(position);
        channels.longitude.tune(position);

        channels.latitude.predict();
        let lat_gain = channels.latitude.gain();
        channels.latitude.correct(lat, lat_gain);

        // Legacy coupling reads the latitude covariance as it stands once
        // latitude has been corrected.
        channels.longitude.predict();
        let lng_gain = match self.coupling {
            GainCoupling::Independent => channels.longitude.gain(),
            GainCoupling::Legacy => channels
                .longitude
                .gain_against(channels.latitude.covariance),
        };
        channels.longitude.correct(lng, lng_gain);

        channels.speed.tune(speed_noise(sample.satellites, sample.pdop));
        channels.speed.update(speed);

        trace!(
            "kalman: lat K={:.4} P={:.4e} | lng K={:.4} P={:.4e} | spd P={:.4e}",
            lat_gain,
            channels.latitude.covariance,
            lng_gain,
            channels.longitude.covariance,
            channels.speed.covariance
        );

        self.updates += 1;
        Smoothed {
            latitude: channels.latitude.estimate,
            longitude: channels.longitude.estimate,
            speed_kmh: channels.speed.estimate,
        }
    }
}

#[cfg(test)]
impl PositionVelocityEstimator {
    pub fn latitude(&self) -> Option<&ScalarKalmanFilter> {
        self.channels.as_ref().map(|c| &c.latitude)
    }

    pub fn longitude(&self) -> Option<&ScalarKalmanFilter> {
        self.channels.as_ref().map(|c| &c.longitude)
    }

    pub fn speed(&self) -> Option<&ScalarKalmanFilter> {
        self.channels.as_ref().map(|c| &c.speed)
    }
}
