//! Per-sample trust decision for navigation fixes.
//!
//! A sample is trusted when the instantaneous quality checks pass and no
//! disqualifying event (DOP spike, satellite dropout) happened within the
//! recovery cooldown. Positions right after reacquisition are still unstable,
//! and without the cooldown the verdict would chatter while DOP hovers around
//! its threshold.

use log::debug;
use thiserror::Error;

use crate::config::GateConfig;
use crate::fix::FixSample;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum Rejection {
    #[error("hdop limit exceeded {0}")]
    HdopOutlier(f32),
    #[error("not enough satellites ({0})")]
    TooFewSatellites(u8),
    #[error("receiver reports fix not ok")]
    FixNotOk,
    #[error("latitude too close to zero ({0})")]
    ZeroLatitude(f64),
    #[error("longitude too close to zero ({0})")]
    ZeroLongitude(f64),
    #[error("recovering ({0} ms since last disqualification)")]
    Recovering(u64),
}

impl Rejection {
    /// Whether this condition restarts the recovery cooldown.
    pub fn resets_recovery(&self) -> bool {
        matches!(
            self,
            Rejection::HdopOutlier(_) | Rejection::TooFewSatellites(_)
        )
    }
}

#[derive(Debug, Clone)]
pub struct FixQualityGate {
    config: GateConfig,
    recovery_anchor_ms: u64,
}

impl FixQualityGate {
    /// The cooldown starts running at construction: nothing is trusted
    /// during the first `recovery_cooldown` after start-up.
    pub fn new(config: GateConfig, now_ms: u64) -> Self {
        Self {
            config,
            recovery_anchor_ms: now_ms,
        }
    }

    #[cfg(test)]
    pub fn recovery_anchor_ms(&self) -> u64 {
        self.recovery_anchor_ms
    }

    pub fn evaluate(&mut self, sample: &FixSample, now_ms: u64) -> bool {
        let rejections = self.assess(sample, now_ms);
        if !rejections.is_empty() {
            debug!(
                "fix rejected: {}",
                rejections
                    .iter()
                    .map(|r| r.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        rejections.is_empty()
    }

    /// Runs every check and returns all the reasons `sample` is not trusted.
    /// An empty list is a trusted verdict.
    pub fn assess(&mut self, sample: &FixSample, now_ms: u64) -> Vec<Rejection> {
        let mut rejections = Vec::new();

        if sample.hdop > self.config.max_hdop || sample.hdop.is_nan() {
            rejections.push(Rejection::HdopOutlier(sample.hdop));
        }
        if sample.satellites < self.config.min_satellites {
            rejections.push(Rejection::TooFewSatellites(sample.satellites));
        }
        if rejections.iter().any(Rejection::resets_recovery) {
            self.recovery_anchor_ms = now_ms;
        }

        if !sample.fix_ok {
            rejections.push(Rejection::FixNotOk);
        }
        let lat = sample.latitude_deg();
        if lat.abs() < self.config.min_abs_degrees {
            rejections.push(Rejection::ZeroLatitude(lat));
        }
        let lng = sample.longitude_deg();
        if lng.abs() < self.config.min_abs_degrees {
            rejections.push(Rejection::ZeroLongitude(lng));
        }

        let elapsed = now_ms.saturating_sub(self.recovery_anchor_ms);
        if (elapsed as u128) < self.config.recovery_cooldown.as_millis() {
            rejections.push(Rejection::Recovering(elapsed));
        }

        rejections
    }
}
