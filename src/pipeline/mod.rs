//! Single-threaded processing sequence: gate, estimator and session logger
//! owned together and driven by one tick function.

mod error;
mod runner;
mod status;

pub use error::PipelineError;
pub use runner::{run, RunSummary};
pub use status::{LogSink, Snapshot};

use log::{info, warn};

use crate::config::Config;
use crate::estimator::PositionVelocityEstimator;
use crate::fix::{FixSample, Smoothed};
use crate::gate::FixQualityGate;
use crate::session::{LoggingSession, SessionLogger};
use crate::storage::Storage;

pub struct Pipeline<S: Storage> {
    gate: FixQualityGate,
    estimator: PositionVelocityEstimator,
    logger: SessionLogger<S>,
    reset_after_ms: Option<u64>,
    last_trusted_ms: Option<u64>,
    last_second: Option<u8>,
    storage_ready: bool,
}

impl<S: Storage> Pipeline<S> {
    /// Starts the session (headers included). The gate's recovery cooldown
    /// starts at `now_ms`.
    pub fn new(config: &Config, session: LoggingSession, storage: S, now_ms: u64) -> Self {
        info!(
            "session {} {}: {}, {}",
            session.id().date_field(),
            session.id().time_field(),
            session.raw_name(),
            session.filtered_name()
        );
        Self {
            gate: FixQualityGate::new(config.gate.clone(), now_ms),
            estimator: PositionVelocityEstimator::new(config.estimator.gain_coupling),
            logger: SessionLogger::start(session, storage),
            reset_after_ms: config
                .estimator
                .reset_after
                .map(|d| d.as_millis() as u64),
            last_trusted_ms: None,
            last_second: None,
            storage_ready: true,
        }
    }

    pub fn logger(&self) -> &SessionLogger<S> {
        &self.logger
    }

    #[cfg(test)]
    pub fn estimator(&self) -> &PositionVelocityEstimator {
        &self.estimator
    }

    /// Processes one sample. Returns a snapshot when the GNSS seconds field
    /// changed since the previous sample, after the session rows for that
    /// second were written.
    pub fn tick(&mut self, sample: &FixSample, now_ms: u64) -> Option<Snapshot> {
        let trusted = self.gate.evaluate(sample, now_ms);

        if trusted {
            self.last_trusted_ms = Some(now_ms);
        } else {
            self.expire_stale_track(now_ms);
        }

        // The first trusted fix seeds the filters; after that they follow
        // every sample, trusted or not.
        if trusted || self.estimator.is_seeded() {
            self.estimator.update(sample);
        }
        let smoothed = self.estimator.smoothed();

        let second = sample.timestamp.second;
        if self.last_second == Some(second) {
            return None;
        }
        self.last_second = Some(second);

        self.check_storage();
        let filtered = smoothed.unwrap_or_else(|| Smoothed::passthrough(sample));
        let report = self.logger.on_second_rollover(sample, &filtered, trusted);

        Some(Snapshot {
            sample: *sample,
            smoothed,
            trusted,
            storage_ready: self.storage_ready,
            storage_ok: report.is_ok(),
            filtered_ok: report.filtered.as_ref().map(Result::is_ok),
        })
    }

    /// Logs storage readiness transitions; failed writes themselves are
    /// reported per row by the session logger.
    fn check_storage(&mut self) {
        let ready = self.logger.is_ready();
        if ready != self.storage_ready {
            if ready {
                info!("storage ready again");
            } else {
                warn!("storage not ready, rows will be lost until it returns");
            }
            self.storage_ready = ready;
        }
    }

    fn expire_stale_track(&mut self, now_ms: u64) {
        let (Some(limit), Some(last)) = (self.reset_after_ms, self.last_trusted_ms) else {
            return;
        };
        if now_ms.saturating_sub(last) >= limit {
            info!(
                "no trusted fix for {} ms, resetting estimator after {} updates",
                now_ms.saturating_sub(last),
                self.estimator.updates()
            );
            self.estimator.reset();
            self.last_trusted_ms = None;
        }
    }
}
