use std::future::Future;

use log::{debug, info, warn};
use tokio::time::{interval, Instant, MissedTickBehavior};

use super::error::PipelineError;
use super::status::StatusSink;
use super::Pipeline;
use crate::config::Config;
use crate::receiver::{utc_offset, Receiver, ReceiverError};
use crate::session::LoggingSession;
use crate::storage::Storage;

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub session: LoggingSession,
    pub ticks: u64,
    pub rows_raw: u64,
    pub rows_filtered: u64,
}

/// Drives the pipeline from a fixed-period ticker until the receiver runs
/// dry or `shutdown` resolves.
///
/// Start-up polls the receiver until it reports an established date and time
/// (the session is named after it), giving up after `startup_timeout`.
pub async fn run<R, S, K, F>(
    config: &Config,
    receiver: &mut R,
    storage: S,
    sink: &mut K,
    shutdown: F,
) -> Result<RunSummary, PipelineError>
where
    R: Receiver,
    S: Storage,
    K: StatusSink,
    F: Future<Output = ()>,
{
    let offset = utc_offset(config.receiver.utc_offset_hours)
        .ok_or(PipelineError::InvalidOffset(config.receiver.utc_offset_hours))?;
    let startup_timeout = config.runtime.startup_timeout;

    let mut ticker = interval(config.runtime.tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    let start = Instant::now();
    let now_ms = || start.elapsed().as_millis() as u64;
    let mut ticks = 0u64;

    info!("waiting for receiver time");
    let mut pipeline = loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut shutdown => return Err(PipelineError::Interrupted),
        }
        ticks += 1;

        if start.elapsed() > startup_timeout {
            return Err(PipelineError::StartupTimeout(startup_timeout));
        }

        receiver.refresh()?;
        let Some(epoch) = receiver.latest() else {
            continue;
        };
        let sample = epoch.to_sample(offset);
        let Some(session) = LoggingSession::establish(&sample.timestamp, &config.logging.basename)
        else {
            debug!("receiver time not established yet");
            continue;
        };

        if !storage.is_ready() {
            warn!("storage not ready at session start");
        }
        let mut pipeline = Pipeline::new(config, session, storage, now_ms());
        if let Some(snapshot) = pipeline.tick(&sample, now_ms()) {
            sink.publish(&snapshot);
        }
        break pipeline;
    };

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut shutdown => {
                info!("shutdown requested");
                break;
            }
        }
        ticks += 1;

        match receiver.refresh() {
            Ok(()) => {}
            Err(ReceiverError::Exhausted) => {
                info!("receiver exhausted");
                break;
            }
            Err(e) => return Err(e.into()),
        }
        let Some(epoch) = receiver.latest() else {
            continue;
        };
        let sample = epoch.to_sample(offset);
        if let Some(snapshot) = pipeline.tick(&sample, now_ms()) {
            sink.publish(&snapshot);
        }
    }

    let logger = pipeline.logger();
    Ok(RunSummary {
        session: logger.session().clone(),
        ticks,
        rows_raw: logger.rows_raw(),
        rows_filtered: logger.rows_filtered(),
    })
}
