use log::info;
use serde::Serialize;

use crate::fix::{FixSample, Smoothed};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
pub enum RecordingStatus {
    Recording,
    Stopped,
}

/// What downstream consumers (display, feedback) see once per second.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub sample: FixSample,
    /// `None` until the estimator has been seeded by a trusted fix.
    pub smoothed: Option<Smoothed>,
    pub trusted: bool,
    pub storage_ready: bool,
    /// Whether every row due this second reached storage.
    pub storage_ok: bool,
    /// Outcome of the filtered row; `None` when none was due.
    pub filtered_ok: Option<bool>,
}

impl Snapshot {
    pub fn status(&self) -> RecordingStatus {
        if self.trusted && self.storage_ok {
            RecordingStatus::Recording
        } else {
            RecordingStatus::Stopped
        }
    }
}

/// Downstream consumer of snapshots.
pub trait StatusSink {
    fn publish(&mut self, snapshot: &Snapshot);
}

/// Reports every snapshot through the log.
pub struct LogSink;

impl StatusSink for LogSink {
    fn publish(&mut self, snapshot: &Snapshot) {
        let s = &snapshot.sample;
        let (lat, lng, spd) = match snapshot.smoothed {
            Some(f) => (f.latitude, f.longitude, f.speed_kmh),
            None => (s.latitude_deg(), s.longitude_deg(), s.speed_kmh as f64),
        };
        info!(
            "[{}{}] {} {} siv={} hdop={:.2} fix={} lat={:.7} lng={:.7} spd={:.1}",
            snapshot.status(),
            match (snapshot.storage_ready, snapshot.storage_ok) {
                (false, _) => ", no storage",
                (true, false) => ", write failed",
                (true, true) => "",
            },
            s.timestamp.date_field(),
            s.timestamp.time_field(),
            s.satellites,
            s.hdop,
            s.fix_type,
            lat,
            lng,
            spd
        );
    }
}
