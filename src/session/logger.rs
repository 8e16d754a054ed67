use log::{debug, warn};

use super::record::{filtered_row, raw_row, HEADER};
use super::session::LoggingSession;
use crate::fix::{FixSample, Smoothed};
use crate::storage::{Storage, StorageError};

#[derive(Debug)]
struct Stream {
    name: String,
    header_written: bool,
}

impl Stream {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            header_written: false,
        }
    }

    /// Writes the header if it is still missing, then `line`. A data row is
    /// never written ahead of the header.
    fn append<S: Storage>(&mut self, storage: &S, line: &str) -> Result<(), StorageError> {
        self.ensure_header(storage)?;
        storage.append_line(&self.name, line)
    }

    fn ensure_header<S: Storage>(&mut self, storage: &S) -> Result<(), StorageError> {
        if !self.header_written {
            storage.append_line(&self.name, HEADER)?;
            self.header_written = true;
        }
        Ok(())
    }
}

/// Outcome of one second's writes, one entry per stream.
#[derive(Debug)]
pub struct RolloverReport {
    pub raw: Result<(), StorageError>,
    /// `None` when the sample was not trusted and no row was due.
    pub filtered: Option<Result<(), StorageError>>,
}

impl RolloverReport {
    pub fn is_ok(&self) -> bool {
        self.raw.is_ok() && !matches!(self.filtered, Some(Err(_)))
    }
}

/// Owns the raw and filtered streams of one session.
pub struct SessionLogger<S: Storage> {
    session: LoggingSession,
    storage: S,
    raw: Stream,
    filtered: Stream,
    rows_raw: u64,
    rows_filtered: u64,
}

impl<S: Storage> SessionLogger<S> {
    /// Opens the session and writes both headers. A header that cannot be
    /// written now is retried ahead of that stream's first row.
    pub fn start(session: LoggingSession, storage: S) -> Self {
        let mut logger = Self {
            raw: Stream::new(session.raw_name()),
            filtered: Stream::new(session.filtered_name()),
            session,
            storage,
            rows_raw: 0,
            rows_filtered: 0,
        };

        for stream in [&mut logger.raw, &mut logger.filtered] {
            match stream.ensure_header(&logger.storage) {
                Ok(()) => debug!("opened {}", stream.name),
                Err(e) => warn!("failed to write header to {}: {}", stream.name, e),
            }
        }

        logger
    }

    pub fn session(&self) -> &LoggingSession {
        &self.session
    }

    #[cfg(test)]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn is_ready(&self) -> bool {
        self.storage.is_ready()
    }

    pub fn rows_raw(&self) -> u64 {
        self.rows_raw
    }

    pub fn rows_filtered(&self) -> u64 {
        self.rows_filtered
    }

    /// Called once per distinct GNSS seconds value. The raw row is always
    /// attempted; the filtered row only when `trusted`, leaving a gap
    /// otherwise. The two writes are independent of each other.
    pub fn on_second_rollover(
        &mut self,
        raw: &FixSample,
        filtered: &Smoothed,
        trusted: bool,
    ) -> RolloverReport {
        let raw_result = self.raw.append(&self.storage, &raw_row(raw));
        match &raw_result {
            Ok(()) => self.rows_raw += 1,
            Err(e) => warn!("raw row {} not written: {}", raw.timestamp.time_field(), e),
        }

        let filtered_result = trusted.then(|| {
            let result = self
                .filtered
                .append(&self.storage, &filtered_row(raw, filtered));
            match &result {
                Ok(()) => self.rows_filtered += 1,
                Err(e) => warn!(
                    "filtered row {} not written: {}",
                    raw.timestamp.time_field(),
                    e
                ),
            }
            result
        });

        RolloverReport {
            raw: raw_result,
            filtered: filtered_result,
        }
    }
}
