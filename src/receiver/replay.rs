use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::epoch::RawEpoch;
use super::{Receiver, ReceiverError};

/// Plays back epochs recorded as JSON lines, one epoch per refresh.
pub struct ReplayReceiver<R: BufRead> {
    reader: R,
    line: usize,
    latest: Option<RawEpoch>,
}

impl ReplayReceiver<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self, ReceiverError> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> ReplayReceiver<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            latest: None,
        }
    }
}

impl<R: BufRead> Receiver for ReplayReceiver<R> {
    fn refresh(&mut self) -> Result<(), ReceiverError> {
        let mut buf = String::new();
        loop {
            buf.clear();
            if self.reader.read_line(&mut buf)? == 0 {
                return Err(ReceiverError::Exhausted);
            }
            self.line += 1;
            let trimmed = buf.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let epoch = serde_json::from_str(trimmed).map_err(|source| ReceiverError::Decode {
                line: self.line,
                source,
            })?;
            self.latest = Some(epoch);
            return Ok(());
        }
    }

    fn latest(&self) -> Option<&RawEpoch> {
        self.latest.as_ref()
    }
}
