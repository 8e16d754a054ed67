use crate::fix::Timestamp;

/// One logging run, named after the first established timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSession {
    id: Timestamp,
    filtered_name: String,
    raw_name: String,
}

impl LoggingSession {
    /// Returns `None` until the receiver reports an established date and time.
    pub fn establish(timestamp: &Timestamp, basename: &str) -> Option<Self> {
        if !timestamp.is_established() {
            return None;
        }
        let stamp = timestamp.file_stamp();
        Some(Self {
            id: *timestamp,
            filtered_name: format!("{}_{}.csv", basename, stamp),
            raw_name: format!("{}_{}_raw.csv", basename, stamp),
        })
    }

    pub fn id(&self) -> &Timestamp {
        &self.id
    }

    /// Gated stream file name.
    pub fn filtered_name(&self) -> &str {
        &self.filtered_name
    }

    pub fn raw_name(&self) -> &str {
        &self.raw_name
    }
}
