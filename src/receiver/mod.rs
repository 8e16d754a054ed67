mod epoch;
mod replay;

pub use epoch::{utc_offset, RawEpoch};
pub use replay::ReplayReceiver;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReceiverError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {source}")]
    Decode {
        line: usize,
        source: serde_json::Error,
    },
    #[error("no more epochs")]
    Exhausted,
}

/// Source of navigation epochs, polled once per tick.
pub trait Receiver {
    /// Pulls whatever the receiver buffered since the last call.
    fn refresh(&mut self) -> Result<(), ReceiverError>;

    /// Most recent epoch, if any was received yet.
    fn latest(&self) -> Option<&RawEpoch>;
}
