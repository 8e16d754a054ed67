use std::time::Duration;
use thiserror::Error;

use crate::receiver::ReceiverError;
use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("receiver error: {0}")]
    Receiver(#[from] ReceiverError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("no valid date/time from receiver within {}", humantime::format_duration(*.0))]
    StartupTimeout(Duration),
    #[error("interrupted before a session was established")]
    Interrupted,
    #[error("invalid utc offset: {0}h")]
    InvalidOffset(i32),
}
