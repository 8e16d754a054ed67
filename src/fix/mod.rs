mod sample;
mod types;

pub use sample::{FixSample, Smoothed};
pub use types::{Coordinate, FixType, Timestamp};
