use serde::{Deserialize, Deserializer};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gate: GateConfig,
    pub estimator: EstimatorConfig,
    pub logging: LoggingConfig,
    pub receiver: ReceiverConfig,
    pub runtime: RuntimeConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    pub max_hdop: f32,
    pub min_satellites: u8,
    #[serde(deserialize_with = "deserialize_duration")]
    pub recovery_cooldown: Duration,
    /// Positions closer than this to the equator or prime meridian are
    /// treated as uninitialized receiver output.
    pub min_abs_degrees: f64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            max_hdop: 6.0,
            min_satellites: 5,
            recovery_cooldown: Duration::from_millis(5000),
            min_abs_degrees: 0.001,
        }
    }
}

/// How the longitude channel forms its Kalman gain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GainCoupling {
    /// Every channel uses its own covariance.
    #[default]
    Independent,
    /// Longitude divides by the latitude covariance, as the handheld firmware
    /// did. Only useful to reproduce old logs bit for bit.
    Legacy,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    pub gain_coupling: GainCoupling,
    /// Re-seed the filters after this long without a trusted fix.
    /// Unset keeps the filter memory for the whole session.
    #[serde(deserialize_with = "deserialize_optional_duration")]
    pub reset_after: Option<Duration>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: PathBuf,
    pub basename: String,
    pub create_directory: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            basename: "gnss_csv_data".to_string(),
            create_directory: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReceiverConfig {
    /// Fixed offset added to the receiver's UTC output. Not DST aware.
    pub utc_offset_hours: i32,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: 9,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    #[serde(deserialize_with = "deserialize_duration")]
    pub tick_interval: Duration,
    #[serde(deserialize_with = "deserialize_duration")]
    pub startup_timeout: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(100),
            startup_timeout: Duration::from_secs(600),
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(-12..=14).contains(&self.receiver.utc_offset_hours) {
            return Err(ConfigError::Invalid(format!(
                "utc_offset_hours out of range: {}",
                self.receiver.utc_offset_hours
            )));
        }
        if self.runtime.tick_interval.is_zero() {
            return Err(ConfigError::Invalid("tick_interval must be non-zero".into()));
        }
        if self.logging.basename.is_empty() || self.logging.basename.contains(['/', '\\']) {
            return Err(ConfigError::Invalid(format!(
                "basename must be a plain file name prefix: {:?}",
                self.logging.basename
            )));
        }
        if !(self.gate.max_hdop > 0.0) {
            return Err(ConfigError::Invalid("max_hdop must be positive".into()));
        }
        Ok(())
    }
}

fn parse_duration(s: &str) -> Result<Duration, String> {
    humantime::parse_duration(s.trim()).map_err(|e| e.to_string())
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_duration(&s).map_err(serde::de::Error::custom)
}

fn deserialize_optional_duration<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|s| parse_duration(&s))
        .transpose()
        .map_err(serde::de::Error::custom)
}
