use serde::{Deserialize, Serialize};

use crate::dht::DhtModel;

/// Sensor selection and polling cadence.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SensorConfig {
    pub model: DhtModel,

    /// GPIO number of the single-wire data line.
    pub pin: i32,

    /// Delay between two sensor cycles in milliseconds.
    pub period_ms: u64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            model: DhtModel::Dht22,
            pin: 23,
            period_ms: 100,
        }
    }
}

/// Upper bounds of a plausible reading. Values at or above them are dropped.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct ValidationConfig {
    pub max_temperature_celsius: f32,
    pub max_humidity_percent: f32,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_temperature_celsius: 100.0,
            max_humidity_percent: 101.0,
        }
    }
}

/// Raw ADC window of the resistive panel that maps onto the screen.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct TouchConfig {
    pub raw_x_min: i32,
    pub raw_x_max: i32,
    pub raw_y_min: i32,
    pub raw_y_max: i32,

    /// Keep remapped points inside the screen.
    pub clamp: bool,
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self {
            raw_x_min: 200,
            raw_x_max: 3700,
            raw_y_min: 240,
            raw_y_max: 3800,
            clamp: true,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,

    /// Period of the render/event loop in milliseconds.
    pub loop_period_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            loop_period_ms: 5,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct ChartConfig {
    /// Number of points the chart keeps before it drops the oldest one.
    pub points: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self { points: 10 }
    }
}

/// The complete dashboard configuration.
///
/// Every section falls back to its default, so a JSON document only needs to
/// name the values it changes.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub sensor: SensorConfig,
    pub validation: ValidationConfig,
    pub touch: TouchConfig,
    pub display: DisplayConfig,
    pub chart: ChartConfig,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(&'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read configuration: {e}"),
            ConfigError::Parse(e) => write!(f, "malformed configuration: {e}"),
            ConfigError::Invalid(reason) => write!(f, "invalid configuration: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl DashboardConfig {
    /// The configuration shipped with the firmware.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_json(std::include_str!("./default_config.json"))
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config = serde_json::from_str::<Self>(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Rejects values the rest of the system cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.touch.raw_x_min == self.touch.raw_x_max
            || self.touch.raw_y_min == self.touch.raw_y_max
        {
            return Err(ConfigError::Invalid("touch raw range is empty"));
        }
        if self.display.width == 0 || self.display.height == 0 {
            return Err(ConfigError::Invalid("display has no pixels"));
        }
        if self.chart.points == 0 {
            return Err(ConfigError::Invalid("chart needs at least one point"));
        }
        if self.sensor.period_ms == 0 || self.display.loop_period_ms == 0 {
            return Err(ConfigError::Invalid("periods must be non-zero"));
        }
        Ok(())
    }

    pub fn sensor_period(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.sensor.period_ms)
    }

    pub fn loop_period(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.display.loop_period_ms)
    }
}
