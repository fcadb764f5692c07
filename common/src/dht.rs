//! Decoding of the single-wire DHT11/DHT22 protocol.
//!
//! The sensor answers a start pulse with 40 bits: two bytes humidity, two
//! bytes temperature and one checksum byte. Reading the bits off the wire is
//! board specific and lives behind [`DhtBus`]; everything after that is here.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::sensor::Sensor;

/// Number of bytes in one sensor frame.
pub const FRAME_LEN: usize = 5;

pub type Frame = [u8; FRAME_LEN];

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DhtModel {
    Dht11,
    #[default]
    Dht22,
}

impl DhtModel {
    /// The sensor refuses to measure more often than this.
    pub fn min_interval(self) -> Duration {
        match self {
            DhtModel::Dht11 => Duration::from_secs(1),
            DhtModel::Dht22 => Duration::from_secs(2),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DhtError {
    /// The line did not change level in time.
    Timeout,
    /// The fifth byte does not match the sum of the first four.
    ChecksumMismatch,
}

impl std::fmt::Display for DhtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DhtError::Timeout => write!(f, "sensor did not answer in time"),
            DhtError::ChecksumMismatch => write!(f, "frame checksum mismatch"),
        }
    }
}

impl std::error::Error for DhtError {}

/// Decodes a raw frame into `(temperature °C, humidity %RH)`.
pub fn decode(model: DhtModel, frame: &Frame) -> Result<(f32, f32), DhtError> {
    let sum = frame[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    if sum != frame[4] {
        return Err(DhtError::ChecksumMismatch);
    }

    match model {
        DhtModel::Dht22 => {
            let humidity = u16::from_be_bytes([frame[0], frame[1]]) as f32 / 10.0;

            let mut temperature = u16::from_be_bytes([frame[2] & 0x7F, frame[3]]) as f32 / 10.0;
            if frame[2] & 0x80 != 0 {
                temperature = -temperature;
            }

            Ok((temperature, humidity))
        }
        DhtModel::Dht11 => {
            let humidity = frame[0] as f32 + frame[1] as f32 / 10.0;

            let mut temperature = frame[2] as f32 + (frame[3] & 0x0F) as f32 / 10.0;
            if frame[3] & 0x80 != 0 {
                temperature = -temperature;
            }

            Ok((temperature, humidity))
        }
    }
}

/// Board-specific access to the data line.
pub trait DhtBus {
    /// Triggers one measurement and clocks in the resulting frame.
    fn read_frame(&mut self) -> Result<Frame, DhtError>;
}

/// A DHT sensor on top of a [`DhtBus`].
///
/// Temperature and humidity are queried separately but come out of the same
/// frame. Only a temperature query measures again, and only once the model's
/// minimum sampling interval has passed; humidity is served from the frame the
/// preceding temperature query used. Failed reads show up as NaN.
pub struct DhtSensor<B> {
    bus: B,
    model: DhtModel,
    last: Option<(Instant, Result<(f32, f32), DhtError>)>,
}

impl<B: DhtBus> DhtSensor<B> {
    pub fn new(bus: B, model: DhtModel) -> Self {
        Self {
            bus,
            model,
            last: None,
        }
    }

    fn sample(&mut self, may_refresh: bool) -> Option<(f32, f32)> {
        match self.last {
            Some((at, result)) if !may_refresh || at.elapsed() < self.model.min_interval() => {
                result.ok()
            }
            _ => self.measure(),
        }
    }

    fn measure(&mut self) -> Option<(f32, f32)> {
        let result = self
            .bus
            .read_frame()
            .and_then(|frame| decode(self.model, &frame));

        if let Err(e) = result {
            log::warn!("Error reading {:?}: {e}", self.model);
        }

        self.last = Some((Instant::now(), result));
        result.ok()
    }
}

impl<B: DhtBus> Sensor for DhtSensor<B> {
    fn read_temperature(&mut self) -> f32 {
        self.sample(true).map_or(f32::NAN, |(temperature, _)| temperature)
    }

    fn read_humidity(&mut self) -> f32 {
        self.sample(false).map_or(f32::NAN, |(_, humidity)| humidity)
    }
}
