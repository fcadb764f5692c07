use std::time::{Duration, Instant};

/// One sampled temperature/humidity pair.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Reading {
    pub temperature_celsius: f32,
    pub humidity_percent: f32,
    /// Time since the reader was created.
    pub when: Duration,
}

impl Reading {
    pub fn new(temperature_celsius: f32, humidity_percent: f32) -> Self {
        Self {
            temperature_celsius,
            humidity_percent,
            when: Duration::ZERO,
        }
    }
}

/// A temperature/humidity sensor.
///
/// A driver that fails to measure returns a value the validation guard will
/// drop (usually NaN) instead of an error.
pub trait Sensor {
    fn read_temperature(&mut self) -> f32;
    fn read_humidity(&mut self) -> f32;
}

impl<S: Sensor + ?Sized> Sensor for Box<S> {
    fn read_temperature(&mut self) -> f32 {
        (**self).read_temperature()
    }

    fn read_humidity(&mut self) -> f32 {
        (**self).read_humidity()
    }
}

/// Turns a [`Sensor`] into a stream of timestamped [`Reading`]s.
pub struct SensorReader<S> {
    sensor: S,
    started: Instant,
}

impl<S: Sensor> SensorReader<S> {
    pub fn new(sensor: S) -> Self {
        Self {
            sensor,
            started: Instant::now(),
        }
    }

    pub fn read(&mut self) -> Reading {
        let temperature_celsius = self.sensor.read_temperature();
        let humidity_percent = self.sensor.read_humidity();

        log::debug!("Temp: {temperature_celsius:.2}°C, Hum: {humidity_percent:.2}%");

        Reading {
            temperature_celsius,
            humidity_percent,
            when: self.started.elapsed(),
        }
    }
}

/// Sensor stand-in for the desktop simulator.
///
/// Temperature and humidity drift slowly around a room climate. Every
/// `fault_every`-th sample is broken, alternating between NaN and a value far
/// out of range, the two ways a real driver reports trouble.
pub struct SimulatedSensor {
    tick: u32,
    fault_every: u32,
}

impl SimulatedSensor {
    pub fn new(fault_every: u32) -> Self {
        Self {
            tick: 0,
            fault_every,
        }
    }

    fn faulty(&self) -> Option<f32> {
        if self.fault_every == 0 || self.tick == 0 || self.tick % self.fault_every != 0 {
            return None;
        }
        if (self.tick / self.fault_every) % 2 == 1 {
            Some(f32::NAN)
        } else {
            Some(150.0)
        }
    }
}

impl Default for SimulatedSensor {
    fn default() -> Self {
        Self::new(50)
    }
}

impl Sensor for SimulatedSensor {
    fn read_temperature(&mut self) -> f32 {
        let phase = self.tick as f32 / 40.0;
        self.faulty()
            .unwrap_or(22.5 + 3.5 * phase.sin() + 0.4 * (phase * 3.1).cos())
    }

    /// Advances the simulation, one cycle reads temperature first.
    fn read_humidity(&mut self) -> f32 {
        let phase = self.tick as f32 / 55.0;
        let value = self
            .faulty()
            .map(|_| 40.0)
            .unwrap_or(52.0 + 12.0 * phase.cos());
        self.tick = self.tick.wrapping_add(1);
        value
    }
}
