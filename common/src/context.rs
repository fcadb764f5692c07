use std::thread::JoinHandle;

use crate::config::DashboardConfig;
use crate::pipeline::{Outcome, UpdatePipeline, ValidationGuard};
use crate::sensor::{Sensor, SensorReader};
use crate::SharedDisplay;

/// Everything the dashboard shares, built once at startup.
#[derive(Clone)]
pub struct AppContext {
    pub config: DashboardConfig,
    pub display: SharedDisplay,
    pub pipeline: UpdatePipeline,
}

impl AppContext {
    pub fn new(config: DashboardConfig) -> Self {
        let display = SharedDisplay::new(config.chart.points);
        let pipeline = UpdatePipeline::new(ValidationGuard::from(config.validation));

        Self {
            config,
            display,
            pipeline,
        }
    }

    /// Brings the widgets into their initial state. Call before the loops
    /// start.
    pub fn reset(&self) {
        self.display.update(|widgets| self.pipeline.reset(widgets));
    }

    /// One sensor cycle: read, validate, show.
    pub fn sensor_cycle<S: Sensor>(&self, reader: &mut SensorReader<S>) -> Outcome {
        let reading = reader.read();
        self.display
            .update(|widgets| self.pipeline.apply(&reading, widgets))
    }

    /// Runs [`Self::sensor_cycle`] on its own thread, once per configured
    /// sensor period, forever.
    pub fn spawn_sensor_task<S>(&self, sensor: S) -> std::io::Result<JoinHandle<()>>
    where
        S: Sensor + Send + 'static,
    {
        let context = self.clone();
        let period = self.config.sensor_period();

        std::thread::Builder::new()
            .name("sensor".into())
            .stack_size(32 * 1024)
            .spawn(move || {
                let mut reader = SensorReader::new(sensor);
                log::info!("Sensor task started, period {period:?}");
                loop {
                    context.sensor_cycle(&mut reader);
                    std::thread::sleep(period);
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::SimulatedSensor;
    use std::time::{Duration, Instant};

    struct Sequence(Vec<(f32, f32)>, usize);

    impl Sensor for Sequence {
        fn read_temperature(&mut self) -> f32 {
            self.0[self.1].0
        }

        fn read_humidity(&mut self) -> f32 {
            let h = self.0[self.1].1;
            self.1 = (self.1 + 1).min(self.0.len() - 1);
            h
        }
    }

    #[test]
    fn sensor_cycle_keeps_last_valid_reading() {
        let context = AppContext::new(DashboardConfig::default());
        context.reset();

        let mut reader = SensorReader::new(Sequence(
            vec![(21.2, 45.5), (f32::NAN, 50.0), (150.0, 40.0)],
            0,
        ));

        assert_eq!(context.sensor_cycle(&mut reader), Outcome::Applied);
        assert_eq!(context.sensor_cycle(&mut reader), Outcome::Rejected);
        assert_eq!(context.sensor_cycle(&mut reader), Outcome::Rejected);

        let widgets = context.display.snapshot();
        assert_eq!(widgets.state().temperature_label, "21°C");
        assert_eq!(widgets.state().humidity_label, "46%");
        assert_eq!(widgets.chart().len(), 1);
    }

    #[test]
    fn sensor_task_feeds_display() {
        let mut config = DashboardConfig::default();
        config.sensor.period_ms = 1;
        let context = AppContext::new(config);
        context.reset();

        context
            .spawn_sensor_task(SimulatedSensor::new(0))
            .unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while context.display.snapshot().chart().is_empty() {
            assert!(Instant::now() < deadline, "sensor task never produced a reading");
            std::thread::sleep(Duration::from_millis(1));
        }

        assert_ne!(context.display.snapshot().state().temperature_label, "0°C");
    }
}
