use crate::config::ValidationConfig;
use crate::sensor::Reading;
use crate::widgets::{GaugeId, LabelId, WidgetSet};

/// Result of pushing one reading through the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// The reading failed validation and the widgets were left alone.
    Rejected,
}

/// Drops readings outside the physically plausible range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValidationGuard {
    pub max_temperature_celsius: f32,
    pub max_humidity_percent: f32,
}

impl Default for ValidationGuard {
    fn default() -> Self {
        ValidationConfig::default().into()
    }
}

impl From<ValidationConfig> for ValidationGuard {
    fn from(config: ValidationConfig) -> Self {
        Self {
            max_temperature_celsius: config.max_temperature_celsius,
            max_humidity_percent: config.max_humidity_percent,
        }
    }
}

impl ValidationGuard {
    /// NaN and infinities never pass.
    pub fn accepts(&self, reading: &Reading) -> bool {
        let t = reading.temperature_celsius;
        let h = reading.humidity_percent;

        t.is_finite()
            && h.is_finite()
            && t < self.max_temperature_celsius
            && h < self.max_humidity_percent
    }
}

pub fn format_temperature(value: i32) -> String {
    format!("{value}°C")
}

pub fn format_humidity(value: i32) -> String {
    format!("{value}%")
}

/// Rounds half away from zero, as the gauges and labels display it.
pub fn round_to_int(value: f32) -> i32 {
    value.round() as i32
}

/// Moves validated readings into the widget tree.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UpdatePipeline {
    guard: ValidationGuard,
}

impl UpdatePipeline {
    pub fn new(guard: ValidationGuard) -> Self {
        Self { guard }
    }

    /// Shows `reading` on the labels, gauges and chart.
    ///
    /// A rejected reading changes nothing, the screen keeps the last accepted
    /// values.
    pub fn apply<W: WidgetSet + ?Sized>(&self, reading: &Reading, widgets: &mut W) -> Outcome {
        if !self.guard.accepts(reading) {
            return Outcome::Rejected;
        }

        let temperature = round_to_int(reading.temperature_celsius);
        let humidity = round_to_int(reading.humidity_percent);

        widgets.set_label_text(LabelId::Temperature, &format_temperature(temperature));
        widgets.set_label_text(LabelId::Humidity, &format_humidity(humidity));

        widgets.set_gauge_value(GaugeId::Temperature, temperature);
        widgets.set_gauge_value(GaugeId::Humidity, humidity);

        widgets.append_chart(reading.temperature_celsius, reading.humidity_percent);

        Outcome::Applied
    }

    /// Puts gauges and labels into their initial state.
    ///
    /// Gauges are indicators only and stop reacting to touches. The chart
    /// keeps its history.
    pub fn reset<W: WidgetSet + ?Sized>(&self, widgets: &mut W) {
        for gauge in [GaugeId::Temperature, GaugeId::Humidity] {
            widgets.set_gauge_value(gauge, 0);
            widgets.set_gauge_clickable(gauge, false);
        }

        widgets.set_label_text(LabelId::Temperature, &format_temperature(0));
        widgets.set_label_text(LabelId::Humidity, &format_humidity(0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::{ChartPoint, DashboardWidgets, DisplayState, GaugeState};

    fn reset_widgets() -> DashboardWidgets {
        let mut widgets = DashboardWidgets::new(10);
        UpdatePipeline::default().reset(&mut widgets);
        widgets
    }

    #[test]
    fn shows_rounded_values() {
        let pipeline = UpdatePipeline::default();
        let mut widgets = reset_widgets();

        let outcome = pipeline.apply(&Reading::new(23.4, 55.6), &mut widgets);

        assert_eq!(outcome, Outcome::Applied);
        let state = widgets.state();
        assert_eq!(state.temperature_label, "23°C");
        assert_eq!(state.humidity_label, "56%");
        assert_eq!(state.temperature_gauge.value, 23);
        assert_eq!(state.humidity_gauge.value, 56);
        assert_eq!(
            widgets.chart().latest(),
            Some(&ChartPoint {
                temperature: 23.4,
                humidity: 55.6
            })
        );
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_to_int(22.5), 23);
        assert_eq!(round_to_int(-2.5), -3);
        assert_eq!(round_to_int(-0.4), 0);
        assert_eq!(format_temperature(round_to_int(-7.6)), "-8°C");
    }

    #[test]
    fn out_of_range_reading_changes_nothing() {
        let pipeline = UpdatePipeline::default();
        let mut widgets = reset_widgets();
        pipeline.apply(&Reading::new(21.0, 40.0), &mut widgets);
        let before = widgets.clone();

        for reading in [
            Reading::new(150.0, 40.0),
            Reading::new(100.0, 40.0),
            Reading::new(20.0, 101.0),
            Reading::new(f32::NAN, 40.0),
            Reading::new(20.0, f32::NAN),
            Reading::new(f32::NEG_INFINITY, 40.0),
        ] {
            assert_eq!(pipeline.apply(&reading, &mut widgets), Outcome::Rejected);
            assert_eq!(widgets, before);
        }
    }

    #[test]
    fn guard_compares_raw_values() {
        let guard = ValidationGuard::default();
        assert!(guard.accepts(&Reading::new(99.6, 100.9)));
        assert!(!guard.accepts(&Reading::new(100.0, 0.0)));
        assert!(guard.accepts(&Reading::new(-40.0, 0.0)));
    }

    #[test]
    fn applying_twice_shows_the_same() {
        let pipeline = UpdatePipeline::default();
        let mut once = reset_widgets();
        let mut twice = reset_widgets();
        let reading = Reading::new(18.7, 33.2);

        pipeline.apply(&reading, &mut once);
        pipeline.apply(&reading, &mut twice);
        pipeline.apply(&reading, &mut twice);

        assert_eq!(once.state(), twice.state());
    }

    #[test]
    fn reset_is_a_fixed_point() {
        let pipeline = UpdatePipeline::default();
        let expected = DisplayState {
            temperature_gauge: GaugeState {
                value: 0,
                clickable: false,
            },
            humidity_gauge: GaugeState {
                value: 0,
                clickable: false,
            },
            temperature_label: "0°C".into(),
            humidity_label: "0%".into(),
        };

        let mut widgets = DashboardWidgets::new(10);
        pipeline.reset(&mut widgets);
        assert_eq!(widgets.state(), &expected);

        pipeline.apply(&Reading::new(30.2, 70.0), &mut widgets);
        widgets.set_gauge_clickable(GaugeId::Temperature, true);
        pipeline.reset(&mut widgets);
        assert_eq!(widgets.state(), &expected);
        assert_eq!(widgets.chart().len(), 1);
    }

    #[test]
    fn custom_limits() {
        let pipeline = UpdatePipeline::new(ValidationGuard {
            max_temperature_celsius: 50.0,
            max_humidity_percent: 90.0,
        });
        let mut widgets = reset_widgets();

        assert_eq!(
            pipeline.apply(&Reading::new(55.0, 20.0), &mut widgets),
            Outcome::Rejected
        );
        assert_eq!(
            pipeline.apply(&Reading::new(45.0, 89.9), &mut widgets),
            Outcome::Applied
        );
        assert_eq!(widgets.state().humidity_label, "90%");
    }
}
