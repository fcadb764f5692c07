//! Resistive touch panel input.
//!
//! The panel reports raw ADC coordinates. They are mapped linearly onto the
//! screen using a fixed calibration window before they reach the UI.

use crate::config::{DisplayConfig, TouchConfig};
use crate::render::InputSource;

/// Raw panel state as reported by the controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TouchSample {
    pub pressed: bool,
    pub x: i32,
    pub y: i32,
}

/// Position in screen pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Pointer state after calibration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputState {
    Released,
    Pressed(ScreenPoint),
}

/// Integer linear interpolation of `value` from one range onto another.
///
/// Values outside the input range extrapolate. The division truncates toward
/// zero. An empty input range maps everything onto `out_min`.
pub fn map_range(value: i32, in_min: i32, in_max: i32, out_min: i32, out_max: i32) -> i32 {
    if in_min == in_max {
        return out_min;
    }
    let scaled = (value as i64 - in_min as i64) * (out_max as i64 - out_min as i64)
        / (in_max as i64 - in_min as i64);
    (scaled + out_min as i64) as i32
}

/// Maps the raw panel window onto `[1, width] x [1, height]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchCalibration {
    raw_x: (i32, i32),
    raw_y: (i32, i32),
    width: i32,
    height: i32,
    clamp: bool,
}

impl Default for TouchCalibration {
    fn default() -> Self {
        Self::from_config(&TouchConfig::default(), &DisplayConfig::default())
    }
}

impl TouchCalibration {
    pub fn from_config(touch: &TouchConfig, display: &DisplayConfig) -> Self {
        Self {
            raw_x: (touch.raw_x_min, touch.raw_x_max),
            raw_y: (touch.raw_y_min, touch.raw_y_max),
            width: display.width.clamp(1, i32::MAX as u32) as i32,
            height: display.height.clamp(1, i32::MAX as u32) as i32,
            clamp: touch.clamp,
        }
    }

    /// Plain linear mapping, extrapolating outside the calibration window.
    pub fn map(&self, raw_x: i32, raw_y: i32) -> ScreenPoint {
        ScreenPoint {
            x: map_range(raw_x, self.raw_x.0, self.raw_x.1, 1, self.width),
            y: map_range(raw_y, self.raw_y.0, self.raw_y.1, 1, self.height),
        }
    }

    pub fn map_clamped(&self, raw_x: i32, raw_y: i32) -> ScreenPoint {
        let point = self.map(raw_x, raw_y);
        ScreenPoint {
            x: point.x.clamp(1, self.width),
            y: point.y.clamp(1, self.height),
        }
    }

    /// Maps a sample the way the calibration is configured to.
    pub fn to_screen(&self, sample: &TouchSample) -> ScreenPoint {
        if self.clamp {
            self.map_clamped(sample.x, sample.y)
        } else {
            self.map(sample.x, sample.y)
        }
    }
}

/// A touch controller that is polled for its state.
pub trait TouchSurface {
    fn touched(&mut self) -> bool;

    /// Raw coordinates of the current touch. Only meaningful while touched.
    fn raw_point(&mut self) -> (i32, i32);
}

/// Calibrated pointer input on top of a [`TouchSurface`].
pub struct TouchInput<T> {
    surface: T,
    calibration: TouchCalibration,
}

impl<T: TouchSurface> TouchInput<T> {
    pub fn new(surface: T, calibration: TouchCalibration) -> Self {
        Self {
            surface,
            calibration,
        }
    }

    pub fn sample(&mut self) -> TouchSample {
        if !self.surface.touched() {
            return TouchSample::default();
        }

        let (x, y) = self.surface.raw_point();
        TouchSample {
            pressed: true,
            x,
            y,
        }
    }
}

impl<T: TouchSurface> InputSource for TouchInput<T> {
    fn read(&mut self) -> InputState {
        let sample = self.sample();
        if !sample.pressed {
            return InputState::Released;
        }

        let point = self.calibration.to_screen(&sample);
        log::debug!("Data x {}", point.x);
        log::debug!("Data y {}", point.y);

        InputState::Pressed(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Panel {
        touches: Vec<Option<(i32, i32)>>,
        current: Option<(i32, i32)>,
    }

    impl TouchSurface for Panel {
        fn touched(&mut self) -> bool {
            self.current = if self.touches.is_empty() {
                None
            } else {
                self.touches.remove(0)
            };
            self.current.is_some()
        }

        fn raw_point(&mut self) -> (i32, i32) {
            self.current.unwrap_or_default()
        }
    }

    #[test]
    fn calibration_window_maps_onto_screen_edges() {
        let calibration = TouchCalibration::default();

        assert_eq!(calibration.map(200, 240), ScreenPoint::new(1, 1));
        assert_eq!(calibration.map(3700, 3800), ScreenPoint::new(320, 240));
        assert_eq!(calibration.map(1950, 2020), ScreenPoint::new(160, 120));
    }

    #[test]
    fn outside_window_extrapolates() {
        let calibration = TouchCalibration::default();

        assert_eq!(calibration.map(100, 240).x, -8);
        assert_eq!(calibration.map(4000, 240).x, 347);
    }

    #[test]
    fn clamped_mapping_stays_on_screen() {
        let calibration = TouchCalibration::default();

        assert_eq!(calibration.map_clamped(100, 4095), ScreenPoint::new(1, 240));
        assert_eq!(calibration.map_clamped(4000, 0), ScreenPoint::new(320, 1));
        assert_eq!(calibration.map_clamped(200, 240), calibration.map(200, 240));
    }

    #[test]
    fn clamp_flag_selects_mapping() {
        let mut calibration = TouchCalibration::default();
        let sample = TouchSample {
            pressed: true,
            x: 4000,
            y: 240,
        };

        assert_eq!(calibration.to_screen(&sample).x, 320);
        calibration.clamp = false;
        assert_eq!(calibration.to_screen(&sample).x, 347);
    }

    #[test]
    fn degenerate_calibration_does_not_panic() {
        let touch = TouchConfig {
            raw_x_min: 500,
            raw_x_max: 500,
            raw_y_min: 0,
            raw_y_max: 0,
            clamp: true,
        };
        let display = DisplayConfig {
            width: 0,
            height: 0,
            ..DisplayConfig::default()
        };
        let calibration = TouchCalibration::from_config(&touch, &display);

        assert_eq!(calibration.map(1000, 1000), ScreenPoint::new(1, 1));
        assert_eq!(calibration.map_clamped(-5, 4095), ScreenPoint::new(1, 1));
        assert_eq!(map_range(7, 3, 3, 10, 20), 10);
    }

    #[test]
    fn inverted_range() {
        assert_eq!(map_range(0, 0, 100, 100, 0), 100);
        assert_eq!(map_range(25, 0, 100, 100, 0), 75);
    }

    #[test]
    fn touch_input_reports_calibrated_points() {
        let panel = Panel {
            touches: vec![None, Some((3700, 3800)), Some((200, 240)), None],
            current: None,
        };
        let mut input = TouchInput::new(panel, TouchCalibration::default());

        assert_eq!(input.read(), InputState::Released);
        assert_eq!(input.read(), InputState::Pressed(ScreenPoint::new(320, 240)));
        assert_eq!(input.read(), InputState::Pressed(ScreenPoint::new(1, 1)));
        assert_eq!(input.read(), InputState::Released);
    }
}
