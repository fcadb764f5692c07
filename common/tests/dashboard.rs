use std::time::Duration;

use climate_dashboard_common::render::{Area, EventLoop, FlushSink, Frontend, PointerEvent};
use climate_dashboard_common::touch::{ScreenPoint, TouchCalibration, TouchInput, TouchSurface};
use climate_dashboard_common::widgets::{ChartPoint, DashboardWidgets};
use climate_dashboard_common::{
    AppContext, DashboardConfig, Outcome, Reading, Sensor, SensorReader,
};

struct Scripted(Vec<(f32, f32)>);

impl Sensor for Scripted {
    fn read_temperature(&mut self) -> f32 {
        self.0[0].0
    }

    fn read_humidity(&mut self) -> f32 {
        let (_, h) = self.0.remove(0);
        h
    }
}

struct Panel(Vec<Option<(i32, i32)>>, Option<(i32, i32)>);

impl TouchSurface for Panel {
    fn touched(&mut self) -> bool {
        self.1 = if self.0.is_empty() { None } else { self.0.remove(0) };
        self.1.is_some()
    }

    fn raw_point(&mut self) -> (i32, i32) {
        self.1.unwrap_or_default()
    }
}

#[derive(Default)]
struct PanelBuffer {
    flushed: Vec<Area>,
}

impl FlushSink for PanelBuffer {
    fn flush(&mut self, area: Area, pixels: &[u16]) {
        assert_eq!(pixels.len(), area.pixel_count());
        self.flushed.push(area);
    }
}

#[derive(Default)]
struct Screen {
    labels: (String, String),
    gauges: (i32, i32),
    clickable: (bool, bool),
    chart: Vec<ChartPoint>,
    pointer: Vec<PointerEvent>,
    dirty: bool,
}

impl Frontend for Screen {
    fn dispatch(&mut self, event: PointerEvent) {
        self.pointer.push(event);
    }

    fn sync(&mut self, widgets: &DashboardWidgets) {
        let state = widgets.state();
        self.labels = (
            state.temperature_label.clone(),
            state.humidity_label.clone(),
        );
        self.gauges = (state.temperature_gauge.value, state.humidity_gauge.value);
        self.clickable = (
            state.temperature_gauge.clickable,
            state.humidity_gauge.clickable,
        );
        self.chart = widgets.chart().points().copied().collect();
        self.dirty = true;
    }

    fn redraw(&mut self, sink: &mut dyn FlushSink) -> bool {
        if !std::mem::take(&mut self.dirty) {
            return false;
        }
        let line = [0u16; 64];
        for y in 0..4 {
            sink.flush(Area::new(100, y, 64, 1), &line);
        }
        true
    }
}

#[test]
fn readings_reach_the_screen() {
    let config = DashboardConfig::default();
    let context = AppContext::new(config.clone());
    context.reset();

    let calibration = TouchCalibration::from_config(&config.touch, &config.display);
    let input = TouchInput::new(Panel(vec![None, Some((1950, 2020)), None], None), calibration);
    let mut event_loop = EventLoop::new(
        input,
        PanelBuffer::default(),
        context.display.clone(),
        config.loop_period(),
    );
    let mut screen = Screen::default();

    event_loop.tick(&mut screen);
    assert_eq!(screen.labels, ("0°C".to_string(), "0%".to_string()));
    assert_eq!(screen.gauges, (0, 0));
    assert_eq!(screen.clickable, (false, false));

    let mut reader = SensorReader::new(Scripted(vec![(23.4, 55.6), (150.0, 40.0)]));

    assert_eq!(context.sensor_cycle(&mut reader), Outcome::Applied);
    event_loop.tick(&mut screen);
    assert_eq!(screen.labels, ("23°C".to_string(), "56%".to_string()));
    assert_eq!(screen.gauges, (23, 56));
    assert_eq!(
        screen.chart,
        vec![ChartPoint {
            temperature: 23.4,
            humidity: 55.6
        }]
    );
    assert_eq!(
        screen.pointer,
        vec![
            PointerEvent::Moved(ScreenPoint::new(160, 120)),
            PointerEvent::Pressed(ScreenPoint::new(160, 120)),
        ]
    );

    assert_eq!(context.sensor_cycle(&mut reader), Outcome::Rejected);
    let summary = event_loop.tick(&mut screen);
    assert!(!summary.synced);
    assert!(!summary.redrawn);
    assert_eq!(summary.events, 2);
    assert_eq!(screen.labels, ("23°C".to_string(), "56%".to_string()));

    assert_eq!(event_loop.sink().flushed.len(), 8);
}

#[test]
fn reset_overrides_previous_state() {
    let context = AppContext::new(DashboardConfig::default());
    context
        .display
        .update(|w| context.pipeline.apply(&Reading::new(40.0, 80.0), w));

    context.reset();

    let widgets = context.display.snapshot();
    assert_eq!(widgets.state().temperature_label, "0°C");
    assert_eq!(widgets.state().humidity_label, "0%");
    assert_eq!(widgets.state().temperature_gauge.value, 0);
    assert!(!widgets.state().humidity_gauge.clickable);
    assert_eq!(widgets.chart().len(), 1);
}

#[test]
fn loop_period_comes_from_config() {
    let config = DashboardConfig::from_json(r#"{ "display": { "loop_period_ms": 16 } }"#).unwrap();
    assert_eq!(config.loop_period(), Duration::from_millis(16));
}
