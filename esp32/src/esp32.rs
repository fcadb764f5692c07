extern crate alloc;

use alloc::rc::Rc;

use climate_dashboard_common::render::{Area, FlushSink, Frontend, PointerEvent};
use climate_dashboard_common::widgets::{DashboardWidgets, Series};
use slint::platform::software_renderer::{LineBufferProvider, MinimalSoftwareWindow, Rgb565Pixel};
use slint::platform::{PointerEventButton, WindowEvent};

use crate::AppWindow;

pub struct EspPlatform {
    window: Rc<MinimalSoftwareWindow>,
    started: std::time::Instant,
}

impl EspPlatform {
    /// Create a new instance of the platform
    pub fn new(window: Rc<MinimalSoftwareWindow>) -> std::boxed::Box<Self> {
        std::boxed::Box::new(Self {
            window,
            started: std::time::Instant::now(),
        })
    }
}

impl slint::platform::Platform for EspPlatform {
    fn create_window_adapter(
        &self,
    ) -> Result<Rc<dyn slint::platform::WindowAdapter>, slint::PlatformError> {
        // Since on MCUs, there can be only one window, just return a clone of self.window.
        // We'll also use the same window in the render loop.
        Ok(self.window.clone())
    }

    fn duration_since_start(&self) -> core::time::Duration {
        self.started.elapsed()
    }
}

/// The Slint window as seen by the render loop.
///
/// Only one display line is held in memory. The renderer fills it line by line
/// and every line goes out to the panel before the next one is drawn.
pub struct SlintFrontend {
    ui: AppWindow,
    window: Rc<MinimalSoftwareWindow>,
    buffer: Vec<Rgb565Pixel>,
    line: Vec<u16>,
}

impl SlintFrontend {
    pub fn new(ui: AppWindow, window: Rc<MinimalSoftwareWindow>, width: u32) -> Self {
        let width = width as usize;
        Self {
            ui,
            window,
            buffer: vec![Rgb565Pixel(0x0); width],
            line: Vec::with_capacity(width),
        }
    }
}

/// Hands each rendered line to a [`FlushSink`].
struct LineFlush<'a, S: ?Sized> {
    sink: &'a mut S,
    buffer: &'a mut [Rgb565Pixel],
    line: &'a mut Vec<u16>,
}

impl<S: FlushSink + ?Sized> LineBufferProvider for &mut LineFlush<'_, S> {
    type TargetPixel = Rgb565Pixel;

    fn process_line(
        &mut self,
        line: usize,
        range: core::ops::Range<usize>,
        render_fn: impl FnOnce(&mut [Rgb565Pixel]),
    ) {
        let buffer = &mut self.buffer[range.clone()];
        render_fn(buffer);

        self.line.clear();
        self.line.extend(buffer.iter().map(|p| p.0));

        self.sink.flush(
            Area::new(range.start as i32, line as i32, range.len() as u32, 1),
            self.line.as_slice(),
        );
    }
}

impl Frontend for SlintFrontend {
    fn dispatch(&mut self, event: PointerEvent) {
        let position = |p: climate_dashboard_common::touch::ScreenPoint| {
            slint::LogicalPosition::new(p.x as f32, p.y as f32)
        };

        let event = match event {
            PointerEvent::Pressed(p) => {
                log::info!("Touchpad pressed: {p:?}");
                WindowEvent::PointerPressed {
                    position: position(p),
                    button: PointerEventButton::Left,
                }
            }
            PointerEvent::Moved(p) => WindowEvent::PointerMoved {
                position: position(p),
            },
            PointerEvent::Released(p) => WindowEvent::PointerReleased {
                position: position(p),
                button: PointerEventButton::Left,
            },
            PointerEvent::Exited => WindowEvent::PointerExited,
        };

        self.window.dispatch_event(event);
    }

    fn sync(&mut self, widgets: &DashboardWidgets) {
        let ui = &self.ui;
        let state = widgets.state();

        ui.set_temperature_gauge(state.temperature_gauge.value);
        ui.set_humidity_gauge(state.humidity_gauge.value);
        ui.set_temperature_gauge_clickable(state.temperature_gauge.clickable);
        ui.set_humidity_gauge_clickable(state.humidity_gauge.clickable);

        ui.set_temperature_label(state.temperature_label.as_str().into());
        ui.set_humidity_label(state.humidity_label.as_str().into());

        let chart = widgets.chart();
        ui.set_temperature_path(chart.path_commands(Series::Temperature).into());
        ui.set_humidity_path(chart.path_commands(Series::Humidity).into());
        ui.set_status(slint::format!("{} points", chart.len()));
    }

    fn redraw(&mut self, sink: &mut dyn FlushSink) -> bool {
        slint::platform::update_timers_and_animations();

        let mut lines = LineFlush {
            sink,
            buffer: self.buffer.as_mut_slice(),
            line: &mut self.line,
        };

        // Draw the scene if something needs to be drawn.
        self.window.draw_if_needed(|renderer| {
            renderer.render_by_line(&mut lines);
        })
    }
}
