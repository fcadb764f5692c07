//! The cooperative render/event loop.
//!
//! Each tick polls the pointer, mirrors a changed [`SharedDisplay`] into the
//! UI and lets the UI redraw whatever became dirty. Hardware is reached only
//! through [`InputSource`] and [`FlushSink`], so the loop runs unchanged
//! against fakes.

use std::time::Duration;

use crate::touch::{InputState, ScreenPoint};
use crate::widgets::DashboardWidgets;
use crate::SharedDisplay;

/// A rectangle on the screen, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Area {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Area {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Destination of rendered pixels.
pub trait FlushSink {
    /// Writes `pixels` (RGB565, row-major, `area.pixel_count()` long) into
    /// `area`.
    ///
    /// Returning is the acknowledgment that the region is on the panel. The
    /// caller never requests the next region before that.
    fn flush(&mut self, area: Area, pixels: &[u16]);
}

/// Source of pointer input, already in screen coordinates.
pub trait InputSource {
    fn read(&mut self) -> InputState;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEvent {
    Pressed(ScreenPoint),
    Moved(ScreenPoint),
    Released(ScreenPoint),
    Exited,
}

/// Turns polled pointer states into press/move/release transitions.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerTracker {
    down: bool,
    last_position: ScreenPoint,
}

impl PointerTracker {
    /// Feeds one polled state and hands the resulting events to `dispatch`.
    pub fn track(&mut self, state: InputState, mut dispatch: impl FnMut(PointerEvent)) {
        match state {
            InputState::Pressed(position) => {
                if !self.down || position != self.last_position {
                    dispatch(PointerEvent::Moved(position));
                }
                if !self.down {
                    dispatch(PointerEvent::Pressed(position));
                }
                self.last_position = position;
                self.down = true;
            }
            InputState::Released if self.down => {
                dispatch(PointerEvent::Released(self.last_position));
                dispatch(PointerEvent::Exited);
                self.down = false;
            }
            InputState::Released => {}
        }
    }
}

/// The UI side of the loop: input handling and the redraw step.
pub trait Frontend {
    fn dispatch(&mut self, event: PointerEvent);

    /// Copies the widget model into the UI.
    fn sync(&mut self, widgets: &DashboardWidgets);

    /// Renders dirty regions into `sink`. Returns whether anything was drawn.
    fn redraw(&mut self, sink: &mut dyn FlushSink) -> bool;
}

/// What a single tick did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub events: usize,
    pub synced: bool,
    pub redrawn: bool,
}

pub struct EventLoop<I, S> {
    input: I,
    sink: S,
    display: SharedDisplay,
    pointer: PointerTracker,
    seen_revision: Option<u64>,
    period: Duration,
}

impl<I: InputSource, S: FlushSink> EventLoop<I, S> {
    pub fn new(input: I, sink: S, display: SharedDisplay, period: Duration) -> Self {
        Self {
            input,
            sink,
            display,
            pointer: PointerTracker::default(),
            seen_revision: None,
            period,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn tick<F: Frontend + ?Sized>(&mut self, frontend: &mut F) -> TickSummary {
        let mut summary = TickSummary::default();

        let state = self.input.read();
        self.pointer.track(state, |event| {
            frontend.dispatch(event);
            summary.events += 1;
        });

        if let Some(widgets) = self.display.changed_since(&mut self.seen_revision) {
            frontend.sync(&widgets);
            summary.synced = true;
        }

        summary.redrawn = frontend.redraw(&mut self.sink);
        summary
    }

    /// Ticks forever, sleeping one period between ticks.
    pub fn run<F: Frontend + ?Sized>(&mut self, frontend: &mut F) -> ! {
        log::info!("Render loop started, period {:?}", self.period);
        loop {
            self.tick(frontend);
            std::thread::sleep(self.period);
        }
    }
}
