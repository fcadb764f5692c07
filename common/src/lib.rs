pub mod config;
pub mod context;
pub mod dht;
pub mod pipeline;
pub mod render;
pub mod sensor;
pub mod touch;
pub mod widgets;

pub use config::DashboardConfig;
pub use context::AppContext;
pub use pipeline::{Outcome, UpdatePipeline, ValidationGuard};
pub use sensor::{Reading, Sensor, SensorReader};
pub use widgets::{DashboardWidgets, WidgetSet};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// The widget model shared between the sensor thread, which writes it, and
/// the render loop, which mirrors it into the UI.
///
/// A poisoned lock is recovered: the model holds plain values that stay
/// consistent even if a writer panicked halfway.
#[derive(Clone)]
pub struct SharedDisplay(Arc<Mutex<DashboardWidgets>>);

impl SharedDisplay {
    pub fn new(chart_points: usize) -> Self {
        Self(Arc::new(Mutex::new(DashboardWidgets::new(chart_points))))
    }

    fn lock(&self) -> MutexGuard<'_, DashboardWidgets> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` with exclusive access to the widgets.
    pub fn update<R>(&self, f: impl FnOnce(&mut DashboardWidgets) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn snapshot(&self) -> DashboardWidgets {
        self.lock().clone()
    }

    /// Returns a copy of the widgets if they changed since revision `seen`,
    /// and remembers the new revision. `None` as `seen` always yields a copy.
    pub fn changed_since(&self, seen: &mut Option<u64>) -> Option<DashboardWidgets> {
        let widgets = self.lock();
        if *seen == Some(widgets.revision()) {
            return None;
        }
        *seen = Some(widgets.revision());
        Some(widgets.clone())
    }
}
