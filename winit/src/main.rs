// Prevent console window in addition to Slint window in Windows release builds when, e.g., starting the app via file manager. Ignored on other platforms.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

slint::include_modules!();

use climate_dashboard_common::sensor::SimulatedSensor;
use climate_dashboard_common::widgets::{DashboardWidgets, Series};
use climate_dashboard_common::{AppContext, DashboardConfig};

/// Our App struct that holds the UI, the shared application context and the
/// timer that mirrors the sensor data into the UI.
///
/// The sensor runs on its own thread and only ever touches the shared widget
/// model. The timer runs on the UI thread, so all Slint calls stay there.
struct App {
    ui: AppWindow,
    context: AppContext,
    timer: slint::Timer,
}

impl App {
    /// Every n-th simulated sample is a sensor fault.
    const FAULT_EVERY: u32 = 50;

    /// Create a new App struct and put the widgets into their initial state.
    fn new(config: DashboardConfig) -> anyhow::Result<Self> {
        // Make a new AppWindow
        let ui = AppWindow::new()?;

        let context = AppContext::new(config);
        context.reset();

        // Gauges are read-only after reset, so this should stay silent.
        ui.on_gauge_clicked(|gauge| log::warn!("Gauge {gauge} received a click"));

        Ok(Self {
            ui,
            context,
            timer: slint::Timer::default(),
        })
    }

    /// Run the App: start the sensor task and poll the widget model once per
    /// loop period.
    fn run(&mut self) -> anyhow::Result<()> {
        self.context
            .spawn_sensor_task(SimulatedSensor::new(Self::FAULT_EVERY))?;

        // Get the handle to the UI as a weak reference.
        let ui_handle = self.ui.as_weak();

        // The widget model is shared with the sensor thread.
        let display = self.context.display.clone();
        let mut seen_revision = None;

        self.timer.start(
            slint::TimerMode::Repeated,
            self.context.config.loop_period(),
            move || {
                let Some(ui) = ui_handle.upgrade() else {
                    return;
                };

                if let Some(widgets) = display.changed_since(&mut seen_revision) {
                    show(&ui, &widgets);
                }
            },
        );

        // Run the UI (and map an error to an anyhow::Error).
        self.ui.run().map_err(|e| e.into())
    }
}

/// Copy the widget model into the window properties.
fn show(ui: &AppWindow, widgets: &DashboardWidgets) {
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

    ui.set_status(slint::format!(
        "{} points, updated {}",
        chart.len(),
        chrono::Local::now().format("%H:%M:%S")
    ));
}

/// Use the file named by `DASHBOARD_CONFIG`, or the built-in defaults.
fn load_config() -> anyhow::Result<DashboardConfig> {
    match std::env::var_os("DASHBOARD_CONFIG") {
        Some(path) => {
            log::info!("Loading configuration from {}", path.to_string_lossy());
            Ok(DashboardConfig::load(&path)?)
        }
        None => Ok(DashboardConfig::embedded()?),
    }
}

/// A minimal main function that initializes the App and runs it.
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut app = App::new(load_config()?)?;

    app.run()
}
