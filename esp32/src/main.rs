use climate_dashboard_common::dht::DhtSensor;
use climate_dashboard_common::render::EventLoop;
use climate_dashboard_common::touch::{TouchCalibration, TouchInput};
use climate_dashboard_common::{AppContext, DashboardConfig};
use esp_idf_svc::hal::prelude::Peripherals;
use slint::platform::software_renderer::{MinimalSoftwareWindow, RepaintBufferType};

mod dht22;
mod display;
mod esp32;
mod touch;

slint::include_modules!();

fn main() -> anyhow::Result<()> {
    // It is necessary to call this function once. Otherwise some patches to the runtime
    // implemented by esp-idf-sys might not link properly. See https://github.com/esp-rs/esp-idf-template/issues/71
    esp_idf_svc::sys::link_patches();

    // Bind the log crate to the ESP Logging facilities
    esp_idf_svc::log::EspLogger::initialize_default();

    let config = DashboardConfig::embedded()?;
    let context = AppContext::new(config.clone());

    let p = Peripherals::take()?;

    let panel = display::init_panel(
        p.spi2,
        p.pins.gpio14,
        p.pins.gpio13,
        p.pins.gpio12,
        p.pins.gpio15,
        p.pins.gpio2,
        p.pins.gpio21,
    )?;
    let touch = touch::init_touch(
        p.spi3,
        p.pins.gpio25,
        p.pins.gpio32,
        p.pins.gpio39,
        p.pins.gpio33,
    )?;

    // Setup the window and the platform
    let window = MinimalSoftwareWindow::new(RepaintBufferType::ReusedBuffer);
    window.set_size(slint::PhysicalSize::new(
        config.display.width,
        config.display.height,
    ));
    slint::platform::set_platform(esp32::EspPlatform::new(window.clone()))
        .map_err(|e| anyhow::anyhow!("{e:?}"))?;

    let ui = AppWindow::new().map_err(|e| anyhow::anyhow!(e))?;
    ui.show().map_err(|e| anyhow::anyhow!(e))?;

    // Defined widget content before the first reading arrives
    context.reset();

    let sensor = DhtSensor::new(
        dht22::DhtPin::new(config.sensor.pin, config.sensor.model),
        config.sensor.model,
    );
    context.spawn_sensor_task(sensor)?;

    let mut frontend = esp32::SlintFrontend::new(ui, window, config.display.width);

    let calibration = TouchCalibration::from_config(&config.touch, &config.display);
    let mut event_loop = EventLoop::new(
        TouchInput::new(touch, calibration),
        panel,
        context.display.clone(),
        config.loop_period(),
    );

    log::info!("Setup done");

    event_loop.run(&mut frontend)
}
