// ILI9341 panel on HSPI, driven through mipidsi.

use climate_dashboard_common::render::{Area, FlushSink};
use embedded_graphics_core::pixelcolor::raw::RawU16;
use embedded_graphics_core::pixelcolor::Rgb565;
use esp_idf_svc::hal::delay::Ets;
use esp_idf_svc::hal::gpio::{Gpio12, Gpio13, Gpio14, Gpio15, Gpio2, Gpio21, Output, PinDriver};
use esp_idf_svc::hal::prelude::*;
use esp_idf_svc::hal::spi::{config::Config, SpiDeviceDriver, SpiDriver, SpiDriverConfig, SPI2};
use log::info;
use mipidsi::options::{ColorOrder, Orientation, Rotation};

pub const LCD_H_RES: u32 = 320;
pub const LCD_V_RES: u32 = 240;

type PanelSpi = SpiDeviceDriver<'static, SpiDriver<'static>>;
type PanelInterface =
    mipidsi::interface::SpiInterface<'static, PanelSpi, PinDriver<'static, Gpio2, Output>>;
type Panel = mipidsi::Display<PanelInterface, mipidsi::models::ILI9341Rgb565, mipidsi::NoResetPin>;

/// The panel as the render loop's flush target.
pub struct PanelSink {
    panel: Panel,
    _backlight: PinDriver<'static, Gpio21, Output>,
}

impl FlushSink for PanelSink {
    fn flush(&mut self, area: Area, pixels: &[u16]) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let sx = area.x as u16;
        let sy = area.y as u16;
        let ex = sx + area.width as u16 - 1;
        let ey = sy + area.height as u16 - 1;

        let colors = pixels.iter().map(|p| Rgb565::from(RawU16::new(*p)));
        if let Err(e) = self.panel.set_pixels(sx, sy, ex, ey, colors) {
            log::error!("Panel write failed at {area:?}: {e:?}");
        }
    }
}

/// Initialize the panel (HSPI: CLK 14, MOSI 13, MISO 12, CS 15, DC 2, backlight 21).
pub fn init_panel(
    spi2: SPI2,
    sclk: Gpio14,
    mosi: Gpio13,
    miso: Gpio12,
    cs: Gpio15,
    dc: Gpio2,
    backlight: Gpio21,
) -> anyhow::Result<PanelSink> {
    info!("Initializing ILI9341 panel...");

    let mut backlight = PinDriver::output(backlight)?;
    backlight.set_high()?;

    let driver = SpiDriver::new(spi2, sclk, mosi, Some(miso), &SpiDriverConfig::new())?;
    let spi = SpiDeviceDriver::new(driver, Some(cs), &Config::new().baudrate(40.MHz().into()))?;
    let dc = PinDriver::output(dc)?;

    // Line buffer for the interface, leaked because the panel lives forever
    let buffer: &'static mut [u8; 512] = Box::leak(Box::new([0_u8; 512]));
    let di = mipidsi::interface::SpiInterface::new(spi, dc, buffer);

    // Landscape, flipped
    let panel = mipidsi::Builder::new(mipidsi::models::ILI9341Rgb565, di)
        .display_size(LCD_V_RES as u16, LCD_H_RES as u16)
        .orientation(Orientation::new().rotate(Rotation::Deg270))
        .color_order(ColorOrder::Bgr)
        .init(&mut Ets)
        .map_err(|e| anyhow::anyhow!("Failed to initialize panel: {e:?}"))?;

    info!("ILI9341 panel initialized");

    Ok(PanelSink {
        panel,
        _backlight: backlight,
    })
}
