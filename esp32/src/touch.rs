// XPT2046 resistive touch controller on its own SPI bus.

use climate_dashboard_common::touch::TouchSurface;
use embedded_hal::spi::SpiDevice;
use esp_idf_svc::hal::gpio::{Gpio25, Gpio32, Gpio33, Gpio39};
use esp_idf_svc::hal::prelude::*;
use esp_idf_svc::hal::spi::{config::Config, SpiDeviceDriver, SpiDriver, SpiDriverConfig, SPI3};

// Control bytes: start bit, channel, 12-bit differential mode, PENIRQ enabled.
const READ_X: u8 = 0b1_101_0_0_00;
const READ_Y: u8 = 0b1_001_0_0_00;
const READ_Z1: u8 = 0b1_011_0_0_00;
const READ_Z2: u8 = 0b1_100_0_0_00;

/// Pressure below this counts as released.
const Z_THRESHOLD: i32 = 400;

const SAMPLES: i32 = 3;

pub struct Xpt2046<SPI> {
    spi: SPI,
}

impl<SPI: SpiDevice> Xpt2046<SPI> {
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    fn channel(&mut self, control: u8) -> Result<i32, SPI::Error> {
        let mut buf = [control, 0, 0];
        self.spi.transfer_in_place(&mut buf)?;
        Ok((u16::from_be_bytes([buf[1], buf[2]]) >> 3) as i32)
    }

    fn pressure(&mut self) -> Result<i32, SPI::Error> {
        let z1 = self.channel(READ_Z1)?;
        let z2 = self.channel(READ_Z2)?;
        Ok(z1 + 4095 - z2)
    }

    fn averaged_point(&mut self) -> Result<(i32, i32), SPI::Error> {
        let mut x = 0;
        let mut y = 0;
        for _ in 0..SAMPLES {
            x += self.channel(READ_X)?;
            y += self.channel(READ_Y)?;
        }
        Ok((x / SAMPLES, y / SAMPLES))
    }
}

impl<SPI: SpiDevice> TouchSurface for Xpt2046<SPI> {
    fn touched(&mut self) -> bool {
        match self.pressure() {
            Ok(z) => z >= Z_THRESHOLD,
            Err(e) => {
                log::warn!("Touch pressure read failed: {e:?}");
                false
            }
        }
    }

    fn raw_point(&mut self) -> (i32, i32) {
        match self.averaged_point() {
            // The panel is mounted turned: the controller's Y axis runs
            // along the screen width.
            Ok((x, y)) => (4095 - y, x),
            Err(e) => {
                log::warn!("Touch position read failed: {e:?}");
                (0, 0)
            }
        }
    }
}

pub type TouchSpi = SpiDeviceDriver<'static, SpiDriver<'static>>;

/// Bring up the touch controller (VSPI: CLK 25, MOSI 32, MISO 39, CS 33).
pub fn init_touch(
    spi3: SPI3,
    sclk: Gpio25,
    mosi: Gpio32,
    miso: Gpio39,
    cs: Gpio33,
) -> anyhow::Result<Xpt2046<TouchSpi>> {
    let driver = SpiDriver::new(spi3, sclk, mosi, Some(miso), &SpiDriverConfig::new())?;
    let device = SpiDeviceDriver::new(driver, Some(cs), &Config::new().baudrate(2.MHz().into()))?;

    log::info!("XPT2046 touch controller ready");
    Ok(Xpt2046::new(device))
}
