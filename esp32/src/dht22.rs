use climate_dashboard_common::dht::{DhtBus, DhtError, DhtModel, Frame, FRAME_LEN};

/// Bit-banged single-wire bus of a DHT11/DHT22 on one GPIO.
pub struct DhtPin {
    pin: i32,
    model: DhtModel,
}

impl DhtPin {
    /// A high pulse longer than this is a `1` bit.
    const ONE_BIT_MIN_US: i32 = 40;

    pub fn new(pin: i32, model: DhtModel) -> Self {
        Self { pin, model }
    }

    /// Microseconds the line stays at `state`, or a timeout after `max_wait`.
    fn signal_level(&self, max_wait: i32, state: i32) -> Result<i32, DhtError> {
        use esp_idf_svc::sys::*;

        let mut u_sec: i32 = 0;
        unsafe {
            while gpio_get_level(self.pin) == state {
                u_sec += 1;
                if u_sec > max_wait {
                    return Err(DhtError::Timeout);
                }
                ets_delay_us(1);
            }
        }

        Ok(u_sec)
    }

    fn start_pulse_us(&self) -> u32 {
        match self.model {
            DhtModel::Dht11 => 20_000,
            DhtModel::Dht22 => 3_000,
        }
    }
}

impl DhtBus for DhtPin {
    fn read_frame(&mut self) -> Result<Frame, DhtError> {
        use esp_idf_svc::sys::*;

        let mut frame = [0u8; FRAME_LEN];

        unsafe {
            gpio_set_direction(self.pin, GPIO_MODE_DEF_OUTPUT);

            // pull down to wake the sensor up
            gpio_set_level(self.pin, 0);
            ets_delay_us(self.start_pulse_us());

            // release and hand the line over
            gpio_set_level(self.pin, 1);
            ets_delay_us(25);

            gpio_set_direction(self.pin, GPIO_MODE_DEF_INPUT);
        }

        // response: 80 us low, 80 us high
        self.signal_level(85, 0)?;
        self.signal_level(85, 1)?;

        for bit in 0..FRAME_LEN * 8 {
            // every bit starts with a ~50 us low phase
            self.signal_level(56, 0)?;

            // the length of the high phase is the bit
            if self.signal_level(75, 1)? > Self::ONE_BIT_MIN_US {
                frame[bit / 8] |= 1 << (7 - bit % 8);
            }
        }

        Ok(frame)
    }
}
