//! HX711 24-bit load-cell ADC, bit-banged over two GPIOs.
//!
//! DOUT goes low when a conversion is ready. The host then clocks out 24
//! data bits MSB first on SCK, followed by 1-3 extra pulses that select the
//! channel/gain of the *next* conversion. Holding SCK high for more than
//! 60 us powers the chip down.
//!
//! ```text
//! SCK  ‾|_|‾|_|‾ ... ‾|_|‾|_|     25 / 26 / 27 pulses
//! DOUT ‾‾|__D23__D22__ ... D0__|‾‾
//! ```
//!
//! Readings are reported in "units": the averaged raw count divided by a
//! scale factor (1.0 until the board is characterised).

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::WeightSource;
use crate::error::SensorError;

/// How long to wait for DOUT to drop before giving up (1 ms per poll).
/// At the 10 SPS default rate a conversion takes 100 ms.
pub const READY_TIMEOUT_MS: u32 = 200;
const CLOCK_HALF_PERIOD_US: u32 = 1;
const POWER_DOWN_US: u32 = 64;
const DATA_BITS: u8 = 24;

/// Input channel and gain applied to the conversion after the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gain {
    /// Channel A, gain 128.
    #[default]
    A128,
    /// Channel A, gain 64.
    A64,
    /// Channel B, gain 32.
    B32,
}

impl Gain {
    /// Total SCK pulses per conversion for this gain.
    pub const fn pulses(self) -> u8 {
        match self {
            Self::A128 => 25,
            Self::B32 => 26,
            Self::A64 => 27,
        }
    }
}

pub struct Hx711<SCK, DOUT, D> {
    sck: SCK,
    dout: DOUT,
    delay: D,
    gain: Gain,
    scale: f32,
}

impl<SCK, DOUT, D> Hx711<SCK, DOUT, D>
where
    SCK: OutputPin,
    DOUT: InputPin,
    D: DelayNs,
{
    pub fn new(sck: SCK, dout: DOUT, delay: D, gain: Gain) -> Self {
        Self {
            sck,
            dout,
            delay,
            gain,
            scale: 1.0,
        }
    }

    /// Give the pins and delay back.
    pub fn release(self) -> (SCK, DOUT, D) {
        (self.sck, self.dout, self.delay)
    }

    /// Takes effect from the conversion after the next one.
    pub fn set_gain(&mut self, gain: Gain) {
        self.gain = gain;
    }

    pub fn gain(&self) -> Gain {
        self.gain
    }

    /// Set the units divisor. Zero or non-finite values are refused.
    pub fn set_scale(&mut self, scale: f32) {
        if scale == 0.0 || !scale.is_finite() {
            warn!("HX711: ignoring unusable scale {}", scale);
            return;
        }
        self.scale = scale;
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// DOUT low means a conversion is waiting.
    pub fn is_ready(&mut self) -> Result<bool, SensorError> {
        self.dout.is_low().map_err(|_| SensorError::Pin)
    }

    fn wait_ready(&mut self) -> Result<(), SensorError> {
        for _ in 0..READY_TIMEOUT_MS {
            if self.is_ready()? {
                return Ok(());
            }
            self.delay.delay_ms(1);
        }
        Err(SensorError::NotReady)
    }

    /// One SCK pulse; returns the DOUT level sampled while SCK is high.
    fn pulse(&mut self) -> Result<bool, SensorError> {
        self.sck.set_high().map_err(|_| SensorError::Pin)?;
        self.delay.delay_us(CLOCK_HALF_PERIOD_US);
        let bit = self.dout.is_high().map_err(|_| SensorError::Pin)?;
        self.sck.set_low().map_err(|_| SensorError::Pin)?;
        self.delay.delay_us(CLOCK_HALF_PERIOD_US);
        Ok(bit)
    }

    /// Read one signed 24-bit conversion.
    pub fn read_raw(&mut self) -> Result<i32, SensorError> {
        self.wait_ready()?;

        let mut data: u32 = 0;
        for _ in 0..DATA_BITS {
            data = (data << 1) | u32::from(self.pulse()?);
        }
        for _ in DATA_BITS..self.gain.pulses() {
            self.pulse()?;
        }

        Ok(sign_extend_24(data))
    }

    /// Mean of `times` raw conversions.
    pub fn read_average(&mut self, times: usize) -> Result<f32, SensorError> {
        if times == 0 {
            return Err(SensorError::NoSamples);
        }
        let mut sum: i64 = 0;
        for _ in 0..times {
            sum += i64::from(self.read_raw()?);
        }
        let mean = sum as f64 / times as f64;
        debug!("HX711: mean of {} conversions = {}", times, mean);
        Ok(mean as f32)
    }

    pub fn power_down(&mut self) -> Result<(), SensorError> {
        self.sck.set_low().map_err(|_| SensorError::Pin)?;
        self.sck.set_high().map_err(|_| SensorError::Pin)?;
        self.delay.delay_us(POWER_DOWN_US);
        Ok(())
    }

    /// The chip resets to channel A / gain 128 on wake.
    pub fn power_up(&mut self) -> Result<(), SensorError> {
        self.sck.set_low().map_err(|_| SensorError::Pin)?;
        Ok(())
    }
}

impl<SCK, DOUT, D> WeightSource for Hx711<SCK, DOUT, D>
where
    SCK: OutputPin,
    DOUT: InputPin,
    D: DelayNs,
{
    fn prepare(&mut self) -> Result<(), SensorError> {
        self.power_up()
    }

    fn read_units(&mut self, samples: usize) -> Result<f32, SensorError> {
        Ok(self.read_average(samples)? / self.scale)
    }
}

/// Widen a 24-bit two's complement value to `i32`.
fn sign_extend_24(raw: u32) -> i32 {
    ((raw << 8) as i32) >> 8
}
