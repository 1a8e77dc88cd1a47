//! Die temperature decoding.
//!
//! The integer part is a two's complement byte in register 0x11; register
//! 0x12 holds quarter degrees in its top two bits.

use crate::registers::{Temperature, TemperatureFraction, TEMPERATURE_LEN};

/// Temperature reported by the TCXO sensor.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TemperatureReading {
    /// Whole degrees Celsius
    pub degrees: i8,
    /// Fraction of a degree in hundredths: 0, 25, 50 or 75
    pub hundredths: u8,
}

impl TemperatureReading {
    /// Decodes the two temperature registers.
    #[must_use]
    pub fn decode(data: &[u8; TEMPERATURE_LEN]) -> Self {
        let msb = Temperature::from(data[0]);
        let lsb = TemperatureFraction::from(data[1]);
        Self {
            degrees: msb.temperature(),
            hundredths: lsb.temperature_fraction() * 25,
        }
    }

    /// Temperature in degrees Celsius.
    ///
    /// The fraction is added to the signed integer part, so -1 with 75
    /// hundredths is -0.25 as the chip defines it.
    #[cfg(feature = "temperature_f32")]
    #[must_use]
    pub fn as_f32(&self) -> f32 {
        f32::from(self.degrees) + f32::from(self.hundredths) / 100.0
    }
}
