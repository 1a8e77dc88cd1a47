//! Register-level byte transport.
//!
//! The codec never talks to a bus directly. Everything goes through
//! [`RegisterTransport`], which reads and writes bytes at a register address.
//! [`I2cTransport`] implements it for any `embedded-hal` I2C bus; a DS3234 on
//! SPI or a register simulator in a test implements the trait itself.

use embedded_hal::i2c::I2c;

use crate::registers::{RegAddr, DATETIME_LEN};

/// Default 7-bit I2C address of the DS3231/DS3232.
pub const DEFAULT_ADDRESS: u8 = 0x68;

/// Byte transport addressed by register.
///
/// Multi-byte operations rely on the chip's register pointer auto-increment:
/// byte `n` of a burst lives at `addr + n`.
pub trait RegisterTransport {
    /// Error reported by the underlying bus.
    type Error;

    /// Reads `buf.len()` consecutive registers starting at `addr`.
    fn read_registers(&mut self, addr: RegAddr, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Writes `data` to consecutive registers starting at `addr`.
    fn write_registers(&mut self, addr: RegAddr, data: &[u8]) -> Result<(), Self::Error>;

    /// Reads a single register.
    fn read_register(&mut self, addr: RegAddr) -> Result<u8, Self::Error> {
        let mut data = [0];
        self.read_registers(addr, &mut data)?;
        Ok(data[0])
    }

    /// Writes a single register.
    fn write_register(&mut self, addr: RegAddr, value: u8) -> Result<(), Self::Error> {
        self.write_registers(addr, &[value])
    }
}

impl<T: RegisterTransport + ?Sized> RegisterTransport for &mut T {
    type Error = T::Error;

    fn read_registers(&mut self, addr: RegAddr, buf: &mut [u8]) -> Result<(), Self::Error> {
        (**self).read_registers(addr, buf)
    }

    fn write_registers(&mut self, addr: RegAddr, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write_registers(addr, data)
    }
}

/// [`RegisterTransport`] over an `embedded-hal` I2C bus.
pub struct I2cTransport<I2C: I2c> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> I2cTransport<I2C> {
    /// Creates a transport for the device at `address` (usually [`DEFAULT_ADDRESS`]).
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Gives back the I2C bus.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> RegisterTransport for I2cTransport<I2C> {
    type Error = I2C::Error;

    fn read_registers(&mut self, addr: RegAddr, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c.write_read(self.address, &[u8::from(addr)], buf)
    }

    fn write_registers(&mut self, addr: RegAddr, data: &[u8]) -> Result<(), Self::Error> {
        // The register address has to lead the payload in a single write
        let starts = (u8::from(addr)..).step_by(DATETIME_LEN);
        for (chunk, reg) in data.chunks(DATETIME_LEN).zip(starts) {
            let mut buf = [0; DATETIME_LEN + 1];
            buf[0] = reg;
            buf[1..=chunk.len()].copy_from_slice(chunk);
            self.i2c.write(self.address, &buf[..=chunk.len()])?;
        }
        Ok(())
    }
}
