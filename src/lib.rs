//! Register codec and alarm-mode driver for the DS3231, DS3232 and DS3234
//! real-time clocks.
//!
//! The crate is split in two layers:
//!
//! - Pure codecs that turn register bytes into typed values and back:
//!   [`CalendarTime`] for the time and date block, [`AlarmSpec`] for the two
//!   alarms, [`SqiMode`] for the INT/SQW pin and [`TemperatureReading`].
//! - [`RtcDevice`], which runs those codecs over a [`RegisterTransport`]
//!   and performs the read-modify-write cycles on the control and status
//!   registers.
//!
//! [`I2cTransport`] adapts any `embedded-hal` 1.0 I2C bus. Other buses (the
//! DS3234 is SPI) implement [`RegisterTransport`] directly.
//!
//! # Features
//!
//! - `log`: debug logging through the `log` crate
//! - `defmt`: debug logging and `defmt::Format` impls through `defmt`
//! - `temperature_f32`: [`TemperatureReading::as_f32`]
//!
//! # Example
//!
//! ```rust,ignore
//! use ds323x_rtc::{Alarm, AlarmMode, CalendarTime, RtcDevice, SqiMode, DEFAULT_ADDRESS};
//!
//! let mut rtc = RtcDevice::new_i2c(i2c, DEFAULT_ADDRESS);
//! rtc.configure(&Default::default())?;
//!
//! let now = rtc.datetime()?;
//! let wake = CalendarTime { hour: 7, minute: 30, ..CalendarTime::default() };
//! rtc.set_alarm(Alarm::One, AlarmMode::HoursMatch, &wake)?;
//! rtc.set_sqi_mode(SqiMode::Alarm1)?;
//! ```

#![no_std]

// Must come first so the logging macros are visible in every module
mod fmt;

pub mod alarm;
pub mod calendar;
pub mod control;
pub mod registers;
pub mod temperature;
pub mod transport;

use chrono::NaiveDateTime;
use embedded_hal::i2c::I2c;
use paste::paste;

pub use alarm::{Alarm, AlarmError, AlarmMode, AlarmSpec};
pub use calendar::{bcd_to_dec, dec_to_bcd, CalendarTime, DateTimeError};
pub use control::{Config, SqiMode};
pub use registers::{Control, ConversionRate, Oscillator, RegAddr, Status};
pub use temperature::TemperatureReading;
pub use transport::{I2cTransport, RegisterTransport, DEFAULT_ADDRESS};

use registers::{ControlBits, ALARM1_LEN, DATETIME_LEN, TEMPERATURE_LEN};

/// Error type for device operations.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RtcError<E> {
    /// Error reported by the register transport
    Transport(E),
    /// Time and date could not be converted
    DateTime(DateTimeError),
    /// Alarm could not be encoded
    Alarm(AlarmError),
}

impl<E> From<E> for RtcError<E> {
    fn from(e: E) -> Self {
        RtcError::Transport(e)
    }
}

/// DS323x real-time clock over a register transport.
pub struct RtcDevice<T: RegisterTransport> {
    transport: T,
}

impl<I2C: I2c> RtcDevice<I2cTransport<I2C>> {
    /// Creates a device on an I2C bus at `address` (usually [`DEFAULT_ADDRESS`]).
    pub fn new_i2c(i2c: I2C, address: u8) -> Self {
        Self::new(I2cTransport::new(i2c, address))
    }
}

impl<T: RegisterTransport> RtcDevice<T> {
    /// Creates a device over an existing transport.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Gives back the transport.
    pub fn release(self) -> T {
        self.transport
    }

    /// Applies a configuration.
    ///
    /// The control register is read, modified and written, then the status
    /// register. Bits not covered by [`Config`] keep their current value.
    ///
    /// # Errors
    /// Returns [`RtcError::Transport`] if a register access fails.
    pub fn configure(&mut self, config: &Config) -> Result<(), RtcError<T::Error>> {
        let mut control = config.sqi_mode.apply(self.control()?);
        control.set_oscillator_enable(oscillator(config.battery_backed_oscillator));
        control.set_battery_backed_square_wave(config.battery_backed_square_wave);
        debug!("control: {:?}", control);
        self.set_control(control)?;

        let mut status = self.status()?;
        status.set_conversion_rate(config.conversion_rate);
        status.set_enable_32khz_output(config.enable_32khz_output);
        debug!("status: {:?}", status);
        self.set_status(status)?;
        Ok(())
    }

    /// Reads the current time and date.
    ///
    /// # Errors
    /// Returns [`RtcError::Transport`] if the read fails.
    pub fn datetime(&mut self) -> Result<CalendarTime, RtcError<T::Error>> {
        let mut data = [0; DATETIME_LEN];
        self.transport.read_registers(RegAddr::Seconds, &mut data)?;
        debug!("datetime registers: {:?}", data);
        Ok(CalendarTime::decode(&data))
    }

    /// Writes the time and date in one burst.
    ///
    /// # Errors
    /// Returns [`RtcError::Transport`] if the write fails.
    pub fn set_datetime(&mut self, time: &CalendarTime) -> Result<(), RtcError<T::Error>> {
        let data = time.encode();
        debug!("set datetime registers: {:?}", data);
        self.transport.write_registers(RegAddr::Seconds, &data)?;
        Ok(())
    }

    /// Writes only seconds, minutes and hours.
    ///
    /// # Errors
    /// Returns [`RtcError::Transport`] if the write fails.
    pub fn set_time(&mut self, time: &CalendarTime) -> Result<(), RtcError<T::Error>> {
        self.transport
            .write_registers(RegAddr::Seconds, &time.encode_time())?;
        Ok(())
    }

    /// Writes only day of week, date, month and year.
    ///
    /// # Errors
    /// Returns [`RtcError::Transport`] if the write fails.
    pub fn set_date(&mut self, time: &CalendarTime) -> Result<(), RtcError<T::Error>> {
        self.transport
            .write_registers(RegAddr::Day, &time.encode_date())?;
        Ok(())
    }

    /// Reads the current time and date as a chrono `NaiveDateTime`.
    ///
    /// # Errors
    /// Returns [`RtcError::DateTime`] if the registers do not hold a real date.
    pub fn naive_datetime(&mut self) -> Result<NaiveDateTime, RtcError<T::Error>> {
        let time = self.datetime()?;
        NaiveDateTime::try_from(&time).map_err(RtcError::DateTime)
    }

    /// Sets the time and date from a chrono `NaiveDateTime`.
    ///
    /// The weekday register is derived from the date (1 = Sunday).
    ///
    /// # Errors
    /// Returns [`RtcError::DateTime`] if the year is outside 2000-2199.
    pub fn set_naive_datetime(
        &mut self,
        datetime: &NaiveDateTime,
    ) -> Result<(), RtcError<T::Error>> {
        let time = CalendarTime::try_from(datetime).map_err(RtcError::DateTime)?;
        self.set_datetime(&time)
    }

    /// Reads and decodes an alarm.
    ///
    /// # Errors
    /// Returns [`RtcError::Transport`] if the read fails.
    pub fn alarm(&mut self, alarm: Alarm) -> Result<AlarmSpec, RtcError<T::Error>> {
        let mut block = [0; ALARM1_LEN];
        self.transport
            .read_registers(alarm.address(), &mut block[alarm.block_offset()..])?;
        Ok(AlarmSpec::decode(alarm, &block))
    }

    /// Programs an alarm.
    ///
    /// Only the registers the alarm has are written: 4 for Alarm 1, 3 for
    /// Alarm 2. The interrupt enable is not touched; see [`Self::set_sqi_mode`].
    ///
    /// # Errors
    /// Returns [`RtcError::Alarm`] without writing anything if the mode cannot
    /// be encoded.
    pub fn set_alarm(
        &mut self,
        alarm: Alarm,
        mode: AlarmMode,
        time: &CalendarTime,
    ) -> Result<(), RtcError<T::Error>> {
        let block = AlarmSpec::new(mode, *time)
            .encode()
            .map_err(RtcError::Alarm)?;
        debug!("set alarm {:?} registers: {:?}", alarm, block);
        self.transport
            .write_registers(alarm.address(), &block[alarm.block_offset()..])?;
        Ok(())
    }

    /// Reads the die temperature.
    ///
    /// # Errors
    /// Returns [`RtcError::Transport`] if the read fails.
    pub fn temperature(&mut self) -> Result<TemperatureReading, RtcError<T::Error>> {
        let mut data = [0; TEMPERATURE_LEN];
        self.transport.read_registers(RegAddr::MSBTemp, &mut data)?;
        Ok(TemperatureReading::decode(&data))
    }

    /// Keeps the oscillator running on battery power (clears EOSC).
    pub fn set_battery_backed_oscillator(
        &mut self,
        enable: bool,
    ) -> Result<(), RtcError<T::Error>> {
        self.update_control(|c| c.set_oscillator_enable(oscillator(enable)))
    }

    /// Keeps the square wave running on battery power (BBSQW).
    pub fn set_battery_backed_square_wave(
        &mut self,
        enable: bool,
    ) -> Result<(), RtcError<T::Error>> {
        self.update_control(|c| c.set_battery_backed_square_wave(enable))
    }

    /// Selects the function of the INT/SQW pin.
    pub fn set_sqi_mode(&mut self, mode: SqiMode) -> Result<(), RtcError<T::Error>> {
        self.update_control(|c| *c = mode.apply(*c))
    }

    /// Reads the function of the INT/SQW pin.
    pub fn sqi_mode(&mut self) -> Result<SqiMode, RtcError<T::Error>> {
        Ok(SqiMode::from_control(self.control()?))
    }

    /// Starts a temperature conversion (CONV).
    ///
    /// The chip clears CONV when the conversion is done.
    pub fn force_temperature_conversion(&mut self) -> Result<(), RtcError<T::Error>> {
        self.update_control(|c| c.set_convert_temperature(true))
    }

    /// Whether an alarm drives the INT pin: INTCN and the alarm's interrupt
    /// enable are both set.
    pub fn is_alarm_interrupt(&mut self, alarm: Alarm) -> Result<bool, RtcError<T::Error>> {
        let control = u8::from(self.control()?);
        let needed = ControlBits::INTCN | alarm.interrupt_enable_bit();
        Ok(control & needed == needed)
    }

    /// Whether the oscillator has stopped since OSF was last cleared.
    pub fn oscillator_stopped(&mut self) -> Result<bool, RtcError<T::Error>> {
        Ok(self.status()?.oscillator_stop_flag())
    }

    /// Sets or clears the oscillator stop flag (OSF).
    pub fn set_oscillator_stop_flag(&mut self, value: bool) -> Result<(), RtcError<T::Error>> {
        self.update_status(|s| s.set_oscillator_stop_flag(value))
    }

    /// Keeps the 32kHz output running on battery power (BB32KHZ).
    pub fn set_battery_backed_32khz_output(
        &mut self,
        enable: bool,
    ) -> Result<(), RtcError<T::Error>> {
        self.update_status(|s| s.set_battery_backed_32khz_output(enable))
    }

    /// Sets the temperature conversion interval (CRATE).
    pub fn set_conversion_rate(&mut self, rate: ConversionRate) -> Result<(), RtcError<T::Error>> {
        self.update_status(|s| s.set_conversion_rate(rate))
    }

    /// Reads the temperature conversion interval (CRATE).
    pub fn conversion_rate(&mut self) -> Result<ConversionRate, RtcError<T::Error>> {
        Ok(self.status()?.conversion_rate())
    }

    /// Enables or disables the 32kHz output pin (EN32KHZ).
    pub fn set_32khz_output(&mut self, enable: bool) -> Result<(), RtcError<T::Error>> {
        self.update_status(|s| s.set_enable_32khz_output(enable))
    }

    /// Whether a temperature conversion is in progress (BSY).
    pub fn temperature_busy(&mut self) -> Result<bool, RtcError<T::Error>> {
        Ok(self.status()?.busy())
    }

    /// Reads both alarm flags as `(alarm1, alarm2)`.
    pub fn alarm_flags(&mut self) -> Result<(bool, bool), RtcError<T::Error>> {
        let status = self.status()?;
        Ok((status.alarm1_flag(), status.alarm2_flag()))
    }

    /// Whether an alarm has fired since its flag was last cleared.
    pub fn alarm_fired(&mut self, alarm: Alarm) -> Result<bool, RtcError<T::Error>> {
        Ok(u8::from(self.status()?) & alarm.flag_bit() != 0)
    }

    /// Clears one alarm flag, leaving the other status bits as read.
    pub fn clear_alarm_flag(&mut self, alarm: Alarm) -> Result<(), RtcError<T::Error>> {
        self.update_status(|s| *s = Status::from(u8::from(*s) & !alarm.flag_bit()))
    }

    /// Clears both alarm flags.
    pub fn clear_alarm_flags(&mut self) -> Result<(), RtcError<T::Error>> {
        self.update_status(|s| {
            s.set_alarm1_flag(false);
            s.set_alarm2_flag(false);
        })
    }

    fn update_control(&mut self, f: impl FnOnce(&mut Control)) -> Result<(), RtcError<T::Error>> {
        let mut control = self.control()?;
        f(&mut control);
        debug!("control: {:?}", control);
        self.set_control(control)
    }

    fn update_status(&mut self, f: impl FnOnce(&mut Status)) -> Result<(), RtcError<T::Error>> {
        let mut status = self.status()?;
        f(&mut status);
        debug!("status: {:?}", status);
        self.set_status(status)
    }
}

/// EOSC is active low: running on battery means the bit is clear.
fn oscillator(battery_backed: bool) -> Oscillator {
    if battery_backed {
        Oscillator::Enabled
    } else {
        Oscillator::Disabled
    }
}

// Generates a getter and a `set_` method for each single-byte register
macro_rules! impl_register_access {
    ($(($name:ident, $regaddr:expr, $typ:ty)),+) => {
        impl<T: RegisterTransport> RtcDevice<T> {
            $(
                paste! {
                    #[doc = concat!("Reads the ", stringify!($name), " register.")]
                    #[doc = "\n\n# Errors"]
                    #[doc = "Returns [`RtcError::Transport`] if the read fails."]
                    pub fn $name(&mut self) -> Result<$typ, RtcError<T::Error>> {
                        let value = self.transport.read_register($regaddr)?;
                        Ok(<$typ>::from(value))
                    }

                    #[doc = concat!("Writes the ", stringify!($name), " register.")]
                    #[doc = "\n\n# Errors"]
                    #[doc = "Returns [`RtcError::Transport`] if the write fails."]
                    pub fn [<set_ $name>](&mut self, value: $typ) -> Result<(), RtcError<T::Error>> {
                        self.transport.write_register($regaddr, value.into())?;
                        Ok(())
                    }
                }
            )+
        }
    };
}

impl_register_access!(
    (control, RegAddr::Control, Control),
    (status, RegAddr::ControlStatus, Status)
);

#[cfg(test)]
mod tests {
    extern crate alloc;
    use super::*;
    use alloc::vec;
    use chrono::NaiveDate;
    use core::convert::Infallible;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};

    /// In-memory register map standing in for the chip.
    struct RegisterFile {
        regs: [u8; 0x13],
    }

    impl RegisterFile {
        fn new() -> Self {
            Self { regs: [0; 0x13] }
        }

        fn with(addr: RegAddr, value: u8) -> Self {
            let mut file = Self::new();
            file.regs[addr as usize] = value;
            file
        }

        fn reg(&self, addr: RegAddr) -> u8 {
            self.regs[addr as usize]
        }
    }

    impl RegisterTransport for RegisterFile {
        type Error = Infallible;

        fn read_registers(&mut self, addr: RegAddr, buf: &mut [u8]) -> Result<(), Self::Error> {
            let start = addr as usize;
            buf.copy_from_slice(&self.regs[start..start + buf.len()]);
            Ok(())
        }

        fn write_registers(&mut self, addr: RegAddr, data: &[u8]) -> Result<(), Self::Error> {
            let start = addr as usize;
            self.regs[start..start + data.len()].copy_from_slice(data);
            Ok(())
        }
    }

    #[test]
    fn test_datetime() {
        let mut file = RegisterFile::new();
        file.regs[..7].copy_from_slice(&[0x30, 0x15, 0x12, 0x03, 0x25, 0x09, 0x23]);
        let mut rtc = RtcDevice::new(&mut file);
        assert_eq!(
            rtc.datetime().unwrap(),
            CalendarTime {
                second: 30,
                minute: 15,
                hour: 12,
                weekday: 3,
                day: 25,
                month: 9,
                year: 23,
            }
        );
    }

    #[test]
    fn test_set_datetime_and_parts() {
        let time = CalendarTime {
            second: 5,
            minute: 59,
            hour: 23,
            weekday: 7,
            day: 31,
            month: 12,
            year: 199,
        };

        let mut file = RegisterFile::new();
        RtcDevice::new(&mut file).set_datetime(&time).unwrap();
        assert_eq!(file.regs[..7], [0x05, 0x59, 0x23, 0x07, 0x31, 0x92, 0x99]);

        let mut file = RegisterFile::new();
        RtcDevice::new(&mut file).set_time(&time).unwrap();
        assert_eq!(file.regs[..7], [0x05, 0x59, 0x23, 0, 0, 0, 0]);

        let mut file = RegisterFile::new();
        RtcDevice::new(&mut file).set_date(&time).unwrap();
        assert_eq!(file.regs[..7], [0, 0, 0, 0x07, 0x31, 0x92, 0x99]);
    }

    #[test]
    fn test_naive_datetime() {
        let datetime = NaiveDate::from_ymd_opt(2024, 3, 14)
            .unwrap()
            .and_hms_opt(15, 9, 26)
            .unwrap();
        let mut file = RegisterFile::new();
        let mut rtc = RtcDevice::new(&mut file);
        rtc.set_naive_datetime(&datetime).unwrap();
        assert_eq!(rtc.naive_datetime().unwrap(), datetime);
        // Thursday, counting Sunday as 1
        assert_eq!(file.reg(RegAddr::Day), 0x05);
    }

    #[test]
    fn test_naive_datetime_errors() {
        // Month 0 is not a date
        let mut file = RegisterFile::new();
        assert_eq!(
            RtcDevice::new(&mut file).naive_datetime(),
            Err(RtcError::DateTime(DateTimeError::InvalidDateTime))
        );

        let too_late = NaiveDate::from_ymd_opt(2200, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut file = RegisterFile::new();
        assert_eq!(
            RtcDevice::new(&mut file).set_naive_datetime(&too_late),
            Err(RtcError::DateTime(DateTimeError::YearNotBefore2200))
        );
        assert_eq!(file.regs, [0; 0x13]);
    }

    #[test]
    fn test_alarm1_roundtrip() {
        let wake = CalendarTime {
            second: 15,
            minute: 30,
            hour: 7,
            weekday: 2,
            ..CalendarTime::default()
        };
        let mut file = RegisterFile::new();
        let mut rtc = RtcDevice::new(&mut file);
        rtc.set_alarm(Alarm::One, AlarmMode::DayMatch, &wake).unwrap();
        assert_eq!(
            rtc.alarm(Alarm::One).unwrap(),
            AlarmSpec::new(AlarmMode::DayMatch, wake)
        );
        assert_eq!(file.regs[0x07..0x0B], [0x15, 0x30, 0x07, 0x42]);
    }

    #[test]
    fn test_alarm2_writes_three_registers() {
        let mut file = RegisterFile::new();
        file.regs[0x07..0x0B].copy_from_slice(&[0x11, 0x22, 0x33, 0x44]);
        let time = CalendarTime {
            second: 45,
            minute: 10,
            hour: 18,
            ..CalendarTime::default()
        };
        let mut rtc = RtcDevice::new(&mut file);
        rtc.set_alarm(Alarm::Two, AlarmMode::HoursMatch, &time).unwrap();
        assert_eq!(
            rtc.alarm(Alarm::Two).unwrap(),
            AlarmSpec::new(
                AlarmMode::HoursMatch,
                CalendarTime {
                    second: 0,
                    ..time
                }
            )
        );
        assert_eq!(file.regs[0x07..0x0B], [0x11, 0x22, 0x33, 0x44]);
        assert_eq!(file.regs[0x0B..0x0E], [0x10, 0x18, 0x80]);
        assert_eq!(file.reg(RegAddr::Control), 0);
    }

    #[test]
    fn test_zeroed_alarm_reads_as_off() {
        let mut file = RegisterFile::new();
        let mut rtc = RtcDevice::new(&mut file);
        assert_eq!(rtc.alarm(Alarm::One).unwrap(), AlarmSpec::off());
        assert_eq!(rtc.alarm(Alarm::Two).unwrap(), AlarmSpec::off());
    }

    #[test]
    fn test_unknown_alarm_mode_writes_nothing() {
        let mut file = RegisterFile::new();
        file.regs[0x07..0x0B].copy_from_slice(&[0x11, 0x22, 0x33, 0x44]);
        assert_eq!(
            RtcDevice::new(&mut file).set_alarm(
                Alarm::One,
                AlarmMode::Unknown,
                &CalendarTime::default()
            ),
            Err(RtcError::Alarm(AlarmError::UnencodableMode(AlarmMode::Unknown)))
        );
        assert_eq!(file.regs[0x07..0x0B], [0x11, 0x22, 0x33, 0x44]);
    }

    #[test]
    fn test_temperature() {
        let mut file = RegisterFile::new();
        file.regs[0x11] = 0xE7;
        file.regs[0x12] = 0xC0;
        assert_eq!(
            RtcDevice::new(&mut file).temperature().unwrap(),
            TemperatureReading {
                degrees: -25,
                hundredths: 75
            }
        );
    }

    #[test]
    fn test_sqi_mode_keeps_high_control_bits() {
        let mut file = RegisterFile::with(RegAddr::Control, 0xFF);
        let mut rtc = RtcDevice::new(&mut file);
        rtc.set_sqi_mode(SqiMode::Hz4096).unwrap();
        assert_eq!(rtc.sqi_mode().unwrap(), SqiMode::Hz4096);
        assert_eq!(file.reg(RegAddr::Control), 0xF0);

        let mut file = RegisterFile::with(RegAddr::Control, 0x1C);
        RtcDevice::new(&mut file)
            .set_sqi_mode(SqiMode::AlarmBoth)
            .unwrap();
        assert_eq!(file.reg(RegAddr::Control), 0x07);
    }

    #[test]
    fn test_battery_backed_oscillator_is_active_low() {
        let mut file = RegisterFile::with(RegAddr::Control, 0x9C);
        RtcDevice::new(&mut file)
            .set_battery_backed_oscillator(true)
            .unwrap();
        assert_eq!(file.reg(RegAddr::Control), 0x1C);

        RtcDevice::new(&mut file)
            .set_battery_backed_oscillator(false)
            .unwrap();
        assert_eq!(file.reg(RegAddr::Control), 0x9C);
    }

    #[test]
    fn test_control_flags() {
        let mut file = RegisterFile::new();
        let mut rtc = RtcDevice::new(&mut file);
        rtc.set_battery_backed_square_wave(true).unwrap();
        rtc.force_temperature_conversion().unwrap();
        assert_eq!(file.reg(RegAddr::Control), 0x60);
    }

    #[test]
    fn test_is_alarm_interrupt() {
        let mut file = RegisterFile::with(RegAddr::Control, 0x05);
        let mut rtc = RtcDevice::new(&mut file);
        assert!(rtc.is_alarm_interrupt(Alarm::One).unwrap());
        assert!(!rtc.is_alarm_interrupt(Alarm::Two).unwrap());

        // Enable bit without INTCN drives the square wave instead
        let mut file = RegisterFile::with(RegAddr::Control, 0x01);
        assert!(!RtcDevice::new(&mut file)
            .is_alarm_interrupt(Alarm::One)
            .unwrap());
    }

    #[test]
    fn test_status_flags() {
        let mut file = RegisterFile::with(RegAddr::ControlStatus, 0x84);
        let mut rtc = RtcDevice::new(&mut file);
        assert!(rtc.oscillator_stopped().unwrap());
        assert!(rtc.temperature_busy().unwrap());
        rtc.set_oscillator_stop_flag(false).unwrap();
        assert!(!rtc.oscillator_stopped().unwrap());
        assert_eq!(file.reg(RegAddr::ControlStatus), 0x04);
    }

    #[test]
    fn test_status_setters_write_back() {
        let mut file = RegisterFile::with(RegAddr::ControlStatus, 0x08);
        let mut rtc = RtcDevice::new(&mut file);
        rtc.set_battery_backed_32khz_output(true).unwrap();
        rtc.set_conversion_rate(ConversionRate::Seconds256).unwrap();
        assert_eq!(rtc.conversion_rate().unwrap(), ConversionRate::Seconds256);
        rtc.set_32khz_output(false).unwrap();
        assert_eq!(file.reg(RegAddr::ControlStatus), 0x60);
    }

    #[test]
    fn test_clear_alarm_flag_uses_flag_bit() {
        let mut file = RegisterFile::with(RegAddr::ControlStatus, 0x8B);
        let mut rtc = RtcDevice::new(&mut file);
        assert_eq!(rtc.alarm_flags().unwrap(), (true, true));
        rtc.clear_alarm_flag(Alarm::Two).unwrap();
        assert!(rtc.alarm_fired(Alarm::One).unwrap());
        assert!(!rtc.alarm_fired(Alarm::Two).unwrap());
        assert_eq!(file.reg(RegAddr::ControlStatus), 0x89);

        let mut file = RegisterFile::with(RegAddr::ControlStatus, 0x03);
        RtcDevice::new(&mut file)
            .clear_alarm_flag(Alarm::One)
            .unwrap();
        assert_eq!(file.reg(RegAddr::ControlStatus), 0x02);
    }

    #[test]
    fn test_clear_alarm_flags() {
        let mut file = RegisterFile::with(RegAddr::ControlStatus, 0xCB);
        RtcDevice::new(&mut file).clear_alarm_flags().unwrap();
        assert_eq!(file.reg(RegAddr::ControlStatus), 0xC8);
    }

    #[test]
    fn test_configure() {
        let mut file = RegisterFile::new();
        file.regs[RegAddr::Control as usize] = 0xFF;
        file.regs[RegAddr::ControlStatus as usize] = 0x83;
        RtcDevice::new(&mut file)
            .configure(&Config::default())
            .unwrap();
        // CONV kept, INTCN only in the low bits
        assert_eq!(file.reg(RegAddr::Control), 0x24);
        // OSF and alarm flags kept, 64 s rate, 32kHz on
        assert_eq!(file.reg(RegAddr::ControlStatus), 0x8B);

        let config = Config {
            battery_backed_oscillator: false,
            battery_backed_square_wave: true,
            sqi_mode: SqiMode::Hz1,
            conversion_rate: ConversionRate::Seconds512,
            enable_32khz_output: false,
        };
        RtcDevice::new(&mut file).configure(&config).unwrap();
        assert_eq!(file.reg(RegAddr::Control), 0xE0);
        assert_eq!(file.reg(RegAddr::ControlStatus), 0xB3);
    }

    #[test]
    fn test_i2c_datetime() {
        let mut mock = I2cMock::new(&[
            I2cTrans::write_read(
                DEFAULT_ADDRESS,
                vec![RegAddr::Seconds as u8],
                vec![0x00, 0x00, 0x72, 0x01, 0x01, 0x81, 0x00],
            ),
            I2cTrans::write_read(
                DEFAULT_ADDRESS,
                vec![RegAddr::Seconds as u8],
                vec![0x00, 0x00, 0x52, 0x01, 0x01, 0x01, 0x00],
            ),
        ]);
        let mut rtc = RtcDevice::new_i2c(mock.clone(), DEFAULT_ADDRESS);

        // 12-hour mode, 12 PM, century set
        let time = rtc.datetime().unwrap();
        assert_eq!(time.hour, 12);
        assert_eq!(time.year, 100);
        assert_eq!(time.month, 1);

        // 12-hour mode, 12 AM
        let time = rtc.datetime().unwrap();
        assert_eq!(time.hour, 0);
        assert_eq!(time.year, 0);
        mock.done();
    }

    #[test]
    fn test_i2c_set_sqi_mode() {
        let mut mock = I2cMock::new(&[
            I2cTrans::write_read(DEFAULT_ADDRESS, vec![RegAddr::Control as u8], vec![0x1C]),
            I2cTrans::write(DEFAULT_ADDRESS, vec![RegAddr::Control as u8, 0x05]),
        ]);
        let mut rtc = RtcDevice::new_i2c(mock.clone(), DEFAULT_ADDRESS);
        rtc.set_sqi_mode(SqiMode::Alarm1).unwrap();
        let _ = rtc.release().release();
        mock.done();
    }

    #[test]
    fn test_i2c_set_alarm2() {
        let mut mock = I2cMock::new(&[I2cTrans::write(
            DEFAULT_ADDRESS,
            vec![RegAddr::Alarm2Minutes as u8, 0x80, 0x80, 0x80],
        )]);
        let mut rtc = RtcDevice::new_i2c(mock.clone(), DEFAULT_ADDRESS);
        rtc.set_alarm(Alarm::Two, AlarmMode::PerMinute, &CalendarTime::default())
            .unwrap();
        mock.done();
    }

    #[test]
    fn test_i2c_error() {
        let mut mock = I2cMock::new(&[I2cTrans::write_read(
            DEFAULT_ADDRESS,
            vec![RegAddr::ControlStatus as u8],
            vec![0x00],
        )
        .with_error(embedded_hal::i2c::ErrorKind::Other)]);
        let mut rtc = RtcDevice::new_i2c(mock.clone(), DEFAULT_ADDRESS);
        assert_eq!(
            rtc.alarm_flags(),
            Err(RtcError::Transport(embedded_hal::i2c::ErrorKind::Other))
        );
        mock.done();
    }
}
