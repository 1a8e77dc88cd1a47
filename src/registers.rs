//! Register map and bitfield structures for the DS323x RTC family.
//!
//! This module contains every register address the driver touches, the
//! bitfield views of each register and the small enums stored inside them.
//! Nothing here talks to the bus; it only describes the wire format.

use bitfield::bitfield;

/// Register addresses for the DS323x RTC.
#[allow(unused)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegAddr {
    /// Seconds register (0-59)
    Seconds = 0x00,
    /// Minutes register (0-59)
    Minutes = 0x01,
    /// Hours register (1-12 + AM/PM or 0-23)
    Hours = 0x02,
    /// Day of week register (1-7)
    Day = 0x03,
    /// Date of month register (1-31)
    Date = 0x04,
    /// Month register (1-12) with the century flag
    Month = 0x05,
    /// Year register (0-99)
    Year = 0x06,
    /// Alarm 1 seconds register
    Alarm1Seconds = 0x07,
    /// Alarm 1 minutes register
    Alarm1Minutes = 0x08,
    /// Alarm 1 hours register
    Alarm1Hours = 0x09,
    /// Alarm 1 day/date register
    Alarm1DayDate = 0x0A,
    /// Alarm 2 minutes register
    Alarm2Minutes = 0x0B,
    /// Alarm 2 hours register
    Alarm2Hours = 0x0C,
    /// Alarm 2 day/date register
    Alarm2DayDate = 0x0D,
    /// Control register
    Control = 0x0E,
    /// Control/Status register
    ControlStatus = 0x0F,
    /// Temperature MSB register
    MSBTemp = 0x11,
    /// Temperature LSB register
    LSBTemp = 0x12,
}

impl From<RegAddr> for u8 {
    fn from(addr: RegAddr) -> Self {
        addr as u8
    }
}

/// Length of the time block (seconds, minutes, hours) starting at [`RegAddr::Seconds`].
pub const TIME_LEN: usize = 3;
/// Length of the date block (day, date, month, year) starting at [`RegAddr::Day`].
pub const DATE_LEN: usize = 4;
/// Length of the full time and date block starting at [`RegAddr::Seconds`].
pub const DATETIME_LEN: usize = TIME_LEN + DATE_LEN;
/// Length of the Alarm 1 block starting at [`RegAddr::Alarm1Seconds`].
pub const ALARM1_LEN: usize = 4;
/// Length of the Alarm 2 block starting at [`RegAddr::Alarm2Minutes`].
pub const ALARM2_LEN: usize = 3;
/// Length of the temperature block starting at [`RegAddr::MSBTemp`].
pub const TEMPERATURE_LEN: usize = 2;

/// Bit masks of the control register.
pub struct ControlBits;

impl ControlBits {
    /// Enable oscillator (active low)
    pub const EOSC: u8 = 0x80;
    /// Battery-backed square wave enable
    pub const BBSQW: u8 = 0x40;
    /// Convert temperature
    pub const CONV: u8 = 0x20;
    /// Rate select 2
    pub const RS2: u8 = 0x10;
    /// Rate select 1
    pub const RS1: u8 = 0x08;
    /// Interrupt control
    pub const INTCN: u8 = 0x04;
    /// Alarm 2 interrupt enable
    pub const A2IE: u8 = 0x02;
    /// Alarm 1 interrupt enable
    pub const A1IE: u8 = 0x01;
}

/// Bit masks of the status register.
pub struct StatusBits;

impl StatusBits {
    /// Oscillator stop flag
    pub const OSF: u8 = 0x80;
    /// Battery-backed 32kHz output
    pub const BB32KHZ: u8 = 0x40;
    /// Conversion rate bit 1
    pub const CRATE1: u8 = 0x20;
    /// Conversion rate bit 0
    pub const CRATE0: u8 = 0x10;
    /// Enable 32kHz output
    pub const EN32KHZ: u8 = 0x08;
    /// Busy
    pub const BSY: u8 = 0x04;
    /// Alarm 2 flag
    pub const A2F: u8 = 0x02;
    /// Alarm 1 flag
    pub const A1F: u8 = 0x01;
}

/// Bit 7 of every alarm register: when set the field does not take part in
/// the alarm comparison.
pub const ALARM_MASK_BIT: u8 = 0x80;
/// Bit 6 of the alarm day/date register: set selects day of week.
pub const ALARM_DAY_SELECT_BIT: u8 = 0x40;

/// Time representation format stored in the hours registers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeRepresentation {
    /// 24-hour format (0-23)
    TwentyFourHour = 0,
    /// 12-hour format (1-12 + AM/PM)
    TwelveHour = 1,
}
impl From<u8> for TimeRepresentation {
    /// Creates a `TimeRepresentation` from a raw register value.
    ///
    /// # Panics
    /// Panics if the value is not 0 or 1.
    fn from(v: u8) -> Self {
        match v {
            0 => TimeRepresentation::TwentyFourHour,
            1 => TimeRepresentation::TwelveHour,
            _ => panic!("Invalid value for TimeRepresentation: {}", v),
        }
    }
}
impl From<TimeRepresentation> for u8 {
    fn from(v: TimeRepresentation) -> Self {
        v as u8
    }
}

/// Oscillator control while running from the backup battery (EOSC bit).
///
/// The bit is active low: writing 0 keeps the oscillator running on battery.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Oscillator {
    /// Oscillator keeps running on battery
    Enabled = 0,
    /// Oscillator stops when on battery
    Disabled = 1,
}
impl From<u8> for Oscillator {
    /// Creates an `Oscillator` from a raw register value.
    ///
    /// # Panics
    /// Panics if the value is not 0 or 1.
    fn from(v: u8) -> Self {
        match v {
            0 => Oscillator::Enabled,
            1 => Oscillator::Disabled,
            _ => panic!("Invalid value for Oscillator: {}", v),
        }
    }
}
impl From<Oscillator> for u8 {
    fn from(v: Oscillator) -> Self {
        v as u8
    }
}

/// Function of the INT/SQW pin (INTCN bit).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptControl {
    /// Output square wave on INT/SQW pin
    SquareWave = 0,
    /// Output interrupt signal on INT/SQW pin
    Interrupt = 1,
}
impl From<u8> for InterruptControl {
    /// Creates an `InterruptControl` from a raw register value.
    ///
    /// # Panics
    /// Panics if the value is not 0 or 1.
    fn from(v: u8) -> Self {
        match v {
            0 => InterruptControl::SquareWave,
            1 => InterruptControl::Interrupt,
            _ => panic!("Invalid value for InterruptControl: {}", v),
        }
    }
}
impl From<InterruptControl> for u8 {
    fn from(v: InterruptControl) -> Self {
        v as u8
    }
}

/// Square wave output frequency (RS2/RS1 bits).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SquareWaveFrequency {
    /// 1 Hz square wave output
    Hz1 = 0b00,
    /// 1.024 kHz square wave output
    Hz1024 = 0b01,
    /// 4.096 kHz square wave output
    Hz4096 = 0b10,
    /// 8.192 kHz square wave output
    Hz8192 = 0b11,
}
impl From<u8> for SquareWaveFrequency {
    /// Creates a `SquareWaveFrequency` from a raw register value.
    ///
    /// # Panics
    /// Panics if the value is not 0b00, 0b01, 0b10, or 0b11.
    fn from(v: u8) -> Self {
        match v {
            0b00 => SquareWaveFrequency::Hz1,
            0b01 => SquareWaveFrequency::Hz1024,
            0b10 => SquareWaveFrequency::Hz4096,
            0b11 => SquareWaveFrequency::Hz8192,
            _ => panic!("Invalid value for SquareWaveFrequency: {}", v),
        }
    }
}
impl From<SquareWaveFrequency> for u8 {
    fn from(v: SquareWaveFrequency) -> Self {
        v as u8
    }
}

/// Temperature conversion interval of the TCXO (CRATE1/CRATE0 bits).
///
/// Only honoured by the DS3232 and DS3234; the DS3231 ignores these bits.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConversionRate {
    /// Every 64 seconds (power-on default)
    #[default]
    Seconds64 = 0b00,
    /// Every 128 seconds
    Seconds128 = 0b01,
    /// Every 256 seconds
    Seconds256 = 0b10,
    /// Every 512 seconds
    Seconds512 = 0b11,
}
impl From<u8> for ConversionRate {
    /// Creates a `ConversionRate` from a raw register value.
    ///
    /// # Panics
    /// Panics if the value does not fit in two bits.
    fn from(v: u8) -> Self {
        match v {
            0b00 => ConversionRate::Seconds64,
            0b01 => ConversionRate::Seconds128,
            0b10 => ConversionRate::Seconds256,
            0b11 => ConversionRate::Seconds512,
            _ => panic!("Invalid value for ConversionRate: {}", v),
        }
    }
}
impl From<ConversionRate> for u8 {
    fn from(v: ConversionRate) -> Self {
        v as u8
    }
}

/// Day/Date select for alarm registers (DY/DT bit).
///
/// This controls whether the alarm day/date register matches against
/// the day of the week or the date of the month.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DayDateSelect {
    /// Match against date of the month (1-31)
    Date = 0,
    /// Match against day of the week (1-7)
    Day = 1,
}
impl From<u8> for DayDateSelect {
    /// Creates a `DayDateSelect` from a raw register value.
    ///
    /// # Panics
    /// Panics if the value is not 0 or 1.
    fn from(v: u8) -> Self {
        match v {
            0 => DayDateSelect::Date,
            1 => DayDateSelect::Day,
            _ => panic!("Invalid value for DayDateSelect: {}", v),
        }
    }
}
impl From<DayDateSelect> for u8 {
    fn from(v: DayDateSelect) -> Self {
        v as u8
    }
}

// This macro generates the From<u8> and Into<u8> implementations for the
// register type
macro_rules! from_register_u8 {
    ($typ:ty) => {
        impl From<u8> for $typ {
            fn from(v: u8) -> Self {
                paste::paste!([< $typ >](v))
            }
        }
        impl From<$typ> for u8 {
            fn from(v: $typ) -> Self {
                v.0
            }
        }
    };
}

bitfield! {
    /// Byte 0 of the calendar block: BCD seconds, bit 7 unused.
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct Seconds(u8);
    impl Debug;
    /// Tens digit
    pub ten_seconds, set_ten_seconds: 6, 4;
    /// Units digit
    pub seconds, set_seconds: 3, 0;
}
from_register_u8!(Seconds);

bitfield! {
    /// Byte 1 of the calendar block: BCD minutes, bit 7 unused.
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct Minutes(u8);
    impl Debug;
    /// Tens digit
    pub ten_minutes, set_ten_minutes: 6, 4;
    /// Units digit
    pub minutes, set_minutes: 3, 0;
}
from_register_u8!(Minutes);

bitfield! {
    /// Byte 2 of the calendar block. Written in 24-hour form by this crate;
    /// 12-hour content left by other software is still decoded.
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct Hours(u8);
    impl Debug;
    /// Time representation format (12/24 hour)
    pub from into TimeRepresentation, time_representation, set_time_representation: 6, 6;
    /// PM flag (12-hour) or 20-hour bit (24-hour)
    pub pm_or_twenty_hours, set_pm_or_twenty_hours: 5, 5;
    /// Tens place of hours
    pub ten_hours, set_ten_hours: 4, 4;
    /// Ones place of hours
    pub hours, set_hours: 3, 0;
}
from_register_u8!(Hours);

bitfield! {
    /// Byte 3 of the calendar block: weekday, numbered by the application.
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct Day(u8);
    impl Debug;
    /// Weekday; encoders replace 0 and 8+ with 1
    pub day, set_day: 2, 0;
}
from_register_u8!(Day);

bitfield! {
    /// Byte 4 of the calendar block: BCD day of month.
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct Date(u8);
    impl Debug;
    /// Tens digit
    pub ten_date, set_ten_date: 5, 4;
    /// Units digit
    pub date, set_date: 3, 0;
}
from_register_u8!(Date);

bitfield! {
    /// Byte 5 of the calendar block: BCD month plus the century flag.
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct Month(u8);
    impl Debug;
    /// Years 100-199 (2100-2199)
    pub century, set_century: 7;
    /// Tens digit
    pub ten_month, set_ten_month: 4, 4;
    /// Units digit
    pub month, set_month: 3, 0;
}
from_register_u8!(Month);

bitfield! {
    /// Byte 6 of the calendar block: year modulo 100 in BCD.
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct Year(u8);
    impl Debug;
    /// Tens digit
    pub ten_year, set_ten_year: 7, 4;
    /// Units digit
    pub year, set_year: 3, 0;
}
from_register_u8!(Year);

bitfield! {
    /// Control register for device configuration.
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct Control(u8);
    impl Debug;
    /// Oscillator enable/disable on battery (EOSC, active low)
    pub from into Oscillator, oscillator_enable, set_oscillator_enable: 7, 7;
    /// Enable square wave output on battery power
    pub battery_backed_square_wave, set_battery_backed_square_wave: 6;
    /// Force temperature conversion
    pub convert_temperature, set_convert_temperature: 5;
    /// Square wave output frequency selection
    pub from into SquareWaveFrequency, square_wave_frequency, set_square_wave_frequency: 4, 3;
    /// INT/SQW pin function control
    pub from into InterruptControl, interrupt_control, set_interrupt_control: 2, 2;
    /// Enable alarm 2 interrupt
    pub alarm2_interrupt_enable, set_alarm2_interrupt_enable: 1;
    /// Enable alarm 1 interrupt
    pub alarm1_interrupt_enable, set_alarm1_interrupt_enable: 0;
}
from_register_u8!(Control);

#[cfg(feature = "defmt")]
impl defmt::Format for Control {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Control({}, {}, {}, A1IE={}, A2IE={}, BBSQW={}, CONV={})",
            self.oscillator_enable(),
            self.interrupt_control(),
            self.square_wave_frequency(),
            self.alarm1_interrupt_enable(),
            self.alarm2_interrupt_enable(),
            self.battery_backed_square_wave(),
            self.convert_temperature()
        );
    }
}

bitfield! {
    /// Status register for device state and flags.
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct Status(u8);
    impl Debug;
    /// Oscillator stop flag
    pub oscillator_stop_flag, set_oscillator_stop_flag: 7;
    /// Keep the 32kHz output running on battery
    pub battery_backed_32khz_output, set_battery_backed_32khz_output: 6;
    /// Temperature conversion interval
    pub from into ConversionRate, conversion_rate, set_conversion_rate: 5, 4;
    /// Enable 32kHz output
    pub enable_32khz_output, set_enable_32khz_output: 3;
    /// Temperature conversion in progress
    pub busy, set_busy: 2;
    /// Alarm 2 triggered flag
    pub alarm2_flag, set_alarm2_flag: 1;
    /// Alarm 1 triggered flag
    pub alarm1_flag, set_alarm1_flag: 0;
}
from_register_u8!(Status);

#[cfg(feature = "defmt")]
impl defmt::Format for Status {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Status(OSF={}, BB32kHz={}, {}, EN32kHz={}, BSY={}, A2F={}, A1F={})",
            self.oscillator_stop_flag(),
            self.battery_backed_32khz_output(),
            self.conversion_rate(),
            self.enable_32khz_output(),
            self.busy(),
            self.alarm2_flag(),
            self.alarm1_flag()
        );
    }
}

bitfield! {
    /// Temperature register (integer part).
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct Temperature(u8);
    impl Debug;
    /// Temperature value (-128 to +127)
    pub i8, temperature, set_temperature: 7, 0;
}
from_register_u8!(Temperature);

bitfield! {
    /// Temperature fraction register (quarter degrees in the top two bits).
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct TemperatureFraction(u8);
    impl Debug;
    /// Number of quarter degrees (0-3)
    pub temperature_fraction, set_temperature_fraction: 7, 6;
}
from_register_u8!(TemperatureFraction);

// Alarm register types with mask bits and special control bits

bitfield! {
    /// Alarm Seconds register with mask bit (only used by Alarm 1).
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct AlarmSeconds(u8);
    impl Debug;
    /// Alarm mask bit 1 (A1M1)
    pub alarm_mask1, set_alarm_mask1: 7;
    /// Tens place of seconds (0-5)
    pub ten_seconds, set_ten_seconds: 6, 4;
    /// Ones place of seconds (0-9)
    pub seconds, set_seconds: 3, 0;
}
from_register_u8!(AlarmSeconds);

bitfield! {
    /// Alarm Minutes register with mask bit (used by both Alarm 1 and Alarm 2).
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct AlarmMinutes(u8);
    impl Debug;
    /// Alarm mask bit 2 (A1M2/A2M2)
    pub alarm_mask2, set_alarm_mask2: 7;
    /// Tens place of minutes (0-5)
    pub ten_minutes, set_ten_minutes: 6, 4;
    /// Ones place of minutes (0-9)
    pub minutes, set_minutes: 3, 0;
}
from_register_u8!(AlarmMinutes);

bitfield! {
    /// Alarm Hours register with mask bit and time format control (used by both Alarm 1 and Alarm 2).
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct AlarmHours(u8);
    impl Debug;
    /// Alarm mask bit 3 (A1M3/A2M3)
    pub alarm_mask3, set_alarm_mask3: 7;
    /// Time representation format (12/24 hour)
    pub from into TimeRepresentation, time_representation, set_time_representation: 6, 6;
    /// PM flag (12-hour) or 20-hour bit (24-hour)
    pub pm_or_twenty_hours, set_pm_or_twenty_hours: 5, 5;
    /// Tens place of hours
    pub ten_hours, set_ten_hours: 4, 4;
    /// Ones place of hours
    pub hours, set_hours: 3, 0;
}
from_register_u8!(AlarmHours);

impl From<AlarmHours> for Hours {
    /// Drops the mask bit, leaving the same layout as the timekeeping hours register.
    fn from(v: AlarmHours) -> Self {
        Hours(v.0 & !ALARM_MASK_BIT)
    }
}

bitfield! {
    /// Alarm Day/Date register with mask bit and DY/DT control (used by both Alarm 1 and Alarm 2).
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    pub struct AlarmDayDate(u8);
    impl Debug;
    /// Alarm mask bit 4 (A1M4/A2M4)
    pub alarm_mask4, set_alarm_mask4: 7;
    /// Day/Date select (1=day of week, 0=date of month)
    pub from into DayDateSelect, day_date_select, set_day_date_select: 6, 6;
    /// Tens place of date (0-3) when DY/DT=0
    pub ten_date, set_ten_date: 5, 4;
    /// Ones place of date (0-9) when DY/DT=0
    pub date, set_date: 3, 0;
    /// Day of week (1-7) when DY/DT=1
    pub day, set_day: 2, 0;
}
from_register_u8!(AlarmDayDate);
