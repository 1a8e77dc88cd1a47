//! Alarm codec for the DS323x alarm registers.
//!
//! Alarm 1 occupies 4 registers (seconds, minutes, hours, day/date) and
//! Alarm 2 occupies 3 (no seconds). Bit 7 of each register is a mask bit:
//! when set the field is left out of the comparison. Bit 6 of the day/date
//! register selects day of week instead of date of month.
//!
//! Both alarms are handled through the same 4-byte block. For Alarm 2 byte 0
//! does not exist on the chip: it reads as zero and is never written.
//!
//! # Modes
//!
//! The mask bits (A1M1..A1M4 in bits 0..3) and, when all of them are clear,
//! the DY/DT bit (in bit 4) select one of the [`AlarmMode`] values:
//!
//! | flags  | Alarm 1        | Alarm 2        |
//! |--------|----------------|----------------|
//! | `0x0F` | `PerSecond`    | (cannot occur) |
//! | `0x0E` | `SecondsMatch` | `PerMinute`    |
//! | `0x0C` | `MinutesMatch` | `MinutesMatch` |
//! | `0x08` | `HoursMatch`   | `HoursMatch`   |
//! | `0x00` | `DateMatch`    | `DateMatch`    |
//! | `0x10` | `DayMatch`     | `DayMatch`     |
//!
//! Any other pattern decodes as `Unknown`.
//!
//! # Off
//!
//! The datasheet has no "off" encoding. This crate treats a date match on
//! date 0 or a day match on day 0 as [`AlarmMode::Off`], since such an alarm
//! never fires. [`AlarmSpec::decode_strict`] reports the raw mode instead.

use crate::calendar::{decode_hours, dec_to_bcd, CalendarTime};
use crate::registers::{
    AlarmDayDate, AlarmHours, AlarmMinutes, AlarmSeconds, ControlBits, DayDateSelect, Hours,
    RegAddr, StatusBits, ALARM1_LEN, ALARM2_LEN, ALARM_DAY_SELECT_BIT, ALARM_MASK_BIT,
};

/// Error type for alarm operations.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmError {
    /// Alarm number other than 1 or 2
    InvalidAlarm(u8),
    /// The mode has no register encoding
    UnencodableMode(AlarmMode),
}

/// One of the two alarms of the chip.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Alarm {
    /// Alarm 1: seconds precision, registers 0x07-0x0A
    One = 1,
    /// Alarm 2: minute precision, registers 0x0B-0x0D
    Two = 2,
}

impl Alarm {
    /// First register of this alarm.
    #[must_use]
    pub fn address(self) -> RegAddr {
        match self {
            Alarm::One => RegAddr::Alarm1Seconds,
            Alarm::Two => RegAddr::Alarm2Minutes,
        }
    }

    /// Number of registers the chip has for this alarm.
    #[must_use]
    pub fn register_count(self) -> usize {
        match self {
            Alarm::One => ALARM1_LEN,
            Alarm::Two => ALARM2_LEN,
        }
    }

    /// Index in the 4-byte alarm block of the first byte that exists on the chip.
    #[must_use]
    pub fn block_offset(self) -> usize {
        ALARM1_LEN - self.register_count()
    }

    /// This alarm's flag in the status register (A1F/A2F).
    #[must_use]
    pub fn flag_bit(self) -> u8 {
        match self {
            Alarm::One => StatusBits::A1F,
            Alarm::Two => StatusBits::A2F,
        }
    }

    /// This alarm's interrupt enable in the control register (A1IE/A2IE).
    #[must_use]
    pub fn interrupt_enable_bit(self) -> u8 {
        match self {
            Alarm::One => ControlBits::A1IE,
            Alarm::Two => ControlBits::A2IE,
        }
    }
}

impl TryFrom<u8> for Alarm {
    type Error = AlarmError;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        match number {
            1 => Ok(Alarm::One),
            2 => Ok(Alarm::Two),
            n => Err(AlarmError::InvalidAlarm(n)),
        }
    }
}

/// When an alarm fires.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmMode {
    /// Register content matches no known pattern
    #[default]
    Unknown,
    /// Once per second (Alarm 1 only)
    PerSecond,
    /// Once per minute, at 00 seconds (Alarm 2 only)
    PerMinute,
    /// When seconds match (Alarm 1 only)
    SecondsMatch,
    /// When minutes (and seconds) match
    MinutesMatch,
    /// When hours, minutes (and seconds) match
    HoursMatch,
    /// When date of month, hours, minutes (and seconds) match
    DateMatch,
    /// When day of week, hours, minutes (and seconds) match
    DayMatch,
    /// Set to a date or day match on date/day 0, so never fires
    Off,
}

impl AlarmMode {
    fn from_flags(alarm: Alarm, flags: u8) -> Self {
        match flags {
            0x0F => AlarmMode::PerSecond,
            0x0E => match alarm {
                Alarm::One => AlarmMode::SecondsMatch,
                Alarm::Two => AlarmMode::PerMinute,
            },
            0x0C => AlarmMode::MinutesMatch,
            0x08 => AlarmMode::HoursMatch,
            0x00 => AlarmMode::DateMatch,
            0x10 => AlarmMode::DayMatch,
            _ => AlarmMode::Unknown,
        }
    }

    /// Reclassifies a date or day match on day 0 as [`AlarmMode::Off`].
    #[must_use]
    pub fn infer_off(self, time: &CalendarTime) -> Self {
        match self {
            AlarmMode::DateMatch if time.day == 0 => AlarmMode::Off,
            AlarmMode::DayMatch if time.weekday == 0 => AlarmMode::Off,
            mode => mode,
        }
    }
}

/// Decoded alarm: the mode plus the time fields the registers hold.
///
/// Only the fields the mode compares are meaningful. `second` is always 0
/// for Alarm 2. Exactly one of `day` and `weekday` is filled in, chosen by
/// the DY/DT bit.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmSpec {
    /// When the alarm fires
    pub mode: AlarmMode,
    /// Time fields compared by the mode
    pub time: CalendarTime,
}

impl AlarmSpec {
    /// Creates an alarm specification.
    #[must_use]
    pub fn new(mode: AlarmMode, time: CalendarTime) -> Self {
        Self { mode, time }
    }

    /// An alarm that never fires.
    #[must_use]
    pub fn off() -> Self {
        Self::new(AlarmMode::Off, CalendarTime::default())
    }

    /// Decodes an alarm block, including the [`AlarmMode::Off`] convention.
    ///
    /// For [`Alarm::Two`] byte 0 of `block` is ignored.
    #[must_use]
    pub fn decode(alarm: Alarm, block: &[u8; ALARM1_LEN]) -> Self {
        let spec = Self::decode_strict(alarm, block);
        let mode = spec.mode.infer_off(&spec.time);
        if mode != spec.mode {
            debug!("alarm {:?}: {:?} on day 0 treated as off", alarm, spec.mode);
        }
        Self { mode, ..spec }
    }

    /// Decodes an alarm block exactly as the datasheet defines it, without
    /// the [`AlarmMode::Off`] convention.
    #[must_use]
    pub fn decode_strict(alarm: Alarm, block: &[u8; ALARM1_LEN]) -> Self {
        let regs = AlarmRegisters::from_block(alarm, block);
        let flags = regs.mode_flags();
        let mode = AlarmMode::from_flags(alarm, flags);
        debug!("alarm {:?}: flags={:#x} mode={:?}", alarm, flags, mode);

        let mut time = CalendarTime::default();
        if alarm == Alarm::One {
            time.second = 10 * regs.seconds.ten_seconds() + regs.seconds.seconds();
        }
        time.minute = 10 * regs.minutes.ten_minutes() + regs.minutes.minutes();
        time.hour = decode_hours(Hours::from(regs.hours));
        match regs.day_date.day_date_select() {
            DayDateSelect::Date => {
                time.day = 10 * regs.day_date.ten_date() + regs.day_date.date();
            }
            DayDateSelect::Day => time.weekday = regs.day_date.day(),
        }

        Self { mode, time }
    }

    /// Decodes an alarm block for an alarm given by number.
    ///
    /// Numbers other than 1 and 2 give [`AlarmMode::Unknown`] and a zeroed time.
    #[must_use]
    pub fn decode_numbered(number: u8, block: &[u8; ALARM1_LEN]) -> Self {
        match Alarm::try_from(number) {
            Ok(alarm) => Self::decode(alarm, block),
            Err(_) => {
                debug!("alarm number {} out of range", number);
                Self::default()
            }
        }
    }

    /// Encodes the 4-byte alarm block.
    ///
    /// The device writes `block[alarm.block_offset()..]`, so byte 0 is dropped
    /// for [`Alarm::Two`]. Fields the mode does not compare are written with
    /// their mask bit set.
    ///
    /// # Errors
    ///
    /// Returns [`AlarmError::UnencodableMode`] for [`AlarmMode::Unknown`].
    pub fn encode(&self) -> Result<[u8; ALARM1_LEN], AlarmError> {
        const MASKED: u8 = ALARM_MASK_BIT;

        let t = &self.time;
        let second = dec_to_bcd(t.second);
        let minute = dec_to_bcd(t.minute);
        let hour = dec_to_bcd(t.hour);

        let block = match self.mode {
            AlarmMode::PerSecond => [MASKED, MASKED, MASKED, MASKED],
            AlarmMode::PerMinute => [0x00, MASKED, MASKED, MASKED],
            AlarmMode::SecondsMatch => [second, MASKED, MASKED, MASKED],
            AlarmMode::MinutesMatch => [second, minute, MASKED, MASKED],
            AlarmMode::HoursMatch => [second, minute, hour, MASKED],
            AlarmMode::DateMatch => [second, minute, hour, dec_to_bcd(t.day)],
            AlarmMode::DayMatch => [
                second,
                minute,
                hour,
                ALARM_DAY_SELECT_BIT | dec_to_bcd(t.weekday),
            ],
            AlarmMode::Off => [0x00; ALARM1_LEN],
            AlarmMode::Unknown => {
                warn!("refusing to encode alarm mode {:?}", self.mode);
                return Err(AlarmError::UnencodableMode(self.mode));
            }
        };
        Ok(block)
    }
}

/// Register view of an alarm block.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct AlarmRegisters {
    seconds: AlarmSeconds,
    minutes: AlarmMinutes,
    hours: AlarmHours,
    day_date: AlarmDayDate,
}

impl AlarmRegisters {
    fn from_block(alarm: Alarm, block: &[u8; ALARM1_LEN]) -> Self {
        let seconds = match alarm {
            Alarm::One => block[0],
            Alarm::Two => 0,
        };
        Self {
            seconds: AlarmSeconds::from(seconds),
            minutes: AlarmMinutes::from(block[1]),
            hours: AlarmHours::from(block[2]),
            day_date: AlarmDayDate::from(block[3]),
        }
    }

    /// Mask bits in bits 0..3; when they are all clear, DY/DT in bit 4.
    fn mode_flags(&self) -> u8 {
        let flags = u8::from(self.seconds.alarm_mask1())
            | u8::from(self.minutes.alarm_mask2()) << 1
            | u8::from(self.hours.alarm_mask3()) << 2
            | u8::from(self.day_date.alarm_mask4()) << 3;
        if flags == 0 {
            u8::from(self.day_date.day_date_select()) << 4
        } else {
            flags
        }
    }
}
