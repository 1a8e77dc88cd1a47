//! Calendar codec for the DS323x time and date registers.
//!
//! The chip stores the time and date in 7 consecutive BCD registers:
//! seconds, minutes, hours, day of week, date, month (with the century flag)
//! and year. This module converts that block to and from [`CalendarTime`],
//! and optionally to and from chrono's `NaiveDateTime`.
//!
//! # Decoding
//!
//! Decoding never fails. Out-of-range register content is passed through as
//! whatever number the BCD digits spell. Hours written by other software in
//! 12-hour mode are converted to 24-hour values.
//!
//! # Encoding
//!
//! Encoding always produces 24-hour registers. A weekday outside 1-7 is
//! written as 1. Years 100-199 set the century flag in the month register.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::registers::{
    Date, Day, Hours, Minutes, Month, Seconds, TimeRepresentation, Year, DATETIME_LEN, DATE_LEN,
    TIME_LEN,
};

/// Converts a packed BCD byte to its decimal value.
#[must_use]
pub const fn bcd_to_dec(value: u8) -> u8 {
    (value >> 4) * 10 + (value & 0x0F)
}

/// Converts a decimal value (0-99) to a packed BCD byte.
#[must_use]
pub const fn dec_to_bcd(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

/// Calendar fields as stored by the chip.
///
/// `year` is the offset from 2000 (0-199). `weekday` is 1-7; which day 1 is
/// belongs to the application, except for the chrono conversions which use
/// 1 = Sunday.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalendarTime {
    /// Seconds (0-59)
    pub second: u8,
    /// Minutes (0-59)
    pub minute: u8,
    /// Hours in 24-hour form (0-23)
    pub hour: u8,
    /// Day of week (1-7)
    pub weekday: u8,
    /// Day of month (1-31)
    pub day: u8,
    /// Month (1-12)
    pub month: u8,
    /// Years since 2000 (0-199)
    pub year: u8,
}

impl CalendarTime {
    /// Decodes the 7-byte time and date block.
    #[must_use]
    pub fn decode(data: &[u8; DATETIME_LEN]) -> Self {
        DateTimeRegisters::from(*data).into_calendar()
    }

    /// Encodes all 7 time and date registers, written at `RegAddr::Seconds`.
    #[must_use]
    pub fn encode(&self) -> [u8; DATETIME_LEN] {
        (&DateTimeRegisters::from_calendar(self)).into()
    }

    /// Encodes only seconds, minutes and hours, written at `RegAddr::Seconds`.
    #[must_use]
    pub fn encode_time(&self) -> [u8; TIME_LEN] {
        let data = self.encode();
        [data[0], data[1], data[2]]
    }

    /// Encodes only day of week, date, month and year, written at `RegAddr::Day`.
    #[must_use]
    pub fn encode_date(&self) -> [u8; DATE_LEN] {
        let data = self.encode();
        [data[3], data[4], data[5], data[6]]
    }

    /// The weekday that will be written: anything outside 1-7 becomes 1.
    #[must_use]
    pub fn normalized_weekday(&self) -> u8 {
        if self.weekday == 0 || self.weekday > 7 {
            1
        } else {
            self.weekday
        }
    }

    /// Returns a copy with `weekday` derived from the date (1 = Sunday).
    ///
    /// # Errors
    ///
    /// Returns [`DateTimeError::InvalidDateTime`] if day, month and year do not
    /// form a real date.
    pub fn with_weekday_from_date(self) -> Result<Self, DateTimeError> {
        let date = NaiveDate::from_ymd_opt(
            2000 + i32::from(self.year),
            u32::from(self.month),
            u32::from(self.day),
        )
        .ok_or(DateTimeError::InvalidDateTime)?;
        Ok(Self {
            weekday: narrow(date.weekday().number_from_sunday())?,
            ..self
        })
    }
}

/// Decodes an hours register, in either 12- or 24-hour form, to 0-23.
pub(crate) fn decode_hours(hours: Hours) -> u8 {
    let value = 10 * hours.ten_hours() + hours.hours();
    match hours.time_representation() {
        TimeRepresentation::TwentyFourHour => value + 20 * hours.pm_or_twenty_hours(),
        TimeRepresentation::TwelveHour => {
            let is_pm = hours.pm_or_twenty_hours() != 0;
            match (value, is_pm) {
                (12, false) => 0,    // 12 AM = 0:xx
                (12, true) => 12,    // 12 PM = 12:xx
                (h, false) => h,     // 1-11 AM = 1-11:xx
                (h, true) => h + 12, // 1-11 PM = 13-23:xx
            }
        }
    }
}

fn narrow(value: u32) -> Result<u8, DateTimeError> {
    u8::try_from(value).map_err(|_| DateTimeError::InvalidDateTime)
}

/// Register view of the time and date block.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct DateTimeRegisters {
    seconds: Seconds,
    minutes: Minutes,
    hours: Hours,
    day: Day,
    date: Date,
    month: Month,
    year: Year,
}

impl DateTimeRegisters {
    fn from_calendar(time: &CalendarTime) -> Self {
        let mut month = Month::from(dec_to_bcd(time.month));
        month.set_century(time.year >= 100);

        let raw = DateTimeRegisters {
            seconds: Seconds::from(dec_to_bcd(time.second)),
            minutes: Minutes::from(dec_to_bcd(time.minute)),
            hours: Hours::from(dec_to_bcd(time.hour)),
            day: Day::from(time.normalized_weekday()),
            date: Date::from(dec_to_bcd(time.day)),
            month,
            year: Year::from(dec_to_bcd(time.year % 100)),
        };
        debug!("encoded calendar registers: {:?}", <[u8; DATETIME_LEN]>::from(&raw));
        raw
    }

    fn into_calendar(self) -> CalendarTime {
        let century = if self.month.century() { 100 } else { 0 };
        CalendarTime {
            second: 10 * self.seconds.ten_seconds() + self.seconds.seconds(),
            minute: 10 * self.minutes.ten_minutes() + self.minutes.minutes(),
            hour: decode_hours(self.hours),
            weekday: self.day.day(),
            day: 10 * self.date.ten_date() + self.date.date(),
            month: 10 * self.month.ten_month() + self.month.month(),
            // Garbage BCD (0xFF) plus the century would overflow
            year: (10 * self.year.ten_year() + self.year.year()).wrapping_add(century),
        }
    }
}

impl From<[u8; DATETIME_LEN]> for DateTimeRegisters {
    fn from(data: [u8; DATETIME_LEN]) -> Self {
        DateTimeRegisters {
            seconds: Seconds::from(data[0]),
            minutes: Minutes::from(data[1]),
            hours: Hours::from(data[2]),
            day: Day::from(data[3]),
            date: Date::from(data[4]),
            month: Month::from(data[5]),
            year: Year::from(data[6]),
        }
    }
}

impl From<&DateTimeRegisters> for [u8; DATETIME_LEN] {
    fn from(dt: &DateTimeRegisters) -> [u8; DATETIME_LEN] {
        [
            dt.seconds.into(),
            dt.minutes.into(),
            dt.hours.into(),
            dt.day.into(),
            dt.date.into(),
            dt.month.into(),
            dt.year.into(),
        ]
    }
}

impl TryFrom<&NaiveDateTime> for CalendarTime {
    type Error = DateTimeError;

    /// Converts a chrono date and time; the weekday is derived with 1 = Sunday.
    fn try_from(datetime: &NaiveDateTime) -> Result<Self, Self::Error> {
        let year = datetime.year();
        if year > 2199 {
            error!("Year {} is too late! must be before 2200", year);
            return Err(DateTimeError::YearNotBefore2200);
        }
        if year < 2000 {
            error!("Year {} is too early! must be greater than 1999", year);
            return Err(DateTimeError::YearNotAfter1999);
        }

        Ok(CalendarTime {
            second: narrow(datetime.second())?,
            minute: narrow(datetime.minute())?,
            hour: narrow(datetime.hour())?,
            weekday: narrow(datetime.weekday().number_from_sunday())?,
            day: narrow(datetime.day())?,
            month: narrow(datetime.month())?,
            year: u8::try_from(year - 2000).map_err(|_| DateTimeError::InvalidDateTime)?,
        })
    }
}

impl TryFrom<&CalendarTime> for NaiveDateTime {
    type Error = DateTimeError;

    fn try_from(time: &CalendarTime) -> Result<Self, Self::Error> {
        NaiveDate::from_ymd_opt(
            2000 + i32::from(time.year),
            u32::from(time.month),
            u32::from(time.day),
        )
        .and_then(|d| {
            d.and_hms_opt(
                u32::from(time.hour),
                u32::from(time.minute),
                u32::from(time.second),
            )
        })
        .ok_or(DateTimeError::InvalidDateTime)
    }
}

/// Errors that can occur converting between [`CalendarTime`] and chrono types.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DateTimeError {
    /// The fields do not form a real date and time
    InvalidDateTime,
    /// The year is not before 2200 (the chip only counts to 2199)
    YearNotBefore2200,
    /// The year is not after 1999 (the chip starts at 2000)
    YearNotAfter1999,
}
