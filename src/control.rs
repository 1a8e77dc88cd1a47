//! INT/SQW pin modes and device configuration.

use crate::registers::{Control, ConversionRate, InterruptControl, SquareWaveFrequency};

/// Function of the INT/SQW pin.
///
/// Each mode owns the low five bits of the control register (RS2, RS1,
/// INTCN, A2IE, A1IE). EOSC, BBSQW and CONV are left untouched.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SqiMode {
    /// Interrupt mode with both alarm interrupts disabled (power-on state)
    #[default]
    None,
    /// 1 Hz square wave
    Hz1,
    /// 1.024 kHz square wave
    Hz1024,
    /// 4.096 kHz square wave
    Hz4096,
    /// 8.192 kHz square wave
    Hz8192,
    /// Interrupt on Alarm 1
    Alarm1,
    /// Interrupt on Alarm 2
    Alarm2,
    /// Interrupt on either alarm
    AlarmBoth,
}

impl SqiMode {
    /// Low control bits of this mode.
    #[must_use]
    pub fn bits(self) -> u8 {
        u8::from(self.apply(Control::default()))
    }

    /// Replaces the low five bits of `control` with this mode.
    #[must_use]
    pub fn apply(self, control: Control) -> Control {
        let (interrupt_control, frequency) = match self {
            SqiMode::Hz1 => (InterruptControl::SquareWave, SquareWaveFrequency::Hz1),
            SqiMode::Hz1024 => (InterruptControl::SquareWave, SquareWaveFrequency::Hz1024),
            SqiMode::Hz4096 => (InterruptControl::SquareWave, SquareWaveFrequency::Hz4096),
            SqiMode::Hz8192 => (InterruptControl::SquareWave, SquareWaveFrequency::Hz8192),
            SqiMode::None | SqiMode::Alarm1 | SqiMode::Alarm2 | SqiMode::AlarmBoth => {
                (InterruptControl::Interrupt, SquareWaveFrequency::Hz1)
            }
        };
        let alarm1 = matches!(self, SqiMode::Alarm1 | SqiMode::AlarmBoth);
        let alarm2 = matches!(self, SqiMode::Alarm2 | SqiMode::AlarmBoth);

        let mut control = control;
        control.set_interrupt_control(interrupt_control);
        control.set_square_wave_frequency(frequency);
        control.set_alarm1_interrupt_enable(alarm1);
        control.set_alarm2_interrupt_enable(alarm2);
        control
    }

    /// Reads the mode back from a control register.
    ///
    /// In interrupt mode (INTCN set) the alarm enables decide; otherwise the
    /// rate select bits do. Stale alarm enables in square wave mode are ignored.
    #[must_use]
    pub fn from_control(control: Control) -> Self {
        match control.interrupt_control() {
            InterruptControl::Interrupt => match (
                control.alarm1_interrupt_enable(),
                control.alarm2_interrupt_enable(),
            ) {
                (false, false) => SqiMode::None,
                (true, false) => SqiMode::Alarm1,
                (false, true) => SqiMode::Alarm2,
                (true, true) => SqiMode::AlarmBoth,
            },
            InterruptControl::SquareWave => match control.square_wave_frequency() {
                SquareWaveFrequency::Hz1 => SqiMode::Hz1,
                SquareWaveFrequency::Hz1024 => SqiMode::Hz1024,
                SquareWaveFrequency::Hz4096 => SqiMode::Hz4096,
                SquareWaveFrequency::Hz8192 => SqiMode::Hz8192,
            },
        }
    }
}

/// Settings applied by [`RtcDevice::configure`](crate::RtcDevice::configure).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Keep the oscillator running on battery (EOSC cleared)
    pub battery_backed_oscillator: bool,
    /// Keep the square wave running on battery (BBSQW)
    pub battery_backed_square_wave: bool,
    /// Function of the INT/SQW pin
    pub sqi_mode: SqiMode,
    /// Temperature conversion interval (DS3232/DS3234)
    pub conversion_rate: ConversionRate,
    /// Drive the 32kHz output pin (EN32KHZ)
    pub enable_32khz_output: bool,
}

impl Default for Config {
    /// The chip's power-on state.
    fn default() -> Self {
        Self {
            battery_backed_oscillator: true,
            battery_backed_square_wave: false,
            sqi_mode: SqiMode::None,
            conversion_rate: ConversionRate::Seconds64,
            enable_32khz_output: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_MODES: [SqiMode; 8] = [
        SqiMode::None,
        SqiMode::Hz1,
        SqiMode::Hz1024,
        SqiMode::Hz4096,
        SqiMode::Hz8192,
        SqiMode::Alarm1,
        SqiMode::Alarm2,
        SqiMode::AlarmBoth,
    ];

    #[test]
    fn test_sqi_mode_bits() {
        assert_eq!(SqiMode::None.bits(), 0x04);
        assert_eq!(SqiMode::Hz1.bits(), 0x00);
        assert_eq!(SqiMode::Hz1024.bits(), 0x08);
        assert_eq!(SqiMode::Hz4096.bits(), 0x10);
        assert_eq!(SqiMode::Hz8192.bits(), 0x18);
        assert_eq!(SqiMode::Alarm1.bits(), 0x05);
        assert_eq!(SqiMode::Alarm2.bits(), 0x06);
        assert_eq!(SqiMode::AlarmBoth.bits(), 0x07);
    }

    #[test]
    fn test_apply_preserves_high_bits() {
        let control = Control::from(0xFF);
        assert_eq!(u8::from(SqiMode::Hz1.apply(control)), 0xE0);
        assert_eq!(u8::from(SqiMode::Alarm1.apply(control)), 0xE5);

        let control = Control::from(0x1F);
        assert_eq!(u8::from(SqiMode::Hz4096.apply(control)), 0x10);
    }

    #[test]
    fn test_apply_uses_register_fields() {
        let control = SqiMode::Hz8192.apply(Control::from(0x07));
        assert_eq!(control.interrupt_control(), InterruptControl::SquareWave);
        assert_eq!(control.square_wave_frequency(), SquareWaveFrequency::Hz8192);
        assert!(!control.alarm1_interrupt_enable());
        assert!(!control.alarm2_interrupt_enable());
        assert_eq!(u8::from(control), 0x18);

        let control = SqiMode::Alarm2.apply(Control::from(0x18));
        assert_eq!(control.interrupt_control(), InterruptControl::Interrupt);
        assert_eq!(control.square_wave_frequency(), SquareWaveFrequency::Hz1);
        assert!(control.alarm2_interrupt_enable());
        assert_eq!(u8::from(control), 0x06);
    }

    #[test]
    fn test_apply_then_read_back() {
        for mode in ALL_MODES {
            for high in [0x00, 0x20, 0x40, 0x80, 0xE0] {
                let control = mode.apply(Control::from(high | 0x1F));
                assert_eq!(SqiMode::from_control(control), mode);
            }
        }
    }

    #[test]
    fn test_square_wave_ignores_stale_alarm_enables() {
        // INTCN clear, RS1 set, A1IE left over
        assert_eq!(SqiMode::from_control(Control::from(0x09)), SqiMode::Hz1024);
    }

    #[test]
    fn test_power_on_control_reads_as_none() {
        // EOSC=0, BBSQW=0, CONV=0, RS2=RS1=1, INTCN=1
        assert_eq!(SqiMode::from_control(Control::from(0x1C)), SqiMode::None);
    }

    #[test]
    fn test_config_default_is_power_on_state() {
        let config = Config::default();
        assert!(config.battery_backed_oscillator);
        assert!(!config.battery_backed_square_wave);
        assert_eq!(config.sqi_mode, SqiMode::None);
        assert_eq!(config.conversion_rate, ConversionRate::Seconds64);
        assert!(config.enable_32khz_output);
    }
}
