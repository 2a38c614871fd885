//! Measurement settings and their register encodings.
//!
//! The sensor is configured through three control registers, see the datasheet section 5.4:
//!
//! ```text
//! ctrl_hum  (0xF2)  [2:0] osrs_h                        (BME280 only)
//! ctrl_meas (0xF4)  [7:5] osrs_t  [4:2] osrs_p  [1:0] mode
//! config    (0xF5)  [7:5] t_sb    [4:2] filter  [0]   spi3w_en
//! ```
//!
//! Changes to `ctrl_hum` only become effective after a write to `ctrl_meas`, and writes to
//! `config` may be ignored while the sensor is in normal mode. `Bmx280::configure` writes the
//! registers in the order the sensor needs them.
use core::time::Duration;

use crate::Chip;

/// Oversampling setting for one measurement channel.
///
/// Skipping a channel disables it; the sensor then reports the reset value `0x80000` for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "use-defmt", derive(defmt::Format))]
pub enum Oversampling {
    Skip = 0b000,
    X1 = 0b001,
    X2 = 0b010,
    X4 = 0b011,
    X8 = 0b100,
    X16 = 0b101,
}

/// IIR filter coefficient, datasheet section 3.4.4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "use-defmt", derive(defmt::Format))]
pub enum Filter {
    Off = 0b000,
    X2 = 0b001,
    X4 = 0b010,
    X8 = 0b011,
    X16 = 0b100,
}

/// Inactive duration between two conversions in normal mode.
///
/// The two chips share the first six codes. The last two are 10 and 20 ms on the BME280
/// (datasheet table 27) but 2000 and 4000 ms on the BMP280, so `Millis10`/`Millis20` only exist
/// on the BME280 and `Millis2000`/`Millis4000` only on the BMP280. `Bmx280::configure` rejects
/// the ones the detected chip doesn't have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "use-defmt", derive(defmt::Format))]
pub enum Standby {
    Micros500,
    Micros62500,
    Millis125,
    Millis250,
    Millis500,
    Millis1000,
    /// BME280 only.
    Millis10,
    /// BME280 only.
    Millis20,
    /// BMP280 only.
    Millis2000,
    /// BMP280 only.
    Millis4000,
}

impl Standby {
    /// The t_sb field for this interval on `chip`, or `None` if the chip can't do it.
    pub(crate) const fn bits(self, chip: Chip) -> Option<u8> {
        match (self, chip.has_humidity()) {
            (Standby::Micros500, _) => Some(0b000),
            (Standby::Micros62500, _) => Some(0b001),
            (Standby::Millis125, _) => Some(0b010),
            (Standby::Millis250, _) => Some(0b011),
            (Standby::Millis500, _) => Some(0b100),
            (Standby::Millis1000, _) => Some(0b101),
            (Standby::Millis10, true) | (Standby::Millis2000, false) => Some(0b110),
            (Standby::Millis20, true) | (Standby::Millis4000, false) => Some(0b111),
            (Standby::Millis10 | Standby::Millis20, false)
            | (Standby::Millis2000 | Standby::Millis4000, true) => None,
        }
    }

    /// Check if `chip` has this interval.
    pub const fn is_supported_by(self, chip: Chip) -> bool {
        self.bits(chip).is_some()
    }

    /// The standby interval as a duration.
    pub const fn duration(self) -> Duration {
        match self {
            Standby::Micros500 => Duration::from_micros(500),
            Standby::Micros62500 => Duration::from_micros(62_500),
            Standby::Millis125 => Duration::from_millis(125),
            Standby::Millis250 => Duration::from_millis(250),
            Standby::Millis500 => Duration::from_millis(500),
            Standby::Millis1000 => Duration::from_millis(1000),
            Standby::Millis10 => Duration::from_millis(10),
            Standby::Millis20 => Duration::from_millis(20),
            Standby::Millis2000 => Duration::from_millis(2000),
            Standby::Millis4000 => Duration::from_millis(4000),
        }
    }
}

/// Sensor operating mode.
///
/// * Sleep: no conversions, all registers accessible. This is the mode after power on and reset.
/// * Forced: one conversion, after which the sensor goes back to sleep by itself.
/// * Normal: conversions repeat forever, separated by the configured `Standby` interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "use-defmt", derive(defmt::Format))]
pub enum Mode {
    Sleep,
    Forced,
    Normal,
}

impl Mode {
    /// Mode field of the ctrl_meas register.
    pub(crate) const fn bits(self) -> u8 {
        match self {
            Mode::Sleep => 0b00,
            Mode::Forced => 0b01,
            Mode::Normal => 0b11,
        }
    }

    /// Decode the two mode bits of ctrl_meas. Both `01` and `10` mean forced mode.
    pub(crate) const fn from_bits(bits: u8) -> Mode {
        match bits & 0b11 {
            0b00 => Mode::Sleep,
            0b11 => Mode::Normal,
            _ => Mode::Forced,
        }
    }
}

/// Measurement configuration, written by `Bmx280::configure`.
///
/// `mode` is optional: with `None` the sensor keeps whatever mode it is in, so the same `Config`
/// can be re-applied without starting or stopping conversions.
///
/// ```
/// use bmx280_driver::{Config, Filter, Mode, Oversampling, Standby};
///
/// const WEATHER_STATION: Config = Config {
///     temperature: Oversampling::X1,
///     pressure: Oversampling::X1,
///     humidity: Oversampling::X1,
///     filter: Filter::Off,
///     standby: Standby::Millis1000,
///     mode: Some(Mode::Forced),
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "use-defmt", derive(defmt::Format))]
pub struct Config {
    pub temperature: Oversampling,
    pub pressure: Oversampling,
    /// Ignored on the BMP280, which has no humidity channel.
    pub humidity: Oversampling,
    pub filter: Filter,
    pub standby: Standby,
    pub mode: Option<Mode>,
}

impl Config {
    /// x4 oversampling on every channel, no filtering, one conversion per second in normal mode.
    pub const fn new() -> Self {
        Config {
            temperature: Oversampling::X4,
            pressure: Oversampling::X4,
            humidity: Oversampling::X4,
            filter: Filter::Off,
            standby: Standby::Millis1000,
            mode: None,
        }
    }

    /// Value for the ctrl_hum register.
    pub(crate) const fn ctrl_hum(&self) -> u8 {
        self.humidity as u8
    }

    /// Value for the config register on `chip`, `None` if the standby interval doesn't exist
    /// there. 3-wire SPI (bit 0) always stays disabled.
    pub(crate) const fn config(&self, chip: Chip) -> Option<u8> {
        match self.standby.bits(chip) {
            Some(t_sb) => Some((t_sb << 5) | ((self.filter as u8) << 2)),
            None => None,
        }
    }

    /// Value for the ctrl_meas register, with the given mode in the low bits.
    pub(crate) const fn ctrl_meas(&self, mode: Mode) -> u8 {
        ((self.temperature as u8) << 5) | ((self.pressure as u8) << 2) | mode.bits()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, Filter, Mode, Oversampling, Standby};
    use crate::{Bmp280Revision, Chip};
    use core::time::Duration;

    const BMP280: Chip = Chip::Bmp280(Bmp280Revision::Production);

    /// Mode bits survive the round trip through ctrl_meas.
    #[test]
    fn mode_bits() {
        assert_eq!(Mode::from_bits(Mode::Sleep.bits()), Mode::Sleep);
        assert_eq!(Mode::from_bits(Mode::Forced.bits()), Mode::Forced);
        assert_eq!(Mode::from_bits(Mode::Normal.bits()), Mode::Normal);
    }

    /// The datasheet lists both 01 and 10 as forced mode.
    #[test]
    fn mode_bits_alternate_forced() {
        assert_eq!(Mode::from_bits(0b10), Mode::Forced);
        // Oversampling bits above the mode field are ignored.
        assert_eq!(Mode::from_bits(0b1011_0110), Mode::Forced);
        assert_eq!(Mode::from_bits(0b1011_0100), Mode::Sleep);
    }

    /// Check the register values for a typical configuration.
    #[test]
    fn register_values() {
        let config = Config {
            temperature: Oversampling::X2,
            pressure: Oversampling::X16,
            humidity: Oversampling::X1,
            filter: Filter::X16,
            standby: Standby::Millis500,
            mode: None,
        };

        assert_eq!(config.ctrl_hum(), 0b0000_0001);
        // t_sb 0b100, filter 0b100, spi3w_en 0.
        assert_eq!(config.config(Chip::Bme280), Some(0b1001_0000));
        assert_eq!(config.config(BMP280), Some(0b1001_0000));
        // osrs_t 0b010, osrs_p 0b101, mode 0b11.
        assert_eq!(config.ctrl_meas(Mode::Normal), 0b0101_0111);
        assert_eq!(config.ctrl_meas(Mode::Sleep), 0b0101_0100);
    }

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config, Config::new());
        assert_eq!(config.mode, None);
        // 0x6C: x4 temperature, x4 pressure.
        assert_eq!(config.ctrl_meas(Mode::Sleep), 0b0110_1100);
        // 0xA0: 1000ms standby, filter off.
        assert_eq!(config.config(Chip::Bme280), Some(0b1010_0000));
    }

    #[test]
    fn standby_durations() {
        assert_eq!(Standby::Micros500.duration(), Duration::from_micros(500));
        assert_eq!(Standby::Millis10.duration(), Duration::from_millis(10));
        assert_eq!(Standby::Millis1000.duration(), Duration::from_secs(1));
        assert_eq!(Standby::Millis4000.duration(), Duration::from_secs(4));
    }

    /// The two top t_sb codes mean different intervals on the two chips.
    #[test]
    fn standby_bits_per_chip() {
        assert_eq!(Standby::Millis1000.bits(Chip::Bme280), Some(0b101));
        assert_eq!(Standby::Millis1000.bits(BMP280), Some(0b101));

        assert_eq!(Standby::Millis10.bits(Chip::Bme280), Some(0b110));
        assert_eq!(Standby::Millis20.bits(Chip::Bme280), Some(0b111));
        assert_eq!(Standby::Millis2000.bits(Chip::Bme280), None);
        assert_eq!(Standby::Millis4000.bits(Chip::Bme280), None);

        assert_eq!(Standby::Millis2000.bits(BMP280), Some(0b110));
        assert_eq!(Standby::Millis4000.bits(BMP280), Some(0b111));
        assert_eq!(Standby::Millis10.bits(BMP280), None);
        assert_eq!(Standby::Millis20.bits(BMP280), None);

        assert!(Standby::Millis20.is_supported_by(Chip::Bme280));
        assert!(!Standby::Millis20.is_supported_by(BMP280));
    }

    #[test]
    fn config_rejects_missing_standby() {
        let config = Config {
            standby: Standby::Millis2000,
            ..Config::new()
        };
        assert_eq!(config.config(Chip::Bme280), None);
        // t_sb 0b110 on the BMP280.
        assert_eq!(config.config(BMP280), Some(0b1100_0000));
    }
}
