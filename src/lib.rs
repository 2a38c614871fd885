#![cfg_attr(not(test), no_std)]
//! BME280 and BMP280 driver.
//!
//! Example:
//!
//!     # use embedded_hal_mock::eh1::i2c::Mock as I2cMock;
//!     # use embedded_hal_mock::eh1::i2c::Transaction;
//!     # let expectations = vec![
//!     #     // Chip id register, a BME280 answers on the low address.
//!     #     Transaction::write_read(0x76, vec![0xD0], vec![0x60]),
//!     #     // Both calibration banks.
//!     #     Transaction::write_read(0x76, vec![0x88], vec![0; 26]),
//!     #     Transaction::write_read(0x76, vec![0xE1], vec![0; 7]),
//!     #     // configure: ctrl_hum, config, ctrl_meas in one write.
//!     #     Transaction::write(0x76, vec![0xF2, 0x03, 0xF5, 0xA0, 0xF4, 0x6D]),
//!     #     // is_sampling - measuring bit is clear.
//!     #     Transaction::write_read(0x76, vec![0xF3], vec![0b0000_0000]),
//!     #     // Eight data registers.
//!     #     Transaction::write_read(0x76, vec![0xF7], vec![0; 8]),
//!     # ];
//!     # let mock_i2c = I2cMock::new(&expectations);
//!     use bmx280_driver::{Bmx280, Config, Mode};
//!
//!     let mut bmx280 = Bmx280::new(mock_i2c);
//!     let chip = bmx280.init().unwrap();
//!     println!("found {:?}", chip);
//!
//!     let config = Config {
//!         mode: Some(Mode::Forced),
//!         ..Config::default()
//!     };
//!     bmx280.configure(&config).unwrap();
//!     while bmx280.is_sampling().unwrap() {}
//!     let reading = bmx280.readout_float().unwrap();
//!
//!     println!("temperature: {:.2}C", reading.temperature);
//!     println!("pressure: {:.2}Pa", reading.pressure);
//!     println!("humidity: {:.2}%", reading.humidity);
//!     # bmx280.close().done();
//!
//! [BME280 Datasheet](https://www.bosch-sensortec.com/media/boschsensortec/downloads/datasheets/bst-bme280-ds002.pdf)
//!
//! The BMP280 is the same sensor without the humidity channel and has its own datasheet. Register
//! addresses, trim layout and compensation formulas are the same for both, so one driver handles
//! them. All section references in this crate are to the BME280 datasheet, revision 1.6.
//!
//! The below is how the driver and the sensor get from power on to a measurement. The sensor does
//! not tell us when a conversion is done, the caller polls `is_sampling` instead.
//!
//! ```text
//!           Start (Power on)
//!                  │
//!                  ▼
//!    Read chip id (0xD0) at 0x76  ──► unknown ──► Read chip id (0xD0) at 0x77
//!                  │                                   │            │
//!                  ▼                                   ▼            ▼
//!          0x60 / 0x56-0x58   ◄───────────────────  known        unknown ──► NotFound
//!                  │
//!                  ▼
//!    Read calibration 0x88..=0xA1 (+ 0xE1..=0xE7 on BME280)
//!                  │
//!                  ▼
//!    Write ctrl_hum, config, ctrl_meas (mode Forced)  ◄─┐
//!                  │                                    │
//!                  ▼                                    │
//!    Status::Measuring set?  ──► Yes, poll again        │
//!                  │                                    │
//!                  ▼                                    │
//!                 No                                    │
//!                  │                                    │
//!                  ▼                                    │
//!    Read data 0xF7..=0xFE, compensate  ────────────────┘
//! ```
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

#[macro_use]
mod fmt;

mod calibration;
mod config;

pub use calibration::{Calibration, HumidityCalibration};
pub use config::{Config, Filter, Mode, Oversampling, Standby};

use calibration::{RawSample, HIGH_BANK_LEN, LOW_BANK_LEN, LOW_BANK_TP_LEN};

/// Humidity value reported by `readout` when the sensor has no humidity channel.
pub const HUMIDITY_NOT_AVAILABLE: u32 = u32::MAX;

/// I2C address of the sensor, selected by the level of the SDO pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "use-defmt", derive(defmt::Format))]
pub enum Address {
    /// SDO connected to GND.
    Low = 0b0111_0110, // 0x76
    /// SDO connected to V_DDIO.
    High = 0b0111_0111, // 0x77
}

impl From<Address> for u8 {
    fn from(address: Address) -> u8 {
        address as u8
    }
}

/// Registers of the sensor.
///
/// Memory map, datasheet section 5.3, table 18. Multi-byte registers are listed by their first
/// address; the sensor increments its register pointer by itself while reading.
pub enum Register {
    CalibrationLow = 0x88, // 26 bytes up to 0xA1. 0xA0 is unused and 0xA1 is h1 (BME280 only).
    ChipId = 0xD0,         // Read only. See `Chip::from_id` for the known values.
    Reset = 0xE0,          // Write only. Only `RESET_VECTOR` has an effect.
    CalibrationHigh = 0xE1, // 7 bytes up to 0xE7, BME280 only.
    CtrlHum = 0xF2,        // BME280 only. Takes effect after the next write to CtrlMeas.
    Status = 0xF3,         // Read only. See `Status`.
    CtrlMeas = 0xF4,       // Temperature and pressure oversampling, mode.
    Config = 0xF5,         // Standby time, filter. Writes may be ignored in normal mode.
    Data = 0xF7,           // press_msb. 6 bytes up to temp_xlsb, 8 up to hum_lsb on the BME280.
}

/// Writing this to `Register::Reset` performs a complete power-on reset.
pub const RESET_VECTOR: u8 = 0xB6;

/// Most register/value pairs sent in one write transaction.
const MAX_WRITE_PAIRS: usize = 4;

/// Status register bits.
///
/// Table 23, datasheet section 5.4.4.
pub enum Status {
    Measuring = 0b0000_1000, // Status bit for measuring - 4th bit enabled. 1<<3, 0x08.
    // 1 while a conversion is running, 0 when the results are in the data registers.
    ImUpdate = 0b0000_0001, // Status bit for NVM copy - 1st bit enabled. 1<<0, 0x01.
    // 1 while the trim values are copied to the image registers after reset.
}

/// SensorStatus is the content of the status register.
///
/// This is returned from the `status` method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "use-defmt", derive(defmt::Format))]
pub struct SensorStatus(pub u8);

impl SensorStatus {
    /// Create a new SensorStatus from a status register byte.
    pub fn new(status: u8) -> Self {
        SensorStatus(status)
    }

    /// Check if a conversion is running. The data registers hold the previous result until it is
    /// done.
    pub fn is_measuring(self) -> bool {
        (self.0 & Status::Measuring as u8) != 0
    }

    /// Check if the sensor is still copying its trim values after a reset.
    pub fn is_updating(self) -> bool {
        (self.0 & Status::ImUpdate as u8) != 0
    }
}

/// Revisions of the BMP280, told apart by their chip id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "use-defmt", derive(defmt::Format))]
pub enum Bmp280Revision {
    EngineeringSample1,
    EngineeringSample2,
    Production,
}

/// The sensors this driver recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "use-defmt", derive(defmt::Format))]
pub enum Chip {
    /// Pressure, temperature and humidity.
    Bme280,
    /// Pressure and temperature only.
    Bmp280(Bmp280Revision),
}

impl Chip {
    /// Identify a chip from the content of `Register::ChipId`.
    pub const fn from_id(id: u8) -> Option<Chip> {
        match id {
            0x60 => Some(Chip::Bme280),
            0x56 => Some(Chip::Bmp280(Bmp280Revision::EngineeringSample1)),
            0x57 => Some(Chip::Bmp280(Bmp280Revision::EngineeringSample2)),
            0x58 => Some(Chip::Bmp280(Bmp280Revision::Production)),
            _ => None,
        }
    }

    /// The chip id this chip reports.
    pub const fn id(self) -> u8 {
        match self {
            Chip::Bme280 => 0x60,
            Chip::Bmp280(Bmp280Revision::EngineeringSample1) => 0x56,
            Chip::Bmp280(Bmp280Revision::EngineeringSample2) => 0x57,
            Chip::Bmp280(Bmp280Revision::Production) => 0x58,
        }
    }

    /// Only the BME280 measures humidity.
    pub const fn has_humidity(self) -> bool {
        matches!(self, Chip::Bme280)
    }

    /// Number of data registers to read, starting at `Register::Data`.
    const fn data_len(self) -> usize {
        if self.has_humidity() {
            8
        } else {
            6
        }
    }
}

/// Which addresses `init` tries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "use-defmt", derive(defmt::Format))]
pub enum AddressPolicy {
    /// `Address::Low` first, then `Address::High`.
    Any,
    /// Only the given address.
    Only(Address),
}

impl AddressPolicy {
    const fn candidates(self) -> &'static [Address] {
        match self {
            AddressPolicy::Any => &[Address::Low, Address::High],
            AddressPolicy::Only(Address::Low) => &[Address::Low],
            AddressPolicy::Only(Address::High) => &[Address::High],
        }
    }
}

/// Which chips `init` accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "use-defmt", derive(defmt::Format))]
pub enum ChipPolicy {
    Any,
    Bme280Only,
    Bmp280Only,
}

impl ChipPolicy {
    const fn accepts(self, chip: Chip) -> bool {
        match self {
            ChipPolicy::Any => true,
            ChipPolicy::Bme280Only => chip.has_humidity(),
            ChipPolicy::Bmp280Only => !chip.has_humidity(),
        }
    }
}

/// Restricts where `init` looks for a sensor, and what it accepts.
///
/// The default looks at both addresses and accepts both chips. Restricting the search is useful
/// when other devices share the bus, for example a BMP280 and a BME280 on different addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "use-defmt", derive(defmt::Format))]
pub struct ProbePolicy {
    pub address: AddressPolicy,
    pub chip: ChipPolicy,
}

impl ProbePolicy {
    pub const fn new() -> Self {
        ProbePolicy {
            address: AddressPolicy::Any,
            chip: ChipPolicy::Any,
        }
    }
}

impl Default for ProbePolicy {
    fn default() -> Self {
        ProbePolicy::new()
    }
}

/// Readout is a compensated measurement in fixed point.
///
/// This is returned from the `readout` method. You get:
/// * temperature in 0.01 °C, so 2508 is 25.08 °C
/// * pressure in 1/256 Pa, so 25767233 is 100653.25 Pa
/// * humidity in 1/1024 %RH, or `HUMIDITY_NOT_AVAILABLE` on a BMP280
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "use-defmt", derive(defmt::Format))]
pub struct Readout {
    pub temperature: i32,
    pub pressure: u32,
    pub humidity: u32,
}

/// SensorReading is a compensated measurement in floating point.
///
/// This is returned from the `readout_float` method. You get:
/// * temperature in degrees Celsius
/// * pressure in Pa
/// * humidity in % Relative Humidity, or -1.0 on a BMP280
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "use-defmt", derive(defmt::Format))]
pub struct SensorReading {
    pub temperature: f32,
    pub pressure: f32,
    pub humidity: f32,
}

impl From<Readout> for SensorReading {
    fn from(readout: Readout) -> Self {
        let humidity = if readout.humidity == HUMIDITY_NOT_AVAILABLE {
            -1.0
        } else {
            readout.humidity as f32 / 1024.0
        };

        SensorReading {
            temperature: readout.temperature as f32 * 0.01,
            pressure: readout.pressure as f32 / 256.0,
            humidity,
        }
    }
}

/// Driver errors.
#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "use-defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// I2C bus error
    I2c(E),
    /// No accepted chip answered on any of the addresses allowed by the `ProbePolicy`.
    NotFound,
    /// The driver has not been successfully initialized. Call `init` first; if it failed, the
    /// sensor can not be used.
    InvalidState,
    /// The detected chip doesn't have the requested setting, see `Standby`.
    Unsupported,
}

/// A sensor that was found and whose calibration was read.
#[derive(Debug, Clone, Copy)]
struct Device {
    address: Address,
    chip: Chip,
    calibration: Calibration,
}

/// Where the driver is in its life cycle.
#[derive(Debug, Clone, Copy)]
enum State {
    /// `init` has not been called yet.
    Unprobed,
    /// The last `init` failed.
    Invalid,
    Resolved(Device),
}

/// A BME280 or BMP280 sensor on the I2C bus `I`.
///
/// If the bus is shared with other devices, pass in a shared bus handle such as the ones from
/// `embedded-hal-bus`; the driver does no locking of its own.
pub struct Bmx280<I> {
    i2c: I,
    policy: ProbePolicy,
    state: State,
}

impl<E, I> Bmx280<I>
where
    I: I2c<Error = E>,
{
    /// Create the driver with the default `ProbePolicy`.
    ///
    /// This consumes the I2C bus `I`. No bus traffic happens until `init` is called, and `init`
    /// must succeed before any other method can be used.
    pub fn new(i2c: I) -> Self {
        Self::with_policy(i2c, ProbePolicy::new())
    }

    /// Create the driver with a specific `ProbePolicy`.
    pub fn with_policy(i2c: I, policy: ProbePolicy) -> Self {
        Bmx280 {
            i2c,
            policy,
            state: State::Unprobed,
        }
    }

    /// Find the sensor and read its calibration.
    ///
    /// Tries the addresses allowed by the `ProbePolicy` in order, and uses the first one that
    /// answers with an accepted chip id. Then reads the calibration banks. If either step fails
    /// the driver stays unusable until a later `init` succeeds. Calling `init` again re-reads
    /// everything.
    pub fn init(&mut self) -> Result<Chip, Error<E>> {
        self.state = State::Invalid;

        let (address, chip) = self.probe()?;
        let calibration = match self.read_calibration(address, chip) {
            Ok(calibration) => calibration,
            Err(err) => {
                error!("reading calibration failed: address={=u8:#x}", address as u8);
                return Err(err);
            }
        };

        self.state = State::Resolved(Device {
            address,
            chip,
            calibration,
        });

        Ok(chip)
    }

    /// Try each candidate address until an accepted chip answers.
    fn probe(&mut self) -> Result<(Address, Chip), Error<E>> {
        info!("probing for BMP280/BME280 sensors");

        for &address in self.policy.address.candidates() {
            if let Some(chip) = self.probe_address(address) {
                info!("probe success: address={=u8:#x}, id={=u8:#x}", address as u8, chip.id());
                return Ok((address, chip));
            }
        }

        error!("sensor not found");
        Err(Error::NotFound)
    }

    /// Read the chip id at one address, and check it against the `ChipPolicy`.
    ///
    /// Failures here are expected while searching, so they're logged and not returned.
    fn probe_address(&mut self, address: Address) -> Option<Chip> {
        let mut id = [0u8; 1];
        if self.read_registers(address, Register::ChipId as u8, &mut id).is_err() {
            warn!("probe failure: address={=u8:#x}, reason=bus error", address as u8);
            return None;
        }

        match Chip::from_id(id[0]) {
            Some(chip) if self.policy.chip.accepts(chip) => Some(chip),
            Some(_) => {
                warn!(
                    "probe failure: address={=u8:#x}, id={=u8:#x}, reason=rejected",
                    address as u8,
                    id[0]
                );
                None
            }
            None => {
                warn!(
                    "probe failure: address={=u8:#x}, id={=u8:#x}, reason=unknown",
                    address as u8,
                    id[0]
                );
                None
            }
        }
    }

    /// Read the trim parameters. The humidity trims are only read on a BME280.
    fn read_calibration(&mut self, address: Address, chip: Chip) -> Result<Calibration, Error<E>> {
        let mut low = [0u8; LOW_BANK_LEN];
        // The BMP280 has nothing we need past 0x9F.
        let low_len = if chip.has_humidity() {
            LOW_BANK_LEN
        } else {
            LOW_BANK_TP_LEN
        };
        self.read_registers(address, Register::CalibrationLow as u8, &mut low[..low_len])?;

        let mut tp = [0u8; LOW_BANK_TP_LEN];
        tp.copy_from_slice(&low[..LOW_BANK_TP_LEN]);
        let calibration = Calibration::from_low_bank(&tp);

        if !chip.has_humidity() {
            return Ok(calibration);
        }

        let mut high = [0u8; HIGH_BANK_LEN];
        self.read_registers(address, Register::CalibrationHigh as u8, &mut high)?;
        let h1 = low[LOW_BANK_LEN - 1];

        Ok(calibration.with_humidity(HumidityCalibration::from_banks(h1, &high)))
    }

    /// The sensor found by the last `init`, or `InvalidState`.
    fn device(&self) -> Result<&Device, Error<E>> {
        match &self.state {
            State::Resolved(device) => Ok(device),
            State::Unprobed | State::Invalid => Err(Error::InvalidState),
        }
    }

    /// The chip found by the last successful `init`.
    pub fn chip(&self) -> Option<Chip> {
        self.device().ok().map(|device| device.chip)
    }

    /// The address of the chip found by the last successful `init`.
    pub fn address(&self) -> Option<Address> {
        self.device().ok().map(|device| device.address)
    }

    /// The trim parameters read by the last successful `init`.
    pub fn calibration(&self) -> Option<&Calibration> {
        self.device().ok().map(|device| &device.calibration)
    }

    /// Apply a measurement configuration.
    ///
    /// The registers are written in one transaction, in this order:
    ///
    /// 1. ctrl_hum, humidity oversampling. Skipped on a BMP280.
    /// 2. config, standby time and filter.
    /// 3. ctrl_meas, temperature and pressure oversampling and mode. This write also makes the
    ///    ctrl_hum value take effect.
    ///
    /// If `config.mode` is `None`, ctrl_meas is read first so that the current mode is kept. The
    /// sensor may ignore the config register while it is in normal mode; configure it from sleep
    /// mode to be sure.
    ///
    /// A standby interval the chip doesn't have fails with `Error::Unsupported`, before anything
    /// is sent.
    pub fn configure(&mut self, config: &Config) -> Result<(), Error<E>> {
        let Device { address, chip, .. } = *self.device()?;
        let Some(config_value) = config.config(chip) else {
            warn!("standby interval not available on chip id={=u8:#x}", chip.id());
            return Err(Error::Unsupported);
        };

        let mode = match config.mode {
            Some(mode) => mode,
            None => self.get_mode()?,
        };

        let ctrl_meas = (Register::CtrlMeas as u8, config.ctrl_meas(mode));
        let config_reg = (Register::Config as u8, config_value);
        if chip.has_humidity() {
            let ctrl_hum = (Register::CtrlHum as u8, config.ctrl_hum());
            self.write_registers(address, &[ctrl_hum, config_reg, ctrl_meas])
        } else {
            self.write_registers(address, &[config_reg, ctrl_meas])
        }
    }

    /// Switch the operating mode, keeping the oversampling settings.
    ///
    /// Setting `Mode::Forced` starts one conversion. The sensor goes back to sleep by itself when
    /// it is done; poll `is_sampling` to find out when.
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), Error<E>> {
        let address = self.device()?.address;

        let mut ctrl_meas = [0u8; 1];
        self.read_registers(address, Register::CtrlMeas as u8, &mut ctrl_meas)?;
        let value = (ctrl_meas[0] & !0b11) | mode.bits();

        self.write_registers(address, &[(Register::CtrlMeas as u8, value)])
    }

    /// Read the current operating mode from the sensor.
    ///
    /// After a forced conversion has finished this reports `Mode::Sleep`.
    pub fn get_mode(&mut self) -> Result<Mode, Error<E>> {
        let address = self.device()?.address;

        let mut ctrl_meas = [0u8; 1];
        self.read_registers(address, Register::CtrlMeas as u8, &mut ctrl_meas)?;

        Ok(Mode::from_bits(ctrl_meas[0]))
    }

    /// Read the status register.
    pub fn status(&mut self) -> Result<SensorStatus, Error<E>> {
        let address = self.device()?.address;

        let mut status = [0u8; 1];
        self.read_registers(address, Register::Status as u8, &mut status)?;

        Ok(SensorStatus::new(status[0]))
    }

    /// Check if the sensor is busy with a conversion.
    ///
    /// This returns right away with what the sensor reports. To wait for a forced conversion,
    /// call this in a loop with a delay until it returns false.
    pub fn is_sampling(&mut self) -> Result<bool, Error<E>> {
        Ok(self.status()?.is_measuring())
    }

    /// Read and compensate the latest measurement, in fixed point.
    ///
    /// All data registers are read in one transaction so temperature, pressure and humidity come
    /// from the same conversion. On a BMP280 the humidity is `HUMIDITY_NOT_AVAILABLE`.
    pub fn readout(&mut self) -> Result<Readout, Error<E>> {
        let Device { address, chip, .. } = *self.device()?;

        let mut data = [0u8; 8];
        let data = &mut data[..chip.data_len()];
        self.read_registers(address, Register::Data as u8, data)?;
        let raw = RawSample::from_bytes(data);

        Ok(self.device()?.calibration.compensate(&raw))
    }

    /// Read and compensate the latest measurement, in floating point.
    pub fn readout_float(&mut self) -> Result<SensorReading, Error<E>> {
        self.readout().map(SensorReading::from)
    }

    /// Send the reset vector to the sensor.
    ///
    /// This performs a complete power-on reset: the sensor goes to sleep mode and all
    /// configuration is lost. The calibration stays valid, it is the same NVM content. The
    /// datasheet gives a start-up time of 2ms, which we wait before returning.
    pub fn reset(&mut self, delay: &mut impl DelayNs) -> Result<(), Error<E>> {
        let address = self.device()?.address;

        self.write_registers(address, &[(Register::Reset as u8, RESET_VECTOR)])?;
        delay.delay_ms(2);

        Ok(())
    }

    /// Destroys this driver and releases the I2C bus `I`.
    pub fn close(self) -> I {
        self.i2c
    }

    /// Read consecutive registers, starting at `register`.
    ///
    /// ```text
    /// +-------+---------------+----+------+------------------+------+
    /// | Start | Slave Address | RW | ACKS | Register Address | ACKS |
    /// +-------+---------------+----+------+------------------+------+
    /// | S     | 111011x       |  0 |      | xxxxxxxx         |      |
    /// +-------+---------------+----+------+------------------+------+
    ///
    /// +-------+---------------+----+------+---------------+------+---------------+--------+------+
    /// | Start | Slave Address | RW | ACKS | Register Data | ACKM | Register Data | NOACKM | Stop |
    /// +-------+---------------+----+------+---------------+------+---------------+--------+------+
    /// | Sr    | 111011x       |  1 |      |      76543210 |      |      76543210 |        | P    |
    /// +-------+---------------+----+------+---------------+------+---------------+--------+------+
    /// ```
    ///
    /// The second start is a repeated start, the bus is not released in between.
    fn read_registers(
        &mut self,
        address: Address,
        register: u8,
        buf: &mut [u8],
    ) -> Result<(), Error<E>> {
        self.i2c
            .write_read(address as u8, &[register], buf)
            .map_err(Error::I2c)
    }

    /// Write (register, value) pairs in one transaction.
    ///
    /// ```text
    /// +-------+---------------+----+------+------------------+------+---------------+------+
    /// | Start | Slave Address | RW | ACKS | Register Address | ACKS | Register Data | ACKS |
    /// +-------+---------------+----+------+------------------+------+---------------+------+
    /// | S     | 111011x       |  0 |      | xxxxxxxx         |      |      76543210 |      |
    /// +-------+---------------+----+------+------------------+------+---------------+------+
    ///
    ///     +------------------+------+---------------+------+------+
    /// ... | Register Address | ACKS | Register Data | ACKS | Stop |
    ///     +------------------+------+---------------+------+------+
    /// ... | xxxxxxxx         |      |      76543210 |      | P    |
    ///     +------------------+------+---------------+------+------+
    /// ```
    ///
    /// The sensor does not auto-increment on writes, every value is preceded by its own register
    /// address. That is why `configure` can write 0xF2, 0xF5 and 0xF4 in a single transaction.
    /// Passing more than `MAX_WRITE_PAIRS` pairs fails to compile.
    fn write_registers<const N: usize>(
        &mut self,
        address: Address,
        pairs: &[(u8, u8); N],
    ) -> Result<(), Error<E>> {
        const { assert!(N <= MAX_WRITE_PAIRS, "too many registers for one write") };
        let mut buf = [0u8; 2 * MAX_WRITE_PAIRS];

        for (chunk, &(register, value)) in buf.chunks_exact_mut(2).zip(pairs) {
            chunk.copy_from_slice(&[register, value]);
        }

        self.i2c
            .write(address as u8, &buf[..2 * N])
            .map_err(Error::I2c)
    }
}
