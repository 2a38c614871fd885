//! Factory trim parameters and the compensation formulas that use them.
//!
//! Every sensor is trimmed at the factory and the trim values are stored in two register banks,
//! see datasheet section 4.2.2, table 16:
//!
//! ```text
//! 0x88..=0x9F  t1 t2 t3 p1 .. p9     little-endian 16 bit words
//! 0xA1         h1                    BME280 only
//! 0xE1..=0xE7  h2 h3 h4 h5 h6        BME280 only, h4 and h5 share 0xE5
//! ```
//!
//! The compensation code is the 32/64 bit integer code from datasheet section 4.2.3 and
//! section 8. The integer products are done in 64 bits with wrapping arithmetic: for any raw value
//! the sensor can produce with sane trim values the results are identical to the datasheet code,
//! and garbage in (a corrupted bank, a disconnected sensor reading all ones) gives garbage out
//! instead of an overflow panic.
use core::num::Wrapping;

use crate::{Readout, HUMIDITY_NOT_AVAILABLE};

/// Number of bytes in the low calibration bank, 0x88 to 0xA1 inclusive.
pub(crate) const LOW_BANK_LEN: usize = 26;
/// Part of the low bank holding the temperature and pressure trims, 0x88 to 0x9F inclusive.
pub(crate) const LOW_BANK_TP_LEN: usize = 24;
/// Number of bytes in the high calibration bank, 0xE1 to 0xE7 inclusive.
pub(crate) const HIGH_BANK_LEN: usize = 7;

/// Trim parameters of one sensor.
///
/// These are read once by `Bmx280::init` and never change afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "use-defmt", derive(defmt::Format))]
pub struct Calibration {
    pub t1: u16,
    pub t2: i16,
    pub t3: i16,
    pub p1: u16,
    pub p2: i16,
    pub p3: i16,
    pub p4: i16,
    pub p5: i16,
    pub p6: i16,
    pub p7: i16,
    pub p8: i16,
    pub p9: i16,
    /// Only the BME280 has humidity trims.
    pub humidity: Option<HumidityCalibration>,
}

/// Humidity trim parameters of a BME280.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "use-defmt", derive(defmt::Format))]
pub struct HumidityCalibration {
    pub h1: u8,
    pub h2: i16,
    pub h3: u8,
    pub h4: i16,
    pub h5: i16,
    pub h6: i8,
}

impl Calibration {
    /// Build the temperature and pressure trims from the first 24 bytes of the low bank.
    pub(crate) fn from_low_bank(low: &[u8; LOW_BANK_TP_LEN]) -> Self {
        let word = |i: usize| [low[i], low[i + 1]];

        Calibration {
            t1: u16::from_le_bytes(word(0)),
            t2: i16::from_le_bytes(word(2)),
            t3: i16::from_le_bytes(word(4)),
            p1: u16::from_le_bytes(word(6)),
            p2: i16::from_le_bytes(word(8)),
            p3: i16::from_le_bytes(word(10)),
            p4: i16::from_le_bytes(word(12)),
            p5: i16::from_le_bytes(word(14)),
            p6: i16::from_le_bytes(word(16)),
            p7: i16::from_le_bytes(word(18)),
            p8: i16::from_le_bytes(word(20)),
            p9: i16::from_le_bytes(word(22)),
            humidity: None,
        }
    }

    /// Add the humidity trims: `h1` from 0xA1 and the high bank.
    pub(crate) fn with_humidity(self, humidity: HumidityCalibration) -> Self {
        Calibration {
            humidity: Some(humidity),
            ..self
        }
    }

    /// Compensate one raw sample.
    ///
    /// Temperature has to go first: it produces `t_fine`, which the pressure and humidity
    /// formulas need.
    pub(crate) fn compensate(&self, raw: &RawSample) -> Readout {
        let t_fine = self.t_fine(raw.temperature);
        let temperature = ((i64::from(t_fine) * 5 + 128) >> 8) as i32;
        let pressure = self.pressure(raw.pressure, t_fine);
        let humidity = match (self.humidity, raw.humidity) {
            (Some(calibration), Some(adc_h)) => calibration.humidity(adc_h, t_fine),
            _ => HUMIDITY_NOT_AVAILABLE,
        };

        Readout {
            temperature,
            pressure,
            humidity,
        }
    }

    /// Fine temperature, in 1/5120 °C.
    ///
    /// Datasheet section 4.2.3, `bmx280_compensate_T_int32`. The squared term can exceed 32 bits
    /// for out-of-range raw values, so this is done in 64 bits.
    pub(crate) fn t_fine(&self, adc_t: u32) -> i32 {
        let adc_t = i64::from(adc_t);
        let t1 = i64::from(self.t1);
        let t2 = i64::from(self.t2);
        let t3 = i64::from(self.t3);

        let var1 = (((adc_t >> 3) - (t1 << 1)) * t2) >> 11;
        let var2 = (((((adc_t >> 4) - t1) * ((adc_t >> 4) - t1)) >> 12) * t3) >> 14;

        (var1 + var2) as i32
    }

    /// Pressure in Pa as unsigned Q24.8, so 24674867 means 24674867/256 = 96386.2 Pa.
    ///
    /// Datasheet section 4.2.3, `bmx280_compensate_P_int64`. A `p1` of zero would divide by zero;
    /// like the datasheet code we return 0 instead.
    fn pressure(&self, adc_p: u32, t_fine: i32) -> u32 {
        let p1 = Wrapping(i64::from(self.p1));
        let p2 = Wrapping(i64::from(self.p2));
        let p3 = Wrapping(i64::from(self.p3));
        let p4 = Wrapping(i64::from(self.p4));
        let p5 = Wrapping(i64::from(self.p5));
        let p6 = Wrapping(i64::from(self.p6));
        let p7 = Wrapping(i64::from(self.p7));
        let p8 = Wrapping(i64::from(self.p8));
        let p9 = Wrapping(i64::from(self.p9));

        let var1 = Wrapping(i64::from(t_fine)) - Wrapping(128_000);
        let var2 = var1 * var1 * p6;
        let var2 = var2 + ((var1 * p5) << 17);
        let var2 = var2 + (p4 << 35);
        let var1 = ((var1 * var1 * p3) >> 8) + ((var1 * p2) << 12);
        let var1 = ((Wrapping(1_i64 << 47) + var1) * p1) >> 33;

        if var1.0 == 0 {
            return 0;
        }

        let p = Wrapping(1_048_576) - Wrapping(i64::from(adc_p));
        let p = (((p << 31) - var2) * Wrapping(3125)) / var1;
        let var1 = (p9 * (p >> 13) * (p >> 13)) >> 25;
        let var2 = (p8 * p) >> 19;
        let p = ((p + var1 + var2) >> 8) + (p7 << 4);

        p.0 as u32
    }
}

impl HumidityCalibration {
    /// Build the humidity trims from `h1` (register 0xA1) and the high bank.
    ///
    /// `h4` and `h5` are signed 12-bit values sharing register 0xE5:
    ///
    /// ```text
    /// 0xE4 [7:0] = h4 [11:4]      0xE5 [3:0] = h4 [3:0]
    /// 0xE6 [7:0] = h5 [11:4]      0xE5 [7:4] = h5 [3:0]
    /// ```
    pub(crate) fn from_banks(h1: u8, high: &[u8; HIGH_BANK_LEN]) -> Self {
        HumidityCalibration {
            h1,
            h2: i16::from_le_bytes([high[0], high[1]]),
            h3: high[2],
            // The top byte is signed, so sign-extend it before shifting.
            h4: (i16::from(high[3] as i8) << 4) | i16::from(high[4] & 0x0F),
            h5: (i16::from(high[5] as i8) << 4) | i16::from(high[4] >> 4),
            h6: high[6] as i8,
        }
    }

    /// Relative humidity in %RH as unsigned Q22.10, so 47445 means 47445/1024 = 46.333 %RH.
    ///
    /// Datasheet section 4.2.3, `bme280_compensate_H_int32`. The result is clamped to 0..=100 %RH
    /// as in the datasheet.
    fn humidity(&self, adc_h: u16, t_fine: i32) -> u32 {
        let adc_h = Wrapping(i64::from(adc_h));
        let h1 = Wrapping(i64::from(self.h1));
        let h2 = Wrapping(i64::from(self.h2));
        let h3 = Wrapping(i64::from(self.h3));
        let h4 = Wrapping(i64::from(self.h4));
        let h5 = Wrapping(i64::from(self.h5));
        let h6 = Wrapping(i64::from(self.h6));

        let v = Wrapping(i64::from(t_fine)) - Wrapping(76_800);
        let v = ((((adc_h << 14) - (h4 << 20) - (h5 * v)) + Wrapping(16_384)) >> 15)
            * (((((((v * h6) >> 10) * (((v * h3) >> 11) + Wrapping(32_768))) >> 10)
                + Wrapping(2_097_152))
                * h2
                + Wrapping(8_192))
                >> 14);
        let v = v - (((((v >> 15) * (v >> 15)) >> 7) * h1) >> 4);
        let v = v.0.clamp(0, 419_430_400);

        (v >> 12) as u32
    }
}

/// The raw ADC values of one conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawSample {
    pub(crate) pressure: u32,
    pub(crate) temperature: u32,
    /// `None` when the humidity registers were not read.
    pub(crate) humidity: Option<u16>,
}

impl RawSample {
    /// Unpack the data registers, starting at press_msb (0xF7).
    ///
    /// The pressure and temperature values are 20 bits, split over three registers:
    ///
    /// ```text
    /// msb  [7:0] = value [19:12]
    /// lsb  [7:0] = value [11:4]
    /// xlsb [7:4] = value [3:0]
    /// ```
    ///
    /// Humidity is a plain big-endian 16-bit value in the two bytes after that. `data` is 6 bytes
    /// for a BMP280 and 8 bytes for a BME280.
    pub(crate) fn from_bytes(data: &[u8]) -> Self {
        let twenty_bits = |msb: u8, lsb: u8, xlsb: u8| {
            (u32::from(msb) << 12) | (u32::from(lsb) << 4) | (u32::from(xlsb) >> 4)
        };

        RawSample {
            pressure: twenty_bits(data[0], data[1], data[2]),
            temperature: twenty_bits(data[3], data[4], data[5]),
            humidity: match data.get(6..8) {
                Some(&[msb, lsb]) => Some(u16::from_be_bytes([msb, lsb])),
                _ => None,
            },
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{Calibration, HumidityCalibration, RawSample, HIGH_BANK_LEN, LOW_BANK_TP_LEN};
    use crate::HUMIDITY_NOT_AVAILABLE;

    /// Temperature and pressure trims from the worked example in datasheet section 8.2:
    /// t1 = 27504, t2 = 26435, t3 = -1000, p1 = 36477, p2 = -10685, p3 = 3024, p4 = 2855,
    /// p5 = 140, p6 = -7, p7 = 15500, p8 = -14600, p9 = 6000.
    pub(crate) const DATASHEET_LOW_BANK: [u8; LOW_BANK_TP_LEN] = [
        0x70, 0x6B, // t1
        0x43, 0x67, // t2
        0x18, 0xFC, // t3
        0x7D, 0x8E, // p1
        0x43, 0xD6, // p2
        0xD0, 0x0B, // p3
        0x27, 0x0B, // p4
        0x8C, 0x00, // p5
        0xF9, 0xFF, // p6
        0x8C, 0x3C, // p7
        0xF8, 0xC6, // p8
        0x70, 0x17, // p9
    ];

    /// h1 from register 0xA1: 75.
    pub(crate) const H1: u8 = 0x4B;

    /// High bank of a BME280: h2 = 362, h3 = 0, h4 = 313, h5 = 50, h6 = 30.
    pub(crate) const HIGH_BANK: [u8; HIGH_BANK_LEN] = [0x6A, 0x01, 0x00, 0x13, 0x29, 0x03, 0x1E];

    /// Data registers: adc_P = 415148 (0x655AC), adc_T = 519888 (0x7EED0), adc_H = 30000 (0x7530).
    pub(crate) const DATA: [u8; 8] = [0x65, 0x5A, 0xC0, 0x7E, 0xED, 0x00, 0x75, 0x30];

    fn datasheet_calibration() -> Calibration {
        Calibration::from_low_bank(&DATASHEET_LOW_BANK)
    }

    #[test]
    fn parse_low_bank() {
        let calibration = datasheet_calibration();
        assert_eq!(calibration.t1, 27504);
        assert_eq!(calibration.t2, 26435);
        assert_eq!(calibration.t3, -1000);
        assert_eq!(calibration.p1, 36477);
        assert_eq!(calibration.p2, -10685);
        assert_eq!(calibration.p3, 3024);
        assert_eq!(calibration.p4, 2855);
        assert_eq!(calibration.p5, 140);
        assert_eq!(calibration.p6, -7);
        assert_eq!(calibration.p7, 15500);
        assert_eq!(calibration.p8, -14600);
        assert_eq!(calibration.p9, 6000);
        assert_eq!(calibration.humidity, None);
    }

    #[test]
    fn parse_humidity_banks() {
        let humidity = HumidityCalibration::from_banks(H1, &HIGH_BANK);
        assert_eq!(
            humidity,
            HumidityCalibration {
                h1: 75,
                h2: 362,
                h3: 0,
                h4: 313,
                h5: 50,
                h6: 30,
            }
        );
    }

    /// h4 and h5 are signed, the sign lives in their top register byte.
    #[test]
    fn parse_negative_humidity_nibbles() {
        // h4 = 0xFE5 (-27), h5 = 0xF9A (-102), h6 = -2.
        let high = [0x00, 0x00, 0x00, 0xFE, 0xA5, 0xF9, 0xFE];
        let humidity = HumidityCalibration::from_banks(0, &high);
        assert_eq!(humidity.h4, -27);
        assert_eq!(humidity.h5, -102);
        assert_eq!(humidity.h6, -2);
    }

    #[test]
    fn unpack_raw_sample() {
        let raw = RawSample::from_bytes(&DATA);
        assert_eq!(raw.pressure, 415_148);
        assert_eq!(raw.temperature, 519_888);
        assert_eq!(raw.humidity, Some(30_000));

        // A BMP280 only has 6 data registers.
        let raw = RawSample::from_bytes(&DATA[..6]);
        assert_eq!(raw.humidity, None);
    }

    /// The worked example from the datasheet, section 8.2.
    #[test]
    fn datasheet_example() {
        let calibration = datasheet_calibration();
        assert_eq!(calibration.t_fine(519_888), 128_422);

        let readout = calibration.compensate(&RawSample::from_bytes(&DATA[..6]));
        // 25.08 °C
        assert_eq!(readout.temperature, 2508);
        // 100653.25 Pa
        assert_eq!(readout.pressure, 25_767_233);
        assert_eq!(readout.humidity, HUMIDITY_NOT_AVAILABLE);
    }

    /// Same temperature, now with a humidity channel.
    #[test]
    fn humidity_example() {
        let calibration =
            datasheet_calibration().with_humidity(HumidityCalibration::from_banks(H1, &HIGH_BANK));
        let readout = calibration.compensate(&RawSample::from_bytes(&DATA));

        assert_eq!(readout.temperature, 2508);
        assert_eq!(readout.pressure, 25_767_233);
        // 54.997 %RH
        assert_eq!(readout.humidity, 56_317);
    }

    /// A calibration without humidity trims never reports humidity, even if raw data is present.
    #[test]
    fn humidity_without_trims() {
        let readout = datasheet_calibration().compensate(&RawSample::from_bytes(&DATA));
        assert_eq!(readout.humidity, HUMIDITY_NOT_AVAILABLE);
    }

    /// p1 of zero makes the pressure divisor zero, which must give 0 rather than a panic.
    #[test]
    fn pressure_zero_divisor() {
        let calibration = Calibration {
            p1: 0,
            ..datasheet_calibration()
        };
        let readout = calibration.compensate(&RawSample::from_bytes(&DATA[..6]));
        assert_eq!(readout.pressure, 0);
        assert_eq!(readout.temperature, 2508);
    }

    /// Humidity is clamped to 100 %RH (102400 in Q22.10).
    #[test]
    fn humidity_clamped() {
        let calibration =
            datasheet_calibration().with_humidity(HumidityCalibration::from_banks(H1, &HIGH_BANK));

        let mut data = DATA;
        data[6] = 0xFF;
        data[7] = 0xFF;
        let readout = calibration.compensate(&RawSample::from_bytes(&data));
        assert_eq!(readout.humidity, 102_400);

        data[6] = 0x00;
        data[7] = 0x00;
        let readout = calibration.compensate(&RawSample::from_bytes(&data));
        assert_eq!(readout.humidity, 0);
    }

    /// All-ones trims and data, as read from a floating bus, must not panic.
    #[test]
    fn garbage_does_not_panic() {
        let calibration = Calibration::from_low_bank(&[0xFF; LOW_BANK_TP_LEN])
            .with_humidity(HumidityCalibration::from_banks(0xFF, &[0xFF; HIGH_BANK_LEN]));
        let readout = calibration.compensate(&RawSample::from_bytes(&[0xFF; 8]));
        assert!(readout.humidity <= 102_400);

        let calibration = Calibration::from_low_bank(&[0x7F; LOW_BANK_TP_LEN])
            .with_humidity(HumidityCalibration::from_banks(0x7F, &[0x7F; HIGH_BANK_LEN]));
        let readout = calibration.compensate(&RawSample::from_bytes(&[0x00; 8]));
        assert!(readout.humidity <= 102_400);
    }
}
