//! # BME280/BMP280 weather station.
//!
//! Takes a forced measurement every two seconds and outputs it via `defmt`. The on-board LED on
//! GP25 is lit while the sensor is converting.
//!
//! The sensor is connected to I2C0, SDA on GP16 and SCL on GP17. Either address works, the driver
//! looks at both.
//!
//! Run with `DEFMT_LOG=info cargo run`.
#![no_std]
#![no_main]

use defmt_rtt as _;
use panic_halt as _;

use rp_pico::entry;
use rp_pico::hal;
use rp_pico::hal::pac;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use fugit::RateExtU32;

use bmx280_driver::{Bmx280, Config, Filter, Mode, Oversampling, Standby};

/// One sample of each channel, no filtering. Low power weather monitoring, datasheet section 3.5.1.
const WEATHER_MONITORING: Config = Config {
    temperature: Oversampling::X1,
    pressure: Oversampling::X1,
    humidity: Oversampling::X1,
    filter: Filter::Off,
    standby: Standby::Millis1000,
    mode: Some(Mode::Sleep),
};

#[entry]
fn main() -> ! {
    let mut pac = pac::Peripherals::take().unwrap();
    let mut watchdog = hal::Watchdog::new(pac.WATCHDOG);

    // 125 MHz system clock.
    let clocks = hal::clocks::init_clocks_and_plls(
        rp_pico::XOSC_CRYSTAL_FREQ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .ok()
    .unwrap();

    let mut timer = hal::Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);

    let sio = hal::Sio::new(pac.SIO);
    let pins = rp_pico::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );

    let mut led_pin = pins.led.into_push_pull_output();
    let sda_pin: hal::gpio::Pin<_, hal::gpio::FunctionI2C, _> = pins.gpio16.reconfigure();
    let scl_pin: hal::gpio::Pin<_, hal::gpio::FunctionI2C, _> = pins.gpio17.reconfigure();

    let i2c = hal::I2C::i2c0(
        pac.I2C0,
        sda_pin,
        scl_pin,
        400.kHz(),
        &mut pac.RESETS,
        &clocks.peripheral_clock,
    );

    let mut bmx280 = Bmx280::new(i2c);
    let chip = bmx280.init().unwrap();
    bmx280.reset(&mut timer).unwrap();
    bmx280.configure(&WEATHER_MONITORING).unwrap();
    defmt::info!("setup done: {} at {}", chip, bmx280.address());

    loop {
        led_pin.set_high().unwrap();
        bmx280.set_mode(Mode::Forced).unwrap();
        // Typical conversion time with x1 on every channel is 8ms.
        timer.delay_ms(8);
        while bmx280.is_sampling().unwrap() {
            timer.delay_ms(1);
        }
        led_pin.set_low().unwrap();

        let reading = bmx280.readout_float().unwrap();
        defmt::info!("temperature: {}", reading.temperature);
        defmt::info!("pressure: {}", reading.pressure);
        if chip.has_humidity() {
            defmt::info!("humidity: {}", reading.humidity);
        }

        timer.delay_ms(2000);
    }
}
