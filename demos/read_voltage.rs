// Wiring sketch for an ESP32 target (not built as part of the crate).

use esp_idf_hal::delay::Ets;
use esp_idf_hal::prelude::*;
use esp_idf_hal::spi::{config::Config as SpiConfig, config::MODE_1, SpiDeviceDriver, SpiDriver};

use ads1220::{Ads1220, DataRate, Gain, Mux};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    esp_idf_sys::link_patches();

    let peripherals = Peripherals::take().unwrap();
    let pins = peripherals.pins;

    let spi = peripherals.spi2;
    let sclk = pins.gpio6;
    let mosi = pins.gpio7;
    let miso = pins.gpio8;

    // The ADS1220 wants SPI mode 1, MSB first
    let spi_config = SpiConfig::new().baudrate(4.MHz().into()).data_mode(MODE_1);

    let spi_driver = SpiDriver::new(spi, sclk, mosi, miso, &spi_config)?;
    let spi_device = SpiDeviceDriver::new(&spi_driver, None, &spi_config)?;

    let cs = pins.gpio10.into_output()?;
    let drdy = pins.gpio11.into_input()?;

    let mut adc = Ads1220::new(spi_device, cs, drdy, Ets);

    adc.init()?;
    adc.set_gain(Gain::Gain1)?;
    adc.set_data_rate(DataRate::Level2)?;
    adc.set_compare_channels(Mux::Ain0Ain1)?;

    let voltage = adc.get_voltage_mv()?;
    println!("Voltage: {:.3} mV", voltage);

    let temperature = adc.get_temperature()?;
    println!("Die temperature: {:.2} C", temperature);

    Ok(())
}
