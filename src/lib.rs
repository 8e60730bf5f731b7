//! Driver for the TI ADS1220 24-bit, 4-channel delta-sigma ADC.
//!
//! The chip is controlled over SPI (mode 1, MSB first) with a dedicated
//! chip-select output and a data-ready input. The driver exposes setters
//! for the four configuration registers, conversion control, and readout
//! of calibrated voltages and the internal temperature sensor.
//!
//! All operations are blocking; the readout path busy-polls the DRDY line
//! with no timeout, matching the chip's protocol. A bounded-wait readout
//! is available separately.

#![cfg_attr(not(test), no_std)]

mod constants;
mod driver;
mod error;

pub use constants::{
    ConversionMode, DataRate, DrdyMode, FirFilter, Gain, IdacCurrent, IdacRouting, Mux,
    OperatingMode, PowerSwitch, VrefSource,
};
pub use driver::Ads1220;
pub use error::Ads1220Error;
