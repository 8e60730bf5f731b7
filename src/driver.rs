use crate::constants::*;
use crate::error::Ads1220Error;
use core::result::Result;
use core::result::Result::Ok;

use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};

/// ADS1220 driver
///
/// The `SpiDevice` must be configured for SPI mode 1, MSB-first, at a
/// clock rate the chip supports (4 MHz is a safe choice). Chip select is
/// driven through a separate pin so multi-byte frames stay within one
/// select window.
pub struct Ads1220<SPI, CS, DRDY, DELAY> {
    spi: SPI,
    cs: CS,
    drdy: DRDY,
    delay: DELAY,
    vref: f32,
    gain: u8,
    ref_measurement: bool,
    do_not_bypass_pga_if_possible: bool,
    conv_mode: ConversionMode,
}

impl<SPI, CS, DRDY, DELAY, SpiError, GpioError> Ads1220<SPI, CS, DRDY, DELAY>
where
    SPI: SpiDevice<Error = SpiError>,
    CS: OutputPin<Error = GpioError>,
    DRDY: InputPin<Error = GpioError>,
    DELAY: DelayNs,
{
    /// Creates a new ADS1220 driver instance
    pub fn new(spi: SPI, cs: CS, drdy: DRDY, delay: DELAY) -> Self {
        Ads1220 {
            spi,
            cs,
            drdy,
            delay,
            vref: INTERNAL_VREF,
            gain: 1,
            ref_measurement: false,
            do_not_bypass_pga_if_possible: false,
            conv_mode: ConversionMode::SingleShot,
        }
    }

    /// Destroys the driver and returns the owned peripherals
    pub fn release(self) -> (SPI, CS, DRDY, DELAY) {
        (self.spi, self.cs, self.drdy, self.delay)
    }

    /// Resets the device and probes it over the bus.
    ///
    /// The probe sets the PGA bypass bit and reads it back; a device that
    /// is absent or miswired answers with all zeros, which is reported as
    /// [`Ads1220Error::NotConnected`]. Must be called before anything else.
    pub fn init(&mut self) -> Result<(), Ads1220Error<SpiError, GpioError>> {
        self.vref = INTERNAL_VREF;
        self.gain = 1;
        self.ref_measurement = false;
        self.conv_mode = ConversionMode::SingleShot;

        self.cs.set_high().map_err(Ads1220Error::Gpio)?;
        self.reset()?;
        self.start()?;

        self.bypass_pga(true)?;
        let probe = self.read_register(REG_CONF0)?;
        self.bypass_pga(false)?;
        if probe & 0x01 == 0 {
            log::error!("ADS1220 did not answer the bypass-bit probe");
            return Err(Ads1220Error::NotConnected);
        }
        Ok(())
    }

    /// Starts a conversion, or restarts conversions in continuous mode
    pub fn start(&mut self) -> Result<(), Ads1220Error<SpiError, GpioError>> {
        self.command(CMD_START)
    }

    /// Resets the device to its power-up register defaults
    pub fn reset(&mut self) -> Result<(), Ads1220Error<SpiError, GpioError>> {
        self.command(CMD_RESET)?;
        self.delay.delay_ms(1);
        Ok(())
    }

    /// Puts the analog front end into power-down mode
    pub fn power_down(&mut self) -> Result<(), Ads1220Error<SpiError, GpioError>> {
        self.command(CMD_POWERDOWN)
    }

    pub fn print_registers(&mut self) -> Result<(), Ads1220Error<SpiError, GpioError>> {
        let registers = [
            (REG_CONF0, "CONF0"),
            (REG_CONF1, "CONF1"),
            (REG_CONF2, "CONF2"),
            (REG_CONF3, "CONF3"),
        ];

        for (reg, name) in registers.iter() {
            let value = self.read_register(*reg)?;
            log::debug!("Register {}: 0x{:02X}", name, value);
        }

        Ok(())
    }

    /// Sends a single-byte command to the ADS1220
    fn command(&mut self, opcode: u8) -> Result<(), Ads1220Error<SpiError, GpioError>> {
        self.cs.set_low().map_err(Ads1220Error::Gpio)?;
        log::debug!("Sending command: 0x{:02X}", opcode);
        self.spi.write(&[opcode]).map_err(Ads1220Error::Spi)?;
        self.cs.set_high().map_err(Ads1220Error::Gpio)?;
        Ok(())
    }

    /// Writes one configuration register
    pub fn write_register(
        &mut self,
        reg: u8,
        value: u8,
    ) -> Result<(), Ads1220Error<SpiError, GpioError>> {
        let opcode = CMD_WREG | (reg << 2);

        self.cs.set_low().map_err(Ads1220Error::Gpio)?;
        log::debug!("Writing register {}: 0x{:02X}", reg, value);
        self.spi.write(&[opcode, value]).map_err(Ads1220Error::Spi)?;
        self.cs.set_high().map_err(Ads1220Error::Gpio)?;
        Ok(())
    }

    /// Reads one configuration register
    pub fn read_register(&mut self, reg: u8) -> Result<u8, Ads1220Error<SpiError, GpioError>> {
        let opcode = CMD_RREG | (reg << 2);
        let mut buffer = [0u8; 1];

        self.cs.set_low().map_err(Ads1220Error::Gpio)?;
        self.spi.write(&[opcode]).map_err(Ads1220Error::Spi)?;
        self.spi.read(&mut buffer).map_err(Ads1220Error::Spi)?;
        self.cs.set_high().map_err(Ads1220Error::Gpio)?;
        Ok(buffer[0])
    }

    /// Blocks until DRDY goes low.
    ///
    /// An unready device keeps the caller here indefinitely; that is the
    /// chip's documented contract. Use [`Self::get_raw_data_with_timeout`]
    /// for a bounded wait.
    fn wait_for_drdy(&mut self) -> Result<(), Ads1220Error<SpiError, GpioError>> {
        while self.drdy.is_high().map_err(Ads1220Error::Gpio)? {}
        Ok(())
    }

    fn wait_for_drdy_bounded(
        &mut self,
        max_polls: u32,
    ) -> Result<(), Ads1220Error<SpiError, GpioError>> {
        for _ in 0..max_polls {
            if self.drdy.is_low().map_err(Ads1220Error::Gpio)? {
                return Ok(());
            }
        }
        log::error!("DRDY pin did not go low");
        Err(Ads1220Error::Timeout)
    }
}

// Configuration register 0: mux, gain, PGA bypass
impl<SPI, CS, DRDY, DELAY, SpiError, GpioError> Ads1220<SPI, CS, DRDY, DELAY>
where
    SPI: SpiDevice<Error = SpiError>,
    CS: OutputPin<Error = GpioError>,
    DRDY: InputPin<Error = GpioError>,
    DELAY: DelayNs,
{
    /// Selects the input pair (or monitoring mode) routed to the converter.
    ///
    /// Also refreshes the cached gain and the ratiometric-reference flag,
    /// and forces the PGA into bypass when the chosen mode requires it.
    pub fn set_compare_channels(
        &mut self,
        mux: Mux,
    ) -> Result<(), Ads1220Error<SpiError, GpioError>> {
        if mux == Mux::RefpxRefnxDiv4 || mux == Mux::AvddAvssDiv4 {
            // gain is one by definition while measuring a divided reference
            self.gain = 1;
            self.ref_measurement = true;
        } else {
            let value = self.read_register(REG_CONF0)?;
            self.gain = 1 << ((value & 0x0E) >> 1);
            self.ref_measurement = false;
        }

        let mut value = self.read_register(REG_CONF0)?;
        value &= !0xF1;
        value |= mux as u8;
        value |= u8::from(!self.do_not_bypass_pga_if_possible);
        self.write_register(REG_CONF0, value)?;

        if (mux as u8) >= 0x80 && (mux as u8) <= 0xD0 {
            if self.gain > 4 {
                // max gain is 4 for single-ended and divided inputs
                self.gain = 4;
            }
            self.forced_bypass_pga()?;
        }
        Ok(())
    }

    /// Sets the PGA gain
    pub fn set_gain(&mut self, gain: Gain) -> Result<(), Ads1220Error<SpiError, GpioError>> {
        let mut value = self.read_register(REG_CONF0)?;
        let mux = value & 0xF0;
        value &= !0x0E;
        value |= gain as u8;
        self.write_register(REG_CONF0, value)?;

        self.gain = gain.factor();
        if (0x80..=0xD0).contains(&mux) {
            if self.gain > 4 {
                // max gain is 4 for single-ended and divided inputs
                self.gain = 4;
            }
            self.forced_bypass_pga()?;
        }
        Ok(())
    }

    /// Returns the effective gain, after any cap the mux mode imposes
    pub fn get_gain_factor(&self) -> u8 {
        self.gain
    }

    /// Enables or disables the PGA bypass.
    ///
    /// The request is remembered as a preference: a later mux change that
    /// requires bypass will still force the bit on.
    pub fn bypass_pga(&mut self, bypass: bool) -> Result<(), Ads1220Error<SpiError, GpioError>> {
        let mut value = self.read_register(REG_CONF0)?;
        value &= !0x01;
        value |= u8::from(bypass);
        self.do_not_bypass_pga_if_possible = !bypass;
        self.write_register(REG_CONF0, value)
    }

    pub fn is_pga_bypassed(&mut self) -> Result<bool, Ads1220Error<SpiError, GpioError>> {
        let value = self.read_register(REG_CONF0)?;
        Ok(value & 0x01 != 0)
    }

    fn forced_bypass_pga(&mut self) -> Result<(), Ads1220Error<SpiError, GpioError>> {
        let mut value = self.read_register(REG_CONF0)?;
        value |= 0x01;
        self.write_register(REG_CONF0, value)
    }
}

// Configuration register 1: data rate, operating/conversion mode,
// temperature sensor, burn-out sources
impl<SPI, CS, DRDY, DELAY, SpiError, GpioError> Ads1220<SPI, CS, DRDY, DELAY>
where
    SPI: SpiDevice<Error = SpiError>,
    CS: OutputPin<Error = GpioError>,
    DRDY: InputPin<Error = GpioError>,
    DELAY: DelayNs,
{
    pub fn set_data_rate(
        &mut self,
        rate: DataRate,
    ) -> Result<(), Ads1220Error<SpiError, GpioError>> {
        let mut value = self.read_register(REG_CONF1)?;
        value &= !0xE0;
        value |= rate as u8;
        self.write_register(REG_CONF1, value)
    }

    pub fn set_operating_mode(
        &mut self,
        mode: OperatingMode,
    ) -> Result<(), Ads1220Error<SpiError, GpioError>> {
        let mut value = self.read_register(REG_CONF1)?;
        value &= !0x18;
        value |= mode as u8;
        self.write_register(REG_CONF1, value)
    }

    /// Selects single-shot or continuous conversion.
    ///
    /// The choice is cached so the readout path knows whether a START
    /// command has to precede each sample.
    pub fn set_conversion_mode(
        &mut self,
        mode: ConversionMode,
    ) -> Result<(), Ads1220Error<SpiError, GpioError>> {
        self.conv_mode = mode;
        let mut value = self.read_register(REG_CONF1)?;
        value &= !0x04;
        value |= mode as u8;
        self.write_register(REG_CONF1, value)
    }

    pub fn enable_temperature_sensor(
        &mut self,
        enable: bool,
    ) -> Result<(), Ads1220Error<SpiError, GpioError>> {
        let mut value = self.read_register(REG_CONF1)?;
        if enable {
            value |= 0x02;
        } else {
            value &= !0x02;
        }
        self.write_register(REG_CONF1, value)
    }

    pub fn enable_burnout_current_sources(
        &mut self,
        enable: bool,
    ) -> Result<(), Ads1220Error<SpiError, GpioError>> {
        let mut value = self.read_register(REG_CONF1)?;
        if enable {
            value |= 0x01;
        } else {
            value &= !0x01;
        }
        self.write_register(REG_CONF1, value)
    }
}

// Configuration register 2: reference source, FIR filter, power switch,
// excitation current
impl<SPI, CS, DRDY, DELAY, SpiError, GpioError> Ads1220<SPI, CS, DRDY, DELAY>
where
    SPI: SpiDevice<Error = SpiError>,
    CS: OutputPin<Error = GpioError>,
    DRDY: InputPin<Error = GpioError>,
    DELAY: DelayNs,
{
    pub fn set_vref_source(
        &mut self,
        source: VrefSource,
    ) -> Result<(), Ads1220Error<SpiError, GpioError>> {
        let mut value = self.read_register(REG_CONF2)?;
        value &= !0xC0;
        value |= source as u8;
        self.write_register(REG_CONF2, value)
    }

    pub fn set_fir_filter(
        &mut self,
        fir: FirFilter,
    ) -> Result<(), Ads1220Error<SpiError, GpioError>> {
        let mut value = self.read_register(REG_CONF2)?;
        value &= !0x30;
        value |= fir as u8;
        self.write_register(REG_CONF2, value)
    }

    pub fn set_low_side_power_switch(
        &mut self,
        psw: PowerSwitch,
    ) -> Result<(), Ads1220Error<SpiError, GpioError>> {
        let mut value = self.read_register(REG_CONF2)?;
        value &= !0x08;
        value |= psw as u8;
        self.write_register(REG_CONF2, value)
    }

    /// Sets the IDAC magnitude; waits out the 200 µs settling time
    pub fn set_idac_current(
        &mut self,
        current: IdacCurrent,
    ) -> Result<(), Ads1220Error<SpiError, GpioError>> {
        let mut value = self.read_register(REG_CONF2)?;
        value &= !0x07;
        value |= current as u8;
        self.write_register(REG_CONF2, value)?;
        self.delay.delay_us(200);
        Ok(())
    }
}

// Configuration register 3: IDAC routing, DRDY mode
impl<SPI, CS, DRDY, DELAY, SpiError, GpioError> Ads1220<SPI, CS, DRDY, DELAY>
where
    SPI: SpiDevice<Error = SpiError>,
    CS: OutputPin<Error = GpioError>,
    DRDY: InputPin<Error = GpioError>,
    DELAY: DelayNs,
{
    pub fn set_idac1_routing(
        &mut self,
        route: IdacRouting,
    ) -> Result<(), Ads1220Error<SpiError, GpioError>> {
        let mut value = self.read_register(REG_CONF3)?;
        value &= !0xE0;
        value |= (route as u8) << 5;
        self.write_register(REG_CONF3, value)
    }

    pub fn set_idac2_routing(
        &mut self,
        route: IdacRouting,
    ) -> Result<(), Ads1220Error<SpiError, GpioError>> {
        let mut value = self.read_register(REG_CONF3)?;
        value &= !0x1C;
        value |= (route as u8) << 2;
        self.write_register(REG_CONF3, value)
    }

    pub fn set_drdy_mode(
        &mut self,
        mode: DrdyMode,
    ) -> Result<(), Ads1220Error<SpiError, GpioError>> {
        let mut value = self.read_register(REG_CONF3)?;
        value &= !0x02;
        value |= mode as u8;
        self.write_register(REG_CONF3, value)
    }
}

// Reference handling and calibration helpers
impl<SPI, CS, DRDY, DELAY, SpiError, GpioError> Ads1220<SPI, CS, DRDY, DELAY>
where
    SPI: SpiDevice<Error = SpiError>,
    CS: OutputPin<Error = GpioError>,
    DRDY: InputPin<Error = GpioError>,
    DELAY: DelayNs,
{
    /// Overrides the reference voltage assumed for scaling, in volts
    pub fn set_vref_value(&mut self, vref: f32) {
        self.vref = vref;
    }

    /// Returns the reference voltage currently assumed for scaling
    pub fn get_vref(&self) -> f32 {
        self.vref
    }

    /// Measures AVDD-AVSS through the divide-by-4 mux and adopts the
    /// average of 10 readouts as the reference voltage
    pub fn set_avdd_avss_as_vref_and_calibrate(
        &mut self,
    ) -> Result<(), Ads1220Error<SpiError, GpioError>> {
        let mut total = 0.0;
        self.set_vref_source(VrefSource::AvddAvss)?;
        self.set_compare_channels(Mux::AvddAvssDiv4)?;
        for _ in 0..10 {
            total += self.get_voltage_mv()?;
        }
        // undo the divide-by-4 and convert mV to V
        self.vref = total * 4.0 / 10000.0;
        Ok(())
    }

    /// Measures the REFP0/REFN0 pair and adopts it as the reference voltage
    pub fn set_refp0_refn0_as_vref_and_calibrate(
        &mut self,
    ) -> Result<(), Ads1220Error<SpiError, GpioError>> {
        let mut total = 0.0;
        self.set_vref_source(VrefSource::Refp0Refn0)?;
        self.set_compare_channels(Mux::RefpxRefnxDiv4)?;
        for _ in 0..10 {
            total += self.get_voltage_mv()?;
        }
        self.vref = total * 4.0 / 10000.0;
        Ok(())
    }

    /// Measures the REFP1/REFN1 pair and adopts it as the reference voltage
    pub fn set_refp1_refn1_as_vref_and_calibrate(
        &mut self,
    ) -> Result<(), Ads1220Error<SpiError, GpioError>> {
        let mut total = 0.0;
        self.set_vref_source(VrefSource::Refp1Refn1)?;
        self.set_compare_channels(Mux::RefpxRefnxDiv4)?;
        for _ in 0..10 {
            total += self.get_voltage_mv()?;
        }
        self.vref = total * 4.0 / 10000.0;
        Ok(())
    }

    /// Selects the internal 2.048 V reference; no measurement needed
    pub fn set_internal_vref(&mut self) -> Result<(), Ads1220Error<SpiError, GpioError>> {
        self.set_vref_source(VrefSource::Internal)?;
        self.vref = INTERNAL_VREF;
        Ok(())
    }
}

// Results
impl<SPI, CS, DRDY, DELAY, SpiError, GpioError> Ads1220<SPI, CS, DRDY, DELAY>
where
    SPI: SpiDevice<Error = SpiError>,
    CS: OutputPin<Error = GpioError>,
    DRDY: InputPin<Error = GpioError>,
    DELAY: DelayNs,
{
    /// Reads one conversion result in millivolts
    pub fn get_voltage_mv(&mut self) -> Result<f32, Ads1220Error<SpiError, GpioError>> {
        let raw = self.get_data()?;
        // a divided-reference measurement is scaled against the internal
        // reference, not the value under calibration
        let vref = if self.ref_measurement {
            INTERNAL_VREF
        } else {
            self.vref
        };
        Ok((raw as f32 / FULL_SCALE) * vref * 1000.0 / self.gain as f32)
    }

    /// Reads one conversion result in microvolts.
    ///
    /// This is a pure unit scaling of [`Self::get_voltage_mv`], kept that
    /// way for compatibility with existing consumers.
    pub fn get_voltage_uv(&mut self) -> Result<f32, Ads1220Error<SpiError, GpioError>> {
        Ok(self.get_voltage_mv()? * 1000.0)
    }

    /// Reads one raw, sign-extended 24-bit conversion result
    pub fn get_raw_data(&mut self) -> Result<i32, Ads1220Error<SpiError, GpioError>> {
        self.get_data()
    }

    /// Like [`Self::get_raw_data`], but gives up after `max_polls`
    /// DRDY polls and reports [`Ads1220Error::Timeout`]
    pub fn get_raw_data_with_timeout(
        &mut self,
        max_polls: u32,
    ) -> Result<i32, Ads1220Error<SpiError, GpioError>> {
        if self.conv_mode == ConversionMode::SingleShot {
            self.start()?;
        }
        self.wait_for_drdy_bounded(max_polls)?;
        let raw = self.read_conversion_frame()?;
        Ok((raw as i32) >> 8)
    }

    /// Reads the internal temperature sensor in degrees Celsius.
    ///
    /// The sensor is enabled for a single readout and disabled again. The
    /// result is the top 14 bits of the frame at 0.03125 °C per LSB;
    /// negative codes are folded with the 0x3777 inversion mask carried
    /// over from the reference implementation (note: narrower than a full
    /// 14-bit complement, preserved bit-for-bit for compatibility).
    pub fn get_temperature(&mut self) -> Result<f32, Ads1220Error<SpiError, GpioError>> {
        self.enable_temperature_sensor(true)?;
        let raw = self.read_result()?;
        self.enable_temperature_sensor(false)?;

        let mut code = (raw >> 18) as u16;
        if code >> 13 != 0 {
            code = !(code - 1) & 0x3777;
            return Ok(code as f32 * -0.03125);
        }
        Ok(code as f32 * 0.03125)
    }

    fn get_data(&mut self) -> Result<i32, Ads1220Error<SpiError, GpioError>> {
        let raw = self.read_result()?;
        // arithmetic shift sign-extends the 24-bit sample
        Ok((raw as i32) >> 8)
    }

    /// Runs one conversion and returns the 24-bit sample in bits 8-31
    fn read_result(&mut self) -> Result<u32, Ads1220Error<SpiError, GpioError>> {
        if self.conv_mode == ConversionMode::SingleShot {
            self.start()?;
        }
        self.wait_for_drdy()?;
        self.read_conversion_frame()
    }

    /// Clocks out the 3-byte result frame; no opcode is sent first
    fn read_conversion_frame(&mut self) -> Result<u32, Ads1220Error<SpiError, GpioError>> {
        let mut buffer = [0u8; 3];

        self.cs.set_low().map_err(Ads1220Error::Gpio)?;
        self.spi.read(&mut buffer).map_err(Ads1220Error::Spi)?;
        self.cs.set_high().map_err(Ads1220Error::Gpio)?;

        log::debug!(
            "Raw data: {:02X} {:02X} {:02X}",
            buffer[0],
            buffer[1],
            buffer[2]
        );

        let mut raw = buffer[0] as u32;
        raw = (raw << 8) | buffer[1] as u32;
        raw = (raw << 8) | buffer[2] as u32;
        Ok(raw << 8)
    }
}
