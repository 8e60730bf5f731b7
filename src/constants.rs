/// ADS1220 Commands
pub const CMD_RESET: u8 = 0x06;
pub const CMD_START: u8 = 0x08;
pub const CMD_POWERDOWN: u8 = 0x02;
// pub const CMD_RDATA: u8 = 0x10;
pub const CMD_RREG: u8 = 0x20;
pub const CMD_WREG: u8 = 0x40;

/// ADS1220 Configuration Registers
pub const REG_CONF0: u8 = 0x00;
pub const REG_CONF1: u8 = 0x01;
pub const REG_CONF2: u8 = 0x02;
pub const REG_CONF3: u8 = 0x03;

/// Positive full-scale code, 2^23 - 1
pub const FULL_SCALE: f32 = 8_388_607.0;

/// Internal reference voltage in volts
pub const INTERNAL_VREF: f32 = 2.048;

/// Input multiplexer settings (register 0, bits 7:4)
///
/// The divide-by-4 modes route a divided reference or supply to the
/// converter so it can be measured within the normal input range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mux {
    Ain0Ain1 = 0x00,
    Ain0Ain2 = 0x10,
    Ain0Ain3 = 0x20,
    Ain1Ain2 = 0x30,
    Ain1Ain3 = 0x40,
    Ain2Ain3 = 0x50,
    Ain1Ain0 = 0x60,
    Ain3Ain2 = 0x70,
    Ain0Avss = 0x80,
    Ain1Avss = 0x90,
    Ain2Avss = 0xA0,
    Ain3Avss = 0xB0,
    RefpxRefnxDiv4 = 0xC0,
    AvddAvssDiv4 = 0xD0,
    AvddAvssDiv2 = 0xE0,
}

/// Gain settings for the programmable gain amplifier (register 0, bits 3:1)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gain {
    Gain1 = 0x00,
    Gain2 = 0x02,
    Gain4 = 0x04,
    Gain8 = 0x06,
    Gain16 = 0x08,
    Gain32 = 0x0A,
    Gain64 = 0x0C,
    Gain128 = 0x0E,
}

impl Gain {
    /// Returns the gain as a plain multiplier
    pub fn factor(&self) -> u8 {
        1 << ((*self as u8) >> 1)
    }
}

/// Output data rate levels (register 1, bits 7:5)
///
/// The samples-per-second behind each level depends on the operating
/// mode: level 0 is 20 SPS in normal mode, 5 SPS in duty-cycle mode
/// and 40 SPS in turbo mode, roughly doubling per level up to level 6.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataRate {
    Level0 = 0x00,
    Level1 = 0x20,
    Level2 = 0x40,
    Level3 = 0x60,
    Level4 = 0x80,
    Level5 = 0xA0,
    Level6 = 0xC0,
}

/// Operating modes (register 1, bits 4:3)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperatingMode {
    Normal = 0x00,
    DutyCycle = 0x08,
    Turbo = 0x10,
}

/// Conversion modes (register 1, bit 2)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConversionMode {
    SingleShot = 0x00,
    Continuous = 0x04,
}

/// Reference voltage sources (register 2, bits 7:6)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VrefSource {
    Internal = 0x00,
    Refp0Refn0 = 0x40,
    Refp1Refn1 = 0x80,
    AvddAvss = 0xC0,
}

/// 50/60 Hz FIR filter settings (register 2, bits 5:4)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FirFilter {
    None = 0x00,
    Fir50And60Hz = 0x10,
    Fir50Hz = 0x20,
    Fir60Hz = 0x30,
}

/// Low-side power switch behaviour (register 2, bit 3)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerSwitch {
    AlwaysOpen = 0x00,
    Switch = 0x08,
}

/// Excitation current magnitudes (register 2, bits 2:0)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdacCurrent {
    Off = 0x00,
    Ua10 = 0x01,
    Ua50 = 0x02,
    Ua100 = 0x03,
    Ua250 = 0x04,
    Ua500 = 0x05,
    Ua1000 = 0x06,
    Ua1500 = 0x07,
}

/// Excitation current routing (register 3, bits 7:5 for IDAC1, 4:2 for IDAC2)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdacRouting {
    Disabled = 0x00,
    Ain0Refp1 = 0x01,
    Ain1 = 0x02,
    Ain2 = 0x03,
    Ain3Refn1 = 0x04,
    Refp0 = 0x05,
    Refn0 = 0x06,
}

/// Data-ready signalling mode (register 3, bit 1)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrdyMode {
    DrdyOnly = 0x00,
    DoutDrdy = 0x02,
}
