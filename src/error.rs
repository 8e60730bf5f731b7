#[derive(Debug)]
pub enum Ads1220Error<SpiError, GpioError> {
    Spi(SpiError),
    Gpio(GpioError),
    /// DRDY never went low within the bounded wait
    Timeout,
    /// The init probe could not read back the PGA bypass bit
    NotConnected,
}
