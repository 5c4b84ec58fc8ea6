//! Bus primitives the radio driver is built on.
//!
//! The CC1101 reset sequence needs explicit control over chip select timing,
//! so the driver cannot sit on top of a managed `SpiDevice`. Instead it talks
//! to a [`Transport`], which exposes chip select, byte and burst transfers,
//! and a microsecond delay.
//!
//! [`SpiTransport`] implements the trait for any `embedded-hal` 1.0
//! [`SpiBus`] plus an active-low chip select [`OutputPin`] and a [`DelayNs`]
//! provider.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;
use thiserror::Error;

/// Serial bus access as required by [`Cc1101`](crate::radio::Cc1101).
///
/// All calls are blocking. Implementations own the bus exclusively.
pub trait Transport {
    /// Bus or pin failure.
    type Error: core::fmt::Debug;

    /// Drives chip select active.
    fn assert_select(&mut self) -> Result<(), Self::Error>;

    /// Releases chip select, completing any pending transfer first.
    fn deassert_select(&mut self) -> Result<(), Self::Error>;

    /// Busy-waits for at least `us` microseconds.
    fn delay_microseconds(&mut self, us: u32);

    /// Full-duplex exchange of one byte.
    fn transfer_byte(&mut self, byte: u8) -> Result<u8, Self::Error>;

    /// Writes one byte, discarding what is clocked in.
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Writes `bytes` back to back.
    fn write_burst(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Fills `buf` with bytes clocked in from the device.
    fn read_burst(&mut self, buf: &mut [u8]) -> Result<(), Self::Error>;
}

/// Errors raised by [`SpiTransport`].
#[derive(Debug, Error)]
pub enum TransportError<S, P> {
    /// The SPI bus reported an error.
    #[error("SPI bus error: {0:?}")]
    Spi(S),
    /// The chip select pin could not be driven.
    #[error("chip select error: {0:?}")]
    ChipSelect(P),
}

/// [`Transport`] over an `embedded-hal` SPI bus with a manual chip select.
///
/// ## Example
///
/// ```rust
/// # use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};
/// # use embedded_hal_mock::eh1::digital::{Mock as Pin, State as PinState, Transaction as PinTransaction};
/// # use embedded_hal_mock::eh1::delay::NoopDelay;
/// use q7rf::transport::{SpiTransport, Transport};
///
/// # let spi = SpiMock::new(&[SpiTransaction::transfer_in_place(vec![0x3d], vec![0x0f]), SpiTransaction::flush()]);
/// # let cs = Pin::new(&[PinTransaction::set(PinState::Low), PinTransaction::set(PinState::High)]);
/// let mut transport = SpiTransport::new(spi, cs, NoopDelay::new());
/// transport.assert_select().unwrap();
/// let status = transport.transfer_byte(0x3d).unwrap();
/// transport.deassert_select().unwrap();
/// # assert_eq!(status, 0x0f);
/// # let (mut spi, mut cs, _) = transport.release();
/// # spi.done();
/// # cs.done();
/// ```
#[derive(Debug)]
pub struct SpiTransport<SPI, CS, D> {
    spi: SPI,
    cs: CS,
    delay: D,
}

impl<SPI, CS, D> SpiTransport<SPI, CS, D>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
    D: DelayNs,
{
    /// Wraps the bus, chip select pin and delay provider.
    ///
    /// Chip select is left untouched; the reset sequence drives it explicitly.
    pub fn new(spi: SPI, cs: CS, delay: D) -> Self {
        Self { spi, cs, delay }
    }

    /// Returns the bus, pin and delay provider.
    pub fn release(self) -> (SPI, CS, D) {
        (self.spi, self.cs, self.delay)
    }
}

impl<SPI, CS, D> Transport for SpiTransport<SPI, CS, D>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
    D: DelayNs,
{
    type Error = TransportError<SPI::Error, CS::Error>;

    fn assert_select(&mut self) -> Result<(), Self::Error> {
        self.cs.set_low().map_err(TransportError::ChipSelect)
    }

    fn deassert_select(&mut self) -> Result<(), Self::Error> {
        self.spi.flush().map_err(TransportError::Spi)?;
        self.cs.set_high().map_err(TransportError::ChipSelect)
    }

    fn delay_microseconds(&mut self, us: u32) {
        self.delay.delay_us(us);
    }

    fn transfer_byte(&mut self, byte: u8) -> Result<u8, Self::Error> {
        let mut buf = [byte];
        self.spi
            .transfer_in_place(&mut buf)
            .map_err(TransportError::Spi)?;
        Ok(buf[0])
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.spi.write(&[byte]).map_err(TransportError::Spi)
    }

    fn write_burst(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.spi.write(bytes).map_err(TransportError::Spi)
    }

    fn read_burst(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.spi.read(buf).map_err(TransportError::Spi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };
    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};

    #[test]
    fn test_select_drives_pin_active_low() {
        let spi = SpiMock::new(&[SpiTransaction::flush()]);
        let cs = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);
        let mut transport = SpiTransport::new(spi, cs, NoopDelay::new());

        transport.assert_select().unwrap();
        transport.deassert_select().unwrap();

        let (mut spi, mut cs, _) = transport.release();
        spi.done();
        cs.done();
    }

    #[test]
    fn test_transfer_byte_returns_clocked_in_byte() {
        let spi = SpiMock::new(&[
            SpiTransaction::transfer_in_place(vec![0xf1], vec![0x0f]),
            SpiTransaction::transfer_in_place(vec![0x00], vec![0x14]),
        ]);
        let cs = PinMock::new(&[]);
        let mut transport = SpiTransport::new(spi, cs, NoopDelay::new());

        assert_eq!(transport.transfer_byte(0xf1).unwrap(), 0x0f);
        assert_eq!(transport.transfer_byte(0x00).unwrap(), 0x14);

        let (mut spi, mut cs, _) = transport.release();
        spi.done();
        cs.done();
    }

    #[test]
    fn test_bursts_map_to_bus_write_and_read() {
        let spi = SpiMock::new(&[
            SpiTransaction::write_vec(vec![0x7e]),
            SpiTransaction::write_vec(vec![0x00, 0xc0, 0x00]),
            SpiTransaction::read_vec(vec![0x00, 0xc0, 0x00]),
        ]);
        let cs = PinMock::new(&[]);
        let mut transport = SpiTransport::new(spi, cs, NoopDelay::new());

        transport.write_byte(0x7e).unwrap();
        transport.write_burst(&[0x00, 0xc0, 0x00]).unwrap();
        let mut buf = [0u8; 3];
        transport.read_burst(&mut buf).unwrap();
        assert_eq!(buf, [0x00, 0xc0, 0x00]);

        let (mut spi, mut cs, _) = transport.release();
        spi.done();
        cs.done();
    }

    #[test]
    fn test_delay_does_not_touch_bus() {
        let spi = SpiMock::new(&[]);
        let cs = PinMock::new(&[]);
        let mut transport = SpiTransport::new(spi, cs, NoopDelay::new());

        transport.delay_microseconds(41);

        let (mut spi, mut cs, _) = transport.release();
        spi.done();
        cs.done();
    }
}
