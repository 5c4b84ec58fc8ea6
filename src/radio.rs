//! CC1101 control for Q7RF bursts.
//!
//! [`Cc1101`] brings the transceiver into the fixed Q7RF profile and sends
//! single precomputed frames. Every configuration step is read back and
//! verified; the only feedback after a burst is the chip's own MARCSTATE.
//!
//! ## Reset sequence
//!
//! 1. Chip select wiggle: high 5 µs, low 10 µs, high 41 µs (manufacturer minimums)
//! 2. `SRES` strobe
//! 3. `PARTNUM`/`VERSION` must read `0x00`/`0x14`
//! 4. Each profile register is written then read back, stopping at the first mismatch
//! 5. The power table is burst-written and burst-read back
//!
//! ## Transmit sequence
//!
//! `SIDLE` → `SFRX` → `SFTX` → TX FIFO burst → `STX`, then MARCSTATE must be
//! one of TX, TX_END or RXTX_SWITCH. Anything else forces the chip back to IDLE.

use thiserror::Error;

use crate::encoding::Frame;
use crate::registers::{
    ConfigRegister, EXPECTED_PARTNUM, EXPECTED_VERSION, PA_TABLE_LEN, PATABLE, Q7RF_PA_TABLE,
    Q7RF_REGISTER_CONFIG, READ_BURST, READ_SINGLE, RadioStatus, StatusRegister, Strobe, TXFIFO,
    WRITE_BURST,
};
use crate::transport::Transport;

/// Chip select high time before the reset wiggle, in µs.
const CS_RELEASE_US: u32 = 5;
/// Chip select low time of the reset wiggle, in µs.
const CS_PULSE_US: u32 = 10;
/// Chip select high time before the reset strobe, in µs.
const CS_SETTLE_US: u32 = 41;

/// Failures of the CC1101 driver.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RadioError<E> {
    /// The bus itself failed.
    #[error("transport error: {0:?}")]
    Transport(E),
    /// The identification registers do not describe a CC1101.
    #[error("unexpected chip identity: partnum {partnum:#04x}, version {version:#04x}")]
    PartMismatch {
        /// Value read from PARTNUM.
        partnum: u8,
        /// Value read from VERSION.
        version: u8,
    },
    /// A configuration register did not hold the value just written.
    #[error("register {register:?} reads {actual:#04x}, expected {expected:#04x}")]
    RegisterMismatch {
        /// Register that failed verification.
        register: ConfigRegister,
        /// Value written.
        expected: u8,
        /// Value read back.
        actual: u8,
    },
    /// A power table entry did not hold the value just written.
    #[error("PATABLE[{index}] reads {actual:#04x}, expected {expected:#04x}")]
    PowerTableMismatch {
        /// Table index that failed verification.
        index: usize,
        /// Value written.
        expected: u8,
        /// Value read back.
        actual: u8,
    },
    /// The chip did not enter transmit after `STX`.
    #[error("transmit not started, MARCSTATE {0:?}")]
    TransmitState(RadioStatus),
}

/// CC1101 transceiver driven over a [`Transport`].
#[derive(Debug)]
pub struct Cc1101<T> {
    transport: T,
}

impl<T: Transport> Cc1101<T> {
    /// Wraps a transport. No bus traffic happens until
    /// [`reset_and_configure`](Self::reset_and_configure).
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Borrows the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutably borrows the transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Returns the transport.
    pub fn release(self) -> T {
        self.transport
    }

    /// Resets the chip, checks its identity and programs the Q7RF profile.
    ///
    /// Fails fast: the first mismatching register or power table byte aborts
    /// the attempt without touching anything after it. Retrying is left to the
    /// caller.
    pub fn reset_and_configure(&mut self) -> Result<(), RadioError<T::Error>> {
        self.reset()?;
        self.verify_identity()?;

        for entry in Q7RF_REGISTER_CONFIG.iter() {
            self.write_register(entry.register, entry.value)?;
            let actual = self.read_register(entry.register)?;
            if actual != entry.value {
                error!(
                    "Register {:#x} verification failed: wrote {:#x}, read {:#x}",
                    entry.register.addr(),
                    entry.value,
                    actual
                );
                return Err(RadioError::RegisterMismatch {
                    register: entry.register,
                    expected: entry.value,
                    actual,
                });
            }
        }

        self.write_burst(PATABLE, &Q7RF_PA_TABLE)?;
        let mut readback = [0u8; PA_TABLE_LEN];
        self.read_burst(PATABLE, &mut readback)?;
        if let Some((index, (&expected, &actual))) = Q7RF_PA_TABLE
            .iter()
            .zip(readback.iter())
            .enumerate()
            .find(|(_, (expected, actual))| expected != actual)
        {
            error!(
                "PATABLE[{}] verification failed: wrote {:#x}, read {:#x}",
                index, expected, actual
            );
            return Err(RadioError::PowerTableMismatch {
                index,
                expected,
                actual,
            });
        }

        debug!("CC1101 configured");
        Ok(())
    }

    /// Sends one frame and checks that the chip entered transmit.
    ///
    /// On a bad MARCSTATE the chip is strobed back to IDLE before the error is
    /// returned. There is no acknowledgement; success only means the burst
    /// was started.
    pub fn transmit(&mut self, frame: &Frame) -> Result<(), RadioError<T::Error>> {
        let _ = self.strobe(Strobe::Sidle)?;
        let _ = self.strobe(Strobe::Sfrx)?;
        let _ = self.strobe(Strobe::Sftx)?;
        self.write_burst(TXFIFO, frame.as_bytes())?;
        let _ = self.strobe(Strobe::Stx)?;

        let status = RadioStatus::from_marcstate(self.read_status(StatusRegister::MarcState)?);
        if status.is_transmitting() {
            return Ok(());
        }

        warn!("Unexpected MARCSTATE after STX, forcing IDLE");
        let _ = self.strobe(Strobe::Sidle)?;
        Err(RadioError::TransmitState(status))
    }

    /// Issues a command strobe and returns the chip status byte.
    pub fn strobe(&mut self, strobe: Strobe) -> Result<u8, RadioError<T::Error>> {
        self.select()?;
        let status = self.transport.transfer_byte(strobe.addr());
        self.deselect()?;
        status.map_err(RadioError::Transport)
    }

    /// Writes a single configuration register.
    pub fn write_register(
        &mut self,
        register: ConfigRegister,
        value: u8,
    ) -> Result<(), RadioError<T::Error>> {
        self.select()?;
        let res = self
            .transport
            .write_byte(register.addr())
            .and_then(|()| self.transport.write_byte(value));
        self.deselect()?;
        res.map_err(RadioError::Transport)
    }

    /// Reads a single configuration register.
    pub fn read_register(&mut self, register: ConfigRegister) -> Result<u8, RadioError<T::Error>> {
        self.read_single(register.addr() | READ_SINGLE)
    }

    /// Reads a status register.
    pub fn read_status(&mut self, register: StatusRegister) -> Result<u8, RadioError<T::Error>> {
        self.read_single(register.header())
    }

    fn read_single(&mut self, header: u8) -> Result<u8, RadioError<T::Error>> {
        self.select()?;
        let res = self
            .transport
            .transfer_byte(header)
            .and_then(|_| self.transport.transfer_byte(0));
        self.deselect()?;
        res.map_err(RadioError::Transport)
    }

    fn write_burst(&mut self, addr: u8, data: &[u8]) -> Result<(), RadioError<T::Error>> {
        self.select()?;
        let res = self
            .transport
            .write_byte(addr | WRITE_BURST)
            .and_then(|()| self.transport.write_burst(data));
        self.deselect()?;
        res.map_err(RadioError::Transport)
    }

    fn read_burst(&mut self, addr: u8, buf: &mut [u8]) -> Result<(), RadioError<T::Error>> {
        self.select()?;
        let res = self
            .transport
            .write_byte(addr | READ_BURST)
            .and_then(|()| self.transport.read_burst(buf));
        self.deselect()?;
        res.map_err(RadioError::Transport)
    }

    fn reset(&mut self) -> Result<(), RadioError<T::Error>> {
        self.deselect()?;
        self.transport.delay_microseconds(CS_RELEASE_US);
        self.select()?;
        self.transport.delay_microseconds(CS_PULSE_US);
        self.deselect()?;
        self.transport.delay_microseconds(CS_SETTLE_US);
        let _ = self.strobe(Strobe::Sres)?;
        Ok(())
    }

    fn verify_identity(&mut self) -> Result<(), RadioError<T::Error>> {
        let partnum = self.read_status(StatusRegister::PartNum)?;
        let version = self.read_status(StatusRegister::Version)?;
        if partnum != EXPECTED_PARTNUM || version != EXPECTED_VERSION {
            error!(
                "Unexpected CC1101 identity: partnum {:#x}, version {:#x}",
                partnum, version
            );
            return Err(RadioError::PartMismatch { partnum, version });
        }
        Ok(())
    }

    fn select(&mut self) -> Result<(), RadioError<T::Error>> {
        self.transport.assert_select().map_err(RadioError::Transport)
    }

    fn deselect(&mut self) -> Result<(), RadioError<T::Error>> {
        self.transport
            .deassert_select()
            .map_err(RadioError::Transport)
    }
}
