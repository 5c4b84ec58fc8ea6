//! CC1101 register map, command strobes and the fixed Q7RF radio profile.
//!
//! Only the registers and strobes the Q7RF driver touches are modelled; each
//! set is a closed enum so an out-of-range address cannot be expressed.
//!
//! The SPI header byte is `[R/W | BURST | A5..A0]`. Status registers share
//! their addresses with the command strobes and are told apart by the burst
//! bit, which is why [`StatusRegister::header`] always sets it.

/// Header bit selecting a read access.
pub const READ_SINGLE: u8 = 0x80;

/// Header bit selecting a burst access.
pub const WRITE_BURST: u8 = 0x40;

/// Header bits selecting a burst read.
pub const READ_BURST: u8 = READ_SINGLE | WRITE_BURST;

/// Address of the 8-byte power amplifier table.
pub const PATABLE: u8 = 0x3e;

/// Address of the transmit FIFO.
pub const TXFIFO: u8 = 0x3f;

/// Expected value of [`StatusRegister::PartNum`].
pub const EXPECTED_PARTNUM: u8 = 0x00;

/// Expected value of [`StatusRegister::Version`].
pub const EXPECTED_VERSION: u8 = 0x14;

/// Mask applied to MARCSTATE before interpretation.
pub const MARCSTATE_MASK: u8 = 0x1f;

/// Command strobes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[repr(u8)]
pub enum Strobe {
    /// Reset chip.
    Sres = 0x30,
    /// Enable TX.
    Stx = 0x35,
    /// Exit RX / TX and enter IDLE.
    Sidle = 0x36,
    /// Flush the RX FIFO.
    Sfrx = 0x3a,
    /// Flush the TX FIFO.
    Sftx = 0x3b,
}

impl Strobe {
    /// Address byte sent on the bus.
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

/// Configuration registers written by the Q7RF profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[repr(u8)]
pub enum ConfigRegister {
    /// Packet length.
    PktLen = 0x06,
    /// Packet automation control.
    PktCtrl1 = 0x07,
    /// Packet automation control.
    PktCtrl0 = 0x08,
    /// Frequency synthesizer control.
    FsCtrl1 = 0x0b,
    /// Frequency control word, high byte.
    Freq2 = 0x0d,
    /// Frequency control word, middle byte.
    Freq1 = 0x0e,
    /// Frequency control word, low byte.
    Freq0 = 0x0f,
    /// Channel bandwidth and data rate exponent.
    MdmCfg4 = 0x10,
    /// Data rate mantissa.
    MdmCfg3 = 0x11,
    /// Modulation format and sync mode.
    MdmCfg2 = 0x12,
    /// Preamble length and channel spacing exponent.
    MdmCfg1 = 0x13,
    /// Main radio control state machine configuration.
    McSm0 = 0x18,
    /// Frequency offset compensation.
    FocCfg = 0x19,
    /// Front end TX configuration.
    Frend0 = 0x22,
}

impl ConfigRegister {
    /// Address byte for a single write.
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

/// Read-only status registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[repr(u8)]
pub enum StatusRegister {
    /// Chip part number.
    PartNum = 0x30,
    /// Chip version number.
    Version = 0x31,
    /// Main radio control state machine state.
    MarcState = 0x35,
}

impl StatusRegister {
    /// Header byte for reading the register.
    pub const fn header(self) -> u8 {
        self as u8 | READ_BURST
    }
}

/// One `(register, value)` pair of the radio profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterConfigEntry {
    /// Register to program.
    pub register: ConfigRegister,
    /// Value to write and expect back.
    pub value: u8,
}

const fn entry(register: ConfigRegister, value: u8) -> RegisterConfigEntry {
    RegisterConfigEntry { register, value }
}

/// 868.35 MHz ASK/OOK, ~2.4 kBaud, fixed 45-byte packets without sync word or CRC.
pub const Q7RF_REGISTER_CONFIG: [RegisterConfigEntry; 14] = [
    entry(ConfigRegister::PktCtrl0, 0x00),
    entry(ConfigRegister::PktCtrl1, 0x00),
    entry(ConfigRegister::PktLen, crate::consts::FRAME_LEN as u8),
    entry(ConfigRegister::FsCtrl1, 0x06),
    entry(ConfigRegister::Freq2, 0x21),
    entry(ConfigRegister::Freq1, 0x65),
    entry(ConfigRegister::Freq0, 0xe8),
    entry(ConfigRegister::MdmCfg4, 0xf6),
    entry(ConfigRegister::MdmCfg3, 0x83),
    entry(ConfigRegister::MdmCfg2, 0x30),
    entry(ConfigRegister::MdmCfg1, 0x00),
    entry(ConfigRegister::McSm0, 0x18),
    entry(ConfigRegister::FocCfg, 0x16),
    // PA_POWER = 1: OOK "on" uses PATABLE[1], "off" uses PATABLE[0]
    entry(ConfigRegister::Frend0, 0x11),
];

/// Power table length.
pub const PA_TABLE_LEN: usize = 8;

/// Only index 1 carries power, at the chip maximum.
pub const Q7RF_PA_TABLE: [u8; PA_TABLE_LEN] = [0x00, 0xc0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];

/// Interpretation of the MARCSTATE status register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum RadioStatus {
    /// IDLE (0x01).
    Idle,
    /// TX (0x13).
    Tx,
    /// TX_END (0x14).
    TxEnd,
    /// RXTX_SWITCH (0x15).
    RxTxSwitch,
    /// Any other state, masked to 5 bits.
    Other(u8),
}

impl RadioStatus {
    /// Decodes a raw MARCSTATE read; only the low five bits are significant.
    pub const fn from_marcstate(raw: u8) -> Self {
        match raw & MARCSTATE_MASK {
            0x01 => RadioStatus::Idle,
            0x13 => RadioStatus::Tx,
            0x14 => RadioStatus::TxEnd,
            0x15 => RadioStatus::RxTxSwitch,
            other => RadioStatus::Other(other),
        }
    }

    /// Whether the chip has entered (or just finished) transmitting.
    pub const fn is_transmitting(self) -> bool {
        matches!(
            self,
            RadioStatus::Tx | RadioStatus::TxEnd | RadioStatus::RxTxSwitch
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_headers_set_burst_bit() {
        assert_eq!(StatusRegister::PartNum.header(), 0xf0);
        assert_eq!(StatusRegister::Version.header(), 0xf1);
        assert_eq!(StatusRegister::MarcState.header(), 0xf5);
    }

    #[test]
    fn test_marcstate_is_masked() {
        assert_eq!(RadioStatus::from_marcstate(0xf3), RadioStatus::Tx);
        assert_eq!(RadioStatus::from_marcstate(0x34), RadioStatus::TxEnd);
        assert_eq!(RadioStatus::from_marcstate(0x15), RadioStatus::RxTxSwitch);
        assert_eq!(RadioStatus::from_marcstate(0x21), RadioStatus::Idle);
        assert_eq!(RadioStatus::from_marcstate(0x0d), RadioStatus::Other(0x0d));
    }

    #[test]
    fn test_only_tx_states_count_as_transmitting() {
        assert!(RadioStatus::Tx.is_transmitting());
        assert!(RadioStatus::TxEnd.is_transmitting());
        assert!(RadioStatus::RxTxSwitch.is_transmitting());
        assert!(!RadioStatus::Idle.is_transmitting());
        assert!(!RadioStatus::Other(0x16).is_transmitting());
    }

    #[test]
    fn test_profile_tables() {
        assert_eq!(Q7RF_REGISTER_CONFIG.len(), 14);
        assert_eq!(Q7RF_REGISTER_CONFIG[2].value, 45);
        assert_eq!(
            Q7RF_PA_TABLE.iter().filter(|&&p| p != 0).count(),
            1,
            "exactly one power level"
        );
        assert_ne!(Q7RF_PA_TABLE[1], 0);
    }
}
