//! Constants used across the Q7RF protocol implementation.
//!
//! This module defines the frame geometry of a Q7RF burst, the logical
//! command codes understood by the thermostat receiver, and the timing and
//! recovery defaults of the transmission controller.
//!
//! ## Key Concepts
//!
//! - **Symbols**: every logical bit is sent as a 3-bit physical symbol.
//! - **Payload**: device id (16 bits), framing nibble (4 bits) and command (8 bits).
//! - **Unit**: preamble, payload sent twice, then a short gap.
//! - **Frame**: the unit sent twice, packed MSB first into the TX FIFO.

/// Physical symbol sent for a logical `0`.
pub const SYMBOL_ZERO: u8 = 0b011;

/// Physical symbol sent for a logical `1`.
pub const SYMBOL_ONE: u8 = 0b001;

/// Number of physical bits per logical bit.
pub const SYMBOL_BITS: usize = 3;

/// Synchronization pattern sent in front of every payload pair.
pub const PREAMBLE: u16 = 0b1_1100_0111;

/// Length of [`PREAMBLE`] in physical bits.
pub const PREAMBLE_BITS: usize = 9;

/// Silence between the two units of a frame.
pub const GAP: u8 = 0b000;

/// Length of [`GAP`] in physical bits.
pub const GAP_BITS: usize = 3;

/// Fixed framing nibble sent between device id and command.
pub const FRAMING_NIBBLE: u8 = 0b1000;

/// Logical bits of one payload: 16-bit device id, 4-bit framing, 8-bit command.
pub const PAYLOAD_LOGICAL_BITS: usize = 16 + 4 + 8;

/// Physical bits of one encoded payload.
pub const PAYLOAD_BITS: usize = PAYLOAD_LOGICAL_BITS * SYMBOL_BITS;

/// Physical bits of one unit: preamble, doubled payload, gap.
pub const UNIT_BITS: usize = PREAMBLE_BITS + 2 * PAYLOAD_BITS + GAP_BITS;

/// Physical bits of one complete frame.
pub const FRAME_BITS: usize = 2 * UNIT_BITS;

/// Length in bytes of a frame as written to the TX FIFO.
pub const FRAME_LEN: usize = 45;

const _: () = assert!(FRAME_BITS == FRAME_LEN * 8);

/// Command byte that puts the receiver into pairing mode.
pub const COMMAND_PAIR: u8 = 0x00;

/// Command byte that switches heating on.
pub const COMMAND_HEAT_ON: u8 = 0xff;

/// Command byte that switches heating off.
pub const COMMAND_HEAT_OFF: u8 = 0x0f;

/// Default period between idempotent resends of the desired state.
pub const DEFAULT_RESEND_INTERVAL_MS: u32 = 60_000;

/// Consecutive transmit faults tolerated before the transceiver is reset.
pub const FAILURE_THRESHOLD: u8 = 3;
