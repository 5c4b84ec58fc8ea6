//! Q7RF frame encoding and decoding.
//!
//! A Q7RF command is a device id, a fixed framing nibble and a command byte.
//! Each logical bit is sent as a 3-bit pulse-width symbol, and the payload is
//! repeated heavily because the link has no acknowledgement:
//!
//! ```text
//! unit  = preamble(9) | payload(84) | payload(84) | gap(3)   = 180 bits
//! frame = unit | unit                                        = 360 bits = 45 bytes
//! ```
//!
//! ## Symbol Table
//!
//! | Logical | Physical |
//! |---------|----------|
//! | `0`     | `011`    |
//! | `1`     | `001`    |
//!
//! Preamble is `111000111`, gap is `000`. Fields are sent most significant
//! bit first and bits are packed MSB first into bytes.
//!
//! ## Functions
//!
//! - [`encode_frame`]: builds the 45-byte burst for one command
//! - [`decode_frame`]: recovers the fields, rejecting any layout violation

use heapless::Vec;

use crate::consts::{
    COMMAND_HEAT_OFF, COMMAND_HEAT_ON, COMMAND_PAIR, FRAME_BITS, FRAME_LEN, FRAMING_NIBBLE, GAP,
    GAP_BITS, PAYLOAD_BITS, PAYLOAD_LOGICAL_BITS, PREAMBLE, PREAMBLE_BITS, SYMBOL_BITS,
    SYMBOL_ONE, SYMBOL_ZERO, UNIT_BITS,
};

/// Logical commands understood by the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Command {
    /// Pair the receiver with this device id.
    Pair,
    /// Switch heating on.
    HeatOn,
    /// Switch heating off.
    HeatOff,
}

impl Command {
    /// Command byte sent on air.
    pub const fn code(self) -> u8 {
        match self {
            Command::Pair => COMMAND_PAIR,
            Command::HeatOn => COMMAND_HEAT_ON,
            Command::HeatOff => COMMAND_HEAT_OFF,
        }
    }

    /// Heating command matching a switch state.
    pub const fn for_state(on: bool) -> Self {
        if on { Command::HeatOn } else { Command::HeatOff }
    }
}

/// One complete burst as loaded into the TX FIFO.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame([u8; FRAME_LEN]);

impl Frame {
    /// Raw bytes, MSB first.
    pub const fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }

    /// Physical bits in transmission order.
    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        self.0
            .iter()
            .flat_map(|&byte| (0..8).rev().map(move |i| (byte >> i) & 1 == 1))
    }
}

/// Fields recovered by [`decode_frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedFrame {
    /// Device id.
    pub device_id: u16,
    /// Framing nibble, always `0b1000` for valid frames.
    pub framing: u8,
    /// Command byte.
    pub command: u8,
}

/// The three frames a paired switch ever sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frames {
    pair: Frame,
    heat_on: Frame,
    heat_off: Frame,
}

impl Frames {
    /// Precomputes all frames for `device_id`.
    pub fn new(device_id: u16) -> Self {
        Self {
            pair: encode_frame(device_id, Command::Pair.code()),
            heat_on: encode_frame(device_id, Command::HeatOn.code()),
            heat_off: encode_frame(device_id, Command::HeatOff.code()),
        }
    }

    /// Frame for `command`.
    pub fn get(&self, command: Command) -> &Frame {
        match command {
            Command::Pair => &self.pair,
            Command::HeatOn => &self.heat_on,
            Command::HeatOff => &self.heat_off,
        }
    }
}

/// Encodes `command` for `device_id` into a full 45-byte burst.
///
/// Pure: the same inputs always produce the same bytes.
pub fn encode_frame(device_id: u16, command: u8) -> Frame {
    let unit = unit_bits(device_id, command);
    let mut bits = unit.iter().chain(unit.iter());
    let mut bytes = [0u8; FRAME_LEN];
    for byte in bytes.iter_mut() {
        for _ in 0..8 {
            *byte = (*byte << 1) | u8::from(bits.next() == Some(&true));
        }
    }
    Frame(bytes)
}

/// Recovers the fields of a frame.
///
/// Returns `None` unless both units are identical, each carries the preamble,
/// two identical payloads and the gap, and every payload symbol is valid.
pub fn decode_frame(frame: &Frame) -> Option<DecodedFrame> {
    let bits: Vec<bool, FRAME_BITS> = frame.bits().collect();
    let (unit, repeat) = bits.split_at(UNIT_BITS);
    if unit != repeat {
        return None;
    }

    let (preamble, rest) = unit.split_at(PREAMBLE_BITS);
    let (first, rest) = rest.split_at(PAYLOAD_BITS);
    let (second, gap) = rest.split_at(PAYLOAD_BITS);
    if read_pattern(preamble) != PREAMBLE || read_pattern(gap) != u16::from(GAP) || first != second
    {
        return None;
    }

    let logical: Vec<bool, PAYLOAD_LOGICAL_BITS> = first
        .chunks_exact(SYMBOL_BITS)
        .map(|symbol| match read_pattern(symbol) as u8 {
            SYMBOL_ZERO => Some(false),
            SYMBOL_ONE => Some(true),
            _ => None,
        })
        .collect::<Option<_>>()?;
    let (id, rest) = logical.split_at(16);
    let (framing, command) = rest.split_at(4);

    Some(DecodedFrame {
        device_id: read_pattern(id),
        framing: read_pattern(framing) as u8,
        command: read_pattern(command) as u8,
    })
}

fn logical_bits(device_id: u16, command: u8) -> impl Iterator<Item = bool> {
    [
        (device_id, 16u32),
        (u16::from(FRAMING_NIBBLE), 4),
        (u16::from(command), 8),
    ]
    .into_iter()
    .flat_map(|(value, width)| (0..width).rev().map(move |i| (value >> i) & 1 == 1))
}

fn unit_bits(device_id: u16, command: u8) -> [bool; UNIT_BITS] {
    let mut payload = [false; PAYLOAD_BITS];
    for (symbol, bit) in payload
        .chunks_exact_mut(SYMBOL_BITS)
        .zip(logical_bits(device_id, command))
    {
        write_pattern(symbol, u16::from(if bit { SYMBOL_ONE } else { SYMBOL_ZERO }));
    }

    let mut unit = [false; UNIT_BITS];
    let (preamble, rest) = unit.split_at_mut(PREAMBLE_BITS);
    let (first, rest) = rest.split_at_mut(PAYLOAD_BITS);
    let (second, gap) = rest.split_at_mut(PAYLOAD_BITS);
    write_pattern(preamble, PREAMBLE);
    first.copy_from_slice(&payload);
    second.copy_from_slice(&payload);
    write_pattern(gap, u16::from(GAP));
    debug_assert_eq!(gap.len(), GAP_BITS);
    unit
}

/// Writes the low `dst.len()` bits of `pattern` into `dst`, MSB first.
fn write_pattern(dst: &mut [bool], pattern: u16) {
    let width = dst.len();
    for (i, bit) in dst.iter_mut().enumerate() {
        *bit = (pattern >> (width - 1 - i)) & 1 == 1;
    }
}

fn read_pattern(bits: &[bool]) -> u16 {
    bits.iter().fold(0, |acc, &bit| (acc << 1) | u16::from(bit))
}
