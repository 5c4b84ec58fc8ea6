//! Simulated CC1101 behind the [`Transport`] trait.
//!
//! Decodes header bytes the way the chip does and keeps just enough state to
//! exercise reset, verification and transmit paths.

use core::convert::Infallible;

use crate::registers::{PA_TABLE_LEN, PATABLE, Strobe, TXFIFO};
use crate::transport::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Header,
    ReadRegister(u8),
    WriteRegister(u8),
    Status(u8),
    BurstWrite(u8),
    BurstRead(u8),
    Done,
}

/// Chip status byte returned while a header is clocked out.
const CHIP_STATUS: u8 = 0x0f;

#[derive(Debug)]
pub(crate) struct FakeCc1101 {
    pub(crate) partnum: u8,
    pub(crate) version: u8,
    pub(crate) marcstate: u8,
    pub(crate) marcstate_after_stx: u8,
    pub(crate) corrupt_register: Option<u8>,
    pub(crate) corrupt_pa_index: Option<usize>,
    pub(crate) registers: [u8; 0x30],
    pub(crate) pa_table: [u8; PA_TABLE_LEN],
    pub(crate) tx_fifo: Vec<u8>,
    pub(crate) register_writes: Vec<(u8, u8)>,
    pub(crate) strobes: Vec<u8>,
    pub(crate) delays: Vec<u32>,
    pub(crate) resets: usize,
    pub(crate) selected: bool,
    access: Access,
}

impl FakeCc1101 {
    pub(crate) fn new() -> Self {
        Self {
            partnum: 0x00,
            version: 0x14,
            marcstate: 0x01,
            marcstate_after_stx: 0x13,
            corrupt_register: None,
            corrupt_pa_index: None,
            registers: [0; 0x30],
            pa_table: [0; PA_TABLE_LEN],
            tx_fifo: Vec::new(),
            register_writes: Vec::new(),
            strobes: Vec::new(),
            delays: Vec::new(),
            resets: 0,
            selected: false,
            access: Access::Done,
        }
    }

    fn header(&mut self, byte: u8) {
        let addr = byte & 0x3f;
        let read = byte & 0x80 != 0;
        let burst = byte & 0x40 != 0;
        self.access = match addr {
            0x30..=0x3d if burst => Access::Status(addr),
            0x30..=0x3d => {
                self.strobe(addr);
                Access::Done
            }
            _ if addr >= PATABLE && read => Access::BurstRead(addr),
            _ if addr >= PATABLE => Access::BurstWrite(addr),
            _ if read => Access::ReadRegister(addr),
            _ => Access::WriteRegister(addr),
        };
    }

    fn strobe(&mut self, addr: u8) {
        self.strobes.push(addr);
        if addr == Strobe::Sres.addr() {
            self.resets += 1;
            self.registers = [0; 0x30];
            self.pa_table = [0; PA_TABLE_LEN];
            self.tx_fifo.clear();
            self.marcstate = 0x01;
        } else if addr == Strobe::Sidle.addr() {
            self.marcstate = 0x01;
        } else if addr == Strobe::Sftx.addr() {
            self.tx_fifo.clear();
        } else if addr == Strobe::Stx.addr() {
            self.marcstate = self.marcstate_after_stx;
        }
    }

    fn read_value(&self, access: Access) -> u8 {
        match access {
            Access::ReadRegister(addr) => {
                let value = self.registers[usize::from(addr)];
                if self.corrupt_register == Some(addr) {
                    !value
                } else {
                    value
                }
            }
            Access::Status(0x30) => self.partnum,
            Access::Status(0x31) => self.version,
            Access::Status(0x35) => self.marcstate,
            _ => 0,
        }
    }
}

impl Transport for FakeCc1101 {
    type Error = Infallible;

    fn assert_select(&mut self) -> Result<(), Self::Error> {
        self.selected = true;
        self.access = Access::Header;
        Ok(())
    }

    fn deassert_select(&mut self) -> Result<(), Self::Error> {
        self.selected = false;
        self.access = Access::Done;
        Ok(())
    }

    fn delay_microseconds(&mut self, us: u32) {
        self.delays.push(us);
    }

    fn transfer_byte(&mut self, byte: u8) -> Result<u8, Self::Error> {
        match self.access {
            Access::Header => {
                self.header(byte);
                Ok(CHIP_STATUS)
            }
            access @ (Access::ReadRegister(_) | Access::Status(_)) => {
                self.access = Access::Done;
                Ok(self.read_value(access))
            }
            _ => Ok(0),
        }
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        match self.access {
            Access::Header => self.header(byte),
            Access::WriteRegister(addr) => {
                self.registers[usize::from(addr)] = byte;
                self.register_writes.push((addr, byte));
                self.access = Access::Done;
            }
            _ => {}
        }
        Ok(())
    }

    fn write_burst(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        match self.access {
            Access::BurstWrite(PATABLE) => {
                for (slot, &byte) in self.pa_table.iter_mut().zip(bytes) {
                    *slot = byte;
                }
            }
            Access::BurstWrite(TXFIFO) => self.tx_fifo.extend_from_slice(bytes),
            _ => {}
        }
        Ok(())
    }

    fn read_burst(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        if self.access == Access::BurstRead(PATABLE) {
            for (index, (slot, &byte)) in buf.iter_mut().zip(self.pa_table.iter()).enumerate() {
                *slot = if self.corrupt_pa_index == Some(index) {
                    !byte
                } else {
                    byte
                };
            }
        }
        Ok(())
    }
}
