//! MCP4725 12-bit DAC driver.
//!
//! The chip has a single value register driven by command frames rather
//! than register addresses, so there is nothing to shadow; the driver is
//! the open/closed handle plus frame encoding. The EEPROM variants latch
//! the setting across power cycles.

use crate::consts::mcp4725 as cmds;
use crate::device::ChipHandle;
use crate::error::{Error, Result};
use crate::transport::Transport;
use log::debug;

/// Power-down modes: the output is pulled to ground through the named
/// resistor while the converter sleeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerDown {
    /// 1 kOhm pull to ground.
    OneK,
    /// 100 kOhm pull to ground.
    HundredK,
    /// 500 kOhm pull to ground.
    FiveHundredK,
}

impl PowerDown {
    fn bits(self) -> u8 {
        match self {
            PowerDown::OneK => 0x01,
            PowerDown::HundredK => 0x02,
            PowerDown::FiveHundredK => 0x03,
        }
    }
}

/// A handle to an MCP4725 DAC.
pub struct Mcp4725<T: Transport> {
    handle: ChipHandle<T>,
}

impl<T: Transport> Default for Mcp4725<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> Mcp4725<T> {
    /// Creates a closed handle.
    pub fn new() -> Self {
        Self {
            handle: ChipHandle::new(),
        }
    }

    /// Opens the DAC. `address` values 0-7 select the address-pin offset on
    /// the fixed 0x60 base; larger values are used verbatim.
    pub fn open(&mut self, bus: T, address: u16) -> Result<()> {
        let address = if address > 7 {
            address
        } else {
            address | cmds::BASE_ADDRESS
        };
        self.handle.open(bus, address)?;
        debug!("MCP4725 open at 0x{:02X}", address);
        Ok(())
    }

    /// Releases the transport. Idempotent.
    pub fn close(&mut self) {
        self.handle.close();
    }

    /// Whether the handle currently owns a transport.
    pub fn is_open(&self) -> bool {
        self.handle.is_open()
    }

    /// Sets the output value (0-4095). With `persist` the value also goes
    /// to the chip's EEPROM and survives power cycles; without it a
    /// two-byte fast-write frame is used.
    pub fn set_value(&mut self, value: u16, persist: bool) -> Result<()> {
        if value > cmds::MAX_VALUE {
            return Err(Error::InvalidArgument(format!(
                "DAC value {} exceeds 12-bit range (max {})",
                value,
                cmds::MAX_VALUE
            )));
        }
        if persist {
            self.handle.write_raw(&[
                cmds::CMD_EEPROM_WRITE,
                (value >> 4) as u8, // Top 8 bits
                (value << 4) as u8, // Bottom 4 bits
            ])
        } else {
            self.handle.write_raw(&[
                cmds::CMD_FAST_WRITE | (value >> 8) as u8,
                (value & 0xFF) as u8,
            ])
        }
    }

    /// Puts the converter to sleep with the output pulled to ground
    /// through the mode's resistor. The latched value is set to mid scale.
    pub fn power_down(&mut self, mode: PowerDown, persist: bool) -> Result<()> {
        if persist {
            self.handle.write_raw(&[
                cmds::CMD_EEPROM_WRITE | (mode.bits() << 1),
                0x80, // Mid scale
                0x00,
            ])
        } else {
            self.handle
                .write_raw(&[cmds::CMD_FAST_WRITE | (mode.bits() << 4) | 0x08, 0x00])
        }
    }
}
