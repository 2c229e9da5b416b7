//! MCP23008 8-bit I/O expander driver (also drives the MCP23009).
//!
//! The writable configuration registers (IODIR, GPPU, OLAT) are shadowed
//! host-side: per-pin operations derive the new register value from the
//! mirror and issue a single write, never a read round-trip. The GPIO
//! level register is volatile and always read live.

use crate::consts::mcp23008 as regs;
use crate::device::{ChipHandle, ShadowRegister};
use crate::error::{Error, Result};
use crate::transport::Transport;
use log::debug;

/// A validated expander pin number (0-7). Use `Pin::new(num)` to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pin(u8);

impl Pin {
    /// Creates a new Pin, returning [`Error::InvalidPin`] if the number is
    /// out of range. Validation happens here, before any bus traffic.
    pub fn new(pin_num: u8) -> Result<Self> {
        if pin_num < regs::PIN_COUNT {
            Ok(Pin(pin_num))
        } else {
            Err(Error::InvalidPin {
                pin: pin_num,
                max: regs::PIN_COUNT - 1,
            })
        }
    }

    /// Returns the underlying pin number (0-7).
    #[inline]
    pub fn number(&self) -> u8 {
        self.0
    }
}

/// Direction of one expander pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    Input,
    Output,
}

/// Logic level of one expander pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

/// A handle to an MCP23008 I/O expander.
pub struct Mcp23008<T: Transport> {
    handle: ChipHandle<T>,
    iodir: ShadowRegister,
    gppu: ShadowRegister,
    olat: ShadowRegister,
}

impl<T: Transport> Default for Mcp23008<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> Mcp23008<T> {
    /// Creates a closed handle.
    pub fn new() -> Self {
        Self {
            handle: ChipHandle::new(),
            // Chip reset values; replaced by live reads at open.
            iodir: ShadowRegister::with_value(regs::REG_IODIR, 0xFF),
            gppu: ShadowRegister::with_value(regs::REG_GPPU, 0x00),
            olat: ShadowRegister::with_value(regs::REG_OLAT, 0x00),
        }
    }

    /// Opens the expander. `address` values 0-7 select the A0-A2 offset on
    /// the fixed 0x20 base; larger values are used verbatim. The shadows
    /// are populated by reading the chip's current register contents, so an
    /// already-configured chip is picked up as-is.
    pub fn open(&mut self, bus: T, address: u16) -> Result<()> {
        let address = if address > 7 {
            address
        } else {
            address | regs::BASE_ADDRESS
        };
        self.handle.open(bus, address)?;

        self.iodir = ShadowRegister::load(&mut self.handle, regs::REG_IODIR)?;
        self.gppu = ShadowRegister::load(&mut self.handle, regs::REG_GPPU)?;
        self.olat = ShadowRegister::load(&mut self.handle, regs::REG_OLAT)?;
        debug!(
            "MCP23008 open at 0x{:02X}: iodir=0x{:02X}, gppu=0x{:02X}, olat=0x{:02X}",
            address,
            self.iodir.value(),
            self.gppu.value(),
            self.olat.value()
        );
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

    /// Bulk pin configuration. `outputs` uses 1 = output at this API and is
    /// inverted to the chip's 1 = input IODIR convention; `invert` flips
    /// input polarity per pin; `pullups` enables the internal 100k pull-up
    /// per pin.
    pub fn setup_pins(&mut self, outputs: u8, pullups: u8, invert: u8) -> Result<()> {
        self.iodir.write(&mut self.handle, !outputs)?;
        self.handle.write_register(regs::REG_IPOL, invert)?;
        self.gppu.write(&mut self.handle, pullups)?;
        Ok(())
    }

    /// Sets the direction of one pin.
    pub fn pin_mode(&mut self, pin: Pin, mode: PinMode) -> Result<()> {
        self.iodir
            .set_bit(&mut self.handle, pin.number(), mode == PinMode::Input)
    }

    /// Enables or disables the internal pull-up on one pin.
    pub fn pull_up(&mut self, pin: Pin, enabled: bool) -> Result<()> {
        self.gppu.set_bit(&mut self.handle, pin.number(), enabled)
    }

    /// Sets the output latch for one pin.
    pub fn digital_write(&mut self, pin: Pin, level: Level) -> Result<()> {
        self.olat
            .set_bit(&mut self.handle, pin.number(), level == Level::High)
    }

    /// Writes all eight output latches in one register write.
    pub fn write_pins(&mut self, bits: u8) -> Result<()> {
        self.olat.write(&mut self.handle, bits)
    }

    /// Reads the live level of all eight pins. The GPIO register is
    /// volatile and never shadowed.
    pub fn read_pins(&mut self) -> Result<u8> {
        self.handle.read_register(regs::REG_GPIO)
    }

    /// Reads the live level of one pin.
    pub fn digital_read(&mut self, pin: Pin) -> Result<Level> {
        let bits = self.read_pins()?;
        Ok(if bits & (1 << pin.number()) != 0 {
            Level::High
        } else {
            Level::Low
        })
    }

    /// Mirror of the direction register (chip convention, 1 = input).
    pub fn directions(&self) -> u8 {
        self.iodir.value()
    }

    /// Mirror of the pull-up enable register.
    pub fn pull_ups(&self) -> u8 {
        self.gppu.value()
    }

    /// Mirror of the output latch register.
    pub fn output_latch(&self) -> u8 {
        self.olat.value()
    }
}
