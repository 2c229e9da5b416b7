//! Shared register-file plumbing: the open/closed chip handle and the
//! shadow-register pattern the config-register drivers build on.

use crate::error::{Error, Result};
use crate::transport::Transport;
use log::{debug, trace};

/// A handle to one chip on a byte transport.
///
/// The handle is either open (owns a transport with the chip selected) or
/// closed. Any transfer failure forces it closed before the error is
/// returned; the next operation then reports [`Error::NotOpen`] until the
/// handle is reopened. The transport is exclusively owned for the lifetime
/// of the handle, and the handle holds no lock: exactly one logical owner
/// must serialize all calls.
pub struct ChipHandle<T: Transport> {
    bus: Option<T>,
    address: u16,
}

impl<T: Transport> Default for ChipHandle<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> ChipHandle<T> {
    /// Creates a closed handle.
    pub fn new() -> Self {
        Self {
            bus: None,
            address: 0,
        }
    }

    /// Takes ownership of `bus` and selects the chip at `address`.
    /// Fails with [`Error::AlreadyOpen`] if the handle already owns a
    /// transport; an addressing failure leaves the handle closed.
    pub fn open(&mut self, mut bus: T, address: u16) -> Result<()> {
        if self.bus.is_some() {
            return Err(Error::AlreadyOpen);
        }
        bus.set_target(address)?;
        debug!("Chip handle open at 0x{:02X}", address);
        self.address = address;
        self.bus = Some(bus);
        Ok(())
    }

    /// Releases the transport. Idempotent; always succeeds.
    pub fn close(&mut self) {
        if self.bus.take().is_some() {
            debug!("Chip handle at 0x{:02X} closed", self.address);
        }
    }

    /// Whether the handle currently owns a transport.
    pub fn is_open(&self) -> bool {
        self.bus.is_some()
    }

    /// The bus address the handle was opened at.
    pub fn address(&self) -> u16 {
        self.address
    }

    // Runs one transaction, forcing the handle closed on a transfer failure.
    // Retry policy belongs to the transport, not this layer.
    fn transact(&mut self, write: &[u8], read: &mut [u8]) -> Result<()> {
        let bus = self.bus.as_mut().ok_or(Error::NotOpen)?;
        match bus.transact(write, read) {
            Ok(()) => Ok(()),
            Err(e @ Error::IoFailure { .. }) => {
                self.close();
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Single write-only transaction of raw bytes (for chips whose command
    /// byte is not a register address).
    pub fn write_raw(&mut self, bytes: &[u8]) -> Result<()> {
        trace!("Write 0x{:02X}: {:02X?}", self.address, bytes);
        self.transact(bytes, &mut [])
    }

    /// Writes one register: address byte followed by the value, in a single
    /// transaction.
    pub fn write_register(&mut self, reg: u8, value: u8) -> Result<()> {
        trace!(
            "Write reg 0x{:02X} = 0x{:02X} at 0x{:02X}",
            reg,
            value,
            self.address
        );
        self.transact(&[reg, value], &mut [])
    }

    /// Reads one register: writes the register address, then reads its
    /// value. Two-phase access expressed as one transaction.
    pub fn read_register(&mut self, reg: u8) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.transact(&[reg], &mut buf)?;
        trace!(
            "Read reg 0x{:02X} = 0x{:02X} at 0x{:02X}",
            reg,
            buf[0],
            self.address
        );
        Ok(buf[0])
    }

    /// Reads a 16-bit little-endian register pair starting at `reg`.
    pub fn read_register_word(&mut self, reg: u8) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.transact(&[reg], &mut buf)?;
        let value = u16::from_le_bytes(buf);
        trace!(
            "Read reg 0x{:02X} = 0x{:04X} at 0x{:02X}",
            reg,
            value,
            self.address
        );
        Ok(value)
    }
}

/// Host-side mirror of one writable chip register.
///
/// Per-bit updates are derived from the mirror instead of a fresh bus read,
/// so the mirror must never diverge from the chip: it is populated by
/// reading the register at open and committed only after a register write
/// has succeeded. A failed write leaves the mirror at the last value the
/// chip acknowledged.
#[derive(Debug, Clone, Copy)]
pub struct ShadowRegister {
    reg: u8,
    value: u8,
}

impl ShadowRegister {
    /// Populates the mirror from the chip's current register contents.
    pub fn load<T: Transport>(handle: &mut ChipHandle<T>, reg: u8) -> Result<Self> {
        let value = handle.read_register(reg)?;
        Ok(Self { reg, value })
    }

    /// A mirror seeded with a known value, for registers that are written
    /// before they are ever read back.
    pub fn with_value(reg: u8, value: u8) -> Self {
        Self { reg, value }
    }

    /// Last value the chip acknowledged.
    pub fn value(&self) -> u8 {
        self.value
    }

    /// Writes `value` to the chip, committing the mirror on success.
    pub fn write<T: Transport>(&mut self, handle: &mut ChipHandle<T>, value: u8) -> Result<()> {
        handle.write_register(self.reg, value)?;
        self.value = value;
        Ok(())
    }

    /// Sets or clears one bit, deriving the new register value from the
    /// mirror. No read round-trip.
    pub fn set_bit<T: Transport>(
        &mut self,
        handle: &mut ChipHandle<T>,
        bit: u8,
        on: bool,
    ) -> Result<()> {
        let next = if on {
            self.value | (1 << bit)
        } else {
            self.value & !(1 << bit)
        };
        self.write(handle, next)
    }
}
