//! Bus transport abstraction and the Linux character-device implementations.
//!
//! Drivers are generic over these traits so tests can substitute a scripted
//! transport; production code uses [`I2cBus`] (`/dev/i2c-*` via `i2cdev`) or
//! [`SpiBus`] (`/dev/spidev*` via `spidev`).

use crate::error::{Error, Result};
use i2cdev::core::I2CDevice;
use i2cdev::linux::LinuxI2CDevice;
use log::trace;
use spidev::{SpiModeFlags, Spidev, SpidevOptions, SpidevTransfer};
use std::path::Path;

/// Byte transport to an addressable register-file chip.
///
/// A transaction is one write followed by an optional read. The transport
/// exposes no separate "set register address" primitive, so register reads
/// are expressed as a write of the address byte followed by the read, in a
/// single `transact` call.
pub trait Transport {
    /// Selects the chip that subsequent transactions talk to.
    fn set_target(&mut self, address: u16) -> Result<()>;

    /// Performs one write-then-read transaction. `read` may be empty for
    /// write-only transfers. A short transfer is an error, never a partial
    /// success.
    fn transact(&mut self, write: &[u8], read: &mut [u8]) -> Result<()>;
}

/// `Transport` over a Linux i2c-dev character device.
pub struct I2cBus {
    dev: LinuxI2CDevice,
}

impl I2cBus {
    /// Opens an i2c-dev node, e.g. `/dev/i2c-1`. No chip is selected yet;
    /// drivers call [`Transport::set_target`] during their own open.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        // Address 0 is a placeholder until a driver selects its chip.
        let dev = LinuxI2CDevice::new(path, 0).map_err(|e| Error::TransportUnavailable {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        trace!("Opened i2c transport {}", path.display());
        Ok(Self { dev })
    }
}

impl Transport for I2cBus {
    fn set_target(&mut self, address: u16) -> Result<()> {
        trace!("Selecting i2c slave 0x{:02X}", address);
        self.dev
            .set_slave_address(address)
            .map_err(|e| Error::AddressingFailed {
                address,
                message: e.to_string(),
            })
    }

    fn transact(&mut self, write: &[u8], read: &mut [u8]) -> Result<()> {
        if !write.is_empty() {
            trace!("i2c write: {:02X?}", write);
            self.dev.write(write).map_err(|e| Error::IoFailure {
                message: e.to_string(),
            })?;
        }
        if !read.is_empty() {
            self.dev.read(read).map_err(|e| Error::IoFailure {
                message: e.to_string(),
            })?;
            trace!("i2c read: {:02X?}", read);
        }
        Ok(())
    }
}

/// Full-duplex transfer to an SPI chip (the MCP3008 has no register file,
/// every conversation is a single clocked-out frame).
pub trait SpiTransport {
    /// Clocks `tx` out while clocking the same number of bytes into `rx`.
    fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<()>;
}

/// `SpiTransport` over a Linux spidev character device.
pub struct SpiBus {
    dev: Spidev,
}

impl SpiBus {
    /// Opens and configures a spidev node, e.g. `/dev/spidev0.0`.
    /// Mode 0, 8 bits per word, clocked at `speed_hz`.
    pub fn open<P: AsRef<Path>>(path: P, speed_hz: u32) -> Result<Self> {
        let path = path.as_ref();
        let unavailable = |e: std::io::Error| Error::TransportUnavailable {
            path: path.display().to_string(),
            message: e.to_string(),
        };
        let mut dev = Spidev::open(path).map_err(unavailable)?;
        let options = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(speed_hz)
            .mode(SpiModeFlags::SPI_MODE_0)
            .build();
        dev.configure(&options).map_err(unavailable)?;
        trace!("Opened spi transport {} at {} Hz", path.display(), speed_hz);
        Ok(Self { dev })
    }
}

impl SpiTransport for SpiBus {
    fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<()> {
        trace!("spi transfer out: {:02X?}", tx);
        let mut xfer = SpidevTransfer::read_write(tx, rx);
        self.dev.transfer(&mut xfer).map_err(|e| Error::IoFailure {
            message: e.to_string(),
        })?;
        trace!("spi transfer in: {:02X?}", rx);
        Ok(())
    }
}
