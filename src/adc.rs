//! MCP3008 10-bit SPI ADC driver.
//!
//! Every conversion is one full-duplex three-byte frame: start bit, then
//! the input configuration, then a don't-care byte while the result clocks
//! back in. There is no register file and nothing to shadow.

use crate::consts::mcp3008 as frame;
use crate::error::{Error, Result};
use crate::transport::SpiTransport;
use log::{debug, trace};

/// How an input channel is sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Channel measured against analog ground.
    SingleEnded,
    /// Channel measured against its pair partner.
    Differential,
}

/// A handle to an MCP3008 ADC.
pub struct Mcp3008<S: SpiTransport> {
    bus: Option<S>,
}

impl<S: SpiTransport> Default for Mcp3008<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SpiTransport> Mcp3008<S> {
    /// Creates a closed handle.
    pub fn new() -> Self {
        Self { bus: None }
    }

    /// Takes ownership of the SPI transport. The chip has no addressing or
    /// identity handshake; chip select is the transport's concern.
    pub fn open(&mut self, bus: S) -> Result<()> {
        if self.bus.is_some() {
            return Err(Error::AlreadyOpen);
        }
        debug!("MCP3008 open");
        self.bus = Some(bus);
        Ok(())
    }

    /// Releases the transport. Idempotent.
    pub fn close(&mut self) {
        self.bus = None;
    }

    /// Whether the handle currently owns a transport.
    pub fn is_open(&self) -> bool {
        self.bus.is_some()
    }

    /// Samples one input channel (0-7). A failed transfer forces the
    /// handle closed before the error is returned.
    pub fn read(&mut self, channel: u8, mode: InputMode) -> Result<u16> {
        if channel >= frame::CHANNEL_COUNT {
            return Err(Error::InvalidPin {
                pin: channel,
                max: frame::CHANNEL_COUNT - 1,
            });
        }
        let bus = self.bus.as_mut().ok_or(Error::NotOpen)?;

        let mode_bit = match mode {
            InputMode::SingleEnded => frame::SINGLE_ENDED_BIT,
            InputMode::Differential => 0,
        };
        let tx = [frame::START_BIT, mode_bit | (channel << 4), 0x00];
        let mut rx = [0u8; 3];
        if let Err(e) = bus.transfer(&tx, &mut rx) {
            self.close();
            return Err(e);
        }

        let value = (u16::from(rx[1]) << 8 | u16::from(rx[2])) & frame::RESULT_MASK;
        trace!("MCP3008 channel {} ({:?}) = {}", channel, mode, value);
        Ok(value)
    }
}
