//! TSL2561 luminosity sensor driver.
//!
//! The chip exposes two 16-bit channels (broadband and infrared) behind a
//! command-register protocol. The gain and integration-time configuration
//! lives in the TIMING register and is mirrored host-side, so changing one
//! field never needs a read round-trip. Automatic ranging is delegated to
//! [`crate::agc::converge`].

use crate::agc::{self, AgcSensor, Gain, IntegrationTime, OperatingPoint};
use crate::consts::tsl2561 as regs;
use crate::device::ChipHandle;
use crate::error::{Error, Result};
use crate::transport::Transport;
use log::debug;
use std::thread;

/// The two conversion result channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Visible plus infrared counts.
    Broadband,
    /// Infrared-only counts.
    Infrared,
}

impl Channel {
    fn reg(self) -> u8 {
        match self {
            Channel::Broadband => regs::REG_CHAN_0,
            Channel::Infrared => regs::REG_CHAN_1,
        }
    }
}

/// One complete reading from the sensor.
#[derive(Debug, Clone, Copy)]
pub struct Reading {
    /// Visible plus infrared counts.
    pub broadband: u16,
    /// Infrared-only counts.
    pub infrared: u16,
}

/// A handle to a TSL2561 luminosity sensor.
pub struct Tsl2561<T: Transport> {
    handle: ChipHandle<T>,
    // Mirror of the TIMING register, committed only after the chip
    // acknowledged the write.
    gain: Gain,
    integration_time: IntegrationTime,
}

impl<T: Transport> Default for Tsl2561<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> Tsl2561<T> {
    /// Creates a closed handle. Gain 1x, 13.7 ms integration until changed.
    pub fn new() -> Self {
        Self {
            handle: ChipHandle::new(),
            gain: Gain::Low,
            integration_time: IntegrationTime::Ms13,
        }
    }

    /// Opens the sensor at `address` (one of 0x29, 0x39, 0x49 depending on
    /// the ADDR-SEL pin). Powers the chip up, verifies its identity and
    /// programs the timing register from the host mirror.
    pub fn open(&mut self, bus: T, address: u16) -> Result<()> {
        if address != regs::ADDR_LOW && address != regs::ADDR_FLOAT && address != regs::ADDR_HIGH {
            return Err(Error::InvalidArgument(format!(
                "i2c address 0x{:02X} is not one of 0x29/0x39/0x49",
                address
            )));
        }
        self.handle.open(bus, address)?;

        // Wake the chip and make sure a TSL2561 is actually out there.
        if let Err(e) = self.start_up(address) {
            self.handle.close();
            return Err(e);
        }
        debug!("TSL2561 open at 0x{:02X} ({})", address, self.operating_point());
        Ok(())
    }

    fn start_up(&mut self, address: u16) -> Result<()> {
        self.handle.write_register(
            regs::COMMAND_BIT | regs::REG_CONTROL,
            regs::CONTROL_POWER_ON,
        )?;
        let id = self.handle.read_register(regs::COMMAND_BIT | regs::REG_ID)?;
        if id & 0x0F != regs::ID_FAMILY {
            return Err(Error::AddressingFailed {
                address,
                message: format!("unexpected chip id 0x{:02X}", id),
            });
        }
        self.write_timing(self.gain, self.integration_time)
    }

    /// Releases the transport. Idempotent.
    pub fn close(&mut self) {
        self.handle.close();
    }

    /// Whether the handle currently owns a transport.
    pub fn is_open(&self) -> bool {
        self.handle.is_open()
    }

    /// The configured analog gain.
    pub fn gain(&self) -> Gain {
        self.gain
    }

    /// The configured integration window.
    pub fn integration_time(&self) -> IntegrationTime {
        self.integration_time
    }

    fn write_timing(&mut self, gain: Gain, integration_time: IntegrationTime) -> Result<()> {
        let gain_bits = match gain {
            Gain::Low => regs::GAIN_1X,
            Gain::High => regs::GAIN_16X,
        };
        let time_bits = match integration_time {
            IntegrationTime::Ms13 => regs::INTEG_13_7MS,
            IntegrationTime::Ms101 => regs::INTEG_101MS,
            IntegrationTime::Ms402 => regs::INTEG_402MS,
        };
        self.handle
            .write_register(regs::COMMAND_BIT | regs::REG_TIMING, gain_bits | time_bits)?;
        self.gain = gain;
        self.integration_time = integration_time;
        Ok(())
    }

    /// Sets the analog gain, keeping the current integration time.
    pub fn set_gain(&mut self, gain: Gain) -> Result<()> {
        self.write_timing(gain, self.integration_time)
    }

    /// Sets the integration window, keeping the current gain.
    pub fn set_integration_time(&mut self, integration_time: IntegrationTime) -> Result<()> {
        self.write_timing(self.gain, integration_time)
    }

    /// Programs gain and integration time in one register write.
    pub fn set_operating_point(&mut self, point: OperatingPoint) -> Result<()> {
        self.write_timing(point.gain, point.integration_time)
    }

    /// Powers the sensing stage up or down. Powering down and back up
    /// restarts the internal integrator.
    pub fn set_enabled(&mut self, enabled: bool) -> Result<()> {
        let value = if enabled {
            regs::CONTROL_POWER_ON
        } else {
            regs::CONTROL_POWER_OFF
        };
        self.handle
            .write_register(regs::COMMAND_BIT | regs::REG_CONTROL, value)
    }

    /// Reads one conversion channel. The result registers are volatile and
    /// never shadowed.
    pub fn read_channel(&mut self, channel: Channel) -> Result<u16> {
        self.handle
            .read_register_word(regs::COMMAND_BIT | regs::WORD_BIT | channel.reg())
    }

    /// Takes a reading of both channels. With `agc` set, the broadband
    /// channel is ranged first: the convergence loop may rewrite the
    /// timing register and re-sample several times, blocking for the
    /// accumulated settle waits (up to ~2 s over a full table sweep).
    pub fn reading(&mut self, agc: bool) -> Result<Reading> {
        let broadband = if agc {
            agc::converge(self)?
        } else {
            self.read_channel(Channel::Broadband)?
        };
        let infrared = self.read_channel(Channel::Infrared)?;
        Ok(Reading {
            broadband,
            infrared,
        })
    }

    /// Expresses a raw sample in least-sensitive-slot counts, comparable
    /// across operating points.
    pub fn normalize(&self, raw: u16) -> f64 {
        raw as f64 / agc::SENSITIVITY_SCALES[agc::slot_of(self.operating_point())]
    }
}

impl<T: Transport> AgcSensor for Tsl2561<T> {
    fn operating_point(&self) -> OperatingPoint {
        OperatingPoint {
            gain: self.gain,
            integration_time: self.integration_time,
        }
    }

    fn apply_operating_point(&mut self, point: OperatingPoint) -> Result<()> {
        self.set_operating_point(point)?;
        // Power-cycle the sensing stage so the integrator restarts at the
        // new settings, then wait out the new integration window.
        self.set_enabled(false)?;
        self.set_enabled(true)?;
        thread::sleep(point.integration_time.settle());
        Ok(())
    }

    fn acquire(&mut self) -> Result<u16> {
        self.read_channel(Channel::Broadband)
    }
}
