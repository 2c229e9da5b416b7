//! # rpi-chips
//!
//! A Rust crate for driving a small family of sensor/actuator chips from
//! userspace Linux through the kernel's `i2c-dev` and `spidev` character
//! devices: the MCP23008 I/O expander, the TSL2561 luminosity sensor, the
//! MCP4725 DAC and the MCP3008 ADC.
//!
//! This crate uses the `i2cdev` and `spidev` crates for bus access.
//!
//! ## Features
//!
//! *   MCP23008 I/O expander (also MCP23009):
//!     *   Strongly-typed `Pin` struct (pins 0-7).
//!     *   Per-pin direction, pull-up and output level with shadowed
//!         configuration registers (one bus write per change, no
//!         read-modify-write round trips).
//!     *   Bulk pin setup and whole-port reads/writes.
//! *   TSL2561 luminosity sensor:
//!     *   Gain (1x/16x) and integration time (13.7/101/402 ms) control.
//!     *   Broadband and infrared channel reads.
//!     *   Automatic gain control: [`reading`](Tsl2561::reading) with AGC
//!         walks the six-point sensitivity table until the sample lands in
//!         the usable window.
//! *   MCP4725 12-bit DAC: fast writes, EEPROM-persisted writes,
//!     power-down modes.
//! *   MCP3008 10-bit ADC: single-ended and differential conversions.
//!
//! ## Driver model
//!
//! Every driver is a stateful handle: create it closed, `open` it with a
//! transport, use it, `close` it (or drop it). Any transfer failure forces
//! the handle closed before the error is returned; a failed transaction
//! must not leave the host-side register mirrors looking valid. No handle
//! is safe to share without external serialization; none holds a lock.
//!
//! Configuration registers are mirrored host-side ([`ShadowRegister`]): the
//! mirror is populated by reading the chip at open and committed only after
//! a write has been acknowledged, so it always equals the last value the
//! chip accepted.
//!
//! ## Basic Usage
//!
//! ```no_run
//! use rpi_chips::{I2cBus, Level, Mcp23008, Pin, PinMode, Result};
//!
//! fn main() -> Result<()> {
//!     // Optional: Initialize logging
//!     // env_logger::init();
//!
//!     let bus = I2cBus::open("/dev/i2c-1")?;
//!     let mut expander = Mcp23008::new();
//!     expander.open(bus, 0)?; // Address pins grounded -> 0x20
//!
//!     let pin = Pin::new(3)?;
//!     expander.pin_mode(pin, PinMode::Output)?;
//!     expander.digital_write(pin, Level::High)?;
//!
//!     expander.close();
//!     Ok(())
//! }
//! ```
//!
//! ## Hardware Setup Notes
//!
//! *   **I²C Pull-up Resistors:** Required externally (e.g., 4.7kΩ to 3.3V).
//! *   **Linux permissions:** Grant the user access to `/dev/i2c-*` and
//!     `/dev/spidev*` (typically the `i2c` / `spi` groups, or udev rules).
//! *   **Blocking:** Register operations block for the duration of the bus
//!     transaction; an AGC reading additionally blocks for the integration
//!     settle waits (up to ~2 s over a full sweep).

// Make internal modules private, re-export public types
mod consts;
mod error;

pub mod adc;
pub mod agc;
pub mod dac;
pub mod device;
pub mod expander;
pub mod sensor;
pub mod transport;

pub use adc::{InputMode, Mcp3008};
pub use agc::{AgcSensor, Gain, IntegrationTime, OperatingPoint};
pub use dac::{Mcp4725, PowerDown};
pub use device::{ChipHandle, ShadowRegister};
pub use error::{Error, Result};
pub use expander::{Level, Mcp23008, Pin, PinMode};
pub use sensor::{Channel, Reading, Tsl2561};
pub use transport::{I2cBus, SpiBus, SpiTransport, Transport};

// Re-export the fixed sensor addresses for callers that pass them around.
pub use consts::tsl2561::{ADDR_FLOAT, ADDR_HIGH, ADDR_LOW};
