//! Automatic gain control: iterative selection of a (gain, integration
//! time) operating point so that a raw sample lands inside the usable
//! dynamic-range window.
//!
//! The six valid operating points form a fixed table ordered from least to
//! most sensitive. Each iteration moves exactly one slot: down when the
//! sample exceeds [`UPPER_BOUND`], up when it falls below the slot's floor.
//! Both ends of the table are absorbing (slot 0 never de-escalates, slot 5
//! has a floor of 0), so the sweep terminates within five transitions.

use crate::error::Result;
use log::{debug, trace};
use std::fmt;
use std::time::Duration;

/// Analog gain stage of the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gain {
    /// 1x gain.
    Low,
    /// 16x gain.
    High,
}

impl fmt::Display for Gain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gain::Low => write!(f, "1x"),
            Gain::High => write!(f, "16x"),
        }
    }
}

/// Integration window for one conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationTime {
    /// 13.7 ms window.
    Ms13,
    /// 101 ms window.
    Ms101,
    /// 402 ms window.
    Ms402,
}

impl IntegrationTime {
    /// Minimum wait after restarting the integrator before a sample taken
    /// at this setting is valid. Slightly longer than the window itself.
    pub fn settle(self) -> Duration {
        match self {
            IntegrationTime::Ms13 => Duration::from_micros(50_000),
            IntegrationTime::Ms101 => Duration::from_micros(110_000),
            IntegrationTime::Ms402 => Duration::from_micros(410_000),
        }
    }
}

impl fmt::Display for IntegrationTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrationTime::Ms13 => write!(f, "13.7ms"),
            IntegrationTime::Ms101 => write!(f, "101ms"),
            IntegrationTime::Ms402 => write!(f, "402ms"),
        }
    }
}

/// A (gain, integration time) pair governing sensor sensitivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatingPoint {
    pub gain: Gain,
    pub integration_time: IntegrationTime,
}

impl fmt::Display for OperatingPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "gain={}, integration time={}",
            self.gain, self.integration_time
        )
    }
}

/// One slot of the sensitivity table: the operating point plus the minimum
/// raw sample acceptable before escalating to the next slot.
#[derive(Debug, Clone, Copy)]
pub struct AgcSlot {
    pub point: OperatingPoint,
    pub floor: u16,
}

const fn slot(gain: Gain, integration_time: IntegrationTime, floor: u16) -> AgcSlot {
    AgcSlot {
        point: OperatingPoint {
            gain,
            integration_time,
        },
        floor,
    }
}

/// The six operating points ordered least to most sensitive. The last slot
/// has a floor of 0 so a dim scene at maximum sensitivity is accepted as a
/// best-effort reading rather than an error.
pub const AGC_TABLE: [AgcSlot; 6] = [
    slot(Gain::Low, IntegrationTime::Ms13, 4237),
    slot(Gain::Low, IntegrationTime::Ms101, 15835),
    slot(Gain::High, IntegrationTime::Ms13, 17867),
    slot(Gain::Low, IntegrationTime::Ms402, 8151),
    slot(Gain::High, IntegrationTime::Ms101, 8232),
    slot(Gain::High, IntegrationTime::Ms402, 0),
];

/// Raw samples above this de-escalate sensitivity. Half scale of the
/// 16-bit channel; the chip's counts get unreliable beyond it.
pub const UPPER_BOUND: u16 = 32768;

/// Per-slot sensitivity relative to slot 0. Dividing a raw sample by its
/// slot's scale expresses it in least-sensitive-slot counts.
pub const SENSITIVITY_SCALES: [f64; 6] = [1.0000, 7.2723, 16.0000, 29.3431, 117.9562, 469.4891];

/// Maps an operating point back to its table index.
pub fn slot_of(point: OperatingPoint) -> usize {
    match (point.gain, point.integration_time) {
        (Gain::Low, IntegrationTime::Ms13) => 0,
        (Gain::Low, IntegrationTime::Ms101) => 1,
        (Gain::High, IntegrationTime::Ms13) => 2,
        (Gain::Low, IntegrationTime::Ms402) => 3,
        (Gain::High, IntegrationTime::Ms101) => 4,
        (Gain::High, IntegrationTime::Ms402) => 5,
    }
}

/// What the convergence loop needs from a sensor.
///
/// Implemented by [`crate::Tsl2561`]; tests substitute a scripted fake.
pub trait AgcSensor {
    /// The operating point the device is currently configured for.
    fn operating_point(&self) -> OperatingPoint;

    /// Programs a new operating point, restarts the integrator so a fresh
    /// conversion begins, and waits the **new** point's settle time.
    fn apply_operating_point(&mut self, point: OperatingPoint) -> Result<()>;

    /// Takes a raw broadband sample at the current operating point.
    fn acquire(&mut self) -> Result<u16>;
}

/// Drives `sensor` until a sample lies inside the acceptable window for its
/// operating point, or the most sensitive point is reached. Returns the
/// accepted sample; a device error aborts the sweep at the step that
/// failed, leaving the sensor at the last operating point it acknowledged.
pub fn converge<S: AgcSensor>(sensor: &mut S) -> Result<u16> {
    let mut index = slot_of(sensor.operating_point());
    let mut sample = sensor.acquire()?;
    loop {
        // Movement is always exactly one slot, and the two tests are
        // mutually exclusive, so the sweep cannot oscillate.
        let next = if sample > UPPER_BOUND && index > 0 {
            index - 1
        } else if sample < AGC_TABLE[index].floor && index + 1 < AGC_TABLE.len() {
            index + 1
        } else {
            trace!("AGC converged at slot {} with sample {}", index, sample);
            return Ok(sample);
        };
        debug!(
            "AGC: sample {} outside [{}, {}] at slot {}, retuning to slot {} ({})",
            sample, AGC_TABLE[index].floor, UPPER_BOUND, index, next, AGC_TABLE[next].point
        );
        sensor.apply_operating_point(AGC_TABLE[next].point)?;
        index = next;
        sample = sensor.acquire()?;
    }
}
