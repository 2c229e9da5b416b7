//! MCP4725 frame-encoding and lifecycle tests against a scripted bus.

use std::cell::RefCell;
use std::rc::Rc;

use rpi_chips::{Error, Mcp4725, PowerDown, Result, Transport};

#[derive(Default)]
struct BusLog {
    target: Option<u16>,
    writes: Vec<Vec<u8>>,
    fail_at: Option<usize>,
    transactions: usize,
}

#[derive(Clone)]
struct MockBus(Rc<RefCell<BusLog>>);

fn mock_bus() -> (MockBus, Rc<RefCell<BusLog>>) {
    let log = Rc::new(RefCell::new(BusLog::default()));
    (MockBus(log.clone()), log)
}

impl Transport for MockBus {
    fn set_target(&mut self, address: u16) -> Result<()> {
        self.0.borrow_mut().target = Some(address);
        Ok(())
    }

    fn transact(&mut self, write: &[u8], _read: &mut [u8]) -> Result<()> {
        let mut log = self.0.borrow_mut();
        if log.fail_at == Some(log.transactions) {
            return Err(Error::IoFailure {
                message: "injected fault".to_string(),
            });
        }
        log.transactions += 1;
        log.writes.push(write.to_vec());
        Ok(())
    }
}

fn open_dac(address: u16) -> (Mcp4725<MockBus>, Rc<RefCell<BusLog>>) {
    let (bus, log) = mock_bus();
    let mut dac = Mcp4725::new();
    dac.open(bus, address).expect("open should succeed");
    (dac, log)
}

#[test]
fn open_applies_base_address_offset() {
    let (_dac, log) = open_dac(2);
    assert_eq!(log.borrow().target, Some(0x62));

    let (_dac, log) = open_dac(0x61);
    assert_eq!(log.borrow().target, Some(0x61), "full addresses pass through");
}

#[test]
fn fast_write_packs_value_into_two_bytes() {
    let (mut dac, log) = open_dac(0);
    dac.set_value(0x0123, false).unwrap();
    assert_eq!(log.borrow().writes, vec![vec![0x01, 0x23]]);

    dac.set_value(0x0FFF, false).unwrap();
    assert_eq!(log.borrow().writes[1], vec![0x0F, 0xFF]);
}

#[test]
fn persistent_write_uses_the_eeprom_frame() {
    let (mut dac, log) = open_dac(0);
    dac.set_value(0x0123, true).unwrap();
    // Command byte, top 8 bits, bottom 4 bits shifted high.
    assert_eq!(log.borrow().writes, vec![vec![0x60, 0x12, 0x30]]);
}

#[test]
fn out_of_range_value_is_rejected_without_bus_traffic() {
    let (mut dac, log) = open_dac(0);
    let err = dac.set_value(0x1000, false).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)), "got {err:?}");
    assert_eq!(log.borrow().transactions, 0);
    assert!(dac.is_open(), "argument errors leave the handle untouched");
}

#[test]
fn power_down_frames_latch_mid_scale() {
    let (mut dac, log) = open_dac(0);
    dac.power_down(PowerDown::HundredK, false).unwrap();
    dac.power_down(PowerDown::HundredK, true).unwrap();
    assert_eq!(
        log.borrow().writes,
        vec![vec![0x28, 0x00], vec![0x64, 0x80, 0x00]]
    );
}

#[test]
fn transfer_failure_forces_the_handle_closed() {
    let (mut dac, log) = open_dac(0);
    log.borrow_mut().fail_at = Some(0);

    let err = dac.set_value(100, false).unwrap_err();
    assert!(matches!(err, Error::IoFailure { .. }), "got {err:?}");
    assert!(!dac.is_open());

    let err = dac.power_down(PowerDown::OneK, false).unwrap_err();
    assert!(matches!(err, Error::NotOpen), "got {err:?}");
}

#[test]
fn reopening_an_open_handle_fails_fast() {
    let (mut dac, _log) = open_dac(0);
    let (second_bus, _) = mock_bus();
    let err = dac.open(second_bus, 0).unwrap_err();
    assert!(matches!(err, Error::AlreadyOpen), "got {err:?}");
}
