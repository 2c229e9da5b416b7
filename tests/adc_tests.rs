//! MCP3008 conversion-frame tests against a scripted SPI transport.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use rpi_chips::{Error, InputMode, Mcp3008, Result, SpiTransport};

#[derive(Default)]
struct SpiLog {
    /// Outbound frame of every transfer, in order.
    frames: Vec<Vec<u8>>,
    /// Queued inbound frames.
    responses: VecDeque<Vec<u8>>,
    fail_at: Option<usize>,
    transfers: usize,
}

#[derive(Clone)]
struct MockSpi(Rc<RefCell<SpiLog>>);

fn mock_spi() -> (MockSpi, Rc<RefCell<SpiLog>>) {
    let log = Rc::new(RefCell::new(SpiLog::default()));
    (MockSpi(log.clone()), log)
}

impl SpiTransport for MockSpi {
    fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<()> {
        let mut log = self.0.borrow_mut();
        if log.fail_at == Some(log.transfers) {
            return Err(Error::IoFailure {
                message: "injected fault".to_string(),
            });
        }
        log.transfers += 1;
        log.frames.push(tx.to_vec());
        let data = log
            .responses
            .pop_front()
            .expect("transfer with no scripted response");
        rx.copy_from_slice(&data);
        Ok(())
    }
}

fn open_adc() -> (Mcp3008<MockSpi>, Rc<RefCell<SpiLog>>) {
    let (bus, log) = mock_spi();
    let mut adc = Mcp3008::new();
    adc.open(bus).expect("open should succeed");
    (adc, log)
}

#[test]
fn single_ended_frame_and_result_extraction() {
    let (mut adc, log) = open_adc();
    log.borrow_mut().responses.push_back(vec![0x00, 0x02, 0xFF]);

    let value = adc.read(3, InputMode::SingleEnded).unwrap();
    assert_eq!(value, 0x02FF);
    assert_eq!(
        log.borrow().frames,
        vec![vec![0x01, 0xB0, 0x00]],
        "start bit, single-ended flag, channel in the high nibble"
    );
}

#[test]
fn differential_frame_clears_the_mode_bit() {
    let (mut adc, log) = open_adc();
    log.borrow_mut().responses.push_back(vec![0x00, 0x00, 0x2A]);

    let value = adc.read(3, InputMode::Differential).unwrap();
    assert_eq!(value, 0x2A);
    assert_eq!(log.borrow().frames, vec![vec![0x01, 0x30, 0x00]]);
}

#[test]
fn result_is_masked_to_ten_bits() {
    let (mut adc, log) = open_adc();
    // Undefined leading bits on the wire must not leak into the result.
    log.borrow_mut().responses.push_back(vec![0xFF, 0xFF, 0xFF]);
    assert_eq!(adc.read(0, InputMode::SingleEnded).unwrap(), 0x03FF);
}

#[test]
fn invalid_channel_is_rejected_without_bus_traffic() {
    let (mut adc, log) = open_adc();
    let err = adc.read(8, InputMode::SingleEnded).unwrap_err();
    assert!(
        matches!(err, Error::InvalidPin { pin: 8, max: 7 }),
        "got {err:?}"
    );
    assert_eq!(log.borrow().transfers, 0);
    assert!(adc.is_open());
}

#[test]
fn read_before_open_reports_not_open() {
    let mut adc: Mcp3008<MockSpi> = Mcp3008::new();
    let err = adc.read(0, InputMode::SingleEnded).unwrap_err();
    assert!(matches!(err, Error::NotOpen), "got {err:?}");
}

#[test]
fn transfer_failure_forces_the_handle_closed() {
    let (mut adc, log) = open_adc();
    log.borrow_mut().fail_at = Some(0);

    let err = adc.read(1, InputMode::SingleEnded).unwrap_err();
    assert!(matches!(err, Error::IoFailure { .. }), "got {err:?}");
    assert!(!adc.is_open());

    let err = adc.read(1, InputMode::SingleEnded).unwrap_err();
    assert!(matches!(err, Error::NotOpen), "got {err:?}");
}

#[test]
fn reopening_an_open_handle_fails_fast() {
    let (mut adc, _log) = open_adc();
    let (second_bus, _) = mock_spi();
    let err = adc.open(second_bus).unwrap_err();
    assert!(matches!(err, Error::AlreadyOpen), "got {err:?}");
}
