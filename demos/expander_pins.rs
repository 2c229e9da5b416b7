//! Drives one MCP23008 pin and reads the port back.
//!
//! Usage: expander_pins [device] [pin]
//! Defaults: /dev/i2c-1, pin 0, expander address pins grounded.

use std::{env, process, thread, time::Duration};

use rpi_chips::{I2cBus, Level, Mcp23008, Pin, PinMode, Result};

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("expander_pins: {e}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let device = args.get(1).map(String::as_str).unwrap_or("/dev/i2c-1");
    let pin_num: u8 = args
        .get(2)
        .map(|s| s.parse().unwrap_or(0))
        .unwrap_or(0);

    let bus = I2cBus::open(device)?;
    let mut expander = Mcp23008::new();
    expander.open(bus, 0)?;
    println!(
        "Expander open: iodir=0x{:02X}, gppu=0x{:02X}, olat=0x{:02X}",
        expander.directions(),
        expander.pull_ups(),
        expander.output_latch()
    );

    let pin = Pin::new(pin_num)?;
    expander.pin_mode(pin, PinMode::Output)?;

    println!("Toggling pin {}...", pin.number());
    expander.digital_write(pin, Level::High)?;
    thread::sleep(Duration::from_millis(250));
    println!("Pins = 0x{:02X}", expander.read_pins()?);
    expander.digital_write(pin, Level::Low)?;

    expander.close();
    Ok(())
}
