//! Writes a value to an MCP4725 DAC.
//!
//! Usage: dac_out [device] <value> [--persist]
//! Default device: /dev/i2c-1, DAC address pins grounded.

use std::{env, process};

use rpi_chips::{Error, I2cBus, Mcp4725, Result};

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("dac_out: {e}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut device = String::from("/dev/i2c-1");
    let mut persist = false;
    let mut value: Option<u16> = None;
    for arg in env::args().skip(1) {
        if arg == "--persist" {
            persist = true;
        } else if let Ok(v) = arg.parse::<u16>() {
            value = Some(v);
        } else {
            device = arg;
        }
    }
    let value = value.ok_or_else(|| {
        Error::InvalidArgument("usage: dac_out [device] <value> [--persist]".to_string())
    })?;

    let bus = I2cBus::open(&device)?;
    let mut dac = Mcp4725::new();
    dac.open(bus, 0)?;
    dac.set_value(value, persist)?;
    println!(
        "Output set to {}{}",
        value,
        if persist { " (persisted)" } else { "" }
    );

    dac.close();
    Ok(())
}
