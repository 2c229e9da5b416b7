//! Samples one MCP3008 input channel.
//!
//! Usage: adc_read [device] [channel] [--differential]
//! Defaults: /dev/spidev0.0, channel 0, single-ended.

use std::{env, process};

use rpi_chips::{InputMode, Mcp3008, Result, SpiBus};

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("adc_read: {e}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut device = String::from("/dev/spidev0.0");
    let mut channel: u8 = 0;
    let mut mode = InputMode::SingleEnded;
    for arg in env::args().skip(1) {
        if arg == "--differential" {
            mode = InputMode::Differential;
        } else if let Ok(c) = arg.parse::<u8>() {
            channel = c;
        } else {
            device = arg;
        }
    }

    let bus = SpiBus::open(&device, 1_000_000)?;
    let mut adc = Mcp3008::new();
    adc.open(bus)?;
    println!("Input value: {}", adc.read(channel, mode)?);

    adc.close();
    Ok(())
}
