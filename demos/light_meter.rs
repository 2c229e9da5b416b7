//! Takes a TSL2561 reading, optionally with automatic ranging or a sweep
//! over every operating point.
//!
//! Usage: light_meter [device] [--agc | --sweep]
//! Default device: /dev/i2c-1, sensor at the floating address (0x39).

use std::{env, process, thread};

use rpi_chips::agc::AGC_TABLE;
use rpi_chips::{I2cBus, Result, Tsl2561, ADDR_FLOAT};

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("light_meter: {e}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut device = String::from("/dev/i2c-1");
    let mut agc = false;
    let mut sweep = false;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--agc" => agc = true,
            "--sweep" => sweep = true,
            other => device = other.to_string(),
        }
    }

    let bus = I2cBus::open(&device)?;
    let mut sensor = Tsl2561::new();
    sensor.open(bus, ADDR_FLOAT)?;

    // Let the first integration finish before sampling.
    thread::sleep(sensor.integration_time().settle());

    if sweep {
        // Walk all six operating points, least to most sensitive.
        println!("--------------------");
        for slot in AGC_TABLE {
            sensor.set_operating_point(slot.point)?;
            sensor.set_enabled(false)?;
            sensor.set_enabled(true)?;
            thread::sleep(slot.point.integration_time.settle());

            let reading = sensor.reading(false)?;
            println!(
                "IR+VIS= {}, IR= {} ({})",
                reading.broadband, reading.infrared, slot.point
            );
        }
    } else {
        let reading = sensor.reading(agc)?;
        if agc {
            println!(
                "IR+VIS= {}, IR= {} (gain={}, integration time={}, normalized={:.1})",
                reading.broadband,
                reading.infrared,
                sensor.gain(),
                sensor.integration_time(),
                sensor.normalize(reading.broadband)
            );
        } else {
            println!("IR+VIS= {}, IR= {}", reading.broadband, reading.infrared);
        }
    }

    sensor.close();
    Ok(())
}
