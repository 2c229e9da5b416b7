//! Internal constants, register addresses, and bit definitions.

// --- MCP23008 I/O Expander ---
pub mod mcp23008 {
    /// Fixed portion of the 7-bit address; the low 3 bits come from the
    /// A0-A2 address pins.
    pub const BASE_ADDRESS: u16 = 0x20;

    // Register Addresses
    pub const REG_IODIR: u8 = 0x00; // 1 bit = input (chip convention)
    pub const REG_IPOL: u8 = 0x01;
    #[allow(dead_code)]
    pub const REG_GPINTEN: u8 = 0x02;
    #[allow(dead_code)]
    pub const REG_DEFVAL: u8 = 0x03;
    #[allow(dead_code)]
    pub const REG_INTCON: u8 = 0x04;
    #[allow(dead_code)]
    pub const REG_IOCON: u8 = 0x05;
    pub const REG_GPPU: u8 = 0x06;
    #[allow(dead_code)]
    pub const REG_INTF: u8 = 0x07;
    #[allow(dead_code)]
    pub const REG_INTCAP: u8 = 0x08;
    pub const REG_GPIO: u8 = 0x09; // Volatile, never shadowed
    pub const REG_OLAT: u8 = 0x0A;

    pub const PIN_COUNT: u8 = 8;
}

// --- TSL2561 Luminosity Sensor ---
pub mod tsl2561 {
    /// Address with the ADDR-SEL line tied low.
    pub const ADDR_LOW: u16 = 0x29;
    /// Address with the ADDR-SEL line floating.
    pub const ADDR_FLOAT: u16 = 0x39;
    /// Address with the ADDR-SEL line tied high.
    pub const ADDR_HIGH: u16 = 0x49;

    // Command register bits
    pub const COMMAND_BIT: u8 = 0x80;
    #[allow(dead_code)]
    pub const CLEAR_BIT: u8 = 0x40;
    pub const WORD_BIT: u8 = 0x20;
    #[allow(dead_code)]
    pub const BLOCK_BIT: u8 = 0x10;

    // Control register values
    pub const CONTROL_POWER_ON: u8 = 0x03;
    pub const CONTROL_POWER_OFF: u8 = 0x00;

    // Register Addresses
    pub const REG_CONTROL: u8 = 0x00;
    pub const REG_TIMING: u8 = 0x01;
    pub const REG_ID: u8 = 0x0A;
    pub const REG_CHAN_0: u8 = 0x0C; // Broadband (visible + IR), 16-bit
    pub const REG_CHAN_1: u8 = 0x0E; // IR only, 16-bit

    // Timing register bit fields
    pub const GAIN_1X: u8 = 0x00;
    pub const GAIN_16X: u8 = 0x10;
    pub const INTEG_13_7MS: u8 = 0x00;
    pub const INTEG_101MS: u8 = 0x01;
    pub const INTEG_402MS: u8 = 0x02;

    /// Low nibble of the ID register for any part in this family.
    pub const ID_FAMILY: u8 = 0x0A;
}

// --- MCP4725 DAC ---
pub mod mcp4725 {
    /// Fixed portion of the 7-bit address; the low 3 bits come from the
    /// address pins.
    pub const BASE_ADDRESS: u16 = 0x60;

    // Command byte prefixes
    pub const CMD_FAST_WRITE: u8 = 0x00;
    #[allow(dead_code)]
    pub const CMD_DAC_WRITE: u8 = 0x40;
    pub const CMD_EEPROM_WRITE: u8 = 0x60;

    /// 12-bit converter, values above this are rejected.
    pub const MAX_VALUE: u16 = 0x0FFF;
}

// --- MCP3008 ADC ---
pub mod mcp3008 {
    /// Start bit, clocked out alone in the first frame byte.
    pub const START_BIT: u8 = 0x01;
    /// Single-ended flag in the configuration byte (cleared = differential).
    pub const SINGLE_ENDED_BIT: u8 = 0x80;

    pub const CHANNEL_COUNT: u8 = 8;
    /// Conversion results are 10 bits wide.
    pub const RESULT_MASK: u16 = 0x03FF;
}
