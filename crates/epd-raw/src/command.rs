//! Controller command bytes used by the built-in panel tables

/// SSD1681-style controllers (Waveshare 1.54" mono)
pub mod ssd1681 {
    // Initialization and reset
    pub const DRIVER_OUTPUT_CONTROL: u8 = 0x01; // Gate count and scan direction
    pub const SOFT_RESET: u8 = 0x12; // Soft reset
    pub const BORDER_WAVEFORM: u8 = 0x3C; // Border waveform control
    pub const TEMP_SENSOR_CONTROL: u8 = 0x18; // Temperature sensor selection

    // RAM and buffer management
    pub const DATA_ENTRY_MODE: u8 = 0x11; // Data entry mode
    pub const SET_RAM_X_RANGE: u8 = 0x44; // RAM X start/end, in bytes
    pub const SET_RAM_Y_RANGE: u8 = 0x45; // RAM Y start/end, in rows
    pub const SET_RAM_X_COUNTER: u8 = 0x4E; // RAM X address counter
    pub const SET_RAM_Y_COUNTER: u8 = 0x4F; // RAM Y address counter
    pub const WRITE_RAM_BW: u8 = 0x24; // Write BW RAM

    // Display update and refresh
    pub const DISPLAY_UPDATE_CTRL2: u8 = 0x22; // Display update sequence
    pub const MASTER_ACTIVATION: u8 = 0x20; // Run the update sequence
    pub const CTRL2_LOAD_LUT: u8 = 0xB1; // Clock on, load temperature and OTP LUT
    pub const CTRL2_FULL_UPDATE: u8 = 0xC7; // Power on, display, power off

    // Power management
    pub const DEEP_SLEEP: u8 = 0x10; // Deep sleep
    pub const DEEP_SLEEP_MODE_1: u8 = 0x01; // RAM retained
}

/// UC8176 / UC8179-style controllers (Waveshare 4.2" 3-color, GDEY075T7)
pub mod uc81xx {
    // Power and panel setup
    pub const PANEL_SETTING: u8 = 0x00; // Panel setting
    pub const POWER_SETTING: u8 = 0x01; // Power setting
    pub const POWER_OFF: u8 = 0x02; // Power off
    pub const POWER_ON: u8 = 0x04; // Power on
    pub const BOOSTER_SOFT_START: u8 = 0x06; // Booster soft start
    pub const DEEP_SLEEP: u8 = 0x07; // Deep sleep
    pub const DEEP_SLEEP_CHECK: u8 = 0xA5; // Deep sleep check code

    // Data transmission
    pub const DATA_START_1: u8 = 0x10; // Old / BW plane
    pub const DISPLAY_REFRESH: u8 = 0x12; // Display refresh
    pub const DATA_START_2: u8 = 0x13; // New / red plane
    pub const DUAL_SPI: u8 = 0x15; // Dual SPI mode

    // Waveform tables
    pub const LUT_VCOM: u8 = 0x20; // VCOM LUT
    pub const LUT_W2W: u8 = 0x21; // White to white LUT
    pub const LUT_K2W: u8 = 0x22; // Black to white LUT
    pub const LUT_W2K: u8 = 0x23; // White to black LUT
    pub const LUT_K2K: u8 = 0x24; // Black to black LUT

    // Timing and geometry
    pub const VCOM_DATA_INTERVAL: u8 = 0x50; // VCOM and data interval
    pub const TCON_SETTING: u8 = 0x60; // Gate/source non-overlap
    pub const RESOLUTION_SETTING: u8 = 0x61; // Width and height, big endian
    pub const VCOM_DC_SETTING: u8 = 0x82; // VCOM DC level
    pub const PARTIAL_OUT: u8 = 0x92; // Leave partial mode
}
