//! Built-in panel families
//!
//! | id | name | size | levels | RAW layout |
//! |----|------|------|--------|------------|
//! | [`PanelId::Ws154`] | `ws154` | 200x200 | black, white | 1bpp, one plane |
//! | [`PanelId::Ws420Tricolor`] | `ws420_3c` | 400x300 | black, white, red (palette 0/1/2) | BW plane + red plane |
//! | [`PanelId::Gdey075t7`] | `gdey075t7` | 800x480 | 4 gray (0, 5, 10, 15) | MSB plane + LSB plane |
//!
//! The registry is plain static data; nothing is registered at runtime.

use crate::command::{ssd1681, uc81xx};
use crate::descriptor::{
    BitOrder, BusyPolarity, CommandSet, DisplayDescriptor, Packing, ScanOrder, Step, Timing, Wait,
};
use crate::lut;
use crate::pixel::{Level, PixelKind, PixelValue};

/// Built-in panel families
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PanelId {
    /// Waveshare 1.54" black/white (SSD1681)
    Ws154,
    /// Waveshare 4.2" black/white/red (UC8176)
    Ws420Tricolor,
    /// Good Display GDEY075T7 7.5" on a DESPI-C02 adapter, 4 gray levels (UC8179)
    Gdey075t7,
}

impl PanelId {
    /// Every built-in panel
    pub const ALL: [PanelId; 3] = [PanelId::Ws154, PanelId::Ws420Tricolor, PanelId::Gdey075t7];

    /// Registry name
    pub fn name(self) -> &'static str {
        descriptor(self).name
    }
}

/// Descriptor of a built-in panel
pub fn descriptor(id: PanelId) -> &'static DisplayDescriptor {
    match id {
        PanelId::Ws154 => &WS154,
        PanelId::Ws420Tricolor => &WS420_TRICOLOR,
        PanelId::Gdey075t7 => &GDEY075T7,
    }
}

/// Look a built-in panel up by its registry name
pub fn by_name(name: &str) -> Option<&'static DisplayDescriptor> {
    REGISTRY.iter().copied().find(|d| d.name == name)
}

/// All built-in descriptors
pub static REGISTRY: [&DisplayDescriptor; 3] = [&WS154, &WS420_TRICOLOR, &GDEY075T7];

// Waveshare 1.54" mono

const MONO: [Level; 2] = [Level::new(0, 0), Level::new(15, 1)];

/// Waveshare 1.54" black/white
pub static WS154: DisplayDescriptor = DisplayDescriptor {
    name: "ws154",
    width: 200,
    height: 200,
    kind: PixelKind::Gray,
    levels: &MONO,
    bits_per_pixel: 1,
    packing: Packing::Chunky,
    bit_order: BitOrder::MsbFirst,
    scan: ScanOrder::RowMajor,
    pad: PixelValue::WHITE,
    default_level: PixelValue::WHITE,
    busy: BusyPolarity::ActiveHigh,
    timing: Timing {
        reset_pulse_ms: 5,
        reset_settle_ms: 21,
        ..Timing::DEFAULT
    },
    commands: CommandSet {
        init: &[
            Step::WaitReady(Wait::Busy),
            Step::cmd(ssd1681::SOFT_RESET),
            Step::WaitReady(Wait::Busy),
            // 200 gates
            Step::data(ssd1681::DRIVER_OUTPUT_CONTROL, &[0xC7, 0x00, 0x01]),
            // X increment, Y decrement
            Step::data(ssd1681::DATA_ENTRY_MODE, &[0x01]),
            Step::data(ssd1681::SET_RAM_X_RANGE, &[0x00, 0x18]),
            Step::data(ssd1681::SET_RAM_Y_RANGE, &[0xC7, 0x00, 0x00, 0x00]),
            Step::data(ssd1681::BORDER_WAVEFORM, &[0x01]),
            // internal sensor
            Step::data(ssd1681::TEMP_SENSOR_CONTROL, &[0x80]),
            Step::data(ssd1681::DISPLAY_UPDATE_CTRL2, &[ssd1681::CTRL2_LOAD_LUT]),
            Step::cmd(ssd1681::MASTER_ACTIVATION),
            Step::WaitReady(Wait::Busy),
        ],
        pre_write: &[
            Step::data(ssd1681::SET_RAM_X_COUNTER, &[0x00]),
            Step::data(ssd1681::SET_RAM_Y_COUNTER, &[0xC7, 0x00]),
        ],
        data_commands: &[ssd1681::WRITE_RAM_BW],
        refresh: &[
            Step::data(ssd1681::DISPLAY_UPDATE_CTRL2, &[ssd1681::CTRL2_FULL_UPDATE]),
            Step::cmd(ssd1681::MASTER_ACTIVATION),
            Step::WaitReady(Wait::Refresh),
        ],
        sleep: &[Step::data(
            ssd1681::DEEP_SLEEP,
            &[ssd1681::DEEP_SLEEP_MODE_1],
        )],
    },
};

// Waveshare 4.2" black/white/red

/// Palette index of black on [`WS420_TRICOLOR`]
pub const TRICOLOR_BLACK: PixelValue = PixelValue::BLACK;
/// Palette index of white on [`WS420_TRICOLOR`]
pub const TRICOLOR_WHITE: PixelValue = PixelValue::saturating(1);
/// Palette index of red on [`WS420_TRICOLOR`]
pub const TRICOLOR_RED: PixelValue = PixelValue::saturating(2);

// code MSB: white plane bit, code LSB: "not red" plane bit
const TRICOLOR: [Level; 3] = [Level::new(0, 0b01), Level::new(1, 0b11), Level::new(2, 0b00)];

/// Waveshare 4.2" black/white/red
pub static WS420_TRICOLOR: DisplayDescriptor = DisplayDescriptor {
    name: "ws420_3c",
    width: 400,
    height: 300,
    kind: PixelKind::Palette,
    levels: &TRICOLOR,
    bits_per_pixel: 2,
    packing: Packing::Planar,
    bit_order: BitOrder::MsbFirst,
    scan: ScanOrder::RowMajor,
    pad: TRICOLOR_WHITE,
    default_level: TRICOLOR_WHITE,
    busy: BusyPolarity::ActiveLow,
    timing: Timing {
        reset_pulse_ms: 200,
        reset_settle_ms: 200,
        refresh_timeout_ms: 30_000,
        ..Timing::DEFAULT
    },
    commands: CommandSet {
        init: &[
            Step::data(uc81xx::BOOSTER_SOFT_START, &[0x17, 0x17, 0x17]),
            // KW-R mode, scan up, shift right, booster on
            Step::data(uc81xx::PANEL_SETTING, &[0x0F]),
            Step::data(uc81xx::RESOLUTION_SETTING, &[0x01, 0x90, 0x01, 0x2C]),
            Step::data(uc81xx::VCOM_DATA_INTERVAL, &[0xF7]),
            Step::cmd(uc81xx::POWER_ON),
            Step::WaitReady(Wait::Busy),
        ],
        pre_write: &[],
        data_commands: &[uc81xx::DATA_START_1, uc81xx::DATA_START_2],
        refresh: &[
            Step::cmd(uc81xx::DISPLAY_REFRESH),
            Step::WaitReady(Wait::Refresh),
        ],
        sleep: &[
            Step::cmd(uc81xx::POWER_OFF),
            Step::WaitReady(Wait::Busy),
            Step::data(uc81xx::DEEP_SLEEP, &[uc81xx::DEEP_SLEEP_CHECK]),
        ],
    },
};

// GDEY075T7 4-gray

const GRAY4: [Level; 4] = [
    Level::new(0, 0b00),
    Level::new(5, 0b01),
    Level::new(10, 0b10),
    Level::new(15, 0b11),
];

/// Good Display GDEY075T7, 4 gray levels
pub static GDEY075T7: DisplayDescriptor = DisplayDescriptor {
    name: "gdey075t7",
    width: 800,
    height: 480,
    kind: PixelKind::Gray,
    levels: &GRAY4,
    bits_per_pixel: 2,
    packing: Packing::Planar,
    bit_order: BitOrder::MsbFirst,
    scan: ScanOrder::RowMajor,
    pad: PixelValue::WHITE,
    default_level: PixelValue::WHITE,
    busy: BusyPolarity::ActiveLow,
    timing: Timing::DEFAULT,
    commands: CommandSet {
        init: &[
            Step::data(uc81xx::POWER_SETTING, &[0x07, 0x07, 0x3F, 0x3F, 0x00]),
            Step::data(uc81xx::BOOSTER_SOFT_START, &[0x17, 0x17, 0x28, 0x17]),
            // LUT from register
            Step::data(uc81xx::PANEL_SETTING, &[0x3F]),
            Step::data(uc81xx::RESOLUTION_SETTING, &[0x03, 0x20, 0x01, 0xE0]),
            Step::data(uc81xx::DUAL_SPI, &[0x00]),
            Step::data(uc81xx::VCOM_DC_SETTING, &[0x30]),
            Step::data(uc81xx::VCOM_DATA_INTERVAL, &[0x29, 0x07]),
            Step::data(uc81xx::TCON_SETTING, &[0x22]),
            Step::cmd(uc81xx::PARTIAL_OUT),
            Step::data(uc81xx::LUT_VCOM, &lut::GS4_LUT_VCOM),
            Step::data(uc81xx::LUT_W2W, &lut::GS4_LUT_W2W),
            Step::data(uc81xx::LUT_K2W, &lut::GS4_LUT_K2W),
            Step::data(uc81xx::LUT_W2K, &lut::GS4_LUT_W2K),
            Step::data(uc81xx::LUT_K2K, &lut::GS4_LUT_K2K),
        ],
        // the refresh sequence powers the panel off
        pre_write: &[Step::cmd(uc81xx::POWER_ON), Step::WaitReady(Wait::Busy)],
        data_commands: &[uc81xx::DATA_START_1, uc81xx::DATA_START_2],
        refresh: &[
            Step::cmd(uc81xx::DISPLAY_REFRESH),
            Step::DelayMs(2),
            Step::WaitReady(Wait::Refresh),
            Step::data(uc81xx::VCOM_DATA_INTERVAL, &[0xF7]),
            Step::cmd(uc81xx::POWER_OFF),
            Step::WaitReady(Wait::Busy),
        ],
        // settle after the power-off that ends every refresh
        sleep: &[
            Step::DelayMs(100),
            Step::data(uc81xx::DEEP_SLEEP, &[uc81xx::DEEP_SLEEP_CHECK]),
        ],
    },
};
