//! Waveform tables for 4-level gray on UC8179 panels
//!
//! Each table is 7 phases of 6 bytes: a level-select byte followed by four
//! frame counts and a repeat count.

pub const GS4_LUT_VCOM: [u8; 42] = [
    0x00, 0x0A, 0x00, 0x00, 0x00, 0x01, // GND 10
    0x60, 0x14, 0x14, 0x00, 0x00, 0x01, // VDH 20, VDL 20
    0x00, 0x14, 0x00, 0x00, 0x00, 0x01, // GND 20
    0x00, 0x13, 0x0A, 0x01, 0x00, 0x01, // GND 19, GND 10
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
];

pub const GS4_LUT_W2W: [u8; 42] = [
    0x40, 0x0A, 0x00, 0x00, 0x00, 0x01, // VDH 10
    0x90, 0x14, 0x14, 0x00, 0x00, 0x01, // VDL 20, VDH 20
    0x10, 0x14, 0x0A, 0x00, 0x00, 0x01, // GND 20, VDH 10
    0xA0, 0x13, 0x01, 0x00, 0x00, 0x01, // VDL 19, VDL 1
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
];

pub const GS4_LUT_K2W: [u8; 42] = [
    0x40, 0x0A, 0x00, 0x00, 0x00, 0x01, //
    0x90, 0x14, 0x14, 0x00, 0x00, 0x01, //
    0x00, 0x14, 0x0A, 0x00, 0x00, 0x01, //
    0x99, 0x0C, 0x01, 0x03, 0x04, 0x01, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
];

pub const GS4_LUT_W2K: [u8; 42] = [
    0x40, 0x0A, 0x00, 0x00, 0x00, 0x01, //
    0x90, 0x14, 0x14, 0x00, 0x00, 0x01, //
    0x00, 0x14, 0x0A, 0x00, 0x00, 0x01, //
    0x99, 0x0B, 0x04, 0x04, 0x01, 0x01, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
];

pub const GS4_LUT_K2K: [u8; 42] = [
    0x80, 0x0A, 0x00, 0x00, 0x00, 0x01, //
    0x90, 0x14, 0x14, 0x00, 0x00, 0x01, //
    0x20, 0x14, 0x0A, 0x00, 0x00, 0x01, //
    0x50, 0x13, 0x01, 0x00, 0x00, 0x01, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
];
