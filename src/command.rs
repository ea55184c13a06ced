//! NT7538 instruction set.
//!
//! Every instruction is one command byte, optionally followed by one
//! parameter byte that is also sent with the data/command line low. Field
//! values are masked to the width the controller decodes, so an oversized
//! argument can never spill into the opcode bits.

use heapless::Vec;

/// LCD bias ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bias {
    /// 1/9 bias ("bias 0").
    OneNinth,
    /// 1/7 bias ("bias 1").
    OneSeventh,
}

/// Internal oscillator frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Oscillator {
    /// 31.4 kHz.
    Khz31,
    /// 26.3 kHz.
    Khz26,
}

/// A single NT7538 instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Display on (`true`) or off.
    DisplayOn(bool),
    /// ADC select: `true` maps SEG131→SEG0, `false` SEG0→SEG131.
    SegmentReverse(bool),
    /// `true` lights pixels whose bit is 0.
    Invert(bool),
    /// Force every pixel on regardless of RAM contents.
    AllPixelsOn(bool),
    /// LCD bias ratio.
    Bias(Bias),
    /// SHL select: `true` scans COM63→COM0, `false` COM0→COM63.
    ComReverse(bool),
    /// Power control bits (0–7): converter, regulator, follower.
    PowerControl(u8),
    /// Regulator resistor ratio (0–7).
    RegulatorResistor(u8),
    /// Electronic volume (0–63).
    Contrast(u8),
    /// RAM row shown on the top physical line (0–63).
    StartLine(u8),
    /// Page address (0–8).
    PageAddress(u8),
    /// Column address (0–131), sent as two nibbles.
    ColumnAddress(u8),
    /// Static indicator on with the given blink mode, or off.
    StaticIndicator(Option<u8>),
    /// Oscillator frequency select.
    Oscillator(Oscillator),
    /// Stop column auto-increment on reads.
    ReadModifyWrite,
    /// Leave read-modify-write mode.
    ReadModifyWriteEnd,
    /// Software reset.
    Reset,
}

impl Command {
    /// Wire bytes for this instruction, in transmission order.
    pub fn encode(self) -> Vec<u8, 2> {
        let mut bytes = Vec::new();
        let (first, second) = match self {
            Command::DisplayOn(on) => (if on { 0xAF } else { 0xAE }, None),
            Command::SegmentReverse(reverse) => (if reverse { 0xA1 } else { 0xA0 }, None),
            Command::Invert(invert) => (if invert { 0xA7 } else { 0xA6 }, None),
            Command::AllPixelsOn(on) => (if on { 0xA5 } else { 0xA4 }, None),
            Command::Bias(Bias::OneNinth) => (0xA2, None),
            Command::Bias(Bias::OneSeventh) => (0xA3, None),
            Command::ComReverse(reverse) => (if reverse { 0xC8 } else { 0xC0 }, None),
            Command::PowerControl(bits) => (0x28 | (bits & 0x07), None),
            Command::RegulatorResistor(ratio) => (0x20 | (ratio & 0x07), None),
            Command::Contrast(level) => (0x81, Some(level & 0x3F)),
            Command::StartLine(line) => (0x40 | (line & 0x3F), None),
            Command::PageAddress(page) => (0xB0 | (page & 0x0F), None),
            Command::ColumnAddress(column) => (0x10 | (column >> 4), Some(column & 0x0F)),
            Command::StaticIndicator(Some(mode)) => (0xAD, Some(mode & 0x03)),
            Command::StaticIndicator(None) => (0xAC, Some(0x00)),
            Command::Oscillator(Oscillator::Khz31) => (0xE4, None),
            Command::Oscillator(Oscillator::Khz26) => (0xE5, None),
            Command::ReadModifyWrite => (0xE0, None),
            Command::ReadModifyWriteEnd => (0xEE, None),
            Command::Reset => (0xE2, None),
        };

        // Capacity is 2 and at most 2 bytes are pushed.
        let _ = bytes.push(first);
        if let Some(second) = second {
            let _ = bytes.push(second);
        }
        bytes
    }
}

/// Power control value enabling converter, regulator and follower.
pub const POWER_ALL_ON: u8 = 0x07;

/// Highest regulator resistor ratio.
pub const REGULATOR_RATIO_MAX: u8 = 0x07;

/// Register configuration issued on every setup, in datasheet order.
///
/// The ADC reverse/normal pair is part of the sequence validated on
/// hardware and must stay as-is.
pub fn init_sequence(contrast: u8) -> [Command; 14] {
    [
        Command::DisplayOn(false),
        Command::SegmentReverse(true),
        Command::Invert(false),
        Command::AllPixelsOn(false),
        Command::Bias(Bias::OneNinth),
        Command::ComReverse(false),
        Command::SegmentReverse(false),
        Command::ComReverse(true),
        Command::Bias(Bias::OneNinth),
        Command::PowerControl(POWER_ALL_ON),
        Command::RegulatorResistor(REGULATOR_RATIO_MAX),
        Command::Contrast(contrast),
        Command::StartLine(0),
        Command::DisplayOn(true),
    ]
}
