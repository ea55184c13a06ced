//! Panel configuration and bus parameters.

use embedded_hal::spi::{Mode, MODE_3};

use crate::error::Nt7538Error;

/// Number of columns the NT7538 display RAM holds.
pub const MAX_COLUMNS: u16 = 132;

/// Number of addressable pixel rows (8 pages of 8 rows).
pub const MAX_ROWS: u16 = 64;

/// Largest framebuffer the controller can back, in bytes.
pub const MAX_BUFFER_LEN: usize = MAX_COLUMNS as usize * MAX_ROWS as usize / 8;

/// Contrast level used when none is configured.
pub const DEFAULT_CONTRAST: u8 = 0x22;

/// Electrical parameters of the serial bus.
///
/// The driver never configures the bus itself; pass these to the HAL when
/// building the SPI peripheral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiSettings {
    /// Clock frequency in Hz.
    pub frequency_hz: u32,
    /// Clock polarity and phase.
    pub mode: Mode,
    /// Most significant bit is shifted out first.
    pub msb_first: bool,
}

/// NT7538 bus settings: MSB first, clock idling high, data sampled on the
/// trailing edge, 200 kHz.
pub const SPI_SETTINGS: SpiSettings = SpiSettings {
    frequency_hz: 200_000,
    mode: MODE_3,
    msb_first: true,
};

/// Configuration for the panel and the update task.
///
/// [`Config::default()`] describes the common 128×64 module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Panel width in pixels. Default: 128. Max: 132.
    pub width: u16,
    /// Panel height in pixels, a multiple of 8. Default: 64. Max: 64.
    pub height: u16,
    /// Electronic volume, 0–63. Default: `0x22`.
    pub contrast: u8,
    /// Refresh rate of the update task in Hz. Default: 1.
    pub update_frequency_hz: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 128,
            height: 64,
            contrast: DEFAULT_CONTRAST,
            update_frequency_hz: 1,
        }
    }
}

impl Config {
    /// Check the values against what the controller can address.
    ///
    /// # Errors
    ///
    /// [`Nt7538Error::InvalidDimensions`] if either dimension is zero or too
    /// large, or the height is not a whole number of pages;
    /// [`Nt7538Error::InvalidContrast`] if the contrast exceeds 63.
    pub fn validate(&self) -> Result<(), Nt7538Error> {
        if self.width == 0
            || self.width > MAX_COLUMNS
            || self.height == 0
            || self.height > MAX_ROWS
            || self.height % 8 != 0
        {
            return Err(Nt7538Error::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.contrast > 0x3F {
            return Err(Nt7538Error::InvalidContrast(self.contrast));
        }
        Ok(())
    }

    /// Framebuffer length in bytes: `width * height / 8`.
    pub fn buffer_len(&self) -> usize {
        self.width as usize * self.height as usize / 8
    }

    /// Number of 8-row pages.
    pub fn pages(&self) -> u8 {
        (self.height / 8) as u8
    }

    /// Convert the configured frequency to a timer period in milliseconds.
    ///
    /// A frequency of 0 is treated as 1 Hz.
    pub fn update_period_ms(&self) -> u64 {
        1000 / self.update_frequency_hz.max(1) as u64
    }
}
