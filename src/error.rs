//! Error types for the NT7538 driver.

use core::fmt;

use display_interface::DisplayError;

/// Errors that can occur during NT7538 display operations.
///
/// Bus errors from the underlying SPI device and data/command pin are
/// folded into [`DisplayError`] by the interface, so this enum is
/// non-generic.
#[derive(Debug)]
pub enum Nt7538Error {
    /// Display interface error (SPI bus or data/command pin).
    Display(DisplayError),
    /// Writing the reset pin failed.
    ResetPin,
    /// Writing the backlight pin failed.
    BacklightPin,
    /// Panel dimensions the controller cannot address.
    InvalidDimensions { width: u16, height: u16 },
    /// Contrast level above 63.
    InvalidContrast(u8),
    /// An image did not match the framebuffer length.
    BufferSizeMismatch { expected: usize, actual: usize },
    /// An operation was attempted before
    /// [`Nt7538::setup()`](crate::Nt7538::setup) was called.
    NotInitialized,
}

impl From<DisplayError> for Nt7538Error {
    fn from(e: DisplayError) -> Self {
        Nt7538Error::Display(e)
    }
}

impl fmt::Display for Nt7538Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Nt7538Error::Display(e) => write!(f, "Display interface error: {:?}", e),
            Nt7538Error::ResetPin => write!(f, "Reset pin error"),
            Nt7538Error::BacklightPin => write!(f, "Backlight pin error"),
            Nt7538Error::InvalidDimensions { width, height } => {
                write!(f, "Unsupported panel size {}x{}", width, height)
            }
            Nt7538Error::InvalidContrast(level) => {
                write!(f, "Contrast {} out of range (must be 0-63)", level)
            }
            Nt7538Error::BufferSizeMismatch { expected, actual } => {
                write!(f, "Buffer size mismatch: expected {}, got {}", expected, actual)
            }
            Nt7538Error::NotInitialized => write!(f, "Not initialized"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Nt7538Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Nt7538Error::Display(_e) => defmt::write!(f, "Display interface error"),
            Nt7538Error::ResetPin => defmt::write!(f, "Reset pin error"),
            Nt7538Error::BacklightPin => defmt::write!(f, "Backlight pin error"),
            Nt7538Error::InvalidDimensions { width, height } => {
                defmt::write!(f, "Unsupported panel size {}x{}", width, height)
            }
            Nt7538Error::InvalidContrast(level) => {
                defmt::write!(f, "Contrast {} out of range", level)
            }
            Nt7538Error::BufferSizeMismatch { expected, actual } => {
                defmt::write!(f, "Buffer size mismatch: expected {}, got {}", expected, actual)
            }
            Nt7538Error::NotInitialized => defmt::write!(f, "Not initialized"),
        }
    }
}
