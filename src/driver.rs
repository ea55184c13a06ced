//! NT7538 driver: lifecycle, flush, and direct device writes.
//!
//! [`Nt7538`] owns the byte interface, the optional reset and backlight
//! pins, and the framebuffer. Drawing only touches memory; the panel is
//! rewritten in full by [`Nt7538::flush()`].

use core::fmt::Write;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use heapless::String;

use crate::command::{init_sequence, Command};
use crate::config::Config;
use crate::error::Nt7538Error;
use crate::framebuffer::{FrameBuffer, PixelSink};
use crate::interface::{CommandInterface, NoPin};

/// Byte written by the power-on self-test, alternating with its complement.
pub const SELF_TEST_PATTERN: u8 = 0x0F;

/// Columns per checkerboard square.
const CHESS_SQUARE: usize = 4;

/// Capacity of the configuration dump.
pub const SUMMARY_CAPACITY: usize = 256;

/// Driver for an NT7538 panel.
///
/// # Lifecycle
///
/// 1. [`Nt7538::new()`] validates the configuration; no bus traffic.
/// 2. [`Nt7538::setup()`] resets and configures the controller.
/// 3. Draw into [`Nt7538::buffer_mut()`] (it is an `embedded-graphics`
///    `DrawTarget`).
/// 4. [`Nt7538::flush()`], or [`Nt7538::update()`] to draw and flush in
///    one call.
///
/// # Example
///
/// ```no_run
/// use nt7538_display_rs::{Config, Nt7538, PixelSink, SpiInterface};
///
/// # fn example(
/// #     spi: impl embedded_hal::spi::SpiDevice,
/// #     dc: impl embedded_hal::digital::OutputPin,
/// #     rst: impl embedded_hal::digital::OutputPin,
/// #     mut delay: impl embedded_hal::delay::DelayNs,
/// # ) {
/// let interface = SpiInterface::new(spi, dc);
/// let mut lcd = Nt7538::new(interface, Config::default())
///     .unwrap()
///     .with_reset(rst);
/// lcd.setup(&mut delay).unwrap();
/// lcd.update(|fb| fb.set_pixel(0, 0, true)).unwrap();
/// # }
/// ```
pub struct Nt7538<DI, RST = NoPin, BL = NoPin> {
    interface: DI,
    reset: Option<RST>,
    backlight: Option<BL>,
    config: Config,
    buffer: FrameBuffer,
    /// Set to `true` after a successful `setup()` call.
    initialized: bool,
}

impl<DI> Nt7538<DI>
where
    DI: CommandInterface,
{
    /// Construct a driver without reset or backlight pins.
    ///
    /// Allocates a zeroed framebuffer of `config.buffer_len()` bytes.
    ///
    /// # Errors
    ///
    /// Whatever [`Config::validate()`] rejects.
    pub fn new(interface: DI, config: Config) -> Result<Self, Nt7538Error> {
        config.validate()?;
        Ok(Self {
            interface,
            reset: None,
            backlight: None,
            buffer: FrameBuffer::new(config.width, config.height),
            config,
            initialized: false,
        })
    }
}

impl<DI, RST, BL> Nt7538<DI, RST, BL>
where
    DI: CommandInterface,
    RST: OutputPin,
    BL: OutputPin,
{
    /// Attach an active-low hardware reset line.
    pub fn with_reset<R: OutputPin>(self, reset: R) -> Nt7538<DI, R, BL> {
        Nt7538 {
            interface: self.interface,
            reset: Some(reset),
            backlight: self.backlight,
            config: self.config,
            buffer: self.buffer,
            initialized: self.initialized,
        }
    }

    /// Attach a backlight enable line.
    pub fn with_backlight<B: OutputPin>(self, backlight: B) -> Nt7538<DI, RST, B> {
        Nt7538 {
            interface: self.interface,
            reset: self.reset,
            backlight: Some(backlight),
            config: self.config,
            buffer: self.buffer,
            initialized: self.initialized,
        }
    }

    /// Bring the panel from power-on to a displayable state.
    ///
    /// Idles the select lines, switches the backlight off, pulses reset
    /// (when a reset pin is attached), sends the init sequence followed by
    /// a checkerboard self-test, and clears the framebuffer. Calling it
    /// again replays the same byte stream.
    ///
    /// # Errors
    ///
    /// [`Nt7538Error::Display`] on a bus failure, or a pin error. The
    /// driver stays uninitialized until a later call succeeds.
    pub fn setup<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Nt7538Error> {
        #[cfg(feature = "defmt")]
        defmt::info!("Setting up NT7538...");

        self.initialized = false;
        self.interface.init()?;
        self.set_backlight(false)?;
        self.hardware_reset(delay)?;
        delay.delay_ms(10);

        self.dump_config();
        self.display_init()?;

        self.buffer.clear();
        self.initialized = true;
        Ok(())
    }

    /// Refresh the framebuffer through `refresh`, then flush it.
    ///
    /// # Errors
    ///
    /// Same as [`flush()`](Self::flush).
    pub fn update<F>(&mut self, refresh: F) -> Result<(), Nt7538Error>
    where
        F: FnOnce(&mut FrameBuffer),
    {
        refresh(&mut self.buffer);
        self.flush()
    }

    /// Write the entire framebuffer to the panel, page by page.
    ///
    /// Each page is addressed at column 0 and followed by `width` data
    /// bytes, one per column, left to right.
    ///
    /// # Errors
    ///
    /// [`Nt7538Error::NotInitialized`] before [`setup()`](Self::setup), or
    /// [`Nt7538Error::Display`] on a bus failure.
    pub fn flush(&mut self) -> Result<(), Nt7538Error> {
        if !self.initialized {
            return Err(Nt7538Error::NotInitialized);
        }
        let width = self.config.width as usize;
        for page in 0..self.config.pages() {
            self.set_address(page, 0)?;
            let start = page as usize * width;
            for i in start..start + width {
                let byte = self.buffer.as_bytes()[i];
                self.interface.send_data(byte)?;
            }
        }
        Ok(())
    }

    /// Mutable access to the framebuffer for drawing.
    pub fn buffer_mut(&mut self) -> &mut FrameBuffer {
        &mut self.buffer
    }

    /// The framebuffer.
    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    /// Set or clear one pixel in the framebuffer. No bus traffic.
    pub fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        self.buffer.set_pixel(x, y, on);
    }

    /// Framebuffer length in bytes: `width * height / 8`.
    pub fn buffer_len(&self) -> usize {
        self.buffer.buffer_len()
    }

    /// Panel size as `(width, height)`.
    pub fn dimensions(&self) -> (u16, u16) {
        (self.config.width, self.config.height)
    }

    /// The configuration the driver was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Check whether [`setup()`](Self::setup) has completed.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Switch the backlight. No-op without a backlight pin.
    pub fn set_backlight(&mut self, on: bool) -> Result<(), Nt7538Error> {
        let Some(pin) = self.backlight.as_mut() else {
            return Ok(());
        };
        let result = if on { pin.set_high() } else { pin.set_low() };
        result.map_err(|_| Nt7538Error::BacklightPin)
    }

    /// Turn the panel output on or off. RAM contents are kept.
    pub fn set_display_on(&mut self, on: bool) -> Result<(), Nt7538Error> {
        self.send_command(Command::DisplayOn(on))
    }

    /// Swap lit and unlit pixels.
    pub fn set_inverted(&mut self, inverted: bool) -> Result<(), Nt7538Error> {
        self.send_command(Command::Invert(inverted))
    }

    /// Force every pixel on (panel test mode).
    pub fn set_all_pixels_on(&mut self, on: bool) -> Result<(), Nt7538Error> {
        self.send_command(Command::AllPixelsOn(on))
    }

    /// Scroll vertically by mapping RAM row `line` (0–63) to the top.
    pub fn set_start_line(&mut self, line: u8) -> Result<(), Nt7538Error> {
        self.send_command(Command::StartLine(line))
    }

    /// Static indicator on with blink `mode` (0–3), or off with `None`.
    pub fn set_static_indicator(&mut self, mode: Option<u8>) -> Result<(), Nt7538Error> {
        self.send_command(Command::StaticIndicator(mode))
    }

    /// Send the software reset instruction.
    pub fn software_reset(&mut self) -> Result<(), Nt7538Error> {
        self.send_command(Command::Reset)
    }

    /// Write a checkerboard of `value` and `!value` straight to the panel,
    /// alternating every 4 columns. The framebuffer is not touched.
    pub fn display_chess(&mut self, value: u8) -> Result<(), Nt7538Error> {
        for page in 0..self.config.pages() {
            self.set_address(page, 0)?;
            for column in 0..self.config.width as usize {
                let byte = if (column / CHESS_SQUARE) % 2 == 0 {
                    value
                } else {
                    !value
                };
                self.interface.send_data(byte)?;
            }
        }
        Ok(())
    }

    /// Write a packed image straight to the panel with start line 0.
    ///
    /// `image` uses the framebuffer layout and must be exactly
    /// [`buffer_len()`](Self::buffer_len) bytes. The framebuffer is not
    /// touched.
    pub fn display_picture(&mut self, image: &[u8]) -> Result<(), Nt7538Error> {
        let expected = self.buffer_len();
        if image.len() != expected {
            return Err(Nt7538Error::BufferSizeMismatch {
                expected,
                actual: image.len(),
            });
        }
        self.set_start_line(0)?;
        let width = self.config.width as usize;
        for (page, row) in image.chunks(width).enumerate() {
            self.set_address(page as u8, 0)?;
            for &byte in row {
                self.interface.send_data(byte)?;
            }
        }
        Ok(())
    }

    /// Human-readable configuration dump.
    pub fn config_summary(&self) -> String<SUMMARY_CAPACITY> {
        let mut s = String::new();
        // Output is well under capacity; a failed write only truncates.
        let _ = write!(
            s,
            "NT7538\n  Interface: {}\n  Reset Pin: {}\n  Backlight Pin: {}\n  Buffer Size: {}\n  Height: {}\n  Width: {}\n  Contrast: 0x{:02X}",
            self.interface.description(),
            pin_state(self.reset.is_some()),
            pin_state(self.backlight.is_some()),
            self.buffer_len(),
            self.config.height,
            self.config.width,
            self.config.contrast,
        );
        s
    }

    /// Log the configuration dump.
    pub fn dump_config(&self) {
        #[cfg(feature = "defmt")]
        {
            let summary = self.config_summary();
            for line in summary.lines() {
                defmt::info!("{=str}", line);
            }
        }
    }

    fn hardware_reset<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Nt7538Error> {
        let Some(pin) = self.reset.as_mut() else {
            return Ok(());
        };
        pin.set_high().map_err(|_| Nt7538Error::ResetPin)?;
        delay.delay_ms(1);
        pin.set_low().map_err(|_| Nt7538Error::ResetPin)?;
        delay.delay_ms(10);
        pin.set_high().map_err(|_| Nt7538Error::ResetPin)
    }

    fn display_init(&mut self) -> Result<(), Nt7538Error> {
        #[cfg(feature = "defmt")]
        defmt::debug!("Initializing display...");

        for command in init_sequence(self.config.contrast) {
            self.send_command(command)?;
        }
        self.display_chess(SELF_TEST_PATTERN)
    }

    fn set_address(&mut self, page: u8, column: u8) -> Result<(), Nt7538Error> {
        self.send_command(Command::PageAddress(page))?;
        self.send_command(Command::ColumnAddress(column))
    }

    /// Send any instruction, e.g. [`Command::Oscillator`].
    pub fn send_command(&mut self, command: Command) -> Result<(), Nt7538Error> {
        for byte in command.encode() {
            self.interface.send_command(byte)?;
        }
        Ok(())
    }
}

fn pin_state(present: bool) -> &'static str {
    if present {
        "configured"
    } else {
        "none"
    }
}
