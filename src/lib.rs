//! Driver for the NT7538 monochrome LCD controller (128×64) over 4-wire SPI.
//!
//! This crate provides [`Nt7538`], a buffered driver that keeps a packed
//! 1-bit framebuffer in memory and streams it to the controller page by
//! page, and [`SpiInterface`], the command/data transport over an
//! `embedded-hal` [`SpiDevice`](embedded_hal::spi::SpiDevice) plus an A0
//! (data/command) pin. The framebuffer is an `embedded-graphics`
//! `DrawTarget`.
//!
//! # Quick Start
//!
//! ```ignore
//! use nt7538_display_rs::{Config, Nt7538, SpiInterface, SPI_SETTINGS};
//!
//! // Build the SPI device with SPI_SETTINGS (MODE_3, 200 kHz, MSB first).
//! let interface = SpiInterface::new(spi_device, dc_pin);
//! let mut lcd = Nt7538::new(interface, Config::default())?
//!     .with_reset(reset_pin)
//!     .with_backlight(backlight_pin);
//!
//! lcd.setup(&mut delay)?;
//! lcd.set_backlight(true)?;
//! lcd.update(|fb| {
//!     Text::new("Hello", Point::new(0, 10), style).draw(fb).ok();
//! })?;
//! ```
//!
//! # Crate Features
//!
//! - **`defmt`**: structured logging via [`defmt`].
//! - **`task`**: [`display_update_task`], a periodic Embassy update loop.

#![cfg_attr(not(test), no_std)]

pub mod command;
pub mod config;
#[cfg(feature = "task")]
pub mod display_task;
pub mod driver;
pub mod error;
pub mod framebuffer;
pub mod interface;

// ── Re-exports for convenience ───────────────────────────────────────────

pub use command::Command;
pub use config::{Config, SpiSettings, SPI_SETTINGS};
#[cfg(feature = "task")]
pub use display_task::display_update_task;
pub use driver::Nt7538;
pub use error::Nt7538Error;
pub use framebuffer::{FrameBuffer, PixelSink};
pub use interface::{CommandInterface, DataCommand, NoPin, SpiInterface};
