//! Chess pattern example
//!
//! Standalone hardware demonstration for [`Nt7538`]. The update task runs
//! setup (which flashes the checkerboard self-test), then draws a square
//! inside a border. `main` starts advancing a shared frame counter after
//! two seconds, which makes the square bounce horizontally.
//!
//! # Wiring
//!
//! | Signal        | Pico 2 Pin | Notes                 |
//! |---------------|------------|-----------------------|
//! | SPI0 SCK      | GP18       | idles high (MODE_3)   |
//! | SPI0 TX (SDA) | GP19       |                       |
//! | CS            | GP17       | active low            |
//! | A0 (DC)       | GP20       | low = command         |
//! | RST           | GP21       | active low            |
//! | Backlight     | GP22       | high = on             |
//! | LCD VDD       | 3V3        |                       |
//! | LCD GND       | GND        |                       |

#![no_std]
#![no_main]

use core::cell::RefCell;

use defmt::*;
use embassy_embedded_hal::shared_bus::blocking::spi::SpiDevice;
use embassy_executor::Spawner;
use embassy_rp as hal;
use embassy_rp::block::ImageDef;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{self, Blocking, Spi};
use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, NoopRawMutex};
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Duration, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

use nt7538_display_rs::{display_update_task, Config, FrameBuffer, Nt7538, SpiInterface, SPI_SETTINGS};

/// Tell the Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = hal::block::ImageDef::secure_exe();

// ---------------------------------------------------------------------------
// Static storage
// ---------------------------------------------------------------------------

type SpiBus = Spi<'static, SPI0, Blocking>;

/// SPI0 bus, used only by the LCD in this example.
static SPI_BUS: StaticCell<BlockingMutex<NoopRawMutex, RefCell<SpiBus>>> = StaticCell::new();

/// Frame counter shared between `main` and the display task.
static FRAME: StaticCell<Mutex<CriticalSectionRawMutex, u32>> = StaticCell::new();

// ---------------------------------------------------------------------------
// Type aliases
// ---------------------------------------------------------------------------

type LcdInterface = SpiInterface<SpiDevice<'static, NoopRawMutex, SpiBus, Output<'static>>, Output<'static>>;

type Lcd = Nt7538<LcdInterface, Output<'static>, Output<'static>>;

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Thin wrapper that monomorphises the generic `display_update_task` so it
/// can be spawned as a concrete Embassy task.
#[embassy_executor::task]
async fn lcd_task(driver: Lcd, frame: &'static Mutex<CriticalSectionRawMutex, u32>) {
    display_update_task(driver, frame, draw_frame).await;
}

/// Square side length in pixels.
const SQUARE: u32 = 12;

/// Draw the border and a square bouncing horizontally with `frame`.
fn draw_frame(frame: &u32, fb: &mut FrameBuffer) {
    fb.clear();
    let size = fb.size();

    Rectangle::new(Point::zero(), size)
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(fb)
        .ok();

    let travel = size.width - SQUARE - 2;
    let step = frame % (2 * travel);
    let x = if step < travel { step } else { 2 * travel - step };
    let y = (size.height - SQUARE) / 2;

    Rectangle::new(Point::new(x as i32 + 1, y as i32), Size::new(SQUARE, SQUARE))
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(fb)
        .ok();
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("Chess pattern example starting");

    // --- SPI0 bus (GP18 = SCK, GP19 = TX), clock idles high, trailing edge ---
    let mut spi_config = spi::Config::default();
    spi_config.frequency = SPI_SETTINGS.frequency_hz;
    spi_config.polarity = spi::Polarity::IdleHigh;
    spi_config.phase = spi::Phase::CaptureOnSecondTransition;
    let spi = Spi::new_blocking_txonly(p.SPI0, p.PIN_18, p.PIN_19, spi_config);
    let bus = SPI_BUS.init(BlockingMutex::new(RefCell::new(spi)));

    let cs = Output::new(p.PIN_17, Level::High);
    let dc = Output::new(p.PIN_20, Level::High);
    let reset = Output::new(p.PIN_21, Level::High);
    let backlight = Output::new(p.PIN_22, Level::Low);

    let interface = SpiInterface::new(SpiDevice::new(bus, cs), dc);
    let config = Config {
        update_frequency_hz: 20,
        ..Config::default()
    };
    let lcd = unwrap!(Nt7538::new(interface, config))
        .with_reset(reset)
        .with_backlight(backlight);

    let frame: &'static Mutex<CriticalSectionRawMutex, u32> = FRAME.init(Mutex::new(0));
    unwrap!(spawner.spawn(lcd_task(lcd, frame)));

    // Hold the square still for a moment before animating.
    Timer::after(Duration::from_secs(2)).await;

    loop {
        *frame.lock().await += 1;
        Timer::after(Duration::from_millis(50)).await;
    }
}
