//! Periodic display update task.
//!
//! [`display_update_task`] sets the panel up, then periodically lets a
//! render callback redraw the framebuffer from shared state and flushes the
//! result to the hardware.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embedded_hal::digital::OutputPin;

use crate::driver::Nt7538;
use crate::framebuffer::FrameBuffer;
use crate::interface::CommandInterface;

// ── Display update task ──────────────────────────────────────────────────

/// Periodic display update loop.
///
/// This is a regular `async fn`, **not** an Embassy `#[task]`. Callers
/// should create a thin, concrete task wrapper that calls this function,
/// since Embassy tasks cannot be generic:
///
/// ```ignore
/// #[embassy_executor::task]
/// async fn lcd_task(
///     driver: Nt7538<MyInterface, MyResetPin>,
///     state: &'static Mutex<CriticalSectionRawMutex, Screen>,
/// ) {
///     display_update_task(driver, state, draw_screen).await;
/// }
/// ```
///
/// # Control flow
///
/// 1. Run [`Nt7538::setup()`] with [`embassy_time::Delay`] and switch the
///    backlight on.
/// 2. Loop at `config.update_period_ms()`:
///    - **Step 1**: lock `state` and call `render(&state, framebuffer)`.
///      The mutex is released before any bus traffic.
///    - **Step 2**: flush the whole framebuffer to the panel.
///
/// # Errors
///
/// * Setup failure: logs the error and **returns** (task exits).
/// * Flush failure: logs the error and continues to the next cycle.
pub async fn display_update_task<DI, RST, BL, M, S, F>(
    mut driver: Nt7538<DI, RST, BL>,
    state: &'static Mutex<M, S>,
    mut render: F,
) where
    DI: CommandInterface,
    RST: OutputPin,
    BL: OutputPin,
    M: RawMutex,
    F: FnMut(&S, &mut FrameBuffer),
{
    // ── Initialisation ───────────────────────────────────────────────
    if let Err(_e) = driver.setup(&mut embassy_time::Delay) {
        #[cfg(feature = "defmt")]
        defmt::error!("NT7538 setup failed: {}", _e);
        return;
    }

    if let Err(_e) = driver.set_backlight(true) {
        #[cfg(feature = "defmt")]
        defmt::warn!("Backlight on failed: {}", _e);
    }

    #[cfg(feature = "defmt")]
    defmt::info!("NT7538 initialised");

    let period = embassy_time::Duration::from_millis(driver.config().update_period_ms());

    // ── Main loop ────────────────────────────────────────────────────
    loop {
        embassy_time::Timer::after(period).await;

        // ── Step 1: render from shared state (memory only) ───────────
        {
            let state = state.lock().await;
            render(&*state, driver.buffer_mut());
        } // ← mutex released here, before any bus work

        // ── Step 2: flush to hardware ────────────────────────────────
        if let Err(_e) = driver.flush() {
            #[cfg(feature = "defmt")]
            defmt::error!("Flush failed: {}", _e);
        }
    }
}
