//! Joystick sampling task
//!
//! Samples the switches on a fixed tick and ORs newly latched presses
//! into a shared bit set. The main loop reads and clears it once per
//! frame.

use defmt::*;
use embassy_time::{Duration, Ticker};
use portable_atomic::{AtomicU8, Ordering};

use irscope_drivers::input::{Joystick, Latches};
use irscope_hal::gpio::ActiveLow;
use irscope_hal_stm32f1::Stm32Input;

/// Joystick on the board's pull-up inputs
pub type BoardJoystick = Joystick<ActiveLow<Stm32Input<'static>>>;

/// Presses latched since the last [`take_presses`]
static PRESSES: AtomicU8 = AtomicU8::new(0);

/// Read and clear the latched presses
pub fn take_presses() -> Latches {
    Latches::from_bits(PRESSES.swap(0, Ordering::AcqRel))
}

/// Joystick task - debounces the switches every `interval_ms`
#[embassy_executor::task]
pub async fn joystick_task(mut joystick: BoardJoystick, interval_ms: u32) {
    info!("Joystick task started");

    let mut ticker = Ticker::every(Duration::from_millis(interval_ms as u64));

    loop {
        ticker.next().await;

        let fresh = joystick.tick();
        if !fresh.is_empty() {
            trace!("Joystick latched {=u8:b}", fresh.bits());
            PRESSES.fetch_or(fresh.bits(), Ordering::AcqRel);
        }
    }
}
