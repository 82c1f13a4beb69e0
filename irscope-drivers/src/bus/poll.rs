//! Busy-wait helpers

/// A bounded wait ran out of polls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Exhausted;

/// Poll `ready` until it reports true, at most `budget` times
pub fn bounded(budget: u32, mut ready: impl FnMut() -> bool) -> Result<(), Exhausted> {
    for _ in 0..budget {
        if ready() {
            return Ok(());
        }
    }
    Err(Exhausted)
}

/// Poll `ready` until it reports true
pub fn spin(mut ready: impl FnMut() -> bool) {
    while !ready() {
        core::hint::spin_loop();
    }
}
