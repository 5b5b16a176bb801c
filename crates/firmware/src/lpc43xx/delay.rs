//! Busy-wait delay for the boot stage.
//!
//! Runs before any timer is configured, so it counts core cycles with
//! `cortex_m::asm::delay`. Overshoot is fine: every caller waits for a
//! minimum time.

use embedded_hal::delay::DelayNs;

/// Cycle-counting delay at a fixed core clock.
pub struct CycleDelay {
    core_clk_hz: u32,
}

impl CycleDelay {
    /// Delay calibrated for `core_clk_hz`.
    pub const fn new(core_clk_hz: u32) -> Self {
        Self { core_clk_hz }
    }
}

impl DelayNs for CycleDelay {
    #[allow(clippy::arithmetic_side_effects)] // u32 * u32 fits u64; divisor is a constant
    #[allow(clippy::cast_possible_truncation)] // clamped to u32::MAX
    fn delay_ns(&mut self, ns: u32) {
        let cycles = (u64::from(ns) * u64::from(self.core_clk_hz)).div_ceil(1_000_000_000);
        cortex_m::asm::delay(cycles.min(u64::from(u32::MAX)) as u32);
    }
}
