//! Tick scheduling helpers for the Q7RF switch.
//!
//! [`Q7rfSwitch::tick`](crate::switch::Q7rfSwitch::tick) only needs to run
//! about once a second, but it needs a millisecond clock. Two ways
//! of providing both are offered: a blocking loop over a `DelayNs` provider
//! (`delay-loop` feature), or a `critical_section`-protected global driven by
//! a timer interrupt (`timer-isr` feature), where pairing and state requests
//! may arrive from other contexts between ticks.
//!
//! Contains:
//! - `run_tick_loop`: blocking loop that keeps its own millisecond count (feature `delay-loop`)
//! - `global_switch_*` functions and `init_q7rf_switch!()` / `tick_q7rf_switch!()`:
//!   interrupt-safe singleton access (feature `timer-isr`)

#[cfg(feature = "delay-loop")]
mod delay;
#[cfg_attr(feature = "delay-loop", allow(unused_imports))]
#[cfg(feature = "delay-loop")]
pub use delay::*;

#[cfg(feature = "timer-isr")]
mod isr;
#[cfg_attr(feature = "timer-isr", allow(unused_imports))]
#[cfg(feature = "timer-isr")]
pub use isr::*;

#[cfg(feature = "timer-isr")]
mod macros;

/// Tick period suggested for hosts without their own scheduler.
pub const DEFAULT_TICK_PERIOD_MS: u32 = 1_000;

/// Advances a wrapping millisecond clock by `period_ms`.
pub const fn advance_millis(now_ms: u32, period_ms: u32) -> u32 {
    now_ms.wrapping_add(period_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_millis_wraps() {
        assert_eq!(advance_millis(0, DEFAULT_TICK_PERIOD_MS), 1_000);
        assert_eq!(advance_millis(u32::MAX - 49, 100), 50);
    }
}
