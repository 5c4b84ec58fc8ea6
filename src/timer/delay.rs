use crate::switch::{Q7rfSwitch, StatePublisher};
use crate::timer::advance_millis;
use crate::transport::Transport;
use embedded_hal::delay::DelayNs;

/// Runs a blocking loop that repeatedly calls `tick()` on the provided switch.
///
/// This is a simple scheduler for firmware that has nothing else to do. The
/// loop keeps its own millisecond count, starting at zero, and advances it by
/// `period_ms` after every delay. Time spent inside `tick()` (a burst takes a
/// few milliseconds of SPI traffic) is not accounted for, so resends drift
/// slightly late, which the receiver tolerates.
///
/// # Arguments
/// - `switch`: A set-up [`Q7rfSwitch`].
/// - `delay`: A delay provider implementing `DelayNs`, typically from the HAL.
/// - `period_ms`: The delay between each tick call, in milliseconds.
///
/// # Example
/// ```rust,ignore
/// use q7rf::timer::{run_tick_loop, DEFAULT_TICK_PERIOD_MS};
/// switch.setup();
/// run_tick_loop(&mut switch, &mut delay, DEFAULT_TICK_PERIOD_MS);
/// ```
///
/// # Notes
/// - This loop will never return.
/// - For firmware that must also react to buttons or a network, prefer the
///   `timer-isr` helpers.
pub fn run_tick_loop<D: DelayNs, T, P>(
    switch: &mut Q7rfSwitch<T, P>,
    delay: &mut D,
    period_ms: u32,
) -> !
where
    T: Transport,
    P: StatePublisher,
{
    let mut now_ms = 0;
    loop {
        tick_and_wait(switch, delay, now_ms, period_ms);
        now_ms = advance_millis(now_ms, period_ms);
    }
}

/// One iteration of [`run_tick_loop`].
pub fn tick_and_wait<D: DelayNs, T, P>(
    switch: &mut Q7rfSwitch<T, P>,
    delay: &mut D,
    now_ms: u32,
    period_ms: u32,
) where
    T: Transport,
    P: StatePublisher,
{
    switch.tick(now_ms);
    delay.delay_ms(period_ms);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::switch::Q7rfConfig;
    use crate::testing::FakeCc1101;
    use embedded_hal_mock::eh1::delay::NoopDelay;

    #[test]
    fn test_tick_and_wait_drives_resend() {
        let mut switch = Q7rfSwitch::new(FakeCc1101::new(), |_: bool| {}, Q7rfConfig::default());
        switch.setup();
        let mut delay = NoopDelay::new();

        let mut now_ms = 0;
        for _ in 0..=601 {
            tick_and_wait(&mut switch, &mut delay, now_ms, 100);
            now_ms = advance_millis(now_ms, 100);
        }

        // first resend once 60 s have strictly elapsed, at t = 60.1 s
        let chip = switch.radio().transport();
        assert_eq!(chip.tx_fifo.len(), 45);
        assert_eq!(chip.strobes.iter().filter(|&&s| s == 0x35).count(), 1);
    }
}
