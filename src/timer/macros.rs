/// Declares a static global `Q7RF_SWITCH` instance protected by a `critical_section` mutex.
///
/// This macro creates a `static` singleton `Q7RF_SWITCH` suitable for use in
/// interrupt-based environments, where the main thread, a timer ISR and a
/// button ISR all need to reach the same switch.
///
/// # Arguments
/// - `$transport`: The concrete transport type (must implement `Transport`)
/// - `$publisher`: The concrete publisher type (must implement `StatePublisher`)
///
/// # Example
/// ```rust,ignore
/// init_q7rf_switch!(SpiTransport<Spi1, PA4, Delay>, fn(bool));
/// ```
#[macro_export]
macro_rules! init_q7rf_switch {
    ( $transport:ty, $publisher:ty ) => {
        pub static Q7RF_SWITCH: $crate::timer::GlobalSwitch<$transport, $publisher> =
            $crate::timer::global_switch_init();
    };
}

/// Calls `tick()` on the global `Q7RF_SWITCH` if it has been set up.
///
/// # Example
/// ```rust,ignore
/// #[interrupt]
/// fn TIM2() {
///     tick_q7rf_switch!(millis());
/// }
/// ```
///
/// # Notes
/// - This macro assumes `Q7RF_SWITCH` was declared with `init_q7rf_switch!`
///   and initialized via `global_switch_setup`.
/// - Safe to call repeatedly; it does nothing until the switch is set up.
#[macro_export]
macro_rules! tick_q7rf_switch {
    ( $now_ms:expr ) => {
        $crate::timer::global_switch_tick(&Q7RF_SWITCH, $now_ms)
    };
}

#[cfg(test)]
mod tests {
    use crate::testing::FakeCc1101;
    use crate::timer::global_switch_setup;

    fn ignore(_: bool) {}

    init_q7rf_switch!(FakeCc1101, fn(bool));

    #[test]
    fn test_macros_reach_declared_switch() {
        let publisher: fn(bool) = ignore;
        let switch = crate::switch::Q7rfSwitch::new(
            FakeCc1101::new(),
            publisher,
            crate::switch::Q7rfConfig::default(),
        );
        assert!(global_switch_setup(&Q7RF_SWITCH, switch));

        tick_q7rf_switch!(60_001);

        critical_section::with(|cs| {
            let cell = Q7RF_SWITCH.borrow(cs).borrow();
            let chip = cell.as_ref().map(|s| s.radio().transport().tx_fifo.len());
            assert_eq!(chip, Some(45));
        });
    }
}
