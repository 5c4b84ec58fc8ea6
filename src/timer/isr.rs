use crate::switch::{Q7rfSwitch, StatePublisher};
use crate::transport::Transport;
use core::cell::RefCell;
use critical_section::Mutex;

/// Global slot holding a [`Q7rfSwitch`] shared between main code and interrupts.
pub type GlobalSwitch<T, P> = Mutex<RefCell<Option<Q7rfSwitch<T, P>>>>;

/// Used to initialize the global static `Q7rfSwitch` for use with
/// `critical_section`.
///
/// # Returns
/// * An empty mutable ref-cell
///
/// # Example
/// ```rust,ignore
/// use q7rf::timer::{global_switch_init, GlobalSwitch};
///
/// static Q7RF: GlobalSwitch<MyTransport, fn(bool)> = global_switch_init();
/// ```
pub const fn global_switch_init<T: Transport, P: StatePublisher>() -> GlobalSwitch<T, P> {
    Mutex::new(RefCell::new(None))
}

/// Runs `setup()` on `switch` and stores it in the global slot.
///
/// Setup talks to the radio for a few milliseconds; it runs inside the
/// critical section so no tick can observe a half-configured chip.
///
/// # Returns
/// Whether the switch came up initialized.
pub fn global_switch_setup<T: Transport, P: StatePublisher>(
    global: &'static GlobalSwitch<T, P>,
    mut switch: Q7rfSwitch<T, P>,
) -> bool {
    critical_section::with(|cs| {
        switch.setup();
        let initialized = switch.is_initialized();
        let _ = global.borrow(cs).replace(Some(switch));
        initialized
    })
}

/// Runs one tick at `now_ms`, typically from a periodic timer interrupt.
///
///# Example
/// ```rust,ignore
/// #[interrupt]
/// fn TIM2() {
///     global_switch_tick(&Q7RF, millis());
/// }
/// ```
pub fn global_switch_tick<T: Transport, P: StatePublisher>(
    global: &'static GlobalSwitch<T, P>,
    now_ms: u32,
) {
    with_switch(global, |switch| switch.tick(now_ms));
}

/// Requests a heating state from any context.
pub fn global_switch_write_state<T: Transport, P: StatePublisher>(
    global: &'static GlobalSwitch<T, P>,
    state: bool,
) {
    with_switch(global, |switch| switch.write_state(state));
}

/// Requests pairing from any context.
pub fn global_switch_pair<T: Transport, P: StatePublisher>(global: &'static GlobalSwitch<T, P>) {
    with_switch(global, |switch| switch.pair());
}

fn with_switch<T: Transport, P: StatePublisher>(
    global: &'static GlobalSwitch<T, P>,
    f: impl FnOnce(&mut Q7rfSwitch<T, P>),
) {
    critical_section::with(|cs| {
        if let Some(switch) = global.borrow(cs).borrow_mut().as_mut() {
            f(switch);
        }
    });
}
