//! Q7RF thermostat switch: what to send, and when.
//!
//! [`Q7rfSwitch`] owns the radio, the three precomputed frames and the
//! transmission bookkeeping. The host drives it through four entry points:
//!
//! - [`setup()`](Q7rfSwitch::setup) once at boot
//! - [`write_state()`](Q7rfSwitch::write_state) when the user flips the switch
//! - [`pair()`](Q7rfSwitch::pair) to pair a receiver
//! - [`tick()`](Q7rfSwitch::tick) periodically, with a millisecond timestamp
//!
//! ## Per-tick policy
//!
//! 1. A pending command (pairing or a state change) is sent and cleared,
//!    whether or not the burst started.
//! 2. Otherwise, once the resend interval has passed since the last
//!    successful burst, the desired state is sent again.
//! 3. Otherwise nothing happens.
//!
//! With a turn-on watchdog configured, a switch left on for longer than the
//! watchdog interval since the last "on" request is turned off as if the host
//! had asked for it, before the steps above run.
//!
//! Every failed burst bumps a counter. When it reaches
//! [`FAILURE_THRESHOLD`] the transceiver is reset and reconfigured and the
//! counter goes back to zero. A successful burst leaves the counter alone.

use crate::consts::{DEFAULT_RESEND_INTERVAL_MS, FAILURE_THRESHOLD};
use crate::encoding::{Command, Frames};
use crate::radio::Cc1101;
use crate::transport::Transport;

/// Receives the switch state the host should display.
pub trait StatePublisher {
    /// Called with the new state.
    fn publish_state(&mut self, state: bool);
}

impl<F: FnMut(bool)> StatePublisher for F {
    fn publish_state(&mut self, state: bool) {
        self(state)
    }
}

/// Settings fixed before [`Q7rfSwitch::setup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Q7rfConfig {
    /// Id the receiver is paired with.
    pub device_id: u16,
    /// Period between resends of the desired state.
    pub resend_interval_ms: u32,
    /// How long the switch may stay on after an "on" request. `None` disables
    /// the watchdog.
    pub turn_on_watchdog_interval_ms: Option<u32>,
}

impl Default for Q7rfConfig {
    fn default() -> Self {
        Self {
            device_id: 0,
            resend_interval_ms: DEFAULT_RESEND_INTERVAL_MS,
            turn_on_watchdog_interval_ms: None,
        }
    }
}

/// On/off switch for a Q7RF heating receiver.
///
/// ## Example
///
/// ```rust,ignore
/// use q7rf::switch::{Q7rfConfig, Q7rfSwitch};
/// use q7rf::transport::SpiTransport;
///
/// let transport = SpiTransport::new(spi, cs, delay);
/// let config = Q7rfConfig { device_id: 0x6ed5, ..Default::default() };
/// let mut switch = Q7rfSwitch::new(transport, |on| display.set(on), config);
/// switch.setup();
///
/// loop {
///     switch.tick(clock.millis());
/// }
/// ```
#[derive(Debug)]
pub struct Q7rfSwitch<T, P> {
    radio: Cc1101<T>,
    publisher: P,
    config: Q7rfConfig,
    frames: Option<Frames>,
    state: bool,
    pending: Option<Command>,
    last_sent_ms: u32,
    turned_on_ms: Option<u32>,
    failures: u8,
}

impl<T, P> Q7rfSwitch<T, P>
where
    T: Transport,
    P: StatePublisher,
{
    /// Creates an uninitialized switch. Nothing is sent until
    /// [`setup`](Self::setup) succeeds.
    pub fn new(transport: T, publisher: P, config: Q7rfConfig) -> Self {
        Self {
            radio: Cc1101::new(transport),
            publisher,
            config,
            frames: None,
            state: false,
            pending: None,
            last_sent_ms: 0,
            turned_on_ms: None,
            failures: 0,
        }
    }

    /// Sets the paired device id. Ignored once initialized.
    pub fn set_device_id(&mut self, device_id: u16) {
        if self.is_initialized() {
            warn!("Device id can only be changed before setup");
            return;
        }
        self.config.device_id = device_id;
    }

    /// Sets the resend interval. Ignored once initialized.
    pub fn set_resend_interval(&mut self, resend_interval_ms: u32) {
        if self.is_initialized() {
            warn!("Resend interval can only be changed before setup");
            return;
        }
        self.config.resend_interval_ms = resend_interval_ms;
    }

    /// Enables the turn-on watchdog. Ignored once initialized.
    pub fn set_turn_on_watchdog_interval(&mut self, interval_ms: u32) {
        if self.is_initialized() {
            warn!("Turn-on watchdog interval can only be changed before setup");
            return;
        }
        self.config.turn_on_watchdog_interval_ms = Some(interval_ms);
    }

    /// Publishes "off", configures the radio and precomputes the frames.
    ///
    /// If the radio does not come up the switch stays uninitialized for good
    /// and every other entry point becomes a no-op.
    pub fn setup(&mut self) {
        self.state = false;
        self.publisher.publish_state(false);

        if self.radio.reset_and_configure().is_err() {
            error!("Failed to reset CC1101 modem. Check connection.");
            return;
        }
        info!("CC1101 reset successful.");

        self.frames = Some(Frames::new(self.config.device_id));
        info!("Q7RF frames ready for device {:#x}", self.config.device_id);
    }

    /// Requests a new heating state, sent on the next tick.
    ///
    /// The new state is published right away; a later request before the tick
    /// replaces this one.
    pub fn write_state(&mut self, state: bool) {
        if !self.is_initialized() {
            return;
        }
        self.state = state;
        self.pending = Some(Command::for_state(state));
        self.publisher.publish_state(state);
        info!("Heating state requested: {}", state);
    }

    /// Requests a pairing burst on the next tick.
    pub fn pair(&mut self) {
        if !self.is_initialized() {
            return;
        }
        self.pending = Some(Command::Pair);
        info!("Pairing requested for device {:#x}", self.config.device_id);
    }

    /// Runs one scheduling step at `now_ms`.
    ///
    /// Elapsed times are computed with wrapping `u32` arithmetic, so they are
    /// only meaningful below about 49.7 days. If no burst succeeds for that
    /// long the resend timer wraps and the next resend waits for another full
    /// interval.
    pub fn tick(&mut self, now_ms: u32) {
        if !self.is_initialized() {
            return;
        }

        if self.watchdog_expired(now_ms) {
            warn!("Heating on for too long, turning off");
            self.write_state(false);
        }

        if let Some(command) = self.pending.take() {
            self.turned_on_ms = match command {
                Command::HeatOn => Some(now_ms),
                Command::HeatOff => None,
                Command::Pair => self.turned_on_ms,
            };
            self.send(command, now_ms);
        } else if now_ms.wrapping_sub(self.last_sent_ms) > self.config.resend_interval_ms {
            debug!("Resending heating state {}", self.state);
            self.send(Command::for_state(self.state), now_ms);
        }
    }

    /// Logs the active configuration.
    pub fn dump_config(&self) {
        info!("Q7RF switch:");
        info!("  device id: {:#x}", self.config.device_id);
        info!("  resend interval: {} ms", self.config.resend_interval_ms);
        match self.config.turn_on_watchdog_interval_ms {
            Some(interval_ms) => info!("  turn-on watchdog: {} ms", interval_ms),
            None => info!("  turn-on watchdog: disabled"),
        }
        info!("  initialized: {}", self.is_initialized());
    }

    /// Whether setup completed.
    pub fn is_initialized(&self) -> bool {
        self.frames.is_some()
    }

    /// Desired heating state.
    pub fn state(&self) -> bool {
        self.state
    }

    /// Command waiting for the next tick.
    pub fn pending(&self) -> Option<Command> {
        self.pending
    }

    /// Consecutive failed bursts since the last forced reset.
    pub fn failure_count(&self) -> u8 {
        self.failures
    }

    /// Active configuration.
    pub fn config(&self) -> &Q7rfConfig {
        &self.config
    }

    /// Borrows the radio.
    pub fn radio(&self) -> &Cc1101<T> {
        &self.radio
    }

    /// Mutably borrows the radio.
    pub fn radio_mut(&mut self) -> &mut Cc1101<T> {
        &mut self.radio
    }

    fn watchdog_expired(&self, now_ms: u32) -> bool {
        // a queued "on" request re-arms instead of tripping
        if self.pending == Some(Command::HeatOn) {
            return false;
        }
        match (self.config.turn_on_watchdog_interval_ms, self.turned_on_ms) {
            (Some(interval_ms), Some(turned_on_ms)) => {
                self.state && now_ms.wrapping_sub(turned_on_ms) > interval_ms
            }
            _ => false,
        }
    }

    fn send(&mut self, command: Command, now_ms: u32) {
        let Some(frames) = self.frames.as_ref() else {
            return;
        };

        match self.radio.transmit(frames.get(command)) {
            Ok(()) => {
                self.last_sent_ms = now_ms;
                debug!("Sent command {:#x}", command.code());
            }
            Err(_) => {
                self.failures += 1;
                warn!(
                    "Failed to send command {:#x} ({} in a row)",
                    command.code(),
                    self.failures
                );
                if self.failures >= FAILURE_THRESHOLD {
                    warn!("Too many failed bursts, resetting CC1101");
                    // counter restarts whether or not the chip verified
                    if self.radio.reset_and_configure().is_err() {
                        error!("CC1101 reset after transmit failures did not verify");
                    }
                    self.failures = 0;
                }
            }
        }
    }
}
