//! # q7rf
//!
//! A portable, no_std Rust driver for Q7RF heating receivers (the 868 MHz
//! on/off-keyed remote protocol used by a family of wireless room thermostats),
//! transmitted through a TI CC1101 sub-GHz transceiver.
//!
//! The driver is built from three layers:
//! - [`radio::Cc1101`]: reset, identification, verified register and power table
//!   programming, and single-burst transmission with a MARCSTATE check
//! - [`encoding`]: the pure Q7RF frame encoder (45-byte bursts with 4x redundancy)
//! - [`switch::Q7rfSwitch`]: the on/off switch that decides what to send and when,
//!   resends periodically over the unacknowledged link and resets the radio after
//!   repeated faults
//!
//! ## Crate features
//! | Feature               | Description |
//! |-----------------------|-------------|
//! | `std`                 | Disables `#![no_std]` support |
//! | `delay-loop`          | Blocking tick loop over `embedded_hal::delay::DelayNs` |
//! | `timer-isr` (default) | Global switch behind `critical_section::Mutex` for interrupt-driven ticks |
//! | `defmt-0-3`           | Uses `defmt` logging |
//! | `log`                 | Uses `log` logging |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use q7rf::switch::{Q7rfConfig, Q7rfSwitch};
//! use q7rf::transport::SpiTransport;
//!
//! let transport = SpiTransport::new(spi, cs, delay);
//! let mut switch = Q7rfSwitch::new(transport, |on| led.set_state(on.into()), Q7rfConfig {
//!     device_id: 0x6ed5,
//!     ..Default::default()
//! });
//! switch.setup();
//! switch.pair();
//!
//! loop {
//!     switch.tick(millis());
//! }
//! ```
//!
//! ## Integration Notes
//!
//! - The SPI bus must run in mode 0, MSB first, at no more than 6.5 MHz for burst access
//! - Chip select is driven by the driver, not by an `SpiDevice`, because the reset
//!   sequence needs exact chip select timing
//! - The link is one-way: a successful transmit only means the chip entered TX
//!
//! --
//! Designed for `#![no_std]` use in resource-constrained embedded environments.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "timer-isr")]
pub use critical_section;

pub use heapless;

#[macro_use]
mod fmt;

pub mod consts;
pub mod encoding;
pub mod radio;
pub mod registers;
pub mod switch;
#[cfg(test)]
pub(crate) mod testing;
pub mod timer;
pub mod transport;
