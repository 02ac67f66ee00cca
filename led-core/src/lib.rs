//! LED Core - Platform-agnostic Driver, Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert die Traits für Board/Pin/Timer, die Pure Functions
//! und den LED-Treiber (Zustandsmaschine) darauf.

#![no_std]

extern crate alloc;

#[macro_use]
mod fmt;

pub mod driver;
pub mod logic;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use driver::LedDriver;
pub use traits::{BlinkScheduler, Board, LedError, Pin, PinStateCallback};
pub use types::{
    BlinkInterval, DriveMode, IntensityMode, LedCommand, LedState, LedStatus, PinMode, PinState,
    TimerHandle,
};
