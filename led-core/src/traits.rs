//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für Board, Pin und Timer
//! ohne konkrete Implementierung.

use alloc::boxed::Box;
use core::convert::Infallible;
use core::fmt;

use crate::types::{BlinkInterval, PinMode, PinState, TimerHandle};

/// Fehler-Typ für LED-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedError {
    /// Unbekannter numerischer Drive-Mode (gültig: 0 = Source, 1 = Sync)
    InvalidDriveMode(u8),
    /// Unbekannter Drive-Mode-Name (gültig: "source", "sync")
    UnknownDriveMode,
    /// Text lässt sich keinem [`LedCommand`](crate::LedCommand) zuordnen
    UnknownCommand,
}

impl fmt::Display for LedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedError::InvalidDriveMode(code) => write!(
                f,
                "invalid drive mode {code}: expected 0 (source) or 1 (sync)"
            ),
            LedError::UnknownDriveMode => f.write_str("drive mode must be \"source\" or \"sync\""),
            LedError::UnknownCommand => f.write_str("unknown LED command"),
        }
    }
}

impl core::error::Error for LedError {}

impl From<Infallible> for LedError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

/// Callback für [`Board::query_pin_state`]
pub type PinStateCallback = Box<dyn FnOnce(PinState)>;

/// Trait für einen einzelnen Ausgangs-Pin
///
/// Werte sind auf [0, 1] normalisiert. Schreibzugriffe können asynchron
/// bei der Hardware ankommen; `state()` liefert den zuletzt bestätigten Pegel.
///
/// # Implementierungen
/// - **Production:** GpioPin (esp-hal `Output`)
/// - **Testing:** MockPin
pub trait Pin {
    fn number(&self) -> u8;

    /// Unterstützt der Pin den gegebenen Modus?
    fn supports(&self, capability: PinMode) -> bool;

    /// Aktueller (roher) Pin-Wert
    fn value(&self) -> f32;

    fn set_value(&mut self, value: f32);

    /// Zuletzt von der Hardware bestätigter Pegel
    fn state(&self) -> f32;
}

/// Trait für das Board, an dem der Pin hängt
///
/// # Implementierungen
/// - **Production:** EspBoard
/// - **Testing:** MockBoard
pub trait Board {
    /// Konfiguriert einen Pin als digitalen Ausgang oder PWM-Ausgang
    fn set_digital_pin_mode(&mut self, pin: u8, mode: PinMode);

    /// Fragt den Pin-Zustand asynchron ab
    ///
    /// `on_result` wird genau einmal aufgerufen, sobald das Board antwortet.
    /// Antwortet es nie, wird der Callback nie aufgerufen.
    fn query_pin_state(&mut self, pin: u8, on_result: PinStateCallback);
}

/// Trait für einmalige, abbrechbare Timer
///
/// Der Besitzer des Schedulers meldet abgelaufene Timer per
/// [`LedDriver::on_timer`](crate::LedDriver::on_timer) zurück.
pub trait BlinkScheduler {
    /// Startet einen Timer, der nach `after` einmal abläuft
    fn schedule(&mut self, after: BlinkInterval) -> TimerHandle;

    /// Bricht einen Timer ab; bereits abgelaufene Handles werden ignoriert
    fn cancel(&mut self, handle: TimerHandle);
}

impl<T: Pin + ?Sized> Pin for &mut T {
    fn number(&self) -> u8 {
        T::number(self)
    }

    fn supports(&self, capability: PinMode) -> bool {
        T::supports(self, capability)
    }

    fn value(&self) -> f32 {
        T::value(self)
    }

    fn set_value(&mut self, value: f32) {
        T::set_value(self, value)
    }

    fn state(&self) -> f32 {
        T::state(self)
    }
}

impl<T: Board + ?Sized> Board for &mut T {
    fn set_digital_pin_mode(&mut self, pin: u8, mode: PinMode) {
        T::set_digital_pin_mode(self, pin, mode)
    }

    fn query_pin_state(&mut self, pin: u8, on_result: PinStateCallback) {
        T::query_pin_state(self, pin, on_result)
    }
}

impl<T: BlinkScheduler + ?Sized> BlinkScheduler for &mut T {
    fn schedule(&mut self, after: BlinkInterval) -> TimerHandle {
        T::schedule(self, after)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        T::cancel(self, handle)
    }
}
