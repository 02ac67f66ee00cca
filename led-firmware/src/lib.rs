// Library-Root: Wiederverwendbare Logik und Module
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod tasks;

// Re-exports von led-core
pub use led_core::{DriveMode, LedCommand, LedDriver, LedError, LedState, LedStatus};

// Embassy Channel-Typen
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};

use crate::config::COMMAND_CHANNEL_CAPACITY;
use crate::hal::{EmbassyScheduler, EspBoard, GpioPin};

// ============================================================================
// Type-Aliase
// ============================================================================
//
// Diese Type-Aliase vereinfachen die Lesbarkeit der Funktionssignaturen.
// Embassy-Tasks dürfen nicht generisch sein, daher ist der Treiber hier konkret.

/// LED-Treiber mit den ESP32-C6 Implementierungen
pub type FirmwareLed = LedDriver<EspBoard, GpioPin<'static>, EmbassyScheduler>;

/// Channel für LED-Kommandos (Button → LED Task)
pub type LedCommandChannel = Channel<NoopRawMutex, LedCommand, COMMAND_CHANNEL_CAPACITY>;

/// Sender für LED-Kommandos
/// Erzeugt aus LedCommandChannel
pub type LedCommandSender = Sender<'static, NoopRawMutex, LedCommand, COMMAND_CHANNEL_CAPACITY>;

/// Receiver für LED-Kommandos (LED Task empfängt)
/// Empfängt Commands von LedCommandSender
pub type LedCommandReceiver =
    Receiver<'static, NoopRawMutex, LedCommand, COMMAND_CHANNEL_CAPACITY>;
