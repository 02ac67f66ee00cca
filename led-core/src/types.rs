//! Core Types für LED-Steuerung
//!
//! Datenstrukturen ohne Hardware-Dependencies

use crate::logic::{
    DEFAULT_BLINK_INTERVAL_MS, clamp_unit, invert, normalize_interval, parse_leading_int,
    threshold,
};
use crate::traits::LedError;

/// Verdrahtung der LED (Polarität)
///
/// - `Source`: Pin liefert Strom, LED leuchtet bei High (1)
/// - `Sync`: Pin zieht Strom, LED leuchtet bei Low (0)
///
/// # Beispiele
///
/// ```
/// # use led_core::DriveMode;
/// assert_eq!(DriveMode::Sync.on_value(), 0.0);
/// assert_eq!(DriveMode::try_from(1u8), Ok(DriveMode::Sync));
/// assert!(DriveMode::try_from(7u8).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriveMode {
    #[default]
    Source,
    Sync,
}

impl DriveMode {
    /// Pin-Wert für "LED an"
    pub const fn on_value(self) -> f32 {
        match self {
            DriveMode::Source => 1.0,
            DriveMode::Sync => 0.0,
        }
    }

    /// Pin-Wert für "LED aus" (immer `1 - on_value`)
    pub const fn off_value(self) -> f32 {
        match self {
            DriveMode::Source => 0.0,
            DriveMode::Sync => 1.0,
        }
    }

    /// Übersetzt zwischen logischem Pegel und Pin-Wert
    ///
    /// Die Abbildung ist ihre eigene Umkehrung, funktioniert also in beide Richtungen.
    pub fn apply(self, value: f32) -> f32 {
        match self {
            DriveMode::Source => value,
            DriveMode::Sync => invert(value),
        }
    }
}

/// Numerische Codes: 0 = Source, 1 = Sync
impl TryFrom<u8> for DriveMode {
    type Error = LedError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(DriveMode::Source),
            1 => Ok(DriveMode::Sync),
            other => Err(LedError::InvalidDriveMode(other)),
        }
    }
}

impl TryFrom<&str> for DriveMode {
    type Error = LedError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("source") {
            Ok(DriveMode::Source)
        } else if name.eq_ignore_ascii_case("sync") {
            Ok(DriveMode::Sync)
        } else {
            Err(LedError::UnknownDriveMode)
        }
    }
}

/// Pin-Modus bzw. Fähigkeit eines Pins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    DigitalOutput,
    Pwm,
}

/// Helligkeits-Strategie, einmalig bei der Konstruktion festgelegt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IntensityMode {
    /// Stufenlos (PWM-fähiger Pin)
    Pwm,
    /// Nur 0 oder 1 (digitaler Ausgang)
    Binary,
}

impl IntensityMode {
    pub fn for_pwm_support(supports_pwm: bool) -> Self {
        if supports_pwm {
            IntensityMode::Pwm
        } else {
            IntensityMode::Binary
        }
    }

    /// Passender Pin-Modus für die Board-Konfiguration
    pub const fn pin_mode(self) -> PinMode {
        match self {
            IntensityMode::Pwm => PinMode::Pwm,
            IntensityMode::Binary => PinMode::DigitalOutput,
        }
    }

    /// Bringt eine gewünschte Helligkeit auf einen Wert, den der Pin darstellen kann
    pub fn quantize(self, value: f32) -> f32 {
        match self {
            IntensityMode::Pwm => clamp_unit(value),
            IntensityMode::Binary => threshold(value),
        }
    }
}

/// Diskreter LED-Zustand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedState {
    #[default]
    Off,
    On,
    Blinking,
}

/// Normalisiertes Blink-Intervall in Millisekunden (immer > 0)
///
/// Ungültige Eingaben (≤ 0, nicht numerisch) werden still durch
/// [`BlinkInterval::DEFAULT`] (1000 ms) ersetzt.
///
/// # Beispiele
///
/// ```
/// # use led_core::BlinkInterval;
/// assert_eq!(BlinkInterval::from(200u32).as_millis(), 200);
/// assert_eq!(BlinkInterval::from(-5i32).as_millis(), 1000);
/// assert_eq!(BlinkInterval::from("abc").as_millis(), 1000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "u32", into = "u32")
)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BlinkInterval(u32);

impl BlinkInterval {
    pub const DEFAULT: Self = Self(DEFAULT_BLINK_INTERVAL_MS);

    pub const fn from_millis(ms: u32) -> Self {
        if ms == 0 { Self::DEFAULT } else { Self(ms) }
    }

    pub const fn as_millis(self) -> u32 {
        self.0
    }
}

impl Default for BlinkInterval {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u32> for BlinkInterval {
    fn from(ms: u32) -> Self {
        Self::from_millis(ms)
    }
}

impl From<i32> for BlinkInterval {
    fn from(ms: i32) -> Self {
        Self(normalize_interval(i64::from(ms)))
    }
}

impl From<i64> for BlinkInterval {
    fn from(ms: i64) -> Self {
        Self(normalize_interval(ms))
    }
}

impl From<&str> for BlinkInterval {
    fn from(text: &str) -> Self {
        parse_leading_int(text).map_or(Self::DEFAULT, Self::from)
    }
}

impl<T: Into<BlinkInterval>> From<Option<T>> for BlinkInterval {
    fn from(ms: Option<T>) -> Self {
        ms.map_or(Self::DEFAULT, Into::into)
    }
}

impl From<BlinkInterval> for u32 {
    fn from(interval: BlinkInterval) -> Self {
        interval.0
    }
}

/// Opaker Timer-Handle eines [`BlinkScheduler`](crate::BlinkScheduler)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerHandle(u32);

impl TimerHandle {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn id(self) -> u32 {
        self.0
    }
}

/// Vom Board gemeldeter Pin-Zustand
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinState {
    pub number: u8,
    pub value: f32,
}

/// LED Command für die Steuerung
///
/// Wird vom Button (oder einer anderen Quelle) an den LED-Task gesendet.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LedCommand {
    On,
    Off,
    Toggle,
    Blink { interval: BlinkInterval },
    StopBlink,
    SetIntensity(f32),
}

/// Textform: `on`, `off`, `toggle`, `stop`, `blink`, `blink:<ms>`, `intensity:<0..1>`
impl TryFrom<&str> for LedCommand {
    type Error = LedError;

    fn try_from(text: &str) -> Result<Self, Self::Error> {
        let text = text.trim();
        let (name, argument) = match text.split_once(':') {
            Some((name, argument)) => (name, Some(argument)),
            None => (text, None),
        };

        match (name, argument) {
            ("on", None) => Ok(Self::On),
            ("off", None) => Ok(Self::Off),
            ("toggle", None) => Ok(Self::Toggle),
            ("stop", None) => Ok(Self::StopBlink),
            ("blink", argument) => Ok(Self::Blink {
                interval: BlinkInterval::from(argument),
            }),
            ("intensity", Some(level)) => level
                .trim()
                .parse::<f32>()
                .map(Self::SetIntensity)
                .map_err(|_| LedError::UnknownCommand),
            _ => Err(LedError::UnknownCommand),
        }
    }
}

/// Momentaufnahme des Treibers für Logs und Status-Meldungen
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LedStatus {
    pub state: LedState,
    pub interval_ms: Option<u32>,
    pub intensity: f32,
    pub drive_mode: DriveMode,
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for LedStatus {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "LedStatus {{ state: {}, interval_ms: {}, intensity: {}, drive: {} }}",
            self.state,
            self.interval_ms,
            self.intensity,
            self.drive_mode
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for LedCommand {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            LedCommand::On => defmt::write!(fmt, "On"),
            LedCommand::Off => defmt::write!(fmt, "Off"),
            LedCommand::Toggle => defmt::write!(fmt, "Toggle"),
            LedCommand::Blink { interval } => {
                defmt::write!(fmt, "Blink {{ interval_ms: {} }}", interval.as_millis())
            }
            LedCommand::StopBlink => defmt::write!(fmt, "StopBlink"),
            LedCommand::SetIntensity(level) => defmt::write!(fmt, "SetIntensity({})", level),
        }
    }
}
