// GPIO-Pin als led-core Pin
//
// Digitaler Ausgang über esp-hal. Kein PWM: der Treiber quantisiert
// Helligkeiten daher auf 0/1.

use esp_hal::gpio::{Level, Output};
use led_core::{Pin, PinMode};

/// Digitaler Ausgangs-Pin
///
/// `value()` ist der zuletzt geschriebene Wert, `state()` der Pegel,
/// den das Output-Register tatsächlich treibt.
pub struct GpioPin<'d> {
    output: Output<'d>,
    number: u8,
    value: f32,
}

impl<'d> GpioPin<'d> {
    /// Erstellt einen GpioPin
    ///
    /// # Parameter
    /// - `output`: bereits konfigurierter esp-hal Ausgang
    /// - `number`: GPIO-Nummer (nur für Logs und Board-Abfragen)
    pub fn new(output: Output<'d>, number: u8) -> Self {
        let value = level_to_value(output.output_level());
        Self {
            output,
            number,
            value,
        }
    }
}

impl Pin for GpioPin<'_> {
    fn number(&self) -> u8 {
        self.number
    }

    fn supports(&self, capability: PinMode) -> bool {
        capability == PinMode::DigitalOutput
    }

    fn value(&self) -> f32 {
        self.value
    }

    fn set_value(&mut self, value: f32) {
        self.value = value;
        self.output.set_level(Level::from(value >= 0.5));
    }

    fn state(&self) -> f32 {
        level_to_value(self.output.output_level())
    }
}

fn level_to_value(level: Level) -> f32 {
    match level {
        Level::High => 1.0,
        Level::Low => 0.0,
    }
}
