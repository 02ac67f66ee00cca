// ESP32-C6 Board als led-core Board
//
// Pin-Zustands-Abfragen werden gesammelt und vom LED-Task beantwortet,
// nachdem er den Pegel zurückgelesen hat (siehe `respond`).

use defmt::{debug, warn};
use heapless::Deque;
use led_core::{Board, PinMode, PinState, PinStateCallback};

use crate::config::PENDING_QUERY_CAPACITY;

/// Board mit Queue für offene Pin-Abfragen
pub struct EspBoard {
    pending: Deque<(u8, PinStateCallback), PENDING_QUERY_CAPACITY>,
    pin_mode: Option<(u8, PinMode)>,
}

impl EspBoard {
    pub fn new() -> Self {
        Self {
            pending: Deque::new(),
            pin_mode: None,
        }
    }

    /// Zuletzt konfigurierter Pin-Modus
    pub fn pin_mode(&self) -> Option<(u8, PinMode)> {
        self.pin_mode
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Beantwortet alle offenen Abfragen für `state.number`
    ///
    /// Gibt die Anzahl der beantworteten Abfragen zurück.
    pub fn respond(&mut self, state: PinState) -> usize {
        let mut answered = 0;
        for _ in 0..self.pending.len() {
            let Some((number, on_result)) = self.pending.pop_front() else {
                break;
            };
            if number == state.number {
                on_result(state);
                answered += 1;
            } else {
                // Kann nicht fehlschlagen: der Eintrag wurde gerade entnommen
                let _ = self.pending.push_back((number, on_result));
            }
        }
        answered
    }
}

impl Default for EspBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl Board for EspBoard {
    fn set_digital_pin_mode(&mut self, pin: u8, mode: PinMode) {
        // esp-hal konfiguriert den Pin beim Erstellen des Output;
        // hier wird nur der gewünschte Modus festgehalten.
        if mode == PinMode::Pwm {
            warn!("Board: pin {} requested PWM, driving as digital output", pin);
        }
        debug!("Board: pin {} mode {}", pin, mode);
        self.pin_mode = Some((pin, mode));
    }

    fn query_pin_state(&mut self, pin: u8, on_result: PinStateCallback) {
        if self.pending.push_back((pin, on_result)).is_err() {
            warn!(
                "Board: {} queries pending, dropping query for pin {}",
                PENDING_QUERY_CAPACITY, pin
            );
        }
    }
}
