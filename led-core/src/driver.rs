//! LED-Treiber: Zustandsmaschine über Board, Pin und Timer
//!
//! Der Treiber kennt drei Zustände (Aus, An, Blinken) und übersetzt
//! logische Befehle in Pin-Werte:
//! - Polarität je nach [`DriveMode`] (Source/Sync)
//! - Helligkeit stufenlos (PWM) oder binär (digitaler Ausgang)
//! - Blinken als sich selbst neu planender Einmal-Timer
//!
//! # Bestätigung
//! Die `*_confirmed` Varianten fragen nach dem Schreiben den Pin-Zustand beim
//! Board ab und rufen den Callback nur auf, wenn der gemeldete Wert dem
//! geschriebenen entspricht. Ohne Antwort (oder bei Abweichung) wird der
//! Callback nie aufgerufen; es gibt keinen Timeout.

use alloc::boxed::Box;

use crate::logic::invert;
use crate::traits::{BlinkScheduler, Board, LedError, Pin};
use crate::types::{
    BlinkInterval, DriveMode, IntensityMode, LedCommand, LedState, LedStatus, PinMode, PinState,
    TimerHandle,
};

/// Treiber für eine einzelne LED an einem Board-Pin
///
/// Board, Pin und Scheduler werden als Wert übernommen. Wer sie selbst
/// behalten will, übergibt `&mut` Referenzen (alle drei Traits sind dafür
/// implementiert).
///
/// Der Zustand (`state()`) beschreibt immer den logischen Pegel, nicht den
/// rohen Pin-Wert: bei Sync-Drive ist eine leuchtende LED `On`, obwohl der
/// Pin 0 ausgibt. Das gilt auch für `toggle()`.
pub struct LedDriver<B: Board, P: Pin, S: BlinkScheduler> {
    board: B,
    pin: P,
    scheduler: S,
    drive_mode: DriveMode,
    intensity_mode: IntensityMode,
    state: LedState,
    interval: Option<BlinkInterval>,
    blink_timer: Option<TimerHandle>,
    /// Letzter Wechsel als (geschrieben, vorher); macht `1 - (1 - x)` exakt
    last_flip: Option<(f32, f32)>,
}

impl<B: Board, P: Pin, S: BlinkScheduler> LedDriver<B, P, S> {
    /// Erstellt den Treiber und konfiguriert den Pin am Board
    ///
    /// PWM-fähige Pins werden als PWM-Ausgang konfiguriert, alle anderen als
    /// digitaler Ausgang. Der Pin selbst wird nicht beschrieben.
    pub fn new(mut board: B, pin: P, scheduler: S, drive_mode: DriveMode) -> Self {
        let intensity_mode = IntensityMode::for_pwm_support(pin.supports(PinMode::Pwm));
        board.set_digital_pin_mode(pin.number(), intensity_mode.pin_mode());

        debug!(
            "LED: pin {} configured as {} ({})",
            pin.number(),
            intensity_mode.pin_mode(),
            drive_mode
        );

        Self {
            board,
            pin,
            scheduler,
            drive_mode,
            intensity_mode,
            state: LedState::Off,
            interval: None,
            blink_timer: None,
            last_flip: None,
        }
    }

    /// Wie [`new`](Self::new), aber mit ungeprüftem Drive-Mode (Code oder Name)
    ///
    /// Ein ungültiger Drive-Mode bricht ab, bevor das Board angefasst wird.
    pub fn try_new<M>(board: B, pin: P, scheduler: S, drive_mode: M) -> Result<Self, LedError>
    where
        M: TryInto<DriveMode>,
        LedError: From<M::Error>,
    {
        let drive_mode = drive_mode.try_into()?;
        Ok(Self::new(board, pin, scheduler, drive_mode))
    }

    // ------------------------------------------------------------------------
    // Helligkeit
    // ------------------------------------------------------------------------

    /// Roher Pin-Wert (ohne Polaritäts-Korrektur)
    pub fn intensity(&self) -> f32 {
        self.pin.value()
    }

    /// Setzt die Helligkeit (0 = aus, 1 = voll)
    ///
    /// Ohne PWM gilt: < 0.5 → aus, sonst an. Der diskrete Zustand bleibt
    /// unverändert.
    pub fn set_intensity(&mut self, level: f32) {
        let value = self.drive_mode.apply(self.intensity_mode.quantize(level));
        self.pin.set_value(value);
        self.last_flip = None;
    }

    // ------------------------------------------------------------------------
    // An / Aus / Umschalten
    // ------------------------------------------------------------------------

    pub fn on(&mut self) {
        self.drive(self.drive_mode.on_value(), LedState::On);
    }

    pub fn on_confirmed<F: FnOnce() + 'static>(&mut self, on_confirmed: F) {
        let written = self.drive(self.drive_mode.on_value(), LedState::On);
        self.confirm(written, on_confirmed);
    }

    pub fn off(&mut self) {
        self.drive(self.drive_mode.off_value(), LedState::Off);
    }

    pub fn off_confirmed<F: FnOnce() + 'static>(&mut self, on_confirmed: F) {
        let written = self.drive(self.drive_mode.off_value(), LedState::Off);
        self.confirm(written, on_confirmed);
    }

    /// Invertiert den rohen Pin-Wert
    ///
    /// Zwei Wechsel hintereinander stellen den vorherigen Wert exakt wieder
    /// her, auch für PWM-Werte wie 0.1.
    ///
    /// Ein laufendes Blinken wird vorher gestoppt (die LED ist dann aus) und
    /// anschließend umgeschaltet.
    pub fn toggle(&mut self) {
        self.flip();
    }

    pub fn toggle_confirmed<F: FnOnce() + 'static>(&mut self, on_confirmed: F) {
        let written = self.flip();
        self.confirm(written, on_confirmed);
    }

    // ------------------------------------------------------------------------
    // Blinken
    // ------------------------------------------------------------------------

    /// Startet das Blinken; ein vorheriges Blinken wird abgebrochen
    ///
    /// Der erste Wechsel passiert sofort, jeder weitere nach `interval`.
    /// Ungültige Intervalle werden zu 1000 ms.
    pub fn blink<I: Into<BlinkInterval>>(&mut self, interval: I) {
        self.start_blink(interval.into());
    }

    /// Wie [`blink`](Self::blink), mit einmaliger Bestätigung
    ///
    /// Geprüft wird gegen den Pin-Wert beim Start des Blinkens, also vor dem
    /// ersten Wechsel. Spätere Wechsel lösen den Callback nicht erneut aus.
    pub fn blink_confirmed<I, F>(&mut self, interval: I, on_confirmed: F)
    where
        I: Into<BlinkInterval>,
        F: FnOnce() + 'static,
    {
        let start = self.start_blink(interval.into());
        self.confirm(start, on_confirmed);
    }

    /// Stoppt das Blinken und schaltet die LED aus
    ///
    /// Ohne laufendes Blinken passiert nichts.
    pub fn stop_blink(&mut self) {
        if let Some(handle) = self.blink_timer.take() {
            self.scheduler.cancel(handle);
            self.interval = None;
            self.state = LedState::Off;
            trace!("LED: blink timer {} cancelled", handle.id());
            self.off();
        }
    }

    /// Setzt das Blink-Intervall; ein laufendes Blinken übernimmt es beim nächsten Wechsel
    pub fn set_interval<I: Into<BlinkInterval>>(&mut self, interval: I) {
        self.interval = Some(interval.into());
    }

    /// Muss vom Besitzer des Schedulers aufgerufen werden, wenn ein Timer abläuft
    ///
    /// Gibt `false` zurück, wenn `handle` nicht (mehr) zum aktiven Blinken
    /// gehört; der Aufruf ändert dann nichts.
    pub fn on_timer(&mut self, handle: TimerHandle) -> bool {
        if self.blink_timer != Some(handle) {
            trace!("LED: ignoring stale timer {}", handle.id());
            return false;
        }
        self.blink_next();
        true
    }

    // ------------------------------------------------------------------------
    // Befehle und Abfragen
    // ------------------------------------------------------------------------

    /// Führt einen [`LedCommand`] aus
    pub fn apply(&mut self, command: LedCommand) {
        match command {
            LedCommand::On => self.on(),
            LedCommand::Off => self.off(),
            LedCommand::Toggle => self.toggle(),
            LedCommand::Blink { interval } => self.blink(interval),
            LedCommand::StopBlink => self.stop_blink(),
            LedCommand::SetIntensity(level) => self.set_intensity(level),
        }
    }

    /// Wie [`apply`](Self::apply), mit Bestätigung für On/Off/Toggle/Blink
    ///
    /// `StopBlink` und `SetIntensity` kennen keine Bestätigung; der Callback
    /// wird dort verworfen.
    pub fn apply_confirmed<F: FnOnce() + 'static>(&mut self, command: LedCommand, on_confirmed: F) {
        match command {
            LedCommand::On => self.on_confirmed(on_confirmed),
            LedCommand::Off => self.off_confirmed(on_confirmed),
            LedCommand::Toggle => self.toggle_confirmed(on_confirmed),
            LedCommand::Blink { interval } => self.blink_confirmed(interval, on_confirmed),
            LedCommand::StopBlink | LedCommand::SetIntensity(_) => self.apply(command),
        }
    }

    pub fn state(&self) -> LedState {
        self.state
    }

    /// Aktives Blink-Intervall in Millisekunden
    pub fn interval(&self) -> Option<u32> {
        self.interval.map(BlinkInterval::as_millis)
    }

    pub fn drive_mode(&self) -> DriveMode {
        self.drive_mode
    }

    pub fn supports_pwm(&self) -> bool {
        self.intensity_mode == IntensityMode::Pwm
    }

    pub fn status(&self) -> LedStatus {
        LedStatus {
            state: self.state,
            interval_ms: self.interval(),
            intensity: self.intensity(),
            drive_mode: self.drive_mode,
        }
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    pub fn pin(&self) -> &P {
        &self.pin
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    // ------------------------------------------------------------------------
    // Intern
    // ------------------------------------------------------------------------

    /// Ein laufendes Blinken wird vor jedem direkten Befehl unterbrochen
    fn interrupt_blink(&mut self) {
        if self.state == LedState::Blinking {
            self.stop_blink();
        }
    }

    fn drive(&mut self, value: f32, state: LedState) -> f32 {
        self.interrupt_blink();
        self.pin.set_value(value);
        self.last_flip = None;
        self.state = state;
        trace!("LED: {} (pin value {})", state, value);
        value
    }

    fn flip(&mut self) -> f32 {
        self.interrupt_blink();
        let value = self.complement();
        self.pin.set_value(value);
        self.state = if self.drive_mode.apply(value) > 0.0 {
            LedState::On
        } else {
            LedState::Off
        };
        trace!("LED: toggled to {} (pin value {})", self.state, value);
        value
    }

    /// Startet das Blinken und gibt den Pin-Wert vor dem ersten Wechsel zurück
    fn start_blink(&mut self, interval: BlinkInterval) -> f32 {
        self.stop_blink();
        self.state = LedState::Blinking;
        self.interval = Some(interval);
        debug!("LED: blinking every {} ms", interval.as_millis());
        let start = self.pin.value();
        self.blink_next();
        start
    }

    /// Wechselt den Pin-Wert und plant den nächsten Wechsel
    fn blink_next(&mut self) {
        let value = self.complement();
        self.pin.set_value(value);
        let interval = self.interval.unwrap_or_default();
        self.blink_timer = Some(self.scheduler.schedule(interval));
    }

    /// Komplement des aktuellen Pin-Werts
    ///
    /// Steht noch der Wert des letzten Wechsels am Pin, wird der Wert davor
    /// zurückgegeben statt `1 - x` neu zu rechnen (f32 ist nahe 1 gröber
    /// als nahe 0).
    fn complement(&mut self) -> f32 {
        let current = self.pin.value();
        let value = match self.last_flip {
            Some((written, before)) if written == current => before,
            _ => invert(current),
        };
        self.last_flip = Some((value, current));
        value
    }

    fn confirm<F: FnOnce() + 'static>(&mut self, expected: f32, on_confirmed: F) {
        let number = self.pin.number();
        self.board.query_pin_state(
            number,
            Box::new(move |reported: PinState| {
                if reported.value == expected {
                    on_confirmed();
                }
            }),
        );
    }
}

impl<B: Board, P: Pin, S: BlinkScheduler> Drop for LedDriver<B, P, S> {
    fn drop(&mut self) {
        if let Some(handle) = self.blink_timer.take() {
            self.scheduler.cancel(handle);
        }
    }
}
