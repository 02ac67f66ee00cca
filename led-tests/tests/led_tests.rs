//! Integration Tests für den LED-Treiber
//!
//! Diese Tests laufen auf dem Host (x86_64) und nutzen Mock-Implementierungen
//! für Pin, Board und Scheduler.

use std::cell::Cell;
use std::rc::Rc;

use led_core::{
    BlinkInterval, BlinkScheduler, Board, DriveMode, LedCommand, LedDriver, LedError, LedState,
    Pin, PinMode, PinState, PinStateCallback, TimerHandle,
};

const LED_PIN: u8 = 13;

// ============================================================================
// Mock Pin
// ============================================================================

pub struct MockPin {
    pub number: u8,
    pub pwm: bool,
    pub value: f32,
    /// Alle geschriebenen Werte in Reihenfolge
    pub writes: Vec<f32>,
}

impl MockPin {
    pub fn digital() -> Self {
        Self {
            number: LED_PIN,
            pwm: false,
            value: 0.0,
            writes: Vec::new(),
        }
    }

    pub fn pwm() -> Self {
        Self {
            pwm: true,
            ..Self::digital()
        }
    }
}

impl Pin for MockPin {
    fn number(&self) -> u8 {
        self.number
    }

    fn supports(&self, capability: PinMode) -> bool {
        match capability {
            PinMode::DigitalOutput => true,
            PinMode::Pwm => self.pwm,
        }
    }

    fn value(&self) -> f32 {
        self.value
    }

    fn set_value(&mut self, value: f32) {
        self.value = value;
        self.writes.push(value);
    }

    fn state(&self) -> f32 {
        self.value
    }
}

// ============================================================================
// Mock Board
// ============================================================================

#[derive(Default)]
pub struct MockBoard {
    pub pin_modes: Vec<(u8, PinMode)>,
    pub pending: Vec<(u8, PinStateCallback)>,
    pub query_count: usize,
}

impl MockBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simuliert die Antwort des Boards auf alle offenen Abfragen für den Pin
    pub fn respond(&mut self, state: PinState) -> usize {
        let (matching, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|(number, _)| *number == state.number);
        self.pending = rest;

        let answered = matching.len();
        for (_, on_result) in matching {
            on_result(state);
        }
        answered
    }
}

impl Board for MockBoard {
    fn set_digital_pin_mode(&mut self, pin: u8, mode: PinMode) {
        self.pin_modes.push((pin, mode));
    }

    fn query_pin_state(&mut self, pin: u8, on_result: PinStateCallback) {
        self.query_count += 1;
        self.pending.push((pin, on_result));
    }
}

// ============================================================================
// Mock Scheduler
// ============================================================================

#[derive(Default)]
pub struct MockScheduler {
    next_id: u32,
    /// Alle gestarteten Timer mit Intervall (ms)
    pub armed: Vec<(TimerHandle, u32)>,
    pub cancelled: Vec<TimerHandle>,
}

impl MockScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zuletzt gestarteter Timer
    pub fn last_armed(&self) -> Option<TimerHandle> {
        self.armed.last().map(|(handle, _)| *handle)
    }

    pub fn last_interval(&self) -> Option<u32> {
        self.armed.last().map(|(_, ms)| *ms)
    }
}

impl BlinkScheduler for MockScheduler {
    fn schedule(&mut self, after: BlinkInterval) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle::new(self.next_id);
        self.armed.push((handle, after.as_millis()));
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.cancelled.push(handle);
    }
}

// ============================================================================
// Helpers
// ============================================================================

type MockLed = LedDriver<MockBoard, MockPin, MockScheduler>;

fn led(pin: MockPin, drive_mode: DriveMode) -> MockLed {
    LedDriver::new(MockBoard::new(), pin, MockScheduler::new(), drive_mode)
}

/// Lässt den aktiven Blink-Timer ablaufen
fn fire(led: &mut MockLed) -> bool {
    let handle = led.scheduler().last_armed().expect("no timer armed");
    led.on_timer(handle)
}

/// Board meldet den aktuellen Pin-Wert zurück
fn report_pin(led: &mut MockLed) -> usize {
    let state = PinState {
        number: led.pin().number(),
        value: led.pin().state(),
    };
    led.board_mut().respond(state)
}

fn counter() -> (Rc<Cell<u32>>, impl FnOnce() + 'static) {
    let count = Rc::new(Cell::new(0));
    let handle = Rc::clone(&count);
    (count, move || handle.set(handle.get() + 1))
}

// ============================================================================
// Tests: Konstruktion
// ============================================================================

#[test]
fn test_construct_pwm_pin_configures_pwm_mode() {
    let led = led(MockPin::pwm(), DriveMode::Source);

    assert!(led.supports_pwm());
    assert_eq!(led.board().pin_modes, vec![(LED_PIN, PinMode::Pwm)]);
    assert_eq!(led.state(), LedState::Off);
    assert_eq!(led.interval(), None);
}

#[test]
fn test_construct_digital_pin_configures_digital_output() {
    let led = led(MockPin::digital(), DriveMode::Sync);

    assert!(!led.supports_pwm());
    assert_eq!(led.board().pin_modes, vec![(LED_PIN, PinMode::DigitalOutput)]);
    assert!(led.pin().writes.is_empty());
}

#[test]
fn test_try_new_invalid_drive_mode_does_not_touch_board() {
    let mut board = MockBoard::new();
    let mut pin = MockPin::digital();
    let mut scheduler = MockScheduler::new();

    let result = LedDriver::try_new(&mut board, &mut pin, &mut scheduler, 5u8);

    assert_eq!(result.err(), Some(LedError::InvalidDriveMode(5)));
    assert!(board.pin_modes.is_empty());
}

#[test]
fn test_try_new_accepts_codes_names_and_modes() {
    let from_code = LedDriver::try_new(
        MockBoard::new(),
        MockPin::digital(),
        MockScheduler::new(),
        1u8,
    )
    .unwrap();
    assert_eq!(from_code.drive_mode(), DriveMode::Sync);

    let from_name = LedDriver::try_new(
        MockBoard::new(),
        MockPin::digital(),
        MockScheduler::new(),
        "source",
    )
    .unwrap();
    assert_eq!(from_name.drive_mode(), DriveMode::Source);

    let typed = LedDriver::try_new(
        MockBoard::new(),
        MockPin::digital(),
        MockScheduler::new(),
        DriveMode::Sync,
    )
    .unwrap();
    assert_eq!(typed.drive_mode(), DriveMode::Sync);

    let unknown = LedDriver::try_new(
        MockBoard::new(),
        MockPin::digital(),
        MockScheduler::new(),
        "sink",
    );
    assert_eq!(unknown.err(), Some(LedError::UnknownDriveMode));
}

// ============================================================================
// Tests: An / Aus / Umschalten
// ============================================================================

#[test]
fn test_on_off_write_drive_mode_values() {
    for mode in [DriveMode::Source, DriveMode::Sync] {
        let mut led = led(MockPin::digital(), mode);

        led.on();
        assert_eq!(led.pin().value, mode.on_value());
        assert_eq!(led.state(), LedState::On);

        led.off();
        assert_eq!(led.pin().value, mode.off_value());
        assert_eq!(led.state(), LedState::Off);
    }
}

#[test]
fn test_double_toggle_restores_raw_value() {
    for start in [0.0, 1.0] {
        let mut pin = MockPin::digital();
        pin.value = start;
        let mut led = led(pin, DriveMode::Source);

        led.toggle();
        assert_eq!(led.pin().value, 1.0 - start);
        led.toggle();
        assert_eq!(led.pin().value, start);
    }

    for start in [0.25f32, 0.1, 0.3, 0.7] {
        let mut pin = MockPin::pwm();
        pin.value = start;
        let mut led = led(pin, DriveMode::Source);
        led.toggle();
        led.toggle();
        assert_eq!(led.pin().value, start);
    }
}

#[test]
fn test_double_toggle_restores_pwm_intensity() {
    let mut led = led(MockPin::pwm(), DriveMode::Source);
    led.set_intensity(0.1);
    assert_eq!(led.intensity(), 0.1);

    led.toggle();
    led.toggle();
    assert_eq!(led.intensity(), 0.1);

    // Ein Blink-Zyklus (zwei Wechsel) landet ebenfalls exakt beim Startwert
    led.set_intensity(0.1);
    led.blink(100u32);
    fire(&mut led);
    assert_eq!(led.pin().value, 0.1);
}

#[test]
fn test_toggle_state_follows_logical_level() {
    let mut source = led(MockPin::digital(), DriveMode::Source);
    source.off();
    source.toggle();
    assert_eq!(source.pin().value, 1.0);
    assert_eq!(source.state(), LedState::On);

    let mut sync = led(MockPin::digital(), DriveMode::Sync);
    sync.off();
    sync.toggle();
    assert_eq!(sync.pin().value, 0.0);
    assert_eq!(sync.state(), LedState::On);
    sync.toggle();
    assert_eq!(sync.pin().value, 1.0);
    assert_eq!(sync.state(), LedState::Off);
}

// ============================================================================
// Tests: Helligkeit
// ============================================================================

#[test]
fn test_intensity_binary_pin_thresholds() {
    let cases = [(0.0, 0.0), (0.2, 0.0), (0.49, 0.0), (0.5, 1.0), (0.7, 1.0), (1.0, 1.0)];

    for (level, expected) in cases {
        let mut source = led(MockPin::digital(), DriveMode::Source);
        source.set_intensity(level);
        assert_eq!(source.intensity(), expected, "source, level {level}");

        let mut sync = led(MockPin::digital(), DriveMode::Sync);
        sync.set_intensity(level);
        assert_eq!(sync.intensity(), 1.0 - expected, "sync, level {level}");
    }
}

#[test]
fn test_intensity_pwm_pin_is_continuous() {
    let mut source = led(MockPin::pwm(), DriveMode::Source);
    source.set_intensity(0.25);
    assert_eq!(source.intensity(), 0.25);

    let mut sync = led(MockPin::pwm(), DriveMode::Sync);
    sync.set_intensity(0.25);
    // Getter liefert den rohen Pin-Wert
    assert_eq!(sync.intensity(), 0.75);

    source.set_intensity(3.0);
    assert_eq!(source.intensity(), 1.0);
}

#[test]
fn test_set_intensity_keeps_state() {
    let mut led = led(MockPin::pwm(), DriveMode::Source);
    led.on();
    led.set_intensity(0.0);

    assert_eq!(led.state(), LedState::On);
    assert_eq!(led.intensity(), 0.0);
}

// ============================================================================
// Tests: Blinken
// ============================================================================

#[test]
fn test_blink_flips_immediately_and_arms_timer() {
    let mut led = led(MockPin::digital(), DriveMode::Source);

    led.blink(200u32);

    assert_eq!(led.state(), LedState::Blinking);
    assert_eq!(led.interval(), Some(200));
    assert_eq!(led.pin().value, 1.0);
    assert_eq!(led.scheduler().armed.len(), 1);
    assert_eq!(led.scheduler().last_interval(), Some(200));
}

#[test]
fn test_blink_timer_flips_and_rearms() {
    let mut led = led(MockPin::digital(), DriveMode::Source);
    led.blink(100u32);

    assert!(fire(&mut led));
    assert_eq!(led.pin().value, 0.0);
    assert!(fire(&mut led));
    assert_eq!(led.pin().value, 1.0);

    assert_eq!(led.scheduler().armed.len(), 3);
    assert!(led.scheduler().cancelled.is_empty());
    assert_eq!(led.state(), LedState::Blinking);
}

#[test]
fn test_set_interval_applies_on_next_rearm() {
    let mut led = led(MockPin::digital(), DriveMode::Source);
    led.blink(100u32);

    led.set_interval(40u32);
    assert_eq!(led.interval(), Some(40));
    fire(&mut led);
    assert_eq!(led.scheduler().last_interval(), Some(40));

    led.set_interval("nope");
    fire(&mut led);
    assert_eq!(led.scheduler().last_interval(), Some(1000));
}

#[test]
fn test_reblink_leaves_exactly_one_active_timer() {
    let mut led = led(MockPin::digital(), DriveMode::Source);

    led.blink(100u32);
    let first = led.scheduler().last_armed().unwrap();
    led.blink(300u32);
    led.blink(500u32);

    let scheduler = led.scheduler();
    assert_eq!(scheduler.cancelled.len(), scheduler.armed.len() - 1);
    assert!(scheduler.cancelled.contains(&first));
    assert_eq!(led.interval(), Some(500));

    // Alter Handle ist ungültig
    assert!(!led.on_timer(first));
}

#[test]
fn test_stop_blink_always_ends_at_off_value() {
    for mode in [DriveMode::Source, DriveMode::Sync] {
        for flips in 0..4 {
            let mut led = led(MockPin::digital(), mode);
            led.blink(50u32);
            for _ in 0..flips {
                fire(&mut led);
            }

            led.stop_blink();

            assert_eq!(led.pin().value, mode.off_value(), "{mode:?} after {flips} flips");
            assert_eq!(led.state(), LedState::Off);
            assert_eq!(led.interval(), None);
        }
    }
}

#[test]
fn test_stop_blink_without_blink_is_noop() {
    let mut led = led(MockPin::digital(), DriveMode::Source);
    led.on();
    let writes = led.pin().writes.len();

    led.stop_blink();

    assert_eq!(led.pin().writes.len(), writes);
    assert_eq!(led.state(), LedState::On);
    assert!(led.scheduler().cancelled.is_empty());
}

#[test]
fn test_stale_timer_after_stop_is_ignored() {
    let mut led = led(MockPin::digital(), DriveMode::Source);
    led.blink(50u32);
    let handle = led.scheduler().last_armed().unwrap();
    led.stop_blink();

    assert!(!led.on_timer(handle));
    assert_eq!(led.pin().value, 0.0);
    assert_eq!(led.scheduler().armed.len(), 1);
}

#[test]
fn test_blink_invalid_intervals_default_to_1000() {
    let mut led = led(MockPin::digital(), DriveMode::Source);

    led.blink(0i32);
    assert_eq!(led.interval(), Some(1000));
    led.blink(-5i32);
    assert_eq!(led.interval(), Some(1000));
    led.blink("abc");
    assert_eq!(led.interval(), Some(1000));
    assert_eq!(led.scheduler().last_interval(), Some(1000));

    led.blink("250");
    assert_eq!(led.interval(), Some(250));
}

#[test]
fn test_direct_commands_interrupt_blink() {
    let mut led = led(MockPin::digital(), DriveMode::Source);

    led.blink(100u32);
    led.on();
    assert_eq!(led.state(), LedState::On);
    assert_eq!(led.pin().value, 1.0);
    assert_eq!(led.scheduler().cancelled.len(), 1);
    assert_eq!(led.interval(), None);

    led.blink(100u32);
    led.off();
    assert_eq!(led.state(), LedState::Off);
    assert_eq!(led.scheduler().cancelled.len(), 2);

    // Toggle stoppt (LED aus) und schaltet dann um
    led.blink(100u32);
    led.toggle();
    assert_eq!(led.state(), LedState::On);
    assert_eq!(led.pin().value, 1.0);
    assert_eq!(led.scheduler().cancelled.len(), 3);
}

#[test]
fn test_drop_cancels_active_blink() {
    let mut board = MockBoard::new();
    let mut pin = MockPin::digital();
    let mut scheduler = MockScheduler::new();

    {
        let mut led = LedDriver::new(&mut board, &mut pin, &mut scheduler, DriveMode::Source);
        led.blink(100u32);
    }

    assert_eq!(scheduler.armed.len(), 1);
    assert_eq!(scheduler.cancelled, vec![scheduler.armed[0].0]);
}

// ============================================================================
// Tests: Bestätigung
// ============================================================================

#[test]
fn test_confirmation_fires_after_matching_report() {
    let mut led = led(MockPin::digital(), DriveMode::Source);
    let (count, callback) = counter();

    led.on_confirmed(callback);

    assert_eq!(count.get(), 0);
    assert_eq!(led.board().query_count, 1);
    assert_eq!(report_pin(&mut led), 1);
    assert_eq!(count.get(), 1);
}

#[test]
fn test_confirmation_never_fires_on_mismatch() {
    let mut led = led(MockPin::digital(), DriveMode::Source);
    let (count, callback) = counter();

    led.off_confirmed(callback);
    led.board_mut().respond(PinState {
        number: LED_PIN,
        value: 1.0,
    });

    assert_eq!(count.get(), 0);
    assert!(led.board().pending.is_empty());
}

#[test]
fn test_confirmation_without_response_never_fires() {
    let mut led = led(MockPin::digital(), DriveMode::Sync);
    let (count, callback) = counter();

    led.toggle_confirmed(callback);
    led.off();

    assert_eq!(count.get(), 0);
    assert_eq!(led.board().pending.len(), 1);
}

#[test]
fn test_overlapping_confirmation_sees_later_state() {
    let mut led = led(MockPin::digital(), DriveMode::Source);
    let (on_count, on_callback) = counter();
    let (off_count, off_callback) = counter();

    led.on_confirmed(on_callback);
    led.off_confirmed(off_callback);
    report_pin(&mut led);

    // Der Pin steht bereits auf "aus": nur die zweite Bestätigung passt
    assert_eq!(on_count.get(), 0);
    assert_eq!(off_count.get(), 1);
}

#[test]
fn test_blink_confirmation_fires_once() {
    let mut led = led(MockPin::digital(), DriveMode::Source);
    let (count, callback) = counter();

    // Geprüft wird gegen den Wert beim Blink-Start (0.0), nicht nach dem Wechsel
    led.blink_confirmed(100u32, callback);
    assert_eq!(led.pin().value, 1.0);
    let start = PinState {
        number: LED_PIN,
        value: 0.0,
    };
    assert_eq!(led.board_mut().respond(start), 1);
    assert_eq!(count.get(), 1);

    fire(&mut led);
    fire(&mut led);
    assert_eq!(led.board().query_count, 1);
    assert_eq!(led.board_mut().respond(start), 0);
    assert_eq!(count.get(), 1);
}

#[test]
fn test_blink_confirmation_ignores_flipped_value() {
    let mut led = led(MockPin::digital(), DriveMode::Source);
    let (count, callback) = counter();

    led.blink_confirmed(100u32, callback);
    // Der Pin steht nach dem ersten Wechsel auf 1.0: keine Bestätigung
    assert_eq!(report_pin(&mut led), 1);
    assert_eq!(count.get(), 0);
}

// ============================================================================
// Tests: LedCommand / Status
// ============================================================================

#[test]
fn test_apply_commands() {
    let mut led = led(MockPin::pwm(), DriveMode::Sync);

    led.apply(LedCommand::try_from("on").unwrap());
    assert_eq!(led.state(), LedState::On);

    led.apply(LedCommand::try_from("blink:300").unwrap());
    assert_eq!(led.interval(), Some(300));

    led.apply(LedCommand::StopBlink);
    assert_eq!(led.state(), LedState::Off);

    led.apply(LedCommand::SetIntensity(0.25));
    assert_eq!(led.intensity(), 0.75);
}

#[test]
fn test_apply_confirmed_stop_blink_drops_callback() {
    let mut led = led(MockPin::digital(), DriveMode::Source);
    let (count, callback) = counter();

    led.blink(100u32);
    led.apply_confirmed(LedCommand::StopBlink, callback);

    assert_eq!(led.board().query_count, 0);
    assert_eq!(count.get(), 0);
}

#[test]
fn test_status_snapshot() {
    let mut led = led(MockPin::digital(), DriveMode::Sync);
    led.blink(200u32);

    let status = led.status();
    assert_eq!(status.state, LedState::Blinking);
    assert_eq!(status.interval_ms, Some(200));
    assert_eq!(status.intensity, led.intensity());
    assert_eq!(status.drive_mode, DriveMode::Sync);
}

// ============================================================================
// Tests: End-to-End
// ============================================================================

#[test]
fn test_sync_drive_digital_pin_scenario() {
    let mut led = led(MockPin::digital(), DriveMode::Sync);

    led.on();
    assert_eq!(led.pin().value, 0.0);

    led.blink(200u32);
    assert_eq!(led.state(), LedState::Blinking);
    assert_eq!(led.interval(), Some(200));

    led.stop_blink();
    assert_eq!(led.state(), LedState::Off);
    assert_eq!(led.pin().value, 1.0);
}
