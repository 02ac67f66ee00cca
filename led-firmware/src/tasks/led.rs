// LED Task - Führt LED-Kommandos aus und treibt das Blinken
use defmt::{debug, info};
use embassy_futures::select::{Either, select};
use led_core::{Pin, PinState};

use crate::{FirmwareLed, LedCommandReceiver};

/// LED Logic - Event-Loop um den LED-Treiber
///
/// Wartet gleichzeitig auf:
/// - den Blink-Timer des Schedulers (nächster Wechsel)
/// - neue Kommandos aus dem Command-Channel
///
/// Nach jedem Ereignis beantwortet das Board offene Pin-Abfragen mit dem
/// zurückgelesenen Pegel, wodurch Bestätigungs-Callbacks feuern.
///
/// # Parameter
/// - `led`: fertig konstruierter LED-Treiber
/// - `command_receiver`: Channel Receiver für Kommandos
pub async fn led_logic(mut led: FirmwareLed, command_receiver: LedCommandReceiver) -> ! {
    info!(
        "LED: pin {} ready ({}, pwm: {})",
        led.pin().number(),
        led.drive_mode(),
        led.supports_pwm()
    );
    if let Some((number, mode)) = led.board().pin_mode() {
        debug!("Board: pin {} configured as {}", number, mode);
    }

    // Definierter Startzustand: LED aus
    led.off();

    loop {
        let event = select(led.scheduler().expired(), command_receiver.receive()).await;

        match event {
            Either::First(handle) => {
                led.scheduler_mut().expire(handle);
                led.on_timer(handle);
            }
            Either::Second(command) => {
                info!("Command received: {}", command);
                led.apply_confirmed(command, move || info!("LED: {} confirmed", command));
                info!("LED: {}", led.status());
            }
        }

        answer_pin_queries(&mut led);
    }
}

/// Liest den Pegel zurück und beantwortet offene Abfragen des Boards
fn answer_pin_queries(led: &mut FirmwareLed) {
    if !led.board().has_pending() {
        return;
    }

    let state = PinState {
        number: led.pin().number(),
        value: led.pin().state(),
    };
    let answered = led.board_mut().respond(state);
    debug!("Board: answered {} queries (pin value {})", answered, state.value);
}

/// LED Task - Embassy Task für parallele Ausführung
///
/// # Parameter
/// - `led`: LED-Treiber (Board, GPIO-Pin und Scheduler sind darin enthalten)
/// - `command_receiver`: Channel Receiver für Kommandos
#[embassy_executor::task]
pub async fn led_task(led: FirmwareLed, command_receiver: LedCommandReceiver) {
    led_logic(led, command_receiver).await
}
