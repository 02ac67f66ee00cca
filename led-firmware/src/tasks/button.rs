// Button Task - BOOT-Button als Kommando-Quelle
use defmt::info;
use embassy_time::{Duration, Timer};
use esp_hal::gpio::Input;
use led_core::BlinkInterval;

use crate::config::{BUTTON_DEBOUNCE_MS, BUTTON_GPIO_PIN, LED_BLINK_INTERVAL_MS};
use crate::{LedCommand, LedCommandSender};

/// Reihenfolge der Kommandos pro Tastendruck
fn command_cycle() -> [LedCommand; 4] {
    [
        LedCommand::On,
        LedCommand::Blink {
            interval: BlinkInterval::from(LED_BLINK_INTERVAL_MS),
        },
        LedCommand::Toggle,
        LedCommand::Off,
    ]
}

/// Button Task - sendet bei jedem Tastendruck das nächste Kommando
///
/// Zyklus: An → Blinken → Umschalten (stoppt das Blinken) → Aus
///
/// # Parameter
/// - `button`: BOOT-Button (Pull-Up, Low-aktiv)
/// - `command_sender`: Channel Sender für LED-Kommandos
#[embassy_executor::task]
pub async fn button_task(mut button: Input<'static>, command_sender: LedCommandSender) {
    let commands = command_cycle();
    let mut next = 0;

    info!("Button: GPIO{} ready", BUTTON_GPIO_PIN);

    loop {
        button.wait_for_falling_edge().await;

        let command = commands[next];
        next = (next + 1) % commands.len();
        info!("Button: pressed, sending {}", command);
        command_sender.send(command).await;

        // Entprellen und auf Loslassen warten
        Timer::after(Duration::from_millis(BUTTON_DEBOUNCE_MS)).await;
        button.wait_for_high().await;
    }
}
