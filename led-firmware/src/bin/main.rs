// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Heap Allocator (Bestätigungs-Callbacks liegen im Heap)
extern crate alloc;

// Embassy Async Runtime
use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::gpio::{Input, InputConfig, Level, Output, OutputConfig, Pull};
use esp_hal::timer::timg::TimerGroup;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

use defmt::info;

// Projekt-Module und Konfiguration
use led_firmware::config::{HEAP_SIZE, LED_DRIVE_MODE, LED_GPIO_PIN};
use led_firmware::hal::{EmbassyScheduler, EspBoard, GpioPin};
use led_firmware::tasks::{button_task, led_task};
use led_firmware::{FirmwareLed, LedCommandChannel};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Initialisiert Hardware, startet Embassy Runtime, konstruiert den
/// LED-Treiber und spawnt die Tasks. Danach schläft main().
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // ESP32-C6 Konfiguration: CPU auf maximale Taktfrequenz (160 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Heap Allocator initialisieren (für Box<dyn FnOnce> der Bestätigungen)
    esp_alloc::heap_allocator!(size: HEAP_SIZE);

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    // LED-Pin als digitaler Ausgang (GPIO15 = LED_GPIO_PIN)
    let output = Output::new(peripherals.GPIO15, Level::Low, OutputConfig::default());
    let pin = GpioPin::new(output, LED_GPIO_PIN);

    // LED-Treiber konstruieren - ungültiger Drive-Mode bricht hier ab,
    // bevor der Pin am Board konfiguriert wird
    let led: FirmwareLed = FirmwareLed::try_new(
        EspBoard::new(),
        pin,
        EmbassyScheduler::new(),
        LED_DRIVE_MODE,
    )
    .expect("LED_DRIVE_MODE must be \"source\" or \"sync\"");

    // BOOT-Button (GPIO9, Low-aktiv)
    let button = Input::new(
        peripherals.GPIO9,
        InputConfig::default().with_pull(Pull::Up),
    );

    // LED Command-Channel erstellen (Button → LED)
    static COMMAND_CHANNEL: static_cell::StaticCell<LedCommandChannel> =
        static_cell::StaticCell::new();
    let command_channel = COMMAND_CHANNEL.init(LedCommandChannel::new());

    // Spawn LED Task (besitzt den Treiber)
    spawner
        .spawn(led_task(led, command_channel.receiver()))
        .unwrap();

    // Spawn Button Task
    spawner
        .spawn(button_task(button, command_channel.sender()))
        .unwrap();

    info!("Main: tasks running, drive mode {}", LED_DRIVE_MODE);

    // Main-Loop: schläft (alle Arbeit läuft in Tasks)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
