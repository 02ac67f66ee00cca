// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen

// ============================================================================
// LED Konfiguration
// ============================================================================

/// GPIO-Pin für die LED
/// Muss zum Peripheral in main.rs passen (peripherals.GPIO15)
pub const LED_GPIO_PIN: u8 = 15;

/// Verdrahtung der LED: "source" (leuchtet bei High) oder "sync" (leuchtet bei Low)
/// Wird zur Build-Zeit aus der Environment Variable LED_DRIVE_MODE geladen
/// Ungültige Werte lassen den LED-Treiber beim Start scheitern
pub const LED_DRIVE_MODE: &str = match option_env!("LED_DRIVE_MODE") {
    Some(mode) => mode,
    None => "source",
};

/// Blink-Intervall in Millisekunden (als Text, wird vom Treiber normalisiert)
/// Wird zur Build-Zeit aus der Environment Variable LED_BLINK_INTERVAL_MS geladen
/// Nicht-numerische Werte oder Werte ≤ 0 werden zu 1000 ms
pub const LED_BLINK_INTERVAL_MS: &str = match option_env!("LED_BLINK_INTERVAL_MS") {
    Some(interval) => interval,
    None => "500",
};

/// Maximale Anzahl offener Pin-Zustands-Abfragen (Bestätigungen)
/// Weitere Abfragen werden verworfen, ihr Callback feuert nie
pub const PENDING_QUERY_CAPACITY: usize = 8;

// ============================================================================
// Button Konfiguration
// ============================================================================

/// GPIO-Pin des BOOT-Buttons (ESP32-C6 DevKit: GPIO9, Low-aktiv)
pub const BUTTON_GPIO_PIN: u8 = 9;

/// Entprell-Zeit nach einem Tastendruck in Millisekunden
pub const BUTTON_DEBOUNCE_MS: u64 = 50;

// ============================================================================
// System Konfiguration
// ============================================================================

/// Kapazität des Command-Channels (Button → LED Task)
pub const COMMAND_CHANNEL_CAPACITY: usize = 4;

/// Heap-Größe (Bytes) für Bestätigungs-Callbacks
pub const HEAP_SIZE: usize = 16384; // 16 KB
