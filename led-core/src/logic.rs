//! Pure Business Logic Functions
//!
//! Funktionen ohne Hardware-Dependencies (testbar!)

/// Schwelle für Pins ohne PWM: darunter aus, ab hier an
pub const BINARY_THRESHOLD: f32 = 0.5;

/// Standard-Blinkintervall in Millisekunden
pub const DEFAULT_BLINK_INTERVAL_MS: u32 = 1000;

/// Invertiert einen normalisierten Pin-Wert (`1 - value`)
///
/// Wird für SYNC-Drive und für jeden Blink-Flip verwendet.
///
/// # Beispiele
///
/// ```
/// # use led_core::logic::invert;
/// assert_eq!(invert(0.0), 1.0);
/// assert_eq!(invert(0.25), 0.75);
/// ```
pub fn invert(value: f32) -> f32 {
    1.0 - value
}

/// Quantisiert einen Wert auf {0, 1} (Schwellwert, keine Rundung)
pub fn threshold(value: f32) -> f32 {
    if value >= BINARY_THRESHOLD { 1.0 } else { 0.0 }
}

/// Begrenzt einen Wert auf [0, 1]; NaN wird zu 0
pub fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Normalisiert ein Intervall: alles ≤ 0 wird zum Standardwert
pub fn normalize_interval(ms: i64) -> u32 {
    if ms <= 0 {
        DEFAULT_BLINK_INTERVAL_MS
    } else {
        u32::try_from(ms).unwrap_or(u32::MAX)
    }
}

/// Liest die führende Ganzzahl aus einem Text
///
/// Führende Leerzeichen und ein Vorzeichen sind erlaubt, alles nach der
/// letzten Ziffer wird ignoriert (`"250ms"` → 250). Ohne Ziffer: `None`.
pub fn parse_leading_int(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for byte in digits.bytes() {
        if !byte.is_ascii_digit() {
            break;
        }
        seen_digit = true;
        value = value
            .saturating_mul(10)
            .saturating_add(i64::from(byte - b'0'));
    }

    if !seen_digit {
        return None;
    }
    Some(if negative { -value } else { value })
}
