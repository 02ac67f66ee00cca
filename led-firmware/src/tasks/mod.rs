// Task-Modul: Enthält alle Embassy Tasks
//
// Jeder Task läuft asynchron und unabhängig.
// Tasks kommunizieren über einen Embassy Channel (Button → LED).

pub mod button;
pub mod led;

// Re-export Tasks für einfachen Import
pub use button::button_task;
pub use led::led_task;
