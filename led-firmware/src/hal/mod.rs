// Hardware Abstraction Layer (HAL) Module
//
// Implementiert die Traits aus led-core (Pin, Board, BlinkScheduler)
// für ESP32-C6 GPIOs und den Embassy-Timer.

pub mod board;
pub mod pin;
pub mod scheduler;

pub use board::EspBoard;
pub use pin::GpioPin;
pub use scheduler::EmbassyScheduler;
