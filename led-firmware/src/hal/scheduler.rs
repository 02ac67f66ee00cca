// Embassy-Timer als led-core BlinkScheduler
//
// Hält höchstens eine Deadline. Der LED-Task wartet mit `expired()` darauf
// und meldet den Handle per `LedDriver::on_timer` zurück.

use core::future::pending;

use defmt::trace;
use embassy_time::{Duration, Instant, Timer};
use led_core::{BlinkInterval, BlinkScheduler, TimerHandle};

/// Einmal-Timer auf Basis von embassy-time
pub struct EmbassyScheduler {
    next_id: u32,
    deadline: Option<(TimerHandle, Instant)>,
}

impl EmbassyScheduler {
    pub const fn new() -> Self {
        Self {
            next_id: 0,
            deadline: None,
        }
    }

    /// Wartet bis der aktive Timer abläuft; ohne Timer wartet es für immer
    pub async fn expired(&self) -> TimerHandle {
        match self.deadline {
            Some((handle, at)) => {
                Timer::at(at).await;
                handle
            }
            None => pending().await,
        }
    }

    /// Markiert einen Timer als abgelaufen (vor `LedDriver::on_timer` aufrufen)
    pub fn expire(&mut self, handle: TimerHandle) {
        if matches!(self.deadline, Some((active, _)) if active == handle) {
            self.deadline = None;
        }
    }
}

impl Default for EmbassyScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl BlinkScheduler for EmbassyScheduler {
    fn schedule(&mut self, after: BlinkInterval) -> TimerHandle {
        self.next_id = self.next_id.wrapping_add(1);
        let handle = TimerHandle::new(self.next_id);
        let at = Instant::now() + Duration::from_millis(u64::from(after.as_millis()));
        self.deadline = Some((handle, at));
        trace!("Scheduler: timer {} armed ({} ms)", handle.id(), after.as_millis());
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        trace!("Scheduler: timer {} cancelled", handle.id());
        self.expire(handle);
    }
}
