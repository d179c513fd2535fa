use std::{
    num::NonZeroU32,
    sync::{Mutex, PoisonError},
    thread,
    time::{Duration, Instant},
};

/// Spaces calls evenly so that no more than a fixed number are admitted per
/// second.
///
/// Unlike a token bucket, the gate never lets a burst through after an idle
/// period: consecutive admissions are always at least `1s / rate` apart.
/// Each caller reserves its slot under a lock and then sleeps outside of it,
/// so the admission schedule is strictly increasing and every waiter is
/// eventually admitted.
#[derive(Debug)]
pub struct RateGate {
    interval: Duration,
    next: Mutex<Option<Instant>>,
}

impl RateGate {
    /// Create a gate admitting `per_second` calls per second.
    pub fn new(per_second: NonZeroU32) -> Self {
        Self {
            interval: Duration::from_secs(1) / per_second.get(),
            next: Mutex::new(None),
        }
    }

    /// The minimum spacing between two admissions.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Block until the next admissible slot, and return the instant the
    /// caller was admitted at.
    pub fn take(&self) -> Instant {
        let (now, slot) = {
            // The schedule is a single instant, so a panic while holding the
            // lock cannot leave it inconsistent.
            let mut next = self.next.lock().unwrap_or_else(PoisonError::into_inner);
            let now = Instant::now();
            let slot = match *next {
                Some(t) if t > now => t,
                _ => now,
            };

            *next = Some(slot + self.interval);
            (now, slot)
        };

        if slot > now {
            thread::sleep(slot - now);
        }

        slot
    }
}
