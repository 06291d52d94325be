/// Countdown polled once per tick.
///
/// Multi-frame gameplay behavior (attack windows, dash duration, input
/// buffering) is expressed as one of these stored on the owner and advanced
/// by the owning tick, never as a sleep.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Countdown {
    duration: f32,
    remaining: f32,
    running: bool,
}

impl Countdown {
    /// A stopped countdown of `duration` seconds.
    pub fn new(duration: f32) -> Self {
        debug_assert!(duration >= 0.0, "negative countdown duration {duration}");
        let duration = duration.max(0.0);
        Self {
            duration,
            remaining: duration,
            running: false,
        }
    }

    /// A countdown already running.
    pub fn started(duration: f32) -> Self {
        let mut c = Self::new(duration);
        c.start();
        c
    }

    /// (Re)starts from the full duration.
    pub fn start(&mut self) {
        self.remaining = self.duration;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Advance by `dt`. Returns true on the tick the countdown reaches zero.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.running {
            return false;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            self.running = false;
            return true;
        }
        false
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Elapsed share of the duration in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            1.0 - self.remaining / self.duration
        }
    }
}
