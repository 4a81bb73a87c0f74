use std::time::Instant;

/// Simulation tick interval, fixed at 60 updates per second.
pub const TICK_INTERVAL: f64 = 1.0 / 60.0;

/// Monotonic time source consumed by the game loop.
pub trait Clock {
    /// Seconds since an arbitrary fixed origin. Must never decrease.
    fn now(&self) -> f64;
}

pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Two cadences over one clock: a fixed-interval simulation tick and a
/// per-iteration render counter feeding a 1-second FPS window.
pub struct FramePacer {
    last_update: f64,
    fps_window_start: f64,
    frames_in_window: u32,
    fps: u32,
}

impl FramePacer {
    pub fn new(now: f64) -> Self {
        Self {
            last_update: now,
            fps_window_start: now,
            frames_in_window: 0,
            fps: 0,
        }
    }

    /// True when a simulation tick is due; advances the reference time.
    pub fn poll_update(&mut self, now: f64) -> bool {
        if now - self.last_update >= TICK_INTERVAL {
            self.last_update = now;
            return true;
        }
        false
    }

    /// Count one presented frame; the FPS metric refreshes once per second.
    pub fn frame_presented(&mut self, now: f64) {
        self.frames_in_window += 1;
        if now - self.fps_window_start >= 1.0 {
            self.fps = self.frames_in_window;
            self.frames_in_window = 0;
            self.fps_window_start = now;
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

/// Emits one pulse per elapsed wall-clock second; drives the match timer.
pub struct SecondTicker {
    last_mark: f64,
}

impl SecondTicker {
    pub fn new(now: f64) -> Self {
        Self { last_mark: now }
    }

    pub fn poll(&mut self, now: f64) -> bool {
        if now - self.last_mark >= 1.0 {
            self.last_mark = now;
            return true;
        }
        false
    }

    pub fn reset(&mut self, now: f64) {
        self.last_mark = now;
    }
}
