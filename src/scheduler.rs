//! Frame scheduling
//!
//! The host calls `on_frame` from its display callback with a timestamp; the
//! scheduler answers how many fixed ticks to simulate before painting. Time
//! comes from a `Clock` so tests can drive frames without waiting.

use std::cell::Cell;

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, TICK_MS};

/// Slack for timestamps that land a hair under a tick boundary
const EPSILON_MS: f64 = 1e-6;

/// Millisecond time source
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Clock advanced by hand
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Wall clock relative to construction
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub struct SystemClock {
    start: std::time::Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

/// How often an effect simulates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cadence {
    /// Fixed 60 Hz ticks caught up from the display callback
    DisplayRate,
    /// At most one tick per interval (expensive per-cell effects)
    Throttled { interval_ms: f64 },
}

#[derive(Debug, Clone)]
pub struct FrameScheduler {
    cadence: Cadence,
    accumulator_ms: f64,
    last_frame_ms: Option<f64>,
    last_tick_ms: Option<f64>,
    ticks: u64,
}

impl FrameScheduler {
    pub fn new(cadence: Cadence) -> Self {
        Self {
            cadence,
            accumulator_ms: 0.0,
            last_frame_ms: None,
            last_tick_ms: None,
            ticks: 0,
        }
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    /// Ticks granted so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Ticks to run for a display frame at `now_ms`
    pub fn on_frame(&mut self, now_ms: f64) -> u32 {
        let ticks = match self.cadence {
            Cadence::DisplayRate => self.display_rate(now_ms),
            Cadence::Throttled { interval_ms } => self.throttled(now_ms, interval_ms),
        };
        self.last_frame_ms = Some(now_ms);
        self.ticks += ticks as u64;
        ticks
    }

    /// Same as `on_frame`, reading the time from `clock`
    pub fn on_clock(&mut self, clock: &dyn Clock) -> u32 {
        self.on_frame(clock.now_ms())
    }

    /// Note a frame that was not simulated (viewport not renderable). The
    /// skipped time is never caught up; the next frame counts as a first frame.
    pub fn skip(&mut self) {
        self.last_frame_ms = None;
        self.last_tick_ms = None;
        self.accumulator_ms = 0.0;
    }

    fn display_rate(&mut self, now_ms: f64) -> u32 {
        let Some(last) = self.last_frame_ms else {
            // First frame always shows something
            return 1;
        };
        let dt = (now_ms - last).clamp(0.0, MAX_FRAME_DT as f64 * 1000.0);
        self.accumulator_ms += dt;

        let mut ticks = 0;
        while self.accumulator_ms + EPSILON_MS >= TICK_MS && ticks < MAX_SUBSTEPS {
            self.accumulator_ms -= TICK_MS;
            ticks += 1;
        }
        if ticks == MAX_SUBSTEPS {
            // Drop the backlog instead of spiralling
            self.accumulator_ms = self.accumulator_ms.min(TICK_MS);
        }
        self.accumulator_ms = self.accumulator_ms.max(0.0);
        ticks
    }

    fn throttled(&mut self, now_ms: f64, interval_ms: f64) -> u32 {
        match self.last_tick_ms {
            Some(last) if now_ms - last + EPSILON_MS < interval_ms => 0,
            _ => {
                self.last_tick_ms = Some(now_ms);
                1
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_rate_one_tick_per_frame_at_60hz() {
        let clock = ManualClock::new(1000.0);
        let mut sched = FrameScheduler::new(Cadence::DisplayRate);
        assert_eq!(sched.on_clock(&clock), 1);
        for _ in 0..600 {
            clock.advance(TICK_MS);
            assert_eq!(sched.on_clock(&clock), 1);
        }
        assert_eq!(sched.ticks(), 601);
    }

    #[test]
    fn test_display_rate_120hz_alternates() {
        let clock = ManualClock::new(0.0);
        let mut sched = FrameScheduler::new(Cadence::DisplayRate);
        sched.on_clock(&clock);
        let mut total = 0;
        for _ in 0..120 {
            clock.advance(TICK_MS / 2.0);
            let n = sched.on_clock(&clock);
            assert!(n <= 1);
            total += n;
        }
        assert_eq!(total, 60);
    }

    #[test]
    fn test_long_stall_is_clamped() {
        let clock = ManualClock::new(0.0);
        let mut sched = FrameScheduler::new(Cadence::DisplayRate);
        sched.on_clock(&clock);
        clock.advance(5000.0);
        assert_eq!(sched.on_clock(&clock), MAX_SUBSTEPS);
        clock.advance(TICK_MS);
        assert!(sched.on_clock(&clock) <= 2);
    }

    #[test]
    fn test_throttled_cadence() {
        let clock = ManualClock::new(0.0);
        let mut sched = FrameScheduler::new(Cadence::Throttled { interval_ms: 50.0 });
        let mut ticks = 0;
        for _ in 0..60 {
            ticks += sched.on_clock(&clock);
            clock.advance(TICK_MS);
        }
        // One second of 60 Hz frames at one tick per 50 ms
        assert_eq!(ticks, 20);
    }

    #[test]
    fn test_skip_discards_elapsed_time() {
        let clock = ManualClock::new(0.0);
        let mut sched = FrameScheduler::new(Cadence::DisplayRate);
        sched.on_clock(&clock);
        clock.advance(50.0);
        sched.skip();
        clock.advance(500.0);
        assert_eq!(sched.on_clock(&clock), 1);
        clock.advance(TICK_MS / 2.0);
        assert_eq!(sched.on_clock(&clock), 0);
    }
}
