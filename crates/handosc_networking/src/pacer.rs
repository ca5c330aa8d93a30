//! # Frame Pacer
//!
//! Paces the consumer loop: one drain-and-render frame per period.
//!
//! ```text
//! deadline ─► sleep ─► frame(index) ─► record ─► deadline += period
//!                                                   │
//!                             behind by whole periods? skip them, run now
//! ```
//!
//! A frame that overruns never triggers a burst of catch-up frames. Pose
//! updates are last-write-wins, so one late frame already sees everything
//! the skipped ones would have.

use std::time::{Duration, Instant};

use crate::DEFAULT_TICK_RATE;

/// Frame counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frames run.
    pub frames: u64,
    /// Frames whose own work took longer than one period.
    pub overruns: u64,
    /// Deadlines passed over instead of run.
    pub skipped: u64,
    /// Longest frame so far.
    pub worst_frame: Duration,
}

/// Sleep-based fixed-rate pacer.
#[derive(Debug)]
pub struct FramePacer {
    period: Duration,
    deadline: Instant,
    stats: FrameStats,
}

impl FramePacer {
    /// Pacer for `rate_hz` frames per second (clamped to at least 1).
    #[must_use]
    pub fn new(rate_hz: u32) -> Self {
        Self {
            period: Duration::from_micros(1_000_000 / u64::from(rate_hz.max(1))),
            deadline: Instant::now(),
            stats: FrameStats::default(),
        }
    }

    /// Time between frame deadlines.
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Counters so far.
    #[must_use]
    pub const fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Sleeps until the next deadline, then runs `frame` with its index.
    ///
    /// The first frame runs immediately.
    pub fn pace<R>(&mut self, frame: impl FnOnce(u64) -> R) -> R {
        if let Some(gap) = self.deadline.checked_duration_since(Instant::now()) {
            std::thread::sleep(gap);
        }

        let started = Instant::now();
        let out = frame(self.stats.frames);
        let took = started.elapsed();

        self.stats.frames += 1;
        self.stats.worst_frame = self.stats.worst_frame.max(took);
        if took > self.period {
            self.stats.overruns += 1;
            tracing::trace!("frame {} overran: {:?}", self.stats.frames, took);
        }

        self.deadline += self.period;
        let now = Instant::now();
        if let Some(behind) = now.checked_duration_since(self.deadline) {
            let missed = behind.as_nanos() / self.period.as_nanos().max(1);
            self.stats.skipped += u64::try_from(missed).unwrap_or(u64::MAX);
            self.deadline = now;
        }

        out
    }
}

impl Default for FramePacer {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_RATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_period() {
        let pacer = FramePacer::default();
        assert_eq!(pacer.period(), Duration::from_micros(16_666));
        assert_eq!(*pacer.stats(), FrameStats::default());
    }

    #[test]
    fn test_zero_rate_is_clamped() {
        assert_eq!(FramePacer::new(0).period(), Duration::from_secs(1));
    }

    #[test]
    fn test_frames_are_spaced_by_the_period() {
        let mut pacer = FramePacer::new(200);
        let start = Instant::now();
        let mut indices = Vec::new();
        for _ in 0..5 {
            pacer.pace(|i| indices.push(i));
        }

        // First frame is immediate, the other four wait 5ms each.
        assert!(start.elapsed() >= Duration::from_millis(20));
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
        assert_eq!(pacer.stats().frames, 5);
        assert_eq!(pacer.stats().overruns, 0);
    }

    #[test]
    fn test_first_frame_does_not_wait() {
        let mut pacer = FramePacer::new(1);
        let start = Instant::now();
        pacer.pace(|_| ());
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    #[test]
    fn test_overrun_skips_instead_of_bursting() {
        let mut pacer = FramePacer::new(1000);
        pacer.pace(|_| std::thread::sleep(Duration::from_millis(5)));

        let stats = *pacer.stats();
        assert_eq!(stats.overruns, 1);
        assert!(stats.skipped >= 3, "skipped {}", stats.skipped);
        assert!(stats.worst_frame >= Duration::from_millis(5));

        // Realigned to now: the next frame does not wait out the backlog.
        let returned = pacer.pace(|i| i);
        assert_eq!(returned, 1);
        assert_eq!(pacer.stats().frames, 2);
    }
}
