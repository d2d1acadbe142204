//! Frame clock and pacing utilities.
//!
//! Scenecast time is simulated, not sampled: a frame clock derives the
//! timestamp of every captured frame from its frame number and the frame
//! rate, so documents are deterministic regardless of how fast the
//! producer actually runs. This module provides:
//! - The simulated frame clock (frame number -> seconds)
//! - Frame index / time conversions used for document keys
//! - A wall-clock pacer for live streams that must play out in real time

use std::time::{Duration, Instant};

/// Simulated clock for a capture session.
///
/// Advances one frame at a time; the reported time is always
/// `frame / frame_rate`, independent of wall-clock progress.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Frames per second of simulated time.
    frame_rate: f64,

    /// Number of frames captured so far.
    frame: u64,

    /// Wall-clock time when the session started (ISO 8601 string).
    /// Recorded for logs only; never part of the wire format.
    epoch_wall: String,
}

impl FrameClock {
    /// Create a clock at frame zero, anchored to now.
    pub fn start(frame_rate: f64) -> Self {
        Self {
            frame_rate,
            frame: 0,
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// The current frame number.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Simulated seconds at the current frame.
    pub fn time(&self) -> f64 {
        self.frame as f64 / self.frame_rate
    }

    /// Advance by one frame, returning the frame number that was current
    /// before the advance (the index the caller is capturing).
    pub fn tick(&mut self) -> u64 {
        let current = self.frame;
        self.frame += 1;
        current
    }

    /// Duration of one frame interval.
    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.frame_rate)
    }

    /// Wall-clock time at session start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }

    /// Frame index for a simulated timestamp (nearest frame).
    pub fn index_for_time(time: f64, frame_rate: f64) -> u64 {
        (time * frame_rate).round() as u64
    }

    /// Simulated timestamp for a frame index.
    pub fn time_for_index(index: u64, frame_rate: f64) -> f64 {
        index as f64 / frame_rate
    }
}

/// Wall-clock pacer holding a producer to its frame interval.
///
/// Each call to [`pace`](FramePacer::pace) sleeps out whatever remains of
/// the current interval after the work done since the previous call, then
/// re-anchors. Production slower than the interval is never penalized; the
/// pacer simply does not sleep.
#[derive(Debug)]
pub struct FramePacer {
    interval: Duration,
    anchor: Instant,
}

impl FramePacer {
    /// Create a pacer for the given frame rate.
    pub fn new(frame_rate: f64) -> Self {
        Self {
            interval: Duration::from_secs_f64(1.0 / frame_rate),
            anchor: Instant::now(),
        }
    }

    /// Target interval between frames.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Sleep out the remainder of the current frame interval.
    pub fn pace(&mut self) {
        let elapsed = self.anchor.elapsed();
        if elapsed < self.interval {
            std::thread::sleep(self.interval - elapsed);
        }
        self.anchor = Instant::now();
    }
}
