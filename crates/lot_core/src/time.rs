//! Variable-delta frame clock with 60-sample FPS smoothing.
//!
//! Every frame measures the raw wall-clock delta since the previous one and
//! hands it to the simulation unchanged: late frames are neither skipped,
//! merged, nor clamped. The clock also tracks the deadline of the next frame
//! so the event loop can sleep with `ControlFlow::WaitUntil`.

use std::time::{Duration, Instant};

const FPS_SAMPLE_COUNT: usize = 60;

pub struct FrameClock {
    pub target_frame_time: Duration,
    pub dt: f64,
    pub total_time: f64,
    pub frame_count: u64,
    last_instant: Instant,
    next_deadline: Instant,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl FrameClock {
    pub fn new(target_fps: u32) -> Self {
        Self::starting_at(Instant::now(), target_fps)
    }

    pub fn starting_at(start: Instant, target_fps: u32) -> Self {
        let fps = target_fps.max(1);
        let target_frame_time = Duration::from_secs_f64(1.0 / fps as f64);
        Self {
            target_frame_time,
            dt: 0.0,
            total_time: 0.0,
            frame_count: 0,
            last_instant: start,
            next_deadline: start + target_frame_time,
            fps_samples: [1.0 / fps as f64; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: fps as f64,
            smoothed_frame_time_ms: 1000.0 / fps as f64,
        }
    }

    /// Start a frame now; returns the delta in seconds.
    pub fn begin_frame(&mut self) -> f32 {
        self.begin_frame_at(Instant::now())
    }

    pub fn begin_frame_at(&mut self, now: Instant) -> f32 {
        self.dt = now.saturating_duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.total_time += self.dt;
        self.frame_count += 1;

        // A frame that overran its slot schedules the next one immediately.
        self.next_deadline = (self.next_deadline + self.target_frame_time).max(now);
        if self.dt > 4.0 * self.target_frame_time.as_secs_f64() {
            log::trace!("Slow frame: {:.1}ms", self.dt * 1000.0);
        }

        self.fps_samples[self.fps_sample_index] = self.dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };

        self.dt as f32
    }

    pub fn next_frame_deadline(&self) -> Instant {
        self.next_deadline
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(60)
    }
}
