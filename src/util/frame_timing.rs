use web_time::{Duration, Instant};

/// Frame limiter with a smoothed FPS readout.
pub struct FrameTiming {
    /// 0 means unlimited.
    target_fps: u32,
    min_frame: Duration,
    last_frame: Instant,
    smoothed_fps: f32,
    /// Weight of the newest sample in the moving average.
    smoothing: f32,
    frames: u64,
}

impl FrameTiming {
    /// Timer capped at `target_fps` (0 = unlimited).
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        let min_frame = if target_fps > 0 {
            Duration::from_secs_f64(1.0 / f64::from(target_fps))
        } else {
            Duration::ZERO
        };
        Self {
            target_fps,
            min_frame,
            last_frame: Instant::now(),
            smoothed_fps: 60.0,
            smoothing: 0.05,
            frames: 0,
        }
    }

    /// Whether enough time has passed since the last frame.
    #[must_use]
    pub fn should_render(&self) -> bool {
        self.target_fps == 0 || self.last_frame.elapsed() >= self.min_frame
    }

    /// Record a finished frame.
    pub fn end_frame(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frames += 1;
        if dt > 0.0 {
            self.smoothed_fps =
                self.smoothed_fps * (1.0 - self.smoothing) + self.smoothing / dt;
        }
    }

    /// Smoothed frames per second.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }

    /// Frames rendered so far.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_always_renders() {
        let timing = FrameTiming::new(0);
        assert!(timing.should_render());
    }

    #[test]
    fn end_frame_counts() {
        let mut timing = FrameTiming::new(0);
        timing.end_frame();
        timing.end_frame();
        assert_eq!(timing.frame_count(), 2);
        assert!(timing.fps() > 0.0);
    }
}
