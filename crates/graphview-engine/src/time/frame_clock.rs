use std::time::{Duration, Instant};

/// Timing for one presented frame.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,
    pub now: Instant,
    pub frame_index: u64,
}

impl FrameTime {
    /// Instantaneous frame rate implied by `dt`.
    #[inline]
    pub fn fps(&self) -> f32 {
        1.0 / self.dt
    }
}

/// Per-window frame clock.
///
/// Redraws are on demand, so gaps between frames can be arbitrarily long;
/// `dt` is clamped to `[dt_min, dt_max]`.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dt_is_clamped_and_index_advances() {
        let mut clock = FrameClock::with_clamps(Duration::from_millis(1), Duration::from_millis(100));
        let t0 = Instant::now() + Duration::from_secs(1);

        let a = clock.tick_at(t0);
        assert_eq!(a.frame_index, 0);

        let b = clock.tick_at(t0);
        assert!((b.dt - 0.001).abs() < 1e-6);

        let c = clock.tick_at(t0 + Duration::from_secs(5));
        assert!((c.dt - 0.1).abs() < 1e-6);
        assert_eq!(c.frame_index, 2);
    }

    #[test]
    fn fps_follows_dt() {
        let mut clock = FrameClock::with_clamps(Duration::from_millis(1), Duration::from_millis(250));
        let t0 = Instant::now() + Duration::from_secs(1);
        clock.tick_at(t0);

        let ft = clock.tick_at(t0 + Duration::from_millis(20));
        assert!((ft.fps() - 50.0).abs() < 1e-3);
        // Long idle gaps are clamped, so the rate never reads below 4 fps.
        let idle = clock.tick_at(t0 + Duration::from_secs(30));
        assert!((idle.fps() - 4.0).abs() < 1e-3);
    }
}
