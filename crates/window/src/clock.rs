use std::time::{Duration, Instant};

/// Timing for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Seconds since the previous tick.
    pub dt: f32,
    pub frame_index: u64,
}

/// Delta-time source for the frame loop.
///
/// Unclamped by default: a stall shows up as one long frame. Use
/// [`FrameClock::with_max_delta`] to cap it.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    max_delta: Option<Duration>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            frame_index: 0,
            max_delta: None,
        }
    }

    pub fn with_max_delta(max_delta: Duration) -> Self {
        Self {
            max_delta: Some(max_delta),
            ..Self::new()
        }
    }

    /// Restart timing from now, e.g. after the window was suspended.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let mut dt = now.saturating_duration_since(self.last);
        if let Some(max) = self.max_delta {
            dt = dt.min(max);
        }
        self.last = now;

        let time = FrameTime {
            dt: dt.as_secs_f32(),
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        time
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
    fn dt_is_time_since_last_tick() {
        let mut clock = FrameClock::new();
        let start = Instant::now();
        clock.tick_at(start);

        let t = clock.tick_at(start + Duration::from_millis(16));
        assert!((t.dt - 0.016).abs() < 1e-6);
        assert_eq!(t.frame_index, 1);

        let t = clock.tick_at(start + Duration::from_secs(3));
        assert!((t.dt - 2.984).abs() < 1e-5);
        assert_eq!(t.frame_index, 2);
    }

    #[test]
    fn max_delta_caps_stalls() {
        let mut clock = FrameClock::with_max_delta(Duration::from_millis(100));
        let start = Instant::now();
        clock.tick_at(start);
        let t = clock.tick_at(start + Duration::from_secs(5));
        assert!((t.dt - 0.1).abs() < 1e-6);
    }

    #[test]
    fn time_going_backwards_gives_zero() {
        let mut clock = FrameClock::new();
        let start = Instant::now() + Duration::from_secs(1);
        clock.tick_at(start);
        let t = clock.tick_at(start - Duration::from_millis(10));
        assert_eq!(t.dt, 0.0);
    }
}
