// clock.rs - Frame-to-frame elapsed time

/// Remembers the previous frame timestamp (milliseconds).
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameClock {
    prev: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous timestamp; the next tick reports zero.
    pub fn reset(&mut self) {
        self.prev = None;
    }

    /// Milliseconds since the previous tick. Zero on the first tick,
    /// and when the host hands back an earlier timestamp.
    pub fn tick(&mut self, now: f64) -> f64 {
        if !now.is_finite() {
            return 0.0;
        }
        let elapsed = match self.prev {
            Some(prev) => (now - prev).max(0.0),
            None => 0.0,
        };
        self.prev = Some(now);
        elapsed
    }

    pub fn prev(&self) -> Option<f64> {
        self.prev
    }
}
