/// Elapsed-time source for the animation.
///
/// Starts on the first reading, so the first active frame sees `t = 0`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Clock {
    start_ms: Option<f64>,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the first call, given the current timestamp in ms.
    pub fn elapsed(&mut self, now_ms: f64) -> f64 {
        let start = *self.start_ms.get_or_insert(now_ms);
        ((now_ms - start) / 1000.0).max(0.0)
    }

    pub fn is_running(&self) -> bool {
        self.start_ms.is_some()
    }
}
