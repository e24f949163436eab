//! Frame timing handed to every animator update.

/// Delta and accumulated time of the current frame, in seconds.
///
/// The host owns the clock and advances it once per frame before calling
/// [`ProceduralAnimator::update`][crate::animator::ProceduralAnimator::update].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameClock {
    pub delta: f32,
    pub elapsed: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock with an explicit delta and elapsed time.
    pub fn at(delta: f32, elapsed: f32) -> Self {
        Self { delta, elapsed }
    }

    /// Start a new frame lasting `delta` seconds.
    ///
    /// A non-positive delta is recorded as-is (the animator treats it as a
    /// paused frame) but never winds elapsed time backwards.
    pub fn advance(&mut self, delta: f32) -> Self {
        self.delta = delta;
        if delta > 0.0 {
            self.elapsed += delta;
        }
        *self
    }

    pub fn is_paused(&self) -> bool {
        self.delta <= 0.0
    }
}
