//! Hold-to-confirm gesture
//!
//! Irreversible actions (finishing or deleting a session) require the user to
//! hold the trigger for [`HOLD_DURATION`]. The owner samples the gesture on
//! every redraw; the sample that reaches 100% reports completion and the
//! gesture goes back to idle, so a second completion needs a fresh `start`.

use std::time::{Duration, Instant};

/// How long a hold must last to confirm
pub const HOLD_DURATION: Duration = Duration::from_millis(3000);

/// Fraction of `duration` elapsed since `start`, clamped to `0.0..=1.0`
pub fn progress(now: Instant, start: Instant, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(start);
    (elapsed.as_secs_f64() / duration.as_secs_f64()).min(1.0)
}

/// Result of sampling a gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HoldTick {
    /// Not held
    Idle,
    /// Held, with progress in `0.0..1.0`
    Holding(f64),
    /// Reached full duration in this sample; the gesture is idle again
    Completed,
}

#[derive(Debug, Clone)]
pub struct HoldGesture {
    duration: Duration,
    started_at: Option<Instant>,
    progress: f64,
}

impl Default for HoldGesture {
    fn default() -> Self {
        Self::new(HOLD_DURATION)
    }
}

impl HoldGesture {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            started_at: None,
            progress: 0.0,
        }
    }

    /// Press: (re)starts the hold from `now`
    pub fn start(&mut self, now: Instant) {
        self.started_at = Some(now);
        self.progress = 0.0;
    }

    /// Release before completion: back to idle, no completion
    pub fn cancel(&mut self) {
        self.started_at = None;
        self.progress = 0.0;
    }

    pub fn is_held(&self) -> bool {
        self.started_at.is_some()
    }

    /// Progress as of the last sample
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Progress as a whole percentage for display
    pub fn percent(&self) -> u8 {
        (self.progress * 100.0).round() as u8
    }

    pub fn tick(&mut self, now: Instant) -> HoldTick {
        let Some(start) = self.started_at else {
            return HoldTick::Idle;
        };
        let p = progress(now, start, self.duration);
        if p >= 1.0 {
            self.cancel();
            return HoldTick::Completed;
        }
        self.progress = p;
        HoldTick::Holding(p)
    }

    /// Sample and run `on_complete` if this sample completes the hold
    pub fn tick_with<F: FnOnce()>(&mut self, now: Instant, on_complete: F) -> HoldTick {
        let tick = self.tick(now);
        if tick == HoldTick::Completed {
            on_complete();
        }
        tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_progress_function() {
        let t0 = Instant::now();
        assert_eq!(progress(t0, t0, HOLD_DURATION), 0.0);
        assert!((progress(t0 + ms(1500), t0, HOLD_DURATION) - 0.5).abs() < 1e-9);
        assert_eq!(progress(t0 + ms(3000), t0, HOLD_DURATION), 1.0);
        assert_eq!(progress(t0 + ms(9000), t0, HOLD_DURATION), 1.0);
    }

    #[test]
    fn test_idle_gesture_never_completes() {
        let t0 = Instant::now();
        let mut gesture = HoldGesture::default();
        assert_eq!(gesture.tick(t0 + ms(5000)), HoldTick::Idle);
        assert_eq!(gesture.progress(), 0.0);
    }

    #[test]
    fn test_progress_monotonic_during_hold() {
        let t0 = Instant::now();
        let mut gesture = HoldGesture::default();
        gesture.start(t0);
        let mut last = 0.0;
        for step in (0..3000).step_by(16) {
            match gesture.tick(t0 + ms(step)) {
                HoldTick::Holding(p) => {
                    assert!(p >= last, "progress went back from {} to {}", last, p);
                    last = p;
                }
                other => panic!("unexpected {:?} at {}ms", other, step),
            }
        }
    }

    #[test]
    fn test_completes_exactly_once() {
        let t0 = Instant::now();
        let mut gesture = HoldGesture::default();
        let mut fired = 0;
        gesture.start(t0);
        gesture.tick_with(t0 + ms(1000), || fired += 1);
        gesture.tick_with(t0 + ms(3000), || fired += 1);
        gesture.tick_with(t0 + ms(3016), || fired += 1);
        gesture.tick_with(t0 + ms(6000), || fired += 1);
        assert_eq!(fired, 1);
        assert!(!gesture.is_held());
        assert_eq!(gesture.progress(), 0.0);
    }

    #[test]
    fn test_completes_on_boundary_sample() {
        let t0 = Instant::now();
        let mut gesture = HoldGesture::default();
        gesture.start(t0);
        assert_eq!(gesture.tick(t0 + HOLD_DURATION), HoldTick::Completed);
    }

    #[test]
    fn test_cancel_at_2999ms_never_fires() {
        let t0 = Instant::now();
        let mut gesture = HoldGesture::default();
        let mut fired = false;
        gesture.start(t0);
        gesture.tick_with(t0 + ms(2999), || fired = true);
        gesture.cancel();
        assert_eq!(gesture.progress(), 0.0);
        gesture.tick_with(t0 + ms(3500), || fired = true);
        assert!(!fired);
    }

    #[test]
    fn test_restart_does_not_accumulate() {
        let t0 = Instant::now();
        let mut gesture = HoldGesture::default();

        gesture.start(t0);
        gesture.tick(t0 + ms(2000));
        gesture.cancel();

        gesture.start(t0 + ms(2100));
        assert_eq!(gesture.tick(t0 + ms(4100)), HoldTick::Holding(2.0 / 3.0));
        assert!(matches!(gesture.tick(t0 + ms(5099)), HoldTick::Holding(_)));
        assert_eq!(gesture.tick(t0 + ms(5100)), HoldTick::Completed);
    }

    #[test]
    fn test_percent_rounds() {
        let t0 = Instant::now();
        let mut gesture = HoldGesture::default();
        gesture.start(t0);
        gesture.tick(t0 + ms(1000));
        assert_eq!(gesture.percent(), 33);
        gesture.tick(t0 + ms(2995));
        assert_eq!(gesture.percent(), 100);
    }
}
