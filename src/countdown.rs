//! 3-2-1-GO countdown before the active session

use std::time::{Duration, Instant};

/// Time each stage stays on screen
pub const STAGE_DURATION: Duration = Duration::from_millis(1000);
/// Total time until the countdown reports finished
pub const COUNTDOWN_TOTAL: Duration = Duration::from_millis(4000);
/// Invisible gap at the start of every stage, for the entry pulse
pub const PULSE_GAP: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Three,
    Two,
    One,
    Go,
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Three => "3",
            Stage::Two => "2",
            Stage::One => "1",
            Stage::Go => "GO!",
        }
    }

    fn at(elapsed: Duration) -> Self {
        match elapsed.as_millis() / STAGE_DURATION.as_millis() {
            0 => Stage::Three,
            1 => Stage::Two,
            2 => Stage::One,
            _ => Stage::Go,
        }
    }
}

/// What a sample of the countdown reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownTick {
    pub stage: Stage,
    /// The stage differs from the previous sample
    pub stage_changed: bool,
    /// Set on exactly one sample, the first at or after [`COUNTDOWN_TOTAL`]
    pub finished: bool,
}

/// Fixed-timing countdown.
///
/// Holds no timers of its own: dropping the value is enough to make sure no
/// later stage or finish is ever reported.
#[derive(Debug, Clone)]
pub struct Countdown {
    started_at: Instant,
    stage: Stage,
    stage_started_at: Instant,
    finished: bool,
}

impl Countdown {
    /// Start the sequence at `now`, showing "3"
    pub fn start(now: Instant) -> Self {
        Self {
            started_at: now,
            stage: Stage::Three,
            stage_started_at: now,
            finished: false,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn tick(&mut self, now: Instant) -> CountdownTick {
        let elapsed = now.saturating_duration_since(self.started_at);
        let stage = Stage::at(elapsed);
        let stage_changed = stage != self.stage;
        if stage_changed {
            let index = (elapsed.as_millis() / STAGE_DURATION.as_millis()).min(3) as u32;
            self.stage = stage;
            self.stage_started_at = self.started_at + STAGE_DURATION * index;
        }

        let finished = !self.finished && elapsed >= COUNTDOWN_TOTAL;
        if finished {
            self.finished = true;
        }

        CountdownTick { stage, stage_changed, finished }
    }

    /// Whether the stage label is drawn, false during the entry pulse
    pub fn is_visible(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.stage_started_at) >= PULSE_GAP
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_starts_at_three() {
        let t0 = Instant::now();
        let mut countdown = Countdown::start(t0);
        let tick = countdown.tick(t0);
        assert_eq!(tick.stage, Stage::Three);
        assert!(!tick.stage_changed);
        assert!(!tick.finished);
    }

    #[test]
    fn test_stage_sequence() {
        let t0 = Instant::now();
        let mut countdown = Countdown::start(t0);
        let expected = [
            (999, "3"),
            (1000, "2"),
            (1999, "2"),
            (2000, "1"),
            (3000, "GO!"),
            (3999, "GO!"),
        ];
        for (at, label) in expected {
            assert_eq!(countdown.tick(t0 + ms(at)).stage.label(), label, "at {}ms", at);
        }
    }

    #[test]
    fn test_finishes_once_at_four_seconds() {
        let t0 = Instant::now();
        let mut countdown = Countdown::start(t0);
        let mut finished = 0;
        for step in (0..6000).step_by(16) {
            if countdown.tick(t0 + ms(step)).finished {
                finished += 1;
                assert!(step >= 4000, "finished early at {}ms", step);
            }
        }
        assert_eq!(finished, 1);
        assert!(countdown.is_finished());
    }

    #[test]
    fn test_not_finished_at_3999ms() {
        let t0 = Instant::now();
        let mut countdown = Countdown::start(t0);
        assert!(!countdown.tick(t0 + ms(3999)).finished);
        assert!(countdown.tick(t0 + ms(4000)).finished);
    }

    #[test]
    fn test_stage_changed_reported_once_per_transition() {
        let t0 = Instant::now();
        let mut countdown = Countdown::start(t0);
        let changes = (0..4500)
            .step_by(10)
            .filter(|step| countdown.tick(t0 + ms(*step)).stage_changed)
            .count();
        assert_eq!(changes, 3);
    }

    #[test]
    fn test_entry_pulse() {
        let t0 = Instant::now();
        let mut countdown = Countdown::start(t0);
        assert!(!countdown.is_visible(t0 + ms(10)));
        assert!(countdown.is_visible(t0 + ms(60)));

        countdown.tick(t0 + ms(1010));
        assert!(!countdown.is_visible(t0 + ms(1020)));
        assert!(countdown.is_visible(t0 + ms(1050)));
    }

    #[test]
    fn test_skipped_samples_jump_to_current_stage() {
        let t0 = Instant::now();
        let mut countdown = Countdown::start(t0);
        let tick = countdown.tick(t0 + ms(4200));
        assert_eq!(tick.stage, Stage::Go);
        assert!(tick.stage_changed);
        assert!(tick.finished);
    }
}
