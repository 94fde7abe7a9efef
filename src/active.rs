//! Active session - read-only draft sealed by the finish gesture

use std::time::Instant;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::gesture::{HoldGesture, HoldTick};
use crate::model::{ExerciseData, WorkoutSession};
use crate::setup::PreparedSession;

#[derive(Debug, Clone)]
pub struct ActiveSession {
    prepared: PreparedSession,
    started_at: Instant,
    finish_hold: HoldGesture,
}

impl ActiveSession {
    pub fn new(prepared: PreparedSession, now: Instant) -> Self {
        Self {
            prepared,
            started_at: now,
            finish_hold: HoldGesture::default(),
        }
    }

    pub fn prepared(&self) -> &PreparedSession {
        &self.prepared
    }

    pub fn exercises(&self) -> &[ExerciseData] {
        &self.prepared.exercises
    }

    pub fn finish_hold(&self) -> &HoldGesture {
        &self.finish_hold
    }

    pub fn press_finish(&mut self, now: Instant) {
        self.finish_hold.start(now);
    }

    pub fn release_finish(&mut self) {
        self.finish_hold.cancel();
    }

    /// Sample the finish gesture; yields the sealed session once it completes
    pub fn tick(&mut self, now: Instant) -> Option<WorkoutSession> {
        match self.finish_hold.tick(now) {
            HoldTick::Completed => Some(self.seal(now, Utc::now())),
            _ => None,
        }
    }

    /// Build the persisted record from the draft
    pub fn seal(&self, now: Instant, completed_at: DateTime<Utc>) -> WorkoutSession {
        let elapsed = now.saturating_duration_since(self.started_at).as_secs();
        WorkoutSession {
            id: Uuid::new_v4().to_string(),
            date: self.prepared.date,
            block_id: self.prepared.block.id,
            exercises: self.prepared.exercises.clone(),
            duration_seconds: Some(u32::try_from(elapsed).unwrap_or(u32::MAX)),
            completed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{BlockId, find_block};
    use crate::gesture::HOLD_DURATION;
    use crate::model::SetRecord;
    use chrono::NaiveDate;
    use std::time::Duration;

    fn create_prepared() -> PreparedSession {
        PreparedSession {
            date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            block: find_block(BlockId::B3).unwrap(),
            exercises: vec![
                ExerciseData {
                    name: "uprightRow".to_string(),
                    sets: vec![SetRecord::new(30.0, 10); 3],
                },
                ExerciseData::empty("wristCurls"),
            ],
        }
    }

    #[test]
    fn test_finish_gesture_seals_session() {
        let t0 = Instant::now();
        let mut active = ActiveSession::new(create_prepared(), t0);
        let pressed = t0 + Duration::from_secs(60);

        active.press_finish(pressed);
        assert!(active.tick(pressed + Duration::from_millis(1000)).is_none());
        let session = active.tick(pressed + HOLD_DURATION).unwrap();

        assert_eq!(session.date_key(), "2024-03-10");
        assert_eq!(session.block_id, BlockId::B3);
        assert_eq!(session.exercises, create_prepared().exercises);
        assert_eq!(session.duration_seconds, Some(63));
        assert!(Uuid::parse_str(&session.id).is_ok());
    }

    #[test]
    fn test_finish_fires_once() {
        let t0 = Instant::now();
        let mut active = ActiveSession::new(create_prepared(), t0);
        active.press_finish(t0);
        let sealed = (0..400)
            .filter_map(|i| active.tick(t0 + Duration::from_millis(i * 16)))
            .count();
        assert_eq!(sealed, 1);
    }

    #[test]
    fn test_release_before_finish() {
        let t0 = Instant::now();
        let mut active = ActiveSession::new(create_prepared(), t0);
        active.press_finish(t0);
        active.tick(t0 + Duration::from_millis(2999));
        active.release_finish();
        assert_eq!(active.finish_hold().progress(), 0.0);
        assert!(active.tick(t0 + Duration::from_millis(3500)).is_none());
    }

    #[test]
    fn test_seal_generates_unique_ids() {
        let t0 = Instant::now();
        let active = ActiveSession::new(create_prepared(), t0);
        let a = active.seal(t0, Utc::now());
        let b = active.seal(t0, Utc::now());
        assert_ne!(a.id, b.id);
    }
}
