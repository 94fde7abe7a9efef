//! Session setup - pick a block for a day and prepare the draft

use std::time::Instant;

use chrono::NaiveDate;
use tracing::debug;

use crate::blocks::{BlockId, WorkoutBlock, find_block, resolve_block, WORKOUT_BLOCKS};
use crate::gesture::{HoldGesture, HoldTick};
use crate::i18n::Language;
use crate::model::{ExerciseData, SETS_PER_EXERCISE, SetField, SetRecord, WorkoutSession};
use crate::tips::TipRequest;

/// Draft handed from setup to the countdown and active session
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSession {
    pub date: NaiveDate,
    pub block: &'static WorkoutBlock,
    pub exercises: Vec<ExerciseData>,
}

/// Draft exercises for `block`, prefilled from the most recent session of the
/// same block. Missing exercises or sets start at 0 / 0.
pub fn seed_exercises(block: &WorkoutBlock, sessions: &[WorkoutSession]) -> Vec<ExerciseData> {
    let previous = sessions.iter().find(|s| s.block_id == block.id);

    block
        .exercises
        .iter()
        .map(|name| {
            let prev = previous.and_then(|s| s.exercises.iter().find(|e| e.name == *name));
            let sets = (0..SETS_PER_EXERCISE)
                .map(|i| prev.and_then(|e| e.sets.get(i)).copied().unwrap_or_default())
                .collect();
            ExerciseData { name: name.to_string(), sets }
        })
        .collect()
}

/// Parse a typed value; anything unparsable counts as 0
pub fn parse_set_value(raw: &str, field: SetField) -> f64 {
    let raw = raw.trim();
    let value = match field {
        SetField::Weight => raw.parse::<f64>().ok().filter(|v| v.is_finite()),
        SetField::Reps => raw.parse::<u32>().ok().map(f64::from),
    };
    value.unwrap_or(0.0).max(0.0)
}

/// State of the setup screen for one day.
///
/// A day that already has a session is read-only; the only action left is
/// deleting it with the hold gesture.
#[derive(Debug, Clone)]
pub struct SetupFlow {
    date: NaiveDate,
    existing: Option<WorkoutSession>,
    block: &'static WorkoutBlock,
    exercises: Vec<ExerciseData>,
    has_previous: bool,
    delete_hold: HoldGesture,
}

impl SetupFlow {
    pub fn new(date: NaiveDate, sessions: &[WorkoutSession]) -> Self {
        if let Some(session) = sessions.iter().find(|s| s.date == date) {
            debug!("Setup for {} opens existing session {}", date, session.id);
            return Self {
                date,
                block: resolve_block(session.block_id),
                exercises: session.exercises.clone(),
                existing: Some(session.clone()),
                has_previous: false,
                delete_hold: HoldGesture::default(),
            };
        }

        let block = &WORKOUT_BLOCKS[0];
        Self {
            date,
            existing: None,
            block,
            exercises: seed_exercises(block, sessions),
            has_previous: sessions.iter().any(|s| s.block_id == block.id),
            delete_hold: HoldGesture::default(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn block(&self) -> &'static WorkoutBlock {
        self.block
    }

    pub fn exercises(&self) -> &[ExerciseData] {
        &self.exercises
    }

    pub fn existing(&self) -> Option<&WorkoutSession> {
        self.existing.as_ref()
    }

    pub fn is_read_only(&self) -> bool {
        self.existing.is_some()
    }

    /// Draft was prefilled from an earlier session of the block
    pub fn has_previous(&self) -> bool {
        self.has_previous
    }

    /// Switch blocks, discarding edits and re-seeding from history.
    ///
    /// Returns false when the day is read-only or the block is unknown.
    pub fn select_block(&mut self, id: BlockId, sessions: &[WorkoutSession]) -> bool {
        if self.is_read_only() {
            return false;
        }
        let Some(block) = find_block(id) else {
            return false;
        };
        self.block = block;
        self.exercises = seed_exercises(block, sessions);
        self.has_previous = sessions.iter().any(|s| s.block_id == id);
        true
    }

    /// Edit one field of one set. Ignored for read-only days and bad indexes.
    pub fn update_set(&mut self, exercise: usize, set: usize, field: SetField, value: f64) -> bool {
        if self.is_read_only() {
            return false;
        }
        let Some(record) = self.exercises.get_mut(exercise).and_then(|e| e.sets.get_mut(set)) else {
            return false;
        };
        let value = if value.is_finite() { value.max(0.0) } else { 0.0 };
        match field {
            SetField::Weight => record.weight = value,
            SetField::Reps => record.reps = value.trunc() as u32,
        }
        true
    }

    pub fn set_record(&self, exercise: usize, set: usize) -> Option<SetRecord> {
        self.exercises.get(exercise).and_then(|e| e.sets.get(set)).copied()
    }

    /// Tip request for the current block, none for read-only days
    pub fn tip_request(&self, language: Language) -> Option<TipRequest> {
        if self.is_read_only() {
            return None;
        }
        Some(TipRequest::for_block(self.block, language))
    }

    /// Hand the draft over; nothing is stored yet
    pub fn start(&self) -> Option<PreparedSession> {
        if self.is_read_only() {
            return None;
        }
        Some(PreparedSession {
            date: self.date,
            block: self.block,
            exercises: self.exercises.clone(),
        })
    }

    /// Press on the delete trigger; does nothing without an existing session
    pub fn press_delete(&mut self, now: Instant) {
        if self.is_read_only() {
            self.delete_hold.start(now);
        }
    }

    pub fn release_delete(&mut self) {
        self.delete_hold.cancel();
    }

    pub fn delete_hold(&self) -> &HoldGesture {
        &self.delete_hold
    }

    /// Sample the delete gesture; yields the session id once the hold completes
    pub fn tick_delete(&mut self, now: Instant) -> Option<String> {
        match self.delete_hold.tick(now) {
            HoldTick::Completed => self.existing.as_ref().map(|s| s.id.clone()),
            _ => None,
        }
    }
}
