//! Workout records - sets, exercises and completed sessions

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::blocks::BlockId;

/// Number of sets recorded for every exercise
pub const SETS_PER_EXERCISE: usize = 3;

/// One set: weight lifted and repetitions done
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SetRecord {
    pub weight: f64,
    pub reps: u32,
}

impl SetRecord {
    pub fn new(weight: f64, reps: u32) -> Self {
        Self { weight, reps }
    }
}

/// Field of a set that can be edited in a draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetField {
    #[default]
    Weight,
    Reps,
}

/// Sets recorded for a single exercise of a block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseData {
    pub name: String,
    pub sets: Vec<SetRecord>,
}

impl ExerciseData {
    /// Exercise with all sets at 0 weight / 0 reps
    pub fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            sets: vec![SetRecord::default(); SETS_PER_EXERCISE],
        }
    }

    /// Total volume (weight * reps) over all sets
    pub fn volume(&self) -> f64 {
        self.sets.iter().map(|s| s.weight * f64::from(s.reps)).sum()
    }
}

/// Completed, persisted workout session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSession {
    pub id: String,
    pub date: NaiveDate,
    #[serde(deserialize_with = "crate::blocks::deserialize_block_id")]
    pub block_id: BlockId,
    pub exercises: Vec<ExerciseData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u32>,
    pub completed_at: DateTime<Utc>,
}

impl WorkoutSession {
    /// Session date as `YYYY-MM-DD`
    pub fn date_key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}
