//! Session store - workout history and preferences on top of a key-value store

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::blocks::BlockId;
use crate::db::{HISTORY_KEY, KeyValueStore, LANGUAGE_KEY, THEME_KEY};
use crate::i18n::{Language, Theme};
use crate::model::WorkoutSession;

/// Ordered list of completed sessions, newest first.
///
/// Every mutation is written through to the backing store.
pub struct SessionStore<S: KeyValueStore> {
    kv: S,
    sessions: Vec<WorkoutSession>,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Load history from the store.
    ///
    /// Missing or unreadable history starts empty; only a log line is left.
    pub fn load(kv: S) -> Self {
        let sessions = match kv.get(HISTORY_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<WorkoutSession>>(&raw) {
                Ok(sessions) => sessions,
                Err(e) => {
                    warn!("Failed to parse history, starting empty: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to read history, starting empty: {:#}", e);
                Vec::new()
            }
        };
        info!("Loaded {} sessions", sessions.len());
        Self { kv, sessions }
    }

    pub fn sessions(&self) -> &[WorkoutSession] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Backing key-value store, shared with [`Preferences`]
    pub fn kv(&self) -> &S {
        &self.kv
    }

    /// First session recorded for the day
    pub fn find_by_date(&self, date: NaiveDate) -> Option<&WorkoutSession> {
        self.sessions.iter().find(|s| s.date == date)
    }

    /// Most recently saved session of the block
    pub fn latest_for_block(&self, block_id: BlockId) -> Option<&WorkoutSession> {
        self.sessions.iter().find(|s| s.block_id == block_id)
    }

    /// Prepend a completed session and persist
    pub fn save(&mut self, session: WorkoutSession) -> Result<()> {
        info!("Saving session {} ({} {})", session.id, session.date, session.block_id);
        let mut sessions = Vec::with_capacity(self.sessions.len() + 1);
        sessions.push(session);
        sessions.extend(self.sessions.iter().cloned());
        self.replace(sessions)
    }

    /// Remove the session with the given id.
    ///
    /// Returns `false` without touching storage when no such session exists.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let remaining: Vec<_> = self.sessions.iter().filter(|s| s.id != id).cloned().collect();
        if remaining.len() == self.sessions.len() {
            debug!("Delete of unknown session {} ignored", id);
            return Ok(false);
        }
        self.replace(remaining)?;
        info!("Deleted session {}", id);
        Ok(true)
    }

    /// Number of sessions dated the day before `today`
    pub fn rest_count(&self, today: NaiveDate) -> usize {
        self.sessions
            .iter()
            .filter(|s| s.date.succ_opt() == Some(today))
            .count()
    }

    /// Write `sessions` through; memory only changes once the write succeeded
    fn replace(&mut self, sessions: Vec<WorkoutSession>) -> Result<()> {
        let raw = serde_json::to_string(&sessions)?;
        self.kv
            .set(HISTORY_KEY, &raw)
            .context("Failed to write workout history")?;
        self.sessions = sessions;
        Ok(())
    }
}

/// Theme and language preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Preferences {
    pub theme: Theme,
    pub language: Language,
}

impl Preferences {
    /// Read preferences, falling back to defaults for missing or unknown values
    pub fn load(kv: &impl KeyValueStore) -> Self {
        let theme = read_key(kv, THEME_KEY)
            .and_then(|raw| Theme::from_str_opt(&raw))
            .unwrap_or_default();
        let language = read_key(kv, LANGUAGE_KEY)
            .and_then(|raw| Language::from_code(&raw))
            .unwrap_or_default();
        Self { theme, language }
    }

    pub fn save(&self, kv: &impl KeyValueStore) -> Result<()> {
        kv.set(THEME_KEY, self.theme.as_str())?;
        kv.set(LANGUAGE_KEY, self.language.code())?;
        Ok(())
    }
}

fn read_key(kv: &impl KeyValueStore, key: &str) -> Option<String> {
    match kv.get(key) {
        Ok(value) => value,
        Err(e) => {
            warn!("Failed to read {}: {:#}", key, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{FlakyStore, MemoryStore};
    use crate::model::{ExerciseData, SetRecord};
    use chrono::{TimeZone, Utc};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn create_session(id: &str, day: &str, block_id: BlockId) -> WorkoutSession {
        WorkoutSession {
            id: id.to_string(),
            date: date(day),
            block_id,
            exercises: vec![ExerciseData {
                name: "bicepCurls".to_string(),
                sets: vec![SetRecord::new(50.0, 8), SetRecord::new(45.5, 10), SetRecord::new(40.0, 12)],
            }],
            duration_seconds: Some(754),
            completed_at: Utc.with_ymd_and_hms(2024, 3, 10, 18, 30, 15).unwrap()
                + chrono::Duration::milliseconds(123),
        }
    }

    #[test]
    fn test_load_empty_store() {
        let store = SessionStore::load(MemoryStore::new());
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_corrupt_history_is_empty() {
        let store = SessionStore::load(MemoryStore::with_value(HISTORY_KEY, "{not json"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let mut store = SessionStore::load(MemoryStore::new());
        let session = create_session("s1", "2024-03-10", BlockId::B1);
        store.save(session.clone()).unwrap();

        let raw = store.kv().get(HISTORY_KEY).unwrap().unwrap();
        let reloaded = SessionStore::load(MemoryStore::with_value(HISTORY_KEY, &raw));
        assert_eq!(reloaded.sessions(), &[session]);
    }

    #[test]
    fn test_save_prepends() {
        let mut store = SessionStore::load(MemoryStore::new());
        store.save(create_session("a", "2024-03-01", BlockId::B1)).unwrap();
        store.save(create_session("b", "2024-03-03", BlockId::B2)).unwrap();
        let ids: Vec<_> = store.sessions().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_delete_removes_only_that_session() {
        let mut store = SessionStore::load(MemoryStore::new());
        for (id, day) in [("a", "2024-03-01"), ("b", "2024-03-02"), ("c", "2024-03-03"), ("d", "2024-03-04")] {
            store.save(create_session(id, day, BlockId::B1)).unwrap();
        }

        assert!(store.delete("b").unwrap());

        let ids: Vec<_> = store.sessions().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["d", "c", "a"]);

        let raw = store.kv().get(HISTORY_KEY).unwrap().unwrap();
        let reloaded = SessionStore::load(MemoryStore::with_value(HISTORY_KEY, &raw));
        assert_eq!(reloaded.sessions(), store.sessions());
    }

    #[test]
    fn test_delete_unknown_is_noop() {
        let mut store = SessionStore::load(MemoryStore::new());
        store.save(create_session("a", "2024-03-01", BlockId::B1)).unwrap();
        assert!(!store.delete("zzz").unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_failed_write_keeps_history() {
        let mut store = SessionStore::load(FlakyStore::new());
        store.save(create_session("a", "2024-03-01", BlockId::B1)).unwrap();
        store.kv().fail_writes(true);

        assert!(store.save(create_session("b", "2024-03-02", BlockId::B2)).is_err());
        assert!(store.delete("a").is_err());

        let ids: Vec<_> = store.sessions().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a"]);
        let reloaded = SessionStore::load(MemoryStore::with_value(
            HISTORY_KEY,
            &store.kv().get(HISTORY_KEY).unwrap().unwrap(),
        ));
        assert_eq!(reloaded.sessions(), store.sessions());
    }

    #[test]
    fn test_find_by_date_and_latest_for_block() {
        let mut store = SessionStore::load(MemoryStore::new());
        store.save(create_session("old", "2024-03-01", BlockId::B1)).unwrap();
        store.save(create_session("mid", "2024-03-03", BlockId::B2)).unwrap();
        store.save(create_session("new", "2024-03-05", BlockId::B1)).unwrap();

        assert_eq!(store.find_by_date(date("2024-03-03")).unwrap().id, "mid");
        assert!(store.find_by_date(date("2024-03-04")).is_none());
        assert_eq!(store.latest_for_block(BlockId::B1).unwrap().id, "new");
        assert!(store.latest_for_block(BlockId::B3).is_none());
    }

    #[test]
    fn test_rest_count() {
        let mut store = SessionStore::load(MemoryStore::new());
        store.save(create_session("a", "2024-03-09", BlockId::B1)).unwrap();
        store.save(create_session("b", "2024-03-10", BlockId::B2)).unwrap();
        assert_eq!(store.rest_count(date("2024-03-11")), 1);
        assert_eq!(store.rest_count(date("2024-03-12")), 0);
    }

    #[test]
    fn test_preferences_defaults() {
        let prefs = Preferences::load(&MemoryStore::new());
        assert_eq!(prefs.theme, Theme::Dark);
        assert_eq!(prefs.language, Language::En);
    }

    #[test]
    fn test_preferences_save_and_load() {
        let kv = MemoryStore::new();
        let prefs = Preferences { theme: Theme::Light, language: Language::Ru };
        prefs.save(&kv).unwrap();
        assert_eq!(kv.get(LANGUAGE_KEY).unwrap().as_deref(), Some("ru"));
        assert_eq!(Preferences::load(&kv), prefs);
    }

    #[test]
    fn test_preferences_unknown_values_fall_back() {
        let kv = MemoryStore::with_value(THEME_KEY, "neon");
        kv.set(LANGUAGE_KEY, "klingon").unwrap();
        assert_eq!(Preferences::load(&kv), Preferences::default());
    }
}
