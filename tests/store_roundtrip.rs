use chrono::{NaiveDate, TimeZone, Utc};
use tempfile::TempDir;

use protrack::blocks::BlockId;
use protrack::db::{Database, KeyValueStore, HISTORY_KEY};
use protrack::i18n::{Language, Theme};
use protrack::model::{ExerciseData, SetRecord, WorkoutSession};
use protrack::setup::SetupFlow;
use protrack::store::{Preferences, SessionStore};

fn create_session(id: &str, date: &str, block_id: BlockId, weight: f64) -> WorkoutSession {
    WorkoutSession {
        id: id.to_string(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        block_id,
        exercises: vec![
            ExerciseData {
                name: "bicepCurls".to_string(),
                sets: vec![SetRecord::new(weight, 8); 3],
            },
            ExerciseData::empty("frenchPress"),
        ],
        duration_seconds: Some(1800),
        completed_at: Utc.with_ymd_and_hms(2024, 3, 10, 18, 30, 0).unwrap(),
    }
}

fn db_path(dir: &TempDir) -> String {
    dir.path().join("protrack.db").to_string_lossy().into_owned()
}

#[test]
fn test_history_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);

    {
        let mut store = SessionStore::load(Database::open(&path).unwrap());
        store.save(create_session("a", "2024-03-08", BlockId::B2, 20.0)).unwrap();
        store.save(create_session("b", "2024-03-10", BlockId::B1, 50.0)).unwrap();
    }

    let store = SessionStore::load(Database::open(&path).unwrap());
    let ids: Vec<_> = store.sessions().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);
    assert_eq!(store.sessions()[0], create_session("b", "2024-03-10", BlockId::B1, 50.0));
}

#[test]
fn test_delete_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);

    {
        let mut store = SessionStore::load(Database::open(&path).unwrap());
        store.save(create_session("a", "2024-03-08", BlockId::B2, 20.0)).unwrap();
        store.save(create_session("b", "2024-03-10", BlockId::B1, 50.0)).unwrap();
        store.save(create_session("c", "2024-03-12", BlockId::B3, 10.0)).unwrap();
        assert!(store.delete("b").unwrap());
        assert!(!store.delete("missing").unwrap());
    }

    let store = SessionStore::load(Database::open(&path).unwrap());
    let ids: Vec<_> = store.sessions().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["c", "a"]);
}

#[test]
fn test_saved_history_seeds_next_setup() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);

    {
        let mut store = SessionStore::load(Database::open(&path).unwrap());
        store.save(create_session("a", "2024-03-10", BlockId::B1, 50.0)).unwrap();
    }

    let store = SessionStore::load(Database::open(&path).unwrap());
    let day = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
    let flow = SetupFlow::new(day, store.sessions());
    assert!(flow.has_previous());
    assert_eq!(flow.exercises()[0].sets[0], SetRecord::new(50.0, 8));
}

#[test]
fn test_corrupt_history_loads_empty() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);

    Database::open(&path).unwrap().set(HISTORY_KEY, "{not json").unwrap();

    let store = SessionStore::load(Database::open(&path).unwrap());
    assert!(store.is_empty());
}

#[test]
fn test_preferences_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);

    let prefs = Preferences { theme: Theme::Light, language: Language::Fr };
    prefs.save(&Database::open(&path).unwrap()).unwrap();

    assert_eq!(Preferences::load(&Database::open(&path).unwrap()), prefs);
}
