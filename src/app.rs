//! Application state - screens, history and preferences in one owner
//!
//! The terminal UI only translates input into calls on [`AppState`] and
//! renders what it exposes. All transitions between screens happen here.

use std::time::Instant;

use anyhow::Result;
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::active::ActiveSession;
use crate::blocks::BlockId;
use crate::calendar::{CalendarGrid, CalendarView};
use crate::countdown::{Countdown, CountdownTick};
use crate::db::KeyValueStore;
use crate::i18n::{Language, Theme};
use crate::model::SetField;
use crate::setup::{PreparedSession, SetupFlow};
use crate::store::{Preferences, SessionStore};
use crate::tips::{TipFetcher, TipService, TipState};

/// Current screen together with the state it owns.
///
/// Leaving a screen drops its state, including running gestures and the
/// countdown.
#[derive(Debug)]
pub enum Screen {
    Calendar,
    Settings,
    Setup(SetupFlow),
    Countdown {
        countdown: Countdown,
        prepared: PreparedSession,
    },
    Active {
        session: ActiveSession,
        confirm_stop: bool,
    },
}

/// Something that happened during [`AppState::tick`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    CountdownStage(&'static str),
    SessionStarted,
    SessionSaved(String),
    SessionDeleted(String),
}

pub struct AppState<K: KeyValueStore, T: TipService> {
    store: SessionStore<K>,
    prefs: Preferences,
    calendar: CalendarView,
    screen: Screen,
    tips: TipFetcher<T>,
}

impl<K: KeyValueStore, T: TipService> AppState<K, T> {
    pub fn new(store: SessionStore<K>, tips: TipFetcher<T>, today: NaiveDate) -> Self {
        let prefs = Preferences::load(store.kv());
        Self {
            store,
            prefs,
            calendar: CalendarView::new(today),
            screen: Screen::Calendar,
            tips,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn store(&self) -> &SessionStore<K> {
        &self.store
    }

    pub fn preferences(&self) -> Preferences {
        self.prefs
    }

    pub fn language(&self) -> Language {
        self.prefs.language
    }

    pub fn calendar(&self) -> &CalendarView {
        &self.calendar
    }

    pub fn calendar_mut(&mut self) -> &mut CalendarView {
        &mut self.calendar
    }

    pub fn grid(&self, today: NaiveDate) -> CalendarGrid {
        self.calendar.grid(self.store.sessions(), self.prefs.language, today)
    }

    pub fn tip(&self) -> &TipState {
        self.tips.state()
    }

    /// Open the setup screen for `date`.
    ///
    /// Future days without a session are refused.
    pub fn select_day(&mut self, date: NaiveDate, today: NaiveDate) -> bool {
        if !matches!(self.screen, Screen::Calendar) {
            return false;
        }
        if date > today && self.store.find_by_date(date).is_none() {
            return false;
        }
        let flow = SetupFlow::new(date, self.store.sessions());
        self.request_tip(&flow);
        self.screen = Screen::Setup(flow);
        true
    }

    pub fn select_block(&mut self, id: BlockId) -> bool {
        let Screen::Setup(flow) = &mut self.screen else {
            return false;
        };
        if !flow.select_block(id, self.store.sessions()) {
            return false;
        }
        let request = flow.tip_request(self.prefs.language);
        if let Some(request) = request {
            self.tips.request(request);
        }
        true
    }

    pub fn update_set(&mut self, exercise: usize, set: usize, field: SetField, value: f64) -> bool {
        match &mut self.screen {
            Screen::Setup(flow) => flow.update_set(exercise, set, field, value),
            _ => false,
        }
    }

    /// Setup → countdown with the current draft
    pub fn start(&mut self, now: Instant) -> bool {
        let Screen::Setup(flow) = &self.screen else {
            return false;
        };
        let Some(prepared) = flow.start() else {
            return false;
        };
        info!("Starting {} for {}", prepared.block.id, prepared.date);
        self.tips.invalidate();
        self.screen = Screen::Countdown {
            countdown: Countdown::start(now),
            prepared,
        };
        true
    }

    /// Press on the hold trigger of the current screen.
    ///
    /// Ignored while the stop-workout question is open.
    pub fn press_hold(&mut self, now: Instant) {
        match &mut self.screen {
            Screen::Setup(flow) => flow.press_delete(now),
            Screen::Active { session, confirm_stop: false } => session.press_finish(now),
            _ => {}
        }
    }

    pub fn release_hold(&mut self) {
        match &mut self.screen {
            Screen::Setup(flow) => flow.release_delete(),
            Screen::Active { session, .. } => session.release_finish(),
            _ => {}
        }
    }

    /// Whether a hold gesture is in progress
    pub fn is_holding(&self) -> bool {
        match &self.screen {
            Screen::Setup(flow) => flow.delete_hold().is_held(),
            Screen::Active { session, .. } => session.finish_hold().is_held(),
            _ => false,
        }
    }

    /// Advance timers and gestures, apply finished tip requests
    pub fn tick(&mut self, now: Instant) -> Result<Vec<AppEvent>> {
        let mut events = Vec::new();
        self.tips.poll();

        match &mut self.screen {
            Screen::Countdown { countdown, prepared } => {
                let CountdownTick { stage, stage_changed, finished } = countdown.tick(now);
                if stage_changed {
                    events.push(AppEvent::CountdownStage(stage.label()));
                }
                if finished {
                    let session = ActiveSession::new(prepared.clone(), now);
                    self.screen = Screen::Active { session, confirm_stop: false };
                    events.push(AppEvent::SessionStarted);
                }
            }
            Screen::Active { session, .. } => {
                if let Some(sealed) = session.tick(now) {
                    let id = sealed.id.clone();
                    // On failure the draft stays on screen and can be held again
                    self.store.save(sealed)?;
                    self.screen = Screen::Calendar;
                    events.push(AppEvent::SessionSaved(id));
                }
            }
            Screen::Setup(flow) => {
                if let Some(id) = flow.tick_delete(now) {
                    let deleted = self.store.delete(&id)?;
                    self.screen = Screen::Calendar;
                    if deleted {
                        events.push(AppEvent::SessionDeleted(id));
                    }
                }
            }
            Screen::Calendar | Screen::Settings => {}
        }

        Ok(events)
    }

    /// Back to the calendar.
    ///
    /// During an active session the first call only asks for confirmation;
    /// see [`AppState::confirm_stop`].
    pub fn cancel(&mut self) {
        if let Screen::Active { confirm_stop, session } = &mut self.screen {
            session.release_finish();
            *confirm_stop = true;
            return;
        }
        if !matches!(self.screen, Screen::Calendar) {
            self.go_to_calendar();
        }
    }

    /// Answer the stop-workout question
    pub fn confirm_stop(&mut self, stop: bool) {
        let Screen::Active { confirm_stop, .. } = &mut self.screen else {
            return;
        };
        if !*confirm_stop {
            return;
        }
        *confirm_stop = false;
        if stop {
            warn!("Active session abandoned");
            self.go_to_calendar();
        }
    }

    pub fn open_settings(&mut self) {
        if matches!(self.screen, Screen::Calendar) {
            self.screen = Screen::Settings;
        }
    }

    pub fn set_language(&mut self, language: Language) -> Result<()> {
        self.prefs.language = language;
        self.prefs.save(self.store.kv())
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.prefs.theme = theme;
        self.prefs.save(self.store.kv())
    }

    /// Total sessions and sessions that make today a rest day
    pub fn stats(&self, today: NaiveDate) -> (usize, usize) {
        (self.store.len(), self.store.rest_count(today))
    }

    fn go_to_calendar(&mut self) {
        self.tips.invalidate();
        self.screen = Screen::Calendar;
    }

    fn request_tip(&mut self, flow: &SetupFlow) {
        match flow.tip_request(self.prefs.language) {
            Some(request) => self.tips.request(request),
            None => self.tips.invalidate(),
        }
    }
}
