//! TUI module - Terminal front end with ratatui

mod render;

use std::io::{stdout, Stdout};
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{Local, NaiveDate};
use crossterm::{
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
    ExecutableCommand,
};
use ratatui::prelude::*;
use tracing::{error, info};

use crate::app::{AppEvent, AppState, Screen};
use crate::blocks::{BlockId, all_blocks};
use crate::db::Database;
use crate::i18n::Language;
use crate::model::{SETS_PER_EXERCISE, SetField};
use crate::setup::parse_set_value;
use crate::tips::TipService;

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Redraw / sampling interval
const FRAME: Duration = Duration::from_millis(16);

/// Without key release events a hold ends when the key stops repeating
const HOLD_RELEASE_TIMEOUT: Duration = Duration::from_millis(700);

/// Field of the draft under the keyboard cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldFocus {
    pub exercise: usize,
    pub set: usize,
    pub field: SetField,
}

impl FieldFocus {
    /// Step through weight/reps of every set, in reading order
    fn step(&mut self, forward: bool, exercises: usize) {
        let per_exercise = SETS_PER_EXERCISE * 2;
        let total = (exercises * per_exercise).max(1);
        let index = self.exercise * per_exercise
            + self.set * 2
            + usize::from(self.field == SetField::Reps);
        let next = if forward { (index + 1) % total } else { (index + total - 1) % total };
        self.exercise = next / per_exercise;
        self.set = (next % per_exercise) / 2;
        self.field = if next % 2 == 0 { SetField::Weight } else { SetField::Reps };
    }
}

/// App state for TUI
pub struct App<T: TipService> {
    state: AppState<Database, T>,
    should_quit: bool,
    focus: FieldFocus,
    input: String,
    settings_cursor: usize,
    enhanced_keys: bool,
    last_hold_signal: Option<Instant>,
    status: Option<String>,
}

impl<T: TipService> App<T> {
    pub fn new(state: AppState<Database, T>) -> Self {
        let settings_cursor = Language::all()
            .iter()
            .position(|l| *l == state.language())
            .unwrap_or(0);
        Self {
            state,
            should_quit: false,
            focus: FieldFocus::default(),
            input: String::new(),
            settings_cursor,
            enhanced_keys: false,
            last_hold_signal: None,
            status: None,
        }
    }

    /// Run the TUI application
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = init_terminal()?;
        self.enhanced_keys = enable_key_release_events();
        info!("TUI started (key release events: {})", self.enhanced_keys);

        let result = self.main_loop(&mut terminal);

        if self.enhanced_keys {
            let _ = stdout().execute(PopKeyboardEnhancementFlags);
        }
        restore_terminal()?;
        result
    }

    fn main_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        while !self.should_quit {
            let today = Local::now().date_naive();
            terminal.draw(|frame| render::draw(frame, self, today, Instant::now()))?;
            self.handle_events(today)?;
            self.advance(Instant::now());
        }
        Ok(())
    }

    fn advance(&mut self, now: Instant) {
        if !self.enhanced_keys
            && self.state.is_holding()
            && self.last_hold_signal.is_some_and(|t| now.duration_since(t) > HOLD_RELEASE_TIMEOUT)
        {
            self.release_hold();
        }

        match self.state.tick(now) {
            Ok(events) => {
                for event in events {
                    self.on_event(event);
                }
            }
            Err(e) => {
                error!("Failed to update history: {:#}", e);
                self.status = Some(format!("Error: {:#}", e));
            }
        }
    }

    fn on_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::CountdownStage(_) => {}
            AppEvent::SessionStarted => self.last_hold_signal = None,
            AppEvent::SessionSaved(id) => {
                self.last_hold_signal = None;
                self.status = Some(format!("Saved session {}", short_id(&id)));
            }
            AppEvent::SessionDeleted(id) => {
                self.last_hold_signal = None;
                self.status = Some(format!("Deleted session {}", short_id(&id)));
            }
        }
    }

    fn handle_events(&mut self, today: NaiveDate) -> Result<()> {
        if event::poll(FRAME)?
            && let Event::Key(key) = event::read()?
        {
            self.handle_key(key, today)?;
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent, today: NaiveDate) -> Result<()> {
        if key.code == KeyCode::Char(' ') {
            match key.kind {
                KeyEventKind::Press | KeyEventKind::Repeat => {
                    let now = Instant::now();
                    if !self.state.is_holding() {
                        self.state.press_hold(now);
                    }
                    self.last_hold_signal = Some(now);
                }
                KeyEventKind::Release => self.release_hold(),
            }
            return Ok(());
        }
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        self.status = None;
        match ScreenKind::of(self.state.screen()) {
            ScreenKind::Calendar => self.calendar_key(key.code, today),
            ScreenKind::Settings => self.settings_key(key.code)?,
            ScreenKind::Setup => self.setup_key(key.code),
            ScreenKind::Countdown => {
                if key.code == KeyCode::Esc {
                    self.state.cancel();
                }
            }
            ScreenKind::Active { confirm_stop } => match (confirm_stop, key.code) {
                (true, KeyCode::Char('y')) => self.state.confirm_stop(true),
                (true, KeyCode::Char('n') | KeyCode::Esc) => self.state.confirm_stop(false),
                (false, KeyCode::Esc) => self.state.cancel(),
                _ => {}
            },
        }
        Ok(())
    }

    fn calendar_key(&mut self, code: KeyCode, today: NaiveDate) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Left => self.state.calendar_mut().move_cursor(-1),
            KeyCode::Right => self.state.calendar_mut().move_cursor(1),
            KeyCode::Up => self.state.calendar_mut().move_cursor(-7),
            KeyCode::Down => self.state.calendar_mut().move_cursor(7),
            KeyCode::PageUp | KeyCode::Char('p') => self.state.calendar_mut().prev_month(),
            KeyCode::PageDown | KeyCode::Char('n') => self.state.calendar_mut().next_month(),
            KeyCode::Char('t') => self.state.calendar_mut().jump_to_today(today),
            KeyCode::Char('s') => self.state.open_settings(),
            KeyCode::Enter => {
                let day = self.state.calendar().cursor();
                if self.state.select_day(day, today) {
                    self.focus = FieldFocus::default();
                    self.input.clear();
                }
            }
            _ => {}
        }
    }

    fn settings_key(&mut self, code: KeyCode) -> Result<()> {
        let languages = Language::all();
        match code {
            KeyCode::Up => self.settings_cursor = self.settings_cursor.saturating_sub(1),
            KeyCode::Down => self.settings_cursor = (self.settings_cursor + 1).min(languages.len() - 1),
            KeyCode::Enter => self.state.set_language(languages[self.settings_cursor])?,
            KeyCode::Char('t') => {
                let theme = self.state.preferences().theme.toggled();
                self.state.set_theme(theme)?;
            }
            KeyCode::Esc | KeyCode::Char('q') => self.state.cancel(),
            _ => {}
        }
        Ok(())
    }

    fn setup_key(&mut self, code: KeyCode) {
        let (exercises, block) = match self.state.screen() {
            Screen::Setup(flow) => (flow.exercises().len(), flow.block().id),
            _ => return,
        };
        match code {
            KeyCode::Esc => self.state.cancel(),
            KeyCode::Char('b') => {
                if self.state.select_block(next_block(block)) {
                    self.focus = FieldFocus::default();
                    self.input.clear();
                }
            }
            KeyCode::Tab | KeyCode::Down | KeyCode::Right => {
                self.focus.step(true, exercises);
                self.input.clear();
            }
            KeyCode::BackTab | KeyCode::Up | KeyCode::Left => {
                self.focus.step(false, exercises);
                self.input.clear();
            }
            KeyCode::Char(c) if c.is_ascii_digit() || (c == '.' && self.focus.field == SetField::Weight) => {
                self.input.push(c);
                self.apply_input();
            }
            KeyCode::Backspace => {
                self.input.pop();
                self.apply_input();
            }
            KeyCode::Enter => {
                self.state.start(Instant::now());
            }
            _ => {}
        }
    }

    fn apply_input(&mut self) {
        let value = parse_set_value(&self.input, self.focus.field);
        let FieldFocus { exercise, set, field } = self.focus;
        self.state.update_set(exercise, set, field, value);
    }

    fn release_hold(&mut self) {
        self.state.release_hold();
        self.last_hold_signal = None;
    }
}

/// Screen discriminant, so key handling does not hold a borrow of the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScreenKind {
    Calendar,
    Settings,
    Setup,
    Countdown,
    Active { confirm_stop: bool },
}

impl ScreenKind {
    fn of(screen: &Screen) -> Self {
        match screen {
            Screen::Calendar => ScreenKind::Calendar,
            Screen::Settings => ScreenKind::Settings,
            Screen::Setup(_) => ScreenKind::Setup,
            Screen::Countdown { .. } => ScreenKind::Countdown,
            Screen::Active { confirm_stop, .. } => ScreenKind::Active { confirm_stop: *confirm_stop },
        }
    }
}

fn next_block(current: BlockId) -> BlockId {
    let blocks = all_blocks();
    let index = blocks.iter().position(|b| b.id == current).unwrap_or(0);
    blocks[(index + 1) % blocks.len()].id
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// Ask the terminal for key release events when it supports them
fn enable_key_release_events() -> bool {
    if !matches!(supports_keyboard_enhancement(), Ok(true)) {
        return false;
    }
    stdout()
        .execute(PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES))
        .is_ok()
}

fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_steps_through_all_fields() {
        let mut focus = FieldFocus::default();
        focus.step(true, 2);
        assert_eq!(focus, FieldFocus { exercise: 0, set: 0, field: SetField::Reps });
        focus.step(true, 2);
        assert_eq!(focus, FieldFocus { exercise: 0, set: 1, field: SetField::Weight });
        for _ in 0..4 {
            focus.step(true, 2);
        }
        assert_eq!(focus, FieldFocus { exercise: 1, set: 0, field: SetField::Weight });
    }

    #[test]
    fn test_focus_wraps_backwards() {
        let mut focus = FieldFocus::default();
        focus.step(false, 2);
        assert_eq!(focus, FieldFocus { exercise: 1, set: 2, field: SetField::Reps });
    }

    #[test]
    fn test_next_block_cycles() {
        assert_eq!(next_block(BlockId::B1), BlockId::B2);
        assert_eq!(next_block(BlockId::B3), BlockId::B1);
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }
}
