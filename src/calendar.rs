//! Calendar engine - month grid with workout and rest day status

use chrono::{Datelike, Months, NaiveDate, Weekday};

use crate::blocks::BlockId;
use crate::i18n::Language;
use crate::model::WorkoutSession;

/// Status of a single day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayStatus {
    /// A session was recorded that day
    Workout,
    /// A session was recorded the day before
    Rest,
    None,
}

/// Status of `day` given the history.
///
/// The first session dated `day` wins; otherwise a session dated the day
/// before makes it a rest day.
pub fn day_status(day: NaiveDate, sessions: &[WorkoutSession]) -> (DayStatus, Option<&WorkoutSession>) {
    if let Some(session) = sessions.iter().find(|s| s.date == day) {
        return (DayStatus::Workout, Some(session));
    }
    if sessions.iter().any(|s| s.date.succ_opt() == Some(day)) {
        return (DayStatus::Rest, None);
    }
    (DayStatus::None, None)
}

/// One cell of the month grid
#[derive(Debug, Clone, PartialEq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub in_month: bool,
    pub is_today: bool,
    pub is_future: bool,
    pub status: DayStatus,
    /// Block of the WORKOUT session shown in the cell
    pub block_id: Option<BlockId>,
    pub session_id: Option<String>,
}

impl DayCell {
    /// Future days can only be opened when they already hold a session
    pub fn is_selectable(&self) -> bool {
        !self.is_future || self.session_id.is_some()
    }
}

/// Full weeks covering one month
#[derive(Debug, Clone)]
pub struct CalendarGrid {
    pub month_start: NaiveDate,
    pub week_start: Weekday,
    pub cells: Vec<DayCell>,
}

impl CalendarGrid {
    pub fn weeks(&self) -> impl Iterator<Item = &[DayCell]> {
        self.cells.chunks(7)
    }

    pub fn position_of(&self, date: NaiveDate) -> Option<usize> {
        self.cells.iter().position(|c| c.date == date)
    }

    /// Weekdays in column order
    pub fn weekdays(&self) -> [Weekday; 7] {
        let mut days = [self.week_start; 7];
        for i in 1..7 {
            days[i] = days[i - 1].succ();
        }
        days
    }
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    first_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|d| d.pred_opt())
        .unwrap_or(date)
}

/// Start of the week containing `date`
pub fn start_of_week(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    date.week(week_start).first_day()
}

/// End of the week containing `date`
pub fn end_of_week(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    date.week(week_start).last_day()
}

/// Build the grid for the month containing `month_reference`
pub fn compute_grid(
    month_reference: NaiveDate,
    sessions: &[WorkoutSession],
    week_start: Weekday,
    today: NaiveDate,
) -> CalendarGrid {
    let month_start = first_of_month(month_reference);
    let month_end = last_of_month(month_reference);
    let grid_start = start_of_week(month_start, week_start);
    let grid_end = end_of_week(month_end, week_start);

    let cells = grid_start
        .iter_days()
        .take_while(|d| *d <= grid_end)
        .map(|date| {
            let (status, session) = day_status(date, sessions);
            DayCell {
                date,
                in_month: date.year() == month_start.year() && date.month() == month_start.month(),
                is_today: date == today,
                is_future: date > today,
                status,
                block_id: session.map(|s| s.block_id),
                session_id: session.map(|s| s.id.clone()),
            }
        })
        .collect();

    CalendarGrid { month_start, week_start, cells }
}

/// Month being viewed and a keyboard cursor over its days
#[derive(Debug, Clone)]
pub struct CalendarView {
    month: NaiveDate,
    cursor: NaiveDate,
}

impl CalendarView {
    pub fn new(today: NaiveDate) -> Self {
        Self { month: today, cursor: today }
    }

    pub fn month(&self) -> NaiveDate {
        self.month
    }

    pub fn cursor(&self) -> NaiveDate {
        self.cursor
    }

    /// One calendar month back, clamped to the end of shorter months
    pub fn prev_month(&mut self) {
        if let Some(m) = self.month.checked_sub_months(Months::new(1)) {
            self.month = m;
            self.cursor = first_of_month(m);
        }
    }

    /// One calendar month forward, clamped to the end of shorter months
    pub fn next_month(&mut self) {
        if let Some(m) = self.month.checked_add_months(Months::new(1)) {
            self.month = m;
            self.cursor = first_of_month(m);
        }
    }

    /// Show the current month again; never selects a day
    pub fn jump_to_today(&mut self, today: NaiveDate) {
        self.month = today;
        self.cursor = today;
    }

    /// Move the cursor by `days`, following it into neighbouring months
    pub fn move_cursor(&mut self, days: i64) {
        let Some(target) = self.cursor.checked_add_signed(chrono::Duration::days(days)) else {
            return;
        };
        self.cursor = target;
        if first_of_month(target) != first_of_month(self.month) {
            self.month = target;
        }
    }

    pub fn grid(&self, sessions: &[WorkoutSession], language: Language, today: NaiveDate) -> CalendarGrid {
        compute_grid(self.month, sessions, language.week_start(), today)
    }

    /// Localized "Month YYYY" title
    pub fn title(&self, language: Language) -> String {
        format!("{} {}", language.month_name(self.month.month()), self.month.year())
    }
}
