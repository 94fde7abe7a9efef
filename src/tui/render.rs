//! Drawing of the individual screens

use std::time::Instant;

use chrono::{Datelike, NaiveDate};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table, Wrap},
};

use super::{App, FieldFocus};
use crate::app::Screen;
use crate::blocks::{WorkoutBlock, all_blocks};
use crate::calendar::DayStatus;
use crate::countdown::Countdown;
use crate::gesture::HoldGesture;
use crate::i18n::{Language, Theme};
use crate::model::{ExerciseData, SetField, WorkoutSession};
use crate::setup::SetupFlow;
use crate::tips::{TipService, TipState};

struct Palette {
    bg: Color,
    fg: Color,
    muted: Color,
    accent: Color,
    workout: Color,
    rest: Color,
    danger: Color,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                bg: Color::Reset,
                fg: Color::Gray,
                muted: Color::DarkGray,
                accent: Color::Cyan,
                workout: Color::Green,
                rest: Color::Yellow,
                danger: Color::Red,
            },
            Theme::Light => Self {
                bg: Color::White,
                fg: Color::Black,
                muted: Color::Gray,
                accent: Color::Blue,
                workout: Color::Green,
                rest: Color::Magenta,
                danger: Color::Red,
            },
        }
    }
}

pub(super) fn draw<T: TipService>(frame: &mut Frame, app: &App<T>, today: NaiveDate, now: Instant) {
    let prefs = app.state.preferences();
    let palette = Palette::for_theme(prefs.theme);
    let lang = prefs.language;
    let area = frame.area();

    frame.render_widget(Block::default().style(Style::default().bg(palette.bg).fg(palette.fg)), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(area);

    let header = Paragraph::new(Line::from(vec![
        Span::styled("PRO", Style::default().fg(palette.fg).bold()),
        Span::styled("TRACK", Style::default().fg(palette.accent).bold()),
    ]))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    match app.state.screen() {
        Screen::Calendar => draw_calendar(frame, app, chunks[1], &palette, lang, today),
        Screen::Settings => draw_settings(frame, app, chunks[1], &palette, lang),
        Screen::Setup(flow) => draw_setup(frame, app, flow, chunks[1], &palette, lang),
        Screen::Countdown { countdown, .. } => draw_countdown(frame, countdown, chunks[1], &palette, lang, now),
        Screen::Active { session, confirm_stop } => {
            let block = session.prepared().block;
            draw_active(frame, block, session.exercises(), session.finish_hold(), chunks[1], &palette, lang);
            if *confirm_stop {
                draw_confirm(frame, chunks[1], &palette, lang);
            }
        }
    }

    let footer_text = match &app.status {
        Some(status) => status.clone(),
        None => footer_hint(app.state.screen(), app.state.store().len(), app.state.stats(today).1, lang),
    };
    let footer = Paragraph::new(footer_text)
        .style(Style::default().fg(palette.muted))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, chunks[2]);
}

fn footer_hint(screen: &Screen, total: usize, rest_today: usize, lang: Language) -> String {
    let s = lang.strings();
    match screen {
        Screen::Calendar => format!(
            "{}: {} | {}: {} | arrows: move | enter: open | p/n: month | t: {} | s: {} | q: quit",
            s.total_sessions, total, s.rest_today, rest_today, s.today, s.settings
        ),
        Screen::Settings => format!("up/down + enter: {} | t: {} | esc: back", s.language, s.theme),
        Screen::Setup(flow) if flow.is_read_only() => format!("space (hold): {} | esc: {}", s.hold_to_delete, s.cancel),
        Screen::Setup(_) => format!(
            "b: {} | tab/arrows: field | digits: edit | enter: {} | esc: {}",
            s.block, s.start_training, s.cancel
        ),
        Screen::Countdown { .. } => format!("esc: {}", s.cancel),
        Screen::Active { .. } => format!("space (hold): {} | esc: {}", s.safety_info, s.cancel),
    }
}

fn draw_calendar<T: TipService>(
    frame: &mut Frame,
    app: &App<T>,
    area: Rect,
    palette: &Palette,
    lang: Language,
    today: NaiveDate,
) {
    let view = app.state.calendar();
    let grid = app.state.grid(today);
    let cursor = view.cursor();

    let header = Row::new(
        grid.weekdays()
            .iter()
            .map(|d| Cell::from(lang.weekday_letter(*d)))
            .collect::<Vec<_>>(),
    )
    .style(Style::default().fg(palette.muted).bold());

    let rows: Vec<Row> = grid
        .weeks()
        .map(|week| {
            let cells: Vec<Cell> = week
                .iter()
                .map(|day| {
                    let marker = match (day.status, day.block_id) {
                        (DayStatus::Workout, Some(id)) => Span::styled(format!(" {}", id), Style::default().fg(palette.workout).bold()),
                        (DayStatus::Rest, _) => Span::styled(" ~", Style::default().fg(palette.rest)),
                        _ => Span::raw(""),
                    };
                    let mut style = Style::default().fg(if day.in_month { palette.fg } else { palette.muted });
                    if !day.is_selectable() {
                        style = style.add_modifier(Modifier::DIM);
                    }
                    if day.is_today {
                        style = style.fg(palette.accent).bold();
                    }
                    if day.date == cursor {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    Cell::from(Line::from(vec![
                        Span::styled(format!("{:>2}", day.date.day()), style),
                        marker,
                    ]))
                })
                .collect();
            Row::new(cells).height(2)
        })
        .collect();

    let table = Table::new(rows, [Constraint::Ratio(1, 7); 7])
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(view.title(lang)));
    frame.render_widget(table, area);
}

fn draw_settings<T: TipService>(frame: &mut Frame, app: &App<T>, area: Rect, palette: &Palette, lang: Language) {
    let s = lang.strings();
    let prefs = app.state.preferences();

    let mut lines = vec![Line::styled(s.language, Style::default().bold())];
    for (i, l) in Language::all().iter().enumerate() {
        let check = if *l == prefs.language { "✓" } else { " " };
        let mut style = Style::default().fg(palette.fg);
        if i == app.settings_cursor {
            style = style.add_modifier(Modifier::REVERSED);
        }
        lines.push(Line::styled(format!(" {} {}", check, l.label()), style));
    }
    lines.push(Line::raw(""));
    lines.push(Line::styled(s.theme, Style::default().bold()));
    let theme_name = match prefs.theme {
        Theme::Dark => s.dark,
        Theme::Light => s.light,
    };
    lines.push(Line::styled(format!(" {}", theme_name), Style::default().fg(palette.accent)));

    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(s.settings));
    frame.render_widget(paragraph, area);
}

fn draw_setup<T: TipService>(
    frame: &mut Frame,
    app: &App<T>,
    flow: &SetupFlow,
    area: Rect,
    palette: &Palette,
    lang: Language,
) {
    let s = lang.strings();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(3),
        ])
        .split(area);

    let tabs: Vec<Span> = all_blocks()
        .iter()
        .map(|b| {
            let style = if b.id == flow.block().id {
                Style::default().fg(palette.bg).bg(palette.accent).bold()
            } else if flow.is_read_only() {
                Style::default().fg(palette.muted).add_modifier(Modifier::DIM)
            } else {
                Style::default().fg(palette.fg)
            };
            Span::styled(format!(" {} ", b.id), style)
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(tabs)), chunks[0]);

    let date = flow.date();
    let title = vec![
        Line::styled(lang.translate(flow.block().name), Style::default().bold()),
        Line::styled(
            format!("{} {} {}, {}", s.preparation, lang.month_name(date.month()), date.day(), date.year()),
            Style::default().fg(palette.muted),
        ),
    ];
    frame.render_widget(Paragraph::new(title), chunks[1]);

    let tip = if let Some(session) = flow.existing() {
        completed_label(session, lang)
    } else {
        match app.state.tip() {
            TipState::Ready(text) => text.clone(),
            TipState::Loading | TipState::Idle => s.loading_tip.to_string(),
        }
    };
    let tip = Paragraph::new(tip)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(palette.accent))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(tip, chunks[2]);

    let focus = if flow.is_read_only() { None } else { Some(app.focus) };
    let title = if flow.has_previous() { s.previous } else { "" };
    draw_sets(frame, flow.exercises(), focus, chunks[3], palette, lang, title);

    if flow.is_read_only() {
        draw_hold(frame, flow.delete_hold(), s.deleting_data, chunks[4], palette.danger, lang);
    } else {
        let start = Paragraph::new(format!("⏎ {}", s.start_training))
            .alignment(Alignment::Center)
            .style(Style::default().fg(palette.accent).bold())
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(start, chunks[4]);
    }
}

fn draw_sets(
    frame: &mut Frame,
    exercises: &[ExerciseData],
    focus: Option<FieldFocus>,
    area: Rect,
    palette: &Palette,
    lang: Language,
    title: &str,
) {
    let s = lang.strings();
    let mut rows = Vec::new();
    for (ei, ex) in exercises.iter().enumerate() {
        rows.push(Row::new(vec![Cell::from(lang.translate(&ex.name).to_string()).style(Style::default().bold())]));
        for (si, set) in ex.sets.iter().enumerate() {
            let field_style = |field: SetField| {
                let focused = focus.is_some_and(|f| f.exercise == ei && f.set == si && f.field == field);
                if focused {
                    Style::default().fg(palette.accent).add_modifier(Modifier::REVERSED)
                } else {
                    Style::default().fg(palette.fg)
                }
            };
            rows.push(Row::new(vec![
                Cell::from(format!("  {} {}", s.set, si + 1)).style(Style::default().fg(palette.muted)),
                Cell::from(format!("{} {}", s.weight, format_weight(set.weight))).style(field_style(SetField::Weight)),
                Cell::from(format!("{} {}", s.reps, set.reps)).style(field_style(SetField::Reps)),
            ]));
        }
    }

    let table = Table::new(
        rows,
        [Constraint::Length(24), Constraint::Length(16), Constraint::Length(12)],
    )
    .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    frame.render_widget(table, area);
}

/// "Session complete" line of a read-only day, with the duration when known
fn completed_label(session: &WorkoutSession, lang: Language) -> String {
    let s = lang.strings();
    match session.duration_seconds {
        Some(secs) => format!("{} ({}:{:02})", s.session_complete, secs / 60, secs % 60),
        None => s.session_complete.to_string(),
    }
}

fn format_weight(weight: f64) -> String {
    if weight.fract() == 0.0 {
        format!("{:.0}", weight)
    } else {
        format!("{:.1}", weight)
    }
}

fn draw_hold(frame: &mut Frame, hold: &HoldGesture, action: &str, area: Rect, color: Color, lang: Language) {
    let label = if hold.progress() > 0.0 {
        format!("{} {}%", action, hold.percent())
    } else {
        lang.strings().safety_hold_required.to_string()
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(color))
        .ratio(hold.progress().clamp(0.0, 1.0))
        .label(label);
    frame.render_widget(gauge, area);
}

fn draw_countdown(frame: &mut Frame, countdown: &Countdown, area: Rect, palette: &Palette, lang: Language, now: Instant) {
    let label = if countdown.is_visible(now) { countdown.stage().label() } else { "" };
    let lines = vec![
        Line::styled(lang.strings().get_ready, Style::default().fg(palette.muted)),
        Line::raw(""),
        Line::styled(label, Style::default().fg(palette.accent).bold()),
    ];
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Fill(1), Constraint::Length(3), Constraint::Fill(1)])
        .split(area);
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), vertical[1]);
}

fn draw_active(
    frame: &mut Frame,
    block: &WorkoutBlock,
    exercises: &[ExerciseData],
    hold: &HoldGesture,
    area: Rect,
    palette: &Palette,
    lang: Language,
) {
    let s = lang.strings();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(6), Constraint::Length(1), Constraint::Length(3)])
        .split(area);

    let title = vec![
        Line::styled(format!("{} {}", s.block, block.id), Style::default().fg(palette.accent)),
        Line::styled(lang.translate(block.name), Style::default().bold()),
    ];
    frame.render_widget(Paragraph::new(title), chunks[0]);
    draw_sets(frame, exercises, None, chunks[1], palette, lang, "");
    frame.render_widget(
        Paragraph::new(s.safety_info).style(Style::default().fg(palette.muted)),
        chunks[2],
    );
    draw_hold(frame, hold, s.securing_data, chunks[3], palette.workout, lang);
}

fn draw_confirm(frame: &mut Frame, area: Rect, palette: &Palette, lang: Language) {
    let width = area.width.min(50);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height / 2).saturating_sub(2),
        width,
        height: area.height.min(4),
    };
    frame.render_widget(Clear, popup);
    let text = Paragraph::new(format!("{}\n[y] / [n]", lang.strings().stop_workout))
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(palette.danger))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(text, popup);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_weight() {
        assert_eq!(format_weight(50.0), "50");
        assert_eq!(format_weight(52.5), "52.5");
        assert_eq!(format_weight(0.0), "0");
    }

    #[test]
    fn test_completed_label_shows_duration() {
        let mut session = WorkoutSession {
            id: "s1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            block_id: crate::blocks::BlockId::B1,
            exercises: Vec::new(),
            duration_seconds: Some(754),
            completed_at: chrono::Utc::now(),
        };
        let complete = Language::En.strings().session_complete;
        assert_eq!(completed_label(&session, Language::En), format!("{} (12:34)", complete));

        session.duration_seconds = None;
        assert_eq!(completed_label(&session, Language::En), complete);
    }
}
