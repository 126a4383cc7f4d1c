use chrono::{DateTime, Datelike, Month, NaiveDate, TimeZone, Weekday};
use itertools::Itertools;
use num_traits::FromPrimitive;
use std::fmt::Display;

use super::context::{Context, Theme};
use super::event::EventLine;
use crate::agenda::Agenda;
use crate::datetime::month_grid;

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

pub struct DayCell {
    day_num: u32,
    selected: bool,
    is_today: bool,
    count: usize,
}

impl DayCell {
    pub const WIDTH: usize = 7;

    pub fn new(day_num: u32) -> Self {
        DayCell {
            day_num,
            selected: false,
            is_today: false,
            count: 0,
        }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn today(mut self, is_today: bool) -> Self {
        self.is_today = is_today;
        self
    }

    pub fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn render(&self, theme: &Theme) -> String {
        let (open, close) = if self.selected {
            (theme.focus_open, theme.focus_close)
        } else {
            (' ', ' ')
        };
        let today = if self.is_today { theme.today_char } else { ' ' };
        let count = match self.count {
            0 => "  ".to_owned(),
            n @ 1..=9 => format!("+{}", n),
            _ => "++".to_owned(),
        };

        format!("{}{:>2}{}{}{}", open, self.day_num, today, count, close)
    }
}

/// Six week grid of one month, plus the classes of the focused day.
pub struct MonthView {
    anchor: NaiveDate,
    cursor: Option<NaiveDate>,
    today: Option<NaiveDate>,
    show_group: bool,
}

impl MonthView {
    pub const AGENDA_LINES: usize = 5;

    pub fn new(anchor: NaiveDate) -> Self {
        MonthView {
            anchor,
            cursor: None,
            today: None,
            show_group: false,
        }
    }

    pub fn from_context<Tz: TimeZone>(ctx: &Context<Tz>) -> Self {
        MonthView::new(ctx.view.anchor())
            .cursor(ctx.cursor)
            .today(ctx.today())
            .show_group(ctx.affordances.show_group_label)
    }

    pub fn cursor(mut self, cursor: NaiveDate) -> Self {
        self.cursor = Some(cursor);
        self
    }

    pub fn today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn show_group(mut self, show: bool) -> Self {
        self.show_group = show;
        self
    }

    fn title(&self) -> String {
        let name = Month::from_u32(self.anchor.month()).map_or("", |m| m.name());
        format!("{} {}", name, self.anchor.year())
    }

    pub fn render<Tz: TimeZone>(
        &self,
        agenda: &Agenda<Tz>,
        theme: &Theme,
        now: &DateTime<Tz>,
    ) -> Vec<String>
    where
        Tz::Offset: Display,
    {
        let grid = month_grid(self.anchor);
        let width = DayCell::WIDTH * WEEKDAYS.len();

        let mut lines = vec![
            format!("{:^width$}", self.title(), width = width),
            WEEKDAYS
                .iter()
                .map(|wd| format!("{:^w$}", wd.to_string(), w = DayCell::WIDTH))
                .join(""),
        ];

        let cells: Vec<String> = grid
            .iter()
            .zip(agenda.counts(&grid))
            .map(|(date, count)| {
                DayCell::new(date.day())
                    .selected(self.cursor == Some(*date))
                    .today(self.today == Some(*date))
                    .count(count)
                    .render(theme)
            })
            .collect();

        lines.extend(cells.chunks(WEEKDAYS.len()).map(|row| row.concat()));

        if let Some(cursor) = self.cursor {
            lines.push(String::new());
            let events: Vec<_> = agenda.events_of_day(&cursor).collect();
            lines.push(format!(
                "{}: {} {}",
                cursor.format("%a %d %b"),
                events.len(),
                if events.len() == 1 { "class" } else { "classes" }
            ));
            lines.extend(events.iter().take(Self::AGENDA_LINES).map(|event| {
                EventLine::new(event)
                    .show_group(self.show_group)
                    .render(agenda.tz(), now)
            }));
            if events.len() > Self::AGENDA_LINES {
                lines.push(format!("  ... {} more", events.len() - Self::AGENDA_LINES));
            }
        }

        lines
    }
}
