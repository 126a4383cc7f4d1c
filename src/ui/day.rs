use chrono::{DateTime, NaiveDate, TimeZone, Timelike};
use std::fmt::Display;

use super::context::{Context, Theme};
use super::event::EventLine;
use crate::agenda::Agenda;
use crate::indicator::{LayoutProbe, HOUR_ROWS};

/// Where each hour row ended up, in lines from the top of the day view.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DayLayout {
    row_tops: Vec<usize>,
}

impl LayoutProbe for DayLayout {
    fn row_top(&self, index: usize) -> Option<f64> {
        self.row_tops.get(index).map(|&top| top as f64)
    }
}

pub struct DayFrame {
    pub lines: Vec<String>,
    pub layout: DayLayout,
}

/// 24 hour rows of one day, each `row_height` lines tall.
pub struct DayView {
    day: NaiveDate,
    row_height: usize,
    indicator: Option<f64>,
    show_group: bool,
}

impl DayView {
    pub const HEADER_LINES: usize = 2;
    const GUTTER_COLUMN: usize = 6;

    pub fn new(day: NaiveDate) -> Self {
        DayView {
            day,
            row_height: 1,
            indicator: None,
            show_group: false,
        }
    }

    /// Picks the row height that fits `height` lines, between 1 and `max`.
    pub fn fit(mut self, height: usize, max: usize) -> Self {
        let available = height.saturating_sub(Self::HEADER_LINES) / HOUR_ROWS;
        self.row_height = available.max(1).min(max.max(1));
        self
    }

    pub fn from_context<Tz: TimeZone>(ctx: &Context<Tz>, height: usize) -> Self {
        DayView::new(ctx.view.selected())
            .fit(height, ctx.max_row_height as usize)
            .indicator(ctx.indicator.offset(&ctx.view, ctx.now()))
            .show_group(ctx.affordances.show_group_label)
    }

    pub fn row_height(&self) -> usize {
        self.row_height
    }

    pub fn indicator(mut self, offset: Option<f64>) -> Self {
        self.indicator = offset;
        self
    }

    pub fn show_group(mut self, show: bool) -> Self {
        self.show_group = show;
        self
    }

    pub fn render<Tz: TimeZone>(
        &self,
        agenda: &Agenda<Tz>,
        theme: &Theme,
        now: &DateTime<Tz>,
    ) -> DayFrame
    where
        Tz::Offset: Display,
    {
        let tz = agenda.tz();
        let events: Vec<_> = agenda.events_of_day(&self.day).collect();

        let mut lines = vec![self.day.format("%A, %d %B %Y").to_string()];
        lines.push(match events.len() {
            0 => "No classes".to_owned(),
            1 => "1 class".to_owned(),
            n => format!("{} classes", n),
        });

        let mut layout = DayLayout::default();

        for hour in 0..HOUR_ROWS as u32 {
            layout.row_tops.push(lines.len());

            let mut entries = events
                .iter()
                .enumerate()
                .filter(|(_, event)| event.begin().with_timezone(tz).hour() == hour)
                .map(|(idx, event)| {
                    EventLine::new(event)
                        .number(idx + 1)
                        .show_group(self.show_group)
                        .indent(0)
                        .render(tz, now)
                })
                .collect::<Vec<_>>();

            if entries.len() > self.row_height && self.row_height == 1 {
                let hidden = entries.len() - 1;
                entries.truncate(1);
                entries[0] += &format!(" (+{} more)", hidden);
            } else if entries.len() > self.row_height {
                let hidden = entries.len() - self.row_height + 1;
                entries.truncate(self.row_height - 1);
                entries.push(format!("... {} more", hidden));
            }

            for line in 0..self.row_height {
                let label = if line == 0 {
                    format!("{:02}:00", hour)
                } else {
                    " ".repeat(5)
                };
                let entry = entries.get(line).map(String::as_str).unwrap_or("");
                lines.push(
                    format!("{} {} {}", label, theme.gutter_char, entry)
                        .trim_end()
                        .to_owned(),
                );
            }
        }

        if let Some(offset) = self.indicator {
            let idx = offset.floor() as usize;
            if let Some(line) = lines.get_mut(idx) {
                *line = mark(line, Self::GUTTER_COLUMN, theme.indicator_char);
            }
        }

        DayFrame { lines, layout }
    }
}

fn mark(line: &str, column: usize, marker: char) -> String {
    line.chars()
        .enumerate()
        .map(|(i, c)| if i == column { marker } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::RowGeometry;
    use crate::provider::ScheduledEvent;
    use chrono::Utc;
    use chrono_tz::Europe::Berlin;
    use std::rc::Rc;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn agenda() -> Agenda<chrono_tz::Tz> {
        let at = |h: u32, m: u32| {
            Berlin
                .with_ymd_and_hms(2024, 3, 15, h, m, 0)
                .unwrap()
                .with_timezone(&Utc)
        };
        Agenda::new(
            Rc::from(vec![
                ScheduledEvent::new("a", at(9, 0)).title("Algebra"),
                ScheduledEvent::new("b", at(9, 30)).title("Biology"),
                ScheduledEvent::new("c", at(9, 45)).title("Chemistry"),
                ScheduledEvent::new("d", at(14, 0)).title("Drawing"),
            ]),
            Berlin,
        )
    }

    #[test]
    fn row_height_fits_terminal() {
        assert_eq!(DayView::new(day()).fit(20, 3).row_height(), 1);
        assert_eq!(DayView::new(day()).fit(2 + 48, 3).row_height(), 2);
        assert_eq!(DayView::new(day()).fit(500, 3).row_height(), 3);
        assert_eq!(DayView::new(day()).fit(500, 0).row_height(), 1);
    }

    #[test]
    fn layout_measures_rows() {
        let now = Berlin.with_ymd_and_hms(2024, 3, 15, 8, 0, 0).unwrap();
        let frame = DayView::new(day()).fit(60, 3).render(&agenda(), &Theme::default(), &now);

        assert_eq!(frame.lines.len(), DayView::HEADER_LINES + 2 * HOUR_ROWS);
        assert_eq!(
            RowGeometry::measure(&frame.layout),
            Some(RowGeometry {
                base: 2.0,
                row_height: 2.0
            })
        );
        assert_eq!(frame.lines[0], "Friday, 15 March 2024");
        assert_eq!(frame.lines[1], "4 classes");
    }

    #[test]
    fn overflowing_hour_is_summarized() {
        let now = Berlin.with_ymd_and_hms(2024, 3, 15, 8, 0, 0).unwrap();
        let frame = DayView::new(day()).fit(60, 3).render(&agenda(), &Theme::default(), &now);

        let nine = 2 + 9 * 2;
        assert_eq!(frame.lines[nine], "09:00 | 1) 09:00-10:00 Algebra [Join]");
        assert_eq!(frame.lines[nine + 1], "      | ... 2 more");
        assert!(frame.lines[2 + 14 * 2].contains("4) 14:00-15:00 Drawing"));
    }

    #[test]
    fn single_line_rows_count_hidden_classes() {
        let now = Berlin.with_ymd_and_hms(2024, 3, 15, 8, 0, 0).unwrap();
        let frame = DayView::new(day()).fit(20, 3).render(&agenda(), &Theme::default(), &now);

        assert_eq!(frame.lines.len(), DayView::HEADER_LINES + HOUR_ROWS);
        assert_eq!(
            frame.lines[2 + 9],
            "09:00 | 1) 09:00-10:00 Algebra [Join] (+2 more)"
        );
        assert_eq!(frame.lines[2 + 10], "10:00 |");
    }

    #[test]
    fn indicator_marks_gutter() {
        let now = Berlin.with_ymd_and_hms(2024, 3, 15, 14, 30, 0).unwrap();
        let frame = DayView::new(day())
            .fit(60, 3)
            .indicator(Some(2.0 + 14.5 * 2.0))
            .render(&agenda(), &Theme::default(), &now);

        assert_eq!(frame.lines[2 + 29], "      >");
        assert_eq!(
            frame.lines.iter().filter(|l| l.contains('>')).count(),
            1
        );
    }
}
