use chrono::{DateTime, NaiveDate, TimeZone};
use serde::Deserialize;
use termion::event::Key;

use crate::agenda::Agenda;
use crate::config::{Affordances, Config};
use crate::datetime::add_days;
use crate::indicator::TimeIndicator;
use crate::join::{self, JoinOutcome};
use crate::link::LinkResolver;
use crate::view::{Mode, Trigger, ViewState};

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub today_char: char,
    pub focus_open: char,
    pub focus_close: char,
    pub indicator_char: char,
    pub gutter_char: char,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            today_char: '*',
            focus_open: '[',
            focus_close: ']',
            indicator_char: '>',
            gutter_char: '|',
        }
    }
}

/// What the app loop has to do after a key press.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Redraw,
    Open(String),
    Quit,
    None,
}

/// State of one calendar activation.
pub struct Context<Tz: TimeZone> {
    pub view: ViewState,
    /// Focused cell of the month grid.
    pub cursor: NaiveDate,
    pub agenda: Agenda<Tz>,
    pub indicator: TimeIndicator,
    pub resolver: LinkResolver,
    pub affordances: Affordances,
    pub batch: Option<String>,
    pub theme: Theme,
    pub max_row_height: u16,
    pub notice: Option<String>,
    /// First visible line of the day view.
    pub scroll: usize,
    now: DateTime<Tz>,
}

impl<Tz: TimeZone> Context<Tz> {
    pub fn new(config: &Config, agenda: Agenda<Tz>, now: DateTime<Tz>) -> Self {
        let today = now.date_naive();
        Context {
            view: ViewState::new(today),
            cursor: today,
            agenda,
            indicator: TimeIndicator::new(),
            resolver: LinkResolver::default(),
            affordances: config.surface.affordances(),
            batch: config.batch.clone(),
            theme: config.theme.clone(),
            max_row_height: config.max_row_height,
            notice: None,
            scroll: 0,
            now,
        }
    }

    pub fn with_view(mut self, view: ViewState) -> Self {
        self.view = view;
        self.cursor = view.selected();
        self
    }

    pub fn now(&self) -> &DateTime<Tz> {
        &self.now
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    pub fn update(&mut self, now: DateTime<Tz>) {
        self.now = now;
    }

    /// Runs `trigger` through the view state and fixes up everything that
    /// depends on the view.
    pub fn trigger(&mut self, trigger: Trigger) -> bool {
        let was = self.view.mode();
        if !self.view.apply(trigger, self.today()) {
            return false;
        }

        self.notice = None;
        if !self.view.visible_days().contains(&self.cursor) {
            self.cursor = self.view.anchor();
        }
        if matches!(trigger, Trigger::Today) {
            self.cursor = self.view.selected();
        }

        match (was, self.view.mode()) {
            (Mode::Month, Mode::Day) => self.scroll = 0,
            (Mode::Day, Mode::Month) => {
                self.indicator.unmount();
                self.cursor = self.view.selected();
            }
            _ => {}
        }

        true
    }

    fn move_cursor(&mut self, days: i64) -> bool {
        let target = add_days(self.cursor, days);
        if self.view.visible_days().contains(&target) {
            self.cursor = target;
            true
        } else {
            false
        }
    }

    /// Joins the `n`-th class (1-based) of the selected day.
    pub fn join_nth(&mut self, n: usize) -> Action {
        let outcome = match self
            .agenda
            .events_of_day(&self.view.selected())
            .nth(n.saturating_sub(1))
        {
            Some(event) => join::join(event, &self.now, &self.resolver),
            None => return Action::None,
        };

        self.notice = outcome.notice().map(str::to_owned);
        match outcome {
            JoinOutcome::Open(url) => Action::Open(url),
            _ => Action::Redraw,
        }
    }

    pub fn handle_key(&mut self, key: Key) -> Action {
        let changed = match (key, self.view.mode()) {
            (Key::Char('q'), _) | (Key::Ctrl('c'), _) => return Action::Quit,
            (Key::Char('t'), _) => self.trigger(Trigger::Today),
            (Key::Char('p'), _) | (Key::PageUp, _) => self.trigger(Trigger::Back),
            (Key::Char('n'), _) | (Key::PageDown, _) => self.trigger(Trigger::Next),
            (Key::Char('m'), _) | (Key::Esc, Mode::Day) => self.trigger(Trigger::SwitchToMonth),
            (Key::Char('d'), _) => self.trigger(Trigger::SwitchToDay),
            (Key::Char('a'), _) if self.affordances.can_add_class => {
                self.notice = Some(format!(
                    "Add a class with: hn-schedule --start {}T",
                    self.view.selected().format("%Y-%m-%d")
                ));
                true
            }
            (Key::Char('\n'), Mode::Month) => self.trigger(Trigger::SelectDay(self.cursor)),
            (Key::Char('h'), Mode::Month) | (Key::Left, Mode::Month) => self.move_cursor(-1),
            (Key::Char('l'), Mode::Month) | (Key::Right, Mode::Month) => self.move_cursor(1),
            (Key::Char('k'), Mode::Month) | (Key::Up, Mode::Month) => self.move_cursor(-7),
            (Key::Char('j'), Mode::Month) | (Key::Down, Mode::Month) => self.move_cursor(7),
            (Key::Char('k'), Mode::Day) | (Key::Up, Mode::Day) => {
                self.scroll = self.scroll.saturating_sub(1);
                true
            }
            (Key::Char('j'), Mode::Day) | (Key::Down, Mode::Day) => {
                self.scroll += 1;
                true
            }
            (Key::Char(c), Mode::Day) if c.is_ascii_digit() && c != '0' => {
                return self.join_nth(c as usize - '0' as usize);
            }
            _ => false,
        };

        if changed {
            Action::Redraw
        } else {
            Action::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Surface;
    use crate::provider::ScheduledEvent;
    use chrono::Utc;
    use chrono_tz::Europe::Berlin;
    use chrono_tz::Tz;
    use std::rc::Rc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn context(surface: Surface) -> Context<Tz> {
        let now = Berlin.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap();
        let at = |d: u32, h: u32| {
            Berlin
                .with_ymd_and_hms(2024, 3, d, h, 0, 0)
                .unwrap()
                .with_timezone(&Utc)
        };
        let events = Rc::from(vec![
            ScheduledEvent::new("past", at(14, 9)).link("https://zoom.us/j/1"),
            ScheduledEvent::new("now", at(15, 9)).link("abc-defg-hij"),
            ScheduledEvent::new("later", at(15, 18)),
        ]);
        let config = Config {
            surface,
            ..Config::default()
        };

        Context::new(&config, Agenda::new(events, Berlin), now)
    }

    #[test]
    fn cursor_stays_in_grid() {
        let mut ctx = context(Surface::Student);
        assert_eq!(ctx.handle_key(Key::Char('l')), Action::Redraw);
        assert_eq!(ctx.cursor, date(2024, 3, 16));

        // grid of March 2024 ends on Saturday, April 6th
        for _ in 0..10 {
            ctx.handle_key(Key::Down);
        }
        assert_eq!(ctx.cursor, date(2024, 4, 6));
        assert_eq!(ctx.handle_key(Key::Down), Action::None);
    }

    #[test]
    fn enter_opens_focused_day() {
        let mut ctx = context(Surface::Student);
        ctx.handle_key(Key::Char('h'));
        ctx.handle_key(Key::Char('\n'));

        assert_eq!(ctx.view.mode(), Mode::Day);
        assert_eq!(ctx.view.selected(), date(2024, 3, 14));
    }

    #[test]
    fn month_paging_moves_cursor_along() {
        let mut ctx = context(Surface::Student);
        ctx.handle_key(Key::Char('n'));
        ctx.handle_key(Key::Char('n'));

        assert_eq!(ctx.view.anchor(), date(2024, 5, 1));
        assert_eq!(ctx.cursor, date(2024, 5, 1));

        ctx.handle_key(Key::Char('t'));
        assert_eq!(ctx.cursor, date(2024, 3, 15));
    }

    #[test]
    fn join_from_day_view() {
        let mut ctx = context(Surface::Student);
        ctx.handle_key(Key::Char('d'));
        assert_eq!(
            ctx.handle_key(Key::Char('1')),
            Action::Open("https://meet.google.com/abc-defg-hij".to_owned())
        );

        assert_eq!(ctx.handle_key(Key::Char('2')), Action::Redraw);
        assert_eq!(ctx.notice.as_deref(), Some("No meeting link for this class"));

        assert_eq!(ctx.handle_key(Key::Char('3')), Action::None);

        ctx.handle_key(Key::Char('p'));
        assert_eq!(ctx.handle_key(Key::Char('1')), Action::Redraw);
        assert_eq!(ctx.notice.as_deref(), Some("This class link has expired"));
    }

    #[test]
    fn leaving_day_view_unmounts_rows() {
        let mut ctx = context(Surface::Student);
        ctx.handle_key(Key::Char('d'));
        ctx.indicator.invalidate();
        ctx.handle_key(Key::Esc);

        assert_eq!(ctx.view.mode(), Mode::Month);
        assert!(ctx.indicator.geometry().is_none());
    }

    #[test]
    fn add_class_only_for_admins() {
        let mut student = context(Surface::Student);
        assert_eq!(student.handle_key(Key::Char('a')), Action::None);

        let mut admin = context(Surface::Admin);
        assert_eq!(admin.handle_key(Key::Char('a')), Action::Redraw);
        assert!(admin.notice.as_deref().unwrap().contains("2024-03-15"));
    }

    #[test]
    fn quits() {
        let mut ctx = context(Surface::Student);
        assert_eq!(ctx.handle_key(Key::Char('q')), Action::Quit);
    }
}
