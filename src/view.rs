use chrono::NaiveDate;
use std::fmt;

use crate::datetime::{add_days, month_grid, shift_month};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Month,
    Day,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Month => write!(f, "month"),
            Mode::Day => write!(f, "day"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    Today,
    Back,
    Next,
    /// A click on a day cell of the month grid.
    SelectDay(NaiveDate),
    SwitchToMonth,
    SwitchToDay,
}

/// Month/day view state machine.
///
/// In day mode the anchor always equals the selected date.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewState {
    mode: Mode,
    anchor: NaiveDate,
    selected: NaiveDate,
}

impl ViewState {
    pub fn new(today: NaiveDate) -> Self {
        ViewState {
            mode: Mode::Month,
            anchor: today,
            selected: today,
        }
    }

    /// Starts in day mode on `day`.
    pub fn on_day(day: NaiveDate) -> Self {
        ViewState {
            mode: Mode::Day,
            anchor: day,
            selected: day,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    fn enter_day(&mut self) {
        self.mode = Mode::Day;
        self.anchor = self.selected;
    }

    fn select(&mut self, day: NaiveDate) {
        self.selected = day;
        self.anchor = day;
    }

    /// Applies `trigger` and reports whether anything changed.
    ///
    /// Triggers that are not defined for the current mode are ignored.
    pub fn apply(&mut self, trigger: Trigger, today: NaiveDate) -> bool {
        use Trigger::*;

        let before = *self;

        match (trigger, self.mode) {
            (Today, _) => self.select(today),
            // Day of month is reset to the 1st on purpose
            (Back, Mode::Month) => self.anchor = shift_month(self.anchor, -1),
            (Next, Mode::Month) => self.anchor = shift_month(self.anchor, 1),
            (Back, Mode::Day) => self.select(add_days(self.selected, -1)),
            (Next, Mode::Day) => self.select(add_days(self.selected, 1)),
            (SelectDay(day), Mode::Month) => {
                self.selected = day;
                self.enter_day();
            }
            (SwitchToMonth, Mode::Day) => self.mode = Mode::Month,
            (SwitchToDay, Mode::Month) => self.enter_day(),
            (trigger, mode) => log::debug!("Ignoring {:?} in {} view", trigger, mode),
        }

        *self != before
    }

    /// Dates on screen: the month grid or the single selected day.
    pub fn visible_days(&self) -> Vec<NaiveDate> {
        match self.mode {
            Mode::Month => month_grid(self.anchor),
            Mode::Day => vec![self.selected],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn starts_in_month_on_today() {
        let view = ViewState::new(date(2024, 3, 15));
        assert_eq!(view.mode(), Mode::Month);
        assert_eq!(view.anchor(), date(2024, 3, 15));
        assert_eq!(view.selected(), date(2024, 3, 15));
    }

    #[test]
    fn month_navigation_resets_day() {
        let today = date(2024, 3, 15);
        let mut view = ViewState::new(today);

        assert!(view.apply(Trigger::Back, today));
        assert_eq!(view.anchor(), date(2024, 2, 1));
        assert_eq!(view.selected(), today);

        view.apply(Trigger::Next, today);
        view.apply(Trigger::Next, today);
        assert_eq!(view.anchor(), date(2024, 4, 1));
    }

    #[test]
    fn month_navigation_crosses_years() {
        let today = date(2024, 1, 20);
        let mut view = ViewState::new(today);

        view.apply(Trigger::Back, today);
        assert_eq!(view.anchor(), date(2023, 12, 1));
    }

    #[test]
    fn day_navigation_moves_one_day() {
        let today = date(2024, 3, 20);
        let mut view = ViewState::new(today);

        assert!(view.apply(Trigger::SelectDay(date(2024, 3, 1)), today));
        assert_eq!(view.mode(), Mode::Day);

        view.apply(Trigger::Back, today);
        assert_eq!(view.selected(), date(2024, 2, 29));
        assert_eq!(view.anchor(), date(2024, 2, 29));

        view.apply(Trigger::Next, today);
        view.apply(Trigger::Next, today);
        assert_eq!(view.selected(), date(2024, 3, 2));
        assert_eq!(view.anchor(), date(2024, 3, 2));
    }

    #[test]
    fn day_navigation_crosses_years() {
        let mut view = ViewState::on_day(date(2024, 12, 31));
        view.apply(Trigger::Next, date(2024, 6, 1));
        assert_eq!(view.selected(), date(2025, 1, 1));
    }

    #[test]
    fn today_from_anywhere() {
        let today = date(2024, 3, 15);
        let mut view = ViewState::on_day(date(2023, 7, 4));

        view.apply(Trigger::Today, today);
        assert_eq!(view.mode(), Mode::Day);
        assert_eq!(view.selected(), today);
        assert_eq!(view.anchor(), today);

        view.apply(Trigger::SwitchToMonth, today);
        view.apply(Trigger::Back, today);
        view.apply(Trigger::Today, today);
        assert_eq!(view.mode(), Mode::Month);
        assert_eq!(view.anchor(), today);
    }

    #[test]
    fn switching_keeps_selection() {
        let today = date(2024, 3, 15);
        let mut view = ViewState::new(today);
        view.apply(Trigger::SelectDay(date(2024, 3, 9)), today);

        assert!(view.apply(Trigger::SwitchToMonth, today));
        assert_eq!(view.mode(), Mode::Month);
        assert_eq!(view.selected(), date(2024, 3, 9));

        assert!(view.apply(Trigger::SwitchToDay, today));
        assert_eq!(view.mode(), Mode::Day);
        assert_eq!(view.anchor(), date(2024, 3, 9));
    }

    #[test]
    fn undefined_triggers_are_noops() {
        let today = date(2024, 3, 15);
        let mut view = ViewState::new(today);
        assert!(!view.apply(Trigger::SwitchToMonth, today));

        let mut day = ViewState::on_day(today);
        let before = day;
        assert!(!day.apply(Trigger::SwitchToDay, today));
        assert!(!day.apply(Trigger::SelectDay(date(2024, 1, 1)), today));
        assert_eq!(day, before);
    }

    #[test]
    fn visible_days_per_mode() {
        let today = date(2024, 3, 15);
        let mut view = ViewState::new(today);
        assert_eq!(view.visible_days().len(), 42);

        view.apply(Trigger::SwitchToDay, today);
        assert_eq!(view.visible_days(), vec![today]);
    }
}
