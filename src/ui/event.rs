use chrono::{DateTime, TimeZone};
use std::fmt::Display;

use crate::join;
use crate::provider::ScheduledEvent;

/// One-line summary of a class: time span, title, group and badge.
pub struct EventLine<'e> {
    event: &'e ScheduledEvent,
    number: Option<usize>,
    show_group: bool,
    indent: usize,
}

impl<'e> EventLine<'e> {
    pub fn new(event: &'e ScheduledEvent) -> Self {
        EventLine {
            event,
            number: None,
            show_group: false,
            indent: 2,
        }
    }

    pub fn number(mut self, number: usize) -> Self {
        self.number = Some(number);
        self
    }

    pub fn show_group(mut self, show: bool) -> Self {
        self.show_group = show;
        self
    }

    pub fn indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn render<Tz: TimeZone>(&self, tz: &Tz, now: &DateTime<Tz>) -> String
    where
        Tz::Offset: Display,
    {
        let begin = self.event.begin().with_timezone(tz);
        let end = self.event.end().with_timezone(tz);

        let mut line = " ".repeat(self.indent);
        if let Some(n) = self.number {
            line += &format!("{}) ", n);
        }
        line += &format!(
            "{}-{} {}",
            begin.format("%H:%M"),
            end.format("%H:%M"),
            self.event.summary()
        );
        if self.show_group {
            if let Some(group) = self.event.group() {
                line += &format!(" ({})", group);
            }
        }
        line += &format!(" [{}]", join::badge(self.event, now));

        line
    }
}
