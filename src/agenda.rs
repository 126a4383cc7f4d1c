use chrono::{Datelike, NaiveDate, TimeZone};
use std::collections::HashMap;
use std::rc::Rc;

use crate::datetime::{format_date_key, DayKey};
use crate::provider::ScheduledEvent;

/// Day-keyed index over an immutable snapshot of scheduled classes.
///
/// Events are bucketed by the local date of their begin in `tz`. Within a
/// bucket events keep the order of the snapshot.
pub struct Agenda<Tz: TimeZone> {
    events: Rc<[ScheduledEvent]>,
    buckets: HashMap<DayKey, Vec<usize>>,
    tz: Tz,
}

impl<Tz: TimeZone> Agenda<Tz> {
    pub fn new(events: Rc<[ScheduledEvent]>, tz: Tz) -> Self {
        let buckets = Self::bucket(&events, &tz);
        Agenda {
            events,
            buckets,
            tz,
        }
    }

    fn bucket(events: &[ScheduledEvent], tz: &Tz) -> HashMap<DayKey, Vec<usize>> {
        let mut buckets: HashMap<DayKey, Vec<usize>> = HashMap::new();
        for (idx, event) in events.iter().enumerate() {
            let key = format_date_key(&event.begin().with_timezone(tz));
            buckets.entry(key).or_default().push(idx);
        }
        buckets
    }

    /// Swaps in a new snapshot. Re-indexes only if it is a different list.
    pub fn replace(&mut self, events: Rc<[ScheduledEvent]>) -> bool {
        if Rc::ptr_eq(&self.events, &events) {
            return false;
        }

        log::debug!("Re-indexing {} classes", events.len());
        self.buckets = Self::bucket(&events, &self.tz);
        self.events = events;
        true
    }

    pub fn tz(&self) -> &Tz {
        &self.tz
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events_of_key<'a>(&'a self, key: &DayKey) -> impl Iterator<Item = &'a ScheduledEvent> + 'a {
        self.buckets
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(move |&idx| &self.events[idx])
    }

    pub fn events_of_day<'a, D: Datelike>(
        &'a self,
        date: &D,
    ) -> impl Iterator<Item = &'a ScheduledEvent> + 'a {
        self.events_of_key(&format_date_key(date))
    }

    pub fn count_of_day<D: Datelike>(&self, date: &D) -> usize {
        self.buckets
            .get(&format_date_key(date))
            .map_or(0, Vec::len)
    }

    /// Number of classes per day for each date of `days`.
    pub fn counts<'a>(&'a self, days: &'a [NaiveDate]) -> impl Iterator<Item = usize> + 'a {
        days.iter().map(move |day| self.count_of_day(day))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datetime::month_grid;
    use chrono::Utc;
    use chrono_tz::America::New_York;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> chrono::DateTime<Utc> {
        New_York
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn snapshot() -> Rc<[ScheduledEvent]> {
        Rc::from(vec![
            ScheduledEvent::new("late", at(2024, 3, 15, 23, 55)),
            ScheduledEvent::new("other", at(2024, 3, 16, 9, 0)),
            ScheduledEvent::new("early", at(2024, 3, 15, 0, 5)),
        ])
    }

    #[test]
    fn groups_by_local_day_in_arrival_order() {
        let agenda = Agenda::new(snapshot(), New_York);
        let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

        let ids: Vec<_> = agenda.events_of_day(&day).map(ScheduledEvent::id).collect();
        assert_eq!(ids, ["late", "early"]);
        assert_eq!(agenda.count_of_day(&day), 2);
    }

    #[test]
    fn absent_day_is_empty() {
        let agenda = Agenda::new(snapshot(), New_York);
        let day = NaiveDate::from_ymd_opt(2024, 3, 17).unwrap();

        assert_eq!(agenda.events_of_day(&day).count(), 0);
        assert_eq!(agenda.count_of_day(&day), 0);
    }

    #[test]
    fn buckets_in_display_zone_not_utc() {
        // 23:55 in New York is already the next day in UTC
        let agenda = Agenda::new(snapshot(), Utc);
        let day = NaiveDate::from_ymd_opt(2024, 3, 16).unwrap();

        let ids: Vec<_> = agenda.events_of_day(&day).map(ScheduledEvent::id).collect();
        assert_eq!(ids, ["late", "other"]);
    }

    #[test]
    fn replace_reindexes_only_new_lists() {
        let events = snapshot();
        let mut agenda = Agenda::new(events.clone(), New_York);
        assert!(!agenda.replace(events));

        let next: Rc<[ScheduledEvent]> = Rc::from(vec![ScheduledEvent::new(
            "moved",
            at(2024, 3, 20, 12, 0),
        )]);
        assert!(agenda.replace(next));

        let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(agenda.count_of_day(&day), 0);
        assert_eq!(agenda.len(), 1);
    }

    #[test]
    fn counts_follow_grid() {
        let agenda = Agenda::new(snapshot(), New_York);
        let grid = month_grid(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());

        let total: usize = agenda.counts(&grid).sum();
        assert_eq!(total, 3);
    }
}
