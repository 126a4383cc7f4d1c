use chrono::{DateTime, TimeZone};
use std::fmt;

use crate::datetime::is_same_day;
use crate::link::LinkResolver;
use crate::provider::ScheduledEvent;

/// An event can still be joined if it has not started yet or starts today.
///
/// "Today" is the local calendar day of `now`.
pub fn is_joinable<Tz: TimeZone>(event: &ScheduledEvent, now: &DateTime<Tz>) -> bool {
    let begin = event.begin().with_timezone(&now.timezone());
    begin > *now || is_same_day(&begin, now)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Badge {
    Join,
    Done,
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Badge::Join => write!(f, "Join"),
            Badge::Done => write!(f, "Done"),
        }
    }
}

pub fn badge<Tz: TimeZone>(event: &ScheduledEvent, now: &DateTime<Tz>) -> Badge {
    if is_joinable(event, now) {
        Badge::Join
    } else {
        Badge::Done
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JoinOutcome {
    Open(String),
    Expired,
    NoLink,
}

impl JoinOutcome {
    /// User-facing notice for outcomes that do not navigate.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            JoinOutcome::Open(_) => None,
            JoinOutcome::Expired => Some("This class link has expired"),
            JoinOutcome::NoLink => Some("No meeting link for this class"),
        }
    }
}

/// Decides what a join request on `event` does.
///
/// The link field is searched first, the description second.
pub fn join<Tz: TimeZone>(
    event: &ScheduledEvent,
    now: &DateTime<Tz>,
    resolver: &LinkResolver,
) -> JoinOutcome {
    if !is_joinable(event, now) {
        log::info!("Refusing to join past class '{}'", event.id());
        return JoinOutcome::Expired;
    }

    match resolver.resolve_any(vec![event.link_text(), event.details()]) {
        Some(url) => JoinOutcome::Open(url),
        None => JoinOutcome::NoLink,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use chrono_tz::Asia::Kolkata;

    fn at(d: u32, h: u32) -> DateTime<chrono_tz::Tz> {
        Kolkata.with_ymd_and_hms(2024, 3, d, h, 0, 0).unwrap()
    }

    fn class(d: u32, h: u32) -> ScheduledEvent {
        ScheduledEvent::new("c", at(d, h).with_timezone(&Utc))
    }

    #[test]
    fn yesterday_is_done() {
        let now = at(15, 10);
        let event = class(14, 10);

        assert!(!is_joinable(&event, &now));
        assert_eq!(badge(&event, &now), Badge::Done);
        assert_eq!(badge(&event, &now).to_string(), "Done");
    }

    #[test]
    fn later_today_and_future_are_joinable() {
        let now = at(15, 10);
        assert!(is_joinable(&class(15, 23), &now));
        assert!(is_joinable(&class(20, 8), &now));
    }

    #[test]
    fn earlier_today_stays_joinable() {
        let now = at(15, 23);
        assert_eq!(badge(&class(15, 1), &now), Badge::Join);
    }

    #[test]
    fn same_day_is_judged_locally() {
        // 01:00 in Kolkata on the 15th is still the 14th in UTC
        let now = at(15, 10);
        let event = class(15, 1);
        assert!(is_joinable(&event, &now));
        assert!(!is_joinable(&event, &now.with_timezone(&Utc)));
    }

    #[test]
    fn join_outcomes() {
        let resolver = LinkResolver::default();
        let now = at(15, 10);

        let live = class(15, 11).link("meet abc-defg-hij");
        assert_eq!(
            join(&live, &now, &resolver),
            JoinOutcome::Open("https://meet.google.com/abc-defg-hij".to_owned())
        );

        let past = class(1, 11).link("https://zoom.us/j/1");
        let outcome = join(&past, &now, &resolver);
        assert_eq!(outcome, JoinOutcome::Expired);
        assert_eq!(outcome.notice(), Some("This class link has expired"));

        let bare = class(16, 9).link("tbd");
        assert_eq!(join(&bare, &now, &resolver), JoinOutcome::NoLink);
    }

    #[test]
    fn link_field_wins_over_description() {
        let resolver = LinkResolver::default();
        let now = at(15, 10);
        let event = class(15, 12)
            .link("https://zoom.us/j/1")
            .description("Backup room https://meet.google.com/xyz-abcd-efg");

        assert_eq!(
            join(&event, &now, &resolver),
            JoinOutcome::Open("https://zoom.us/j/1".to_owned())
        );
    }

    #[test]
    fn description_is_fallback() {
        let resolver = LinkResolver::default();
        let now = at(15, 10);
        let event = class(15, 12).description("Room: zoom.us/j/42");

        assert_eq!(
            join(&event, &now, &resolver),
            JoinOutcome::Open("https://zoom.us/j/42".to_owned())
        );
    }
}
