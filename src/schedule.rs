//! Validation of new live classes and the data handed on for them.

use chrono::{DateTime, Duration, TimeZone, Utc};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::error;
use std::fmt;
use url::Url;

use crate::datetime::{is_same_day, parse_instant};

const GOOGLE_DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";

static GOOGLE_CALENDAR_RENDER: Lazy<Url> = Lazy::new(|| {
    Url::parse("https://calendar.google.com/calendar/render").expect("static calendar url")
});

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidationError {
    MissingTitle,
    MissingStart,
    InvalidStart(String),
    InvalidEnd(String),
    EndBeforeStart,
    PassedToday,
    PastDay,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingTitle => write!(f, "Please enter a title for the class"),
            ValidationError::MissingStart => write!(f, "Please choose a date and time"),
            ValidationError::InvalidStart(s) => write!(f, "'{}' is not a valid date and time", s),
            ValidationError::InvalidEnd(s) => write!(f, "'{}' is not a valid end time", s),
            ValidationError::EndBeforeStart => write!(f, "The class cannot end before it starts"),
            ValidationError::PassedToday => write!(
                f,
                "This time has already passed today, please pick a later time"
            ),
            ValidationError::PastDay => write!(f, "Classes cannot be scheduled on a past date"),
        }
    }
}

impl error::Error for ValidationError {}

/// User input of the "create live class" form, as typed.
#[derive(Clone, Debug, Default)]
pub struct LiveClassDraft {
    pub title: String,
    pub description: String,
    pub link: String,
    pub start: String,
    pub end: Option<String>,
}

/// Body sent to the service creating the class.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveClassPayload {
    pub title: String,
    pub description: String,
    pub link: String,
    pub start_time: String,
}

/// A draft that passed validation.
#[derive(Clone, Debug, PartialEq)]
pub struct LiveClass {
    title: String,
    description: String,
    link: String,
    begin: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl LiveClassDraft {
    /// Checks the draft against the submission time `now`.
    ///
    /// Times without an offset are read in `now`'s time zone.
    pub fn validate<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<LiveClass, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::MissingTitle);
        }

        let start = self.start.trim();
        if start.is_empty() {
            return Err(ValidationError::MissingStart);
        }

        let tz = now.timezone();
        let begin = parse_instant(start, &tz)
            .map_err(|_| ValidationError::InvalidStart(start.to_owned()))?;

        if begin <= *now {
            return Err(if is_same_day(&begin.with_timezone(&tz), now) {
                ValidationError::PassedToday
            } else {
                ValidationError::PastDay
            });
        }

        let end = match self.end.as_deref().map(str::trim) {
            Some(end) if !end.is_empty() => {
                let end = parse_instant(end, &tz)
                    .map_err(|_| ValidationError::InvalidEnd(end.to_owned()))?;
                if end < begin {
                    return Err(ValidationError::EndBeforeStart);
                }
                end
            }
            _ => begin + Duration::hours(1),
        };

        Ok(LiveClass {
            title: title.to_owned(),
            description: self.description.trim().to_owned(),
            link: self.link.trim().to_owned(),
            begin,
            end,
        })
    }
}

impl LiveClass {
    pub fn begin(&self) -> DateTime<Utc> {
        self.begin
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn payload(&self) -> LiveClassPayload {
        LiveClassPayload {
            title: self.title.clone(),
            description: self.description.clone(),
            link: self.link.clone(),
            start_time: self.begin.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        }
    }

    pub fn google_calendar_link(&self, ctz: Option<&str>) -> Url {
        google_calendar_link(&self.title, &self.description, self.begin, self.end, ctz)
    }
}

/// Event-creation link for Google Calendar.
pub fn google_calendar_link(
    title: &str,
    details: &str,
    begin: DateTime<Utc>,
    end: DateTime<Utc>,
    ctz: Option<&str>,
) -> Url {
    let mut url = GOOGLE_CALENDAR_RENDER.clone();
    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("action", "TEMPLATE")
            .append_pair("text", title)
            .append_pair("details", details)
            .append_pair(
                "dates",
                &format!(
                    "{}/{}",
                    begin.format(GOOGLE_DATE_FORMAT),
                    end.format(GOOGLE_DATE_FORMAT)
                ),
            );
        if let Some(ctz) = ctz {
            query.append_pair("ctz", ctz);
        }
    }
    url
}
