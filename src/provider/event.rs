use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Deserialize;
use std::fmt;

use super::{Error, ErrorKind, Result};
use crate::datetime::parse_instant;

pub const DEFAULT_TITLE: &str = "Live Class";

/// Identifiers arrive either as strings or as plain numbers.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Text(String),
    Number(i64),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Text(s) => write!(f, "{}", s),
            RecordId::Number(n) => write!(f, "{}", n),
        }
    }
}

/// A live class as delivered by the data source, before validation.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    #[serde(alias = "_id")]
    pub id: Option<RecordId>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    #[serde(alias = "batchName")]
    pub group_label: Option<String>,
    pub batch_id: Option<String>,
}

impl EventRecord {
    /// Validates the record, reading offset-less times in `tz`.
    pub fn into_event<Tz: TimeZone>(self, tz: &Tz) -> Result<ScheduledEvent> {
        let id = self
            .id
            .ok_or_else(|| Error::new(ErrorKind::EventMissingKey, "id"))?
            .to_string();

        let start_time = self.start_time.ok_or_else(|| {
            Error::new(
                ErrorKind::EventMissingKey,
                &format!("startTime of event '{}'", id),
            )
        })?;
        let begin = parse_instant(&start_time, tz)?;

        let end = match self.end_time {
            Some(end_time) => parse_instant(&end_time, tz)?,
            None => begin + Duration::hours(1),
        };

        if end < begin {
            return Err(Error::new(
                ErrorKind::EventParse,
                &format!("event '{}' ends before it starts", id),
            ));
        }

        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_owned());

        Ok(ScheduledEvent {
            id,
            title,
            description: self.description,
            link: self.link,
            begin,
            end,
            group_label: self.group_label,
            batch_id: self.batch_id,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScheduledEvent {
    id: String,
    title: String,
    description: Option<String>,
    link: Option<String>,
    begin: DateTime<Utc>,
    end: DateTime<Utc>,
    group_label: Option<String>,
    batch_id: Option<String>,
}

impl ScheduledEvent {
    /// A one hour event titled [`DEFAULT_TITLE`].
    pub fn new(id: &str, begin: DateTime<Utc>) -> Self {
        ScheduledEvent {
            id: id.to_owned(),
            title: DEFAULT_TITLE.to_owned(),
            description: None,
            link: None,
            begin,
            end: begin + Duration::hours(1),
            group_label: None,
            batch_id: None,
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_owned();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_owned());
        self
    }

    pub fn link(mut self, link: &str) -> Self {
        self.link = Some(link.to_owned());
        self
    }

    pub fn group_label(mut self, label: &str) -> Self {
        self.group_label = Some(label.to_owned());
        self
    }

    pub fn batch_id(mut self, batch: &str) -> Self {
        self.batch_id = Some(batch.to_owned());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn summary(&self) -> &str {
        &self.title
    }

    pub fn details(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn link_text(&self) -> Option<&str> {
        self.link.as_deref()
    }

    pub fn begin(&self) -> DateTime<Utc> {
        self.begin
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.begin
    }

    pub fn group(&self) -> Option<&str> {
        self.group_label.as_deref()
    }

    pub fn batch(&self) -> Option<&str> {
        self.batch_id.as_deref()
    }
}
