use chrono::TimeZone;

pub mod error;
pub mod event;
pub mod json;

pub use error::{Error, ErrorKind};
pub use event::{EventRecord, RecordId, ScheduledEvent, DEFAULT_TITLE};
pub use json::{JsonFileSource, StaticSource};

pub type Result<T> = std::result::Result<T, Error>;

/// Supplier of the raw class list, fetched once per view activation.
pub trait EventSource {
    fn name(&self) -> &str;
    fn fetch(&self) -> Result<Vec<EventRecord>>;
}

/// Fetches `source` and converts its records.
///
/// Records that fail validation are logged and skipped. With a `batch`, records
/// tagged with a different batch id are dropped, untagged ones are kept.
pub fn load_events<Tz: TimeZone>(
    source: &dyn EventSource,
    batch: Option<&str>,
    tz: &Tz,
) -> Result<Vec<ScheduledEvent>> {
    let records = source.fetch()?;
    let total = records.len();

    let events: Vec<ScheduledEvent> = records
        .into_iter()
        .filter(|record| match (batch, record.batch_id.as_deref()) {
            (Some(wanted), Some(actual)) => wanted == actual,
            _ => true,
        })
        .map(|record| record.into_event(tz))
        .inspect(|e| {
            if let Err(e) = e {
                log::warn!("{}: {}", source.name(), e)
            }
        })
        .filter_map(Result::ok)
        .collect();

    log::info!(
        "Loaded {} of {} classes from {}",
        events.len(),
        total,
        source.name()
    );

    Ok(events)
}
