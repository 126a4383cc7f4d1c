use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::{EventRecord, EventSource, Result};

#[derive(Deserialize)]
#[serde(untagged)]
enum Listing {
    Bare(Vec<EventRecord>),
    Wrapped { data: Vec<EventRecord> },
}

impl From<Listing> for Vec<EventRecord> {
    fn from(listing: Listing) -> Self {
        match listing {
            Listing::Bare(records) => records,
            Listing::Wrapped { data } => data,
        }
    }
}

/// Reads records from a JSON file, either a bare array or `{ "data": [...] }`.
pub struct JsonFileSource {
    path: PathBuf,
    name: String,
}

impl JsonFileSource {
    pub fn new(path: &Path) -> Self {
        JsonFileSource {
            path: path.to_owned(),
            name: path.display().to_string(),
        }
    }

    pub fn parse(content: &str) -> Result<Vec<EventRecord>> {
        let listing: Listing = serde_json::from_str(content)?;
        Ok(listing.into())
    }
}

impl EventSource for JsonFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self) -> Result<Vec<EventRecord>> {
        log::debug!("Reading classes from {}", self.path.display());
        let content = fs::read_to_string(&self.path)?;
        Self::parse(&content)
    }
}

/// Records held in memory.
#[derive(Default)]
pub struct StaticSource(Vec<EventRecord>);

impl StaticSource {
    pub fn new(records: Vec<EventRecord>) -> Self {
        StaticSource(records)
    }
}

impl EventSource for StaticSource {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch(&self) -> Result<Vec<EventRecord>> {
        Ok(self.0.clone())
    }
}
