use log::info;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::{Result, VinylError};

/// Hand-entered track lengths keyed by `(artist, title)`; an entry wins
/// over whatever duration the data file carries.
#[derive(Debug, Clone, Default)]
pub struct DurationOverrides {
    durations: HashMap<(String, String), u32>,
}

#[derive(Debug, Deserialize)]
struct OverrideRow {
    artist: String,
    title: String,
    duration: String,
}

impl DurationOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, artist: impl Into<String>, title: impl Into<String>, secs: u32) {
        self.durations.insert((artist.into(), title.into()), secs);
    }

    pub fn get(&self, artist: &str, title: &str) -> Option<u32> {
        self.durations
            .get(&(artist.to_string(), title.to_string()))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.durations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    /// CSV with `artist,title,duration` columns.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut overrides = Self::new();
        for row in csv_reader.deserialize() {
            let row: OverrideRow = row?;
            let secs = parse_duration(&row.duration)?;
            overrides.insert(row.artist, row.title, secs);
        }
        Ok(overrides)
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let overrides = Self::from_csv(std::fs::File::open(path)?)?;
        info!("Loaded {} duration override(s) from {}", overrides.len(), path.display());
        Ok(overrides)
    }
}

/// `"m:ss"` or a plain number of seconds.
pub fn parse_duration(value: &str) -> Result<u32> {
    let value = value.trim();
    let invalid = || VinylError::InvalidDuration(value.to_string());

    match value.split_once(':') {
        Some((minutes, seconds)) => {
            let minutes: u32 = minutes.trim().parse().map_err(|_| invalid())?;
            let seconds: u32 = if seconds.trim().is_empty() {
                0
            } else {
                seconds.trim().parse().map_err(|_| invalid())?
            };
            minutes
                .checked_mul(60)
                .and_then(|m| m.checked_add(seconds))
                .ok_or_else(invalid)
        }
        None => value.parse().map_err(|_| invalid()),
    }
}
