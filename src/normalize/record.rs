use log::{debug, info};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::discogs::types::{BasicInformation, CollectionRelease};
use crate::normalize::{clean, decade_of, normalize_format, split_multi, to_year};
use crate::{NormalizedRecord, Result};

const ARTIST_HEADERS: &[&str] = &["Artist", "Artists", "artist"];
const TITLE_HEADERS: &[&str] = &["Title", "Release Title", "title"];
const LABEL_HEADERS: &[&str] = &["Label", "Labels", "label"];
const FORMAT_HEADERS: &[&str] = &["Format", "Formats", "format"];
const RELEASED_HEADERS: &[&str] = &["Released", "Year", "Released Year", "released"];
const COUNTRY_HEADERS: &[&str] = &["Country", "country"];

/// Stems of the numbered one-value-per-column headers.
pub const ARTIST_COLUMN: &str = "Artist";
pub const LABEL_COLUMN: &str = "Label";
pub const FORMAT_COLUMN: &str = "Format";

/// `"Artist 3"` for `numbered_header("Artist", 3)`.
pub fn numbered_header(stem: &str, n: usize) -> String {
    format!("{} {}", stem, n)
}

/// One CSV data row keyed by header name.
pub type CsvRow = HashMap<String, String>;

pub struct RecordNormalizer;

impl RecordNormalizer {
    pub fn from_api(release: &CollectionRelease) -> NormalizedRecord {
        Self::from_basic_information(&release.basic_information)
    }

    pub fn from_basic_information(info: &BasicInformation) -> NormalizedRecord {
        let year = info.year.as_ref().and_then(|value| match value {
            serde_json::Value::String(s) => to_year(s),
            serde_json::Value::Number(n) => to_year(&n.to_string()),
            _ => None,
        });

        let labels = info
            .labels
            .iter()
            .flatten()
            .map(|label| clean(&label.name))
            .filter(|name| !name.is_empty())
            .collect();

        let formats = info
            .formats
            .iter()
            .flatten()
            .flat_map(|format| {
                format
                    .name
                    .iter()
                    .chain(format.descriptions.iter().flatten())
            })
            .filter_map(|s| normalize_format(s))
            .collect();

        let artists = info
            .artists
            .iter()
            .flatten()
            .map(|artist| clean(&artist.name))
            .filter(|name| !name.is_empty())
            .collect();

        NormalizedRecord {
            year,
            decade: year.map(decade_of),
            labels,
            formats,
            // Discogs collection listings carry no country
            country: None,
            artists,
            title: info.title.clone(),
        }
    }

    /// Normalize one CSV row. Rows without artist, title and label are
    /// stray header/footer lines and yield `None`.
    ///
    /// Multi-valued fields come either from a Discogs-style column split on
    /// `,`/`;` or from numbered columns (`Artist 1`, `Artist 2`, ...) holding
    /// one value each, as written by the record export.
    pub fn from_csv_row(row: &CsvRow) -> Option<NormalizedRecord> {
        let artists = match numbered_values(row, ARTIST_COLUMN) {
            Some(values) => clean_all(values),
            None => cleaned_parts(pick(row, ARTIST_HEADERS)),
        };
        let labels = match numbered_values(row, LABEL_COLUMN) {
            Some(values) => clean_all(values),
            None => cleaned_parts(pick(row, LABEL_HEADERS)),
        };
        let title = pick(row, TITLE_HEADERS);

        if artists.is_empty() && title.is_none() && labels.is_empty() {
            return None;
        }

        let formats = numbered_values(row, FORMAT_COLUMN)
            .unwrap_or_else(|| pick(row, FORMAT_HEADERS).map(split_multi).unwrap_or_default())
            .iter()
            .filter_map(|f| normalize_format(f))
            .collect();
        let year = pick(row, RELEASED_HEADERS).and_then(to_year);
        let country = pick(row, COUNTRY_HEADERS)
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        Some(NormalizedRecord {
            year,
            decade: year.map(decade_of),
            labels,
            formats,
            country,
            artists,
            title: title.map(|t| t.trim().to_string()),
        })
    }

    /// Read a Discogs collection CSV export (header row required).
    pub fn read_csv<R: Read>(reader: R) -> Result<Vec<NormalizedRecord>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let mut records = Vec::new();
        let mut skipped = 0usize;

        for result in csv_reader.records() {
            let record = result?;
            let row: CsvRow = headers
                .iter()
                .zip(record.iter())
                .map(|(header, value)| (header.trim().to_string(), value.to_string()))
                .collect();

            match Self::from_csv_row(&row) {
                Some(normalized) => records.push(normalized),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            debug!("Skipped {} non-data CSV row(s)", skipped);
        }
        info!("Normalized {} record(s) from CSV", records.len());
        Ok(records)
    }

    pub fn read_csv_path(path: impl AsRef<Path>) -> Result<Vec<NormalizedRecord>> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::read_csv(file)
    }

    pub fn normalize_releases(releases: &[CollectionRelease]) -> Vec<NormalizedRecord> {
        releases.iter().map(Self::from_api).collect()
    }
}

/// First header variant holding a non-empty value.
fn pick<'a>(row: &'a CsvRow, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| row.get(*key))
        .map(String::as_str)
        .find(|value| !value.is_empty())
}

/// Values of `stem 1`, `stem 2`, ... in order, trimmed and unsplit.
/// `None` when the row has no `stem 1` column.
fn numbered_values(row: &CsvRow, stem: &str) -> Option<Vec<String>> {
    if !row.contains_key(&numbered_header(stem, 1)) {
        return None;
    }
    Some(
        (1..)
            .map_while(|n| row.get(&numbered_header(stem, n)))
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

fn cleaned_parts(value: Option<&str>) -> Vec<String> {
    clean_all(value.map(split_multi).unwrap_or_default())
}

fn clean_all(values: Vec<String>) -> Vec<String> {
    values
        .iter()
        .map(|part| clean(part))
        .filter(|part| !part.is_empty())
        .collect()
}
