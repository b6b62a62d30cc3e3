use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::discogs::CollectionRelease;
use crate::normalize::record::RecordNormalizer;
use crate::{NormalizedRecord, Result};

/// What kind of collection dump a file holds, judged by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionSource {
    /// Discogs "Export collection" CSV
    Csv,
    /// JSON array as returned by the collection endpoint
    ApiJson,
}

impl CollectionSource {
    pub fn detect(path: impl AsRef<Path>) -> Self {
        match path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("json") => CollectionSource::ApiJson,
            _ => CollectionSource::Csv,
        }
    }
}

pub fn ensure_parent_dir(path: impl AsRef<Path>) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let file = fs::File::open(path.as_ref())?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

pub fn write_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;
    let mut writer = BufWriter::new(fs::File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

/// Load normalized records from either a CSV export or saved API JSON.
pub fn load_collection(path: impl AsRef<Path>) -> Result<Vec<NormalizedRecord>> {
    let path = path.as_ref();
    match CollectionSource::detect(path) {
        CollectionSource::Csv => RecordNormalizer::read_csv_path(path),
        CollectionSource::ApiJson => {
            let releases: Vec<CollectionRelease> = read_json(path)?;
            Ok(RecordNormalizer::normalize_releases(&releases))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn detects_source_by_extension() {
        assert_eq!(CollectionSource::detect("dump.JSON"), CollectionSource::ApiJson);
        assert_eq!(CollectionSource::detect("export.csv"), CollectionSource::Csv);
        assert_eq!(CollectionSource::detect("export"), CollectionSource::Csv);
    }

    #[test]
    fn json_written_into_missing_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("out.json");

        write_json(&path, &vec![1, 2, 3]).unwrap();
        let back: Vec<i32> = read_json(&path).unwrap();

        assert_eq!(back, vec![1, 2, 3]);
    }

    #[test]
    fn loads_saved_api_json_and_csv_export() {
        let dir = tempdir().unwrap();

        let json_path = dir.path().join("collection.json");
        let releases = serde_json::json!([{
            "id": 1,
            "instance_id": 10,
            "basic_information": {
                "title": "Remain in Light",
                "year": 1980,
                "labels": [{ "name": "Sire (2)" }],
                "formats": [{ "name": "Vinyl", "descriptions": ["LP"] }],
                "artists": [{ "name": "Talking Heads" }]
            }
        }]);
        write_json(&json_path, &releases).unwrap();

        let from_json = load_collection(&json_path).unwrap();
        assert_eq!(from_json.len(), 1);
        assert_eq!(from_json[0].labels, vec!["Sire"]);
        assert_eq!(from_json[0].decade.as_deref(), Some("1980s"));

        let csv_path = dir.path().join("export.csv");
        fs::write(
            &csv_path,
            "Artist,Title,Label,Format,Released\nTalking Heads,Remain in Light,Sire,LP,1980\n",
        )
        .unwrap();

        let from_csv = load_collection(&csv_path).unwrap();
        assert_eq!(from_csv.len(), 1);
        assert_eq!(from_csv[0].artists, from_json[0].artists);
        assert_eq!(from_csv[0].year, Some(1980));
    }
}
