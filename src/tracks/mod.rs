//! The static "top tracks" data set behind the dashboard page.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::Read;
use std::path::Path;

use crate::Result;

pub mod filter;
pub mod overrides;

pub use filter::{normalize_artist, TrackFilter};
pub use overrides::DurationOverrides;

/// Labels appear either as a single string or a list in the data file.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum LabelField {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Clone, Deserialize)]
struct RawTrack {
    #[serde(default)]
    artist: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    year: Option<i32>,
    #[serde(default)]
    labels: Option<LabelField>,
    #[serde(default)]
    secs: Option<f64>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    pub artist: String,
    pub title: String,
    pub year: Option<i32>,
    pub labels: Vec<String>,
    pub secs: Option<u32>,
    pub mins: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Track {
    /// Minutes to one decimal place.
    pub fn minutes_of(secs: u32) -> f64 {
        (f64::from(secs) / 6.0).round() / 10.0
    }

    fn from_raw(raw: RawTrack, overrides: &DurationOverrides) -> Self {
        let artist = raw.artist.unwrap_or_default();
        let title = raw.title.unwrap_or_default();
        let labels = match raw.labels {
            Some(LabelField::One(label)) => vec![label],
            Some(LabelField::Many(labels)) => labels,
            None => Vec::new(),
        };

        let secs = match overrides.get(&artist, &title) {
            Some(manual) => {
                debug!("Using manual duration {}s for {} - {}", manual, artist, title);
                Some(manual)
            }
            None => raw
                .secs
                .filter(|s| s.is_finite() && *s >= 0.0)
                .map(|s| s.round() as u32),
        };

        Self {
            artist,
            title,
            year: raw.year,
            labels,
            secs,
            mins: secs.map(Self::minutes_of),
            extra: raw.extra,
        }
    }
}

pub struct TrackLoader;

impl TrackLoader {
    pub fn from_reader<R: Read>(reader: R, overrides: &DurationOverrides) -> Result<Vec<Track>> {
        let raw: Vec<RawTrack> = serde_json::from_reader(reader)?;
        let tracks: Vec<Track> = raw
            .into_iter()
            .map(|r| Track::from_raw(r, overrides))
            .collect();
        info!("Loaded {} track(s)", tracks.len());
        Ok(tracks)
    }

    pub fn from_path(path: impl AsRef<Path>, overrides: &DurationOverrides) -> Result<Vec<Track>> {
        let path = path.as_ref();
        info!("Loading tracks from {}", path.display());
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file), overrides)
    }
}

/// Year span of the data, widened to at least 1960..=1985.
pub fn year_domain(tracks: &[Track]) -> (i32, i32) {
    tracks
        .iter()
        .filter_map(|t| t.year)
        .fold((1960, 1985), |(lo, hi), y| (lo.min(y), hi.max(y)))
}
