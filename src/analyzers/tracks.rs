use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::analyzers::{Bucket, CountMap};
use crate::tracks::{normalize_artist, Track};

pub const TOP_ARTISTS: usize = 10;
pub const LONGEST_TRACKS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearBucket {
    pub year: i32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistCount {
    /// Normalized key used for grouping and selection.
    pub norm: String,
    /// Longest raw spelling seen for this artist.
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSummary {
    pub track_count: usize,
    pub unique_artists: usize,
    pub total_secs: u64,
    pub average_secs: Option<u32>,
    pub year_buckets: Vec<YearBucket>,
    pub top_artists: Vec<ArtistCount>,
    pub longest: Vec<Track>,
}

impl TrackSummary {
    pub fn total_playtime(&self) -> String {
        format_playtime(self.total_secs)
    }

    pub fn average_length(&self) -> String {
        self.average_secs
            .map(|secs| format_clock(u64::from(secs)))
            .unwrap_or_else(|| "-".to_string())
    }
}

pub struct TrackAnalyzer;

impl TrackAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Summarize an already-filtered set of tracks.
    pub fn summarize(&self, tracks: &[&Track]) -> TrackSummary {
        let unique_artists = tracks
            .iter()
            .map(|t| normalize_artist(&t.artist))
            .filter(|norm| !norm.is_empty())
            .collect::<HashSet<_>>()
            .len();

        let timed: Vec<u32> = tracks.iter().filter_map(|t| t.secs).collect();
        let total_secs: u64 = timed.iter().map(|&s| u64::from(s)).sum();
        let average_secs = (!timed.is_empty())
            .then(|| (total_secs as f64 / timed.len() as f64).round() as u32);

        let mut years: HashMap<i32, usize> = HashMap::new();
        for year in tracks.iter().filter_map(|t| t.year) {
            *years.entry(year).or_insert(0) += 1;
        }
        let mut year_buckets: Vec<YearBucket> = years
            .into_iter()
            .map(|(year, count)| YearBucket { year, count })
            .collect();
        year_buckets.sort_by_key(|b| b.year);

        let mut top_artists = artist_counts(tracks.iter().copied());
        top_artists.truncate(TOP_ARTISTS);

        let mut longest: Vec<&Track> = tracks.iter().copied().filter(|t| t.secs.is_some()).collect();
        longest.sort_by(|a, b| b.secs.cmp(&a.secs));
        let longest = longest
            .into_iter()
            .take(LONGEST_TRACKS)
            .cloned()
            .collect();

        TrackSummary {
            track_count: tracks.len(),
            unique_artists,
            total_secs,
            average_secs,
            year_buckets,
            top_artists,
            longest,
        }
    }
}

impl Default for TrackAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracks per normalized artist, most first; ties keep first-seen order.
pub fn artist_counts<'a>(tracks: impl IntoIterator<Item = &'a Track>) -> Vec<ArtistCount> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<ArtistCount> = Vec::new();

    for track in tracks {
        let norm = normalize_artist(&track.artist);
        if norm.is_empty() {
            continue;
        }
        match index.get(&norm) {
            Some(&i) => {
                let entry = &mut counts[i];
                entry.count += 1;
                if track.artist.len() > entry.name.len() {
                    entry.name = track.artist.clone();
                }
            }
            None => {
                index.insert(norm.clone(), counts.len());
                counts.push(ArtistCount {
                    norm,
                    name: track.artist.clone(),
                    count: 1,
                });
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Tracks per label across the whole set, most first.
pub fn label_counts(tracks: &[Track]) -> Vec<Bucket> {
    let mut counts = CountMap::new();
    for label in tracks.iter().flat_map(|t| t.labels.iter()) {
        counts.add(label);
    }
    let n = counts.len();
    counts.into_top(n)
}

/// `"{h}h {m}m"`
pub fn format_playtime(secs: u64) -> String {
    format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
}

/// `"m:ss"`
pub fn format_clock(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
