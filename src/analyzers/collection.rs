use log::info;
use serde::Serialize;
use std::collections::HashSet;

use crate::analyzers::{Bucket, CountMap};
use crate::normalize::artist_key;
use crate::NormalizedRecord;

pub const TOP_N: usize = 15;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    pub total: usize,
    pub unique_artists: usize,
    pub median_year: Option<i32>,
    pub avg_year: Option<f64>,
    pub by_year: Vec<Bucket>,
    pub by_decade: Vec<Bucket>,
    pub by_format: Vec<Bucket>,
    pub by_country: Vec<Bucket>,
    pub top_labels: Vec<Bucket>,
    pub top_artists: Vec<Bucket>,
}

pub struct CollectionAnalyzer;

impl CollectionAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, records: &[NormalizedRecord]) -> AggregateStats {
        let mut by_year = CountMap::new();
        let mut by_decade = CountMap::new();
        let mut by_format = CountMap::new();
        let mut by_label = CountMap::new();
        let mut by_country = CountMap::new();
        let mut by_artist = CountMap::new();

        let mut years = Vec::new();
        let mut artist_set = HashSet::new();

        for record in records {
            if let Some(year) = record.year {
                by_year.add(&year.to_string());
                years.push(year);
            }
            if let Some(decade) = &record.decade {
                by_decade.add(decade);
            }
            for format in &record.formats {
                by_format.add(format);
            }
            for label in &record.labels {
                by_label.add(label);
            }
            if let Some(country) = &record.country {
                by_country.add(country);
            }
            for artist in &record.artists {
                let key = artist_key(artist);
                by_artist.add(&key);
                artist_set.insert(key);
            }
        }

        years.sort_unstable();
        // upper middle on even lengths
        let median_year = years.get(years.len() / 2).copied();
        let avg_year = (!years.is_empty()).then(|| {
            let sum: i64 = years.iter().map(|&y| i64::from(y)).sum();
            (sum as f64 / years.len() as f64 * 10.0).round() / 10.0
        });

        let stats = AggregateStats {
            total: records.len(),
            unique_artists: artist_set.len(),
            median_year,
            avg_year,
            by_year: by_year.into_numeric_order(),
            by_decade: by_decade.into_numeric_order(),
            by_format: by_format.into_buckets(),
            by_country: by_country.into_top(TOP_N),
            top_labels: by_label.into_top(TOP_N),
            top_artists: by_artist.into_top(TOP_N),
        };

        info!(
            "Summarized {} record(s): {} unique artist(s), median year {:?}",
            stats.total, stats.unique_artists, stats.median_year
        );
        stats
    }
}

impl Default for CollectionAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
