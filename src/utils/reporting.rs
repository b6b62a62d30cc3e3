use csv::Writer;
use log::info;
use std::io::Write;
use std::path::Path;

use crate::analyzers::collection::AggregateStats;
use crate::analyzers::tracks::TrackSummary;
use crate::analyzers::Bucket;
use crate::normalize::record::{numbered_header, ARTIST_COLUMN, FORMAT_COLUMN, LABEL_COLUMN};
use crate::utils::file_ops::ensure_parent_dir;
use crate::{NormalizedRecord, Result};

pub struct Reporter;

impl Reporter {
    pub fn new() -> Self {
        Self
    }

    /// One `Section,Name,Count` row per bucket, then the summary scalars.
    pub fn write_collection_report<W: Write>(&self, stats: &AggregateStats, out: W) -> Result<()> {
        let mut writer = Writer::from_writer(out);
        writer.write_record(["Section", "Name", "Count"])?;

        let sections: [(&str, &[Bucket]); 6] = [
            ("Year", &stats.by_year),
            ("Decade", &stats.by_decade),
            ("Format", &stats.by_format),
            ("Country", &stats.by_country),
            ("Label", &stats.top_labels),
            ("Artist", &stats.top_artists),
        ];
        for (section, buckets) in sections {
            for bucket in buckets {
                writer.write_record([section, bucket.name.as_str(), bucket.value.to_string().as_str()])?;
            }
        }

        writer.write_record(["Summary", "Total Records", stats.total.to_string().as_str()])?;
        writer.write_record(["Summary", "Unique Artists", stats.unique_artists.to_string().as_str()])?;
        writer.write_record(["Summary", "Median Year", optional(stats.median_year).as_str()])?;
        writer.write_record(["Summary", "Average Year", optional(stats.avg_year).as_str()])?;

        writer.flush()?;
        Ok(())
    }

    pub fn generate_collection_report(&self, stats: &AggregateStats, output_path: impl AsRef<Path>) -> Result<()> {
        let output_path = output_path.as_ref();
        ensure_parent_dir(output_path)?;
        self.write_collection_report(stats, std::fs::File::create(output_path)?)?;
        info!("Collection report generated: {}", output_path.display());
        Ok(())
    }

    /// Normalized records as CSV that `RecordNormalizer::read_csv` loads
    /// back unchanged. Artists, labels and formats get one numbered column
    /// per value (`Artist 1`, `Artist 2`, ...) so names containing commas
    /// survive the trip.
    pub fn write_records<W: Write>(&self, records: &[NormalizedRecord], out: W) -> Result<()> {
        let artist_cols = column_count(records.iter().map(|r| r.artists.len()));
        let label_cols = column_count(records.iter().map(|r| r.labels.len()));
        let format_cols = column_count(records.iter().map(|r| r.formats.len()));

        let mut header = numbered_headers(ARTIST_COLUMN, artist_cols);
        header.push("Title".to_string());
        header.extend(numbered_headers(LABEL_COLUMN, label_cols));
        header.extend(numbered_headers(FORMAT_COLUMN, format_cols));
        header.push("Released".to_string());
        header.push("Country".to_string());

        let mut writer = Writer::from_writer(out);
        writer.write_record(&header)?;

        for record in records {
            let year = optional(record.year);
            let mut row: Vec<&str> = Vec::with_capacity(header.len());
            push_padded(&mut row, &record.artists, artist_cols);
            row.push(record.title.as_deref().unwrap_or(""));
            push_padded(&mut row, &record.labels, label_cols);
            push_padded(&mut row, &record.formats, format_cols);
            row.push(year.as_str());
            row.push(record.country.as_deref().unwrap_or(""));
            writer.write_record(&row)?;
        }

        writer.flush()?;
        Ok(())
    }

    pub fn export_records(&self, records: &[NormalizedRecord], output_path: impl AsRef<Path>) -> Result<()> {
        let output_path = output_path.as_ref();
        ensure_parent_dir(output_path)?;
        self.write_records(records, std::fs::File::create(output_path)?)?;
        info!("Exported {} record(s) to {}", records.len(), output_path.display());
        Ok(())
    }

    pub fn generate_track_report(&self, summary: &TrackSummary, output_path: impl AsRef<Path>) -> Result<()> {
        let output_path = output_path.as_ref();
        ensure_parent_dir(output_path)?;
        let mut writer = Writer::from_path(output_path)?;

        writer.write_record(["Section", "Name", "Value"])?;
        for bucket in &summary.year_buckets {
            writer.write_record(["Year", bucket.year.to_string().as_str(), bucket.count.to_string().as_str()])?;
        }
        for artist in &summary.top_artists {
            writer.write_record(["Artist", artist.name.as_str(), artist.count.to_string().as_str()])?;
        }
        for track in &summary.longest {
            let name = format!("{} - {}", track.artist, track.title);
            writer.write_record(["Longest", name.as_str(), optional(track.secs).as_str()])?;
        }
        writer.write_record(["Summary", "Tracks", summary.track_count.to_string().as_str()])?;
        writer.write_record(["Summary", "Artists", summary.unique_artists.to_string().as_str()])?;
        writer.write_record(["Summary", "Total Playtime", summary.total_playtime().as_str()])?;
        writer.write_record(["Summary", "Average Length", summary.average_length().as_str()])?;

        writer.flush()?;
        info!("Track report generated: {}", output_path.display());
        Ok(())
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

/// At least one column, even when every record has no values.
fn column_count(lengths: impl Iterator<Item = usize>) -> usize {
    lengths.max().unwrap_or(0).max(1)
}

fn numbered_headers(stem: &str, count: usize) -> Vec<String> {
    (1..=count).map(|n| numbered_header(stem, n)).collect()
}

fn push_padded<'a>(row: &mut Vec<&'a str>, values: &'a [String], width: usize) {
    row.extend(values.iter().map(String::as_str));
    row.extend(std::iter::repeat("").take(width - values.len()));
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
