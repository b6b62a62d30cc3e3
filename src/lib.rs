use serde::{Deserialize, Serialize};

pub mod analyzers;
pub mod cli;
pub mod config;
pub mod discogs;
pub mod normalize;
pub mod server;
pub mod tracks;
pub mod utils;

/// A collection entry in the shape every input source is reduced to.
///
/// `decade` is always derived from `year` and is present exactly when
/// `year` is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub year: Option<i32>,
    pub decade: Option<String>,
    pub labels: Vec<String>,
    pub formats: Vec<String>,
    pub country: Option<String>,
    pub artists: Vec<String>,
    pub title: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum VinylError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("Missing ?username=")]
    MissingUsername,
    #[error("Missing DISCOGS_TOKEN env var")]
    MissingToken,
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),
}

pub type Result<T> = std::result::Result<T, VinylError>;

// Re-exports for convenience
pub use analyzers::collection::{AggregateStats, CollectionAnalyzer};
pub use analyzers::tracks::{TrackAnalyzer, TrackSummary};
pub use discogs::{CollectionFetch, CollectionFetcher, CollectionRelease, DiscogsClient, PageSource};
pub use normalize::record::RecordNormalizer;
pub use tracks::{DurationOverrides, Track, TrackFilter};
