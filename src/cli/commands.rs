use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{FetchSettings, ServerConfig, DEFAULT_BATCH_DELAY_MS, DISCOGS_API_BASE};
use crate::tracks::TrackFilter;

#[derive(Parser)]
#[command(name = "vinyl-stats")]
#[command(version)]
#[command(about = "Discogs collection fetcher and vinyl dashboard statistics", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command that talks to Discogs.
#[derive(Args, Debug, Clone)]
pub struct DiscogsArgs {
    /// Discogs personal access token
    #[arg(long, env = "DISCOGS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Discogs API base URL
    #[arg(long, env = "DISCOGS_API_BASE", default_value = DISCOGS_API_BASE)]
    pub api_base: String,

    /// Pause between batches of page requests, in milliseconds
    #[arg(long, env = "DISCOGS_BATCH_DELAY_MS", default_value_t = DEFAULT_BATCH_DELAY_MS)]
    pub batch_delay_ms: u64,
}

impl DiscogsArgs {
    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings::default()
            .with_base_url(self.api_base.clone())
            .with_batch_delay(Duration::from_millis(self.batch_delay_ms))
    }
}

/// Flags for `serve`.
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(short, long, env = "VINYL_BIND", default_value = "127.0.0.1:8888")]
    pub bind: SocketAddr,

    #[command(flatten)]
    pub discogs: DiscogsArgs,

    /// Track data file (JSON array) to serve on /tracks
    #[arg(long, env = "VINYL_TRACKS_FILE")]
    pub tracks: Option<PathBuf>,

    /// Manual durations CSV (artist,title,duration)
    #[arg(long, env = "VINYL_OVERRIDES_FILE")]
    pub overrides: Option<PathBuf>,
}

impl ServeArgs {
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind: self.bind,
            token: self.discogs.token.clone(),
            fetch: self.discogs.fetch_settings(),
            tracks_file: self.tracks.clone(),
            overrides_file: self.overrides.clone(),
        }
    }
}

/// Track dashboard filter flags.
#[derive(Args, Debug, Clone, Default)]
pub struct TrackFilterArgs {
    /// Earliest year to include
    #[arg(long)]
    pub year_min: Option<i32>,

    /// Latest year to include
    #[arg(long)]
    pub year_max: Option<i32>,

    /// Longest track to include, in minutes
    #[arg(long)]
    pub max_minutes: Option<u32>,

    /// Only these artists (repeatable)
    #[arg(long = "artist")]
    pub artists: Vec<String>,

    /// Only tracks on these labels (repeatable)
    #[arg(long = "label")]
    pub labels: Vec<String>,
}

impl TrackFilterArgs {
    /// Overlay the given flags on `defaults`.
    pub fn to_filter(&self, defaults: &TrackFilter) -> TrackFilter {
        TrackFilter {
            year_min: self.year_min.unwrap_or(defaults.year_min),
            year_max: self.year_max.unwrap_or(defaults.year_max),
            max_minutes: self.max_minutes.unwrap_or(defaults.max_minutes),
            artists: self.artists.clone(),
            labels: self.labels.clone(),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the collection endpoint and the track dashboard API
    Serve(ServeArgs),

    /// Download a user's collection and summarize it
    Fetch {
        /// Discogs username
        #[arg(short, long)]
        username: String,

        #[command(flatten)]
        discogs: DiscogsArgs,

        /// Save the raw releases as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the statistics report CSV here
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// Summarize a Discogs CSV export or a saved collection JSON file
    Stats {
        /// Collection file (.csv export or .json from `fetch`)
        #[arg(short, long)]
        input: PathBuf,

        /// Write the statistics report CSV here
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Write the normalized records as CSV here
        #[arg(short, long)]
        export: Option<PathBuf>,

        /// Print the statistics as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Summarize the static track data set
    Tracks {
        /// Track data file (JSON array)
        #[arg(short, long)]
        input: PathBuf,

        /// Manual durations CSV (artist,title,duration)
        #[arg(long)]
        overrides: Option<PathBuf>,

        #[command(flatten)]
        filter: TrackFilterArgs,

        /// Write the track report CSV here
        #[arg(short, long)]
        report: Option<PathBuf>,
    },
}
