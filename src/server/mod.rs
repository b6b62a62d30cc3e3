//! HTTP front for the collection fetcher and the track dashboard.

use axum::routing::get;
use axum::Router;
use log::{info, warn};
use std::sync::Arc;

use crate::config::ServerConfig;
use crate::discogs::{CollectionFetcher, DiscogsClient};
use crate::tracks::{DurationOverrides, Track, TrackFilter, TrackLoader};
use crate::Result;

pub mod handlers;

pub use handlers::ApiError;

/// Loaded track data plus the filter an empty query maps to.
pub struct TrackData {
    pub tracks: Vec<Track>,
    pub defaults: TrackFilter,
}

impl TrackData {
    pub fn new(tracks: Vec<Track>) -> Self {
        let defaults = TrackFilter::defaults_for(&tracks);
        Self { tracks, defaults }
    }
}

#[derive(Clone)]
pub struct AppState {
    /// `None` when no Discogs token is configured.
    pub fetcher: Option<Arc<CollectionFetcher>>,
    pub tracks: Option<Arc<TrackData>>,
}

impl AppState {
    pub fn new(fetcher: Option<CollectionFetcher>, tracks: Option<Vec<Track>>) -> Self {
        Self {
            fetcher: fetcher.map(Arc::new),
            tracks: tracks.map(|t| Arc::new(TrackData::new(t))),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let fetcher = match config.token.as_deref().filter(|t| !t.is_empty()) {
            Some(token) => {
                let client = DiscogsClient::new(token, &config.fetch)?;
                Some(CollectionFetcher::new(Arc::new(client), config.fetch.clone()))
            }
            None => {
                warn!("DISCOGS_TOKEN is not set; collection requests will fail");
                None
            }
        };

        let tracks = match &config.tracks_file {
            Some(path) => {
                let overrides = match &config.overrides_file {
                    Some(overrides_path) => DurationOverrides::from_csv_path(overrides_path)?,
                    None => DurationOverrides::new(),
                };
                Some(TrackLoader::from_path(path, &overrides)?)
            }
            None => None,
        };

        Ok(Self::new(fetcher, tracks))
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/discogs-collection", get(handlers::collection))
        .route("/discogs-collection/stats", get(handlers::collection_stats))
        .route("/tracks", get(handlers::tracks))
        .with_state(state)
}

pub async fn serve(config: ServerConfig) -> Result<()> {
    let state = AppState::from_config(&config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!("Listening on http://{}", config.bind);
    axum::serve(listener, app).await?;
    Ok(())
}
