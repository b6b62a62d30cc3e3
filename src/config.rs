use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DISCOGS_API_BASE: &str = "https://api.discogs.com";
pub const USER_AGENT: &str = concat!("vinyl-stats/", env!("CARGO_PKG_VERSION"), " (+https://github.com/vinyl-stats)");

/// Discogs allows about 60 authenticated requests per minute.
pub const DEFAULT_PER_PAGE: u32 = 100;
pub const DEFAULT_BATCH_SIZE: usize = 5;
pub const DEFAULT_BATCH_DELAY_MS: u64 = 5_000;

/// Cache hint attached to collection responses (5 minutes).
pub const CACHE_CONTROL: &str = "max-age=300";

/// Knobs for paging through a collection.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub base_url: String,
    pub per_page: u32,
    pub batch_size: usize,
    pub batch_delay: Duration,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            base_url: DISCOGS_API_BASE.to_string(),
            per_page: DEFAULT_PER_PAGE,
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay: Duration::from_millis(DEFAULT_BATCH_DELAY_MS),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl FetchSettings {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_batch_delay(mut self, delay: Duration) -> Self {
        self.batch_delay = delay;
        self
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Absent token is not fatal at startup; collection requests answer 500.
    pub token: Option<String>,
    pub fetch: FetchSettings,
    pub tracks_file: Option<PathBuf>,
    pub overrides_file: Option<PathBuf>,
}
