//! Discogs collection retrieval.

pub mod client;
pub mod fetcher;
pub mod types;

pub use client::DiscogsClient;
pub use fetcher::{CollectionFetch, CollectionFetcher, PageFailure, PageSource};
pub use types::{BasicInformation, CollectionPage, CollectionRelease, Pagination};
