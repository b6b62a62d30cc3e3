#![allow(dead_code)]

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use vinyl_stats::config::FetchSettings;
use vinyl_stats::{CollectionFetcher, DiscogsClient};

pub const TOKEN: &str = "test-token";

#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub username: String,
    pub page: u32,
    pub per_page: u32,
    pub authorization: Option<String>,
    pub user_agent: Option<String>,
}

/// In-process stand-in for the Discogs collection endpoint.
pub struct FakeDiscogs {
    pub pages: u32,
    pub per_page_items: u64,
    /// Pages that answer with `failure_status`.
    pub failing: Vec<u32>,
    pub failure_status: StatusCode,
    pub seen: Mutex<Vec<SeenRequest>>,
}

impl FakeDiscogs {
    pub fn new(pages: u32) -> Self {
        Self {
            pages,
            per_page_items: 2,
            failing: Vec::new(),
            failure_status: StatusCode::TOO_MANY_REQUESTS,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(mut self, pages: &[u32], status: StatusCode) -> Self {
        self.failing = pages.to_vec();
        self.failure_status = status;
        self
    }

    pub fn seen_pages(&self) -> Vec<u32> {
        let mut pages: Vec<u32> = self.seen.lock().unwrap().iter().map(|r| r.page).collect();
        pages.sort_unstable();
        pages
    }
}

/// Release ids are `page * 100 + n`.
pub fn release_id(page: u32, n: u64) -> u64 {
    u64::from(page) * 100 + n
}

async fn releases(
    State(fake): State<Arc<FakeDiscogs>>,
    Path(username): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let page: u32 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let per_page: u32 = params.get("per_page").and_then(|p| p.parse().ok()).unwrap_or(50);
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    fake.seen.lock().unwrap().push(SeenRequest {
        username,
        page,
        per_page,
        authorization: header_value(header::AUTHORIZATION),
        user_agent: header_value(header::USER_AGENT),
    });

    if fake.failing.contains(&page) {
        return (fake.failure_status, format!("page {} unavailable", page)).into_response();
    }

    let releases: Vec<_> = (1..=fake.per_page_items)
        .map(|n| {
            let id = release_id(page, n);
            json!({
                "id": id,
                "instance_id": id * 10,
                "folder_id": 1,
                "rating": 0,
                "date_added": "2024-01-01T00:00:00-08:00",
                "basic_information": {
                    "title": format!("Album {}", id),
                    "year": 1960 + (id % 40),
                    "cover_image": format!("https://img/{}.jpg", id),
                    "labels": [{ "name": format!("Label {} (2)", page), "catno": "X-1" }],
                    "formats": [{ "name": "Vinyl", "qty": "1", "descriptions": ["LP", "Album"] }],
                    "artists": [{ "name": format!("Artist {}", n), "id": n }]
                }
            })
        })
        .collect();

    Json(json!({
        "pagination": {
            "page": page,
            "pages": fake.pages,
            "per_page": per_page,
            "items": u64::from(fake.pages) * fake.per_page_items
        },
        "releases": releases
    }))
    .into_response()
}

/// Serve `fake` on an ephemeral local port and return its base URL.
pub async fn spawn_fake_discogs(fake: Arc<FakeDiscogs>) -> String {
    let app = Router::new()
        .route("/users/:username/collection/folders/0/releases", get(releases))
        .with_state(fake);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

pub fn test_settings(base_url: &str) -> FetchSettings {
    FetchSettings::default()
        .with_base_url(base_url)
        .with_batch_delay(Duration::ZERO)
}

pub fn fetcher_for(base_url: &str) -> CollectionFetcher {
    let settings = test_settings(base_url);
    let client = DiscogsClient::new(TOKEN, &settings).unwrap();
    CollectionFetcher::new(Arc::new(client), settings)
}
