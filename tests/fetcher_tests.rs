mod common;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use std::sync::Arc;

use common::{fetcher_for, release_id, spawn_fake_discogs, FakeDiscogs, TOKEN};
use vinyl_stats::VinylError;

#[tokio::test]
async fn fetches_every_page_in_order() {
    let fake = Arc::new(FakeDiscogs::new(7));
    let base = spawn_fake_discogs(fake.clone()).await;

    let fetch = fetcher_for(&base).fetch_all("digger").await.unwrap();

    assert!(fetch.is_complete());
    assert_eq!(fetch.total_pages, 7);
    assert_eq!(fetch.pages_fetched, 7);

    let ids: Vec<u64> = fetch.releases.iter().map(|r| r.id).collect();
    let expected: Vec<u64> = (1..=7u32)
        .flat_map(|page| [release_id(page, 1), release_id(page, 2)])
        .collect();
    assert_eq!(ids, expected);
    assert_eq!(fake.seen_pages(), (1..=7).collect::<Vec<_>>());
}

#[tokio::test]
async fn sends_token_user_agent_and_page_size() {
    let fake = Arc::new(FakeDiscogs::new(1));
    let base = spawn_fake_discogs(fake.clone()).await;

    fetcher_for(&base).fetch_all("digger").await.unwrap();

    let seen = fake.seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].username, "digger");
    assert_eq!(seen[0].page, 1);
    assert_eq!(seen[0].per_page, 100);
    assert_eq!(
        seen[0].authorization.as_deref(),
        Some(format!("Discogs token={}", TOKEN).as_str())
    );
    assert!(seen[0]
        .user_agent
        .as_deref()
        .is_some_and(|ua| ua.starts_with("vinyl-stats/")));
}

#[tokio::test]
async fn keeps_basic_information_and_drops_instance_metadata() {
    let fake = Arc::new(FakeDiscogs::new(1));
    let base = spawn_fake_discogs(fake).await;

    let fetch = fetcher_for(&base).fetch_all("digger").await.unwrap();
    let value = serde_json::to_value(&fetch.releases[0]).unwrap();

    assert_eq!(value["id"], 101);
    assert_eq!(value["instance_id"], 1010);
    assert!(value.get("folder_id").is_none());
    assert!(value.get("rating").is_none());
    assert_eq!(value["basic_information"]["cover_image"], "https://img/101.jpg");
    assert_eq!(value["basic_information"]["labels"][0]["catno"], "X-1");
}

#[tokio::test]
async fn failing_later_page_truncates_the_result() {
    let fake = Arc::new(FakeDiscogs::new(3).failing(&[2], StatusCode::INTERNAL_SERVER_ERROR));
    let base = spawn_fake_discogs(fake).await;

    let fetch = fetcher_for(&base).fetch_all("digger").await.unwrap();

    let ids: Vec<u64> = fetch.releases.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![101, 102]);
    assert_eq!(fetch.pages_fetched, 1);
    assert_eq!(fetch.total_pages, 3);

    let failure = fetch.stopped_at.expect("truncation is reported");
    assert_eq!(failure.page, 2);
}

#[tokio::test]
async fn failing_first_page_surfaces_upstream_status() {
    let fake = Arc::new(FakeDiscogs::new(3).failing(&[1], StatusCode::NOT_FOUND));
    let base = spawn_fake_discogs(fake.clone()).await;

    let err = fetcher_for(&base).fetch_all("nobody").await.unwrap_err();

    match err {
        VinylError::Upstream { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "page 1 unavailable");
        }
        other => panic!("expected upstream error, got {:?}", other),
    }
    assert_eq!(fake.seen_pages(), vec![1]);
}
