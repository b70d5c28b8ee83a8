//! Content stores loading canonical documents over HTTP.
//!
//! Each test starts its own server on an ephemeral port that serves
//! `/content/*.json` exactly as the storefront does in production.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::time::Duration;

use axum::{Router, routing::get};
use fratelli_core::{ContactContent, ContentKind, LoadState, PromosContent, SiteContent};
use fratelli_integration_tests::{
    TestServer, bundled_content_dir, bundled_document, memory_storage, partial_content_dir,
};
use fratelli_storefront::content::ContentStore;
use fratelli_storefront::storage::{data_key, last_saved_key};

#[tokio::test]
async fn loads_document_over_http() {
    let server = TestServer::content(&bundled_content_dir()).await;
    let store: ContentStore<SiteContent> = ContentStore::new(server.source(), memory_storage());

    store.load().await;

    assert_eq!(store.status(), LoadState::Ready);
    assert!(store.error().is_none());
    let expected: SiteContent = serde_json::from_str(&bundled_document(ContentKind::Site)).unwrap();
    assert_eq!(store.data().unwrap(), expected);
}

#[tokio::test]
async fn missing_document_fails_terminally() {
    let dir = partial_content_dir(&[ContentKind::Site]);
    let server = TestServer::content(dir.path()).await;
    let store: ContentStore<PromosContent> = ContentStore::new(server.source(), memory_storage());

    store.load().await;

    assert_eq!(store.status(), LoadState::Failed);
    assert!(store.data().is_none());
    assert!(store.error().unwrap().contains("404"));

    // A second load does not fetch again.
    std::fs::write(
        dir.path().join("promos.json"),
        bundled_document(ContentKind::Promos),
    )
    .unwrap();
    store.load().await;
    assert_eq!(store.status(), LoadState::Failed);
}

#[tokio::test]
async fn wrong_shape_fails_load() {
    let dir = partial_content_dir(&[]);
    std::fs::write(dir.path().join("contact.json"), r#"{"hero": 42}"#).unwrap();
    let server = TestServer::content(dir.path()).await;
    let store: ContentStore<ContactContent> = ContentStore::new(server.source(), memory_storage());

    store.load().await;

    assert_eq!(store.status(), LoadState::Failed);
    assert!(store.data().is_none());
}

#[tokio::test]
async fn edits_are_cached_and_not_reloaded() {
    let server = TestServer::content(&bundled_content_dir()).await;
    let storage = memory_storage();
    let store: ContentStore<SiteContent> = ContentStore::new(server.source(), storage.clone());
    store.load().await;

    store
        .edit(|site| site.hero.title = "Pane fresco per il tuo locale".to_string())
        .unwrap();

    let cached = storage.get_item(&data_key("site")).unwrap().unwrap();
    let cached: SiteContent = serde_json::from_str(&cached).unwrap();
    assert_eq!(cached.hero.title, "Pane fresco per il tuo locale");
    let saved = storage.get_item(&last_saved_key("site")).unwrap().unwrap();
    assert_eq!(Some(saved), store.last_saved().map(|ts| ts.to_rfc3339()));

    // A new store instance reads canonical data plus only the timestamp.
    let fresh: ContentStore<SiteContent> = ContentStore::new(server.source(), storage);
    fresh.load().await;
    assert_ne!(fresh.data().unwrap().hero.title, "Pane fresco per il tuo locale");
    assert_eq!(fresh.last_saved(), store.last_saved());
}

#[tokio::test]
async fn concurrent_loads_share_one_fetch() {
    let server = TestServer::content(&bundled_content_dir()).await;
    let store: ContentStore<SiteContent> = ContentStore::new(server.source(), memory_storage());

    let (a, b) = (store.clone(), store.clone());
    tokio::join!(a.load(), b.load(), store.load());

    assert_eq!(store.status(), LoadState::Ready);
    assert_eq!(a.data(), b.data());
}

#[tokio::test]
async fn disposed_store_ignores_late_fetch() {
    let slow = Router::new().route(
        "/content/site.json",
        get(|| async {
            tokio::time::sleep(Duration::from_millis(300)).await;
            bundled_document(ContentKind::Site)
        }),
    );
    let server = TestServer::spawn(slow).await;
    let store: ContentStore<SiteContent> = ContentStore::new(server.source(), memory_storage());

    let loading = tokio::spawn({
        let store = store.clone();
        async move { store.load().await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(store.status(), LoadState::Loading);

    store.dispose();
    loading.await.unwrap();

    assert_eq!(store.status(), LoadState::Loading);
    assert!(store.data().is_none());
}
