//! Unit tests for PostStore: loading, search, validated mutations and fallback.

use std::sync::Arc;

use stampbook::api::fake::FakeOp;
use stampbook::api::FakeBackend;
use stampbook::managers::post_store::PostStore;
use stampbook::managers::stamp_store::RefreshSource;
use stampbook::types::errors::StoreError;
use stampbook::types::post::{CreatePostRequest, UpdatePostRequest};

async fn setup() -> (Arc<FakeBackend>, PostStore) {
    let fake = Arc::new(FakeBackend::new());
    let store = PostStore::new(fake.clone());
    store.refresh().await.expect("initial refresh");
    (fake, store)
}

fn request(title: &str, content: &str) -> CreatePostRequest {
    CreatePostRequest {
        title: title.to_string(),
        content: content.to_string(),
        address: "서울 종로구".to_string(),
        latitude: 37.57,
        longitude: 126.98,
    }
}

#[tokio::test]
async fn test_refresh_loads_posts() {
    let (_fake, store) = setup().await;
    assert_eq!(store.posts().len(), 8);
    assert_eq!(store.source(), Some(RefreshSource::Backend));
}

#[tokio::test]
async fn test_search_does_not_replace_list() {
    let (_fake, store) = setup().await;
    let found = store.search("맛집").await.unwrap();
    assert!(!found.is_empty());
    assert!(found.iter().all(|p| {
        p.title.contains("맛집") || p.content.contains("맛집") || p.address.contains("맛집")
    }));
    assert_eq!(store.posts().len(), 8);
}

#[tokio::test]
async fn test_empty_search_is_validation() {
    let (fake, store) = setup().await;
    let calls_before = fake.calls().len();
    assert!(matches!(
        store.search("   ").await,
        Err(StoreError::Validation(_))
    ));
    assert_eq!(fake.calls().len(), calls_before);
}

#[tokio::test]
async fn test_create_reloads_list() {
    let (_fake, store) = setup().await;
    store.create(&request("새 글", "새 내용")).await.unwrap();
    let posts = store.posts();
    assert_eq!(posts.len(), 9);
    assert!(posts.iter().any(|p| p.title == "새 글"));
}

#[tokio::test]
async fn test_create_requires_title_and_content() {
    let (fake, store) = setup().await;
    assert!(matches!(
        store.create(&request(" ", "내용")).await,
        Err(StoreError::Validation(_))
    ));
    assert!(matches!(
        store.create(&request("제목", "")).await,
        Err(StoreError::Validation(_))
    ));
    assert!(!fake.calls().contains(&FakeOp::WritePost));
    assert!(store.last_error().is_some());
}

#[tokio::test]
async fn test_update_and_delete() {
    let (_fake, store) = setup().await;
    store
        .update(
            "2",
            &UpdatePostRequest {
                content: Some("다시 가고 싶어요".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(store.post("2").unwrap().content, "다시 가고 싶어요");

    store.delete("2").await.unwrap();
    assert!(store.post("2").is_none());
    assert_eq!(store.last_error(), None);
}

#[tokio::test]
async fn test_unknown_post_is_not_found() {
    let (_fake, store) = setup().await;
    assert_eq!(
        store.delete("404").await,
        Err(StoreError::NotFound("404".to_string()))
    );
}

#[tokio::test]
async fn test_dev_fallback_and_prod_failure() {
    let primary = Arc::new(FakeBackend::new());
    primary.set_offline(true);

    let dev = PostStore::new(primary.clone()).with_dev_fallback(Arc::new(FakeBackend::new()));
    assert_eq!(dev.refresh().await, Ok(RefreshSource::Fallback));
    assert_eq!(dev.posts().len(), 8);

    let prod = PostStore::new(primary);
    assert!(matches!(
        prod.refresh().await,
        Err(StoreError::Unavailable(_))
    ));
    assert!(prod.posts().is_empty());
}
