use chrono::{Duration, Utc};

use crate::domain::entities::{Channel, VerificationRequest, VerificationStatus};
use crate::errors::StoreError;
use crate::repositories::verification::{InMemoryVerificationStore, VerificationStore};

fn mobile_request(recipient: &str) -> VerificationRequest {
    VerificationRequest::new(
        Channel::Mobile,
        recipient,
        "654321",
        Duration::minutes(10),
        Utc::now(),
    )
}

#[tokio::test]
async fn test_create_assigns_missing_id() {
    let store = InMemoryVerificationStore::new();
    let mut request = mobile_request("+14155550100");
    request.id.clear();

    let stored = store.create(request).await.unwrap();

    assert!(!stored.id.is_empty());
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_create_rejects_duplicate_id() {
    let store = InMemoryVerificationStore::new();
    let request = mobile_request("+14155550100");

    store.create(request.clone()).await.unwrap();
    let result = store.create(request).await;

    assert!(matches!(result, Err(StoreError::Backend { .. })));
}

#[tokio::test]
async fn test_read_last_pending_returns_newest() {
    let store = InMemoryVerificationStore::new();
    let first = store.create(mobile_request("+14155550100")).await.unwrap();
    let second = store.create(mobile_request("+14155550100")).await.unwrap();
    store.create(mobile_request("+14155550199")).await.unwrap();

    let found = store
        .read_last_pending(Channel::Mobile, "+14155550100")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(found.id, second.id);
    assert_ne!(found.id, first.id);
}

#[tokio::test]
async fn test_read_last_pending_filters_channel_and_status() {
    let store = InMemoryVerificationStore::new();
    let mut request = store.create(mobile_request("+14155550100")).await.unwrap();

    assert!(store
        .read_last_pending(Channel::Email, "+14155550100")
        .await
        .unwrap()
        .is_none());

    request.status = VerificationStatus::Verified;
    store.update(&request.id.clone(), request).await.unwrap();

    assert!(store
        .read_last_pending(Channel::Mobile, "+14155550100")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_update_refuses_terminal_records() {
    let store = InMemoryVerificationStore::new();
    let mut request = store.create(mobile_request("+14155550100")).await.unwrap();
    let id = request.id.clone();

    request.status = VerificationStatus::Expired;
    store.update(&id, request.clone()).await.unwrap();

    request.status = VerificationStatus::Pending;
    let result = store.update(&id, request).await;

    assert_eq!(
        result,
        Err(StoreError::TerminalState {
            id: id.clone(),
            status: VerificationStatus::Expired,
        })
    );
    let stored = store.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(stored.status, VerificationStatus::Expired);
}

#[tokio::test]
async fn test_update_unknown_id() {
    let store = InMemoryVerificationStore::new();
    let result = store.update("missing", mobile_request("+14155550100")).await;

    assert!(matches!(result, Err(StoreError::NotFound { .. })));
}
