//! End-to-end tests of the token lifecycle through the public API

use std::sync::Arc;

use chrono::Duration;
use gw_core::{
    Authenticator, DomainError, InMemoryAuthenticator, InMemoryTokenStore, ManualClock, TokenError,
    TokenKind, TokenService, TokenServiceConfig, TokenStore,
};

type Service = TokenService<InMemoryTokenStore, InMemoryAuthenticator>;

async fn setup() -> (Arc<Service>, Arc<InMemoryTokenStore>, Arc<ManualClock>, u64) {
    let store = Arc::new(InMemoryTokenStore::new());
    let authenticator = Arc::new(InMemoryAuthenticator::with_cost(4));
    let user_id = authenticator
        .register("lifecycle@example.com", "password123")
        .await
        .unwrap();
    let clock = Arc::new(ManualClock::at_epoch_seconds(1_700_000_000));
    let service = Arc::new(TokenService::with_clock(
        store.clone(),
        authenticator,
        TokenServiceConfig::new(
            "integration-secret",
            Duration::minutes(15),
            Duration::days(7),
        ),
        clock.clone(),
    ));
    (service, store, clock, user_id)
}

fn token_error<T: std::fmt::Debug>(result: Result<T, DomainError>) -> TokenError {
    match result {
        Err(DomainError::Token(e)) => e,
        other => panic!("expected a token error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_session_lifecycle() {
    let (service, _store, clock, user_id) = setup().await;

    let first = service.issue_pair(user_id, "cli").await.unwrap();
    let validated = service.validate(&first.access_token.token, false).await.unwrap();
    assert_eq!(validated.user_id, user_id);
    assert_eq!(validated.kind, TokenKind::Access);

    // The access token lapses but the session lives on
    clock.advance(Duration::minutes(15));
    assert_eq!(
        token_error(service.validate(&first.access_token.token, false).await),
        TokenError::Expired
    );

    let second = service.rotate(&first.refresh_token.token, "cli").await.unwrap();
    assert!(service.validate(&second.access_token.token, false).await.is_ok());
    assert_eq!(
        token_error(service.validate(&first.refresh_token.token, false).await),
        TokenError::NotFound
    );

    // Logout with an expired access token still ends the session
    clock.advance(Duration::minutes(20));
    service.validate(&second.access_token.token, true).await.unwrap();
    service.revoke_access(&second.access_token.token, true).await.unwrap();
    assert_eq!(
        token_error(service.validate(&second.refresh_token.token, false).await),
        TokenError::NotFound
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_rotation_has_single_winner() {
    let (service, store, _clock, user_id) = setup().await;
    let pair = service.issue_pair(user_id, "cli").await.unwrap();

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let service = service.clone();
            let token = pair.refresh_token.token.clone();
            tokio::spawn(async move { service.rotate(&token, "racer").await })
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(DomainError::Token(TokenError::NotFound)) => {}
            Err(other) => panic!("unexpected rotation error: {:?}", other),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(store.count_sessions(user_id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_session_revocation_is_complete() {
    let (service, store, _clock, user_id) = setup().await;
    let pair = service.issue_pair(user_id, "cli").await.unwrap();
    let other = service.issue_pair(user_id, "cli").await.unwrap();

    service.revoke_refresh(&pair.refresh_token.token).await.unwrap();

    assert!(store
        .find_access_by_refresh_id(pair.refresh_token.id)
        .await
        .unwrap()
        .is_empty());
    assert!(service.validate(&other.access_token.token, false).await.is_ok());
}
