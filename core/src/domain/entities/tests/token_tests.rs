//! Unit tests for token entities

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::token::{AccessToken, Claims, RefreshToken, TokenKind, TokenPair};

fn instant(seconds: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(seconds, 0).unwrap()
}

#[test]
fn test_claims_new_sets_expiry_from_lifetime() {
    let claims = Claims::new(42, TokenKind::Access, instant(1_000), Duration::minutes(15));

    assert_eq!(claims.sub, 42);
    assert_eq!(claims.kind, TokenKind::Access);
    assert_eq!(claims.iat, 1_000);
    assert_eq!(claims.exp, 1_900);
    assert_eq!(claims.issued_at(), instant(1_000));
    assert_eq!(claims.expires_at(), instant(1_900));
    assert!(Uuid::parse_str(&claims.jti).is_ok());
}

#[test]
fn test_claims_truncate_issue_time_to_seconds() {
    let issued_at = instant(1_000) + Duration::milliseconds(750);
    let claims = Claims::new(1, TokenKind::Refresh, issued_at, Duration::seconds(60));

    assert_eq!(claims.iat, 1_000);
    assert_eq!(claims.exp, 1_060);
}

#[test]
fn test_claims_jti_is_unique_per_token() {
    let a = Claims::new(7, TokenKind::Access, instant(0), Duration::seconds(60));
    let b = Claims::new(7, TokenKind::Access, instant(0), Duration::seconds(60));

    assert_ne!(a.jti, b.jti);
}

#[test]
fn test_claims_expiry_boundary() {
    let claims = Claims::new(1, TokenKind::Access, instant(100), Duration::seconds(10));

    assert!(!claims.is_expired_at(instant(109)));
    assert!(!claims.is_expired_at(instant(109) + Duration::milliseconds(999)));
    assert!(claims.is_expired_at(instant(110)));
    assert!(claims.is_expired_at(instant(111)));
}

#[test]
fn test_claims_serialize_kind_lowercase() {
    let claims = Claims::new(9, TokenKind::Refresh, instant(0), Duration::seconds(60));
    let json = serde_json::to_value(&claims).unwrap();

    assert_eq!(json["kind"], "refresh");
    assert_eq!(json["sub"], 9);
}

#[test]
fn test_claims_reject_missing_fields() {
    let json = r#"{"sub": 1, "kind": "access", "iat": 0, "exp": 10}"#;
    assert!(serde_json::from_str::<Claims>(json).is_err());
}

#[test]
fn test_record_expiry_boundary() {
    let refresh = RefreshToken::new(1, "agent", "r".into(), instant(200), instant(100));
    let access = AccessToken::new(1, refresh.id, "agent", "a".into(), instant(150), instant(100));

    assert!(!refresh.is_expired_at(instant(199)));
    assert!(refresh.is_expired_at(instant(200)));
    assert!(!access.is_expired_at(instant(149)));
    assert!(access.is_expired_at(instant(150)));
}

#[test]
fn test_token_pair_lifetimes() {
    let refresh = RefreshToken::new(3, "agent", "r".into(), instant(3_700), instant(100));
    let access = AccessToken::new(3, refresh.id, "agent", "a".into(), instant(160), instant(100));
    let pair = TokenPair::new(access, refresh);

    assert_eq!(pair.access_expires_in(), 60);
    assert_eq!(pair.refresh_expires_in(), 3_600);
    assert_eq!(pair.access_token.refresh_token_id, pair.refresh_token.id);
}

#[test]
fn test_token_kind_display() {
    assert_eq!(TokenKind::Access.to_string(), "access");
    assert_eq!(TokenKind::Refresh.to_string(), "refresh");
}
