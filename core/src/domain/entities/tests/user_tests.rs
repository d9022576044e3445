//! Unit tests for the user entity

use crate::domain::entities::user::{normalize_email, User};

#[test]
fn test_user_new_normalizes_email() {
    let user = User::new(5, "  Alice@Example.COM ", "hash".to_string());

    assert_eq!(user.id, 5);
    assert_eq!(user.email, "alice@example.com");
}

#[test]
fn test_user_serialization_skips_password_hash() {
    let user = User::new(5, "alice@example.com", "secret-hash".to_string());
    let json = serde_json::to_string(&user).unwrap();

    assert!(!json.contains("secret-hash"));
    assert!(json.contains("alice@example.com"));
}

#[test]
fn test_normalize_email() {
    assert_eq!(normalize_email("Bob@Mail.io"), "bob@mail.io");
}
