//! Unit tests for the token codec

use crate::domain::entities::token::TokenKind;
use crate::errors::{DomainError, TokenError};
use crate::services::token::{TokenCodec, TokenCodecConfig};

fn codec() -> TokenCodec {
    TokenCodec::new(TokenCodecConfig::default())
}

fn codec_with(config: TokenCodecConfig) -> TokenCodec {
    TokenCodec::new(config)
}

#[test]
fn test_access_token_round_trip() {
    let codec = codec();

    let access = codec.issue_access_token("benwyw").unwrap();
    let claims = codec.verify_access_token(&access.token).unwrap();

    assert_eq!(claims.sub, "benwyw");
    assert_eq!(claims.kind, TokenKind::Access);
    assert!(claims.is_valid());
}

#[test]
fn test_expired_access_token_rejected() {
    // Negative expiry puts exp far enough in the past to clear the
    // validation leeway.
    let codec = codec_with(TokenCodecConfig {
        access_token_expiry_minutes: -5,
        ..Default::default()
    });

    let access = codec.issue_access_token("benwyw").unwrap();
    let result = codec.verify_access_token(&access.token);

    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::InvalidOrRevokedToken))
    ));
}

#[test]
fn test_refresh_token_round_trip() {
    let codec = codec();

    let issued = codec.issue_refresh_token("benwyw").unwrap();
    let parsed = codec.parse_refresh_token(&issued.token).unwrap();

    assert_eq!(parsed.jti, issued.jti);
    assert_eq!(parsed.username, "benwyw");
}

#[test]
fn test_expired_refresh_token_still_parses() {
    // Expiry of a presented refresh token is the store's call, not the
    // parser's; an expired token must fail as invalid-or-revoked downstream,
    // not as a format error here.
    let codec = codec_with(TokenCodecConfig {
        refresh_token_expiry_days: -1,
        ..Default::default()
    });

    let issued = codec.issue_refresh_token("benwyw").unwrap();
    let parsed = codec.parse_refresh_token(&issued.token).unwrap();

    assert_eq!(parsed.jti, issued.jti);
}

#[test]
fn test_parse_rejects_garbage() {
    let codec = codec();

    let result = codec.parse_refresh_token("not-a-token");

    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::InvalidTokenFormat))
    ));
}

#[test]
fn test_parse_rejects_truncated_token() {
    let codec = codec();
    let issued = codec.issue_refresh_token("benwyw").unwrap();

    let truncated = &issued.token[..issued.token.len() - 3];
    let result = codec.parse_refresh_token(truncated);

    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::InvalidTokenFormat))
    ));
}

#[test]
fn test_parse_rejects_foreign_signature() {
    let codec = codec();
    let foreign = codec_with(TokenCodecConfig {
        secret: "some-other-secret".to_string(),
        ..Default::default()
    });

    let issued = foreign.issue_refresh_token("benwyw").unwrap();
    let result = codec.parse_refresh_token(&issued.token);

    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::InvalidTokenFormat))
    ));
}

#[test]
fn test_parse_rejects_access_token_as_refresh() {
    let codec = codec();

    let access = codec.issue_access_token("benwyw").unwrap();
    let result = codec.parse_refresh_token(&access.token);

    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::InvalidTokenFormat))
    ));
}

#[test]
fn test_verify_rejects_refresh_token_as_access() {
    let codec = codec();

    let issued = codec.issue_refresh_token("benwyw").unwrap();
    let result = codec.verify_access_token(&issued.token);

    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::InvalidTokenFormat))
    ));
}

#[test]
fn test_issued_refresh_tokens_are_unique() {
    let codec = codec();

    let first = codec.issue_refresh_token("benwyw").unwrap();
    let second = codec.issue_refresh_token("benwyw").unwrap();

    assert_ne!(first.jti, second.jti);
    assert_ne!(first.token, second.token);
}

#[test]
fn test_hash_token_is_deterministic_hex() {
    let hash = TokenCodec::hash_token("some_refresh_token");

    // SHA-256 in hex
    assert_eq!(hash.len(), 64);
    assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));

    assert_eq!(hash, TokenCodec::hash_token("some_refresh_token"));
    assert_ne!(hash, TokenCodec::hash_token("another_refresh_token"));
}

#[test]
fn test_hash_token_does_not_contain_input() {
    let token = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.test";
    let hash = TokenCodec::hash_token(token);

    assert!(!hash.contains("eyJ"));
}
