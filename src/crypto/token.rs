use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::user::{Role, UserSnapshot};

/// Errors produced by the token codec. Callers must not surface the
/// distinction between these to the client; the gate collapses them all
/// into "please log in again".
#[derive(Error, Debug)]
pub enum TokenError {
    /// The token's expiry has passed.
    #[error("token expired")]
    Expired,

    /// The signature does not match the payload.
    #[error("invalid token signature")]
    InvalidSignature,

    /// The payload is missing required fields or is not decodable.
    #[error("malformed token payload")]
    MalformedPayload,

    /// The token could not be encoded.
    #[error("token encoding failed: {0}")]
    Encoding(String),
}

/// The signed claims carried by an access token. A denormalized snapshot of
/// the user row at issue time; it can go stale relative to the store until
/// the token naturally expires and is reissued. That staleness window equals
/// the configured TTL and is an accepted consistency lag.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    id: i32,
    email: String,
    role: Role,
    exp: i64,
}

/// Issues a signed access token for the given identity snapshot.
///
/// # Arguments
///
/// * `snapshot` - The identity to encode.
/// * `ttl` - How long the token stays valid.
/// * `secret` - The server-held signing secret.
///
/// # Returns
///
/// A `Result` containing the opaque token string.
pub fn issue(
    snapshot: &UserSnapshot,
    ttl: Duration,
    secret: &str,
) -> Result<String, TokenError> {
    let claims = Claims {
        id: snapshot.id,
        email: snapshot.email.clone(),
        role: snapshot.role,
        exp: (Utc::now() + ttl).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| TokenError::Encoding(e.to_string()))
}

/// Verifies a token and returns the identity snapshot it carries.
///
/// The expiry claim is checked with zero leeway and stripped before the
/// snapshot is returned; callers never see it.
pub fn parse(token: &str, secret: &str) -> Result<UserSnapshot, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        _ => TokenError::MalformedPayload,
    })?;

    let claims = data.claims;
    if claims.email.is_empty() || claims.id <= 0 {
        return Err(TokenError::MalformedPayload);
    }

    Ok(UserSnapshot {
        id: claims.id,
        email: claims.email,
        role: claims.role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "an adequately long unit test signing secret";

    fn snapshot() -> UserSnapshot {
        UserSnapshot {
            id: 7,
            email: "ada@crafters.edu".to_string(),
            role: Role::Admin,
        }
    }

    #[test]
    fn issue_then_parse_returns_the_snapshot() {
        let token = issue(&snapshot(), Duration::minutes(30), SECRET).unwrap();
        let parsed = parse(&token, SECRET).unwrap();
        assert_eq!(parsed, snapshot());
    }

    #[test]
    fn short_ttl_still_valid_immediately() {
        let token = issue(&snapshot(), Duration::seconds(1), SECRET).unwrap();
        assert!(parse(&token, SECRET).is_ok());
    }

    #[test]
    fn past_expiry_fails_expired() {
        let claims = Claims {
            id: 7,
            email: "ada@crafters.edu".to_string(),
            role: Role::User,
            exp: (Utc::now() - Duration::seconds(5)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(parse(&token, SECRET), Err(TokenError::Expired)));
    }

    #[test]
    fn flipped_signature_byte_fails_invalid_signature() {
        let token = issue(&snapshot(), Duration::minutes(30), SECRET).unwrap();

        let sig_start = token.rfind('.').unwrap() + 1;
        let mut bytes = token.into_bytes();
        // Swap the first signature character for another valid base64url
        // character so only the signature value changes, not its
        // decodability.
        bytes[sig_start] = if bytes[sig_start] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        assert!(matches!(
            parse(&tampered, SECRET),
            Err(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn wrong_secret_fails_invalid_signature() {
        let token = issue(&snapshot(), Duration::minutes(30), SECRET).unwrap();
        assert!(matches!(
            parse(&token, "a different but equally long secret!!"),
            Err(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn missing_email_fails_malformed() {
        let claims = Claims {
            id: 7,
            email: String::new(),
            role: Role::User,
            exp: (Utc::now() + Duration::minutes(5)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            parse(&token, SECRET),
            Err(TokenError::MalformedPayload)
        ));
    }

    #[test]
    fn garbage_fails_malformed() {
        assert!(matches!(
            parse("not.a.token", SECRET),
            Err(TokenError::MalformedPayload)
        ));
    }
}
