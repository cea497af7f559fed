pub mod password;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use password::{hash_password, verify_password, CredentialError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id, as a string per RFC 7519
    pub sub: String,
    pub username: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: i64, username: impl Into<String>, duration: Duration) -> Result<Self, TokenError> {
        let now = Utc::now();
        let expires = now
            .checked_add_signed(duration)
            .ok_or(TokenError::ExpiryOutOfRange)?;

        Ok(Self {
            sub: user_id.to_string(),
            username: username.into(),
            exp: expires.timestamp(),
            iat: now.timestamp(),
        })
    }

    pub fn user_id(&self) -> Result<i64, TokenError> {
        self.sub.parse().map_err(|_| TokenError::InvalidSubject(self.sub.clone()))
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Invalid JWT secret")]
    InvalidSecret,

    #[error("JWT generation error: {0}")]
    Generation(#[source] jsonwebtoken::errors::Error),

    #[error("Invalid JWT token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    #[error("Invalid JWT subject: {0}")]
    InvalidSubject(String),

    #[error("JWT expiry is out of range")]
    ExpiryOutOfRange,
}

/// A signed token and the instant it stops being accepted
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Sign an HS256 token asserting `user_id` / `username` for `duration`.
///
/// There is no revocation list: the token stays valid until `exp`.
pub fn issue_token(
    user_id: i64,
    username: &str,
    secret: &str,
    duration: Duration,
) -> Result<IssuedToken, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::InvalidSecret);
    }

    let claims = Claims::new(user_id, username, duration)?;
    let expires_at = DateTime::from_timestamp(claims.exp, 0).unwrap_or_else(Utc::now);

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let token = encode(&Header::default(), &claims, &encoding_key).map_err(TokenError::Generation)?;

    Ok(IssuedToken { token, expires_at })
}

/// Verify signature and expiry, returning the embedded claims
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(TokenError::Invalid)?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn issued_token_carries_identity() {
        let issued = issue_token(42, "alice", SECRET, Duration::hours(1)).unwrap();
        assert_eq!(issued.token.split('.').count(), 3);

        let claims = decode_token(&issued.token, SECRET).unwrap();
        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.exp, issued.expires_at.timestamp());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let issued = issue_token(1, "alice", SECRET, Duration::hours(1)).unwrap();
        assert!(matches!(
            decode_token(&issued.token, "another-secret"),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        // Well past the default 60s leeway
        let issued = issue_token(1, "alice", SECRET, Duration::hours(-1)).unwrap();
        assert!(matches!(decode_token(&issued.token, SECRET), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn unrepresentable_expiry_is_an_error() {
        assert!(matches!(
            issue_token(1, "alice", SECRET, Duration::days(1_000_000_000)),
            Err(TokenError::ExpiryOutOfRange)
        ));
    }

    #[test]
    fn empty_secret_is_refused() {
        assert!(matches!(
            issue_token(1, "alice", "", Duration::hours(1)),
            Err(TokenError::InvalidSecret)
        ));
        assert!(matches!(decode_token("a.b.c", ""), Err(TokenError::InvalidSecret)));
    }
}
