//! Session token issuance and verification.
//!
//! Sessions are stateless JWTs (HS256) carrying the user identifier and the
//! email claimed at login. Verification is the single identity check used by
//! every entry point; nothing downstream re-derives identity from raw
//! request fields.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult};

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: the user identifier.
    pub sub: String,
    /// Email the session was opened with.
    pub email: String,
    /// Issued-at (seconds since epoch).
    pub iat: i64,
    /// Expiry (seconds since epoch).
    pub exp: i64,
}

/// Issues and verifies session tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry: Duration,
}

impl TokenService {
    /// Create a token service from the signing secret and token lifetime.
    #[must_use]
    pub fn new(secret: &str, expiry_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry: Duration::days(expiry_days),
        }
    }

    /// Issue a signed token for the given user.
    pub fn issue(&self, user_id: &str, email: &str) -> AppResult<String> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.expiry).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign session token: {e}")))
    }

    /// Verify a token and return its claims.
    ///
    /// Any failure (bad signature, malformed, expired) maps to
    /// [`AppError::Unauthorized`] so callers never learn why a credential
    /// was rejected.
    pub fn verify(&self, token: &str) -> AppResult<SessionClaims> {
        decode::<SessionClaims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let svc = TokenService::new("test-secret", 7);
        let token = svc.issue("user1", "a@example.com").unwrap();

        let claims = svc.verify(&token).unwrap();
        assert_eq!(claims.sub, "user1");
        assert_eq!(claims.email, "a@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let issuer = TokenService::new("secret-a", 7);
        let verifier = TokenService::new("secret-b", 7);

        let token = issuer.issue("user1", "a@example.com").unwrap();
        let result = verifier.verify(&token);

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let svc = TokenService::new("test-secret", 7);
        assert!(matches!(
            svc.verify("not.a.token"),
            Err(AppError::Unauthorized)
        ));
    }
}
