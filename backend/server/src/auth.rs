//! # Principals
//!
//! Identity comes from the auth collaborator as an HS256 bearer token whose `sub`
//! claim is the numeric user id. The vote service only verifies tokens, it never issues them.
//!
//! - Mutations require a valid token
//! - Reads treat a missing or invalid token as an anonymous caller

use axum::http::{HeaderMap, header::AUTHORIZATION};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, errors::ErrorKind};
use payloads::UserId;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: UserId,
    #[serde(default)]
    pub email: Option<String>,
    pub exp: u64,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Please login to vote")]
    MissingAuthorization,

    #[error("Invalid authorization scheme")]
    InvalidScheme,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
}

pub struct Authenticator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl Authenticator {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn extract_bearer_token(header_value: Option<&str>) -> Result<&str, AuthError> {
        let raw = header_value.ok_or(AuthError::MissingAuthorization)?;
        let Some(token) = raw.trim().strip_prefix("Bearer ") else {
            return Err(AuthError::InvalidScheme);
        };

        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::InvalidScheme);
        }

        Ok(token)
    }

    pub fn authenticate(&self, token: &str) -> Result<Principal, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            }
        })?;

        Ok(Principal {
            user_id: data.claims.sub,
        })
    }

    pub fn require(&self, headers: &HeaderMap) -> Result<Principal, AuthError> {
        let header = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        self.authenticate(Self::extract_bearer_token(header)?)
    }

    pub fn optional(&self, headers: &HeaderMap) -> Option<Principal> {
        match self.require(headers) {
            Ok(principal) => Some(principal),
            Err(AuthError::MissingAuthorization) => None,
            Err(e) => {
                debug!("Ignoring credentials on read: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
pub(crate) fn issue_token(secret: &str, user_id: UserId, ttl_secs: i64) -> String {
    use jsonwebtoken::{EncodingKey, Header, encode};

    let claims = Claims {
        sub: user_id,
        email: Some(format!("user{user_id}@example.com")),
        exp: (chrono::Utc::now().timestamp() + ttl_secs).max(0) as u64,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("token should encode")
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    const SECRET: &str = "test-secret-for-principal-resolution";

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(Authenticator::extract_bearer_token(Some("Bearer abc")), Ok("abc"));
        assert_eq!(
            Authenticator::extract_bearer_token(None),
            Err(AuthError::MissingAuthorization)
        );
        assert_eq!(
            Authenticator::extract_bearer_token(Some("Basic abc")),
            Err(AuthError::InvalidScheme)
        );
        assert_eq!(
            Authenticator::extract_bearer_token(Some("Bearer   ")),
            Err(AuthError::InvalidScheme)
        );
    }

    #[test]
    fn test_valid_token_resolves_user() {
        let auth = Authenticator::new(SECRET);
        let token = issue_token(SECRET, 17, 3600);

        let principal = auth.require(&headers_with(&format!("Bearer {token}"))).unwrap();
        assert_eq!(principal.user_id, 17);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let auth = Authenticator::new(SECRET);
        let token = issue_token("some-other-secret", 17, 3600);

        assert_eq!(auth.authenticate(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_expired_token() {
        let auth = Authenticator::new(SECRET);
        let token = issue_token(SECRET, 17, -3600);

        assert_eq!(auth.authenticate(&token), Err(AuthError::TokenExpired));
    }

    #[test]
    fn test_optional_degrades_to_anonymous() {
        let auth = Authenticator::new(SECRET);

        assert_eq!(auth.optional(&HeaderMap::new()), None);
        assert_eq!(auth.optional(&headers_with("Bearer garbage")), None);
    }
}
