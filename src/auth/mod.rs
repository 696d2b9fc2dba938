use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;

pub mod password;

/// Claims embedded in the opaque bearer token: the caller's identifier and
/// the absolute expiry.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: i64) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.token_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            user_id,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Invalid token")]
    Invalid,

    #[error("token generation error: {0}")]
    Generation(String),

    #[error("token secret is not configured")]
    MissingSecret,
}

/// Sign claims into a bearer token.
pub fn generate_token(claims: Claims) -> Result<String, TokenError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, &claims, &encoding_key).map_err(|e| TokenError::Generation(e.to_string()))
}

/// Verify a bearer token and extract its claims. Expiry and malformedness
/// are reported as distinct errors so the pipeline can log them apart even
/// though both answer 401 on the wire.
pub fn verify_token(token: &str) -> Result<Claims, TokenError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    match decode::<Claims>(token, &decoding_key, &validation) {
        Ok(data) => Ok(data.claims),
        Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => Err(TokenError::Expired),
        Err(_) => Err(TokenError::Invalid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_user_id() {
        let token = generate_token(Claims::new(42)).unwrap();
        let claims = verify_token(&token).unwrap();
        assert_eq!(claims.user_id, 42);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn rejects_expired_token_distinctly() {
        // Expiry well past the default 60s decode leeway
        let now = Utc::now().timestamp();
        let stale = Claims {
            user_id: 7,
            exp: now - 3600,
            iat: now - 7200,
        };
        let secret = &config::config().security.jwt_secret;
        let token = encode(
            &Header::default(),
            &stale,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();

        assert!(matches!(verify_token(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn rejects_tampered_token_as_invalid() {
        let token = generate_token(Claims::new(1)).unwrap();
        let mut tampered = token.clone();
        tampered.pop();
        assert!(matches!(verify_token(&tampered), Err(TokenError::Invalid)));
        assert!(matches!(verify_token("not-a-token"), Err(TokenError::Invalid)));
    }
}
