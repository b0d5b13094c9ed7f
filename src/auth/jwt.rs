//! Bearer-token boundary. Identity is owned by an external auth service;
//! this module only checks the HS256 signature and expiry and hands the
//! acting user id to the handlers.

use crate::core::errors::BillsplitError;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Acting user id, matched against group member ids.
    pub sub: String,
    pub exp: usize,
}

pub struct JwtService {
    secret: String,
}

impl JwtService {
    pub fn new(secret: String) -> Self {
        JwtService { secret }
    }

    /// Signs a token for `user_id` valid for `ttl_secs`. Used by tests and
    /// local tooling in place of the external issuer.
    pub fn generate_token(&self, user_id: &str, ttl_secs: u64) -> Result<String, BillsplitError> {
        let ttl = i64::try_from(ttl_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or_else(|| BillsplitError::InternalServerError(format!("Token lifetime out of range: {}", ttl_secs)))?;
        let exp = usize::try_from((Utc::now() + ttl).timestamp())
            .map_err(|e| BillsplitError::InternalServerError(format!("Token expiry out of range: {}", e)))?;

        let claims = Claims {
            sub: user_id.to_string(),
            exp,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(self.secret.as_bytes()))
            .map_err(|e| BillsplitError::InternalServerError(format!("JWT encoding error: {}", e)))
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, BillsplitError> {
        decode::<Claims>(token, &DecodingKey::from_secret(self.secret.as_bytes()), &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| BillsplitError::Unauthorized(format!("Invalid token: {}", e)))
    }
}
