//! HS256 session tokens handed out after a wallet sign-in.

use std::env;

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AppError;

const DEFAULT_TOKEN_TTL_MINS: i64 = 24 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Internal user id.
    pub sub: String,
    pub wallet: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub token_ttl_mins: i64,
}

impl JwtConfig {
    /// `JWT_SECRET` is required; `JWT_TTL_MINS` defaults to one day.
    pub fn from_env() -> Result<Self, AppError> {
        let secret = env::var("JWT_SECRET")
            .ok()
            .filter(|secret| !secret.trim().is_empty())
            .ok_or_else(|| AppError::Config("JWT_SECRET must be set".into()))?;

        let token_ttl_mins = match env::var("JWT_TTL_MINS") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|err| AppError::Config(format!("invalid JWT_TTL_MINS: {err}")))?,
            Err(_) => DEFAULT_TOKEN_TTL_MINS,
        };
        if token_ttl_mins <= 0 {
            return Err(AppError::Config("JWT_TTL_MINS must be positive".into()));
        }

        Ok(Self {
            secret,
            token_ttl_mins,
        })
    }
}

pub fn issue_token(user_id: &str, wallet: &str, config: &JwtConfig) -> Result<String, AppError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        wallet: wallet.to_string(),
        iat: now,
        exp: now + config.token_ttl_mins * 60,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|err| AppError::Other(err.into()))
}

/// Checks signature and expiry. Any failure is `Unauthorized`.
pub fn validate_token(token: &str, config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|err| {
        debug!(error = %err, "rejected session token");
        AppError::Unauthorized
    })
}
