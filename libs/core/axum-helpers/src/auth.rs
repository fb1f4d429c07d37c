use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::HttpError;

/// Token time-to-live
pub const TOKEN_TTL_SECS: i64 = 3600; // 1 hour

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user ID)
    pub exp: i64,    // Expiration time
    pub iat: i64,    // Issued at
    pub jti: String, // JWT ID
}

/// HS256 bearer-token authentication strategy.
///
/// Constructed explicitly during bootstrap via [`TokenAuth::from_env`] and
/// carried in the application state; nothing registers itself as an import
/// side effect. Validation internals stay behind this type.
#[derive(Clone)]
pub struct TokenAuth {
    secret: String,
}

impl TokenAuth {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Initialize the strategy from `JWT_SECRET`.
    ///
    /// When the variable is unset a random per-process secret is generated,
    /// with a warning: tokens then survive only until restart, which is fine
    /// for development and useless for anything else.
    pub fn from_env() -> Self {
        match core_config::env_optional("JWT_SECRET") {
            Some(secret) => Self::new(secret),
            None => {
                tracing::warn!("JWT_SECRET not set, generating a per-process secret");
                Self::new(Uuid::new_v4().simple().to_string())
            }
        }
    }

    /// Issue a token for the given subject
    pub fn issue(&self, subject: &str) -> eyre::Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            exp: (now + Duration::seconds(TOKEN_TTL_SECS)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;
        Ok(token)
    }

    /// Verify a token's signature and expiry, returning its claims
    pub fn verify(&self, token: &str) -> Result<Claims, HttpError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!("Token rejected: {}", e);
            HttpError::unauthorized("Invalid or expired token")
        })
    }
}

/// Middleware guarding a route group with token authentication.
///
/// Accepts `Authorization: Bearer <token>` or, failing that, a `token`
/// cookie. Verified claims are attached to the request for handlers to read.
pub async fn require_auth(
    State(auth): State<TokenAuth>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, HttpError> {
    let bearer = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string);

    let token = bearer
        .or_else(|| jar.get("token").map(|cookie| cookie.value().to_string()))
        .ok_or_else(|| HttpError::unauthorized("Missing credentials"))?;

    let claims = auth.verify(&token)?;
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}
