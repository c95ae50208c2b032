//! JWT token generation and validation
//!
//! Access tokens carry the account role so handlers can authorize without a
//! database round trip. Premium checks still go to the database because a
//! customer's type can change while a token is alive.

use anyhow::Result;
use chrono::{Duration, Utc};
use diet_tracker_shared::{AuthTokens, UserType};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Kind of token, stored in the `token_type` claim
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (customer or administrator ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    pub token_type: TokenKind,
    /// Account role at the time the token was issued
    pub role: UserType,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|_| anyhow::anyhow!("Invalid user ID in token"))
    }
}

/// Pre-computed JWT keys, shared through `AppState`
#[derive(Clone)]
struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }
}

/// JWT service for token operations
///
/// Keys are derived once at startup; cloning only bumps reference counts.
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    access_token_expiry_secs: i64,
    refresh_token_expiry_secs: i64,
}

impl JwtService {
    pub fn new(secret: &str, access_token_expiry_secs: i64, refresh_token_expiry_secs: i64) -> Self {
        Self {
            keys: JwtKeys::new(secret),
            access_token_expiry_secs,
            refresh_token_expiry_secs,
        }
    }

    /// Issue an access/refresh pair for an account
    pub fn issue_tokens(&self, user_id: Uuid, role: UserType) -> Result<AuthTokens> {
        Ok(AuthTokens {
            access_token: self.generate_access_token(user_id, role)?,
            refresh_token: self.generate_refresh_token(user_id, role)?,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry_secs,
        })
    }

    #[inline]
    pub fn generate_access_token(&self, user_id: Uuid, role: UserType) -> Result<String> {
        self.generate_token(user_id, role, TokenKind::Access, self.access_token_expiry_secs)
    }

    #[inline]
    pub fn generate_refresh_token(&self, user_id: Uuid, role: UserType) -> Result<String> {
        self.generate_token(user_id, role, TokenKind::Refresh, self.refresh_token_expiry_secs)
    }

    fn generate_token(
        &self,
        user_id: Uuid,
        role: UserType,
        kind: TokenKind,
        expiry_secs: i64,
    ) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(expiry_secs);

        let claims = Claims {
            sub: user_id.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            token_type: kind,
            role,
        };

        encode(&Header::default(), &claims, &self.keys.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to generate {:?} token: {}", kind, e))
    }

    /// Validate a token of the given kind and return its claims
    pub fn validate(&self, token: &str, expected: TokenKind) -> Result<Claims> {
        let claims = decode::<Claims>(token, &self.keys.decoding, &Validation::default())
            .map_err(|e| anyhow::anyhow!("Invalid token: {}", e))?
            .claims;

        if claims.token_type != expected {
            return Err(anyhow::anyhow!("Expected {:?} token", expected));
        }
        Ok(claims)
    }

    #[inline]
    pub fn validate_access_token(&self, token: &str) -> Result<Claims> {
        self.validate(token, TokenKind::Access)
    }

    #[inline]
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims> {
        self.validate(token, TokenKind::Refresh)
    }

    #[inline]
    pub fn access_token_expiry_secs(&self) -> i64 {
        self.access_token_expiry_secs
    }
}
