//! Auth Service
//!
//! JWT token issuing and validation.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use logscope_core::{LogscopeError, Result};
use serde::{Deserialize, Serialize};

use super::details::{AuthenticationDetails, UserDetails};

/// JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iss: String,
    pub exp: i64,
    pub iat: i64,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub session: serde_json::Map<String, serde_json::Value>,
}

#[derive(Clone)]
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    expiry_secs: u64,
}

impl AuthService {
    pub fn new(secret: &str, issuer: &str, expiry_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.to_string(),
            expiry_secs,
        }
    }

    /// Issue an access token carrying the user's permission grants
    pub fn issue_token(&self, username: &str, permissions: &[&str]) -> Result<String> {
        let now = Utc::now();
        let expiry = i64::try_from(self.expiry_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or_else(|| LogscopeError::Config(format!("Invalid token expiry: {}s", self.expiry_secs)))?;

        let claims = Claims {
            sub: username.to_string(),
            iss: self.issuer.clone(),
            exp: (now + expiry).timestamp(),
            iat: now.timestamp(),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            session: serde_json::Map::new(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| LogscopeError::Internal(format!("Token encoding failed: {}", e)))
    }

    /// Validate token and return claims
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| LogscopeError::Auth(e.to_string()))?;

        Ok(token_data.claims)
    }

    /// Authenticate a request from its `Authorization: Bearer` header
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<AuthenticationDetails> {
        let header = headers
            .get(AUTHORIZATION)
            .ok_or_else(|| LogscopeError::Auth("Missing Authorization header".to_string()))?
            .to_str()
            .map_err(|_| LogscopeError::Auth("Malformed Authorization header".to_string()))?;

        let token = extract_bearer(header)
            .ok_or_else(|| LogscopeError::Auth("Expected a Bearer token".to_string()))?;

        let claims = self.validate_token(token)?;
        tracing::debug!(user = %claims.sub, grants = claims.permissions.len(), "Authenticated caller");

        Ok(AuthenticationDetails {
            user_details: UserDetails {
                username: claims.sub,
                permissions: claims.permissions,
            },
            session_attributes: claims.session.into_iter().collect(),
        })
    }
}

fn extract_bearer(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
