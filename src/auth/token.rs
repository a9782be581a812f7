use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::Role;
use crate::error::{token_error, Error};

/// Which surface a token was issued for. Each audience is signed with its own secret.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    /// Dashboard sessions, admins only.
    Admin,
    /// Consumer-facing bearer tokens.
    Public,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    /// Session row backing the token.
    pub sid: Uuid,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub role: Role,
}

pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn issue(&self, user_id: Uuid, role: Role, session_id: Uuid, ttl: Duration) -> Result<Token, Error> {
        let now = Utc::now();
        let expires_at = now + ttl;

        let claims = Claims {
            sub: user_id,
            role,
            sid: session_id,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let access_token = encode(&Header::default(), &claims, &self.encoding).map_err(token_error)?;

        Ok(Token {
            access_token,
            token_type: "Bearer",
            expires_at,
            user_id,
            role,
        })
    }

    /// Checks signature and expiry. Failures surface as unauthenticated.
    pub fn verify(&self, token: &str) -> Result<Claims, Error> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;

        Ok(data.claims)
    }
}
