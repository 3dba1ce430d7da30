//! Signed session tokens
//!
//! Access and refresh tokens carry the user id and the role the user logged
//! in as, so a request can be authorized without touching the directory.

use arogya_core::{Role, UserId};
use chrono::{Duration, Utc};
use jsonwebtoken::{errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Clock skew tolerated when checking `exp`, in seconds
const EXPIRY_LEEWAY_SECS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// Role chosen at login
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
    pub token_type: TokenType,
}

impl Claims {
    /// # Errors
    /// Returns `InvalidToken` if the subject is not a valid user id
    pub fn user_id(&self) -> Result<UserId, AppError> {
        UserId::parse(&self.sub).map_err(|_| AppError::InvalidToken)
    }
}

/// What login, signup, and refresh hand back to the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
}

impl JwtService {
    /// HS256 signer; expiries are in seconds
    #[must_use]
    pub fn new(secret: &str, access_token_expiry: i64, refresh_token_expiry: i64) -> Self {
        let mut validation = Validation::default();
        validation.leeway = EXPIRY_LEEWAY_SECS;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            access_token_expiry,
            refresh_token_expiry,
        }
    }

    fn lifetime(&self, kind: TokenType) -> i64 {
        match kind {
            TokenType::Access => self.access_token_expiry,
            TokenType::Refresh => self.refresh_token_expiry,
        }
    }

    /// # Errors
    /// Returns `Internal` if signing fails
    pub fn generate_token_pair(&self, user_id: &UserId, role: Role) -> Result<TokenPair, AppError> {
        let sign = |kind| self.sign(user_id, role, kind);
        Ok(TokenPair {
            access_token: sign(TokenType::Access)?,
            refresh_token: sign(TokenType::Refresh)?,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
        })
    }

    fn sign(&self, user_id: &UserId, role: Role, token_type: TokenType) -> Result<String, AppError> {
        let issued = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role,
            iat: issued.timestamp(),
            exp: (issued + Duration::seconds(self.lifetime(token_type))).timestamp(),
            token_type,
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(anyhow::anyhow!("signing session token: {e}")))
    }

    /// Verify signature and expiry
    ///
    /// # Errors
    /// `TokenExpired` once past `exp`, `InvalidToken` for anything else
    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::InvalidToken,
            })
    }

    fn decode_kind(&self, token: &str, kind: TokenType) -> Result<Claims, AppError> {
        let claims = self.decode_token(token)?;
        if claims.token_type == kind {
            Ok(claims)
        } else {
            Err(AppError::InvalidToken)
        }
    }

    /// # Errors
    /// Fails for invalid, expired, or refresh tokens
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, AppError> {
        self.decode_kind(token, TokenType::Access)
    }

    /// # Errors
    /// Fails for invalid, expired, or access tokens
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, AppError> {
        self.decode_kind(token, TokenType::Refresh)
    }

    /// Trade a refresh token for a new pair in the same role
    ///
    /// # Errors
    /// Returns an error if the refresh token is invalid or expired
    pub fn refresh_tokens(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let claims = self.validate_refresh_token(refresh_token)?;
        self.generate_token_pair(&claims.user_id()?, claims.role)
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_token_expiry", &self.access_token_expiry)
            .field("refresh_token_expiry", &self.refresh_token_expiry)
            .finish_non_exhaustive()
    }
}
