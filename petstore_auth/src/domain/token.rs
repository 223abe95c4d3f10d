//! HS256 access tokens

use anyhow::Context;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde_json::{Map, Value};

use crate::domain::model::{AuthError, Role, User};

const RESERVED_CLAIMS: [&str; 5] = ["sub", "id", "role", "iat", "exp"];

/// The claims carried by an access token
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    /// The username
    pub sub: String,
    /// The user id
    pub id: i64,
    /// The user role
    pub role: Role,
    /// Issued at, unix seconds
    pub iat: i64,
    /// Expires at, unix seconds
    pub exp: i64,
    /// Any additional claims
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Signs and validates access tokens with a shared secret
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_seconds: u64,
}

impl TokenIssuer {
    /// Creates a new issuer. Tokens live for `expiration_seconds`.
    pub fn new(secret: &str, expiration_seconds: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiration_seconds,
        }
    }

    /// Lifetime of issued tokens in seconds
    pub fn expires_in(&self) -> u64 {
        self.expiration_seconds
    }

    /// Issues a token for `user`
    pub fn issue(&self, user: &User) -> anyhow::Result<String> {
        self.issue_with_claims(user, Map::new())
    }

    /// Issues a token for `user` carrying `extra` claims. Extra claims never override the
    /// standard ones.
    pub fn issue_with_claims(&self, user: &User, extra: Map<String, Value>) -> anyhow::Result<String> {
        self.issue_at(user, extra, chrono::Utc::now().timestamp())
    }

    pub(crate) fn issue_at(
        &self,
        user: &User,
        mut extra: Map<String, Value>,
        issued_at: i64,
    ) -> anyhow::Result<String> {
        extra.retain(|key, _| !RESERVED_CLAIMS.contains(&key.as_str()));

        let lifetime = i64::try_from(self.expiration_seconds).context("token lifetime overflow")?;
        let claims = Claims {
            sub: user.username.clone(),
            id: user.id,
            role: user.role,
            iat: issued_at,
            exp: issued_at + lifetime,
            extra,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .context("failed to encode token")
    }

    /// Checks signature and expiry and returns the claims
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(decoded) => Ok(decoded.claims),
            Err(e) => match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => Err(AuthError::TokenExpired),
                _ => Err(AuthError::InvalidToken(e.to_string())),
            },
        }
    }

    /// The username a valid token was issued for
    pub fn extract_username(&self, token: &str) -> Result<String, AuthError> {
        Ok(self.validate(token)?.sub)
    }

    /// true when the token is valid and was issued for `user`
    pub fn is_token_valid(&self, token: &str, user: &User) -> bool {
        matches!(self.validate(token), Ok(claims) if claims.sub == user.username)
    }
}
