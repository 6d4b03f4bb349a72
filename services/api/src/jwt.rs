//! JWT service for admin session tokens
//!
//! Tokens are HS256-signed with a server-held secret and carry the admin
//! role and identity. They are stateless: there is no refresh flow and no
//! revocation list, so a client logs in again once its token expires.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::{
    config::{Settings, non_empty},
    error::{ApiError, ApiResult},
};

/// Role embedded in every token this service issues
pub const ADMIN_ROLE: &str = "admin";

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret used to sign and verify tokens
    pub secret: Option<String>,
    /// Token expiration time in seconds (default: 7 days)
    pub token_expiry: u64,
}

impl JwtConfig {
    /// Take `JWT_SECRET` and `JWT_EXPIRY` from the loaded settings
    pub fn from_settings(settings: &Settings) -> Self {
        let secret = non_empty(&settings.jwt_secret);
        if secret.is_none() {
            warn!("JWT_SECRET not set; login and the admin API are disabled");
        }

        Self {
            secret,
            token_expiry: settings.jwt_expiry,
        }
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Admin identity
    pub sub: String,
    /// Granted role
    pub role: String,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

#[derive(Clone)]
struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    keys: Option<Keys>,
    validation: Validation,
    config: JwtConfig,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Self {
        let keys = config.secret.as_ref().map(|secret| Keys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        });

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        JwtService {
            keys,
            validation,
            config,
        }
    }

    fn keys(&self) -> ApiResult<&Keys> {
        self.keys
            .as_ref()
            .ok_or_else(|| ApiError::Configuration("JWT_SECRET not set".to_string()))
    }

    /// Issue an admin token for `identity`
    pub fn issue(&self, identity: &str) -> ApiResult<String> {
        let keys = self.keys()?;
        let now = now_secs()?;
        let exp = now.checked_add(self.config.token_expiry).ok_or_else(|| {
            error!("JWT_EXPIRY of {}s is out of range", self.config.token_expiry);
            ApiError::InternalServerError
        })?;

        let claims = Claims {
            sub: identity.to_string(),
            role: ADMIN_ROLE.to_string(),
            iat: now,
            exp,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding).map_err(|e| {
            error!("Failed to sign token: {}", e);
            ApiError::InternalServerError
        })
    }

    /// Validate a token and return the claims
    ///
    /// Bad signatures, malformed tokens and expired tokens are all reported
    /// as [`ApiError::InvalidToken`].
    pub fn verify(&self, token: &str) -> ApiResult<Claims> {
        let keys = self.keys()?;
        let token_data = decode::<Claims>(token, &keys.decoding, &self.validation)
            .map_err(|_| ApiError::InvalidToken)?;
        Ok(token_data.claims)
    }
}

fn now_secs() -> ApiResult<u64> {
    u64::try_from(Utc::now().timestamp()).map_err(|e| {
        error!("System clock is before the Unix epoch: {}", e);
        ApiError::InternalServerError
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    fn service() -> JwtService {
        JwtService::new(JwtConfig {
            secret: Some(SECRET.to_string()),
            token_expiry: 604800,
        })
    }

    fn sign(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_issue_and_verify() {
        let jwt = service();
        let token = jwt.issue("coach").unwrap();
        let claims = jwt.verify(&token).unwrap();

        assert_eq!(claims.sub, "coach");
        assert!(claims.is_admin());
        assert_eq!(claims.exp - claims.iat, 604800);
    }

    #[test]
    fn test_foreign_signature_is_rejected() {
        let now = now_secs().unwrap();
        let claims = Claims {
            sub: "coach".to_string(),
            role: ADMIN_ROLE.to_string(),
            iat: now,
            exp: now + 60,
        };
        let token = sign(&claims, "some-other-secret");

        assert!(matches!(service().verify(&token), Err(ApiError::InvalidToken)));
    }

    #[test]
    fn test_mutated_signature_is_rejected() {
        let jwt = service();
        let token = jwt.issue("coach").unwrap();

        let signature_start = token.rfind('.').unwrap() + 1;
        let mut bytes = token.into_bytes();
        bytes[signature_start] = if bytes[signature_start] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        assert!(matches!(jwt.verify(&tampered), Err(ApiError::InvalidToken)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let now = now_secs().unwrap();
        let claims = Claims {
            sub: "coach".to_string(),
            role: ADMIN_ROLE.to_string(),
            iat: now - 8 * 24 * 3600,
            exp: now - 24 * 3600,
        };
        let token = sign(&claims, SECRET);

        assert!(matches!(service().verify(&token), Err(ApiError::InvalidToken)));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(matches!(
            service().verify("not.a.token"),
            Err(ApiError::InvalidToken)
        ));
    }

    #[test]
    fn test_oversized_expiry_is_an_internal_error() {
        let jwt = JwtService::new(JwtConfig {
            secret: Some(SECRET.to_string()),
            token_expiry: u64::MAX,
        });

        assert!(matches!(jwt.issue("coach"), Err(ApiError::InternalServerError)));
    }

    #[test]
    fn test_missing_secret_is_a_configuration_error() {
        let jwt = JwtService::new(JwtConfig {
            secret: None,
            token_expiry: 604800,
        });

        assert!(matches!(jwt.issue("coach"), Err(ApiError::Configuration(_))));
        assert!(matches!(jwt.verify("x.y.z"), Err(ApiError::Configuration(_))));
    }
}
