//! Admin credential verification
//!
//! The site has exactly one admin account. Its username and plaintext
//! password come from configuration; the password is hashed with Argon2 once
//! while the application state is built and the plaintext is dropped.

use std::sync::Arc;

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use tracing::{info, warn};

use crate::{
    config::{Settings, non_empty},
    error::{ApiError, ApiResult},
};

/// Hash a password into a salted Argon2id PHC string
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

/// Check a password against a PHC string; malformed hashes never verify
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// The configured admin account
#[derive(Debug)]
pub struct AdminCredentials {
    username: String,
    password_hash: String,
}

impl AdminCredentials {
    /// Hash `password` and pair it with the trimmed `username`
    pub fn new(username: &str, password: &str) -> Result<Self> {
        Ok(Self {
            username: username.trim().to_string(),
            password_hash: hash_password(password)?,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

/// Verifies login attempts against the admin account
#[derive(Clone, Debug, Default)]
pub struct AdminAuthenticator {
    admin: Option<Arc<AdminCredentials>>,
}

impl AdminAuthenticator {
    pub fn new(admin: AdminCredentials) -> Self {
        Self {
            admin: Some(Arc::new(admin)),
        }
    }

    /// Authenticator with no account; every login is a configuration error
    pub fn unconfigured() -> Self {
        Self::default()
    }

    /// Build from `ADMIN_USERNAME` / `ADMIN_PASSWORD`
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        match (
            non_empty(&settings.admin_username),
            settings.admin_password.as_deref().filter(|p| !p.is_empty()),
        ) {
            (Some(username), Some(password)) => {
                let admin = AdminCredentials::new(&username, password)?;
                info!("Admin account configured for '{}'", admin.username());
                Ok(Self::new(admin))
            }
            _ => {
                warn!("ADMIN_USERNAME or ADMIN_PASSWORD not set; admin login is disabled");
                Ok(Self::unconfigured())
            }
        }
    }

    /// Check a login attempt and return the admin username on success
    ///
    /// Usernames are trimmed and compared case-sensitively. An unknown
    /// username and a wrong password produce the same error, and the hash
    /// check runs in both cases.
    pub fn verify(&self, identity: &str, password: &str) -> ApiResult<String> {
        let admin = self
            .admin
            .as_ref()
            .ok_or_else(|| ApiError::Configuration("admin credentials not set".to_string()))?;

        let identity_matches = identity.trim() == admin.username;
        let password_matches = verify_password(password, &admin.password_hash);

        if identity_matches && password_matches {
            Ok(admin.username.clone())
        } else {
            Err(ApiError::InvalidCredentials)
        }
    }
}
