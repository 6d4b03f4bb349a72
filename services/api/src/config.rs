//! Service configuration loaded from environment variables

use ::config::{Config, ConfigError, Environment};
use serde::Deserialize;

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_jwt_expiry() -> u64 {
    604800 // 7 days
}

/// Raw service settings
///
/// Every credential is optional at load time. Missing notification settings
/// disable the matching notifier; missing auth settings make login and the
/// admin API answer with a configuration error instead of failing startup.
/// The database URL is handled by [`common::database::DatabaseConfig`].
///
/// # Environment Variables
/// - `BIND_ADDR`: listen address (default: `0.0.0.0:3000`)
/// - `STATIC_DIR`: directory with `login.html`, `dashboard.html` and site assets (default: `static`)
/// - `JWT_SECRET`: HS256 signing secret
/// - `JWT_EXPIRY`: token lifetime in seconds (default: 604800)
/// - `ADMIN_USERNAME`, `ADMIN_PASSWORD`: the single admin account
/// - `SMTP_HOST`, `SMTP_PORT` (default: 587), `SMTP_USER`, `SMTP_PASS`, `SMTP_FROM`, `NOTIFY_EMAIL_TO`
/// - `TELEGRAM_BOT_TOKEN`, `TELEGRAM_CHAT_ID`
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    pub jwt_secret: Option<String>,
    #[serde(default = "default_jwt_expiry")]
    pub jwt_expiry: u64,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_user: Option<String>,
    pub smtp_pass: Option<String>,
    pub smtp_from: Option<String>,
    pub notify_email_to: Option<String>,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            static_dir: default_static_dir(),
            jwt_secret: None,
            jwt_expiry: default_jwt_expiry(),
            admin_username: None,
            admin_password: None,
            smtp_host: None,
            smtp_port: None,
            smtp_user: None,
            smtp_pass: None,
            smtp_from: None,
            notify_email_to: None,
            telegram_bot_token: None,
            telegram_chat_id: None,
        }
    }
}

impl Settings {
    /// Load settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Environment::default())
            .build()?
            .try_deserialize()
    }
}

/// Treat blank values the same as unset ones
pub(crate) fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
