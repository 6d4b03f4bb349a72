//! Email notifications over SMTP via lettre

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use tracing::warn;

use super::{Notification, Notifier, NotifyError};
use crate::config::{Settings, non_empty};

const DEFAULT_SMTP_PORT: u16 = 587;
const IMPLICIT_TLS_PORT: u16 = 465;

/// SMTP settings
#[derive(Debug, Clone, PartialEq)]
pub struct EmailConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
    pub to: String,
}

impl EmailConfig {
    /// `None` unless host, user, password and recipient are all set
    pub fn from_settings(settings: &Settings) -> Option<Self> {
        let host = non_empty(&settings.smtp_host)?;
        let username = non_empty(&settings.smtp_user)?;
        let password = settings.smtp_pass.clone().filter(|p| !p.is_empty())?;
        let to = non_empty(&settings.notify_email_to)?;
        let from = non_empty(&settings.smtp_from).unwrap_or_else(|| username.clone());

        Some(Self {
            host,
            port: settings.smtp_port.unwrap_or(DEFAULT_SMTP_PORT),
            username,
            password,
            from,
            to,
        })
    }
}

/// Sends notifications to the site owner's inbox
pub struct EmailNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

fn mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address
        .parse()
        .map_err(|_| NotifyError::InvalidAddress(address.to_string()))
}

impl EmailNotifier {
    /// Build the SMTP transport; port 465 uses implicit TLS, others STARTTLS
    pub fn new(config: &EmailConfig) -> Result<Self, NotifyError> {
        let credentials = Credentials::new(config.username.clone(), config.password.clone());

        let builder = if config.port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
        };

        Ok(Self {
            mailer: builder.port(config.port).credentials(credentials).build(),
            from: mailbox(&config.from)?,
            to: mailbox(&config.to)?,
        })
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(notification.subject.as_str());

        if let Some(reply_to) = notification.reply_to.as_deref() {
            match reply_to.parse::<Mailbox>() {
                Ok(mailbox) => builder = builder.reply_to(mailbox),
                Err(_) => warn!("Ignoring unparseable reply-to address '{}'", reply_to),
            }
        }

        let email = builder
            .header(ContentType::TEXT_PLAIN)
            .body(notification.text.clone())?;

        self.mailer.send(email).await?;
        Ok(())
    }
}
