//! Outbound notifications for new inquiries
//!
//! Each configured [`Notifier`] gets the same [`Notification`] in its own
//! task. Delivery is best effort: failures are logged and dropped, never
//! retried, and never reach the HTTP caller.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{info, warn};

use crate::config::Settings;

pub mod email;
pub mod telegram;

/// Errors raised by notification transports
#[derive(Debug, Error)]
pub enum NotifyError {
    /// SMTP transport error
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// Failed to build the email message
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// HTTP error talking to the chat API
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote service refused the message
    #[error("Rejected: {0}")]
    Rejected(String),
}

/// A message about one event, rendered for every channel
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub subject: String,
    pub text: String,
    /// Address replies should go to, when the channel supports it
    pub reply_to: Option<String>,
}

/// A channel that can deliver a plain-text notification
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Short channel name used in logs
    fn name(&self) -> &'static str;

    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Fan-out over every configured notifier
#[derive(Clone, Default)]
pub struct Notifications {
    notifiers: Vec<Arc<dyn Notifier>>,
}

impl Notifications {
    pub fn new(notifiers: Vec<Arc<dyn Notifier>>) -> Self {
        Self { notifiers }
    }

    /// Build the email and chat notifiers whose settings are complete
    ///
    /// A channel whose settings are present but unusable is skipped with a
    /// warning.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut notifiers: Vec<Arc<dyn Notifier>> = Vec::new();

        let mailer =
            email::EmailConfig::from_settings(settings).map(|config| email::EmailNotifier::new(&config));
        match mailer {
            Some(Ok(notifier)) => notifiers.push(Arc::new(notifier)),
            Some(Err(e)) => warn!("Invalid SMTP settings; email notifications disabled: {}", e),
            None => info!("SMTP settings incomplete; email notifications disabled"),
        }

        match telegram::TelegramConfig::from_settings(settings) {
            Some(config) => notifiers.push(Arc::new(telegram::TelegramNotifier::new(config))),
            None => info!("Telegram settings incomplete; chat notifications disabled"),
        }

        Self::new(notifiers)
    }

    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }

    /// Run [`Notifications::dispatch`] on its own task
    ///
    /// Dropping the returned handle does not cancel delivery.
    pub fn spawn(&self, notification: Notification) -> JoinHandle<()> {
        let notifications = self.clone();
        tokio::spawn(async move { notifications.dispatch(notification).await })
    }

    /// Deliver to every channel independently and wait for all of them
    pub async fn dispatch(&self, notification: Notification) {
        let notification = Arc::new(notification);
        let mut tasks = JoinSet::new();

        for notifier in &self.notifiers {
            let notifier = Arc::clone(notifier);
            let notification = Arc::clone(&notification);
            tasks.spawn(async move {
                let result = notifier.send(&notification).await;
                (notifier.name(), result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((name, Ok(()))) => info!("{} notification sent", name),
                Ok((name, Err(e))) => warn!("{} notification failed: {}", name, e),
                Err(e) => warn!("Notification task aborted: {}", e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording {
        sent: Mutex<Vec<Notification>>,
    }

    #[async_trait]
    impl Notifier for Recording {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
            self.sent.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }

    struct Failing;

    #[async_trait]
    impl Notifier for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn send(&self, _: &Notification) -> Result<(), NotifyError> {
            Err(NotifyError::Rejected("transport down".to_string()))
        }
    }

    struct Panicking;

    #[async_trait]
    impl Notifier for Panicking {
        fn name(&self) -> &'static str {
            "panicking"
        }

        async fn send(&self, _: &Notification) -> Result<(), NotifyError> {
            panic!("transport bug");
        }
    }

    fn notification() -> Notification {
        Notification {
            subject: "New inquiry from Bo".to_string(),
            text: "Hello".to_string(),
            reply_to: Some("bo@example.com".to_string()),
        }
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_other_channels() {
        let recording = Arc::new(Recording::default());
        let notifications = Notifications::new(vec![
            Arc::new(Failing),
            Arc::new(Panicking),
            recording.clone(),
        ]);

        notifications.dispatch(notification()).await;

        assert_eq!(recording.sent.lock().unwrap().as_slice(), &[notification()]);
    }

    #[tokio::test]
    async fn test_dispatch_without_notifiers_is_a_no_op() {
        let notifications = Notifications::default();
        assert!(notifications.is_empty());
        notifications.dispatch(notification()).await;
    }

    #[test]
    fn test_from_settings_skips_incomplete_channels() {
        let settings = Settings {
            smtp_host: Some("smtp.example.com".to_string()),
            telegram_bot_token: Some("123:abc".to_string()),
            ..Settings::default()
        };

        let notifications = Notifications::from_settings(&settings);
        assert!(notifications.is_empty());
    }

    #[test]
    fn test_from_settings_builds_telegram() {
        let settings = Settings {
            telegram_bot_token: Some("123:abc".to_string()),
            telegram_chat_id: Some("42".to_string()),
            ..Settings::default()
        };

        let notifications = Notifications::from_settings(&settings);
        assert_eq!(notifications.len(), 1);
    }

    #[tokio::test]
    async fn test_from_settings_skips_unusable_email_address() {
        let settings = Settings {
            smtp_host: Some("smtp.example.com".to_string()),
            smtp_user: Some("site@example.com".to_string()),
            smtp_pass: Some("app-password".to_string()),
            notify_email_to: Some("not an address".to_string()),
            telegram_bot_token: Some("123:abc".to_string()),
            telegram_chat_id: Some("42".to_string()),
            ..Settings::default()
        };

        let notifications = Notifications::from_settings(&settings);
        assert_eq!(notifications.len(), 1);
    }

    struct Slow(Arc<Recording>);

    #[async_trait]
    impl Notifier for Slow {
        fn name(&self) -> &'static str {
            "slow"
        }

        async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            self.0.send(notification).await
        }
    }

    #[tokio::test]
    async fn test_spawned_delivery_outlives_dropped_handle() {
        let recording = Arc::new(Recording::default());
        let notifications = Notifications::new(vec![Arc::new(Slow(recording.clone()))]);

        drop(notifications.spawn(notification()));
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;

        assert_eq!(recording.sent.lock().unwrap().len(), 1);
    }
}
