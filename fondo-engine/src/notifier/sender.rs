//! Notification senders.

use std::sync::LazyLock;

use async_trait::async_trait;
use fondo_telemetry::masking::ContactMasker;
use regex::Regex;
use tracing::info;

use super::types::{Notification, NotificationChannel, NotificationReceipt, NotifierError};

static EMAIL_ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[A-Za-z]{2,}$").unwrap());

static E164_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+[1-9][0-9]{7,14}$").unwrap());

/// Checks that `recipient` is addressable through `channel`.
///
/// # Errors
///
/// Returns `NotifierError::InvalidRecipient` when it is not.
pub fn validate_recipient(
    channel: NotificationChannel,
    recipient: &str,
) -> Result<(), NotifierError> {
    let (valid, expected) = match channel {
        NotificationChannel::Email => (EMAIL_ADDRESS.is_match(recipient), "an email address"),
        NotificationChannel::Sms => (
            E164_NUMBER.is_match(recipient),
            "a phone number in E.164 format",
        ),
    };
    if valid {
        Ok(())
    } else {
        Err(NotifierError::InvalidRecipient {
            channel,
            reason: format!("expected {expected}"),
        })
    }
}

/// Delivers notifications to an external system.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Returns the sender name.
    fn name(&self) -> &str;

    /// Sends one notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the recipient is invalid or delivery fails.
    async fn send(&self, notification: &Notification) -> Result<NotificationReceipt, NotifierError>;
}

/// Sender that writes deliveries to the log instead of a mail or SMS gateway.
#[derive(Debug, Clone, Default)]
pub struct LogNotificationSender {
    masker: ContactMasker,
}

impl LogNotificationSender {
    /// Creates a log sender.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationSender for LogNotificationSender {
    fn name(&self) -> &str {
        "log"
    }

    async fn send(&self, notification: &Notification) -> Result<NotificationReceipt, NotifierError> {
        validate_recipient(notification.channel, &notification.recipient)?;

        let message_id = uuid::Uuid::new_v4().to_string();
        info!(
            message_id = %message_id,
            channel = %notification.channel,
            recipient = %self.masker.mask_recipient(&notification.recipient),
            subject = %notification.subject(),
            body_len = notification.body().len(),
            "Notification delivered"
        );

        Ok(NotificationReceipt {
            message_id,
            channel: notification.channel,
        })
    }
}
