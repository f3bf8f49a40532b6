//! Notification types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use fondo_core::data::{Fund, FundCategory};
use fondo_core::types::Amount;

/// Delivery channel for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationChannel {
    /// Email to an address.
    Email,
    /// Text message to an E.164 phone number.
    Sms,
}

impl NotificationChannel {
    /// Returns the wire name of the channel.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Sms => "sms",
        }
    }
}

impl fmt::Display for NotificationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationChannel {
    type Err = NotifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "email" => Ok(Self::Email),
            "sms" => Ok(Self::Sms),
            other => Err(NotifierError::UnsupportedChannel {
                channel: other.to_string(),
            }),
        }
    }
}

/// A message about a fund addressed to one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Email address or phone number, depending on `channel`.
    pub recipient: String,
    /// Channel to deliver through.
    pub channel: NotificationChannel,
    /// Fund name.
    pub fund_name: String,
    /// Fund category.
    pub category: FundCategory,
    /// Fund minimum amount.
    pub minimum_amount: Amount,
}

impl Notification {
    /// Builds a notification describing `fund`.
    #[must_use]
    pub fn for_fund(recipient: impl Into<String>, channel: NotificationChannel, fund: &Fund) -> Self {
        Self {
            recipient: recipient.into(),
            channel,
            fund_name: fund.name.clone(),
            category: fund.category,
            minimum_amount: fund.minimum_amount,
        }
    }

    /// Email subject line.
    #[must_use]
    pub fn subject(&self) -> String {
        format!("Notification about fund {}", self.fund_name)
    }

    /// Message body, shortened for SMS.
    #[must_use]
    pub fn body(&self) -> String {
        match self.channel {
            NotificationChannel::Email => format!(
                "Your fund details\n\n\
                 - Name: {}\n\
                 - Category: {}\n\
                 - Minimum amount: ${}\n\n\
                 Thank you for trusting us with your investments.",
                self.fund_name, self.category, self.minimum_amount
            ),
            NotificationChannel::Sms => format!(
                "Fund {}: category {}, minimum amount ${}. Thank you for trusting us.",
                self.fund_name, self.category, self.minimum_amount
            ),
        }
    }
}

/// Proof of a delivery accepted by a sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationReceipt {
    /// Id assigned by the sender.
    pub message_id: String,
    /// Channel used.
    pub channel: NotificationChannel,
}

/// Notifier error types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotifierError {
    /// Recipient does not fit the channel.
    #[error("Invalid {channel} recipient: {reason}")]
    InvalidRecipient {
        /// Channel the recipient was checked against.
        channel: NotificationChannel,
        /// Error reason.
        reason: String,
    },

    /// Unsupported channel type.
    #[error("Unsupported channel type: {channel}")]
    UnsupportedChannel {
        /// Channel name.
        channel: String,
    },

    /// The sender could not deliver.
    #[error("Failed to send {channel} notification: {reason}")]
    DeliveryFailed {
        /// Channel used.
        channel: NotificationChannel,
        /// Error reason.
        reason: String,
    },
}

impl NotifierError {
    /// Returns true if the request itself was malformed.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidRecipient { .. } | Self::UnsupportedChannel { .. }
        )
    }

    /// Returns true if retrying the delivery may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::DeliveryFailed { .. })
    }
}
