//! Fund notifications over email and SMS.
//!
//! ```text
//! ┌─────────────┐  send_now / dispatch  ┌──────────┐   send   ┌────────────────────┐
//! │  API layer  │ ────────────────────▶ │ Notifier │ ───────▶ │ NotificationSender │
//! └─────────────┘                       └──────────┘          └────────────────────┘
//! ```
//!
//! The subscription engine never notifies; callers decide when to.

#![allow(clippy::module_inception)]

mod notifier;
mod sender;
mod types;

pub use notifier::Notifier;
pub use sender::{LogNotificationSender, NotificationSender, validate_recipient};
pub use types::{Notification, NotificationChannel, NotificationReceipt, NotifierError};
