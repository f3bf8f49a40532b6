//! Notification dispatcher.
//!
//! Deliveries never feed back into the ledger: a failed notification is
//! logged and reported to the caller of [`Notifier::send_now`], while
//! [`Notifier::dispatch`] only logs.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use fondo_telemetry::masking::ContactMasker;

use super::sender::NotificationSender;
use super::types::{Notification, NotificationReceipt, NotifierError};
use crate::retry::RetryPolicy;

#[derive(Debug, Default)]
struct Counters {
    delivered: AtomicU64,
    failed: AtomicU64,
}

/// Sends notifications through a [`NotificationSender`], retrying transient
/// failures.
#[derive(Clone)]
pub struct Notifier {
    sender: Arc<dyn NotificationSender>,
    retry: Arc<RetryPolicy>,
    masker: Arc<ContactMasker>,
    counters: Arc<Counters>,
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("sender", &self.sender.name())
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl Notifier {
    /// Creates a notifier over `sender`.
    #[must_use]
    pub fn new(sender: Arc<dyn NotificationSender>, retry: RetryPolicy) -> Self {
        Self {
            sender,
            retry: Arc::new(retry),
            masker: Arc::new(ContactMasker::new()),
            counters: Arc::new(Counters::default()),
        }
    }

    /// Returns the sender name.
    #[must_use]
    pub fn sender_name(&self) -> &str {
        self.sender.name()
    }

    /// Number of notifications delivered so far.
    #[must_use]
    pub fn delivered(&self) -> u64 {
        self.counters.delivered.load(Ordering::Relaxed)
    }

    /// Number of notifications given up on so far.
    #[must_use]
    pub fn failed(&self) -> u64 {
        self.counters.failed.load(Ordering::Relaxed)
    }

    /// Sends `notification` and waits for the outcome.
    ///
    /// # Errors
    ///
    /// Returns the sender's error once retries are exhausted, or at once for
    /// a malformed recipient.
    pub async fn send_now(
        &self,
        notification: &Notification,
    ) -> Result<NotificationReceipt, NotifierError> {
        let mut attempt: u32 = 0;
        loop {
            match self.sender.send(notification).await {
                Ok(receipt) => {
                    self.counters.delivered.fetch_add(1, Ordering::Relaxed);
                    info!(
                        message_id = %receipt.message_id,
                        channel = %notification.channel,
                        sender = %self.sender.name(),
                        "Notification sent"
                    );
                    return Ok(receipt);
                }
                Err(e) if e.is_retryable() && self.retry.should_retry(attempt) => {
                    attempt += 1;
                    warn!(
                        channel = %notification.channel,
                        attempt,
                        error = %e,
                        "Notification delivery failed, retrying"
                    );
                    self.retry.wait(attempt).await;
                }
                Err(e) => {
                    self.counters.failed.fetch_add(1, Ordering::Relaxed);
                    error!(
                        channel = %notification.channel,
                        recipient = %self.masker.mask_recipient(&notification.recipient),
                        error = %e,
                        "Notification not sent"
                    );
                    return Err(e);
                }
            }
        }
    }

    /// Sends `notification` in the background.
    ///
    /// The outcome is only logged; the returned handle may be dropped.
    pub fn dispatch(&self, notification: Notification) -> JoinHandle<()> {
        let notifier = self.clone();
        tokio::spawn(async move {
            // failures are already logged by send_now
            let _ = notifier.send_now(&notification).await;
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::{LogNotificationSender, NotificationChannel};
    use async_trait::async_trait;
    use fondo_core::data::default_catalog;
    use std::sync::atomic::AtomicU32;

    /// Sender failing the first `failures` attempts.
    struct FlakySender {
        failures: AtomicU32,
        calls: AtomicU32,
    }

    impl FlakySender {
        fn new(failures: u32) -> Self {
            Self {
                failures: AtomicU32::new(failures),
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl NotificationSender for FlakySender {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn send(
            &self,
            notification: &Notification,
        ) -> Result<NotificationReceipt, NotifierError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let remaining = self.failures.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failures.store(remaining - 1, Ordering::SeqCst);
                return Err(NotifierError::DeliveryFailed {
                    channel: notification.channel,
                    reason: "gateway timeout".to_string(),
                });
            }
            Ok(NotificationReceipt {
                message_id: "msg-1".to_string(),
                channel: notification.channel,
            })
        }
    }

    fn email() -> Notification {
        Notification::for_fund(
            "ana@correo.co",
            NotificationChannel::Email,
            &default_catalog()[1],
        )
    }

    #[tokio::test]
    async fn test_send_now_with_log_sender() {
        let notifier = Notifier::new(
            Arc::new(LogNotificationSender::new()),
            RetryPolicy::immediate(2),
        );
        let receipt = notifier.send_now(&email()).await.unwrap();
        assert!(!receipt.message_id.is_empty());
        assert_eq!(notifier.delivered(), 1);
        assert_eq!(notifier.sender_name(), "log");
    }

    #[tokio::test]
    async fn test_transient_failures_are_retried() {
        let sender = Arc::new(FlakySender::new(2));
        let notifier = Notifier::new(sender.clone(), RetryPolicy::immediate(2));

        let receipt = notifier.send_now(&email()).await.unwrap();
        assert_eq!(receipt.message_id, "msg-1");
        assert_eq!(sender.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_retries() {
        let sender = Arc::new(FlakySender::new(10));
        let notifier = Notifier::new(sender.clone(), RetryPolicy::immediate(1));

        let err = notifier.send_now(&email()).await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(sender.calls.load(Ordering::SeqCst), 2);
        assert_eq!(notifier.failed(), 1);
    }

    #[tokio::test]
    async fn test_invalid_recipient_not_retried() {
        let notifier = Notifier::new(
            Arc::new(LogNotificationSender::new()),
            RetryPolicy::immediate(3),
        );
        let mut notification = email();
        notification.recipient = "not-an-address".to_string();

        let err = notifier.send_now(&notification).await.unwrap_err();
        assert!(err.is_invalid_input());
        assert_eq!(notifier.failed(), 1);
    }

    #[tokio::test]
    async fn test_dispatch_runs_in_background() {
        let sender = Arc::new(FlakySender::new(0));
        let notifier = Notifier::new(sender.clone(), RetryPolicy::immediate(0));

        notifier.dispatch(email()).await.unwrap();
        assert_eq!(sender.calls.load(Ordering::SeqCst), 1);
        assert_eq!(notifier.delivered(), 1);
    }
}
