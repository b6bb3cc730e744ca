//! Port abstraction for delivering generated credentials to new accounts.
//!
//! Two adapters implement this port: an HTTP mail-relay transport for real
//! deployments and a file-capture variant for local development. Delivery
//! failures are never fatal to provisioning; the account already exists by
//! the time this port is called.

use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use zeroize::Zeroizing;

use super::define_port_error;

define_port_error! {
    /// Failures surfaced by credential notification adapters.
    pub enum NotificationError {
        /// The mail transport rejected or never accepted the message.
        Transport { message: String } => "credential delivery failed: {message}",
        /// The capture artifact could not be written.
        Artifact { message: String } => "credential artifact write failed: {message}",
    }
}

/// The credential-bearing message handed to an adapter.
///
/// Both adapters render the identical template from these fields. `Debug`
/// omits the credential.
pub struct CredentialNotice {
    /// Recipient display name.
    pub recipient_name: String,
    /// Recipient email address.
    pub recipient_email: String,
    /// Name of the purchased plan.
    pub plan_name: String,
    credential: Zeroizing<String>,
}

impl CredentialNotice {
    /// Assemble a notice; the credential buffer is wiped on drop.
    pub fn new(
        recipient_name: impl Into<String>,
        recipient_email: impl Into<String>,
        plan_name: impl Into<String>,
        credential: impl Into<String>,
    ) -> Self {
        Self {
            recipient_name: recipient_name.into(),
            recipient_email: recipient_email.into(),
            plan_name: plan_name.into(),
            credential: Zeroizing::new(credential.into()),
        }
    }

    /// The one-time credential to embed in the rendered message.
    pub fn credential(&self) -> &str {
        self.credential.as_str()
    }
}

impl std::fmt::Debug for CredentialNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialNotice")
            .field("recipient_email", &self.recipient_email)
            .field("plan_name", &self.plan_name)
            .field("credential", &"..")
            .finish()
    }
}

/// Successful delivery outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryReceipt {
    /// The transport accepted the message.
    Sent,
    /// The capture variant persisted the message as a local artifact.
    Captured {
        /// Location of the written artifact.
        artifact: PathBuf,
    },
}

/// Driven port for credential delivery.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialNotifier: Send + Sync {
    /// Render and deliver (or capture) the credential notice.
    async fn deliver(
        &self,
        notice: &CredentialNotice,
    ) -> Result<DeliveryReceipt, NotificationError>;
}

/// Recording notifier for tests and the no-relay server mode.
///
/// Stores `(recipient_email, plan_name)` pairs — never the credential — and
/// can be armed to fail so callers can assert notification isolation.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    deliveries: Mutex<Vec<(String, String)>>,
    fail_with: Mutex<Option<NotificationError>>,
}

impl RecordingNotifier {
    /// Build a notifier that accepts every notice.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the notifier to fail every subsequent delivery.
    pub fn fail_with(&self, error: NotificationError) {
        if let Ok(mut slot) = self.fail_with.lock() {
            *slot = Some(error);
        }
    }

    /// Recorded `(recipient_email, plan_name)` pairs.
    pub fn deliveries(&self) -> Vec<(String, String)> {
        self.deliveries
            .lock()
            .map(|deliveries| deliveries.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CredentialNotifier for RecordingNotifier {
    async fn deliver(
        &self,
        notice: &CredentialNotice,
    ) -> Result<DeliveryReceipt, NotificationError> {
        if let Ok(slot) = self.fail_with.lock() {
            if let Some(error) = slot.clone() {
                return Err(error);
            }
        }
        if let Ok(mut deliveries) = self.deliveries.lock() {
            deliveries.push((notice.recipient_email.clone(), notice.plan_name.clone()));
        }
        Ok(DeliveryReceipt::Sent)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn notice() -> CredentialNotice {
        CredentialNotice::new("Jane Doe", "jane@example.com", "Essential", "s3cr3t!")
    }

    #[rstest]
    fn debug_output_omits_the_credential() {
        let rendered = format!("{:?}", notice());
        assert!(!rendered.contains("s3cr3t!"));
        assert!(rendered.contains("jane@example.com"));
    }

    #[rstest]
    #[tokio::test]
    async fn recording_notifier_records_without_credential() {
        let notifier = RecordingNotifier::new();
        let receipt = notifier.deliver(&notice()).await.expect("deliver");

        assert_eq!(receipt, DeliveryReceipt::Sent);
        assert_eq!(
            notifier.deliveries(),
            vec![("jane@example.com".to_owned(), "Essential".to_owned())]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn armed_notifier_fails_and_records_nothing() {
        let notifier = RecordingNotifier::new();
        notifier.fail_with(NotificationError::transport("connection refused"));

        let err = notifier.deliver(&notice()).await.expect_err("armed to fail");
        assert!(matches!(err, NotificationError::Transport { .. }));
        assert!(notifier.deliveries().is_empty());
    }
}
