//! Local-development capture adapter.
//!
//! Instead of touching the network, this variant persists each rendered
//! credential message as a timestamped HTML artifact under a well-known
//! directory. The directory is created on first use; writes go through a
//! capability-scoped handle so the adapter can never escape its root.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use mockable::{Clock, DefaultClock};
use tracing::info;

use crate::domain::ports::{
    CredentialNotice, CredentialNotifier, DeliveryReceipt, NotificationError,
};

use super::message::{artifact_file_name, render_html};

/// Credential notifier that captures messages as local artifacts.
pub struct FileCaptureNotifier {
    root: PathBuf,
    clock: Arc<dyn Clock>,
}

impl FileCaptureNotifier {
    /// Build a capture adapter rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_clock(root, Arc::new(DefaultClock))
    }

    /// Build a capture adapter with an injected clock (tests pin the
    /// artifact timestamp through this).
    pub fn with_clock(root: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            root: root.into(),
            clock,
        }
    }

    fn open_root(&self) -> Result<Dir, NotificationError> {
        std::fs::create_dir_all(&self.root).map_err(|err| {
            NotificationError::artifact(format!(
                "failed to create {}: {err}",
                self.root.display()
            ))
        })?;
        Dir::open_ambient_dir(&self.root, ambient_authority()).map_err(|err| {
            NotificationError::artifact(format!("failed to open {}: {err}", self.root.display()))
        })
    }
}

#[async_trait]
impl CredentialNotifier for FileCaptureNotifier {
    async fn deliver(
        &self,
        notice: &CredentialNotice,
    ) -> Result<DeliveryReceipt, NotificationError> {
        let sent_at = self.clock.utc();
        let file_name = artifact_file_name(sent_at, &notice.recipient_email);
        let html = render_html(notice, sent_at);

        let dir = self.open_root()?;
        dir.write(&file_name, html.as_bytes()).map_err(|err| {
            NotificationError::artifact(format!("failed to write {file_name}: {err}"))
        })?;

        let artifact = self.root.join(&file_name);
        info!(artifact = %artifact.display(), "credential message captured");
        Ok(DeliveryReceipt::Captured { artifact })
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
    #[tokio::test]
    async fn captures_the_rendered_message_to_a_file() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let notifier = FileCaptureNotifier::new(tmp.path());

        let receipt = notifier.deliver(&notice()).await.expect("capture");
        let DeliveryReceipt::Captured { artifact } = receipt else {
            panic!("expected a captured receipt");
        };

        let contents = std::fs::read_to_string(&artifact).expect("artifact exists");
        assert!(contents.contains("jane@example.com"));
        assert!(contents.contains("s3cr3t!"));
        assert!(contents.contains("Essential"));
    }

    #[rstest]
    #[tokio::test]
    async fn artifact_name_replaces_the_at_sign() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let notifier = FileCaptureNotifier::new(tmp.path());

        let receipt = notifier.deliver(&notice()).await.expect("capture");
        let DeliveryReceipt::Captured { artifact } = receipt else {
            panic!("expected a captured receipt");
        };
        let name = artifact
            .file_name()
            .and_then(|n| n.to_str())
            .expect("file name");

        assert!(name.ends_with("_jane_at_example.com.html"), "{name}");
        assert!(!name.contains('@'));
    }

    #[rstest]
    #[tokio::test]
    async fn creates_the_capture_directory_on_first_use() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let nested = tmp.path().join("outbox").join("credentials");
        let notifier = FileCaptureNotifier::new(&nested);

        notifier.deliver(&notice()).await.expect("capture");
        assert!(nested.is_dir());
    }
}
