//! Reqwest-backed mail relay adapter.
//!
//! This adapter owns transport details only: payload serialisation, request
//! timeout, and HTTP status mapping. The relay endpoint accepts a JSON
//! document and performs the actual SMTP hand-off out of process.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Url};
use serde_json::json;

use crate::domain::ports::{
    CredentialNotice, CredentialNotifier, DeliveryReceipt, NotificationError,
};

use super::message::{render_html, render_subject};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const DEFAULT_SENDER: &str = "no-reply@syndica.invalid";

/// Outbound identity settings for relayed messages.
pub struct MailerIdentity {
    /// Sender address stamped on every message.
    pub sender: String,
}

impl Default for MailerIdentity {
    fn default() -> Self {
        Self {
            sender: DEFAULT_SENDER.to_owned(),
        }
    }
}

/// Credential notifier that POSTs rendered messages to one relay endpoint.
pub struct HttpMailer {
    client: Client,
    endpoint: Url,
    sender: String,
}

impl HttpMailer {
    /// Build an adapter using a reqwest client with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url) -> Result<Self, reqwest::Error> {
        Self::with_identity(endpoint, DEFAULT_REQUEST_TIMEOUT, MailerIdentity::default())
    }

    /// Build an adapter with an explicit timeout and sender identity.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_identity(
        endpoint: Url,
        timeout: Duration,
        identity: MailerIdentity,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            sender: identity.sender,
        })
    }
}

#[async_trait]
impl CredentialNotifier for HttpMailer {
    async fn deliver(
        &self,
        notice: &CredentialNotice,
    ) -> Result<DeliveryReceipt, NotificationError> {
        let payload = json!({
            "from": self.sender,
            "to": notice.recipient_email,
            "subject": render_subject(notice),
            "html": render_html(notice, Utc::now()),
        });

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|err| NotificationError::transport(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(DeliveryReceipt::Sent)
        } else {
            Err(NotificationError::transport(format!(
                "relay returned {status}"
            )))
        }
    }
}
