//! Purchase submission use-case.
//!
//! Drives the full workflow: validate, duplicate pre-check, credential
//! generation and hashing, the atomic provisioning transaction, then
//! post-commit credential delivery. Delivery runs strictly after commit and
//! its failure never unwinds the new account; callers receive a softened
//! outcome instead.

use std::sync::Arc;

use mockable::Clock;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::credential::PlaintextCredential;
use crate::domain::ports::{
    CredentialNotice, CredentialNotifier, DeliveryReceipt, NewProvisioning, ProvisioningError,
    ProvisioningRepository,
};
use crate::domain::signup::{FieldMessage, SignupForm, SignupRequest};
use crate::domain::{AccountId, PlanId};

/// Which notification variant a submission should use, selected by the
/// inbound adapter from the request's Host header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryChannel {
    /// Local development: persist the message as an artifact.
    Capture,
    /// Real deployment: hand the message to the mail transport.
    Transport,
}

/// Rejections that prevent provisioning. None of these leave partial state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupRejection {
    /// One message per invalid form field; re-displayed next to the form.
    Invalid(Vec<FieldMessage>),
    /// Terminal: an account with this email already exists.
    DuplicateEmail,
    /// The submitted plan id does not reference a known plan.
    PlanNotFound,
    /// Storage failed; the cause is logged, the user sees a generic message.
    Failed,
}

/// How the credential reached (or failed to reach) the new owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialDelivery {
    /// The notice was sent or captured.
    Delivered(DeliveryReceipt),
    /// Delivery failed after commit; the account is live and usable, and
    /// the user is told their credentials will arrive shortly.
    Deferred,
}

/// Successful submission outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupOutcome {
    /// Identifier of the provisioned account.
    pub account_id: AccountId,
    /// Post-commit delivery result.
    pub delivery: CredentialDelivery,
}

/// Purchase submission service implementing the driving workflow.
#[derive(Clone)]
pub struct SignupService {
    provisioning: Arc<dyn ProvisioningRepository>,
    transport: Arc<dyn CredentialNotifier>,
    capture: Arc<dyn CredentialNotifier>,
    clock: Arc<dyn Clock>,
    admin_id: Uuid,
}

impl SignupService {
    /// Create a service over the provisioning and notification ports.
    ///
    /// `admin_id` is the configured default administrative owner written to
    /// the assignment and payment rows; it is injected here so no literal
    /// ever appears in workflow logic.
    pub fn new(
        provisioning: Arc<dyn ProvisioningRepository>,
        transport: Arc<dyn CredentialNotifier>,
        capture: Arc<dyn CredentialNotifier>,
        clock: Arc<dyn Clock>,
        admin_id: Uuid,
    ) -> Self {
        Self {
            provisioning,
            transport,
            capture,
            clock,
            admin_id,
        }
    }

    /// Run the full purchase workflow for one submission.
    ///
    /// # Errors
    ///
    /// Returns a [`SignupRejection`] when validation, the duplicate
    /// pre-check, or the provisioning transaction blocks the purchase. In
    /// every rejection case storage holds no partial rows.
    pub async fn handle_submission(
        &self,
        plan_id: PlanId,
        form: &SignupForm,
        channel: DeliveryChannel,
    ) -> Result<SignupOutcome, SignupRejection> {
        let request = SignupRequest::try_from_form(form).map_err(SignupRejection::Invalid)?;

        // Optimisation only: the storage uniqueness constraint remains the
        // authoritative arbiter for concurrent submissions.
        match self.provisioning.email_exists(&request.email).await {
            Ok(true) => return Err(SignupRejection::DuplicateEmail),
            Ok(false) => {}
            Err(err) => {
                error!(error = %err, "duplicate pre-check failed");
                return Err(SignupRejection::Failed);
            }
        }

        let credential = PlaintextCredential::generate();
        let password_hash = match credential.hash() {
            Ok(hash) => hash,
            Err(err) => {
                error!(error = %err, "credential hashing failed");
                return Err(SignupRejection::Failed);
            }
        };

        let provisioned = match self
            .provisioning
            .provision(NewProvisioning {
                request: request.clone(),
                plan_id,
                password_hash,
                admin_id: self.admin_id,
                requested_at: self.clock.utc(),
            })
            .await
        {
            Ok(provisioned) => provisioned,
            Err(ProvisioningError::PlanNotFound) => return Err(SignupRejection::PlanNotFound),
            Err(ProvisioningError::DuplicateEmail) => return Err(SignupRejection::DuplicateEmail),
            Err(err) => {
                error!(error = %err, plan_id = %plan_id, "provisioning transaction failed");
                return Err(SignupRejection::Failed);
            }
        };

        info!(account_id = %provisioned.account_id, "account provisioned");

        let notice = CredentialNotice::new(
            request.full_name.as_ref(),
            request.email.as_ref(),
            provisioned.plan_name.as_str(),
            credential.reveal(),
        );
        let notifier = match channel {
            DeliveryChannel::Capture => &self.capture,
            DeliveryChannel::Transport => &self.transport,
        };
        let delivery = match notifier.deliver(&notice).await {
            Ok(receipt) => CredentialDelivery::Delivered(receipt),
            Err(err) => {
                // Only the account id is logged; the credential never is.
                warn!(
                    account_id = %provisioned.account_id,
                    error = %err,
                    "credential delivery failed; account remains active"
                );
                CredentialDelivery::Deferred
            }
        };

        Ok(SignupOutcome {
            account_id: provisioned.account_id,
            delivery,
        })
    }
}
