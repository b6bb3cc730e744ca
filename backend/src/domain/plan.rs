//! Subscription plan data model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Stable plan identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct PlanId(Uuid);

impl PlanId {
    /// Wrap an existing UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random [`PlanId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A priced service tier purchased at provisioning time.
///
/// Plans are looked up by id and never mutated by the provisioning workflow.
/// Prices are integral cents; the payment row copies `price_cents` at
/// purchase time so later price edits never rewrite billing history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    /// Primary identifier.
    pub id: PlanId,
    /// Marketing name shown on the plan listing.
    pub name: String,
    /// Price in cents, charged once at purchase.
    pub price_cents: i64,
    /// Subscription length in months.
    pub duration_months: i32,
    /// Resident seat cap for the tier.
    pub max_residents: i32,
    /// Apartment cap for the tier.
    pub max_apartments: i32,
    /// Whether the plan is currently purchasable.
    pub is_active: bool,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
}
