//! Member account data model.
//!
//! An account is the owning user created by the provisioning workflow. This
//! workflow only ever creates syndic-tier accounts; residents and admins are
//! managed elsewhere.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Stable account identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Wrap an existing UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random [`AccountId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for AccountId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Account lifecycle state.
///
/// Provisioning always creates `Active` accounts: the generated-credential
/// workflow is the single supported policy. `Pending` exists only to read
/// rows left behind by the retired pending-activation flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    /// Account can sign in and use the product.
    Active,
    /// Legacy state from the retired activation flow; never written here.
    Pending,
}

impl AccountStatus {
    /// Stable storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Pending => "pending",
        }
    }
}

/// Role tier assigned to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    /// Building manager; the only role this workflow creates.
    Syndic,
    /// Platform administrator.
    Admin,
    /// Building resident.
    Resident,
}

impl AccountRole {
    /// Stable storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Syndic => "syndic",
            Self::Admin => "admin",
            Self::Resident => "resident",
        }
    }
}

/// A provisioned member account as read back from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Primary identifier.
    pub id: AccountId,
    /// Full display name of the owner.
    pub full_name: String,
    /// Unique sign-in address.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
    /// Role tier.
    pub role: AccountRole,
    /// Lifecycle state.
    pub status: AccountStatus,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AccountStatus::Active, "active")]
    #[case(AccountStatus::Pending, "pending")]
    fn status_storage_representation(#[case] status: AccountStatus, #[case] expected: &str) {
        assert_eq!(status.as_str(), expected);
    }

    #[rstest]
    #[case(AccountRole::Syndic, "syndic")]
    #[case(AccountRole::Admin, "admin")]
    #[case(AccountRole::Resident, "resident")]
    fn role_storage_representation(#[case] role: AccountRole, #[case] expected: &str) {
        assert_eq!(role.as_str(), expected);
    }

    #[rstest]
    fn account_id_parses_from_display_output() {
        let id = AccountId::random();
        let parsed: AccountId = id.to_string().parse().expect("round trip");
        assert_eq!(parsed, id);
    }
}
