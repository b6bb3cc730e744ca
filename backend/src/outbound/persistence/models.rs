//! Row structs bridging Diesel and the domain.
//!
//! Read rows own their data; insert rows borrow from the provisioning
//! request so no field is copied twice on the hot path.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{apartments, cities, members, payments, plans, residences, syndic_assignments};

/// A plan row as read from storage.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = plans)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PlanRow {
    /// Primary key.
    pub id: Uuid,
    /// Marketing name.
    pub name: String,
    /// Price in cents.
    pub price_cents: i64,
    /// Subscription length in months.
    pub duration_months: i32,
    /// Resident seat cap.
    pub max_residents: i32,
    /// Apartment cap.
    pub max_apartments: i32,
    /// Whether the plan is purchasable.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A city row as read from storage.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = cities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CityRow {
    /// Primary key.
    pub id: Uuid,
    /// Unique locality name.
    pub name: String,
}

/// Insert row for a new city.
#[derive(Debug, Insertable)]
#[diesel(table_name = cities)]
pub struct NewCityRow<'a> {
    /// Primary key assigned by the adapter.
    pub id: Uuid,
    /// Unique locality name.
    pub name: &'a str,
}

/// Insert row for a new member account.
#[derive(Debug, Insertable)]
#[diesel(table_name = members)]
pub struct NewMemberRow<'a> {
    /// Primary key assigned by the adapter.
    pub id: Uuid,
    /// Full display name.
    pub full_name: &'a str,
    /// Unique sign-in address.
    pub email: &'a str,
    /// bcrypt hash of the generated credential.
    pub password_hash: &'a str,
    /// Contact phone number.
    pub phone: &'a str,
    /// Role tier.
    pub role: &'a str,
    /// Lifecycle state.
    pub status: &'a str,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert row for a new residence.
#[derive(Debug, Insertable)]
#[diesel(table_name = residences)]
pub struct NewResidenceRow<'a> {
    /// Primary key assigned by the adapter.
    pub id: Uuid,
    /// Locality reference.
    pub city_id: Uuid,
    /// Residence (company) name.
    pub name: &'a str,
    /// Optional street address.
    pub address: Option<&'a str>,
}

/// Insert row for the bootstrap apartment.
#[derive(Debug, Insertable)]
#[diesel(table_name = apartments)]
pub struct NewApartmentRow<'a> {
    /// Primary key assigned by the adapter.
    pub id: Uuid,
    /// Residence reference.
    pub residence_id: Uuid,
    /// Owning member reference.
    pub member_id: Uuid,
    /// Apartment kind label.
    pub kind: &'a str,
    /// Floor label.
    pub floor: &'a str,
    /// Unit number.
    pub number: i32,
}

/// Insert row for the syndic assignment.
#[derive(Debug, Insertable)]
#[diesel(table_name = syndic_assignments)]
pub struct NewSyndicAssignmentRow {
    /// Primary key assigned by the adapter.
    pub id: Uuid,
    /// Administrative owner reference.
    pub admin_id: Uuid,
    /// Assigned member reference.
    pub member_id: Uuid,
    /// Assignment timestamp.
    pub assigned_at: DateTime<Utc>,
}

/// Insert row for the purchase payment.
#[derive(Debug, Insertable)]
#[diesel(table_name = payments)]
pub struct NewPaymentRow {
    /// Primary key assigned by the adapter.
    pub id: Uuid,
    /// Administrative owner reference.
    pub admin_id: Uuid,
    /// Charged member reference.
    pub member_id: Uuid,
    /// Purchased plan reference.
    pub plan_id: Uuid,
    /// Amount in cents copied from the plan at purchase time.
    pub amount_cents: i64,
    /// Payment timestamp.
    pub paid_at: DateTime<Utc>,
}

impl From<PlanRow> for crate::domain::Plan {
    fn from(row: PlanRow) -> Self {
        Self {
            id: crate::domain::PlanId::from_uuid(row.id),
            name: row.name,
            price_cents: row.price_cents,
            duration_months: row.duration_months,
            max_residents: row.max_residents,
            max_apartments: row.max_apartments,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}
