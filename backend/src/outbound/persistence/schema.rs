//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations under `migrations/` exactly;
//! `diesel print-schema` can regenerate them from a live database. Only the
//! tables touched by the provisioning workflow are declared.

diesel::table! {
    /// Subscription plans offered for purchase.
    plans (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Marketing name shown on the plan listing.
        name -> Varchar,
        /// Price in cents charged once at purchase.
        price_cents -> Int8,
        /// Subscription length in months.
        duration_months -> Int4,
        /// Resident seat cap for the tier.
        max_residents -> Int4,
        /// Apartment cap for the tier.
        max_apartments -> Int4,
        /// Whether the plan is currently purchasable.
        is_active -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Shared, de-duplicated localities referenced by residences.
    ///
    /// `name` carries a unique constraint; it is the authoritative arbiter
    /// for concurrent get-or-create races.
    cities (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Locality name, unique across the table.
        name -> Varchar,
    }
}

diesel::table! {
    /// Member accounts.
    ///
    /// `email` carries a unique constraint; duplicate submissions surface
    /// as a unique violation mapped to a domain error at commit time.
    members (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Full display name of the owner.
        full_name -> Varchar,
        /// Sign-in address, unique across the table.
        email -> Varchar,
        /// bcrypt hash of the generated credential.
        password_hash -> Varchar,
        /// Contact phone number.
        phone -> Varchar,
        /// Role tier (`syndic` for provisioned owners).
        role -> Varchar,
        /// Lifecycle state (`active` on provisioning).
        status -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Residences (company/building records) owned by one member.
    residences (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Locality the residence sits in.
        city_id -> Uuid,
        /// Residence (company) name.
        name -> Varchar,
        /// Optional street address.
        address -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// Apartments bootstrapped inside a residence.
    apartments (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Residence the apartment belongs to.
        residence_id -> Uuid,
        /// Owning member account.
        member_id -> Uuid,
        /// Apartment kind label.
        kind -> Varchar,
        /// Floor label.
        floor -> Varchar,
        /// Unit number within the residence.
        number -> Int4,
    }
}

diesel::table! {
    /// Association between a member and its administrative owner.
    syndic_assignments (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Administrative owner (configured default admin).
        admin_id -> Uuid,
        /// Assigned member account.
        member_id -> Uuid,
        /// Assignment timestamp.
        assigned_at -> Timestamptz,
    }
}

diesel::table! {
    /// Historical charge records created at purchase time.
    payments (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Administrative owner recorded on the charge.
        admin_id -> Uuid,
        /// Charged member account.
        member_id -> Uuid,
        /// Purchased plan.
        plan_id -> Uuid,
        /// Amount in cents, copied from the plan at purchase time.
        amount_cents -> Int8,
        /// Payment timestamp.
        paid_at -> Timestamptz,
    }
}

diesel::joinable!(residences -> cities (city_id));
diesel::joinable!(apartments -> residences (residence_id));
diesel::joinable!(apartments -> members (member_id));
diesel::joinable!(payments -> plans (plan_id));

diesel::allow_tables_to_appear_in_same_query!(
    plans,
    cities,
    members,
    residences,
    apartments,
    syndic_assignments,
    payments,
);
