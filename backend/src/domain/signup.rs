//! Intake validation for purchase submissions.
//!
//! The validator turns a raw form submission into a normalised
//! [`SignupRequest`] or a list of field messages. Errors are collected, one
//! per offending field, rather than failing on the first; duplicate-email
//! detection is a separate read-only check owned by the signup service
//! because it blocks regardless of other field validity.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Raw purchase form fields as posted by the browser.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SignupForm {
    /// Full name of the syndic owner.
    #[serde(default)]
    pub syndic_name: String,
    /// Sign-in email address; must be unique across accounts.
    #[serde(default)]
    pub syndic_email: String,
    /// Contact phone number.
    #[serde(default)]
    pub syndic_phone: String,
    /// Residence (company) name.
    #[serde(default)]
    pub company_name: String,
    /// Locality name; shared across accounts.
    #[serde(default)]
    pub company_city: String,
    /// Street address; the only optional field.
    #[serde(default)]
    pub company_address: String,
}

/// One user-facing validation message attached to a form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldMessage {
    /// Form field name the message belongs to.
    pub field: String,
    /// User-facing message suitable for re-display next to the field.
    pub message: String,
}

impl FieldMessage {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_owned(),
            message: message.into(),
        }
    }

    fn missing(field: &'static str, label: &str) -> Self {
        Self::new(field, format!("{label} is required"))
    }
}

impl fmt::Display for FieldMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validated owner name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullName(String);

/// Validated, lowercased email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an address: trimmed, lowercased, shaped like
    /// `local@domain` with a dotted domain and no whitespace.
    pub fn parse(raw: &str) -> Option<Self> {
        let candidate = raw.trim().to_lowercase();
        if candidate.is_empty() || candidate.chars().any(char::is_whitespace) {
            return None;
        }
        let (local, domain) = candidate.split_once('@')?;
        if local.is_empty() || domain.contains('@') {
            return None;
        }
        let (host, tld) = domain.rsplit_once('.')?;
        if host.is_empty() || tld.is_empty() {
            return None;
        }
        Some(Self(candidate))
    }
}

/// Validated phone number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phone(String);

/// Validated residence (company) name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyName(String);

/// Validated locality name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityName(String);

macro_rules! impl_str_newtype {
    ($($ty:ident),* $(,)?) => {
        $(
            impl AsRef<str> for $ty {
                fn as_ref(&self) -> &str {
                    self.0.as_str()
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_ref())
                }
            }
        )*
    };
}

impl_str_newtype!(FullName, EmailAddress, Phone, CompanyName, CityName);

/// A fully validated, normalised purchase submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupRequest {
    /// Owner full name.
    pub full_name: FullName,
    /// Unique sign-in address.
    pub email: EmailAddress,
    /// Contact phone number.
    pub phone: Phone,
    /// Residence name.
    pub company_name: CompanyName,
    /// Locality name.
    pub city: CityName,
    /// Optional street address; `None` when the field was blank.
    pub address: Option<String>,
}

impl SignupRequest {
    /// Validate a raw form, collecting one message per invalid field.
    ///
    /// # Errors
    ///
    /// Returns the non-empty list of field messages when any required field
    /// is blank or the email is malformed. No storage is touched.
    pub fn try_from_form(form: &SignupForm) -> Result<Self, Vec<FieldMessage>> {
        let mut messages = Vec::new();

        let full_name = require(&mut messages, &form.syndic_name, "syndic_name", "full name");
        let email_raw = require(
            &mut messages,
            &form.syndic_email,
            "syndic_email",
            "email address",
        );
        let phone = require(
            &mut messages,
            &form.syndic_phone,
            "syndic_phone",
            "phone number",
        );
        let company_name = require(
            &mut messages,
            &form.company_name,
            "company_name",
            "company name",
        );
        let city = require(&mut messages, &form.company_city, "company_city", "city");

        let email = email_raw.and_then(|raw| {
            let parsed = EmailAddress::parse(&raw);
            if parsed.is_none() {
                messages.push(FieldMessage::new(
                    "syndic_email",
                    "email address is not valid",
                ));
            }
            parsed
        });

        match (full_name, email, phone, company_name, city) {
            (Some(full_name), Some(email), Some(phone), Some(company_name), Some(city)) => {
                Ok(Self {
                    full_name: FullName(full_name),
                    email,
                    phone: Phone(phone),
                    company_name: CompanyName(company_name),
                    city: CityName(city),
                    address: non_blank(&form.company_address),
                })
            }
            _ => Err(messages),
        }
    }
}

fn require(
    messages: &mut Vec<FieldMessage>,
    raw: &str,
    field: &'static str,
    label: &str,
) -> Option<String> {
    let value = non_blank(raw);
    if value.is_none() {
        messages.push(FieldMessage::missing(field, label));
    }
    value
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}
