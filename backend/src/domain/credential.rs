//! Credential generation and hashing.
//!
//! The plaintext credential exists only long enough to be hashed for
//! storage and handed to the notification gateway; it is zeroized on drop
//! and never logged or persisted in cleartext.

use rand::Rng;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

/// Character classes sampled when generating a credential.
const CREDENTIAL_CHARSET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%&*+-_=?";

/// Default generated credential length.
pub const DEFAULT_CREDENTIAL_LENGTH: usize = 12;

/// Errors raised while preparing a credential for storage.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// The hashing backend rejected the input.
    #[error("credential hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

/// A freshly generated plaintext credential.
///
/// `Debug` is redacted and the buffer is wiped when the value is dropped.
pub struct PlaintextCredential(Zeroizing<String>);

impl PlaintextCredential {
    /// Generate a credential of the default length.
    pub fn generate() -> Self {
        Self::generate_with_length(DEFAULT_CREDENTIAL_LENGTH)
    }

    /// Generate a credential, sampling each position independently from the
    /// mixed charset using the operating system's secure random source.
    pub fn generate_with_length(length: usize) -> Self {
        let mut rng = OsRng;
        let value: String = (0..length)
            .map(|_| {
                let index = rng.gen_range(0..CREDENTIAL_CHARSET.len());
                char::from(CREDENTIAL_CHARSET[index])
            })
            .collect();
        Self(Zeroizing::new(value))
    }

    /// Compute the bcrypt hash persisted alongside the new account.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Hash`] when the hashing backend fails.
    pub fn hash(&self) -> Result<CredentialHash, CredentialError> {
        let hashed = bcrypt::hash(self.0.as_str(), bcrypt::DEFAULT_COST)?;
        Ok(CredentialHash(hashed))
    }

    /// Expose the secret for the one legitimate consumer: message rendering
    /// inside the notification gateway.
    pub fn reveal(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for PlaintextCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PlaintextCredential(..)")
    }
}

/// One-way hash of a generated credential, safe to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialHash(String);

impl CredentialHash {
    /// Wrap an already-computed hash (used by storage adapters and tests).
    pub fn from_hashed(hashed: impl Into<String>) -> Self {
        Self(hashed.into())
    }
}

impl AsRef<str> for CredentialHash {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(8)]
    #[case(12)]
    #[case(24)]
    fn generated_credential_has_requested_length(#[case] length: usize) {
        let credential = PlaintextCredential::generate_with_length(length);
        assert_eq!(credential.reveal().chars().count(), length);
    }

    #[rstest]
    fn generated_credential_draws_from_charset() {
        let credential = PlaintextCredential::generate_with_length(64);
        assert!(
            credential
                .reveal()
                .bytes()
                .all(|b| CREDENTIAL_CHARSET.contains(&b))
        );
    }

    #[rstest]
    fn consecutive_credentials_differ() {
        let first = PlaintextCredential::generate();
        let second = PlaintextCredential::generate();
        assert_ne!(first.reveal(), second.reveal());
    }

    #[rstest]
    fn debug_output_is_redacted() {
        let credential = PlaintextCredential::generate();
        let rendered = format!("{credential:?}");
        assert!(!rendered.contains(credential.reveal()));
    }

    #[rstest]
    fn hash_verifies_against_plaintext() {
        let credential = PlaintextCredential::generate();
        let hash = credential.hash().expect("hash credential");
        assert!(bcrypt::verify(credential.reveal(), hash.as_ref()).expect("verify"));
    }
}
