//! Shared helpers for the ledger integration tests.

use ed25519_dalek::SigningKey;

use provenance_common::account::AccountId;

/// Deterministic test account derived from a seed byte.
pub fn account_from_seed(seed: u8) -> AccountId {
    let key = SigningKey::from_bytes(&[seed; 32]);
    AccountId::from_verifying_key(&key.verifying_key())
}

/// Random test account, for tests that only need distinctness.
pub fn random_account() -> AccountId {
    let key = SigningKey::generate(&mut rand::rngs::OsRng);
    AccountId::from_verifying_key(&key.verifying_key())
}
