use std::fmt;
use std::str::FromStr;

use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A 20-byte account identifier, rendered as 0x-prefixed hex.
///
/// The all-zero value is the sentinel meaning "no account": an unsold
/// product's `final_customer`, never a valid custodian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId([u8; 20]);

impl AccountId {
    /// The zero sentinel.
    pub const ZERO: AccountId = AccountId([0u8; 20]);

    pub fn new(bytes: [u8; 20]) -> Self {
        AccountId(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Derive an account id from an ed25519 verifying key: the last 20
    /// bytes of the SHA-256 digest of the key bytes.
    pub fn from_verifying_key(key: &VerifyingKey) -> Self {
        let digest = Sha256::digest(key.as_bytes());
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest[12..]);
        AccountId(bytes)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for AccountId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stripped = s
            .strip_prefix("0x")
            .ok_or_else(|| format!("account id must start with 0x: {s}"))?;
        let bytes = hex::decode(stripped).map_err(|e| format!("invalid hex in account id: {e}"))?;
        if bytes.len() != 20 {
            return Err(format!(
                "expected 20 bytes for account id, got {}",
                bytes.len()
            ));
        }
        let mut out = [0u8; 20];
        out.copy_from_slice(&bytes);
        Ok(AccountId(out))
    }
}

// Custom serde: account ids cross the boundary as "0x…" strings.
impl Serialize for AccountId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s: String = serde::Deserialize::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
