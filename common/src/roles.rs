use std::fmt;

use serde::{Deserialize, Serialize};

/// Named permission bucket gating privileged ledger operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    /// May register products and grant roles.
    Administrator,
    /// Supply-chain participant eligible to hold custody of products.
    Custodian,
}

impl Role {
    pub fn all() -> &'static [Role] {
        &[Role::Administrator, Role::Custodian]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Administrator => "administrator",
            Role::Custodian => "custodian",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
