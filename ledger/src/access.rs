use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use provenance_common::account::AccountId;
use provenance_common::roles::Role;

use crate::error::{LedgerError, Result};
use crate::store::Ledger;

/// Role registry: each role maps to the set of accounts holding it.
///
/// Role checks are consulted, not inherited: every privileged operation
/// calls [`has_role`](RoleRegistry::has_role) explicitly before mutating
/// state, keeping authorization decoupled from data mutation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleRegistry {
    grants: BTreeMap<Role, BTreeSet<AccountId>>,
}

impl RoleRegistry {
    /// Registry with `admin` seeded as the sole administrator.
    pub fn with_admin(admin: AccountId) -> Self {
        let mut registry = RoleRegistry::default();
        registry
            .grants
            .entry(Role::Administrator)
            .or_default()
            .insert(admin);
        registry
    }

    /// Pure lookup; never fails.
    pub fn has_role(&self, role: Role, account: AccountId) -> bool {
        self.grants
            .get(&role)
            .is_some_and(|holders| holders.contains(&account))
    }

    /// Add `account` to `role`'s set. The caller must already hold the
    /// administrator role. Granting an already-held role is a no-op
    /// success.
    pub fn grant_role(&mut self, caller: AccountId, role: Role, account: AccountId) -> Result<()> {
        if !self.has_role(Role::Administrator, caller) {
            return Err(LedgerError::Unauthorized(format!(
                "{caller} does not hold the {} role",
                Role::Administrator
            )));
        }
        if account.is_zero() {
            return Err(LedgerError::InvalidInput(
                "cannot grant a role to the zero account".into(),
            ));
        }
        self.grants.entry(role).or_default().insert(account);
        Ok(())
    }
}

impl Ledger {
    /// Pure role lookup; never fails.
    pub fn has_role(&self, role: Role, account: AccountId) -> bool {
        self.roles.has_role(role, account)
    }

    /// Grant `role` to `account`. Administrator only; idempotent. Roles
    /// are not product-scoped, so no history entry is written.
    pub fn grant_role(&mut self, caller: AccountId, role: Role, account: AccountId) -> Result<()> {
        self.roles.grant_role(caller, role, account)
    }
}
