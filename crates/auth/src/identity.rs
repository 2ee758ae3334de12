//! Acting identity and the "operate as another user" frame.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{Permission, Role, policy};

/// Who is performing an operation.
///
/// Passed explicitly into every service call; there is no ambient
/// "current user".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: Role,
    pub permissions: BTreeSet<Permission>,
}

impl Identity {
    /// Build an identity whose permissions come from the policy table.
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            email: None,
            role,
            permissions: policy::permissions_for(role).iter().copied().collect(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Same person, different role; permissions are re-derived.
    pub fn with_role(self, role: Role) -> Self {
        Self {
            permissions: policy::permissions_for(role).iter().copied().collect(),
            role,
            ..self
        }
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }
}

/// Holds the active identity plus, while simulating, the real one.
///
/// Only one simulation frame exists: entering again while already simulating
/// switches targets but keeps the first saved original. Who may simulate is
/// decided by the caller (see [`crate::simulate`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityContext {
    active: Identity,
    original: Option<Identity>,
}

impl IdentityContext {
    pub fn new(identity: Identity) -> Self {
        Self {
            active: identity,
            original: None,
        }
    }

    pub fn active(&self) -> &Identity {
        &self.active
    }

    pub fn original(&self) -> Option<&Identity> {
        self.original.as_ref()
    }

    /// The person actually at the keyboard.
    pub fn operator(&self) -> &Identity {
        self.original.as_ref().unwrap_or(&self.active)
    }

    pub fn is_simulating(&self) -> bool {
        self.original.is_some()
    }

    pub fn enter_simulation(&mut self, target: Identity) {
        if self.original.is_none() {
            let current = std::mem::replace(&mut self.active, target);
            self.original = Some(current);
        } else {
            self.active = target;
        }
    }

    /// Restore the saved identity. Returns `false` (and does nothing) when not
    /// simulating.
    pub fn exit_simulation(&mut self) -> bool {
        match self.original.take() {
            Some(original) => {
                tracing::info!(operator = %original.name, left = %self.active.name, "leaving simulation");
                self.active = original;
                true
            }
            None => false,
        }
    }

    /// Switch the active identity's role in place.
    pub fn switch_role(&mut self, role: Role) {
        let active = self.active.clone();
        self.active = active.with_role(role);
    }
}
