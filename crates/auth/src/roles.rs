use core::str::FromStr;

use serde::{Deserialize, Serialize};

use shelfwise_core::DomainError;

/// Staff role used for RBAC.
///
/// The set is closed: every role maps to a fixed permission set in
/// [`crate::policy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Admin,
    InventoryManager,
    Captain,
    Delivery,
    Viewer,
    Super,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Admin,
        Role::InventoryManager,
        Role::Captain,
        Role::Delivery,
        Role::Viewer,
        Role::Super,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::InventoryManager => "InventoryManager",
            Role::Captain => "Captain",
            Role::Delivery => "Delivery",
            Role::Viewer => "Viewer",
            Role::Super => "Super",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown role '{s}'")))
    }
}
