use core::str::FromStr;

use serde::{Deserialize, Serialize};

use shelfwise_core::DomainError;

/// Permission identifier.
///
/// Serialized as the camelCase names the staff tooling already uses
/// (e.g. `"manageOrders"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Permission {
    ViewDashboard,
    ViewProducts,
    EditProducts,
    DeleteProducts,
    EditPrices,
    EditStock,
    ViewLogs,
    ManageSettings,
    ViewOrders,
    ManageOrders,
    CreateOrders,
    UpdateOrderStatus,
    ViewReports,
}

impl Permission {
    pub const ALL: [Permission; 13] = [
        Permission::ViewDashboard,
        Permission::ViewProducts,
        Permission::EditProducts,
        Permission::DeleteProducts,
        Permission::EditPrices,
        Permission::EditStock,
        Permission::ViewLogs,
        Permission::ManageSettings,
        Permission::ViewOrders,
        Permission::ManageOrders,
        Permission::CreateOrders,
        Permission::UpdateOrderStatus,
        Permission::ViewReports,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ViewDashboard => "viewDashboard",
            Permission::ViewProducts => "viewProducts",
            Permission::EditProducts => "editProducts",
            Permission::DeleteProducts => "deleteProducts",
            Permission::EditPrices => "editPrices",
            Permission::EditStock => "editStock",
            Permission::ViewLogs => "viewLogs",
            Permission::ManageSettings => "manageSettings",
            Permission::ViewOrders => "viewOrders",
            Permission::ManageOrders => "manageOrders",
            Permission::CreateOrders => "createOrders",
            Permission::UpdateOrderStatus => "updateOrderStatus",
            Permission::ViewReports => "viewReports",
        }
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown permission '{s}'")))
    }
}
