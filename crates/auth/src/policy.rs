//! Static role → permission table.
//!
//! Plain immutable lookup; no role inheritance. Admin and Super are
//! permission-identical, every other role holds a strict subset of theirs.

use crate::{Permission, Role};

use Permission::*;

const FULL_ACCESS: &[Permission] = &[
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
];

const INVENTORY_MANAGER: &[Permission] =
    &[ViewDashboard, ViewProducts, EditProducts, EditStock, ViewLogs];

const CAPTAIN: &[Permission] = &[ViewDashboard, ViewProducts, ViewOrders, CreateOrders];

const DELIVERY: &[Permission] = &[ViewDashboard, ViewOrders, UpdateOrderStatus];

const VIEWER: &[Permission] = &[ViewDashboard, ViewProducts];

/// Permissions granted to a role.
pub fn permissions_for(role: Role) -> &'static [Permission] {
    match role {
        Role::Admin | Role::Super => FULL_ACCESS,
        Role::InventoryManager => INVENTORY_MANAGER,
        Role::Captain => CAPTAIN,
        Role::Delivery => DELIVERY,
        Role::Viewer => VIEWER,
    }
}

/// Only Admin and Super may operate as another user.
pub fn can_simulate(role: Role) -> bool {
    matches!(role, Role::Admin | Role::Super)
}
