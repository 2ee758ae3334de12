use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shelfwise_core::{OrderId, ProductId};

/// Audit action label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditAction {
    #[serde(rename = "Product Added")]
    ProductAdded,
    #[serde(rename = "Product Updated")]
    ProductUpdated,
    #[serde(rename = "Product Deleted")]
    ProductDeleted,
    #[serde(rename = "Stock Updated")]
    StockUpdated,
    #[serde(rename = "Category Added")]
    CategoryAdded,
    #[serde(rename = "Category Deleted")]
    CategoryDeleted,
    #[serde(rename = "Order Created")]
    OrderCreated,
    #[serde(rename = "Order Status Updated")]
    OrderStatusUpdated,
    #[serde(rename = "Order Deleted")]
    OrderDeleted,
    #[serde(rename = "System")]
    System,
}

impl AuditAction {
    pub fn label(&self) -> &'static str {
        match self {
            AuditAction::ProductAdded => "Product Added",
            AuditAction::ProductUpdated => "Product Updated",
            AuditAction::ProductDeleted => "Product Deleted",
            AuditAction::StockUpdated => "Stock Updated",
            AuditAction::CategoryAdded => "Category Added",
            AuditAction::CategoryDeleted => "Category Deleted",
            AuditAction::OrderCreated => "Order Created",
            AuditAction::OrderStatusUpdated => "Order Status Updated",
            AuditAction::OrderDeleted => "Order Deleted",
            AuditAction::System => "System",
        }
    }
}

impl core::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// One audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub actor: String,
    pub action: AuditAction,
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
}

impl AuditEntry {
    pub fn new(
        actor: impl Into<String>,
        action: AuditAction,
        details: impl Into<String>,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            occurred_at,
            actor: actor.into(),
            action,
            details: details.into(),
            product_id: None,
            product_name: None,
            order_id: None,
        }
    }

    pub fn for_product(mut self, id: ProductId, name: impl Into<String>) -> Self {
        self.product_id = Some(id);
        self.product_name = Some(name.into());
        self
    }

    pub fn for_order(mut self, id: OrderId) -> Self {
        self.order_id = Some(id);
        self
    }
}
