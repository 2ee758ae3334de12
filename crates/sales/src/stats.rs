use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Order, OrderStatus};

/// Headline order figures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStats {
    pub total_orders: usize,
    /// Sum of `total_amount` over delivered orders only.
    pub total_revenue: u64,
    pub status_counts: BTreeMap<OrderStatus, usize>,
}

impl OrderStats {
    pub fn from_orders(orders: &[Order]) -> Self {
        let mut stats = OrderStats {
            total_orders: orders.len(),
            ..Self::default()
        };

        for order in orders {
            *stats.status_counts.entry(order.status()).or_default() += 1;
            if order.status() == OrderStatus::Delivered {
                stats.total_revenue = stats.total_revenue.saturating_add(order.total_amount());
            }
        }

        stats
    }

    pub fn count(&self, status: OrderStatus) -> usize {
        self.status_counts.get(&status).copied().unwrap_or(0)
    }
}
