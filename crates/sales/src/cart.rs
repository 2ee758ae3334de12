//! Order-in-progress staging.
//!
//! Lines are keyed by `(product_id, variant_unit)`. Every quantity increase is
//! checked against the stock available at that moment; hitting the limit is a
//! soft outcome ([`CartUpdate::StockLimit`]), not an error.

use serde::{Deserialize, Serialize};

use shelfwise_core::{DomainError, DomainResult, ProductId};
use shelfwise_inventory::available_units;
use shelfwise_products::{CatalogStore, Product, ProductVariant};

use crate::OrderItem;

/// The cart refused to grow a line past the available stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockLimitExceeded {
    pub product_name: String,
    pub limit: u64,
}

impl core::fmt::Display for StockLimitExceeded {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Stock limit of {} reached for {}.", self.limit, self.product_name)
    }
}

/// What a cart operation did.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartUpdate {
    Added,
    Incremented { quantity: u32 },
    Decremented { quantity: u32 },
    Removed,
    /// Nothing changed.
    StockLimit(StockLimitExceeded),
}

impl CartUpdate {
    pub fn is_applied(&self) -> bool {
        !matches!(self, CartUpdate::StockLimit(_))
    }

    pub fn stock_limit(&self) -> Option<&StockLimitExceeded> {
        match self {
            CartUpdate::StockLimit(limit) => Some(limit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<OrderItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn line(&self, product_id: ProductId, variant_unit: &str) -> Option<&OrderItem> {
        self.items.iter().find(|i| i.is_for(product_id, variant_unit))
    }

    /// Add one unit of `variant`.
    ///
    /// A new line is priced at the variant's current selling price.
    pub fn add(&mut self, product: &Product, variant: &ProductVariant) -> CartUpdate {
        let available = available_units(product, variant);

        match self.position(product.id, &variant.unit) {
            Some(idx) => self.grow(idx, available),
            None if available > 0 => {
                self.items.push(OrderItem {
                    product_id: product.id,
                    product_name: product.name.clone(),
                    variant_unit: variant.unit.clone(),
                    quantity: 1,
                    price: variant.selling_price,
                    image_url: product.image_url.clone(),
                });
                CartUpdate::Added
            }
            None => CartUpdate::StockLimit(StockLimitExceeded {
                product_name: product.name.clone(),
                limit: 0,
            }),
        }
    }

    /// Grow an existing line by one, re-reading the product from `catalog`
    /// so stock changes made elsewhere are respected.
    pub fn increment<C>(
        &mut self,
        catalog: &C,
        product_id: ProductId,
        variant_unit: &str,
    ) -> DomainResult<CartUpdate>
    where
        C: CatalogStore + ?Sized,
    {
        let idx = self
            .position(product_id, variant_unit)
            .ok_or_else(|| DomainError::not_found("cart line", format!("{product_id}/{variant_unit}")))?;
        let product = catalog
            .find(product_id)
            .ok_or_else(|| DomainError::not_found("product", product_id))?;
        let variant = product
            .variant(variant_unit)
            .ok_or_else(|| DomainError::not_found("variant", variant_unit))?;

        Ok(self.grow(idx, available_units(&product, variant)))
    }

    /// Shrink a line by one; a line at quantity 1 is removed.
    pub fn decrement(&mut self, product_id: ProductId, variant_unit: &str) -> DomainResult<CartUpdate> {
        let idx = self
            .position(product_id, variant_unit)
            .ok_or_else(|| DomainError::not_found("cart line", format!("{product_id}/{variant_unit}")))?;

        let line = &mut self.items[idx];
        if line.quantity > 1 {
            line.quantity -= 1;
            Ok(CartUpdate::Decremented {
                quantity: line.quantity,
            })
        } else {
            self.items.remove(idx);
            Ok(CartUpdate::Removed)
        }
    }

    /// Drop a line. Returns whether one was there.
    pub fn remove(&mut self, product_id: ProductId, variant_unit: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| !i.is_for(product_id, variant_unit));
        self.items.len() != before
    }

    pub fn total(&self) -> u64 {
        self.items
            .iter()
            .fold(0u64, |sum, item| sum.saturating_add(item.line_total()))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn position(&self, product_id: ProductId, variant_unit: &str) -> Option<usize> {
        self.items.iter().position(|i| i.is_for(product_id, variant_unit))
    }

    fn grow(&mut self, idx: usize, available: u64) -> CartUpdate {
        let line = &mut self.items[idx];
        if u64::from(line.quantity) < available {
            line.quantity += 1;
            CartUpdate::Incremented {
                quantity: line.quantity,
            }
        } else {
            CartUpdate::StockLimit(StockLimitExceeded {
                product_name: line.product_name.clone(),
                limit: available,
            })
        }
    }
}
