//! Per-product packaging-unit choice while composing an order.
//!
//! Nothing here reacts to catalog changes on its own: the caller runs
//! [`UnitSelection::recompute`] after every catalog reload or stock change.

use std::collections::HashMap;

use shelfwise_core::ProductId;
use shelfwise_inventory::available_units;
use shelfwise_products::{Product, ProductStatus, ProductVariant};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitSelection {
    selected: HashMap<ProductId, String>,
}

impl UnitSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, product_id: ProductId, unit: impl Into<String>) {
        self.selected.insert(product_id, unit.into());
    }

    pub fn selected_unit(&self, product_id: ProductId) -> Option<&str> {
        self.selected.get(&product_id).map(String::as_str)
    }

    /// The chosen variant, or the first variant when nothing was chosen.
    ///
    /// A recorded unit the product no longer has yields `None` until the
    /// next recompute.
    pub fn selected_variant<'a>(&self, product: &'a Product) -> Option<&'a ProductVariant> {
        match self.selected.get(&product.id) {
            Some(unit) => product.variant(unit),
            None => product.variants.first(),
        }
    }

    /// Rebuild the selection for `products`.
    ///
    /// Keeps a choice that still has stock, otherwise moves to the first
    /// variant with stock, otherwise to the first variant. Products that are
    /// not passed in (or have no variants) are dropped. Returns whether
    /// anything changed.
    pub fn recompute(&mut self, products: &[Product]) -> bool {
        let mut next = HashMap::with_capacity(products.len());

        for product in products {
            let in_stock = |v: &&ProductVariant| available_units(product, v) > 0;

            let current = self
                .selected
                .get(&product.id)
                .and_then(|unit| product.variant(unit))
                .filter(in_stock);
            let choice = current
                .or_else(|| product.variants.iter().find(in_stock))
                .or_else(|| product.variants.first());

            if let Some(variant) = choice {
                next.insert(product.id, variant.unit.clone());
            }
        }

        let changed = next != self.selected;
        self.selected = next;
        changed
    }
}

/// Active products whose name contains `term` (case-insensitive); the list
/// the order screen offers for adding to a cart.
pub fn orderable_products<'a>(products: &'a [Product], term: &str) -> Vec<&'a Product> {
    let term = term.to_lowercase();
    products
        .iter()
        .filter(|p| p.status == ProductStatus::Active && p.name.to_lowercase().contains(&term))
        .collect()
}
