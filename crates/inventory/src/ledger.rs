use serde::{Deserialize, Serialize};

use shelfwise_products::{Product, ProductPatch, ProductStatus, ProductVariant, units};

/// Sellable units of `variant` the current stock pool covers.
///
/// Untracked variants (grams-equivalent 0) always report 0.
pub fn available_units(product: &Product, variant: &ProductVariant) -> u64 {
    match variant.grams_per_unit() {
        0 => 0,
        grams => product.total_stock_grams / grams,
    }
}

/// The one status rule.
///
/// `Inactive` is sticky. Otherwise an empty pool means `OutOfStock` and a
/// refilled pool brings an `OutOfStock` product back to `Active`.
pub fn derive_status(current: ProductStatus, total_stock_grams: u64) -> ProductStatus {
    match current {
        ProductStatus::Inactive => ProductStatus::Inactive,
        _ if total_stock_grams == 0 => ProductStatus::OutOfStock,
        ProductStatus::OutOfStock | ProductStatus::Active => ProductStatus::Active,
    }
}

/// Outcome of [`apply_delta`]; nothing is written until the caller persists
/// it (see [`StockChange::patch`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockChange {
    pub previous_grams: u64,
    pub total_stock_grams: u64,
    pub status: ProductStatus,
    /// The delta would have gone below zero and was cut off at 0.
    pub clamped: bool,
}

impl StockChange {
    pub fn delta_grams(&self) -> i128 {
        i128::from(self.total_stock_grams) - i128::from(self.previous_grams)
    }

    pub fn patch(&self) -> ProductPatch {
        ProductPatch::stock(self.total_stock_grams, self.status)
    }
}

/// Move the pool by `signed_units` of `variant`.
///
/// Over-large withdrawals clamp at 0 instead of failing.
pub fn apply_delta(product: &Product, variant: &ProductVariant, signed_units: i64) -> StockChange {
    apply_unit_delta(product, &variant.unit, signed_units)
}

/// [`apply_delta`] keyed by a unit label, for order lines whose variant may
/// no longer be listed on the product.
pub fn apply_unit_delta(product: &Product, unit: &str, signed_units: i64) -> StockChange {
    let previous = product.total_stock_grams;
    let delta = i128::from(signed_units) * i128::from(units::grams_equivalent(unit));
    let next = i128::from(previous) + delta;

    let clamped = next < 0;
    let total_stock_grams = u64::try_from(next.max(0)).unwrap_or(u64::MAX);

    StockChange {
        previous_grams: previous,
        total_stock_grams,
        status: derive_status(product.status, total_stock_grams),
        clamped,
    }
}
