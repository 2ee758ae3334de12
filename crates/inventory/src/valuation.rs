//! Dashboard-level stock figures.

use serde::{Deserialize, Serialize};

use shelfwise_products::{Product, ProductStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSummary {
    pub total_products: usize,
    /// Products with `0 < grams <= threshold`.
    pub low_stock: usize,
    /// Empty pool and not `Inactive`.
    pub out_of_stock: usize,
}

impl StockSummary {
    pub fn from_products(products: &[Product], low_stock_threshold_grams: u64) -> Self {
        Self {
            total_products: products.len(),
            low_stock: low_stock_products(products, low_stock_threshold_grams).len(),
            out_of_stock: products.iter().filter(|p| is_out_of_stock(p)).count(),
        }
    }
}

fn is_out_of_stock(product: &Product) -> bool {
    product.total_stock_grams == 0 && product.status != ProductStatus::Inactive
}

pub fn low_stock_products(products: &[Product], threshold_grams: u64) -> Vec<&Product> {
    products
        .iter()
        .filter(|p| p.total_stock_grams > 0 && p.total_stock_grams <= threshold_grams)
        .collect()
}

/// Selling value of the stock on hand, in the smallest currency unit.
///
/// Each product is priced per gram from its smallest stock-tracked variant;
/// products without one contribute nothing. Saturates at `u64::MAX`.
pub fn inventory_value(products: &[Product]) -> u64 {
    let total: u128 = products.iter().map(product_value).sum();
    u64::try_from(total).unwrap_or(u64::MAX)
}

fn product_value(product: &Product) -> u128 {
    let smallest = product
        .variants
        .iter()
        .filter(|v| v.is_stock_tracked())
        .min_by_key(|v| v.grams_per_unit());

    match smallest {
        Some(v) => {
            u128::from(product.total_stock_grams) * u128::from(v.selling_price)
                / u128::from(v.grams_per_unit())
        }
        None => 0,
    }
}
