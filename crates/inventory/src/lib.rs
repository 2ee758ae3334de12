//! Inventory domain module.
//!
//! Stock accounting over the grams-equivalent pool: available units per
//! variant, signed stock deltas with a zero floor, status derivation and stock
//! valuation. Deterministic domain logic only (no IO, no storage).

pub mod ledger;
pub mod valuation;

pub use ledger::{StockChange, apply_delta, apply_unit_delta, available_units, derive_status};
pub use valuation::{StockSummary, inventory_value, low_stock_products};
