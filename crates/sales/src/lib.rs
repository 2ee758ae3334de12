//! Sales domain module.
//!
//! Cart composition with stock-limit checks, the order record and its
//! lifecycle rules, order search and reporting. Deterministic domain logic
//! only; persistence sits behind [`OrderStore`].

pub mod cart;
pub mod order;
pub mod search;
pub mod selection;
pub mod stats;
pub mod store;

pub use cart::{Cart, CartUpdate, StockLimitExceeded};
pub use order::{CustomerInfo, Order, OrderItem, OrderPatch, OrderStatus};
pub use search::{OrderFilters, OrderSearchCriteria, search, sort_newest_first, suggest_customers};
pub use selection::{UnitSelection, orderable_products};
pub use stats::OrderStats;
pub use store::OrderStore;
