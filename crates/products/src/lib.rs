//! Products domain module.
//!
//! Catalog records (products, packaging variants, categories), packaging-unit
//! normalization and the contract of the catalog store the rest of the system
//! reads and patches products through. Pure domain logic: no IO, no storage.

pub mod catalog;
pub mod category;
pub mod product;
pub mod units;

pub use catalog::{CatalogStore, NewProduct, ProductFilter, ProductPatch};
pub use category::Category;
pub use product::{Product, ProductStatus, ProductVariant};
pub use units::{grams_equivalent, is_stock_tracked};
