//! Infrastructure layer: configuration, in-memory stores and the services
//! that orchestrate catalog edits and the order lifecycle.

pub mod catalog_service;
pub mod config;
pub mod order_workflow;
pub mod store;

#[cfg(test)]
mod integration_tests;

pub use catalog_service::CatalogService;
pub use config::{ConfigError, CoreConfig};
pub use order_workflow::OrderWorkflow;
pub use store::{InMemoryCatalog, InMemoryOrderStore, InMemoryStore};
