//! Catalog editing (application-level orchestration).
//!
//! Every mutation runs in the same order: authorize, validate, write, audit.
//! A refused call leaves the catalog untouched.

use chrono::{DateTime, Utc};

use shelfwise_audit::{AuditAction, AuditEntry, AuditSink};
use shelfwise_auth::{Identity, Permission, authorize};
use shelfwise_core::{CategoryId, DomainError, DomainResult, Page, PageRequest, ProductId};
use shelfwise_inventory::{
    StockChange, StockSummary, apply_delta, available_units, derive_status, inventory_value,
};
use shelfwise_products::{
    CatalogStore, Category, NewProduct, Product, ProductFilter, ProductPatch, ProductStatus,
};

use crate::config::CoreConfig;

pub struct CatalogService<C, A> {
    catalog: C,
    audit: A,
    config: CoreConfig,
}

impl<C, A> CatalogService<C, A>
where
    C: CatalogStore,
    A: AuditSink,
{
    pub fn new(catalog: C, audit: A, config: CoreConfig) -> Self {
        Self {
            catalog,
            audit,
            config,
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Create a product.
    ///
    /// Needs `editProducts`, plus `editStock` for a non-zero opening stock and
    /// `editPrices` when any variant is priced.
    pub fn add_product(
        &self,
        actor: &Identity,
        new: NewProduct,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Product> {
        authorize(actor, Permission::EditProducts)?;
        if new.total_stock_grams > 0 {
            authorize(actor, Permission::EditStock)?;
        }
        if new.has_prices() {
            authorize(actor, Permission::EditPrices)?;
        }
        new.validate()?;

        let requested = new.status.unwrap_or(ProductStatus::Active);
        let status = derive_status(requested, new.total_stock_grams);
        let product = self
            .catalog
            .insert(new.into_product(ProductId::new(), status))?;

        warn_untracked(&product);
        tracing::info!(
            actor = %actor.name,
            product_id = %product.id,
            sku = %product.sku,
            stock_grams = product.total_stock_grams,
            "product added"
        );
        self.audit.record(
            AuditEntry::new(
                &actor.name,
                AuditAction::ProductAdded,
                format!("Added product {} ({})", product.name, product.sku),
                occurred_at,
            )
            .for_product(product.id, &product.name),
        );

        Ok(product)
    }

    /// Partially update a product.
    ///
    /// Needs `editProducts`, plus `editPrices` when a variant price changes
    /// and `editStock` when the stock level changes. The stored status always
    /// goes through the status rule, so only an explicit `Inactive` sticks.
    pub fn update_product(
        &self,
        actor: &Identity,
        id: ProductId,
        patch: ProductPatch,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Product> {
        authorize(actor, Permission::EditProducts)?;
        let current = self
            .catalog
            .find(id)
            .ok_or_else(|| DomainError::not_found("product", id))?;
        if patch.changes_prices(&current) {
            authorize(actor, Permission::EditPrices)?;
        }
        if patch.changes_stock(&current) {
            authorize(actor, Permission::EditStock)?;
        }
        patch.validate()?;

        let total = patch.total_stock_grams.unwrap_or(current.total_stock_grams);
        let requested = patch.status.unwrap_or(current.status);
        let patch = ProductPatch {
            status: Some(derive_status(requested, total)),
            ..patch
        };

        let product = self.catalog.patch(id, &patch)?;

        warn_untracked(&product);
        tracing::info!(actor = %actor.name, product_id = %id, status = %product.status, "product updated");
        self.audit.record(
            AuditEntry::new(
                &actor.name,
                AuditAction::ProductUpdated,
                format!("Updated product {}", product.name),
                occurred_at,
            )
            .for_product(product.id, &product.name),
        );

        Ok(product)
    }

    pub fn delete_product(
        &self,
        actor: &Identity,
        id: ProductId,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Product> {
        authorize(actor, Permission::DeleteProducts)?;
        let removed = self.catalog.remove(id)?;

        tracing::info!(actor = %actor.name, product_id = %id, "product deleted");
        self.audit.record(
            AuditEntry::new(
                &actor.name,
                AuditAction::ProductDeleted,
                format!("Deleted product {} ({})", removed.name, removed.sku),
                occurred_at,
            )
            .for_product(removed.id, &removed.name),
        );

        Ok(removed)
    }

    /// Move stock by `signed_units` of one variant (manual restock or write-off).
    pub fn adjust_stock(
        &self,
        actor: &Identity,
        id: ProductId,
        variant_unit: &str,
        signed_units: i64,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<StockChange> {
        authorize(actor, Permission::EditStock)?;
        let product = self
            .catalog
            .find(id)
            .ok_or_else(|| DomainError::not_found("product", id))?;
        let variant = product
            .variant(variant_unit)
            .ok_or_else(|| DomainError::not_found("variant", variant_unit))?;
        if !variant.is_stock_tracked() {
            return Err(DomainError::validation(format!(
                "unit '{variant_unit}' is not stock-tracked"
            )));
        }

        let change = apply_delta(&product, variant, signed_units);
        self.catalog.patch(id, &change.patch())?;

        if change.clamped {
            tracing::warn!(
                product_id = %id,
                unit = variant_unit,
                units = signed_units,
                "stock withdrawal clamped at zero"
            );
        }
        tracing::info!(
            actor = %actor.name,
            product_id = %id,
            previous_grams = change.previous_grams,
            total_grams = change.total_stock_grams,
            status = %change.status,
            "stock adjusted"
        );
        self.audit.record(
            AuditEntry::new(
                &actor.name,
                AuditAction::StockUpdated,
                format!(
                    "Stock for {} changed from {}g to {}g",
                    product.name, change.previous_grams, change.total_stock_grams
                ),
                occurred_at,
            )
            .for_product(product.id, &product.name),
        );

        Ok(change)
    }

    pub fn add_category(
        &self,
        actor: &Identity,
        name: &str,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Category> {
        authorize(actor, Permission::ManageSettings)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("category name cannot be empty"));
        }
        if self.catalog.categories().iter().any(|c| c.same_name(name)) {
            return Err(DomainError::validation(format!("category '{name}' already exists")));
        }

        let category = self.catalog.insert_category(Category::new(name))?;

        tracing::info!(actor = %actor.name, category = %category.name, "category added");
        self.audit.record(AuditEntry::new(
            &actor.name,
            AuditAction::CategoryAdded,
            format!("Added category {}", category.name),
            occurred_at,
        ));

        Ok(category)
    }

    pub fn delete_category(
        &self,
        actor: &Identity,
        id: CategoryId,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Category> {
        authorize(actor, Permission::ManageSettings)?;
        let removed = self.catalog.remove_category(id)?;

        tracing::info!(actor = %actor.name, category = %removed.name, "category deleted");
        self.audit.record(AuditEntry::new(
            &actor.name,
            AuditAction::CategoryDeleted,
            format!("Deleted category {}", removed.name),
            occurred_at,
        ));

        Ok(removed)
    }

    pub fn categories(&self) -> Vec<Category> {
        self.catalog.categories()
    }

    pub fn search_products(&self, filter: &ProductFilter, page: PageRequest) -> Page<Product> {
        self.catalog.list(filter, self.config.clamp_page(page))
    }

    /// Units of `variant_unit` the product's pool currently covers.
    pub fn available_units(&self, id: ProductId, variant_unit: &str) -> DomainResult<u64> {
        let product = self
            .catalog
            .find(id)
            .ok_or_else(|| DomainError::not_found("product", id))?;
        let variant = product
            .variant(variant_unit)
            .ok_or_else(|| DomainError::not_found("variant", variant_unit))?;
        Ok(available_units(&product, variant))
    }

    pub fn stock_summary(&self) -> StockSummary {
        StockSummary::from_products(&self.catalog.all(), self.config.low_stock_threshold_grams)
    }

    pub fn inventory_value(&self) -> u64 {
        inventory_value(&self.catalog.all())
    }
}

fn warn_untracked(product: &Product) {
    let untracked = product.untracked_units();
    if !untracked.is_empty() {
        tracing::warn!(
            product_id = %product.id,
            units = ?untracked,
            "variants cannot be stock-tracked and will always show zero stock"
        );
    }
}
