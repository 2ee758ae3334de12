//! Catalog store contract plus the inputs it accepts.
//!
//! The store owns products exclusively. Everything else holds a `ProductId`
//! and goes back through [`CatalogStore::find`] for the current state.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use shelfwise_core::{CategoryId, DomainError, DomainResult, Page, PageRequest, ProductId};

use crate::{Category, Product, ProductStatus, ProductVariant};

/// Narrow interface to product persistence.
///
/// Implementations serialize their own writes; no versioning or
/// optimistic-concurrency check is expected.
pub trait CatalogStore: Send + Sync {
    fn find(&self, id: ProductId) -> Option<Product>;

    /// Filtered page, ordered by product name.
    fn list(&self, filter: &ProductFilter, page: PageRequest) -> Page<Product>;

    /// Every product, ordered by name.
    fn all(&self) -> Vec<Product>;

    /// Store a new product; a store that cannot write returns `Err` and keeps
    /// nothing.
    fn insert(&self, product: Product) -> DomainResult<Product>;

    /// Apply a partial update and return the stored result.
    fn patch(&self, id: ProductId, patch: &ProductPatch) -> DomainResult<Product>;

    fn remove(&self, id: ProductId) -> DomainResult<Product>;

    fn categories(&self) -> Vec<Category>;

    fn insert_category(&self, category: Category) -> DomainResult<Category>;

    fn remove_category(&self, id: CategoryId) -> DomainResult<Category>;
}

impl<S> CatalogStore for Arc<S>
where
    S: CatalogStore + ?Sized,
{
    fn find(&self, id: ProductId) -> Option<Product> {
        (**self).find(id)
    }

    fn list(&self, filter: &ProductFilter, page: PageRequest) -> Page<Product> {
        (**self).list(filter, page)
    }

    fn all(&self) -> Vec<Product> {
        (**self).all()
    }

    fn insert(&self, product: Product) -> DomainResult<Product> {
        (**self).insert(product)
    }

    fn patch(&self, id: ProductId, patch: &ProductPatch) -> DomainResult<Product> {
        (**self).patch(id, patch)
    }

    fn remove(&self, id: ProductId) -> DomainResult<Product> {
        (**self).remove(id)
    }

    fn categories(&self) -> Vec<Category> {
        (**self).categories()
    }

    fn insert_category(&self, category: Category) -> DomainResult<Category> {
        (**self).insert_category(category)
    }

    fn remove_category(&self, id: CategoryId) -> DomainResult<Category> {
        (**self).remove_category(id)
    }
}

/// Product search filter. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilter {
    /// Case-insensitive substring of name or SKU.
    pub query: Option<String>,
    pub status: Option<ProductStatus>,
    pub category: Option<String>,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(status) = self.status
            && product.status != status
        {
            return false;
        }

        if let Some(category) = &self.category
            && !product.category.eq_ignore_ascii_case(category)
        {
            return false;
        }

        match self.query.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => {
                let q = q.to_lowercase();
                product.name.to_lowercase().contains(&q) || product.sku.to_lowercase().contains(&q)
            }
            _ => true,
        }
    }
}

/// Input for a new catalog entry.
///
/// `status` is a request: only `Inactive` is taken as-is, anything else is
/// derived from the initial stock when the product is saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub status: Option<ProductStatus>,
    #[serde(default)]
    pub total_stock_grams: u64,
    pub variants: Vec<ProductVariant>,
}

impl NewProduct {
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if self.sku.trim().is_empty() {
            return Err(DomainError::validation("SKU cannot be empty"));
        }
        if self.variants.is_empty() {
            return Err(DomainError::validation("a product needs at least one variant"));
        }
        if self.variants.iter().any(|v| v.unit.trim().is_empty()) {
            return Err(DomainError::validation("variant unit cannot be empty"));
        }
        Ok(())
    }

    pub fn has_prices(&self) -> bool {
        self.variants.iter().any(|v| v.mrp > 0 || v.selling_price > 0)
    }

    pub fn into_product(self, id: ProductId, status: ProductStatus) -> Product {
        Product {
            id,
            sku: self.sku.trim().to_string(),
            name: self.name.trim().to_string(),
            description: self.description,
            category: self.category,
            brand: self.brand,
            tags: self.tags,
            image_url: self.image_url,
            status,
            total_stock_grams: self.total_stock_grams,
            variants: self.variants,
        }
    }
}

/// Partial product update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub tags: Option<Vec<String>>,
    pub image_url: Option<String>,
    pub status: Option<ProductStatus>,
    pub total_stock_grams: Option<u64>,
    pub variants: Option<Vec<ProductVariant>>,
}

impl ProductPatch {
    /// Stock-only patch, as written by the ledger.
    pub fn stock(total_stock_grams: u64, status: ProductStatus) -> Self {
        Self {
            total_stock_grams: Some(total_stock_grams),
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if self.sku.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(DomainError::validation("SKU cannot be empty"));
        }
        if let Some(variants) = &self.variants {
            if variants.is_empty() {
                return Err(DomainError::validation("a product needs at least one variant"));
            }
            if variants.iter().any(|v| v.unit.trim().is_empty()) {
                return Err(DomainError::validation("variant unit cannot be empty"));
            }
        }
        Ok(())
    }

    pub fn changes_stock(&self, current: &Product) -> bool {
        self.total_stock_grams
            .is_some_and(|grams| grams != current.total_stock_grams)
    }

    /// True when any variant would end up with a different MRP or selling
    /// price. A brand-new variant counts as a change unless it is unpriced.
    pub fn changes_prices(&self, current: &Product) -> bool {
        let Some(variants) = &self.variants else {
            return false;
        };
        variants.iter().any(|next| match current.variant(&next.unit) {
            Some(prev) => prev.mrp != next.mrp || prev.selling_price != next.selling_price,
            None => next.mrp > 0 || next.selling_price > 0,
        })
    }

    pub fn apply_to(&self, product: &mut Product) {
        if let Some(sku) = &self.sku {
            product.sku = sku.trim().to_string();
        }
        if let Some(name) = &self.name {
            product.name = name.trim().to_string();
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(category) = &self.category {
            product.category = category.clone();
        }
        if let Some(brand) = &self.brand {
            product.brand = brand.clone();
        }
        if let Some(tags) = &self.tags {
            product.tags = tags.clone();
        }
        if let Some(image_url) = &self.image_url {
            product.image_url = Some(image_url.clone());
        }
        if let Some(status) = self.status {
            product.status = status;
        }
        if let Some(grams) = self.total_stock_grams {
            product.total_stock_grams = grams;
        }
        if let Some(variants) = &self.variants {
            product.variants = variants.clone();
        }
    }
}
