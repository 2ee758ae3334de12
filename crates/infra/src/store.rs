//! In-memory catalog and order stores for tests/dev.
//!
//! Writes are serialized by an `RwLock` per collection. A poisoned lock reads
//! as empty and refuses writes.

use std::collections::HashMap;
use std::sync::RwLock;

use shelfwise_core::{CategoryId, DomainError, DomainResult, Entity, OrderId, Page, PageRequest, ProductId};
use shelfwise_products::{CatalogStore, Category, Product, ProductFilter, ProductPatch};
use shelfwise_sales::{Order, OrderPatch, OrderSearchCriteria, OrderStore, search, sort_newest_first};

/// Id-keyed entity map.
#[derive(Debug)]
pub struct InMemoryStore<V: Entity> {
    inner: RwLock<HashMap<V::Id, V>>,
}

impl<V: Entity> InMemoryStore<V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<V: Entity> Default for InMemoryStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Entity + Clone> InMemoryStore<V> {
    pub fn get(&self, id: V::Id) -> Option<V> {
        let map = self.inner.read().ok()?;
        map.get(&id).cloned()
    }

    pub fn upsert(&self, value: V, entity: &'static str) -> DomainResult<V> {
        let mut map = self.inner.write().map_err(|_| poisoned(entity))?;
        map.insert(value.id(), value.clone());
        Ok(value)
    }

    pub fn list(&self) -> Vec<V> {
        match self.inner.read() {
            Ok(map) => map.values().cloned().collect(),
            Err(_) => vec![],
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mutate one record in place under the write lock.
    pub fn update<F>(&self, id: V::Id, entity: &'static str, f: F) -> DomainResult<V>
    where
        F: FnOnce(&mut V),
    {
        let mut map = self.inner.write().map_err(|_| poisoned(entity))?;
        let value = map
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(entity, id))?;
        f(value);
        Ok(value.clone())
    }

    pub fn delete(&self, id: V::Id, entity: &'static str) -> DomainResult<V> {
        let mut map = self.inner.write().map_err(|_| poisoned(entity))?;
        map.remove(&id)
            .ok_or_else(|| DomainError::not_found(entity, id))
    }
}

#[cfg(test)]
impl<V: Entity> InMemoryStore<V> {
    /// Leave the lock poisoned, as a writer panicking mid-update would.
    pub(crate) fn poison(&self) {
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = self.inner.write();
            panic!("writer panicked while holding the store lock");
        }));
    }
}

fn poisoned(entity: &'static str) -> DomainError {
    DomainError::invariant(format!("{entity} store is unavailable"))
}

/// Products plus categories.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: InMemoryStore<Product>,
    categories: InMemoryStore<Category>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted(&self, filter: &ProductFilter) -> Vec<Product> {
        let mut products: Vec<Product> = self
            .products
            .list()
            .into_iter()
            .filter(|p| filter.matches(p))
            .collect();
        products.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });
        products
    }
}

impl CatalogStore for InMemoryCatalog {
    fn find(&self, id: ProductId) -> Option<Product> {
        self.products.get(id)
    }

    fn list(&self, filter: &ProductFilter, page: PageRequest) -> Page<Product> {
        page.slice(self.sorted(filter))
    }

    fn all(&self) -> Vec<Product> {
        self.sorted(&ProductFilter::default())
    }

    fn insert(&self, product: Product) -> DomainResult<Product> {
        self.products.upsert(product, "product")
    }

    fn patch(&self, id: ProductId, patch: &ProductPatch) -> DomainResult<Product> {
        self.products.update(id, "product", |p| patch.apply_to(p))
    }

    fn remove(&self, id: ProductId) -> DomainResult<Product> {
        self.products.delete(id, "product")
    }

    fn categories(&self) -> Vec<Category> {
        let mut categories = self.categories.list();
        categories.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        categories
    }

    fn insert_category(&self, category: Category) -> DomainResult<Category> {
        self.categories.upsert(category, "category")
    }

    fn remove_category(&self, id: CategoryId) -> DomainResult<Category> {
        self.categories.delete(id, "category")
    }
}

pub type InMemoryOrderStore = InMemoryStore<Order>;

impl OrderStore for InMemoryStore<Order> {
    fn insert(&self, order: Order) -> DomainResult<Order> {
        self.upsert(order, "order")
    }

    fn find(&self, id: OrderId) -> Option<Order> {
        self.get(id)
    }

    fn patch(&self, id: OrderId, patch: &OrderPatch) -> DomainResult<Order> {
        self.update(id, "order", |o| patch.apply_to(o))
    }

    fn remove(&self, id: OrderId) -> DomainResult<Order> {
        self.delete(id, "order")
    }

    fn query(&self, criteria: &OrderSearchCriteria) -> Page<Order> {
        search(self.list(), criteria)
    }

    fn all(&self) -> Vec<Order> {
        let mut orders = self.list();
        sort_newest_first(&mut orders);
        orders
    }
}
