use std::sync::Arc;

use shelfwise_core::{DomainResult, OrderId, Page};

use crate::{Order, OrderPatch, OrderSearchCriteria};

/// Narrow interface to order persistence.
pub trait OrderStore: Send + Sync {
    fn insert(&self, order: Order) -> DomainResult<Order>;

    fn find(&self, id: OrderId) -> Option<Order>;

    fn patch(&self, id: OrderId, patch: &OrderPatch) -> DomainResult<Order>;

    fn remove(&self, id: OrderId) -> DomainResult<Order>;

    /// Matching orders, newest first, one page of them.
    fn query(&self, criteria: &OrderSearchCriteria) -> Page<Order>;

    /// Every order, newest first.
    fn all(&self) -> Vec<Order>;
}

impl<S> OrderStore for Arc<S>
where
    S: OrderStore + ?Sized,
{
    fn insert(&self, order: Order) -> DomainResult<Order> {
        (**self).insert(order)
    }

    fn find(&self, id: OrderId) -> Option<Order> {
        (**self).find(id)
    }

    fn patch(&self, id: OrderId, patch: &OrderPatch) -> DomainResult<Order> {
        (**self).patch(id, patch)
    }

    fn remove(&self, id: OrderId) -> DomainResult<Order> {
        (**self).remove(id)
    }

    fn query(&self, criteria: &OrderSearchCriteria) -> Page<Order> {
        (**self).query(criteria)
    }

    fn all(&self) -> Vec<Order> {
        (**self).all()
    }
}
