//! Order lifecycle orchestration.
//!
//! ```text
//! create:        authorize → validate → stock check → insert order → withdraw stock → audit
//! update_status: authorize → lifecycle check → patch status → audit
//! delete:        authorize → remove order → restore stock → audit
//! ```
//!
//! Stock moves only at creation (withdraw) and deletion (restore). Deleting
//! an order restores its stock whatever its status, a delivered order
//! included.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use shelfwise_audit::{AuditAction, AuditEntry, AuditSink};
use shelfwise_auth::{Identity, Permission, authorize, authorize_any};
use shelfwise_core::{DomainError, DomainResult, Entity, OrderId, Page, ProductId};
use shelfwise_inventory::{apply_unit_delta, available_units};
use shelfwise_products::{CatalogStore, Product, units};
use shelfwise_sales::{
    Cart, CartUpdate, CustomerInfo, Order, OrderItem, OrderPatch, OrderSearchCriteria, OrderStats,
    OrderStatus, OrderStore, suggest_customers,
};

use crate::config::CoreConfig;

pub struct OrderWorkflow<C, O, A> {
    catalog: C,
    orders: O,
    audit: A,
    config: CoreConfig,
}

impl<C, O, A> OrderWorkflow<C, O, A>
where
    C: CatalogStore,
    O: OrderStore,
    A: AuditSink,
{
    pub fn new(catalog: C, orders: O, audit: A, config: CoreConfig) -> Self {
        Self {
            catalog,
            orders,
            audit,
            config,
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn orders(&self) -> &O {
        &self.orders
    }

    /// Add one unit of a catalog variant to `cart`.
    pub fn add_to_cart(
        &self,
        cart: &mut Cart,
        product_id: ProductId,
        variant_unit: &str,
    ) -> DomainResult<CartUpdate> {
        let product = self.product(product_id)?;
        let variant = product
            .variant(variant_unit)
            .ok_or_else(|| DomainError::not_found("variant", variant_unit))?;
        Ok(cart.add(&product, variant))
    }

    /// Grow a cart line by one against the current catalog state.
    pub fn increment_line(
        &self,
        cart: &mut Cart,
        product_id: ProductId,
        variant_unit: &str,
    ) -> DomainResult<CartUpdate> {
        cart.increment(&self.catalog, product_id, variant_unit)
    }

    /// Place an order from `cart` and withdraw its stock.
    ///
    /// Lines of different variants of one product share a stock pool, so the
    /// combined draw per product is checked against current stock before
    /// anything is written. On success the cart is emptied.
    pub fn create(
        &self,
        actor: &Identity,
        customer: CustomerInfo,
        cart: &mut Cart,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Order> {
        authorize(actor, Permission::CreateOrders)?;

        let order = Order::place(
            OrderId::new(),
            customer,
            cart.items().to_vec(),
            &actor.name,
            occurred_at,
        )?;
        self.ensure_stock(order.items())?;

        let order = self.orders.insert(order)?;
        for item in order.items() {
            self.move_stock(item, -1);
        }
        cart.clear();

        tracing::info!(
            actor = %actor.name,
            order_id = %order.id(),
            items = order.items().len(),
            total = order.total_amount(),
            "order created"
        );
        self.audit.record(
            AuditEntry::new(
                &actor.name,
                AuditAction::OrderCreated,
                format!(
                    "Order for {} with {} line(s), total {}",
                    order.customer_name(),
                    order.items().len(),
                    order.total_amount()
                ),
                occurred_at,
            )
            .for_order(order.id()),
        );

        Ok(order)
    }

    /// Set a new status. Needs `updateOrderStatus` or `manageOrders`; stock is
    /// not touched.
    pub fn update_status(
        &self,
        actor: &Identity,
        id: OrderId,
        status: OrderStatus,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Order> {
        authorize_any(actor, &[Permission::UpdateOrderStatus, Permission::ManageOrders])?;
        let current = self.order(id)?;
        current.ensure_transition(status)?;

        let order = self.orders.patch(id, &OrderPatch::status(status, occurred_at))?;

        tracing::info!(
            actor = %actor.name,
            order_id = %id,
            from = %current.status(),
            to = %status,
            "order status updated"
        );
        self.audit.record(
            AuditEntry::new(
                &actor.name,
                AuditAction::OrderStatusUpdated,
                format!("Order status changed from {} to {}", current.status(), status),
                occurred_at,
            )
            .for_order(id),
        );

        Ok(order)
    }

    /// Remove an order and put its stock back. Needs `manageOrders`.
    pub fn delete(
        &self,
        actor: &Identity,
        id: OrderId,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Order> {
        authorize(actor, Permission::ManageOrders)?;
        let removed = self.orders.remove(id)?;

        for item in removed.items() {
            self.move_stock(item, 1);
        }

        tracing::info!(
            actor = %actor.name,
            order_id = %id,
            status = %removed.status(),
            "order deleted"
        );
        self.audit.record(
            AuditEntry::new(
                &actor.name,
                AuditAction::OrderDeleted,
                format!(
                    "Deleted order for {} ({})",
                    removed.customer_name(),
                    removed.status()
                ),
                occurred_at,
            )
            .for_order(id),
        );

        Ok(removed)
    }

    pub fn find(&self, id: OrderId) -> Option<Order> {
        self.orders.find(id)
    }

    pub fn search(&self, criteria: &OrderSearchCriteria) -> Page<Order> {
        let criteria = OrderSearchCriteria {
            page: self.config.clamp_page(criteria.page),
            ..criteria.clone()
        };
        self.orders.query(&criteria)
    }

    pub fn suggest_customers(&self, term: &str) -> Vec<CustomerInfo> {
        suggest_customers(&self.orders.all(), term)
    }

    pub fn stats(&self) -> OrderStats {
        OrderStats::from_orders(&self.orders.all())
    }

    fn product(&self, id: ProductId) -> DomainResult<Product> {
        self.catalog
            .find(id)
            .ok_or_else(|| DomainError::not_found("product", id))
    }

    fn order(&self, id: OrderId) -> DomainResult<Order> {
        self.orders
            .find(id)
            .ok_or_else(|| DomainError::not_found("order", id))
    }

    fn ensure_stock(&self, items: &[OrderItem]) -> DomainResult<()> {
        let mut needed: BTreeMap<ProductId, u128> = BTreeMap::new();

        for item in items {
            let product = self.product(item.product_id)?;
            let variant = product
                .variant(&item.variant_unit)
                .ok_or_else(|| DomainError::not_found("variant", &item.variant_unit))?;
            if u64::from(item.quantity) > available_units(&product, variant) {
                return Err(insufficient(&product));
            }
            *needed.entry(product.id).or_default() +=
                u128::from(item.quantity) * u128::from(units::grams_equivalent(&item.variant_unit));
        }

        for (id, grams) in needed {
            let product = self.product(id)?;
            if grams > u128::from(product.total_stock_grams) {
                return Err(insufficient(&product));
            }
        }
        Ok(())
    }

    /// Apply `direction × quantity` of the line's unit to its product.
    ///
    /// Runs after the order write; a product that has disappeared since is
    /// skipped with a warning.
    fn move_stock(&self, item: &OrderItem, direction: i64) {
        let Some(product) = self.catalog.find(item.product_id) else {
            tracing::warn!(
                product_id = %item.product_id,
                product = %item.product_name,
                "product no longer in catalog; stock not moved"
            );
            return;
        };

        let change = apply_unit_delta(&product, &item.variant_unit, direction * i64::from(item.quantity));
        if let Err(err) = self.catalog.patch(product.id, &change.patch()) {
            tracing::warn!(product_id = %product.id, error = %err, "stock write failed");
        }
    }
}

fn insufficient(product: &Product) -> DomainError {
    DomainError::validation(format!(
        "insufficient stock for {} ({}g available)",
        product.name, product.total_stock_grams
    ))
}
