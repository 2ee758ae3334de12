use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shelfwise_core::{DomainError, DomainResult, Entity, OrderId, ProductId};

/// Order lifecycle status.
///
/// Any status may follow any other while the order is open; `Delivered` and
/// `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "ORDER-CREATED")]
    OrderCreated,
    #[serde(rename = "IN-DELIVERY")]
    InDelivery,
    #[serde(rename = "DELIVERED")]
    Delivered,
    #[serde(rename = "CANCELLED")]
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::OrderCreated,
        OrderStatus::InDelivery,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::OrderCreated => "ORDER-CREATED",
            OrderStatus::InDelivery => "IN-DELIVERY",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown order status '{s}'")))
    }
}

/// Cart line and, once the order exists, order line.
///
/// `price` is the variant's selling price frozen when the line was first
/// added, in the smallest currency unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub variant_unit: String,
    pub quantity: u32,
    pub price: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl OrderItem {
    pub fn line_total(&self) -> u64 {
        self.price.saturating_mul(u64::from(self.quantity))
    }

    pub fn is_for(&self, product_id: ProductId, variant_unit: &str) -> bool {
        self.product_id == product_id && self.variant_unit == variant_unit
    }
}

/// Customer details captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub name: String,
    pub address: String,
    pub phone: String,
}

impl CustomerInfo {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            phone: phone.into(),
        }
    }

    /// Name and address are required; the phone must be exactly 10 digits.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("customer name is required"));
        }
        if self.address.trim().is_empty() {
            return Err(DomainError::validation("customer address is required"));
        }
        let phone = self.phone.trim();
        if phone.len() != 10 || !phone.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::validation("customer phone must be exactly 10 digits"));
        }
        Ok(())
    }
}

/// A placed customer order.
///
/// `total_amount` is fixed when the order is placed and never recomputed
/// from current prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    id: OrderId,
    customer_name: String,
    customer_address: String,
    customer_phone: String,
    items: Vec<OrderItem>,
    total_amount: u64,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    created_by: String,
}

impl Order {
    /// Build a new order from a finished cart.
    ///
    /// Fails with `Validation` on bad customer fields, an empty item list or
    /// a zero-quantity line.
    pub fn place(
        id: OrderId,
        customer: CustomerInfo,
        items: Vec<OrderItem>,
        created_by: impl Into<String>,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        customer.validate()?;

        if items.is_empty() {
            return Err(DomainError::validation("cart is empty"));
        }
        if let Some(item) = items.iter().find(|i| i.quantity == 0) {
            return Err(DomainError::validation(format!(
                "quantity for {} ({}) must be positive",
                item.product_name, item.variant_unit
            )));
        }

        let total_amount = items
            .iter()
            .fold(0u64, |sum, item| sum.saturating_add(item.line_total()));

        Ok(Self {
            id,
            customer_name: customer.name.trim().to_string(),
            customer_address: customer.address.trim().to_string(),
            customer_phone: customer.phone.trim().to_string(),
            items,
            total_amount,
            status: OrderStatus::OrderCreated,
            created_at: occurred_at,
            updated_at: occurred_at,
            created_by: created_by.into(),
        })
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn customer_address(&self) -> &str {
        &self.customer_address
    }

    pub fn customer_phone(&self) -> &str {
        &self.customer_phone
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn total_amount(&self) -> u64 {
        self.total_amount
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    /// Check a status change without applying it.
    ///
    /// Leaving a terminal status is refused; re-setting the same status is
    /// allowed.
    pub fn ensure_transition(&self, next: OrderStatus) -> DomainResult<()> {
        if self.status.is_terminal() && next != self.status {
            return Err(DomainError::invariant(format!(
                "order {} is {} and cannot move to {}",
                self.id, self.status, next
            )));
        }
        Ok(())
    }

    pub fn set_status(&mut self, next: OrderStatus, at: DateTime<Utc>) -> DomainResult<()> {
        self.ensure_transition(next)?;
        self.status = next;
        self.updated_at = at;
        Ok(())
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Partial order update accepted by the order store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPatch {
    pub status: Option<OrderStatus>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl OrderPatch {
    pub fn status(status: OrderStatus, at: DateTime<Utc>) -> Self {
        Self {
            status: Some(status),
            updated_at: Some(at),
        }
    }

    /// Raw field write; lifecycle rules are checked by the caller.
    pub fn apply_to(&self, order: &mut Order) {
        if let Some(status) = self.status {
            order.status = status;
        }
        if let Some(at) = self.updated_at {
            order.updated_at = at;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 10, 30, 0).unwrap()
    }

    fn customer() -> CustomerInfo {
        CustomerInfo::new("Meera", "12 Lake Road", "9876543210")
    }

    fn item(name: &str, quantity: u32, price: u64) -> OrderItem {
        OrderItem {
            product_id: ProductId::new(),
            product_name: name.to_string(),
            variant_unit: "500g".to_string(),
            quantity,
            price,
            image_url: None,
        }
    }

    #[test]
    fn total_is_sum_of_price_times_quantity() {
        let order = Order::place(
            OrderId::new(),
            customer(),
            vec![item("Dal", 2, 80), item("Ghee", 1, 150)],
            "Cap",
            test_time(),
        )
        .unwrap();
        assert_eq!(order.total_amount(), 310);
        assert_eq!(order.status(), OrderStatus::OrderCreated);
        assert_eq!(order.created_by(), "Cap");
        assert_eq!(order.created_at(), order.updated_at());
    }

    #[test]
    fn empty_cart_is_refused() {
        let err = Order::place(OrderId::new(), customer(), vec![], "Cap", test_time()).unwrap_err();
        assert_eq!(err, DomainError::validation("cart is empty"));
    }

    #[test]
    fn phone_must_be_ten_digits() {
        for phone in ["98765", "98765432101", "98765-4321", "abcdefghij", ""] {
            let c = CustomerInfo::new("Meera", "12 Lake Road", phone);
            assert!(matches!(c.validate(), Err(DomainError::Validation(_))), "{phone:?}");
        }
        assert!(customer().validate().is_ok());
    }

    #[test]
    fn blank_name_or_address_is_refused() {
        assert!(CustomerInfo::new(" ", "12 Lake Road", "9876543210").validate().is_err());
        assert!(CustomerInfo::new("Meera", "", "9876543210").validate().is_err());
    }

    #[test]
    fn open_orders_may_skip_ahead_but_terminal_orders_are_frozen() {
        let mut order =
            Order::place(OrderId::new(), customer(), vec![item("Dal", 1, 80)], "Cap", test_time())
                .unwrap();
        let later = test_time() + chrono::Duration::hours(2);

        order.set_status(OrderStatus::Delivered, later).unwrap();
        assert_eq!(order.status(), OrderStatus::Delivered);
        assert_eq!(order.updated_at(), later);

        let err = order.set_status(OrderStatus::InDelivery, later).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
        assert_eq!(order.status(), OrderStatus::Delivered);
    }

    #[test]
    fn status_wire_names() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::InDelivery).unwrap(),
            "\"IN-DELIVERY\""
        );
        assert_eq!("CANCELLED".parse::<OrderStatus>().unwrap(), OrderStatus::Cancelled);
        assert!("cancelled".parse::<OrderStatus>().is_err());
    }
}
