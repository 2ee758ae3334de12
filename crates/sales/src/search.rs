//! Order search, filters and customer suggestions.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shelfwise_core::{Entity, Page, PageRequest};

use crate::{CustomerInfo, Order, OrderStatus};

const MIN_SUGGESTION_TERM: usize = 2;
const MAX_SUGGESTIONS: usize = 5;

/// Status and creation-day filters. Days are compared in UTC.
///
/// When `date` is set it wins over the `start_date`/`end_date` range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl OrderFilters {
    /// Build day filters from a from/to picker; equal bounds become a single
    /// `date`.
    pub fn date_range(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        match (from, to) {
            (Some(from), Some(to)) if from == to => Self {
                date: Some(from),
                ..Self::default()
            },
            _ => Self {
                start_date: from,
                end_date: to,
                ..Self::default()
            },
        }
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, order: &Order) -> bool {
        if self.status.is_some_and(|s| s != order.status()) {
            return false;
        }

        let day = order.created_at().date_naive();
        if let Some(date) = self.date {
            return day == date;
        }
        if self.start_date.is_some_and(|start| day < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| day > end) {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSearchCriteria {
    /// Case-insensitive substring of the customer name, or substring of the
    /// phone number.
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub filters: OrderFilters,
    #[serde(flatten)]
    pub page: PageRequest,
}

impl OrderSearchCriteria {
    pub fn matches(&self, order: &Order) -> bool {
        self.filters.matches(order) && matches_customer(order, self.query.as_deref().unwrap_or(""))
    }
}

fn matches_customer(order: &Order, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return true;
    }
    order
        .customer_name()
        .to_lowercase()
        .contains(&term.to_lowercase())
        || order.customer_phone().contains(term)
}

/// Newest first; ties broken by id so paging is stable.
pub fn sort_newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| {
        b.created_at()
            .cmp(&a.created_at())
            .then_with(|| b.id().cmp(&a.id()))
    });
}

/// Filter, order and page an order set.
pub fn search<I>(orders: I, criteria: &OrderSearchCriteria) -> Page<Order>
where
    I: IntoIterator<Item = Order>,
{
    let mut matching: Vec<Order> = orders.into_iter().filter(|o| criteria.matches(o)).collect();
    sort_newest_first(&mut matching);
    criteria.page.slice(matching)
}

/// Past customers matching `term`, at most one per phone number.
///
/// Needs at least two characters; returns up to five, in the order the
/// orders are given.
pub fn suggest_customers(orders: &[Order], term: &str) -> Vec<CustomerInfo> {
    let term = term.trim();
    if term.chars().count() < MIN_SUGGESTION_TERM {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    orders
        .iter()
        .filter(|o| matches_customer(o, term))
        .filter(|o| seen.insert(o.customer_phone().to_string()))
        .take(MAX_SUGGESTIONS)
        .map(|o| CustomerInfo::new(o.customer_name(), o.customer_address(), o.customer_phone()))
        .collect()
}
