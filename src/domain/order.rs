//! Order aggregate and order-history projections.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{
    ORDER_FILTER_ALL, ORDER_STATUS_CANCELLED, ORDER_STATUS_DELIVERED, ORDER_STATUS_PAID,
    ORDER_STATUS_PENDING, ORDER_STATUS_SHIPPED,
};
use crate::errors::AppError;

/// Order lifecycle status. Checkout always creates `Pending` orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Paid,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => ORDER_STATUS_PENDING,
            OrderStatus::Paid => ORDER_STATUS_PAID,
            OrderStatus::Shipped => ORDER_STATUS_SHIPPED,
            OrderStatus::Delivered => ORDER_STATUS_DELIVERED,
            OrderStatus::Cancelled => ORDER_STATUS_CANCELLED,
        }
    }

    /// Cancelled orders do not count toward what a customer has spent.
    pub fn counts_as_spent(&self) -> bool {
        !matches!(self, OrderStatus::Cancelled)
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    /// Case-insensitive, so `pending` and `Pending` are the same status.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::BadRequest(format!("Unknown order status '{}'", s)))
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status filter for order listings: `all` or a single status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(OrderStatus),
}

impl StatusFilter {
    /// Parse a query value; a missing or empty value means no filter.
    ///
    /// # Errors
    /// `BadRequest` for an unknown status name.
    pub fn parse(value: Option<&str>) -> Result<Self, AppError> {
        match value.map(str::trim) {
            None | Some("") => Ok(StatusFilter::All),
            Some(v) if v.eq_ignore_ascii_case(ORDER_FILTER_ALL) => Ok(StatusFilter::All),
            Some(v) => v.parse().map(StatusFilter::Only),
        }
    }

    pub fn status(&self) -> Option<OrderStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Only(status) => Some(*status),
        }
    }
}

/// A purchased line. `unit_price` is frozen at checkout and never recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: i64,
}

impl OrderItem {
    pub fn subtotal(&self) -> i64 {
        self.unit_price * i64::from(self.quantity)
    }
}

/// Order aggregate as created by checkout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub total_amount: i64,
    pub items: Vec<OrderItem>,
}

/// Header fields for a new order
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: Uuid,
    pub total_amount: i64,
}

/// Order line as displayed in history pages
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderItemView {
    pub product_id: Uuid,
    pub product_name: String,
    pub image_url: String,
    /// Unit price paid
    pub price: i64,
    pub quantity: i32,
    pub category_name: String,
}

/// Row of the order history list
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderSummary {
    pub id: Uuid,
    pub order_date: DateTime<Utc>,
    /// Status as stored. Usually one of `OrderStatus`, but back-office
    /// tooling may write others and those are shown unchanged.
    #[schema(example = "Pending")]
    pub status: String,
    pub total_amount: i64,
    /// Number of distinct lines in the order
    pub item_count: usize,
    pub items: Vec<OrderItemView>,
}

/// Single order page, including the customer's contact details
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderDetail {
    pub id: Uuid,
    pub order_date: DateTime<Utc>,
    #[schema(example = "Pending")]
    pub status: String,
    pub total_amount: i64,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub items: Vec<OrderItemView>,
}

/// Per-status order counts for the history tabs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct StatusCounts {
    pub all: u64,
    pub pending: u64,
    pub paid: u64,
    pub shipped: u64,
    pub delivered: u64,
    pub cancelled: u64,
}

impl StatusCounts {
    /// Build from grouped `(stored status, count)` rows. Statuses outside
    /// `OrderStatus` only count toward `all`.
    pub fn from_grouped<S: AsRef<str>>(rows: impl IntoIterator<Item = (S, u64)>) -> Self {
        rows.into_iter().fold(Self::default(), |mut acc, (raw, n)| {
            acc.all += n;
            match raw.as_ref().parse::<OrderStatus>() {
                Ok(OrderStatus::Pending) => acc.pending += n,
                Ok(OrderStatus::Paid) => acc.paid += n,
                Ok(OrderStatus::Shipped) => acc.shipped += n,
                Ok(OrderStatus::Delivered) => acc.delivered += n,
                Ok(OrderStatus::Cancelled) => acc.cancelled += n,
                Err(_) => {}
            }
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!("pending".parse::<OrderStatus>().unwrap(), OrderStatus::Pending);
        assert_eq!("SHIPPED".parse::<OrderStatus>().unwrap(), OrderStatus::Shipped);
        assert!("lost".parse::<OrderStatus>().is_err());
        assert_eq!(OrderStatus::Cancelled.to_string(), "Cancelled");
    }

    #[test]
    fn test_status_filter() {
        assert_eq!(StatusFilter::parse(None).unwrap(), StatusFilter::All);
        assert_eq!(StatusFilter::parse(Some("all")).unwrap(), StatusFilter::All);
        assert_eq!(StatusFilter::parse(Some("")).unwrap(), StatusFilter::All);
        assert_eq!(
            StatusFilter::parse(Some("paid")).unwrap().status(),
            Some(OrderStatus::Paid)
        );
        assert!(matches!(
            StatusFilter::parse(Some("returned")),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_status_counts_from_grouped() {
        let counts = StatusCounts::from_grouped(vec![
            ("Pending", 2),
            ("Cancelled", 1),
            ("Delivered", 4),
            ("Processing", 3),
        ]);

        assert_eq!(counts.all, 10);
        assert_eq!(counts.pending, 2);
        assert_eq!(counts.paid, 0);
        assert_eq!(counts.cancelled, 1);
        assert_eq!(counts.delivered, 4);
    }

    #[test]
    fn test_item_subtotal() {
        let item = OrderItem {
            id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            quantity: 3,
            unit_price: 120_000,
        };
        assert_eq!(item.subtotal(), 360_000);
    }
}
