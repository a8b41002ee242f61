//! Cart aggregate and its view projections.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::product::Product;
use crate::errors::{AppError, AppResult};

/// Cart header (one per user, created lazily)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartHeader {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A persisted cart line. `quantity` is always at least 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub id: Uuid,
    pub cart_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub added_at: DateTime<Utc>,
}

/// A cart line joined with the product it refers to.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub item: CartItem,
    pub product: Option<Product>,
    pub image_url: String,
    pub category_name: String,
}

impl CartLine {
    /// Name used in messages about this line.
    pub fn product_name(&self) -> String {
        self.product
            .as_ref()
            .map(|p| p.name.clone())
            .unwrap_or_else(|| format!("#{}", self.item.product_id))
    }

    pub fn subtotal(&self) -> i64 {
        self.product
            .as_ref()
            .map(|p| p.price * i64::from(self.item.quantity))
            .unwrap_or(0)
    }

    fn is_purchasable(&self) -> bool {
        self.product
            .as_ref()
            .map(|p| p.can_supply(self.item.quantity))
            .unwrap_or(false)
    }
}

/// Cart aggregate: header plus its lines in insertion order
#[derive(Debug, Clone)]
pub struct Cart {
    pub header: CartHeader,
    pub lines: Vec<CartLine>,
}

impl Cart {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Badge numbers over the lines whose product still exists, matching
    /// what `CartView` renders
    pub fn stats(&self) -> CartStats {
        let live = || self.lines.iter().filter(|l| l.product.is_some());
        CartStats {
            total_items: live().map(|l| i64::from(l.item.quantity)).sum(),
            total_amount: live().map(CartLine::subtotal).sum(),
        }
    }

    /// Checkout pre-check: the cart must have items and every product must be
    /// present, active and in stock for the requested quantity.
    ///
    /// # Errors
    /// `EmptyCart`, or `OutOfStock` naming the first offending product.
    pub fn into_checkout(self) -> AppResult<CheckoutCart> {
        if self.is_empty() {
            return Err(AppError::EmptyCart);
        }

        if let Some(line) = self.lines.iter().find(|l| !l.is_purchasable()) {
            return Err(AppError::out_of_stock(line.product_name()));
        }

        let lines = self
            .lines
            .into_iter()
            .map(|l| CheckoutLine {
                item_id: l.item.id,
                product_id: l.item.product_id,
                product_name: l.product_name(),
                quantity: l.item.quantity,
            })
            .collect();

        Ok(CheckoutCart {
            cart_id: self.header.id,
            user_id: self.header.user_id,
            lines,
        })
    }
}

/// Snapshot of a cart that passed the checkout pre-check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutCart {
    pub cart_id: Uuid,
    pub user_id: Uuid,
    pub lines: Vec<CheckoutLine>,
}

impl CheckoutCart {
    pub fn item_ids(&self) -> Vec<Uuid> {
        self.lines.iter().map(|l| l.item_id).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutLine {
    pub item_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
}

/// Checkout page: the cart plus the customer's contact details used to
/// prefill the form
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CheckoutSummary {
    pub cart: CartView,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
}

/// Badge numbers shown next to the cart icon
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct CartStats {
    pub total_items: i64,
    pub total_amount: i64,
}

/// One rendered cart row
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CartItemView {
    /// Cart item id (used for update/remove)
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub price: i64,
    pub quantity: i32,
    pub subtotal: i64,
    pub image_url: String,
    pub category_name: String,
    pub stock_quantity: i32,
    pub is_active: bool,
    pub added_at: DateTime<Utc>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub material: Option<String>,
}

/// Rendered cart page
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total_amount: i64,
    pub total_items: i64,
    pub is_empty: bool,
}

impl CartView {
    pub fn empty() -> Self {
        Self {
            is_empty: true,
            ..Self::default()
        }
    }
}

impl From<Cart> for CartView {
    fn from(cart: Cart) -> Self {
        // Lines whose product vanished from the catalog are not rendered and
        // do not count toward the totals.
        let items: Vec<CartItemView> = cart
            .lines
            .into_iter()
            .filter_map(|line| {
                let subtotal = line.subtotal();
                let product = line.product?;
                Some(CartItemView {
                    id: line.item.id,
                    product_id: line.item.product_id,
                    stock_quantity: product.available_stock(),
                    is_active: product.is_active(),
                    product_name: product.name,
                    price: product.price,
                    quantity: line.item.quantity,
                    subtotal,
                    image_url: line.image_url,
                    category_name: line.category_name,
                    added_at: line.item.added_at,
                    size: product.size,
                    color: product.color,
                    material: product.material,
                })
            })
            .collect();

        Self {
            is_empty: items.is_empty(),
            total_amount: items.iter().map(|i| i.subtotal).sum(),
            total_items: items.iter().map(|i| i64::from(i.quantity)).sum(),
            items,
        }
    }
}
