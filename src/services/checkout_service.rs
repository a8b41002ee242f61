//! Checkout service - turns a user's cart into an order.
//!
//! Checkout runs in two steps. `prepare` reads the cart outside any
//! transaction and rejects empty carts and lines that cannot be supplied.
//! `place_order` then opens one transaction and, in this order:
//!
//! 1. re-reads every product and re-validates it, taking prices from the rows
//!    read inside the transaction;
//! 2. inserts the `Pending` order header with the total of those prices;
//! 3. inserts each order item and takes its quantity out of stock with a
//!    guarded `UPDATE` (no match means another buyer got there first);
//! 4. deletes the purchased cart lines and bumps the cart.
//!
//! Any error rolls the whole transaction back, leaving stock, cart and
//! orders exactly as they were.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{CartView, CheckoutCart, CheckoutSummary, NewOrder, Order};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{TransactionContext, UnitOfWork};
use crate::with_transaction;

use super::parallel;

#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Checkout page: cart plus contact details, after the same pre-checks
    /// as `checkout`. Writes nothing.
    async fn checkout_summary(&self, user_id: Uuid) -> AppResult<CheckoutSummary>;

    /// Validate the cart and snapshot what is about to be bought
    async fn prepare(&self, user_id: Uuid) -> AppResult<CheckoutCart>;

    /// Atomically create the order for a prepared cart
    async fn place_order(&self, user_id: Uuid, cart: &CheckoutCart) -> AppResult<Order>;

    /// `prepare` followed by `place_order`
    async fn checkout(&self, user_id: Uuid) -> AppResult<Order>;
}

pub struct CheckoutManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CheckoutManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

/// Transactional body of `place_order`.
async fn write_order(ctx: TransactionContext<'_>, cart: CheckoutCart) -> AppResult<Order> {
    let products = ctx.products();

    let mut priced = Vec::with_capacity(cart.lines.len());
    for line in &cart.lines {
        let product = products
            .find_by_id(line.product_id)
            .await?
            .filter(|p| p.can_supply(line.quantity))
            .ok_or_else(|| AppError::out_of_stock(line.product_name.clone()))?;
        priced.push((line, product.price));
    }

    let total_amount = priced
        .iter()
        .map(|(line, price)| price * i64::from(line.quantity))
        .sum();

    let orders = ctx.orders();
    let mut order = orders
        .create_order(NewOrder {
            user_id: cart.user_id,
            total_amount,
        })
        .await?;

    for (line, unit_price) in priced {
        let item = orders
            .add_item(order.id, line.product_id, line.quantity, unit_price)
            .await?;

        if !products.decrement_stock(line.product_id, line.quantity).await? {
            return Err(AppError::out_of_stock(line.product_name.clone()));
        }
        order.items.push(item);
    }

    let carts = ctx.carts();
    carts.clear_items(cart.cart_id, cart.item_ids()).await?;
    carts.touch(cart.cart_id).await?;

    Ok(order)
}

#[async_trait]
impl<U: UnitOfWork> CheckoutService for CheckoutManager<U> {
    async fn checkout_summary(&self, user_id: Uuid) -> AppResult<CheckoutSummary> {
        let (user, cart) = parallel::join2(
            self.uow.users().find_by_id(user_id),
            self.uow.carts().find_cart(user_id),
        )
        .await?;
        let user = user.ok_or_not_found()?;
        let cart = cart.ok_or(AppError::EmptyCart)?;

        cart.clone().into_checkout()?;

        Ok(CheckoutSummary {
            cart: CartView::from(cart),
            customer_name: user.name,
            customer_email: user.email,
            customer_phone: user.phone.unwrap_or_default(),
        })
    }

    async fn prepare(&self, user_id: Uuid) -> AppResult<CheckoutCart> {
        let cart = self
            .uow
            .carts()
            .find_cart(user_id)
            .await?
            .ok_or(AppError::EmptyCart)?;

        cart.into_checkout().inspect_err(|e| {
            tracing::warn!(%user_id, "Checkout rejected: {}", e);
        })
    }

    async fn place_order(&self, user_id: Uuid, cart: &CheckoutCart) -> AppResult<Order> {
        if cart.user_id != user_id {
            return Err(AppError::Forbidden);
        }
        if cart.lines.is_empty() {
            return Err(AppError::EmptyCart);
        }

        let snapshot = cart.clone();
        let result: AppResult<Order> = with_transaction!(self.uow, |ctx| {
            write_order(ctx, snapshot).await
        });

        match &result {
            Ok(order) => tracing::info!(
                %user_id,
                order_id = %order.id,
                total_amount = order.total_amount,
                items = order.items.len(),
                "Order placed"
            ),
            Err(e) => tracing::warn!(%user_id, "Checkout rolled back: {}", e),
        }
        result
    }

    async fn checkout(&self, user_id: Uuid) -> AppResult<Order> {
        let cart = self.prepare(user_id).await?;
        self.place_order(user_id, &cart).await
    }
}
