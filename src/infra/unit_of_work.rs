//! Unit of Work pattern implementation.
//!
//! Centralizes repository access and owns the transaction boundary. Work that
//! must be atomic (checkout) runs inside `transaction`, receiving a
//! `TransactionContext` whose repositories all share one database transaction.

use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, AccessMode, ActiveModelTrait, ColumnTrait, DatabaseConnection,
    DatabaseTransaction, EntityTrait, IsolationLevel, QueryFilter, Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use super::repositories::entities::{cart, cart_item, order, order_item, product};
use super::repositories::{
    queries, CartRepository, CartStore, OrderRepository, OrderStore, ProductRepository,
    ProductStore, UserRepository, UserStore,
};
use crate::domain::{NewOrder, Order, OrderItem, OrderStatus, Product};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Not mockable directly because of the generic transaction method.
/// Tests implement it over mocked repositories instead.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn products(&self) -> Arc<dyn ProductRepository>;

    fn carts(&self) -> Arc<dyn CartRepository>;

    fn orders(&self) -> Arc<dyn OrderRepository>;

    /// Execute a closure within a transaction.
    ///
    /// Commits when the closure returns `Ok`, rolls back on `Err`.
    /// Runs at ReadCommitted.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Repository access bound to one open transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn products(&self) -> TxProductRepository<'_> {
        TxProductRepository { txn: self.txn }
    }

    pub fn carts(&self) -> TxCartRepository<'_> {
        TxCartRepository { txn: self.txn }
    }

    pub fn orders(&self) -> TxOrderRepository<'_> {
        TxOrderRepository { txn: self.txn }
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    product_repo: Arc<ProductStore>,
    cart_repo: Arc<CartStore>,
    order_repo: Arc<OrderStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            product_repo: Arc::new(ProductStore::new(db.clone())),
            cart_repo: Arc::new(CartStore::new(db.clone())),
            order_repo: Arc::new(OrderStore::new(db.clone())),
            db,
        }
    }

    /// Internal transaction execution with configurable isolation level
    async fn execute_transaction<F, T>(&self, isolation: IsolationLevel, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(isolation), Some(AccessMode::ReadWrite))
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.product_repo.clone()
    }

    fn carts(&self) -> Arc<dyn CartRepository> {
        self.cart_repo.clone()
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        self.order_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::ReadCommitted, f).await
    }
}

/// Catalog access inside a transaction.
pub struct TxProductRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxProductRepository<'a> {
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        queries::product_by_id(self.txn, id).await
    }

    /// Take `quantity` units out of stock.
    ///
    /// A single guarded `UPDATE`: it only matches while the product is active
    /// and holds at least `quantity` units, so concurrent buyers can never
    /// drive the stock below zero. Returns `false` when nothing matched.
    pub async fn decrement_stock(&self, id: Uuid, quantity: i32) -> AppResult<bool> {
        let result = product::Entity::update_many()
            .col_expr(
                product::Column::StockQuantity,
                Expr::col(product::Column::StockQuantity).sub(quantity),
            )
            .col_expr(product::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(product::Column::Id.eq(id))
            .filter(product::Column::IsActive.eq(true))
            .filter(product::Column::StockQuantity.gte(quantity))
            .exec(self.txn)
            .await?;

        Ok(result.rows_affected == 1)
    }
}

/// Cart access inside a transaction.
pub struct TxCartRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxCartRepository<'a> {
    /// Delete the given lines of a cart. Returns how many were removed.
    pub async fn clear_items(&self, cart_id: Uuid, item_ids: Vec<Uuid>) -> AppResult<u64> {
        if item_ids.is_empty() {
            return Ok(0);
        }

        let result = cart_item::Entity::delete_many()
            .filter(cart_item::Column::CartId.eq(cart_id))
            .filter(cart_item::Column::Id.is_in(item_ids))
            .exec(self.txn)
            .await?;

        Ok(result.rows_affected)
    }

    pub async fn touch(&self, cart_id: Uuid) -> AppResult<()> {
        cart::Entity::update_many()
            .col_expr(cart::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(cart::Column::Id.eq(cart_id))
            .exec(self.txn)
            .await?;
        Ok(())
    }
}

/// Order writes inside a transaction.
pub struct TxOrderRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxOrderRepository<'a> {
    /// Insert a `Pending` order header dated now. Items are added separately.
    pub async fn create_order(&self, new_order: NewOrder) -> AppResult<Order> {
        let status = OrderStatus::Pending;
        let active_model = order::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(new_order.user_id),
            order_date: Set(chrono::Utc::now()),
            status: Set(status.as_str().to_string()),
            total_amount: Set(new_order.total_amount),
        };

        let model = active_model.insert(self.txn).await?;

        Ok(Order {
            id: model.id,
            user_id: model.user_id,
            order_date: model.order_date,
            status,
            total_amount: model.total_amount,
            items: Vec::new(),
        })
    }

    pub async fn add_item(
        &self,
        order_id: Uuid,
        product_id: Uuid,
        quantity: i32,
        unit_price: i64,
    ) -> AppResult<OrderItem> {
        let active_model = order_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(order_id),
            product_id: Set(product_id),
            quantity: Set(quantity),
            unit_price: Set(unit_price),
        };

        let model = active_model.insert(self.txn).await?;
        Ok(OrderItem::from(model))
    }
}

/// Simpler API for executing transactional operations.
///
/// This helper macro reduces boilerplate when using transactions.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
